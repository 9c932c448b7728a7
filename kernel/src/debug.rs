// Licensed under the Apache License, Version 2.0 or the MIT License.
// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright Tock Contributors 2026.

//! Support for in-kernel debugging.
//!
//! Drivers print with the [`debug!`](crate::debug!) macro:
//!
//! ```rust,ignore
//! debug!("watchdog{}: timeout={}", id, timeout);
//! ```
//!
//! Output goes to the [`IoWrite`] sink the board registered with
//! [`set_debug_writer`]. Until a sink is registered, messages are dropped.

use core::fmt::{self, Write};
use core::ptr;
use core::sync::atomic::{AtomicPtr, Ordering};

/// Byte sink for debug output, typically a polled UART.
pub trait IoWrite: Sync {
    /// Write as many bytes of `buf` as possible and return how many were
    /// consumed. Returning 0 aborts the current message.
    fn write(&self, buf: &[u8]) -> usize;
}

static DEBUG_WRITER: AtomicPtr<&'static dyn IoWrite> = AtomicPtr::new(ptr::null_mut());

/// Register the sink used by `debug!`. Replaces any previous sink.
pub fn set_debug_writer(writer: &'static &'static dyn IoWrite) {
    DEBUG_WRITER.store(
        writer as *const &'static dyn IoWrite as *mut &'static dyn IoWrite,
        Ordering::Release,
    );
}

/// Detach the current sink; later messages are dropped.
pub fn clear_debug_writer() {
    DEBUG_WRITER.store(ptr::null_mut(), Ordering::Release);
}

fn debug_writer() -> Option<&'static dyn IoWrite> {
    let writer = DEBUG_WRITER.load(Ordering::Acquire);
    // SAFETY: the pointer is either null or was created from a
    // `&'static &'static dyn IoWrite` in `set_debug_writer`.
    unsafe { writer.as_ref() }.copied()
}

struct DebugSink(&'static dyn IoWrite);

impl Write for DebugSink {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        let mut bytes = s.as_bytes();
        while !bytes.is_empty() {
            let written = self.0.write(bytes);
            if written == 0 {
                return Err(fmt::Error);
            }
            bytes = &bytes[written.min(bytes.len())..];
        }
        Ok(())
    }
}

/// Write a formatted line to the debug sink.
pub fn debug_println(args: fmt::Arguments) {
    if let Some(writer) = debug_writer() {
        let mut sink = DebugSink(writer);
        let _ = sink.write_fmt(args);
        let _ = sink.write_str("\r\n");
    }
}

/// Write a formatted line prefixed with the source location.
pub fn debug_verbose_println(args: fmt::Arguments, file_line: &(&'static str, u32)) {
    if let Some(writer) = debug_writer() {
        let (file, line) = *file_line;
        let mut sink = DebugSink(writer);
        let _ = write!(sink, "{}:{}: ", file, line);
        let _ = sink.write_fmt(args);
        let _ = sink.write_str("\r\n");
    }
}

/// In-kernel `println()` debugging.
#[macro_export]
macro_rules! debug {
    () => ({
        // Allow an empty debug!() to print the location when hit
        $crate::debug!("")
    });
    ($msg:expr $(,)?) => ({
        $crate::debug::debug_println(format_args!($msg));
    });
    ($fmt:expr, $($arg:tt)+) => ({
        $crate::debug::debug_println(format_args!($fmt, $($arg)+));
    });
}

/// In-kernel `println()` debugging with filename and line numbers.
#[macro_export]
macro_rules! debug_verbose {
    () => ({
        $crate::debug_verbose!("")
    });
    ($msg:expr $(,)?) => ({
        $crate::debug::debug_verbose_println(format_args!($msg), {
            static _FILE_LINE: (&'static str, u32) = (file!(), line!());
            &_FILE_LINE
        })
    });
    ($fmt:expr, $($arg:tt)+) => ({
        $crate::debug::debug_verbose_println(format_args!($fmt, $($arg)+), {
            static _FILE_LINE: (&'static str, u32) = (file!(), line!());
            &_FILE_LINE
        })
    });
}
