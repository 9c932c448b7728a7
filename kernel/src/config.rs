// Licensed under the Apache License, Version 2.0 or the MIT License.
// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright Tock Contributors 2026.

//! Data structure for storing compile-time configuration options in the kernel.
//!
//! Options are plain `const` values rather than `#[cfg]` blocks so that every
//! code path is type-checked even when disabled; the compiler folds the
//! constants away in the final image.

/// Data structure holding compile-time configuration options.
///
/// To change the configuration, enable the matching cargo feature on the
/// `kernel` dependency from the board crate.
pub(crate) struct Config {
    /// Whether register map updates should be traced to the debug output.
    ///
    /// If enabled, every field update issued through
    /// [`update_field`](crate::hil::regmap::update_field) prints the register
    /// address, mask and value before the access is made.
    pub(crate) trace_regmap: bool,

    /// Whether the restart chain should report each handler it invokes.
    pub(crate) debug_restart_chain: bool,
}

/// The only place in the kernel crate where `cfg!(feature = ...)` is used to
/// configure code.
pub(crate) const CONFIG: Config = Config {
    trace_regmap: cfg!(feature = "trace_regmap"),
    debug_restart_chain: cfg!(feature = "debug_restart_chain"),
};
