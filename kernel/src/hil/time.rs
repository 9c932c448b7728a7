// Licensed under the Apache License, Version 2.0 or the MIT License.
// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright Tock Contributors 2026.

//! Hardware agnostic interfaces for blocking delays.

/// Blocking waits used between register accesses that need settle time.
///
/// These are busy or sleeping waits that return only after the requested time
/// has elapsed; they are never cooperative yields back to the caller.
pub trait Delay {
    /// Wait for exactly `us` microseconds (or slightly more).
    fn udelay(&self, us: u32);

    /// Wait for at least `min_us` and at most `max_us` microseconds. The
    /// window lets the implementation coalesce wakeups.
    fn usleep_range(&self, min_us: u32, max_us: u32);
}
