// Licensed under the Apache License, Version 2.0 or the MIT License.
// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright Tock Contributors 2026.

//! Interface for clock providers.
//!
//! A clock driver implements [`ClockHw`] and hands itself to the host's
//! [`ClockProvider`], which owns the clock tree and decides when the
//! operations below are called. Rates are in Hz.

use crate::ErrorCode;

/// Flags describing how the host should treat a clock.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ClockFlags(u32);

impl ClockFlags {
    /// Never gate this clock, even if it has no consumers.
    pub const IS_CRITICAL: ClockFlags = ClockFlags(1 << 11);

    pub const fn empty() -> ClockFlags {
        ClockFlags(0)
    }

    pub const fn contains(self, other: ClockFlags) -> bool {
        self.0 & other.0 == other.0
    }
}

/// Registration data for a clock.
#[derive(Debug)]
pub struct ClockInitData {
    pub name: &'static str,
    pub parent_names: &'static [&'static str],
    pub flags: ClockFlags,
}

/// Hardware operations of a single clock.
pub trait ClockHw {
    fn init_data(&self) -> &'static ClockInitData;

    /// Ungate the clock. Returns once the output is usable.
    fn enable(&self) -> Result<(), ErrorCode>;

    fn disable(&self);

    fn is_enabled(&self) -> bool;

    /// Rate the clock currently produces from `parent_rate`.
    fn recalc_rate(&self, parent_rate: u64) -> u64;

    /// Rate the clock would produce if asked for `rate`.
    fn determine_rate(&self, rate: u64, parent_rate: u64) -> u64;

    fn set_rate(&self, rate: u64, parent_rate: u64) -> Result<(), ErrorCode>;
}

/// The host side of the clock tree.
pub trait ClockProvider<'a> {
    fn register_clock(&self, hw: &'a dyn ClockHw) -> Result<(), ErrorCode>;
}
