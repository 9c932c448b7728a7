// Licensed under the Apache License, Version 2.0 or the MIT License.
// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright Tock Contributors 2026.

//! Interface for watchdog timer drivers.
//!
//! A driver embeds a [`WatchdogDevice`] holding the timeout and bookkeeping
//! state, and implements [`WatchdogOps`] to program its hardware. The host
//! reaches the driver through [`WatchdogCore`](crate::watchdog::WatchdogCore),
//! which validates requests before forwarding them.

use core::cell::Cell;
use core::ops::BitOr;

use crate::ErrorCode;

/// Capabilities a watchdog advertises to the host.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct WatchdogOptions(u32);

impl WatchdogOptions {
    /// The timeout can be changed at runtime.
    pub const SETTIMEOUT: WatchdogOptions = WatchdogOptions(0x0080);
    /// Closing the device only stops the watchdog after the magic character.
    pub const MAGICCLOSE: WatchdogOptions = WatchdogOptions(0x0100);
    /// The watchdog is kept alive by pinging it.
    pub const KEEPALIVEPING: WatchdogOptions = WatchdogOptions(0x8000);

    pub const fn empty() -> WatchdogOptions {
        WatchdogOptions(0)
    }

    pub const fn union(self, other: WatchdogOptions) -> WatchdogOptions {
        WatchdogOptions(self.0 | other.0)
    }

    pub const fn contains(self, other: WatchdogOptions) -> bool {
        self.0 & other.0 == other.0
    }

    pub const fn bits(self) -> u32 {
        self.0
    }
}

impl BitOr for WatchdogOptions {
    type Output = WatchdogOptions;

    fn bitor(self, rhs: WatchdogOptions) -> WatchdogOptions {
        self.union(rhs)
    }
}

/// Static description of a watchdog driver.
#[derive(Debug)]
pub struct WatchdogInfo {
    pub options: WatchdogOptions,
    pub firmware_version: u32,
    pub identity: &'static str,
}

/// Per-instance watchdog state shared between a driver and the host.
///
/// Timeouts are in seconds. The timeout stored here is what the driver
/// programs on the next start.
pub struct WatchdogDevice {
    info: &'static WatchdogInfo,
    id: Cell<Option<usize>>,
    min_timeout: u32,
    max_timeout: u32,
    timeout: Cell<u32>,
    active: Cell<bool>,
    hw_running: Cell<bool>,
}

impl WatchdogDevice {
    pub const fn new(info: &'static WatchdogInfo, min_timeout: u32, max_timeout: u32) -> Self {
        WatchdogDevice {
            info,
            id: Cell::new(None),
            min_timeout,
            max_timeout,
            timeout: Cell::new(0),
            active: Cell::new(false),
            hw_running: Cell::new(false),
        }
    }

    pub fn info(&self) -> &'static WatchdogInfo {
        self.info
    }

    /// Index assigned by the host at registration, `None` when unregistered.
    pub fn id(&self) -> Option<usize> {
        self.id.get()
    }

    pub(crate) fn set_id(&self, id: Option<usize>) {
        self.id.set(id);
    }

    pub fn min_timeout(&self) -> u32 {
        self.min_timeout
    }

    pub fn max_timeout(&self) -> u32 {
        self.max_timeout
    }

    pub fn timeout(&self) -> u32 {
        self.timeout.get()
    }

    /// Store a new timeout. Does not touch hardware.
    pub fn set_timeout(&self, timeout: u32) {
        self.timeout.set(timeout);
    }

    /// Whether the host believes the watchdog is running.
    pub fn is_active(&self) -> bool {
        self.active.get()
    }

    pub(crate) fn set_active(&self, active: bool) {
        self.active.set(active);
    }

    /// Whether the driver last left the hardware counting down, whatever
    /// the host asked for.
    pub fn is_hw_running(&self) -> bool {
        self.hw_running.get()
    }

    /// Called by the driver whenever it arms or disarms the hardware.
    pub fn set_hw_running(&self, running: bool) {
        self.hw_running.set(running);
    }

    /// Whether `timeout` cannot be programmed on this device.
    ///
    /// Values that overflow once converted to milliseconds are always
    /// rejected; a `max_timeout` of zero disables the range check.
    pub fn timeout_invalid(&self, timeout: u32) -> bool {
        timeout > u32::MAX / 1000
            || (self.max_timeout != 0
                && (timeout < self.min_timeout || timeout > self.max_timeout))
    }
}

/// Operations a watchdog driver provides to the host.
///
/// The host never calls these concurrently for the same device.
pub trait WatchdogOps {
    /// The state object embedded in the driver.
    fn device(&self) -> &WatchdogDevice;

    /// Arm the watchdog with the timeout stored in [`WatchdogDevice`].
    fn start(&self) -> Result<(), ErrorCode>;

    /// Disarm the watchdog.
    fn stop(&self) -> Result<(), ErrorCode>;

    /// Restart the countdown. Drivers without a dedicated keepalive
    /// register re-run the start sequence.
    fn ping(&self) -> Result<(), ErrorCode> {
        self.start()
    }

    /// Change the timeout. The host has already checked it against the
    /// device bounds. A driver that arms the hardware here must report it
    /// through [`WatchdogDevice::set_hw_running`].
    fn set_timeout(&self, timeout: u32) -> Result<(), ErrorCode> {
        self.device().set_timeout(timeout);
        Ok(())
    }
}

/// A single request from the host to a watchdog driver.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum WatchdogOp {
    Start,
    Stop,
    Ping,
    SetTimeout(u32),
}

#[cfg(test)]
mod test {
    use super::{WatchdogDevice, WatchdogInfo, WatchdogOptions};

    static INFO: WatchdogInfo = WatchdogInfo {
        options: WatchdogOptions::KEEPALIVEPING.union(WatchdogOptions::SETTIMEOUT),
        firmware_version: 0,
        identity: "test",
    };

    #[test]
    fn options_compose() {
        let options = WatchdogOptions::KEEPALIVEPING | WatchdogOptions::MAGICCLOSE;
        assert!(options.contains(WatchdogOptions::MAGICCLOSE));
        assert!(!options.contains(WatchdogOptions::SETTIMEOUT));
        assert_eq!(options.bits(), 0x8100);
        assert!(INFO.options.contains(WatchdogOptions::SETTIMEOUT));
    }

    #[test]
    fn timeout_bounds() {
        let wdd = WatchdogDevice::new(&INFO, 1, 127);
        assert!(wdd.timeout_invalid(0));
        assert!(!wdd.timeout_invalid(1));
        assert!(!wdd.timeout_invalid(127));
        assert!(wdd.timeout_invalid(128));

        assert!(!wdd.is_hw_running());
        wdd.set_hw_running(true);
        assert!(wdd.is_hw_running());
        assert!(!wdd.is_active());

        let unbounded = WatchdogDevice::new(&INFO, 0, 0);
        assert!(!unbounded.timeout_invalid(100_000));
        assert!(unbounded.timeout_invalid(u32::MAX));
    }
}
