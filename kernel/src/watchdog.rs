// Licensed under the Apache License, Version 2.0 or the MIT License.
// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright Tock Contributors 2026.

//! Host-side entry point for watchdog drivers.
//!
//! `WatchdogCore` keeps the registered [`WatchdogOps`] implementations and is
//! the only path through which requests reach a driver. It enforces the
//! device bounds and tracks whether each watchdog is running, so drivers can
//! assume every request they receive is valid.
//!
//! A watchdog counts as running when the host started it or when its driver
//! reports the hardware armed. Stop and ping reach the driver in either case.

use core::cell::Cell;

use crate::debug;
use crate::hil::watchdog::{WatchdogDevice, WatchdogOp, WatchdogOps, WatchdogOptions};
use crate::platform::device::DeviceNode;
use crate::ErrorCode;

/// Storage for one registered watchdog.
pub type WatchdogSlot<'a> = Cell<Option<&'a dyn WatchdogOps>>;

fn running(wdd: &WatchdogDevice) -> bool {
    wdd.is_active() || wdd.is_hw_running()
}

pub struct WatchdogCore<'a> {
    slots: &'a [WatchdogSlot<'a>],
}

impl<'a> WatchdogCore<'a> {
    pub fn new(slots: &'a [WatchdogSlot<'a>]) -> WatchdogCore<'a> {
        for slot in slots.iter() {
            slot.set(None);
        }
        WatchdogCore { slots }
    }

    /// Make `ops` reachable and return the id assigned to it.
    pub fn register(&self, ops: &'a dyn WatchdogOps) -> Result<usize, ErrorCode> {
        let wdd = ops.device();
        if wdd.id().is_some() {
            return Err(ErrorCode::ALREADY);
        }
        if wdd.max_timeout() != 0 && wdd.min_timeout() > wdd.max_timeout() {
            return Err(ErrorCode::INVAL);
        }
        let id = self
            .slots
            .iter()
            .position(|slot| slot.get().is_none())
            .ok_or(ErrorCode::NOMEM)?;

        self.slots[id].set(Some(ops));
        wdd.set_id(Some(id));
        Ok(id)
    }

    pub fn unregister(&self, id: usize) -> Result<(), ErrorCode> {
        let ops = self.ops(id)?;
        self.slots[id].set(None);
        let wdd = ops.device();
        if running(wdd) {
            debug!("watchdog{}: unregistered while running", id);
        }
        wdd.set_id(None);
        wdd.set_active(false);
        Ok(())
    }

    fn ops(&self, id: usize) -> Result<&'a dyn WatchdogOps, ErrorCode> {
        self.slots
            .get(id)
            .and_then(|slot| slot.get())
            .ok_or(ErrorCode::NODEVICE)
    }

    /// Forward one request to the watchdog registered as `id`.
    pub fn dispatch(&self, id: usize, op: WatchdogOp) -> Result<(), ErrorCode> {
        let ops = self.ops(id)?;
        let wdd = ops.device();
        match op {
            WatchdogOp::Start => {
                if wdd.is_active() {
                    return Ok(());
                }
                ops.start()?;
                wdd.set_active(true);
                Ok(())
            }
            WatchdogOp::Stop => {
                if !running(wdd) {
                    return Ok(());
                }
                ops.stop()?;
                wdd.set_active(false);
                Ok(())
            }
            WatchdogOp::Ping => {
                if !running(wdd) {
                    return Ok(());
                }
                ops.ping()
            }
            WatchdogOp::SetTimeout(timeout) => {
                if !wdd.info().options.contains(WatchdogOptions::SETTIMEOUT) {
                    return Err(ErrorCode::NOSUPPORT);
                }
                if wdd.timeout_invalid(timeout) {
                    return Err(ErrorCode::INVAL);
                }
                ops.set_timeout(timeout)
            }
        }
    }

    pub fn start(&self, id: usize) -> Result<(), ErrorCode> {
        self.dispatch(id, WatchdogOp::Start)
    }

    pub fn stop(&self, id: usize) -> Result<(), ErrorCode> {
        self.dispatch(id, WatchdogOp::Stop)
    }

    pub fn ping(&self, id: usize) -> Result<(), ErrorCode> {
        self.dispatch(id, WatchdogOp::Ping)
    }

    pub fn set_timeout(&self, id: usize, timeout: u32) -> Result<(), ErrorCode> {
        self.dispatch(id, WatchdogOp::SetTimeout(timeout))
    }

    /// Current timeout in seconds.
    pub fn timeout(&self, id: usize) -> Result<u32, ErrorCode> {
        self.ops(id).map(|ops| ops.device().timeout())
    }

    pub fn is_active(&self, id: usize) -> Result<bool, ErrorCode> {
        self.ops(id).map(|ops| ops.device().is_active())
    }

    /// Whether the hardware of `id` is counting down, started by the host or
    /// not.
    pub fn is_running(&self, id: usize) -> Result<bool, ErrorCode> {
        self.ops(id).map(|ops| running(ops.device()))
    }
}

/// Pick the initial timeout of `wdd`.
///
/// A valid, non-zero `timeout_parm` wins. Otherwise the `timeout-sec`
/// property of `node` is used if valid. The timeout the driver set before
/// calling this is kept when neither source is usable, in which case `INVAL`
/// is returned so the caller can report it.
pub fn init_timeout(
    wdd: &WatchdogDevice,
    timeout_parm: u32,
    node: Option<&DeviceNode>,
) -> Result<(), ErrorCode> {
    if timeout_parm != 0 && !wdd.timeout_invalid(timeout_parm) {
        wdd.set_timeout(timeout_parm);
        return Ok(());
    }
    let mut ret = if timeout_parm != 0 {
        Err(ErrorCode::INVAL)
    } else {
        Ok(())
    };

    let node = match node {
        Some(node) => node,
        None => return ret,
    };
    let t = node.read_u32("timeout-sec").unwrap_or(0);
    if t != 0 && !wdd.timeout_invalid(t) {
        wdd.set_timeout(t);
    } else {
        ret = Err(ErrorCode::INVAL);
    }
    ret
}

#[cfg(test)]
mod test {
    extern crate std;

    use super::{init_timeout, WatchdogCore, WatchdogSlot};
    use crate::hil::watchdog::{WatchdogDevice, WatchdogInfo, WatchdogOp, WatchdogOps, WatchdogOptions};
    use crate::platform::device::{DeviceNode, Property, PropertyValue};
    use crate::ErrorCode;
    use std::cell::RefCell;
    use std::vec::Vec;

    static INFO: WatchdogInfo = WatchdogInfo {
        options: WatchdogOptions::KEEPALIVEPING.union(WatchdogOptions::SETTIMEOUT),
        firmware_version: 0,
        identity: "mock",
    };

    static FIXED_INFO: WatchdogInfo = WatchdogInfo {
        options: WatchdogOptions::KEEPALIVEPING,
        firmware_version: 0,
        identity: "fixed",
    };

    struct MockWdt {
        wdd: WatchdogDevice,
        calls: RefCell<Vec<WatchdogOp>>,
    }

    impl MockWdt {
        fn new(info: &'static WatchdogInfo) -> MockWdt {
            let wdd = WatchdogDevice::new(info, 1, 127);
            wdd.set_timeout(30);
            MockWdt {
                wdd,
                calls: RefCell::new(Vec::new()),
            }
        }
    }

    impl WatchdogOps for MockWdt {
        fn device(&self) -> &WatchdogDevice {
            &self.wdd
        }

        fn start(&self) -> Result<(), ErrorCode> {
            self.calls.borrow_mut().push(WatchdogOp::Start);
            Ok(())
        }

        fn stop(&self) -> Result<(), ErrorCode> {
            self.calls.borrow_mut().push(WatchdogOp::Stop);
            self.wdd.set_hw_running(false);
            Ok(())
        }

        fn set_timeout(&self, timeout: u32) -> Result<(), ErrorCode> {
            self.calls.borrow_mut().push(WatchdogOp::SetTimeout(timeout));
            self.wdd.set_timeout(timeout);
            Ok(())
        }
    }

    #[test]
    fn set_timeout_in_range_is_reported_back() {
        let wdt = MockWdt::new(&INFO);
        let slots: [WatchdogSlot; 1] = Default::default();
        let core = WatchdogCore::new(&slots);
        let id = core.register(&wdt).unwrap();

        for t in 1..=127 {
            core.set_timeout(id, t).unwrap();
            assert_eq!(core.timeout(id), Ok(t));
        }
        assert_eq!(wdt.calls.borrow().len(), 127);
    }

    #[test]
    fn set_timeout_out_of_range_never_reaches_driver() {
        let wdt = MockWdt::new(&INFO);
        let slots: [WatchdogSlot; 1] = Default::default();
        let core = WatchdogCore::new(&slots);
        let id = core.register(&wdt).unwrap();

        assert_eq!(core.set_timeout(id, 0), Err(ErrorCode::INVAL));
        assert_eq!(core.set_timeout(id, 128), Err(ErrorCode::INVAL));
        assert_eq!(core.set_timeout(id, u32::MAX), Err(ErrorCode::INVAL));
        assert!(wdt.calls.borrow().is_empty());
        assert_eq!(core.timeout(id), Ok(30));
    }

    #[test]
    fn set_timeout_requires_capability() {
        let wdt = MockWdt::new(&FIXED_INFO);
        let slots: [WatchdogSlot; 1] = Default::default();
        let core = WatchdogCore::new(&slots);
        let id = core.register(&wdt).unwrap();
        assert_eq!(core.set_timeout(id, 10), Err(ErrorCode::NOSUPPORT));
    }

    #[test]
    fn start_stop_ping_track_activity() {
        let wdt = MockWdt::new(&INFO);
        let slots: [WatchdogSlot; 2] = Default::default();
        let core = WatchdogCore::new(&slots);
        let id = core.register(&wdt).unwrap();
        assert_eq!(id, 0);

        // Pinging a stopped watchdog is a no-op.
        core.ping(id).unwrap();
        core.stop(id).unwrap();
        assert!(wdt.calls.borrow().is_empty());

        core.start(id).unwrap();
        core.start(id).unwrap();
        assert_eq!(core.is_active(id), Ok(true));
        // No dedicated ping: the start sequence is reused.
        core.ping(id).unwrap();
        core.stop(id).unwrap();
        assert_eq!(core.is_active(id), Ok(false));

        assert_eq!(
            *wdt.calls.borrow(),
            [WatchdogOp::Start, WatchdogOp::Start, WatchdogOp::Stop]
        );
    }

    #[test]
    fn hardware_armed_by_driver_accepts_ping_and_stop() {
        let wdt = MockWdt::new(&INFO);
        let slots: [WatchdogSlot; 1] = Default::default();
        let core = WatchdogCore::new(&slots);
        let id = core.register(&wdt).unwrap();

        // As if set_timeout had re-run the start sequence.
        wdt.wdd.set_hw_running(true);
        assert_eq!(core.is_active(id), Ok(false));
        assert_eq!(core.is_running(id), Ok(true));

        core.ping(id).unwrap();
        core.stop(id).unwrap();
        assert_eq!(*wdt.calls.borrow(), [WatchdogOp::Start, WatchdogOp::Stop]);
        assert_eq!(core.is_running(id), Ok(false));
    }

    #[test]
    fn registration_bookkeeping() {
        let a = MockWdt::new(&INFO);
        let b = MockWdt::new(&INFO);
        let slots: [WatchdogSlot; 1] = Default::default();
        let core = WatchdogCore::new(&slots);

        assert_eq!(core.register(&a), Ok(0));
        assert_eq!(a.wdd.id(), Some(0));
        assert_eq!(core.register(&a), Err(ErrorCode::ALREADY));
        assert_eq!(core.register(&b), Err(ErrorCode::NOMEM));
        assert_eq!(core.start(1), Err(ErrorCode::NODEVICE));

        core.unregister(0).unwrap();
        assert_eq!(a.wdd.id(), None);
        assert_eq!(core.unregister(0), Err(ErrorCode::NODEVICE));
        assert_eq!(core.register(&b), Ok(0));
    }

    #[test]
    fn initial_timeout_sources() {
        static PROPS: [Property; 1] = [Property {
            name: "timeout-sec",
            value: PropertyValue::U32(60),
        }];
        static NODE: DeviceNode = DeviceNode {
            compatible: "qcom,pmic-wd",
            properties: &PROPS,
        };
        static BAD_PROPS: [Property; 1] = [Property {
            name: "timeout-sec",
            value: PropertyValue::U32(500),
        }];
        static BAD_NODE: DeviceNode = DeviceNode {
            compatible: "qcom,pmic-wd",
            properties: &BAD_PROPS,
        };
        static EMPTY_NODE: DeviceNode = DeviceNode {
            compatible: "qcom,pmic-wd",
            properties: &[],
        };

        let wdd = WatchdogDevice::new(&INFO, 1, 127);
        wdd.set_timeout(30);

        // Parameter takes precedence over the property.
        assert_eq!(init_timeout(&wdd, 10, Some(&NODE)), Ok(()));
        assert_eq!(wdd.timeout(), 10);

        // Invalid parameter falls back to the property but reports it.
        assert_eq!(init_timeout(&wdd, 200, Some(&NODE)), Err(ErrorCode::INVAL));
        assert_eq!(wdd.timeout(), 60);

        wdd.set_timeout(30);
        assert_eq!(init_timeout(&wdd, 0, None), Ok(()));
        assert_eq!(init_timeout(&wdd, 0, Some(&EMPTY_NODE)), Err(ErrorCode::INVAL));
        assert_eq!(init_timeout(&wdd, 0, Some(&BAD_NODE)), Err(ErrorCode::INVAL));
        assert_eq!(wdd.timeout(), 30);
    }
}
