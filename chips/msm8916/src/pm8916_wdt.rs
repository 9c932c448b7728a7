// Licensed under the Apache License, Version 2.0 or the MIT License.
// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright Tock Contributors 2026.

//! PM8916 PMIC watchdog.
//!
//! The watchdog is the S2 reset stage of the PMIC power-on (PON) block. The
//! S1 stage is zeroed so the S2 timer alone sets the timeout, and the S2
//! stage is armed as a warm reset. The PMIC sits behind the SPMI bus, so
//! every access goes through the parent device's register map and each
//! write needs a settle time before the next one.
//!
//! Usage
//! -----
//!
//! ```rust,ignore
//! let wdt = Pm8916Wdt::new(delay);
//! let pdev = PlatformDevice::new(pm8916_wdt::DRIVER_NAME)
//!     .with_of_node(&PON_WDT_NODE)
//!     .with_parent_regmap(spmi_regmap);
//! wdt.probe(&pdev, watchdog_core, restart_chain)?;
//! ```

use core::cell::Cell;
use core::cmp;

use kernel::debug;
use kernel::hil::regmap::{update_field, Regmap};
use kernel::hil::time::Delay;
use kernel::hil::watchdog::{WatchdogDevice, WatchdogInfo, WatchdogOps, WatchdogOptions};
use kernel::platform::device::{OfDeviceId, PlatformDevice};
use kernel::platform::restart::{
    NotifyResult, RestartAction, RestartChain, RestartHandler, PRIORITY_LAST_RESORT,
};
use kernel::utilities::registers::register_bitfields;
use kernel::watchdog::{self, WatchdogCore};
use kernel::ErrorCode;

pub const DRIVER_NAME: &str = "qcom_pm8916_wdt";

pub static OF_MATCH_TABLE: [OfDeviceId; 1] = [OfDeviceId {
    compatible: "qcom,pmic-wd",
}];

/// Register offsets from the PON base address.
const PON_S1_TIMER: u32 = 0x54;
const PON_S2_TIMER: u32 = 0x55;
const PON_S2_CTL: u32 = 0x56;
const PON_S2_CTL2: u32 = 0x57;
const PON_PET: u32 = 0x58;

register_bitfields![u8,
    S1_TIMER [
        /// Seconds before the S1 stage fires
        TIMER OFFSET(0) NUMBITS(7) []
    ],
    S2_TIMER [
        /// Seconds the S2 stage waits before resetting the system
        TIMER OFFSET(0) NUMBITS(7) []
    ],
    S2_CTL [
        RESET_TYPE OFFSET(0) NUMBITS(4) [
            WarmReset = 1,
            Shutdown = 4,
            HardReset = 7
        ]
    ],
    S2_CTL2 [
        S2_RESET_EN OFFSET(7) NUMBITS(1) []
    ],
    PET [
        PET_WD OFFSET(0) NUMBITS(1) []
    ]
];

/// Time the PMIC needs after a register write before the next access.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct SettleWindow {
    min_us: u32,
    max_us: u32,
}

const TIMER_SETTLE: SettleWindow = SettleWindow {
    min_us: 200,
    max_us: 1000,
};
const CTL_SETTLE: SettleWindow = SettleWindow {
    min_us: 100,
    max_us: 1000,
};
const PET_SETTLE: SettleWindow = SettleWindow {
    min_us: 200,
    max_us: 1000,
};

pub const MIN_TIMEOUT: u32 = 1;
pub const MAX_TIMEOUT: u32 = 0x7f;
pub const DEFAULT_TIMEOUT: u32 = 30;

static INFO: WatchdogInfo = WatchdogInfo {
    options: WatchdogOptions::KEEPALIVEPING
        .union(WatchdogOptions::MAGICCLOSE)
        .union(WatchdogOptions::SETTIMEOUT),
    firmware_version: 0,
    identity: DRIVER_NAME,
};

/// Lifecycle of the driver instance.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum WdtState {
    /// Not probed, or removed.
    Uninitialized,
    /// Probed, the S2 stage has not been armed yet.
    Configured,
    Armed,
    Stopped,
}

pub struct Pm8916Wdt<'a> {
    wdd: WatchdogDevice,
    delay: &'a dyn Delay,
    regmap: Cell<Option<&'a dyn Regmap<u8>>>,
    baseaddr: Cell<u32>,
    state: Cell<WdtState>,
    core: Cell<Option<&'a WatchdogCore<'a>>>,
    restart_chain: Cell<Option<&'a RestartChain<'a>>>,
}

impl<'a> Pm8916Wdt<'a> {
    pub fn new(delay: &'a dyn Delay) -> Pm8916Wdt<'a> {
        Pm8916Wdt {
            wdd: WatchdogDevice::new(&INFO, MIN_TIMEOUT, MAX_TIMEOUT),
            delay,
            regmap: Cell::new(None),
            baseaddr: Cell::new(0),
            state: Cell::new(WdtState::Uninitialized),
            core: Cell::new(None),
            restart_chain: Cell::new(None),
        }
    }

    /// Bind to `pdev` and make the watchdog available through `core`.
    ///
    /// The restart handler is optional: if `restart_chain` refuses it the
    /// probe still succeeds.
    pub fn probe(
        &'a self,
        pdev: &PlatformDevice<'a>,
        core: &'a WatchdogCore<'a>,
        restart_chain: &'a RestartChain<'a>,
    ) -> Result<(), ErrorCode> {
        if self.state.get() != WdtState::Uninitialized {
            return Err(ErrorCode::ALREADY);
        }

        let regmap = pdev.parent_regmap().ok_or_else(|| {
            debug!("{}: failed to locate regmap", pdev.name());
            ErrorCode::NODEVICE
        })?;
        let node = pdev.of_node();
        let baseaddr = node.ok_or(ErrorCode::INVAL)?.read_u32("reg")?;
        if baseaddr.checked_add(PON_PET).is_none() {
            debug!("{}: reg {:#x} out of range", pdev.name(), baseaddr);
            return Err(ErrorCode::INVAL);
        }

        self.regmap.set(Some(regmap));
        self.baseaddr.set(baseaddr);
        self.wdd
            .set_timeout(cmp::min(self.wdd.max_timeout(), DEFAULT_TIMEOUT));
        // An unusable timeout-sec property leaves the default in place.
        let _ = watchdog::init_timeout(&self.wdd, 0, node);
        self.state.set(WdtState::Configured);

        if let Err(e) = core.register(self) {
            debug!("{}: failed to register watchdog", pdev.name());
            self.regmap.set(None);
            self.state.set(WdtState::Uninitialized);
            return Err(e);
        }
        self.core.set(Some(core));

        match restart_chain.register(PRIORITY_LAST_RESORT, self) {
            Ok(()) => self.restart_chain.set(Some(restart_chain)),
            Err(_) => debug!("{}: failed to setup restart handler", pdev.name()),
        }

        debug!("{}: timeout={} sec", pdev.name(), self.wdd.timeout());
        Ok(())
    }

    /// Undo [`probe`](Self::probe). The hardware is left as it is.
    ///
    /// On error the driver stays bound to whatever it has not yet been
    /// removed from, so `remove` can be retried.
    pub fn remove(&self) -> Result<(), ErrorCode> {
        let core = self.core.get().ok_or(ErrorCode::OFF)?;
        if let Some(chain) = self.restart_chain.get() {
            chain.unregister(self)?;
            self.restart_chain.set(None);
        }
        if let Some(id) = self.wdd.id() {
            core.unregister(id)?;
        }
        self.core.set(None);
        self.regmap.set(None);
        self.state.set(WdtState::Uninitialized);
        Ok(())
    }

    pub fn state(&self) -> WdtState {
        self.state.get()
    }

    fn regmap(&self) -> Result<&'a dyn Regmap<u8>, ErrorCode> {
        self.regmap.get().ok_or(ErrorCode::OFF)
    }

    fn settle(&self, window: SettleWindow) {
        self.delay.usleep_range(window.min_us, window.max_us);
    }
}

impl WatchdogOps for Pm8916Wdt<'_> {
    fn device(&self) -> &WatchdogDevice {
        &self.wdd
    }

    /// Program the S2 timer from the stored timeout and arm a warm reset.
    ///
    /// All four writes are issued even if one of them fails; the first
    /// failure is returned.
    fn start(&self) -> Result<(), ErrorCode> {
        let regmap = self.regmap()?;
        let timeout = self.wdd.timeout();
        if self.wdd.timeout_invalid(timeout) {
            return Err(ErrorCode::INVAL);
        }
        let timer = u8::try_from(timeout).map_err(|_| ErrorCode::INVAL)?;
        let base = self.baseaddr.get();
        if let Some(id) = self.wdd.id() {
            debug!("watchdog{}: timeout={}", id, timeout);
        }

        let s1 = update_field(regmap, base + PON_S1_TIMER, S1_TIMER::TIMER.val(0));
        self.settle(TIMER_SETTLE);
        let s2 = update_field(regmap, base + PON_S2_TIMER, S2_TIMER::TIMER.val(timer));
        self.settle(TIMER_SETTLE);
        let ctl = update_field(regmap, base + PON_S2_CTL, S2_CTL::RESET_TYPE::WarmReset);
        self.settle(CTL_SETTLE);
        let enable = update_field(regmap, base + PON_S2_CTL2, S2_CTL2::S2_RESET_EN::SET);
        self.settle(CTL_SETTLE);
        if enable.is_ok() {
            self.wdd.set_hw_running(true);
        }

        s1.and(s2).and(ctl).and(enable)?;
        self.state.set(WdtState::Armed);
        Ok(())
    }

    fn stop(&self) -> Result<(), ErrorCode> {
        let regmap = self.regmap()?;
        let ret = update_field(
            regmap,
            self.baseaddr.get() + PON_S2_CTL2,
            S2_CTL2::S2_RESET_EN::CLEAR,
        );
        self.settle(CTL_SETTLE);
        ret?;
        self.wdd.set_hw_running(false);
        self.state.set(WdtState::Stopped);
        Ok(())
    }

    fn ping(&self) -> Result<(), ErrorCode> {
        let regmap = self.regmap()?;
        let ret = update_field(regmap, self.baseaddr.get() + PON_PET, PET::PET_WD::SET);
        self.settle(PET_SETTLE);
        ret
    }

    /// Store `timeout` and re-run the start sequence, even when stopped.
    fn set_timeout(&self, timeout: u32) -> Result<(), ErrorCode> {
        if self.wdd.timeout_invalid(timeout) {
            return Err(ErrorCode::INVAL);
        }
        self.wdd.set_timeout(timeout);
        self.start()
    }
}

impl RestartHandler for Pm8916Wdt<'_> {
    fn restart_notify(&self, action: RestartAction) -> NotifyResult {
        match action {
            RestartAction::SysDown | RestartAction::SysHalt => {
                if let Err(e) = self.stop() {
                    debug!("{}: stop on {:?} failed: {:?}", DRIVER_NAME, action, e);
                }
            }
            RestartAction::SysPowerOff => {}
        }
        NotifyResult::Done
    }
}
