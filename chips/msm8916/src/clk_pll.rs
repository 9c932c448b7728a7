// Licensed under the Apache License, Version 2.0 or the MIT License.
// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright Tock Contributors 2026.

//! Qualcomm SR2 PLL.
//!
//! The PLL output is `parent * (L + M / N)`, optionally divided by a post
//! divider in the config register. Rates are only ever set from a fixed
//! frequency table; each chip supplies its register offsets and table through
//! [`PllRegs`] and [`PllFreq`].
//!
//! Bring-up order for an SR2 PLL is: release reset, wait for the lock
//! detector, then enable the output.

use core::cell::Cell;

use kernel::debug;
use kernel::hil::clock::{ClockHw, ClockInitData};
use kernel::hil::regmap::{read_local, update_field, Regmap};
use kernel::hil::time::Delay;
use kernel::utilities::registers::{register_bitfields, LocalRegisterCopy};
use kernel::ErrorCode;

register_bitfields![u32,
    PLL_MODE [
        /// Output enable
        OUTCTRL OFFSET(0) NUMBITS(1) [],
        /// Bypass disable (active low bypass)
        BYPASSNL OFFSET(1) NUMBITS(1) [],
        /// Reset release (active low reset)
        RESET_N OFFSET(2) NUMBITS(1) [],
        /// PLL is controlled by the hardware voting state machine
        VOTE_FSM_ENA OFFSET(20) NUMBITS(1) []
    ],
    PLL_L [
        L OFFSET(0) NUMBITS(10) []
    ],
    PLL_M [
        M OFFSET(0) NUMBITS(19) []
    ],
    PLL_N [
        N OFFSET(0) NUMBITS(19) []
    ]
];

/// Number of times the lock detector is sampled before giving up.
const LOCK_POLL_COUNT: usize = 200;
const LOCK_POLL_DELAY_US: u32 = 1;

/// One supported output rate and the multiplier producing it.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PllFreq {
    /// Output rate in Hz
    pub freq: u64,
    pub l: u32,
    pub m: u32,
    pub n: u32,
    pub ibits: u32,
}

/// Register layout of one PLL instance.
#[derive(Debug)]
pub struct PllRegs {
    pub mode_reg: u32,
    pub l_reg: u32,
    pub m_reg: u32,
    pub n_reg: u32,
    pub config_reg: u32,
    pub status_reg: u32,
    /// Lock detect bit in `status_reg`
    pub status_bit: u32,
    pub post_div_shift: u32,
    /// Width of the post divider field in `config_reg`, 0 if there is none.
    pub post_div_width: u32,
}

/// First entry of `freq_tbl` able to provide at least `rate`.
///
/// The table must be sorted by ascending `freq`.
pub fn find_freq(freq_tbl: &[PllFreq], rate: u64) -> Option<&PllFreq> {
    freq_tbl.iter().find(|f| rate <= f.freq)
}

fn is_running(mode: LocalRegisterCopy<u32, PLL_MODE::Register>) -> bool {
    mode.is_set(PLL_MODE::OUTCTRL) && mode.is_set(PLL_MODE::RESET_N)
}

pub struct ClkPll<'a> {
    regs: &'static PllRegs,
    freq_tbl: &'static [PllFreq],
    init: &'static ClockInitData,
    delay: &'a dyn Delay,
    regmap: Cell<Option<&'a dyn Regmap<u32>>>,
}

impl<'a> ClkPll<'a> {
    pub const fn new(
        regs: &'static PllRegs,
        freq_tbl: &'static [PllFreq],
        init: &'static ClockInitData,
        delay: &'a dyn Delay,
    ) -> ClkPll<'a> {
        ClkPll {
            regs,
            freq_tbl,
            init,
            delay,
            regmap: Cell::new(None),
        }
    }

    /// Give the PLL the register map it lives in. Must be called before the
    /// clock is registered.
    pub fn attach(&self, regmap: &'a dyn Regmap<u32>) {
        self.regmap.set(Some(regmap));
    }

    pub fn freq_tbl(&self) -> &'static [PllFreq] {
        self.freq_tbl
    }

    fn regmap(&self) -> Result<&'a dyn Regmap<u32>, ErrorCode> {
        self.regmap.get().ok_or(ErrorCode::OFF)
    }

    fn wait_for_lock(&self, regmap: &dyn Regmap<u32>) -> Result<(), ErrorCode> {
        let locked = 1u32 << self.regs.status_bit;
        for _ in 0..LOCK_POLL_COUNT {
            if regmap.read(self.regs.status_reg)? & locked != 0 {
                return Ok(());
            }
            self.delay.udelay(LOCK_POLL_DELAY_US);
        }
        debug!("{} didn't enable after voting for it!", self.init.name);
        Err(ErrorCode::FAIL)
    }

    fn power_up(&self, regmap: &dyn Regmap<u32>) -> Result<(), ErrorCode> {
        update_field(regmap, self.regs.mode_reg, PLL_MODE::RESET_N::SET)?;
        self.wait_for_lock(regmap)?;
        update_field(regmap, self.regs.mode_reg, PLL_MODE::OUTCTRL::SET)
    }

    fn power_down(&self, regmap: &dyn Regmap<u32>) -> Result<(), ErrorCode> {
        let mode = read_local::<u32, PLL_MODE::Register>(regmap, self.regs.mode_reg)?;
        if mode.is_set(PLL_MODE::VOTE_FSM_ENA) {
            return Ok(());
        }
        update_field(
            regmap,
            self.regs.mode_reg,
            PLL_MODE::OUTCTRL::CLEAR + PLL_MODE::RESET_N::CLEAR + PLL_MODE::BYPASSNL::CLEAR,
        )
    }

    fn read_rate(&self, regmap: &dyn Regmap<u32>, parent_rate: u64) -> Result<u64, ErrorCode> {
        let l = read_local::<u32, PLL_L::Register>(regmap, self.regs.l_reg)?.read(PLL_L::L);
        let m = read_local::<u32, PLL_M::Register>(regmap, self.regs.m_reg)?.read(PLL_M::M);
        let n = read_local::<u32, PLL_N::Register>(regmap, self.regs.n_reg)?.read(PLL_N::N);

        let mut rate = parent_rate * u64::from(l);
        if n != 0 {
            rate += parent_rate * u64::from(m) / u64::from(n);
        }

        if self.regs.post_div_width != 0 {
            let mask = (1u32 << self.regs.post_div_width) - 1;
            let config = regmap.read(self.regs.config_reg)?;
            let div = (config >> self.regs.post_div_shift) & mask;
            rate /= u64::from(div) + 1;
        }
        Ok(rate)
    }
}

impl ClockHw for ClkPll<'_> {
    fn init_data(&self) -> &'static ClockInitData {
        self.init
    }

    fn enable(&self) -> Result<(), ErrorCode> {
        let regmap = self.regmap()?;
        self.power_up(regmap)
    }

    fn disable(&self) {
        if let Ok(regmap) = self.regmap() {
            if let Err(e) = self.power_down(regmap) {
                debug!("{}: disable failed: {:?}", self.init.name, e);
            }
        }
    }

    fn is_enabled(&self) -> bool {
        self.regmap()
            .and_then(|regmap| read_local::<u32, PLL_MODE::Register>(regmap, self.regs.mode_reg))
            .is_ok_and(is_running)
    }

    /// Returns 0 when the registers cannot be read.
    fn recalc_rate(&self, parent_rate: u64) -> u64 {
        self.regmap()
            .and_then(|regmap| self.read_rate(regmap, parent_rate))
            .unwrap_or(0)
    }

    fn determine_rate(&self, rate: u64, parent_rate: u64) -> u64 {
        match find_freq(self.freq_tbl, rate) {
            Some(f) => f.freq,
            None => self.recalc_rate(parent_rate),
        }
    }

    fn set_rate(&self, rate: u64, _parent_rate: u64) -> Result<(), ErrorCode> {
        let regmap = self.regmap()?;
        let f = find_freq(self.freq_tbl, rate).ok_or(ErrorCode::INVAL)?;

        let enabled = is_running(read_local::<u32, PLL_MODE::Register>(
            regmap,
            self.regs.mode_reg,
        )?);
        if enabled {
            self.power_down(regmap)?;
        }

        update_field(regmap, self.regs.l_reg, PLL_L::L.val(f.l))?;
        update_field(regmap, self.regs.m_reg, PLL_M::M.val(f.m))?;
        update_field(regmap, self.regs.n_reg, PLL_N::N.val(f.n))?;

        if enabled {
            self.power_up(regmap)?;
        }
        Ok(())
    }
}
