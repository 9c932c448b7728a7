// Licensed under the Apache License, Version 2.0 or the MIT License.
// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright Tock Contributors 2026.

//! MSM8916 A53 CPU cluster PLL.
//!
//! An SR2 PLL fed by the 19.2 MHz XO. It clocks the CPUs, so it is
//! registered as critical and never gated.

use kernel::debug;
use kernel::hil::clock::{ClockFlags, ClockInitData, ClockProvider};
use kernel::hil::regmap::{Endian, RegmapConfig};
use kernel::hil::time::Delay;
use kernel::platform::device::{OfDeviceId, PlatformDevice};
use kernel::ErrorCode;

use crate::clk_pll::{ClkPll, PllFreq, PllRegs};

pub const DRIVER_NAME: &str = "qcom-a53pll";

pub static OF_MATCH_TABLE: [OfDeviceId; 1] = [OfDeviceId {
    compatible: "qcom,a53pll-msm8916",
}];

pub static A53PLL_FREQ: [PllFreq; 5] = [
    PllFreq {
        freq: 998_400_000,
        l: 52,
        m: 0x0,
        n: 0x1,
        ibits: 0,
    },
    PllFreq {
        freq: 1_094_400_000,
        l: 57,
        m: 0x0,
        n: 0x1,
        ibits: 0,
    },
    PllFreq {
        freq: 1_152_000_000,
        l: 62,
        m: 0x0,
        n: 0x1,
        ibits: 0,
    },
    PllFreq {
        freq: 1_209_600_000,
        l: 65,
        m: 0x0,
        n: 0x1,
        ibits: 0,
    },
    PllFreq {
        freq: 1_401_600_000,
        l: 73,
        m: 0x0,
        n: 0x1,
        ibits: 0,
    },
];

static A53PLL_REGS: PllRegs = PllRegs {
    mode_reg: 0x00,
    l_reg: 0x04,
    m_reg: 0x08,
    n_reg: 0x0c,
    config_reg: 0x14,
    status_reg: 0x1c,
    status_bit: 16,
    post_div_shift: 0,
    post_div_width: 0,
};

pub const A53PLL_REGMAP_CONFIG: RegmapConfig = RegmapConfig {
    reg_bits: 32,
    reg_stride: 4,
    val_bits: 32,
    max_register: 0x40,
    fast_io: true,
    val_format_endian: Endian::Little,
};

static A53PLL_INIT: ClockInitData = ClockInitData {
    name: "a53pll",
    parent_names: &["xo"],
    flags: ClockFlags::IS_CRITICAL,
};

pub struct A53Pll<'a> {
    pll: ClkPll<'a>,
}

impl<'a> A53Pll<'a> {
    pub fn new(delay: &'a dyn Delay) -> A53Pll<'a> {
        A53Pll {
            pll: ClkPll::new(&A53PLL_REGS, &A53PLL_FREQ, &A53PLL_INIT, delay),
        }
    }

    /// Map the PLL registers of `pdev` and hand the clock to `provider`.
    pub fn probe(
        &'a self,
        pdev: &PlatformDevice<'a>,
        provider: &dyn ClockProvider<'a>,
    ) -> Result<(), ErrorCode> {
        let regmap = pdev.mmio_regmap(&A53PLL_REGMAP_CONFIG)?;
        self.pll.attach(regmap);
        provider.register_clock(&self.pll).map_err(|e| {
            debug!("{}: failed to register clock: {:?}", pdev.name(), e);
            e
        })
    }

    pub fn pll(&self) -> &ClkPll<'a> {
        &self.pll
    }
}
