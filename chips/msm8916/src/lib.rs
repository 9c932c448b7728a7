// Licensed under the Apache License, Version 2.0 or the MIT License.
// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright Tock Contributors 2026.

//! Peripheral implementations for the Qualcomm MSM8916 SoC.

#![no_std]

pub mod a53pll;
pub mod clk_pll;
pub mod pm8916_wdt;

#[cfg(test)]
mod test;
