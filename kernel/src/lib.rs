// Licensed under the Apache License, Version 2.0 or the MIT License.
// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright Tock Contributors 2026.

//! Core kernel support for platform drivers.
//!
//! The kernel crate holds the Hardware Interface Layer (HIL) definitions the
//! chip drivers implement, plus the host-side pieces they are bound to: the
//! platform device description handed to probe routines, the restart chain
//! and the watchdog entry point.

#![warn(unreachable_pub)]
#![no_std]

pub mod debug;
pub mod errorcode;
pub mod hil;
pub mod platform;
pub mod utilities;
pub mod watchdog;

mod config;

pub use errorcode::ErrorCode;
