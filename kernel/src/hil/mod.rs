// Licensed under the Apache License, Version 2.0 or the MIT License.
// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright Tock Contributors 2026.

//! Public traits for interfaces between drivers and the host frameworks.

pub mod clock;
pub mod regmap;
pub mod time;
pub mod watchdog;
