// Licensed under the Apache License, Version 2.0 or the MIT License.
// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright Tock Contributors 2026.

//! Utility re-exports provided by the kernel crate.

/// The Tock Register Interface.
///
/// This is a re-export of the `tock-register-interface` crate provided for
/// convenience. Drivers behind a register map use the bitfield definitions
/// and `LocalRegisterCopy`; the MMIO register types are not needed.
pub mod registers {
    pub use tock_registers::fields::{Field, FieldValue};
    pub use tock_registers::register_bitfields;
    pub use tock_registers::{LocalRegisterCopy, RegisterLongName, UIntLike};
}
