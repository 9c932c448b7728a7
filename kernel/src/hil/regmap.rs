// Licensed under the Apache License, Version 2.0 or the MIT License.
// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright Tock Contributors 2026.

//! Interface for register maps that are not directly memory mapped.
//!
//! A register map is a window of registers reached through a bus (for example
//! the SPMI link to a PMIC) or through an MMIO block the host mapped on the
//! driver's behalf. Drivers only see register addresses and values of the
//! width `T`; how the access reaches the hardware is the host's business.
//!
//! Field layouts are still described with `tock_registers` bitfields. A
//! `FieldValue` is turned into a `(mask, value)` pair and handed to
//! [`Regmap::update_bits`] by [`update_field`]:
//!
//! ```rust,ignore
//! register_bitfields![u8,
//!     CTL2 [
//!         RESET_EN OFFSET(7) NUMBITS(1) []
//!     ]
//! ];
//!
//! update_field(regmap, base + 0x57, CTL2::RESET_EN::SET)?;
//! ```

use tock_registers::fields::FieldValue;
use tock_registers::{RegisterLongName, UIntLike};

use crate::config::CONFIG;
use crate::debug;
use crate::ErrorCode;

/// Register-granular access to a device.
pub trait Regmap<T: UIntLike> {
    /// Read the register at `reg`.
    fn read(&self, reg: u32) -> Result<T, ErrorCode>;

    /// Write `value` to the register at `reg`.
    fn write(&self, reg: u32, value: T) -> Result<(), ErrorCode>;

    /// Read-modify-write the bits selected by `mask`.
    ///
    /// The default implementation skips the write when the register already
    /// holds the requested bits.
    fn update_bits(&self, reg: u32, mask: T, value: T) -> Result<(), ErrorCode> {
        let old = self.read(reg)?;
        let new = (old & !mask) | (value & mask);
        if new != old {
            self.write(reg, new)
        } else {
            Ok(())
        }
    }
}

/// Endianness of register values on the bus.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Endian {
    Little,
    Big,
    Native,
}

/// Description of a register map a driver asks the host to create.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RegmapConfig {
    /// Width of a register address, in bits.
    pub reg_bits: u8,
    /// Distance between consecutive register addresses, in bytes.
    pub reg_stride: u32,
    /// Width of a register value, in bits.
    pub val_bits: u8,
    /// Highest valid register address.
    pub max_register: u32,
    /// Accesses never sleep, so the map can be used from atomic context.
    pub fast_io: bool,
    pub val_format_endian: Endian,
}

impl RegmapConfig {
    /// Number of bytes of address space the map covers.
    pub const fn span(&self) -> u32 {
        self.max_register + self.reg_stride
    }

    /// Whether `reg` is addressable through this map.
    pub const fn is_valid_register(&self, reg: u32) -> bool {
        reg <= self.max_register && (self.reg_stride == 0 || reg % self.reg_stride == 0)
    }
}

/// Apply a `tock_registers` field value to the register at `reg`.
pub fn update_field<T: UIntLike, R: RegisterLongName>(
    regmap: &dyn Regmap<T>,
    reg: u32,
    field: FieldValue<T, R>,
) -> Result<(), ErrorCode> {
    if CONFIG.trace_regmap {
        debug!(
            "regmap: update {:#x} mask={:?} value={:?}",
            reg,
            field.mask(),
            field.value
        );
    }
    regmap.update_bits(reg, field.mask(), field.value)
}

/// Read the register at `reg` and return it as a typed local copy.
pub fn read_local<T: UIntLike, R: RegisterLongName>(
    regmap: &dyn Regmap<T>,
    reg: u32,
) -> Result<tock_registers::LocalRegisterCopy<T, R>, ErrorCode> {
    regmap
        .read(reg)
        .map(tock_registers::LocalRegisterCopy::new)
}

#[cfg(test)]
mod test {
    use super::{read_local, update_field, Regmap, RegmapConfig};
    use crate::ErrorCode;
    use core::cell::Cell;
    use tock_registers::register_bitfields;

    register_bitfields![u8,
        CTL [
            TYPE OFFSET(0) NUMBITS(4) [],
            ENABLE OFFSET(7) NUMBITS(1) []
        ]
    ];

    struct OneReg {
        value: Cell<u8>,
        writes: Cell<usize>,
    }

    impl Regmap<u8> for OneReg {
        fn read(&self, reg: u32) -> Result<u8, ErrorCode> {
            if reg == 0x10 {
                Ok(self.value.get())
            } else {
                Err(ErrorCode::FAIL)
            }
        }

        fn write(&self, reg: u32, value: u8) -> Result<(), ErrorCode> {
            if reg != 0x10 {
                return Err(ErrorCode::FAIL);
            }
            self.writes.set(self.writes.get() + 1);
            self.value.set(value);
            Ok(())
        }
    }

    #[test]
    fn update_bits_preserves_other_bits() {
        let reg = OneReg {
            value: Cell::new(0x30),
            writes: Cell::new(0),
        };
        update_field(&reg, 0x10, CTL::TYPE.val(0x1)).unwrap();
        assert_eq!(reg.value.get(), 0x31);
        update_field(&reg, 0x10, CTL::ENABLE::SET).unwrap();
        assert_eq!(reg.value.get(), 0xb1);
        assert_eq!(reg.writes.get(), 2);

        let local = read_local::<u8, CTL::Register>(&reg, 0x10).unwrap();
        assert!(local.is_set(CTL::ENABLE));
        assert_eq!(local.read(CTL::TYPE), 0x1);
    }

    #[test]
    fn update_bits_skips_unchanged_write() {
        let reg = OneReg {
            value: Cell::new(0x80),
            writes: Cell::new(0),
        };
        update_field(&reg, 0x10, CTL::ENABLE::SET).unwrap();
        assert_eq!(reg.writes.get(), 0);
    }

    #[test]
    fn update_bits_propagates_read_failure() {
        let reg = OneReg {
            value: Cell::new(0),
            writes: Cell::new(0),
        };
        assert_eq!(
            update_field(&reg, 0x11, CTL::ENABLE::SET),
            Err(ErrorCode::FAIL)
        );
    }

    #[test]
    fn config_register_validity() {
        let config = RegmapConfig {
            reg_bits: 32,
            reg_stride: 4,
            val_bits: 32,
            max_register: 0x40,
            fast_io: true,
            val_format_endian: super::Endian::Little,
        };
        assert!(config.is_valid_register(0x1c));
        assert!(!config.is_valid_register(0x1e));
        assert!(!config.is_valid_register(0x44));
        assert_eq!(config.span(), 0x44);
    }
}
