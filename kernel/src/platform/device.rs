// Licensed under the Apache License, Version 2.0 or the MIT License.
// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright Tock Contributors 2026.

//! Description of a platform device handed to a driver's probe routine.
//!
//! The board builds these from its hardware description (usually a flattened
//! devicetree it already parsed). Drivers only look properties up; they never
//! parse anything themselves.

use crate::hil::regmap::{Regmap, RegmapConfig};
use crate::ErrorCode;

/// Value of a single device node property.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PropertyValue<'a> {
    /// Boolean property, present without a value
    Empty,
    U32(u32),
    Str(&'a str),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Property<'a> {
    pub name: &'a str,
    pub value: PropertyValue<'a>,
}

/// Hardware description of one device.
#[derive(Debug)]
pub struct DeviceNode<'a> {
    pub compatible: &'a str,
    pub properties: &'a [Property<'a>],
}

impl<'a> DeviceNode<'a> {
    pub fn property(&self, name: &str) -> Option<PropertyValue<'a>> {
        self.properties
            .iter()
            .find(|prop| prop.name == name)
            .map(|prop| prop.value)
    }

    /// Read a property holding a single 32-bit cell.
    ///
    /// Fails with `INVAL` when the property is absent or holds something
    /// other than a number.
    pub fn read_u32(&self, name: &str) -> Result<u32, ErrorCode> {
        match self.property(name) {
            Some(PropertyValue::U32(value)) => Ok(value),
            _ => Err(ErrorCode::INVAL),
        }
    }

    pub fn is_compatible(&self, compatible: &str) -> bool {
        self.compatible == compatible
    }
}

/// Physical memory window owned by a device.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MemResource {
    pub start: usize,
    pub size: usize,
}

/// Everything a driver may ask the platform for during probe.
pub struct PlatformDevice<'a> {
    name: &'static str,
    of_node: Option<&'a DeviceNode<'a>>,
    parent_regmap: Option<&'a dyn Regmap<u8>>,
    mem: Option<MemResource>,
    mem_regmap: Option<&'a dyn Regmap<u32>>,
}

impl<'a> PlatformDevice<'a> {
    pub const fn new(name: &'static str) -> PlatformDevice<'a> {
        PlatformDevice {
            name,
            of_node: None,
            parent_regmap: None,
            mem: None,
            mem_regmap: None,
        }
    }

    pub fn with_of_node(mut self, node: &'a DeviceNode<'a>) -> Self {
        self.of_node = Some(node);
        self
    }

    /// Register map of the parent device, for children of a bus device such
    /// as a PMIC.
    pub fn with_parent_regmap(mut self, regmap: &'a dyn Regmap<u8>) -> Self {
        self.parent_regmap = Some(regmap);
        self
    }

    /// Memory window of the device and the register map the board built
    /// over it.
    pub fn with_mem(mut self, mem: MemResource, regmap: &'a dyn Regmap<u32>) -> Self {
        self.mem = Some(mem);
        self.mem_regmap = Some(regmap);
        self
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn of_node(&self) -> Option<&'a DeviceNode<'a>> {
        self.of_node
    }

    pub fn parent_regmap(&self) -> Option<&'a dyn Regmap<u8>> {
        self.parent_regmap
    }

    /// Register map over the device's memory window, checked against the
    /// layout the driver expects.
    ///
    /// Fails with `NODEVICE` if the device has no memory window, `SIZE` if
    /// the window is smaller than `config` covers and `INVAL` if `config`
    /// does not describe a 32-bit map.
    pub fn mmio_regmap(&self, config: &RegmapConfig) -> Result<&'a dyn Regmap<u32>, ErrorCode> {
        let mem = self.mem.ok_or(ErrorCode::NODEVICE)?;
        let regmap = self.mem_regmap.ok_or(ErrorCode::NODEVICE)?;
        if config.val_bits != 32 || config.reg_bits != 32 {
            return Err(ErrorCode::INVAL);
        }
        if (mem.size as u64) < config.span() as u64 {
            return Err(ErrorCode::SIZE);
        }
        Ok(regmap)
    }
}

/// One entry of a driver's device-match table.
#[derive(Debug, PartialEq, Eq)]
pub struct OfDeviceId {
    pub compatible: &'static str,
}

/// Find the entry of `table` matching `dev`'s device node.
pub fn of_match_device<'t>(table: &'t [OfDeviceId], dev: &PlatformDevice) -> Option<&'t OfDeviceId> {
    let node = dev.of_node()?;
    table.iter().find(|id| node.is_compatible(id.compatible))
}
