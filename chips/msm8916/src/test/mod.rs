// Licensed under the Apache License, Version 2.0 or the MIT License.
// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright Tock Contributors 2026.

//! Fake hardware for the driver unit tests.
//!
//! [`FakeBus`] stands in for both the register map and the delay source, so
//! register accesses and settle waits land in a single ordered log the tests
//! can inspect.

extern crate std;

use core::cell::{Cell, RefCell};
use std::collections::BTreeMap;
use std::vec::Vec;

use kernel::hil::regmap::Regmap;
use kernel::hil::time::Delay;
use kernel::utilities::registers::UIntLike;
use kernel::ErrorCode;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Event<T> {
    Read(u32),
    Write(u32, T),
    Update { reg: u32, mask: T, value: T },
    Delay { min_us: u32, max_us: u32 },
}

impl<T> Event<T> {
    pub(crate) fn is_access(&self) -> bool {
        matches!(self, Event::Write(..) | Event::Update { .. })
    }
}

pub(crate) struct FakeBus<T: UIntLike> {
    regs: RefCell<BTreeMap<u32, T>>,
    events: RefCell<Vec<Event<T>>>,
    fail_reg: Cell<Option<u32>>,
}

impl<T: UIntLike> FakeBus<T> {
    pub(crate) fn new() -> FakeBus<T> {
        FakeBus {
            regs: RefCell::new(BTreeMap::new()),
            events: RefCell::new(Vec::new()),
            fail_reg: Cell::new(None),
        }
    }

    /// Preload a register without logging anything.
    pub(crate) fn set(&self, reg: u32, value: T) {
        self.regs.borrow_mut().insert(reg, value);
    }

    pub(crate) fn get(&self, reg: u32) -> T {
        self.regs.borrow().get(&reg).copied().unwrap_or(T::zero())
    }

    /// Make every access to `reg` fail with `FAIL`.
    pub(crate) fn fail_on(&self, reg: Option<u32>) {
        self.fail_reg.set(reg);
    }

    pub(crate) fn events(&self) -> Vec<Event<T>> {
        self.events.borrow().clone()
    }

    /// Writes, updates and delays, without the reads.
    pub(crate) fn ops(&self) -> Vec<Event<T>> {
        self.events
            .borrow()
            .iter()
            .filter(|e| !matches!(e, Event::Read(_)))
            .copied()
            .collect()
    }

    pub(crate) fn clear_events(&self) {
        self.events.borrow_mut().clear();
    }

    fn check(&self, reg: u32) -> Result<(), ErrorCode> {
        if self.fail_reg.get() == Some(reg) {
            Err(ErrorCode::FAIL)
        } else {
            Ok(())
        }
    }
}

impl<T: UIntLike> Regmap<T> for FakeBus<T> {
    fn read(&self, reg: u32) -> Result<T, ErrorCode> {
        self.events.borrow_mut().push(Event::Read(reg));
        self.check(reg)?;
        Ok(self.get(reg))
    }

    fn write(&self, reg: u32, value: T) -> Result<(), ErrorCode> {
        self.events.borrow_mut().push(Event::Write(reg, value));
        self.check(reg)?;
        self.set(reg, value);
        Ok(())
    }

    // Log every update, even one that would leave the register unchanged,
    // so tests see what the driver asked for.
    fn update_bits(&self, reg: u32, mask: T, value: T) -> Result<(), ErrorCode> {
        self.events
            .borrow_mut()
            .push(Event::Update { reg, mask, value });
        self.check(reg)?;
        let old = self.get(reg);
        self.set(reg, (old & !mask) | (value & mask));
        Ok(())
    }
}

impl<T: UIntLike> Delay for FakeBus<T> {
    fn udelay(&self, us: u32) {
        self.events.borrow_mut().push(Event::Delay {
            min_us: us,
            max_us: us,
        });
    }

    fn usleep_range(&self, min_us: u32, max_us: u32) {
        self.events
            .borrow_mut()
            .push(Event::Delay { min_us, max_us });
    }
}
