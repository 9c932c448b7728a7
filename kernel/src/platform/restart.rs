// Licensed under the Apache License, Version 2.0 or the MIT License.
// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright Tock Contributors 2026.

//! Ordered chain of handlers run when the system goes down.
//!
//! Drivers that must quiesce hardware before a restart, halt or power off
//! register a [`RestartHandler`] with the board's [`RestartChain`]. Handlers
//! run from the highest priority to the lowest; a handler registered at
//! [`PRIORITY_LAST_RESORT`] runs after everyone else.
//!
//! The chain does not allocate. The board provides the slot array:
//!
//! ```rust,ignore
//! let slots: [RestartSlot; 4] = Default::default();
//! let chain = RestartChain::new(&slots);
//! ```

use core::cell::Cell;

use crate::config::CONFIG;
use crate::debug;
use crate::ErrorCode;

/// Handler for drivers that only want to be called if nothing else could.
pub const PRIORITY_LAST_RESORT: i32 = 0;
pub const PRIORITY_DEFAULT: i32 = 128;
pub const PRIORITY_HIGH: i32 = 192;

/// Why the chain is being run.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RestartAction {
    /// Orderly restart
    SysDown,
    SysHalt,
    SysPowerOff,
}

/// What a handler reports back to the chain.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NotifyResult {
    /// Nothing of interest to the handler
    Done,
    /// Handled successfully
    Ok,
    /// Handled; do not run lower priority handlers
    Stop,
    /// Failed; do not run lower priority handlers
    Bad,
}

impl NotifyResult {
    pub fn stops_chain(self) -> bool {
        matches!(self, NotifyResult::Stop | NotifyResult::Bad)
    }
}

pub trait RestartHandler {
    fn restart_notify(&self, action: RestartAction) -> NotifyResult;
}

/// A registered handler and its priority.
#[derive(Clone, Copy)]
pub struct RestartEntry<'a> {
    priority: i32,
    handler: &'a dyn RestartHandler,
}

/// Storage for one chain entry.
pub type RestartSlot<'a> = Cell<Option<RestartEntry<'a>>>;

fn same_handler(a: &dyn RestartHandler, b: &dyn RestartHandler) -> bool {
    // Compare data pointers only, vtables may be duplicated across codegen
    // units.
    core::ptr::addr_eq(a, b)
}

/// Priority-ordered list of restart handlers.
///
/// Slots `0..len` are occupied and sorted by descending priority; handlers
/// with equal priority stay in registration order.
pub struct RestartChain<'a> {
    slots: &'a [RestartSlot<'a>],
}

impl<'a> RestartChain<'a> {
    pub fn new(slots: &'a [RestartSlot<'a>]) -> RestartChain<'a> {
        for slot in slots.iter() {
            slot.set(None);
        }
        RestartChain { slots }
    }

    pub fn len(&self) -> usize {
        self.slots
            .iter()
            .take_while(|slot| slot.get().is_some())
            .count()
    }

    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    fn position(&self, handler: &dyn RestartHandler) -> Option<usize> {
        self.slots.iter().position(|slot| {
            slot.get()
                .is_some_and(|entry| same_handler(entry.handler, handler))
        })
    }

    /// Add `handler` to the chain.
    ///
    /// Fails with `ALREADY` if it is registered and `NOMEM` if the chain is
    /// full.
    pub fn register(&self, priority: i32, handler: &'a dyn RestartHandler) -> Result<(), ErrorCode> {
        if self.position(handler).is_some() {
            return Err(ErrorCode::ALREADY);
        }
        let len = self.len();
        if len == self.capacity() {
            return Err(ErrorCode::NOMEM);
        }

        let index = self.slots[..len]
            .iter()
            .position(|slot| slot.get().is_some_and(|entry| entry.priority < priority))
            .unwrap_or(len);

        for i in (index..len).rev() {
            self.slots[i + 1].set(self.slots[i].get());
        }
        self.slots[index].set(Some(RestartEntry { priority, handler }));
        Ok(())
    }

    /// Remove `handler` from the chain. Fails with `INVAL` if it was never
    /// registered.
    pub fn unregister(&self, handler: &dyn RestartHandler) -> Result<(), ErrorCode> {
        let index = self.position(handler).ok_or(ErrorCode::INVAL)?;
        let len = self.len();
        for i in index..len - 1 {
            self.slots[i].set(self.slots[i + 1].get());
        }
        self.slots[len - 1].set(None);
        Ok(())
    }

    /// Run the handlers in priority order.
    ///
    /// Returns the result of the last handler that ran, or `Done` if the
    /// chain is empty.
    pub fn call_chain(&self, action: RestartAction) -> NotifyResult {
        let mut result = NotifyResult::Done;
        for (i, entry) in self.slots.iter().map_while(|slot| slot.get()).enumerate() {
            result = entry.handler.restart_notify(action);
            if CONFIG.debug_restart_chain {
                debug!(
                    "restart chain: handler {} (priority {}) -> {:?}",
                    i, entry.priority, result
                );
            }
            if result.stops_chain() {
                break;
            }
        }
        result
    }
}
