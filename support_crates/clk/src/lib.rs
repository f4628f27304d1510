//! Clock tree model and registration engine for SoC clock managers
//!
//! A clock manager provides a fixed set of clocks which are described by static [descriptors](descriptor).
//! Registering those descriptors in dependency order (parents before children) builds [`ClockNode`]s whose
//! parents are resolved by name and whose active source is read from the hardware.
//! The resulting [`ClockTable`] is indexed by [`ClockId`] and is what clock consumers use.
#![no_std]

extern crate alloc;

use core::fmt;

pub mod descriptor;
mod hertz;
mod node;
mod register;
mod table;

pub use descriptor::{ClockDescriptor, ClockFlags};
pub use hertz::Hertz;
pub use node::{ClockNode, Divider, Flavor, NodeKind, ParentRef, PllKind, Selector};
pub use register::{
    register_batch, register_batches, register_clock, Batch, RegisterError, Registration, RegistrationFailure,
};
pub use table::{ClockError, ClockTable, LookupError, RootClock, TableAllocError};

/// The identity of a clock inside a clock table
#[derive(Debug, Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct ClockId(pub u32);

impl ClockId {
    /// Slot of this clock in a clock table
    pub const fn index(&self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for ClockId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}
