//! Driver for the clock manager of Intel Agilex and eASIC N5X SoCs
//!
//! The clock manager provides PLLs, PLL output counters, free running counter clocks and gated peripheral clocks.
//! [`probe`] selects the descriptor tables matching a device's compatible string and registers them into a
//! [`ClockTable`](clk::ClockTable) which consumers index by the ids in [`bindings`].
#![no_std]

extern crate alloc;

pub mod bindings;
mod probe;
pub mod tables;

pub use probe::{probe, ClkMgrDevice, ClockManager, ProbeError, Variant, VARIANTS};
