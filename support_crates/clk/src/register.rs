//! Registration of descriptor batches into a clock table
//!
//! A failing clock never aborts a batch. It is logged, recorded in the [`Registration`] report and its slot in the
//! table stays empty so that every clock not depending on it still becomes available.

use crate::descriptor::ClockDescriptor;
use crate::node::{ClockNode, Flavor};
use crate::table::ClockTable;
use crate::ClockId;
use alloc::vec::Vec;
use regs::RegisterBlock;
use thiserror_no_std::Error;

/// Reasons why a single clock could not be registered
#[derive(Debug, Error, Copy, Clone, Eq, PartialEq)]
pub enum RegisterError {
    #[error("parent {parent} of clock {clock} is neither a registered clock nor a root clock")]
    ParentUnresolved {
        clock: &'static str,
        parent: &'static str,
    },
    #[error("the registers of clock {clock} do not fit into 32-bit words")]
    InvalidGeometry { clock: &'static str },
    #[error("clock {clock} would (indirectly) derive from itself")]
    CyclicDependency { clock: &'static str },
    #[error("clock {clock} has id {id} but the clock table only holds {len} clocks")]
    IdOutOfRange {
        clock: &'static str,
        id: ClockId,
        len: usize,
    },
}

/// Descriptors of one kind which are registered together using the constructors of `flavor`
#[derive(Debug, Copy, Clone)]
pub struct Batch<'a> {
    pub name: &'static str,
    pub flavor: Flavor,
    pub clocks: &'a [ClockDescriptor],
}

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct RegistrationFailure {
    pub name: &'static str,
    pub id: ClockId,
    pub error: RegisterError,
}

/// Outcome of registering one or more batches
#[derive(Debug, Clone, Default, Eq, PartialEq)]
pub struct Registration {
    pub registered: usize,
    pub failures: Vec<RegistrationFailure>,
}

impl Registration {
    /// Whether every clock could be registered
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }

    pub fn merge(&mut self, other: Registration) {
        self.registered += other.registered;
        self.failures.extend(other.failures);
    }

    /// The failure recorded for the clock called `name`, if any
    pub fn failure(&self, name: &str) -> Option<&RegistrationFailure> {
        self.failures.iter().find(|failure| failure.name == name)
    }
}

/// Build the clock described by `desc` and publish it in its slot of `table`.
///
/// Every parent of the clock must already be present in `table`, either as a registered clock or as a root.
pub fn register_clock<R: RegisterBlock + ?Sized>(
    table: &mut ClockTable,
    desc: &ClockDescriptor,
    flavor: Flavor,
    regs: &R,
) -> Result<ClockId, RegisterError> {
    let id = desc.id();
    if id.index() >= table.len() {
        return Err(RegisterError::IdOutOfRange {
            clock: desc.name(),
            id,
            len: table.len(),
        });
    }

    let node = ClockNode::build(desc, flavor, table, regs)?;
    if table.reaches(node.parents(), id) {
        return Err(RegisterError::CyclicDependency { clock: desc.name() });
    }

    match node.parent().and_then(|parent| table.parent_name(parent)) {
        Some(parent) => log::debug!("registered clock {} (id {}) from {}", node.name(), id, parent),
        None => log::debug!(
            "registered clock {} (id {}) with unknown source {}",
            node.name(),
            id,
            node.parent_index()
        ),
    }

    if let Some(old) = table.insert(node) {
        log::warn!("clock {} replaced clock {} with id {}", desc.name(), old.name(), id);
    }
    Ok(id)
}

/// Register every clock of `batch` in order.
///
/// Clocks that fail are logged and skipped.
pub fn register_batch<R: RegisterBlock + ?Sized>(
    table: &mut ClockTable,
    batch: &Batch<'_>,
    regs: &R,
) -> Registration {
    let mut report = Registration::default();
    for desc in batch.clocks {
        match register_clock(table, desc, batch.flavor, regs) {
            Ok(_) => report.registered += 1,
            Err(error) => {
                log::error!("{}: failed to register clock {}: {}", batch.name, desc.name(), error);
                report.failures.push(RegistrationFailure {
                    name: desc.name(),
                    id: desc.id(),
                    error,
                });
            }
        }
    }
    report
}

/// Register all `batches` in the given order, which must list parents before their children
pub fn register_batches<R: RegisterBlock + ?Sized>(
    table: &mut ClockTable,
    batches: &[Batch<'_>],
    regs: &R,
) -> Registration {
    let mut report = Registration::default();
    for batch in batches {
        report.merge(register_batch(table, batch, regs));
    }
    report
}
