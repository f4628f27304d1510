//! The ID indexed clock table that is handed to clock consumers

use crate::node::{ClockNode, ParentRef};
use crate::{ClockId, Hertz};
use alloc::collections::{BTreeMap, BTreeSet};
use alloc::vec::Vec;
use regs::RegisterBlock;
use thiserror_no_std::Error;

/// A clock that is provided by the platform and not defined by the clock manager, e.g. an oscillator input
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct RootClock {
    pub name: &'static str,
    pub rate: Hertz,
}

impl RootClock {
    pub const fn new(name: &'static str, rate: Hertz) -> Self {
        Self { name, rate }
    }
}

/// The error returned when the storage of a clock table cannot be allocated
#[derive(Debug, Error, Eq, PartialEq)]
#[error("could not allocate storage for {0} clocks")]
pub struct TableAllocError(pub usize);

/// The error returned when looking up a clock by its id
#[derive(Debug, Error, Copy, Clone, Eq, PartialEq)]
pub enum LookupError {
    /// The id is part of the table but no clock was registered under it
    #[error("no clock is registered with id {0}")]
    NotFound(ClockId),
    /// The id is not part of the table at all
    #[error("clock id {0} is outside of the clock table")]
    OutOfRange(ClockId),
}

/// Errors of operations that act on a clock in the table
#[derive(Debug, Error, Copy, Clone, Eq, PartialEq)]
pub enum ClockError {
    #[error("{0}")]
    Lookup(#[from] LookupError),
    /// The clock has no gate that could be toggled
    #[error("clock {0} cannot be gated")]
    NotGateable(&'static str),
    /// The clock is critical and must not be gated off
    #[error("clock {0} is critical and cannot be disabled")]
    Critical(&'static str),
    /// The clock's source selection points to no known parent
    #[error("clock {0} has no valid parent selected")]
    NoParent(&'static str),
}

/// A fixed size table of clock nodes which are addressed by their [`ClockId`].
///
/// Slots for which no clock was registered stay empty. The table also knows the external root clocks which the
/// registered nodes may derive from and keeps an index of names for resolving parents while clocks get registered.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct ClockTable {
    clocks: Vec<Option<ClockNode>>,
    roots: Vec<RootClock>,
    names: BTreeMap<&'static str, ClockId>,
}

impl ClockTable {
    /// Create an empty table with `len` slots
    pub fn try_new(len: usize, roots: &[RootClock]) -> Result<Self, TableAllocError> {
        let mut clocks = Vec::new();
        clocks.try_reserve_exact(len).map_err(|_| TableAllocError(len))?;
        clocks.resize(len, None);

        let mut root_storage = Vec::new();
        root_storage
            .try_reserve_exact(roots.len())
            .map_err(|_| TableAllocError(len))?;
        root_storage.extend_from_slice(roots);

        Ok(Self {
            clocks,
            roots: root_storage,
            names: BTreeMap::new(),
        })
    }

    /// The number of slots in this table
    pub fn len(&self) -> usize {
        self.clocks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.clocks.is_empty()
    }

    /// The number of slots that hold a clock
    pub fn populated(&self) -> usize {
        self.clocks.iter().filter(|slot| slot.is_some()).count()
    }

    pub fn roots(&self) -> &[RootClock] {
        &self.roots
    }

    /// Get the clock registered under `id`, `None` if the slot is empty or does not exist
    pub fn get(&self, id: ClockId) -> Option<&ClockNode> {
        self.clocks.get(id.index()).and_then(Option::as_ref)
    }

    /// Get the clock registered under `id` and report why it is not available otherwise
    pub fn lookup(&self, id: ClockId) -> Result<&ClockNode, LookupError> {
        match self.clocks.get(id.index()) {
            Some(Some(node)) => Ok(node),
            Some(None) => Err(LookupError::NotFound(id)),
            None => Err(LookupError::OutOfRange(id)),
        }
    }

    /// Find a registered clock by its name
    pub fn find(&self, name: &str) -> Option<&ClockNode> {
        self.names.get(name).and_then(|&id| self.get(id))
    }

    /// Resolve a parent name to either a registered clock or a root clock
    pub fn resolve(&self, name: &str) -> Option<ParentRef> {
        if let Some(node) = self.find(name) {
            return Some(ParentRef::Clock(node.id()));
        }
        self.roots
            .iter()
            .position(|root| root.name == name)
            .map(ParentRef::Root)
    }

    /// Iterate over all registered clocks in id order
    pub fn iter(&self) -> impl Iterator<Item = &ClockNode> + '_ {
        self.clocks.iter().flatten()
    }

    /// Human readable name of a parent reference
    pub fn parent_name(&self, parent: ParentRef) -> Option<&'static str> {
        match parent {
            ParentRef::Clock(id) => self.get(id).map(ClockNode::name),
            ParentRef::Root(index) => self.roots.get(index).map(|root| root.name),
        }
    }

    /// Whether following any candidate parent of `parents` leads back to the clock with id `to`
    pub(crate) fn reaches(&self, parents: &[ParentRef], to: ClockId) -> bool {
        let mut visited = BTreeSet::new();
        let mut pending: Vec<ClockId> = parents
            .iter()
            .filter_map(|parent| match parent {
                ParentRef::Clock(id) => Some(*id),
                ParentRef::Root(_) => None,
            })
            .collect();

        while let Some(id) = pending.pop() {
            if id == to {
                return true;
            }
            if !visited.insert(id) {
                continue;
            }
            if let Some(node) = self.get(id) {
                pending.extend(node.parents().iter().filter_map(|parent| match parent {
                    ParentRef::Clock(id) => Some(*id),
                    ParentRef::Root(_) => None,
                }));
            }
        }
        false
    }

    /// Put `node` into its slot, returning the clock it replaced.
    ///
    /// The caller ensures the id lies inside the table.
    pub(crate) fn insert(&mut self, node: ClockNode) -> Option<ClockNode> {
        let id = node.id();
        let name = node.name();
        let old = self.clocks[id.index()].replace(node);
        if let Some(old) = &old {
            if self.names.get(old.name()) == Some(&id) {
                self.names.remove(old.name());
            }
        }
        self.names.insert(name, id);
        old
    }

    /// The current rate of the clock registered under `id`.
    ///
    /// The rate is computed by walking up the active parents until a root clock is reached.
    pub fn rate<R: RegisterBlock + ?Sized>(&self, id: ClockId, regs: &R) -> Result<Hertz, ClockError> {
        let node = self.lookup(id)?;
        let parent_rate = match node.parent().ok_or(ClockError::NoParent(node.name()))? {
            ParentRef::Root(index) => self.roots[index].rate,
            ParentRef::Clock(parent) => self.rate(parent, regs)?,
        };
        Ok(node.recalc_rate(parent_rate, regs))
    }

    /// Whether the clock registered under `id` is running
    pub fn is_enabled<R: RegisterBlock + ?Sized>(&self, id: ClockId, regs: &R) -> Result<bool, ClockError> {
        Ok(self.lookup(id)?.is_enabled(regs))
    }

    /// Open the gate of the clock registered under `id`
    pub fn enable<R: RegisterBlock + ?Sized>(&self, id: ClockId, regs: &R) -> Result<(), ClockError> {
        let node = self.lookup(id)?;
        let gate = node.gate().ok_or(ClockError::NotGateable(node.name()))?;
        regs.write_field(gate, 1);
        Ok(())
    }

    /// Close the gate of the clock registered under `id`.
    ///
    /// Critical clocks are never gated off.
    pub fn disable<R: RegisterBlock + ?Sized>(&self, id: ClockId, regs: &R) -> Result<(), ClockError> {
        let node = self.lookup(id)?;
        if node.is_critical() {
            return Err(ClockError::Critical(node.name()));
        }
        let gate = node.gate().ok_or(ClockError::NotGateable(node.name()))?;
        regs.write_field(gate, 0);
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::descriptor::{ClockDescriptor, ClockFlags, GateClock, Parents, PllClock};
    use crate::node::Flavor;
    use regs::{Field, ShadowBlock};

    const ROOTS: &[RootClock] = &[RootClock::new("osc1", Hertz::from_mhz(25))];

    fn populated(regs: &ShadowBlock) -> ClockTable {
        let mut table = ClockTable::try_new(8, ROOTS).unwrap();
        let descriptors: [ClockDescriptor; 3] = [
            PllClock::new(ClockId(1), "main_pll", Parents::Fixed("osc1"), 0x48).into(),
            GateClock::new(ClockId(2), "l4_sp_clk", Parents::Fixed("main_pll"), 0x24, 3)
                .flags(ClockFlags::CRITICAL)
                .divider(0x44, 16, 2)
                .into(),
            GateClock::new(ClockId(3), "usb_clk", Parents::Fixed("l4_sp_clk"), 0x7c, 8).into(),
        ];
        for desc in &descriptors {
            let node = ClockNode::build(desc, Flavor::Agilex, &table, regs).unwrap();
            table.insert(node);
        }
        table
    }

    #[test]
    fn unallocatable_tables_are_reported() {
        assert_eq!(ClockTable::try_new(usize::MAX, ROOTS), Err(TableAllocError(usize::MAX)));
    }

    #[test]
    fn empty_slots_are_reported_as_not_found() {
        let regs = ShadowBlock::new(0x100);
        let table = populated(&regs);
        assert_eq!(table.len(), 8);
        assert_eq!(table.populated(), 3);
        assert!(table.get(ClockId(0)).is_none());
        assert_eq!(table.lookup(ClockId(0)), Err(LookupError::NotFound(ClockId(0))));
        assert_eq!(table.lookup(ClockId(8)), Err(LookupError::OutOfRange(ClockId(8))));
        assert_eq!(table.lookup(ClockId(3)).map(ClockNode::name), Ok("usb_clk"));
    }

    #[test]
    fn names_resolve_to_nodes_before_roots() {
        let regs = ShadowBlock::new(0x100);
        let table = populated(&regs);
        assert_eq!(table.resolve("main_pll"), Some(ParentRef::Clock(ClockId(1))));
        assert_eq!(table.resolve("osc1"), Some(ParentRef::Root(0)));
        assert_eq!(table.resolve("f2s-free-clk"), None);
        assert_eq!(table.parent_name(ParentRef::Root(0)), Some("osc1"));
    }

    #[test]
    fn rate_walks_up_to_the_root() {
        let regs = ShadowBlock::new(0x100)
            .with_field(Field::new(0x48, 8, 6), 1)
            .with_field(Field::new(0x4c, 0, 10), 40)
            .with_field(Field::new(0x44, 16, 2), 3);
        let table = populated(&regs);
        assert_eq!(table.rate(ClockId(1), &regs), Ok(Hertz::from_mhz(1000)));
        assert_eq!(table.rate(ClockId(3), &regs), Ok(Hertz::from_mhz(250)));
        assert_eq!(
            table.rate(ClockId(5), &regs),
            Err(ClockError::Lookup(LookupError::NotFound(ClockId(5))))
        );
    }

    #[test]
    fn critical_clocks_are_never_gated_off() {
        let regs = ShadowBlock::new(0x100).with_field(Field::bit(0x24, 3), 1);
        let table = populated(&regs);
        assert_eq!(table.disable(ClockId(2), &regs), Err(ClockError::Critical("l4_sp_clk")));
        assert_eq!(table.is_enabled(ClockId(2), &regs), Ok(true));
    }

    #[test]
    fn gates_toggle_their_enable_bit() {
        let regs = ShadowBlock::new(0x100);
        let table = populated(&regs);
        assert_eq!(table.is_enabled(ClockId(3), &regs), Ok(false));
        table.enable(ClockId(3), &regs).unwrap();
        assert_eq!(regs.read(0x7c), 1 << 8);
        table.disable(ClockId(3), &regs).unwrap();
        assert_eq!(regs.read(0x7c), 0);
        assert_eq!(table.enable(ClockId(1), &regs), Err(ClockError::NotGateable("main_pll")));
    }

    #[test]
    fn replacing_a_clock_updates_the_name_index() {
        let regs = ShadowBlock::new(0x100);
        let mut table = populated(&regs);
        let desc: ClockDescriptor = GateClock::new(ClockId(3), "spi_m_clk", Parents::Fixed("osc1"), 0x7c, 9).into();
        let node = ClockNode::build(&desc, Flavor::Agilex, &table, &regs).unwrap();
        let old = table.insert(node);
        assert_eq!(old.map(|old| old.name()), Some("usb_clk"));
        assert!(table.find("usb_clk").is_none());
        assert_eq!(table.find("spi_m_clk").map(ClockNode::id), Some(ClockId(3)));
    }
}
