//! Static descriptions of the clock nodes a clock manager provides
//!
//! Descriptors are plain data that is compiled into the driver. Every kind of clock node has its own descriptor type
//! which only carries the register geometry relevant to that kind. [`ClockDescriptor`] ties them together so that
//! a batch of clocks can be registered by pattern matching over the kind.

use crate::ClockId;
use bitflags::bitflags;
use core::slice;
use regs::Field;

bitflags! {
    /// Flags that are carried from a descriptor onto the registered clock node
    #[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
    pub struct ClockFlags: u32 {
        /// The clock feeds something that must keep running and must never be gated off
        const CRITICAL = 1 << 0;
    }
}

/// The parents a clock can be derived from
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum Parents {
    /// The clock always derives from exactly this parent
    Fixed(&'static str),
    /// The clock derives from one of these candidates, chosen by hardware configuration.
    /// The order of the list corresponds to the values of the selecting register field.
    Mux(&'static [&'static str]),
}

impl Parents {
    /// All candidate parent names in selector order
    pub fn names(&self) -> &[&'static str] {
        match self {
            Parents::Fixed(name) => slice::from_ref(name),
            Parents::Mux(names) => names,
        }
    }

    pub fn len(&self) -> usize {
        self.names().len()
    }

    pub fn is_empty(&self) -> bool {
        self.names().is_empty()
    }
}

/// Which bit of a bypass register controls a clock
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum BypassBit {
    /// Always the bit at this position
    Fixed(u8),
    /// The bit at `base + index of the primary mux selection`.
    ///
    /// Used where every primary source has its own bypass bit in a shared register.
    PerParent(u8),
}

/// An override bit which, when set, routes the parent at index `source` directly to the clock
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct Bypass {
    pub offset: usize,
    pub bit: BypassBit,
    pub source: u8,
}

impl Bypass {
    pub const fn new(offset: usize, shift: u8, source: u8) -> Self {
        Self {
            offset,
            bit: BypassBit::Fixed(shift),
            source,
        }
    }

    pub const fn per_parent(offset: usize, base_shift: u8, source: u8) -> Self {
        Self {
            offset,
            bit: BypassBit::PerParent(base_shift),
            source,
        }
    }

    /// The bit that is examined when the primary mux currently selects `primary`.
    ///
    /// Returns `None` if that bit does not exist in a 32-bit register.
    pub fn field_for(&self, primary: u32) -> Option<Field> {
        let shift = match self.bit {
            BypassBit::Fixed(shift) => shift as u32,
            BypassBit::PerParent(base) => (base as u32).checked_add(primary)?,
        };
        (shift < 32).then(|| Field::bit(self.offset, shift as u8))
    }
}

/// A PLL whose reference is selected from the root mux.
///
/// `offset` addresses the PLL's global control register which also carries the source select field.
/// A PLL at offset 0 is the boot clock which is selected through the clock manager control register.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct PllClock {
    pub id: ClockId,
    pub name: &'static str,
    pub parents: Parents,
    pub flags: ClockFlags,
    pub offset: usize,
}

/// A PLL output counter ("C clock") which divides a fixed parent by a field of a counter register
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct PeriphCClock {
    pub id: ClockId,
    pub name: &'static str,
    pub parent: &'static str,
    pub flags: ClockFlags,
    pub offset: usize,
    /// Position of the divider field in the counter register, only relevant where counters share a register word
    pub shift: u8,
}

/// A free running counter clock
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct CntPeriphClock {
    pub id: ClockId,
    pub name: &'static str,
    pub parents: Parents,
    pub flags: ClockFlags,
    /// Counter register holding both the divider and the source select field
    pub offset: Option<usize>,
    pub fixed_divider: Option<u32>,
    pub bypass: Option<Bypass>,
}

/// A gated output clock with optional dividers
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct GateClock {
    pub id: ClockId,
    pub name: &'static str,
    pub parents: Parents,
    pub flags: ClockFlags,
    pub gate: Field,
    pub divider: Option<Field>,
    /// Secondary source select field for gates with more candidates than a bypass bit can choose from
    pub mux: Option<Field>,
    pub bypass: Option<Bypass>,
    pub fixed_div: Option<u32>,
}

impl PllClock {
    pub const fn new(id: ClockId, name: &'static str, parents: Parents, offset: usize) -> Self {
        Self {
            id,
            name,
            parents,
            flags: ClockFlags::empty(),
            offset,
        }
    }
}

impl PeriphCClock {
    pub const fn new(id: ClockId, name: &'static str, parent: &'static str, offset: usize) -> Self {
        Self {
            id,
            name,
            parent,
            flags: ClockFlags::empty(),
            offset,
            shift: 0,
        }
    }

    pub const fn shift(self, shift: u8) -> Self {
        Self { shift, ..self }
    }
}

impl CntPeriphClock {
    pub const fn new(id: ClockId, name: &'static str, parents: Parents) -> Self {
        Self {
            id,
            name,
            parents,
            flags: ClockFlags::empty(),
            offset: None,
            fixed_divider: None,
            bypass: None,
        }
    }

    pub const fn counter(self, offset: usize) -> Self {
        Self {
            offset: Some(offset),
            ..self
        }
    }

    pub const fn fixed_divider(self, divider: u32) -> Self {
        Self {
            fixed_divider: Some(divider),
            ..self
        }
    }

    pub const fn bypass(self, bypass: Bypass) -> Self {
        Self {
            bypass: Some(bypass),
            ..self
        }
    }
}

impl GateClock {
    pub const fn new(id: ClockId, name: &'static str, parents: Parents, gate_reg: usize, gate_idx: u8) -> Self {
        Self {
            id,
            name,
            parents,
            flags: ClockFlags::empty(),
            gate: Field::bit(gate_reg, gate_idx),
            divider: None,
            mux: None,
            bypass: None,
            fixed_div: None,
        }
    }

    pub const fn flags(self, flags: ClockFlags) -> Self {
        Self { flags, ..self }
    }

    pub const fn divider(self, offset: usize, shift: u8, width: u8) -> Self {
        Self {
            divider: Some(Field::new(offset, shift, width)),
            ..self
        }
    }

    pub const fn mux(self, field: Field) -> Self {
        Self {
            mux: Some(field),
            ..self
        }
    }

    pub const fn bypass(self, bypass: Bypass) -> Self {
        Self {
            bypass: Some(bypass),
            ..self
        }
    }

    pub const fn fixed_div(self, divider: u32) -> Self {
        Self {
            fixed_div: Some(divider),
            ..self
        }
    }
}

/// Any clock node description
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum ClockDescriptor {
    Pll(PllClock),
    PeriphC(PeriphCClock),
    CntPeriph(CntPeriphClock),
    Gate(GateClock),
}

impl ClockDescriptor {
    pub fn id(&self) -> ClockId {
        match self {
            ClockDescriptor::Pll(clk) => clk.id,
            ClockDescriptor::PeriphC(clk) => clk.id,
            ClockDescriptor::CntPeriph(clk) => clk.id,
            ClockDescriptor::Gate(clk) => clk.id,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            ClockDescriptor::Pll(clk) => clk.name,
            ClockDescriptor::PeriphC(clk) => clk.name,
            ClockDescriptor::CntPeriph(clk) => clk.name,
            ClockDescriptor::Gate(clk) => clk.name,
        }
    }

    pub fn flags(&self) -> ClockFlags {
        match self {
            ClockDescriptor::Pll(clk) => clk.flags,
            ClockDescriptor::PeriphC(clk) => clk.flags,
            ClockDescriptor::CntPeriph(clk) => clk.flags,
            ClockDescriptor::Gate(clk) => clk.flags,
        }
    }

    /// All candidate parent names of the described clock in selector order
    pub fn parent_names(&self) -> &[&'static str] {
        match self {
            ClockDescriptor::Pll(clk) => clk.parents.names(),
            ClockDescriptor::PeriphC(clk) => slice::from_ref(&clk.parent),
            ClockDescriptor::CntPeriph(clk) => clk.parents.names(),
            ClockDescriptor::Gate(clk) => clk.parents.names(),
        }
    }
}

impl From<PllClock> for ClockDescriptor {
    fn from(value: PllClock) -> Self {
        ClockDescriptor::Pll(value)
    }
}

impl From<PeriphCClock> for ClockDescriptor {
    fn from(value: PeriphCClock) -> Self {
        ClockDescriptor::PeriphC(value)
    }
}

impl From<CntPeriphClock> for ClockDescriptor {
    fn from(value: CntPeriphClock) -> Self {
        ClockDescriptor::CntPeriph(value)
    }
}

impl From<GateClock> for ClockDescriptor {
    fn from(value: GateClock) -> Self {
        ClockDescriptor::Gate(value)
    }
}
