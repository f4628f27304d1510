//! Live clock nodes and the constructors that build them from descriptors

use crate::descriptor::{Bypass, ClockDescriptor, ClockFlags, CntPeriphClock, GateClock, PeriphCClock, PllClock};
use crate::register::RegisterError;
use crate::table::ClockTable;
use crate::{ClockId, Hertz};
use alloc::vec::Vec;
use regs::{Field, RegisterBlock};

/// Source select field of a PLL's global control register
const PLL_SOURCE_SHIFT: u8 = 16;
const PLL_SOURCE_WIDTH: u8 = 2;
/// Boot clock select bit of the clock manager control register
const BOOT_CLK_SELECT_SHIFT: u8 = 9;

/// Source select field of a counter register
const CNT_SOURCE_SHIFT: u8 = 16;
const CNT_SOURCE_WIDTH: u8 = 3;
/// Divider field of counter registers
const CNT_DIV_WIDTH: u8 = 11;
/// Divider field of C clocks that share one register word
const N5X_C_DIV_WIDTH: u8 = 8;

/// The constructor set a SoC variant uses for PLLs and PLL output counters
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum Flavor {
    Agilex,
    N5x,
}

/// How a PLL derives its output from its reference
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum PllKind {
    /// `reference / refdiv * mdiv`
    Agilex,
    /// `reference * (fdiv + 1) / ((refdiv + 1) << odiv)`
    N5x,
    /// The boot clock which passes its selected source through
    Boot,
}

impl PllKind {
    fn recalc_rate<R: RegisterBlock + ?Sized>(&self, offset: usize, parent: Hertz, regs: &R) -> Hertz {
        match self {
            PllKind::Agilex => {
                let refdiv = regs.read_field(Field::new(offset, 8, 6)) as u64;
                let mdiv = regs.read_field(Field::new(offset + 0x4, 0, 10)) as u64;
                match refdiv {
                    0 => Hertz(0),
                    refdiv => Hertz(parent.0 / refdiv * mdiv),
                }
            }
            PllKind::N5x => {
                let plldiv = offset + 0x8;
                let refdiv = regs.read_field(Field::new(plldiv, 0, 6)) as u64;
                let fdiv = regs.read_field(Field::new(plldiv, 8, 9)) as u64;
                let odiv = regs.read_field(Field::new(plldiv, 24, 3));
                Hertz(parent.0 * (fdiv + 1) / ((refdiv + 1) << odiv))
            }
            PllKind::Boot => parent,
        }
    }
}

/// A division stage built from an optional divider field and an optional constant
#[derive(Debug, Copy, Clone, Eq, PartialEq, Default)]
pub struct Divider {
    pub field: Option<Field>,
    pub fixed: Option<u32>,
}

impl Divider {
    /// The divisor that is currently in effect.
    ///
    /// The field's value is biased by one so that a zeroed field divides by one.
    /// A constant is multiplied onto that; a constant of zero counts as absent.
    pub fn effective<R: RegisterBlock + ?Sized>(&self, regs: &R) -> u64 {
        let fixed = self.fixed.filter(|&div| div != 0).map_or(1, u64::from);
        match self.field {
            Some(field) => fixed * (regs.read_field(field) as u64 + 1),
            None => fixed,
        }
    }
}

/// How the active parent of a node is chosen among its candidates
#[derive(Debug, Copy, Clone, Eq, PartialEq, Default)]
pub struct Selector {
    pub mux: Option<Field>,
    pub bypass: Option<Bypass>,
}

impl Selector {
    /// Read the raw index of the active candidate from hardware.
    ///
    /// With only one candidate nothing is read. The primary mux is evaluated first and a set bypass bit then
    /// overrides it. Values are not validated against the number of candidates.
    pub fn read<R: RegisterBlock + ?Sized>(&self, candidates: usize, regs: &R) -> u32 {
        if candidates <= 1 {
            return 0;
        }

        let primary = self.mux.map_or(0, |mux| regs.read_field(mux));
        match self.bypass {
            Some(bypass) => match bypass.field_for(primary) {
                Some(bit) if regs.read_field(bit) == 1 => bypass.source as u32,
                _ => primary,
            },
            None => primary,
        }
    }
}

/// Kind specific part of a clock node
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum NodeKind {
    Pll { kind: PllKind, offset: usize },
    PeriphC { divider: Divider },
    CntPeriph { divider: Divider },
    Gate { gate: Field, divider: Divider },
}

/// A resolved reference to a clock's parent
#[derive(Debug, Copy, Clone, Eq, PartialEq, Ord, PartialOrd)]
pub enum ParentRef {
    /// A clock node registered in the same table
    Clock(ClockId),
    /// An external root clock, by index into the table's roots
    Root(usize),
}

/// A registered clock.
///
/// The structure (parents, register geometry, flags) is fixed once the node is built, only the hardware state it
/// describes may change afterwards.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct ClockNode {
    id: ClockId,
    name: &'static str,
    flags: ClockFlags,
    parents: Vec<ParentRef>,
    selected: u32,
    kind: NodeKind,
}

impl ClockNode {
    /// Build the node described by `desc`.
    ///
    /// All candidate parents are resolved by name against `table`, which must already contain every parent clock.
    /// The active parent is read from `regs` at this point.
    pub fn build<R: RegisterBlock + ?Sized>(
        desc: &ClockDescriptor,
        flavor: Flavor,
        table: &ClockTable,
        regs: &R,
    ) -> Result<Self, RegisterError> {
        let parents = resolve_parents(desc, table)?;
        let (selector, kind) = match desc {
            ClockDescriptor::Pll(pll) => build_pll(pll, flavor),
            ClockDescriptor::PeriphC(clk) => build_periph_c(clk, flavor)?,
            ClockDescriptor::CntPeriph(clk) => build_cnt_periph(clk),
            ClockDescriptor::Gate(clk) => build_gate(clk),
        };
        let selected = selector.read(parents.len(), regs);

        Ok(Self {
            id: desc.id(),
            name: desc.name(),
            flags: desc.flags(),
            parents,
            selected,
            kind,
        })
    }

    pub fn id(&self) -> ClockId {
        self.id
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn flags(&self) -> ClockFlags {
        self.flags
    }

    pub fn is_critical(&self) -> bool {
        self.flags.contains(ClockFlags::CRITICAL)
    }

    pub fn kind(&self) -> &NodeKind {
        &self.kind
    }

    /// All candidate parents in selector order
    pub fn parents(&self) -> &[ParentRef] {
        &self.parents
    }

    /// The raw selector value that was read when the node was built
    pub fn parent_index(&self) -> u32 {
        self.selected
    }

    /// The parent that was active when the node was built.
    ///
    /// `None` if hardware selected an index that has no candidate.
    pub fn parent(&self) -> Option<ParentRef> {
        self.parents.get(self.selected as usize).copied()
    }

    /// The divisor currently applied to the parent rate, 1 for PLLs
    pub fn divisor<R: RegisterBlock + ?Sized>(&self, regs: &R) -> u64 {
        match &self.kind {
            NodeKind::Pll { .. } => 1,
            NodeKind::PeriphC { divider } | NodeKind::CntPeriph { divider } | NodeKind::Gate { divider, .. } => {
                divider.effective(regs)
            }
        }
    }

    /// Compute this clock's rate from its parent's rate
    pub fn recalc_rate<R: RegisterBlock + ?Sized>(&self, parent_rate: Hertz, regs: &R) -> Hertz {
        match &self.kind {
            NodeKind::Pll { kind, offset } => kind.recalc_rate(*offset, parent_rate, regs),
            _ => Hertz(parent_rate.0 / self.divisor(regs)),
        }
    }

    /// The gate bit controlling this clock, if it can be gated at all
    pub fn gate(&self) -> Option<Field> {
        match self.kind {
            NodeKind::Gate { gate, .. } => Some(gate),
            _ => None,
        }
    }

    /// Whether the clock output is running. Clocks without a gate always run.
    pub fn is_enabled<R: RegisterBlock + ?Sized>(&self, regs: &R) -> bool {
        self.gate().map_or(true, |gate| regs.read_field(gate) == 1)
    }
}

fn resolve_parents(desc: &ClockDescriptor, table: &ClockTable) -> Result<Vec<ParentRef>, RegisterError> {
    let names = desc.parent_names();
    let mut parents = Vec::with_capacity(names.len());
    for &parent in names {
        let resolved = table.resolve(parent).ok_or(RegisterError::ParentUnresolved {
            clock: desc.name(),
            parent,
        })?;
        parents.push(resolved);
    }
    Ok(parents)
}

fn build_pll(pll: &PllClock, flavor: Flavor) -> (Selector, NodeKind) {
    let (mux, kind) = match (pll.offset, flavor) {
        (0, _) => (Field::bit(0, BOOT_CLK_SELECT_SHIFT), PllKind::Boot),
        (offset, Flavor::Agilex) => (Field::new(offset, PLL_SOURCE_SHIFT, PLL_SOURCE_WIDTH), PllKind::Agilex),
        (offset, Flavor::N5x) => (Field::new(offset, PLL_SOURCE_SHIFT, PLL_SOURCE_WIDTH), PllKind::N5x),
    };
    let selector = Selector {
        mux: Some(mux),
        bypass: None,
    };
    (
        selector,
        NodeKind::Pll {
            kind,
            offset: pll.offset,
        },
    )
}

fn build_periph_c(clk: &PeriphCClock, flavor: Flavor) -> Result<(Selector, NodeKind), RegisterError> {
    let field = match flavor {
        Flavor::Agilex => Field::new(clk.offset, 0, CNT_DIV_WIDTH),
        Flavor::N5x => Field::try_new(clk.offset, clk.shift, N5X_C_DIV_WIDTH)
            .ok_or(RegisterError::InvalidGeometry { clock: clk.name })?,
    };
    let divider = Divider {
        field: Some(field),
        fixed: None,
    };
    Ok((Selector::default(), NodeKind::PeriphC { divider }))
}

fn build_cnt_periph(clk: &CntPeriphClock) -> (Selector, NodeKind) {
    let selector = Selector {
        mux: clk
            .offset
            .map(|offset| Field::new(offset, CNT_SOURCE_SHIFT, CNT_SOURCE_WIDTH)),
        bypass: clk.bypass,
    };
    let divider = Divider {
        field: clk.offset.map(|offset| Field::new(offset, 0, CNT_DIV_WIDTH)),
        fixed: clk.fixed_divider,
    };
    (selector, NodeKind::CntPeriph { divider })
}

fn build_gate(clk: &GateClock) -> (Selector, NodeKind) {
    let selector = Selector {
        mux: clk.mux,
        bypass: clk.bypass,
    };
    let divider = Divider {
        field: clk.divider,
        fixed: clk.fixed_div,
    };
    (
        selector,
        NodeKind::Gate {
            gate: clk.gate,
            divider,
        },
    )
}
