use crate::bindings::AGILEX_NUM_CLKS;
use crate::tables::{AGILEX_C_CLOCKS, CLKMGR_REGION_SIZE, CNT_CLOCKS, GATE_CLOCKS, N5X_C_CLOCKS, PLL_CLOCKS};
use alloc::string::{String, ToString};
use clk::{
    register_batches, Batch, ClockError, ClockId, ClockNode, ClockTable, Flavor, Hertz, LookupError, Registration,
    RootClock,
};
use regs::RegisterBlock;
use thiserror_no_std::Error;

/// A clock manager variant together with the batches that make up its clock tree
#[derive(Debug)]
pub struct Variant {
    pub compatible: &'static str,
    pub nr_clocks: usize,
    /// Bytes of register space the descriptors address
    pub region_size: usize,
    /// Descriptor batches in the order they must be registered
    pub batches: &'static [Batch<'static>],
}

impl Variant {
    /// Find the variant that handles devices compatible with `compatible`
    pub fn find(compatible: &str) -> Option<&'static Variant> {
        VARIANTS.iter().find(|variant| variant.compatible == compatible)
    }

    /// Total number of descriptors over all batches
    pub fn descriptor_count(&self) -> usize {
        self.batches.iter().map(|batch| batch.clocks.len()).sum()
    }
}

pub static VARIANTS: [Variant; 2] = [
    Variant {
        compatible: "intel,agilex-clkmgr",
        nr_clocks: AGILEX_NUM_CLKS,
        region_size: CLKMGR_REGION_SIZE,
        batches: &[
            Batch {
                name: "agilex_clk_register_pll",
                flavor: Flavor::Agilex,
                clocks: &PLL_CLOCKS,
            },
            Batch {
                name: "agilex_clk_register_c_perip",
                flavor: Flavor::Agilex,
                clocks: &AGILEX_C_CLOCKS,
            },
            Batch {
                name: "agilex_clk_register_cnt_perip",
                flavor: Flavor::Agilex,
                clocks: &CNT_CLOCKS,
            },
            Batch {
                name: "agilex_clk_register_gate",
                flavor: Flavor::Agilex,
                clocks: &GATE_CLOCKS,
            },
        ],
    },
    Variant {
        compatible: "intel,easic-n5x-clkmgr",
        nr_clocks: AGILEX_NUM_CLKS,
        region_size: CLKMGR_REGION_SIZE,
        batches: &[
            Batch {
                name: "n5x_clk_register_pll",
                flavor: Flavor::N5x,
                clocks: &PLL_CLOCKS,
            },
            Batch {
                name: "n5x_clk_register_c_perip",
                flavor: Flavor::N5x,
                clocks: &N5X_C_CLOCKS,
            },
            Batch {
                name: "agilex_clk_register_cnt_perip",
                flavor: Flavor::N5x,
                clocks: &CNT_CLOCKS,
            },
            Batch {
                name: "agilex_clk_register_gate",
                flavor: Flavor::N5x,
                clocks: &GATE_CLOCKS,
            },
        ],
    },
];

/// The platform side of a clock manager device
pub trait ClkMgrDevice {
    type Regs: RegisterBlock;

    /// The compatible string the device was discovered with
    fn compatible(&self) -> &str;

    /// Map `len` bytes of the device's register region, `None` if they are not available
    fn map_registers(&self, len: usize) -> Option<Self::Regs>;

    /// The external clocks feeding the clock manager
    fn root_clocks(&self) -> &[RootClock];
}

#[derive(Debug, Error, Clone, Eq, PartialEq)]
pub enum ProbeError {
    /// None of the supported variants matches the device
    #[error("no clock manager variant is compatible with {0}")]
    UnknownVariant(String),
    #[error("{0} is not available")]
    ResourceUnavailable(&'static str),
}

/// A probed clock manager owning its clock table and register block
#[derive(Debug)]
pub struct ClockManager<R> {
    variant: &'static Variant,
    table: ClockTable,
    regs: R,
    report: Registration,
}

impl<R: RegisterBlock> ClockManager<R> {
    pub fn variant(&self) -> &'static Variant {
        self.variant
    }

    pub fn table(&self) -> &ClockTable {
        &self.table
    }

    pub fn regs(&self) -> &R {
        &self.regs
    }

    /// What happened while the clock tree was registered
    pub fn report(&self) -> &Registration {
        &self.report
    }

    pub fn lookup(&self, id: ClockId) -> Result<&ClockNode, LookupError> {
        self.table.lookup(id)
    }

    pub fn rate(&self, id: ClockId) -> Result<Hertz, ClockError> {
        self.table.rate(id, &self.regs)
    }

    pub fn is_enabled(&self, id: ClockId) -> Result<bool, ClockError> {
        self.table.is_enabled(id, &self.regs)
    }

    pub fn enable(&self, id: ClockId) -> Result<(), ClockError> {
        self.table.enable(id, &self.regs)
    }

    pub fn disable(&self, id: ClockId) -> Result<(), ClockError> {
        self.table.disable(id, &self.regs)
    }
}

/// Bring up the clock manager `device`.
///
/// Selecting the variant, mapping the registers and allocating the clock table are fatal when they fail.
/// Clocks that cannot be registered are only logged and recorded in the [report](ClockManager::report).
pub fn probe<D: ClkMgrDevice>(device: &D) -> Result<ClockManager<D::Regs>, ProbeError> {
    let compatible = device.compatible();
    let variant = Variant::find(compatible).ok_or_else(|| ProbeError::UnknownVariant(compatible.to_string()))?;

    let regs = device
        .map_registers(variant.region_size)
        .ok_or(ProbeError::ResourceUnavailable("clock manager register region"))
        .and_then(|regs| match regs.size() {
            size if size >= variant.region_size => Ok(regs),
            _ => Err(ProbeError::ResourceUnavailable("complete clock manager register region")),
        })
        .map_err(|e| {
            log::error!("{}: failed to map clock registers: {}", compatible, e);
            e
        })?;

    let mut table = ClockTable::try_new(variant.nr_clocks, device.root_clocks()).map_err(|e| {
        log::error!("{}: {}", compatible, e);
        ProbeError::ResourceUnavailable("clock table memory")
    })?;
    for root in table.roots() {
        log::debug!("{}: root clock {} runs at {} MHz", compatible, root.name, root.rate.as_mhz());
    }

    let report = register_batches(&mut table, variant.batches, &regs);
    log::info!(
        "{}: registered {} of {} clocks ({} failed)",
        compatible,
        report.registered,
        variant.descriptor_count(),
        report.failures.len()
    );

    Ok(ClockManager {
        variant,
        table,
        regs,
        report,
    })
}
