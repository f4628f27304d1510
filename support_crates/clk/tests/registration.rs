use clk::descriptor::{Bypass, CntPeriphClock, GateClock, Parents, PeriphCClock, PllClock};
use clk::{
    register_batches, Batch, ClockDescriptor, ClockId, ClockTable, Flavor, Hertz, LookupError, ParentRef,
    RegisterError, RootClock,
};
use regs::{Field, RegisterBlock, ShadowBlock};

const ROOTS: &[RootClock] = &[
    RootClock::new("osc1", Hertz::from_mhz(25)),
    RootClock::new("cb-intosc-hs-div2-clk", Hertz::from_mhz(200)),
    RootClock::new("f2s-free-clk", Hertz::from_mhz(100)),
];

const PLL_MUX: Parents = Parents::Mux(&["osc1", "cb-intosc-hs-div2-clk", "f2s-free-clk"]);

const BOOT_CLK: ClockId = ClockId(0);
const MAIN_PLL: ClockId = ClockId(1);
const PERIPH_PLL: ClockId = ClockId(2);
const MAIN_PLL_C0: ClockId = ClockId(3);
const MPU_FREE_CLK: ClockId = ClockId(4);
const MPU_CLK: ClockId = ClockId(10);

const PLLS: &[ClockDescriptor] = &[
    ClockDescriptor::Pll(PllClock::new(BOOT_CLK, "boot_clk", Parents::Mux(&["osc1", "cb-intosc-hs-div2-clk"]), 0)),
    ClockDescriptor::Pll(PllClock::new(MAIN_PLL, "main_pll", PLL_MUX, 0x48)),
    ClockDescriptor::Pll(PllClock::new(PERIPH_PLL, "periph_pll", PLL_MUX, 0x9c)),
];

const DIVIDERS: &[ClockDescriptor] = &[ClockDescriptor::PeriphC(PeriphCClock::new(
    MAIN_PLL_C0,
    "main_pll_c0",
    "main_pll",
    0x58,
))];

const COUNTERS: &[ClockDescriptor] = &[ClockDescriptor::CntPeriph(
    CntPeriphClock::new(
        MPU_FREE_CLK,
        "mpu_free_clk",
        Parents::Mux(&["main_pll_c0", "periph_pll", "osc1"]),
    )
    .counter(0x3c),
)];

const GATES: &[ClockDescriptor] = &[ClockDescriptor::Gate(
    GateClock::new(MPU_CLK, "mpu_clk", Parents::Mux(&["mpu_free_clk", "boot_clk"]), 0x24, 0)
        .bypass(Bypass::new(0x30, 0, 1)),
)];

/// Hardware state after the boot loader: main PLL at 1 GHz from osc1, C0 divides by 2
fn booted_hardware() -> ShadowBlock {
    ShadowBlock::new(0x100)
        .with_field(Field::new(0x48, 8, 6), 1)
        .with_field(Field::new(0x4c, 0, 10), 40)
        .with_field(Field::new(0x58, 0, 11), 1)
        .with_field(Field::bit(0x24, 0), 1)
}

fn batches<'a>(order: &[(&'static str, &'a [ClockDescriptor])]) -> Vec<Batch<'a>> {
    order
        .iter()
        .map(|&(name, clocks)| Batch {
            name,
            flavor: Flavor::Agilex,
            clocks,
        })
        .collect()
}

fn build(order: &[(&'static str, &[ClockDescriptor])], regs: &ShadowBlock) -> (ClockTable, clk::Registration) {
    let mut table = ClockTable::try_new(16, ROOTS).unwrap();
    let report = register_batches(&mut table, &batches(order), regs);
    (table, report)
}

/// The active parents of `id` up to and including the root clock
fn source_chain(table: &ClockTable, id: ClockId) -> Vec<ParentRef> {
    let mut chain = Vec::new();
    let mut current = table.get(id).and_then(|node| node.parent());
    while let Some(parent) = current {
        chain.push(parent);
        current = match parent {
            ParentRef::Clock(id) => table.get(id).and_then(|node| node.parent()),
            ParentRef::Root(_) => None,
        };
    }
    chain
}

#[test]
fn dependency_order_roots_gates_at_the_pll() {
    let regs = booted_hardware();
    let (table, report) = build(
        &[("plls", PLLS), ("dividers", DIVIDERS), ("counters", COUNTERS), ("gates", GATES)],
        &regs,
    );

    assert!(report.is_complete());
    assert_eq!(report.registered, 6);
    assert_eq!(
        source_chain(&table, MPU_CLK),
        [
            ParentRef::Clock(MPU_FREE_CLK),
            ParentRef::Clock(MAIN_PLL_C0),
            ParentRef::Clock(MAIN_PLL),
            ParentRef::Root(0)
        ]
    );
    assert_eq!(table.rate(MPU_CLK, &regs), Ok(Hertz::from_mhz(500)));
}

#[test]
fn reversed_order_leaves_gate_unresolved() {
    let regs = booted_hardware();
    let (table, report) = build(
        &[("gates", GATES), ("counters", COUNTERS), ("dividers", DIVIDERS), ("plls", PLLS)],
        &regs,
    );

    assert_eq!(
        report.failure("mpu_clk").map(|failure| failure.error),
        Some(RegisterError::ParentUnresolved {
            clock: "mpu_clk",
            parent: "mpu_free_clk"
        })
    );
    assert_eq!(table.lookup(MPU_CLK).err(), Some(LookupError::NotFound(MPU_CLK)));
    // the PLLs don't depend on anything and still register
    assert!(table.get(MAIN_PLL).is_some());
    assert!(table.get(PERIPH_PLL).is_some());
}

#[test]
fn misspelled_parent_only_skips_that_clock() {
    let regs = booted_hardware();
    let dividers = [
        ClockDescriptor::PeriphC(PeriphCClock::new(ClockId(5), "peri_pll_c0", "peri_pll", 0xac)),
        DIVIDERS[0],
    ];
    let (table, report) = build(
        &[("plls", PLLS), ("dividers", &dividers[..]), ("counters", COUNTERS), ("gates", GATES)],
        &regs,
    );

    assert_eq!(report.failures.len(), 1);
    assert_eq!(report.failures[0].name, "peri_pll_c0");
    assert_eq!(table.lookup(ClockId(5)).err(), Some(LookupError::NotFound(ClockId(5))));
    assert_eq!(table.populated(), 6);
    assert!(table.get(MPU_CLK).is_some());
}

#[test]
fn registration_is_deterministic() {
    let regs = booted_hardware();
    let order = [("plls", PLLS), ("dividers", DIVIDERS), ("counters", COUNTERS), ("gates", GATES)];
    let (first, first_report) = build(&order, &regs);
    let (second, second_report) = build(&order, &regs);
    assert_eq!(first, second);
    assert_eq!(first_report, second_report);
}

#[test]
fn source_selection_reflects_hardware_at_registration() {
    let regs = booted_hardware()
        .with_field(Field::new(0x3c, 16, 3), 2)
        .with_field(Field::bit(0x30, 0), 1);
    let (table, _) = build(
        &[("plls", PLLS), ("dividers", DIVIDERS), ("counters", COUNTERS), ("gates", GATES)],
        &regs,
    );

    let mpu_free = table.lookup(MPU_FREE_CLK).unwrap();
    assert_eq!(mpu_free.parent_index(), 2);
    assert_eq!(mpu_free.parent(), Some(ParentRef::Root(0)));

    let mpu = table.lookup(MPU_CLK).unwrap();
    assert_eq!(mpu.parent(), Some(ParentRef::Clock(BOOT_CLK)));
    assert_eq!(table.rate(MPU_CLK, &regs), Ok(Hertz::from_mhz(25)));

    // later register changes don't alter the structure that was published
    regs.write_field(Field::bit(0x30, 0), 0);
    assert_eq!(table.lookup(MPU_CLK).unwrap().parent(), Some(ParentRef::Clock(BOOT_CLK)));
}
