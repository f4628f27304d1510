//! Descriptor tables of the Agilex clock manager
//!
//! Each table is one registration batch. Parents always come from an earlier batch or from the platform's root
//! clocks so that the batches can be registered in the order PLLs, C clocks, counter clocks, gates.

use crate::bindings::*;
use clk::descriptor::{Bypass, CntPeriphClock, GateClock, Parents, PeriphCClock, PllClock};
use clk::{ClockDescriptor, ClockFlags};
use regs::Field;

/// Names of the clocks the platform has to supply
pub const OSC1: &str = "osc1";
pub const CB_INTOSC_HS_DIV2: &str = "cb-intosc-hs-div2-clk";
pub const F2S_FREE: &str = "f2s-free-clk";

/// Size of the clock manager register region in bytes
pub const CLKMGR_REGION_SIZE: usize = 0x100;

const PLL_MUX: Parents = Parents::Mux(&[OSC1, CB_INTOSC_HS_DIV2, F2S_FREE]);
const BOOT_MUX: Parents = Parents::Mux(&[OSC1, CB_INTOSC_HS_DIV2]);

const MPU_FREE_MUX: Parents = Parents::Mux(&["main_pll_c0", "peri_pll_c0", OSC1, CB_INTOSC_HS_DIV2, F2S_FREE]);
const NOC_FREE_MUX: Parents = Parents::Mux(&["main_pll_c1", "peri_pll_c1", OSC1, CB_INTOSC_HS_DIV2, F2S_FREE]);
const C2_FREE_MUX: Parents = Parents::Mux(&["main_pll_c2", "peri_pll_c2", OSC1, CB_INTOSC_HS_DIV2, F2S_FREE]);
const C3_FREE_MUX: Parents = Parents::Mux(&["main_pll_c3", "peri_pll_c3", OSC1, CB_INTOSC_HS_DIV2, F2S_FREE]);

const MPU_MUX: Parents = Parents::Mux(&["mpu_free_clk", "boot_clk"]);
const NOC_MUX: Parents = Parents::Mux(&["noc_free_clk", "boot_clk"]);
const EMAC_MUX: Parents = Parents::Mux(&["emaca_free_clk", "emacb_free_clk", "boot_clk"]);
const EMAC_PTP_MUX: Parents = Parents::Mux(&["emac_ptp_free_clk", "boot_clk"]);
const GPIO_DB_MUX: Parents = Parents::Mux(&["gpio_db_free_clk", "boot_clk"]);
const SDMMC_MUX: Parents = Parents::Mux(&["sdmmc_free_clk", "boot_clk"]);
const S2F_USER0_MUX: Parents = Parents::Mux(&["s2f_user0_free_clk", "boot_clk"]);
const S2F_USER1_MUX: Parents = Parents::Mux(&["s2f_user1_free_clk", "boot_clk"]);
const PSI_MUX: Parents = Parents::Mux(&["psi_ref_free_clk", "boot_clk"]);

/// Bypass registers of the main and the peripheral PLL
const MAIN_PLL_BYPASS: usize = 0x30;
const PERIPH_PLL_BYPASS: usize = 0x88;
/// Index of `boot_clk` in the two entry muxes
const TO_BOOT_CLK: u8 = 1;
/// Index of `boot_clk` in [`EMAC_MUX`]
const EMAC_TO_BOOT_CLK: u8 = 2;
/// Counter clocks route their second candidate through when bypassed
const CNT_BYPASS_SOURCE: u8 = 1;

const MAIN_GATES: usize = 0x24;
const PERIPH_GATES: usize = 0x7c;
/// Register holding the noc divider fields
const NOC_DIV: usize = 0x44;
/// Register holding the EMAC source selection bits
const EMAC_SELECT: usize = 0x94;

pub static PLL_CLOCKS: [ClockDescriptor; 3] = [
    ClockDescriptor::Pll(PllClock::new(AGILEX_BOOT_CLK, "boot_clk", BOOT_MUX, 0x0)),
    ClockDescriptor::Pll(PllClock::new(AGILEX_MAIN_PLL_CLK, "main_pll", PLL_MUX, 0x48)),
    ClockDescriptor::Pll(PllClock::new(AGILEX_PERIPH_PLL_CLK, "periph_pll", PLL_MUX, 0x9c)),
];

/// C clocks of the Agilex, each divider has a register of its own
pub static AGILEX_C_CLOCKS: [ClockDescriptor; 8] = [
    ClockDescriptor::PeriphC(PeriphCClock::new(AGILEX_MAIN_PLL_C0_CLK, "main_pll_c0", "main_pll", 0x58)),
    ClockDescriptor::PeriphC(PeriphCClock::new(AGILEX_MAIN_PLL_C1_CLK, "main_pll_c1", "main_pll", 0x5c)),
    ClockDescriptor::PeriphC(PeriphCClock::new(AGILEX_MAIN_PLL_C2_CLK, "main_pll_c2", "main_pll", 0x64)),
    ClockDescriptor::PeriphC(PeriphCClock::new(AGILEX_MAIN_PLL_C3_CLK, "main_pll_c3", "main_pll", 0x68)),
    ClockDescriptor::PeriphC(PeriphCClock::new(AGILEX_PERIPH_PLL_C0_CLK, "peri_pll_c0", "periph_pll", 0xac)),
    ClockDescriptor::PeriphC(PeriphCClock::new(AGILEX_PERIPH_PLL_C1_CLK, "peri_pll_c1", "periph_pll", 0xb0)),
    ClockDescriptor::PeriphC(PeriphCClock::new(AGILEX_PERIPH_PLL_C2_CLK, "peri_pll_c2", "periph_pll", 0xb8)),
    ClockDescriptor::PeriphC(PeriphCClock::new(AGILEX_PERIPH_PLL_C3_CLK, "peri_pll_c3", "periph_pll", 0xbc)),
];

/// C clocks of the N5X, the four dividers of a PLL share one register
pub static N5X_C_CLOCKS: [ClockDescriptor; 8] = [
    ClockDescriptor::PeriphC(PeriphCClock::new(AGILEX_MAIN_PLL_C0_CLK, "main_pll_c0", "main_pll", 0x54).shift(0)),
    ClockDescriptor::PeriphC(PeriphCClock::new(AGILEX_MAIN_PLL_C1_CLK, "main_pll_c1", "main_pll", 0x54).shift(8)),
    ClockDescriptor::PeriphC(PeriphCClock::new(AGILEX_MAIN_PLL_C2_CLK, "main_pll_c2", "main_pll", 0x54).shift(16)),
    ClockDescriptor::PeriphC(PeriphCClock::new(AGILEX_MAIN_PLL_C3_CLK, "main_pll_c3", "main_pll", 0x54).shift(24)),
    ClockDescriptor::PeriphC(PeriphCClock::new(AGILEX_PERIPH_PLL_C0_CLK, "peri_pll_c0", "periph_pll", 0xa8).shift(0)),
    ClockDescriptor::PeriphC(PeriphCClock::new(AGILEX_PERIPH_PLL_C1_CLK, "peri_pll_c1", "periph_pll", 0xa8).shift(8)),
    ClockDescriptor::PeriphC(
        PeriphCClock::new(AGILEX_PERIPH_PLL_C2_CLK, "peri_pll_c2", "periph_pll", 0xa8).shift(16),
    ),
    ClockDescriptor::PeriphC(
        PeriphCClock::new(AGILEX_PERIPH_PLL_C3_CLK, "peri_pll_c3", "periph_pll", 0xa8).shift(24),
    ),
];

pub static CNT_CLOCKS: [ClockDescriptor; 11] = [
    ClockDescriptor::CntPeriph(CntPeriphClock::new(AGILEX_MPU_FREE_CLK, "mpu_free_clk", MPU_FREE_MUX).counter(0x3c)),
    ClockDescriptor::CntPeriph(CntPeriphClock::new(AGILEX_NOC_FREE_CLK, "noc_free_clk", NOC_FREE_MUX).counter(0x40)),
    ClockDescriptor::CntPeriph(
        CntPeriphClock::new(AGILEX_L4_SYS_FREE_CLK, "l4_sys_free_clk", NOC_MUX)
            .fixed_divider(4)
            .bypass(Bypass::new(MAIN_PLL_BYPASS, 1, TO_BOOT_CLK)),
    ),
    ClockDescriptor::CntPeriph(
        CntPeriphClock::new(AGILEX_EMAC_A_FREE_CLK, "emaca_free_clk", C2_FREE_MUX)
            .counter(0xd4)
            .bypass(Bypass::new(PERIPH_PLL_BYPASS, 0, CNT_BYPASS_SOURCE)),
    ),
    ClockDescriptor::CntPeriph(
        CntPeriphClock::new(AGILEX_EMAC_B_FREE_CLK, "emacb_free_clk", C3_FREE_MUX)
            .counter(0xd8)
            .bypass(Bypass::new(PERIPH_PLL_BYPASS, 1, CNT_BYPASS_SOURCE)),
    ),
    ClockDescriptor::CntPeriph(
        CntPeriphClock::new(AGILEX_EMAC_PTP_FREE_CLK, "emac_ptp_free_clk", C3_FREE_MUX)
            .counter(0xdc)
            .bypass(Bypass::new(PERIPH_PLL_BYPASS, 2, CNT_BYPASS_SOURCE)),
    ),
    ClockDescriptor::CntPeriph(
        CntPeriphClock::new(AGILEX_GPIO_DB_FREE_CLK, "gpio_db_free_clk", C3_FREE_MUX)
            .counter(0xe0)
            .bypass(Bypass::new(PERIPH_PLL_BYPASS, 3, CNT_BYPASS_SOURCE)),
    ),
    ClockDescriptor::CntPeriph(CntPeriphClock::new(AGILEX_SDMMC_FREE_CLK, "sdmmc_free_clk", C3_FREE_MUX).counter(0xe4)),
    ClockDescriptor::CntPeriph(
        CntPeriphClock::new(AGILEX_S2F_USER0_FREE_CLK, "s2f_user0_free_clk", C2_FREE_MUX)
            .counter(0xe8)
            .bypass(Bypass::new(MAIN_PLL_BYPASS, 2, CNT_BYPASS_SOURCE)),
    ),
    ClockDescriptor::CntPeriph(
        CntPeriphClock::new(AGILEX_S2F_USER1_FREE_CLK, "s2f_user1_free_clk", C2_FREE_MUX)
            .counter(0xec)
            .bypass(Bypass::new(PERIPH_PLL_BYPASS, 5, CNT_BYPASS_SOURCE)),
    ),
    ClockDescriptor::CntPeriph(
        CntPeriphClock::new(AGILEX_PSI_REF_FREE_CLK, "psi_ref_free_clk", C2_FREE_MUX)
            .counter(0xf0)
            .bypass(Bypass::new(PERIPH_PLL_BYPASS, 6, CNT_BYPASS_SOURCE)),
    ),
];

pub static GATE_CLOCKS: [ClockDescriptor; 24] = [
    ClockDescriptor::Gate(
        GateClock::new(AGILEX_MPU_CLK, "mpu_clk", MPU_MUX, MAIN_GATES, 0)
            .bypass(Bypass::new(MAIN_PLL_BYPASS, 0, TO_BOOT_CLK)),
    ),
    ClockDescriptor::Gate(
        GateClock::new(AGILEX_MPU_PERIPH_CLK, "mpu_periph_clk", Parents::Fixed("mpu_clk"), MAIN_GATES, 0).fixed_div(4),
    ),
    ClockDescriptor::Gate(
        GateClock::new(AGILEX_MPU_CCU_CLK, "mpu_ccu_clk", Parents::Fixed("mpu_clk"), MAIN_GATES, 0).fixed_div(2),
    ),
    ClockDescriptor::Gate(
        GateClock::new(AGILEX_L4_MAIN_CLK, "l4_main_clk", NOC_MUX, MAIN_GATES, 1)
            .divider(NOC_DIV, 0, 2)
            .bypass(Bypass::new(MAIN_PLL_BYPASS, 1, TO_BOOT_CLK)),
    ),
    ClockDescriptor::Gate(
        GateClock::new(AGILEX_L4_MP_CLK, "l4_mp_clk", NOC_MUX, MAIN_GATES, 2)
            .divider(NOC_DIV, 8, 2)
            .bypass(Bypass::new(MAIN_PLL_BYPASS, 1, TO_BOOT_CLK)),
    ),
    // feeds the SP timers among others and must keep running
    ClockDescriptor::Gate(
        GateClock::new(AGILEX_L4_SP_CLK, "l4_sp_clk", NOC_MUX, MAIN_GATES, 3)
            .flags(ClockFlags::CRITICAL)
            .divider(NOC_DIV, 16, 2)
            .bypass(Bypass::new(MAIN_PLL_BYPASS, 1, TO_BOOT_CLK)),
    ),
    ClockDescriptor::Gate(
        GateClock::new(AGILEX_CS_AT_CLK, "cs_at_clk", NOC_MUX, MAIN_GATES, 4)
            .divider(NOC_DIV, 24, 2)
            .bypass(Bypass::new(MAIN_PLL_BYPASS, 1, TO_BOOT_CLK)),
    ),
    ClockDescriptor::Gate(
        GateClock::new(AGILEX_CS_TRACE_CLK, "cs_trace_clk", NOC_MUX, MAIN_GATES, 4)
            .divider(NOC_DIV, 26, 2)
            .bypass(Bypass::new(MAIN_PLL_BYPASS, 1, TO_BOOT_CLK)),
    ),
    ClockDescriptor::Gate(
        GateClock::new(AGILEX_CS_PDBG_CLK, "cs_pdbg_clk", Parents::Fixed("cs_at_clk"), MAIN_GATES, 4).divider(
            NOC_DIV,
            28,
            1,
        ),
    ),
    ClockDescriptor::Gate(
        GateClock::new(AGILEX_CS_TIMER_CLK, "cs_timer_clk", NOC_MUX, MAIN_GATES, 5)
            .bypass(Bypass::new(MAIN_PLL_BYPASS, 1, TO_BOOT_CLK)),
    ),
    ClockDescriptor::Gate(
        GateClock::new(AGILEX_S2F_USER0_CLK, "s2f_user0_clk", S2F_USER0_MUX, MAIN_GATES, 6)
            .bypass(Bypass::new(MAIN_PLL_BYPASS, 2, TO_BOOT_CLK)),
    ),
    ClockDescriptor::Gate(
        GateClock::new(AGILEX_EMAC0_CLK, "emac0_clk", EMAC_MUX, PERIPH_GATES, 0)
            .mux(Field::bit(EMAC_SELECT, 26))
            .bypass(Bypass::per_parent(PERIPH_PLL_BYPASS, 0, EMAC_TO_BOOT_CLK)),
    ),
    ClockDescriptor::Gate(
        GateClock::new(AGILEX_EMAC1_CLK, "emac1_clk", EMAC_MUX, PERIPH_GATES, 1)
            .mux(Field::bit(EMAC_SELECT, 27))
            .bypass(Bypass::per_parent(PERIPH_PLL_BYPASS, 0, EMAC_TO_BOOT_CLK)),
    ),
    ClockDescriptor::Gate(
        GateClock::new(AGILEX_EMAC2_CLK, "emac2_clk", EMAC_MUX, PERIPH_GATES, 2)
            .mux(Field::bit(EMAC_SELECT, 28))
            .bypass(Bypass::per_parent(PERIPH_PLL_BYPASS, 0, EMAC_TO_BOOT_CLK)),
    ),
    ClockDescriptor::Gate(
        GateClock::new(AGILEX_EMAC_PTP_CLK, "emac_ptp_clk", EMAC_PTP_MUX, PERIPH_GATES, 3)
            .bypass(Bypass::new(PERIPH_PLL_BYPASS, 2, TO_BOOT_CLK)),
    ),
    ClockDescriptor::Gate(
        GateClock::new(AGILEX_GPIO_DB_CLK, "gpio_db_clk", GPIO_DB_MUX, PERIPH_GATES, 4)
            .divider(0x98, 0, 16)
            .bypass(Bypass::new(PERIPH_PLL_BYPASS, 3, TO_BOOT_CLK)),
    ),
    ClockDescriptor::Gate(
        GateClock::new(AGILEX_SDMMC_CLK, "sdmmc_clk", SDMMC_MUX, PERIPH_GATES, 5)
            .bypass(Bypass::new(PERIPH_PLL_BYPASS, 4, TO_BOOT_CLK))
            .fixed_div(4),
    ),
    ClockDescriptor::Gate(
        GateClock::new(AGILEX_S2F_USER1_CLK, "s2f_user1_clk", S2F_USER1_MUX, PERIPH_GATES, 6)
            .bypass(Bypass::new(PERIPH_PLL_BYPASS, 5, TO_BOOT_CLK)),
    ),
    ClockDescriptor::Gate(
        GateClock::new(AGILEX_PSI_REF_CLK, "psi_ref_clk", PSI_MUX, PERIPH_GATES, 7)
            .bypass(Bypass::new(PERIPH_PLL_BYPASS, 6, TO_BOOT_CLK)),
    ),
    ClockDescriptor::Gate(GateClock::new(
        AGILEX_USB_CLK,
        "usb_clk",
        Parents::Fixed("l4_mp_clk"),
        PERIPH_GATES,
        8,
    )),
    ClockDescriptor::Gate(GateClock::new(
        AGILEX_SPI_M_CLK,
        "spi_m_clk",
        Parents::Fixed("l4_mp_clk"),
        PERIPH_GATES,
        9,
    )),
    ClockDescriptor::Gate(GateClock::new(
        AGILEX_NAND_X_CLK,
        "nand_x_clk",
        Parents::Fixed("l4_mp_clk"),
        PERIPH_GATES,
        10,
    )),
    ClockDescriptor::Gate(
        GateClock::new(AGILEX_NAND_CLK, "nand_clk", Parents::Fixed("nand_x_clk"), PERIPH_GATES, 10).fixed_div(4),
    ),
    ClockDescriptor::Gate(
        GateClock::new(AGILEX_NAND_ECC_CLK, "nand_ecc_clk", Parents::Fixed("nand_x_clk"), PERIPH_GATES, 10)
            .fixed_div(4),
    ),
];
