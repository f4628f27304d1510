//! Clock ids of the Agilex clock manager as used by device tree consumers.
//!
//! Both supported variants use the same ids. The oscillator inputs and the FPGA provided clock have ids too but
//! they are provided by the platform and never registered by this driver.

use clk::ClockId;
use static_assertions::const_assert;

pub const AGILEX_OSC1: ClockId = ClockId(0);
pub const AGILEX_CB_INTOSC_HS_DIV2_CLK: ClockId = ClockId(1);
pub const AGILEX_CB_INTOSC_LS_CLK: ClockId = ClockId(2);
pub const AGILEX_L4_SYS_FREE_CLK: ClockId = ClockId(3);
pub const AGILEX_F2S_FREE_CLK: ClockId = ClockId(4);

pub const AGILEX_MAIN_PLL_CLK: ClockId = ClockId(5);
pub const AGILEX_MAIN_PLL_C0_CLK: ClockId = ClockId(6);
pub const AGILEX_MAIN_PLL_C1_CLK: ClockId = ClockId(7);
pub const AGILEX_MAIN_PLL_C2_CLK: ClockId = ClockId(8);
pub const AGILEX_MAIN_PLL_C3_CLK: ClockId = ClockId(9);
pub const AGILEX_PERIPH_PLL_CLK: ClockId = ClockId(10);
pub const AGILEX_PERIPH_PLL_C0_CLK: ClockId = ClockId(11);
pub const AGILEX_PERIPH_PLL_C1_CLK: ClockId = ClockId(12);
pub const AGILEX_PERIPH_PLL_C2_CLK: ClockId = ClockId(13);
pub const AGILEX_PERIPH_PLL_C3_CLK: ClockId = ClockId(14);
pub const AGILEX_MPU_FREE_CLK: ClockId = ClockId(15);
pub const AGILEX_MPU_CCU_CLK: ClockId = ClockId(16);
pub const AGILEX_BOOT_CLK: ClockId = ClockId(17);

pub const AGILEX_MPU_CLK: ClockId = ClockId(18);
pub const AGILEX_MPU_PERIPH_CLK: ClockId = ClockId(19);
pub const AGILEX_L4_MAIN_CLK: ClockId = ClockId(20);
pub const AGILEX_L4_MP_CLK: ClockId = ClockId(21);
pub const AGILEX_L4_SP_CLK: ClockId = ClockId(22);
pub const AGILEX_CS_AT_CLK: ClockId = ClockId(23);
pub const AGILEX_CS_TRACE_CLK: ClockId = ClockId(24);
pub const AGILEX_CS_PDBG_CLK: ClockId = ClockId(25);
pub const AGILEX_CS_TIMER_CLK: ClockId = ClockId(26);
pub const AGILEX_S2F_USER0_CLK: ClockId = ClockId(27);
pub const AGILEX_EMAC0_CLK: ClockId = ClockId(28);
pub const AGILEX_EMAC1_CLK: ClockId = ClockId(29);
pub const AGILEX_EMAC2_CLK: ClockId = ClockId(30);
pub const AGILEX_EMAC_PTP_CLK: ClockId = ClockId(31);
pub const AGILEX_GPIO_DB_CLK: ClockId = ClockId(32);
pub const AGILEX_NAND_CLK: ClockId = ClockId(33);
pub const AGILEX_PSI_REF_CLK: ClockId = ClockId(34);
pub const AGILEX_S2F_USER1_CLK: ClockId = ClockId(35);
pub const AGILEX_SDMMC_CLK: ClockId = ClockId(36);
pub const AGILEX_SPI_M_CLK: ClockId = ClockId(37);
pub const AGILEX_USB_CLK: ClockId = ClockId(38);
pub const AGILEX_NAND_X_CLK: ClockId = ClockId(39);
pub const AGILEX_NAND_ECC_CLK: ClockId = ClockId(40);

pub const AGILEX_NOC_FREE_CLK: ClockId = ClockId(41);
pub const AGILEX_EMAC_A_FREE_CLK: ClockId = ClockId(42);
pub const AGILEX_EMAC_B_FREE_CLK: ClockId = ClockId(43);
pub const AGILEX_EMAC_PTP_FREE_CLK: ClockId = ClockId(44);
pub const AGILEX_GPIO_DB_FREE_CLK: ClockId = ClockId(45);
pub const AGILEX_SDMMC_FREE_CLK: ClockId = ClockId(46);
pub const AGILEX_S2F_USER0_FREE_CLK: ClockId = ClockId(47);
pub const AGILEX_S2F_USER1_FREE_CLK: ClockId = ClockId(48);
pub const AGILEX_PSI_REF_FREE_CLK: ClockId = ClockId(49);

pub const AGILEX_NUM_CLKS: usize = 50;

const_assert!(AGILEX_PSI_REF_FREE_CLK.index() == AGILEX_NUM_CLKS - 1);
const_assert!(AGILEX_NAND_ECC_CLK.index() < AGILEX_NOC_FREE_CLK.index());
