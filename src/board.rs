use embassy_stm32::adc::{Adc, AdcChannel, AnyAdcChannel, Resolution, SampleTime};
use embassy_stm32::mode::Async;
use embassy_stm32::peripherals::ADC1;
use embassy_stm32::time::Hertz;
use embassy_stm32::usart::{Config as UsartConfig, UartTx};
use embassy_stm32::{bind_interrupts, i2c, peripherals, rcc, Config};
#[cfg(feature = "sd-log")]
use embassy_stm32::{
    gpio::{Level, Output, Speed},
    mode::Blocking,
    spi,
};

use crate::config::{ANALOG_INPUT_COUNT, I2C_FREQUENCY_HZ, SERIAL_BAUDRATE};
#[cfg(feature = "sd-log")]
use crate::config::SD_SPI_FREQUENCY_HZ;

// ── IRQ table ─────────────────────────────────────────────
bind_interrupts!(pub struct Irqs {
    I2C2   => i2c::EventInterruptHandler<peripherals::I2C2>,
              i2c::ErrorInterruptHandler<peripherals::I2C2>;
});

/// SPI bus and chip select of the micro-SD socket.
#[cfg(feature = "sd-log")]
pub struct SdParts {
    pub spi: spi::Spi<'static, Blocking>,
    pub cs: Output<'static>,
}

// ── Board struct ──────────────────────────────────────────
pub struct Board {
    pub serial: UartTx<'static, Async>, // DMA, host link
    pub i2c: i2c::I2c<'static, Async>,  // DMA, IMU
    pub adc: Adc<'static, ADC1>,
    /// PA0, PA1, PB0, PB1
    pub analog_pins: [AnyAdcChannel<ADC1>; ANALOG_INPUT_COUNT],
    #[cfg(feature = "sd-log")]
    pub sd: SdParts,
}

impl Board {
    pub fn init() -> Self {
        let mut config = Config::default();

        // HSI16 -> PLL -> 64MHz SYSCLK
        config.rcc.hsi = Some(rcc::Hsi {
            sys_div: rcc::HsiSysDiv::DIV1,
        });
        config.rcc.pll = Some(rcc::Pll {
            source: rcc::PllSource::HSI,
            prediv: rcc::PllPreDiv::DIV2,   // 16MHz / 2 = 8MHz
            mul: rcc::PllMul::MUL16,        // 8MHz * 16 = 128MHz
            divp: None,
            divq: None,
            divr: Some(rcc::PllRDiv::DIV2), // 128MHz / 2 = 64MHz
        });
        config.rcc.sys = rcc::Sysclk::PLL1_R;
        let p = embassy_stm32::init(config);

        // USART2 is routed to the debug probe's virtual COM port
        let mut us_cfg = UsartConfig::default();
        us_cfg.baudrate = SERIAL_BAUDRATE;
        let serial = UartTx::new(p.USART2, p.PA2, p.DMA1_CH1, us_cfg).unwrap();

        // I²C2  (DMA CH7 TX, CH6 RX)
        let mut i2c_cfg = i2c::Config::default();
        i2c_cfg.sda_pullup = false;
        i2c_cfg.scl_pullup = false;

        let i2c = i2c::I2c::new(
            p.I2C2,
            p.PB10,
            p.PB11,
            Irqs,
            p.DMA1_CH7,
            p.DMA1_CH6,
            Hertz(I2C_FREQUENCY_HZ),
            i2c_cfg,
        );

        // ADC1 at 10 bits; slow sampling for the high impedance sensor dividers
        let mut adc = Adc::new(p.ADC1);
        adc.set_resolution(Resolution::BITS10);
        adc.set_sample_time(SampleTime::CYCLES79_5);
        let analog_pins = [
            p.PA0.degrade_adc(), // IN0
            p.PA1.degrade_adc(), // IN1
            p.PB0.degrade_adc(), // IN8
            p.PB1.degrade_adc(), // IN9
        ];

        // SPI2 for the SD card, kept at init speed
        #[cfg(feature = "sd-log")]
        let sd = {
            let mut spi_cfg = spi::Config::default();
            spi_cfg.mode = spi::MODE_0;
            spi_cfg.frequency = Hertz(SD_SPI_FREQUENCY_HZ);
            let spi = spi::Spi::new_blocking(p.SPI2, p.PB13, p.PB15, p.PB14, spi_cfg);
            let cs = Output::new(p.PB12, Level::High, Speed::VeryHigh);
            SdParts { spi, cs }
        };

        Self {
            serial,
            i2c,
            adc,
            analog_pins,
            #[cfg(feature = "sd-log")]
            sd,
        }
    }
}
