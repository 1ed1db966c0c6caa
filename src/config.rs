// Board-level constants; sampling constants live in glove_core::config
pub use glove_core::config::{GLOVE_SAMPLE_INTERVAL_MS, SERIAL_BAUDRATE, VOLTAGE_PACING_MS};

pub const I2C_FREQUENCY_HZ: u32 = 100_000;
pub const SD_SPI_FREQUENCY_HZ: u32 = 400_000;

// Analog inputs wired to ADC1, in GloveChannel order
pub const ANALOG_INPUT_COUNT: usize = 4;

// Throughput report period of the sampling loops
pub const STATS_PERIOD_SECS: u64 = 1;
