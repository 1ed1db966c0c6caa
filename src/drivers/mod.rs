pub mod adc;
pub mod clock;
pub mod imu;
#[cfg(feature = "sd-log")]
pub mod sd_log;

pub use adc::AdcBank;
pub use clock::UptimeClock;
pub use imu::{ImuError, Lsm9ds1};
#[cfg(feature = "sd-log")]
pub use sd_log::SdLogFile;
