use defmt::*;
use embassy_stm32::gpio::Output;
use embassy_stm32::mode::Blocking;
use embassy_stm32::spi::Spi;
use embassy_time::Delay;
use embedded_hal_bus::spi::ExclusiveDevice;
use embedded_io_async::{ErrorKind, ErrorType, Write};
use embedded_sdmmc::{
    Mode, RawFile, SdCard, SdCardError, TimeSource, Timestamp, VolumeIdx, VolumeManager,
};
use glove_core::config::LOG_FILE_NAME;

use crate::board::SdParts;

type SdSpi = ExclusiveDevice<Spi<'static, Blocking>, Output<'static>, Delay>;
type SdVolumes = VolumeManager<SdCard<SdSpi, Delay>, BootTime>;

/// The board has no RTC; every file entry carries the FAT epoch.
pub struct BootTime;

impl TimeSource for BootTime {
    fn get_timestamp(&self) -> Timestamp {
        Timestamp {
            year_since_1970: 10, // FAT dates start at 1980
            zero_indexed_month: 0,
            zero_indexed_day: 0,
            hours: 0,
            minutes: 0,
            seconds: 0,
        }
    }
}

#[derive(Debug, Format)]
pub struct SdLogError(pub embedded_sdmmc::Error<SdCardError>);

impl embedded_io_async::Error for SdLogError {
    fn kind(&self) -> ErrorKind {
        ErrorKind::Other
    }
}

/// `log.csv` in the root directory of the first FAT volume, opened for append.
pub struct SdLogFile {
    volumes: SdVolumes,
    file: RawFile,
}

impl SdLogFile {
    pub fn open(parts: SdParts) -> Result<Self, SdLogError> {
        let spi = ExclusiveDevice::new(parts.spi, parts.cs, Delay).unwrap_or_else(|e| match e {});
        let card = SdCard::new(spi, Delay);

        // Forces card initialization so a missing card fails here
        let size = card
            .num_bytes()
            .map_err(|e| SdLogError(embedded_sdmmc::Error::DeviceError(e)))?;
        info!("SD card detected: {} bytes", size);

        let volumes = VolumeManager::new(card, BootTime);
        let volume = volumes.open_raw_volume(VolumeIdx(0)).map_err(SdLogError)?;
        let root = volumes.open_root_dir(volume).map_err(SdLogError)?;
        let file = volumes
            .open_file_in_dir(root, LOG_FILE_NAME, Mode::ReadWriteCreateOrAppend)
            .map_err(SdLogError)?;
        info!("Appending to {}", LOG_FILE_NAME);

        Ok(Self { volumes, file })
    }
}

impl ErrorType for SdLogFile {
    type Error = SdLogError;
}

// embedded-sdmmc is blocking; each call completes before returning
impl Write for SdLogFile {
    async fn write(&mut self, buf: &[u8]) -> Result<usize, SdLogError> {
        self.volumes.write(self.file, buf).map_err(SdLogError)?;
        Ok(buf.len())
    }

    async fn flush(&mut self) -> Result<(), SdLogError> {
        self.volumes.flush_file(self.file).map_err(SdLogError)
    }
}
