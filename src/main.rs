#![no_std]
#![no_main]

use defmt::*;
use embassy_executor::Spawner;
use {defmt_rtt as _, panic_probe as _};

use glove_core::{config::GLOVE_SAMPLE_INTERVAL_MS, sampler::imu_or_report, Emitter, GloveSampler};
#[cfg(feature = "sd-log")]
use glove_embassy::drivers::SdLogFile;
use glove_embassy::{
    drivers::{imu::create_default_imu, AdcBank, UptimeClock},
    tasks::{halt, run_glove},
    Board,
};

#[cfg(feature = "sd-log")]
type LogFile = SdLogFile;
#[cfg(not(feature = "sd-log"))]
type LogFile = glove_core::NoSecondary;

#[embassy_executor::main]
async fn main(_spawner: Spawner) {
    info!("Starting glove sampler");
    let board = Board::init();

    // A UART has no host-open signal, the link is usable once configured
    let mut emitter: Emitter<_, LogFile> = Emitter::new(board.serial, None);

    let imu = match imu_or_report(create_default_imu(board.i2c).await, &mut emitter).await {
        Ok(imu) => imu,
        Err(_) => halt().await,
    };

    #[cfg(feature = "sd-log")]
    {
        let opened = SdLogFile::open(board.sd);
        if let Err(e) = &opened {
            error!("log file unavailable: {:?}", e);
        }
        emitter.attach_secondary(opened).await;
    }

    let sampler = GloveSampler::new(
        AdcBank::new(board.adc, board.analog_pins),
        imu,
        UptimeClock,
        GLOVE_SAMPLE_INTERVAL_MS,
    );
    sampler.announce(&mut emitter).await;

    run_glove(sampler, emitter).await
}
