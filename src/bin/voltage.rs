#![no_std]
#![no_main]

use defmt::*;
use embassy_executor::Spawner;
use {defmt_rtt as _, panic_probe as _};

use glove_core::{Emitter, VoltageSampler};
use glove_embassy::{drivers::AdcBank, tasks::run_voltage, Board};

#[embassy_executor::main]
async fn main(_spawner: Spawner) {
    info!("Starting velostat/FSR voltage bench");
    let board = Board::init();

    // velostat on PA0, FSR on PA1
    let [velostat, fsr, _, _] = board.analog_pins;
    let sampler = VoltageSampler::new(AdcBank::new(board.adc, [velostat, fsr]));

    let mut emitter = Emitter::serial_only(board.serial);
    sampler.announce(&mut emitter).await;

    run_voltage(sampler, emitter).await
}
