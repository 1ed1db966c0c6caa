use defmt::*;
use embassy_time::{Duration, Timer};
use embedded_io_async::Write;
use glove_core::adc::{AnalogBank, VoltageChannel};
use glove_core::{Emitter, VoltageSampler};

use super::LineRate;
use crate::config::{STATS_PERIOD_SECS, VOLTAGE_PACING_MS};

/// Samples, prints, then sleeps a fixed delay (~50 Hz, not drift corrected).
pub async fn run_voltage<A, P, S>(mut sampler: VoltageSampler<A>, mut emitter: Emitter<P, S>) -> !
where
    A: AnalogBank<{ VoltageChannel::COUNT }>,
    P: Write,
    S: Write,
{
    info!("Voltage sampler started - {}ms pacing", VOLTAGE_PACING_MS);
    let mut rate = LineRate::new("voltage", Duration::from_secs(STATS_PERIOD_SECS));

    loop {
        let sample = sampler.pass(&mut emitter).await;
        debug!(
            "velostat {} ({} V), fsr {} ({} V)",
            sample.raw_velostat, sample.voltage_velostat, sample.raw_fsr, sample.voltage_fsr
        );
        rate.record();
        Timer::after(Duration::from_millis(VOLTAGE_PACING_MS)).await;
    }
}
