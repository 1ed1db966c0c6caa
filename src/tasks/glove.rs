use defmt::*;
use embassy_futures::yield_now;
use embassy_time::Duration;
use embedded_io_async::Write;
use glove_core::adc::{AnalogBank, GloveChannel};
use glove_core::{Clock, Emitter, GloveSampler, MotionSensor};

use super::LineRate;
use crate::config::{GLOVE_SAMPLE_INTERVAL_MS, STATS_PERIOD_SECS};

/// Busy-polls the cadence gate and emits one CSV line per elapsed interval.
pub async fn run_glove<A, M, C, P, S>(
    mut sampler: GloveSampler<A, M, C>,
    mut emitter: Emitter<P, S>,
) -> !
where
    A: AnalogBank<{ GloveChannel::COUNT }>,
    M: MotionSensor,
    C: Clock,
    P: Write,
    S: Write,
{
    info!(
        "Glove sampler started - {}ms interval, log file {}",
        GLOVE_SAMPLE_INTERVAL_MS,
        emitter.has_secondary()
    );
    let mut rate = LineRate::new("glove", Duration::from_secs(STATS_PERIOD_SECS));

    loop {
        match sampler.pass(&mut emitter).await {
            Some(_) => rate.record(),
            None => yield_now().await,
        }
    }
}
