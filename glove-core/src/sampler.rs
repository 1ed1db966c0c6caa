//! The two sampling loops, one pass at a time.
//!
//! The board firmware owns the forever loop and the pacing; everything that
//! decides *what* is read and emitted on a pass lives here.

use embedded_io_async::Write;

use crate::adc::{AnalogBank, GloveChannel, VoltageChannel};
use crate::cadence::{Cadence, Clock};
use crate::config::{CSV_HEADER, IMU_INIT_FAILED_LINE, VOLTAGE_BANNER};
use crate::imu::{MotionSensor, MotionState};
use crate::sample::{GloveSample, VoltageSample};
use crate::sink::Emitter;

/// Velostat + FSR bench sampler: reads and converts on every call.
pub struct VoltageSampler<A> {
    analog: A,
}

impl<A: AnalogBank<{ VoltageChannel::COUNT }>> VoltageSampler<A> {
    pub fn new(analog: A) -> Self {
        Self { analog }
    }

    pub fn sample(&mut self) -> VoltageSample {
        let raw = self.analog.read_raw();
        VoltageSample::from_raw(
            raw[VoltageChannel::Velostat.index()],
            raw[VoltageChannel::Fsr.index()],
        )
    }

    /// Startup banner, printed once before the first reading.
    pub async fn announce<P: Write, S: Write>(&self, emitter: &mut Emitter<P, S>) {
        for line in VOLTAGE_BANNER {
            emitter.diagnostic(line).await;
        }
    }

    /// Samples once and emits the human readable line.
    pub async fn pass<P: Write, S: Write>(&mut self, emitter: &mut Emitter<P, S>) -> VoltageSample {
        let sample = self.sample();
        match sample.to_line() {
            Ok(line) => emitter.emit(&line).await,
            Err(_) => error!("voltage line overflow"),
        }
        sample
    }
}

/// Glove sampler: flex and FSR channels plus IMU, gated by a fixed cadence.
pub struct GloveSampler<A, M, C> {
    analog: A,
    imu: M,
    clock: C,
    cadence: Cadence,
    motion: MotionState,
}

impl<A, M, C> GloveSampler<A, M, C>
where
    A: AnalogBank<{ GloveChannel::COUNT }>,
    M: MotionSensor,
    C: Clock,
{
    pub fn new(analog: A, imu: M, clock: C, interval_ms: u32) -> Self {
        Self {
            analog,
            imu,
            clock,
            cadence: Cadence::new(interval_ms),
            motion: MotionState::new(),
        }
    }

    /// CSV header, on the serial link and in the log file alike.
    pub async fn announce<P: Write, S: Write>(&self, emitter: &mut Emitter<P, S>) {
        emitter.emit(CSV_HEADER).await;
    }

    /// Produces a sample when the interval has elapsed, `None` otherwise.
    pub async fn tick(&mut self) -> Option<GloveSample> {
        let now = self.clock.now_ms();
        if !self.cadence.poll(now) {
            return None;
        }

        let raw = self.analog.read_raw();
        self.motion.refresh(&mut self.imu).await;

        Some(GloveSample {
            timestamp_ms: now,
            flex_thumb: raw[GloveChannel::FlexThumb.index()],
            flex_index: raw[GloveChannel::FlexIndex.index()],
            fsr_thumb: raw[GloveChannel::FsrThumb.index()],
            fsr_index: raw[GloveChannel::FsrIndex.index()],
            accel: self.motion.accel(),
            gyro: self.motion.gyro(),
        })
    }

    /// One loop iteration: at most one sample, at most one emitted line.
    pub async fn pass<P: Write, S: Write>(
        &mut self,
        emitter: &mut Emitter<P, S>,
    ) -> Option<GloveSample> {
        let sample = self.tick().await?;
        match sample.to_csv_line() {
            Ok(line) => emitter.emit(&line).await,
            Err(_) => error!("glove line overflow at t={}", sample.timestamp_ms),
        }
        Some(sample)
    }

    pub fn motion(&self) -> &MotionState {
        &self.motion
    }
}

/// Outcome of bringing up the IMU: there is no recovery from a failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ImuUnavailable;

/// Passes a working IMU through, or prints the single fatal diagnostic.
pub async fn imu_or_report<I, E, P: Write, S: Write>(
    init: Result<I, E>,
    emitter: &mut Emitter<P, S>,
) -> Result<I, ImuUnavailable> {
    match init {
        Ok(imu) => Ok(imu),
        Err(_) => {
            error!("IMU initialization failed");
            emitter.diagnostic(IMU_INIT_FAILED_LINE).await;
            Err(ImuUnavailable)
        }
    }
}
