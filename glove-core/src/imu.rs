//! Accelerometer/gyroscope seam and the carry-forward state kept between ticks.

use crate::config::IMU_ERROR_LOG_EVERY;

#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Vector3 {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Vector3 {
    pub const ZERO: Self = Self::new(0.0, 0.0, 0.0);

    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }
}

/// An inertial sensor exposing separate accelerometer and gyroscope streams.
///
/// Acceleration is in g, angular rate in degrees per second. The sensor may
/// produce new data slower than it is polled, hence the `*_available` queries.
#[allow(async_fn_in_trait)]
pub trait MotionSensor {
    type Error;

    async fn acceleration_available(&mut self) -> Result<bool, Self::Error>;
    async fn read_acceleration(&mut self) -> Result<Vector3, Self::Error>;
    async fn gyroscope_available(&mut self) -> Result<bool, Self::Error>;
    async fn read_gyroscope(&mut self) -> Result<Vector3, Self::Error>;
}

/// Last known accelerometer and gyroscope readings.
///
/// Each stream is refreshed only when the sensor reports a new sample, so the
/// emitted values stay put until the next one lands.
#[derive(Debug, Default)]
pub struct MotionState {
    accel: Vector3,
    gyro: Vector3,
    error_count: u32,
    consecutive_errors: u32,
}

impl MotionState {
    pub const fn new() -> Self {
        Self {
            accel: Vector3::ZERO,
            gyro: Vector3::ZERO,
            error_count: 0,
            consecutive_errors: 0,
        }
    }

    pub fn accel(&self) -> Vector3 {
        self.accel
    }

    pub fn gyro(&self) -> Vector3 {
        self.gyro
    }

    pub fn error_count(&self) -> u32 {
        self.error_count
    }

    pub async fn refresh<M: MotionSensor>(&mut self, sensor: &mut M) {
        let accel = match sensor.acceleration_available().await {
            Ok(true) => sensor.read_acceleration().await.map(Some),
            Ok(false) => Ok(None),
            Err(e) => Err(e),
        };
        let accel_ok = self.absorb(accel, |state, v| state.accel = v);

        let gyro = match sensor.gyroscope_available().await {
            Ok(true) => sensor.read_gyroscope().await.map(Some),
            Ok(false) => Ok(None),
            Err(e) => Err(e),
        };
        let gyro_ok = self.absorb(gyro, |state, v| state.gyro = v);

        if accel_ok && gyro_ok && self.consecutive_errors > 0 {
            info!(
                "IMU recovered after {} consecutive errors",
                self.consecutive_errors
            );
            self.consecutive_errors = 0;
        }
    }

    // A failed query counts as "no new sample"; the previous value is kept.
    fn absorb<E>(
        &mut self,
        reading: Result<Option<Vector3>, E>,
        store: impl FnOnce(&mut Self, Vector3),
    ) -> bool {
        match reading {
            Ok(Some(v)) => {
                store(self, v);
                true
            }
            Ok(None) => true,
            Err(_) => {
                self.error_count = self.error_count.wrapping_add(1);
                self.consecutive_errors = self.consecutive_errors.saturating_add(1);
                if self.consecutive_errors % IMU_ERROR_LOG_EVERY == 1 {
                    warn!("IMU read error #{}, keeping last values", self.error_count);
                }
                false
            }
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use embassy_futures::block_on;

    /// Scripted sensor: each refresh pops one availability flag per stream.
    #[derive(Default)]
    pub(crate) struct ScriptedImu {
        pub accel: Vec<Option<Vector3>>,
        pub gyro: Vec<Option<Vector3>>,
        pub fail_accel: bool,
        pending_accel: Option<Vector3>,
        pending_gyro: Option<Vector3>,
    }

    impl ScriptedImu {
        pub(crate) fn new(accel: Vec<Option<Vector3>>, gyro: Vec<Option<Vector3>>) -> Self {
            Self {
                accel,
                gyro,
                ..Default::default()
            }
        }
    }

    #[derive(Debug, PartialEq)]
    pub(crate) struct BusError;

    impl MotionSensor for ScriptedImu {
        type Error = BusError;

        async fn acceleration_available(&mut self) -> Result<bool, BusError> {
            if self.fail_accel {
                return Err(BusError);
            }
            self.pending_accel = if self.accel.is_empty() {
                None
            } else {
                self.accel.remove(0)
            };
            Ok(self.pending_accel.is_some())
        }

        async fn read_acceleration(&mut self) -> Result<Vector3, BusError> {
            self.pending_accel.take().ok_or(BusError)
        }

        async fn gyroscope_available(&mut self) -> Result<bool, BusError> {
            self.pending_gyro = if self.gyro.is_empty() {
                None
            } else {
                self.gyro.remove(0)
            };
            Ok(self.pending_gyro.is_some())
        }

        async fn read_gyroscope(&mut self) -> Result<Vector3, BusError> {
            self.pending_gyro.take().ok_or(BusError)
        }
    }

    #[test]
    fn starts_at_zero() {
        let state = MotionState::new();
        assert_eq!(state.accel(), Vector3::ZERO);
        assert_eq!(state.gyro(), Vector3::ZERO);
    }

    #[test]
    fn missing_accel_sample_carries_forward() {
        let a1 = Vector3::new(0.1, -0.2, 0.98);
        let g1 = Vector3::new(1.5, 2.5, -3.5);
        let g2 = Vector3::new(4.0, 5.0, 6.0);
        let mut imu = ScriptedImu::new(vec![Some(a1), None], vec![Some(g1), Some(g2)]);
        let mut state = MotionState::new();

        block_on(state.refresh(&mut imu));
        assert_eq!(state.accel(), a1);
        assert_eq!(state.gyro(), g1);

        block_on(state.refresh(&mut imu));
        assert_eq!(state.accel(), a1, "accel must be carried forward");
        assert_eq!(state.gyro(), g2, "gyro refreshes independently");
    }

    #[test]
    fn missing_gyro_sample_carries_forward() {
        let a1 = Vector3::new(0.0, 0.0, 1.0);
        let a2 = Vector3::new(0.5, 0.0, 1.0);
        let g1 = Vector3::new(10.0, 0.0, 0.0);
        let mut imu = ScriptedImu::new(vec![Some(a1), Some(a2)], vec![Some(g1), None]);
        let mut state = MotionState::new();

        block_on(state.refresh(&mut imu));
        block_on(state.refresh(&mut imu));
        assert_eq!(state.accel(), a2);
        assert_eq!(state.gyro(), g1);
    }

    #[test]
    fn bus_error_is_tolerated_silently() {
        let a1 = Vector3::new(0.3, 0.3, 0.3);
        let mut imu = ScriptedImu::new(vec![Some(a1)], vec![]);
        let mut state = MotionState::new();
        block_on(state.refresh(&mut imu));

        imu.fail_accel = true;
        block_on(state.refresh(&mut imu));
        block_on(state.refresh(&mut imu));
        assert_eq!(state.accel(), a1);
        assert_eq!(state.error_count(), 2);

        imu.fail_accel = false;
        block_on(state.refresh(&mut imu));
        assert_eq!(state.accel(), a1);
        assert_eq!(state.error_count(), 2);
    }
}
