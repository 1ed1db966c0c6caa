#![cfg_attr(not(test), no_std)]

// must stay first so the logging macros are visible to the other modules
#[macro_use]
mod fmt;

pub mod adc;
pub mod cadence;
pub mod config;
pub mod imu;
pub mod sample;
pub mod sampler;
pub mod sink;

pub use adc::{raw_to_voltage, AnalogBank};
pub use cadence::{Cadence, Clock};
pub use imu::{MotionSensor, MotionState, Vector3};
pub use sample::{GloveSample, VoltageSample};
pub use sampler::{GloveSampler, VoltageSampler};
pub use sink::{Emitter, NoSecondary};
