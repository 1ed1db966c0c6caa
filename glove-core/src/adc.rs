//! Raw ADC counts and their conversion to volts.

use crate::config::{ADC_MAX_RAW, ADC_VREF};

/// Largest count an ADC of `bits` resolution can return.
pub const fn max_raw(bits: u8) -> u16 {
    ((1u32 << bits) - 1) as u16
}

/// Converts a raw count into volts against the fixed reference.
///
/// The arithmetic is done in `f32`, in the same order as the board firmware
/// always did it: `raw * vref / max_raw`.
pub fn raw_to_voltage(raw: u16) -> f32 {
    (raw as f32 * ADC_VREF) / ADC_MAX_RAW as f32
}

/// A fixed set of analog inputs read together once per sample.
///
/// Reads block until the conversion completes and never fail; implementations
/// return counts in `0..=ADC_MAX_RAW`.
pub trait AnalogBank<const N: usize> {
    fn read_raw(&mut self) -> [u16; N];
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum VoltageChannel {
    Velostat = 0,
    Fsr = 1,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum GloveChannel {
    FlexThumb = 0,
    FlexIndex = 1,
    FsrThumb = 2,
    FsrIndex = 3,
}

impl VoltageChannel {
    pub const COUNT: usize = 2;

    pub const fn index(self) -> usize {
        self as usize
    }
}

impl GloveChannel {
    pub const COUNT: usize = 4;

    pub const fn index(self) -> usize {
        self as usize
    }
}

/// Clamps a conversion result into the configured resolution.
pub fn clamp_raw(raw: u16) -> u16 {
    raw.min(ADC_MAX_RAW)
}
