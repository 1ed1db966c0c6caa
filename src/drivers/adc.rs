use embassy_stm32::adc::{Adc, AnyAdcChannel};
use embassy_stm32::peripherals::ADC1;
use glove_core::adc::{clamp_raw, AnalogBank};

/// A fixed group of ADC1 inputs converted back to back with blocking reads.
pub struct AdcBank<const N: usize> {
    adc: Adc<'static, ADC1>,
    channels: [AnyAdcChannel<ADC1>; N],
}

impl<const N: usize> AdcBank<N> {
    pub fn new(adc: Adc<'static, ADC1>, channels: [AnyAdcChannel<ADC1>; N]) -> Self {
        Self { adc, channels }
    }
}

impl<const N: usize> AnalogBank<N> for AdcBank<N> {
    fn read_raw(&mut self) -> [u16; N] {
        let mut raw = [0u16; N];
        for (slot, channel) in raw.iter_mut().zip(self.channels.iter_mut()) {
            *slot = clamp_raw(self.adc.blocking_read(channel));
        }
        raw
    }
}
