use embassy_time::Instant;
use glove_core::Clock;

/// Milliseconds since boot from the embassy time driver, truncated to 32 bits.
#[derive(Debug, Clone, Copy, Default)]
pub struct UptimeClock;

impl Clock for UptimeClock {
    fn now_ms(&self) -> u32 {
        Instant::now().as_millis() as u32
    }
}
