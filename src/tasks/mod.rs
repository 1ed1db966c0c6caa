pub mod glove;
pub mod voltage;

pub use glove::run_glove;
pub use voltage::run_voltage;

use defmt::*;
use embassy_time::{Duration, Instant};

/// Parks the firmware forever after a fatal startup failure.
pub async fn halt() -> ! {
    error!("halted");
    loop {
        core::future::pending::<()>().await;
    }
}

/// Counts emitted lines and reports the rate once per period.
pub(crate) struct LineRate {
    label: &'static str,
    period: Duration,
    since: Instant,
    lines: u32,
}

impl LineRate {
    pub(crate) fn new(label: &'static str, period: Duration) -> Self {
        Self {
            label,
            period,
            since: Instant::now(),
            lines: 0,
        }
    }

    pub(crate) fn record(&mut self) {
        self.lines += 1;
        let now = Instant::now();
        let elapsed = now.duration_since(self.since);
        if elapsed >= self.period {
            info!(
                "{}: {} lines in {} ms",
                self.label,
                self.lines,
                elapsed.as_millis()
            );
            self.lines = 0;
            self.since = now;
        }
    }
}
