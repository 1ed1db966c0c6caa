//! Fixed-interval sampling gate over a wrapping millisecond clock.

/// Monotonic milliseconds since boot, wrapping at `u32::MAX`.
pub trait Clock {
    fn now_ms(&self) -> u32;
}

/// Decides, on every poll, whether a full interval has elapsed since the last
/// sample. Polling never blocks.
#[derive(Debug, Clone)]
pub struct Cadence {
    interval_ms: u32,
    last_sample_ms: Option<u32>,
}

impl Cadence {
    pub const fn new(interval_ms: u32) -> Self {
        Self {
            interval_ms,
            last_sample_ms: None,
        }
    }

    pub fn interval_ms(&self) -> u32 {
        self.interval_ms
    }

    pub fn last_sample_ms(&self) -> Option<u32> {
        self.last_sample_ms
    }

    /// Returns `true` and records `now_ms` when a sample is due.
    ///
    /// The very first poll is always due. Elapsed time is computed with
    /// wrapping subtraction so the gate keeps working across the u32 rollover.
    pub fn poll(&mut self, now_ms: u32) -> bool {
        let due = match self.last_sample_ms {
            None => true,
            Some(last) => now_ms.wrapping_sub(last) >= self.interval_ms,
        };
        if due {
            self.last_sample_ms = Some(now_ms);
        }
        due
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_poll_fires() {
        let mut cadence = Cadence::new(10);
        assert!(cadence.poll(3));
        assert_eq!(cadence.last_sample_ms(), Some(3));
    }

    #[test]
    fn skips_until_interval_elapsed() {
        let mut cadence = Cadence::new(10);
        assert!(cadence.poll(1000));
        assert!(!cadence.poll(1008));
        assert_eq!(cadence.last_sample_ms(), Some(1000));
        assert!(cadence.poll(1011));
        assert_eq!(cadence.last_sample_ms(), Some(1011));
        assert!(!cadence.poll(1020));
        assert!(cadence.poll(1021));
    }

    #[test]
    fn survives_clock_rollover() {
        let mut cadence = Cadence::new(10);
        assert!(cadence.poll(u32::MAX - 4));
        assert!(!cadence.poll(2));
        assert!(cadence.poll(5));
    }

    #[test]
    fn emitted_stamps_never_closer_than_interval() {
        let mut cadence = Cadence::new(10);
        let mut emitted = Vec::new();
        for now in (0..500u32).step_by(3) {
            if cadence.poll(now) {
                emitted.push(now);
            }
        }
        assert!(emitted.len() > 1);
        for pair in emitted.windows(2) {
            assert!(pair[1] - pair[0] >= 10, "{:?}", pair);
        }
    }
}
