use crate::Clock;
use chrono::{Duration, Utc};
use parking_lot::RwLock;
use triton_core::Timestamp;

/// Simulated clock for deterministic tests and backtests
///
/// Time is frozen at construction and only moves via [`advance`](Self::advance)
/// or [`set_time`](Self::set_time). Shared across components behind an `Arc`.
pub struct SimClock {
    current: RwLock<Timestamp>,
}

impl SimClock {
    /// Create a clock frozen at the current wall time
    pub fn new() -> Self {
        Self::at(Utc::now())
    }

    /// Create a clock frozen at a specific time
    pub fn at(start: Timestamp) -> Self {
        SimClock {
            current: RwLock::new(start),
        }
    }

    /// Advance the simulated time by a duration
    pub fn advance(&self, duration: Duration) {
        let mut current = self.current.write();
        *current += duration;
    }

    /// Explicitly set the simulated time
    ///
    /// Moving time backwards can confuse expiry queues; tests should only
    /// move forward.
    pub fn set_time(&self, time: Timestamp) {
        let mut current = self.current.write();
        *current = time;
    }
}

impl Default for SimClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for SimClock {
    fn now(&self) -> Timestamp {
        *self.current.read()
    }

    fn name(&self) -> &str {
        "SimClock"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_time_is_frozen() {
        let clock = SimClock::new();
        let time1 = clock.now();
        std::thread::sleep(std::time::Duration::from_millis(5));
        assert_eq!(clock.now(), time1);
    }

    #[test]
    fn test_advance() {
        let clock = SimClock::new();
        let start = clock.now();
        clock.advance(Duration::seconds(180));
        assert_eq!(clock.now() - start, Duration::seconds(180));
    }
}
