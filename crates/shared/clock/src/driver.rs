use crate::Clock;
use parking_lot::Mutex;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;
use tokio::sync::Notify;
use triton_core::Timestamp;

/// A component driven by the global clock cycle
///
/// `tick` is invoked once per driver cycle with the clock's current time.
/// Implementations must complete synchronously within the tick.
pub trait Tickable: Send {
    fn tick(&mut self, now: Timestamp);
}

/// Cooperative tick loop for a single session
///
/// Owns the registered tickables and calls them in registration order each
/// cycle. One driver per logical session; all mutation of tick-driven state
/// happens from this one task.
pub struct ClockDriver {
    clock: Arc<dyn Clock>,
    tick_interval: Duration,
    tickables: Vec<Arc<Mutex<dyn Tickable>>>,
    stopping: Arc<AtomicBool>,
    stop_signal: Arc<Notify>,
}

impl ClockDriver {
    pub fn new(clock: Arc<dyn Clock>, tick_interval: Duration) -> Self {
        ClockDriver {
            clock,
            tick_interval,
            tickables: Vec::new(),
            stopping: Arc::new(AtomicBool::new(false)),
            stop_signal: Arc::new(Notify::new()),
        }
    }

    /// Register a component to be ticked each cycle
    pub fn register(&mut self, tickable: Arc<Mutex<dyn Tickable>>) {
        self.tickables.push(tickable);
    }

    /// Run a single tick cycle at the clock's current time
    ///
    /// Backtests call this directly with a [`SimClock`](crate::SimClock)
    /// between manual time advances.
    pub fn tick_once(&self) {
        let now = self.clock.now();
        for tickable in &self.tickables {
            tickable.lock().tick(now);
        }
    }

    /// A handle that makes a concurrent `run` return after its current cycle
    pub fn stopper(&self) -> DriverStopper {
        DriverStopper {
            stopping: Arc::clone(&self.stopping),
            stop_signal: Arc::clone(&self.stop_signal),
        }
    }

    /// Tick all registered components until stopped
    pub async fn run(&self) {
        tracing::debug!(
            clock = self.clock.name(),
            interval = ?self.tick_interval,
            tickables = self.tickables.len(),
            "clock driver started"
        );
        while !self.stopping.load(Ordering::Acquire) {
            self.tick_once();
            tokio::select! {
                _ = self.stop_signal.notified() => {}
                _ = tokio::time::sleep(self.tick_interval) => {}
            }
        }
        tracing::debug!(clock = self.clock.name(), "clock driver stopped");
    }
}

/// Stops a running [`ClockDriver`]
pub struct DriverStopper {
    stopping: Arc<AtomicBool>,
    stop_signal: Arc<Notify>,
}

impl DriverStopper {
    pub fn stop(&self) {
        self.stopping.store(true, Ordering::Release);
        self.stop_signal.notify_one();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::SimClock;
    use chrono::Duration as ChronoDuration;

    struct Counter {
        ticks: usize,
        last_seen: Option<Timestamp>,
    }

    impl Tickable for Counter {
        fn tick(&mut self, now: Timestamp) {
            self.ticks += 1;
            self.last_seen = Some(now);
        }
    }

    #[test]
    fn test_tick_once_visits_all_tickables() {
        let clock = Arc::new(SimClock::new());
        let mut driver = ClockDriver::new(clock.clone(), Duration::from_millis(10));

        let a = Arc::new(Mutex::new(Counter {
            ticks: 0,
            last_seen: None,
        }));
        let b = Arc::new(Mutex::new(Counter {
            ticks: 0,
            last_seen: None,
        }));
        driver.register(a.clone());
        driver.register(b.clone());

        driver.tick_once();
        clock.advance(ChronoDuration::seconds(1));
        driver.tick_once();

        assert_eq!(a.lock().ticks, 2);
        assert_eq!(b.lock().ticks, 2);
        assert_eq!(b.lock().last_seen, Some(clock.now()));
    }

    #[tokio::test]
    async fn test_run_stops_on_signal() {
        let clock = Arc::new(SimClock::new());
        let mut driver = ClockDriver::new(clock, Duration::from_millis(1));

        let counter = Arc::new(Mutex::new(Counter {
            ticks: 0,
            last_seen: None,
        }));
        driver.register(counter.clone());

        let stopper = driver.stopper();
        let run = tokio::spawn(async move { driver.run().await });

        tokio::time::sleep(Duration::from_millis(20)).await;
        stopper.stop();
        run.await.unwrap();

        assert!(counter.lock().ticks >= 1);
    }
}
