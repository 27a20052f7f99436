//! Triton Clock Infrastructure
//!
//! Time abstractions plus the cooperative tick driver:
//!
//! - [`Clock`] — the time port. Production code reads the [`SystemClock`];
//!   tests read a [`SimClock`] that only moves when told to.
//! - [`Tickable`] — implemented by components that need a periodic heartbeat
//!   (order registry expiry sweeps, composite-book ledger pruning).
//! - [`ClockDriver`] — ticks every registered component once per cycle from a
//!   single task. Components never mutate each other: the driver is the only
//!   caller of `tick`, which is what keeps book and registry mutations
//!   serialized without locks on the hot path.

mod driver;
mod sim;
mod system;

pub use driver::{ClockDriver, Tickable};
pub use sim::SimClock;
pub use system::SystemClock;

use triton_core::Timestamp;

/// Port for time abstraction
///
/// Lets the same component run against real wall-clock time in production
/// and a manually-advanced clock in deterministic tests.
pub trait Clock: Send + Sync {
    /// Get the current time according to this clock
    fn now(&self) -> Timestamp;

    /// Get the clock's name/identifier for debugging
    fn name(&self) -> &str {
        "Clock"
    }
}
