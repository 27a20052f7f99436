//! Triton Event Bus
//!
//! Decouples event producers (order registry, book appliers, connectors)
//! from consumers (strategies, loggers, test harnesses) via a routing tag
//! rather than a type hierarchy.
//!
//! ```text
//! OrderRegistry ──publish──► ┌──────────┐ ──on_event──► Strategy listener
//! Connectors    ──publish──► │ EventBus │ ──on_event──► EventLogger ──wait_for──► tests
//! Book appliers ──publish──► └──────────┘
//! ```
//!
//! Publication is synchronous and in registration order; listeners run after
//! the producer's state is settled, never mid-mutation.

mod bus;
mod error;
mod logger;

pub use bus::{EventBus, EventListener};
pub use error::{WaitError, WaitResult};
pub use logger::{DEFAULT_EVENT_CAPACITY, EventLogger};
