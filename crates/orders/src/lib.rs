//! Triton Order Registry
//!
//! The single source of truth for the engine's own open orders, deliberately
//! more conservative than the venue's reported order state:
//!
//! - removed limit orders linger as **shadow records** for a grace period,
//!   because fill/cancel confirmations can arrive after the engine believes
//!   an order is gone;
//! - cancel requests are deduplicated through time-bounded **in-flight
//!   cancel** markers, so retry loops cannot trigger duplicate-cancel storms;
//! - orders whose creation acknowledgement has not arrived yet sit in a
//!   **pending-created** set, and cancels against them are rejected locally
//!   (there is nothing remote to cancel).
//!
//! All idempotency here is local and time-bounded, not globally coordinated.
//! Within the cancel window a duplicate is suppressed even if the first
//! request was lost; after the window a retry is allowed even if the first
//! request is still outstanding remotely. Both trade-offs are accepted in
//! favor of liveness.

mod error;
mod registry;

pub use error::{RegistryError, RegistryResult};
pub use registry::{MarketInfo, OrderRegistry, RegistryConfig};
