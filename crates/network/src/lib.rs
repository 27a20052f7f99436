//! Triton Connection Supervision
//!
//! Venue sessions flap. The [`ConnectionSupervisor`] owns the connectivity
//! state for one session: it probes the venue on a fixed cadence, flips
//! [`NetworkStatus`] on probe results, and calls the session's start/stop
//! hooks exactly on the transitions into and out of `Connected`.
//!
//! A probe timeout is treated as transient network weather; a probe that
//! returns an error is treated as a bug or protocol break and backs off
//! harder. Neither is fatal to the supervisor itself.

mod status;
mod supervisor;

pub use status::NetworkStatus;
pub use supervisor::{ConnectionHandler, ConnectionSupervisor, SupervisorConfig};
