use std::fmt;

/// Connectivity state of one venue session
///
/// Only the supervisor mutates this; everyone else reads it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NetworkStatus {
    /// The supervisor is not running. Terminal until the next `start`.
    Stopped,
    /// The supervisor is running but the last probe did not succeed
    NotConnected,
    /// The last probe succeeded
    Connected,
}

impl fmt::Display for NetworkStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            NetworkStatus::Stopped => "stopped",
            NetworkStatus::NotConnected => "not_connected",
            NetworkStatus::Connected => "connected",
        };
        write!(f, "{label}")
    }
}
