//! Event bus errors

use std::time::Duration;
use thiserror::Error;
use triton_core::EventTag;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum WaitError {
    #[error("timed out after {timeout:?} waiting for {tag:?}")]
    Timeout { tag: EventTag, timeout: Duration },

    #[error("event logger dropped while waiting for {tag:?}")]
    Closed { tag: EventTag },
}

pub type WaitResult<T> = std::result::Result<T, WaitError>;
