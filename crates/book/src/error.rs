//! Order book errors

use thiserror::Error;
use triton_core::Side;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BookError {
    /// A price/volume query hit a side with zero levels. This is a hard
    /// failure: strategies must never act on a fabricated price.
    #[error("order book is empty on the {side} side")]
    EmptyBook { side: Side },

    /// Snapshot input failed validation; the book is left untouched.
    #[error("malformed snapshot: {reason}")]
    MalformedSnapshot { reason: String },
}

pub type BookResult<T> = std::result::Result<T, BookError>;
