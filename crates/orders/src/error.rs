//! Order registry errors

use thiserror::Error;
use triton_core::MarketId;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RegistryError {
    /// Tracking was requested for a market never registered with the
    /// registry; there is no trading-pair metadata to attach to the order.
    #[error("unknown market: {market}")]
    UnknownMarket { market: MarketId },
}

pub type RegistryResult<T> = std::result::Result<T, RegistryError>;
