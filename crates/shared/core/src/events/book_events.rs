use crate::value_objects::{MarketId, Timestamp, TradingPair};
use serde::{Deserialize, Serialize};

/// Published by connectors after a snapshot or diff has been applied to a
/// local book
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookUpdateEvent {
    pub market: MarketId,
    pub trading_pair: TradingPair,
    pub update_id: u64,
    pub timestamp: Timestamp,
}
