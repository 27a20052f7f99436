use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Unique identifier for a trading venue session, normalized to lowercase
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MarketId(String);

impl MarketId {
    pub fn new(id: impl Into<String>) -> Self {
        MarketId(id.into().to_lowercase())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for MarketId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for MarketId {
    fn from(s: &str) -> Self {
        MarketId::new(s)
    }
}

impl From<String> for MarketId {
    fn from(s: String) -> Self {
        MarketId::new(s)
    }
}

/// Client-assigned order identifier
///
/// The engine is the authority on these ids; exchange-assigned ids are a
/// connector concern and never enter the core.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct OrderId(String);

impl OrderId {
    pub fn new(id: impl Into<String>) -> Self {
        OrderId(id.into())
    }

    /// Generate a fresh random order id
    pub fn random() -> Self {
        OrderId(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for OrderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for OrderId {
    fn from(s: &str) -> Self {
        OrderId::new(s)
    }
}

impl From<String> for OrderId {
    fn from(s: String) -> Self {
        OrderId::new(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_market_id_normalization() {
        let id = MarketId::new("Binance");
        assert_eq!(id.as_str(), "binance");
        assert_eq!(id, MarketId::from("BINANCE"));
    }

    #[test]
    fn test_random_order_ids_are_unique() {
        assert_ne!(OrderId::random(), OrderId::random());
    }
}
