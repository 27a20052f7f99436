use crate::value_objects::{MarketId, OrderId, Price, Quantity, Side, Timestamp, TradingPair};
use serde::{Deserialize, Serialize};

/// Composite key for the engine's own orders: the same client order id may
/// exist on two venues, so registries key on (market, order id) rather than
/// the order id alone.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct OrderRef {
    pub market: MarketId,
    pub order_id: OrderId,
}

impl OrderRef {
    pub fn new(market: MarketId, order_id: OrderId) -> Self {
        OrderRef { market, order_id }
    }
}

/// A limit order the engine has placed and is tracking locally
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LimitOrder {
    pub order_id: OrderId,
    pub market: MarketId,
    pub trading_pair: TradingPair,
    pub side: Side,
    pub price: Price,
    pub quantity: Quantity,
    pub created_at: Timestamp,
}

impl LimitOrder {
    pub fn order_ref(&self) -> OrderRef {
        OrderRef::new(self.market.clone(), self.order_id.clone())
    }
}

/// A market order the engine has placed and is tracking locally
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MarketOrder {
    pub order_id: OrderId,
    pub market: MarketId,
    pub trading_pair: TradingPair,
    pub side: Side,
    pub quantity: Quantity,
    pub created_at: Timestamp,
}

impl MarketOrder {
    pub fn order_ref(&self) -> OrderRef {
        OrderRef::new(self.market.clone(), self.order_id.clone())
    }
}
