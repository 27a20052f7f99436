use crate::entities::{LimitOrder, MarketOrder};
use crate::value_objects::{MarketId, OrderId, Price, Quantity, Side, Timestamp, TradingPair};
use serde::{Deserialize, Serialize};

/// Emitted when the engine starts tracking an order after the venue
/// acknowledged its creation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderCreatedEvent {
    pub order_id: OrderId,
    pub market: MarketId,
    pub trading_pair: TradingPair,
    pub side: Side,
    /// None for market orders
    pub price: Option<Price>,
    pub quantity: Quantity,
    pub timestamp: Timestamp,
}

impl From<&LimitOrder> for OrderCreatedEvent {
    fn from(order: &LimitOrder) -> Self {
        OrderCreatedEvent {
            order_id: order.order_id.clone(),
            market: order.market.clone(),
            trading_pair: order.trading_pair.clone(),
            side: order.side,
            price: Some(order.price),
            quantity: order.quantity,
            timestamp: order.created_at,
        }
    }
}

impl From<&MarketOrder> for OrderCreatedEvent {
    fn from(order: &MarketOrder) -> Self {
        OrderCreatedEvent {
            order_id: order.order_id.clone(),
            market: order.market.clone(),
            trading_pair: order.trading_pair.clone(),
            side: order.side,
            price: None,
            quantity: order.quantity,
            timestamp: order.created_at,
        }
    }
}

/// A (partial) fill reported by the venue
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderFilledEvent {
    pub order_id: OrderId,
    pub market: MarketId,
    pub trading_pair: TradingPair,
    pub side: Side,
    pub price: Price,
    pub quantity: Quantity,
    pub timestamp: Timestamp,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderCancelledEvent {
    pub order_id: OrderId,
    pub market: MarketId,
    pub timestamp: Timestamp,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderExpiredEvent {
    pub order_id: OrderId,
    pub market: MarketId,
    pub timestamp: Timestamp,
}
