mod book_events;
mod order_events;

pub use book_events::BookUpdateEvent;
pub use order_events::{
    OrderCancelledEvent, OrderCreatedEvent, OrderExpiredEvent, OrderFilledEvent,
};

use serde::{Deserialize, Serialize};

/// Routing key for event bus subscriptions
///
/// Listeners subscribe by tag, not by payload type; publishing dispatches on
/// `MarketEvent::tag()`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EventTag {
    OrderCreated,
    OrderFilled,
    OrderCancelled,
    OrderExpired,
    BookSnapshot,
    BookDiff,
}

/// An event routed through the event bus
///
/// Payloads are opaque to the core: the bus and logger route on the tag and
/// never interpret the contents.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum MarketEvent {
    OrderCreated(OrderCreatedEvent),
    OrderFilled(OrderFilledEvent),
    OrderCancelled(OrderCancelledEvent),
    OrderExpired(OrderExpiredEvent),
    BookSnapshot(BookUpdateEvent),
    BookDiff(BookUpdateEvent),
}

impl MarketEvent {
    /// The routing tag for this event
    pub fn tag(&self) -> EventTag {
        match self {
            MarketEvent::OrderCreated(_) => EventTag::OrderCreated,
            MarketEvent::OrderFilled(_) => EventTag::OrderFilled,
            MarketEvent::OrderCancelled(_) => EventTag::OrderCancelled,
            MarketEvent::OrderExpired(_) => EventTag::OrderExpired,
            MarketEvent::BookSnapshot(_) => EventTag::BookSnapshot,
            MarketEvent::BookDiff(_) => EventTag::BookDiff,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value_objects::MarketId;
    use chrono::Utc;

    #[test]
    fn test_tag_routing() {
        let event = MarketEvent::BookDiff(BookUpdateEvent {
            market: MarketId::new("binance"),
            trading_pair: "BTC-USDT".parse().unwrap(),
            update_id: 7,
            timestamp: Utc::now(),
        });
        assert_eq!(event.tag(), EventTag::BookDiff);
    }
}
