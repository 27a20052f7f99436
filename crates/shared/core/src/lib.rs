//! Triton Core
//!
//! Shared domain types for the Triton execution engine: value objects
//! (prices, quantities, identifiers), entities (orders, price levels) and
//! the event payloads routed through the event bus.
//!
//! This crate is deliberately free of behavior: order books, order tracking
//! and connection supervision live in their own crates and depend on these
//! types.

pub mod entities;
pub mod events;
pub mod value_objects;

// Re-export value objects at crate root for convenience
pub use value_objects::{MarketId, OrderId, Price, Quantity, Side, Timestamp, TradingPair};

// Re-export entities at crate root
pub use entities::{LimitOrder, MarketOrder, OrderRef, PriceLevel};

// Re-export events at crate root
pub use events::{
    BookUpdateEvent, EventTag, MarketEvent, OrderCancelledEvent, OrderCreatedEvent,
    OrderExpiredEvent, OrderFilledEvent,
};
