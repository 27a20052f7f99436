mod order;
mod price_level;

pub use order::{LimitOrder, MarketOrder, OrderRef};
pub use price_level::PriceLevel;
