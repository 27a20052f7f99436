mod ids;
mod price;
mod quantity;
mod side;
mod trading_pair;

pub use ids::{MarketId, OrderId};
pub use price::Price;
pub use quantity::Quantity;
pub use side::Side;
pub use trading_pair::TradingPair;

pub type Timestamp = chrono::DateTime<chrono::Utc>;
