//! Triton Order Books
//!
//! Locally-consistent mirrors of venue order books:
//!
//! - [`PriceLevelBook`] — bid/ask price levels with snapshot/diff application
//!   and depth-walking queries. A faithful mirror of venue state: the only
//!   writers are the snapshot and diff appliers.
//! - [`CompositeBook`] — a [`PriceLevelBook`] overlaid with a traded ledger so
//!   backtests and paper execution can consume liquidity deterministically
//!   without mutating the mirror.
//!
//! Feeds must deliver diffs in non-decreasing `update_id` order; buffering
//! and reordering are the connector's responsibility.

mod composite_book;
mod error;
mod price_level_book;

pub use composite_book::CompositeBook;
pub use error::{BookError, BookResult};
pub use price_level_book::{DepthQuery, PriceLevelBook};
