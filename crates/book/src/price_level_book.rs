use crate::error::{BookError, BookResult};
use rust_decimal::Decimal;
use std::collections::BTreeMap;
use triton_core::{Price, PriceLevel, Quantity, Side, TradingPair};

/// Quantity and provenance of a single resting level
#[derive(Debug, Clone, Copy)]
struct LevelEntry {
    quantity: Quantity,
    update_id: u64,
}

/// Result of a depth-walking query
///
/// `volume` is the liquidity actually found, which may be less than the
/// requested volume when the book is shallow; `average_price` is the
/// volume-weighted average over that liquidity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DepthQuery {
    pub average_price: Price,
    pub volume: Quantity,
}

/// Ordered bid/ask price-level mirror of a venue order book
///
/// Bids iterate descending and asks ascending, so the best level is always
/// first. Writers are `apply_snapshot` and `apply_diffs` only; the book never
/// invents state. `update_id` is monotonically non-decreasing as updates are
/// applied — delivering diffs in order is the feed's responsibility.
#[derive(Debug, Clone)]
pub struct PriceLevelBook {
    trading_pair: TradingPair,
    bids: BTreeMap<Price, LevelEntry>,
    asks: BTreeMap<Price, LevelEntry>,
    update_id: u64,
}

impl PriceLevelBook {
    pub fn new(trading_pair: TradingPair) -> Self {
        PriceLevelBook {
            trading_pair,
            bids: BTreeMap::new(),
            asks: BTreeMap::new(),
            update_id: 0,
        }
    }

    pub fn trading_pair(&self) -> &TradingPair {
        &self.trading_pair
    }

    /// Sequence number of the last applied snapshot or diff
    pub fn update_id(&self) -> u64 {
        self.update_id
    }

    /// Wholesale-replace both sides
    ///
    /// The input is validated before any mutation: prices must be positive,
    /// quantities non-negative, and the resulting book must not be crossed.
    /// On error the previous state is untouched. Zero-quantity rows are
    /// skipped rather than rejected (venues send them to mean "no level").
    pub fn apply_snapshot(
        &mut self,
        bids: &[(Price, Quantity)],
        asks: &[(Price, Quantity)],
        update_id: u64,
    ) -> BookResult<()> {
        let new_bids = Self::build_side(bids, "bid", update_id)?;
        let new_asks = Self::build_side(asks, "ask", update_id)?;

        if let (Some(best_bid), Some(best_ask)) =
            (new_bids.keys().next_back(), new_asks.keys().next())
            && best_bid >= best_ask
        {
            return Err(BookError::MalformedSnapshot {
                reason: format!("crossed book: best bid {best_bid} >= best ask {best_ask}"),
            });
        }

        self.bids = new_bids;
        self.asks = new_asks;
        self.update_id = update_id;
        tracing::trace!(
            pair = %self.trading_pair,
            update_id,
            bids = self.bids.len(),
            asks = self.asks.len(),
            "snapshot applied"
        );
        Ok(())
    }

    fn build_side(
        rows: &[(Price, Quantity)],
        label: &str,
        update_id: u64,
    ) -> BookResult<BTreeMap<Price, LevelEntry>> {
        let mut side = BTreeMap::new();
        for &(price, quantity) in rows {
            if !price.is_positive() {
                return Err(BookError::MalformedSnapshot {
                    reason: format!("non-positive {label} price {price}"),
                });
            }
            if quantity.is_negative() {
                return Err(BookError::MalformedSnapshot {
                    reason: format!("negative {label} quantity {quantity} at {price}"),
                });
            }
            if quantity.is_zero() {
                continue;
            }
            side.insert(
                price,
                LevelEntry {
                    quantity,
                    update_id,
                },
            );
        }
        Ok(side)
    }

    /// Upsert per-entry changes; a zero quantity deletes that price level
    ///
    /// `update_id` must be >= the current update id. Out-of-order delivery
    /// is a precondition violation owned by the feed, not handled here.
    pub fn apply_diffs(
        &mut self,
        bid_changes: &[(Price, Quantity)],
        ask_changes: &[(Price, Quantity)],
        update_id: u64,
    ) {
        debug_assert!(
            update_id >= self.update_id,
            "diff update_id {update_id} older than book update_id {}",
            self.update_id
        );
        Self::apply_side_diffs(&mut self.bids, bid_changes, update_id);
        Self::apply_side_diffs(&mut self.asks, ask_changes, update_id);
        self.update_id = update_id;
    }

    fn apply_side_diffs(
        side: &mut BTreeMap<Price, LevelEntry>,
        changes: &[(Price, Quantity)],
        update_id: u64,
    ) {
        for &(price, quantity) in changes {
            if quantity.is_zero() {
                side.remove(&price);
            } else {
                side.insert(
                    price,
                    LevelEntry {
                        quantity,
                        update_id,
                    },
                );
            }
        }
    }

    /// Best-first iteration over one side: bids descending, asks ascending
    fn levels_best_first(&self, side: Side) -> Box<dyn Iterator<Item = (Price, LevelEntry)> + '_> {
        match side {
            Side::Buy => Box::new(self.bids.iter().rev().map(|(p, e)| (*p, *e))),
            Side::Sell => Box::new(self.asks.iter().map(|(p, e)| (*p, *e))),
        }
    }

    fn side_map(&self, side: Side) -> &BTreeMap<Price, LevelEntry> {
        match side {
            Side::Buy => &self.bids,
            Side::Sell => &self.asks,
        }
    }

    /// Best price on a side
    ///
    /// Fails with [`BookError::EmptyBook`] when the side has no levels; a
    /// placeholder price is never returned.
    pub fn best_price(&self, side: Side) -> BookResult<Price> {
        self.levels_best_first(side)
            .next()
            .map(|(price, _)| price)
            .ok_or(BookError::EmptyBook { side })
    }

    pub fn best_bid(&self) -> BookResult<PriceLevel> {
        self.best_level(Side::Buy)
    }

    pub fn best_ask(&self) -> BookResult<PriceLevel> {
        self.best_level(Side::Sell)
    }

    fn best_level(&self, side: Side) -> BookResult<PriceLevel> {
        self.levels_best_first(side)
            .next()
            .map(|(price, entry)| PriceLevel::new(price, entry.quantity, entry.update_id))
            .ok_or(BookError::EmptyBook { side })
    }

    pub fn mid_price(&self) -> BookResult<Price> {
        let bid = self.best_price(Side::Buy)?;
        let ask = self.best_price(Side::Sell)?;
        Ok(Price::new((bid.inner() + ask.inner()) / Decimal::TWO))
    }

    pub fn spread(&self) -> BookResult<Price> {
        let bid = self.best_price(Side::Buy)?;
        let ask = self.best_price(Side::Sell)?;
        Ok(ask - bid)
    }

    /// Walk a side from the best price outward until `volume` is accumulated
    ///
    /// Returns the volume-weighted average price over the consumed levels.
    /// When the side is shallower than the request, the result reports the
    /// volume actually available.
    pub fn price_for_volume(&self, side: Side, volume: Quantity) -> BookResult<DepthQuery> {
        let best = self.best_price(side)?;

        let mut remaining = volume.inner();
        let mut consumed = Decimal::ZERO;
        let mut value = Decimal::ZERO;
        for (price, entry) in self.levels_best_first(side) {
            if remaining <= Decimal::ZERO {
                break;
            }
            let take = remaining.min(entry.quantity.inner());
            value += price.inner() * take;
            consumed += take;
            remaining -= take;
        }

        let average_price = if consumed.is_zero() {
            best
        } else {
            Price::new(value / consumed)
        };
        Ok(DepthQuery {
            average_price,
            volume: Quantity::new(consumed),
        })
    }

    /// Total volume resting at or better than `limit` on a side
    ///
    /// "Better" is higher for bids and lower for asks. Returns the total
    /// volume and its volume-weighted average price; a limit beyond the best
    /// price yields zero volume at the best price.
    pub fn volume_for_price(&self, side: Side, limit: Price) -> BookResult<DepthQuery> {
        let best = self.best_price(side)?;

        let mut consumed = Decimal::ZERO;
        let mut value = Decimal::ZERO;
        for (price, entry) in self.levels_best_first(side) {
            let within = match side {
                Side::Buy => price >= limit,
                Side::Sell => price <= limit,
            };
            if !within {
                break;
            }
            value += price.inner() * entry.quantity.inner();
            consumed += entry.quantity.inner();
        }

        let average_price = if consumed.is_zero() {
            best
        } else {
            Price::new(value / consumed)
        };
        Ok(DepthQuery {
            average_price,
            volume: Quantity::new(consumed),
        })
    }

    /// Number of levels on a side
    pub fn depth(&self, side: Side) -> usize {
        self.side_map(side).len()
    }

    pub fn is_empty(&self) -> bool {
        self.bids.is_empty() && self.asks.is_empty()
    }

    /// All levels on a side, best first
    pub fn levels(&self, side: Side) -> Vec<PriceLevel> {
        self.levels_best_first(side)
            .map(|(price, entry)| PriceLevel::new(price, entry.quantity, entry.update_id))
            .collect()
    }
}
