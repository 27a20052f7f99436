use crate::error::BookResult;
use crate::price_level_book::{DepthQuery, PriceLevelBook};
use std::collections::BTreeMap;
use triton_clock::Tickable;
use triton_core::{Price, PriceLevel, Quantity, Side, Timestamp, TradingPair};

/// A price-level book overlaid with a simulated-consumption ledger
///
/// Backtests and paper execution record their own fills into the traded
/// ledger instead of mutating the real book, which must remain a faithful
/// mirror of venue state. Composite rows show the real level's quantity
/// reduced by the traded amount at that exact price.
///
/// Ledger entries whose price is no longer at or better than the book's
/// current best are discarded on tick rather than re-queued: the wider
/// market is assumed to have consumed that liquidity already. This is an
/// inherited heuristic; keep the behavior as-is absent new requirements.
pub struct CompositeBook {
    book: PriceLevelBook,
    /// Bid-side consumption (our simulated sells), keyed by exact price
    traded_bids: BTreeMap<Price, Quantity>,
    /// Ask-side consumption (our simulated buys), keyed by exact price
    traded_asks: BTreeMap<Price, Quantity>,
    last_fill_at: Option<Timestamp>,
}

impl CompositeBook {
    pub fn new(trading_pair: TradingPair) -> Self {
        CompositeBook {
            book: PriceLevelBook::new(trading_pair),
            traded_bids: BTreeMap::new(),
            traded_asks: BTreeMap::new(),
            last_fill_at: None,
        }
    }

    /// Read-only view of the underlying venue mirror
    pub fn book(&self) -> &PriceLevelBook {
        &self.book
    }

    pub fn last_fill_at(&self) -> Option<Timestamp> {
        self.last_fill_at
    }

    /// Record a simulated fill
    ///
    /// A filled buy consumes ask-side liquidity; a filled sell consumes
    /// bid-side liquidity. Amounts accumulate per exact price.
    pub fn record_filled_order(
        &mut self,
        side: Side,
        price: Price,
        amount: Quantity,
        timestamp: Timestamp,
    ) {
        let ledger = match side {
            Side::Buy => &mut self.traded_asks,
            Side::Sell => &mut self.traded_bids,
        };
        *ledger.entry(price).or_insert(Quantity::ZERO) += amount;
        self.last_fill_at = Some(timestamp);
        tracing::trace!(%side, %price, %amount, "recorded simulated fill");
    }

    /// Pass-through to [`PriceLevelBook::apply_snapshot`]
    pub fn apply_snapshot(
        &mut self,
        bids: &[(Price, Quantity)],
        asks: &[(Price, Quantity)],
        update_id: u64,
    ) -> BookResult<()> {
        self.book.apply_snapshot(bids, asks, update_id)
    }

    /// Pass-through to [`PriceLevelBook::apply_diffs`]
    pub fn apply_diffs(
        &mut self,
        bid_changes: &[(Price, Quantity)],
        ask_changes: &[(Price, Quantity)],
        update_id: u64,
    ) {
        self.book.apply_diffs(bid_changes, ask_changes, update_id);
    }

    /// Composite bid rows, best first
    ///
    /// Each row is the real level reduced by the traded amount at that exact
    /// price. A row reduced to zero or below is dropped entirely and its
    /// ledger entry cleared.
    pub fn composite_bids(&mut self) -> Vec<PriceLevel> {
        Self::composite_side(self.book.levels(Side::Buy), &mut self.traded_bids)
    }

    /// Composite ask rows, best first
    pub fn composite_asks(&mut self) -> Vec<PriceLevel> {
        Self::composite_side(self.book.levels(Side::Sell), &mut self.traded_asks)
    }

    fn composite_side(
        levels: Vec<PriceLevel>,
        ledger: &mut BTreeMap<Price, Quantity>,
    ) -> Vec<PriceLevel> {
        let mut rows = Vec::with_capacity(levels.len());
        for level in levels {
            match ledger.get(&level.price).copied() {
                Some(traded) if traded >= level.quantity => {
                    // Fully consumed by our own fills
                    ledger.remove(&level.price);
                }
                Some(traded) => {
                    rows.push(PriceLevel::new(
                        level.price,
                        level.quantity - traded,
                        level.update_id,
                    ));
                }
                None => rows.push(level),
            }
        }
        rows
    }

    /// Best composite price on a side
    pub fn best_price(&mut self, side: Side) -> BookResult<Price> {
        let rows = match side {
            Side::Buy => self.composite_bids(),
            Side::Sell => self.composite_asks(),
        };
        rows.first()
            .map(|level| level.price)
            .ok_or(crate::BookError::EmptyBook { side })
    }

    /// Best price of the unmodified venue mirror
    pub fn original_best_price(&self, side: Side) -> BookResult<Price> {
        self.book.best_price(side)
    }

    /// Depth query against the venue mirror
    ///
    /// Simulated consumption is deliberately ignored here: depth walks answer
    /// "what does the venue show", while the composite rows and
    /// [`best_price`](Self::best_price) answer "what is left for us".
    pub fn price_for_volume(&self, side: Side, volume: Quantity) -> BookResult<DepthQuery> {
        self.book.price_for_volume(side, volume)
    }

    /// Drop ledger entries the wider market has already consumed
    ///
    /// A bid-ledger price above the current best bid (or an ask-ledger price
    /// below the current best ask) cannot match any resting level anymore;
    /// it is discarded, not re-queued.
    fn prune_traded_ledger(&mut self) {
        match self.book.best_price(Side::Buy) {
            Ok(best_bid) => self.traded_bids.retain(|price, _| *price <= best_bid),
            Err(_) => self.traded_bids.clear(),
        }
        match self.book.best_price(Side::Sell) {
            Ok(best_ask) => self.traded_asks.retain(|price, _| *price >= best_ask),
            Err(_) => self.traded_asks.clear(),
        }
    }

    #[cfg(test)]
    fn ledger_len(&self, side: Side) -> usize {
        match side {
            Side::Buy => self.traded_bids.len(),
            Side::Sell => self.traded_asks.len(),
        }
    }
}

impl Tickable for CompositeBook {
    fn tick(&mut self, _now: Timestamp) {
        self.prune_traded_ledger();
    }
}
