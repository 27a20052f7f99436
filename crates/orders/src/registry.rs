use crate::error::{RegistryError, RegistryResult};
use chrono::Duration;
use std::collections::{HashMap, HashSet, VecDeque};
use std::sync::Arc;
use triton_clock::{Clock, Tickable};
use triton_core::{
    LimitOrder, MarketEvent, MarketId, MarketOrder, OrderCreatedEvent, OrderId, OrderRef, Price,
    Quantity, Side, Timestamp, TradingPair,
};
use triton_events::EventBus;

/// Retention and expiry windows for the registry
#[derive(Debug, Clone, Copy)]
pub struct RegistryConfig {
    /// How long a removed limit order is kept as a shadow record
    pub shadow_ttl: Duration,
    /// How long an in-flight cancel marker suppresses duplicate cancels
    pub cancel_expiry: Duration,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        RegistryConfig {
            shadow_ttl: Duration::seconds(180),
            cancel_expiry: Duration::seconds(60),
        }
    }
}

/// Metadata for a market session orders can be tracked against
#[derive(Debug, Clone)]
pub struct MarketInfo {
    pub market: MarketId,
    pub trading_pair: TradingPair,
}

/// Authoritative local record of the engine's own orders
///
/// Mutations happen only from the synchronous tracking/cancel calls and the
/// periodic [`tick`](Tickable::tick); events are published after state is
/// settled, never mid-mutation.
pub struct OrderRegistry {
    config: RegistryConfig,
    clock: Arc<dyn Clock>,
    events: Arc<EventBus>,

    markets: HashMap<MarketId, MarketInfo>,
    limit_orders: HashMap<OrderRef, LimitOrder>,
    market_orders: HashMap<OrderRef, MarketOrder>,

    /// Live orders plus recently removed ones, retained for the shadow TTL
    shadow_limit_orders: HashMap<OrderRef, LimitOrder>,
    /// GC queue ordered by expiry. The TTL is constant, so push order is
    /// expiry order and popping the front is enough.
    shadow_gc_queue: VecDeque<(Timestamp, OrderRef)>,

    in_flight_cancels: HashMap<OrderId, Timestamp>,
    pending_created: HashSet<OrderId>,
}

impl OrderRegistry {
    pub fn new(clock: Arc<dyn Clock>, events: Arc<EventBus>) -> Self {
        Self::with_config(clock, events, RegistryConfig::default())
    }

    pub fn with_config(
        clock: Arc<dyn Clock>,
        events: Arc<EventBus>,
        config: RegistryConfig,
    ) -> Self {
        OrderRegistry {
            config,
            clock,
            events,
            markets: HashMap::new(),
            limit_orders: HashMap::new(),
            market_orders: HashMap::new(),
            shadow_limit_orders: HashMap::new(),
            shadow_gc_queue: VecDeque::new(),
            in_flight_cancels: HashMap::new(),
            pending_created: HashSet::new(),
        }
    }

    /// Register market metadata; tracking calls fail for unknown markets
    pub fn register_market(&mut self, market: MarketId, trading_pair: TradingPair) {
        self.markets.insert(
            market.clone(),
            MarketInfo {
                market,
                trading_pair,
            },
        );
    }

    /// Metadata for every registered market, in no particular order
    pub fn registered_markets(&self) -> impl Iterator<Item = &MarketInfo> {
        self.markets.values()
    }

    fn market_info(&self, market: &MarketId) -> RegistryResult<&MarketInfo> {
        self.markets
            .get(market)
            .ok_or_else(|| RegistryError::UnknownMarket {
                market: market.clone(),
            })
    }

    /// Start tracking a limit order after its creation was acknowledged
    pub fn start_tracking_limit_order(
        &mut self,
        market: &MarketId,
        order_id: OrderId,
        side: Side,
        price: Price,
        quantity: Quantity,
    ) -> RegistryResult<()> {
        let trading_pair = self.market_info(market)?.trading_pair.clone();
        let order = LimitOrder {
            order_id,
            market: market.clone(),
            trading_pair,
            side,
            price,
            quantity,
            created_at: self.clock.now(),
        };
        let order_ref = order.order_ref();
        self.shadow_limit_orders
            .insert(order_ref.clone(), order.clone());
        self.limit_orders.insert(order_ref, order.clone());

        tracing::debug!(order_id = %order.order_id, %market, "tracking limit order");
        self.events
            .publish(&MarketEvent::OrderCreated(OrderCreatedEvent::from(&order)));
        Ok(())
    }

    /// Start tracking a market order after its creation was acknowledged
    pub fn start_tracking_market_order(
        &mut self,
        market: &MarketId,
        order_id: OrderId,
        side: Side,
        quantity: Quantity,
    ) -> RegistryResult<()> {
        let trading_pair = self.market_info(market)?.trading_pair.clone();
        let order = MarketOrder {
            order_id,
            market: market.clone(),
            trading_pair,
            side,
            quantity,
            created_at: self.clock.now(),
        };
        let order_ref = order.order_ref();
        self.market_orders.insert(order_ref, order.clone());

        tracing::debug!(order_id = %order.order_id, %market, "tracking market order");
        self.events
            .publish(&MarketEvent::OrderCreated(OrderCreatedEvent::from(&order)));
        Ok(())
    }

    /// Stop tracking a limit order
    ///
    /// The order leaves the live map immediately but stays readable as a
    /// shadow record until the shadow TTL elapses, to tolerate venue
    /// confirmations that arrive after removal. Unknown ids are a no-op.
    pub fn stop_tracking_limit_order(&mut self, market: &MarketId, order_id: &OrderId) {
        let order_ref = OrderRef::new(market.clone(), order_id.clone());
        if self.limit_orders.remove(&order_ref).is_none() {
            return;
        }
        let expires_at = self.clock.now() + self.config.shadow_ttl;
        self.shadow_gc_queue.push_back((expires_at, order_ref));
        tracing::debug!(%order_id, %market, "limit order moved to shadow");
    }

    /// Stop tracking a market order; market orders get no shadow retention.
    /// Unknown ids are a no-op.
    pub fn stop_tracking_market_order(&mut self, market: &MarketId, order_id: &OrderId) {
        let order_ref = OrderRef::new(market.clone(), order_id.clone());
        self.market_orders.remove(&order_ref);
    }

    /// Cancel-idempotency guard
    ///
    /// Returns `true` exactly when the caller should issue the remote cancel:
    /// `false` means the order's creation is still pending (nothing exists
    /// remotely to cancel) or an unexpired in-flight cancel already exists.
    /// A `false` return is an expected silent no-op, not an error.
    pub fn check_and_track_cancel(&mut self, order_id: &OrderId) -> bool {
        if self.pending_created.contains(order_id) {
            tracing::debug!(%order_id, "cancel rejected: creation still pending");
            return false;
        }
        let now = self.clock.now();
        if let Some(tracked_at) = self.in_flight_cancels.get(order_id)
            && now - *tracked_at < self.config.cancel_expiry
        {
            tracing::debug!(%order_id, "cancel suppressed: already in flight");
            return false;
        }
        self.in_flight_cancels.insert(order_id.clone(), now);
        true
    }

    /// Whether an unexpired in-flight cancel exists for this id
    pub fn has_in_flight_cancel(&self, order_id: &OrderId) -> bool {
        let now = self.clock.now();
        self.in_flight_cancels
            .get(order_id)
            .is_some_and(|tracked_at| now - *tracked_at < self.config.cancel_expiry)
    }

    /// Mark an order id as awaiting its creation acknowledgement
    pub fn add_create_order_pending(&mut self, order_id: OrderId) {
        self.pending_created.insert(order_id);
    }

    /// Clear the pending-created mark once the acknowledgement arrived
    pub fn remove_create_order_pending(&mut self, order_id: &OrderId) {
        self.pending_created.remove(order_id);
    }

    pub fn is_pending_create(&self, order_id: &OrderId) -> bool {
        self.pending_created.contains(order_id)
    }

    /// All live limit orders
    pub fn active_limit_orders(&self) -> impl Iterator<Item = &LimitOrder> {
        self.limit_orders.values()
    }

    /// All live market orders
    pub fn active_market_orders(&self) -> impl Iterator<Item = &MarketOrder> {
        self.market_orders.values()
    }

    /// Live limit orders for one market
    pub fn active_orders_for_market(&self, market: &MarketId) -> Vec<&LimitOrder> {
        self.limit_orders
            .values()
            .filter(|order| &order.market == market)
            .collect()
    }

    pub fn get_limit_order(&self, market: &MarketId, order_id: &OrderId) -> Option<&LimitOrder> {
        self.limit_orders
            .get(&OrderRef::new(market.clone(), order_id.clone()))
    }

    /// Look up an order in the shadow view (live or recently removed)
    pub fn get_shadow_limit_order(&self, order_id: &OrderId) -> Option<&LimitOrder> {
        self.shadow_limit_orders
            .values()
            .find(|order| &order.order_id == order_id)
    }

    pub fn tracked_limit_order_count(&self) -> usize {
        self.limit_orders.len()
    }

    fn expire_in_flight_cancels(&mut self, now: Timestamp) {
        let cancel_expiry = self.config.cancel_expiry;
        self.in_flight_cancels
            .retain(|_, tracked_at| now - *tracked_at < cancel_expiry);
    }

    fn collect_expired_shadow_orders(&mut self, now: Timestamp) {
        while self
            .shadow_gc_queue
            .front()
            .is_some_and(|(expires_at, _)| *expires_at <= now)
        {
            if let Some((_, order_ref)) = self.shadow_gc_queue.pop_front() {
                self.shadow_limit_orders.remove(&order_ref);
                tracing::trace!(order_id = %order_ref.order_id, "shadow order collected");
            }
        }
    }
}

impl Tickable for OrderRegistry {
    fn tick(&mut self, now: Timestamp) {
        self.expire_in_flight_cancels(now);
        self.collect_expired_shadow_orders(now);
    }
}
