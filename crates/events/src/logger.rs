use crate::bus::EventListener;
use crate::error::{WaitError, WaitResult};
use parking_lot::Mutex;
use std::collections::{HashMap, VecDeque};
use std::time::Duration;
use tokio::sync::oneshot;
use triton_core::{EventTag, MarketEvent, OrderFilledEvent};

/// Default size of the generic event ring buffer
pub const DEFAULT_EVENT_CAPACITY: usize = 512;

/// Event-recording listener with rendezvous support
///
/// Generic events are kept in a bounded ring buffer (oldest dropped first).
/// Fill events are additionally kept in an unbounded list: profit/loss
/// accounting needs every fill for the lifetime of the run, while the
/// generic log only exists for diagnostics.
///
/// [`wait_for`](Self::wait_for) suspends the caller until the next event
/// with a given tag is recorded, or the timeout elapses.
pub struct EventLogger {
    capacity: usize,
    state: Mutex<LoggerState>,
    waiters: Mutex<HashMap<EventTag, Vec<oneshot::Sender<MarketEvent>>>>,
}

struct LoggerState {
    recent: VecDeque<MarketEvent>,
    fills: Vec<OrderFilledEvent>,
}

impl EventLogger {
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_EVENT_CAPACITY)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        EventLogger {
            capacity,
            state: Mutex::new(LoggerState {
                recent: VecDeque::with_capacity(capacity),
                fills: Vec::new(),
            }),
            waiters: Mutex::new(HashMap::new()),
        }
    }

    /// The most recent generic events, oldest first
    pub fn recent_events(&self) -> Vec<MarketEvent> {
        self.state.lock().recent.iter().cloned().collect()
    }

    /// Every fill recorded since construction (or the last `clear`)
    pub fn fills(&self) -> Vec<OrderFilledEvent> {
        self.state.lock().fills.clone()
    }

    /// Drop all recorded events, including fills
    pub fn clear(&self) {
        let mut state = self.state.lock();
        state.recent.clear();
        state.fills.clear();
    }

    /// Suspend until the next event with `tag` is recorded
    ///
    /// Returns the matched event, or [`WaitError::Timeout`] if nothing with
    /// that tag arrives within `timeout`. The waiter is one-shot: it is
    /// deregistered on both paths.
    pub async fn wait_for(&self, tag: EventTag, timeout: Duration) -> WaitResult<MarketEvent> {
        let (tx, rx) = oneshot::channel();
        self.waiters.lock().entry(tag).or_default().push(tx);

        match tokio::time::timeout(timeout, rx).await {
            Ok(Ok(event)) => Ok(event),
            Ok(Err(_)) => Err(WaitError::Closed { tag }),
            Err(_) => {
                // Drop our now-dead sender so abandoned waiters don't pile up
                let mut waiters = self.waiters.lock();
                if let Some(pending) = waiters.get_mut(&tag) {
                    pending.retain(|sender| !sender.is_closed());
                    if pending.is_empty() {
                        waiters.remove(&tag);
                    }
                }
                Err(WaitError::Timeout { tag, timeout })
            }
        }
    }
}

impl Default for EventLogger {
    fn default() -> Self {
        Self::new()
    }
}

impl EventListener for EventLogger {
    fn on_event(&self, event: &MarketEvent) {
        {
            let mut state = self.state.lock();
            if let MarketEvent::OrderFilled(fill) = event {
                state.fills.push(fill.clone());
            }
            if state.recent.len() == self.capacity {
                state.recent.pop_front();
            }
            state.recent.push_back(event.clone());
        }

        // Wake waiters after the log is updated; each waiter is one-shot
        if let Some(pending) = self.waiters.lock().remove(&event.tag()) {
            for waiter in pending {
                let _ = waiter.send(event.clone());
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bus::EventBus;
    use chrono::Utc;
    use rust_decimal_macros::dec;
    use std::sync::Arc;
    use triton_core::{
        BookUpdateEvent, MarketId, OrderCancelledEvent, OrderId, Price, Quantity, Side,
    };

    fn fill_event(order_id: &str) -> MarketEvent {
        MarketEvent::OrderFilled(OrderFilledEvent {
            order_id: OrderId::new(order_id),
            market: MarketId::new("binance"),
            trading_pair: "BTC-USDT".parse().unwrap(),
            side: Side::Buy,
            price: Price::new(dec!(100)),
            quantity: Quantity::new(dec!(1)),
            timestamp: Utc::now(),
        })
    }

    fn cancel_event(order_id: &str) -> MarketEvent {
        MarketEvent::OrderCancelled(OrderCancelledEvent {
            order_id: OrderId::new(order_id),
            market: MarketId::new("binance"),
            timestamp: Utc::now(),
        })
    }

    #[test]
    fn test_ring_buffer_drops_oldest() {
        let logger = EventLogger::with_capacity(2);
        logger.on_event(&cancel_event("O1"));
        logger.on_event(&cancel_event("O2"));
        logger.on_event(&cancel_event("O3"));

        let recent = logger.recent_events();
        assert_eq!(recent.len(), 2);
        let ids: Vec<String> = recent
            .iter()
            .map(|e| match e {
                MarketEvent::OrderCancelled(c) => c.order_id.to_string(),
                other => panic!("unexpected event {other:?}"),
            })
            .collect();
        assert_eq!(ids, vec!["O2", "O3"]);
    }

    #[test]
    fn test_fills_are_never_dropped() {
        let logger = EventLogger::with_capacity(2);
        for i in 0..10 {
            logger.on_event(&fill_event(&format!("F{i}")));
        }
        assert_eq!(logger.recent_events().len(), 2);
        assert_eq!(logger.fills().len(), 10);
    }

    #[tokio::test]
    async fn test_wait_for_times_out_without_event() {
        let logger = EventLogger::new();
        let result = logger
            .wait_for(EventTag::OrderFilled, Duration::from_millis(50))
            .await;
        assert!(matches!(result, Err(WaitError::Timeout { .. })));
    }

    #[tokio::test]
    async fn test_wait_for_returns_published_event() {
        let bus = Arc::new(EventBus::new());
        let logger = Arc::new(EventLogger::new());
        bus.add_listener(EventTag::OrderFilled, logger.clone());

        let publisher = {
            let bus = bus.clone();
            tokio::spawn(async move {
                tokio::time::sleep(Duration::from_millis(30)).await;
                bus.publish(&fill_event("F1"));
            })
        };

        let event = logger
            .wait_for(EventTag::OrderFilled, Duration::from_secs(1))
            .await
            .unwrap();
        match event {
            MarketEvent::OrderFilled(fill) => assert_eq!(fill.order_id.as_str(), "F1"),
            other => panic!("unexpected event {other:?}"),
        }
        publisher.await.unwrap();
    }

    #[tokio::test]
    async fn test_wait_for_ignores_other_tags() {
        let logger = Arc::new(EventLogger::new());
        let waiter = {
            let logger = logger.clone();
            tokio::spawn(async move {
                logger
                    .wait_for(EventTag::OrderFilled, Duration::from_millis(80))
                    .await
            })
        };
        tokio::time::sleep(Duration::from_millis(10)).await;
        logger.on_event(&MarketEvent::BookSnapshot(BookUpdateEvent {
            market: MarketId::new("binance"),
            trading_pair: "BTC-USDT".parse().unwrap(),
            update_id: 1,
            timestamp: Utc::now(),
        }));

        let result = waiter.await.unwrap();
        assert!(matches!(result, Err(WaitError::Timeout { .. })));
    }
}
