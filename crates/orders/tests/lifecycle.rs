//! End-to-end order lifecycle against the event bus and the sim clock

use chrono::Duration as ChronoDuration;
use parking_lot::Mutex;
use rust_decimal_macros::dec;
use std::sync::Arc;
use std::time::Duration;
use triton_clock::{Clock, ClockDriver, SimClock, Tickable};
use triton_core::{EventTag, MarketEvent, MarketId, OrderId, Price, Quantity, Side};
use triton_events::{EventBus, EventLogger};
use triton_orders::OrderRegistry;

struct Fixture {
    clock: Arc<SimClock>,
    logger: Arc<EventLogger>,
    registry: Arc<Mutex<OrderRegistry>>,
}

fn fixture() -> Fixture {
    let clock = Arc::new(SimClock::new());
    let bus = Arc::new(EventBus::new());
    let logger = Arc::new(EventLogger::new());
    bus.add_listener(EventTag::OrderCreated, logger.clone());

    let mut registry = OrderRegistry::new(clock.clone(), bus);
    registry.register_market(MarketId::new("binance"), "BTC-USDT".parse().unwrap());
    Fixture {
        clock,
        logger,
        registry: Arc::new(Mutex::new(registry)),
    }
}

fn place(registry: &mut OrderRegistry, order_id: &str) {
    registry
        .start_tracking_limit_order(
            &MarketId::new("binance"),
            OrderId::new(order_id),
            Side::Buy,
            Price::new(dec!(100)),
            Quantity::new(dec!(1)),
        )
        .unwrap();
}

#[test]
fn test_tracking_publishes_created_event() {
    let fx = fixture();
    place(&mut fx.registry.lock(), "O1");

    let recent = fx.logger.recent_events();
    assert_eq!(recent.len(), 1);
    match &recent[0] {
        MarketEvent::OrderCreated(created) => {
            assert_eq!(created.order_id, OrderId::new("O1"));
            assert_eq!(created.price, Some(Price::new(dec!(100))));
            assert_eq!(created.timestamp, fx.clock.now());
        }
        other => panic!("unexpected event {other:?}"),
    }
}

#[tokio::test]
async fn test_wait_for_created_event() {
    let fx = fixture();

    let registry = fx.registry.clone();
    let placer = tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(20)).await;
        place(&mut registry.lock(), "O1");
    });

    let event = fx
        .logger
        .wait_for(EventTag::OrderCreated, Duration::from_secs(1))
        .await
        .unwrap();
    assert!(matches!(event, MarketEvent::OrderCreated(_)));
    placer.await.unwrap();
}

#[test]
fn test_full_lifecycle_through_driver() {
    let fx = fixture();
    let market = MarketId::new("binance");

    let mut driver = ClockDriver::new(fx.clock.clone(), Duration::from_millis(10));
    driver.register(fx.registry.clone() as Arc<Mutex<dyn Tickable>>);

    // Place, then cancel: the first cancel goes out, the retry is suppressed
    place(&mut fx.registry.lock(), "O1");
    assert!(fx.registry.lock().check_and_track_cancel(&OrderId::new("O1")));
    assert!(!fx.registry.lock().check_and_track_cancel(&OrderId::new("O1")));

    // Venue confirms the cancel; the order leaves the live set but stays
    // visible as a shadow record
    fx.registry
        .lock()
        .stop_tracking_limit_order(&market, &OrderId::new("O1"));
    assert_eq!(fx.registry.lock().tracked_limit_order_count(), 0);
    assert!(
        fx.registry
            .lock()
            .get_shadow_limit_order(&OrderId::new("O1"))
            .is_some()
    );

    // 61s later the cancel window has passed but the shadow remains
    fx.clock.advance(ChronoDuration::seconds(61));
    driver.tick_once();
    assert!(!fx.registry.lock().has_in_flight_cancel(&OrderId::new("O1")));
    assert!(
        fx.registry
            .lock()
            .get_shadow_limit_order(&OrderId::new("O1"))
            .is_some()
    );

    // Past the retention window the shadow is collected too
    fx.clock.advance(ChronoDuration::seconds(120));
    driver.tick_once();
    assert!(
        fx.registry
            .lock()
            .get_shadow_limit_order(&OrderId::new("O1"))
            .is_none()
    );
}

#[test]
fn test_shadow_gc_is_order_preserving() {
    let fx = fixture();
    let market = MarketId::new("binance");

    place(&mut fx.registry.lock(), "O1");
    place(&mut fx.registry.lock(), "O2");

    fx.registry
        .lock()
        .stop_tracking_limit_order(&market, &OrderId::new("O1"));
    fx.clock.advance(ChronoDuration::seconds(90));
    fx.registry
        .lock()
        .stop_tracking_limit_order(&market, &OrderId::new("O2"));

    // 91s later only the first removal has aged out
    fx.clock.advance(ChronoDuration::seconds(91));
    fx.registry.lock().tick(fx.clock.now());
    assert!(
        fx.registry
            .lock()
            .get_shadow_limit_order(&OrderId::new("O1"))
            .is_none()
    );
    assert!(
        fx.registry
            .lock()
            .get_shadow_limit_order(&OrderId::new("O2"))
            .is_some()
    );
}

#[test]
fn test_pending_create_blocks_cancel_until_acknowledged() {
    let fx = fixture();
    let mut registry = fx.registry.lock();

    // The create request is in flight; a premature cancel is a local no-op
    registry.add_create_order_pending(OrderId::new("O1"));
    assert!(!registry.check_and_track_cancel(&OrderId::new("O1")));
    assert!(fx.logger.recent_events().is_empty());

    // Acknowledgement arrives: tracking starts and cancels work again
    registry.remove_create_order_pending(&OrderId::new("O1"));
    place(&mut registry, "O1");
    assert!(registry.check_and_track_cancel(&OrderId::new("O1")));
    assert_eq!(fx.logger.recent_events().len(), 1);
}
