mod common;

use aggregate_root::aggregate::{AggregateConfig, AggregateRoot};
use aggregate_root::dispatcher::Dispatcher;
use aggregate_root::domain_event::{Event, EventClass};
use aggregate_root::error::AggregateRootError;
use aggregate_root::event_store::InMemoryEventStore;
use aggregate_root::persist::{AggregateRepository, Repository, SnapshotRepository};
use common::*;
use std::sync::Arc;

const STREAM: &str = "Order$1";

// schema registry 风格的名称：`registry:<类型名>`
fn registry_name(class: &EventClass) -> String {
    format!(
        "registry:{}",
        class.type_name().rsplit("::").next().unwrap_or_default()
    )
}

fn registry_config() -> Arc<AggregateConfig<Order>> {
    let dispatcher = Dispatcher::builder_with_resolver(registry_name)
        .on::<OrderCreated, _>(|order: &mut Order, _| order.status = OrderStatus::Created)
        .unwrap()
        .on::<OrderExpired, _>(|order: &mut Order, _| order.status = OrderStatus::Expired)
        .unwrap()
        .on::<OrderSnapshot, _>(|order: &mut Order, snapshot| order.status = snapshot.status)
        .unwrap()
        .build();
    Arc::new(AggregateConfig::new(dispatcher))
}

#[test]
fn typed_apply_uses_the_resolved_event_type() {
    let config = registry_config();
    let mut order = Order::with_config(&config);

    order.create().unwrap();

    assert_eq!(order.status, OrderStatus::Created);
    let types: Vec<String> = order
        .unpublished_events()
        .map(|e| e.event_type().to_string())
        .collect();
    assert_eq!(types, vec!["registry:OrderCreated".to_string()]);
}

#[test]
fn events_tagged_with_the_payload_type_are_not_handled() {
    let config = registry_config();
    let mut order = Order::with_config(&config);

    let err = order.apply(event(&OrderCreated)).unwrap_err();

    assert!(matches!(err, AggregateRootError::MissingHandler { .. }));
}

#[test]
fn repository_round_trip_with_resolved_types() {
    let config = registry_config();
    let store = Arc::new(InMemoryEventStore::new());
    let repository = Repository::new(Arc::clone(&store));
    let mut order = Order::with_config(&config);
    order.create().unwrap();
    order.expire().unwrap();

    repository.store(&mut order, STREAM).unwrap();
    let reloaded = repository.load(Order::with_config(&config), STREAM).unwrap();

    assert_eq!(
        stream_types(&store, STREAM),
        vec!["registry:OrderCreated", "registry:OrderExpired"]
    );
    assert_eq!(reloaded.status, OrderStatus::Expired);
    assert_eq!(reloaded.version(), 1);
}

#[test]
fn snapshot_round_trip_with_resolved_types() {
    let config = registry_config();
    let store = Arc::new(InMemoryEventStore::new());
    let repository = SnapshotRepository::new(Arc::clone(&store));

    let mut empty = Order::with_config(&config);
    repository.store(&mut empty, STREAM).unwrap();
    assert_eq!(stream_types(&store, STREAM), vec!["registry:OrderSnapshot"]);

    let mut order = repository.load(Order::with_config(&config), STREAM).unwrap();
    assert_eq!(order.status, OrderStatus::Draft);
    assert_eq!(order.version(), 0);

    order.create().unwrap();
    repository.store(&mut order, STREAM).unwrap();
    let reloaded = repository.load(Order::with_config(&config), STREAM).unwrap();

    assert_eq!(
        stream_types(&store, STREAM),
        vec![
            "registry:OrderSnapshot",
            "registry:OrderCreated",
            "registry:OrderSnapshot"
        ]
    );
    assert_eq!(reloaded.status, OrderStatus::Created);
    assert_eq!(reloaded.version(), 2);
}

#[test]
fn raw_handler_can_reject_an_event() {
    let dispatcher = Dispatcher::builder()
        .on::<OrderCreated, _>(|order: &mut Order, _| order.status = OrderStatus::Created)
        .unwrap()
        .on_event(
            [EventClass::of::<OrderExpired>()],
            |order: &mut Order, event: &Event| {
                if order.status != OrderStatus::Created {
                    return Err(AggregateRootError::Handler {
                        event_type: event.event_type().to_string(),
                        reason: "only created orders can expire".to_string(),
                    });
                }
                order.status = OrderStatus::Expired;
                Ok(())
            },
        )
        .unwrap()
        .build();
    let config = Arc::new(AggregateConfig::new(dispatcher));
    let mut order = Order::with_config(&config);

    let err = order.expire().unwrap_err();

    match err {
        AggregateRootError::Handler { event_type, reason } => {
            assert_eq!(event_type, expired_type());
            assert_eq!(reason, "only created orders can expire");
        }
        other => panic!("unexpected {other:?}"),
    }
    assert_eq!(order.unpublished_events().len(), 0);

    order.create().unwrap();
    order.expire().unwrap();
    assert_eq!(order.status, OrderStatus::Expired);
}
