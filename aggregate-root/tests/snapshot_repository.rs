mod common;

use aggregate_root::aggregate::AggregateRoot;
use aggregate_root::domain_event::Event;
use aggregate_root::error::AggregateRootError;
use aggregate_root::event_store::InMemoryEventStore;
use aggregate_root::persist::{AggregateRepository, Repository, SnapshotRepository};
use common::*;
use rstest::rstest;
use std::sync::Arc;

const STREAM: &str = "Order$1";

#[test]
fn every_store_snapshots_with_the_default_interval() {
    let store = Arc::new(InMemoryEventStore::new());
    let repository = SnapshotRepository::new(Arc::clone(&store));
    let mut order = Order::new();
    order.create().unwrap();

    repository.store(&mut order, STREAM).unwrap();

    assert_eq!(stream_types(&store, STREAM), vec![created_type(), snapshot_type()]);
    assert_eq!(order.version(), 1);
    assert_eq!(order.unpublished_events().len(), 0);
}

#[test]
fn snapshot_is_appended_when_the_stream_reaches_the_interval() {
    let store = Arc::new(InMemoryEventStore::new());
    let repository = SnapshotRepository::new(Arc::clone(&store)).with_interval(2);
    let mut order = Order::new();

    order.create().unwrap();
    repository.store(&mut order, STREAM).unwrap();
    assert_eq!(stream_types(&store, STREAM), vec![created_type()]);

    order.expire().unwrap();
    repository.store(&mut order, STREAM).unwrap();
    assert_eq!(
        stream_types(&store, STREAM),
        vec![created_type(), expired_type(), snapshot_type()]
    );
    assert_eq!(order.version(), 2);
}

#[test]
fn snapshot_load_matches_a_full_replay() {
    let store = Arc::new(InMemoryEventStore::new());
    let repository = SnapshotRepository::new(Arc::clone(&store)).with_interval(2);
    let mut order = Order::new();
    order.create().unwrap();
    repository.store(&mut order, STREAM).unwrap();
    order.expire().unwrap();
    repository.store(&mut order, STREAM).unwrap();

    let from_snapshot = repository.load(Order::new(), STREAM).unwrap();
    let replayed = Repository::new(Arc::clone(&store))
        .load(Order::new(), STREAM)
        .unwrap();

    assert_eq!(from_snapshot.status, OrderStatus::Expired);
    assert_eq!(from_snapshot.status, replayed.status);
    assert_eq!(from_snapshot.version(), replayed.version());
    assert_eq!(from_snapshot.version(), order.version());
}

#[test]
fn load_replays_only_from_the_latest_snapshot() {
    let store = Arc::new(InMemoryEventStore::new());
    // 快照之前的事件没有处理器，完整重放会失败
    let legacy = Event::builder().event_type("order.legacy_imported").build();
    seed(
        &store,
        STREAM,
        vec![
            legacy,
            event(&OrderSnapshot {
                status: OrderStatus::Created,
            }),
            event(&OrderExpired),
        ],
    );

    let full = Repository::new(Arc::clone(&store)).load(Order::new(), STREAM);
    assert!(matches!(full, Err(AggregateRootError::MissingHandler { .. })));

    let order = SnapshotRepository::new(Arc::clone(&store))
        .load(Order::new(), STREAM)
        .unwrap();

    assert_eq!(order.status, OrderStatus::Expired);
    assert_eq!(order.version(), 2);
    assert_eq!(order.unpublished_events().len(), 0);
}

#[test]
fn load_uses_the_last_of_several_snapshots() {
    let store = Arc::new(InMemoryEventStore::new());
    seed(
        &store,
        STREAM,
        vec![
            event(&OrderCreated),
            event(&OrderSnapshot {
                status: OrderStatus::Created,
            }),
            event(&OrderExpired),
            event(&OrderSnapshot {
                status: OrderStatus::Expired,
            }),
        ],
    );

    let order = SnapshotRepository::new(Arc::clone(&store))
        .load(Order::new(), STREAM)
        .unwrap();

    assert_eq!(order.status, OrderStatus::Expired);
    assert_eq!(order.version(), 3);
}

#[test]
fn load_without_a_snapshot_falls_back_to_a_full_replay() {
    let store = Arc::new(InMemoryEventStore::new());
    seed(&store, STREAM, vec![event(&OrderCreated), event(&OrderExpired)]);

    let order = SnapshotRepository::new(Arc::clone(&store))
        .load(Order::new(), STREAM)
        .unwrap();

    assert_eq!(order.status, OrderStatus::Expired);
    assert_eq!(order.version(), 1);
}

#[test]
fn load_of_a_missing_stream_leaves_the_aggregate_new() {
    let order = SnapshotRepository::new(InMemoryEventStore::new())
        .load(Order::new(), STREAM)
        .unwrap();

    assert_eq!(order.status, OrderStatus::Draft);
    assert_eq!(order.version(), -1);
}

#[test]
fn storing_an_empty_buffer_on_a_new_stream_writes_only_a_snapshot() {
    let store = Arc::new(InMemoryEventStore::new());
    let repository = SnapshotRepository::new(Arc::clone(&store));
    let mut order = Order::new();

    repository.store(&mut order, STREAM).unwrap();

    assert_eq!(stream_types(&store, STREAM), vec![snapshot_type()]);
    assert_eq!(order.version(), 0);
}

#[test]
fn snapshot_store_still_checks_the_expected_version() {
    let store = Arc::new(InMemoryEventStore::new());
    let repository = SnapshotRepository::new(Arc::clone(&store)).with_interval(10);
    let mut order = repository.load(Order::new(), STREAM).unwrap();
    seed(&store, STREAM, vec![event(&OrderCreated)]);

    order.create().unwrap();
    let err = repository.store(&mut order, STREAM).unwrap_err();

    assert!(err.is_concurrency_conflict());
    assert_eq!(stream_types(&store, STREAM), vec![created_type()]);
}

#[rstest]
#[case::every_store(1, 3, 3)]
#[case::every_other(2, 3, 2)]
#[case::every_third(3, 3, 1)]
#[case::never_reached(5, 3, 0)]
#[case::zero_is_clamped(0, 2, 2)]
fn snapshot_cadence(#[case] interval: usize, #[case] stores: usize, #[case] snapshots: usize) {
    let store = Arc::new(InMemoryEventStore::new());
    let repository = SnapshotRepository::new(Arc::clone(&store)).with_interval(interval);
    let mut order = Order::new();

    for _ in 0..stores {
        order.create().unwrap();
        repository.store(&mut order, STREAM).unwrap();
    }

    let written = stream_types(&store, STREAM)
        .into_iter()
        .filter(|t| *t == snapshot_type())
        .count();
    assert_eq!(written, snapshots);
    assert_eq!(repository.interval(), interval.max(1));
}
