#![allow(dead_code)]

use aggregate_root::aggregate::{AggregateConfig, AggregateRoot, AggregateState};
use aggregate_root::apply_strategy::{ApplyStrategy, DefaultApplyStrategy, InstrumentedApplyStrategy};
use aggregate_root::dispatcher::Dispatcher;
use aggregate_root::domain_event::{DomainEvent, Event};
use aggregate_root::error::AggregateRootResult;
use aggregate_root::event_store::{EventStore, ExpectedVersion, InMemoryEventStore, ReadSpec};
use aggregate_root::instrumentation::RecordingInstrumentation;
use aggregate_root::persist::Snapshotting;
use aggregate_root_macros::{aggregate_root, domain_event};
use std::sync::{Arc, Mutex, OnceLock};

#[domain_event]
pub struct OrderCreated;

#[domain_event]
pub struct OrderExpired;

#[domain_event(event_type = "order.snapshot")]
pub struct OrderSnapshot {
    pub status: OrderStatus,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum OrderStatus {
    Draft,
    Created,
    Expired,
}

#[aggregate_root(name = "Order")]
#[derive(Clone)]
pub struct Order {
    pub status: OrderStatus,
}

impl Order {
    pub fn new() -> Self {
        Self::with_config(config())
    }

    pub fn with_config(config: &Arc<AggregateConfig<Order>>) -> Self {
        Self {
            aggregate_state: AggregateState::new(config),
            status: OrderStatus::Draft,
        }
    }

    pub fn create(&mut self) -> AggregateRootResult<()> {
        self.apply_payload(&OrderCreated)
    }

    pub fn expire(&mut self) -> AggregateRootResult<()> {
        self.apply_payload(&OrderExpired)
    }
}

impl Snapshotting for Order {
    type Snapshot = OrderSnapshot;

    fn snapshot(&self) -> OrderSnapshot {
        OrderSnapshot {
            status: self.status,
        }
    }
}

pub fn dispatcher() -> Dispatcher<Order> {
    Dispatcher::builder()
        .on::<OrderCreated, _>(|order: &mut Order, _| order.status = OrderStatus::Created)
        .unwrap()
        .on::<OrderExpired, _>(|order: &mut Order, _| order.status = OrderStatus::Expired)
        .unwrap()
        .on::<OrderSnapshot, _>(|order: &mut Order, snapshot| order.status = snapshot.status)
        .unwrap()
        .build()
}

/// 进程内共享的默认配置
pub fn config() -> &'static Arc<AggregateConfig<Order>> {
    static CONFIG: OnceLock<Arc<AggregateConfig<Order>>> = OnceLock::new();
    CONFIG.get_or_init(|| Arc::new(AggregateConfig::new(dispatcher())))
}

/// 每次 apply 都记录到 `recorder` 的配置
pub fn instrumented_config(
    recorder: &Arc<RecordingInstrumentation>,
) -> Arc<AggregateConfig<Order>> {
    let recorder = Arc::clone(recorder);
    Arc::new(AggregateConfig::new(dispatcher()).with_strategy(
        move |dispatcher| -> Arc<dyn ApplyStrategy<Order>> {
            Arc::new(InstrumentedApplyStrategy::new(
                DefaultApplyStrategy::new(dispatcher),
                Arc::clone(&recorder),
            ))
        },
    ))
}

pub fn event<T: DomainEvent>(payload: &T) -> Event {
    Event::new(payload).unwrap()
}

pub fn seed(store: &impl EventStore, stream: &str, events: Vec<Event>) {
    store.publish(events, stream, ExpectedVersion::Any).unwrap();
}

pub fn stream_types(store: &impl EventStore, stream: &str) -> Vec<String> {
    store
        .read(&ReadSpec::stream(stream))
        .unwrap()
        .iter()
        .map(|e| e.event_type().to_string())
        .collect()
}

pub fn created_type() -> String {
    OrderCreated::event_type().into_owned()
}

pub fn expired_type() -> String {
    OrderExpired::event_type().into_owned()
}

pub fn snapshot_type() -> String {
    OrderSnapshot::event_type().into_owned()
}

/// 一次 publish 调用的记录
#[derive(Debug, Clone, PartialEq)]
pub struct PublishCall {
    pub stream: String,
    pub event_types: Vec<String>,
    pub expected_version: ExpectedVersion,
}

/// 记录 publish 调用参数的事件存储
#[derive(Debug, Default)]
pub struct RecordingEventStore {
    inner: InMemoryEventStore,
    calls: Mutex<Vec<PublishCall>>,
}

impl RecordingEventStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn calls(&self) -> Vec<PublishCall> {
        self.calls.lock().unwrap().clone()
    }
}

impl EventStore for RecordingEventStore {
    fn read(&self, spec: &ReadSpec) -> AggregateRootResult<Vec<Event>> {
        self.inner.read(spec)
    }

    fn publish(
        &self,
        events: Vec<Event>,
        stream_name: &str,
        expected_version: ExpectedVersion,
    ) -> AggregateRootResult<()> {
        self.calls.lock().unwrap().push(PublishCall {
            stream: stream_name.to_string(),
            event_types: events.iter().map(|e| e.event_type().to_string()).collect(),
            expected_version,
        });
        self.inner.publish(events, stream_name, expected_version)
    }
}
