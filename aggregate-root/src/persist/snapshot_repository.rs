//! 快照仓储
//!
//! 按固定间隔在事件流中追加快照事件，加载时从最近的快照开始只重放其后的事件。
//! 快照的结构由聚合类型决定，仓储只负责何时写入与从何处开始重放。
//!
use super::aggregate_repository::{AggregateRepository, publish_batch};
use crate::aggregate::AggregateRoot;
use crate::domain_event::{DomainEvent, Event};
use crate::error::AggregateRootResult;
use crate::event_store::{EventStore, ReadSpec};

/// 能够产出自身完整状态快照的聚合
///
/// 快照作为普通事件写入流中，聚合需要为 `Snapshot` 类型注册处理器，
/// 以便加载时直接从快照恢复状态。
pub trait Snapshotting: AggregateRoot {
    type Snapshot: DomainEvent;

    /// 当前物化状态的快照
    fn snapshot(&self) -> Self::Snapshot;

    /// 快照事件，类型标记与处理器注册使用同一解析器
    fn snapshot_event(&self) -> AggregateRootResult<Event> {
        let event_type = self
            .aggregate_state()
            .config()
            .event_type_of::<Self::Snapshot>();
        Event::typed(&self.snapshot(), event_type)
    }
}

/// 带快照的聚合仓储
#[derive(Debug, Clone)]
pub struct SnapshotRepository<S> {
    event_store: S,
    interval: usize,
}

impl<S> SnapshotRepository<S>
where
    S: EventStore,
{
    /// 每次保存都写快照
    pub fn new(event_store: S) -> Self {
        Self {
            event_store,
            interval: 1,
        }
    }

    /// 设置快照间隔，小于 1 时按 1 处理
    pub fn with_interval(mut self, interval: usize) -> Self {
        self.interval = interval.max(1);
        self
    }

    pub fn interval(&self) -> usize {
        self.interval
    }

    pub fn event_store(&self) -> &S {
        &self.event_store
    }

    fn snapshot_due(&self, persisted: usize, batch_size: usize) -> bool {
        (persisted + batch_size).is_multiple_of(self.interval)
    }
}

impl<A, S> AggregateRepository<A> for SnapshotRepository<S>
where
    A: Snapshotting,
    S: EventStore,
{
    fn load(&self, mut aggregate: A, stream_name: &str) -> AggregateRootResult<A> {
        let stream = ReadSpec::stream(stream_name);
        let snapshot_type = aggregate
            .aggregate_state()
            .config()
            .event_type_of::<A::Snapshot>();
        let latest = self
            .event_store
            .last(&stream.clone().of_type(snapshot_type))?;
        let from_snapshot = latest.is_some();

        // skipped：快照之前、本次不需要重放的事件数
        let (skipped, events) = match latest {
            Some(snapshot) => {
                let skipped = self
                    .event_store
                    .count(&stream.clone().before(snapshot.event_id()))?;
                let tail = self
                    .event_store
                    .read(&stream.after(snapshot.event_id()))?;
                (skipped, std::iter::once(snapshot).chain(tail).collect::<Vec<_>>())
            }
            None => (0, self.event_store.read(&stream)?),
        };

        let applied = events.len();
        aggregate.apply_all(events)?;
        aggregate.set_version((skipped + applied) as i64 - 1);

        tracing::debug!(
            aggregate = A::TYPE,
            stream = stream_name,
            from_snapshot,
            replayed = applied,
            version = aggregate.version(),
            "loaded aggregate"
        );
        Ok(aggregate)
    }

    fn store(&self, aggregate: &mut A, stream_name: &str) -> AggregateRootResult<()> {
        let mut events = aggregate.unpublished_events().materialize();
        let persisted = self.event_store.count(&ReadSpec::stream(stream_name))?;

        if self.snapshot_due(persisted, events.len()) {
            events.push(aggregate.snapshot_event()?);
        }

        publish_batch(&self.event_store, aggregate, events, stream_name)
    }
}
