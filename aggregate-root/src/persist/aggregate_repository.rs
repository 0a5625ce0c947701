//! 聚合仓储
//!
//! 通过重放事件流加载聚合，并以聚合版本作为乐观并发令牌持久化未发布事件。
//!
use crate::aggregate::AggregateRoot;
use crate::domain_event::Event;
use crate::error::{AggregateRootError, AggregateRootResult};
use crate::event_store::{EventStore, ExpectedVersion, ReadSpec};
use std::sync::Arc;

pub trait AggregateRepository<A>: Send + Sync
where
    A: AggregateRoot,
{
    /// 重放 `stream_name` 中的事件到聚合并返回同一实例
    fn load(&self, aggregate: A, stream_name: &str) -> AggregateRootResult<A>;

    /// 以单个原子批次发布未发布事件，成功后推进版本并清空缓冲
    fn store(&self, aggregate: &mut A, stream_name: &str) -> AggregateRootResult<()>;

    /// 加载 → 修改 → 保存。
    ///
    /// 加载与保存之间不做隔离，冲突只在保存时由事件存储检测；
    /// 收到 `WrongExpectedVersion` 后由调用方重新加载并重试。
    fn with_aggregate<F, E>(&self, aggregate: A, stream_name: &str, mutate: F) -> Result<A, E>
    where
        F: FnOnce(&mut A) -> Result<(), E>,
        E: From<AggregateRootError>,
    {
        let mut aggregate = self.load(aggregate, stream_name)?;
        mutate(&mut aggregate)?;
        self.store(&mut aggregate, stream_name)?;
        Ok(aggregate)
    }
}

impl<A, T> AggregateRepository<A> for Arc<T>
where
    A: AggregateRoot,
    T: AggregateRepository<A> + ?Sized,
{
    fn load(&self, aggregate: A, stream_name: &str) -> AggregateRootResult<A> {
        (**self).load(aggregate, stream_name)
    }

    fn store(&self, aggregate: &mut A, stream_name: &str) -> AggregateRootResult<()> {
        (**self).store(aggregate, stream_name)
    }
}

// 以聚合当前版本作为期望版本发布整批事件，成功后按批次大小推进版本
pub(crate) fn publish_batch<A, S>(
    event_store: &S,
    aggregate: &mut A,
    events: Vec<Event>,
    stream_name: &str,
) -> AggregateRootResult<()>
where
    A: AggregateRoot,
    S: EventStore + ?Sized,
{
    let expected = aggregate.version();
    let published = events.len() as i64;

    event_store.publish(events, stream_name, ExpectedVersion::Exact(expected))?;
    aggregate.set_version(expected + published);

    tracing::debug!(
        aggregate = A::TYPE,
        stream = stream_name,
        events = published,
        version = aggregate.version(),
        "stored aggregate"
    );
    Ok(())
}

/// 基于事件存储的聚合仓储：每次加载都从流头完整重放
#[derive(Debug, Clone)]
pub struct Repository<S> {
    event_store: S,
}

impl<S> Repository<S>
where
    S: EventStore,
{
    pub fn new(event_store: S) -> Self {
        Self { event_store }
    }

    pub fn event_store(&self) -> &S {
        &self.event_store
    }
}

impl<A, S> AggregateRepository<A> for Repository<S>
where
    A: AggregateRoot,
    S: EventStore,
{
    fn load(&self, mut aggregate: A, stream_name: &str) -> AggregateRootResult<A> {
        let events = self.event_store.read(&ReadSpec::stream(stream_name))?;
        let replayed = events.len() as i64;

        aggregate.apply_all(events)?;
        aggregate.set_version(replayed - 1);

        tracing::debug!(
            aggregate = A::TYPE,
            stream = stream_name,
            version = aggregate.version(),
            "loaded aggregate"
        );
        Ok(aggregate)
    }

    fn store(&self, aggregate: &mut A, stream_name: &str) -> AggregateRootResult<()> {
        let events = aggregate.unpublished_events().materialize();
        publish_batch(&self.event_store, aggregate, events, stream_name)
    }
}
