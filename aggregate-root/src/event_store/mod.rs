//! 事件存储协议（EventStore）
//!
//! 聚合核心只消费这一组接口：按流读取（类型过滤、按事件标识截取、取最后一条、计数）
//! 与带乐观并发检查的原子批量发布。存储引擎与序列化格式由实现方负责。
//!
#[cfg(feature = "in-memory")]
mod in_memory;
mod read_spec;

#[cfg(feature = "in-memory")]
pub use in_memory::InMemoryEventStore;
pub use read_spec::ReadSpec;

use crate::domain_event::Event;
use crate::error::AggregateRootResult;
use std::fmt;
use std::sync::Arc;

/// 发布时的期望版本（流头偏移）
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExpectedVersion {
    /// 不做检查
    Any,
    /// 流头偏移必须等于给定值；-1 表示流必须为空
    Exact(i64),
}

impl ExpectedVersion {
    /// 流必须尚不存在
    pub const NONE: ExpectedVersion = ExpectedVersion::Exact(-1);
}

impl From<i64> for ExpectedVersion {
    fn from(version: i64) -> Self {
        ExpectedVersion::Exact(version)
    }
}

impl fmt::Display for ExpectedVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExpectedVersion::Any => write!(f, "any"),
            ExpectedVersion::Exact(version) => write!(f, "{version}"),
        }
    }
}

/// 事件存储
pub trait EventStore: Send + Sync {
    /// 按规格读取事件，保持流内顺序
    fn read(&self, spec: &ReadSpec) -> AggregateRootResult<Vec<Event>>;

    /// 满足规格的最后一条事件
    fn last(&self, spec: &ReadSpec) -> AggregateRootResult<Option<Event>> {
        Ok(self.read(spec)?.pop())
    }

    /// 满足规格的事件数量
    fn count(&self, spec: &ReadSpec) -> AggregateRootResult<usize> {
        Ok(self.read(spec)?.len())
    }

    /// 原子地追加一批事件；流头与 `expected_version` 不符时返回 `WrongExpectedVersion`
    fn publish(
        &self,
        events: Vec<Event>,
        stream_name: &str,
        expected_version: ExpectedVersion,
    ) -> AggregateRootResult<()>;
}

impl<T> EventStore for Arc<T>
where
    T: EventStore + ?Sized,
{
    fn read(&self, spec: &ReadSpec) -> AggregateRootResult<Vec<Event>> {
        (**self).read(spec)
    }

    fn last(&self, spec: &ReadSpec) -> AggregateRootResult<Option<Event>> {
        (**self).last(spec)
    }

    fn count(&self, spec: &ReadSpec) -> AggregateRootResult<usize> {
        (**self).count(spec)
    }

    fn publish(
        &self,
        events: Vec<Event>,
        stream_name: &str,
        expected_version: ExpectedVersion,
    ) -> AggregateRootResult<()> {
        (**self).publish(events, stream_name, expected_version)
    }
}
