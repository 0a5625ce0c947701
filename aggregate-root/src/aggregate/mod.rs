//! 聚合根（AggregateRoot）
//!
//! 聚合的状态完全由有序事件流推导：
//! - `apply` 经应用策略分发到处理器，成功后把事件追加到未发布缓冲；
//! - `set_version` 是唯一的提交点，设置版本并清空缓冲；
//! - 新聚合的版本为 -1（流尚不存在）。
//!
//! 聚合实例本身不做同步，`apply` 需要 `&mut self`，单写者由借用规则保证；
//! 跨进程的并发写入由事件存储在 `store` 时的乐观并发检查负责。
//!
mod config;
mod state;
mod unpublished_events;

pub use config::{AggregateConfig, StrategyFactory};
pub use state::{AggregateState, NEW_VERSION};
pub use unpublished_events::UnpublishedEvents;

use crate::domain_event::{DomainEvent, Event};
use crate::error::AggregateRootResult;

/// 聚合生命周期状态
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lifecycle {
    /// 从未持久化，缓冲为空
    New,
    /// 存在未发布事件
    Dirty,
    /// 缓冲为空，版本已提交
    Persisted,
}

/// 聚合根接口
///
/// 实现方只需暴露嵌入的 `AggregateState`，其余行为由默认方法提供；
/// `#[aggregate_root]` 宏可自动完成字段注入与实现。
pub trait AggregateRoot: Sized + 'static {
    /// 聚合类型名（用于错误信息与观测上下文）
    const TYPE: &'static str;

    fn aggregate_state(&self) -> &AggregateState<Self>;

    fn aggregate_state_mut(&mut self) -> &mut AggregateState<Self>;

    /// 应用一条事件：先经策略分发到处理器，再追加到未发布缓冲
    fn apply(&mut self, event: Event) -> AggregateRootResult<()> {
        let strategy = self.aggregate_state().config().apply_strategy();
        strategy.call(self, &event)?;
        self.aggregate_state_mut().push(event);
        Ok(())
    }

    /// 按参数顺序逐条应用；遇到失败立即返回，之前的事件保留在缓冲中
    fn apply_all<I>(&mut self, events: I) -> AggregateRootResult<()>
    where
        I: IntoIterator<Item = Event>,
    {
        for event in events {
            self.apply(event)?;
        }
        Ok(())
    }

    /// 将类型化载荷包装为事件后应用，类型标记取本聚合类型解析出的名称
    fn apply_payload<T>(&mut self, payload: &T) -> AggregateRootResult<()>
    where
        T: DomainEvent,
    {
        let event_type = self.aggregate_state().config().event_type_of::<T>();
        self.apply(Event::typed(payload, event_type)?)
    }

    /// 最后一条已持久化或已重放事件在流中的偏移（从 0 开始），新聚合为 -1
    fn version(&self) -> i64 {
        self.aggregate_state().version()
    }

    /// 提交点：设置版本并清空未发布缓冲
    fn set_version(&mut self, version: i64) {
        self.aggregate_state_mut().commit(version);
    }

    /// 未发布事件的单次视图，见 [`UnpublishedEvents`]
    fn unpublished_events(&self) -> UnpublishedEvents<'_> {
        self.aggregate_state().unpublished_events()
    }

    fn lifecycle(&self) -> Lifecycle {
        let state = self.aggregate_state();
        if state.has_unpublished_events() {
            Lifecycle::Dirty
        } else if state.version() == NEW_VERSION {
            Lifecycle::New
        } else {
            Lifecycle::Persisted
        }
    }
}
