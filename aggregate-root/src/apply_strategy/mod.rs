//! 应用策略（ApplyStrategy）
//!
//! 每次 `apply` 调用都交给聚合类型配置的策略处理：
//! - `DefaultApplyStrategy`：经分发表查找处理器并调用；
//! - `InstrumentedApplyStrategy`：装饰任意策略，在观测作用域内执行 `call`，
//!   其余能力逐一显式转发给内部策略。
//!
mod default;
mod instrumented;

pub use default::DefaultApplyStrategy;
pub use instrumented::{APPLY_SPAN, InstrumentedApplyStrategy};

use crate::domain_event::Event;
use crate::error::AggregateRootResult;
use std::sync::Arc;

/// 应用策略的能力集合
pub trait ApplyStrategy<A>: Send + Sync {
    /// 以聚合的可变引用处理一条事件
    fn call(&self, aggregate: &mut A, event: &Event) -> AggregateRootResult<()>;

    /// 该策略能否处理给定事件类型
    fn handles(&self, event_type: &str) -> bool;

    /// 无法处理的事件是否视为错误
    fn is_strict(&self) -> bool;
}

impl<A, S> ApplyStrategy<A> for Arc<S>
where
    S: ApplyStrategy<A> + ?Sized,
{
    fn call(&self, aggregate: &mut A, event: &Event) -> AggregateRootResult<()> {
        (**self).call(aggregate, event)
    }

    fn handles(&self, event_type: &str) -> bool {
        (**self).handles(event_type)
    }

    fn is_strict(&self) -> bool {
        (**self).is_strict()
    }
}
