use super::ApplyStrategy;
use crate::aggregate::AggregateRoot;
use crate::domain_event::Event;
use crate::error::AggregateRootResult;
use crate::instrumentation::Instrumentation;
use serde_json::json;

/// 应用事件的观测作用域名
pub const APPLY_SPAN: &str = "apply.aggregate_root";

/// 观测装饰器：在 `apply.aggregate_root` 作用域内执行内部策略。
///
/// 内部调用失败时作用域照常关闭并记录结果，错误原样返回给调用方。
#[derive(Debug, Clone)]
pub struct InstrumentedApplyStrategy<S, I> {
    strategy: S,
    instrumentation: I,
}

impl<S, I> InstrumentedApplyStrategy<S, I> {
    pub fn new(strategy: S, instrumentation: I) -> Self {
        Self {
            strategy,
            instrumentation,
        }
    }

    pub fn inner(&self) -> &S {
        &self.strategy
    }
}

impl<A, S, I> ApplyStrategy<A> for InstrumentedApplyStrategy<S, I>
where
    A: AggregateRoot,
    S: ApplyStrategy<A>,
    I: Instrumentation,
{
    fn call(&self, aggregate: &mut A, event: &Event) -> AggregateRootResult<()> {
        let context = json!({
            "aggregate": { "type": A::TYPE, "version": aggregate.version() },
            "event": { "event_id": event.event_id(), "event_type": event.event_type() },
        });

        self.instrumentation.instrument(APPLY_SPAN, context, || {
            self.strategy.call(aggregate, event)
        })
    }

    fn handles(&self, event_type: &str) -> bool {
        self.strategy.handles(event_type)
    }

    fn is_strict(&self) -> bool {
        self.strategy.is_strict()
    }
}
