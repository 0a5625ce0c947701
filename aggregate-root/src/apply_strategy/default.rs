use super::ApplyStrategy;
use crate::aggregate::AggregateRoot;
use crate::dispatcher::Dispatcher;
use crate::domain_event::Event;
use crate::error::{AggregateRootError, AggregateRootResult};
use std::fmt;
use std::sync::Arc;

/// 默认应用策略：按事件类型在分发表中查找处理器。
///
/// 严格模式（默认）下找不到处理器即返回 `MissingHandler`；
/// 非严格模式下忽略该事件。
pub struct DefaultApplyStrategy<A> {
    dispatcher: Arc<Dispatcher<A>>,
    strict: bool,
}

impl<A> DefaultApplyStrategy<A> {
    pub fn new(dispatcher: Arc<Dispatcher<A>>) -> Self {
        Self {
            dispatcher,
            strict: true,
        }
    }

    pub fn non_strict(mut self) -> Self {
        self.strict = false;
        self
    }

    pub fn dispatcher(&self) -> &Arc<Dispatcher<A>> {
        &self.dispatcher
    }
}

impl<A> fmt::Debug for DefaultApplyStrategy<A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DefaultApplyStrategy")
            .field("dispatcher", &self.dispatcher)
            .field("strict", &self.strict)
            .finish()
    }
}

impl<A> ApplyStrategy<A> for DefaultApplyStrategy<A>
where
    A: AggregateRoot,
{
    fn call(&self, aggregate: &mut A, event: &Event) -> AggregateRootResult<()> {
        match self.dispatcher.handler(event.event_type()) {
            Some(handler) => handler(aggregate, event),
            None if self.strict => Err(AggregateRootError::MissingHandler {
                aggregate: A::TYPE,
                event_type: event.event_type().to_string(),
            }),
            None => {
                tracing::trace!(
                    aggregate = A::TYPE,
                    event_type = event.event_type(),
                    "no handler, event ignored"
                );
                Ok(())
            }
        }
    }

    fn handles(&self, event_type: &str) -> bool {
        self.dispatcher.handles(event_type)
    }

    fn is_strict(&self) -> bool {
        self.strict
    }
}
