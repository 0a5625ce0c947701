use super::AggregateRepository;
use crate::aggregate::AggregateRoot;
use crate::error::AggregateRootResult;
use crate::instrumentation::Instrumentation;
use serde_json::json;

pub const LOAD_SPAN: &str = "load.repository.aggregate_root";
pub const STORE_SPAN: &str = "store.repository.aggregate_root";

/// 仓储观测装饰器：`load`/`store` 各自在独立的观测作用域内执行
#[derive(Debug, Clone)]
pub struct InstrumentedRepository<R, I> {
    repository: R,
    instrumentation: I,
}

impl<R, I> InstrumentedRepository<R, I> {
    pub fn new(repository: R, instrumentation: I) -> Self {
        Self {
            repository,
            instrumentation,
        }
    }

    pub fn inner(&self) -> &R {
        &self.repository
    }
}

impl<A, R, I> AggregateRepository<A> for InstrumentedRepository<R, I>
where
    A: AggregateRoot,
    R: AggregateRepository<A>,
    I: Instrumentation,
{
    fn load(&self, aggregate: A, stream_name: &str) -> AggregateRootResult<A> {
        let context = json!({ "aggregate": A::TYPE, "stream": stream_name });

        self.instrumentation.instrument(LOAD_SPAN, context, || {
            self.repository.load(aggregate, stream_name)
        })
    }

    fn store(&self, aggregate: &mut A, stream_name: &str) -> AggregateRootResult<()> {
        let stored_events: Vec<String> = aggregate
            .unpublished_events()
            .map(|e| e.event_id().to_string())
            .collect();
        let context = json!({
            "aggregate": A::TYPE,
            "version": aggregate.version(),
            "stored_events": stored_events,
            "stream": stream_name,
        });

        self.instrumentation.instrument(STORE_SPAN, context, || {
            self.repository.store(aggregate, stream_name)
        })
    }
}
