use super::AggregateRoot;
use crate::apply_strategy::{ApplyStrategy, DefaultApplyStrategy};
use crate::dispatcher::Dispatcher;
use crate::domain_event::{DomainEvent, EventClass};
use std::fmt;
use std::sync::{Arc, OnceLock};

/// 应用策略工厂：以聚合类型的分发表构造策略实例
pub type StrategyFactory<A> =
    Box<dyn Fn(Arc<Dispatcher<A>>) -> Arc<dyn ApplyStrategy<A>> + Send + Sync>;

/// 聚合类型的显式配置。
///
/// 持有构建完成的分发表与策略工厂；策略在首次使用时实例化一次，
/// 之后由所有以该配置构造的聚合实例共享。
pub struct AggregateConfig<A> {
    dispatcher: Arc<Dispatcher<A>>,
    strategy_factory: StrategyFactory<A>,
    strategy: OnceLock<Arc<dyn ApplyStrategy<A>>>,
}

impl<A> AggregateConfig<A>
where
    A: AggregateRoot,
{
    /// 使用默认（严格）应用策略
    pub fn new(dispatcher: Dispatcher<A>) -> Self {
        Self {
            dispatcher: Arc::new(dispatcher),
            strategy_factory: Box::new(
                |dispatcher: Arc<Dispatcher<A>>| -> Arc<dyn ApplyStrategy<A>> {
                    Arc::new(DefaultApplyStrategy::new(dispatcher))
                },
            ),
            strategy: OnceLock::new(),
        }
    }

    /// 替换应用策略工厂
    pub fn with_strategy<F>(mut self, factory: F) -> Self
    where
        F: Fn(Arc<Dispatcher<A>>) -> Arc<dyn ApplyStrategy<A>> + Send + Sync + 'static,
    {
        self.strategy_factory = Box::new(factory);
        self.strategy = OnceLock::new();
        self
    }

    pub fn dispatcher(&self) -> &Arc<Dispatcher<A>> {
        &self.dispatcher
    }

    /// 载荷类型 `T` 在本聚合类型下的事件类型（经分发表的解析器）
    pub fn event_type_of<T: DomainEvent>(&self) -> String {
        self.dispatcher.event_type_for(&EventClass::of::<T>())
    }

    /// 当前聚合类型的应用策略（惰性创建，仅一次）
    pub fn apply_strategy(&self) -> Arc<dyn ApplyStrategy<A>> {
        let strategy = self
            .strategy
            .get_or_init(|| (self.strategy_factory)(Arc::clone(&self.dispatcher)));
        Arc::clone(strategy)
    }
}

impl<A> fmt::Debug for AggregateConfig<A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AggregateConfig")
            .field("dispatcher", &self.dispatcher)
            .field("strategy_initialized", &self.strategy.get().is_some())
            .finish()
    }
}
