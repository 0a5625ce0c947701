use super::{AggregateConfig, AggregateRoot, UnpublishedEvents};
use crate::domain_event::Event;
use std::fmt;
use std::sync::Arc;

/// 尚未持久化（流不存在）时的版本哨兵值
pub const NEW_VERSION: i64 = -1;

/// 框架维护的聚合状态：版本、未发布事件缓冲与类型配置。
///
/// 只能通过 `new` 构造，因此任何自定义构造逻辑拿到的都是
/// `version == -1`、缓冲为空的初始状态。
pub struct AggregateState<A> {
    version: i64,
    unpublished_events: Vec<Event>,
    config: Arc<AggregateConfig<A>>,
}

impl<A> AggregateState<A>
where
    A: AggregateRoot,
{
    pub fn new(config: &Arc<AggregateConfig<A>>) -> Self {
        Self {
            version: NEW_VERSION,
            unpublished_events: Vec::new(),
            config: Arc::clone(config),
        }
    }

    pub fn config(&self) -> &Arc<AggregateConfig<A>> {
        &self.config
    }

    pub(crate) fn version(&self) -> i64 {
        self.version
    }

    // 唯一的提交点：设置版本并清空缓冲
    pub(crate) fn commit(&mut self, version: i64) {
        self.unpublished_events = Vec::new();
        self.version = version;
    }

    pub(crate) fn push(&mut self, event: Event) {
        self.unpublished_events.push(event);
    }

    pub(crate) fn unpublished_events(&self) -> UnpublishedEvents<'_> {
        UnpublishedEvents::new(&self.unpublished_events)
    }

    pub(crate) fn has_unpublished_events(&self) -> bool {
        !self.unpublished_events.is_empty()
    }
}

impl<A> Clone for AggregateState<A> {
    fn clone(&self) -> Self {
        Self {
            version: self.version,
            unpublished_events: self.unpublished_events.clone(),
            config: Arc::clone(&self.config),
        }
    }
}

impl<A> fmt::Debug for AggregateState<A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AggregateState")
            .field("version", &self.version)
            .field("unpublished_events", &self.unpublished_events.len())
            .finish()
    }
}
