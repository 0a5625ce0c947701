use crate::domain_event::Event;
use std::iter::FusedIterator;
use std::slice::Iter;

/// 未发布事件的单次前向视图。
///
/// 每次调用 `AggregateRoot::unpublished_events` 都得到一个新视图，
/// 只反映调用时刻的缓冲区内容；视图是迭代器，遍历即消耗，不可重复遍历。
/// 需要多次使用（例如既要持久化又要记录日志）时，先调用 `materialize`
/// 得到可复用的有序序列。
#[derive(Debug, Clone)]
pub struct UnpublishedEvents<'a> {
    events: Iter<'a, Event>,
}

impl<'a> UnpublishedEvents<'a> {
    pub(crate) fn new(events: &'a [Event]) -> Self {
        Self {
            events: events.iter(),
        }
    }

    /// 将剩余事件物化为可复用的有序序列
    pub fn materialize(self) -> Vec<Event> {
        self.cloned().collect()
    }
}

impl<'a> Iterator for UnpublishedEvents<'a> {
    type Item = &'a Event;

    fn next(&mut self) -> Option<Self::Item> {
        self.events.next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.events.size_hint()
    }
}

impl ExactSizeIterator for UnpublishedEvents<'_> {}

impl FusedIterator for UnpublishedEvents<'_> {}
