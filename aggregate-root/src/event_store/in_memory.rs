use super::{EventStore, ExpectedVersion, ReadSpec};
use crate::domain_event::Event;
use crate::error::{AggregateRootError, AggregateRootResult};
use std::collections::{HashMap, HashSet};
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

#[derive(Debug, Default)]
struct Streams {
    streams: HashMap<String, Vec<Event>>,
    event_ids: HashSet<String>,
}

/// 内存事件存储，按流保存事件并在发布时做乐观并发检查
#[derive(Debug, Default)]
pub struct InMemoryEventStore {
    inner: RwLock<Streams>,
}

impl InMemoryEventStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn read_guard(&self) -> AggregateRootResult<RwLockReadGuard<'_, Streams>> {
        self.inner.read().map_err(|_| AggregateRootError::EventStore {
            reason: "in-memory event store lock poisoned".to_string(),
        })
    }

    fn write_guard(&self) -> AggregateRootResult<RwLockWriteGuard<'_, Streams>> {
        self.inner.write().map_err(|_| AggregateRootError::EventStore {
            reason: "in-memory event store lock poisoned".to_string(),
        })
    }
}

fn position_of(events: &[Event], stream: &str, event_id: &str) -> AggregateRootResult<usize> {
    events
        .iter()
        .position(|e| e.event_id() == event_id)
        .ok_or_else(|| AggregateRootError::EventNotFound {
            stream: stream.to_string(),
            event_id: event_id.to_string(),
        })
}

impl EventStore for InMemoryEventStore {
    fn read(&self, spec: &ReadSpec) -> AggregateRootResult<Vec<Event>> {
        let guard = self.read_guard()?;
        let stream = spec.stream_name();
        let events: &[Event] = guard
            .streams
            .get(stream)
            .map(Vec::as_slice)
            .unwrap_or_default();

        let start = match spec.after_event() {
            Some(event_id) => position_of(events, stream, event_id)? + 1,
            None => 0,
        };
        let end = match spec.before_event() {
            Some(event_id) => position_of(events, stream, event_id)?,
            None => events.len(),
        };
        if start >= end {
            return Ok(Vec::new());
        }

        Ok(events[start..end]
            .iter()
            .filter(|e| spec.matches_type(e.event_type()))
            .cloned()
            .collect())
    }

    fn publish(
        &self,
        events: Vec<Event>,
        stream_name: &str,
        expected_version: ExpectedVersion,
    ) -> AggregateRootResult<()> {
        let mut guard = self.write_guard()?;
        let current = guard.streams.get(stream_name).map_or(0, Vec::len) as i64 - 1;

        if let ExpectedVersion::Exact(expected) = expected_version {
            if expected != current {
                return Err(AggregateRootError::WrongExpectedVersion {
                    stream: stream_name.to_string(),
                    expected,
                    actual: current,
                });
            }
        }

        let mut batch_ids = HashSet::with_capacity(events.len());
        for event in &events {
            if guard.event_ids.contains(event.event_id()) || !batch_ids.insert(event.event_id()) {
                return Err(AggregateRootError::EventDuplicated {
                    event_id: event.event_id().to_string(),
                });
            }
        }

        if events.is_empty() {
            return Ok(());
        }

        let published = events.len();
        let Streams { streams, event_ids } = &mut *guard;
        event_ids.extend(events.iter().map(|e| e.event_id().to_string()));
        streams
            .entry(stream_name.to_string())
            .or_default()
            .extend(events);

        tracing::debug!(
            stream = stream_name,
            events = published,
            version = current + published as i64,
            "published events"
        );
        Ok(())
    }
}
