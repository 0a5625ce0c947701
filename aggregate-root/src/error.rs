//! 聚合根核心统一错误定义
//!
//! 覆盖事件分发、处理器注册、事件存储与乐观并发等最小必要集合，
//! 事件存储实现与应用层统一转换为 `AggregateRootError`。
//!
use thiserror::Error;

/// 统一错误类型
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum AggregateRootError {
    // --- 分发/注册 ---
    #[error("missing handler: aggregate={aggregate}, event_type={event_type}")]
    MissingHandler {
        aggregate: &'static str,
        event_type: String,
    },
    #[error("anonymous event type is missing name: {name:?}")]
    AnonymousEventType { name: String },
    #[error("handler error: event_type={event_type}, reason={reason}")]
    Handler { event_type: String, reason: String },

    // --- 事件载荷 ---
    #[error("payload error: event_type={event_type}, reason={source}")]
    Payload {
        event_type: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("serialization error: {source}")]
    Serde {
        #[from]
        source: serde_json::Error,
    },

    // --- 事件存储/并发 ---
    #[error("wrong expected version: stream={stream}, expected={expected}, actual={actual}")]
    WrongExpectedVersion {
        stream: String,
        expected: i64,
        actual: i64,
    },
    #[error("event not found: stream={stream}, event_id={event_id}")]
    EventNotFound { stream: String, event_id: String },
    #[error("event duplicated: event_id={event_id}")]
    EventDuplicated { event_id: String },
    #[error("event store error: {reason}")]
    EventStore { reason: String },
}

impl AggregateRootError {
    /// 是否为乐观并发冲突（调用方据此决定重新加载并重试）
    pub fn is_concurrency_conflict(&self) -> bool {
        matches!(self, AggregateRootError::WrongExpectedVersion { .. })
    }
}

/// 统一 Result 类型别名
pub type AggregateRootResult<T> = Result<T, AggregateRootError>;
