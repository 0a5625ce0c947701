use super::{DomainEvent, Metadata};
use crate::error::{AggregateRootError, AggregateRootResult};
use bon::Builder;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

/// 事件：具备稳定标识与可解析类型标记的不可变事实。
///
/// 载荷以 JSON 值承载，编码格式由事件存储决定；
/// 聚合只依赖 `event_id` 与 `event_type`。
#[derive(Debug, Clone, PartialEq, Builder, Serialize, Deserialize)]
pub struct Event {
    /// 事件唯一标识（默认 UUID v4）
    #[builder(into, default = Uuid::new_v4().to_string())]
    event_id: String,
    /// 事件类型，分发时据此查找处理器
    #[builder(into)]
    event_type: String,
    /// 事件负载
    #[builder(default)]
    data: Value,
    #[builder(default)]
    metadata: Metadata,
}

impl Event {
    /// 由类型化载荷构造事件，类型标记取 `T::event_type()`
    pub fn new<T>(payload: &T) -> AggregateRootResult<Self>
    where
        T: DomainEvent,
    {
        Self::typed(payload, T::event_type())
    }

    /// 由类型化载荷构造事件，类型标记由调用方给出（例如分发表解析出的名称）
    pub fn typed<T>(payload: &T, event_type: impl Into<String>) -> AggregateRootResult<Self>
    where
        T: DomainEvent,
    {
        Ok(Self::builder()
            .event_type(event_type)
            .data(serde_json::to_value(payload)?)
            .build())
    }

    pub fn with_metadata(mut self, metadata: Metadata) -> Self {
        self.metadata = metadata;
        self
    }

    pub fn event_id(&self) -> &str {
        &self.event_id
    }

    pub fn event_type(&self) -> &str {
        &self.event_type
    }

    pub fn data(&self) -> &Value {
        &self.data
    }

    pub fn metadata(&self) -> &Metadata {
        &self.metadata
    }

    /// 将负载解码为类型化载荷
    pub fn decode<T>(&self) -> AggregateRootResult<T>
    where
        T: DeserializeOwned,
    {
        T::deserialize(&self.data).map_err(|source| AggregateRootError::Payload {
            event_type: self.event_type.clone(),
            source,
        })
    }
}
