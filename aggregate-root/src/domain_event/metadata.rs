use bon::Builder;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// 事件元数据
#[derive(Builder, Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Metadata {
    /// 事件发生时间
    #[builder(default = Utc::now())]
    occurred_at: DateTime<Utc>,
    /// 关联ID
    correlation_id: Option<String>,
    /// 因果ID
    causation_id: Option<String>,
}

impl Default for Metadata {
    fn default() -> Self {
        Self::builder().build()
    }
}

impl Metadata {
    pub fn occurred_at(&self) -> &DateTime<Utc> {
        &self.occurred_at
    }

    pub fn correlation_id(&self) -> Option<&str> {
        self.correlation_id.as_deref()
    }

    pub fn causation_id(&self) -> Option<&str> {
        self.causation_id.as_deref()
    }
}
