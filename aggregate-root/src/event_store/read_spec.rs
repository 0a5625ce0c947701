/// 事件流读取规格
///
/// 读取总是限定在单个流内；`after`/`before` 以事件标识作为开区间边界，
/// 先按位置截取，再按类型过滤。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReadSpec {
    stream: String,
    of_types: Vec<String>,
    after: Option<String>,
    before: Option<String>,
}

impl ReadSpec {
    /// 从头读取指定流
    pub fn stream(stream_name: impl Into<String>) -> Self {
        Self {
            stream: stream_name.into(),
            of_types: Vec::new(),
            after: None,
            before: None,
        }
    }

    /// 仅保留指定类型的事件（可多次调用，取并集）
    pub fn of_type(mut self, event_type: impl Into<String>) -> Self {
        self.of_types.push(event_type.into());
        self
    }

    /// 仅读取指定事件之后的事件（不含该事件）
    pub fn after(mut self, event_id: impl Into<String>) -> Self {
        self.after = Some(event_id.into());
        self
    }

    /// 仅读取指定事件之前的事件（不含该事件）
    pub fn before(mut self, event_id: impl Into<String>) -> Self {
        self.before = Some(event_id.into());
        self
    }

    pub fn stream_name(&self) -> &str {
        &self.stream
    }

    pub fn of_types(&self) -> &[String] {
        &self.of_types
    }

    pub fn after_event(&self) -> Option<&str> {
        self.after.as_deref()
    }

    pub fn before_event(&self) -> Option<&str> {
        self.before.as_deref()
    }

    /// 事件类型是否满足类型过滤
    pub fn matches_type(&self, event_type: &str) -> bool {
        self.of_types.is_empty() || self.of_types.iter().any(|t| t == event_type)
    }
}
