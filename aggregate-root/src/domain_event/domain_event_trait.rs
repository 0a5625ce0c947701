use serde::Serialize;
use serde::de::DeserializeOwned;
use std::any::type_name;
use std::borrow::Cow;

/// 领域事件载荷需要满足的通用能力边界
pub trait DomainEvent: Serialize + DeserializeOwned + Send + Sync + 'static {
    /// 事件类型标识，默认取 Rust 类型全路径（形如 `orders::events::OrderCreated`）。
    ///
    /// 对接 schema registry 等外部命名体系时可覆盖为稳定的自定义标识。
    fn event_type() -> Cow<'static, str> {
        Cow::Borrowed(type_name::<Self>())
    }
}

/// 事件载荷类型的描述符，注册处理器时交给 `event_type_for` 解析
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventClass {
    type_name: &'static str,
    event_type: Cow<'static, str>,
}

impl EventClass {
    /// 描述一个具体的载荷类型
    pub fn of<T: DomainEvent>() -> Self {
        Self {
            type_name: type_name::<T>(),
            event_type: T::event_type(),
        }
    }

    /// 描述一个没有 Rust 载荷类型、仅以名称存在的事件类型
    pub fn named(event_type: impl Into<Cow<'static, str>>) -> Self {
        Self {
            type_name: "",
            event_type: event_type.into(),
        }
    }

    /// Rust 类型全路径；`named` 构造时为空
    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    /// 载荷类型自身声明的事件类型
    pub fn event_type(&self) -> &str {
        &self.event_type
    }
}
