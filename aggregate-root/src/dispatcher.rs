//! 事件处理器分发表（Dispatcher）
//!
//! 每个聚合类型持有一张"事件类型 → 处理器"的显式映射：
//! - 注册时通过 `event_type_for` 解析器把载荷类型解析为字符串键，匿名类型直接拒绝；
//! - 继承关系在构建时一次性合并，子类型注册覆盖父类型同键注册；
//! - 分发时只做一次哈希查找。
//!
use crate::domain_event::{DomainEvent, Event, EventClass};
use crate::error::{AggregateRootError, AggregateRootResult};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// 事件处理器：以聚合的可变引用处理一条事件
pub type Handler<A> = Arc<dyn Fn(&mut A, &Event) -> AggregateRootResult<()> + Send + Sync>;

/// 事件类型解析器（`event_type_for`）
pub type EventTypeResolver = Arc<dyn Fn(&EventClass) -> String + Send + Sync>;

/// 默认解析器：取载荷类型自身声明的事件类型
pub fn default_event_type_resolver() -> EventTypeResolver {
    Arc::new(|class: &EventClass| class.event_type().to_string())
}

// 空名称或闭包/async 块等编译器生成的类型路径
fn is_anonymous(name: &str) -> bool {
    name.trim().is_empty() || name.contains("{{")
}

/// 构建完成、只读的分发表
pub struct Dispatcher<A> {
    handlers: HashMap<String, Handler<A>>,
    resolver: EventTypeResolver,
}

impl<A: 'static> Dispatcher<A> {
    /// 使用默认解析器开始注册
    pub fn builder() -> DispatcherBuilder<A> {
        DispatcherBuilder::new(default_event_type_resolver())
    }

    /// 使用自定义解析器开始注册（例如 schema registry 标识）
    pub fn builder_with_resolver<F>(resolver: F) -> DispatcherBuilder<A>
    where
        F: Fn(&EventClass) -> String + Send + Sync + 'static,
    {
        DispatcherBuilder::new(Arc::new(resolver))
    }

    /// 按已解析的事件类型查找处理器
    pub fn handler(&self, event_type: &str) -> Option<&Handler<A>> {
        self.handlers.get(event_type)
    }

    pub fn handles(&self, event_type: &str) -> bool {
        self.handlers.contains_key(event_type)
    }

    /// 使用本分发表的解析器解析载荷类型
    pub fn event_type_for(&self, class: &EventClass) -> String {
        (self.resolver)(class)
    }

    /// 已注册的事件类型（无序）
    pub fn event_types(&self) -> impl Iterator<Item = &str> {
        self.handlers.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }
}

impl<A> fmt::Debug for Dispatcher<A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut keys: Vec<&String> = self.handlers.keys().collect();
        keys.sort();
        f.debug_struct("Dispatcher").field("handlers", &keys).finish()
    }
}

/// 分发表构建器
///
/// 继承来的注册与自身注册分开存放，`build` 时自身注册覆盖继承注册，
/// 与 `inherit`/`on` 的调用先后无关。
pub struct DispatcherBuilder<A> {
    resolver: EventTypeResolver,
    inherited: HashMap<String, Handler<A>>,
    own: HashMap<String, Handler<A>>,
}

impl<A: 'static> DispatcherBuilder<A> {
    fn new(resolver: EventTypeResolver) -> Self {
        Self {
            resolver,
            inherited: HashMap::new(),
            own: HashMap::new(),
        }
    }

    /// 注册类型化处理器：负载先解码为 `T`，再交给处理器
    pub fn on<T, F>(self, handler: F) -> AggregateRootResult<Self>
    where
        T: DomainEvent,
        F: Fn(&mut A, T) + Send + Sync + 'static,
    {
        let handler: Handler<A> = Arc::new(move |aggregate: &mut A, event: &Event| {
            handler(aggregate, event.decode::<T>()?);
            Ok(())
        });
        self.register(&EventClass::of::<T>(), handler)
    }

    /// 为一个或多个事件类型注册同一个原始处理器
    pub fn on_event<I, F>(mut self, classes: I, handler: F) -> AggregateRootResult<Self>
    where
        I: IntoIterator<Item = EventClass>,
        F: Fn(&mut A, &Event) -> AggregateRootResult<()> + Send + Sync + 'static,
    {
        let handler: Handler<A> = Arc::new(handler);
        for class in classes {
            self = self.register(&class, Arc::clone(&handler))?;
        }
        Ok(self)
    }

    /// 继承同一聚合类型的另一张分发表（例如可复用的公共处理器集）
    pub fn inherit(mut self, parent: &Dispatcher<A>) -> Self {
        for (event_type, handler) in &parent.handlers {
            self.inherited
                .insert(event_type.clone(), Arc::clone(handler));
        }
        self
    }

    /// 继承"父"聚合类型的分发表；`project` 取得子聚合中嵌入的父聚合状态
    pub fn inherit_from<P: 'static>(
        mut self,
        parent: &Dispatcher<P>,
        project: fn(&mut A) -> &mut P,
    ) -> Self {
        for (event_type, handler) in &parent.handlers {
            let handler = Arc::clone(handler);
            let lifted: Handler<A> =
                Arc::new(move |aggregate: &mut A, event: &Event| handler(project(aggregate), event));
            self.inherited.insert(event_type.clone(), lifted);
        }
        self
    }

    pub fn build(self) -> Dispatcher<A> {
        let mut handlers = self.inherited;
        handlers.extend(self.own);
        Dispatcher {
            handlers,
            resolver: self.resolver,
        }
    }

    fn register(mut self, class: &EventClass, handler: Handler<A>) -> AggregateRootResult<Self> {
        let name = (self.resolver)(class);
        if is_anonymous(&name) {
            return Err(AggregateRootError::AnonymousEventType { name });
        }
        self.own.insert(name, handler);
        Ok(self)
    }
}
