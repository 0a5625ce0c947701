//! 领域事件（Domain Event）
//!
//! 定义在事件流中流转的事件记录（`Event`）、类型化载荷需要实现的最小接口
//! （`DomainEvent`）以及注册处理器时使用的类型描述符（`EventClass`）。

mod domain_event_trait;
mod event;
mod metadata;

pub use domain_event_trait::{DomainEvent, EventClass};
pub use event::Event;
pub use metadata::Metadata;
