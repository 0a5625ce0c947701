//! aggregate-root 的过程宏
//!
//! - `#[aggregate_root]`：为具名字段结构体注入 `aggregate_state` 字段并实现 `AggregateRoot`
//! - `#[domain_event]`：为事件载荷补齐派生并实现 `DomainEvent`
//!
use proc_macro::TokenStream;

mod aggregate_root;
mod derive_utils;
mod domain_event;
mod field_utils;

/// 聚合根宏
/// - 注入字段 `aggregate_state: AggregateState<Self>`（若缺失）并置于字段最前
/// - 实现 `::aggregate_root::aggregate::AggregateRoot`
/// - 支持参数：`#[aggregate_root(name = "Order", debug = false)]`，
///   `name` 默认取结构体名，`debug` 默认 true（追加 `Debug` 派生）
#[proc_macro_attribute]
pub fn aggregate_root(attr: TokenStream, item: TokenStream) -> TokenStream {
    aggregate_root::expand(attr, item)
}

/// 领域事件宏
/// - 追加派生：Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize
/// - 实现 `::aggregate_root::domain_event::DomainEvent`
/// - 支持参数：`#[domain_event(event_type = "order.created")]` 覆盖默认的类型全路径
#[proc_macro_attribute]
pub fn domain_event(attr: TokenStream, item: TokenStream) -> TokenStream {
    domain_event::expand(attr, item)
}
