//! 聚合根生命周期与持久化核心（aggregate-root）
//!
//! 将内存中的领域对象（聚合）映射到只追加的事件流：
//! - 事件处理器分发表（`dispatcher`）与可插拔的应用策略（`apply_strategy`）
//! - 聚合的版本与未发布事件簿记（`aggregate`）
//! - 领域事件与类型描述（`domain_event`）
//! - 事件存储协议与内存实现（`event_store`）
//! - 重放加载、乐观并发保存与快照的仓储（`persist`）
//! - 观测作用域（`instrumentation`）
//!
//! 本 crate 不实现网络传输、序列化格式或跨流事务，事件存储以 `EventStore`
//! 接口注入，具体后端由上层提供。
//!
//! 典型用法：
//! 1. 为聚合类型构建 `Dispatcher`，注册各事件类型的处理器；
//! 2. 以分发表创建 `AggregateConfig`（可替换应用策略，例如加上观测装饰器）；
//! 3. 在聚合中嵌入 `AggregateState` 并实现 `AggregateRoot`（或使用 `#[aggregate_root]`）；
//! 4. 通过 `Repository`/`SnapshotRepository` 加载、修改并保存聚合。
//!
pub mod aggregate;
pub mod apply_strategy;
pub mod dispatcher;
pub mod domain_event;
pub mod error;
pub mod event_store;
pub mod instrumentation;
pub mod persist;

// 允许在本 crate 内部通过 ::aggregate_root 进行自引用，
// 以便过程宏生成的路径在本 crate 的测试中也能解析。
extern crate self as aggregate_root;
