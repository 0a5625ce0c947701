//! 持久化（persist）
//!
//! 定义聚合仓储接口及其组合实现：
//! - 纯事件重放的仓储（`Repository`）；
//! - 按间隔写入快照事件、从最近快照开始重放的仓储（`SnapshotRepository`）；
//! - 为任意仓储增加观测的装饰器（`InstrumentedRepository`）。
//!
//! 该模块只负责装配逻辑，事件的存储与并发冲突检测由注入的 `EventStore` 完成。
//!
mod aggregate_repository;
mod instrumented_repository;
mod snapshot_repository;

pub use aggregate_repository::{AggregateRepository, Repository};
pub use instrumented_repository::{InstrumentedRepository, LOAD_SPAN, STORE_SPAN};
pub use snapshot_repository::{SnapshotRepository, Snapshotting};
