//! 观测（Instrumentation）
//!
//! `Instrumentation` 在一个命名作用域内执行操作并观测其结果；
//! 操作的返回值原样交还调用方，失败既不吞掉也不重复上报。
//!
use serde_json::Value;
use std::fmt::Display;
use std::sync::{Arc, Mutex};
use std::time::Instant;

/// 观测接收端
pub trait Instrumentation: Send + Sync {
    /// 在名为 `name`、携带 `context` 的作用域内执行 `operation`
    fn instrument<T, E, F>(&self, name: &'static str, context: Value, operation: F) -> Result<T, E>
    where
        E: Display,
        F: FnOnce() -> Result<T, E>;
}

impl<I> Instrumentation for Arc<I>
where
    I: Instrumentation,
{
    fn instrument<T, E, F>(&self, name: &'static str, context: Value, operation: F) -> Result<T, E>
    where
        E: Display,
        F: FnOnce() -> Result<T, E>,
    {
        (**self).instrument(name, context, operation)
    }
}

/// 基于 `tracing` span 的观测实现
///
/// 所有作用域共用 span 名 `instrument`，具体操作名记录在 `operation` 字段中；
/// 按操作过滤时使用字段过滤，例如 `RUST_LOG='[instrument{operation=apply.aggregate_root}]=debug'`。
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingInstrumentation;

impl Instrumentation for TracingInstrumentation {
    fn instrument<T, E, F>(&self, name: &'static str, context: Value, operation: F) -> Result<T, E>
    where
        E: Display,
        F: FnOnce() -> Result<T, E>,
    {
        let span = tracing::debug_span!("instrument", operation = name, context = %context);
        let started = Instant::now();
        let result = span.in_scope(operation);
        let elapsed_us = u64::try_from(started.elapsed().as_micros()).unwrap_or(u64::MAX);

        span.in_scope(|| match &result {
            Ok(_) => tracing::trace!(elapsed_us, "completed"),
            Err(e) => tracing::debug!(elapsed_us, error = %e, "failed"),
        });

        result
    }
}

/// 一次已关闭作用域的记录
#[derive(Debug, Clone, PartialEq)]
pub struct InstrumentRecord {
    pub name: &'static str,
    pub context: Value,
    /// 操作失败时的错误描述
    pub error: Option<String>,
}

/// 记录全部作用域的内存实现，用于测试与诊断
#[derive(Debug, Default)]
pub struct RecordingInstrumentation {
    records: Mutex<Vec<InstrumentRecord>>,
    open: Mutex<usize>,
}

impl RecordingInstrumentation {
    pub fn new() -> Self {
        Self::default()
    }

    /// 已关闭的作用域（按关闭顺序）
    pub fn records(&self) -> Vec<InstrumentRecord> {
        self.records
            .lock()
            .map(|records| records.clone())
            .unwrap_or_default()
    }

    /// 指定名称的已关闭作用域
    pub fn records_named(&self, name: &str) -> Vec<InstrumentRecord> {
        self.records()
            .into_iter()
            .filter(|record| record.name == name)
            .collect()
    }

    /// 当前尚未关闭的作用域数量
    pub fn open_spans(&self) -> usize {
        self.open.lock().map(|open| *open).unwrap_or_default()
    }
}

// 关闭即记录，操作展开（unwind）时同样生效
struct RecordingScope<'a> {
    recorder: &'a RecordingInstrumentation,
    name: &'static str,
    context: Option<Value>,
    error: Option<String>,
}

impl Drop for RecordingScope<'_> {
    fn drop(&mut self) {
        if let Ok(mut open) = self.recorder.open.lock() {
            *open = open.saturating_sub(1);
        }
        if let Ok(mut records) = self.recorder.records.lock() {
            records.push(InstrumentRecord {
                name: self.name,
                context: self.context.take().unwrap_or(Value::Null),
                error: self
                    .error
                    .take()
                    .or_else(|| std::thread::panicking().then(|| "panicked".to_string())),
            });
        }
    }
}

impl Instrumentation for RecordingInstrumentation {
    fn instrument<T, E, F>(&self, name: &'static str, context: Value, operation: F) -> Result<T, E>
    where
        E: Display,
        F: FnOnce() -> Result<T, E>,
    {
        if let Ok(mut open) = self.open.lock() {
            *open += 1;
        }
        let mut scope = RecordingScope {
            recorder: self,
            name,
            context: Some(context),
            error: None,
        };

        let result = operation();
        if let Err(e) = &result {
            scope.error = Some(e.to_string());
        }
        result
    }
}
