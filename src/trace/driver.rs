//! Tracing drivers: the backends that create and record spans.
//!
//! [`MemoryDriver`] keeps finished spans in a shared list. Many workers may
//! finish spans concurrently; each span is still owned by a single worker
//! until it is finished.

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::SystemTime;

use serde::Serialize;

use crate::http::Headers;
use crate::stream_info::timing::epoch_micros;
use crate::trace::config::Config;
use crate::trace::decision::{Decision, Reason};
use crate::trace::span::Span;

/// Creates spans for traced transactions.
pub trait Driver: Send + Sync {
    /// Start a span, or return `None` when the driver declines to record it.
    fn start_span(
        &self,
        config: &Config,
        request_headers: &Headers,
        operation_name: &str,
        start_time: SystemTime,
        decision: Decision,
    ) -> Option<Box<dyn Span>>;
}

/// A timestamped span event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LogEvent {
    #[serde(with = "epoch_micros")]
    pub timestamp: SystemTime,
    pub event: String,
}

/// Everything recorded on a span by the time it finished.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FinishedSpan {
    pub operation_name: String,
    #[serde(with = "epoch_micros")]
    pub start_time: SystemTime,
    pub reason: Reason,
    pub tags: BTreeMap<String, String>,
    pub logs: Vec<LogEvent>,
}

impl FinishedSpan {
    pub fn tag(&self, name: &str) -> Option<&str> {
        self.tags.get(name).map(String::as_str)
    }
}

/// In-memory driver that records finished spans.
#[derive(Debug, Clone, Default)]
pub struct MemoryDriver {
    finished: Arc<Mutex<Vec<FinishedSpan>>>,
}

impl MemoryDriver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of the spans finished so far, in finishing order.
    pub fn finished_spans(&self) -> Vec<FinishedSpan> {
        self.finished
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Drain the recorded spans.
    pub fn take_finished(&self) -> Vec<FinishedSpan> {
        std::mem::take(&mut *self.finished.lock().unwrap_or_else(PoisonError::into_inner))
    }
}

impl Driver for MemoryDriver {
    fn start_span(
        &self,
        _config: &Config,
        _request_headers: &Headers,
        operation_name: &str,
        start_time: SystemTime,
        decision: Decision,
    ) -> Option<Box<dyn Span>> {
        if !decision.traced {
            return None;
        }
        Some(Box::new(MemorySpan {
            record: FinishedSpan {
                operation_name: operation_name.to_string(),
                start_time,
                reason: decision.reason,
                tags: BTreeMap::new(),
                logs: Vec::new(),
            },
            sink: Arc::clone(&self.finished),
        }))
    }
}

struct MemorySpan {
    record: FinishedSpan,
    sink: Arc<Mutex<Vec<FinishedSpan>>>,
}

impl Span for MemorySpan {
    fn set_tag(&mut self, name: &str, value: &str) {
        self.record.tags.insert(name.to_string(), value.to_string());
    }

    fn log(&mut self, timestamp: SystemTime, event: &str) {
        self.record.logs.push(LogEvent {
            timestamp,
            event: event.to_string(),
        });
    }

    fn finish_span(self: Box<Self>) {
        let MemorySpan { record, sink } = *self;
        tracing::trace!(operation = %record.operation_name, tags = record.tags.len(), "Span finished");
        sink.lock().unwrap_or_else(PoisonError::into_inner).push(record);
    }
}
