//! Span finalization engine.
//!
//! # Data Flow
//! ```text
//! StreamInfo ──▶ decision.rs ──▶ Decision {reason, traced}
//!                                   │
//!                                   ▼
//! request headers ──▶ tracer.rs (HttpTracer::start_span via Driver)
//!                                   │
//!          transaction ends         ▼
//! headers, trailers, StreamInfo ──▶ finalize.rs
//!                                   ├─▶ grpc.rs (status classification)
//!                                   ├─▶ extract.rs (correlation ID from body)
//!                                   ├─▶ custom_tag.rs (operator rules)
//!                                   ▼
//!                              Span::finish_span
//! ```
//!
//! # Design Decisions
//! - Finalize never fails: absent data becomes a default or an omitted tag
//! - Tag names come from `tags.rs` only
//! - The span is consumed by finalize, so nothing can write to it afterwards

pub mod config;
pub mod custom_tag;
pub mod decision;
pub mod driver;
pub mod extract;
pub mod finalize;
pub mod grpc;
pub mod span;
pub mod tags;
pub mod tracer;

pub use config::Config;
pub use decision::{should_trace_request, Decision, Reason};
pub use driver::{Driver, FinishedSpan, MemoryDriver};
pub use finalize::{finalize_downstream_span, finalize_upstream_span, set_common_tags};
pub use span::Span;
pub use tracer::{HttpTracer, LocalInfo, OperationName};
