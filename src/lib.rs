//! Trace span finalization for proxied HTTP and gRPC transactions.

pub mod config;
pub mod http;
pub mod observability;
pub mod replay;
pub mod stream_info;
pub mod trace;

pub use config::FinalizerConfig;
pub use stream_info::StreamInfo;
pub use trace::{finalize_downstream_span, finalize_upstream_span, should_trace_request, HttpTracer};
