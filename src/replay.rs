//! Replay of captured transactions through the finalizer.
//!
//! A transaction file holds what the request pipeline would hand the
//! finalizer: stream info, headers, trailers, and one stream info per
//! upstream attempt.

use serde::Deserialize;

use crate::http::Headers;
use crate::observability::metrics;
use crate::stream_info::StreamInfo;
use crate::trace::{
    finalize_downstream_span, finalize_upstream_span, should_trace_request, Config, Decision,
    HttpTracer,
};

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Transaction {
    pub stream_info: StreamInfo,
    pub request_headers: Option<Headers>,
    pub response_headers: Option<Headers>,
    pub response_trailers: Option<Headers>,
    pub upstream_attempts: Vec<StreamInfo>,
}

/// Decide, then start and finalize every span of `transaction`.
///
/// The decision is made once and shared by the downstream span and all
/// upstream attempts.
pub fn replay(transaction: &Transaction, tracer: &HttpTracer, config: &Config) -> Decision {
    let decision = should_trace_request(&transaction.stream_info);
    metrics::record_decision(&decision);
    tracing::debug!(reason = decision.reason.as_str(), traced = decision.traced, "Trace decision");

    let no_headers = Headers::new();
    let request_headers = transaction.request_headers.as_ref().unwrap_or(&no_headers);
    if let Some(span) = tracer.start_span(config, request_headers, &transaction.stream_info, decision) {
        finalize_downstream_span(
            span,
            transaction.request_headers.as_ref(),
            transaction.response_headers.as_ref(),
            transaction.response_trailers.as_ref(),
            &transaction.stream_info,
            config,
        );
    }

    for attempt in &transaction.upstream_attempts {
        if let Some(span) = tracer.start_upstream_span(config, attempt, decision) {
            finalize_upstream_span(span, attempt, config);
        }
    }

    decision
}
