//! Metrics collection.
//!
//! # Metrics
//! - `span_finalizer_decisions_total` (counter): trace decisions by reason, traced
//! - `span_finalizer_spans_finalized_total` (counter): finished spans by direction
//! - `span_finalizer_body_parse_failures_total` (counter): response bodies that
//!   were not a JSON object

use crate::trace::decision::Decision;

pub fn record_decision(decision: &Decision) {
    ::metrics::counter!(
        "span_finalizer_decisions_total",
        "reason" => decision.reason.as_str(),
        "traced" => if decision.traced { "true" } else { "false" }
    )
    .increment(1);
}

/// `direction` is `downstream` or `upstream`.
pub fn record_span_finalized(direction: &'static str) {
    ::metrics::counter!("span_finalizer_spans_finalized_total", "direction" => direction).increment(1);
}

pub fn record_body_parse_failure() {
    ::metrics::counter!("span_finalizer_body_parse_failures_total").increment(1);
}
