//! Tag derivation and span finalization.
//!
//! # Responsibilities
//! - Derive the downstream span's tags from request/response headers,
//!   trailers, and transaction metadata, then finish it
//! - Derive the upstream span's tags (one span per upstream attempt)
//! - Common tags shared by both: status, flags, error, cluster, custom tags
//! - Verbose per-phase timing events
//!
//! # Design Decisions
//! - Nothing here returns an error; absent inputs yield defaults or no tag
//! - gRPC response headers are classified before trailers; both apply, so a
//!   trailer status overwrites `grpc.status_code` from the headers
//! - The `error` tag is only ever set to `true`, never cleared

use std::time::Duration;

use crate::http::Headers;
use crate::observability::metrics;
use crate::stream_info::{Protocol, StreamInfo};
use crate::trace::config::Config;
use crate::trace::custom_tag::CustomTagContext;
use crate::trace::extract::{self, DocumentError};
use crate::trace::grpc;
use crate::trace::span::Span;
use crate::trace::tags::{self, logs};

/// Finish the downstream (client-facing) span of a transaction.
pub fn finalize_downstream_span(
    mut span: Box<dyn Span>,
    request_headers: Option<&Headers>,
    response_headers: Option<&Headers>,
    response_trailers: Option<&Headers>,
    stream_info: &StreamInfo,
    config: &Config,
) {
    if let Some(headers) = request_headers {
        add_request_tags(span.as_mut(), headers, stream_info, config);
    }

    span.set_tag(tags::REQUEST_SIZE, &stream_info.bytes_received.to_string());
    span.set_tag(tags::RESPONSE_SIZE, &stream_info.bytes_sent.to_string());

    set_common_tags(span.as_mut(), stream_info, config);
    on_upstream_response_headers(span.as_mut(), response_headers);
    on_upstream_response_trailers(span.as_mut(), response_trailers);

    let (request_body, response_body) = captured_bodies(stream_info, config);
    tracing::debug!(length = request_body.len(), "Add downstream request body");
    span.set_tag(tags::REQUEST_BODY, request_body);
    span.set_tag(tags::REQUEST_BODY_LENGTH, &request_body.len().to_string());
    tracing::debug!(length = response_body.len(), "Add downstream response body");
    span.set_tag(tags::RESPONSE_BODY, response_body);
    span.set_tag(tags::RESPONSE_BODY_LENGTH, &response_body.len().to_string());

    add_correlation_id(span.as_mut(), response_body);

    if let Some(headers) = response_headers {
        let dump = headers.dump();
        tracing::debug!(length = dump.len(), "Add downstream response headers");
        span.set_tag(tags::RESPONSE_HEADERS, &dump);
        span.set_tag(tags::RESPONSE_HEADERS_LENGTH, &dump.len().to_string());
    }

    span.finish_span();
    metrics::record_span_finalized("downstream");
}

/// Finish the span of one upstream attempt.
///
/// The upstream host is "the" peer here, unlike downstream spans where the
/// peer is the client.
pub fn finalize_upstream_span(mut span: Box<dyn Span>, stream_info: &StreamInfo, config: &Config) {
    span.set_tag(
        tags::HTTP_PROTOCOL,
        Protocol::to_string_or_default(stream_info.protocol),
    );

    if let Some(host) = &stream_info.upstream_host {
        let address = host.address.to_string();
        span.set_tag(tags::UPSTREAM_ADDRESS, &address);
        span.set_tag(tags::PEER_ADDRESS, &address);
    }

    set_common_tags(span.as_mut(), stream_info, config);

    let (request_body, response_body) = captured_bodies(stream_info, config);
    tracing::debug!(length = request_body.len(), "Add upstream request body");
    span.set_tag(tags::REQUEST_BODY, request_body);
    tracing::debug!(length = response_body.len(), "Add upstream response body");
    span.set_tag(tags::RESPONSE_BODY, response_body);

    span.finish_span();
    metrics::record_span_finalized("upstream");
}

/// Tags shared by downstream and upstream spans.
///
/// Deterministic: the same inputs always produce the same tags.
pub fn set_common_tags(span: &mut dyn Span, stream_info: &StreamInfo, config: &Config) {
    span.set_tag(tags::COMPONENT, tags::PROXY);

    if let Some(host) = &stream_info.upstream_host {
        span.set_tag(tags::UPSTREAM_CLUSTER, &host.cluster.name);
        span.set_tag(tags::UPSTREAM_CLUSTER_NAME, host.cluster.observability_name());
    }

    span.set_tag(tags::HTTP_STATUS_CODE, &stream_info.response_code_string());
    span.set_tag(tags::RESPONSE_FLAGS, &stream_info.response_flags_short_string());

    if config.verbose {
        annotate_verbose(span, stream_info);
    }

    if stream_info.response_code.map_or(true, is_5xx) {
        span.set_tag(tags::ERROR, tags::TRUE);
    }

    let ctx = CustomTagContext {
        request_headers: stream_info.request_headers.as_ref(),
        stream_info,
    };
    for custom in &config.custom_tags {
        custom.apply_span(span, &ctx);
    }
}

/// Apply gRPC status tags from response headers, if they carry a status.
pub fn on_upstream_response_headers(span: &mut dyn Span, response_headers: Option<&Headers>) {
    if let Some(headers) = response_headers.filter(|h| h.grpc_status().is_some()) {
        add_grpc_response_tags(span, headers);
    }
}

/// Apply gRPC status tags from response trailers, if they carry a status.
pub fn on_upstream_response_trailers(span: &mut dyn Span, response_trailers: Option<&Headers>) {
    if let Some(trailers) = response_trailers.filter(|h| h.grpc_status().is_some()) {
        add_grpc_response_tags(span, trailers);
    }
}

fn is_5xx(code: u32) -> bool {
    (500..600).contains(&code)
}

fn add_request_tags(span: &mut dyn Span, headers: &Headers, stream_info: &StreamInfo, config: &Config) {
    add_tag_if_present(span, tags::GUID_X_REQUEST_ID, headers.request_id());
    span.set_tag(tags::HTTP_URL, &headers.original_uri(config.max_path_tag_length));
    span.set_tag(tags::HTTP_METHOD, headers.method().unwrap_or_default());
    span.set_tag(
        tags::DOWNSTREAM_CLUSTER,
        headers.downstream_service_cluster().unwrap_or("-"),
    );
    span.set_tag(tags::USER_AGENT, headers.user_agent().unwrap_or("-"));
    span.set_tag(
        tags::HTTP_PROTOCOL,
        Protocol::to_string_or_default(stream_info.protocol),
    );

    if let Some(remote) = &stream_info.downstream_remote_address {
        let peer = match remote.ip() {
            Some(ip) => ip.to_string(),
            None => remote.logical_name(),
        };
        span.set_tag(tags::PEER_ADDRESS, &peer);
    }

    add_tag_if_present(span, tags::GUID_X_CLIENT_TRACE_ID, headers.client_trace_id());

    if headers.is_grpc_request() {
        add_grpc_request_tags(span, headers);
    }

    let dump = headers.dump();
    tracing::debug!(length = dump.len(), "Add downstream request headers");
    span.set_tag(tags::REQUEST_HEADERS, &dump);
    span.set_tag(tags::REQUEST_HEADERS_LENGTH, &dump.len().to_string());
}

fn add_tag_if_present(span: &mut dyn Span, tag: &str, value: Option<&str>) {
    if let Some(value) = value {
        span.set_tag(tag, value);
    }
}

fn add_grpc_request_tags(span: &mut dyn Span, headers: &Headers) {
    add_tag_if_present(span, tags::GRPC_PATH, headers.path());
    add_tag_if_present(span, tags::GRPC_AUTHORITY, headers.host());
    add_tag_if_present(span, tags::GRPC_CONTENT_TYPE, headers.content_type());
    add_tag_if_present(span, tags::GRPC_TIMEOUT, headers.grpc_timeout());
}

fn add_grpc_response_tags(span: &mut dyn Span, headers: &Headers) {
    if let Some(status) = grpc::classify(headers.grpc_status()) {
        span.set_tag(tags::GRPC_STATUS_CODE, &status.tag);
        if status.is_upstream_error {
            span.set_tag(tags::ERROR, tags::TRUE);
        }
    }
    add_tag_if_present(span, tags::GRPC_MESSAGE, headers.grpc_message());
}

fn annotate_verbose(span: &mut dyn Span, stream_info: &StreamInfo) {
    let timing = &stream_info.timing;
    let marks: [(Option<Duration>, &str); 7] = [
        (timing.last_downstream_rx_byte_received, logs::LAST_DOWNSTREAM_RX_BYTE_RECEIVED),
        (timing.first_upstream_tx_byte_sent, logs::FIRST_UPSTREAM_TX_BYTE_SENT),
        (timing.last_upstream_tx_byte_sent, logs::LAST_UPSTREAM_TX_BYTE_SENT),
        (timing.first_upstream_rx_byte_received, logs::FIRST_UPSTREAM_RX_BYTE_RECEIVED),
        (timing.last_upstream_rx_byte_received, logs::LAST_UPSTREAM_RX_BYTE_RECEIVED),
        (timing.first_downstream_tx_byte_sent, logs::FIRST_DOWNSTREAM_TX_BYTE_SENT),
        (timing.last_downstream_tx_byte_sent, logs::LAST_DOWNSTREAM_TX_BYTE_SENT),
    ];
    for (offset, event) in marks {
        let Some(offset) = offset else { continue };
        match stream_info.start_time.checked_add(offset) {
            Some(timestamp) => span.log(timestamp, event),
            None => tracing::debug!(event, ?offset, "Skip timing event past representable time"),
        }
    }
}

fn captured_bodies<'a>(stream_info: &'a StreamInfo, config: &Config) -> (&'a str, &'a str) {
    let capture = &config.body_capture;
    let metadata = &stream_info.dynamic_metadata;
    (
        metadata
            .string_value(&capture.request_namespace, &capture.key)
            .unwrap_or_default(),
        metadata
            .string_value(&capture.response_namespace, &capture.key)
            .unwrap_or_default(),
    )
}

fn add_correlation_id(span: &mut dyn Span, response_body: &str) {
    match extract::extract_request_id(response_body) {
        Ok(Some(id)) => span.set_tag(tags::REQUEST_ID, &id),
        Ok(None) | Err(DocumentError::Empty) => {}
        Err(e) => {
            tracing::debug!(error = %e, length = response_body.len(), "Failed to parse response body");
            metrics::record_body_parse_failure();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;
    use std::time::{SystemTime, UNIX_EPOCH};

    use crate::stream_info::{Address, ClusterInfo, UpstreamHost};
    use crate::trace::custom_tag::LiteralCustomTag;

    #[derive(Default)]
    struct TagSpan {
        tags: BTreeMap<String, String>,
        logs: Vec<(SystemTime, String)>,
    }

    impl Span for TagSpan {
        fn set_tag(&mut self, name: &str, value: &str) {
            self.tags.insert(name.to_string(), value.to_string());
        }

        fn log(&mut self, timestamp: SystemTime, event: &str) {
            self.logs.push((timestamp, event.to_string()));
        }

        fn finish_span(self: Box<Self>) {}
    }

    fn upstream_host() -> UpstreamHost {
        UpstreamHost {
            address: Address::Ip("10.0.0.9:9000".parse().unwrap()),
            cluster: ClusterInfo {
                name: "backend".into(),
                observability_name: Some("backend.prod".into()),
            },
        }
    }

    #[test]
    fn test_server_error_without_upstream() {
        let info = StreamInfo {
            response_code: Some(500),
            ..StreamInfo::default()
        };
        let mut span = TagSpan::default();
        set_common_tags(&mut span, &info, &Config::default());

        assert_eq!(span.tags["error"], "true");
        assert_eq!(span.tags["http.status_code"], "500");
        assert_eq!(span.tags["component"], "proxy");
        assert_eq!(span.tags["response_flags"], "-");
        assert!(!span.tags.contains_key("upstream_cluster"));
        assert!(!span.tags.contains_key("upstream_cluster.name"));
    }

    #[test]
    fn test_missing_response_is_an_error() {
        let mut span = TagSpan::default();
        set_common_tags(&mut span, &StreamInfo::default(), &Config::default());
        assert_eq!(span.tags["http.status_code"], "0");
        assert_eq!(span.tags["error"], "true");
    }

    #[test]
    fn test_success_has_no_error_and_cluster_tags() {
        let info = StreamInfo {
            response_code: Some(404),
            upstream_host: Some(upstream_host()),
            ..StreamInfo::default()
        };
        let mut span = TagSpan::default();
        set_common_tags(&mut span, &info, &Config::default());
        assert!(!span.tags.contains_key("error"));
        assert_eq!(span.tags["upstream_cluster"], "backend");
        assert_eq!(span.tags["upstream_cluster.name"], "backend.prod");
    }

    #[test]
    fn test_common_tags_are_idempotent() {
        let mut info = StreamInfo {
            response_code: Some(200),
            upstream_host: Some(upstream_host()),
            ..StreamInfo::default()
        };
        info.timing.first_upstream_tx_byte_sent = Some(Duration::from_millis(3));
        let mut config = Config::default();
        config.verbose = true;
        config.custom_tags.push(Box::new(LiteralCustomTag::new("deployment", "blue")));

        let mut first = TagSpan::default();
        let mut second = TagSpan::default();
        set_common_tags(&mut first, &info, &config);
        set_common_tags(&mut second, &info, &config);
        assert_eq!(first.tags, second.tags);
        assert_eq!(first.logs, second.logs);
        assert_eq!(first.tags["deployment"], "blue");
    }

    #[test]
    fn test_verbose_timing_events() {
        let start = UNIX_EPOCH + Duration::from_secs(1_700_000_000);
        let mut info = StreamInfo::new(start);
        info.response_code = Some(200);
        info.timing.last_downstream_rx_byte_received = Some(Duration::from_millis(1));
        info.timing.first_upstream_tx_byte_sent = Some(Duration::from_millis(2));
        info.timing.last_upstream_tx_byte_sent = Some(Duration::from_millis(3));
        info.timing.first_upstream_rx_byte_received = Some(Duration::from_millis(15));
        info.timing.last_upstream_rx_byte_received = Some(Duration::from_millis(20));
        info.timing.first_downstream_tx_byte_sent = Some(Duration::from_millis(21));
        info.timing.last_downstream_tx_byte_sent = Some(Duration::from_millis(25));

        let mut quiet = TagSpan::default();
        set_common_tags(&mut quiet, &info, &Config::default());
        assert!(quiet.logs.is_empty());

        let mut config = Config::default();
        config.verbose = true;
        let mut span = TagSpan::default();
        set_common_tags(&mut span, &info, &config);

        let expected: Vec<(SystemTime, String)> = [
            (1, "last_downstream_rx_byte_received"),
            (2, "first_upstream_tx_byte_sent"),
            (3, "last_upstream_tx_byte_sent"),
            (15, "first_upstream_rx_byte_received"),
            (20, "last_upstream_rx_byte_received"),
            (21, "first_downstream_tx_byte_sent"),
            (25, "last_downstream_tx_byte_sent"),
        ]
        .into_iter()
        .map(|(ms, event)| (start + Duration::from_millis(ms), event.to_string()))
        .collect();
        assert_eq!(span.logs, expected);
    }

    #[test]
    fn test_unrepresentable_timing_offset_is_skipped() {
        let start = UNIX_EPOCH + Duration::from_secs(1_700_000_000);
        let mut info = StreamInfo::new(start);
        info.response_code = Some(200);
        info.timing.last_downstream_rx_byte_received = Some(Duration::MAX);
        info.timing.last_downstream_tx_byte_sent = Some(Duration::from_millis(25));

        let mut config = Config::default();
        config.verbose = true;
        let mut span = TagSpan::default();
        set_common_tags(&mut span, &info, &config);

        assert_eq!(
            span.logs,
            vec![(start + Duration::from_millis(25), "last_downstream_tx_byte_sent".to_string())]
        );
        assert_eq!(span.tags["http.status_code"], "200");
    }

    #[test]
    fn test_grpc_headers_then_trailers() {
        let mut span = TagSpan::default();
        let headers = Headers::new().with("grpc-status", "0");
        let trailers = Headers::new()
            .with("grpc-status", "13")
            .with("grpc-message", "boom");

        on_upstream_response_headers(&mut span, Some(&headers));
        assert_eq!(span.tags["grpc.status_code"], "0");
        assert!(!span.tags.contains_key("error"));

        on_upstream_response_trailers(&mut span, Some(&trailers));
        assert_eq!(span.tags["grpc.status_code"], "13");
        assert_eq!(span.tags["grpc.message"], "boom");
        assert_eq!(span.tags["error"], "true");
    }

    #[test]
    fn test_non_grpc_response_headers_are_ignored() {
        let mut span = TagSpan::default();
        on_upstream_response_headers(&mut span, Some(&Headers::new().with("grpc-message", "x")));
        on_upstream_response_trailers(&mut span, None);
        assert!(span.tags.is_empty());
    }
}
