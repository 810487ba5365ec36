//! Shared builders for integration tests.
#![allow(dead_code)]

use std::sync::Arc;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use span_finalizer::http::Headers;
use span_finalizer::stream_info::{Address, ClusterInfo, Protocol, StreamInfo, UpstreamHost};
use span_finalizer::trace::{Config, Decision, HttpTracer, LocalInfo, MemoryDriver, Reason};

pub const REQUEST_NAMESPACE: &str = "cle.log.req.lua";
pub const RESPONSE_NAMESPACE: &str = "cle.log.rsp.lua";

pub fn start_time() -> SystemTime {
    UNIX_EPOCH + Duration::from_secs(1_700_000_000)
}

/// A sampled, completed HTTP/1.1 transaction from 192.0.2.10.
pub fn stream_info(response_code: Option<u32>) -> StreamInfo {
    let mut info = StreamInfo::new(start_time());
    info.response_code = response_code;
    info.protocol = Some(Protocol::Http11);
    info.trace_reason = Reason::Sampling;
    info.bytes_received = 120;
    info.bytes_sent = 2048;
    info.downstream_remote_address = Some(Address::Ip("192.0.2.10:51000".parse().unwrap()));
    info
}

pub fn with_bodies(mut info: StreamInfo, request: &str, response: &str) -> StreamInfo {
    info.dynamic_metadata.set(REQUEST_NAMESPACE, "body", request);
    info.dynamic_metadata.set(RESPONSE_NAMESPACE, "body", response);
    info
}

pub fn upstream_host() -> UpstreamHost {
    UpstreamHost {
        address: Address::Ip("10.0.0.7:8080".parse().unwrap()),
        cluster: ClusterInfo::new("backend"),
    }
}

pub fn request_headers() -> Headers {
    Headers::new()
        .with(":method", "GET")
        .with(":authority", "api.example.com")
        .with(":path", "/v1/items")
        .with("x-forwarded-proto", "https")
        .with("x-request-id", "req-1")
        .with("user-agent", "curl/8.0")
}

pub fn grpc_request_headers() -> Headers {
    Headers::new()
        .with(":method", "POST")
        .with(":authority", "grpc.example.com")
        .with(":path", "/pkg.Service/Call")
        .with("content-type", "application/grpc")
        .with("grpc-timeout", "5S")
}

pub fn sampled() -> Decision {
    Decision {
        reason: Reason::Sampling,
        traced: true,
    }
}

pub fn tracer(driver: &MemoryDriver) -> HttpTracer {
    HttpTracer::new(
        Arc::new(driver.clone()),
        LocalInfo {
            node_name: "proxy-0".into(),
            zone_name: "us-east-1a".into(),
        },
    )
}

pub fn config() -> Config {
    Config::default()
}

/// Recorder that keeps the name of every counter registered through it.
#[derive(Default)]
pub struct CounterNames(std::sync::Mutex<Vec<String>>);

impl CounterNames {
    pub fn names(&self) -> Vec<String> {
        self.0.lock().unwrap().clone()
    }
}

impl metrics::Recorder for CounterNames {
    fn describe_counter(&self, _: metrics::KeyName, _: Option<metrics::Unit>, _: metrics::SharedString) {}
    fn describe_gauge(&self, _: metrics::KeyName, _: Option<metrics::Unit>, _: metrics::SharedString) {}
    fn describe_histogram(&self, _: metrics::KeyName, _: Option<metrics::Unit>, _: metrics::SharedString) {}

    fn register_counter(&self, key: &metrics::Key, _: &metrics::Metadata<'_>) -> metrics::Counter {
        self.0.lock().unwrap().push(key.name().to_string());
        metrics::Counter::noop()
    }

    fn register_gauge(&self, _: &metrics::Key, _: &metrics::Metadata<'_>) -> metrics::Gauge {
        metrics::Gauge::noop()
    }

    fn register_histogram(&self, _: &metrics::Key, _: &metrics::Metadata<'_>) -> metrics::Histogram {
        metrics::Histogram::noop()
    }
}
