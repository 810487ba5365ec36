//! Span creation for proxied HTTP transactions.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::config::schema::LocalConfig;
use crate::http::Headers;
use crate::stream_info::StreamInfo;
use crate::trace::config::Config;
use crate::trace::decision::Decision;
use crate::trace::driver::Driver;
use crate::trace::span::Span;
use crate::trace::tags;

/// Direction of the listener the span belongs to.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OperationName {
    #[default]
    Ingress,
    Egress,
}

impl OperationName {
    pub fn as_str(self) -> &'static str {
        match self {
            OperationName::Ingress => "ingress",
            OperationName::Egress => "egress",
        }
    }
}

/// Identity of the local proxy instance.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LocalInfo {
    pub node_name: String,
    pub zone_name: String,
}

impl From<&LocalConfig> for LocalInfo {
    fn from(config: &LocalConfig) -> Self {
        Self {
            node_name: config.node.clone(),
            zone_name: config.zone.clone(),
        }
    }
}

/// Starts spans through a [`Driver`] and stamps them with local identity.
#[derive(Clone)]
pub struct HttpTracer {
    driver: Arc<dyn Driver>,
    local_info: LocalInfo,
}

impl HttpTracer {
    pub fn new(driver: Arc<dyn Driver>, local_info: LocalInfo) -> Self {
        Self { driver, local_info }
    }

    /// Start the downstream span of a transaction.
    ///
    /// The span is named after the operation; egress spans append the
    /// request host.
    pub fn start_span(
        &self,
        config: &Config,
        request_headers: &Headers,
        stream_info: &StreamInfo,
        decision: Decision,
    ) -> Option<Box<dyn Span>> {
        let mut span_name = config.operation_name.as_str().to_string();
        if config.operation_name == OperationName::Egress {
            span_name.push(' ');
            span_name.push_str(request_headers.host().unwrap_or_default());
        }
        self.start_named(config, request_headers, &span_name, stream_info, decision)
    }

    /// Start the span of one upstream attempt, named after its cluster.
    pub fn start_upstream_span(
        &self,
        config: &Config,
        stream_info: &StreamInfo,
        decision: Decision,
    ) -> Option<Box<dyn Span>> {
        let span_name = match &stream_info.upstream_host {
            Some(host) => format!("router {} egress", host.cluster.observability_name()),
            None => "router egress".to_string(),
        };
        let headers = stream_info.request_headers.clone().unwrap_or_default();
        self.start_named(config, &headers, &span_name, stream_info, decision)
    }

    fn start_named(
        &self,
        config: &Config,
        request_headers: &Headers,
        span_name: &str,
        stream_info: &StreamInfo,
        decision: Decision,
    ) -> Option<Box<dyn Span>> {
        let mut span = self.driver.start_span(
            config,
            request_headers,
            span_name,
            stream_info.start_time,
            decision,
        )?;
        span.set_tag(tags::NODE_ID, &self.local_info.node_name);
        span.set_tag(tags::ZONE, &self.local_info.zone_name);
        Some(span)
    }
}
