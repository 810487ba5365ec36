//! Transaction metadata recorded by the request pipeline.
//!
//! # Data Flow
//! ```text
//! request pipeline (external)
//!     → StreamInfo (timing, byte counts, status, flags, dynamic metadata)
//!     → trace::decision (should this transaction be traced?)
//!     → trace::finalize (tag derivation, read-only)
//! ```
//!
//! # Design Decisions
//! - Everything the pipeline may not have observed is an `Option`
//! - Serde-enabled so transactions can be captured and replayed
//! - Timing marks are offsets from `start_time`, not wall-clock instants

pub mod address;
pub mod metadata;
pub mod response_flags;
pub mod timing;

use std::time::{SystemTime, UNIX_EPOCH};

use axum::http::Version;
use serde::{Deserialize, Serialize};

use crate::http::Headers;
use crate::trace::decision::Reason;

pub use address::Address;
pub use metadata::DynamicMetadata;
pub use response_flags::ResponseFlag;
pub use timing::Timing;

/// HTTP protocol of the downstream connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Protocol {
    #[serde(rename = "HTTP/1.0")]
    Http10,
    #[serde(rename = "HTTP/1.1")]
    Http11,
    #[serde(rename = "HTTP/2")]
    Http2,
    #[serde(rename = "HTTP/3")]
    Http3,
}

impl Protocol {
    pub fn as_str(self) -> &'static str {
        match self {
            Protocol::Http10 => "HTTP/1.0",
            Protocol::Http11 => "HTTP/1.1",
            Protocol::Http2 => "HTTP/2",
            Protocol::Http3 => "HTTP/3",
        }
    }

    /// Map an `http::Version`; HTTP/0.9 has no tag representation.
    pub fn from_version(version: Version) -> Option<Self> {
        match version {
            Version::HTTP_10 => Some(Protocol::Http10),
            Version::HTTP_11 => Some(Protocol::Http11),
            Version::HTTP_2 => Some(Protocol::Http2),
            Version::HTTP_3 => Some(Protocol::Http3),
            _ => None,
        }
    }

    /// Tag value for an optional protocol, `-` when unknown.
    pub fn to_string_or_default(protocol: Option<Self>) -> &'static str {
        protocol.map(Protocol::as_str).unwrap_or("-")
    }
}

/// Cluster the selected upstream host belongs to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClusterInfo {
    pub name: String,
    /// Name used in stats and traces; defaults to `name`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub observability_name: Option<String>,
}

impl ClusterInfo {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            observability_name: None,
        }
    }

    pub fn observability_name(&self) -> &str {
        self.observability_name.as_deref().unwrap_or(&self.name)
    }
}

/// The upstream host chosen by the load balancer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpstreamHost {
    pub address: Address,
    pub cluster: ClusterInfo,
}

/// Per-transaction metadata.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StreamInfo {
    #[serde(with = "timing::epoch_micros")]
    pub start_time: SystemTime,
    pub bytes_received: u64,
    pub bytes_sent: u64,
    /// Final HTTP status; `None` when no response was produced.
    pub response_code: Option<u32>,
    pub response_flags: Vec<ResponseFlag>,
    pub timing: Timing,
    pub dynamic_metadata: DynamicMetadata,
    pub protocol: Option<Protocol>,
    pub health_check: bool,
    pub trace_reason: Reason,
    pub upstream_host: Option<UpstreamHost>,
    pub downstream_remote_address: Option<Address>,
    /// Request headers as seen by the pipeline, exposed to custom tags.
    pub request_headers: Option<Headers>,
}

impl Default for StreamInfo {
    fn default() -> Self {
        Self {
            start_time: UNIX_EPOCH,
            bytes_received: 0,
            bytes_sent: 0,
            response_code: None,
            response_flags: Vec::new(),
            timing: Timing::default(),
            dynamic_metadata: DynamicMetadata::default(),
            protocol: None,
            health_check: false,
            trace_reason: Reason::default(),
            upstream_host: None,
            downstream_remote_address: None,
            request_headers: None,
        }
    }
}

impl StreamInfo {
    pub fn new(start_time: SystemTime) -> Self {
        Self {
            start_time,
            ..Self::default()
        }
    }

    /// Status code as a tag value, `"0"` when there was no response.
    pub fn response_code_string(&self) -> String {
        self.response_code.unwrap_or(0).to_string()
    }

    pub fn response_flags_short_string(&self) -> String {
        response_flags::to_short_string(&self.response_flags)
    }

    pub fn has_response_flag(&self, flag: ResponseFlag) -> bool {
        self.response_flags.contains(&flag)
    }
}
