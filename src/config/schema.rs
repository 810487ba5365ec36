//! Configuration schema definitions.
//!
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};

use crate::trace::tracer::OperationName;

/// Root configuration.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct FinalizerConfig {
    /// Span finalization settings.
    pub tracing: TracingConfig,

    /// Identity of this proxy instance.
    pub local: LocalConfig,

    /// Where captured bodies live in dynamic metadata.
    pub body_capture: BodyCaptureConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Span finalization settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TracingConfig {
    /// Ingress (downstream-facing) or egress (upstream-facing) listener.
    pub operation_name: OperationName,

    /// Log one event per available timing mark.
    pub verbose: bool,

    /// Longest request path, in bytes, written into `http.url`.
    pub max_path_tag_length: usize,

    /// Operator-defined tags, applied in order after the built-in ones.
    pub custom_tags: Vec<CustomTagConfig>,
}

impl Default for TracingConfig {
    fn default() -> Self {
        Self {
            operation_name: OperationName::Ingress,
            verbose: false,
            max_path_tag_length: 256,
            custom_tags: Vec::new(),
        }
    }
}

/// A custom tag rule.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum CustomTagConfig {
    /// Fixed value.
    Literal { tag: String, value: String },

    /// Environment variable, read once at startup.
    Environment {
        tag: String,
        name: String,
        #[serde(default)]
        default_value: Option<String>,
    },

    /// Request header value.
    RequestHeader {
        tag: String,
        name: String,
        #[serde(default)]
        default_value: Option<String>,
    },

    /// Value found along `path` inside a dynamic metadata namespace.
    Metadata {
        tag: String,
        namespace: String,
        path: Vec<String>,
        #[serde(default)]
        default_value: Option<String>,
    },
}

impl CustomTagConfig {
    /// Name of the tag this rule writes.
    pub fn tag(&self) -> &str {
        match self {
            CustomTagConfig::Literal { tag, .. }
            | CustomTagConfig::Environment { tag, .. }
            | CustomTagConfig::RequestHeader { tag, .. }
            | CustomTagConfig::Metadata { tag, .. } => tag,
        }
    }
}

/// Identity of this proxy instance, stamped on every span.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct LocalConfig {
    pub node: String,
    pub zone: String,
}

/// Dynamic metadata locations of bodies captured by the request pipeline.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct BodyCaptureConfig {
    pub request_namespace: String,
    pub response_namespace: String,
    pub key: String,
}

impl Default for BodyCaptureConfig {
    fn default() -> Self {
        Self {
            request_namespace: "cle.log.req.lua".to_string(),
            response_namespace: "cle.log.rsp.lua".to_string(),
            key: "body".to_string(),
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
        }
    }
}
