//! Operator-defined custom tags.
//!
//! Custom tags run after the built-in tags. They may add tags; a rule that
//! writes a built-in name would win (last write), which is why validation
//! rejects such names up front.

use std::borrow::Cow;
use std::fmt;

use serde_json::Value;

use crate::config::schema::CustomTagConfig;
use crate::http::Headers;
use crate::stream_info::StreamInfo;
use crate::trace::extract;
use crate::trace::span::Span;

/// What a custom tag may read.
#[derive(Debug, Clone, Copy)]
pub struct CustomTagContext<'a> {
    pub request_headers: Option<&'a Headers>,
    pub stream_info: &'a StreamInfo,
}

/// A rule producing one tag.
pub trait CustomTag: Send + Sync + fmt::Debug {
    /// Name of the tag written.
    fn tag(&self) -> &str;

    /// Value for this transaction, `None` when unavailable.
    fn value<'a>(&'a self, ctx: &CustomTagContext<'a>) -> Option<Cow<'a, str>>;

    /// Write the tag unless the value is missing or empty.
    fn apply_span(&self, span: &mut dyn Span, ctx: &CustomTagContext<'_>) {
        if let Some(value) = self.value(ctx) {
            if !value.is_empty() {
                span.set_tag(self.tag(), &value);
            }
        }
    }
}

#[derive(Debug, Clone)]
pub struct LiteralCustomTag {
    tag: String,
    value: String,
}

impl LiteralCustomTag {
    pub fn new(tag: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            value: value.into(),
        }
    }
}

impl CustomTag for LiteralCustomTag {
    fn tag(&self) -> &str {
        &self.tag
    }

    fn value<'a>(&'a self, _ctx: &CustomTagContext<'a>) -> Option<Cow<'a, str>> {
        Some(Cow::Borrowed(&self.value))
    }
}

/// Resolved from the process environment once, at construction.
#[derive(Debug, Clone)]
pub struct EnvironmentCustomTag {
    tag: String,
    value: Option<String>,
}

impl EnvironmentCustomTag {
    pub fn new(tag: impl Into<String>, name: &str, default_value: Option<String>) -> Self {
        let value = std::env::var(name)
            .ok()
            .filter(|v| !v.is_empty())
            .or(default_value);
        Self {
            tag: tag.into(),
            value,
        }
    }
}

impl CustomTag for EnvironmentCustomTag {
    fn tag(&self) -> &str {
        &self.tag
    }

    fn value<'a>(&'a self, _ctx: &CustomTagContext<'a>) -> Option<Cow<'a, str>> {
        self.value.as_deref().map(Cow::Borrowed)
    }
}

#[derive(Debug, Clone)]
pub struct RequestHeaderCustomTag {
    tag: String,
    name: String,
    default_value: Option<String>,
}

impl RequestHeaderCustomTag {
    pub fn new(tag: impl Into<String>, name: impl Into<String>, default_value: Option<String>) -> Self {
        Self {
            tag: tag.into(),
            name: name.into(),
            default_value,
        }
    }
}

impl CustomTag for RequestHeaderCustomTag {
    fn tag(&self) -> &str {
        &self.tag
    }

    fn value<'a>(&'a self, ctx: &CustomTagContext<'a>) -> Option<Cow<'a, str>> {
        ctx.request_headers
            .and_then(|h| h.get(&self.name))
            .or(self.default_value.as_deref())
            .map(Cow::Borrowed)
    }
}

/// Reads a value out of the transaction's dynamic metadata.
#[derive(Debug, Clone)]
pub struct MetadataCustomTag {
    tag: String,
    namespace: String,
    path: Vec<String>,
    default_value: Option<String>,
}

impl MetadataCustomTag {
    pub fn new(
        tag: impl Into<String>,
        namespace: impl Into<String>,
        path: Vec<String>,
        default_value: Option<String>,
    ) -> Self {
        Self {
            tag: tag.into(),
            namespace: namespace.into(),
            path,
            default_value,
        }
    }
}

impl CustomTag for MetadataCustomTag {
    fn tag(&self) -> &str {
        &self.tag
    }

    fn value<'a>(&'a self, ctx: &CustomTagContext<'a>) -> Option<Cow<'a, str>> {
        let found = ctx
            .stream_info
            .dynamic_metadata
            .namespace(&self.namespace)
            .and_then(|ns| extract::find_nested(ns, &self.path))
            .and_then(render_value);
        found.or_else(|| self.default_value.as_deref().map(Cow::Borrowed))
    }
}

// Strings as-is, scalars rendered, containers JSON-encoded; null is absent.
fn render_value(value: &Value) -> Option<Cow<'_, str>> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(Cow::Borrowed(s)),
        Value::Bool(b) => Some(Cow::Owned(b.to_string())),
        Value::Number(n) => Some(Cow::Owned(n.to_string())),
        Value::Array(_) | Value::Object(_) => Some(Cow::Owned(value.to_string())),
    }
}

/// Build the runtime rule for a configured custom tag.
pub fn from_config(config: &CustomTagConfig) -> Box<dyn CustomTag> {
    match config {
        CustomTagConfig::Literal { tag, value } => Box::new(LiteralCustomTag::new(tag, value)),
        CustomTagConfig::Environment {
            tag,
            name,
            default_value,
        } => Box::new(EnvironmentCustomTag::new(tag, name, default_value.clone())),
        CustomTagConfig::RequestHeader {
            tag,
            name,
            default_value,
        } => Box::new(RequestHeaderCustomTag::new(tag, name, default_value.clone())),
        CustomTagConfig::Metadata {
            tag,
            namespace,
            path,
            default_value,
        } => Box::new(MetadataCustomTag::new(
            tag,
            namespace,
            path.clone(),
            default_value.clone(),
        )),
    }
}
