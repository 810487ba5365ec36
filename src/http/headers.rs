//! Ordered header collection used by the trace finalizer.
//!
//! # Responsibilities
//! - Hold request headers, response headers, and trailers in arrival order
//! - Look up well-known headers (pseudo-headers, gRPC, request IDs)
//! - Detect gRPC requests from the content type
//! - Render the `k=v; ` dump and the original request URI used as tags
//!
//! # Design Decisions
//! - Names are stored lowercase; lookups are case-insensitive
//! - Duplicate names are kept; lookups return the first value
//! - Pseudo-headers (`:method`, `:path`, ...) are ordinary entries so a dump
//!   shows exactly what the proxy saw

use std::fmt::Write as _;

use axum::http::request::Parts;
use axum::http::HeaderMap;
use serde::{Deserialize, Serialize};

/// Well-known header names.
pub mod names {
    pub const METHOD: &str = ":method";
    pub const PATH: &str = ":path";
    pub const AUTHORITY: &str = ":authority";
    pub const SCHEME: &str = ":scheme";
    pub const HOST: &str = "host";
    pub const CONTENT_TYPE: &str = "content-type";
    pub const USER_AGENT: &str = "user-agent";
    pub const REQUEST_ID: &str = "x-request-id";
    pub const CLIENT_TRACE_ID: &str = "x-client-trace-id";
    pub const FORWARDED_PROTO: &str = "x-forwarded-proto";
    pub const ORIGINAL_PATH: &str = "x-envoy-original-path";
    pub const DOWNSTREAM_SERVICE_CLUSTER: &str = "x-envoy-downstream-service-cluster";
    pub const GRPC_TIMEOUT: &str = "grpc-timeout";
    pub const GRPC_STATUS: &str = "grpc-status";
    pub const GRPC_MESSAGE: &str = "grpc-message";
}

const GRPC_CONTENT_TYPE: &str = "application/grpc";

/// An ordered header multimap.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Headers {
    entries: Vec<(String, String)>,
}

impl Headers {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a header, keeping any existing values for the same name.
    pub fn add(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.entries
            .push((name.into().to_ascii_lowercase(), value.into()));
    }

    /// Builder-style variant of [`Headers::add`].
    pub fn with(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.add(name, value);
        self
    }

    /// First value for `name`, if any.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn method(&self) -> Option<&str> {
        self.get(names::METHOD)
    }

    pub fn path(&self) -> Option<&str> {
        self.get(names::PATH)
    }

    /// The `:authority` pseudo-header, falling back to `host` for HTTP/1 captures.
    pub fn host(&self) -> Option<&str> {
        self.get(names::AUTHORITY).or_else(|| self.get(names::HOST))
    }

    pub fn content_type(&self) -> Option<&str> {
        self.get(names::CONTENT_TYPE)
    }

    pub fn user_agent(&self) -> Option<&str> {
        self.get(names::USER_AGENT)
    }

    pub fn request_id(&self) -> Option<&str> {
        self.get(names::REQUEST_ID)
    }

    pub fn client_trace_id(&self) -> Option<&str> {
        self.get(names::CLIENT_TRACE_ID)
    }

    pub fn downstream_service_cluster(&self) -> Option<&str> {
        self.get(names::DOWNSTREAM_SERVICE_CLUSTER)
    }

    pub fn grpc_timeout(&self) -> Option<&str> {
        self.get(names::GRPC_TIMEOUT)
    }

    pub fn grpc_status(&self) -> Option<&str> {
        self.get(names::GRPC_STATUS)
    }

    pub fn grpc_message(&self) -> Option<&str> {
        self.get(names::GRPC_MESSAGE)
    }

    /// True when the content type marks a gRPC request
    /// (`application/grpc`, `application/grpc+proto`, `application/grpc;...`).
    pub fn is_grpc_request(&self) -> bool {
        match self.content_type() {
            Some(ct) => match ct.strip_prefix(GRPC_CONTENT_TYPE) {
                Some(rest) => rest.is_empty() || rest.starts_with('+') || rest.starts_with(';'),
                None => false,
            },
            None => false,
        }
    }

    /// Render every entry as `name=value; ` in arrival order.
    pub fn dump(&self) -> String {
        let mut out = String::new();
        for (k, v) in self.iter() {
            let _ = write!(out, "{}={}; ", k, v);
        }
        out
    }

    /// Rebuild the URI the client originally requested.
    ///
    /// Returns an empty string when there is no `:path`. The path (or
    /// `x-envoy-original-path` when a rewrite happened) is truncated to
    /// `max_path_length` bytes.
    pub fn original_uri(&self, max_path_length: usize) -> String {
        let Some(path) = self.path() else {
            return String::new();
        };
        let path = self.get(names::ORIGINAL_PATH).unwrap_or(path);
        let path = truncate_on_char_boundary(path, max_path_length);
        let scheme = self
            .get(names::FORWARDED_PROTO)
            .or_else(|| self.get(names::SCHEME))
            .unwrap_or("http");
        format!("{}://{}{}", scheme, self.host().unwrap_or_default(), path)
    }

    /// Capture request headers, synthesizing the pseudo-headers from the
    /// method and URI. A `host` header becomes `:authority` when the URI has
    /// no authority of its own.
    pub fn from_request_parts(parts: &Parts) -> Self {
        let mut headers = Headers::new();
        headers.add(names::METHOD, parts.method.as_str());
        if let Some(scheme) = parts.uri.scheme_str() {
            headers.add(names::SCHEME, scheme);
        }
        let authority_from_host = parts.uri.authority().is_none();
        let authority = match parts.uri.authority() {
            Some(a) => Some(a.as_str().to_string()),
            None => parts
                .headers
                .get(axum::http::header::HOST)
                .map(|v| String::from_utf8_lossy(v.as_bytes()).into_owned()),
        };
        if let Some(authority) = authority {
            headers.add(names::AUTHORITY, authority);
        }
        let path = parts
            .uri
            .path_and_query()
            .map(|pq| pq.as_str())
            .unwrap_or("/");
        headers.add(names::PATH, path);

        for (name, value) in parts.headers.iter() {
            if authority_from_host && *name == axum::http::header::HOST {
                continue;
            }
            headers.add(name.as_str(), String::from_utf8_lossy(value.as_bytes()));
        }
        headers
    }
}

impl From<&HeaderMap> for Headers {
    fn from(map: &HeaderMap) -> Self {
        map.iter()
            .map(|(k, v)| (k.as_str(), String::from_utf8_lossy(v.as_bytes())))
            .collect()
    }
}

impl<K, V> FromIterator<(K, V)> for Headers
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut headers = Headers::new();
        for (k, v) in iter {
            headers.add(k, v);
        }
        headers
    }
}

fn truncate_on_char_boundary(s: &str, max: usize) -> &str {
    if s.len() <= max {
        return s;
    }
    let mut end = max;
    while !s.is_char_boundary(end) {
        end -= 1;
    }
    &s[..end]
}
