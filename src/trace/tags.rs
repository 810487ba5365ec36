//! Tag and log-event names written by the finalizer.
//!
//! Operators' dashboards key on these exact strings.

pub const COMPONENT: &str = "component";
pub const PROXY: &str = "proxy";
pub const UPSTREAM_CLUSTER: &str = "upstream_cluster";
pub const UPSTREAM_CLUSTER_NAME: &str = "upstream_cluster.name";
pub const HTTP_STATUS_CODE: &str = "http.status_code";
pub const RESPONSE_FLAGS: &str = "response_flags";
pub const ERROR: &str = "error";
pub const TRUE: &str = "true";
pub const NODE_ID: &str = "node_id";
pub const ZONE: &str = "zone";
pub const GUID_X_REQUEST_ID: &str = "guid:x-request-id";
pub const GUID_X_CLIENT_TRACE_ID: &str = "guid:x-client-trace-id";
pub const HTTP_URL: &str = "http.url";
pub const HTTP_METHOD: &str = "http.method";
pub const DOWNSTREAM_CLUSTER: &str = "downstream_cluster";
pub const USER_AGENT: &str = "user_agent";
pub const HTTP_PROTOCOL: &str = "http.protocol";
pub const PEER_ADDRESS: &str = "peer.address";
pub const UPSTREAM_ADDRESS: &str = "upstream_address";
pub const GRPC_PATH: &str = "grpc.path";
pub const GRPC_AUTHORITY: &str = "grpc.authority";
pub const GRPC_CONTENT_TYPE: &str = "grpc.content_type";
pub const GRPC_TIMEOUT: &str = "grpc.timeout";
pub const GRPC_STATUS_CODE: &str = "grpc.status_code";
pub const GRPC_MESSAGE: &str = "grpc.message";
pub const REQUEST_SIZE: &str = "request_size";
pub const RESPONSE_SIZE: &str = "response_size";
pub const REQUEST_HEADERS: &str = "request_headers";
pub const REQUEST_HEADERS_LENGTH: &str = "request_headers.length";
pub const RESPONSE_HEADERS: &str = "response_headers";
pub const RESPONSE_HEADERS_LENGTH: &str = "response_headers.length";
pub const REQUEST_BODY: &str = "request_body";
pub const REQUEST_BODY_LENGTH: &str = "request_body.length";
pub const RESPONSE_BODY: &str = "response_body";
pub const RESPONSE_BODY_LENGTH: &str = "response_body.length";
pub const REQUEST_ID: &str = "RequestId";

/// Every tag name the finalizer itself writes. Custom tags may not reuse these.
pub const RESERVED: &[&str] = &[
    COMPONENT,
    UPSTREAM_CLUSTER,
    UPSTREAM_CLUSTER_NAME,
    HTTP_STATUS_CODE,
    RESPONSE_FLAGS,
    ERROR,
    NODE_ID,
    ZONE,
    GUID_X_REQUEST_ID,
    GUID_X_CLIENT_TRACE_ID,
    HTTP_URL,
    HTTP_METHOD,
    DOWNSTREAM_CLUSTER,
    USER_AGENT,
    HTTP_PROTOCOL,
    PEER_ADDRESS,
    UPSTREAM_ADDRESS,
    GRPC_PATH,
    GRPC_AUTHORITY,
    GRPC_CONTENT_TYPE,
    GRPC_TIMEOUT,
    GRPC_STATUS_CODE,
    GRPC_MESSAGE,
    REQUEST_SIZE,
    RESPONSE_SIZE,
    REQUEST_HEADERS,
    REQUEST_HEADERS_LENGTH,
    RESPONSE_HEADERS,
    RESPONSE_HEADERS_LENGTH,
    REQUEST_BODY,
    REQUEST_BODY_LENGTH,
    RESPONSE_BODY,
    RESPONSE_BODY_LENGTH,
    REQUEST_ID,
];

pub fn is_reserved(name: &str) -> bool {
    RESERVED.contains(&name)
}

/// Event names for verbose timing annotations.
pub mod logs {
    pub const LAST_DOWNSTREAM_RX_BYTE_RECEIVED: &str = "last_downstream_rx_byte_received";
    pub const FIRST_UPSTREAM_TX_BYTE_SENT: &str = "first_upstream_tx_byte_sent";
    pub const LAST_UPSTREAM_TX_BYTE_SENT: &str = "last_upstream_tx_byte_sent";
    pub const FIRST_UPSTREAM_RX_BYTE_RECEIVED: &str = "first_upstream_rx_byte_received";
    pub const LAST_UPSTREAM_RX_BYTE_RECEIVED: &str = "last_upstream_rx_byte_received";
    pub const FIRST_DOWNSTREAM_TX_BYTE_SENT: &str = "first_downstream_tx_byte_sent";
    pub const LAST_DOWNSTREAM_TX_BYTE_SENT: &str = "last_downstream_tx_byte_sent";
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reserved_names_are_unique() {
        let mut names = RESERVED.to_vec();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), RESERVED.len());
        assert!(is_reserved("peer.address"));
        assert!(!is_reserved("tenant"));
    }
}
