//! Response flags and their short-code rendering.

use serde::{Deserialize, Serialize};

/// Conditions the proxy observed while handling a transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ResponseFlag {
    #[serde(rename = "LH")]
    FailedLocalHealthCheck,
    #[serde(rename = "UH")]
    NoHealthyUpstream,
    #[serde(rename = "UT")]
    UpstreamRequestTimeout,
    #[serde(rename = "LR")]
    LocalReset,
    #[serde(rename = "UR")]
    UpstreamRemoteReset,
    #[serde(rename = "UF")]
    UpstreamConnectionFailure,
    #[serde(rename = "UC")]
    UpstreamConnectionTermination,
    #[serde(rename = "UO")]
    UpstreamOverflow,
    #[serde(rename = "NR")]
    NoRouteFound,
    #[serde(rename = "DI")]
    DelayInjected,
    #[serde(rename = "FI")]
    FaultInjected,
    #[serde(rename = "RL")]
    RateLimited,
    #[serde(rename = "UAEX")]
    UnauthorizedExternalService,
    #[serde(rename = "RLSE")]
    RateLimitServiceError,
    #[serde(rename = "DC")]
    DownstreamConnectionTermination,
    #[serde(rename = "URX")]
    UpstreamRetryLimitExceeded,
    #[serde(rename = "SI")]
    StreamIdleTimeout,
    #[serde(rename = "IH")]
    InvalidRequestHeaders,
    #[serde(rename = "DPE")]
    DownstreamProtocolError,
    #[serde(rename = "UMSDR")]
    UpstreamMaxStreamDurationReached,
    #[serde(rename = "RFCF")]
    ResponseFromCacheFilter,
    #[serde(rename = "NFCF")]
    NoFilterConfigFound,
    #[serde(rename = "DT")]
    DurationTimeout,
    #[serde(rename = "UPE")]
    UpstreamProtocolError,
    #[serde(rename = "NC")]
    NoClusterFound,
    #[serde(rename = "OM")]
    OverloadManager,
}

impl ResponseFlag {
    /// Every flag, in rendering order.
    pub const ALL: [ResponseFlag; 26] = [
        ResponseFlag::FailedLocalHealthCheck,
        ResponseFlag::NoHealthyUpstream,
        ResponseFlag::UpstreamRequestTimeout,
        ResponseFlag::LocalReset,
        ResponseFlag::UpstreamRemoteReset,
        ResponseFlag::UpstreamConnectionFailure,
        ResponseFlag::UpstreamConnectionTermination,
        ResponseFlag::UpstreamOverflow,
        ResponseFlag::NoRouteFound,
        ResponseFlag::DelayInjected,
        ResponseFlag::FaultInjected,
        ResponseFlag::RateLimited,
        ResponseFlag::UnauthorizedExternalService,
        ResponseFlag::RateLimitServiceError,
        ResponseFlag::DownstreamConnectionTermination,
        ResponseFlag::UpstreamRetryLimitExceeded,
        ResponseFlag::StreamIdleTimeout,
        ResponseFlag::InvalidRequestHeaders,
        ResponseFlag::DownstreamProtocolError,
        ResponseFlag::UpstreamMaxStreamDurationReached,
        ResponseFlag::ResponseFromCacheFilter,
        ResponseFlag::NoFilterConfigFound,
        ResponseFlag::DurationTimeout,
        ResponseFlag::UpstreamProtocolError,
        ResponseFlag::NoClusterFound,
        ResponseFlag::OverloadManager,
    ];

    pub fn short_code(self) -> &'static str {
        match self {
            ResponseFlag::FailedLocalHealthCheck => "LH",
            ResponseFlag::NoHealthyUpstream => "UH",
            ResponseFlag::UpstreamRequestTimeout => "UT",
            ResponseFlag::LocalReset => "LR",
            ResponseFlag::UpstreamRemoteReset => "UR",
            ResponseFlag::UpstreamConnectionFailure => "UF",
            ResponseFlag::UpstreamConnectionTermination => "UC",
            ResponseFlag::UpstreamOverflow => "UO",
            ResponseFlag::NoRouteFound => "NR",
            ResponseFlag::DelayInjected => "DI",
            ResponseFlag::FaultInjected => "FI",
            ResponseFlag::RateLimited => "RL",
            ResponseFlag::UnauthorizedExternalService => "UAEX",
            ResponseFlag::RateLimitServiceError => "RLSE",
            ResponseFlag::DownstreamConnectionTermination => "DC",
            ResponseFlag::UpstreamRetryLimitExceeded => "URX",
            ResponseFlag::StreamIdleTimeout => "SI",
            ResponseFlag::InvalidRequestHeaders => "IH",
            ResponseFlag::DownstreamProtocolError => "DPE",
            ResponseFlag::UpstreamMaxStreamDurationReached => "UMSDR",
            ResponseFlag::ResponseFromCacheFilter => "RFCF",
            ResponseFlag::NoFilterConfigFound => "NFCF",
            ResponseFlag::DurationTimeout => "DT",
            ResponseFlag::UpstreamProtocolError => "UPE",
            ResponseFlag::NoClusterFound => "NC",
            ResponseFlag::OverloadManager => "OM",
        }
    }
}

/// Comma-joined short codes in table order, `-` when no flag is set.
/// Duplicates in `flags` render once.
pub fn to_short_string(flags: &[ResponseFlag]) -> String {
    let codes: Vec<&str> = ResponseFlag::ALL
        .into_iter()
        .filter(|f| flags.contains(f))
        .map(ResponseFlag::short_code)
        .collect();
    if codes.is_empty() {
        "-".to_string()
    } else {
        codes.join(",")
    }
}
