//! Trace eligibility.

use serde::{Deserialize, Serialize};

use crate::stream_info::StreamInfo;

/// Why a transaction is, or is not, traced.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Reason {
    #[default]
    NotTraceable,
    HealthCheck,
    Sampling,
    ServiceForced,
    ClientForced,
}

impl Reason {
    pub fn as_str(self) -> &'static str {
        match self {
            Reason::NotTraceable => "not_traceable",
            Reason::HealthCheck => "health_check",
            Reason::Sampling => "sampling",
            Reason::ServiceForced => "service_forced",
            Reason::ClientForced => "client_forced",
        }
    }
}

/// Outcome of [`should_trace_request`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Decision {
    pub reason: Reason,
    pub traced: bool,
}

/// Decide whether a transaction is traced.
///
/// Health checks are never traced, whatever reason the pipeline carried.
/// Otherwise only client-forced, service-forced and sampled transactions are.
pub fn should_trace_request(stream_info: &StreamInfo) -> Decision {
    if stream_info.health_check {
        Decision {
            reason: Reason::HealthCheck,
            traced: false,
        }
    } else {
        let reason = stream_info.trace_reason;
        let traced = matches!(
            reason,
            Reason::ClientForced | Reason::ServiceForced | Reason::Sampling
        );
        Decision { reason, traced }
    }
}
