//! gRPC status classification.
//!
//! # Design Decisions
//! - Client-caused outcomes are tagged but not flagged as errors
//! - Server-caused outcomes set the span's `error` tag; alerting keys off it
//! - Unparseable values are an invalid sentinel that never classifies
//! - Numeric codes outside the well-known set are tagged but never classify

/// Well-known gRPC status codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GrpcStatus {
    Ok = 0,
    Canceled = 1,
    Unknown = 2,
    InvalidArgument = 3,
    DeadlineExceeded = 4,
    NotFound = 5,
    AlreadyExists = 6,
    PermissionDenied = 7,
    ResourceExhausted = 8,
    FailedPrecondition = 9,
    Aborted = 10,
    OutOfRange = 11,
    Unimplemented = 12,
    Internal = 13,
    Unavailable = 14,
    DataLoss = 15,
    Unauthenticated = 16,
}

impl GrpcStatus {
    pub fn from_code(code: u64) -> Option<Self> {
        let status = match code {
            0 => GrpcStatus::Ok,
            1 => GrpcStatus::Canceled,
            2 => GrpcStatus::Unknown,
            3 => GrpcStatus::InvalidArgument,
            4 => GrpcStatus::DeadlineExceeded,
            5 => GrpcStatus::NotFound,
            6 => GrpcStatus::AlreadyExists,
            7 => GrpcStatus::PermissionDenied,
            8 => GrpcStatus::ResourceExhausted,
            9 => GrpcStatus::FailedPrecondition,
            10 => GrpcStatus::Aborted,
            11 => GrpcStatus::OutOfRange,
            12 => GrpcStatus::Unimplemented,
            13 => GrpcStatus::Internal,
            14 => GrpcStatus::Unavailable,
            15 => GrpcStatus::DataLoss,
            16 => GrpcStatus::Unauthenticated,
            _ => return None,
        };
        Some(status)
    }

    pub fn code(self) -> u64 {
        self as u64
    }

    /// True when the status blames the upstream rather than the client.
    pub fn is_upstream_error(self) -> bool {
        match self {
            GrpcStatus::Ok
            | GrpcStatus::Canceled
            | GrpcStatus::InvalidArgument
            | GrpcStatus::NotFound
            | GrpcStatus::AlreadyExists
            | GrpcStatus::PermissionDenied
            | GrpcStatus::FailedPrecondition
            | GrpcStatus::Aborted
            | GrpcStatus::OutOfRange
            | GrpcStatus::Unauthenticated => false,
            GrpcStatus::Unknown
            | GrpcStatus::DeadlineExceeded
            | GrpcStatus::Unimplemented
            | GrpcStatus::ResourceExhausted
            | GrpcStatus::Internal
            | GrpcStatus::Unavailable
            | GrpcStatus::DataLoss => true,
        }
    }
}

/// A `grpc-status` header value after parsing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParsedStatus {
    /// Not a number.
    Invalid,
    /// Numeric but outside the well-known set.
    Unrecognized(u64),
    Known(GrpcStatus),
}

/// Parse a raw `grpc-status` value. `None` means the header was absent.
pub fn parse_status(raw: Option<&str>) -> Option<ParsedStatus> {
    let raw = raw?;
    let parsed = match raw.trim().parse::<u64>() {
        Ok(code) => match GrpcStatus::from_code(code) {
            Some(status) => ParsedStatus::Known(status),
            None => ParsedStatus::Unrecognized(code),
        },
        Err(_) => ParsedStatus::Invalid,
    };
    Some(parsed)
}

/// Classification of a present status header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Classification {
    /// Value for the `grpc.status_code` tag (the header as received).
    pub tag: String,
    pub is_upstream_error: bool,
}

/// Classify a raw `grpc-status` value.
///
/// Returns `None` when the header is absent. A present but invalid or
/// unrecognized value is still tagged, with no error flag.
pub fn classify(raw: Option<&str>) -> Option<Classification> {
    let parsed = parse_status(raw)?;
    let is_upstream_error = match parsed {
        ParsedStatus::Known(status) => status.is_upstream_error(),
        ParsedStatus::Invalid | ParsedStatus::Unrecognized(_) => false,
    };
    Some(Classification {
        tag: raw.unwrap_or_default().to_string(),
        is_upstream_error,
    })
}
