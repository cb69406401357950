use std::fmt;

use crate::relay::RelayError;
use crate::staged::StagedInput;

pub type RequestId = u64;

/// Remote operations exposed by the Prompt Pages API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Endpoint {
    Summary,
    Qa,
}

impl Endpoint {
    pub fn path(self) -> &'static str {
        match self {
            Endpoint::Summary => "/summary",
            Endpoint::Qa => "/qa",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineEvent {
    /// Best-effort address of the host's active tab.
    ActiveTabResolved(Option<String>),
    /// Staged values read from the relay; empty when the read failed.
    StagedLoaded(StagedInput),
    /// An outbound call settled. On success the payload is rendered HTML.
    RequestCompleted {
        request_id: RequestId,
        endpoint: Endpoint,
        result: Result<String, ApiError>,
    },
    /// A relay merge-write was acknowledged or failed.
    Persisted { result: Result<(), RelayError> },
}

/// Failure of one API call. `Display` yields the text shown after `Error: `.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiError {
    pub kind: FailureKind,
    pub message: String,
}

impl ApiError {
    pub(crate) fn new(kind: FailureKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

impl std::error::Error for ApiError {}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    InvalidEndpoint,
    Network,
    Timeout,
    HttpStatus(u16),
    MalformedResponse,
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureKind::InvalidEndpoint => write!(f, "invalid endpoint"),
            FailureKind::Network => write!(f, "network error"),
            FailureKind::Timeout => write!(f, "timeout"),
            FailureKind::HttpStatus(code) => write!(f, "http status {code}"),
            FailureKind::MalformedResponse => write!(f, "malformed response"),
        }
    }
}
