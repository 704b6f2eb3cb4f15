use std::time::Duration;

use shared::error::Failure;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ClassifyError {
    #[error("failed to build HTTP client: {0}")]
    Client(#[source] reqwest::Error),
    #[error("invalid classifier endpoint: {0}")]
    InvalidEndpoint(#[from] url::ParseError),
    #[error("classifier request timed out after {0:?}")]
    Timeout(Duration),
    #[error("classifier request failed: {0}")]
    Request(#[source] reqwest::Error),
    #[error("classifier replied with status {status} and an unparseable body: {source}")]
    MalformedBody {
        status: u16,
        #[source]
        source: serde_json::Error,
    },
    #[error("classifier reply with status {status} is missing `{field}`")]
    MissingField { status: u16, field: &'static str },
}

impl ClassifyError {
    /// Every way a round trip can fail collapses into the same user-facing
    /// message; the detail only goes to the log.
    pub fn failure(&self) -> Failure {
        Failure::transport()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown overlap policy `{0}` (expected `ignore_while_pending` or `last_write_wins`)")]
pub struct UnknownOverlapPolicy(pub String);
