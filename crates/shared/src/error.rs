use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const EMPTY_INPUT_MESSAGE: &str = "Please enter some text.";
pub const TRANSPORT_FAILURE_MESSAGE: &str = "Something went wrong. Please try again.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    /// Blank input, caught before any request is made.
    Validation,
    /// The classifier answered with an error payload.
    Application,
    /// The round trip did not complete with a usable reply.
    Transport,
}

/// User-facing failure shown in place of a prediction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Error)]
#[error("{message}")]
pub struct Failure {
    pub kind: FailureKind,
    pub message: String,
}

impl Failure {
    pub fn new(kind: FailureKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    pub fn empty_input() -> Self {
        Self::new(FailureKind::Validation, EMPTY_INPUT_MESSAGE)
    }

    pub fn application(message: impl Into<String>) -> Self {
        Self::new(FailureKind::Application, message)
    }

    pub fn transport() -> Self {
        Self::new(FailureKind::Transport, TRANSPORT_FAILURE_MESSAGE)
    }
}
