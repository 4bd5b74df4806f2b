use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Raised before any network traffic when the submitted form is unusable.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("initial investment must be a number greater than zero (got '{0}')")]
    NotPositiveNumber(String),
    #[error("number of years must be a whole number of at least 1 (got '{0}')")]
    NotPositiveInteger(String),
    #[error("risk tolerance must be one of low, medium, high (got '{0}')")]
    InvalidEnum(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    Transport,
    MalformedResponse,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ClientError {
    #[error("simulation service unreachable: {0}")]
    TransportFailure(String),
    #[error("simulation service returned an unusable response: {0}")]
    MalformedResponse(String),
}

impl ClientError {
    pub fn transport(detail: impl Into<String>) -> Self {
        Self::TransportFailure(detail.into())
    }

    pub fn malformed(detail: impl Into<String>) -> Self {
        Self::MalformedResponse(detail.into())
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::TransportFailure(_) => ErrorKind::Transport,
            Self::MalformedResponse(_) => ErrorKind::MalformedResponse,
        }
    }

    pub fn detail(&self) -> &str {
        match self {
            Self::TransportFailure(detail) | Self::MalformedResponse(detail) => detail,
        }
    }

    /// Short message suitable for end users; the two kinds stay distinguishable.
    pub fn user_message(&self) -> &'static str {
        match self.kind() {
            ErrorKind::Transport => {
                "Could not reach the simulation service; check the service URL and retry."
            }
            ErrorKind::MalformedResponse => {
                "The simulation service answered with data that could not be read."
            }
        }
    }
}
