use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FetchErrorKind {
    NetworkFailure,
    ServiceError,
    MalformedPayload,
}

/// Failure of a single request against the content service.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchError {
    #[error("content service unreachable: {message}")]
    NetworkFailure { message: String },
    #[error("content service responded with status {status_code}")]
    ServiceError { status_code: u16 },
    #[error("content service payload unusable: {message}")]
    MalformedPayload { message: String },
}

impl FetchError {
    pub fn network(message: impl Into<String>) -> Self {
        Self::NetworkFailure {
            message: message.into(),
        }
    }

    pub fn malformed(message: impl Into<String>) -> Self {
        Self::MalformedPayload {
            message: message.into(),
        }
    }

    pub fn kind(&self) -> FetchErrorKind {
        match self {
            Self::NetworkFailure { .. } => FetchErrorKind::NetworkFailure,
            Self::ServiceError { .. } => FetchErrorKind::ServiceError,
            Self::MalformedPayload { .. } => FetchErrorKind::MalformedPayload,
        }
    }

    pub fn status_code(&self) -> Option<u16> {
        match self {
            Self::ServiceError { status_code } => Some(*status_code),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown category filter '{value}'")]
pub struct ParseCategoryError {
    pub value: String,
}
