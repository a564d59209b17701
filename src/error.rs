use serde::Serialize;
use strum::Display;
use thiserror::Error;
use tracing::error;

/// Errors surfaced by the fetch, publish and validation pipelines.
#[derive(Debug, Error)]
pub enum SyncError {
    /// Malformed or missing input. Never retried.
    #[error("{0}")]
    Validation(String),

    /// The remote identifier does not exist.
    #[error("{0}")]
    NotFound(String),

    /// A remote call failed or returned data we could not use.
    #[error("{service}: {message}")]
    ExternalService {
        service: &'static str,
        message: String,
    },

    /// The token was rejected.
    #[error("{0}")]
    Unauthorized(String),

    #[error("internal error")]
    Internal(#[from] anyhow::Error),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Display)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCategory {
    #[serde(rename = "VALIDATION_ERROR")]
    #[strum(serialize = "VALIDATION_ERROR")]
    Validation,
    NotFound,
    #[serde(rename = "EXTERNAL_API_ERROR")]
    #[strum(serialize = "EXTERNAL_API_ERROR")]
    ExternalService,
    Unauthorized,
    #[serde(rename = "INTERNAL_ERROR")]
    #[strum(serialize = "INTERNAL_ERROR")]
    Internal,
}

/// Structured failure handed back to callers instead of a half-populated success.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Failure {
    pub category: ErrorCategory,
    pub message: String,
}

impl SyncError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    pub fn external(service: &'static str, msg: impl Into<String>) -> Self {
        Self::ExternalService {
            service,
            message: msg.into(),
        }
    }

    pub fn unauthorized(msg: impl Into<String>) -> Self {
        Self::Unauthorized(msg.into())
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::Validation(_) => ErrorCategory::Validation,
            Self::NotFound(_) => ErrorCategory::NotFound,
            Self::ExternalService { .. } => ErrorCategory::ExternalService,
            Self::Unauthorized(_) => ErrorCategory::Unauthorized,
            Self::Internal(_) => ErrorCategory::Internal,
        }
    }
}

impl From<SyncError> for Failure {
    fn from(err: SyncError) -> Self {
        if let SyncError::Internal(source) = &err {
            error!("internal failure: {:#}", source);
        }
        Self {
            category: err.category(),
            message: err.to_string(),
        }
    }
}

pub type Result<T, E = SyncError> = std::result::Result<T, E>;
