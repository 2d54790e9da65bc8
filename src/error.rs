use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::db::StoreError;

/// Error body returned by every failing endpoint
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

#[derive(Error, Debug)]
pub enum AppError {
    /// Malformed input: bad JSON, missing field, unparsable date or time
    #[error("{error}")]
    Format {
        error: String,
        message: Option<String>,
    },

    /// Well-formed input that breaks a ticket rule
    #[error("{error}")]
    Validation {
        error: String,
        message: Option<String>,
    },

    #[error("Ticket not found")]
    NotFound,

    /// Storage failure; `context` is the client-facing summary
    #[error("{context}: {source}")]
    Store {
        context: &'static str,
        #[source]
        source: StoreError,
    },

    #[error("Internal server error")]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    pub fn format(error: impl Into<String>) -> Self {
        AppError::Format {
            error: error.into(),
            message: None,
        }
    }

    pub fn format_with(error: impl Into<String>, message: impl Into<String>) -> Self {
        AppError::Format {
            error: error.into(),
            message: Some(message.into()),
        }
    }

    pub fn validation(error: impl Into<String>) -> Self {
        AppError::Validation {
            error: error.into(),
            message: None,
        }
    }

    pub fn validation_with(error: impl Into<String>, message: impl Into<String>) -> Self {
        AppError::Validation {
            error: error.into(),
            message: Some(message.into()),
        }
    }

    /// Wraps a store error, keeping `NotFound` distinct
    pub fn store(context: &'static str, source: StoreError) -> Self {
        match source {
            StoreError::NotFound(_) => AppError::NotFound,
            source => AppError::Store { context, source },
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::Format { .. } | AppError::Validation { .. } => StatusCode::BAD_REQUEST,
            AppError::NotFound => StatusCode::NOT_FOUND,
            AppError::Store { .. } | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn to_response_body(&self) -> ErrorResponse {
        match self {
            AppError::Format { error, message } | AppError::Validation { error, message } => {
                ErrorResponse {
                    error: error.clone(),
                    message: message.clone(),
                }
            }
            AppError::NotFound => ErrorResponse {
                error: "Ticket not found".to_string(),
                message: None,
            },
            AppError::Store { context, .. } => ErrorResponse {
                error: context.to_string(),
                message: None,
            },
            AppError::Internal(_) => ErrorResponse {
                error: "Internal server error".to_string(),
                message: None,
            },
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match &self {
            AppError::Store { context, source } => {
                tracing::error!(error = %source, "{}", context);
            }
            AppError::Internal(err) => {
                tracing::error!(error = ?err, "Internal server error");
            }
            _ => {}
        }

        (self.status_code(), Json(self.to_response_body())).into_response()
    }
}

pub type Result<T> = std::result::Result<T, AppError>;
