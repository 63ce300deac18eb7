use axum::{
    Json,
    extract::rejection::{JsonRejection, PathRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

use crate::core::TodoError;

/// Adapter-level failure. Everything a handler can fail with ends up here
/// and always becomes a response.
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("{0}")]
    BadRequest(String),
    #[error("{0}")]
    NotFound(String),
    /// An extractor rejection that keeps axum's own status, e.g. 413 for an
    /// oversized body.
    #[error("{message}")]
    Rejected { status: StatusCode, message: String },
    /// Backend failure. `message` is what the client sees, `cause` is only logged.
    #[error("{message}: {cause}")]
    Internal { message: &'static str, cause: String },
}

impl ApiError {
    /// Maps a domain error, using `message` as the client-facing text for 500s.
    pub fn from_todo(err: TodoError, message: &'static str) -> Self {
        match err {
            TodoError::InvalidInput(msg) => Self::BadRequest(msg),
            TodoError::NotFound(_) => Self::NotFound(err.to_string()),
            TodoError::Storage(e) => Self::Internal {
                message,
                cause: e.to_string(),
            },
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Rejected { status, .. } => *status,
            Self::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        match rejection {
            JsonRejection::BytesRejection(_) => Self::Rejected {
                status: rejection.status(),
                message: rejection.body_text(),
            },
            _ => Self::BadRequest(rejection.body_text()),
        }
    }
}

impl From<PathRejection> for ApiError {
    fn from(rejection: PathRejection) -> Self {
        Self::Rejected {
            status: rejection.status(),
            message: rejection.body_text(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = match self {
            Self::BadRequest(msg) | Self::NotFound(msg) => msg,
            Self::Rejected { message, .. } => message,
            Self::Internal { message, cause } => {
                tracing::error!(error = %cause, "{message}");
                message.to_string()
            }
        };
        (status, Json(json!({ "error": message }))).into_response()
    }
}
