//! HTTP Error Responses
//!
//! Two shapes: the callable envelope (`{"error": {"status", "message",
//! "details"}}`) for the checkout callable, and a flat `{error, code}` body for
//! everything else.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use serde_json::Value;

use saturno_payments::CallableError;
use saturno_store::StoreError;

/// Callable error body
#[derive(Debug, Serialize)]
struct CallableErrorBody {
    status: &'static str,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<Value>,
}

#[derive(Debug, Serialize)]
struct CallableErrorEnvelope {
    error: CallableErrorBody,
}

/// A [`CallableError`] on its way out of an axum handler
#[derive(Debug)]
pub struct CallableFailure(pub CallableError);

impl From<CallableError> for CallableFailure {
    fn from(err: CallableError) -> Self {
        Self(err)
    }
}

impl IntoResponse for CallableFailure {
    fn into_response(self) -> Response {
        let CallableError {
            code,
            message,
            details,
        } = self.0;
        let status =
            StatusCode::from_u16(code.http_status()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        let body = CallableErrorEnvelope {
            error: CallableErrorBody {
                status: code.status(),
                message,
                details,
            },
        };

        (status, Json(body)).into_response()
    }
}

/// Error body for the non-callable routes
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: String,
}

/// Errors of the trigger and data routes
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid document path: {0}")]
    InvalidDocument(String),

    #[error(transparent)]
    Store(#[from] StoreError),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code) = match &self {
            Self::NotFound(_) => (StatusCode::NOT_FOUND, "NOT_FOUND"),
            Self::InvalidDocument(_) => (StatusCode::BAD_REQUEST, "INVALID_DOCUMENT"),
            Self::Store(StoreError::NotFound(_)) => (StatusCode::NOT_FOUND, "NOT_FOUND"),
            Self::Store(StoreError::RevisionConflict { .. }) => (StatusCode::CONFLICT, "CONFLICT"),
            Self::Store(_) => (StatusCode::INTERNAL_SERVER_ERROR, "STORE_ERROR"),
        };

        if status.is_server_error() {
            tracing::error!(error = %self, "Request failed");
        }

        (
            status,
            Json(ErrorResponse {
                error: self.to_string(),
                code: code.into(),
            }),
        )
            .into_response()
    }
}
