//! API error types.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use tracing::error;

use crate::lifecycle::LifecycleError;

/// Errors surfaced by the HTTP layer.
///
/// Internal failures map to a generic 500: store and prover detail is
/// logged, never returned to the caller. The callback endpoint in
/// particular talks to an unauthenticated party and learns nothing beyond
/// success/failure.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("unknown verification type: {0}")]
    InvalidVerificationType(String),

    #[error("verification request not found")]
    NotFound,

    #[error("invalid proof")]
    InvalidProof,

    #[error("malformed claim context")]
    MalformedClaimContext,

    #[error("missing parameter: {0}")]
    MissingParameter(&'static str),

    #[error("internal error")]
    Internal,
}

impl From<LifecycleError> for ApiError {
    fn from(e: LifecycleError) -> Self {
        match e {
            LifecycleError::InvalidVerificationType(t) => ApiError::InvalidVerificationType(t),
            LifecycleError::NotFound => ApiError::NotFound,
            LifecycleError::InvalidProof => ApiError::InvalidProof,
            LifecycleError::MalformedClaimContext(detail) => {
                error!(detail = %detail, "malformed claim context");
                ApiError::MalformedClaimContext
            }
            LifecycleError::Session(detail) => {
                error!(detail = %detail, "prover session failure");
                ApiError::Internal
            }
            LifecycleError::Store(e) => {
                error!(error = %e, "store failure");
                ApiError::Internal
            }
        }
    }
}

impl ApiError {
    fn status(&self) -> StatusCode {
        match self {
            ApiError::InvalidVerificationType(_)
            | ApiError::InvalidProof
            | ApiError::MalformedClaimContext
            | ApiError::MissingParameter(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound => StatusCode::NOT_FOUND,
            ApiError::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = Json(json!({ "error": self.to_string() }));
        (self.status(), body).into_response()
    }
}
