//! Mapping of service failures onto HTTP responses.
//!
//! Not-found gets its own status. Store failures are logged with their detail
//! and answered with a generic 500 body so internals do not leak to callers.
//! Malformed input never reaches this type: axum's extractors reject it first.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use client_core::{ClientId, StoreError};
use serde::Serialize;
use thiserror::Error;
use tracing::error;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("client {0} not found")]
    NotFound(ClientId),

    #[error(transparent)]
    Store(#[from] StoreError),
}

#[derive(Serialize)]
struct ErrorBody {
    error: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            ApiError::NotFound(_) => (StatusCode::NOT_FOUND, self.to_string()),
            ApiError::Store(err) => {
                error!("Client store failure: {}", err);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal server error".to_string(),
                )
            }
        };
        (status, Json(ErrorBody { error: message })).into_response()
    }
}
