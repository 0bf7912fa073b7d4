use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use serde_json::json;
use thiserror::Error;

/// FieldError
///
/// A single field-level validation failure, surfaced in the `errors` array of
/// a 400 response so the client can annotate the offending form inputs.
#[derive(Debug, Clone, Serialize)]
pub struct FieldError {
    pub field: &'static str,
    pub message: String,
}

impl FieldError {
    pub fn required(field: &'static str) -> Self {
        Self {
            field,
            message: format!("{field} is required"),
        }
    }
}

/// ApiError
///
/// The portal's error taxonomy. Every failure path in a handler resolves to
/// one of these variants, and every variant is surfaced to the caller as
/// structured JSON; nothing is silently swallowed.
///
/// Authorization failures deliberately carry a generic body: a caller that is
/// not a participant of a message learns nothing about it beyond the status code.
#[derive(Debug, Error)]
pub enum ApiError {
    /// No credential, or a malformed/expired/invalid one.
    #[error("Not authenticated")]
    Unauthenticated,

    /// Authenticated, but not the owner or not holding the required role.
    #[error("Not authorized")]
    Forbidden,

    /// The named resource (or recipient) does not exist.
    #[error("{0} not found")]
    NotFound(&'static str),

    /// One or more request fields failed validation.
    #[error("Validation failed")]
    Validation(Vec<FieldError>),

    /// Unexpected failure.
    #[error("Server error")]
    Internal,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match self {
            ApiError::Unauthenticated => StatusCode::UNAUTHORIZED,
            ApiError::Forbidden => StatusCode::FORBIDDEN,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        };

        if status == StatusCode::INTERNAL_SERVER_ERROR {
            tracing::error!("request failed: {self}");
        }

        let body = match &self {
            // Validation responses carry field-level detail alongside the summary.
            ApiError::Validation(errors) => json!({
                "message": self.to_string(),
                "errors": errors,
            }),
            _ => json!({ "message": self.to_string() }),
        };

        (status, Json(body)).into_response()
    }
}
