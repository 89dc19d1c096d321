use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::auth::service::AuthError;
use crate::llm_client::GatewayError;
use crate::report::normalizer::NormalizeError;
use crate::report::service::ReportError;

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Unauthorized")]
    Unauthorized,

    #[error("Auth error: {0}")]
    Auth(#[from] AuthError),

    #[error("Report error: {0}")]
    Report(#[from] ReportError),
}

impl AppError {
    fn parts(&self) -> (StatusCode, &'static str, String) {
        match self {
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone()),
            AppError::Unauthorized | AppError::Auth(AuthError::InvalidToken) => (
                StatusCode::UNAUTHORIZED,
                "UNAUTHORIZED",
                "Authentication required".to_string(),
            ),
            AppError::Auth(AuthError::DuplicateAccount) => (
                StatusCode::BAD_REQUEST,
                "DUPLICATE_ACCOUNT",
                "Email already registered".to_string(),
            ),
            AppError::Auth(AuthError::InvalidCredentials) => (
                StatusCode::BAD_REQUEST,
                "INVALID_CREDENTIALS",
                "Incorrect email or password".to_string(),
            ),
            AppError::Auth(e) => {
                tracing::error!("Auth error: {e}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "An internal server error occurred".to_string(),
                )
            }
            AppError::Report(e) => {
                tracing::error!("Report error: {e}");
                let code = match e {
                    ReportError::Gateway(GatewayError::Timeout(_)) => "GATEWAY_TIMEOUT",
                    ReportError::Gateway(GatewayError::Unavailable(_)) => "GATEWAY_UNAVAILABLE",
                    ReportError::Gateway(GatewayError::Rejected { .. }) => "GATEWAY_REJECTED",
                    ReportError::Normalize(NormalizeError::MalformedOutput { .. }) => {
                        "MALFORMED_OUTPUT"
                    }
                    ReportError::Normalize(NormalizeError::SchemaMismatch { .. }) => {
                        "SCHEMA_MISMATCH"
                    }
                };
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    code,
                    "An AI processing error occurred".to_string(),
                )
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = self.parts();

        let mut error = json!({
            "code": code,
            "message": message
        });
        if let AppError::Report(e) = &self {
            error["retryable"] = json!(e.is_retryable());
        }

        (status, Json(json!({ "error": error }))).into_response()
    }
}
