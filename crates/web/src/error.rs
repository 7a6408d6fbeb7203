use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use portfolio_health_core::errors::CoreError;
use serde_json::json;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error(transparent)]
    Core(#[from] CoreError),
    #[error("Malformed upload: {0}")]
    Multipart(#[from] axum::extract::multipart::MultipartError),
    #[error("{0}")]
    BadRequest(String),
}

/// Converts `AppError` into an HTTP response.
///
/// Problems with the uploaded file are reported back verbatim with 400.
/// Anything else is logged and answered with a generic 500.
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            AppError::Core(err) if err.is_input_error() => {
                tracing::warn!(error = %err, "Rejected upload.");
                (StatusCode::BAD_REQUEST, err.to_string())
            }
            AppError::Core(err) => {
                tracing::error!(error = ?err, "Report generation failed.");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "An error occurred while generating the report".to_string(),
                )
            }
            AppError::Multipart(err) => {
                tracing::warn!(error = %err, "Malformed multipart body.");
                (StatusCode::BAD_REQUEST, format!("Malformed upload: {err}"))
            }
            AppError::BadRequest(message) => (StatusCode::BAD_REQUEST, message),
        };

        let body = Json(json!({ "error": error_message }));
        (status, body).into_response()
    }
}
