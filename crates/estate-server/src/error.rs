use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use estate_core::EstateError;

/// Unified error type for HTTP responses.
///
/// Caller-supplied validation failures surface with their message;
/// everything else is logged with full detail server-side and collapsed
/// to a generic body so store internals never leak to the caller.
#[derive(Debug)]
pub struct AppError(pub EstateError);

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match &self.0 {
            EstateError::InvalidDate(_) => {
                let body = serde_json::json!({ "error": self.0.to_string() });
                (StatusCode::BAD_REQUEST, axum::Json(body)).into_response()
            }
            _ => {
                tracing::error!(error = %self.0, "report query failed");
                let body = serde_json::json!({ "error": "internal server error" });
                (StatusCode::INTERNAL_SERVER_ERROR, axum::Json(body)).into_response()
            }
        }
    }
}

impl From<EstateError> for AppError {
    fn from(err: EstateError) -> Self {
        Self(err)
    }
}
