use axum::{http::StatusCode, response::IntoResponse, Json};
use serde_json::json;
use crate::errors::QrTraceError;

impl IntoResponse for QrTraceError {
    fn into_response(self) -> axum::response::Response {
        let (status, message) = match &self {
            QrTraceError::Config(_) => (StatusCode::BAD_REQUEST, self.to_string()),
            QrTraceError::Authentication(_) => (StatusCode::UNAUTHORIZED, self.to_string()),
            QrTraceError::Image(_) => (StatusCode::UNPROCESSABLE_ENTITY, self.to_string()),
            _ => (StatusCode::INTERNAL_SERVER_ERROR, self.to_string()),
        };

        (status, Json(json!({"error": message}))).into_response()
    }
}
