use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use thiserror::Error;

use corkboard_core::BoardError;

/// HTTP-facing wrapper around the coordinator's error taxonomy.
#[derive(Debug, Error)]
#[error(transparent)]
pub struct ServerError(#[from] BoardError);

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let (status, message) = match &self.0 {
            BoardError::InvalidRequest(_) | BoardError::InvalidConfig(_) => {
                (StatusCode::BAD_REQUEST, self.to_string())
            }
            BoardError::NotFound(_) => (StatusCode::NOT_FOUND, self.to_string()),
            // Persistence and lock failures are server-side; don't leak
            // internals to the client.
            _ => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Internal server error".to_string(),
            ),
        };

        let body = serde_json::json!({
            "error": message,
        });

        (status, axum::Json(body)).into_response()
    }
}
