//! Glitchroom — API error types.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use glitchroom_content::domain::error::ScriptError;
use glitchroom_core::error::GameError;
use serde::Serialize;
use thiserror::Error;

/// Startup and runtime errors for the API server.
#[derive(Debug, Error)]
pub enum AppError {
    /// A required environment variable is missing or invalid.
    #[error("configuration error: {0}")]
    Config(String),

    /// The game script failed to load.
    #[error("script error: {0}")]
    Script(#[from] ScriptError),

    /// Network binding or I/O error.
    #[error("server error: {0}")]
    Server(#[from] std::io::Error),
}

/// JSON body returned for error responses.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    /// Machine-readable error code.
    pub error: &'static str,
    /// Human-readable error message.
    pub message: String,
}

/// HTTP-layer wrapper around `GameError` that implements `IntoResponse`.
#[derive(Debug)]
pub struct ApiError(pub GameError);

impl From<GameError> for ApiError {
    fn from(err: GameError) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_code) = match &self.0 {
            GameError::GameNotFound(_) => (StatusCode::NOT_FOUND, "game_not_found"),
            GameError::ModuleNotFound(_) => (StatusCode::NOT_FOUND, "module_not_found"),
            GameError::InvalidInput(_) => (StatusCode::UNPROCESSABLE_ENTITY, "invalid_input"),
            GameError::Content(_) => (StatusCode::INTERNAL_SERVER_ERROR, "content_error"),
            GameError::Infrastructure(_) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "infrastructure_error")
            }
        };

        if status.is_server_error() {
            tracing::error!(error = %self.0, "request failed");
        }

        let body = ErrorBody {
            error: error_code,
            message: self.0.to_string(),
        };

        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;
    use uuid::Uuid;

    fn status_of(err: GameError) -> StatusCode {
        let response = ApiError(err).into_response();
        response.status()
    }

    #[test]
    fn test_game_not_found_maps_to_404() {
        assert_eq!(
            status_of(GameError::GameNotFound(Uuid::new_v4())),
            StatusCode::NOT_FOUND
        );
    }

    #[test]
    fn test_module_not_found_maps_to_404() {
        assert_eq!(status_of(GameError::ModuleNotFound(7)), StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_invalid_input_maps_to_422() {
        assert_eq!(
            status_of(GameError::InvalidInput("unknown option".into())),
            StatusCode::UNPROCESSABLE_ENTITY
        );
    }

    #[test]
    fn test_content_and_infrastructure_map_to_500() {
        assert_eq!(
            status_of(GameError::Content("unknown challenge".into())),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            status_of(GameError::Infrastructure("lock poisoned".into())),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
