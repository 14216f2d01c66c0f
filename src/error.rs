use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

/// Application-level errors
#[derive(thiserror::Error, Debug)]
pub enum AppError {
    #[error("Storage unavailable: {0}")]
    StorageUnavailable(String),

    #[error("Malformed preference profile: {0}")]
    MalformedProfile(String),

    #[error("Malformed recipe: {0}")]
    MalformedRecipe(String),

    #[error("HTTP client error: {0}")]
    HttpClient(#[from] reqwest::Error),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("External API error: {0}")]
    ExternalApi(String),

    #[error("Internal server error: {0}")]
    Internal(String),
}

impl From<redis::RedisError> for AppError {
    fn from(err: redis::RedisError) -> Self {
        AppError::StorageUnavailable(format!("redis: {}", err))
    }
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        AppError::StorageUnavailable(format!("io: {}", err))
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AppError::StorageUnavailable(_) => (StatusCode::SERVICE_UNAVAILABLE, self.to_string()),
            AppError::InvalidInput(msg) => (StatusCode::BAD_REQUEST, msg),
            AppError::MalformedRecipe(msg) => (StatusCode::UNPROCESSABLE_ENTITY, msg),
            AppError::MalformedProfile(_) | AppError::Internal(_) => {
                (StatusCode::INTERNAL_SERVER_ERROR, self.to_string())
            }
            AppError::ExternalApi(msg) => (StatusCode::BAD_GATEWAY, msg),
            AppError::HttpClient(_) => (StatusCode::BAD_GATEWAY, self.to_string()),
        };

        let body = Json(json!({
            "error": message
        }));

        (status, body).into_response()
    }
}

pub type AppResult<T> = Result<T, AppError>;
