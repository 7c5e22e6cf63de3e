use api_types::{
    Message,
    recipe::{CreationFailed, REQUIRED_FIELDS},
};
use axum::{Json, http::StatusCode, response::IntoResponse};
use engine::EngineError;

pub use server::{router, run_with_listener, spawn_with_listener};

mod recipes;
mod server;

pub(crate) const NOT_FOUND_MESSAGE: &str = "No Recipe found";
pub(crate) const CREATION_FAILED_MESSAGE: &str = "Recipe creation failed!";

pub enum ServerError {
    Engine(EngineError),
    /// The `id` path segment is not a non-negative integer.
    InvalidId,
    /// The request body could not be decoded.
    InvalidBody,
    /// Any failure, flattened to 404.
    NotFound,
    /// Create rejected, either by validation (400) or by storage (500).
    CreationFailed(StatusCode),
}

fn status_for_engine_error(err: &EngineError) -> StatusCode {
    match err {
        EngineError::KeyNotFound(_) => StatusCode::NOT_FOUND,
        EngineError::Database(_) | EngineError::MissingRepository => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }
}

fn message_for_engine_error(err: EngineError) -> String {
    match err {
        EngineError::KeyNotFound(_) => NOT_FOUND_MESSAGE.to_string(),
        other => {
            tracing::error!("storage error: {other}");
            "internal server error".to_string()
        }
    }
}

fn message(status: StatusCode, message: &str) -> axum::response::Response {
    (
        status,
        Json(Message {
            message: message.to_string(),
        }),
    )
        .into_response()
}

impl IntoResponse for ServerError {
    fn into_response(self) -> axum::response::Response {
        match self {
            ServerError::Engine(err) => {
                let status = status_for_engine_error(&err);
                message(status, &message_for_engine_error(err))
            }
            ServerError::InvalidId => message(StatusCode::BAD_REQUEST, "Invalid ID"),
            ServerError::InvalidBody => {
                message(StatusCode::BAD_REQUEST, "Failed to decode request body")
            }
            ServerError::NotFound => message(StatusCode::NOT_FOUND, NOT_FOUND_MESSAGE),
            ServerError::CreationFailed(status) => (
                status,
                Json(CreationFailed {
                    message: CREATION_FAILED_MESSAGE.to_string(),
                    required: REQUIRED_FIELDS.to_string(),
                }),
            )
                .into_response(),
        }
    }
}

impl From<EngineError> for ServerError {
    fn from(value: EngineError) -> Self {
        Self::Engine(value)
    }
}
