use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use log::{error, warn};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Database operation failed: {source}")]
    Database {
        #[from]
        source: rusqlite::Error,
    },
    #[error("Failed to render template: {source}")]
    Template {
        #[from]
        source: askama::Error,
    },
    #[error("No list named '{0}'")]
    ListNotFound(String),
    #[error("No item with id {item_id} in list '{list}'")]
    ItemNotFound { list: String, item_id: i64 },
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match self {
            AppError::ListNotFound(_) | AppError::ItemNotFound { .. } => {
                warn!("Rejecting request: {}", self);
                (StatusCode::NOT_FOUND, self.to_string()).into_response()
            }
            AppError::Database { .. } | AppError::Template { .. } => {
                error!("Error encountered while processing request: {}", self);
                StatusCode::INTERNAL_SERVER_ERROR.into_response()
            }
        }
    }
}
