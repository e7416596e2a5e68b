use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

/// Application error type
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Migration error: {0}")]
    Migrate(#[from] sqlx::migrate::MigrateError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Input that breaks a rule of the data model
    #[error("{field}: {message}")]
    Validation {
        field: &'static str,
        message: String,
    },

    /// Input that could not be interpreted at all
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("{0}")]
    Conflict(&'static str),

    #[error("{0} not found")]
    NotFound(&'static str),

    #[error("Authentication credentials were not provided or are invalid")]
    Unauthorized,

    #[error("{0}")]
    Forbidden(&'static str),
}

impl AppError {
    pub fn validation(field: &'static str, message: impl Into<String>) -> Self {
        AppError::Validation {
            field,
            message: message.into(),
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Database(_) | AppError::Migrate(_) | AppError::Io(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
            AppError::Validation { .. } | AppError::InvalidInput(_) => StatusCode::BAD_REQUEST,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Unauthorized => StatusCode::UNAUTHORIZED,
            AppError::Forbidden(_) => StatusCode::FORBIDDEN,
        }
    }
}

/// Implement IntoResponse to convert AppError into HTTP responses
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();

        let body = match &self {
            AppError::Database(e) => {
                tracing::error!("Database error: {:?}", e);
                json!({ "error": "Internal server error" })
            }
            AppError::Migrate(e) => {
                tracing::error!("Migration error: {:?}", e);
                json!({ "error": "Internal server error" })
            }
            AppError::Io(e) => {
                tracing::error!("I/O error: {:?}", e);
                json!({ "error": "Internal server error" })
            }
            AppError::Validation { field, message } => {
                json!({ "error": message, "field": field })
            }
            other => json!({ "error": other.to_string() }),
        };

        (status, Json(body)).into_response()
    }
}

/// Result type alias for application results
pub type Result<T> = std::result::Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes_distinguish_failure_kinds() {
        assert_eq!(
            AppError::validation("tags", "empty").status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            AppError::Conflict("duplicate").status(),
            StatusCode::CONFLICT
        );
        assert_eq!(AppError::NotFound("Recipe").status(), StatusCode::NOT_FOUND);
        assert_eq!(AppError::Unauthorized.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(
            AppError::Database(sqlx::Error::RowNotFound).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_not_found_message() {
        assert_eq!(AppError::NotFound("Recipe").to_string(), "Recipe not found");
    }
}
