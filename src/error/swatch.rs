use axum::{
    Json,
    extract::rejection::{JsonRejection, PathRejection, QueryRejection},
    http::StatusCode,
    response::IntoResponse,
};
use swatchbook_schema::{ApiErrorBody, EntityId, StyleSlot};
use thiserror::Error as ThisError;
use tracing::error;

#[derive(Debug, ThisError)]
pub enum SwatchError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid reference: {slot} -> {id}")]
    InvalidReference { slot: StyleSlot, id: EntityId },

    #[error("User already exists")]
    UserExists,

    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Password hash error: {0}")]
    PasswordHash(String),

    #[error("Unexpected error: {0}")]
    UnexpectedError(String),

    #[error("Ractor error: {0}")]
    RactorError(String),

    #[error("Database error: {0}")]
    DatabaseError(#[from] sqlx::Error),
}

impl SwatchError {
    pub fn validation(message: impl Into<String>) -> Self {
        SwatchError::Validation(message.into())
    }
}

impl From<JsonRejection> for SwatchError {
    fn from(rejection: JsonRejection) -> Self {
        SwatchError::Validation(rejection.body_text())
    }
}

impl From<QueryRejection> for SwatchError {
    fn from(rejection: QueryRejection) -> Self {
        SwatchError::Validation(rejection.body_text())
    }
}

impl From<PathRejection> for SwatchError {
    fn from(rejection: PathRejection) -> Self {
        SwatchError::Validation(rejection.body_text())
    }
}

impl IntoResponse for SwatchError {
    fn into_response(self) -> axum::response::Response {
        let (status, body) = match self {
            SwatchError::Validation(message) => (
                StatusCode::BAD_REQUEST,
                ApiErrorBody::new("VALIDATION", message),
            ),
            SwatchError::InvalidReference { slot, id } => (
                StatusCode::BAD_REQUEST,
                ApiErrorBody::new(
                    "INVALID_REFERENCE",
                    format!(
                        "{slot} references value {id}, which is not a {} of this project",
                        slot.kind()
                    ),
                ),
            ),
            SwatchError::UserExists => (
                StatusCode::BAD_REQUEST,
                ApiErrorBody::new("USER_EXISTS", "User already exists"),
            ),
            SwatchError::InvalidCredentials => (
                StatusCode::UNAUTHORIZED,
                ApiErrorBody::new("INVALID_CREDENTIALS", "Invalid email or password"),
            ),
            SwatchError::Unauthorized(reason) => (
                StatusCode::UNAUTHORIZED,
                ApiErrorBody::new("UNAUTHORIZED", reason),
            ),
            SwatchError::NotFound(message) => (
                StatusCode::NOT_FOUND,
                ApiErrorBody::new("NOT_FOUND", message),
            ),
            SwatchError::PasswordHash(_)
            | SwatchError::UnexpectedError(_)
            | SwatchError::RactorError(_)
            | SwatchError::DatabaseError(_) => {
                error!(error = %self, "request failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ApiErrorBody::new("INTERNAL_ERROR", "An internal server error occurred."),
                )
            }
        };
        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn persistence_failures_hide_details() {
        let resp = SwatchError::DatabaseError(sqlx::Error::RowNotFound).into_response();
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn validation_maps_to_bad_request() {
        let resp = SwatchError::validation("Missing type").into_response();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

        let resp = SwatchError::InvalidReference {
            slot: StyleSlot::PaddingX,
            id: 3,
        }
        .into_response();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }
}
