use axum::response::{IntoResponse, Response};
use axum_helpers::AppError;
use database::mongodb::{StoreErrorKind, classify};
use pagination::PageError;
use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum UserError {
    #[error("User not found: {0}")]
    NotFound(Uuid),

    #[error("User with email '{0}' not found")]
    EmailNotFound(String),

    #[error("User with email '{0}' already exists")]
    DuplicateEmail(String),

    #[error("Invalid input: {0}")]
    Validation(String),

    #[error("Document store unavailable: {0}")]
    StoreUnavailable(String),

    #[error("Database error: {0}")]
    Database(String),
}

pub type UserResult<T> = Result<T, UserError>;

impl UserError {
    /// Driver error from a write that may collide on the unique email index
    pub(crate) fn from_write(err: mongodb::error::Error, email: &str) -> Self {
        match classify(&err) {
            StoreErrorKind::DuplicateKey => UserError::DuplicateEmail(email.to_string()),
            _ => err.into(),
        }
    }
}

impl From<UserError> for AppError {
    fn from(err: UserError) -> Self {
        match err {
            UserError::NotFound(id) => AppError::NotFound(format!("User {} not found", id)),
            UserError::EmailNotFound(email) => {
                AppError::NotFound(format!("User with email '{}' not found", email))
            }
            UserError::DuplicateEmail(email) => {
                AppError::Conflict(format!("User with email '{}' already exists", email))
            }
            UserError::Validation(msg) => AppError::BadRequest(msg),
            UserError::StoreUnavailable(msg) => AppError::StoreUnavailable(msg),
            UserError::Database(msg) => AppError::Database(msg),
        }
    }
}

impl IntoResponse for UserError {
    fn into_response(self) -> Response {
        let app_error: AppError = self.into();
        app_error.into_response()
    }
}

impl From<mongodb::error::Error> for UserError {
    fn from(err: mongodb::error::Error) -> Self {
        match classify(&err) {
            StoreErrorKind::Unavailable => UserError::StoreUnavailable(err.to_string()),
            _ => UserError::Database(err.to_string()),
        }
    }
}

impl From<mongodb::bson::de::Error> for UserError {
    fn from(err: mongodb::bson::de::Error) -> Self {
        UserError::Database(format!("Malformed document: {}", err))
    }
}

impl From<PageError> for UserError {
    fn from(err: PageError) -> Self {
        UserError::Validation(err.to_string())
    }
}
