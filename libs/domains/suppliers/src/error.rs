use axum::response::{IntoResponse, Response};
use axum_helpers::AppError;
use database::mongodb::{StoreErrorKind, classify};
use pagination::PageError;
use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum SupplierError {
    #[error("Supplier not found: {0}")]
    NotFound(Uuid),

    #[error("Invalid input: {0}")]
    Validation(String),

    #[error("Document store unavailable: {0}")]
    StoreUnavailable(String),

    #[error("Database error: {0}")]
    Database(String),
}

pub type SupplierResult<T> = Result<T, SupplierError>;

impl From<SupplierError> for AppError {
    fn from(err: SupplierError) -> Self {
        match err {
            SupplierError::NotFound(id) => {
                AppError::NotFound(format!("Supplier {} not found", id))
            }
            SupplierError::Validation(msg) => AppError::BadRequest(msg),
            SupplierError::StoreUnavailable(msg) => AppError::StoreUnavailable(msg),
            SupplierError::Database(msg) => AppError::Database(msg),
        }
    }
}

impl IntoResponse for SupplierError {
    fn into_response(self) -> Response {
        let app_error: AppError = self.into();
        app_error.into_response()
    }
}

impl From<mongodb::error::Error> for SupplierError {
    fn from(err: mongodb::error::Error) -> Self {
        match classify(&err) {
            StoreErrorKind::Unavailable => SupplierError::StoreUnavailable(err.to_string()),
            _ => SupplierError::Database(err.to_string()),
        }
    }
}

impl From<PageError> for SupplierError {
    fn from(err: PageError) -> Self {
        SupplierError::Validation(err.to_string())
    }
}
