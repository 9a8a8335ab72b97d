use axum::response::{IntoResponse, Response};
use axum_helpers::AppError;
use database::mongodb::{StoreErrorKind, classify};
use pagination::PageError;
use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum ProductError {
    #[error("Product not found: {0}")]
    NotFound(Uuid),

    #[error("Invalid input: {0}")]
    Validation(String),

    #[error("Document store unavailable: {0}")]
    StoreUnavailable(String),

    #[error("Database error: {0}")]
    Database(String),
}

pub type ProductResult<T> = Result<T, ProductError>;

impl From<ProductError> for AppError {
    fn from(err: ProductError) -> Self {
        match err {
            ProductError::NotFound(id) => AppError::NotFound(format!("Product {} not found", id)),
            ProductError::Validation(msg) => AppError::BadRequest(msg),
            ProductError::StoreUnavailable(msg) => AppError::StoreUnavailable(msg),
            ProductError::Database(msg) => AppError::Database(msg),
        }
    }
}

impl IntoResponse for ProductError {
    fn into_response(self) -> Response {
        let app_error: AppError = self.into();
        app_error.into_response()
    }
}

impl From<mongodb::error::Error> for ProductError {
    fn from(err: mongodb::error::Error) -> Self {
        match classify(&err) {
            StoreErrorKind::Unavailable => ProductError::StoreUnavailable(err.to_string()),
            _ => ProductError::Database(err.to_string()),
        }
    }
}

impl From<PageError> for ProductError {
    fn from(err: PageError) -> Self {
        ProductError::Validation(err.to_string())
    }
}
