use crate::models::BookId;
use service_core::error::AppError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Book with id {0} already exists")]
    DuplicateKey(BookId),

    #[error("Validation error: {0}")]
    Validation(#[from] validator::ValidationErrors),

    #[error("Database error: {0}")]
    Database(#[from] mongodb::error::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::DuplicateKey(_) => {
                AppError::Conflict(anyhow::anyhow!("Book with this ID already exists"))
            }
            StoreError::Validation(e) => AppError::ValidationError(e),
            StoreError::Database(e) => AppError::DatabaseError(anyhow::Error::new(e)),
            StoreError::Internal(e) => AppError::InternalError(anyhow::anyhow!(e)),
        }
    }
}
