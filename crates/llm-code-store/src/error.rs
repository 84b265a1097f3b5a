//! Error types for the record store.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("failed to create store directory: {0}")]
    Io(#[from] std::io::Error),
}
