use thiserror::Error;

use crate::Collection;

pub type StoreResult<T> = Result<T, StoreError>;

#[derive(Debug, Error)]
pub enum StoreError {
    /// A write collided with an existing document id or a unique field.
    #[error("duplicate {field} in {collection}")]
    Duplicate {
        collection: Collection,
        field: &'static str,
    },
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),
    #[error("document encoding error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl StoreError {
    pub fn is_duplicate(&self) -> bool {
        matches!(self, StoreError::Duplicate { .. })
    }
}
