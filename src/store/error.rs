//! Persistence errors.

use thiserror::Error;

pub type StoreResult<T> = Result<T, StoreError>;

#[derive(Debug, Error)]
pub enum StoreError {
    /// No category with this id. Also raised when a bike names a missing category.
    #[error("category {0} not found")]
    CategoryNotFound(i64),

    #[error("bike {0} not found")]
    BikeNotFound(i64),

    /// Delete refused because bikes still reference the category.
    #[error("category {id} is referenced by {bikes} bike(s)")]
    CategoryInUse { id: i64, bikes: i64 },

    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// True when SQLite rejected a write on a foreign key.
pub(crate) fn is_foreign_key_violation(err: &sqlx::Error) -> bool {
    matches!(err, sqlx::Error::Database(db) if db.is_foreign_key_violation())
}
