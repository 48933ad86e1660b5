//! Database-specific error types and conversions.

use vitro_core::error::VitroError;

/// Database-layer error type.
#[derive(Debug, thiserror::Error)]
pub enum DbError {
    #[error("SurrealDB error: {0}")]
    Surreal(#[from] surrealdb::Error),

    #[error("Connect attempt timed out after {seconds}s")]
    Timeout { seconds: u64 },

    #[error("Query failed: {0}")]
    Query(String),

    #[error("Record not found: {entity} with id {id}")]
    NotFound { entity: String, id: String },
}

impl From<DbError> for VitroError {
    fn from(err: DbError) -> Self {
        match err {
            DbError::NotFound { entity, id } => VitroError::NotFound { entity, id },
            other => VitroError::Database(other.to_string()),
        }
    }
}
