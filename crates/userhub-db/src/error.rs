//! Database-specific error types and conversions.

use userhub_core::error::UserHubError;

/// Database-layer error type.
#[derive(Debug, thiserror::Error)]
pub enum DbError {
    #[error("SurrealDB error: {0}")]
    Surreal(#[from] surrealdb::Error),

    #[error("Query failed: {0}")]
    Query(String),

    #[error("Migration failed: {0}")]
    Migration(String),

    #[error("Record not found: {entity} with id {id}")]
    NotFound { entity: String, id: String },

    #[error("{0}")]
    Conflict(String),
}

impl From<DbError> for UserHubError {
    fn from(err: DbError) -> Self {
        match err {
            DbError::NotFound { entity, id } => UserHubError::NotFound { entity, id },
            DbError::Conflict(message) => UserHubError::Conflict { message },
            other => UserHubError::Database(other.to_string()),
        }
    }
}
