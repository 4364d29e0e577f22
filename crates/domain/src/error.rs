use thiserror::Error;

#[derive(Error, Debug)]
pub enum DomainError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Invalid stored data: {0}")]
    InvalidData(String),
}

impl DomainError {
    /// Whether the store rejected a write because of a unique constraint
    pub fn is_unique_violation(&self) -> bool {
        match self {
            DomainError::Database(sqlx::Error::Database(db_error)) => db_error.is_unique_violation(),
            _ => false,
        }
    }
}
