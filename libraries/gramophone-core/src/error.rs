/// Core error types for gramophone
use crate::specid::MalformedIdentifier;
use thiserror::Error;

/// Result type alias using [`Error`]
pub type Result<T> = std::result::Result<T, Error>;

/// Errors surfaced by the identifier codec and the entity graph
///
/// Nothing in this crate or the storage layer retries on its own; callers
/// decide what to do with each variant.
#[derive(Error, Debug)]
pub enum Error {
    /// A client supplied identifier could not be decoded
    #[error("Malformed identifier: {0}")]
    MalformedIdentifier(#[from] MalformedIdentifier),

    /// Insert or update collided with a unique constraint
    #[error("Unique constraint violated: {0}")]
    UniqueViolation(String),

    /// Insert or update referenced a parent row that does not exist
    #[error("Foreign key constraint violated: {0}")]
    ForeignKeyViolation(String),

    /// Entity not found
    #[error("{entity} not found: {id}")]
    NotFound { entity: String, id: String },

    /// A value check failed (rating out of range, album parent cycle, ...)
    #[error("Constraint violated: {0}")]
    ConstraintViolation(String),

    /// Invalid input
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Driver level failure unrelated to constraints
    #[error("Database error: {0}")]
    Database(String),
}

impl Error {
    /// Create a not found error
    pub fn not_found(entity: impl Into<String>, id: impl ToString) -> Self {
        Self::NotFound {
            entity: entity.into(),
            id: id.to_string(),
        }
    }

    /// Create a constraint violation error
    pub fn constraint(msg: impl Into<String>) -> Self {
        Self::ConstraintViolation(msg.into())
    }

    /// Create an invalid input error
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }

    /// Whether this is a [`Error::NotFound`]
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}

#[cfg(feature = "sqlx-support")]
impl From<sqlx::Error> for Error {
    fn from(err: sqlx::Error) -> Self {
        use sqlx::error::ErrorKind;

        match err {
            sqlx::Error::RowNotFound => Self::not_found("Row", "query"),
            sqlx::Error::Database(db_err) => {
                let message = db_err.message().to_owned();
                match db_err.kind() {
                    ErrorKind::UniqueViolation => Self::UniqueViolation(message),
                    ErrorKind::ForeignKeyViolation => Self::ForeignKeyViolation(message),
                    ErrorKind::CheckViolation | ErrorKind::NotNullViolation => {
                        Self::ConstraintViolation(message)
                    }
                    _ => Self::Database(message),
                }
            }
            other => Self::Database(other.to_string()),
        }
    }
}
