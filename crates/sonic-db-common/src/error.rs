//! Error types for database operations.

use thiserror::Error;

/// Result type alias for database operations.
pub type DbResult<T> = Result<T, DbError>;

/// Errors that can occur while talking to a SONiC database.
///
/// Missing keys and fields are not errors; they surface as `None` or empty
/// collections. Only transport-level failures end up here.
#[derive(Debug, Error)]
pub enum DbError {
    /// The database could not be reached.
    #[error("Failed to connect to {db}: {message}")]
    Connection {
        /// Database name (e.g. "CONFIG_DB").
        db: String,
        /// Error message.
        message: String,
    },

    /// A command was sent but failed.
    #[error("Database operation failed on {db}: {operation}: {message}")]
    Command {
        /// Database name (e.g. "APPL_DB").
        db: String,
        /// The operation that failed (e.g., "hget", "keys", "publish").
        operation: String,
        /// Error message.
        message: String,
    },
}

impl DbError {
    /// Creates a connection error.
    pub fn connection(db: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Connection {
            db: db.into(),
            message: message.into(),
        }
    }

    /// Creates a command error.
    pub fn command(
        db: impl Into<String>,
        operation: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self::Command {
            db: db.into(),
            operation: operation.into(),
            message: message.into(),
        }
    }

    /// Returns true if the store could not be reached at all.
    pub fn is_connection(&self) -> bool {
        matches!(self, DbError::Connection { .. })
    }
}
