//! Error types for the DayZero core.

use std::path::PathBuf;

use jiff::civil::Date;
use thiserror::Error;

/// Coarse classification of failures, used by callers to decide how to
/// present an error and whether re-invoking the operation can help.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Store or generation service unreachable; retry by re-invoking.
    TransientIo,
    /// Input or service output rejected before touching persisted state.
    Validation,
    /// Operation would break a data-model invariant; nothing was written.
    InvariantViolation,
    /// The addressed goal, task, session or profile does not exist.
    NotFound,
    /// Persisted state disagrees with the caller's view (stale session,
    /// migration still settling).
    Conflict,
    /// Local configuration or runtime problem.
    Internal,
}

/// Comprehensive error type for all DayZero operations.
#[derive(Error, Debug)]
pub enum DayZeroError {
    /// Database connection or query errors
    #[error("Database error: {message}")]
    Database {
        message: String,
        #[source]
        source: rusqlite::Error,
    },
    /// The document store could not complete a request
    #[error("Store unavailable: {message}")]
    StoreUnavailable { message: String },
    /// Transport-level failure talking to the generation service
    #[error("Generation service unreachable: {source}")]
    GenerationTransport {
        #[from]
        source: reqwest::Error,
    },
    /// The generation service answered with a non-success status
    #[error("Generation service returned {status}: {body}")]
    GenerationStatus { status: u16, body: String },
    /// The generation service answered with something that is not a usable
    /// task list
    #[error("Invalid generation response: {reason}")]
    InvalidResponse { reason: String },
    /// Invalid input validation errors
    #[error("Invalid input for field '{field}': {reason}")]
    InvalidInput { field: String, reason: String },
    /// Deleting the goal would leave the profile without any goal
    #[error("Goal {id} is the last remaining goal and cannot be deleted")]
    LastGoal { id: String },
    /// No profile document exists for the user
    #[error("No profile found for user '{user_id}'")]
    ProfileNotFound { user_id: String },
    /// Goal not found for the given ID
    #[error("Goal with ID {id} not found")]
    GoalNotFound { id: String },
    /// Task index outside the active session's task list
    #[error("Task {index} not found in the active session ({len} tasks)")]
    TaskNotFound { index: usize, len: usize },
    /// An operation needs an active session but none exists
    #[error("No active session")]
    NoActiveSession,
    /// The stored session belongs to an earlier day
    #[error("Active session is dated {session_date} but today is {today}")]
    StaleSession { session_date: Date, today: Date },
    /// The same operation is already running for this user
    #[error("Another {operation} is already in progress")]
    OperationInFlight { operation: &'static str },
    /// A legacy profile was rewritten but the migrated snapshot never arrived
    #[error("Profile migration for user '{user_id}' has not settled yet")]
    MigrationPending { user_id: String },
    /// File system operation errors
    #[error("File system error at path '{path}': {source}")]
    FileSystem {
        path: PathBuf,
        source: std::io::Error,
    },
    /// XDG directory specification errors
    #[error("XDG directory error: {0}")]
    XdgDirectory(String),
    /// Serialization/deserialization errors
    #[error("Serialization error: {source}")]
    Serialization {
        #[from]
        source: serde_json::Error,
    },
    /// Configuration errors
    #[error("Configuration error: {message}")]
    Configuration { message: String },
}

/// Builder for creating database errors with optional context.
pub struct DatabaseErrorBuilder {
    message: String,
}

impl DatabaseErrorBuilder {
    /// Create a new database error builder with a message.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    /// Build the error with the given source.
    pub fn with_source(self, source: rusqlite::Error) -> DayZeroError {
        DayZeroError::Database {
            message: self.message,
            source,
        }
    }
}

/// Builder for creating input validation errors.
pub struct InvalidInputBuilder {
    field: String,
}

impl InvalidInputBuilder {
    /// Create a new invalid input error builder for a field.
    pub fn new(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
        }
    }

    /// Build the error with the given reason.
    pub fn with_reason(self, reason: impl Into<String>) -> DayZeroError {
        DayZeroError::InvalidInput {
            field: self.field,
            reason: reason.into(),
        }
    }
}

impl DayZeroError {
    /// Creates a builder for database errors.
    pub fn database(message: impl Into<String>) -> DatabaseErrorBuilder {
        DatabaseErrorBuilder::new(message)
    }

    /// Creates a builder for input validation errors.
    pub fn invalid_input(field: impl Into<String>) -> InvalidInputBuilder {
        InvalidInputBuilder::new(field)
    }

    /// Creates an invalid generation response error.
    pub fn invalid_response(reason: impl Into<String>) -> Self {
        Self::InvalidResponse {
            reason: reason.into(),
        }
    }

    /// Classifies the error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Database { .. }
            | Self::StoreUnavailable { .. }
            | Self::GenerationTransport { .. }
            | Self::GenerationStatus { .. } => ErrorKind::TransientIo,
            Self::InvalidResponse { .. } | Self::InvalidInput { .. } => ErrorKind::Validation,
            Self::LastGoal { .. } => ErrorKind::InvariantViolation,
            Self::ProfileNotFound { .. }
            | Self::GoalNotFound { .. }
            | Self::TaskNotFound { .. }
            | Self::NoActiveSession => ErrorKind::NotFound,
            Self::StaleSession { .. }
            | Self::OperationInFlight { .. }
            | Self::MigrationPending { .. } => ErrorKind::Conflict,
            Self::FileSystem { .. }
            | Self::XdgDirectory(_)
            | Self::Serialization { .. }
            | Self::Configuration { .. } => ErrorKind::Internal,
        }
    }

    /// Whether re-invoking the same operation may succeed.
    ///
    /// Nothing in the core retries on its own; this only informs callers.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::GenerationStatus { status, .. } => *status >= 500 || *status == 429,
            Self::MigrationPending { .. } => true,
            other => other.kind() == ErrorKind::TransientIo,
        }
    }
}

/// Specialized extension trait for database-related Results.
pub trait DatabaseResultExt<T> {
    /// Map database errors with a message.
    fn db_context(self, message: &str) -> Result<T>;
}

impl<T> DatabaseResultExt<T> for std::result::Result<T, rusqlite::Error> {
    fn db_context(self, message: &str) -> Result<T> {
        self.map_err(|e| DayZeroError::database(message).with_source(e))
    }
}

/// Result type alias for DayZero operations
pub type Result<T> = std::result::Result<T, DayZeroError>;
