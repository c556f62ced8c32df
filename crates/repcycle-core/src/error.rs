//! Core error types for repcycle-core.
//!
//! Errors are split by concern: playback transitions, storage, configuration
//! and input validation. [`CoreError`] aggregates them for callers that do
//! not care which layer failed.

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for repcycle-core.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Playback state machine errors
    #[error("Playback error: {0}")]
    Playback(#[from] PlaybackError),

    /// Storage-related errors
    #[error("Storage error: {0}")]
    Store(#[from] StoreError),

    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Validation errors
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// No user identity is available, so no data can be namespaced.
    #[error("No user identity configured (set identity.user_id or pass --user)")]
    NoIdentity,
}

/// Errors raised by playback operations.
#[derive(Error, Debug)]
pub enum PlaybackError {
    /// A session is already running for this user; it must be stopped first.
    #[error("A workout session is already active; stop or finish it first")]
    SessionAlreadyActive,

    /// The template yields no actionable step.
    #[error("Template has no actionable blocks")]
    EmptyTemplate,

    /// No block is active. Indicates an invariant violation.
    #[error("No active block in the current session")]
    NoActiveBlock,

    /// Skip was requested while the active block is not a rest.
    #[error("Only an active rest can be skipped")]
    IllegalSkip,

    /// Completion was requested while the active block is a rest.
    #[error("An active rest completes through its timer or a skip")]
    IllegalComplete,

    /// The caller acted on a block that is no longer the active one.
    #[error("Block {expected} is not active (active: {actual:?})")]
    StaleBlock {
        expected: usize,
        actual: Option<usize>,
    },

    /// The store rejected or failed the read/write.
    #[error("Persistence failure: {0}")]
    Persistence(#[from] StoreError),
}

impl PlaybackError {
    /// Whether the error is a user-facing warning rather than a failure.
    pub fn is_warning(&self) -> bool {
        matches!(
            self,
            PlaybackError::SessionAlreadyActive
                | PlaybackError::NoActiveBlock
                | PlaybackError::IllegalSkip
                | PlaybackError::IllegalComplete
                | PlaybackError::StaleBlock { .. }
        )
    }
}

/// Storage-specific errors.
#[derive(Error, Debug)]
pub enum StoreError {
    /// Failed to open database connection
    #[error("Failed to open database at {path}: {source}")]
    OpenFailed {
        path: PathBuf,
        #[source]
        source: rusqlite::Error,
    },

    /// Query execution failed
    #[error("Query failed: {0}")]
    QueryFailed(String),

    /// Database is locked
    #[error("Database is locked")]
    Locked,

    /// A stored document could not be encoded or decoded.
    #[error("Malformed document: {0}")]
    Serialization(#[from] serde_json::Error),

    /// The document changed since it was read.
    #[error("Session was modified concurrently (expected revision {expected:?}, found {found:?})")]
    Conflict {
        expected: Option<u64>,
        found: Option<u64>,
    },

    /// The data directory could not be resolved or created.
    #[error("Data directory unavailable: {0}")]
    DataDir(String),
}

/// Configuration-specific errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to load configuration
    #[error("Failed to load configuration from {path}: {message}")]
    LoadFailed { path: PathBuf, message: String },

    /// Failed to save configuration
    #[error("Failed to save configuration to {path}: {message}")]
    SaveFailed { path: PathBuf, message: String },

    /// Invalid configuration value
    #[error("Invalid configuration value for '{key}': {message}")]
    InvalidValue { key: String, message: String },

    /// Unknown configuration key
    #[error("Unknown configuration key: {0}")]
    UnknownKey(String),
}

/// Validation errors.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    /// A required name or text is blank.
    #[error("{field} cannot be empty")]
    Empty { field: &'static str },

    /// Name collides with another record of the same owner.
    #[error("A {kind} named '{name}' already exists")]
    DuplicateName { kind: &'static str, name: String },

    /// Out of bounds
    #[error("Index {index} out of bounds for {collection} (length: {len})")]
    OutOfBounds {
        collection: &'static str,
        index: usize,
        len: usize,
    },

    /// Invalid value
    #[error("Invalid value for '{field}': {message}")]
    InvalidValue { field: &'static str, message: String },

    /// Nothing matched the given reference.
    #[error("No {kind} matches '{reference}'")]
    NotFound { kind: &'static str, reference: String },
}

// Helper implementations for converting from other error types

impl From<rusqlite::Error> for StoreError {
    fn from(err: rusqlite::Error) -> Self {
        match &err {
            rusqlite::Error::SqliteFailure(e, _msg) => {
                if e.code == rusqlite::ErrorCode::DatabaseLocked
                    || e.code == rusqlite::ErrorCode::DatabaseBusy
                {
                    StoreError::Locked
                } else {
                    StoreError::QueryFailed(err.to_string())
                }
            }
            _ => StoreError::QueryFailed(err.to_string()),
        }
    }
}

impl From<rusqlite::Error> for CoreError {
    fn from(err: rusqlite::Error) -> Self {
        CoreError::Store(err.into())
    }
}

/// Result type alias for CoreError
pub type Result<T, E = CoreError> = std::result::Result<T, E>;
