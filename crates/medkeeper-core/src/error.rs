//! Core error types for medkeeper-core.
//!
//! One aggregate error for the public API, with per-concern enums underneath
//! so callers can match on what actually went wrong.

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for medkeeper-core.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Snapshot persistence errors
    #[error("Snapshot error: {0}")]
    Snapshot(#[from] SnapshotError),

    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// User input did not parse as a 12-hour clock time
    #[error("Cannot parse '{input}' as a clock time (expected something like \"7:12 PM\")")]
    InvalidTimeFormat { input: String },

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Snapshot-specific errors.
#[derive(Error, Debug)]
pub enum SnapshotError {
    /// The snapshot file exists but could not be read or parsed.
    /// Fatal at startup: the engine refuses to run on corrupted state.
    #[error("Failed to load snapshot from {path}: {message}")]
    LoadFailed { path: PathBuf, message: String },

    /// The snapshot could not be written. In-memory state stays
    /// authoritative; the engine retries on later ticks.
    #[error("Failed to write snapshot to {path}: {source}")]
    WriteFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Failed to serialize the roster
    #[error("Failed to serialize snapshot: {0}")]
    Serialize(#[from] serde_json::Error),

    /// Failed to access data directory
    #[error("Failed to access data directory: {0}")]
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

    /// Failed to parse configuration
    #[error("Failed to parse configuration: {0}")]
    ParseFailed(String),
}

/// Result type alias for CoreError
pub type Result<T, E = CoreError> = std::result::Result<T, E>;
