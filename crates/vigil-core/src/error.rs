//! Core error types for the Vigil page monitor.
//!
//! This module defines the error taxonomy shared across all subsystems.
//! Fetch and storage failures are separate types because the check state
//! machine treats them very differently: a fetch failure becomes a normal
//! `Error` status on the site, while a storage failure means the new state
//! could not be persisted at all.

use thiserror::Error;

/// Errors raised while fetching a monitored page.
///
/// Timeouts and malformed responses are fetch errors too; the state machine
/// maps every variant to the same `Error` status transition.
#[derive(Debug, Error)]
pub enum FetchError {
    /// Server answered with a non-success HTTP status.
    #[error("server returned HTTP {status} for {url}")]
    Status {
        /// HTTP status code
        status: u16,
        /// URL that was fetched
        url: String,
    },

    /// The request did not complete within the configured timeout.
    #[error("request timed out for {url}")]
    Timeout {
        /// URL that was fetched
        url: String,
    },

    /// Connection, DNS, or TLS failure.
    #[error("transport error: {0}")]
    Transport(String),

    /// The target URL could not be parsed.
    #[error("invalid URL '{url}': {reason}")]
    InvalidUrl {
        /// URL as supplied by the caller
        url: String,
        /// Reason for rejection
        reason: String,
    },
}

/// Errors raised by the snapshot blob store or the site record store.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Underlying filesystem I/O failure.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Backend-specific failure (database, serialization).
    #[error("storage backend error: {0}")]
    Backend(String),

    /// A record or blob that must exist was not found.
    #[error("not found: {0}")]
    NotFound(String),
}

/// Central error type for Vigil operations.
///
/// Each variant represents an error from a specific subsystem, allowing
/// for clear error propagation and handling across crate boundaries.
#[derive(Debug, Error)]
pub enum VigilError {
    /// Network fetch errors
    #[error("fetch error: {0}")]
    Fetch(#[from] FetchError),

    /// Snapshot or record storage errors
    #[error("storage error: {0}")]
    Storage(#[from] StorageError),

    /// Configuration errors (file loading, parsing, validation)
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    /// HTML processing errors (fingerprinting, diffing)
    #[error("html error: {0}")]
    Html(String),

    /// Validation errors (invalid input, constraints)
    #[error("validation error: {0}")]
    Validation(String),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic internal errors
    #[error("internal error: {0}")]
    Internal(String),
}

/// Configuration-specific errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to determine config directory path
    #[error("could not determine config directory (XDG base directories not available)")]
    NoConfigDir,

    /// Failed to parse TOML
    #[error("failed to parse config TOML: {0}")]
    ParseError(#[from] toml::de::Error),

    /// Failed to serialize config
    #[error("failed to serialize config: {0}")]
    SerializeError(#[from] toml::ser::Error),

    /// I/O error reading/writing config
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Invalid configuration value
    #[error("invalid config value for {field}: {reason}")]
    InvalidValue {
        /// Field name
        field: String,
        /// Reason for invalidity
        reason: String,
    },
}

/// Result type alias using `VigilError`.
pub type Result<T> = std::result::Result<T, VigilError>;

/// Result type alias for configuration operations.
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;
