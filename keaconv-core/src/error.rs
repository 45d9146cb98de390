//! Error types for keaconv

use thiserror::Error;

/// Result type for keaconv operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for keaconv
#[derive(Error, Debug)]
pub enum Error {
    /// Settings file could not be read or parsed
    #[error("Configuration error: {0}")]
    Config(String),

    /// Option registry inconsistency
    #[error("Registry error: {0}")]
    Registry(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}
