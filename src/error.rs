//! # Error Types
//!
//! Custom error types for padlink using `thiserror`.

use thiserror::Error;

/// Main error type for padlink
#[derive(Debug, Error)]
pub enum PadlinkError {
    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(#[from] toml::de::Error),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The engine task has shut down and no longer accepts commands
    #[error("Engine is no longer running")]
    EngineClosed,
}

/// Result type alias for padlink
pub type Result<T> = std::result::Result<T, PadlinkError>;
