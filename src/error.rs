//! Top-level error type for the command line tool.

use thiserror::Error;

/// Result type alias for command line operations
pub type Result<T> = std::result::Result<T, BundlerError>;

/// Main error type for the command line tool
#[derive(Error, Debug)]
pub enum BundlerError {
    /// Terminal output errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Pipeline errors, displayed without a prefix so tool logs read cleanly
    #[error("{0}")]
    Bundler(#[from] crate::bundler::Error),
}
