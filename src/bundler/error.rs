//! Error types for bundler operations.
//!
//! Every pipeline step returns one of these variants; none of them are retried.
//! External tool failures carry the tool's captured log so the diagnostic
//! survives the removal of the scratch directory.
//!
//! # Features
//!
//! - **Context trait**: Add context to errors similar to anyhow
//! - **ErrorExt trait**: Filesystem operations with automatic path context
//! - **bail! macro**: Early return with formatted error messages

use std::{
    fmt::{self, Display},
    io,
    path::{self, PathBuf},
};
use thiserror::Error as DeriveError;

/// Output of an external tool that exited unsuccessfully.
///
/// `log` holds everything the tool wrote to stdout and stderr.
#[derive(Debug, Clone)]
pub struct ToolFailure {
    /// Command line that was executed
    pub command: String,
    /// Exit status or spawn/timeout reason
    pub reason: String,
    /// Captured stdout + stderr
    pub log: String,
}

impl Display for ToolFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "`{}` {}", self.command, self.reason)?;
        let log = self.log.trim_end();
        if !log.is_empty() {
            write!(f, "\n{log}")?;
        }
        Ok(())
    }
}

/// Errors returned by the bundler.
#[derive(Debug, DeriveError)]
#[non_exhaustive]
pub enum Error {
    /// Error with context. Created by the [`Context`] trait.
    #[error("{0}: {1}")]
    Context(String, Box<Self>),

    /// Invalid or missing input, detected before any external tool runs.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// The server binary was not found under the server root.
    #[error("unable to find an executable named `{binary_name}` under {}", root.display())]
    NotFound {
        /// File name that was searched for
        binary_name: String,
        /// Directory tree that was searched
        root: PathBuf,
    },

    /// The version probe produced output without a usable version token.
    #[error(
        "the executable {} does not report a regular version string (got: {output:?})",
        executable.display()
    )]
    InvalidVersion {
        /// Executable that was probed
        executable: PathBuf,
        /// Raw probe output
        output: String,
    },

    /// An executable could not be run, or exited unsuccessfully outside a logged step.
    #[error("failed to run {command}: {reason}")]
    ExecutionFailed {
        /// Command that failed
        command: String,
        /// Reason for the failure
        reason: String,
    },

    /// Requested signing identity is unknown to the keychain.
    #[error("could not find the requested signing identity: {identity}")]
    SigningIdentityNotFound {
        /// Identity name as requested
        identity: String,
    },

    /// `pkgbuild` failed.
    #[error("failed while building the component package: {0}")]
    PackagingFailed(ToolFailure),

    /// `productbuild` failed.
    #[error("failed while assembling the distribution package: {0}")]
    AssemblyFailed(ToolFailure),

    /// `osacompile` failed.
    #[error("failed while compiling the uninstall application: {0}")]
    CompilationFailed(ToolFailure),

    /// Any disk image step failed.
    #[error("failed while building the disk image: {0}")]
    ImageBuildFailed(ToolFailure),

    /// File system error with path context.
    ///
    /// Created by the [`ErrorExt`] trait's `fs_context` method.
    #[error("{context} {path}: {error}")]
    Fs {
        /// Context describing the operation (e.g., "reading config file")
        context: &'static str,
        /// Path that was being accessed
        path: PathBuf,
        /// The underlying I/O error
        error: io::Error,
    },

    /// Error walking a directory tree.
    #[error("{0}")]
    WalkdirError(#[from] walkdir::Error),

    /// Path prefix stripping error.
    #[error("{0}")]
    StripError(#[from] path::StripPrefixError),

    /// Generic error with custom message.
    #[error("{0}")]
    GenericError(String),
}

/// Convenient type alias for Result.
pub type Result<T> = std::result::Result<T, Error>;

/// Trait for adding context to errors.
///
/// Similar to `anyhow::Context` but integrated with bundler's Error type.
pub trait Context<T> {
    /// Add context to an error.
    fn context<C>(self, context: C) -> Result<T>
    where
        C: Display + Send + Sync + 'static;

    /// Add context to an error using a closure (lazy evaluation).
    fn with_context<C, F>(self, f: F) -> Result<T>
    where
        C: Display + Send + Sync + 'static,
        F: FnOnce() -> C;
}

impl<T> Context<T> for Result<T> {
    fn context<C>(self, context: C) -> Result<T>
    where
        C: Display + Send + Sync + 'static,
    {
        self.map_err(|e| Error::Context(context.to_string(), Box::new(e)))
    }

    fn with_context<C, F>(self, f: F) -> Result<T>
    where
        C: Display + Send + Sync + 'static,
        F: FnOnce() -> C,
    {
        self.map_err(|e| Error::Context(f().to_string(), Box::new(e)))
    }
}

/// Extension trait for filesystem operations with automatic path context.
///
/// ```no_run
/// # use std::path::Path;
/// # use server_dmg_bundler::bundler::{Result, error::ErrorExt};
/// fn create_package_dir(path: &Path) -> Result<()> {
///     std::fs::create_dir_all(path)
///         .fs_context("creating package directory", path)?;
///     Ok(())
/// }
/// ```
pub trait ErrorExt<T> {
    /// Add filesystem context to an I/O error.
    ///
    /// The `context` should be a present-tense verb phrase describing the operation,
    /// e.g., "reading file", "creating directory", "copying binary".
    fn fs_context(self, context: &'static str, path: impl Into<PathBuf>) -> Result<T>;
}

impl<T> ErrorExt<T> for std::result::Result<T, std::io::Error> {
    fn fs_context(self, context: &'static str, path: impl Into<PathBuf>) -> Result<T> {
        self.map_err(|error| Error::Fs {
            context,
            path: path.into(),
            error,
        })
    }
}

/// Macro for early return with error.
///
/// Converts the message into a [`Error::GenericError`] and returns immediately.
///
/// ```ignore
/// bail!("operation failed");
/// bail!("invalid value: {}", value);
/// ```
#[macro_export]
macro_rules! bail {
    ($msg:literal $(,)?) => {
        return Err($crate::bundler::error::Error::GenericError($msg.into()))
    };
    ($err:expr $(,)?) => {
        return Err($crate::bundler::error::Error::GenericError($err.to_string()))
    };
    ($fmt:expr, $($arg:tt)*) => {
        return Err($crate::bundler::error::Error::GenericError(format!($fmt, $($arg)*)))
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tool_failure_includes_log_inline() {
        let failure = ToolFailure {
            command: "pkgbuild --root /tmp/x".into(),
            reason: "exited with status 1".into(),
            log: "pkgbuild: error: no such root\n".into(),
        };
        let message = Error::PackagingFailed(failure).to_string();
        assert!(message.contains("component package"));
        assert!(message.contains("exited with status 1"));
        assert!(message.ends_with("pkgbuild: error: no such root"));
    }

    #[test]
    fn context_wraps_inner_error() {
        let result: Result<()> = Err(Error::GenericError("inner".into()));
        let err = result.context("outer").unwrap_err();
        assert_eq!(err.to_string(), "outer: inner");
    }

    #[test]
    fn fs_context_names_operation_and_path() {
        let result: std::result::Result<(), io::Error> =
            Err(io::Error::new(io::ErrorKind::NotFound, "missing"));
        let err = result
            .fs_context("reading config file", "/tmp/bundle.toml")
            .unwrap_err();
        assert!(matches!(err, Error::Fs { .. }));
        assert_eq!(err.to_string(), "reading config file /tmp/bundle.toml: missing");
    }
}
