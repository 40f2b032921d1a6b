//! macOS installer disk image bundler library
//!
//! This library packages a built server tree into:
//! - a component package (`pkgbuild`)
//! - an optionally signed distribution package (`productbuild`)
//! - a compressed disk image that also holds an uninstaller, a release notes
//!   shortcut and the license, laid out by Finder
//!
//! It can be used both as a CLI tool and as a library dependency.

pub mod bundler;
pub mod cli;
pub mod error;

// Re-export commonly used types
pub use error::{BundlerError, Result};
