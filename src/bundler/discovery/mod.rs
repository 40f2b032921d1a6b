//! Server binary discovery and version probing.

mod locator;
mod version;

pub use locator::find_executable;
pub use version::{extract_version, parse_version_output};
