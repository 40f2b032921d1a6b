//! macOS packaging with the native command line tools.
//!
//! - `pkg` - component package, distribution and signing identity check
//! - `auxiliary` - uninstaller application and release notes shortcut
//! - `dmg` - disk image staging, layout and compression

pub mod auxiliary;
pub mod dmg;
pub mod pkg;
