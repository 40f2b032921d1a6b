//! macOS installer packages.
//!
//! - `component` - server component package via `pkgbuild`
//! - `distribution` - product archive via `productbuild`
//! - `identity` - keychain lookup for the installer signing identity

mod component;
mod distribution;
mod identity;

pub use component::{PACKAGES_DIR, build_component_package};
pub use distribution::assemble_distribution;
pub use identity::{identity_listed, verify_signing_identity};
