//! Configuration structures for the packaging pipeline.
//!
//! [`SettingsBuilder`] turns command line input and the optional bundle
//! configuration file into validated, immutable [`Settings`].

mod builder;
mod config;
mod core;
mod macos;
mod output;
mod product;

pub use self::core::{ResourcePaths, Settings};
pub use builder::{DISTRIBUTION_FILE, INSTALLER_RESOURCES_DIR, SettingsBuilder, UNINSTALL_SCRIPT};
pub use config::BundleConfig;
pub use macos::{
    DiskLayout, IconPosition, IconPositions, ImageFormat, LayoutOptions, ViewMode, WindowRect,
};
pub use output::OutputTarget;
pub use product::{ProductSettings, RELEASE_NOTES_FILE};
