//! Server disk image bundler.
//!
//! Packages a server component tree into a macOS installer and wraps it,
//! together with an uninstaller, a release notes shortcut and the license,
//! in a laid-out disk image.
//!
//! # Example
//!
//! ```no_run
//! use server_dmg_bundler::bundler::{Bundler, SettingsBuilder};
//!
//! # async fn example() -> server_dmg_bundler::bundler::Result<()> {
//! let settings = SettingsBuilder::new()
//!     .server_root("build/release/root")
//!     .signing_identity(Some("Developer ID Installer: Example Corp".into()))
//!     .build()?;
//!
//! let artifact = Bundler::new(settings).bundle().await?;
//! println!("{}", artifact.path.display());
//! # Ok(())
//! # }
//! ```

pub mod builder;
pub mod discovery;
pub mod error;
pub mod platform;
pub mod settings;
pub mod utils;

pub use builder::{BundledArtifact, Bundler, DEFAULT_TOOL_DIR};
pub use error::{Error, Result};
pub use settings::{Settings, SettingsBuilder};
