//! Builder for constructing Settings.

use super::output::absolute;
use super::{BundleConfig, OutputTarget, ResourcePaths, Settings};
use crate::bundler::builder::{DEFAULT_TOOL_DIR, Tool, Toolchain};
use crate::bundler::error::{Error, Result};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Distribution description inside the resources directory.
pub const DISTRIBUTION_FILE: &str = "Distribution.xml";
/// Uninstaller AppleScript source inside the resources directory.
pub const UNINSTALL_SCRIPT: &str = "uninstall.scpt";
/// Installer resources directory inside the resources directory.
pub const INSTALLER_RESOURCES_DIR: &str = "installer_resources";

/// Builder for constructing [`Settings`].
///
/// All validation happens in [`SettingsBuilder::build`], so a [`Settings`]
/// value always describes inputs that exist on disk and a complete toolchain.
///
/// # Examples
///
/// ```no_run
/// use server_dmg_bundler::bundler::SettingsBuilder;
///
/// # fn example() -> server_dmg_bundler::bundler::Result<()> {
/// let settings = SettingsBuilder::new()
///     .server_root("build/release/root")
///     .output(Some("dist".into()))
///     .signing_identity(Some("Developer ID Installer: Example Corp".into()))
///     .resources_dir("packaging/osx")
///     .license("COPYRIGHT")
///     .build()?;
/// # Ok(())
/// # }
/// ```
#[derive(Default)]
pub struct SettingsBuilder {
    server_root: Option<PathBuf>,
    output: Option<PathBuf>,
    binary_name: Option<String>,
    signing_identity: Option<String>,
    scratch_folder: Option<PathBuf>,
    resources_dir: Option<PathBuf>,
    license: Option<PathBuf>,
    config_file: Option<PathBuf>,
    tool_dir: Option<PathBuf>,
    tool_timeout: Option<Duration>,
}

impl SettingsBuilder {
    /// Creates a new settings builder.
    pub fn new() -> Self {
        Default::default()
    }

    /// Sets the server component root (required).
    pub fn server_root<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.server_root = Some(path.as_ref().to_path_buf());
        self
    }

    /// Sets the output file or directory.
    ///
    /// Default: version-named file in the resources directory
    pub fn output(mut self, path: Option<PathBuf>) -> Self {
        self.output = path;
        self
    }

    /// Sets the server binary name.
    ///
    /// Default: `rethinkdb`
    pub fn binary_name(mut self, name: impl Into<String>) -> Self {
        self.binary_name = Some(name.into());
        self
    }

    /// Sets the installer signing identity.
    pub fn signing_identity(mut self, identity: Option<String>) -> Self {
        self.signing_identity = identity;
        self
    }

    /// Sets an existing folder to hold the scratch directory.
    pub fn scratch_folder(mut self, path: Option<PathBuf>) -> Self {
        self.scratch_folder = path;
        self
    }

    /// Sets the packaging resources directory.
    ///
    /// Default: `packaging/osx`
    pub fn resources_dir<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.resources_dir = Some(path.as_ref().to_path_buf());
        self
    }

    /// Sets the license file copied into the image.
    ///
    /// Default: `COPYRIGHT`
    pub fn license<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.license = Some(path.as_ref().to_path_buf());
        self
    }

    /// Sets the bundle configuration file.
    pub fn config_file(mut self, path: Option<PathBuf>) -> Self {
        self.config_file = path;
        self
    }

    /// Sets the directory external tools are resolved in.
    ///
    /// Default: `/usr/bin`
    pub fn tool_dir(mut self, path: Option<PathBuf>) -> Self {
        self.tool_dir = path;
        self
    }

    /// Sets an upper bound on each external tool run.
    pub fn tool_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.tool_timeout = timeout;
        self
    }

    /// Validates every input and builds the settings.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Configuration`] for the first invalid input.
    pub fn build(self) -> Result<Settings> {
        let server_root = self
            .server_root
            .ok_or_else(|| Error::Configuration("-s/--server-root is required".into()))?;
        if !server_root.is_dir() {
            return Err(Error::Configuration(format!(
                "-s/--server-root must be a folder: {}",
                server_root.display()
            )));
        }
        let server_root = server_root.canonicalize().map_err(|e| {
            Error::Configuration(format!(
                "cannot resolve server root {}: {}",
                server_root.display(),
                e
            ))
        })?;

        let binary_name = self.binary_name.unwrap_or_else(|| "rethinkdb".into());
        if binary_name.is_empty() || binary_name.contains('/') {
            return Err(Error::Configuration(format!(
                "the binary name must be a plain file name: {:?}",
                binary_name
            )));
        }

        let signing_identity = match self.signing_identity.map(|s| s.trim().to_string()) {
            Some(identity) if identity.is_empty() => {
                return Err(Error::Configuration(
                    "--signing-name must not be empty".into(),
                ));
            }
            other => other,
        };

        let resources_dir = self
            .resources_dir
            .unwrap_or_else(|| PathBuf::from("packaging/osx"));
        if !resources_dir.is_dir() {
            return Err(Error::Configuration(format!(
                "the resources directory does not exist: {}",
                resources_dir.display()
            )));
        }
        let resources_dir = absolute(&resources_dir)?;

        let license = self.license.unwrap_or_else(|| PathBuf::from("COPYRIGHT"));
        let resources = ResourcePaths {
            distribution: require_file(resources_dir.join(DISTRIBUTION_FILE))?,
            uninstall_script: require_file(resources_dir.join(UNINSTALL_SCRIPT))?,
            installer_resources: require_dir(resources_dir.join(INSTALLER_RESOURCES_DIR))?,
            license: require_file(absolute(&license)?)?,
        };

        let config = match &self.config_file {
            Some(path) => BundleConfig::load(path)?,
            None => BundleConfig::default(),
        };
        let product = config.product;
        if product.name.trim().is_empty() || product.identifier.trim().is_empty() {
            return Err(Error::Configuration(
                "product name and identifier must not be empty".into(),
            ));
        }
        let mut layout = config.dmg;
        layout.resolve_paths(&resources_dir);
        if let Some(background) = &layout.background {
            require_file(background.clone())?;
        }
        if let Some(badge) = &layout.badge_icon {
            require_file(badge.clone())?;
        }

        let output = OutputTarget::from_argument(self.output.as_deref(), &resources_dir)?;

        let scratch_parent = match self.scratch_folder {
            Some(folder) if folder.is_dir() => Some(absolute(&folder)?),
            Some(folder) => {
                return Err(Error::Configuration(format!(
                    "the --scratch-folder given is not an existing folder: {}",
                    folder.display()
                )));
            }
            None => None,
        };

        let tool_dir = self
            .tool_dir
            .unwrap_or_else(|| PathBuf::from(DEFAULT_TOOL_DIR));
        let toolchain = Toolchain::locate(
            &tool_dir,
            &Tool::required(signing_identity.is_some(), layout.badge_icon.is_some()),
        )?;

        if self.tool_timeout == Some(Duration::ZERO) {
            return Err(Error::Configuration(
                "--tool-timeout must be greater than zero".into(),
            ));
        }

        Ok(Settings::new(
            server_root,
            output,
            binary_name,
            signing_identity,
            scratch_parent,
            product,
            resources,
            layout,
            toolchain,
            self.tool_timeout,
        ))
    }
}

fn require_file(path: PathBuf) -> Result<PathBuf> {
    if path.is_file() {
        Ok(path)
    } else {
        Err(Error::Configuration(format!(
            "required file is missing: {}",
            path.display()
        )))
    }
}

fn require_dir(path: PathBuf) -> Result<PathBuf> {
    if path.is_dir() {
        Ok(path)
    } else {
        Err(Error::Configuration(format!(
            "required folder is missing: {}",
            path.display()
        )))
    }
}
