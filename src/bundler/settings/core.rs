//! Core Settings struct and implementations.

use super::{LayoutOptions, OutputTarget, ProductSettings};
use crate::bundler::builder::Toolchain;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Packaging inputs read from the resources directory.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ResourcePaths {
    /// Distribution description understood by `productbuild`.
    pub distribution: PathBuf,
    /// AppleScript source of the uninstaller.
    pub uninstall_script: PathBuf,
    /// Installer resources (welcome text, license, background).
    pub installer_resources: PathBuf,
    /// License file copied verbatim into the image.
    pub license: PathBuf,
}

/// Fully validated build configuration.
///
/// Constructed once via [`SettingsBuilder`](super::SettingsBuilder), which
/// checks every path before returning; nothing mutates it afterwards.
///
/// # Examples
///
/// ```no_run
/// use server_dmg_bundler::bundler::SettingsBuilder;
///
/// # fn example() -> server_dmg_bundler::bundler::Result<()> {
/// let settings = SettingsBuilder::new()
///     .server_root("build/release/root")
///     .resources_dir("packaging/osx")
///     .license("COPYRIGHT")
///     .build()?;
/// # Ok(())
/// # }
/// ```
#[derive(Clone, Debug)]
pub struct Settings {
    server_root: PathBuf,
    output: OutputTarget,
    binary_name: String,
    signing_identity: Option<String>,
    scratch_parent: Option<PathBuf>,
    product: ProductSettings,
    resources: ResourcePaths,
    layout: LayoutOptions,
    toolchain: Toolchain,
    tool_timeout: Option<Duration>,
}

impl Settings {
    /// Canonical path of the server component's root tree.
    pub fn server_root(&self) -> &Path {
        &self.server_root
    }

    /// Output location, resolved against the version later.
    pub fn output(&self) -> &OutputTarget {
        &self.output
    }

    /// Name of the server binary to probe for the version.
    pub fn binary_name(&self) -> &str {
        &self.binary_name
    }

    /// Installer signing identity, if the distribution should be signed.
    pub fn signing_identity(&self) -> Option<&str> {
        self.signing_identity.as_deref()
    }

    /// Directory the scratch directory is created in (system temp when `None`).
    pub fn scratch_parent(&self) -> Option<&Path> {
        self.scratch_parent.as_deref()
    }

    /// Product naming.
    pub fn product(&self) -> &ProductSettings {
        &self.product
    }

    /// Packaging resource files.
    pub fn resources(&self) -> &ResourcePaths {
        &self.resources
    }

    /// Disk image layout defaults for this build.
    pub fn layout(&self) -> &LayoutOptions {
        &self.layout
    }

    /// Resolved external tools.
    pub fn toolchain(&self) -> &Toolchain {
        &self.toolchain
    }

    /// Upper bound on every external tool run.
    pub fn tool_timeout(&self) -> Option<Duration> {
        self.tool_timeout
    }

    /// Creates a new Settings instance (used by SettingsBuilder).
    #[allow(clippy::too_many_arguments)]
    pub(super) fn new(
        server_root: PathBuf,
        output: OutputTarget,
        binary_name: String,
        signing_identity: Option<String>,
        scratch_parent: Option<PathBuf>,
        product: ProductSettings,
        resources: ResourcePaths,
        layout: LayoutOptions,
        toolchain: Toolchain,
        tool_timeout: Option<Duration>,
    ) -> Self {
        Self {
            server_root,
            output,
            binary_name,
            signing_identity,
            scratch_parent,
            product,
            resources,
            layout,
            toolchain,
            tool_timeout,
        }
    }
}
