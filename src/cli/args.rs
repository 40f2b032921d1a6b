//! Command line argument parsing.

use crate::bundler::{DEFAULT_TOOL_DIR, Result, Settings, SettingsBuilder};
use clap::Parser;
use std::path::PathBuf;
use std::time::Duration;

/// macOS disk image builder for the server distribution
#[derive(Parser, Debug)]
#[command(
    name = "server_dmg_bundler",
    version,
    args_override_self = true,
    about = "Builds the macOS installer disk image for the server",
    long_about = "Packages a built server tree into a macOS installer disk image.

The image holds the (optionally signed) installer package, an uninstaller
application, a release notes shortcut and the license, laid out over a
background picture.

Usage:
  server_dmg_bundler -s build/release/root
  server_dmg_bundler -s build/release/root -o dist/ --signing-name 'Developer ID Installer: Example Corp'

Exit code 0 = the disk image exists at the printed path."
)]
pub struct Args {
    /// Root of the server file tree to package
    #[arg(short = 's', long, value_name = "DIR")]
    pub server_root: PathBuf,

    /// Output disk image file, or an existing folder to place it in
    ///
    /// Default: `<Product> <version>.dmg` in the resources directory.
    #[arg(short = 'o', long, value_name = "PATH", alias = "ouptut-location")]
    pub output_location: Option<PathBuf>,

    /// File name of the server executable inside the server root
    #[arg(long, value_name = "NAME", default_value = "rethinkdb", alias = "rethinkdb-name")]
    pub binary_name: String,

    /// Installer signing identity from the keychain
    #[arg(long, value_name = "IDENTITY")]
    pub signing_name: Option<String>,

    /// Existing folder to create the scratch directory in
    #[arg(long, value_name = "DIR")]
    pub scratch_folder: Option<PathBuf>,

    /// Packaging resources (Distribution.xml, uninstall.scpt, installer_resources/, artwork)
    #[arg(
        long,
        value_name = "DIR",
        env = "DMG_BUNDLER_RESOURCES",
        default_value = "packaging/osx"
    )]
    pub resources_dir: PathBuf,

    /// License file placed in the disk image
    #[arg(long, value_name = "FILE", default_value = "COPYRIGHT")]
    pub license: PathBuf,

    /// TOML file with [product] and [dmg] settings
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Directory holding pkgbuild, productbuild, hdiutil and friends
    #[arg(long, value_name = "DIR", env = "DMG_BUNDLER_TOOL_DIR", default_value = DEFAULT_TOOL_DIR)]
    pub tool_dir: PathBuf,

    /// Kill any external tool that runs longer than this many seconds
    #[arg(long, value_name = "SECS", value_parser = clap::value_parser!(u64).range(1..))]
    pub tool_timeout: Option<u64>,

    /// Show detailed progress
    #[arg(short, long, conflicts_with = "quiet")]
    pub verbose: bool,

    /// Only print the path of the finished image
    #[arg(short, long)]
    pub quiet: bool,
}

impl Args {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Validates the arguments into pipeline settings.
    pub fn to_settings(&self) -> Result<Settings> {
        SettingsBuilder::new()
            .server_root(&self.server_root)
            .output(self.output_location.clone())
            .binary_name(self.binary_name.clone())
            .signing_identity(self.signing_name.clone())
            .scratch_folder(self.scratch_folder.clone())
            .resources_dir(&self.resources_dir)
            .license(&self.license)
            .config_file(self.config.clone())
            .tool_dir(Some(self.tool_dir.clone()))
            .tool_timeout(self.tool_timeout.map(Duration::from_secs))
            .build()
    }
}
