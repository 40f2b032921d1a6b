//! External tool detection and availability checking.
//!
//! All macOS packaging tools are resolved up front so a missing tool is a
//! configuration error reported before anything runs.

use crate::bundler::error::{Error, Result};
use crate::bundler::utils::process::ToolCommand;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Directory the macOS packaging tools ship in.
pub const DEFAULT_TOOL_DIR: &str = "/usr/bin";

/// External tools driven by the pipeline.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub enum Tool {
    /// Component package builder
    Pkgbuild,
    /// Product archive (distribution) builder
    Productbuild,
    /// Keychain identity lookup
    Security,
    /// AppleScript compiler
    Osacompile,
    /// AppleScript runner (Finder layout)
    Osascript,
    /// Disk image utility
    Hdiutil,
    /// Extended attribute editor (volume icon flag)
    Xattr,
}

impl Tool {
    /// Executable file name.
    pub fn name(self) -> &'static str {
        match self {
            Self::Pkgbuild => "pkgbuild",
            Self::Productbuild => "productbuild",
            Self::Security => "security",
            Self::Osacompile => "osacompile",
            Self::Osascript => "osascript",
            Self::Hdiutil => "hdiutil",
            Self::Xattr => "xattr",
        }
    }

    /// Tools needed for a build with the given options.
    pub fn required(signing: bool, volume_icon: bool) -> Vec<Tool> {
        let mut tools = vec![
            Self::Pkgbuild,
            Self::Productbuild,
            Self::Osacompile,
            Self::Hdiutil,
            Self::Osascript,
        ];
        if signing {
            tools.push(Self::Security);
        }
        if volume_icon {
            tools.push(Self::Xattr);
        }
        tools
    }
}

/// Resolved paths of the external tools.
#[derive(Clone, Debug)]
pub struct Toolchain {
    dir: PathBuf,
    resolved: BTreeMap<Tool, PathBuf>,
}

impl Toolchain {
    /// Resolves every tool in `tools` inside `dir`.
    ///
    /// Fails with a configuration error listing all missing tools.
    pub fn locate(dir: &Path, tools: &[Tool]) -> Result<Self> {
        let mut resolved = BTreeMap::new();
        let mut missing = Vec::new();

        for &tool in tools {
            match which::which_in(tool.name(), Some(dir), dir) {
                Ok(path) => {
                    log::debug!("Found {} at: {}", tool.name(), path.display());
                    resolved.insert(tool, path);
                }
                Err(e) => {
                    log::debug!("{} not found in {}: {}", tool.name(), dir.display(), e);
                    missing.push(tool.name());
                }
            }
        }

        if !missing.is_empty() {
            return Err(Error::Configuration(format!(
                "required tools not found in {}: {}",
                dir.display(),
                missing.join(", ")
            )));
        }

        Ok(Self {
            dir: dir.to_path_buf(),
            resolved,
        })
    }

    /// Path of a tool; unresolved tools fall back to the tool directory.
    pub fn path(&self, tool: Tool) -> PathBuf {
        self.resolved
            .get(&tool)
            .cloned()
            .unwrap_or_else(|| self.dir.join(tool.name()))
    }

    /// Starts a command for a tool.
    pub fn command(&self, tool: Tool) -> ToolCommand {
        ToolCommand::new(self.path(tool))
    }
}
