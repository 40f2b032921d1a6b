//! Output artifact location.

use super::ProductSettings;
use crate::bundler::error::{Error, Result};
use path_absolutize::Absolutize;
use std::path::{Path, PathBuf};

/// Where the finished disk image is written.
///
/// The version is only known after probing the server binary, so the
/// directory variants defer the file name until [`OutputTarget::resolve`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutputTarget {
    /// No location given: version-named file in the default directory.
    Default(PathBuf),
    /// An existing directory was given: version-named file inside it.
    Directory(PathBuf),
    /// An explicit file path whose parent directory exists.
    File(PathBuf),
}

impl OutputTarget {
    /// Validates the `--output-location` argument.
    pub fn from_argument(argument: Option<&Path>, default_dir: &Path) -> Result<Self> {
        let Some(path) = argument else {
            return Ok(Self::Default(absolute(default_dir)?));
        };

        if path.is_dir() {
            return Ok(Self::Directory(absolute(path)?));
        }

        let parent = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        if !parent.is_dir() || path.file_name().is_none() || names_directory(path) {
            return Err(Error::Configuration(format!(
                "the output path given is not valid: {}",
                path.display()
            )));
        }

        Ok(Self::File(absolute(path)?))
    }

    /// Final artifact path for a discovered version.
    pub fn resolve(&self, product: &ProductSettings, version: &str) -> PathBuf {
        match self {
            Self::Default(dir) | Self::Directory(dir) => dir.join(product.dmg_file_name(version)),
            Self::File(path) => path.clone(),
        }
    }
}

/// Whether the argument was spelled as a directory (`dist/`).
fn names_directory(path: &Path) -> bool {
    path.as_os_str()
        .to_string_lossy()
        .ends_with(std::path::is_separator)
}

pub(super) fn absolute(path: &Path) -> Result<PathBuf> {
    path.absolutize()
        .map(|p| p.into_owned())
        .map_err(|e| {
            Error::Configuration(format!("cannot make {} absolute: {}", path.display(), e))
        })
}
