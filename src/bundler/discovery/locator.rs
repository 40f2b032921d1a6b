//! Executable lookup inside the server root tree.

use crate::bundler::error::{Error, Result};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Finds the first file named `binary_name` under `root` that the current
/// user may execute.
///
/// The tree is walked depth-first with entries sorted by name, so repeated
/// runs over the same tree pick the same file.
pub fn find_executable(root: &Path, binary_name: &str) -> Result<PathBuf> {
    for entry in WalkDir::new(root).sort_by_file_name() {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                log::debug!("Skipping unreadable entry under {}: {}", root.display(), e);
                continue;
            }
        };

        if entry.file_name() != binary_name || !entry.path().is_file() {
            continue;
        }

        if is_executable(entry.path()) {
            log::debug!("Found {} at {}", binary_name, entry.path().display());
            return Ok(entry.into_path());
        }
        log::debug!(
            "Ignoring non-executable {} at {}",
            binary_name,
            entry.path().display()
        );
    }

    Err(Error::NotFound {
        binary_name: binary_name.to_string(),
        root: root.to_path_buf(),
    })
}

#[cfg(unix)]
fn is_executable(path: &Path) -> bool {
    nix::unistd::access(path, nix::unistd::AccessFlags::X_OK).is_ok()
}

#[cfg(not(unix))]
fn is_executable(path: &Path) -> bool {
    path.is_file()
}
