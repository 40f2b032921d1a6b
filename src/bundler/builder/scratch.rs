//! Scratch directory for intermediate build products.

use crate::bundler::error::{Error, Result};
use std::path::{Path, PathBuf};
use tempfile::TempDir;

const SCRATCH_PREFIX: &str = "dmg-scratch-";

/// Process-lifetime scratch directory.
///
/// Removed when dropped, which covers normal completion, early `?` returns
/// and a cancelled pipeline future alike. When created inside a user-supplied
/// folder only the fresh subdirectory is removed, never the folder itself.
#[derive(Debug)]
pub struct ScratchDir {
    dir: Option<TempDir>,
    path: PathBuf,
}

impl ScratchDir {
    /// Creates a uniquely named scratch directory inside `parent`, or inside
    /// the system temporary directory when `parent` is `None`.
    pub fn create(parent: Option<&Path>) -> Result<Self> {
        let mut builder = tempfile::Builder::new();
        builder.prefix(SCRATCH_PREFIX);
        let dir = match parent {
            Some(parent) => builder.tempdir_in(parent),
            None => builder.tempdir(),
        }
        .map_err(|e| {
            Error::GenericError(format!("Failed to create scratch directory: {}", e))
        })?;

        let path = dir.path().to_path_buf();
        log::debug!("Scratch directory: {}", path.display());

        Ok(Self {
            dir: Some(dir),
            path,
        })
    }

    /// Root of the scratch directory.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Path of an entry inside the scratch directory.
    pub fn join(&self, name: impl AsRef<Path>) -> PathBuf {
        self.path.join(name)
    }

    /// Path of the log file for a named step.
    pub fn log(&self, step: &str) -> PathBuf {
        self.path.join(format!("{}.log", step))
    }
}

impl Drop for ScratchDir {
    fn drop(&mut self) {
        if let Some(dir) = self.dir.take() {
            match dir.close() {
                Ok(()) => log::debug!("Removed scratch directory {}", self.path.display()),
                Err(e) => log::error!(
                    "Unable to delete scratch directory {}: {}",
                    self.path.display(),
                    e
                ),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn removed_on_drop_with_contents() {
        let scratch = ScratchDir::create(None).unwrap();
        let path = scratch.path().to_path_buf();
        std::fs::create_dir_all(scratch.join("packages")).unwrap();
        std::fs::write(scratch.log("pkgbuild"), "log").unwrap();

        drop(scratch);

        assert!(!path.exists());
    }

    #[test]
    fn override_folder_survives_but_is_emptied() {
        let parent = tempfile::tempdir().unwrap();
        let scratch = ScratchDir::create(Some(parent.path())).unwrap();
        assert!(scratch.path().starts_with(parent.path()));
        std::fs::write(scratch.join("file"), "x").unwrap();

        drop(scratch);

        assert!(parent.path().is_dir());
        assert_eq!(std::fs::read_dir(parent.path()).unwrap().count(), 0);
    }

    #[test]
    fn log_paths_live_in_scratch() {
        let scratch = ScratchDir::create(None).unwrap();
        assert_eq!(
            scratch.log("uninstall-compile"),
            scratch.path().join("uninstall-compile.log")
        );
    }
}
