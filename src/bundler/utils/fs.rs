//! File system utilities for staging disk image contents.
//!
//! Provides file and bundle copies with automatic directory creation,
//! symlink preservation, and path-aware error handling.

use crate::bundler::error::{Error, ErrorExt, Result};
use std::{
    io,
    path::{Path, PathBuf},
};
use tokio::fs;

/// Creates all of the directories of the specified path, erasing it first if specified.
pub async fn create_dir_all(path: &Path, erase: bool) -> Result<()> {
    if erase {
        match fs::remove_dir_all(path).await {
            Ok(()) => {}
            Err(e) if e.kind() == io::ErrorKind::NotFound => {}
            Err(e) => return Err(e).fs_context("removing directory", path),
        }
    }

    fs::create_dir_all(path)
        .await
        .fs_context("creating directory", path)
}

/// Makes a symbolic link.
#[cfg(unix)]
fn symlink(src: &Path, dst: &Path) -> io::Result<()> {
    std::os::unix::fs::symlink(src, dst)
}

#[cfg(not(unix))]
fn symlink(_src: &Path, dst: &Path) -> io::Result<()> {
    Err(io::Error::new(
        io::ErrorKind::Unsupported,
        format!("cannot recreate symlink {}", dst.display()),
    ))
}

/// Copies a regular file from one path to another, creating any parent
/// directories of the destination path as necessary.
///
/// Fails if the source path is a directory or doesn't exist.
pub async fn copy_file(from: &Path, to: &Path) -> Result<()> {
    if !from.is_file() {
        return Err(Error::GenericError(format!(
            "{} does not exist or is not a file",
            from.display()
        )));
    }
    if let Some(dest_dir) = to.parent() {
        fs::create_dir_all(dest_dir)
            .await
            .fs_context("creating directory", dest_dir)?;
    }
    fs::copy(from, to).await.fs_context("copying file", from)?;
    Ok(())
}

/// Recursively copies a directory (e.g. an `.app` bundle) from one path to
/// another, creating any parent directories of the destination as necessary.
///
/// Symlinks inside the tree are recreated rather than followed.
pub async fn copy_dir(from: &Path, to: &Path) -> Result<()> {
    if !from.is_dir() {
        return Err(Error::GenericError(format!(
            "{} does not exist or is not a directory",
            from.display()
        )));
    }

    let from = from.to_path_buf();
    let to = to.to_path_buf();

    tokio::task::spawn_blocking(move || copy_tree(&from, &to))
        .await
        .map_err(|e| Error::GenericError(format!("Directory copy task panicked: {}", e)))?
}

fn copy_tree(from: &Path, to: &Path) -> Result<()> {
    if let Some(parent) = to.parent() {
        std::fs::create_dir_all(parent).fs_context("creating directory", parent)?;
    }

    for entry in walkdir::WalkDir::new(from) {
        let entry = entry?;
        let rel_path = entry.path().strip_prefix(from)?;
        let dest_path = to.join(rel_path);

        if entry.file_type().is_symlink() {
            let target =
                std::fs::read_link(entry.path()).fs_context("reading symlink", entry.path())?;
            symlink(&target, &dest_path).fs_context("creating symlink", &dest_path)?;
        } else if entry.file_type().is_dir() {
            std::fs::create_dir_all(&dest_path).fs_context("creating directory", &dest_path)?;
        } else {
            std::fs::copy(entry.path(), &dest_path).fs_context("copying file", entry.path())?;
        }
    }

    Ok(())
}

/// Copies a file or a directory tree into `dest_dir`, keeping its file name.
///
/// Returns the path of the copy.
pub async fn copy_into(item: &Path, dest_dir: &Path) -> Result<PathBuf> {
    let name = item
        .file_name()
        .ok_or_else(|| Error::GenericError(format!("{} has no file name", item.display())))?;
    let dest = dest_dir.join(name);

    if item.is_dir() {
        copy_dir(item, &dest).await?;
    } else {
        copy_file(item, &dest).await?;
    }

    Ok(dest)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn copy_into_handles_files_and_bundles() {
        let src = tempfile::tempdir().unwrap();
        let dest = tempfile::tempdir().unwrap();

        let license = src.path().join("COPYRIGHT");
        std::fs::write(&license, "license text").unwrap();

        let app = src.path().join("Uninstall Product.app");
        std::fs::create_dir_all(app.join("Contents/Resources")).unwrap();
        std::fs::write(app.join("Contents/Info.plist"), "<plist/>").unwrap();

        let copied_license = copy_into(&license, dest.path()).await.unwrap();
        let copied_app = copy_into(&app, dest.path()).await.unwrap();

        assert_eq!(
            std::fs::read_to_string(copied_license).unwrap(),
            "license text"
        );
        assert!(copied_app.join("Contents/Resources").is_dir());
        assert!(copied_app.join("Contents/Info.plist").is_file());
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn copy_dir_preserves_symlinks() {
        let src = tempfile::tempdir().unwrap();
        let dest = tempfile::tempdir().unwrap();

        let bundle = src.path().join("App.app");
        std::fs::create_dir_all(bundle.join("Contents")).unwrap();
        std::fs::write(bundle.join("Contents/real"), "x").unwrap();
        std::os::unix::fs::symlink("real", bundle.join("Contents/link")).unwrap();

        let copy = dest.path().join("App.app");
        copy_dir(&bundle, &copy).await.unwrap();

        let link = copy.join("Contents/link");
        assert!(link.symlink_metadata().unwrap().file_type().is_symlink());
        assert_eq!(std::fs::read_link(link).unwrap(), PathBuf::from("real"));
    }

    #[tokio::test]
    async fn create_dir_all_can_erase() {
        let root = tempfile::tempdir().unwrap();
        let dir = root.path().join("staging");
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(dir.join("stale"), "old").unwrap();

        create_dir_all(&dir, true).await.unwrap();

        assert!(dir.is_dir());
        assert!(!dir.join("stale").exists());
    }
}
