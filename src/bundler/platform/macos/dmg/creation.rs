//! Staging and read-write image creation.
//!
//! Handles:
//! - Copying every layout file into a staging directory
//! - Placing the background image and volume icon as hidden entries
//! - Running `hdiutil create` to produce a UDRW image

use crate::bundler::{
    builder::{ScratchDir, Tool},
    error::{Context, Error, Result},
    settings::{DiskLayout, Settings},
    utils::fs,
};
use std::path::{Path, PathBuf};

/// Hidden folder holding the window background.
pub const BACKGROUND_DIR: &str = ".background";

/// File name Finder reads the custom volume icon from.
pub const VOLUME_ICON: &str = ".VolumeIcon.icns";

/// Copies the layout's files and decorations into `staging`.
///
/// Returns the staged background file name, if any, for the Finder script.
pub async fn stage_contents(layout: &DiskLayout, staging: &Path) -> Result<Option<String>> {
    fs::create_dir_all(staging, true).await?;

    for file in &layout.files {
        log::debug!("Staging {}", file.display());
        fs::copy_into(file, staging)
            .await
            .with_context(|| format!("staging {}", file.display()))?;
    }

    let mut background_name = None;
    if let Some(background) = &layout.options.background {
        let staged = fs::copy_into(background, &staging.join(BACKGROUND_DIR))
            .await
            .context("staging background image")?;
        background_name = staged
            .file_name()
            .map(|name| name.to_string_lossy().into_owned());
    }

    if let Some(icon) = &layout.options.badge_icon {
        fs::copy_file(icon, &staging.join(VOLUME_ICON))
            .await
            .context("staging volume icon")?;
    }

    Ok(background_name)
}

/// Creates a read-write (UDRW) image from the staging directory.
///
/// The layout can only be applied to a writable image; compression happens
/// afterwards in [`convert_to_compressed`](super::convert_to_compressed).
pub async fn create_rw_image(
    settings: &Settings,
    scratch: &ScratchDir,
    staging: &Path,
    volume_name: &str,
) -> Result<PathBuf> {
    let rw_path = scratch.join("rw.dmg");

    log::info!("Creating read-write image for volume \"{}\"", volume_name);

    settings
        .toolchain()
        .command(Tool::Hdiutil)
        .args(["create", "-volname", volume_name, "-srcfolder"])
        .arg(staging)
        .args(["-ov", "-fs", "HFS+", "-format", "UDRW"])
        .arg(&rw_path)
        .run_logged(&scratch.log("dmg-create"), settings.tool_timeout())
        .await?
        .map_err(Error::ImageBuildFailed)?;

    log::info!("✓ Created UDRW image: {}", rw_path.display());
    Ok(rw_path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bundler::settings::LayoutOptions;

    #[tokio::test]
    async fn stages_files_and_hidden_decorations() {
        let src = tempfile::tempdir().unwrap();
        let staging = tempfile::tempdir().unwrap();

        let license = src.path().join("COPYRIGHT");
        std::fs::write(&license, "license").unwrap();
        let app = src.path().join("Uninstall Product.app");
        std::fs::create_dir_all(app.join("Contents")).unwrap();
        let background = src.path().join("dmg_background.png");
        std::fs::write(&background, "png").unwrap();
        let icon = src.path().join("Thinker.icns");
        std::fs::write(&icon, "icns").unwrap();

        let mut layout = DiskLayout::new(LayoutOptions {
            background: Some(background),
            badge_icon: Some(icon),
            ..Default::default()
        });
        layout.add(&license, (630, 303));
        layout.add(&app, (630, 170));

        let background_name = stage_contents(&layout, staging.path()).await.unwrap();

        assert_eq!(background_name.as_deref(), Some("dmg_background.png"));
        assert!(staging.path().join("COPYRIGHT").is_file());
        assert!(staging.path().join("Uninstall Product.app/Contents").is_dir());
        assert!(
            staging
                .path()
                .join(BACKGROUND_DIR)
                .join("dmg_background.png")
                .is_file()
        );
        assert!(staging.path().join(VOLUME_ICON).is_file());
    }

    #[tokio::test]
    async fn no_decorations_when_unset() {
        let staging = tempfile::tempdir().unwrap();
        let layout = DiskLayout::new(LayoutOptions {
            background: None,
            badge_icon: None,
            ..Default::default()
        });

        let background_name = stage_contents(&layout, staging.path()).await.unwrap();

        assert!(background_name.is_none());
        assert_eq!(std::fs::read_dir(staging.path()).unwrap().count(), 0);
    }
}
