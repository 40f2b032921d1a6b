//! Finder layout of the mounted read-write image.
//!
//! - Mounting the image read-write at a scratch mount point
//! - Flagging the volume as having a custom icon
//! - Running AppleScript to set window geometry, view options and icon positions
//! - Detaching the image afterwards, even when the layout step failed

use crate::bundler::{
    builder::{ScratchDir, Tool},
    error::{Error, Result, ToolFailure},
    settings::{DiskLayout, Settings},
};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// FinderInfo with only the `kHasCustomIcon` flag set.
const CUSTOM_ICON_FINDER_INFO: &str =
    "0000000000000000040000000000000000000000000000000000000000000000";

/// Applies the layout to a read-write image.
///
/// # Process
/// 1. Attach the image read-write at `<scratch>/mount`
/// 2. Mark the volume icon when one was staged
/// 3. Run the Finder AppleScript
/// 4. Wait for Finder to write `.DS_Store`
/// 5. Detach
pub async fn apply_layout(
    settings: &Settings,
    scratch: &ScratchDir,
    rw_image: &Path,
    volume_name: &str,
    layout: &DiskLayout,
    background_name: Option<&str>,
) -> Result<()> {
    log::info!("Applying disk image layout...");

    let mount_point = attach_rw(settings, scratch, rw_image).await?;

    let customized = customize_mounted(
        settings,
        scratch,
        &mount_point,
        volume_name,
        layout,
        background_name,
    )
    .await;

    let detached = detach(settings, scratch, &mount_point).await;

    customized?;
    detached?;

    log::info!("✓ Disk image layout applied");
    Ok(())
}

async fn customize_mounted(
    settings: &Settings,
    scratch: &ScratchDir,
    mount_point: &Path,
    volume_name: &str,
    layout: &DiskLayout,
    background_name: Option<&str>,
) -> Result<()> {
    if layout.options.badge_icon.is_some() {
        settings
            .toolchain()
            .command(Tool::Xattr)
            .args(["-wx", "com.apple.FinderInfo", CUSTOM_ICON_FINDER_INFO])
            .arg(mount_point)
            .run_logged(&scratch.log("dmg-volume-icon"), settings.tool_timeout())
            .await?
            .map_err(Error::ImageBuildFailed)?;
    }

    let script = layout_script(volume_name, layout, background_name);
    log::debug!("Finder layout script:\n{}", script);

    settings
        .toolchain()
        .command(Tool::Osascript)
        .arg("-e")
        .arg(&script)
        .run_logged(&scratch.log("dmg-layout"), settings.tool_timeout())
        .await?
        .map_err(Error::ImageBuildFailed)?;

    wait_for_ds_store(mount_point).await;
    Ok(())
}

/// Attaches the image read-write at a mount point inside scratch.
async fn attach_rw(
    settings: &Settings,
    scratch: &ScratchDir,
    rw_image: &Path,
) -> Result<PathBuf> {
    let mount_point = scratch.join("mount");
    log::debug!("Mounting {} at {}", rw_image.display(), mount_point.display());

    let command = settings
        .toolchain()
        .command(Tool::Hdiutil)
        .arg("attach")
        .arg(rw_image)
        .args(["-readwrite", "-noverify", "-noautoopen", "-mountpoint"])
        .arg(&mount_point);

    command
        .run_logged(&scratch.log("dmg-attach"), settings.tool_timeout())
        .await?
        .map_err(Error::ImageBuildFailed)?;

    if !mount_point.is_dir() {
        return Err(Error::ImageBuildFailed(ToolFailure {
            command: command.display(),
            reason: format!("mount point {} not found", mount_point.display()),
            log: String::new(),
        }));
    }

    Ok(mount_point)
}

/// Detaches the image, retrying once with `-force`.
async fn detach(settings: &Settings, scratch: &ScratchDir, mount_point: &Path) -> Result<()> {
    log::debug!("Detaching {}", mount_point.display());

    let first = settings
        .toolchain()
        .command(Tool::Hdiutil)
        .arg("detach")
        .arg(mount_point)
        .run_logged(&scratch.log("dmg-detach"), settings.tool_timeout())
        .await?;

    if let Err(failure) = first {
        log::warn!("Detach had issues, forcing: {}", failure);
        settings
            .toolchain()
            .command(Tool::Hdiutil)
            .arg("detach")
            .arg(mount_point)
            .arg("-force")
            .run_logged(&scratch.log("dmg-detach-force"), settings.tool_timeout())
            .await?
            .map_err(Error::ImageBuildFailed)?;
    }

    Ok(())
}

/// Gives Finder time to persist the view settings before detaching.
async fn wait_for_ds_store(mount_point: &Path) {
    let ds_store = mount_point.join(".DS_Store");
    for _ in 0..10 {
        if ds_store.exists() {
            return;
        }
        tokio::time::sleep(Duration::from_millis(500)).await;
    }
    log::warn!(
        "Finder did not write {}; the layout may not persist",
        ds_store.display()
    );
}

/// Escape special characters for AppleScript string literals.
fn escape_applescript_string(s: &str) -> String {
    s.replace('\\', r"\\").replace('"', r#"\""#)
}

/// Builds the Finder AppleScript applying `layout` to the volume.
pub fn layout_script(
    volume_name: &str,
    layout: &DiskLayout,
    background_name: Option<&str>,
) -> String {
    let options = &layout.options;
    let (left, top, right, bottom) = options.window_bounds();

    let background_clause = background_name
        .map(|name| {
            format!(
                r#"set background picture of viewOptions to file ".background:{}""#,
                escape_applescript_string(name)
            )
        })
        .unwrap_or_default();

    let positions = layout
        .icon_locations
        .iter()
        .map(|(name, (x, y))| {
            format!(
                r#"            set position of item "{}" of container window to {{{}, {}}}"#,
                escape_applescript_string(name),
                x,
                y
            )
        })
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        r#"tell application "Finder"
    tell disk "{volume_name}"
        open
        set current view of container window to {view}
        set toolbar visible of container window to false
        set statusbar visible of container window to false
        set bounds of container window to {{{left}, {top}, {right}, {bottom}}}
        set viewOptions to icon view options of container window
        set arrangement of viewOptions to not arranged
        set icon size of viewOptions to {icon_size}
        set text size of viewOptions to {text_size}
        set shows icon preview of viewOptions to {preview}
        {background_clause}
{positions}
        close
        open
        update without registering applications
        delay 2
        close
    end tell
end tell
"#,
        volume_name = escape_applescript_string(volume_name),
        view = options.default_view.applescript_term(),
        icon_size = options.icon_size,
        text_size = options.text_size,
        preview = options.show_icon_preview,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bundler::settings::{LayoutOptions, ViewMode};

    #[test]
    fn escapes_quotes_and_backslashes() {
        assert_eq!(escape_applescript_string("My\"App"), "My\\\"App");
        assert_eq!(escape_applescript_string("Path\\File"), "Path\\\\File");
    }

    #[test]
    fn script_places_every_item() {
        let mut layout = DiskLayout::new(LayoutOptions::default());
        layout.add("/s/product-1.2.3.pkg", (470, 170));
        layout.add("/s/Uninstall Product.app", (630, 170));
        layout.add("/s/Release Notes.url", (470, 303));
        layout.add("/r/COPYRIGHT", (630, 303));

        let script = layout_script("Product 1.2.3", &layout, Some("dmg_background.png"));

        assert!(script.contains(r#"tell disk "Product 1.2.3""#));
        assert!(script.contains("set bounds of container window to {200, 200, 939, 620}"));
        assert!(script.contains("set icon size of viewOptions to 64"));
        assert!(script.contains("set text size of viewOptions to 14"));
        assert!(script.contains("set shows icon preview of viewOptions to true"));
        assert!(script.contains(r#"file ".background:dmg_background.png""#));
        assert!(script.contains(
            r#"set position of item "product-1.2.3.pkg" of container window to {470, 170}"#
        ));
        assert!(script.contains(
            r#"set position of item "Uninstall Product.app" of container window to {630, 170}"#
        ));
        assert!(script.contains(r#"item "Release Notes.url""#));
        assert!(script.contains(r#"item "COPYRIGHT""#));
    }

    #[test]
    fn script_honours_view_mode_and_missing_background() {
        let layout = DiskLayout::new(LayoutOptions {
            default_view: ViewMode::ListView,
            show_icon_preview: false,
            ..Default::default()
        });

        let script = layout_script("Vol", &layout, None);

        assert!(script.contains("set current view of container window to list view"));
        assert!(script.contains("set shows icon preview of viewOptions to false"));
        assert!(!script.contains("background picture"));
    }
}
