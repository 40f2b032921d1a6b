//! DMG format conversion.
//!
//! Customization requires a read-write image; the distributed image is a
//! compressed read-only one, so the UDRW image is converted once detached.

use crate::bundler::{
    builder::{ScratchDir, Tool},
    error::{Error, Result, ToolFailure},
    settings::{ImageFormat, Settings},
};
use std::path::{Path, PathBuf};

/// Converts the detached read-write image into `output`.
///
/// An existing file at `output` is overwritten.
pub async fn convert_to_compressed(
    settings: &Settings,
    scratch: &ScratchDir,
    rw_image: &Path,
    output: &Path,
    format: ImageFormat,
) -> Result<PathBuf> {
    log::info!("Converting image to {} at {}", format.as_str(), output.display());

    let command = settings
        .toolchain()
        .command(Tool::Hdiutil)
        .arg("convert")
        .arg(rw_image)
        .args(["-format", format.as_str(), "-ov", "-o"])
        .arg(output);

    command
        .run_logged(&scratch.log("dmg-convert"), settings.tool_timeout())
        .await?
        .map_err(Error::ImageBuildFailed)?;

    if !output.is_file() {
        return Err(Error::ImageBuildFailed(ToolFailure {
            command: command.display(),
            reason: format!("reported success but {} is missing", output.display()),
            log: String::new(),
        }));
    }

    log::info!("✓ Disk image written: {}", output.display());
    Ok(output.to_path_buf())
}
