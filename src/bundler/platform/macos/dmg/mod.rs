//! macOS DMG disk image creator.
//!
//! Builds the distributed image with the native `hdiutil` tool.
//!
//! # Architecture
//!
//! - `creation` - staging and the read-write image
//! - `customization` - Finder window layout on the mounted image
//! - `conversion` - conversion to the compressed read-only format

mod conversion;
mod creation;
mod customization;

use crate::bundler::{
    builder::ScratchDir,
    error::Result,
    settings::{DiskLayout, Settings},
};
use std::path::{Path, PathBuf};

pub use conversion::convert_to_compressed;
pub use creation::{BACKGROUND_DIR, VOLUME_ICON, create_rw_image, stage_contents};
pub use customization::{apply_layout, layout_script};

/// Builds the disk image at `output` from `layout`.
///
/// # Process
/// 1. Stage the layout files, background and volume icon in scratch
/// 2. Create a UDRW image from the staging directory
/// 3. Mount it and apply the Finder layout
/// 4. Convert it to the configured compressed format at `output`
///
/// Every intermediate artifact lives in `scratch`.
pub async fn build_disk_image(
    settings: &Settings,
    scratch: &ScratchDir,
    layout: &DiskLayout,
    volume_name: &str,
    output: &Path,
) -> Result<PathBuf> {
    log::info!("Creating disk image \"{}\"", volume_name);

    let staging = scratch.join("staging");
    let background_name = stage_contents(layout, &staging).await?;

    let rw_image = create_rw_image(settings, scratch, &staging, volume_name).await?;

    apply_layout(
        settings,
        scratch,
        &rw_image,
        volume_name,
        layout,
        background_name.as_deref(),
    )
    .await?;

    convert_to_compressed(settings, scratch, &rw_image, output, layout.options.format).await
}
