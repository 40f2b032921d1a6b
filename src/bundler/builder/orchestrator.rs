//! Main bundler orchestration and coordination.
//!
//! This module provides the [`Bundler`] orchestrator that runs the packaging
//! steps strictly in sequence and stops at the first failure.

use crate::bundler::{
    Result, Settings,
    discovery::{extract_version, find_executable},
    error::ErrorExt,
    platform::macos::{
        auxiliary::{compile_uninstaller, write_release_notes},
        dmg::build_disk_image,
        pkg::{
            PACKAGES_DIR, assemble_distribution, build_component_package, verify_signing_identity,
        },
    },
    settings::DiskLayout,
};
use std::path::PathBuf;

use super::{checksum::calculate_sha256, scratch::ScratchDir};

/// The finished disk image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BundledArtifact {
    /// Location of the image
    pub path: PathBuf,
    /// Version reported by the server executable
    pub version: String,
    /// Size in bytes
    pub size: u64,
    /// Hex-encoded SHA256 of the image
    pub checksum: String,
}

/// Main bundler orchestrator.
///
/// # Examples
///
/// ```no_run
/// use server_dmg_bundler::bundler::{Bundler, SettingsBuilder};
///
/// # async fn example() -> server_dmg_bundler::bundler::Result<()> {
/// let settings = SettingsBuilder::new()
///     .server_root("build/release/root")
///     .build()?;
///
/// let artifact = Bundler::new(settings).bundle().await?;
/// println!("Created {} ({} bytes)", artifact.path.display(), artifact.size);
/// println!("SHA256: {}", artifact.checksum);
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct Bundler {
    settings: Settings,
}

impl Bundler {
    /// Creates a new bundler with validated settings.
    pub fn new(settings: Settings) -> Self {
        Self { settings }
    }

    /// Runs the whole pipeline and returns the disk image.
    ///
    /// # Process
    /// 1. Create the scratch directory
    /// 2. Locate the server executable and read its version
    /// 3. Resolve the output path
    /// 4. Check the signing identity, when one is configured
    /// 5. Build the component package and the distribution
    /// 6. Compile the uninstaller and write the release notes shortcut
    /// 7. Lay out and build the disk image
    ///
    /// The scratch directory is removed when this future completes, fails
    /// or is dropped.
    pub async fn bundle(&self) -> Result<BundledArtifact> {
        let settings = &self.settings;
        let product = settings.product();
        let scratch = ScratchDir::create(settings.scratch_parent())?;

        let executable = find_executable(settings.server_root(), settings.binary_name())?;
        log::info!("Found server executable: {}", executable.display());

        let version = extract_version(&executable, settings.tool_timeout()).await?;
        log::info!("Packaging {} version {}", product.name, version);

        let output = settings.output().resolve(product, &version);
        log::info!("Output: {}", output.display());

        if let Some(identity) = settings.signing_identity() {
            verify_signing_identity(settings, &scratch, identity).await?;
        }

        build_component_package(settings, &scratch, &version).await?;
        let distribution =
            assemble_distribution(settings, &scratch, &scratch.join(PACKAGES_DIR), &version)
                .await?;

        let uninstaller = compile_uninstaller(settings, &scratch).await?;
        let release_notes = write_release_notes(scratch.path(), product, &version).await?;

        let mut layout = DiskLayout::new(settings.layout().clone());
        let positions = layout.options.positions;
        layout.add(&settings.resources().license, positions.license);
        layout.add(distribution, positions.package);
        layout.add(uninstaller, positions.uninstaller);
        layout.add(release_notes, positions.release_notes);

        let image = build_disk_image(
            settings,
            &scratch,
            &layout,
            &product.volume_name(&version),
            &output,
        )
        .await?;

        let size = tokio::fs::metadata(&image)
            .await
            .fs_context("reading artifact metadata", &image)?
            .len();
        let checksum = calculate_sha256(&image).await?;

        Ok(BundledArtifact {
            path: image,
            version,
            size,
            checksum,
        })
    }
}
