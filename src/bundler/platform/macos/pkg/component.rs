//! Component package creation with `pkgbuild`.

use crate::bundler::{
    builder::{ScratchDir, Tool},
    error::{Error, Result, ToolFailure},
    settings::Settings,
    utils::fs,
};
use std::path::PathBuf;

/// Scratch subdirectory holding component packages for `productbuild`.
pub const PACKAGES_DIR: &str = "packages";

/// Builds the server component package from the server root tree.
///
/// # Process
/// 1. Create `<scratch>/packages`
/// 2. Run `pkgbuild --root <root> --identifier <id> --version <version> <pkg>`
/// 3. Verify the package exists
///
/// Tool output goes to `<scratch>/<stem>_server_pkg.log` and is attached to
/// [`Error::PackagingFailed`] on failure.
pub async fn build_component_package(
    settings: &Settings,
    scratch: &ScratchDir,
    version: &str,
) -> Result<PathBuf> {
    let product = settings.product();
    let package_dir = scratch.join(PACKAGES_DIR);
    fs::create_dir_all(&package_dir, false).await?;

    let package_path = package_dir.join(product.component_package_name());
    log::info!(
        "Building component package {} ({} {})",
        package_path.display(),
        product.identifier,
        version
    );

    let command = settings
        .toolchain()
        .command(Tool::Pkgbuild)
        .arg("--root")
        .arg(settings.server_root())
        .arg("--identifier")
        .arg(&product.identifier)
        .arg("--version")
        .arg(version)
        .arg(&package_path);

    command
        .run_logged(
            &scratch.log(&format!("{}_server_pkg", product.file_stem())),
            settings.tool_timeout(),
        )
        .await?
        .map_err(Error::PackagingFailed)?;

    if !package_path.exists() {
        return Err(Error::PackagingFailed(ToolFailure {
            command: command.display(),
            reason: format!("reported success but {} is missing", package_path.display()),
            log: String::new(),
        }));
    }

    log::info!("✓ Component package built");
    Ok(package_path)
}
