//! Product archive assembly with `productbuild`.

use crate::bundler::{
    builder::{ScratchDir, Tool},
    error::{Error, Result, ToolFailure},
    settings::Settings,
};
use std::path::{Path, PathBuf};

/// Combines the component packages into the distributable installer.
///
/// Runs `productbuild --distribution <Distribution.xml> --package-path <dir>
/// --resources <installer_resources> <out.pkg>`, adding `--sign <identity>`
/// when a signing identity is configured. The identity must already have
/// been checked with [`verify_signing_identity`](super::verify_signing_identity).
pub async fn assemble_distribution(
    settings: &Settings,
    scratch: &ScratchDir,
    package_dir: &Path,
    version: &str,
) -> Result<PathBuf> {
    let product = settings.product();
    let resources = settings.resources();
    let distribution_path = scratch.join(product.distribution_package_name(version));

    log::info!("Assembling distribution {}", distribution_path.display());

    let mut command = settings
        .toolchain()
        .command(Tool::Productbuild)
        .arg("--distribution")
        .arg(&resources.distribution)
        .arg("--package-path")
        .arg(package_dir)
        .arg("--resources")
        .arg(&resources.installer_resources);

    if let Some(identity) = settings.signing_identity() {
        log::info!("Signing distribution as \"{}\"", identity);
        command = command.arg("--sign").arg(identity);
    }
    let command = command.arg(&distribution_path);

    command
        .run_logged(
            &scratch.log(&format!("{}_pkg", product.file_stem())),
            settings.tool_timeout(),
        )
        .await?
        .map_err(Error::AssemblyFailed)?;

    if !distribution_path.exists() {
        return Err(Error::AssemblyFailed(ToolFailure {
            command: command.display(),
            reason: format!(
                "reported success but {} is missing",
                distribution_path.display()
            ),
            log: String::new(),
        }));
    }

    log::info!("✓ Distribution package assembled");
    Ok(distribution_path)
}
