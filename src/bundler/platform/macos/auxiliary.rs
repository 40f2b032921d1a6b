//! Uninstaller application and release notes shortcut.

use crate::bundler::{
    builder::{ScratchDir, Tool},
    error::{Error, ErrorExt, Result, ToolFailure},
    settings::{ProductSettings, RELEASE_NOTES_FILE, Settings},
};
use std::path::{Path, PathBuf};

/// Compiles the uninstall AppleScript into an application bundle.
///
/// Output: `<scratch>/Uninstall <Product>.app`, compiler log in
/// `<scratch>/uninstall-compile.log`.
pub async fn compile_uninstaller(settings: &Settings, scratch: &ScratchDir) -> Result<PathBuf> {
    let app_path = scratch.join(settings.product().uninstaller_name());
    let script = &settings.resources().uninstall_script;

    log::info!("Compiling {} from {}", app_path.display(), script.display());

    let command = settings
        .toolchain()
        .command(Tool::Osacompile)
        .arg("-o")
        .arg(&app_path)
        .arg(script);

    command
        .run_logged(&scratch.log("uninstall-compile"), settings.tool_timeout())
        .await?
        .map_err(Error::CompilationFailed)?;

    if !app_path.exists() {
        return Err(Error::CompilationFailed(ToolFailure {
            command: command.display(),
            reason: format!("reported success but {} is missing", app_path.display()),
            log: String::new(),
        }));
    }

    log::info!("✓ Uninstaller compiled");
    Ok(app_path)
}

/// Internet shortcut body pointing at the release notes for `version`.
pub fn release_notes_shortcut(product: &ProductSettings, version: &str) -> String {
    format!(
        "[InternetShortcut]\nURL={}\n",
        product.release_notes_url(version)
    )
}

/// Writes `Release Notes.url` into `dir`.
pub async fn write_release_notes(
    dir: &Path,
    product: &ProductSettings,
    version: &str,
) -> Result<PathBuf> {
    let notes_path = dir.join(RELEASE_NOTES_FILE);
    tokio::fs::write(&notes_path, release_notes_shortcut(product, version))
        .await
        .fs_context("writing release notes shortcut", &notes_path)?;

    log::debug!("Wrote {}", notes_path.display());
    Ok(notes_path)
}
