//! Command line interface for the disk image bundler.

mod args;
mod output;

pub use args::Args;
pub use output::OutputManager;

use crate::bundler::Bundler;
use crate::error::Result;

/// Main CLI entry point
pub async fn run() -> Result<i32> {
    let args = Args::parse_args();
    let output = OutputManager::new(args.verbose, args.quiet);

    match execute(&args, &output).await {
        Ok(()) => Ok(0),
        Err(e) => {
            output.error(&e.to_string());
            Ok(1)
        }
    }
}

async fn execute(args: &Args, output: &OutputManager) -> Result<()> {
    let settings = args.to_settings()?;

    output.section(&format!("Building {} disk image", settings.product().name))?;
    output.verbose(&format!(
        "Server root: {}",
        settings.server_root().display()
    ))?;
    output.verbose(&format!("Tools: {}", args.tool_dir.display()))?;
    if let Some(identity) = settings.signing_identity() {
        output.verbose(&format!("Signing as: {}", identity))?;
    }
    output.progress("Packaging...")?;

    let artifact = Bundler::new(settings).bundle().await?;

    output.success(&format!(
        "Created disk image for version {}",
        artifact.version
    ))?;
    output.indent(&format!("Size: {} bytes", artifact.size))?;
    output.indent(&format!("SHA256: {}", artifact.checksum))?;
    output.println(&artifact.path.display().to_string())?;
    Ok(())
}
