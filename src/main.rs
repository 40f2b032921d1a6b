//! Server DMG Bundler - macOS installer disk image builder.
//!
//! Packages a built server tree into an installer package and wraps it in a
//! laid-out disk image with proper error handling and cleanup.

use std::process;

/// Exit code used when interrupted with Ctrl-C.
const INTERRUPTED: i32 = 130;

#[tokio::main(flavor = "current_thread")]
async fn main() {
    // Initialize logging
    env_logger::init();

    // The pipeline future owns the scratch directory; dropping it on Ctrl-C
    // removes the directory before exiting.
    let exit_code = tokio::select! {
        result = server_dmg_bundler::cli::run() => match result {
            Ok(code) => code,
            Err(e) => {
                eprintln!("Error: {}", e);
                1
            }
        },
        _ = tokio::signal::ctrl_c() => {
            eprintln!("Interrupted");
            INTERRUPTED
        }
    };

    process::exit(exit_code);
}
