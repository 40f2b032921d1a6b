//! Installer signing identity lookup.

use crate::bundler::{
    builder::{ScratchDir, Tool},
    error::{Error, ErrorExt, Result},
    settings::Settings,
};

/// Whether `identity` appears in `security find-identity` output.
///
/// Matches on substrings so both the full certificate name and its hash work.
pub fn identity_listed(listing: &str, identity: &str) -> bool {
    listing.lines().any(|line| line.contains(identity))
}

/// Confirms the keychain holds `identity` before any packaging work starts.
///
/// # Errors
///
/// - [`Error::SigningIdentityNotFound`] if `security find-identity` does not list it
/// - [`Error::ExecutionFailed`] if the lookup itself fails
pub async fn verify_signing_identity(
    settings: &Settings,
    scratch: &ScratchDir,
    identity: &str,
) -> Result<()> {
    log::info!("Looking up signing identity \"{}\"", identity);

    let log_path = scratch.log("find-identity");
    let command = settings
        .toolchain()
        .command(Tool::Security)
        .args(["find-identity", "-p", "macappstore", "-v"]);

    if let Err(failure) = command
        .run_logged(&log_path, settings.tool_timeout())
        .await?
    {
        return Err(Error::ExecutionFailed {
            command: failure.command.clone(),
            reason: failure.to_string(),
        });
    }

    let listing = tokio::fs::read_to_string(&log_path)
        .await
        .fs_context("reading identity listing", &log_path)?;

    if !identity_listed(&listing, identity) {
        return Err(Error::SigningIdentityNotFound {
            identity: identity.to_string(),
        });
    }

    log::info!("✓ Signing identity found");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const LISTING: &str = r#"
  1) 0123456789ABCDEF0123456789ABCDEF01234567 "3rd Party Mac Developer Installer: Example Corp (TEAM123)"
  2) FEDCBA9876543210FEDCBA9876543210FEDCBA98 "Developer ID Installer: Example Corp (TEAM123)"
     2 valid identities found
"#;

    #[test]
    fn matches_full_name_and_hash() {
        assert!(identity_listed(
            LISTING,
            "Developer ID Installer: Example Corp (TEAM123)"
        ));
        assert!(identity_listed(
            LISTING,
            "FEDCBA9876543210FEDCBA9876543210FEDCBA98"
        ));
    }

    #[test]
    fn unknown_identity_is_not_listed() {
        assert!(!identity_listed(LISTING, "Developer ID Installer: Someone Else"));
        assert!(!identity_listed("", "anything"));
    }
}
