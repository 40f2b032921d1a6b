//! Version probing of the server binary.

use crate::bundler::error::{Error, Result};
use regex::Regex;
use std::path::Path;
use std::sync::LazyLock;
use std::time::Duration;

static STRICT_VERSION_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d+(?:\.\d+)*").expect("version regex is valid"));

/// Extracts the dotted-numeral version from `--version` output.
///
/// The second whitespace-separated token is the raw version; one leading
/// `v` is dropped, then the leading run of dot-separated digit groups is
/// kept (`productbin v1.2.3 (community)` gives `1.2.3`).
pub fn parse_version_output(output: &str) -> Option<String> {
    let token = output.split_whitespace().nth(1)?;
    let token = token
        .strip_prefix('v')
        .or_else(|| token.strip_prefix('V'))
        .unwrap_or(token);
    STRICT_VERSION_RE
        .find(token)
        .map(|m| m.as_str().to_string())
}

/// Runs `<executable> --version` and parses the reported version.
///
/// # Errors
///
/// - [`Error::ExecutionFailed`] if the binary cannot be run, exits
///   unsuccessfully or exceeds `timeout`
/// - [`Error::InvalidVersion`] if the output has no usable version token
pub async fn extract_version(executable: &Path, timeout: Option<Duration>) -> Result<String> {
    let command = format!("{} --version", executable.display());
    log::debug!("Probing version: {}", command);

    let probe = tokio::process::Command::new(executable)
        .arg("--version")
        .kill_on_drop(true)
        .output();

    let output = match timeout {
        Some(limit) => tokio::time::timeout(limit, probe).await.map_err(|_| {
            Error::ExecutionFailed {
                command: command.clone(),
                reason: format!("timed out after {}s", limit.as_secs()),
            }
        })?,
        None => probe.await,
    }
    .map_err(|e| Error::ExecutionFailed {
        command: command.clone(),
        reason: e.to_string(),
    })?;

    if !output.status.success() {
        return Err(Error::ExecutionFailed {
            command,
            reason: format!(
                "{}: {}",
                output.status,
                String::from_utf8_lossy(&output.stderr).trim()
            ),
        });
    }

    let stdout = String::from_utf8_lossy(&output.stdout);
    parse_version_output(&stdout).ok_or_else(|| Error::InvalidVersion {
        executable: executable.to_path_buf(),
        output: stdout.trim().to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn second_token_with_v_prefix() {
        assert_eq!(
            parse_version_output("productbin v1.2.3 (community)").as_deref(),
            Some("1.2.3")
        );
    }

    #[test]
    fn plain_numeric_token() {
        assert_eq!(
            parse_version_output("rethinkdb 2.3.5~0trusty (GCC 4.8.2)\n").as_deref(),
            Some("2.3.5")
        );
    }

    #[test]
    fn suffixes_and_trailing_dots_are_dropped() {
        assert_eq!(
            parse_version_output("x 2.4.0-beta1").as_deref(),
            Some("2.4.0")
        );
        assert_eq!(parse_version_output("x 3.").as_deref(), Some("3"));
    }

    #[test]
    fn missing_second_token_is_rejected() {
        assert_eq!(parse_version_output("productbin"), None);
        assert_eq!(parse_version_output(""), None);
    }

    #[test]
    fn non_numeric_token_is_rejected() {
        assert_eq!(parse_version_output("productbin version 1.2"), None);
        assert_eq!(parse_version_output("productbin v.1"), None);
    }

    #[cfg(unix)]
    mod probe {
        use super::super::*;
        use std::os::unix::fs::PermissionsExt;

        fn script(dir: &Path, body: &str) -> std::path::PathBuf {
            let path = dir.join("productbin");
            std::fs::write(&path, format!("#!/bin/sh\n{body}\n")).unwrap();
            std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();
            path
        }

        #[tokio::test]
        async fn reads_version_from_probe() {
            let dir = tempfile::tempdir().unwrap();
            let exe = script(dir.path(), "echo 'productbin v1.2.3 (community)'");

            assert_eq!(extract_version(&exe, None).await.unwrap(), "1.2.3");
        }

        #[tokio::test]
        async fn garbage_output_names_the_executable() {
            let dir = tempfile::tempdir().unwrap();
            let exe = script(dir.path(), "echo 'hello world'");

            match extract_version(&exe, None).await.unwrap_err() {
                Error::InvalidVersion { executable, .. } => assert_eq!(executable, exe),
                other => panic!("unexpected error: {other}"),
            }
        }

        #[tokio::test]
        async fn failing_probe_is_execution_failure() {
            let dir = tempfile::tempdir().unwrap();
            let exe = script(dir.path(), "exit 2");

            assert!(matches!(
                extract_version(&exe, None).await.unwrap_err(),
                Error::ExecutionFailed { .. }
            ));
        }
    }
}
