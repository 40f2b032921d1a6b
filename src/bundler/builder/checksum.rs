//! Artifact checksum calculation.

use crate::{
    bail,
    bundler::{Result, error::ErrorExt},
};
use sha2::{Digest, Sha256};
use std::path::Path;
use tokio::io::AsyncReadExt;

/// Calculates the SHA256 checksum of a file.
///
/// Reads in 8KB chunks and returns the hex-encoded digest (64 characters).
pub async fn calculate_sha256(path: &Path) -> Result<String> {
    let metadata = tokio::fs::metadata(path)
        .await
        .fs_context("reading artifact metadata", path)?;
    if !metadata.is_file() {
        bail!("Artifact is not a file: {}", path.display());
    }

    let mut file = tokio::fs::File::open(path)
        .await
        .fs_context("opening file for hashing", path)?;
    let mut hasher = Sha256::new();
    let mut buffer = vec![0u8; 8192];

    loop {
        let n = file
            .read(&mut buffer)
            .await
            .fs_context("reading file for hash calculation", path)?;
        if n == 0 {
            break;
        }
        hasher.update(&buffer[..n]);
    }

    Ok(format!("{:x}", hasher.finalize()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn hashes_file_contents() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("image.dmg");
        std::fs::write(&path, "abc").unwrap();

        assert_eq!(
            calculate_sha256(&path).await.unwrap(),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }

    #[tokio::test]
    async fn rejects_directories() {
        let dir = tempfile::tempdir().unwrap();
        assert!(calculate_sha256(dir.path()).await.is_err());
    }
}
