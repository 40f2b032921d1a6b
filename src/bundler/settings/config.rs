//! Bundle configuration file.

use super::{LayoutOptions, ProductSettings};
use crate::bundler::error::{Error, Result};
use std::path::Path;

/// Optional TOML file overriding product naming and disk image layout.
///
/// ```toml
/// [product]
/// name = "RethinkDB"
///
/// [dmg]
/// icon_size = 72
/// ```
///
/// Every table and field is optional; omitted values keep their defaults.
#[derive(Debug, Clone, Default, PartialEq, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BundleConfig {
    /// `[product]` table
    pub product: ProductSettings,
    /// `[dmg]` table
    pub dmg: LayoutOptions,
}

impl BundleConfig {
    /// Reads and parses a configuration file.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| {
            Error::Configuration(format!("cannot read config file {}: {}", path.display(), e))
        })?;
        Self::parse(&contents).map_err(|e| match e {
            Error::Configuration(reason) => {
                Error::Configuration(format!("{}: {}", path.display(), reason))
            }
            other => other,
        })
    }

    /// Parses configuration from a TOML string.
    pub fn parse(contents: &str) -> Result<Self> {
        toml::from_str(contents)
            .map_err(|e| Error::Configuration(format!("invalid config file: {}", e)))
    }
}
