//! Product identity and artifact naming.

/// File name of the generated release-notes shortcut.
pub const RELEASE_NOTES_FILE: &str = "Release Notes.url";

/// Product metadata used to name every generated artifact.
///
/// # Configuration
///
/// Add to the bundle configuration file:
///
/// ```toml
/// [product]
/// name = "RethinkDB"
/// identifier = "com.rethinkdb.server"
/// release_notes_url = "https://github.com/rethinkdb/rethinkdb/releases/tag/v{version}"
/// ```
#[derive(Debug, Clone, PartialEq, Eq, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ProductSettings {
    /// Product name displayed to users.
    ///
    /// Used for the volume name, the output file name and the uninstaller.
    pub name: String,

    /// Reverse-DNS identifier of the server component package.
    pub identifier: String,

    /// Release notes URL. `{version}` is replaced with the discovered version.
    pub release_notes_url: String,
}

impl Default for ProductSettings {
    fn default() -> Self {
        Self {
            name: "RethinkDB".into(),
            identifier: "com.rethinkdb.server".into(),
            release_notes_url: "https://github.com/rethinkdb/rethinkdb/releases/tag/v{version}"
                .into(),
        }
    }
}

impl ProductSettings {
    /// Lowercase, whitespace-free stem used for package file names.
    pub fn file_stem(&self) -> String {
        self.name
            .split_whitespace()
            .collect::<Vec<_>>()
            .join("-")
            .to_lowercase()
    }

    /// Volume name of the disk image, e.g. `RethinkDB 2.3.5`.
    pub fn volume_name(&self, version: &str) -> String {
        format!("{} {}", self.name, version)
    }

    /// Default disk image file name, e.g. `RethinkDB 2.3.5.dmg`.
    pub fn dmg_file_name(&self, version: &str) -> String {
        format!("{}.dmg", self.volume_name(version))
    }

    /// Component package file name, e.g. `rethinkdb_server.pkg`.
    pub fn component_package_name(&self) -> String {
        format!("{}_server.pkg", self.file_stem())
    }

    /// Distribution package file name, e.g. `rethinkdb-2.3.5.pkg`.
    pub fn distribution_package_name(&self, version: &str) -> String {
        format!("{}-{}.pkg", self.file_stem(), version)
    }

    /// Compiled uninstaller bundle name, e.g. `Uninstall RethinkDB.app`.
    pub fn uninstaller_name(&self) -> String {
        format!("Uninstall {}.app", self.name)
    }

    /// Release notes URL for a version.
    pub fn release_notes_url(&self, version: &str) -> String {
        self.release_notes_url.replace("{version}", version)
    }
}
