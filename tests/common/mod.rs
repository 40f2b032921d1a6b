//! Common test utilities: a fake macOS toolchain and packaging inputs.
//!
//! Every fake tool appends its command line to a trace file. Setting
//! `FAKE_FAIL_TOOL=<name>` makes that tool print a diagnostic and exit 1;
//! `FAKE_SLOW_TOOL=<name>` makes it sleep first.

#![allow(dead_code)]

use assert_cmd::Command;
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Product name configured for every test run
pub const PRODUCT: &str = "Product";

/// Identity listed by the fake `security` tool
pub const KNOWN_IDENTITY: &str = "Developer ID Installer: Example Corp (TEAM123)";

/// Fake tool bodies, run after the shared trace/failure prologue.
///
/// The prologue records each call as a single trace line, folding
/// multi-line arguments such as AppleScript sources.
const TOOLS: &[(&str, &str)] = &[
    (
        "pkgbuild",
        r#"for last in "$@"; do :; done
echo "component package" > "$last"
"#,
    ),
    (
        "productbuild",
        r#"for last in "$@"; do :; done
echo "distribution package" > "$last"
"#,
    ),
    (
        "security",
        r#"echo "  1) 0123456789ABCDEF \"Developer ID Installer: Example Corp (TEAM123)\""
echo "     1 valid identities found"
"#,
    ),
    (
        "osacompile",
        r#"mkdir -p "$2/Contents"
"#,
    ),
    ("osascript", ""),
    ("xattr", ""),
    (
        "hdiutil",
        r#"verb="$1"
shift
image="$1"
src=""
mnt=""
for last in "$@"; do :; done
while [ $# -gt 0 ]; do
    case "$1" in
        -srcfolder) src="$2" ;;
        -mountpoint) mnt="$2" ;;
    esac
    shift
done
case "$verb" in
    create) ls "$src" > "$last" ;;
    attach) mkdir -p "$mnt" && touch "$mnt/.DS_Store" ;;
    detach) ;;
    convert) cp "$image" "$last" ;;
esac
"#,
    ),
];

/// Temporary packaging environment with a fake toolchain.
pub struct Fixture {
    _temp: TempDir,
    pub path: PathBuf,
    pub root: PathBuf,
    pub resources: PathBuf,
    pub license: PathBuf,
    pub config: PathBuf,
    pub tools: PathBuf,
    pub scratch: PathBuf,
    pub trace: PathBuf,
}

impl Fixture {
    /// Creates inputs for a server reporting `productbin v1.2.3 (community)`.
    pub fn new() -> Self {
        Self::with_version_output("productbin v1.2.3 (community)")
    }

    /// Creates inputs for a server whose `--version` prints `output`.
    pub fn with_version_output(output: &str) -> Self {
        let temp = TempDir::new().expect("Failed to create temp directory");
        let path = temp.path().to_path_buf();

        let root = path.join("root");
        let resources = path.join("resources");
        let tools = path.join("tools");
        let scratch = path.join("scratch");
        for dir in [&root, &tools, &scratch] {
            std::fs::create_dir_all(dir).expect("Failed to create directory");
        }
        std::fs::create_dir_all(resources.join("installer_resources"))
            .expect("Failed to create resources");
        for name in [
            "Distribution.xml",
            "uninstall.scpt",
            "dmg_background.png",
            "Thinker.icns",
        ] {
            std::fs::write(resources.join(name), name).expect("Failed to write resource");
        }

        let license = path.join("COPYRIGHT");
        std::fs::write(&license, "Copyright").expect("Failed to write license");

        let config = path.join("bundle.toml");
        std::fs::write(
            &config,
            format!("[product]\nname = \"{PRODUCT}\"\nidentifier = \"com.example.product\"\n"),
        )
        .expect("Failed to write config");

        let trace = path.join("trace.log");
        for (name, body) in TOOLS {
            install_script(
                &tools.join(name),
                &format!(
                    r#"printf '%s\n' "{name} $(printf '%s' "$*" | tr '\n' ' ')" >> "{trace}"
if [ "$FAKE_SLOW_TOOL" = "{name}" ]; then sleep 5; fi
if [ "$FAKE_FAIL_TOOL" = "{name}" ]; then
    echo "{name}: simulated failure" >&2
    exit 1
fi
{body}"#,
                    trace = trace.display(),
                ),
            );
        }

        install_script(
            &root.join("bin").join("productbin"),
            &format!("echo \"{output}\"\n"),
        );

        Self {
            _temp: temp,
            path,
            root,
            resources,
            license,
            config,
            tools,
            scratch,
            trace,
        }
    }

    /// Bundler command wired to this fixture.
    pub fn command(&self) -> Command {
        let mut cmd = bundler_cmd();
        cmd.env_remove("DMG_BUNDLER_RESOURCES")
            .env_remove("DMG_BUNDLER_TOOL_DIR")
            .env_remove("FAKE_FAIL_TOOL")
            .env_remove("FAKE_SLOW_TOOL")
            .arg("--server-root")
            .arg(&self.root)
            .args(["--binary-name", "productbin"])
            .arg("--resources-dir")
            .arg(&self.resources)
            .arg("--license")
            .arg(&self.license)
            .arg("--config")
            .arg(&self.config)
            .arg("--tool-dir")
            .arg(&self.tools)
            .arg("--scratch-folder")
            .arg(&self.scratch);
        cmd
    }

    /// Command lines recorded by the fake tools, in call order.
    pub fn trace(&self) -> Vec<String> {
        std::fs::read_to_string(&self.trace)
            .unwrap_or_default()
            .lines()
            .map(str::to_string)
            .collect()
    }

    /// Whether any fake tool named `tool` was called.
    pub fn called(&self, tool: &str) -> bool {
        self.trace()
            .iter()
            .any(|line| line.split_whitespace().next() == Some(tool))
    }

    /// Whether the scratch folder holds nothing.
    pub fn scratch_is_empty(&self) -> bool {
        std::fs::read_dir(&self.scratch)
            .expect("Failed to read scratch folder")
            .next()
            .is_none()
    }
}

/// Entries the fake `hdiutil` recorded for an image, sorted.
pub fn image_entries(image: &Path) -> Vec<String> {
    let mut entries: Vec<String> = std::fs::read_to_string(image)
        .expect("Failed to read image")
        .lines()
        .map(str::to_string)
        .collect();
    entries.sort();
    entries
}

// Temporary fix for deprecated cargo_bin - will be updated when build-dir issues are resolved
#[allow(deprecated)]
pub fn bundler_cmd() -> Command {
    Command::cargo_bin("server_dmg_bundler").expect("Failed to find binary")
}

fn install_script(path: &Path, body: &str) {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).expect("Failed to create parent directory");
    }
    std::fs::write(path, format!("#!/bin/sh\n{body}")).expect("Failed to write script");
    std::fs::set_permissions(path, std::fs::Permissions::from_mode(0o755))
        .expect("Failed to make script executable");
}
