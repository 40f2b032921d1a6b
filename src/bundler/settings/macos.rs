//! macOS disk image layout settings.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Icon position on the Finder canvas, in points from the window's top left.
pub type IconPosition = (i32, i32);

/// Finder window rectangle: `((x, y), (width, height))`.
pub type WindowRect = ((i32, i32), (u32, u32));

/// Compressed, read-only image formats accepted by `hdiutil convert`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Deserialize)]
pub enum ImageFormat {
    /// zlib-compressed
    #[serde(rename = "UDZO")]
    Udzo,
    /// bzip2-compressed
    #[default]
    #[serde(rename = "UDBZ")]
    Udbz,
    /// lzfse-compressed
    #[serde(rename = "ULFO")]
    Ulfo,
    /// lzma-compressed
    #[serde(rename = "ULMO")]
    Ulmo,
}

impl ImageFormat {
    /// The `-format` argument understood by `hdiutil`.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Udzo => "UDZO",
            Self::Udbz => "UDBZ",
            Self::Ulfo => "ULFO",
            Self::Ulmo => "ULMO",
        }
    }
}

/// Finder view the disk image window opens in.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ViewMode {
    #[default]
    IconView,
    ListView,
    ColumnView,
}

impl ViewMode {
    /// AppleScript term for the view.
    pub fn applescript_term(self) -> &'static str {
        match self {
            Self::IconView => "icon view",
            Self::ListView => "list view",
            Self::ColumnView => "column view",
        }
    }
}

/// Canvas position for each artifact placed in the image.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct IconPositions {
    /// Distribution package
    pub package: IconPosition,
    /// Compiled uninstaller application
    pub uninstaller: IconPosition,
    /// Release-notes shortcut
    pub release_notes: IconPosition,
    /// License file
    pub license: IconPosition,
}

impl Default for IconPositions {
    fn default() -> Self {
        Self {
            package: (470, 170),
            uninstaller: (630, 170),
            release_notes: (470, 303),
            license: (630, 303),
        }
    }
}

/// macOS DMG visual layout.
///
/// Static defaults match the shipped background artwork; any field can be
/// overridden from the bundle configuration file:
///
/// ```toml
/// [dmg]
/// format = "UDZO"
/// icon_size = 72
/// window_rect = [[100, 100], [640, 480]]
/// background = "art/background.png"
///
/// [dmg.positions]
/// package = [200, 170]
/// ```
///
/// Relative `background` and `badge_icon` paths are resolved against the
/// packaging resources directory.
#[derive(Clone, Debug, PartialEq, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LayoutOptions {
    /// Final compressed format.
    pub format: ImageFormat,

    /// Icon used as the volume icon.
    ///
    /// Default: `Thinker.icns`
    pub badge_icon: Option<PathBuf>,

    /// Window background image.
    ///
    /// Default: `dmg_background.png`
    pub background: Option<PathBuf>,

    /// Icon size in points.
    pub icon_size: u32,

    /// Label text size in points.
    pub text_size: u32,

    /// Icon positions per artifact.
    pub positions: IconPositions,

    /// Window rectangle.
    pub window_rect: WindowRect,

    /// View the window opens in.
    pub default_view: ViewMode,

    /// Show icon previews (thumbnails) instead of generic icons.
    pub show_icon_preview: bool,
}

impl Default for LayoutOptions {
    fn default() -> Self {
        Self {
            format: ImageFormat::default(),
            badge_icon: Some(PathBuf::from("Thinker.icns")),
            background: Some(PathBuf::from("dmg_background.png")),
            icon_size: 64,
            text_size: 14,
            positions: IconPositions::default(),
            window_rect: ((200, 200), (739, 420)),
            default_view: ViewMode::default(),
            show_icon_preview: true,
        }
    }
}

impl LayoutOptions {
    /// Resolves relative decoration paths against `base`.
    pub fn resolve_paths(&mut self, base: &Path) {
        for path in [&mut self.background, &mut self.badge_icon]
            .into_iter()
            .flatten()
        {
            if path.is_relative() {
                *path = base.join(&*path);
            }
        }
    }

    /// Finder window bounds as `{left, top, right, bottom}`.
    pub fn window_bounds(&self) -> (i32, i32, i32, i32) {
        let ((x, y), (width, height)) = self.window_rect;
        (
            x,
            y,
            x.saturating_add_unsigned(width),
            y.saturating_add_unsigned(height),
        )
    }
}

/// Layout for one build: the static options plus the files generated for it.
#[derive(Clone, Debug)]
pub struct DiskLayout {
    /// Visual options.
    pub options: LayoutOptions,
    /// Files and bundles copied to the image root, in insertion order.
    pub files: Vec<PathBuf>,
    /// Icon position per top-level item name.
    pub icon_locations: BTreeMap<String, IconPosition>,
}

impl DiskLayout {
    /// Starts an empty layout.
    pub fn new(options: LayoutOptions) -> Self {
        Self {
            options,
            files: Vec::new(),
            icon_locations: BTreeMap::new(),
        }
    }

    /// Adds a file or bundle to the image root at `position`.
    pub fn add(&mut self, path: impl Into<PathBuf>, position: IconPosition) {
        let path = path.into();
        if let Some(name) = path.file_name() {
            self.icon_locations
                .insert(name.to_string_lossy().into_owned(), position);
        }
        self.files.push(path);
    }
}
