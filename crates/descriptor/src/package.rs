//! Fixed file and directory vocabulary of the OLO plugin package
//! (`.olo.zip`).
//!
//! Layout:
//!
//! ```text
//! my-plugin-1.2.0.olo.zip
//! ├── plugin.yaml
//! ├── plugin.wasm
//! ├── icons/
//! │   ├── icon-64.png
//! │   ├── icon-256.png
//! │   └── banner.png
//! ├── README.md
//! ├── LICENSE
//! └── checksums.sha256
//! ```
//!
//! Archive assembly and checksum computation live in the packaging host;
//! this module only names the layout.

/// File extension for OLO plugin archives.
pub const OLO_EXTENSION: &str = "olo";

/// Root descriptor file name.
pub const PLUGIN_YAML: &str = "plugin.yaml";

/// Compiled plugin unit inside the package.
pub const PLUGIN_WASM: &str = "plugin.wasm";

/// Icons directory name.
pub const ICONS_DIR: &str = "icons";

/// Small icon (64x64).
pub const ICON_64: &str = "icons/icon-64.png";

/// Large icon (256x256).
pub const ICON_256: &str = "icons/icon-256.png";

/// Banner image.
pub const BANNER: &str = "icons/banner.png";

/// Small icon SVG (for UI display when PNG not present).
pub const ICON_64_SVG: &str = "icons/icon-64.svg";

/// Large icon SVG.
pub const ICON_256_SVG: &str = "icons/icon-256.svg";

/// Banner SVG.
pub const BANNER_SVG: &str = "icons/banner.svg";

/// Default small icon, bundled for when no unit-specific icon exists.
pub const DEFAULT_ICON_64_SVG: &str = "icons/default-icon-64.svg";

/// Default large icon.
pub const DEFAULT_ICON_256_SVG: &str = "icons/default-icon-256.svg";

/// Default banner.
pub const DEFAULT_BANNER_SVG: &str = "icons/default-banner.svg";

/// Suffix for the unit-based small icon: `<SimpleUnitName>-icon-64.svg`.
pub const SUFFIX_ICON_64: &str = "-icon-64.svg";

/// Suffix for the unit-based large icon.
pub const SUFFIX_ICON_256: &str = "-icon-256.svg";

/// Suffix for the unit-based banner.
pub const SUFFIX_BANNER: &str = "-banner.svg";

/// README in the package.
pub const README: &str = "README.md";

/// License file in the package.
pub const LICENSE: &str = "LICENSE";

/// Checksum file (SHA-256 of all other files).
pub const CHECKSUMS: &str = "checksums.sha256";

/// Icon path for a plugin unit, by convention
/// `icons/<SimpleUnitName><suffix>`.
pub fn icon_path_for_unit(simple_unit_name: &str, suffix: &str) -> String {
    format!("{ICONS_DIR}/{simple_unit_name}{suffix}")
}
