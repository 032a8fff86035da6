use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{self, BufReader};
use std::path::Path;

use super::text_utils::normalize_key;

/*
 * Catalog data structures. The catalog describes which console directories
 * are selectable, how they are labelled in the menus, how they are grouped
 * into brands, and which destination artifacts get cleaned before a copy.
 * The whole structure is built once at startup (from the built-in table or
 * an optional `catalog.json` in the source root) and stays immutable for
 * the process lifetime; every engine receives it by reference.
 */

// One configured console. `real_name` is matched against directory names
// under the source root case-insensitively and whitespace-trimmed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProfileSpec {
    pub real_name: String,
    // One entry per menu row; several rows may point at the same directory.
    // An empty list falls back to `real_name` as the label.
    #[serde(default)]
    pub display_names: Vec<String>,
    // Ordered path specs copied after the primary directory. Absolute paths
    // are used as-is, relative paths resolve against the source root.
    #[serde(default)]
    pub extra_sources: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BrandSpec {
    pub name: String,
    pub display_names: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogConfig {
    // Order here is menu order; the filesystem order never leaks through.
    pub profiles: Vec<ProfileSpec>,
    pub brands: Vec<BrandSpec>,
    // Glob patterns; a directory name matching any of them is never surfaced.
    #[serde(default)]
    pub exclude_patterns: Vec<String>,
    // Top-level destination files with these extensions are removed before
    // a copy. Stored with or without the leading dot; compared dotless and
    // case-insensitively.
    #[serde(default)]
    pub clean_extensions: Vec<String>,
    // Top-level destination directories removed before a copy.
    #[serde(default)]
    pub clean_dirs: Vec<String>,
}

#[derive(Debug)]
pub enum CatalogLoadError {
    Io(io::Error),
    Serde(serde_json::Error),
}

impl From<io::Error> for CatalogLoadError {
    fn from(err: io::Error) -> Self {
        CatalogLoadError::Io(err)
    }
}

impl From<serde_json::Error> for CatalogLoadError {
    fn from(err: serde_json::Error) -> Self {
        CatalogLoadError::Serde(err)
    }
}

impl std::fmt::Display for CatalogLoadError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CatalogLoadError::Io(e) => write!(f, "Catalog file I/O error: {e}"),
            CatalogLoadError::Serde(e) => write!(f, "Catalog file parse error: {e}"),
        }
    }
}

impl std::error::Error for CatalogLoadError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CatalogLoadError::Io(e) => Some(e),
            CatalogLoadError::Serde(e) => Some(e),
        }
    }
}

impl CatalogConfig {
    /*
     * Loads a catalog from a JSON file. Used for the optional `catalog.json`
     * override in the source root; callers fall back to `builtin()` when the
     * file is absent.
     */
    pub fn load_from_file(path: &Path) -> Result<Self, CatalogLoadError> {
        log::trace!("CatalogConfig: Loading catalog from {path:?}");
        let file = File::open(path)?;
        let reader = BufReader::new(file);
        let config: CatalogConfig = serde_json::from_reader(reader)?;
        log::debug!(
            "CatalogConfig: Loaded {} profiles and {} brands from {path:?}.",
            config.profiles.len(),
            config.brands.len()
        );
        Ok(config)
    }

    // Lookup by configured key, normalized the same way the catalog index
    // matches directory names.
    pub fn find_profile(&self, key: &str) -> Option<&ProfileSpec> {
        let wanted = normalize_key(key);
        self.profiles
            .iter()
            .find(|spec| normalize_key(&spec.real_name) == wanted)
    }

    /*
     * The shipped catalog of supported consoles. A `catalog.json` placed in
     * the source root replaces this table wholesale.
     */
    pub fn builtin() -> Self {
        fn spec(real: &str, displays: &[&str], extras: &[&str]) -> ProfileSpec {
            ProfileSpec {
                real_name: real.to_string(),
                display_names: displays.iter().map(|s| s.to_string()).collect(),
                extra_sources: extras.iter().map(|s| s.to_string()).collect(),
            }
        }
        fn brand(name: &str, displays: &[&str]) -> BrandSpec {
            BrandSpec {
                name: name.to_string(),
                display_names: displays.iter().map(|s| s.to_string()).collect(),
            }
        }

        CatalogConfig {
            profiles: vec![
                spec("mymini", &["XiFan Mymini"], &["logo/480P/", "kenrel/common/"]),
                spec("r36max", &["XiFan R36Max"], &["logo/720P/", "kenrel/common/"]),
                spec(
                    "r36pro",
                    &["XiFan R36Pro", "K36 Panel 1"],
                    &["logo/480P/", "kenrel/common/"],
                ),
                spec("xf35h", &["XiFan XF35H"], &["logo/480P/", "kenrel/common/"]),
                spec("xf40h", &["XiFan XF40H"], &["logo/720P/", "kenrel/common/"]),
                spec(
                    "r36ultra",
                    &["GameConsole R36Ultra"],
                    &["logo/720P/", "kenrel/common/"],
                ),
                spec(
                    "k36s",
                    &["GameConsole K36S", "GameConsole R36T"],
                    &["logo/480P/", "kenrel/common/"],
                ),
                spec(
                    "hg36",
                    &["GameConsole HG36"],
                    &["logo/480p/", "kenrel/common/"],
                ),
                spec(
                    "rx6h",
                    &["GameConsole RX6H"],
                    &["logo/480p/", "kenrel/common/"],
                ),
                spec(
                    "r46h",
                    &["GameConsole R46H"],
                    &["logo/768p/", "kenrel/common/"],
                ),
                spec(
                    "r36splus",
                    &["GameConsole R36sPlus"],
                    &["logo/720p/", "kenrel/common/"],
                ),
                spec(
                    "origin r36s panel 0",
                    &["GameConsole R36s Panel 0"],
                    &["logo/480P/", "kenrel/common/"],
                ),
                spec(
                    "origin r36s panel 1",
                    &["GameConsole R36s Panel 1"],
                    &["logo/480P/", "kenrel/common/"],
                ),
                spec(
                    "origin r36s panel 2",
                    &["GameConsole R36s Panel 2"],
                    &["logo/480P/", "kenrel/common/"],
                ),
                spec(
                    "origin r36s panel 3",
                    &["GameConsole R36s Panel 3"],
                    &["logo/480P/", "kenrel/common/"],
                ),
                spec(
                    "origin r36s panel 4",
                    &["GameConsole R36s Panel 4"],
                    &["logo/480P/", "kenrel/common/"],
                ),
                spec(
                    "origin r36s panel 5",
                    &["GameConsole R36s Panel 5"],
                    &["logo/480P/", "kenrel/panel5/"],
                ),
                spec("a10mini", &["YMC A10MINI"], &["logo/480P/", "kenrel/common/"]),
                spec(
                    "g80cambv12",
                    &["R36S Clone G80camb v1.2"],
                    &["logo/480P/", "kenrel/common/"],
                ),
                spec(
                    "r36s v20 719m",
                    &["R36S Clone V2.0 719M"],
                    &["logo/480P/", "kenrel/common/"],
                ),
                spec("k36p7", &["K36 Panel 7"], &["logo/480P/", "kenrel/common/"]),
            ],
            brands: vec![
                brand(
                    "XiFan HandHeld",
                    &[
                        "XiFan Mymini",
                        "XiFan R36Max",
                        "XiFan R36Pro",
                        "XiFan XF35H",
                        "XiFan XF40H",
                    ],
                ),
                brand(
                    "GameConsole",
                    &[
                        "GameConsole R36s Panel 0",
                        "GameConsole R36s Panel 1",
                        "GameConsole R36s Panel 2",
                        "GameConsole R36s Panel 3",
                        "GameConsole R36s Panel 4",
                        "GameConsole R36s Panel 5",
                        "GameConsole R36sPlus",
                        "GameConsole R46H",
                    ],
                ),
                brand("YMC", &["YMC A10MINI"]),
                brand(
                    "Clone R36s",
                    &[
                        "R36S Clone G80camb v1.2",
                        "R36S Clone V2.0 719M",
                        "K36 Panel 1",
                        "K36 Panel 7",
                    ],
                ),
                brand(
                    "Other",
                    &[
                        "GameConsole HG36",
                        "GameConsole R36Ultra",
                        "GameConsole RX6H",
                        "GameConsole K36S",
                        "GameConsole R36T",
                    ],
                ),
            ],
            exclude_patterns: vec![
                "files".to_string(),
                "kenrel".to_string(),
                "logo".to_string(),
            ],
            clean_extensions: vec![
                ".dtb".to_string(),
                ".ini".to_string(),
                ".orig".to_string(),
                ".tony".to_string(),
            ],
            clean_dirs: vec!["BMPs".to_string()],
        }
    }
}

// Advisory counters reported after a copy; not used for correctness
// decisions.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CopyStats {
    pub files_copied: u64,
    pub dirs_created: u64,
}

impl CopyStats {
    pub fn absorb(&mut self, other: CopyStats) {
        self.files_copied += other.files_copied;
        self.dirs_created += other.dirs_created;
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CleanStats {
    pub files_removed: u64,
    pub dirs_removed: u64,
}
