use super::models::CatalogConfig;
use super::text_utils::normalize_key;
use glob::Pattern;
use std::fs;
use std::io;
use std::path::Path;

/*
 * The catalog index: turns the source root directory listing into the
 * ordered set of selectable profiles. It defines errors specific to the
 * listing, a trait `CatalogIndexOperations` for abstracting the lookup,
 * and a concrete implementation `CoreCatalogIndex`.
 *
 * Only directories that are both present on disk and configured in the
 * catalog are surfaced; exclusion patterns win over configuration. The
 * result order follows the configured profile order, never the directory
 * enumeration order.
 */

#[derive(Debug)]
pub enum CatalogError {
    Io(io::Error),
}

impl From<io::Error> for CatalogError {
    fn from(err: io::Error) -> Self {
        CatalogError::Io(err)
    }
}

impl std::fmt::Display for CatalogError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CatalogError::Io(e) => write!(f, "Catalog listing I/O error: {e}"),
        }
    }
}

impl std::error::Error for CatalogError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CatalogError::Io(e) => Some(e),
        }
    }
}

pub type Result<T> = std::result::Result<T, CatalogError>;

// A configured key paired with the on-disk directory name it resolved to.
// The two may differ in case and surrounding whitespace.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogEntry {
    pub key: String,
    pub dir_name: String,
}

pub trait CatalogIndexOperations: Send + Sync {
    /*
     * Lists the selectable profiles under `source_root` in configured order.
     * A missing source root is a non-fatal condition reported as an empty
     * list; the caller decides how to tell the user.
     */
    fn list_profiles(
        &self,
        source_root: &Path,
        config: &CatalogConfig,
    ) -> Result<Vec<CatalogEntry>>;
}

pub struct CoreCatalogIndex {}

impl CoreCatalogIndex {
    pub fn new() -> Self {
        CoreCatalogIndex {}
    }
}

impl Default for CoreCatalogIndex {
    fn default() -> Self {
        Self::new()
    }
}

/*
 * Compiles the configured exclusion globs. Invalid patterns are logged and
 * skipped rather than failing the whole listing.
 */
fn compile_exclusions(patterns: &[String]) -> Vec<Pattern> {
    let mut compiled = Vec::with_capacity(patterns.len());
    for raw in patterns {
        match Pattern::new(raw) {
            Ok(pattern) => compiled.push(pattern),
            Err(err) => {
                log::warn!("CatalogIndex: Invalid exclude pattern '{raw}': {err}");
            }
        }
    }
    compiled
}

// Glob matching is case-sensitive over the raw directory name; the first
// matching pattern excludes the entry.
fn is_excluded(name: &str, exclusions: &[Pattern]) -> bool {
    exclusions.iter().any(|pattern| pattern.matches(name))
}

impl CatalogIndexOperations for CoreCatalogIndex {
    fn list_profiles(
        &self,
        source_root: &Path,
        config: &CatalogConfig,
    ) -> Result<Vec<CatalogEntry>> {
        if !source_root.is_dir() {
            log::warn!(
                "CatalogIndex: Source root {source_root:?} does not exist; returning empty catalog."
            );
            return Ok(Vec::new());
        }

        let exclusions = compile_exclusions(&config.exclude_patterns);

        // Candidate directories: name plus its normalized form, excluded
        // entries dropped up front.
        let mut candidates: Vec<(String, String)> = Vec::new();
        for entry_result in fs::read_dir(source_root)? {
            let entry = entry_result?;
            let file_type = entry.file_type()?;
            if !file_type.is_dir() {
                continue;
            }
            let name = entry.file_name().to_string_lossy().into_owned();
            if is_excluded(&name, &exclusions) {
                log::debug!("CatalogIndex: Excluding directory '{name}' by pattern.");
                continue;
            }
            let normalized = normalize_key(&name);
            candidates.push((name, normalized));
        }

        let mut entries = Vec::new();
        for spec in &config.profiles {
            let wanted = normalize_key(&spec.real_name);
            if let Some((dir_name, _)) = candidates
                .iter()
                .find(|(_, normalized)| *normalized == wanted)
            {
                entries.push(CatalogEntry {
                    key: spec.real_name.clone(),
                    dir_name: dir_name.clone(),
                });
            } else {
                log::debug!(
                    "CatalogIndex: Configured profile '{}' has no backing directory under {source_root:?}.",
                    spec.real_name
                );
            }
        }

        log::debug!(
            "CatalogIndex: Resolved {} of {} configured profiles under {source_root:?}.",
            entries.len(),
            config.profiles.len()
        );
        Ok(entries)
    }
}
