use super::models::CatalogConfig;
use std::path::{Path, PathBuf};

/*
 * Extra-source resolution. A profile may map to additional asset
 * directories that get merged into the destination after the primary copy,
 * in configured order. Later sources overwrite earlier ones, so the order
 * returned here is a correctness contract, not presentation.
 *
 * Existence is deliberately not checked at resolution time; the deployer
 * skips (with a warning) any resolved path that is not a directory.
 */

// Absolute specs pass through untouched; relative specs are joined onto
// the source root.
pub fn resolve_extra_source(source_root: &Path, spec: &str) -> PathBuf {
    let path = Path::new(spec);
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        source_root.join(path)
    }
}

pub fn resolve_extra_sources(
    config: &CatalogConfig,
    key: &str,
    source_root: &Path,
) -> Vec<PathBuf> {
    let Some(spec) = config.find_profile(key) else {
        log::warn!("Extras: No configured profile for key '{key}'; nothing extra to copy.");
        return Vec::new();
    };
    spec.extra_sources
        .iter()
        .map(|raw| resolve_extra_source(source_root, raw))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::ProfileSpec;

    fn config_with_extras(real: &str, extras: &[&str]) -> CatalogConfig {
        CatalogConfig {
            profiles: vec![ProfileSpec {
                real_name: real.to_string(),
                display_names: Vec::new(),
                extra_sources: extras.iter().map(|s| s.to_string()).collect(),
            }],
            brands: Vec::new(),
            exclude_patterns: Vec::new(),
            clean_extensions: Vec::new(),
            clean_dirs: Vec::new(),
        }
    }

    #[test]
    fn test_relative_specs_join_source_root_in_order() {
        let config = config_with_extras("mymini", &["logo/480P/", "kenrel/common/"]);
        let root = Path::new("/data/consoles");

        let resolved = resolve_extra_sources(&config, "mymini", root);

        assert_eq!(
            resolved,
            vec![
                PathBuf::from("/data/consoles/logo/480P/"),
                PathBuf::from("/data/consoles/kenrel/common/"),
            ]
        );
    }

    #[test]
    fn test_absolute_specs_pass_through() {
        let config = config_with_extras("mymini", &["/opt/assets/overrides"]);
        let root = Path::new("/data/consoles");

        let resolved = resolve_extra_sources(&config, "mymini", root);
        assert_eq!(resolved, vec![PathBuf::from("/opt/assets/overrides")]);
    }

    #[test]
    fn test_lookup_is_normalized_and_unknown_keys_resolve_to_nothing() {
        let config = config_with_extras("mymini", &["logo/480P/"]);
        let root = Path::new("/data/consoles");

        assert_eq!(resolve_extra_sources(&config, " MYMINI ", root).len(), 1);
        assert!(resolve_extra_sources(&config, "unknown", root).is_empty());
    }
}
