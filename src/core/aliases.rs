use super::catalog::CatalogEntry;
use super::models::CatalogConfig;
use super::text_utils::normalize_key;
use std::collections::{HashMap, HashSet};

/*
 * Alias and brand resolution. Expands catalog entries into menu rows (a
 * profile configured with several display names yields several rows, all
 * pointing at the same directory) and groups rows into brand buckets for
 * the two-level menu.
 */

// Display names not covered by any configured brand land here.
pub const FALLBACK_BRAND_NAME: &str = "Other";

// One selectable menu row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MenuItem {
    pub display_name: String,
    pub key: String,
    pub dir_name: String,
}

#[derive(Debug, Clone)]
pub struct BrandBucket {
    pub name: String,
    pub items: Vec<MenuItem>,
}

/*
 * Expands resolvable catalog entries into menu rows, in entry order. A
 * profile with no configured display names is shown under its real name.
 */
pub fn expand_display_names(config: &CatalogConfig, entries: &[CatalogEntry]) -> Vec<MenuItem> {
    let mut items = Vec::new();
    for entry in entries {
        let displays: Vec<String> = match config.find_profile(&entry.key) {
            Some(spec) if !spec.display_names.is_empty() => spec.display_names.clone(),
            _ => vec![entry.dir_name.clone()],
        };
        for display in displays {
            items.push(MenuItem {
                display_name: display,
                key: entry.key.clone(),
                dir_name: entry.dir_name.clone(),
            });
        }
    }
    log::debug!(
        "Aliases: Expanded {} catalog entries into {} menu rows.",
        entries.len(),
        items.len()
    );
    items
}

/*
 * Groups menu rows into brand buckets, iterating configured brands in
 * declared order. A brand keeps only the display names that are both listed
 * under it and currently resolvable; brands left empty are dropped. Rows
 * covered by no brand are appended to the "Other" bucket, skipping display
 * names already present there. A display name listed under two brands shows
 * up under both; that duplication is deliberate and left alone.
 *
 * An empty result means no brand mapping resolved anything and the caller
 * should fall back to a single-level menu.
 */
pub fn group_by_brand(config: &CatalogConfig, items: &[MenuItem]) -> Vec<BrandBucket> {
    let display_map: HashMap<String, &MenuItem> = items
        .iter()
        .map(|item| (normalize_key(&item.display_name), item))
        .collect();

    let mut buckets: Vec<BrandBucket> = Vec::new();
    for brand in &config.brands {
        let mut bucket_items = Vec::new();
        for display in &brand.display_names {
            if let Some(item) = display_map.get(&normalize_key(display)) {
                bucket_items.push((*item).clone());
            }
        }
        if !bucket_items.is_empty() {
            buckets.push(BrandBucket {
                name: brand.name.clone(),
                items: bucket_items,
            });
        }
    }

    let covered: HashSet<String> = config
        .brands
        .iter()
        .flat_map(|brand| brand.display_names.iter())
        .map(|display| normalize_key(display))
        .collect();

    let leftovers: Vec<&MenuItem> = items
        .iter()
        .filter(|item| !covered.contains(&normalize_key(&item.display_name)))
        .collect();

    if !leftovers.is_empty() {
        let fallback_idx = match buckets
            .iter()
            .position(|bucket| bucket.name == FALLBACK_BRAND_NAME)
        {
            Some(idx) => idx,
            None => {
                buckets.push(BrandBucket {
                    name: FALLBACK_BRAND_NAME.to_string(),
                    items: Vec::new(),
                });
                buckets.len() - 1
            }
        };
        for item in leftovers {
            let already_present = buckets[fallback_idx].items.iter().any(|existing| {
                normalize_key(&existing.display_name) == normalize_key(&item.display_name)
            });
            if !already_present {
                buckets[fallback_idx].items.push(item.clone());
            }
        }
    }

    log::debug!(
        "Aliases: Grouped {} menu rows into {} brand buckets.",
        items.len(),
        buckets.len()
    );
    buckets
}
