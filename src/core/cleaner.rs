use super::models::CleanStats;
use std::collections::HashSet;
use std::fs::{self, OpenOptions};
use std::io;
use std::path::Path;

/*
 * Destination cleanup. Removes stale boot artifacts from the top level of
 * the destination before any copy runs: files by extension and a small set
 * of known leftover directories. Strictly non-recursive; nothing below the
 * first level is inspected.
 *
 * Individual removal failures are logged and skipped so one locked file
 * cannot block the rest of the cleanup.
 */

pub const LANGUAGE_MARKER_FILENAME: &str = ".cn";

fn normalize_extension(raw: &str) -> String {
    raw.trim().trim_start_matches('.').to_lowercase()
}

/*
 * Removes direct children of `dst` that match the cleanup rules:
 * files whose extension (case-insensitive, leading dot optional in the
 * config) is in `extensions`, and directories whose name is in `dirs`.
 * Returns how many of each were removed.
 */
pub fn clean_top_level(dst: &Path, extensions: &[String], dirs: &[String]) -> io::Result<CleanStats> {
    let extension_set: HashSet<String> = extensions
        .iter()
        .map(|ext| normalize_extension(ext))
        .filter(|ext| !ext.is_empty())
        .collect();
    let dir_set: HashSet<&str> = dirs.iter().map(|name| name.as_str()).collect();

    let mut stats = CleanStats::default();
    for entry_result in fs::read_dir(dst)? {
        let entry = entry_result?;
        let path = entry.path();
        let file_type = entry.file_type()?;
        let name = entry.file_name().to_string_lossy().into_owned();

        if file_type.is_dir() {
            if dir_set.contains(name.as_str()) {
                match fs::remove_dir_all(&path) {
                    Ok(()) => {
                        stats.dirs_removed += 1;
                        log::info!("Cleaner: Removed directory {path:?}");
                    }
                    Err(e) => log::warn!("Cleaner: Failed to remove directory {path:?}: {e}"),
                }
            }
            continue;
        }
        if !file_type.is_file() {
            continue;
        }

        let matches = path
            .extension()
            .map(|ext| extension_set.contains(&ext.to_string_lossy().to_lowercase()))
            .unwrap_or(false);
        if matches {
            match fs::remove_file(&path) {
                Ok(()) => {
                    stats.files_removed += 1;
                    log::info!("Cleaner: Removed file {path:?}");
                }
                Err(e) => log::warn!("Cleaner: Failed to remove file {path:?}: {e}"),
            }
        }
    }

    log::debug!(
        "Cleaner: Cleanup of {dst:?} removed {} files and {} directories.",
        stats.files_removed,
        stats.dirs_removed
    );
    Ok(stats)
}

/*
 * Creates the empty language marker in the destination root. Presence of
 * the file is the entire protocol; an existing marker is left untouched.
 */
pub fn write_language_marker(dst: &Path) -> io::Result<()> {
    let marker = dst.join(LANGUAGE_MARKER_FILENAME);
    OpenOptions::new().create(true).append(true).open(&marker)?;
    log::debug!("Cleaner: Language marker ensured at {marker:?}");
    Ok(())
}
