use super::models::CopyStats;
use std::fs::{self, FileTimes};
use std::io;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/*
 * The copy-merge engine. Recursively copies a source tree into a
 * destination tree: missing directories are created, same-named files are
 * overwritten, and unrelated destination content is never touched. Running
 * the same copy twice yields an identical destination (pure overwrite).
 *
 * An I/O error on any individual file aborts the whole copy with a
 * surfaced error; this is a plain bulk operation, not a transactional one.
 */

#[derive(Debug)]
pub enum CopyError {
    Io(io::Error),
    Walk(walkdir::Error),
    SourceNotADirectory(PathBuf),
}

impl From<io::Error> for CopyError {
    fn from(err: io::Error) -> Self {
        CopyError::Io(err)
    }
}

impl From<walkdir::Error> for CopyError {
    fn from(err: walkdir::Error) -> Self {
        CopyError::Walk(err)
    }
}

impl std::fmt::Display for CopyError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CopyError::Io(e) => write!(f, "Copy I/O error: {e}"),
            CopyError::Walk(e) => write!(f, "Source traversal error: {e}"),
            CopyError::SourceNotADirectory(p) => {
                write!(f, "Copy source is not a directory: {p:?}")
            }
        }
    }
}

impl std::error::Error for CopyError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CopyError::Io(e) => Some(e),
            CopyError::Walk(e) => Some(e),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, CopyError>;

// Best-effort shutil.copy2-style timestamp carry-over. Content and
// permissions already landed via fs::copy, so a failure here only warns.
fn preserve_timestamps(source_meta: &fs::Metadata, target: &Path) {
    let mut times = FileTimes::new();
    if let Ok(modified) = source_meta.modified() {
        times = times.set_modified(modified);
    }
    if let Ok(accessed) = source_meta.accessed() {
        times = times.set_accessed(accessed);
    }
    let applied = fs::File::options()
        .write(true)
        .open(target)
        .and_then(|file| file.set_times(times));
    if let Err(e) = applied {
        log::warn!("Copier: Failed to preserve timestamps on {target:?}: {e}");
    }
}

/*
 * Copies everything under `src` into `dst`, mirroring the directory
 * hierarchy. Returns counters for files copied and directories newly
 * created; pre-existing destination directories are not counted.
 */
pub fn copy_tree(src: &Path, dst: &Path) -> Result<CopyStats> {
    if !src.is_dir() {
        return Err(CopyError::SourceNotADirectory(src.to_path_buf()));
    }
    log::debug!("Copier: Copying tree {src:?} -> {dst:?}");

    let mut stats = CopyStats::default();
    for entry_result in WalkDir::new(src).follow_links(false) {
        let entry = entry_result?;
        // WalkDir yields paths under `src`, so the prefix always strips; an
        // empty remainder is the source root itself.
        let relative = match entry.path().strip_prefix(src) {
            Ok(rel) => rel,
            Err(_) => continue,
        };
        let target = if relative.as_os_str().is_empty() {
            dst.to_path_buf()
        } else {
            dst.join(relative)
        };

        if entry.file_type().is_dir() {
            if !target.exists() {
                fs::create_dir_all(&target)?;
                stats.dirs_created += 1;
            }
        } else {
            fs::copy(entry.path(), &target)?;
            if let Ok(meta) = entry.metadata() {
                preserve_timestamps(&meta, &target);
            }
            stats.files_copied += 1;
            log::trace!("Copier: Copied {:?} -> {target:?}", entry.path());
        }
    }

    log::debug!(
        "Copier: Finished {src:?}: {} files, {} new dirs.",
        stats.files_copied,
        stats.dirs_created
    );
    Ok(stats)
}
