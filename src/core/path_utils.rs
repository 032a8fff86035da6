/*
 * Utility functions for application directories. Centralizes the lookup of
 * the platform-specific config location so the rest of the core never talks
 * to `directories` directly.
 */
use directories::ProjectDirs;
use std::fs;
use std::path::PathBuf;

/*
 * Returns the application's local (non-roaming) configuration directory,
 * creating it if necessary. Derived without an organization qualifier, so
 * the path sits directly under the user's local application data structure.
 * Returns `None` when the platform directory cannot be determined or the
 * directory cannot be created.
 */
pub fn get_base_app_config_local_dir(app_name: &str) -> Option<PathBuf> {
    log::trace!("PathUtils: Resolving base app config local dir for '{app_name}'");
    let proj_dirs = ProjectDirs::from("", "", app_name)?;
    let config_path = proj_dirs.config_local_dir();
    if !config_path.exists() {
        if let Err(e) = fs::create_dir_all(config_path) {
            log::error!("PathUtils: Failed to create base app config directory {config_path:?}: {e}");
            return None;
        }
        log::debug!("PathUtils: Created base app config directory: {config_path:?}");
    }
    Some(config_path.to_path_buf())
}
