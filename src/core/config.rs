/*
 * Manages app-level settings that outlive a single run, currently the name
 * of the last profile deployed successfully. The value is a startup hint
 * only; nothing reads it for correctness decisions.
 *
 * Uses a trait (`ConfigManagerOperations`) so the session shell can be
 * tested against a mock backend. The concrete implementation
 * (`CoreConfigManager`) stores a plain text file in the directory provided
 * by `path_utils`.
 */
use crate::core::path_utils;
use std::fs::File;
use std::io::{self, Read, Write};
use std::path::PathBuf;

const LAST_DEPLOYED_FILENAME: &str = "last_deployed_profile.txt";

#[derive(Debug)]
pub enum ConfigError {
    Io(io::Error),
    NoConfigDirectory,
}

impl From<io::Error> for ConfigError {
    fn from(err: io::Error) -> Self {
        ConfigError::Io(err)
    }
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "Configuration I/O error: {e}"),
            ConfigError::NoConfigDirectory => {
                write!(f, "Could not determine configuration directory")
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::Io(e) => Some(e),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, ConfigError>;

pub trait ConfigManagerOperations: Send + Sync {
    fn load_last_deployed_profile(&self, app_name: &str) -> Result<Option<String>>;
    fn save_last_deployed_profile(&self, app_name: &str, display_name: &str) -> Result<()>;
}

pub struct CoreConfigManager {}

impl CoreConfigManager {
    pub fn new() -> Self {
        CoreConfigManager {}
    }

    fn last_deployed_file_path(app_name: &str) -> Result<PathBuf> {
        let config_dir = path_utils::get_base_app_config_local_dir(app_name)
            .ok_or(ConfigError::NoConfigDirectory)?;
        Ok(config_dir.join(LAST_DEPLOYED_FILENAME))
    }
}

impl Default for CoreConfigManager {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigManagerOperations for CoreConfigManager {
    /*
     * Loads the display name of the last deployed profile, if any was
     * recorded. A missing or empty file is reported as `None`, not an error.
     */
    fn load_last_deployed_profile(&self, app_name: &str) -> Result<Option<String>> {
        log::trace!("CoreConfigManager: Loading last deployed profile for app '{app_name}'");
        let file_path = CoreConfigManager::last_deployed_file_path(app_name)?;

        if !file_path.exists() {
            log::debug!("CoreConfigManager: Last deployed file {file_path:?} does not exist.");
            return Ok(None);
        }

        let mut file = File::open(&file_path)?;
        let mut contents = String::new();
        file.read_to_string(&mut contents)?;

        let trimmed = contents.trim();
        if trimmed.is_empty() {
            Ok(None)
        } else {
            log::debug!("CoreConfigManager: Loaded last deployed profile '{trimmed}'.");
            Ok(Some(trimmed.to_string()))
        }
    }

    fn save_last_deployed_profile(&self, app_name: &str, display_name: &str) -> Result<()> {
        log::trace!(
            "CoreConfigManager: Saving last deployed profile '{display_name}' for app '{app_name}'"
        );
        let file_path = CoreConfigManager::last_deployed_file_path(app_name)?;

        let mut file = File::create(&file_path)?;
        file.write_all(display_name.as_bytes())?;
        log::debug!(
            "CoreConfigManager: Saved last deployed profile '{display_name}' to {file_path:?}."
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    // Trait-level tests run against a backend rooted in a temp dir so they
    // never touch the real user config location.
    struct TestConfigManager {
        mock_config_dir: PathBuf,
    }

    impl TestConfigManager {
        fn new(mock_config_dir: PathBuf) -> Self {
            if !mock_config_dir.exists() {
                fs::create_dir_all(&mock_config_dir)
                    .expect("Failed to create mock config dir for test");
            }
            TestConfigManager { mock_config_dir }
        }
    }

    impl ConfigManagerOperations for TestConfigManager {
        fn load_last_deployed_profile(&self, _app_name: &str) -> Result<Option<String>> {
            let file_path = self.mock_config_dir.join(LAST_DEPLOYED_FILENAME);
            if !file_path.exists() {
                return Ok(None);
            }
            let mut contents = String::new();
            File::open(file_path)?.read_to_string(&mut contents)?;
            let trimmed = contents.trim();
            if trimmed.is_empty() {
                Ok(None)
            } else {
                Ok(Some(trimmed.to_string()))
            }
        }

        fn save_last_deployed_profile(&self, _app_name: &str, display_name: &str) -> Result<()> {
            let file_path = self.mock_config_dir.join(LAST_DEPLOYED_FILENAME);
            File::create(file_path)?.write_all(display_name.as_bytes())?;
            Ok(())
        }
    }

    #[test]
    fn test_save_and_load_last_deployed_profile() {
        let dir = tempdir().unwrap();
        let manager = TestConfigManager::new(dir.path().to_path_buf());

        manager
            .save_last_deployed_profile("AnyApp", "XiFan Mymini")
            .unwrap();
        let loaded = manager.load_last_deployed_profile("AnyApp").unwrap();
        assert_eq!(loaded, Some("XiFan Mymini".to_string()));
    }

    #[test]
    fn test_load_none_when_missing_or_empty() {
        let dir = tempdir().unwrap();
        let manager = TestConfigManager::new(dir.path().to_path_buf());

        assert!(manager.load_last_deployed_profile("AnyApp").unwrap().is_none());

        File::create(dir.path().join(LAST_DEPLOYED_FILENAME)).unwrap();
        assert!(manager.load_last_deployed_profile("AnyApp").unwrap().is_none());
    }

    #[test]
    fn test_save_overwrites_previous_value() {
        let dir = tempdir().unwrap();
        let manager = TestConfigManager::new(dir.path().to_path_buf());

        manager
            .save_last_deployed_profile("AnyApp", "GameConsole R46H")
            .unwrap();
        manager
            .save_last_deployed_profile("AnyApp", "YMC A10MINI")
            .unwrap();
        let loaded = manager.load_last_deployed_profile("AnyApp").unwrap();
        assert_eq!(loaded, Some("YMC A10MINI".to_string()));
    }

    #[test]
    fn test_core_config_manager_round_trip() {
        // Uses a unique app name against the real platform config dir, then
        // cleans it up.
        let unique_app_name = format!("TestApp_DtbSelectorConfig_{}", rand::random::<u64>());
        let manager = CoreConfigManager::new();

        manager
            .save_last_deployed_profile(&unique_app_name, "K36 Panel 7")
            .expect("Saving last deployed profile should succeed");
        let loaded = manager
            .load_last_deployed_profile(&unique_app_name)
            .expect("Loading last deployed profile should succeed");
        assert_eq!(loaded, Some("K36 Panel 7".to_string()));

        if let Some(dir) = path_utils::get_base_app_config_local_dir(&unique_app_name) {
            if let Err(e) = fs::remove_dir_all(&dir) {
                eprintln!("Test cleanup failed for {dir:?}: {e}");
            }
        }
    }
}
