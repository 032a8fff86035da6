use super::aliases::MenuItem;
use super::cleaner;
use super::copier::{self, CopyError};
use super::extras::resolve_extra_source;
use super::models::{CatalogConfig, CleanStats, CopyStats};
use std::io;
use std::path::{Path, PathBuf};

/*
 * Deployment: the "clean, then primary, then extras" transaction. The plan
 * is computed first as plain data so ordering can be tested without any
 * filesystem effects, then executed step by step. The primary step copies
 * first; extras copy afterward in configured order and therefore take
 * overwrite priority over the base profile.
 */

#[derive(Debug)]
pub enum DeployError {
    Clean(io::Error),
    // The selected profile's own directory vanished between listing and
    // deploy. Non-fatal for the session; the selection is abandoned.
    MissingProfileDir(PathBuf),
    Copy { source: PathBuf, error: CopyError },
}

impl std::fmt::Display for DeployError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DeployError::Clean(e) => write!(f, "Destination cleanup failed: {e}"),
            DeployError::MissingProfileDir(p) => {
                write!(f, "Selected profile directory not found: {p:?}")
            }
            DeployError::Copy { source, error } => {
                write!(f, "Copy from {source:?} failed: {error}")
            }
        }
    }
}

impl std::error::Error for DeployError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            DeployError::Clean(e) => Some(e),
            DeployError::Copy { error, .. } => Some(error),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, DeployError>;

// One copy operation of the transaction. `required` distinguishes the
// primary profile directory from skippable extra sources.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CopyStep {
    pub label: String,
    pub source: PathBuf,
    pub required: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeployPlan {
    pub profile_key: String,
    pub display_name: String,
    pub steps: Vec<CopyStep>,
}

#[derive(Debug, Clone, Default)]
pub struct DeployOutcome {
    pub clean: CleanStats,
    pub copy: CopyStats,
    pub skipped_sources: Vec<PathBuf>,
}

/*
 * Builds the ordered copy plan for a selected menu item: the profile
 * directory first, then each configured extra source. Pure path
 * arithmetic; nothing is touched on disk.
 */
pub fn build_deploy_plan(
    config: &CatalogConfig,
    source_root: &Path,
    item: &MenuItem,
) -> DeployPlan {
    let mut steps = vec![CopyStep {
        label: item.dir_name.clone(),
        source: source_root.join(&item.dir_name),
        required: true,
    }];

    if let Some(spec) = config.find_profile(&item.key) {
        for raw in &spec.extra_sources {
            steps.push(CopyStep {
                label: raw.clone(),
                source: resolve_extra_source(source_root, raw),
                required: false,
            });
        }
    }

    DeployPlan {
        profile_key: item.key.clone(),
        display_name: item.display_name.clone(),
        steps,
    }
}

pub trait DeployerOperations: Send + Sync {
    fn deploy(&self, plan: &DeployPlan, destination: &Path) -> Result<DeployOutcome>;
}

pub struct CoreDeployer {
    clean_extensions: Vec<String>,
    clean_dirs: Vec<String>,
}

impl CoreDeployer {
    pub fn new(config: &CatalogConfig) -> Self {
        CoreDeployer {
            clean_extensions: config.clean_extensions.clone(),
            clean_dirs: config.clean_dirs.clone(),
        }
    }
}

impl DeployerOperations for CoreDeployer {
    /*
     * Executes a plan against the destination: cleanup runs to completion
     * first, then every copy step in plan order. A missing required source
     * aborts before anything is copied for it; a missing optional source is
     * skipped with a warning and recorded in the outcome. Copy I/O errors
     * abort the remaining steps — files already copied stay in place.
     */
    fn deploy(&self, plan: &DeployPlan, destination: &Path) -> Result<DeployOutcome> {
        log::info!(
            "Deployer: Deploying '{}' ({} steps) into {destination:?}.",
            plan.display_name,
            plan.steps.len()
        );

        let clean = cleaner::clean_top_level(destination, &self.clean_extensions, &self.clean_dirs)
            .map_err(DeployError::Clean)?;
        let mut outcome = DeployOutcome {
            clean,
            ..DeployOutcome::default()
        };

        for step in &plan.steps {
            if !step.source.is_dir() {
                if step.required {
                    return Err(DeployError::MissingProfileDir(step.source.clone()));
                }
                log::warn!(
                    "Deployer: Extra source not found or not a directory, skipped: {:?}",
                    step.source
                );
                outcome.skipped_sources.push(step.source.clone());
                continue;
            }

            let stats = copier::copy_tree(&step.source, destination).map_err(|error| {
                DeployError::Copy {
                    source: step.source.clone(),
                    error,
                }
            })?;
            log::info!(
                "Deployer: Copied '{}': files={}, new dirs={}.",
                step.label,
                stats.files_copied,
                stats.dirs_created
            );
            outcome.copy.absorb(stats);
        }

        Ok(outcome)
    }
}
