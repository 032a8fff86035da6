use super::session::*;

use crate::core::{
    BrandSpec, CatalogConfig, CleanStats, CopyStats, DeployError, DeployOutcome, DeployPlan,
    DeployerOperations, ProfileSpec, expand_display_names,
};
use crate::core::catalog::CatalogEntry;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

/*
 * Unit tests for `SelectorSession`. A mock `DeployerOperations` records
 * every plan it receives so the tests can assert on step ordering and the
 * destination without touching the filesystem.
 */

struct MockDeployer {
    deploy_calls: Mutex<Vec<(DeployPlan, PathBuf)>>,
    next_error: Mutex<Option<DeployError>>,
}

impl MockDeployer {
    fn new() -> Self {
        MockDeployer {
            deploy_calls: Mutex::new(Vec::new()),
            next_error: Mutex::new(None),
        }
    }

    fn set_next_error(&self, error: DeployError) {
        *self.next_error.lock().unwrap() = Some(error);
    }

    fn deploy_calls(&self) -> Vec<(DeployPlan, PathBuf)> {
        self.deploy_calls.lock().unwrap().clone()
    }
}

impl DeployerOperations for MockDeployer {
    fn deploy(
        &self,
        plan: &DeployPlan,
        destination: &Path,
    ) -> Result<DeployOutcome, DeployError> {
        self.deploy_calls
            .lock()
            .unwrap()
            .push((plan.clone(), destination.to_path_buf()));
        if let Some(error) = self.next_error.lock().unwrap().take() {
            return Err(error);
        }
        Ok(DeployOutcome {
            clean: CleanStats {
                files_removed: 2,
                dirs_removed: 0,
            },
            copy: CopyStats {
                files_copied: 5,
                dirs_created: 1,
            },
            skipped_sources: Vec::new(),
        })
    }
}

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

fn test_config() -> CatalogConfig {
    CatalogConfig {
        profiles: vec![
            spec(
                "mymini",
                &["XiFan Mymini"],
                &["logo/480P/", "kenrel/common/"],
            ),
            spec("r36pro", &["XiFan R36Pro", "K36 Panel 1"], &["logo/480P/"]),
            spec("rx6h", &["GameConsole RX6H"], &[]),
        ],
        brands: vec![
            brand("XiFan HandHeld", &["XiFan Mymini", "XiFan R36Pro"]),
            brand("Clone R36s", &["K36 Panel 1"]),
        ],
        exclude_patterns: Vec::new(),
        clean_extensions: vec![".dtb".to_string()],
        clean_dirs: Vec::new(),
    }
}

fn entries_for(config: &CatalogConfig) -> Vec<CatalogEntry> {
    config
        .profiles
        .iter()
        .map(|p| CatalogEntry {
            key: p.real_name.clone(),
            dir_name: p.real_name.clone(),
        })
        .collect()
}

fn new_session(config: CatalogConfig, deployer: Arc<MockDeployer>) -> SelectorSession {
    let config = Arc::new(config);
    let entries = entries_for(&config);
    let items = expand_display_names(&config, &entries);
    SelectorSession::new(
        config,
        items,
        PathBuf::from("/src/consoles"),
        PathBuf::from("/dest"),
        deployer,
    )
}

#[test]
fn test_session_starts_in_brand_menu_with_buckets() {
    let session = new_session(test_config(), Arc::new(MockDeployer::new()));

    assert_eq!(*session.state(), SessionState::BrandMenu);
    let menu = session.current_menu();
    assert_eq!(menu.heading, "Select a brand");
    // "GameConsole RX6H" is unbranded and lands in the fallback bucket.
    assert_eq!(
        menu.rows,
        vec![
            "XiFan HandHeld (2 models)".to_string(),
            "Clone R36s (1 model)".to_string(),
            "Other (1 model)".to_string(),
        ]
    );
}

#[test]
fn test_brand_selection_scopes_model_menu() {
    let mut session = new_session(test_config(), Arc::new(MockDeployer::new()));

    let reply = session.handle_input("1");
    assert!(matches!(reply, SessionReply::Redraw));
    assert_eq!(
        *session.state(),
        SessionState::ModelMenu { brand: Some(0) }
    );

    let menu = session.current_menu();
    assert_eq!(menu.heading, "Available consoles for: XiFan HandHeld");
    assert_eq!(
        menu.rows,
        vec!["XiFan Mymini".to_string(), "XiFan R36Pro".to_string()]
    );
}

#[test]
fn test_alias_row_is_selectable_under_its_own_brand() {
    // "K36 Panel 1" is the second display name of r36pro; it must appear as
    // its own row under "Clone R36s" and deploy the r36pro directory.
    let deployer = Arc::new(MockDeployer::new());
    let mut session = new_session(test_config(), Arc::clone(&deployer));

    session.handle_input("2");
    let menu = session.current_menu();
    assert_eq!(menu.rows, vec!["K36 Panel 1".to_string()]);

    let reply = session.handle_input("1");
    match reply {
        SessionReply::Deployed { display_name, .. } => {
            assert_eq!(display_name, "K36 Panel 1");
        }
        other => panic!("Expected Deployed, got {other:?}"),
    }

    let calls = deployer.deploy_calls();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].0.profile_key, "r36pro");
    assert_eq!(
        calls[0].0.steps[0].source,
        PathBuf::from("/src/consoles/r36pro")
    );
}

#[test]
fn test_back_edge_returns_to_brand_menu() {
    let mut session = new_session(test_config(), Arc::new(MockDeployer::new()));

    session.handle_input("1");
    let reply = session.handle_input("0");
    assert!(matches!(reply, SessionReply::Redraw));
    assert_eq!(*session.state(), SessionState::BrandMenu);
}

#[test]
fn test_exit_from_either_menu() {
    let mut session = new_session(test_config(), Arc::new(MockDeployer::new()));
    assert!(matches!(session.handle_input("0"), SessionReply::Exit));
    assert_eq!(*session.state(), SessionState::Done);

    let mut session = new_session(test_config(), Arc::new(MockDeployer::new()));
    session.handle_input("1");
    assert!(matches!(session.handle_input("q"), SessionReply::Exit));
    assert_eq!(*session.state(), SessionState::Done);
}

#[test]
fn test_invalid_input_never_changes_state() {
    let mut session = new_session(test_config(), Arc::new(MockDeployer::new()));

    for bad in ["abc", "", "99", "-1", "1.5"] {
        let reply = session.handle_input(bad);
        assert!(
            matches!(reply, SessionReply::Invalid(_)),
            "input {bad:?} should be rejected"
        );
        assert_eq!(*session.state(), SessionState::BrandMenu);
    }

    session.handle_input("1");
    let reply = session.handle_input("7");
    assert!(matches!(reply, SessionReply::Invalid(_)));
    assert_eq!(
        *session.state(),
        SessionState::ModelMenu { brand: Some(0) }
    );
}

#[test]
fn test_model_selection_deploys_plan_in_order_and_finishes() {
    let deployer = Arc::new(MockDeployer::new());
    let mut session = new_session(test_config(), Arc::clone(&deployer));

    session.handle_input("1");
    let reply = session.handle_input("1");

    match reply {
        SessionReply::Deployed {
            display_name,
            outcome,
        } => {
            assert_eq!(display_name, "XiFan Mymini");
            assert_eq!(outcome.copy.files_copied, 5);
        }
        other => panic!("Expected Deployed, got {other:?}"),
    }
    assert_eq!(*session.state(), SessionState::Done);

    let calls = deployer.deploy_calls();
    assert_eq!(calls.len(), 1);
    let (plan, destination) = &calls[0];
    assert_eq!(destination, &PathBuf::from("/dest"));
    let sources: Vec<&Path> = plan.steps.iter().map(|s| s.source.as_path()).collect();
    assert_eq!(
        sources,
        vec![
            Path::new("/src/consoles/mymini"),
            Path::new("/src/consoles/logo/480P/"),
            Path::new("/src/consoles/kenrel/common/"),
        ]
    );
}

#[test]
fn test_missing_profile_dir_keeps_session_alive() {
    let deployer = Arc::new(MockDeployer::new());
    deployer.set_next_error(DeployError::MissingProfileDir(PathBuf::from(
        "/src/consoles/mymini",
    )));
    let mut session = new_session(test_config(), Arc::clone(&deployer));

    session.handle_input("1");
    let reply = session.handle_input("1");

    assert!(matches!(reply, SessionReply::SelectionUnavailable(_)));
    assert_eq!(
        *session.state(),
        SessionState::ModelMenu { brand: Some(0) }
    );
}

#[test]
fn test_copy_failure_ends_session() {
    let deployer = Arc::new(MockDeployer::new());
    deployer.set_next_error(DeployError::Clean(std::io::Error::new(
        std::io::ErrorKind::PermissionDenied,
        "mocked io error",
    )));
    let mut session = new_session(test_config(), Arc::clone(&deployer));

    session.handle_input("1");
    let reply = session.handle_input("1");

    assert!(matches!(reply, SessionReply::DeployFailed { .. }));
    assert_eq!(*session.state(), SessionState::Done);
}

#[test]
fn test_single_level_fallback_when_no_buckets_resolve() {
    // No items at all means no buckets; the session opens directly on the
    // (empty) single-level menu rather than a brand menu.
    let config = Arc::new(test_config());
    let session = SelectorSession::new(
        Arc::clone(&config),
        Vec::new(),
        PathBuf::from("/src/consoles"),
        PathBuf::from("/dest"),
        Arc::new(MockDeployer::new()),
    );

    assert_eq!(*session.state(), SessionState::ModelMenu { brand: None });
    let menu = session.current_menu();
    assert_eq!(menu.heading, "Available consoles");
    assert!(menu.rows.is_empty());
}

#[test]
fn test_fallback_menu_back_redraws_in_place() {
    let mut session = SelectorSession::new(
        Arc::new(test_config()),
        Vec::new(),
        PathBuf::from("/src/consoles"),
        PathBuf::from("/dest"),
        Arc::new(MockDeployer::new()),
    );

    assert_eq!(*session.state(), SessionState::ModelMenu { brand: None });
    assert!(matches!(session.handle_input("0"), SessionReply::Redraw));
    assert_eq!(*session.state(), SessionState::ModelMenu { brand: None });
    assert!(matches!(session.handle_input("q"), SessionReply::Exit));
    assert_eq!(*session.state(), SessionState::Done);
}
