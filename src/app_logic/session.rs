use crate::core::{
    BrandBucket, CatalogConfig, DeployError, DeployOutcome, DeployerOperations, MenuItem,
    build_deploy_plan, group_by_brand,
};
use std::path::PathBuf;
use std::sync::Arc;

/*
 * The selection session: a small state machine over BrandMenu → ModelMenu →
 * Done, with a back-edge from the model menu and an exit edge from both
 * menus. The session renders menus as data (`MenuView`) and consumes one
 * input line at a time, so the whole flow is testable without a terminal.
 * Deployment goes through the injected `DeployerOperations`, mirroring how
 * the rest of the core is wired together.
 *
 * When no brand bucket resolves any profile the session degrades to a
 * single-level menu over all rows; "back" then simply redraws it.
 */

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionState {
    BrandMenu,
    // `brand` indexes into the bucket list; `None` is the single-level
    // fallback over all rows.
    ModelMenu { brand: Option<usize> },
    Done,
}

// A menu ready for printing: numbered rows plus the prompt line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MenuView {
    pub heading: String,
    pub rows: Vec<String>,
    pub prompt: String,
}

#[derive(Debug)]
pub enum SessionReply {
    // State may have changed; show the current menu again.
    Redraw,
    // Bad input; show the message and re-prompt.
    Invalid(String),
    // The selected profile directory disappeared; report and stay in the menu.
    SelectionUnavailable(String),
    Deployed {
        display_name: String,
        outcome: DeployOutcome,
    },
    // Unrecoverable copy failure; the session is over.
    DeployFailed {
        display_name: String,
        message: String,
    },
    Exit,
}

pub struct SelectorSession {
    config: Arc<CatalogConfig>,
    buckets: Vec<BrandBucket>,
    all_items: Vec<MenuItem>,
    source_root: PathBuf,
    destination: PathBuf,
    deployer: Arc<dyn DeployerOperations>,
    state: SessionState,
}

impl SelectorSession {
    pub fn new(
        config: Arc<CatalogConfig>,
        items: Vec<MenuItem>,
        source_root: PathBuf,
        destination: PathBuf,
        deployer: Arc<dyn DeployerOperations>,
    ) -> Self {
        let buckets = group_by_brand(&config, &items);
        let state = if buckets.is_empty() {
            log::debug!("Session: No brand buckets resolved; using single-level menu.");
            SessionState::ModelMenu { brand: None }
        } else {
            SessionState::BrandMenu
        };
        SelectorSession {
            config,
            buckets,
            all_items: items,
            source_root,
            destination,
            deployer,
            state,
        }
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    fn items_for(&self, brand: Option<usize>) -> &[MenuItem] {
        match brand {
            Some(idx) => &self.buckets[idx].items,
            None => &self.all_items,
        }
    }

    pub fn current_menu(&self) -> MenuView {
        match self.state {
            SessionState::BrandMenu => {
                let rows = self
                    .buckets
                    .iter()
                    .map(|bucket| {
                        let count = bucket.items.len();
                        let unit = if count == 1 { "model" } else { "models" };
                        format!("{} ({count} {unit})", bucket.name)
                    })
                    .collect();
                MenuView {
                    heading: "Select a brand".to_string(),
                    rows,
                    prompt: "Enter a number to choose a brand (0 to exit): ".to_string(),
                }
            }
            SessionState::ModelMenu { brand } => {
                let heading = match brand {
                    Some(idx) => format!("Available consoles for: {}", self.buckets[idx].name),
                    None => "Available consoles".to_string(),
                };
                let rows = self
                    .items_for(brand)
                    .iter()
                    .map(|item| item.display_name.clone())
                    .collect();
                MenuView {
                    heading,
                    rows,
                    prompt: "Enter a number to choose a model (0 to go back, q to exit): "
                        .to_string(),
                }
            }
            SessionState::Done => MenuView {
                heading: String::new(),
                rows: Vec::new(),
                prompt: String::new(),
            },
        }
    }

    /*
     * Consumes one line of user input against the current menu. Invalid
     * input never changes state; the caller re-prompts with the returned
     * message.
     */
    pub fn handle_input(&mut self, line: &str) -> SessionReply {
        let input = line.trim().to_lowercase();
        match self.state {
            SessionState::BrandMenu => self.handle_brand_input(&input),
            SessionState::ModelMenu { brand } => self.handle_model_input(&input, brand),
            SessionState::Done => SessionReply::Exit,
        }
    }

    fn handle_brand_input(&mut self, input: &str) -> SessionReply {
        if input == "0" || input == "q" {
            self.state = SessionState::Done;
            return SessionReply::Exit;
        }
        match input.parse::<usize>() {
            Ok(choice) if choice >= 1 && choice <= self.buckets.len() => {
                self.state = SessionState::ModelMenu {
                    brand: Some(choice - 1),
                };
                SessionReply::Redraw
            }
            _ => SessionReply::Invalid("Please enter a valid number.".to_string()),
        }
    }

    fn handle_model_input(&mut self, input: &str, brand: Option<usize>) -> SessionReply {
        if input == "0" {
            if brand.is_some() {
                self.state = SessionState::BrandMenu;
            }
            // Single-level fallback: "back" just redraws the same menu.
            return SessionReply::Redraw;
        }
        if input == "q" {
            self.state = SessionState::Done;
            return SessionReply::Exit;
        }

        let items = self.items_for(brand);
        let choice = match input.parse::<usize>() {
            Ok(n) if n >= 1 && n <= items.len() => n,
            Ok(_) => return SessionReply::Invalid("Number out of range, try again.".to_string()),
            Err(_) => return SessionReply::Invalid("Please enter a valid number.".to_string()),
        };
        let item = items[choice - 1].clone();

        log::info!(
            "Session: Selected '{}' (directory '{}').",
            item.display_name,
            item.dir_name
        );
        let plan = build_deploy_plan(&self.config, &self.source_root, &item);
        match self.deployer.deploy(&plan, &self.destination) {
            Ok(outcome) => {
                self.state = SessionState::Done;
                SessionReply::Deployed {
                    display_name: item.display_name,
                    outcome,
                }
            }
            Err(DeployError::MissingProfileDir(path)) => SessionReply::SelectionUnavailable(
                format!("Source directory not found, selection skipped: {path:?}"),
            ),
            Err(err) => {
                self.state = SessionState::Done;
                SessionReply::DeployFailed {
                    display_name: item.display_name,
                    message: err.to_string(),
                }
            }
        }
    }
}
