mod app_logic;
mod core;

use crate::app_logic::{SelectorSession, SessionReply};
use crate::core::{
    CatalogConfig, CatalogIndexOperations, ConfigManagerOperations, CoreCatalogIndex,
    CoreConfigManager, CoreDeployer, DeployOutcome, DeployerOperations, MenuItem, cleaner,
    expand_display_names,
};
use simplelog::{ColorChoice, Config as LogConfig, LevelFilter, SimpleLogger, TermLogger, TerminalMode};
use std::io::{self, IsTerminal, Write};
use std::path::Path;
use std::process::ExitCode;
use std::sync::Arc;

/*
 * The interactive shell. Everything here is presentation glue: banner,
 * prompts, and printing. The selection flow itself lives in
 * `app_logic::SelectorSession`, and all filesystem work in `core`.
 */

const APP_NAME: &str = "DtbSelector";
const SOURCE_ROOT_DIR_NAME: &str = "consoles";
const CATALOG_FILE_NAME: &str = "catalog.json";

fn init_logging() {
    if TermLogger::init(
        LevelFilter::Info,
        LogConfig::default(),
        TerminalMode::Mixed,
        ColorChoice::Auto,
    )
    .is_err()
    {
        let _ = SimpleLogger::init(LevelFilter::Info, LogConfig::default());
    }
}

fn main() -> ExitCode {
    init_logging();
    if let Err(e) = run() {
        log::error!("{e}");
        return ExitCode::FAILURE;
    }
    ExitCode::SUCCESS
}

// Prompts for one line. `None` means stdin was closed; callers treat that
// like an exit request.
fn read_line(prompt: &str) -> io::Result<Option<String>> {
    print!("{prompt}");
    io::stdout().flush()?;
    let mut line = String::new();
    if io::stdin().read_line(&mut line)? == 0 {
        return Ok(None);
    }
    Ok(Some(line))
}

fn load_catalog(source_root: &Path) -> CatalogConfig {
    let override_path = source_root.join(CATALOG_FILE_NAME);
    if override_path.is_file() {
        match CatalogConfig::load_from_file(&override_path) {
            Ok(config) => {
                log::info!("Using catalog override from {override_path:?}.");
                return config;
            }
            Err(e) => {
                log::warn!("Ignoring {override_path:?}, falling back to built-in catalog: {e}");
            }
        }
    }
    CatalogConfig::builtin()
}

fn intro_and_wait(config: &CatalogConfig) -> io::Result<bool> {
    println!();
    println!("================ DTB Selector ================");
    println!("Only the listed consoles are supported. Do NOT use the dtb files");
    println!("from a stock EmuELEC card with this system - it will not boot.");
    println!();
    println!("Selecting a console will:");
    println!(
        "  - clean top-level {} files (and remove: {}) in this directory,",
        config.clean_extensions.join("/"),
        config.clean_dirs.join(", ")
    );
    println!("  - then copy the chosen console and any mapped extra sources.");

    match read_line("\nPress Enter to continue (q to quit): ")? {
        Some(line) if line.trim().eq_ignore_ascii_case("q") => Ok(false),
        Some(_) => Ok(true),
        None => Ok(false),
    }
}

// Best-effort default action for non-interactive runs: report what would
// be selectable and change nothing.
fn print_catalog_summary(items: &[MenuItem]) {
    println!("Found {} console entries:", items.len());
    for item in items {
        println!("  {}  (folder: {})", item.display_name, item.dir_name);
    }
    println!("Run from an interactive terminal to deploy one.");
}

fn print_menu(menu: &crate::app_logic::MenuView) {
    println!();
    println!("{}", menu.heading);
    for (index, row) in menu.rows.iter().enumerate() {
        println!("{}. {}", index + 1, row);
    }
}

fn print_success(display_name: &str, outcome: &DeployOutcome) {
    println!();
    println!("==============================================");
    println!("Operation completed: {display_name}");
    println!(
        "  files copied: {}, new directories: {}",
        outcome.copy.files_copied, outcome.copy.dirs_created
    );
    println!(
        "  stale artifacts removed: {} files, {} folders",
        outcome.clean.files_removed, outcome.clean.dirs_removed
    );
    if !outcome.skipped_sources.is_empty() {
        println!("  extra sources skipped (not found):");
        for source in &outcome.skipped_sources {
            println!("    {}", source.display());
        }
    }
    println!("Verify the files in this directory before booting.");
    println!("==============================================");
}

/*
 * Post-deploy language choice. English leaves the destination alone;
 * Chinese drops the empty `.cn` marker next to the copied files.
 */
fn prompt_language_and_mark(destination: &Path) -> io::Result<()> {
    println!();
    println!("Select language:");
    println!("1. English (default)");
    println!("2. Chinese");

    loop {
        let Some(line) = read_line("Enter 1 or 2 [1]: ")? else {
            return Ok(());
        };
        let answer = line.trim().to_lowercase();
        match answer.as_str() {
            "" | "1" | "en" | "english" => return Ok(()),
            "2" | "zh" | "cn" | "chinese" => {
                match cleaner::write_language_marker(destination) {
                    Ok(()) => println!(
                        "Chinese selected; marker file {} created.",
                        cleaner::LANGUAGE_MARKER_FILENAME
                    ),
                    Err(e) => log::warn!("Failed to create language marker: {e}"),
                }
                return Ok(());
            }
            _ => println!("Invalid selection, try again."),
        }
    }
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    let destination = std::env::current_dir()?;
    let source_root = destination.join(SOURCE_ROOT_DIR_NAME);
    let config = Arc::new(load_catalog(&source_root));

    let index = CoreCatalogIndex::new();
    let entries = index.list_profiles(&source_root, &config)?;
    if entries.is_empty() {
        println!(
            "No selectable consoles under {:?}. Make sure the '{}' folder sits next to this tool.",
            source_root, SOURCE_ROOT_DIR_NAME
        );
        return Ok(());
    }
    let items = expand_display_names(&config, &entries);

    if !io::stdin().is_terminal() {
        print_catalog_summary(&items);
        return Ok(());
    }

    if !intro_and_wait(&config)? {
        println!("Cancelled, bye!");
        return Ok(());
    }

    let config_manager: Arc<dyn ConfigManagerOperations> = Arc::new(CoreConfigManager::new());
    match config_manager.load_last_deployed_profile(APP_NAME) {
        Ok(Some(last)) => println!("Last deployed console: {last}"),
        Ok(None) => {}
        Err(e) => log::debug!("Could not read last deployed profile: {e}"),
    }

    let deployer: Arc<dyn DeployerOperations> = Arc::new(CoreDeployer::new(&config));
    let mut session = SelectorSession::new(
        Arc::clone(&config),
        items,
        source_root,
        destination.clone(),
        deployer,
    );

    loop {
        let menu = session.current_menu();
        print_menu(&menu);
        let Some(line) = read_line(&menu.prompt)? else {
            println!();
            println!("Goodbye!");
            return Ok(());
        };

        match session.handle_input(&line) {
            SessionReply::Redraw => {}
            SessionReply::Invalid(message) | SessionReply::SelectionUnavailable(message) => {
                println!("{message}");
            }
            SessionReply::Deployed {
                display_name,
                outcome,
            } => {
                print_success(&display_name, &outcome);
                if let Err(e) =
                    config_manager.save_last_deployed_profile(APP_NAME, &display_name)
                {
                    log::warn!("Failed to remember last deployed profile: {e}");
                }
                prompt_language_and_mark(&destination)?;
                return Ok(());
            }
            SessionReply::DeployFailed {
                display_name,
                message,
            } => {
                return Err(format!("Deploying '{display_name}' failed: {message}").into());
            }
            SessionReply::Exit => {
                println!("Goodbye!");
                return Ok(());
            }
        }
    }
}
