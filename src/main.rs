//! toolshelf - Main entry point.
//!
//! Usage: toolshelf <COMMAND> [ARGS]
//!
//! Commands:
//!   categories                     List catalog categories
//!   tools <category>               List the tools of a category
//!   install <category> <tool>      Install a tool
//!   uninstall <category> <tool>    Remove an installed tool
//!   status <category> <tool>       Show whether a tool is installed
//!
//! Options:
//!   --version, -v    Show version
//!   --help, -h       Show this help

use std::env;
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;

use toolshelf::catalog::ToolEntry;
use toolshelf::config::Config;
use toolshelf::installer::{BackgroundInstaller, JobResult, ToolManager};
use toolshelf::logging;

/// Current version of toolshelf.
const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Upper bound on waiting for one background job.
const JOB_WAIT: Duration = Duration::from_secs(600);

const USAGE: &str = "\
Usage: toolshelf <COMMAND> [ARGS]

Commands:
  categories                     List catalog categories
  tools <category>               List the tools of a category
  install <category> <tool>      Install a tool
  uninstall <category> <tool>    Remove an installed tool
  status <category> <tool>       Show whether a tool is installed

Options:
  --version, -v    Show version
  --help, -h       Show this help";

fn main() -> ExitCode {
    let args: Vec<String> = env::args().skip(1).collect();

    if args.iter().any(|a| a == "--version" || a == "-v") {
        println!("toolshelf v{}", VERSION);
        return ExitCode::SUCCESS;
    }

    if args.is_empty() || args.iter().any(|a| a == "--help" || a == "-h") {
        println!("{}", USAGE);
        return ExitCode::SUCCESS;
    }

    let config = match Config::load() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Failed to load config: {}", e);
            return ExitCode::FAILURE;
        }
    };

    if let Err(e) = logging::init(&config.log) {
        eprintln!("Warning: Failed to initialize logging: {}", e);
    }

    let manager = Arc::new(ToolManager::new(&config));
    let command: Vec<&str> = args.iter().map(String::as_str).collect();

    match command.as_slice() {
        ["categories"] => list_categories(&manager),
        ["tools", category] => list_tools(&manager, category),
        ["install", category, tool] => run_job(&manager, category, tool, true),
        ["uninstall", category, tool] => run_job(&manager, category, tool, false),
        ["status", category, tool] => {
            let state = if manager.is_installed(category, tool) {
                "installed"
            } else {
                "not installed"
            };
            println!("{}/{}: {}", category, tool, state);
            ExitCode::SUCCESS
        }
        _ => {
            eprintln!("{}", USAGE);
            ExitCode::FAILURE
        }
    }
}

/// Prints every category name.
fn list_categories(manager: &ToolManager) -> ExitCode {
    match manager.list_categories() {
        Ok(categories) => {
            for name in categories.keys() {
                println!("{}", name);
            }
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("{}", e);
            ExitCode::FAILURE
        }
    }
}

/// Prints the tools of one category with their install state.
fn list_tools(manager: &ToolManager, category: &str) -> ExitCode {
    let tools = match find_category_tools(manager, category) {
        Ok(tools) => tools,
        Err(msg) => {
            eprintln!("{}", msg);
            return ExitCode::FAILURE;
        }
    };

    for entry in tools.values() {
        let marker = if manager.is_installed(category, &entry.name) {
            "*"
        } else {
            " "
        };
        let kind = manager.classify_source(&entry.source_url).label();
        println!("{} {:<30} [{}] {}", marker, entry.name, kind, entry.description);
    }

    ExitCode::SUCCESS
}

/// Looks up a category's tools by category name.
fn find_category_tools(
    manager: &ToolManager,
    category: &str,
) -> Result<Arc<toolshelf::ToolMap>, String> {
    let categories = manager.list_categories().map_err(|e| e.to_string())?;
    let entry = categories
        .get(category)
        .ok_or_else(|| format!("Unknown category: {}", category))?;
    manager
        .list_tools(&entry.source_url)
        .map_err(|e| e.to_string())
}

/// Looks up one tool of a category.
fn find_tool(manager: &ToolManager, category: &str, tool: &str) -> Result<ToolEntry, String> {
    let tools = find_category_tools(manager, category)?;
    tools
        .get(tool)
        .cloned()
        .ok_or_else(|| format!("Unknown tool '{}' in {}", tool, category))
}

/// Runs an install or uninstall on the background worker and waits for it.
fn run_job(manager: &Arc<ToolManager>, category: &str, tool: &str, install: bool) -> ExitCode {
    let url = if install {
        match find_tool(manager, category, tool) {
            Ok(entry) => entry.source_url,
            Err(msg) => {
                eprintln!("{}", msg);
                return ExitCode::FAILURE;
            }
        }
    } else {
        String::new()
    };

    let worker = BackgroundInstaller::new(Arc::clone(manager));
    if install {
        println!("Installing {}...", tool);
        worker.submit_install(category, tool, &url);
    } else {
        println!("Uninstalling {}...", tool);
        worker.submit_uninstall(category, tool, &url);
    }

    match worker.wait_result(JOB_WAIT) {
        Some(JobResult::Installed { tool, outcome }) => {
            println!("{}: {}", tool.tool, outcome.display());
            if outcome.is_success() {
                ExitCode::SUCCESS
            } else {
                ExitCode::FAILURE
            }
        }
        Some(JobResult::Uninstalled { tool, outcome }) => {
            println!("{}: {}", tool.tool, outcome.display());
            ExitCode::SUCCESS
        }
        None => {
            eprintln!("Timed out waiting for {}", tool);
            ExitCode::FAILURE
        }
    }
}
