//! CLI entry point for EduSolve.

mod cli;
mod clipboard;
mod commands;
mod output;
mod view;

use std::path::Path;

use clap::Parser;
use edusolve_constant::app::{DATA_DIR, ENV_FILE, VERSION};
use edusolve_observability::ObservabilityConfig;

use crate::cli::Cli;

/// Walk up from the current directory and load the first `relative` file found.
fn load_nearest(relative: &Path) {
    let Ok(mut dir) = std::env::current_dir() else {
        return;
    };
    for _ in 0..32 {
        let candidate = dir.join(relative);
        if candidate.exists() {
            let _ = dotenvy::from_path(&candidate);
            return;
        }
        match dir.parent() {
            Some(parent) => dir = parent.to_path_buf(),
            None => return,
        }
    }
}

/// Load env files before argument parsing. Earlier files win because
/// dotenvy never overrides a variable that is already set:
/// 1) ~/.edusolve/env  2) .edusolve/env (project)  3) .env (project)
fn load_edusolve_config() {
    if let Some(home) = dirs::home_dir() {
        let global = home.join(DATA_DIR).join(ENV_FILE);
        if global.exists() {
            let _ = dotenvy::from_path(&global);
        }
    }
    load_nearest(&Path::new(DATA_DIR).join(ENV_FILE));
    load_nearest(Path::new(".env"));
}

#[tokio::main]
async fn main() {
    load_edusolve_config();
    let cli = Cli::parse();
    output::init(cli.output);

    let observability = ObservabilityConfig::from_env()
        .with_version(VERSION)
        .with_console(cli.verbose);
    let observability = if cli.verbose && observability.log_level.is_none() {
        observability.with_log_level("warn,edusolve_cli=debug,edusolve_runtime=debug,edusolve_llms=debug")
    } else {
        observability
    };
    if let Err(e) = edusolve_observability::init(observability) {
        output::warning(&e.to_string());
    }

    let result = commands::handle(cli).await;
    edusolve_observability::shutdown();

    if let Err(e) = result {
        output::error(&e.to_string());
        std::process::exit(1);
    }
}
