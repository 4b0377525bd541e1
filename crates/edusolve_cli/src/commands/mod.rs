//! Command dispatch.

pub mod chat;
pub mod config;
pub mod files;
pub mod providers;
pub mod render;
pub mod solve;

use anyhow::Result;
use edusolve_runtime::{LlmProvider, RuntimeConfig};

use crate::cli::{Cli, Command};

pub async fn handle(cli: Cli) -> Result<()> {
    match cli.command {
        Command::Solve(args) => solve::handle(args).await,
        Command::Render {
            file,
            export,
            expand_all,
            copy,
        } => render::handle(file, export, expand_all, copy).await,
        Command::Files { paths } => files::handle(paths).await,
        Command::Providers { action } => providers::handle(action).await,
        Command::Config { action } => config::handle(action).await,
    }
}

pub(crate) fn parse_provider(id: &str) -> Result<LlmProvider> {
    Ok(id.parse::<LlmProvider>()?)
}

/// Environment configuration with command-line overrides applied.
pub(crate) fn resolve_config(provider: Option<&str>, model: Option<&str>) -> Result<RuntimeConfig> {
    let mut config = RuntimeConfig::from_env();
    if let Some(id) = provider {
        config = config.with_provider(parse_provider(id)?);
    }
    if let Some(model) = model {
        config = config.with_model(model);
    }
    Ok(config)
}
