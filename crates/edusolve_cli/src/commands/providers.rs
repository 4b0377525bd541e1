//! `edusolve providers` subcommands.

use anyhow::{anyhow, Result};
use comfy_table::{Cell, Color};
use edusolve_llms::ProviderRegistry;
use edusolve_runtime::{LlmProvider, ModelGateway, RuntimeConfig};
use serde::Serialize;

use crate::cli::ProvidersAction;
use crate::commands::parse_provider;
use crate::output;

const PROVIDERS: &[LlmProvider] = &[LlmProvider::Gemini, LlmProvider::Zai];

#[derive(Serialize)]
struct ProviderRow {
    id: &'static str,
    configured: bool,
    default_model: &'static str,
}

pub async fn handle(action: ProvidersAction) -> Result<()> {
    match action {
        ProvidersAction::List => list(),
        ProvidersAction::Models { provider } => models(&provider).await,
        ProvidersAction::Test { provider } => test(&provider).await,
    }
}

fn list() -> Result<()> {
    let registry = ProviderRegistry::from_env();
    let rows: Vec<ProviderRow> = PROVIDERS
        .iter()
        .map(|p| ProviderRow {
            id: p.as_str(),
            configured: registry.contains(p.as_str()),
            default_model: p.default_model(),
        })
        .collect();

    output::header("Fournisseurs");
    let mut table = output::table();
    output::table_header(&mut table, &["Fournisseur", "État", "Modèle par défaut"]);
    for row in &rows {
        let status = if row.configured {
            Cell::new("configuré").fg(Color::Green)
        } else {
            Cell::new("clé API manquante").fg(Color::Yellow)
        };
        table.add_row(vec![
            Cell::new(row.id).fg(Color::Green),
            status,
            Cell::new(row.default_model),
        ]);
    }
    output::table_print(&table, "providers", &rows);
    Ok(())
}

async fn models(provider_id: &str) -> Result<()> {
    let id = parse_provider(provider_id)?;
    let provider = ProviderRegistry::from_env().get_provider(id.as_str())?;

    let spinner = output::spinner(&format!("Récupération des modèles de {}...", id));
    let models = match provider.list_models().await {
        Ok(models) => models,
        Err(e) => {
            output::spinner_error(&spinner, "Échec de la récupération des modèles");
            return Err(anyhow!("impossible de lister les modèles : {}", e));
        }
    };
    spinner.finish_and_clear();

    output::header(&format!("Modèles de {}", id));
    if models.is_empty() {
        output::dim("Aucun modèle renvoyé");
        return Ok(());
    }
    let mut table = output::table();
    output::table_header(&mut table, &["Modèle"]);
    for model in &models {
        table.add_row(vec![Cell::new(model)]);
    }
    output::table_print(&table, "models", &models);
    Ok(())
}

/// A real generation round trip, so a wrong key or model name fails here.
async fn test(provider_id: &str) -> Result<()> {
    let id = parse_provider(provider_id)?;
    let config = RuntimeConfig::from_env().with_provider(id);
    if config.api_key().is_none() {
        return Err(anyhow!(
            "aucune clé API pour {}. Lancez « edusolve config api --provider {} »",
            id,
            id
        ));
    }
    let gateway = ModelGateway::from_config(&config);

    let spinner = output::spinner(&format!("Test de {} ({})...", id, gateway.model()));
    match gateway.ping().await {
        Ok(reply) => {
            output::spinner_success(
                &spinner,
                &format!("{} a répondu : {}", id, reply.trim()),
            );
            Ok(())
        }
        Err(e) => {
            output::spinner_error(&spinner, &format!("échec du test de {}", id));
            Err(anyhow!("le test du fournisseur a échoué : {}", e))
        }
    }
}
