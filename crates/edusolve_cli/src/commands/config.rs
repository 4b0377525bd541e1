//! `edusolve config` subcommands.

use std::collections::BTreeMap;
use std::env;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use anyhow::{anyhow, Result};
use edusolve_constant::app::{DATA_DIR, ENV_FILE};
use edusolve_constant::model::env as keys;
use edusolve_runtime::RuntimeConfig;

use crate::cli::ConfigAction;
use crate::output;

#[derive(Debug)]
struct ProviderKey {
    id: &'static str,
    env_var: &'static str,
    description: &'static str,
}

const PROVIDERS: &[ProviderKey] = &[
    ProviderKey {
        id: "gemini",
        env_var: keys::GEMINI_API_KEY,
        description: "Google Gemini (lit les cours PDF nativement)",
    },
    ProviderKey {
        id: "zai",
        env_var: keys::ZAI_API_KEY,
        description: "Modèles GLM de Z.AI (documents texte uniquement)",
    },
];

pub async fn handle(action: ConfigAction) -> Result<()> {
    match action {
        ConfigAction::Api { provider } => configure_api(provider),
        ConfigAction::Show => show(),
    }
}

fn configure_api(provider: Option<String>) -> Result<()> {
    let selected = match provider {
        Some(p) => find_provider(&p)?,
        None => select_provider()?,
    };

    output::header(&format!("Configurer {}", selected.id));
    println!("  {}", selected.description);
    println!();

    if let Ok(current) = env::var(selected.env_var) {
        println!("  Clé actuelle : {}", mask_key(&current));
        println!();
    }

    let key = prompt_api_key(selected.id)?;
    if key.is_empty() {
        output::warning("Aucune clé saisie, opération annulée.");
        return Ok(());
    }

    let path = config_path()?;
    save_api_key(&path, selected.env_var, &key)?;

    output::success(&format!("{} enregistrée dans {}", selected.env_var, path.display()));
    output::dim("edusolve relit ce fichier à chaque démarrage.");
    Ok(())
}

fn find_provider(id: &str) -> Result<&'static ProviderKey> {
    let wanted = id.to_lowercase();
    PROVIDERS.iter().find(|p| p.id == wanted).ok_or_else(|| {
        let ids: Vec<_> = PROVIDERS.iter().map(|p| p.id).collect();
        anyhow!("fournisseur inconnu « {} » (disponibles : {})", id, ids.join(", "))
    })
}

fn select_provider() -> Result<&'static ProviderKey> {
    println!("Choisissez le fournisseur à configurer :\n");
    for (i, p) in PROVIDERS.iter().enumerate() {
        let status = if env::var(p.env_var).is_ok() {
            console::style("(configuré)").green()
        } else {
            console::style("(non défini)").dim()
        };
        println!("  {}) {} {} - {}", i + 1, p.id, status, p.description);
    }
    println!();

    print!("Votre choix [1-{}] : ", PROVIDERS.len());
    io::stdout().flush()?;

    let mut input = String::new();
    io::stdin().read_line(&mut input)?;
    let choice: usize = input.trim().parse().map_err(|_| anyhow!("choix invalide"))?;

    choice
        .checked_sub(1)
        .and_then(|i| PROVIDERS.get(i))
        .ok_or_else(|| anyhow!("le choix doit être compris entre 1 et {}", PROVIDERS.len()))
}

/// Read a key without echoing it; each character shows as `*`.
fn prompt_api_key(provider: &str) -> Result<String> {
    use crossterm::{
        event::{self, Event, KeyCode, KeyModifiers},
        terminal,
    };

    println!("Saisissez la clé API pour {} :", provider);
    print!("> ");
    io::stdout().flush()?;

    let mut key = String::new();
    terminal::enable_raw_mode()?;

    let result = (|| -> Result<Option<String>> {
        loop {
            if !event::poll(std::time::Duration::from_millis(100))? {
                continue;
            }
            let Event::Key(k) = event::read()? else {
                continue;
            };
            match k.code {
                KeyCode::Enter => return Ok(Some(key)),
                KeyCode::Esc => return Ok(None),
                KeyCode::Backspace => {
                    if key.pop().is_some() {
                        print!("\x08 \x08");
                        io::stdout().flush()?;
                    }
                }
                KeyCode::Char('c') if k.modifiers.contains(KeyModifiers::CONTROL) => {
                    return Ok(None);
                }
                KeyCode::Char(c) => {
                    key.push(c);
                    print!("*");
                    io::stdout().flush()?;
                }
                _ => {}
            }
        }
    })();

    terminal::disable_raw_mode()?;
    println!();
    Ok(result?.unwrap_or_default().trim().to_string())
}

fn mask_key(key: &str) -> String {
    let chars: Vec<char> = key.chars().collect();
    if chars.len() <= 8 {
        return "*".repeat(chars.len());
    }
    let head: String = chars[..4].iter().collect();
    let tail: String = chars[chars.len() - 4..].iter().collect();
    format!("{head}...{tail}")
}

fn config_path() -> Result<PathBuf> {
    let home = dirs::home_dir().ok_or_else(|| anyhow!("répertoire personnel introuvable"))?;
    let dir = home.join(DATA_DIR);
    fs::create_dir_all(&dir)?;
    Ok(dir.join(ENV_FILE))
}

fn parse_env_file(content: &str) -> BTreeMap<String, String> {
    content
        .lines()
        .filter_map(|line| {
            let line = line.trim();
            if line.starts_with('#') {
                return None;
            }
            let line = line.strip_prefix("export ").unwrap_or(line);
            let (key, value) = line.split_once('=')?;
            Some((key.trim().to_string(), value.trim().to_string()))
        })
        .collect()
}

fn save_api_key(path: &Path, env_var: &str, key: &str) -> Result<()> {
    let existing = if path.exists() {
        fs::read_to_string(path)?
    } else {
        String::new()
    };

    let mut entries = parse_env_file(&existing);
    entries.insert(env_var.to_string(), format!("\"{}\"", key));

    let mut content = String::from("# Configuration EduSolve, chargée par edusolve au démarrage\n\n");
    for (k, v) in &entries {
        content.push_str(&format!("export {}={}\n", k, v));
    }
    fs::write(path, content)?;
    Ok(())
}

fn show() -> Result<()> {
    let config = RuntimeConfig::from_env();
    output::header("Configuration");
    output::kv("fournisseur", config.provider.as_str());
    output::kv("modèle", &config.model);
    output::kv("modèle de discussion", config.chat_model());
    output::kv("température", &config.temperature.to_string());
    output::kv(
        "délai avant export",
        &format!("{} ms", config.export_settle.as_millis()),
    );
    output::kv("url de base", config.base_url.as_deref().unwrap_or("(par défaut)"));
    output::kv(
        "clé api",
        &config.api_key().map(mask_key).unwrap_or_else(|| "(non définie)".to_string()),
    );
    Ok(())
}
