//! CLI argument definitions using clap derive macros.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

/// Corrections d'exercices fondées sur le cours, avec un tuteur de suivi
#[derive(Parser)]
#[command(name = "edusolve", about, version, propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Journalisation détaillée sur stderr
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Format de sortie : text (lisible) ou json (pour les scripts)
    #[arg(short, long, global = true, default_value = "text")]
    pub output: OutputFormat,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Sortie terminal colorée
    #[default]
    Text,
    /// JSON structuré pour les scripts
    Json,
}

#[derive(Subcommand)]
pub enum Command {
    /// Résoudre un exercice en s'appuyant uniquement sur le cours
    Solve(SolveArgs),
    /// Afficher une réponse enregistrée (réexport sans nouvelle requête)
    Render {
        /// Fichier texte contenant la réponse brute du modèle
        file: PathBuf,
        /// Écrire un document HTML imprimable dans ce dossier
        #[arg(long, value_name = "DIR")]
        export: Option<PathBuf>,
        /// Déplier toutes les explications
        #[arg(long)]
        expand_all: bool,
        /// Copier la réponse brute dans le presse-papiers
        #[arg(long)]
        copy: bool,
    },
    /// Montrer comment les fichiers seraient transmis (type, taille, prise en charge)
    Files {
        /// Fichiers à inspecter
        #[arg(required = true)]
        paths: Vec<PathBuf>,
    },
    /// Inspecter et tester les fournisseurs de modèles
    Providers {
        #[command(subcommand)]
        action: ProvidersAction,
    },
    /// Configurer edusolve
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(clap::Args)]
pub struct SolveArgs {
    /// Document de cours (répétable)
    #[arg(short, long = "course", value_name = "FILE", required = true)]
    pub courses: Vec<PathBuf>,
    /// Énoncé de l'exercice
    #[arg(short, long, value_name = "FILE")]
    pub exercise: PathBuf,
    /// Fournisseur (gemini, zai). EDUSOLVE_PROVIDER par défaut.
    #[arg(long)]
    pub provider: Option<String>,
    /// Modèle. EDUSOLVE_MODEL par défaut.
    #[arg(long)]
    pub model: Option<String>,
    /// Écrire un document HTML imprimable dans ce dossier
    #[arg(long, value_name = "DIR")]
    pub export: Option<PathBuf>,
    /// Copier la correction brute dans le presse-papiers
    #[arg(long)]
    pub copy: bool,
    /// Ouvrir la discussion avec le tuteur après la correction
    #[arg(long)]
    pub chat: bool,
    /// Déplier toutes les explications
    #[arg(long)]
    pub expand_all: bool,
    /// Afficher la réponse brute au lieu de la vue mise en forme
    #[arg(long)]
    pub raw: bool,
}

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Enregistrer la clé API d'un fournisseur
    Api {
        /// Fournisseur à configurer (gemini, zai)
        #[arg(short, long)]
        provider: Option<String>,
    },
    /// Afficher la configuration effective
    Show,
}

#[derive(Subcommand)]
pub enum ProvidersAction {
    /// Lister les fournisseurs et l'état de leur clé
    List,
    /// Lister les modèles proposés par un fournisseur
    Models {
        /// Identifiant du fournisseur
        provider: String,
    },
    /// Envoyer une requête minimale pour vérifier la clé et la connexion
    Test {
        /// Identifiant du fournisseur
        provider: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_solve_collects_repeated_courses() {
        let cli = Cli::try_parse_from([
            "edusolve", "solve", "-c", "a.pdf", "--course", "b.md", "-e", "td.pdf", "--chat",
        ])
        .unwrap();
        let Command::Solve(args) = cli.command else {
            panic!("expected solve");
        };
        assert_eq!(args.courses, vec![PathBuf::from("a.pdf"), PathBuf::from("b.md")]);
        assert_eq!(args.exercise, PathBuf::from("td.pdf"));
        assert!(args.chat);
        assert!(!args.copy);
    }

    #[test]
    fn test_solve_requires_a_course() {
        assert!(Cli::try_parse_from(["edusolve", "solve", "-e", "td.pdf"]).is_err());
    }

    #[test]
    fn test_global_json_output() {
        let cli = Cli::try_parse_from(["edusolve", "files", "a.pdf", "-o", "json"]).unwrap();
        assert_eq!(cli.output, OutputFormat::Json);
    }
}
