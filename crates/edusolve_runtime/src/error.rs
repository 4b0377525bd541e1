//! Runtime error types
//!
//! Display strings are the messages shown to the student.

use edusolve_core::CoreError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RuntimeError {
    #[error("Veuillez uploader au moins un cours et un exercice.")]
    MissingInputs,

    #[error("L'un des fichiers possède un format non supporté par l'IA. Veuillez privilégier le format PDF.")]
    UnsupportedMediaType(#[source] edusolve_llms::Error),

    #[error("Une erreur est survenue lors de la communication avec l'IA.")]
    GenerationFailed(#[source] edusolve_llms::Error),

    #[error("Aucune correction disponible pour le moment.")]
    NoSolution,

    #[error("Le tuteur est disponible une fois la correction générée.")]
    ChatUnavailable,

    #[error("Échec de l'export du document : {0}")]
    Export(String),

    #[error("Impossible de copier dans le presse-papiers : {0}")]
    Clipboard(String),

    #[error("Configuration invalide : {0}")]
    Config(String),

    #[error("Lecture du fichier impossible : {0}")]
    Ingest(#[from] CoreError),

    #[error("Erreur d'entrée/sortie : {0}")]
    Io(#[from] std::io::Error),
}

impl RuntimeError {
    /// Map a provider failure to the message shown to the student.
    pub fn from_llm(error: edusolve_llms::Error) -> Self {
        if error.is_unsupported_media_type() {
            RuntimeError::UnsupportedMediaType(error)
        } else {
            RuntimeError::GenerationFailed(error)
        }
    }
}

pub type Result<T> = std::result::Result<T, RuntimeError>;
