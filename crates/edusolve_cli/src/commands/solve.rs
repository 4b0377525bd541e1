//! `edusolve solve`: ingest, correct, show, then optionally export, copy
//! and chat.

use std::path::PathBuf;

use anyhow::Result;
use edusolve_runtime::{ExportOptions, HtmlExporter, StudySession};
use tracing::debug;

use crate::cli::SolveArgs;
use crate::clipboard::SystemClipboard;
use crate::commands::{chat, resolve_config};
use crate::{output, view};

pub async fn handle(args: SolveArgs) -> Result<()> {
    let config = resolve_config(args.provider.as_deref(), args.model.as_deref())?;
    debug!(provider = %config.provider, model = %config.model, "solve");
    let mut session = StudySession::from_config(config);

    let mut selection = args.courses;
    session.add_courses(&mut selection).await?;
    session.set_exercise(&args.exercise).await?;
    warn_unsupported(&session);

    let spinner = output::spinner("Analyse du cours et résolution de l'exercice...");
    if let Err(e) = session.solve().await {
        output::spinner_error(&spinner, "Échec de la correction");
        return Err(e.into());
    }
    spinner.finish_and_clear();

    if args.expand_all {
        session.set_all_explanations(true);
    }
    show(&session, args.raw);

    if let Some(dir) = args.export {
        export(&mut session, dir).await?;
    }
    if args.copy {
        copy(&session)?;
    }
    if args.chat {
        chat::run(&mut session).await?;
    }
    Ok(())
}

/// Files the model cannot read are still listed so the user knows why an
/// answer may ignore them.
fn warn_unsupported(session: &StudySession) {
    let unsupported = session
        .courses()
        .iter()
        .chain(session.exercise())
        .filter(|f| !f.is_supported());
    for file in unsupported {
        output::warning(&format!(
            "{} ({}) ne peut pas être lu par le modèle, privilégiez le format PDF",
            file.name, file.media_type
        ));
    }
}

pub(crate) fn show(session: &StudySession, raw: bool) {
    let Some(solution) = session.solution() else {
        output::dim("Aucune correction pour le moment.");
        return;
    };
    if output::is_json() {
        output::data(
            "correction",
            &serde_json::json!({
                "provider": session.gateway().provider_id(),
                "model": session.gateway().model(),
                "created_at": solution.created_at,
                "text": solution.text,
                "blocks": session.document(),
            }),
        );
    } else if raw {
        println!("{}", solution.text);
    } else {
        print!("{}", view::render(session.document(), session.visibility()));
    }
}

pub(crate) async fn export(session: &mut StudySession, dir: PathBuf) -> Result<()> {
    let exporter = HtmlExporter::new(dir);
    let spinner = output::spinner("Préparation du document...");
    match session.export(&exporter, &ExportOptions::default()).await {
        Ok(path) => {
            output::spinner_success(&spinner, &format!("Document enregistré : {}", path.display()));
            Ok(())
        }
        Err(e) => {
            output::spinner_error(&spinner, "Export impossible");
            Err(e.into())
        }
    }
}

pub(crate) fn copy(session: &StudySession) -> Result<()> {
    session.copy_solution(&SystemClipboard)?;
    output::success("Correction copiée dans le presse-papiers");
    Ok(())
}
