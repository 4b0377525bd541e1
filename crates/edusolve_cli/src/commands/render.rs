//! `edusolve render`: view or export a saved model answer offline.

use std::path::PathBuf;

use anyhow::{Context, Result};
use edusolve_core::document::{explanation_indices, parse_solution};
use edusolve_core::Visibility;
use edusolve_runtime::export::export_with_expanded;
use edusolve_runtime::{ClipboardSink, ExportOptions, HtmlExporter, RuntimeConfig};

use crate::clipboard::SystemClipboard;
use crate::{output, view};

pub async fn handle(
    file: PathBuf,
    export: Option<PathBuf>,
    expand_all: bool,
    copy: bool,
) -> Result<()> {
    let text = tokio::fs::read_to_string(&file)
        .await
        .with_context(|| format!("Impossible de lire {}", file.display()))?;
    let blocks = parse_solution(&text);
    let mut visibility = Visibility::new();
    if expand_all {
        visibility.expand_all(explanation_indices(&blocks));
    }

    if output::is_json() {
        output::data("document", &blocks);
    } else {
        print!("{}", view::render(&blocks, &visibility));
    }

    if let Some(dir) = export {
        let settle = RuntimeConfig::from_env().export_settle;
        let exporter = HtmlExporter::new(dir);
        let path = export_with_expanded(
            &exporter,
            &blocks,
            &mut visibility,
            settle,
            &ExportOptions::default(),
        )
        .await?;
        output::success(&format!("Document enregistré : {}", path.display()));
    }

    if copy {
        SystemClipboard.set_text(&text)?;
        output::success("Correction copiée dans le presse-papiers");
    }
    Ok(())
}
