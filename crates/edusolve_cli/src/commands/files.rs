//! `edusolve files`: preview how documents will be sent to the model.

use std::path::PathBuf;

use anyhow::Result;
use comfy_table::{Cell, Color};
use edusolve_core::file::{ingest, normalized_media_type};
use edusolve_core::FileKind;
use serde::Serialize;

use crate::output;

#[derive(Serialize)]
struct FileRow {
    name: String,
    media_type: String,
    sent_as: Option<&'static str>,
    size: String,
    kind: FileKind,
}

pub async fn handle(paths: Vec<PathBuf>) -> Result<()> {
    let mut selection = paths;
    let files = ingest(&mut selection).await?;

    let rows: Vec<FileRow> = files
        .iter()
        .map(|f| FileRow {
            name: f.name.clone(),
            media_type: f.media_type.clone(),
            sent_as: f
                .is_supported()
                .then(|| normalized_media_type(&f.media_type)),
            size: f.formatted_size(),
            kind: f.kind(),
        })
        .collect();

    output::header("Fichiers");
    let mut table = output::table();
    output::table_header(&mut table, &["Fichier", "Type", "Envoyé comme", "Taille"]);
    for row in &rows {
        let sent_as = match row.sent_as {
            Some(media_type) => Cell::new(media_type).fg(Color::Green),
            None => Cell::new("non lu").fg(Color::Yellow),
        };
        table.add_row(vec![
            Cell::new(&row.name).fg(Color::Green),
            Cell::new(&row.media_type),
            sent_as,
            Cell::new(&row.size),
        ]);
    }
    output::table_print(&table, "files", &rows);

    if rows.iter().any(|r| {
        r.sent_as.is_none() || matches!(r.kind, FileKind::Word | FileKind::Presentation)
    }) {
        output::dim("CONSEIL : privilégiez le format PDF pour que l'IA lise tout le contenu.");
    }
    Ok(())
}
