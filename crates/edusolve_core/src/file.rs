//! Uploaded files: ingestion into self-describing data URLs, media type
//! detection and the supported-type allow-list.

use std::path::{Path, PathBuf};

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use serde::{Deserialize, Serialize};

use crate::error::{CoreError, Result};

/// Media type used when a file declares none.
pub const DEFAULT_MEDIA_TYPE: &str = "application/octet-stream";

pub const PDF_MEDIA_TYPE: &str = "application/pdf";
pub const TEXT_MEDIA_TYPE: &str = "text/plain";

/// Media types the model can ingest directly as inline data.
pub const SUPPORTED_MEDIA_TYPES: &[&str] = &[
    "application/pdf",
    "text/plain",
    "text/html",
    "text/css",
    "text/javascript",
    "text/markdown",
    "application/json",
    "text/x-typescript",
];

const EXTENSION_MEDIA_TYPES: &[(&str, &str)] = &[
    ("pdf", "application/pdf"),
    ("txt", "text/plain"),
    ("text", "text/plain"),
    ("html", "text/html"),
    ("htm", "text/html"),
    ("css", "text/css"),
    ("js", "text/javascript"),
    ("mjs", "text/javascript"),
    ("md", "text/markdown"),
    ("markdown", "text/markdown"),
    ("json", "application/json"),
    ("ts", "text/x-typescript"),
    ("tsx", "text/x-typescript"),
    ("doc", "application/msword"),
    (
        "docx",
        "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
    ),
    ("ppt", "application/vnd.ms-powerpoint"),
    (
        "pptx",
        "application/vnd.openxmlformats-officedocument.presentationml.presentation",
    ),
    ("png", "image/png"),
    ("jpg", "image/jpeg"),
    ("jpeg", "image/jpeg"),
];

/// Declared media type for a path, from its extension. Empty when unknown.
pub fn media_type_for_path(path: &Path) -> &'static str {
    let Some(ext) = path.extension().and_then(|e| e.to_str()) else {
        return "";
    };
    let ext = ext.to_ascii_lowercase();
    EXTENSION_MEDIA_TYPES
        .iter()
        .find(|(e, _)| *e == ext)
        .map(|(_, mt)| *mt)
        .unwrap_or("")
}

pub fn is_supported_media_type(media_type: &str) -> bool {
    SUPPORTED_MEDIA_TYPES.contains(&media_type)
}

/// PDF stays PDF, everything else is sent as plain text.
pub fn normalized_media_type(media_type: &str) -> &'static str {
    if media_type == PDF_MEDIA_TYPE {
        PDF_MEDIA_TYPE
    } else {
        TEXT_MEDIA_TYPE
    }
}

/// Human-readable size: base 1024, at most two decimals, trailing zeros trimmed.
pub fn format_size(bytes: u64) -> String {
    const UNITS: [&str; 4] = ["B", "KB", "MB", "GB"];
    if bytes == 0 {
        return "0 B".to_string();
    }
    let mut value = bytes as f64;
    let mut unit = 0;
    while value >= 1024.0 && unit < UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }
    let formatted = format!("{:.2}", value);
    let formatted = formatted.trim_end_matches('0').trim_end_matches('.');
    format!("{} {}", formatted, UNITS[unit])
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FileId(pub String);

impl FileId {
    pub fn new() -> Self {
        Self(uuid::Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for FileId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for FileId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Coarse document family, used for listing hints.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FileKind {
    Pdf,
    Word,
    Presentation,
    Other,
}

impl FileKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            FileKind::Pdf => "pdf",
            FileKind::Word => "word",
            FileKind::Presentation => "presentation",
            FileKind::Other => "other",
        }
    }
}

/// A file selected by the user, held in memory as a base64 data URL.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UploadedFile {
    pub id: FileId,
    pub name: String,
    pub media_type: String,
    /// `data:<media type>;base64,<payload>`
    pub encoded: String,
    pub size: u64,
}

impl UploadedFile {
    pub fn from_bytes(name: impl Into<String>, declared_type: &str, bytes: &[u8]) -> Self {
        let media_type = if declared_type.trim().is_empty() {
            DEFAULT_MEDIA_TYPE.to_string()
        } else {
            declared_type.trim().to_string()
        };
        let encoded = format!("data:{};base64,{}", media_type, STANDARD.encode(bytes));
        Self {
            id: FileId::new(),
            name: name.into(),
            media_type,
            encoded,
            size: bytes.len() as u64,
        }
    }

    /// Base64 payload without the data URL header.
    pub fn payload(&self) -> &str {
        self.encoded
            .split_once(',')
            .map(|(_, data)| data)
            .unwrap_or("")
    }

    pub fn decode(&self) -> Result<Vec<u8>> {
        STANDARD
            .decode(self.payload())
            .map_err(|e| CoreError::Encoding(format!("{}: {}", self.name, e)))
    }

    pub fn is_supported(&self) -> bool {
        is_supported_media_type(&self.media_type)
    }

    pub fn kind(&self) -> FileKind {
        let mt = self.media_type.as_str();
        if mt.contains("pdf") {
            FileKind::Pdf
        } else if mt.contains("word") || mt.contains("docx") {
            FileKind::Word
        } else if mt.contains("presentation") || mt.contains("pptx") {
            FileKind::Presentation
        } else {
            FileKind::Other
        }
    }

    pub fn formatted_size(&self) -> String {
        format_size(self.size)
    }
}

/// Read one file from disk, declaring its media type from the extension.
pub async fn read_file(path: &Path) -> Result<UploadedFile> {
    let name = path
        .file_name()
        .and_then(|n| n.to_str())
        .ok_or_else(|| CoreError::Ingest(format!("invalid file name: {}", path.display())))?
        .to_string();
    let bytes = tokio::fs::read(path)
        .await
        .map_err(|e| CoreError::Ingest(format!("{}: {}", path.display(), e)))?;
    Ok(UploadedFile::from_bytes(name, media_type_for_path(path), &bytes))
}

/// Ingest a pending selection. Files are read concurrently; the result keeps
/// selection order. The selection is emptied so the same paths can be picked
/// again later.
pub async fn ingest(selection: &mut Vec<PathBuf>) -> Result<Vec<UploadedFile>> {
    let paths = std::mem::take(selection);
    futures::future::try_join_all(paths.iter().map(|p| read_file(p))).await
}
