//! Clipboard seam. The terminal front-end plugs in the system clipboard;
//! tests use an in-memory sink.

use crate::error::Result;

pub trait ClipboardSink: Send + Sync {
    fn set_text(&self, text: &str) -> Result<()>;
}
