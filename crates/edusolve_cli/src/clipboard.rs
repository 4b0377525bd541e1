//! System clipboard sink.

use edusolve_runtime::{ClipboardSink, RuntimeError};

pub struct SystemClipboard;

impl ClipboardSink for SystemClipboard {
    fn set_text(&self, text: &str) -> edusolve_runtime::Result<()> {
        cli_clipboard::set_contents(text.to_string())
            .map_err(|e| RuntimeError::Clipboard(e.to_string()))
    }
}
