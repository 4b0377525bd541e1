pub mod clipboard;
pub mod config;
pub mod error;
pub mod export;
pub mod gateway;
pub mod prompt;
pub mod study;

pub use clipboard::ClipboardSink;
pub use config::{LlmProvider, RuntimeConfig};
pub use error::{Result, RuntimeError};
pub use export::{DocumentExporter, ExportOptions, HtmlExporter, PageBreakMode};
pub use gateway::ModelGateway;
pub use prompt::{compose, ComposedRequest};
pub use study::StudySession;
