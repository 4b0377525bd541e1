pub mod chat;
pub mod document;
pub mod error;
pub mod file;
pub mod session;

pub use chat::{ChatMessage, ChatRole};
pub use document::{parse_solution, Block, CodeSegment, Inline, Visibility};
pub use error::{CoreError, Result};
pub use file::{FileId, FileKind, UploadedFile};
pub use session::{SessionStatus, Solution};
