pub mod gemini;
pub mod zai;

pub use gemini::GeminiProvider;
pub use zai::ZaiProvider;
