//! LLM provider boundary: a single non-streaming generation capability,
//! implemented against the Gemini REST API.

mod gemini;
pub mod prompt;
mod provider;

pub use gemini::GeminiProvider;
pub use provider::LlmProvider;
