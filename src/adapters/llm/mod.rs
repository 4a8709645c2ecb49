//! LLM provider adapters.

mod gemini;
mod mock;

pub use gemini::{GeminiConfig, GeminiProvider};
pub use mock::{MockError, MockLlmProvider, MockReply};
