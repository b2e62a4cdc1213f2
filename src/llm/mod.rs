pub mod gemini;
pub mod provider;
pub mod types;

pub use gemini::{GeminiClient, GeminiFactory};
pub use provider::{ClientFactory, GenerationClient};
pub use types::{ChatMessage, GenerationResponse, InlineData};
