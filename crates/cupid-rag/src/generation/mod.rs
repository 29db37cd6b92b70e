//! Answer generation: the Ollama client, prompts and the answer pipeline

pub mod ollama;
pub mod prompt;
pub mod synthesizer;

pub use ollama::OllamaClient;
pub use prompt::{PromptBuilder, INSUFFICIENT_INFO};
pub use synthesizer::{AnswerSynthesizer, PipelineSettings};
