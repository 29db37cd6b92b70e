//! Provider abstractions for embeddings, chat generation and user matching
//!
//! Each external service sits behind a trait so the pipeline can be driven by
//! Ollama and the HTTP match service in production and by fakes in tests.

pub mod embedding;
pub mod llm;
pub mod match_gateway;
pub mod ollama;

pub use embedding::EmbeddingProvider;
pub use llm::LlmProvider;
pub use match_gateway::{HttpMatchGateway, MatchGateway, MatchedUser};
pub use ollama::{OllamaEmbedder, OllamaLlm, OllamaProvider};
