//! cupid-rag: retrieval-augmented answers for a dating-advice assistant
//!
//! Questions are routed by keyword rules, answered from a categorized Q/A
//! knowledge base through semantic search and an Ollama-hosted model, or, for
//! `filter` requests, turned into age/location criteria for an external match
//! service. User feedback on answers is appended to a durable JSON log.

pub mod config;
pub mod error;
pub mod extraction;
pub mod generation;
pub mod ingestion;
pub mod learning;
pub mod providers;
pub mod retrieval;
pub mod routing;
pub mod server;
pub mod types;

pub use config::RagConfig;
pub use error::{Error, Result};
pub use generation::AnswerSynthesizer;
pub use types::{
    document::{Document, SearchHit},
    request::{FeedbackRequest, QuestionRequest},
    response::{AnswerResponse, ExtractedSlots},
};
