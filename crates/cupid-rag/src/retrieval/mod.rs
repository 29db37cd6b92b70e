//! Retrieval: the knowledge index, its result cache and async search

pub mod cache;
pub mod index;
pub mod search;

pub use cache::{CacheStats, QueryCache};
pub use index::{cosine_similarity, KnowledgeIndex};
pub use search::SemanticSearch;
