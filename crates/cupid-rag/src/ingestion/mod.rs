//! Corpus ingestion: parsing the categorized Q/A file and building the index

mod builder;
mod parser;

pub use builder::KnowledgeIndexBuilder;
pub use parser::{CorpusParser, ParsedCorpus};
