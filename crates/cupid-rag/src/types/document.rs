//! Knowledge documents and search hits

use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Category assigned to Q/A pairs that precede any `[category]` marker
pub const UNKNOWN_CATEGORY: &str = "unknown";

/// A categorized question/answer pair from the knowledge corpus
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    /// Question text (the embedded part)
    pub question: String,
    /// Answer text
    pub answer: String,
    /// Corpus category label
    pub category: String,
}

impl Document {
    pub fn new(
        question: impl Into<String>,
        answer: impl Into<String>,
        category: impl Into<String>,
    ) -> Self {
        Self {
            question: question.into(),
            answer: answer.into(),
            category: category.into(),
        }
    }

    /// Both question and answer carry text
    pub fn is_complete(&self) -> bool {
        !self.question.trim().is_empty() && !self.answer.trim().is_empty()
    }

    /// Render as a single context line for the synthesis prompt
    pub fn to_context_line(&self) -> String {
        format!("Q: {} | A: {}", self.question, self.answer)
    }
}

/// A document returned by similarity search
#[derive(Debug, Clone)]
pub struct SearchHit {
    /// Shared reference into the knowledge index
    pub document: Arc<Document>,
    /// Cosine similarity to the query
    pub score: f32,
}
