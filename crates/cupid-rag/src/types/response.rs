//! Response payloads

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Source tag attached to answers synthesized from retrieved documents
pub const RETRIEVAL_SOURCE: &str = "Retrieval";

/// Structured filter criteria pulled out of a question
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtractedSlots {
    pub min_age: Option<i64>,
    pub max_age: Option<i64>,
    /// Canonical region name
    pub location: Option<String>,
}

impl ExtractedSlots {
    /// No slot carries a value
    pub fn is_empty(&self) -> bool {
        self.min_age.is_none() && self.max_age.is_none() && self.location.is_none()
    }
}

/// Body returned from `POST /answer`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnswerResponse {
    /// Join key for feedback; absent only for rejected input
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub answer_id: Option<Uuid>,
    pub answer: String,
    #[serde(default)]
    pub sources: Vec<String>,
    #[serde(default)]
    pub is_exact: bool,
    #[serde(default)]
    pub filter: Option<ExtractedSlots>,
}

impl AnswerResponse {
    /// Plain answer with a fresh identifier
    pub fn new(answer: impl Into<String>) -> Self {
        Self {
            answer_id: Some(Uuid::new_v4()),
            answer: answer.into(),
            sources: Vec::new(),
            is_exact: false,
            filter: None,
        }
    }

    /// Validation message, no identifier
    pub fn rejected(answer: impl Into<String>) -> Self {
        Self {
            answer_id: None,
            ..Self::new(answer)
        }
    }

    /// Answer grounded on retrieved documents
    pub fn from_retrieval(answer: impl Into<String>) -> Self {
        Self {
            sources: vec![RETRIEVAL_SOURCE.to_string()],
            ..Self::new(answer)
        }
    }

    /// Exact answer produced by the match service
    pub fn from_matches(answer: impl Into<String>, filter: ExtractedSlots) -> Self {
        Self {
            is_exact: true,
            filter: Some(filter),
            ..Self::new(answer)
        }
    }
}

/// Body returned from `POST /feedback`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeedbackAck {
    pub message: String,
}
