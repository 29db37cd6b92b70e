//! Request payloads for the HTTP surface

use serde::{Deserialize, Serialize};
use std::fmt;

/// Caller identity forwarded to the match service, as sent by the client
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum UserId {
    Int(i64),
    Text(String),
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UserId::Int(id) => write!(f, "{}", id),
            UserId::Text(id) => f.write_str(id),
        }
    }
}

/// Body of `POST /answer`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuestionRequest {
    /// Free-text question
    #[serde(default)]
    pub question: String,
    /// Optional caller identity
    #[serde(default, rename = "userId")]
    pub user_id: Option<UserId>,
}

impl QuestionRequest {
    pub fn new(question: impl Into<String>) -> Self {
        Self {
            question: question.into(),
            user_id: None,
        }
    }

    pub fn with_user(mut self, user_id: UserId) -> Self {
        self.user_id = Some(user_id);
        self
    }
}

/// Body of `POST /feedback`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeedbackRequest {
    pub answer_id: String,
    pub is_satisfied: bool,
    #[serde(default)]
    pub comment: Option<String>,
    pub question: String,
    pub answer: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_id_accepts_string_or_int() {
        let req: QuestionRequest = serde_json::from_str(r#"{"question":"hi","userId":42}"#).unwrap();
        assert_eq!(req.user_id, Some(UserId::Int(42)));

        let req: QuestionRequest = serde_json::from_str(r#"{"question":"hi","userId":"u1"}"#).unwrap();
        assert_eq!(req.user_id, Some(UserId::Text("u1".to_string())));

        let req: QuestionRequest = serde_json::from_str(r#"{"question":"hi"}"#).unwrap();
        assert!(req.user_id.is_none());
    }

    #[test]
    fn test_feedback_comment_optional() {
        let req: FeedbackRequest = serde_json::from_str(
            r#"{"answer_id":"abc","is_satisfied":true,"question":"q","answer":"a"}"#,
        )
        .unwrap();
        assert!(req.comment.is_none());
        assert!(req.is_satisfied);
    }
}
