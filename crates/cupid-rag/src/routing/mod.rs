//! Rule-based routing of incoming questions
//!
//! Decides, without touching any model, whether a question gets a canned
//! reply, which knowledge category it belongs to, and whether it is a filter
//! request for the match service.

pub mod classifier;
pub mod quick;

pub use classifier::{Category, CategoryClassifier};
pub use quick::quick_response;

/// Case-insensitive prefix check for the filter marker
pub fn is_filter_request(question: &str, marker: &str) -> bool {
    !marker.is_empty() && question.trim().to_lowercase().starts_with(&marker.to_lowercase())
}
