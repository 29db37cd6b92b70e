//! Feedback capture keyed by answer id

pub mod feedback;

pub use feedback::{FeedbackRecord, FeedbackStore};
