//! Core types for the answer service

pub mod document;
pub mod request;
pub mod response;

pub use document::{Document, SearchHit, UNKNOWN_CATEGORY};
pub use request::{FeedbackRequest, QuestionRequest, UserId};
pub use response::{AnswerResponse, ExtractedSlots, FeedbackAck, RETRIEVAL_SOURCE};
