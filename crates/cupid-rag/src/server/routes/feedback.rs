//! Feedback endpoint

use axum::{extract::State, Json};

use crate::error::Result;
use crate::learning::FeedbackRecord;
use crate::server::state::AppState;
use crate::types::{FeedbackAck, FeedbackRequest};

pub const FEEDBACK_ACK: &str = "Phản hồi đã được ghi nhận. Cảm ơn bạn!";

/// POST /feedback - Record whether an answer helped
pub async fn submit_feedback(
    State(state): State<AppState>,
    Json(request): Json<FeedbackRequest>,
) -> Result<Json<FeedbackAck>> {
    tracing::info!(
        "Feedback received - answer_id={}, is_satisfied={}",
        request.answer_id,
        request.is_satisfied
    );

    state
        .feedback()
        .append(FeedbackRecord::from_request(request))
        .await?;

    Ok(Json(FeedbackAck {
        message: FEEDBACK_ACK.to_string(),
    }))
}
