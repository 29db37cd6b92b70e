//! Answer endpoint

use axum::{extract::State, Json};

use crate::server::state::AppState;
use crate::types::{AnswerResponse, QuestionRequest};

/// POST /answer - Answer a question
///
/// Always 200: empty questions and downstream failures come back as
/// user-facing messages in `answer`.
pub async fn answer(
    State(state): State<AppState>,
    Json(request): Json<QuestionRequest>,
) -> Json<AnswerResponse> {
    Json(state.synthesizer().answer(&request).await)
}
