//! API routes for the answer server

pub mod answer;
pub mod feedback;

use axum::{routing::post, Router};
use crate::server::state::AppState;

/// Build all API routes
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/answer", post(answer::answer))
        .route("/feedback", post(feedback::submit_feedback))
}
