pub mod health;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};

use crate::interview::handlers;
use crate::resume::handlers::handle_parse_resume;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    let upload_limit = state.config.max_upload_bytes;

    Router::new()
        .route("/health", get(health::health_handler))
        .route(
            "/api/parse-resume",
            post(handle_parse_resume).layer(DefaultBodyLimit::max(upload_limit)),
        )
        .route(
            "/api/generate-questions",
            post(handlers::handle_generate_questions),
        )
        .route("/api/grade-answer", post(handlers::handle_grade_answer))
        .route("/api/final-summary", post(handlers::handle_final_summary))
        .with_state(state)
}
