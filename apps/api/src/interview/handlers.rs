//! Axum route handlers for the interview API.

use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};
use tracing::info;

use crate::errors::AppError;
use crate::interview::grading::{grade_answer, Grade, GradeAnswerRequest};
use crate::interview::questions::{
    generate_questions, GenerateQuestionsRequest, GenerateQuestionsResponse,
};
use crate::interview::summary::{candidate_answers, summarize, FinalSummary, FinalSummaryRequest};
use crate::state::AppState;

/// POST /api/generate-questions
///
/// Body is optional; role and stack fall back to defaults.
pub async fn handle_generate_questions(
    State(state): State<AppState>,
    body: Option<Json<GenerateQuestionsRequest>>,
) -> Result<Json<GenerateQuestionsResponse>, AppError> {
    let request = body.map(|Json(r)| r).unwrap_or_default();
    let (role, stack) = request.resolved();

    let questions = generate_questions(state.llm.as_ref(), &role, &stack)
        .await
        .map_err(|e| AppError::Llm(format!("Question generation failed: {e}")))?;

    Ok(Json(GenerateQuestionsResponse { questions }))
}

/// POST /api/grade-answer
pub async fn handle_grade_answer(
    State(state): State<AppState>,
    body: Result<Json<GradeAnswerRequest>, JsonRejection>,
) -> Result<Json<Grade>, AppError> {
    let Json(request) = body?;
    let question = required(request.question.as_deref(), "question")?;
    let answer = required(request.answer.as_deref(), "answer")?;

    let grade = grade_answer(state.llm.as_ref(), question, answer)
        .await
        .map_err(|e| AppError::Llm(format!("Grading failed: {e}")))?;

    info!("Answer graded: score={}", grade.score);
    Ok(Json(grade))
}

/// POST /api/final-summary
pub async fn handle_final_summary(
    State(state): State<AppState>,
    body: Result<Json<FinalSummaryRequest>, JsonRejection>,
) -> Result<Json<FinalSummary>, AppError> {
    let Json(request) = body?;
    let candidate = request
        .candidate
        .ok_or_else(|| AppError::Validation("candidate is required".to_string()))?;
    let answers = candidate_answers(&candidate)
        .ok_or_else(|| AppError::Validation("candidate.answers must be an array".to_string()))?;
    let name = candidate.get("name").and_then(|n| n.as_str());

    let summary = summarize(state.llm.as_ref(), name, answers)
        .await
        .map_err(|e| AppError::Llm(format!("Summary failed: {e}")))?;

    info!(
        "Final summary produced over {} answers: {}%",
        answers.len(),
        summary.final_score_percent
    );
    Ok(Json(summary))
}

fn required<'a>(value: Option<&'a str>, field: &str) -> Result<&'a str, AppError> {
    value
        .filter(|v| !v.trim().is_empty())
        .ok_or_else(|| AppError::Validation(format!("{field} is required")))
}
