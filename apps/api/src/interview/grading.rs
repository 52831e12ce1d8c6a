//! Per-answer grading.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::interview::prompts::{GRADE_PROMPT_TEMPLATE, GRADE_SYSTEM};
use crate::llm_client::{complete_json, LanguageModel, LlmError};

pub const MAX_SCORE: f64 = 10.0;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GradeAnswerRequest {
    pub question: Option<String>,
    pub answer: Option<String>,
}

/// Response body of `POST /api/grade-answer`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Grade {
    pub score: f64,
    pub feedback: String,
}

pub fn build_grade_prompt(question: &str, answer: &str) -> String {
    GRADE_PROMPT_TEMPLATE
        .replace("{question}", question)
        .replace("{answer}", answer)
}

pub async fn grade_answer(
    llm: &dyn LanguageModel,
    question: &str,
    answer: &str,
) -> Result<Grade, LlmError> {
    let prompt = build_grade_prompt(question, answer);
    let value = complete_json(llm, &prompt, GRADE_SYSTEM).await?;
    parse_grade(value)
}

/// Fails closed on a missing or non-numeric score; out-of-range scores are clamped.
pub fn parse_grade(value: Value) -> Result<Grade, LlmError> {
    let grade: Grade =
        serde_json::from_value(value).map_err(|e| LlmError::Shape(format!("grade: {e}")))?;
    if !grade.score.is_finite() {
        return Err(LlmError::Shape("grade: score is not a number".to_string()));
    }
    Ok(Grade {
        score: grade.score.clamp(0.0, MAX_SCORE),
        feedback: grade.feedback,
    })
}
