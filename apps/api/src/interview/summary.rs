//! End-of-interview summary over all recorded answers.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::interview::prompts::{SUMMARY_PROMPT_TEMPLATE, SUMMARY_SYSTEM};
use crate::llm_client::{complete_json, LanguageModel, LlmError};

const UNNAMED_CANDIDATE: &str = "the candidate";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FinalSummaryRequest {
    pub candidate: Option<Value>,
}

/// Response body of `POST /api/final-summary`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FinalSummary {
    pub final_score_percent: f64,
    pub summary: String,
}

/// Returns the candidate's `answers` array, or `None` when absent or not an array.
pub fn candidate_answers(candidate: &Value) -> Option<&Vec<Value>> {
    candidate.get("answers").and_then(Value::as_array)
}

pub fn build_summary_prompt(name: &str, answers: &[Value]) -> Result<String, serde_json::Error> {
    let answers_json = serde_json::to_string_pretty(answers)?;
    Ok(SUMMARY_PROMPT_TEMPLATE
        .replace("{name}", name)
        .replace("{answers_json}", &answers_json))
}

pub async fn summarize(
    llm: &dyn LanguageModel,
    name: Option<&str>,
    answers: &[Value],
) -> Result<FinalSummary, LlmError> {
    let name = name
        .map(str::trim)
        .filter(|n| !n.is_empty())
        .unwrap_or(UNNAMED_CANDIDATE);
    let prompt = build_summary_prompt(name, answers)
        .map_err(|e| LlmError::Shape(format!("answers could not be serialized: {e}")))?;
    let value = complete_json(llm, &prompt, SUMMARY_SYSTEM).await?;
    parse_summary(value)
}

pub fn parse_summary(value: Value) -> Result<FinalSummary, LlmError> {
    let summary: FinalSummary =
        serde_json::from_value(value).map_err(|e| LlmError::Shape(format!("summary: {e}")))?;
    if !summary.final_score_percent.is_finite() {
        return Err(LlmError::Shape(
            "summary: finalScorePercent is not a number".to_string(),
        ));
    }
    Ok(FinalSummary {
        final_score_percent: summary.final_score_percent.clamp(0.0, 100.0),
        summary: summary.summary,
    })
}
