//! Question generation: six questions per candidate, two per difficulty tier.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{info, warn};

use crate::interview::prompts::{QUESTIONS_PROMPT_TEMPLATE, QUESTIONS_SYSTEM};
use crate::llm_client::{complete_json, LanguageModel, LlmError};
use crate::models::interview::{Difficulty, Question};

/// Every interview has exactly this many questions.
pub const QUESTION_COUNT: usize = 6;

pub const DEFAULT_ROLE: &str = "Full Stack Developer";
pub const DEFAULT_STACK: &[&str] = &["React", "Node.js"];

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GenerateQuestionsRequest {
    pub role: Option<String>,
    pub stack: Option<Vec<String>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerateQuestionsResponse {
    pub questions: Vec<Question>,
}

/// Shape the model is asked for. `id` is optional and may come back as a number.
#[derive(Debug, Deserialize)]
struct GeneratedQuestion {
    id: Option<Value>,
    difficulty: Difficulty,
    text: String,
}

impl GenerateQuestionsRequest {
    /// Role and stack with defaults applied for absent or blank values.
    pub fn resolved(&self) -> (String, Vec<String>) {
        let role = self
            .role
            .as_deref()
            .map(str::trim)
            .filter(|r| !r.is_empty())
            .unwrap_or(DEFAULT_ROLE)
            .to_string();

        let stack: Vec<String> = self
            .stack
            .iter()
            .flatten()
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();
        let stack = if stack.is_empty() {
            DEFAULT_STACK.iter().map(|s| s.to_string()).collect()
        } else {
            stack
        };

        (role, stack)
    }
}

pub fn build_questions_prompt(role: &str, stack: &[String]) -> String {
    QUESTIONS_PROMPT_TEMPLATE
        .replace("{role}", role)
        .replace("{stack}", &stack.join(", "))
}

/// Asks the model for the question set and validates it.
pub async fn generate_questions(
    llm: &dyn LanguageModel,
    role: &str,
    stack: &[String],
) -> Result<Vec<Question>, LlmError> {
    info!("Generating {} questions for role '{}'", QUESTION_COUNT, role);
    let prompt = build_questions_prompt(role, stack);
    let value = complete_json(llm, &prompt, QUESTIONS_SYSTEM).await?;
    parse_questions(value)
}

/// Decodes the salvaged reply. Accepts a bare array or `{"questions": [...]}`;
/// anything other than exactly six well-formed questions is rejected.
pub fn parse_questions(value: Value) -> Result<Vec<Question>, LlmError> {
    let items = match value {
        Value::Array(items) => items,
        Value::Object(mut map) => match map.remove("questions") {
            Some(Value::Array(items)) => items,
            _ => {
                return Err(LlmError::Shape(
                    "expected an array of questions".to_string(),
                ))
            }
        },
        _ => {
            return Err(LlmError::Shape(
                "expected an array of questions".to_string(),
            ))
        }
    };

    if items.len() != QUESTION_COUNT {
        return Err(LlmError::Shape(format!(
            "expected {} questions, got {}",
            QUESTION_COUNT,
            items.len()
        )));
    }

    let questions = items
        .into_iter()
        .enumerate()
        .map(|(i, item)| {
            let generated: GeneratedQuestion = serde_json::from_value(item)
                .map_err(|e| LlmError::Shape(format!("question {}: {e}", i + 1)))?;
            if generated.text.trim().is_empty() {
                return Err(LlmError::Shape(format!("question {} has no text", i + 1)));
            }
            Ok(Question {
                id: question_id(generated.id, i),
                difficulty: generated.difficulty,
                text: generated.text.trim().to_string(),
            })
        })
        .collect::<Result<Vec<_>, _>>()?;

    let per_tier = |d: Difficulty| questions.iter().filter(|q| q.difficulty == d).count();
    if [Difficulty::Easy, Difficulty::Medium, Difficulty::Hard]
        .iter()
        .any(|d| per_tier(*d) != 2)
    {
        warn!(
            "Question mix is off: easy={} medium={} hard={}",
            per_tier(Difficulty::Easy),
            per_tier(Difficulty::Medium),
            per_tier(Difficulty::Hard)
        );
    }

    Ok(questions)
}

fn question_id(id: Option<Value>, index: usize) -> String {
    match id {
        Some(Value::String(s)) if !s.trim().is_empty() => s.trim().to_string(),
        Some(Value::Number(n)) => format!("q{n}"),
        _ => format!("q{}", index + 1),
    }
}
