use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::interview::{Answer, Question};

/// Persisted countdown state for the question currently on screen.
///
/// `remaining` is the number of seconds left as of `last_updated`; the live
/// value is always recomputed from these two fields (see `session::timer`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimerSnapshot {
    pub question_index: usize,
    pub remaining: u32,
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub last_updated: DateTime<Utc>,
}

/// One interview session, created per resume upload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Candidate {
    pub id: Uuid,
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub resume_text: String,
    pub created_at: DateTime<Utc>,
    pub current_index: usize,
    #[serde(default)]
    pub answers: Vec<Answer>,
    pub final_score: Option<f64>,
    pub summary: Option<String>,
    pub timer: Option<TimerSnapshot>,
    #[serde(default)]
    pub paused: bool,
    #[serde(default)]
    pub questions_length: usize,
    #[serde(default)]
    pub questions: Vec<Question>,
}

/// Where a candidate sits in the interview flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionPhase {
    NotStarted,
    Answering(usize),
    /// The answer for this index is recorded but the flow has not advanced yet.
    Grading(usize),
    Summarizing,
    Completed,
}

/// Contact fields a candidate can be missing after resume extraction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ContactField {
    Name,
    Email,
    Phone,
}

impl Candidate {
    pub fn new(
        name: Option<String>,
        email: Option<String>,
        phone: Option<String>,
        resume_text: String,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            name,
            email,
            phone,
            resume_text,
            created_at,
            current_index: 0,
            answers: Vec::new(),
            final_score: None,
            summary: None,
            timer: None,
            paused: false,
            questions_length: 0,
            questions: Vec::new(),
        }
    }

    pub fn is_complete(&self) -> bool {
        self.final_score.is_some()
    }

    /// Started but neither fully answered nor scored.
    pub fn is_unfinished(&self) -> bool {
        self.answers.len() < self.questions_length && self.final_score.is_none()
    }

    pub fn phase(&self) -> SessionPhase {
        if self.questions.is_empty() {
            SessionPhase::NotStarted
        } else if self.is_complete() {
            SessionPhase::Completed
        } else if self.answers.len() > self.current_index {
            SessionPhase::Grading(self.current_index)
        } else if self.current_index >= self.questions.len() {
            SessionPhase::Summarizing
        } else {
            SessionPhase::Answering(self.current_index)
        }
    }

    pub fn current_question(&self) -> Option<&Question> {
        match self.phase() {
            SessionPhase::Answering(i) | SessionPhase::Grading(i) => self.questions.get(i),
            _ => None,
        }
    }

    pub fn missing_fields(&self) -> Vec<ContactField> {
        let blank = |v: &Option<String>| v.as_deref().map_or(true, |s| s.trim().is_empty());
        let mut missing = Vec::new();
        if blank(&self.name) {
            missing.push(ContactField::Name);
        }
        if blank(&self.email) {
            missing.push(ContactField::Email);
        }
        if blank(&self.phone) {
            missing.push(ContactField::Phone);
        }
        missing
    }
}
