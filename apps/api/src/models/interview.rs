use serde::{Deserialize, Serialize};

/// Question difficulty tier. Drives the per-question time budget.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

impl Difficulty {
    /// Seconds allowed to answer a question of this tier.
    pub fn budget_seconds(self) -> u32 {
        match self {
            Difficulty::Easy => 20,
            Difficulty::Medium => 60,
            Difficulty::Hard => 120,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Question {
    pub id: String,
    pub difficulty: Difficulty,
    pub text: String,
}

/// One recorded response. `score`/`feedback` stay `None` until grading succeeds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Answer {
    pub question_id: String,
    pub question_text: String,
    pub difficulty: Difficulty,
    pub response_text: String,
    pub time_taken_seconds: u32,
    pub auto_submitted: bool,
    pub score: Option<f64>,
    pub feedback: Option<String>,
}
