// All LLM prompt constants for the interview module.
// Templates use `{placeholder}` markers filled with `str::replace` before sending.

/// System prompt for question generation; demands a bare JSON array.
pub const QUESTIONS_SYSTEM: &str = "You are a senior technical interviewer. \
    You write concise interview questions that can be answered in plain text. \
    You MUST respond with a valid JSON array only. \
    Do NOT use markdown code fences. \
    Do NOT include explanations.";

/// Replace `{role}` and `{stack}` before sending.
pub const QUESTIONS_PROMPT_TEMPLATE: &str = r#"Generate exactly 6 technical interview questions for a {role} position.
The candidate works with: {stack}.

Difficulty mix (in this order):
- 2 "easy" questions, answerable in about 20 seconds
- 2 "medium" questions, answerable in about 60 seconds
- 2 "hard" questions, answerable in about 120 seconds

Return a JSON array with this EXACT schema and nothing else:
[
  {"id": "q1", "difficulty": "easy", "text": "..."}
]

RULES:
1. "difficulty" is one of "easy", "medium", "hard".
2. Ids are "q1" through "q6".
3. Each question is a single sentence or two; no multiple choice, no code to write."#;

/// System prompt for grading a single answer.
pub const GRADE_SYSTEM: &str = "You are a strict but fair technical interviewer grading one answer. \
    You MUST respond with a single valid JSON object only. \
    Do NOT use markdown code fences. \
    Do NOT include explanations outside the JSON.";

/// Replace `{question}` and `{answer}` before sending.
pub const GRADE_PROMPT_TEMPLATE: &str = r#"Grade the candidate's answer to the interview question below.

QUESTION:
{question}

CANDIDATE ANSWER:
{answer}

Return a JSON object with this EXACT schema:
{"score": 7, "feedback": "One or two sentences of specific feedback."}

RULES:
1. "score" is an integer from 0 (no answer or wrong) to 10 (complete and precise).
2. An empty answer or a timeout marker scores 0.
3. Feedback names what was missing or wrong."#;

/// System prompt for the end-of-interview summary.
pub const SUMMARY_SYSTEM: &str = "You are a hiring panel lead writing an interview debrief. \
    You MUST respond with a single valid JSON object only. \
    Do NOT use markdown code fences.";

/// Replace `{name}` and `{answers_json}` before sending.
pub const SUMMARY_PROMPT_TEMPLATE: &str = r#"Summarize the mock technical interview of {name}.

Answers, in the order they were given (with per-answer scores when available):
{answers_json}

Return a JSON object with this EXACT schema:
{"finalScorePercent": 72, "summary": "A short paragraph on strengths, weaknesses and a hiring recommendation."}

RULES:
1. "finalScorePercent" is an integer from 0 to 100 reflecting overall performance.
2. Harder questions weigh more than easy ones.
3. Auto-submitted (timed out) answers count as unanswered."#;
