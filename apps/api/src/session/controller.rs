//! Interview flow for one or more candidates.
//!
//! NotStarted → Answering(i) → Grading(i) → Answering(i + 1) | Summarizing → Completed,
//! with an orthogonal pause flag. Every state change goes through
//! `CandidateStore::update`, so each mutation is persisted before the next
//! suspension point.

use std::future::Future;
use std::sync::Arc;

use tokio_util::sync::CancellationToken;
use tracing::{info, warn};
use uuid::Uuid;

use crate::interview::questions::QUESTION_COUNT;
use crate::models::candidate::{Candidate, ContactField, SessionPhase, TimerSnapshot};
use crate::models::interview::Answer;
use crate::session::backend::{BackendError, InterviewBackend};
use crate::session::store::CandidateStore;
use crate::session::timer::{remaining_for, Clock};
use crate::session::SessionError;

/// Response text recorded when the countdown runs out.
pub const TIMEOUT_SENTINEL: &str = "[No answer - time expired]";

/// Where the flow went after an answer was recorded.
#[derive(Debug, Clone, PartialEq)]
pub enum Advance {
    NextQuestion(usize),
    Completed { final_score: f64 },
    /// All answers are in but the summary call failed; the candidate stays unscored.
    SummaryFailed,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SubmitOutcome {
    pub answer: Answer,
    pub advance: Advance,
}

#[derive(Debug, Clone, PartialEq)]
pub enum PollOutcome {
    /// No question is on screen.
    Idle,
    Paused { remaining: u32 },
    Running { remaining: u32 },
    AutoSubmitted(SubmitOutcome),
}

pub struct InterviewController {
    store: CandidateStore,
    backend: Arc<dyn InterviewBackend>,
    clock: Arc<dyn Clock>,
    cancel: CancellationToken,
    resume_offered: bool,
}

impl InterviewController {
    pub fn new(
        store: CandidateStore,
        backend: Arc<dyn InterviewBackend>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            store,
            backend,
            clock,
            cancel: CancellationToken::new(),
            resume_offered: false,
        }
    }

    pub fn store(&self) -> &CandidateStore {
        &self.store
    }

    pub fn candidate(&self, id: Uuid) -> Result<&Candidate, SessionError> {
        self.store.get(id).ok_or(SessionError::NotFound(id))
    }

    /// Cancels every in-flight and future backend call. Call on teardown.
    pub fn shutdown(&self) {
        self.cancel.cancel();
    }

    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    /// The first unfinished candidate, returned only on the first call.
    pub fn take_resume_offer(&mut self) -> Option<Uuid> {
        if self.resume_offered {
            return None;
        }
        self.resume_offered = true;
        self.store.unfinished().next().map(|c| c.id)
    }

    /// Uploads a resume and creates the candidate from the extracted fields.
    pub async fn upload_resume(
        &mut self,
        filename: &str,
        bytes: Vec<u8>,
    ) -> Result<Uuid, SessionError> {
        let parsed = race(&self.cancel, self.backend.parse_resume(filename, bytes)).await?;

        let candidate = Candidate::new(
            parsed.name,
            parsed.email,
            parsed.phone,
            parsed.text,
            self.clock.now(),
        );
        let id = candidate.id;
        self.store.insert(candidate)?;

        info!("Candidate {} created from '{}'", id, filename);
        Ok(id)
    }

    pub fn missing_fields(&self, id: Uuid) -> Result<Vec<ContactField>, SessionError> {
        Ok(self.candidate(id)?.missing_fields())
    }

    /// Fills contact fields the extractor could not find. `None` leaves a field as is.
    /// Returns the fields that are still missing.
    pub fn complete_profile(
        &mut self,
        id: Uuid,
        name: Option<String>,
        email: Option<String>,
        phone: Option<String>,
    ) -> Result<Vec<ContactField>, SessionError> {
        let clean = |v: Option<String>| {
            v.map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
        };
        let (name, email, phone) = (clean(name), clean(email), clean(phone));

        let candidate = self.store.update(id, |c| {
            if name.is_some() {
                c.name = name;
            }
            if email.is_some() {
                c.email = email;
            }
            if phone.is_some() {
                c.phone = phone;
            }
        })?;
        Ok(candidate.missing_fields())
    }

    /// Fetches the question set and starts the first countdown.
    pub async fn start_interview(
        &mut self,
        id: Uuid,
        role: Option<&str>,
        stack: &[String],
    ) -> Result<(), SessionError> {
        let candidate = self.candidate(id)?;
        if candidate.phase() != SessionPhase::NotStarted {
            return Err(SessionError::Validation(
                "interview already started".to_string(),
            ));
        }
        let missing = candidate.missing_fields();
        if !missing.is_empty() {
            return Err(SessionError::Validation(format!(
                "missing contact fields: {missing:?}"
            )));
        }

        let questions = race(&self.cancel, self.backend.generate_questions(role, stack)).await?;
        if questions.len() != QUESTION_COUNT {
            return Err(SessionError::Backend(BackendError::Invalid(format!(
                "expected {} questions, got {}",
                QUESTION_COUNT,
                questions.len()
            ))));
        }

        let now = self.clock.now();
        self.store.update(id, |c| {
            c.timer = Some(TimerSnapshot::start(0, questions[0].difficulty, now));
            c.questions_length = questions.len();
            c.questions = questions;
            c.current_index = 0;
            c.answers.clear();
            c.paused = false;
        })?;

        info!("Interview started for candidate {}", id);
        Ok(())
    }

    /// Seconds left on the current question, recomputed from the stored snapshot.
    pub fn remaining(&self, id: Uuid) -> Result<Option<u32>, SessionError> {
        let candidate = self.candidate(id)?;
        match candidate.phase() {
            SessionPhase::Answering(_) => Ok(remaining_for(candidate, self.clock.now())),
            _ => Ok(None),
        }
    }

    /// Freezes the countdown. Pausing an already paused candidate changes nothing.
    pub fn pause(&mut self, id: Uuid) -> Result<(), SessionError> {
        let candidate = self.candidate(id)?;
        if candidate.paused || !matches!(candidate.phase(), SessionPhase::Answering(_)) {
            return Ok(());
        }

        let now = self.clock.now();
        self.store.update(id, |c| {
            c.timer = c.timer.as_ref().map(|t| t.frozen_at(now));
            c.paused = true;
        })?;
        Ok(())
    }

    /// Restarts the countdown from where it was frozen. Idempotent.
    pub fn resume(&mut self, id: Uuid) -> Result<(), SessionError> {
        if !self.candidate(id)?.paused {
            return Ok(());
        }

        let now = self.clock.now();
        self.store.update(id, |c| {
            c.timer = c.timer.as_ref().map(|t| t.resumed_at(now));
            c.paused = false;
        })?;
        Ok(())
    }

    /// Manual submission: needs text, an unpaused clock and time left.
    pub async fn submit_answer(
        &mut self,
        id: Uuid,
        response_text: &str,
    ) -> Result<SubmitOutcome, SessionError> {
        let candidate = self.candidate(id)?;
        let index = match candidate.phase() {
            SessionPhase::Answering(i) => i,
            other => {
                return Err(SessionError::Validation(format!(
                    "no question awaiting an answer ({other:?})"
                )))
            }
        };

        let response_text = response_text.trim();
        if response_text.is_empty() {
            return Err(SessionError::Validation("answer cannot be empty".to_string()));
        }
        if candidate.paused {
            return Err(SessionError::Validation("interview is paused".to_string()));
        }

        self.sync_timer(id, index)?;
        let candidate = self.candidate(id)?;
        let remaining = remaining_for(candidate, self.clock.now()).unwrap_or(0);
        if remaining == 0 {
            return Err(SessionError::Validation("time is up".to_string()));
        }

        let budget = candidate.questions[index].difficulty.budget_seconds();
        self.record_and_advance(
            id,
            index,
            response_text.to_string(),
            false,
            budget.saturating_sub(remaining),
        )
        .await
    }

    /// Checks the countdown; auto-submits the current question when it hits zero.
    pub async fn poll(&mut self, id: Uuid) -> Result<PollOutcome, SessionError> {
        let candidate = self.candidate(id)?;
        let index = match candidate.phase() {
            SessionPhase::Answering(i) => i,
            _ => return Ok(PollOutcome::Idle),
        };

        let difficulty = candidate.questions[index].difficulty;
        self.sync_timer(id, index)?;

        let candidate = self.candidate(id)?;
        let remaining = remaining_for(candidate, self.clock.now()).unwrap_or(0);
        if candidate.paused {
            return Ok(PollOutcome::Paused { remaining });
        }
        if remaining > 0 {
            return Ok(PollOutcome::Running { remaining });
        }

        info!("Time expired on candidate {} question {}", id, index);
        let outcome = self
            .record_and_advance(
                id,
                index,
                TIMEOUT_SENTINEL.to_string(),
                true,
                difficulty.budget_seconds(),
            )
            .await?;
        Ok(PollOutcome::AutoSubmitted(outcome))
    }

    /// Moves a candidate past a grading step that never finished (e.g. the
    /// previous run exited mid-request). The answer keeps a null score.
    pub async fn recover(&mut self, id: Uuid) -> Result<SessionPhase, SessionError> {
        if let SessionPhase::Grading(index) = self.candidate(id)?.phase() {
            warn!(
                "Candidate {} was interrupted while grading question {}",
                id, index
            );
            self.advance(id, index).await?;
        }
        Ok(self.candidate(id)?.phase())
    }

    /// Restarts the countdown when the stored snapshot is missing or belongs to
    /// another question, so the remaining time never exceeds the current budget.
    fn sync_timer(&mut self, id: Uuid, index: usize) -> Result<(), SessionError> {
        let candidate = self.candidate(id)?;
        let difficulty = candidate.questions[index].difficulty;
        let timer_matches = candidate.timer.as_ref().is_some_and(|t| {
            t.question_index == index && t.remaining <= difficulty.budget_seconds()
        });
        if timer_matches {
            return Ok(());
        }

        let now = self.clock.now();
        warn!("Timer for candidate {} question {} reset", id, index);
        self.store.update(id, |c| {
            c.timer = Some(TimerSnapshot::start(index, difficulty, now));
        })?;
        Ok(())
    }

    async fn record_and_advance(
        &mut self,
        id: Uuid,
        index: usize,
        response_text: String,
        auto_submitted: bool,
        time_taken_seconds: u32,
    ) -> Result<SubmitOutcome, SessionError> {
        let candidate = self.candidate(id)?;
        if candidate.answers.len() != index {
            return Err(SessionError::Validation(format!(
                "question {} cannot be answered with {} answers recorded",
                index,
                candidate.answers.len()
            )));
        }
        let question = candidate.questions[index].clone();
        let answer = Answer {
            question_id: question.id.clone(),
            question_text: question.text.clone(),
            difficulty: question.difficulty,
            response_text,
            time_taken_seconds,
            auto_submitted,
            score: None,
            feedback: None,
        };
        self.store.update(id, |c| {
            c.answers.push(answer.clone());
            c.timer = None;
            c.paused = false;
        })?;

        let grade = race(
            &self.cancel,
            self.backend
                .grade_answer(&question.text, &answer.response_text),
        )
        .await;
        let answer = match grade {
            Ok(grade) => {
                let graded = Answer {
                    score: Some(grade.score),
                    feedback: Some(grade.feedback),
                    ..answer
                };
                self.store.update(id, |c| {
                    if let Some(a) = c.answers.get_mut(index) {
                        *a = graded.clone();
                    }
                })?;
                graded
            }
            Err(SessionError::Cancelled) => return Err(SessionError::Cancelled),
            Err(e) => {
                warn!("Grading failed for candidate {} question {}: {}", id, index, e);
                answer
            }
        };

        let advance = self.advance(id, index).await?;
        Ok(SubmitOutcome { answer, advance })
    }

    async fn advance(&mut self, id: Uuid, index: usize) -> Result<Advance, SessionError> {
        let next = index + 1;
        let now = self.clock.now();
        let candidate = self.store.update(id, |c| {
            c.current_index = next;
            c.timer = c
                .questions
                .get(next)
                .map(|q| TimerSnapshot::start(next, q.difficulty, now));
            c.paused = false;
        })?;

        if next < candidate.questions.len() {
            return Ok(Advance::NextQuestion(next));
        }

        let snapshot = candidate.clone();
        info!(
            "Candidate {} answered all {} questions; requesting summary",
            id,
            snapshot.answers.len()
        );
        match race(&self.cancel, self.backend.final_summary(&snapshot)).await {
            Ok(summary) => {
                let final_score = summary.final_score_percent;
                self.store.update(id, |c| {
                    c.final_score = Some(summary.final_score_percent);
                    c.summary = Some(summary.summary);
                })?;
                info!("Candidate {} completed with {}%", id, final_score);
                Ok(Advance::Completed { final_score })
            }
            Err(SessionError::Cancelled) => Err(SessionError::Cancelled),
            Err(e) => {
                warn!("Summary failed for candidate {}: {}", id, e);
                Ok(Advance::SummaryFailed)
            }
        }
    }
}

/// Awaits a backend call unless the controller is torn down first.
async fn race<T, F>(cancel: &CancellationToken, call: F) -> Result<T, SessionError>
where
    F: Future<Output = Result<T, BackendError>>,
{
    tokio::select! {
        biased;
        _ = cancel.cancelled() => Err(SessionError::Cancelled),
        result = call => result.map_err(SessionError::from),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    use async_trait::async_trait;
    use chrono::{DateTime, Duration, Utc};

    use crate::interview::grading::Grade;
    use crate::interview::summary::FinalSummary;
    use crate::models::interview::{Difficulty, Question};
    use crate::resume::ParsedResume;
    use crate::session::timer::ManualClock;

    #[derive(Default)]
    struct ScriptedBackend {
        grade_fails: bool,
        summary_fails: bool,
        grade_calls: AtomicUsize,
        summary_calls: AtomicUsize,
        summarized_answers: Mutex<Vec<usize>>,
    }

    fn questions() -> Vec<Question> {
        [
            Difficulty::Easy,
            Difficulty::Easy,
            Difficulty::Medium,
            Difficulty::Medium,
            Difficulty::Hard,
            Difficulty::Hard,
        ]
        .into_iter()
        .enumerate()
        .map(|(i, difficulty)| Question {
            id: format!("q{}", i + 1),
            difficulty,
            text: format!("Question {}", i + 1),
        })
        .collect()
    }

    #[async_trait]
    impl InterviewBackend for ScriptedBackend {
        async fn parse_resume(
            &self,
            _filename: &str,
            _bytes: Vec<u8>,
        ) -> Result<ParsedResume, BackendError> {
            Ok(ParsedResume {
                name: Some("Ada Lovelace".to_string()),
                email: Some("ada@example.com".to_string()),
                phone: None,
                text: "Ada Lovelace\nada@example.com".to_string(),
            })
        }

        async fn generate_questions(
            &self,
            _role: Option<&str>,
            _stack: &[String],
        ) -> Result<Vec<Question>, BackendError> {
            Ok(questions())
        }

        async fn grade_answer(&self, _question: &str, answer: &str) -> Result<Grade, BackendError> {
            self.grade_calls.fetch_add(1, Ordering::SeqCst);
            if self.grade_fails {
                return Err(BackendError::Status {
                    status: 500,
                    code: "LLM_ERROR".to_string(),
                    message: "model unavailable".to_string(),
                });
            }
            let score = if answer == TIMEOUT_SENTINEL { 0.0 } else { 7.0 };
            Ok(Grade {
                score,
                feedback: "ok".to_string(),
            })
        }

        async fn final_summary(&self, candidate: &Candidate) -> Result<FinalSummary, BackendError> {
            self.summary_calls.fetch_add(1, Ordering::SeqCst);
            self.summarized_answers
                .lock()
                .unwrap()
                .push(candidate.answers.len());
            if self.summary_fails {
                return Err(BackendError::Invalid("no summary".to_string()));
            }
            Ok(FinalSummary {
                final_score_percent: 58.0,
                summary: "Solid fundamentals.".to_string(),
            })
        }
    }

    fn t0() -> DateTime<Utc> {
        DateTime::from_timestamp(1_700_000_000, 0).unwrap()
    }

    struct Harness {
        controller: InterviewController,
        backend: Arc<ScriptedBackend>,
        clock: ManualClock,
        _dir: tempfile::TempDir,
    }

    fn harness(backend: ScriptedBackend) -> Harness {
        let dir = tempfile::tempdir().unwrap();
        let store = CandidateStore::open(dir.path().join("candidates.json")).unwrap();
        let backend = Arc::new(backend);
        let clock = ManualClock::new(t0());
        let controller = InterviewController::new(store, backend.clone(), Arc::new(clock.clone()));
        Harness {
            controller,
            backend,
            clock,
            _dir: dir,
        }
    }

    async fn started(h: &mut Harness) -> Uuid {
        let id = h
            .controller
            .upload_resume("ada.pdf", b"%PDF".to_vec())
            .await
            .unwrap();
        h.controller
            .complete_profile(id, None, None, Some("555-123-4567".to_string()))
            .unwrap();
        h.controller.start_interview(id, None, &[]).await.unwrap();
        id
    }

    #[tokio::test]
    async fn test_start_requires_contact_fields() {
        let mut h = harness(ScriptedBackend::default());
        let id = h
            .controller
            .upload_resume("ada.docx", b"PK".to_vec())
            .await
            .unwrap();

        assert_eq!(
            h.controller.missing_fields(id).unwrap(),
            vec![ContactField::Phone]
        );
        let err = h.controller.start_interview(id, None, &[]).await.unwrap_err();
        assert!(matches!(err, SessionError::Validation(_)));

        let missing = h
            .controller
            .complete_profile(id, Some("  ".to_string()), None, Some("5551234567".to_string()))
            .unwrap();
        assert!(missing.is_empty());
        assert_eq!(
            h.controller.candidate(id).unwrap().name.as_deref(),
            Some("Ada Lovelace")
        );

        h.controller.start_interview(id, None, &[]).await.unwrap();
        assert_eq!(h.controller.remaining(id).unwrap(), Some(20));
        assert_eq!(h.controller.candidate(id).unwrap().questions_length, 6);
    }

    #[tokio::test]
    async fn test_manual_submit_records_time_taken() {
        let mut h = harness(ScriptedBackend::default());
        let id = started(&mut h).await;

        h.clock.advance(Duration::milliseconds(7_400));
        let outcome = h.controller.submit_answer(id, "  ownership  ").await.unwrap();

        assert_eq!(outcome.answer.response_text, "ownership");
        assert_eq!(outcome.answer.time_taken_seconds, 7);
        assert!(!outcome.answer.auto_submitted);
        assert_eq!(outcome.answer.score, Some(7.0));
        assert_eq!(outcome.advance, Advance::NextQuestion(1));
        assert_eq!(h.controller.remaining(id).unwrap(), Some(20));
    }

    #[tokio::test]
    async fn test_empty_answer_rejected() {
        let mut h = harness(ScriptedBackend::default());
        let id = started(&mut h).await;

        let err = h.controller.submit_answer(id, "   ").await.unwrap_err();
        assert!(matches!(err, SessionError::Validation(_)));
        assert!(h.controller.candidate(id).unwrap().answers.is_empty());
    }

    #[tokio::test]
    async fn test_easy_question_auto_submits_after_twenty_seconds() {
        let mut h = harness(ScriptedBackend::default());
        let id = started(&mut h).await;

        h.clock.advance(Duration::seconds(19));
        assert_eq!(
            h.controller.poll(id).await.unwrap(),
            PollOutcome::Running { remaining: 1 }
        );

        h.clock.advance(Duration::seconds(1));
        let outcome = match h.controller.poll(id).await.unwrap() {
            PollOutcome::AutoSubmitted(outcome) => outcome,
            other => panic!("expected auto-submit, got {other:?}"),
        };
        assert_eq!(outcome.answer.response_text, TIMEOUT_SENTINEL);
        assert!(outcome.answer.auto_submitted);
        assert_eq!(outcome.answer.time_taken_seconds, 20);
        assert_eq!(outcome.advance, Advance::NextQuestion(1));

        // Manual submission after expiry is refused; the poll handles it.
        h.clock.advance(Duration::seconds(25));
        let err = h.controller.submit_answer(id, "late").await.unwrap_err();
        assert!(matches!(err, SessionError::Validation(_)));
    }

    #[tokio::test]
    async fn test_pause_is_idempotent_and_freezes_countdown() {
        let mut h = harness(ScriptedBackend::default());
        let id = started(&mut h).await;

        h.clock.advance(Duration::seconds(5));
        h.controller.pause(id).unwrap();
        let once = h.controller.candidate(id).unwrap().clone();

        h.clock.advance(Duration::seconds(30));
        h.controller.pause(id).unwrap();
        assert_eq!(h.controller.candidate(id).unwrap(), &once);
        assert_eq!(
            h.controller.poll(id).await.unwrap(),
            PollOutcome::Paused { remaining: 15 }
        );

        let err = h.controller.submit_answer(id, "answer").await.unwrap_err();
        assert!(matches!(err, SessionError::Validation(_)));

        h.controller.resume(id).unwrap();
        h.controller.resume(id).unwrap();
        h.clock.advance(Duration::seconds(4));
        assert_eq!(h.controller.remaining(id).unwrap(), Some(11));
    }

    #[tokio::test]
    async fn test_full_interview_summarizes_once() {
        let mut h = harness(ScriptedBackend::default());
        let id = started(&mut h).await;

        for i in 0..5 {
            h.clock.advance(Duration::seconds(3));
            let outcome = h
                .controller
                .submit_answer(id, &format!("answer {i}"))
                .await
                .unwrap();
            assert_eq!(outcome.advance, Advance::NextQuestion(i + 1));
        }

        // Last question is hard: let it run out.
        h.clock.advance(Duration::seconds(120));
        let outcome = match h.controller.poll(id).await.unwrap() {
            PollOutcome::AutoSubmitted(outcome) => outcome,
            other => panic!("expected auto-submit, got {other:?}"),
        };
        assert_eq!(outcome.answer.time_taken_seconds, 120);
        assert_eq!(outcome.advance, Advance::Completed { final_score: 58.0 });

        let candidate = h.controller.candidate(id).unwrap();
        assert_eq!(candidate.phase(), SessionPhase::Completed);
        assert_eq!(candidate.answers.len(), 6);
        assert_eq!(candidate.summary.as_deref(), Some("Solid fundamentals."));
        assert!(candidate.timer.is_none());
        assert_eq!(h.backend.summary_calls.load(Ordering::SeqCst), 1);
        assert_eq!(*h.backend.summarized_answers.lock().unwrap(), vec![6]);
        assert_eq!(h.controller.poll(id).await.unwrap(), PollOutcome::Idle);
    }

    #[tokio::test]
    async fn test_grading_failure_still_advances() {
        let mut h = harness(ScriptedBackend {
            grade_fails: true,
            ..Default::default()
        });
        let id = started(&mut h).await;

        let outcome = h.controller.submit_answer(id, "answer").await.unwrap();
        assert_eq!(outcome.answer.score, None);
        assert_eq!(outcome.answer.feedback, None);
        assert_eq!(outcome.advance, Advance::NextQuestion(1));
        assert_eq!(h.backend.grade_calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_summary_failure_leaves_candidate_unscored() {
        let mut h = harness(ScriptedBackend {
            summary_fails: true,
            ..Default::default()
        });
        let id = started(&mut h).await;

        let mut last = None;
        for _ in 0..6 {
            last = Some(h.controller.submit_answer(id, "answer").await.unwrap());
        }
        assert_eq!(last.unwrap().advance, Advance::SummaryFailed);

        let candidate = h.controller.candidate(id).unwrap();
        assert_eq!(candidate.final_score, None);
        assert_eq!(candidate.phase(), SessionPhase::Summarizing);
        assert!(!candidate.is_unfinished());
    }

    #[tokio::test]
    async fn test_resume_offer_made_once() {
        let mut h = harness(ScriptedBackend::default());
        let id = started(&mut h).await;
        h.controller.submit_answer(id, "answer").await.unwrap();

        let path = h.controller.store().path().to_path_buf();
        let store = CandidateStore::open(&path).unwrap();
        let mut reopened =
            InterviewController::new(store, h.backend.clone(), Arc::new(h.clock.clone()));

        assert_eq!(reopened.take_resume_offer(), Some(id));
        assert_eq!(reopened.take_resume_offer(), None);
        assert_eq!(reopened.remaining(id).unwrap(), Some(20));
    }

    #[tokio::test]
    async fn test_reload_after_gap_subtracts_elapsed_time() {
        let mut h = harness(ScriptedBackend::default());
        let id = started(&mut h).await;
        h.clock.advance(Duration::seconds(8));

        let path = h.controller.store().path().to_path_buf();
        let reopened = InterviewController::new(
            CandidateStore::open(&path).unwrap(),
            h.backend.clone(),
            Arc::new(h.clock.clone()),
        );
        assert_eq!(reopened.remaining(id).unwrap(), Some(12));
    }

    #[tokio::test]
    async fn test_submit_with_leftover_timer_restarts_countdown() {
        let mut h = harness(ScriptedBackend::default());
        let id = started(&mut h).await;

        // A snapshot left over from a longer question, as after a bad reload.
        let now = h.clock.now();
        h.controller
            .store
            .update(id, |c| {
                c.timer = Some(TimerSnapshot {
                    question_index: 5,
                    remaining: 100,
                    last_updated: now,
                })
            })
            .unwrap();

        h.clock.advance(Duration::seconds(3));
        let outcome = h.controller.submit_answer(id, "hello").await.unwrap();
        assert_eq!(outcome.answer.time_taken_seconds, 0);
        assert_eq!(outcome.advance, Advance::NextQuestion(1));
    }

    #[tokio::test]
    async fn test_oversized_remaining_is_capped_by_budget() {
        let mut h = harness(ScriptedBackend::default());
        let id = started(&mut h).await;

        let now = h.clock.now();
        h.controller
            .store
            .update(id, |c| {
                c.timer = Some(TimerSnapshot {
                    question_index: 0,
                    remaining: 100,
                    last_updated: now,
                })
            })
            .unwrap();

        assert_eq!(
            h.controller.poll(id).await.unwrap(),
            PollOutcome::Running { remaining: 20 }
        );
    }

    #[tokio::test]
    async fn test_submit_rejected_when_answers_out_of_step() {
        let mut h = harness(ScriptedBackend::default());
        let id = started(&mut h).await;

        let now = h.clock.now();
        h.controller
            .store
            .update(id, |c| {
                c.current_index = 2;
                c.timer = Some(TimerSnapshot::start(2, Difficulty::Medium, now));
            })
            .unwrap();

        let err = h.controller.submit_answer(id, "answer").await.unwrap_err();
        assert!(matches!(err, SessionError::Validation(_)));
        assert!(h.controller.candidate(id).unwrap().answers.is_empty());
        assert_eq!(h.backend.grade_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_recover_advances_interrupted_grading() {
        let mut h = harness(ScriptedBackend::default());
        let id = started(&mut h).await;

        // Simulate an exit between recording the answer and advancing.
        let question = questions().remove(0);
        h.controller
            .store
            .update(id, |c| {
                c.answers.push(Answer {
                    question_id: question.id,
                    question_text: question.text,
                    difficulty: question.difficulty,
                    response_text: "answer".to_string(),
                    time_taken_seconds: 4,
                    auto_submitted: false,
                    score: None,
                    feedback: None,
                });
                c.timer = None;
            })
            .unwrap();
        assert_eq!(
            h.controller.candidate(id).unwrap().phase(),
            SessionPhase::Grading(0)
        );

        let phase = h.controller.recover(id).await.unwrap();
        assert_eq!(phase, SessionPhase::Answering(1));
        assert_eq!(h.controller.remaining(id).unwrap(), Some(20));
    }

    #[tokio::test]
    async fn test_shutdown_cancels_backend_calls() {
        let mut h = harness(ScriptedBackend::default());
        h.controller.shutdown();

        let err = h
            .controller
            .upload_resume("ada.pdf", b"%PDF".to_vec())
            .await
            .unwrap_err();
        assert!(matches!(err, SessionError::Cancelled));
        assert!(h.controller.store().list().is_empty());
        assert!(h.controller.cancellation_token().is_cancelled());
    }
}
