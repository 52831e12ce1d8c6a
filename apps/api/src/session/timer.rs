//! Countdown model.
//!
//! Time remaining is never ticked down in place. The persisted snapshot holds
//! `remaining` as of `last_updated`, and every read recomputes the live value:
//! `max(0, remaining - floor((now - last_updated) / 1s))`.

use std::sync::{Arc, Mutex};

use chrono::{DateTime, Duration, Utc};

use crate::models::candidate::{Candidate, TimerSnapshot};
use crate::models::interview::Difficulty;

/// Source of wall-clock time for the session controller.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Clock that only moves when told to. Cloning shares the same instant.
#[derive(Debug, Clone)]
pub struct ManualClock {
    now: Arc<Mutex<DateTime<Utc>>>,
}

impl ManualClock {
    pub fn new(start: DateTime<Utc>) -> Self {
        Self {
            now: Arc::new(Mutex::new(start)),
        }
    }

    pub fn advance(&self, by: Duration) {
        let mut now = self.now.lock().unwrap_or_else(|e| e.into_inner());
        *now += by;
    }

    pub fn set(&self, to: DateTime<Utc>) {
        *self.now.lock().unwrap_or_else(|e| e.into_inner()) = to;
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        *self.now.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl TimerSnapshot {
    /// Fresh countdown for the question at `question_index`.
    pub fn start(question_index: usize, difficulty: Difficulty, now: DateTime<Utc>) -> Self {
        Self {
            question_index,
            remaining: difficulty.budget_seconds(),
            last_updated: now,
        }
    }

    /// Live seconds left, assuming the countdown ran since `last_updated`.
    pub fn remaining_at(&self, now: DateTime<Utc>) -> u32 {
        let elapsed_ms = (now - self.last_updated).num_milliseconds().max(0);
        let elapsed_secs = u32::try_from(elapsed_ms / 1000).unwrap_or(u32::MAX);
        self.remaining.saturating_sub(elapsed_secs)
    }

    /// Folds elapsed time into `remaining`; used when pausing.
    pub fn frozen_at(&self, now: DateTime<Utc>) -> Self {
        Self {
            question_index: self.question_index,
            remaining: self.remaining_at(now),
            last_updated: now,
        }
    }

    /// Restarts the countdown from the stored `remaining`; used when resuming.
    pub fn resumed_at(&self, now: DateTime<Utc>) -> Self {
        Self {
            last_updated: now,
            ..self.clone()
        }
    }
}

/// Seconds left on the candidate's current question, honoring the pause flag.
pub fn remaining_for(candidate: &Candidate, now: DateTime<Utc>) -> Option<u32> {
    let timer = candidate.timer.as_ref()?;
    if candidate.paused {
        Some(timer.remaining)
    } else {
        Some(timer.remaining_at(now))
    }
}
