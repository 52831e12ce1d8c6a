// Client-side interview session: durable candidate records, the countdown
// and the controller that drives a candidate through the four endpoints.

pub mod backend;
pub mod controller;
pub mod store;
pub mod timer;

use thiserror::Error;
use uuid::Uuid;

use crate::session::backend::BackendError;
use crate::session::store::StoreError;

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Candidate {0} not found")]
    NotFound(Uuid),

    #[error("Backend error: {0}")]
    Backend(#[from] BackendError),

    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    #[error("Session was shut down")]
    Cancelled,
}

pub use controller::{Advance, InterviewController, PollOutcome, SubmitOutcome, TIMEOUT_SENTINEL};
