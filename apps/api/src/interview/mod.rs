// Prompt forwarder: question generation, answer grading, final summary.
// All LLM calls go through llm_client; one model call per request, no retries.

pub mod grading;
pub mod handlers;
pub mod prompts;
pub mod questions;
pub mod summary;
