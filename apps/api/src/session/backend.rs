//! Client side of the four interview endpoints.

use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::json;
use thiserror::Error;

use crate::interview::grading::Grade;
use crate::interview::questions::GenerateQuestionsResponse;
use crate::interview::summary::FinalSummary;
use crate::models::candidate::Candidate;
use crate::models::interview::Question;
use crate::resume::ParsedResume;

#[derive(Debug, Error)]
pub enum BackendError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Server returned {status} ({code}): {message}")]
    Status {
        status: u16,
        code: String,
        message: String,
    },

    #[error("Unexpected response: {0}")]
    Invalid(String),
}

/// The operations the session controller needs from the service.
#[async_trait]
pub trait InterviewBackend: Send + Sync {
    async fn parse_resume(&self, filename: &str, bytes: Vec<u8>)
        -> Result<ParsedResume, BackendError>;

    async fn generate_questions(
        &self,
        role: Option<&str>,
        stack: &[String],
    ) -> Result<Vec<Question>, BackendError>;

    async fn grade_answer(&self, question: &str, answer: &str) -> Result<Grade, BackendError>;

    async fn final_summary(&self, candidate: &Candidate) -> Result<FinalSummary, BackendError>;
}

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    code: String,
    message: String,
}

/// Talks to a running interview API over HTTP.
#[derive(Clone)]
pub struct HttpBackend {
    client: Client,
    base_url: String,
}

impl HttpBackend {
    pub fn new(base_url: impl Into<String>) -> Result<Self, BackendError> {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(180))
            .build()?;
        Ok(Self::with_client(client, base_url))
    }

    pub fn with_client(client: Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

#[async_trait]
impl InterviewBackend for HttpBackend {
    async fn parse_resume(
        &self,
        filename: &str,
        bytes: Vec<u8>,
    ) -> Result<ParsedResume, BackendError> {
        let form = Form::new().part("file", Part::bytes(bytes).file_name(filename.to_string()));
        let response = self
            .client
            .post(self.url("/api/parse-resume"))
            .multipart(form)
            .send()
            .await?;
        decode(response).await
    }

    async fn generate_questions(
        &self,
        role: Option<&str>,
        stack: &[String],
    ) -> Result<Vec<Question>, BackendError> {
        let response = self
            .client
            .post(self.url("/api/generate-questions"))
            .json(&json!({ "role": role, "stack": stack }))
            .send()
            .await?;
        let body: GenerateQuestionsResponse = decode(response).await?;
        Ok(body.questions)
    }

    async fn grade_answer(&self, question: &str, answer: &str) -> Result<Grade, BackendError> {
        let response = self
            .client
            .post(self.url("/api/grade-answer"))
            .json(&json!({ "question": question, "answer": answer }))
            .send()
            .await?;
        decode(response).await
    }

    async fn final_summary(&self, candidate: &Candidate) -> Result<FinalSummary, BackendError> {
        let response = self
            .client
            .post(self.url("/api/final-summary"))
            .json(&json!({ "candidate": candidate }))
            .send()
            .await?;
        decode(response).await
    }
}

/// Decodes a success body, or lifts the service's error envelope into `BackendError`.
async fn decode<T: DeserializeOwned>(response: Response) -> Result<T, BackendError> {
    let status = response.status();
    if status.is_success() {
        return response
            .json::<T>()
            .await
            .map_err(|e| BackendError::Invalid(e.to_string()));
    }

    let body = response.text().await.unwrap_or_default();
    let (code, message) = match serde_json::from_str::<ErrorEnvelope>(&body) {
        Ok(envelope) => (envelope.error.code, envelope.error.message),
        Err(_) => ("UNKNOWN".to_string(), body),
    };
    Err(BackendError::Status {
        status: status.as_u16(),
        code,
        message,
    })
}
