#![allow(dead_code)]

use std::io::{Cursor, Write};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use zip::write::SimpleFileOptions;
use zip::ZipWriter;

use interview_api::config::Config;
use interview_api::interview::prompts::{GRADE_SYSTEM, QUESTIONS_SYSTEM, SUMMARY_SYSTEM};
use interview_api::llm_client::{LanguageModel, LlmError};
use interview_api::AppState;

pub const SIX_QUESTIONS: &str = r#"```json
[
  {"id": "q1", "difficulty": "easy", "text": "What does `let` do?"},
  {"id": "q2", "difficulty": "easy", "text": "What is a closure?"},
  {"id": "q3", "difficulty": "medium", "text": "Explain the event loop."},
  {"id": "q4", "difficulty": "medium", "text": "How does React reconcile?"},
  {"id": "q5", "difficulty": "hard", "text": "Design a rate limiter."},
  {"id": "q6", "difficulty": "hard", "text": "Shard a write-heavy table."}
]
```"#;

/// Model stand-in that answers by system prompt and records every call.
pub struct ScriptedModel {
    pub questions_reply: String,
    pub grade_reply: String,
    pub summary_reply: String,
    pub calls: AtomicUsize,
    pub prompts: Mutex<Vec<(String, String)>>,
}

impl Default for ScriptedModel {
    fn default() -> Self {
        Self {
            questions_reply: SIX_QUESTIONS.to_string(),
            grade_reply: r#"Here you go: {"score": 6, "feedback": "Mostly right."}"#.to_string(),
            summary_reply: r#"{"finalScorePercent": 64, "summary": "Good breadth, thin on depth."}"#
                .to_string(),
            calls: AtomicUsize::new(0),
            prompts: Mutex::new(Vec::new()),
        }
    }
}

impl ScriptedModel {
    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Prompts sent with the given system prompt, in call order.
    pub fn prompts_for(&self, system: &str) -> Vec<String> {
        self.prompts
            .lock()
            .unwrap()
            .iter()
            .filter(|(s, _)| s == system)
            .map(|(_, p)| p.clone())
            .collect()
    }
}

#[async_trait]
impl LanguageModel for ScriptedModel {
    async fn complete(&self, prompt: &str, system: &str) -> Result<String, LlmError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.prompts
            .lock()
            .unwrap()
            .push((system.to_string(), prompt.to_string()));

        let reply = if system == QUESTIONS_SYSTEM {
            &self.questions_reply
        } else if system == GRADE_SYSTEM {
            &self.grade_reply
        } else if system == SUMMARY_SYSTEM {
            &self.summary_reply
        } else {
            return Err(LlmError::EmptyContent);
        };
        Ok(reply.clone())
    }
}

pub fn test_config() -> Config {
    Config {
        anthropic_api_key: "test-key".to_string(),
        port: 0,
        client_url: None,
        max_upload_bytes: 10 * 1024 * 1024,
        rust_log: "debug".to_string(),
    }
}

pub fn test_state(model: Arc<ScriptedModel>) -> AppState {
    AppState {
        llm: model,
        config: test_config(),
    }
}

/// Minimal DOCX: one paragraph per line.
pub fn docx(lines: &[&str]) -> Vec<u8> {
    let paragraphs: String = lines
        .iter()
        .map(|l| format!("<w:p><w:r><w:t>{l}</w:t></w:r></w:p>"))
        .collect();
    let document = format!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<w:document xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main"><w:body>{paragraphs}</w:body></w:document>"#
    );

    let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
    writer
        .start_file("word/document.xml", SimpleFileOptions::default())
        .unwrap();
    writer.write_all(document.as_bytes()).unwrap();
    writer.finish().unwrap().into_inner()
}

pub const BOUNDARY: &str = "interview-test-boundary";

/// Hand-built multipart body with a single part.
pub fn multipart_body(field: &str, filename: &str, bytes: &[u8]) -> Vec<u8> {
    let mut body = Vec::new();
    body.extend_from_slice(
        format!(
            "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{field}\"; filename=\"{filename}\"\r\nContent-Type: application/octet-stream\r\n\r\n"
        )
        .as_bytes(),
    );
    body.extend_from_slice(bytes);
    body.extend_from_slice(format!("\r\n--{BOUNDARY}--\r\n").as_bytes());
    body
}
