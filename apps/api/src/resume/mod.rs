// Resume ingestion: document decoding plus contact-field heuristics.
// Stateless: nothing survives the request except the JSON response.

pub mod extract;
pub mod fields;
pub mod handlers;

use serde::{Deserialize, Serialize};

use crate::resume::extract::{extract_text, stage_upload, DocumentError, DocumentFormat};
use crate::resume::fields::{extract_email, extract_name, extract_phone};

/// Response body of `POST /api/parse-resume`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParsedResume {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub text: String,
}

impl ParsedResume {
    pub fn from_text(text: String) -> Self {
        Self {
            name: extract_name(&text),
            email: extract_email(&text),
            phone: extract_phone(&text),
            text,
        }
    }
}

/// Stages the upload, decodes it and extracts contact fields.
/// Blocking: call from `spawn_blocking`.
pub fn parse_upload(format: DocumentFormat, bytes: &[u8]) -> Result<ParsedResume, DocumentError> {
    let staged = stage_upload(format, bytes)?;
    let text = extract_text(format, staged.path())?;
    Ok(ParsedResume::from_text(text))
}
