//! Axum route handler for resume upload.

use axum::extract::Multipart;
use axum::Json;
use bytes::Bytes;
use tracing::info;

use crate::errors::AppError;
use crate::resume::extract::DocumentFormat;
use crate::resume::{parse_upload, ParsedResume};

const FILE_FIELD: &str = "file";

/// POST /api/parse-resume
///
/// Accepts a multipart body with a `file` field (.pdf or .docx) and returns the
/// extracted text plus best-guess name, email and phone.
pub async fn handle_parse_resume(mut multipart: Multipart) -> Result<Json<ParsedResume>, AppError> {
    let (filename, data) = read_file_field(&mut multipart)
        .await?
        .ok_or_else(|| AppError::Validation("No file uploaded".to_string()))?;

    let format = DocumentFormat::from_filename(&filename)?;
    info!(
        "Parsing uploaded resume '{}' ({} bytes, {:?})",
        filename,
        data.len(),
        format
    );

    let parsed = tokio::task::spawn_blocking(move || parse_upload(format, &data))
        .await
        .map_err(|e| {
            if e.is_panic() {
                AppError::Document(format!("decoder panicked on '{filename}'"))
            } else {
                AppError::Internal(anyhow::anyhow!("Resume parsing task failed: {e}"))
            }
        })??;

    info!(
        "Resume parsed: name={} email={} phone={} chars={}",
        parsed.name.is_some(),
        parsed.email.is_some(),
        parsed.phone.is_some(),
        parsed.text.len()
    );

    Ok(Json(parsed))
}

async fn read_file_field(multipart: &mut Multipart) -> Result<Option<(String, Bytes)>, AppError> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("Malformed multipart body: {e}")))?
    {
        if field.name() != Some(FILE_FIELD) {
            continue;
        }

        let filename = field
            .file_name()
            .map(str::to_string)
            .ok_or_else(|| AppError::Validation("Uploaded file has no filename".to_string()))?;
        let data = field
            .bytes()
            .await
            .map_err(|e| AppError::Validation(format!("Failed to read upload: {e}")))?;

        return Ok(Some((filename, data)));
    }

    Ok(None)
}
