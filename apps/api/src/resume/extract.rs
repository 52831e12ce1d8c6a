//! Resume text extraction for the two accepted upload formats.
//!
//! Uploads are staged to a named temp file that is removed when the guard drops,
//! so every exit path (success, rejection, decode error, panic) cleans up.

use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;

use quick_xml::events::Event;
use quick_xml::Reader;
use tempfile::NamedTempFile;
use thiserror::Error;
use zip::ZipArchive;

const DOCX_BODY_PART: &str = "word/document.xml";

#[derive(Debug, Error)]
pub enum DocumentError {
    #[error("Unsupported file type: {0}. Upload a .pdf or .docx file")]
    UnsupportedFormat(String),

    #[error("PDF decode failed: {0}")]
    Pdf(String),

    #[error("DOCX decode failed: {0}")]
    Docx(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentFormat {
    Pdf,
    Docx,
}

impl DocumentFormat {
    /// Picks the decoder from the filename extension (case-insensitive).
    pub fn from_filename(filename: &str) -> Result<Self, DocumentError> {
        let extension = Path::new(filename)
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase);

        match extension.as_deref() {
            Some("pdf") => Ok(DocumentFormat::Pdf),
            Some("docx") => Ok(DocumentFormat::Docx),
            _ => Err(DocumentError::UnsupportedFormat(filename.to_string())),
        }
    }

    pub fn extension(self) -> &'static str {
        match self {
            DocumentFormat::Pdf => ".pdf",
            DocumentFormat::Docx => ".docx",
        }
    }
}

/// Writes the upload to a temp file carrying the original extension.
pub fn stage_upload(format: DocumentFormat, bytes: &[u8]) -> Result<NamedTempFile, DocumentError> {
    let mut file = tempfile::Builder::new()
        .prefix("resume-")
        .suffix(format.extension())
        .tempfile()?;
    file.write_all(bytes)?;
    file.flush()?;
    Ok(file)
}

/// Decodes the document at `path` into normalized plain text.
pub fn extract_text(format: DocumentFormat, path: &Path) -> Result<String, DocumentError> {
    let raw = match format {
        DocumentFormat::Pdf => extract_pdf(path)?,
        DocumentFormat::Docx => extract_docx(path)?,
    };
    Ok(normalize(&raw))
}

fn extract_pdf(path: &Path) -> Result<String, DocumentError> {
    pdf_extract::extract_text(path).map_err(|e| DocumentError::Pdf(e.to_string()))
}

fn extract_docx(path: &Path) -> Result<String, DocumentError> {
    let file = File::open(path)?;
    let mut archive = ZipArchive::new(file).map_err(|e| DocumentError::Docx(e.to_string()))?;
    let mut part = archive
        .by_name(DOCX_BODY_PART)
        .map_err(|e| DocumentError::Docx(format!("{DOCX_BODY_PART}: {e}")))?;

    let mut xml = String::new();
    part.read_to_string(&mut xml)?;
    docx_xml_to_text(&xml)
}

/// Flattens WordprocessingML into text: `<w:t>` runs are kept, paragraphs and
/// breaks become newlines, tabs become `\t`. Tabs and breaks count only inside
/// a `<w:r>`; a `<w:tab/>` under `<w:pPr><w:tabs>` is a tab-stop definition.
pub(crate) fn docx_xml_to_text(xml: &str) -> Result<String, DocumentError> {
    let mut reader = Reader::from_str(xml);
    let mut out = String::new();
    let mut in_text_run = false;
    let mut run_depth = 0usize;

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) => match e.name().as_ref() {
                b"w:t" => in_text_run = true,
                b"w:r" => run_depth += 1,
                _ => {}
            },
            Ok(Event::End(e)) => match e.name().as_ref() {
                b"w:t" => in_text_run = false,
                b"w:r" => run_depth = run_depth.saturating_sub(1),
                b"w:p" => out.push('\n'),
                _ => {}
            },
            Ok(Event::Empty(e)) if run_depth > 0 => match e.name().as_ref() {
                b"w:tab" => out.push('\t'),
                b"w:br" | b"w:cr" => out.push('\n'),
                _ => {}
            },
            Ok(Event::Text(t)) if in_text_run => {
                let text = t
                    .unescape()
                    .map_err(|e| DocumentError::Docx(e.to_string()))?;
                out.push_str(&text);
            }
            Ok(Event::Eof) => break,
            Err(e) => {
                return Err(DocumentError::Docx(format!(
                    "malformed XML at byte {}: {e}",
                    reader.buffer_position()
                )))
            }
            _ => {}
        }
    }

    Ok(out)
}

fn normalize(text: &str) -> String {
    text.replace("\r\n", "\n")
        .lines()
        .map(str::trim_end)
        .collect::<Vec<_>>()
        .join("\n")
        .trim()
        .to_string()
}
