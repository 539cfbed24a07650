//! Input handling for paragraph and page sources.
//!
//! The format of each input is chosen from its file extension:
//!
//! | Input     | Extension | Reader                                  |
//! |-----------|-----------|-----------------------------------------|
//! | document  | `.docx`   | [`crate::parser::docx::read_paragraphs`] |
//! | document  | `.json`   | [`read_paragraphs_json`]                |
//! | pages     | `.pdf`    | [`crate::locate::pages::load_pdf`]      |
//! | pages     | `.json`   | [`read_pages_json`]                     |
//! | pages     | other     | form-feed separated text dump           |

use serde::Deserialize;
use std::fs;
use std::path::Path;

use crate::error::SourceError;
use crate::locate::{MatchMode, TextPages};
use crate::parser::{Paragraph, Run, docx};

/// Supported paragraph source formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentFormat {
    Docx,
    Json,
}

/// Supported paginated source formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PagesFormat {
    Pdf,
    Json,
    Text,
}

fn extension(path: &Path) -> Option<String> {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_ascii_lowercase())
}

impl DocumentFormat {
    pub fn detect(path: &Path) -> Option<Self> {
        match extension(path).as_deref() {
            Some("docx") => Some(Self::Docx),
            Some("json") => Some(Self::Json),
            _ => None,
        }
    }
}

impl PagesFormat {
    pub fn detect(path: &Path) -> Self {
        match extension(path).as_deref() {
            Some("pdf") => Self::Pdf,
            Some("json") => Self::Json,
            _ => Self::Text,
        }
    }
}

/// Paragraph as accepted in JSON input; `index` defaults to the position.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ParagraphRecord {
    index: Option<usize>,
    text: String,
    #[serde(default)]
    is_bold: bool,
    #[serde(default)]
    runs: Vec<Run>,
}

/// Read paragraphs from a `.docx` or JSON file.
///
/// # Errors
///
/// Returns [`SourceError::UnsupportedFormat`] for other extensions, or the
/// underlying reader's error.
pub fn read_paragraphs(path: &Path) -> Result<Vec<Paragraph>, SourceError> {
    match DocumentFormat::detect(path) {
        Some(DocumentFormat::Docx) => docx::read_paragraphs(path),
        Some(DocumentFormat::Json) => read_paragraphs_json(path),
        None => Err(SourceError::UnsupportedFormat(path.to_path_buf())),
    }
}

/// Read a JSON array of paragraphs.
pub fn read_paragraphs_json(path: &Path) -> Result<Vec<Paragraph>, SourceError> {
    let content = fs::read_to_string(path)?;
    parse_paragraphs_json(&content)
}

/// Parse a JSON array of paragraphs.
///
/// # Examples
///
/// ```
/// # use docstruct::input::parse_paragraphs_json;
/// let paragraphs = parse_paragraphs_json(
///     r#"[{"text": "第一章 绪论"}, {"text": "5.查询", "runs": [{"bold": true}]}]"#,
/// ).unwrap();
/// assert_eq!(paragraphs[1].index, 1);
/// assert!(paragraphs[1].runs[0].bold);
/// ```
pub fn parse_paragraphs_json(content: &str) -> Result<Vec<Paragraph>, SourceError> {
    let records: Vec<ParagraphRecord> = serde_json::from_str(content)?;
    Ok(records
        .into_iter()
        .enumerate()
        .map(|(position, record)| Paragraph {
            index: record.index.unwrap_or(position),
            text: record.text,
            is_bold: record.is_bold,
            runs: record.runs,
        })
        .collect())
}

/// Read a paginated source. `mode` applies to PDF and text dumps; JSON page
/// arrays are matched exactly.
pub fn read_pages(path: &Path, mode: MatchMode) -> Result<TextPages, SourceError> {
    match PagesFormat::detect(path) {
        PagesFormat::Pdf => crate::locate::pages::load_pdf(path, mode),
        PagesFormat::Json => read_pages_json(path),
        PagesFormat::Text => {
            let content = fs::read_to_string(path)?;
            Ok(TextPages::from_form_feed(&content, mode))
        }
    }
}

/// Read a JSON array of page texts.
pub fn read_pages_json(path: &Path) -> Result<TextPages, SourceError> {
    let content = fs::read_to_string(path)?;
    let pages: Vec<String> = serde_json::from_str(&content)?;
    Ok(TextPages::new(pages))
}
