//! Paginated text sources.
//!
//! Every source ends up as a [`TextPages`]: one string per page, searched
//! either exactly or with whitespace ignored.

use std::path::Path;

use super::PageSearch;
use crate::error::SourceError;
use crate::parser::utils::compact_whitespace;

/// How heading text is compared with page text.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum MatchMode {
    /// Substring match on the text as given
    #[default]
    Exact,
    /// Substring match after removing all whitespace from both sides
    IgnoreWhitespace,
}

/// Page texts held in memory.
#[derive(Debug, Clone, Default)]
pub struct TextPages {
    pages: Vec<String>,
    mode: MatchMode,
}

impl TextPages {
    /// Pages matched exactly.
    pub fn new(pages: Vec<String>) -> Self {
        Self::with_mode(pages, MatchMode::Exact)
    }

    pub fn with_mode(pages: Vec<String>, mode: MatchMode) -> Self {
        let pages = match mode {
            MatchMode::Exact => pages,
            MatchMode::IgnoreWhitespace => pages.iter().map(|p| compact_whitespace(p)).collect(),
        };
        Self { pages, mode }
    }

    /// Split a text dump on form feeds, one page per segment.
    ///
    /// This is the layout `pdftotext` produces. A trailing form feed does not
    /// start an extra page.
    pub fn from_form_feed(text: &str, mode: MatchMode) -> Self {
        let mut pages: Vec<String> = text.split('\x0c').map(str::to_string).collect();
        if pages.len() > 1 && pages.last().is_some_and(|p| p.trim().is_empty()) {
            pages.pop();
        }
        if pages.len() == 1 && pages[0].trim().is_empty() {
            pages.clear();
        }
        Self::with_mode(pages, mode)
    }

    pub fn mode(&self) -> MatchMode {
        self.mode
    }
}

impl PageSearch for TextPages {
    fn page_count(&self) -> usize {
        self.pages.len()
    }

    fn page_contains(&self, page: usize, text: &str) -> bool {
        let Some(haystack) = self.pages.get(page) else {
            return false;
        };
        match self.mode {
            MatchMode::Exact => haystack.contains(text),
            MatchMode::IgnoreWhitespace => {
                let needle = compact_whitespace(text);
                !needle.is_empty() && haystack.contains(&needle)
            }
        }
    }
}

/// Extract the text of each page of a PDF.
///
/// The extractor is known to panic on some malformed files; a panic is
/// reported as [`SourceError::Pdf`] instead of unwinding into the caller.
pub fn load_pdf(path: &Path, mode: MatchMode) -> Result<TextPages, SourceError> {
    if !path.exists() {
        return Err(SourceError::Io(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            format!("{} does not exist", path.display()),
        )));
    }

    let extracted = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
        pdf_extract::extract_text_by_pages(path)
    }));

    let pages = match extracted {
        Ok(Ok(pages)) => pages,
        Ok(Err(e)) => return Err(SourceError::Pdf(e.to_string())),
        Err(payload) => {
            let msg = if let Some(s) = payload.downcast_ref::<&str>() {
                s.to_string()
            } else if let Some(s) = payload.downcast_ref::<String>() {
                s.clone()
            } else {
                "unknown panic".to_string()
            };
            return Err(SourceError::Pdf(msg));
        }
    };

    tracing::debug!(path = %path.display(), pages = pages.len(), "extracted PDF text");
    Ok(TextPages::with_mode(pages, mode))
}
