//! End-to-end structure extraction.
//!
//! [`parse_structure`] reads a document and its paginated rendering,
//! classifies headings and places them on pages. It never fails: unreadable
//! inputs give an empty table, and [`Outcome`] says why the table is empty.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::config::Config;
use crate::input;
use crate::locate::{MatchMode, PageSearch, StructureEntry, StructureLocator};
use crate::parser::{HeadingCandidate, HeadingClassifier, Paragraph, heading_texts};

/// How an extraction run ended.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Outcome {
    /// Headings were classified and searched for
    Complete,
    /// The document was read but contains no headings
    NoHeadings,
    /// An input could not be read
    SourceUnavailable { reason: String },
}

/// Result of one extraction run.
#[derive(Debug, Clone, PartialEq)]
pub struct Extraction {
    pub headings: Vec<HeadingCandidate>,
    pub entries: Vec<StructureEntry>,
    pub unlocated: Vec<String>,
    pub outcome: Outcome,
}

impl Extraction {
    fn unavailable(headings: Vec<HeadingCandidate>, reason: String) -> Self {
        Self {
            headings,
            entries: Vec::new(),
            unlocated: Vec::new(),
            outcome: Outcome::SourceUnavailable { reason },
        }
    }

    fn no_headings() -> Self {
        Self {
            headings: Vec::new(),
            entries: Vec::new(),
            unlocated: Vec::new(),
            outcome: Outcome::NoHeadings,
        }
    }

    /// Whether the structure table is empty, for whatever reason.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Classify `paragraphs` and locate the headings in `pages`.
pub fn extract_from<P: PageSearch + ?Sized>(
    paragraphs: &[Paragraph],
    pages: &P,
    config: &Config,
) -> Extraction {
    let headings = HeadingClassifier::new(config.classifier.clone()).extract(paragraphs);
    if headings.is_empty() {
        tracing::warn!("no headings detected in document");
        return Extraction::no_headings();
    }
    locate_headings(headings, pages, config)
}

fn locate_headings<P: PageSearch + ?Sized>(
    headings: Vec<HeadingCandidate>,
    pages: &P,
    config: &Config,
) -> Extraction {
    let texts = heading_texts(&headings);
    let report = StructureLocator::new(config.locator.clone()).locate(pages, &texts);

    tracing::info!(
        headings = headings.len(),
        located = report.entries.len(),
        unlocated = report.unlocated.len(),
        "structure extracted"
    );

    Extraction {
        headings,
        entries: report.entries,
        unlocated: report.unlocated,
        outcome: Outcome::Complete,
    }
}

/// Read `document` (`.docx` or JSON paragraphs) and `pages` (PDF, JSON or
/// form-feed text) and build the structure table.
///
/// The page source is only opened once the document is known to contain
/// headings.
pub fn parse_structure(document: &Path, pages: &Path, config: &Config) -> Extraction {
    let paragraphs = match input::read_paragraphs(document) {
        Ok(paragraphs) => paragraphs,
        Err(e) => {
            tracing::error!(path = %document.display(), error = %e, "cannot read document");
            return Extraction::unavailable(Vec::new(), e.to_string());
        }
    };

    let headings = HeadingClassifier::new(config.classifier.clone()).extract(&paragraphs);
    if headings.is_empty() {
        tracing::warn!(path = %document.display(), "no headings detected in document");
        return Extraction::no_headings();
    }

    let mode = if config.locator.ignore_whitespace {
        MatchMode::IgnoreWhitespace
    } else {
        MatchMode::Exact
    };
    match input::read_pages(pages, mode) {
        Ok(text_pages) => locate_headings(headings, &text_pages, config),
        Err(e) => {
            tracing::error!(path = %pages.display(), error = %e, "cannot read pages");
            Extraction::unavailable(headings, e.to_string())
        }
    }
}
