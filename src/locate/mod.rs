//! Mapping headings to pages of a paginated rendering.
//!
//! The locator walks the headings in source order with a single forward
//! cursor. A heading is searched from the page of the last heading that was
//! found, never earlier, so each run scans the document once and the
//! resulting table follows document order. Headings that cannot be found are
//! dropped from the table.

pub mod pages;

use serde::{Deserialize, Serialize};

use crate::config::LocatorConfig;
use crate::parser::utils::{char_len, char_prefix};

pub use pages::{MatchMode, TextPages};

/// A paginated document that can be searched for exact text page by page.
pub trait PageSearch {
    /// Number of pages in the document.
    fn page_count(&self) -> usize;

    /// Whether `page` contains `text`. Out-of-range pages contain nothing.
    fn page_contains(&self, page: usize, text: &str) -> bool;

    /// First page at or after `start` containing `text`.
    fn find_from(&self, start: usize, text: &str) -> Option<usize> {
        (start..self.page_count()).find(|&page| self.page_contains(page, text))
    }
}

impl<T: PageSearch + ?Sized> PageSearch for &T {
    fn page_count(&self) -> usize {
        (**self).page_count()
    }

    fn page_contains(&self, page: usize, text: &str) -> bool {
        (**self).page_contains(page, text)
    }

    fn find_from(&self, start: usize, text: &str) -> Option<usize> {
        (**self).find_from(start, text)
    }
}

/// A heading with its inferred page range.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StructureEntry {
    pub title: String,
    pub start_page: usize,
    /// Equal to `start_page` for the last entry; the true end of the
    /// document is not known here.
    pub end_page: usize,
}

/// Outcome of one locator run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LocateReport {
    /// Headings found, with their start page, in source order
    pub located: Vec<(String, usize)>,
    /// Headings that were not found on any page at or after the cursor
    pub unlocated: Vec<String>,
    /// Page table built from the located headings
    pub entries: Vec<StructureEntry>,
}

/// Search for trimmed `text` starting at page `start`.
///
/// Empty text and empty documents are simply not found.
pub fn find_heading_page<P: PageSearch + ?Sized>(
    pages: &P,
    text: &str,
    start: usize,
) -> Option<usize> {
    let text = text.trim();
    if text.is_empty() || start >= pages.page_count() {
        return None;
    }
    pages.find_from(start, text)
}

/// Maps heading texts to start pages with a forward-only cursor.
#[derive(Debug, Clone, Default)]
pub struct StructureLocator {
    config: LocatorConfig,
}

impl StructureLocator {
    pub fn new(config: LocatorConfig) -> Self {
        Self { config }
    }

    /// Locate each heading and infer page ranges.
    ///
    /// The cursor starts at page 0 on every call and only moves forward to
    /// the page of a heading that was found.
    pub fn locate<P, S>(&self, pages: &P, headings: &[S]) -> LocateReport
    where
        P: PageSearch + ?Sized,
        S: AsRef<str>,
    {
        let mut cursor = 0;
        let mut report = LocateReport::default();

        for heading in headings {
            let heading = heading.as_ref().trim();

            match self.search(pages, heading, cursor) {
                Some(page) => {
                    tracing::info!(page, heading, "located heading");
                    report.located.push((heading.to_string(), page));
                    // Not page + 1: the next heading may start on the same page.
                    cursor = page;
                }
                None => {
                    tracing::warn!(cursor, heading, "heading not found");
                    report.unlocated.push(heading.to_string());
                }
            }
        }

        report.entries = infer_ranges(&report.located);
        report
    }

    fn search<P: PageSearch + ?Sized>(&self, pages: &P, heading: &str, cursor: usize) -> Option<usize> {
        find_heading_page(pages, heading, cursor).or_else(|| {
            // Line wrapping in the rendering can split long headings.
            if char_len(heading) > self.config.fallback_min_chars {
                let prefix = char_prefix(heading, self.config.fallback_prefix_chars);
                find_heading_page(pages, prefix, cursor)
            } else {
                None
            }
        })
    }
}

/// Turn located `(title, start_page)` pairs into page ranges.
///
/// Each entry ends one page before the next entry starts, but never before
/// its own start page. The last entry ends on its start page.
pub fn infer_ranges(located: &[(String, usize)]) -> Vec<StructureEntry> {
    located
        .iter()
        .enumerate()
        .map(|(i, (title, start_page))| {
            let end_page = match located.get(i + 1) {
                Some((_, next_start)) => (*start_page).max(next_start.saturating_sub(1)),
                None => *start_page,
            };
            StructureEntry {
                title: title.clone(),
                start_page: *start_page,
                end_page,
            }
        })
        .collect()
}
