//! Paragraph model, paragraph sources and heading classification.
//!
//! Paragraphs come either from a `.docx` file ([`docx`]) or from a JSON
//! dump (see [`crate::input`]). The [`classifier`] turns them into heading
//! candidates.

pub mod classifier;
mod document;
pub mod docx;
pub mod output;
pub mod utils;

pub use classifier::{HeadingClassifier, is_emphasized, level_counts};
pub use document::{HeadingCandidate, HeadingLevel, MatchKind, Paragraph, Run};
pub use output::{DocumentOutput, build_json_output};

/// Classify paragraphs with the default limits.
///
/// # Examples
///
/// ```
/// use docstruct::parser::{HeadingLevel, Paragraph, classify_paragraphs};
///
/// let paragraphs = vec![
///     Paragraph::new(0, "第一章 绪论"),
///     Paragraph::new(1, "本章介绍项目背景。"),
///     Paragraph::new(2, "1.1 研究目的"),
/// ];
/// let headings = classify_paragraphs(&paragraphs);
/// assert_eq!(headings.len(), 2);
/// assert_eq!(headings[1].level, HeadingLevel::Level3);
/// ```
pub fn classify_paragraphs(paragraphs: &[Paragraph]) -> Vec<HeadingCandidate> {
    HeadingClassifier::default().extract(paragraphs)
}

/// Heading texts in source order, the input of the page locator.
pub fn heading_texts(headings: &[HeadingCandidate]) -> Vec<String> {
    headings.iter().map(|h| h.text.clone()).collect()
}
