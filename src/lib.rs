//! # docstruct
//!
//! Heading outline and page ranges for word-processed documents.
//!
//! This library classifies the paragraphs of a `.docx` document into a
//! heading hierarchy using numbering conventions common in formal Chinese
//! documents (`第一章`, `一、`, `1.1`, `1.`), then places each heading on a
//! page of the document's paginated rendering to produce a table of contents
//! with page ranges.
//!
//! ## Features
//!
//! - Rule-based heading classification with emphasis checks for bare numerals
//! - Forward-only page search with a prefix fallback for long headings
//! - Page range inference for every located heading
//! - Heading tree rendering and page-to-section lookup
//!
//! ## Example
//!
//! ```rust
//! use docstruct::{Config, Paragraph, TextPages, extract_from};
//!
//! let paragraphs = vec![
//!     Paragraph::new(0, "第一章 概述"),
//!     Paragraph::new(1, "本章介绍项目背景。"),
//!     Paragraph::new(2, "第二章 需求"),
//! ];
//! let pages = TextPages::new(vec![
//!     "第一章 概述".to_string(),
//!     "正文".to_string(),
//!     "第二章 需求".to_string(),
//! ]);
//!
//! let extraction = extract_from(&paragraphs, &pages, &Config::default());
//! for entry in &extraction.entries {
//!     println!("{} {}-{}", entry.title, entry.start_page, entry.end_page);
//! }
//! assert_eq!(extraction.entries[0].end_page, 1);
//! ```

/// Configuration module for classifier, locator and output settings.
///
/// Settings are read from a TOML file in the user's config directory.
pub mod config;

/// Error types for reading document and page sources.
pub mod error;

/// End-to-end extraction combining classification and page location.
pub mod extract;

/// Input handling module for document and page files.
///
/// Chooses a reader from the file extension.
pub mod input;

/// Heading location within paginated text.
pub mod locate;

/// Heading hierarchy and page-to-section lookup.
pub mod outline;

/// Parser module for document paragraphs and heading classification.
pub mod parser;

// Re-export commonly used types for convenience
pub use config::Config;
pub use error::SourceError;
pub use extract::{Extraction, Outcome, extract_from, parse_structure};
pub use locate::{PageSearch, StructureEntry, StructureLocator, TextPages};
pub use outline::Outline;
pub use parser::{HeadingCandidate, HeadingClassifier, HeadingLevel, Paragraph};
