//! JSON output types for an extraction run

use serde::{Deserialize, Serialize};

use super::document::HeadingCandidate;
use crate::extract::{Extraction, Outcome};
use crate::locate::StructureEntry;

/// Root document structure with metadata, headings and the page table
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentOutput {
    pub document: DocumentRoot,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentRoot {
    pub metadata: DocumentMetadata,
    pub headings: Vec<HeadingCandidate>,
    pub structure: Vec<StructureEntry>,
    /// Headings that could not be placed on any page
    pub unlocated: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentMetadata {
    pub source: Option<String>,
    pub pages: Option<String>,
    pub outcome: Outcome,
    #[serde(rename = "headingCount")]
    pub heading_count: usize,
    #[serde(rename = "locatedCount")]
    pub located_count: usize,
}

/// Build the JSON view of an extraction.
pub fn build_json_output(
    extraction: &Extraction,
    source: Option<&str>,
    pages: Option<&str>,
) -> DocumentOutput {
    DocumentOutput {
        document: DocumentRoot {
            metadata: DocumentMetadata {
                source: source.map(str::to_string),
                pages: pages.map(str::to_string),
                outcome: extraction.outcome.clone(),
                heading_count: extraction.headings.len(),
                located_count: extraction.entries.len(),
            },
            headings: extraction.headings.clone(),
            structure: extraction.entries.clone(),
            unlocated: extraction.unlocated.clone(),
        },
    }
}
