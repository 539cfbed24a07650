use serde::{Deserialize, Serialize};

/// A paragraph of a word-processed document with its typographic attributes.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Paragraph {
    /// Zero-based position in the document
    pub index: usize,
    /// Raw paragraph text
    pub text: String,
    /// Bold flag of the paragraph style
    #[serde(default)]
    pub is_bold: bool,
    /// Character runs in document order
    #[serde(default)]
    pub runs: Vec<Run>,
}

/// A sub-span of a paragraph sharing one set of character properties.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Run {
    #[serde(default)]
    pub bold: bool,
    /// Font size in points, if set directly on the run
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font_size: Option<f32>,
}

impl Paragraph {
    /// Create a paragraph without style information.
    pub fn new(index: usize, text: impl Into<String>) -> Self {
        Self {
            index,
            text: text.into(),
            is_bold: false,
            runs: Vec::new(),
        }
    }

    /// Builder-style helper to append a run.
    pub fn with_run(mut self, bold: bool, font_size: Option<f32>) -> Self {
        self.runs.push(Run { bold, font_size });
        self
    }

    /// Builder-style helper to set the style-level bold flag.
    pub fn with_style_bold(mut self, bold: bool) -> Self {
        self.is_bold = bold;
        self
    }

    /// Largest font size set on any run.
    pub fn max_font_size(&self) -> Option<f32> {
        self.runs
            .iter()
            .filter_map(|r| r.font_size)
            .fold(None, |acc, size| match acc {
                Some(max) if max >= size => Some(max),
                _ => Some(size),
            })
    }
}

/// Structural level of a heading, from outermost to innermost.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
    strum::IntoStaticStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum HeadingLevel {
    Chapter,
    Level2,
    Level3,
    Level4,
}

impl HeadingLevel {
    /// Depth in the outline, 1 for chapters.
    pub fn rank(self) -> usize {
        match self {
            HeadingLevel::Chapter => 1,
            HeadingLevel::Level2 => 2,
            HeadingLevel::Level3 => 3,
            HeadingLevel::Level4 => 4,
        }
    }
}

/// How a heading candidate was recognised.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchKind {
    RuleMatch,
}

/// A paragraph recognised as a heading.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HeadingCandidate {
    /// Index of the paragraph this heading came from
    pub source_index: usize,
    /// Trimmed heading text
    pub text: String,
    pub level: HeadingLevel,
    pub match_kind: MatchKind,
}
