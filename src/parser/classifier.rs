//! Rule-based heading classification.
//!
//! Each paragraph goes through two stages. Veto rules first discard text
//! that cannot be a title (too long, sentence punctuation, commas). The
//! survivors are tested against an ordered rule list; the first matching
//! rule decides the level. Weak rules additionally require the paragraph
//! to be visually emphasized, which is what keeps numbered body-list items
//! such as `5.信用记录查询` out of the outline.

use indexmap::IndexMap;
use regex::Regex;
use std::sync::OnceLock;

use super::document::{HeadingCandidate, HeadingLevel, MatchKind, Paragraph};
use super::utils::{char_len, contains_comma, ends_like_sentence};
use crate::config::ClassifierConfig;

/// Whether a rule stands on its own or needs visual emphasis.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strength {
    Strong,
    Weak,
}

/// One entry of the ordered rule list.
#[derive(Debug)]
pub struct HeadingRule {
    pub name: &'static str,
    pub pattern: Regex,
    pub level: HeadingLevel,
    pub strength: Strength,
}

/// The fixed, priority-ordered rule list.
///
/// Order matters: `1.1` must be tried before `1.` or the dotted-decimal
/// heading would be captured by the weak bare-numeral rule.
pub fn rules() -> &'static [HeadingRule] {
    static RULES: OnceLock<Vec<HeadingRule>> = OnceLock::new();
    RULES.get_or_init(|| {
        vec![
            HeadingRule {
                name: "chapter_marker",
                pattern: Regex::new(r"^第[一二三四五六七八九十0-9]+[章节]").unwrap(),
                level: HeadingLevel::Chapter,
                strength: Strength::Strong,
            },
            HeadingRule {
                name: "format_marker",
                pattern: Regex::new(r"^格式[一二三四五六七八九十0-9]+[：:]?").unwrap(),
                level: HeadingLevel::Level2,
                strength: Strength::Strong,
            },
            HeadingRule {
                name: "cjk_enumerator",
                pattern: Regex::new(r"^[一二三四五六七八九十]+、").unwrap(),
                level: HeadingLevel::Level2,
                strength: Strength::Strong,
            },
            HeadingRule {
                name: "dotted_decimal",
                pattern: Regex::new(r"^\d+(\.\d+)+").unwrap(),
                level: HeadingLevel::Level3,
                strength: Strength::Strong,
            },
            HeadingRule {
                name: "bare_numeral",
                pattern: Regex::new(r"^\d+[.、]").unwrap(),
                level: HeadingLevel::Level4,
                strength: Strength::Weak,
            },
        ]
    })
}

/// Whether the paragraph stands out from body text.
///
/// True if the paragraph style is bold, any run is bold, or the largest run
/// font size is strictly above `font_threshold` (points). A paragraph with no
/// runs and no sizes inherits body style and is not emphasized.
pub fn is_emphasized(paragraph: &Paragraph, font_threshold: f32) -> bool {
    if paragraph.is_bold {
        return true;
    }
    if paragraph.runs.iter().any(|r| r.bold) {
        return true;
    }
    paragraph
        .max_font_size()
        .is_some_and(|size| size > font_threshold)
}

/// Classifies paragraphs as headings.
#[derive(Debug, Clone, Default)]
pub struct HeadingClassifier {
    config: ClassifierConfig,
}

impl HeadingClassifier {
    pub fn new(config: ClassifierConfig) -> Self {
        Self { config }
    }

    /// Classify a single paragraph.
    ///
    /// Returns `None` for empty text, vetoed text, text no rule matches, and
    /// weak matches without emphasis.
    pub fn classify(&self, paragraph: &Paragraph) -> Option<HeadingCandidate> {
        let text = paragraph.text.trim();
        if text.is_empty() || self.is_vetoed(text) {
            return None;
        }

        let rule = rules().iter().find(|rule| rule.pattern.is_match(text))?;
        if rule.strength == Strength::Weak
            && !is_emphasized(paragraph, self.config.emphasis_font_size)
        {
            return None;
        }

        Some(HeadingCandidate {
            source_index: paragraph.index,
            text: text.to_string(),
            level: rule.level,
            match_kind: MatchKind::RuleMatch,
        })
    }

    /// Classify every paragraph, keeping document order.
    pub fn extract(&self, paragraphs: &[Paragraph]) -> Vec<HeadingCandidate> {
        let headings: Vec<_> = paragraphs.iter().filter_map(|p| self.classify(p)).collect();

        tracing::info!(
            paragraphs = paragraphs.len(),
            headings = headings.len(),
            "classified headings"
        );
        let counts = level_counts(&headings);
        if !counts.is_empty() {
            tracing::debug!(?counts, "heading level distribution");
        }

        headings
    }

    fn is_vetoed(&self, text: &str) -> bool {
        char_len(text) > self.config.max_heading_chars
            || ends_like_sentence(text)
            || contains_comma(text)
    }
}

/// Number of headings at each level, outermost level first.
pub fn level_counts(headings: &[HeadingCandidate]) -> IndexMap<HeadingLevel, usize> {
    let mut counts: IndexMap<HeadingLevel, usize> = IndexMap::new();
    for heading in headings {
        *counts.entry(heading.level).or_insert(0) += 1;
    }
    counts.sort_keys();
    counts
}

#[cfg(test)]
mod tests {
    use super::*;

    fn classify(paragraph: &Paragraph) -> Option<HeadingCandidate> {
        HeadingClassifier::default().classify(paragraph)
    }

    fn level_of(text: &str) -> Option<HeadingLevel> {
        classify(&Paragraph::new(0, text)).map(|h| h.level)
    }

    #[test]
    fn test_rule_order_is_fixed() {
        let names: Vec<_> = rules().iter().map(|r| r.name).collect();
        assert_eq!(
            names,
            [
                "chapter_marker",
                "format_marker",
                "cjk_enumerator",
                "dotted_decimal",
                "bare_numeral"
            ]
        );
        assert_eq!(rules()[4].strength, Strength::Weak);
        assert!(rules()[..4].iter().all(|r| r.strength == Strength::Strong));
    }

    #[test]
    fn test_strong_patterns() {
        assert_eq!(level_of("第一章 绪论"), Some(HeadingLevel::Chapter));
        assert_eq!(level_of("第12节 附则"), Some(HeadingLevel::Chapter));
        assert_eq!(level_of("格式二：投标函"), Some(HeadingLevel::Level2));
        assert_eq!(level_of("格式3"), Some(HeadingLevel::Level2));
        assert_eq!(level_of("三、评标办法"), Some(HeadingLevel::Level2));
        assert_eq!(level_of("1.1 项目概况"), Some(HeadingLevel::Level3));
        assert_eq!(level_of("2.3.4 技术参数"), Some(HeadingLevel::Level3));
    }

    #[test]
    fn test_chapter_ignores_font_attributes() {
        let plain = Paragraph::new(0, "第一章 绪论");
        let small = Paragraph::new(1, "第一章 绪论").with_run(false, Some(9.0));
        let loud = Paragraph::new(2, "第一章 绪论")
            .with_style_bold(true)
            .with_run(true, Some(22.0));
        for para in [plain, small, loud] {
            let heading = classify(&para).unwrap();
            assert_eq!(heading.level, HeadingLevel::Chapter);
            assert_eq!(heading.source_index, para.index);
        }
    }

    #[test]
    fn test_weak_rule_requires_emphasis() {
        let body_item = Paragraph::new(7, "5.信用记录查询");
        assert!(classify(&body_item).is_none());

        let bold_run = Paragraph::new(7, "5.信用记录查询").with_run(true, None);
        let heading = classify(&bold_run).unwrap();
        assert_eq!(heading.level, HeadingLevel::Level4);
        assert_eq!(heading.text, "5.信用记录查询");
        assert_eq!(heading.match_kind, MatchKind::RuleMatch);

        let enum_style = Paragraph::new(8, "1、资格审查").with_style_bold(true);
        assert_eq!(classify(&enum_style).unwrap().level, HeadingLevel::Level4);
    }

    #[test]
    fn test_dotted_decimal_wins_over_bare_numeral() {
        // Unemphasized: the weak rule would reject it, the strong one accepts.
        assert_eq!(level_of("1.2 评审标准"), Some(HeadingLevel::Level3));
    }

    #[test]
    fn test_veto_rules() {
        let long = format!("第一章 {}", "很".repeat(50));
        assert!(level_of(&long).is_none());
        assert!(level_of("第一章 总则。").is_none());
        assert!(level_of("1.1 范围;").is_none());
        assert!(level_of("二、投标人须知；").is_none());
        assert!(level_of("一、总则，适用范围").is_none());
        assert!(level_of("1.1 scope, terms").is_none());
    }

    #[test]
    fn test_length_limit_counts_characters() {
        let exactly_fifty = format!("第一章{}", "中".repeat(47));
        assert_eq!(char_len(&exactly_fifty), 50);
        assert_eq!(level_of(&exactly_fifty), Some(HeadingLevel::Chapter));

        let fifty_one = format!("{}中", exactly_fifty);
        assert!(level_of(&fifty_one).is_none());
    }

    #[test]
    fn test_unmatched_and_empty_text() {
        assert!(level_of("项目背景").is_none());
        assert!(level_of("   ").is_none());
        assert!(level_of("").is_none());
        assert!(level_of("附录A").is_none());
    }

    #[test]
    fn test_text_is_trimmed() {
        let heading = classify(&Paragraph::new(0, "  第二章 需求  \n")).unwrap();
        assert_eq!(heading.text, "第二章 需求");
    }

    #[test]
    fn test_emphasis_gate_in_isolation() {
        let threshold = 12.5;
        assert!(!is_emphasized(&Paragraph::new(0, "x"), threshold));
        assert!(is_emphasized(&Paragraph::new(0, "x").with_style_bold(true), threshold));
        assert!(is_emphasized(
            &Paragraph::new(0, "x").with_run(false, None).with_run(true, None),
            threshold
        ));
        assert!(is_emphasized(
            &Paragraph::new(0, "x").with_run(false, Some(14.0)),
            threshold
        ));
        // Strictly greater than the threshold.
        assert!(!is_emphasized(
            &Paragraph::new(0, "x").with_run(false, Some(12.5)),
            threshold
        ));
        assert!(!is_emphasized(
            &Paragraph::new(0, "x").with_run(false, Some(10.5)),
            threshold
        ));
    }

    #[test]
    fn test_large_font_satisfies_weak_rule() {
        let para = Paragraph::new(3, "2.资格要求").with_run(false, Some(16.0));
        assert_eq!(classify(&para).unwrap().level, HeadingLevel::Level4);
    }

    #[test]
    fn test_custom_limits_from_config() {
        let classifier = HeadingClassifier::new(ClassifierConfig {
            max_heading_chars: 5,
            emphasis_font_size: 20.0,
        });
        assert!(classifier.classify(&Paragraph::new(0, "第一章 绪论")).is_none());
        let sized = Paragraph::new(1, "5.查询").with_run(false, Some(16.0));
        assert!(classifier.classify(&sized).is_none());
    }

    #[test]
    fn test_extract_keeps_order_and_is_idempotent() {
        let paragraphs = vec![
            Paragraph::new(0, "招标文件"),
            Paragraph::new(1, "第一章 招标公告"),
            Paragraph::new(2, "一、项目概况"),
            Paragraph::new(3, "本项目采用公开招标方式进行。"),
            Paragraph::new(4, ""),
            Paragraph::new(5, "1.1 项目名称"),
            Paragraph::new(6, "5.信用记录查询"),
            Paragraph::new(7, "6.资格审查").with_run(true, Some(12.0)),
            Paragraph::new(8, "第二章 投标人须知"),
        ];

        let classifier = HeadingClassifier::default();
        let first = classifier.extract(&paragraphs);
        let second = classifier.extract(&paragraphs);
        assert_eq!(first, second);

        let summary: Vec<_> = first
            .iter()
            .map(|h| (h.source_index, h.level))
            .collect();
        assert_eq!(
            summary,
            [
                (1, HeadingLevel::Chapter),
                (2, HeadingLevel::Level2),
                (5, HeadingLevel::Level3),
                (7, HeadingLevel::Level4),
                (8, HeadingLevel::Chapter),
            ]
        );
    }

    #[test]
    fn test_level_counts_in_level_order() {
        let paragraphs = vec![
            Paragraph::new(0, "1.1 名称"),
            Paragraph::new(1, "第一章 总则"),
            Paragraph::new(2, "1.2 地点"),
        ];
        let headings = HeadingClassifier::default().extract(&paragraphs);
        let counts: Vec<_> = level_counts(&headings).into_iter().collect();
        assert_eq!(
            counts,
            [(HeadingLevel::Chapter, 1), (HeadingLevel::Level3, 2)]
        );
    }
}
