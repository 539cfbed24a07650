//! Text helpers shared by the classifier and the page locator.
//!
//! Lengths are counted in Unicode scalar values, never bytes, so CJK
//! headings measure the same as their Latin counterparts.

/// Sentence-terminal marks that disqualify a heading.
pub const TERMINAL_PUNCTUATION: [char; 4] = ['。', '.', '；', ';'];

/// Commas in either script.
pub const COMMAS: [char; 2] = ['，', ','];

/// Number of characters in `text`.
///
/// # Examples
///
/// ```
/// # use docstruct::parser::utils::char_len;
/// assert_eq!(char_len("第一章 绪论"), 6);
/// assert_eq!(char_len("abc"), 3);
/// ```
pub fn char_len(text: &str) -> usize {
    text.chars().count()
}

/// The first `n` characters of `text`, or all of it if shorter.
///
/// # Examples
///
/// ```
/// # use docstruct::parser::utils::char_prefix;
/// assert_eq!(char_prefix("第二章 系统需求分析", 3), "第二章");
/// assert_eq!(char_prefix("ab", 5), "ab");
/// ```
pub fn char_prefix(text: &str, n: usize) -> &str {
    match text.char_indices().nth(n) {
        Some((byte, _)) => &text[..byte],
        None => text,
    }
}

/// Whether the text reads like a sentence or clause rather than a title.
pub fn ends_like_sentence(text: &str) -> bool {
    text.ends_with(TERMINAL_PUNCTUATION)
}

/// Whether the text contains a comma in either script.
pub fn contains_comma(text: &str) -> bool {
    text.contains(COMMAS)
}

/// Remove every whitespace character.
///
/// Text extracted from a paginated rendering carries line breaks and
/// spacing that the source paragraph never had; comparing compacted forms
/// makes a heading findable across such breaks.
///
/// # Examples
///
/// ```
/// # use docstruct::parser::utils::compact_whitespace;
/// assert_eq!(compact_whitespace("第一章\n 概 述"), "第一章概述");
/// ```
pub fn compact_whitespace(text: &str) -> String {
    text.chars().filter(|c| !c.is_whitespace()).collect()
}

/// Terminal columns occupied by `text`; CJK characters take two.
pub fn display_width(text: &str) -> usize {
    unicode_width::UnicodeWidthStr::width(text)
}

/// Pad `text` with spaces to `width` terminal columns.
pub fn pad_display(text: &str, width: usize) -> String {
    let current = display_width(text);
    if current >= width {
        text.to_string()
    } else {
        format!("{}{}", text, " ".repeat(width - current))
    }
}
