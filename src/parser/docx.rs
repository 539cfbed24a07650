//! Paragraph extraction from `.docx` files.
//!
//! Reads `word/document.xml` for body paragraphs and `word/styles.xml` for
//! paragraph-style bold flags. Only top-level body paragraphs are returned;
//! paragraphs inside tables and text boxes are not part of the heading
//! stream. Empty paragraphs are kept so indices match document positions.

use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};
use std::collections::HashMap;
use std::fs::File;
use std::io::{Read, Seek};
use std::path::Path;
use zip::ZipArchive;
use zip::result::ZipError;

use super::document::{Paragraph, Run};
use crate::error::SourceError;

const DOCUMENT_PART: &str = "word/document.xml";
const STYLES_PART: &str = "word/styles.xml";

/// Read all body paragraphs of a `.docx` file.
///
/// # Errors
///
/// Returns an error if the file cannot be opened, is not a zip archive,
/// lacks `word/document.xml`, or contains malformed XML.
pub fn read_paragraphs(path: &Path) -> Result<Vec<Paragraph>, SourceError> {
    let file = File::open(path)?;
    let mut archive = ZipArchive::new(file)?;

    let document_xml =
        read_part(&mut archive, DOCUMENT_PART)?.ok_or_else(|| SourceError::MissingPart {
            path: path.to_path_buf(),
            part: DOCUMENT_PART,
        })?;
    let styles = match read_part(&mut archive, STYLES_PART)? {
        Some(xml) => StyleTable::parse(&xml)?,
        None => StyleTable::default(),
    };

    let paragraphs = parse_document(&document_xml, &styles)?;
    tracing::debug!(path = %path.display(), paragraphs = paragraphs.len(), "read docx");
    Ok(paragraphs)
}

fn read_part<R: Read + Seek>(
    archive: &mut ZipArchive<R>,
    name: &str,
) -> Result<Option<String>, SourceError> {
    match archive.by_name(name) {
        Ok(mut part) => {
            let mut xml = String::new();
            part.read_to_string(&mut xml)?;
            Ok(Some(xml))
        }
        Err(ZipError::FileNotFound) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

/// Bold flags of paragraph styles, keyed by style id.
#[derive(Debug, Clone, Default)]
pub struct StyleTable {
    bold: HashMap<String, bool>,
    default_paragraph: Option<String>,
}

impl StyleTable {
    /// Parse `word/styles.xml`.
    ///
    /// Only bold set directly in a style's own run properties counts; table
    /// conditional formatting and document defaults are ignored.
    pub fn parse(xml: &str) -> Result<Self, SourceError> {
        let mut reader = Reader::from_str(xml);
        let mut table = StyleTable::default();

        let mut current: Option<(String, bool)> = None;
        let mut in_rpr = false;
        let mut conditional_depth = 0usize;
        let mut change_depth = 0usize;

        loop {
            match reader.read_event()? {
                Event::Start(e) if change_depth > 0 || is_revision(e.local_name().as_ref()) => {
                    if is_revision(e.local_name().as_ref()) {
                        change_depth += 1;
                    }
                }
                Event::End(e) if change_depth > 0 => {
                    if is_revision(e.local_name().as_ref()) {
                        change_depth -= 1;
                    }
                }
                Event::Empty(_) if change_depth > 0 => {}
                Event::Start(e) => match e.local_name().as_ref() {
                    b"style" => {
                        current = table.begin_style(&e);
                    }
                    b"tblStylePr" => conditional_depth += 1,
                    b"rPr" if current.is_some() && conditional_depth == 0 => in_rpr = true,
                    b"b" if in_rpr => set_bold(&mut current, &e),
                    _ => {}
                },
                Event::Empty(e) => match e.local_name().as_ref() {
                    b"style" => {
                        if let Some((id, bold)) = table.begin_style(&e) {
                            table.bold.insert(id, bold);
                        }
                    }
                    b"b" if in_rpr => set_bold(&mut current, &e),
                    _ => {}
                },
                Event::End(e) => match e.local_name().as_ref() {
                    b"style" => {
                        if let Some((id, bold)) = current.take() {
                            table.bold.insert(id, bold);
                        }
                        in_rpr = false;
                    }
                    b"tblStylePr" => conditional_depth = conditional_depth.saturating_sub(1),
                    b"rPr" => in_rpr = false,
                    _ => {}
                },
                Event::Eof => break,
                _ => {}
            }
        }

        Ok(table)
    }

    fn begin_style(&mut self, e: &BytesStart) -> Option<(String, bool)> {
        let id = attr(e, b"styleId")?;
        let is_default = matches!(attr(e, b"default").as_deref(), Some("1" | "true" | "on"));
        if is_default && attr(e, b"type").as_deref() == Some("paragraph") {
            self.default_paragraph = Some(id.clone());
        }
        Some((id, false))
    }

    /// Bold flag of a paragraph style, falling back to the default style
    /// when the id is absent or not defined in `styles.xml`.
    pub fn is_bold(&self, style_id: Option<&str>) -> bool {
        style_id
            .filter(|id| self.bold.contains_key(*id))
            .or(self.default_paragraph.as_deref())
            .and_then(|id| self.bold.get(id))
            .copied()
            .unwrap_or(false)
    }
}

fn set_bold(current: &mut Option<(String, bool)>, e: &BytesStart) {
    if let Some((_, bold)) = current {
        *bold = is_on(attr(e, b"val"));
    }
}

/// Tracked-change containers (`w:rPrChange`, `w:pPrChange`, ...) holding
/// the properties as they were before the revision.
fn is_revision(local_name: &[u8]) -> bool {
    local_name.ends_with(b"Change")
}

/// Value of the attribute with the given local name.
fn attr(e: &BytesStart, key: &[u8]) -> Option<String> {
    e.attributes()
        .flatten()
        .find(|a| a.key.local_name().as_ref() == key)
        .and_then(|a| a.unescape_value().ok().map(|v| v.into_owned()))
}

/// WordprocessingML on/off value; a missing `w:val` means on.
fn is_on(val: Option<String>) -> bool {
    !matches!(val.as_deref(), Some("0" | "false" | "off"))
}

#[derive(Debug, Default)]
struct ParagraphBuilder {
    text: String,
    style_id: Option<String>,
    runs: Vec<Run>,
}

impl ParagraphBuilder {
    fn finish(self, index: usize, styles: &StyleTable) -> Paragraph {
        Paragraph {
            index,
            is_bold: styles.is_bold(self.style_id.as_deref()),
            text: self.text,
            runs: self.runs,
        }
    }
}

/// Parser state while walking `word/document.xml`.
#[derive(Debug, Default)]
struct BodyWalker {
    paragraphs: Vec<Paragraph>,
    current: Option<ParagraphBuilder>,
    run: Option<Run>,
    table_depth: usize,
    paragraph_depth: usize,
    change_depth: usize,
    in_ppr: bool,
    in_rpr: bool,
    in_text: bool,
}

impl BodyWalker {
    /// Inside the outermost paragraph of a body-level (non-table) paragraph.
    fn at_body_paragraph(&self) -> bool {
        self.paragraph_depth == 1 && self.current.is_some()
    }

    fn start(&mut self, e: &BytesStart) {
        if self.change_depth > 0 || is_revision(e.local_name().as_ref()) {
            if is_revision(e.local_name().as_ref()) {
                self.change_depth += 1;
            }
            return;
        }
        match e.local_name().as_ref() {
            b"tbl" => self.table_depth += 1,
            b"p" => {
                self.paragraph_depth += 1;
                if self.paragraph_depth == 1 && self.table_depth == 0 {
                    self.current = Some(ParagraphBuilder::default());
                }
            }
            b"pPr" if self.at_body_paragraph() => self.in_ppr = true,
            b"r" if self.at_body_paragraph() => self.run = Some(Run::default()),
            b"rPr" if self.at_body_paragraph() && self.run.is_some() && !self.in_ppr => {
                self.in_rpr = true
            }
            b"t" if self.at_body_paragraph() && self.run.is_some() => self.in_text = true,
            _ => self.property(e),
        }
    }

    fn empty(&mut self, e: &BytesStart, styles: &StyleTable) {
        match e.local_name().as_ref() {
            b"p" if self.paragraph_depth == 0 && self.table_depth == 0 => {
                let index = self.paragraphs.len();
                self.paragraphs
                    .push(ParagraphBuilder::default().finish(index, styles));
            }
            _ => self.property(e),
        }
    }

    /// Properties and inline content that can appear as empty elements.
    fn property(&mut self, e: &BytesStart) {
        if !self.at_body_paragraph() || self.change_depth > 0 {
            return;
        }
        match e.local_name().as_ref() {
            b"pStyle" if self.in_ppr => {
                if let Some(builder) = self.current.as_mut() {
                    builder.style_id = attr(e, b"val");
                }
            }
            b"b" if self.in_rpr => {
                if let Some(run) = self.run.as_mut() {
                    run.bold = is_on(attr(e, b"val"));
                }
            }
            b"sz" if self.in_rpr => {
                if let Some(run) = self.run.as_mut() {
                    // Half-points.
                    run.font_size = attr(e, b"val")
                        .and_then(|v| v.parse::<f32>().ok())
                        .map(|half_points| half_points / 2.0);
                }
            }
            b"tab" if self.run.is_some() && !self.in_ppr => self.push_text("\t"),
            b"br" | b"cr" if self.run.is_some() => self.push_text("\n"),
            _ => {}
        }
    }

    fn push_text(&mut self, text: &str) {
        if let Some(builder) = self.current.as_mut() {
            builder.text.push_str(text);
        }
    }

    fn end(&mut self, local_name: &[u8], styles: &StyleTable) {
        if self.change_depth > 0 {
            if is_revision(local_name) {
                self.change_depth -= 1;
            }
            return;
        }
        match local_name {
            b"t" => self.in_text = false,
            b"rPr" => self.in_rpr = false,
            b"pPr" if self.paragraph_depth == 1 => self.in_ppr = false,
            b"r" if self.paragraph_depth == 1 => {
                if let (Some(run), Some(builder)) = (self.run.take(), self.current.as_mut()) {
                    builder.runs.push(run);
                }
            }
            b"p" => {
                if self.paragraph_depth == 1 {
                    if let Some(builder) = self.current.take() {
                        let index = self.paragraphs.len();
                        self.paragraphs.push(builder.finish(index, styles));
                    }
                    self.in_ppr = false;
                }
                self.paragraph_depth = self.paragraph_depth.saturating_sub(1);
            }
            b"tbl" => self.table_depth = self.table_depth.saturating_sub(1),
            _ => {}
        }
    }
}

/// Parse the body of `word/document.xml` into paragraphs.
pub fn parse_document(xml: &str, styles: &StyleTable) -> Result<Vec<Paragraph>, SourceError> {
    let mut reader = Reader::from_str(xml);
    let mut walker = BodyWalker::default();

    loop {
        match reader.read_event()? {
            Event::Start(e) => walker.start(&e),
            Event::Empty(e) => walker.empty(&e, styles),
            Event::Text(e) if walker.in_text => {
                let text = e.unescape().map_err(quick_xml::Error::from)?;
                walker.push_text(&text);
            }
            Event::End(e) => walker.end(e.local_name().as_ref(), styles),
            Event::Eof => break,
            _ => {}
        }
    }

    Ok(walker.paragraphs)
}

#[cfg(test)]
mod tests {
    use super::*;

    const STYLES: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<w:styles xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main">
  <w:docDefaults><w:rPrDefault><w:rPr><w:b/></w:rPr></w:rPrDefault></w:docDefaults>
  <w:style w:type="paragraph" w:default="1" w:styleId="Normal">
    <w:name w:val="Normal"/>
  </w:style>
  <w:style w:type="paragraph" w:styleId="Heading1">
    <w:name w:val="heading 1"/>
    <w:rPr><w:b/><w:sz w:val="32"/></w:rPr>
  </w:style>
  <w:style w:type="paragraph" w:styleId="NotBold">
    <w:rPr><w:b w:val="0"/></w:rPr>
  </w:style>
  <w:style w:type="table" w:styleId="Grid">
    <w:tblStylePr w:type="firstRow"><w:rPr><w:b/></w:rPr></w:tblStylePr>
  </w:style>
</w:styles>"#;

    fn body(inner: &str) -> String {
        format!(
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<w:document xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main"><w:body>{inner}</w:body></w:document>"#
        )
    }

    #[test]
    fn test_style_table() {
        let styles = StyleTable::parse(STYLES).unwrap();
        assert!(styles.is_bold(Some("Heading1")));
        assert!(!styles.is_bold(Some("NotBold")));
        assert!(!styles.is_bold(Some("Grid")));
        assert!(!styles.is_bold(Some("Missing")));
        // Document defaults do not make the default style bold.
        assert!(!styles.is_bold(None));
    }

    #[test]
    fn test_default_paragraph_style_applies_without_pstyle() {
        let xml = r#"<w:styles xmlns:w="w"><w:style w:type="paragraph" w:default="1" w:styleId="Body"><w:rPr><w:b/></w:rPr></w:style></w:styles>"#;
        let styles = StyleTable::parse(xml).unwrap();
        assert!(styles.is_bold(None));
    }

    #[test]
    fn test_paragraph_text_and_runs() {
        let styles = StyleTable::parse(STYLES).unwrap();
        let xml = body(
            r#"<w:p><w:pPr><w:pStyle w:val="Heading1"/><w:rPr><w:sz w:val="44"/></w:rPr></w:pPr>
                 <w:r><w:t>第一章</w:t></w:r><w:r><w:t xml:space="preserve"> 绪论</w:t></w:r></w:p>
               <w:p><w:r><w:rPr><w:b/><w:sz w:val="28"/></w:rPr><w:t>5.信用记录查询</w:t></w:r></w:p>
               <w:p><w:r><w:rPr><w:b w:val="false"/></w:rPr><w:t>A&amp;B</w:t><w:tab/><w:t>c</w:t></w:r></w:p>"#,
        );
        let paragraphs = parse_document(&xml, &styles).unwrap();
        assert_eq!(paragraphs.len(), 3);

        assert_eq!(paragraphs[0].text, "第一章 绪论");
        assert!(paragraphs[0].is_bold);
        // Paragraph-mark properties are not a run.
        assert_eq!(paragraphs[0].runs.len(), 2);
        assert_eq!(paragraphs[0].max_font_size(), None);

        assert_eq!(paragraphs[1].index, 1);
        assert!(!paragraphs[1].is_bold);
        assert!(paragraphs[1].runs[0].bold);
        assert_eq!(paragraphs[1].runs[0].font_size, Some(14.0));

        assert_eq!(paragraphs[2].text, "A&B\tc");
        assert!(!paragraphs[2].runs[0].bold);
    }

    #[test]
    fn test_tables_and_empty_paragraphs() {
        let styles = StyleTable::default();
        let xml = body(
            r#"<w:p/>
               <w:tbl><w:tr><w:tc><w:p><w:r><w:t>第九章 表格</w:t></w:r></w:p></w:tc></w:tr></w:tbl>
               <w:p><w:r><w:t>第二章 需求</w:t></w:r></w:p>
               <w:sectPr/>"#,
        );
        let paragraphs = parse_document(&xml, &styles).unwrap();
        let texts: Vec<_> = paragraphs.iter().map(|p| (p.index, p.text.as_str())).collect();
        assert_eq!(texts, [(0, ""), (1, "第二章 需求")]);
    }

    #[test]
    fn test_text_box_content_is_not_paragraph_text() {
        let xml = body(
            r#"<w:p><w:r><w:t>1.1 范围</w:t></w:r>
                 <w:r><w:drawing><w:txbxContent><w:p><w:r><w:rPr><w:b/></w:rPr><w:t>框内</w:t></w:r></w:p></w:txbxContent></w:drawing></w:r>
               </w:p>
               <w:p><w:r><w:t>后续</w:t></w:r></w:p>"#,
        );
        let paragraphs = parse_document(&xml, &StyleTable::default()).unwrap();
        assert_eq!(paragraphs.len(), 2);
        assert_eq!(paragraphs[0].text, "1.1 范围");
        assert!(paragraphs[0].runs.iter().all(|r| !r.bold));
        assert_eq!(paragraphs[1].text, "后续");
    }

    #[test]
    fn test_unknown_style_id_falls_back_to_default() {
        let xml = r#"<w:styles xmlns:w="w"><w:style w:type="paragraph" w:default="1" w:styleId="Body"><w:rPr><w:b/></w:rPr></w:style></w:styles>"#;
        let styles = StyleTable::parse(xml).unwrap();
        assert!(styles.is_bold(Some("Deleted")));
        assert!(!StyleTable::parse(STYLES).unwrap().is_bold(Some("Deleted")));
    }

    #[test]
    fn test_tracked_formatting_changes_are_ignored() {
        let styles_xml = r#"<w:styles xmlns:w="w">
  <w:style w:type="paragraph" w:default="1" w:styleId="Body"/>
  <w:style w:type="paragraph" w:styleId="Strong"><w:rPr><w:b/></w:rPr></w:style>
  <w:style w:type="paragraph" w:styleId="WasBold">
    <w:rPr><w:rPrChange w:id="1" w:author="a"><w:rPr><w:b/></w:rPr></w:rPrChange></w:rPr>
  </w:style>
</w:styles>"#;
        let styles = StyleTable::parse(styles_xml).unwrap();
        assert!(styles.is_bold(Some("Strong")));
        assert!(!styles.is_bold(Some("WasBold")));

        let xml = body(
            r#"<w:p><w:r><w:rPr><w:rPrChange w:id="2" w:author="a"><w:rPr><w:b/><w:sz w:val="32"/></w:rPr></w:rPrChange></w:rPr><w:t>5.信用记录查询</w:t></w:r></w:p>
               <w:p><w:pPr><w:pStyle w:val="Body"/><w:pPrChange w:id="3" w:author="a"><w:pPr><w:pStyle w:val="Strong"/></w:pPr></w:pPrChange></w:pPr><w:r><w:t>6.履约能力</w:t></w:r></w:p>
               <w:p><w:pPr><w:pPrChange w:id="4" w:author="a"><w:pPr/></w:pPrChange><w:pStyle w:val="Strong"/></w:pPr><w:r><w:rPr><w:rPrChange w:id="5" w:author="a"><w:rPr/></w:rPrChange><w:sz w:val="30"/></w:rPr><w:t>7.附件</w:t></w:r></w:p>"#,
        );
        let paragraphs = parse_document(&xml, &styles).unwrap();
        assert_eq!(paragraphs.len(), 3);

        assert_eq!(paragraphs[0].runs, [Run { bold: false, font_size: None }]);
        assert!(!paragraphs[1].is_bold);
        // Current properties after a revision block still apply.
        assert!(paragraphs[2].is_bold);
        assert_eq!(paragraphs[2].runs[0].font_size, Some(15.0));

        let headings = crate::parser::classify_paragraphs(&paragraphs);
        let texts: Vec<_> = headings.iter().map(|h| h.text.as_str()).collect();
        assert_eq!(texts, ["7.附件"]);
    }

    #[test]
    fn test_missing_file() {
        let err = read_paragraphs(Path::new("/nonexistent/input.docx")).unwrap_err();
        assert!(matches!(err, SourceError::Io(_)));
    }
}
