//! Heading hierarchy and page lookups.
//!
//! The classifier produces a flat list; chapters contain level-2 headings,
//! which contain level-3 headings, and so on. [`Outline`] rebuilds that
//! nesting and renders it with box-drawing characters.

use indextree::{Arena, NodeId};

use crate::locate::StructureEntry;
use crate::parser::{HeadingCandidate, HeadingLevel};

/// A heading in the outline, with its page range when it was located.
#[derive(Debug, Clone, PartialEq)]
pub struct OutlineNode {
    pub heading: HeadingCandidate,
    pub pages: Option<(usize, usize)>,
}

/// Heading hierarchy backed by an arena.
#[derive(Debug, Default)]
pub struct Outline {
    arena: Arena<OutlineNode>,
    roots: Vec<NodeId>,
}

impl Outline {
    /// Build the hierarchy from headings in source order, attaching the page
    /// ranges of `entries` (see [`pair_pages`]).
    pub fn build(headings: &[HeadingCandidate], entries: &[StructureEntry]) -> Self {
        Self::from_pairs(pair_pages(headings, entries))
    }

    /// Build the hierarchy from headings already paired with page ranges.
    pub fn from_pairs(pairs: Vec<(HeadingCandidate, Option<(usize, usize)>)>) -> Self {
        let mut outline = Outline::default();
        let mut stack: Vec<(usize, NodeId)> = Vec::new();

        for (heading, pages) in pairs {
            let rank = heading.level.rank();
            let node = outline.arena.new_node(OutlineNode { heading, pages });

            while stack.last().is_some_and(|(top, _)| *top >= rank) {
                stack.pop();
            }
            match stack.last() {
                Some((_, parent)) => parent.append(node, &mut outline.arena),
                None => outline.roots.push(node),
            }
            stack.push((rank, node));
        }

        outline
    }

    pub fn is_empty(&self) -> bool {
        self.roots.is_empty()
    }

    /// Number of headings in the outline.
    pub fn len(&self) -> usize {
        self.arena.count()
    }

    /// Top-level nodes in document order.
    pub fn roots(&self) -> impl Iterator<Item = &OutlineNode> + '_ {
        self.roots.iter().map(|id| self.arena[*id].get())
    }

    /// Children of the `n`-th top-level node.
    pub fn children_of_root(&self, n: usize) -> Vec<&OutlineNode> {
        self.roots
            .get(n)
            .map(|id| {
                id.children(&self.arena)
                    .map(|child| self.arena[child].get())
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Render the outline as a box-drawing tree, one heading per line.
    pub fn render_box_tree(&self) -> String {
        let mut out = String::new();
        for (i, root) in self.roots.iter().enumerate() {
            let is_last = i == self.roots.len() - 1;
            self.render_node(*root, "", is_last, &mut out);
        }
        out
    }

    fn render_node(&self, id: NodeId, prefix: &str, is_last: bool, out: &mut String) {
        let node = self.arena[id].get();
        let connector = if is_last { "└── " } else { "├── " };

        out.push_str(prefix);
        out.push_str(connector);
        out.push_str(&node.heading.text);
        if let Some((start, end)) = node.pages {
            out.push_str(&format_pages(start, end));
        }
        out.push('\n');

        let child_prefix = format!("{}{}", prefix, if is_last { "    " } else { "│   " });
        let children: Vec<_> = id.children(&self.arena).collect();
        for (i, child) in children.iter().enumerate() {
            self.render_node(*child, &child_prefix, i == children.len() - 1, out);
        }
    }
}

fn format_pages(start: usize, end: usize) -> String {
    if start == end {
        format!("  [p.{}]", start)
    } else {
        format!("  [p.{}-{}]", start, end)
    }
}

/// Pair each heading with its page range from the structure table.
///
/// The table lists located headings in source order, so entries are matched
/// to headings by walking both lists once. Unlocated headings get `None`.
pub fn pair_pages(
    headings: &[HeadingCandidate],
    entries: &[StructureEntry],
) -> Vec<(HeadingCandidate, Option<(usize, usize)>)> {
    let mut remaining = entries.iter().peekable();
    headings
        .iter()
        .map(|heading| {
            let pages = remaining
                .next_if(|entry| entry.title == heading.text)
                .map(|entry| (entry.start_page, entry.end_page));
            (heading.clone(), pages)
        })
        .collect()
}

/// Structure entries of headings at one level, in table order.
///
/// Page ranges are kept as inferred over all levels; combined with
/// [`section_at_page`] this answers "which chapter contains this page".
pub fn entries_at_level(
    headings: &[HeadingCandidate],
    entries: &[StructureEntry],
    level: HeadingLevel,
) -> Vec<StructureEntry> {
    pair_pages(headings, entries)
        .into_iter()
        .filter(|(heading, _)| heading.level == level)
        .filter_map(|(heading, pages)| {
            pages.map(|(start_page, end_page)| StructureEntry {
                title: heading.text,
                start_page,
                end_page,
            })
        })
        .collect()
}

/// The entry covering `page`.
///
/// The last entry is taken to run to the end of the document, so any page at
/// or after its start belongs to it. Pages before the first entry belong to
/// no section.
pub fn section_at_page(entries: &[StructureEntry], page: usize) -> Option<&StructureEntry> {
    entries.iter().rev().find(|entry| entry.start_page <= page)
}
