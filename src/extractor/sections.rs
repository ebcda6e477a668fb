//! Heading-scoped partition of a markdown body into sections
//!
//! The traversal walks the children of the markdown body in document order,
//! carrying the most recent section heading. Every block that follows a
//! heading is flattened and appended to that heading's text. Containers
//! marked with the indexing-children attribute are opened up so the headings
//! and blocks inside them take part in the partition too.
//!
//! Accumulated text lives in a side table indexed by heading position, the
//! parsed tree itself is never touched.

use crate::extractor::config::ExtractorConfig;
use crate::extractor::text::{flatten_text, get_content, heading_title, normalize_text};
use scraper::{ElementRef, Node, Selector};
use tracing::trace;

/// A section heading and the text assigned to it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SectionHeading {
    /// Heading text without `#` markers
    pub title: String,

    /// Anchor id of the section, `"#"` when the heading has no anchor
    pub reference: String,

    /// Tag name of the heading
    pub tag_name: String,

    /// Normalized text of every block under the heading, each followed by a space
    pub content: String,
}

/// Partition `markdown` into sections, in document order of their headings.
pub fn collect_sections(
    markdown: ElementRef<'_>,
    config: &ExtractorConfig,
    anchor: &Selector,
) -> Vec<SectionHeading> {
    let mut partition = Partition {
        config,
        anchor,
        headings: Vec::new(),
    };
    partition.traverse(markdown, false, None);
    trace!("Collected {} section headings", partition.headings.len());
    partition.headings
}

struct Partition<'c> {
    config: &'c ExtractorConfig,
    anchor: &'c Selector,
    headings: Vec<SectionHeading>,
}

impl Partition<'_> {
    /// Walk the children of `element`.
    ///
    /// A heading found here becomes current for its later siblings and their
    /// descendants only; it does not leak back out to the caller's siblings.
    fn traverse(
        &mut self,
        element: ElementRef<'_>,
        indexing_children: bool,
        parent_heading: Option<usize>,
    ) {
        let mut current = parent_heading;

        for child in element.children() {
            match child.value() {
                Node::Element(el) => {
                    let Some(child_element) = ElementRef::wrap(child) else {
                        continue;
                    };
                    let name = el.name();

                    if self.config.is_heading_tag(name) {
                        current = Some(self.track_heading(child_element));
                    } else if el.attr(&self.config.index_children_attr).is_some() {
                        self.traverse(child_element, true, current);
                    } else if indexing_children && name != self.config.atomic_tag {
                        self.traverse(child_element, true, current);
                    } else if let Some(index) = current {
                        let content = get_content(child_element);
                        self.append(index, &content);
                    }
                }
                Node::Text(text) => {
                    // inter-element whitespace is layout, not a block
                    let text = text.trim();
                    if text.is_empty() {
                        continue;
                    }
                    if let Some(index) = current {
                        self.append(index, &normalize_text(text));
                    }
                }
                _ => {}
            }
        }
    }

    fn track_heading(&mut self, heading: ElementRef<'_>) -> usize {
        let reference = heading
            .select(self.anchor)
            .next()
            .and_then(|anchor| anchor.value().attr("id"))
            .unwrap_or("#")
            .to_string();

        self.headings.push(SectionHeading {
            title: heading_title(&flatten_text(heading)),
            reference,
            tag_name: heading.value().name().to_string(),
            content: String::new(),
        });
        self.headings.len() - 1
    }

    fn append(&mut self, index: usize, content: &str) {
        let section = &mut self.headings[index].content;
        section.push_str(content);
        section.push(' ');
    }
}
