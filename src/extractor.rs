//! # Search Record Extractor
//!
//! This module turns a rendered documentation page into the records a
//! full-text search index consumes: one record for the page and one record
//! per section heading found in its markdown body.
//!
//! ## Key Components
//!
//! - `ExtractorConfig`: Selectors and tag names describing the page layout
//! - `Extractor`: Compiled configuration, runs the extraction
//! - `SearchRecord`: Page (`type` 0) and section (`type` 1) records
//! - `VersionTable`: Optional mapping used to resolve the page's docs version
//!
//! ## Extraction rules
//!
//! - Pages without an article container, a markdown body inside it, or a
//!   page title inside the article yield no records at all.
//! - When the markdown body has section headings, the page record carries no
//!   content and every block of text is attributed to the nearest preceding
//!   heading. Without headings the page record carries the whole body.
//! - Keywords are collected from every keywords meta element of the document;
//!   the version is resolved only when a version table is supplied.

mod config;
mod error;
mod metadata;
mod record;
mod sections;
mod text;

pub use config::{ExtractorConfig, ExtractorConfigBuilder};
pub use error::ExtractError;
pub use metadata::{collect_keywords, resolve_version, VersionTable};
pub use record::{PageRecord, SearchRecord, SectionRecord};
pub use sections::{collect_sections, SectionHeading};
pub use text::{flatten_text, get_content, heading_title, normalize_text};

use crate::error::Result;
use scraper::{Html, Selector};
use std::vec;
use tracing::{debug, instrument};

/// Extractor with its selectors compiled
#[derive(Debug, Clone)]
pub struct Extractor {
    config: ExtractorConfig,
    article: Selector,
    markdown: Selector,
    title: Selector,
    anchor: Selector,
    keywords: Selector,
    version: Selector,
}

impl Extractor {
    /// Compile the selectors of `config`
    pub fn new(config: ExtractorConfig) -> Result<Self> {
        if config.heading_tags.iter().any(|tag| tag.trim().is_empty()) {
            return Err(ExtractError::InvalidConfig(
                "heading tags must not be empty".to_string(),
            )
            .into());
        }
        if config.index_children_attr.trim().is_empty() {
            return Err(ExtractError::InvalidConfig(
                "index children attribute must not be empty".to_string(),
            )
            .into());
        }

        Ok(Self {
            article: parse_selector(&config.article_selector)?,
            markdown: parse_selector(&config.markdown_selector)?,
            title: parse_selector(&config.title_selector)?,
            anchor: parse_selector(&config.anchor_selector)?,
            keywords: metadata::meta_selector(&config.keywords_meta)?,
            version: metadata::meta_selector(&config.version_meta)?,
            config,
        })
    }

    /// The configuration this extractor was built from
    pub fn config(&self) -> &ExtractorConfig {
        &self.config
    }

    /// Extract the search records of one page.
    ///
    /// Yields the page record first, then one section record per heading in
    /// document order. Yields nothing when the page is not indexable.
    #[instrument(skip(self, document, versions))]
    pub fn extract(
        &self,
        document: &Html,
        url: &str,
        versions: Option<&VersionTable>,
    ) -> Records {
        let Some(article) = document.select(&self.article).next() else {
            debug!("No article container");
            return Records::empty();
        };
        let Some(markdown) = article.select(&self.markdown).next() else {
            debug!("No markdown body");
            return Records::empty();
        };
        let Some(title_element) = article.select(&self.title).next() else {
            debug!("No page title");
            return Records::empty();
        };

        let page_title = flatten_text(title_element);
        let headings = collect_sections(markdown, &self.config, &self.anchor);
        let keywords = collect_keywords(document, &self.keywords);
        let version = resolve_version(document, &self.version, versions);

        let page = PageRecord {
            title: page_title.clone(),
            section_ref: "#".to_string(),
            url: url.to_string(),
            content: if headings.is_empty() {
                get_content(markdown)
            } else {
                String::new()
            },
            keywords,
            version: version.clone(),
        };

        debug!("Extracted page with {} sections", headings.len());
        Records {
            page: Some(page),
            sections: headings.into_iter(),
            page_title,
            url: url.to_string(),
            version,
        }
    }
}

impl Default for Extractor {
    fn default() -> Self {
        // the default selectors are known to parse
        Self::new(ExtractorConfig::default()).expect("default extractor config is valid")
    }
}

/// Extract records with the default configuration
pub fn extract_records(
    document: &Html,
    url: &str,
    versions: Option<&VersionTable>,
) -> Records {
    Extractor::default().extract(document, url, versions)
}

fn parse_selector(selector: &str) -> std::result::Result<Selector, ExtractError> {
    Selector::parse(selector).map_err(|e| ExtractError::InvalidSelector {
        selector: selector.to_string(),
        message: e.to_string(),
    })
}

/// Records of one page, page record first
#[derive(Debug)]
pub struct Records {
    page: Option<PageRecord>,
    sections: vec::IntoIter<SectionHeading>,
    page_title: String,
    url: String,
    version: Option<String>,
}

impl Records {
    fn empty() -> Self {
        Self {
            page: None,
            sections: Vec::new().into_iter(),
            page_title: String::new(),
            url: String::new(),
            version: None,
        }
    }
}

impl Iterator for Records {
    type Item = SearchRecord;

    fn next(&mut self) -> Option<Self::Item> {
        if let Some(page) = self.page.take() {
            return Some(SearchRecord::Page(page));
        }

        let heading = self.sections.next()?;
        Some(SearchRecord::Section(SectionRecord {
            title: heading.title,
            page_title: self.page_title.clone(),
            url: format!("{}#{}", self.url, heading.reference),
            content: heading.content,
            version: self.version.clone(),
            tag_name: heading.tag_name,
        }))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = usize::from(self.page.is_some()) + self.sections.len();
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for Records {}
