//! # Extractor Configuration Module
//!
//! This module provides the knobs that tie the extractor to a particular
//! site generator's markup: which element wraps the page, which one holds the
//! prose, which tags open a section and which attribute asks the traversal to
//! look inside nested containers. It uses a builder pattern for flexible
//! configuration.
//!
//! ## Key Components
//!
//! - `ExtractorConfig`: The main configuration struct with selector parameters
//! - `ExtractorConfigBuilder`: Builder pattern implementation for easier configuration
//!
//! The defaults match Docusaurus output (`article`, `.markdown`, `h2`/`h3`,
//! `data-search-children`, `.anchor`).

/// Configuration for the extractor
#[derive(Debug, Clone)]
pub struct ExtractorConfig {
    /// CSS selector for the article container
    pub article_selector: String,

    /// CSS selector for the markdown body inside the article
    pub markdown_selector: String,

    /// CSS selector for the page title inside the article
    pub title_selector: String,

    /// Tag names that open a new section
    pub heading_tags: Vec<String>,

    /// Attribute marking a subtree whose children should be indexed
    pub index_children_attr: String,

    /// CSS selector, relative to a heading, for the anchor carrying the section id
    pub anchor_selector: String,

    /// Tag that is always indexed as one block, even in indexing-children mode
    pub atomic_tag: String,

    /// `name` of the meta elements holding keywords
    pub keywords_meta: String,

    /// `name` of the meta element holding the docs version
    pub version_meta: String,
}

impl Default for ExtractorConfig {
    fn default() -> Self {
        Self {
            article_selector: "article".to_string(),
            markdown_selector: ".markdown".to_string(),
            title_selector: "h1".to_string(),
            heading_tags: vec!["h2".to_string(), "h3".to_string()],
            index_children_attr: "data-search-children".to_string(),
            anchor_selector: ".anchor".to_string(),
            atomic_tag: "p".to_string(),
            keywords_meta: "keywords".to_string(),
            version_meta: "docsearch:version".to_string(),
        }
    }
}

/// Builder for ExtractorConfig
#[derive(Debug, Default)]
pub struct ExtractorConfigBuilder {
    config: ExtractorConfig,
}

impl ExtractorConfigBuilder {
    /// Create a new builder with default configuration
    pub fn new() -> Self {
        Self {
            config: ExtractorConfig::default(),
        }
    }

    /// Set the article container selector
    pub fn article_selector(mut self, selector: impl Into<String>) -> Self {
        self.config.article_selector = selector.into();
        self
    }

    /// Set the markdown body selector
    pub fn markdown_selector(mut self, selector: impl Into<String>) -> Self {
        self.config.markdown_selector = selector.into();
        self
    }

    /// Set the page title selector
    pub fn title_selector(mut self, selector: impl Into<String>) -> Self {
        self.config.title_selector = selector.into();
        self
    }

    /// Set the section heading tags
    pub fn heading_tags(mut self, tags: Vec<String>) -> Self {
        self.config.heading_tags = tags;
        self
    }

    /// Set the indexing-children marker attribute
    pub fn index_children_attr(mut self, attr: impl Into<String>) -> Self {
        self.config.index_children_attr = attr.into();
        self
    }

    /// Set the anchor selector
    pub fn anchor_selector(mut self, selector: impl Into<String>) -> Self {
        self.config.anchor_selector = selector.into();
        self
    }

    /// Set the atomic block tag
    pub fn atomic_tag(mut self, tag: impl Into<String>) -> Self {
        self.config.atomic_tag = tag.into();
        self
    }

    /// Set the keywords meta name
    pub fn keywords_meta(mut self, name: impl Into<String>) -> Self {
        self.config.keywords_meta = name.into();
        self
    }

    /// Set the version meta name
    pub fn version_meta(mut self, name: impl Into<String>) -> Self {
        self.config.version_meta = name.into();
        self
    }

    /// Build the configuration
    pub fn build(self) -> ExtractorConfig {
        self.config
    }
}

impl ExtractorConfig {
    /// Create a new builder
    pub fn builder() -> ExtractorConfigBuilder {
        ExtractorConfigBuilder::new()
    }

    /// Whether `tag` opens a section
    pub fn is_heading_tag(&self, tag: &str) -> bool {
        self.heading_tags.iter().any(|h| h.eq_ignore_ascii_case(tag))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ExtractorConfig::default();

        assert_eq!(config.article_selector, "article");
        assert_eq!(config.markdown_selector, ".markdown");
        assert_eq!(config.index_children_attr, "data-search-children");
        assert!(config.is_heading_tag("h2"));
        assert!(config.is_heading_tag("h3"));
        assert!(!config.is_heading_tag("h1"));
        assert!(!config.is_heading_tag("h4"));
    }

    #[test]
    fn test_builder() {
        let config = ExtractorConfig::builder()
            .markdown_selector(".theme-doc-markdown")
            .heading_tags(vec!["h2".to_string()])
            .anchor_selector(".hash-anchor")
            .build();

        assert_eq!(config.markdown_selector, ".theme-doc-markdown");
        assert_eq!(config.anchor_selector, ".hash-anchor");
        assert!(!config.is_heading_tag("h3"));
        assert_eq!(config.title_selector, "h1");
    }
}
