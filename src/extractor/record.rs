//! Search records handed to the downstream index
//!
//! The JSON shape is the wire contract with the indexer: camelCase keys and a
//! numeric `type` of `0` for page records and `1` for section records.

use serde::ser::{SerializeStruct, Serializer};
use serde::Serialize;

/// Record describing a whole page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageRecord {
    /// Text of the page title (`h1`)
    pub title: String,

    /// Always `"#"` for page records
    pub section_ref: String,

    /// Canonical URL of the page
    pub url: String,

    /// Full markdown-body text when the page has no sections, otherwise empty
    pub content: String,

    /// Space-separated keywords from the page's meta elements
    pub keywords: String,

    /// Resolved docs version
    pub version: Option<String>,
}

/// Record describing one section of a page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SectionRecord {
    /// Heading text
    pub title: String,

    /// Title of the page the section belongs to
    pub page_title: String,

    /// Page URL with the section anchor
    pub url: String,

    /// Text assigned to the section
    pub content: String,

    /// Resolved docs version
    pub version: Option<String>,

    /// Tag name of the heading (`h2`, `h3`)
    pub tag_name: String,
}

/// A record produced by the extractor
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchRecord {
    /// Page-level record (`type` 0)
    Page(PageRecord),
    /// Section-level record (`type` 1)
    Section(SectionRecord),
}

impl SearchRecord {
    /// Numeric record type used on the wire
    pub fn record_type(&self) -> u8 {
        match self {
            SearchRecord::Page(_) => 0,
            SearchRecord::Section(_) => 1,
        }
    }

    /// Title of the page or section
    pub fn title(&self) -> &str {
        match self {
            SearchRecord::Page(page) => &page.title,
            SearchRecord::Section(section) => &section.title,
        }
    }

    /// URL of the page or section
    pub fn url(&self) -> &str {
        match self {
            SearchRecord::Page(page) => &page.url,
            SearchRecord::Section(section) => &section.url,
        }
    }

    /// Indexed text
    pub fn content(&self) -> &str {
        match self {
            SearchRecord::Page(page) => &page.content,
            SearchRecord::Section(section) => &section.content,
        }
    }

    /// Resolved docs version
    pub fn version(&self) -> Option<&str> {
        match self {
            SearchRecord::Page(page) => page.version.as_deref(),
            SearchRecord::Section(section) => section.version.as_deref(),
        }
    }
}

impl From<PageRecord> for SearchRecord {
    fn from(record: PageRecord) -> Self {
        SearchRecord::Page(record)
    }
}

impl From<SectionRecord> for SearchRecord {
    fn from(record: SectionRecord) -> Self {
        SearchRecord::Section(record)
    }
}

impl Serialize for SearchRecord {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            SearchRecord::Page(page) => {
                let mut state = serializer.serialize_struct("PageRecord", 7)?;
                state.serialize_field("title", &page.title)?;
                state.serialize_field("type", &self.record_type())?;
                state.serialize_field("sectionRef", &page.section_ref)?;
                state.serialize_field("url", &page.url)?;
                state.serialize_field("content", &page.content)?;
                state.serialize_field("keywords", &page.keywords)?;
                state.serialize_field("version", &page.version)?;
                state.end()
            }
            SearchRecord::Section(section) => {
                let mut state = serializer.serialize_struct("SectionRecord", 7)?;
                state.serialize_field("title", &section.title)?;
                state.serialize_field("type", &self.record_type())?;
                state.serialize_field("pageTitle", &section.page_title)?;
                state.serialize_field("url", &section.url)?;
                state.serialize_field("content", &section.content)?;
                state.serialize_field("version", &section.version)?;
                state.serialize_field("tagName", &section.tag_name)?;
                state.end()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_page_record_json() {
        let record = SearchRecord::Page(PageRecord {
            title: "Intro".to_string(),
            section_ref: "#".to_string(),
            url: "/docs/intro".to_string(),
            content: String::new(),
            keywords: "a b".to_string(),
            version: None,
        });

        assert_eq!(
            serde_json::to_value(&record).unwrap(),
            json!({
                "title": "Intro",
                "type": 0,
                "sectionRef": "#",
                "url": "/docs/intro",
                "content": "",
                "keywords": "a b",
                "version": null
            })
        );
    }

    #[test]
    fn test_section_record_json() {
        let record: SearchRecord = SectionRecord {
            title: "Setup".to_string(),
            page_title: "Intro".to_string(),
            url: "/docs/intro#setup".to_string(),
            content: "Run it ".to_string(),
            version: Some("v1".to_string()),
            tag_name: "h2".to_string(),
        }
        .into();

        let value = serde_json::to_value(&record).unwrap();
        assert_eq!(value["type"], 1);
        assert_eq!(value["pageTitle"], "Intro");
        assert_eq!(value["tagName"], "h2");
        assert_eq!(value["version"], "v1");
        assert!(value.get("keywords").is_none());
        assert_eq!(record.content(), "Run it ");
    }
}
