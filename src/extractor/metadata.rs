//! Page-level metadata: keywords and docs version

use crate::error::Result;
use crate::extractor::error::ExtractError;
use scraper::{Html, Selector};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;
use tracing::debug;

/// Mapping from a version identifier to the value shown in search results.
///
/// Loaded once per worker and shared read-only.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VersionTable(HashMap<String, String>);

impl VersionTable {
    /// Create an empty table
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a version
    pub fn insert(&mut self, id: impl Into<String>, display: impl Into<String>) {
        self.0.insert(id.into(), display.into());
    }

    /// Display value for a version identifier
    pub fn get(&self, id: &str) -> Option<&str> {
        self.0.get(id).map(String::as_str)
    }

    /// Number of known versions
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the table has no versions
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Load a table from a JSON object file (`{"<id>": "<display>", ...}`)
    pub async fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let raw = tokio::fs::read_to_string(path).await.map_err(|e| {
            ExtractError::VersionTable(format!("unable to read {}: {}", path.display(), e))
        })?;
        let table: Self = serde_json::from_str(&raw).map_err(|e| {
            ExtractError::VersionTable(format!("unable to parse {}: {}", path.display(), e))
        })?;
        debug!("Loaded {} versions from {}", table.len(), path.display());
        Ok(table)
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for VersionTable {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}

/// Collect the keywords of every matching meta element in the document.
///
/// Commas inside each element's `content` become spaces, and the values of
/// all elements are joined with a single space. Elements without `content`,
/// or with an empty one, contribute nothing.
pub fn collect_keywords(document: &Html, selector: &Selector) -> String {
    document
        .select(selector)
        .filter_map(|meta| meta.value().attr("content"))
        .filter(|content| !content.is_empty())
        .map(|content| content.replace(',', " "))
        .collect::<Vec<_>>()
        .join(" ")
}

/// Resolve the page's docs version through the version table.
///
/// Returns `None` when no table is supplied, the page has no version meta
/// element, or the table has no entry for its value.
pub fn resolve_version(
    document: &Html,
    selector: &Selector,
    versions: Option<&VersionTable>,
) -> Option<String> {
    let versions = versions?;
    let id = document.select(selector).next()?.value().attr("content")?;
    versions.get(id).map(str::to_string)
}

/// Selector for `meta[name="<name>"]`
pub(crate) fn meta_selector(name: &str) -> std::result::Result<Selector, ExtractError> {
    let selector = format!("meta[name=\"{}\"]", name.replace('"', "\\\""));
    Selector::parse(&selector).map_err(|e| ExtractError::InvalidSelector {
        selector: selector.clone(),
        message: e.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;

    fn page(head: &str) -> Html {
        Html::parse_document(&format!(
            "<html><head>{}</head><body><article></article></body></html>",
            head
        ))
    }

    #[test]
    fn test_keywords_are_joined() {
        let document = page(
            r#"<meta name="keywords" content="a,b"><meta name="keywords" content="c">"#,
        );
        let selector = meta_selector("keywords").unwrap();

        assert_eq!(collect_keywords(&document, &selector), "a b c");
    }

    #[test]
    fn test_keywords_keep_existing_spaces() {
        let document = page(r#"<meta name="keywords" content="rust, search,index">"#);
        let selector = meta_selector("keywords").unwrap();

        assert_eq!(collect_keywords(&document, &selector), "rust  search index");
    }

    #[test]
    fn test_keywords_skip_empty_content() {
        let document = page(
            r#"<meta name="keywords" content=""><meta name="keywords" content="a">"#,
        );
        let selector = meta_selector("keywords").unwrap();

        assert_eq!(collect_keywords(&document, &selector), "a");
    }

    #[test]
    fn test_meta_selector_escapes_quotes() {
        let document = page(r#"<meta name='say"hi' content="quoted">"#);
        let selector = meta_selector("say\"hi").unwrap();

        assert_eq!(collect_keywords(&document, &selector), "quoted");
    }

    #[test]
    fn test_keywords_missing() {
        let document =
            page(r#"<meta name="description" content="nothing here"><meta name="keywords">"#);
        let selector = meta_selector("keywords").unwrap();

        assert_eq!(collect_keywords(&document, &selector), "");
    }

    #[test]
    fn test_version_resolution() {
        let versions: VersionTable = [("1.0", "v1")].into_iter().collect();
        let selector = meta_selector("docsearch:version").unwrap();

        let document = page(r#"<meta name="docsearch:version" content="1.0">"#);
        assert_eq!(
            resolve_version(&document, &selector, Some(&versions)).as_deref(),
            Some("v1")
        );

        let unknown = page(r#"<meta name="docsearch:version" content="2.0">"#);
        assert_eq!(resolve_version(&unknown, &selector, Some(&versions)), None);

        let missing = page("");
        assert_eq!(resolve_version(&missing, &selector, Some(&versions)), None);

        assert_eq!(resolve_version(&document, &selector, None), None);
    }

    #[test]
    fn test_version_table_json() {
        let table: VersionTable =
            serde_json::from_str(r#"{"current": "Next", "1.0": "1.0.x"}"#).unwrap();

        assert_eq!(table.len(), 2);
        assert_eq!(table.get("current"), Some("Next"));
        assert_eq!(table.get("missing"), None);
    }

    #[tokio::test]
    async fn test_version_table_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("versions.json");
        std::fs::write(&path, r#"{"2.1": "v2.1"}"#).unwrap();

        let table = VersionTable::from_json_file(&path).await.unwrap();
        assert_eq!(table.get("2.1"), Some("v2.1"));

        let err = VersionTable::from_json_file(dir.path().join("absent.json")).await;
        assert!(matches!(err, Err(Error::Extract(_))));

        std::fs::write(&path, "[1, 2]").unwrap();
        let err = VersionTable::from_json_file(&path).await;
        assert!(matches!(err, Err(Error::Extract(msg)) if msg.contains("unable to parse")));
    }
}
