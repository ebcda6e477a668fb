//! # docsift - Search Records from Rendered Documentation
//!
//! This crate extracts full-text search records from the HTML pages a
//! documentation site generator renders. Each page yields one page-level
//! record and one record per section heading, each with a title, a URL with
//! the section anchor, normalized text, keywords and the docs version. The
//! records feed a client-side search index built elsewhere.
//!
//! ## Features
//!
//! - Heading-scoped partition of the page body into sections
//! - Opt-in indexing of nested containers (`data-search-children`)
//! - Keyword and docs-version metadata from meta elements
//! - Worker protocol with streamed records and per-task completion messages
//! - Local worker pool and a newline-delimited JSON worker over stdio
//!
//! ## Example
//!
//! ```rust
//! use docsift::extractor::{extract_records, SearchRecord};
//! use scraper::Html;
//!
//! let page = Html::parse_document(
//!     r#"<article><h1>Guide</h1><div class="markdown">
//!          <h2><a class="anchor" id="setup"></a>Setup</h2><p>Install it.</p>
//!        </div></article>"#,
//! );
//!
//! let records: Vec<SearchRecord> = extract_records(&page, "/docs/guide", None).collect();
//! assert_eq!(records.len(), 2);
//! assert_eq!(records[1].url(), "/docs/guide#setup");
//! assert_eq!(records[1].content(), "Install it. ");
//! ```

mod error;

pub mod extractor;
pub mod worker;

pub use error::Error;

/// Re-export of types module for public use
pub mod prelude {
    pub use crate::error::Error;
    pub use crate::error::Result;
    pub use crate::extractor::{Extractor, ExtractorConfig, SearchRecord, VersionTable};
    pub use crate::worker::{Task, Worker, WorkerMessage, WorkerPool};
}
