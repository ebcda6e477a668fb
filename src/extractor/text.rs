//! Text flattening and normalization for search records
//!
//! `flatten_text` turns a subtree into its visible text, `normalize_text`
//! turns that text into the single-line, HTML-escaped form the search index
//! stores.

use regex::Regex;
use scraper::{ElementRef, Node};
use std::sync::LazyLock;

static WHITESPACE_RUN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s\s+").expect("whitespace pattern is valid"));

static LINE_TERMINATOR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\r\n|\n|\r").expect("line terminator pattern is valid"));

/// Elements whose content is never visible text
const SKIPPED_TAGS: &[&str] = &["script", "style", "noscript", "template", "head"];

/// Elements rendered on their own line
const BLOCK_TAGS: &[&str] = &[
    "address",
    "article",
    "aside",
    "blockquote",
    "details",
    "dd",
    "div",
    "dl",
    "dt",
    "fieldset",
    "figcaption",
    "figure",
    "footer",
    "form",
    "h1",
    "h2",
    "h3",
    "h4",
    "h5",
    "h6",
    "header",
    "hr",
    "li",
    "main",
    "nav",
    "ol",
    "p",
    "pre",
    "section",
    "summary",
    "table",
    "tr",
    "ul",
];

const CELL_TAGS: &[&str] = &["td", "th"];

/// Flatten a subtree to its visible text.
///
/// Text nodes are concatenated in document order. Block-level boundaries and
/// `<br>` become line breaks, table cells are followed by a tab, and the
/// contents of `script`, `style`, `noscript` and `template` are dropped. The
/// result is trimmed.
pub fn flatten_text(element: ElementRef<'_>) -> String {
    let mut out = String::new();
    flatten_into(element, &mut out);
    out.trim().to_string()
}

fn flatten_into(element: ElementRef<'_>, out: &mut String) {
    for child in element.children() {
        match child.value() {
            Node::Text(text) => out.push_str(text),
            Node::Element(el) => {
                let name = el.name();
                if SKIPPED_TAGS.contains(&name) {
                    continue;
                }
                if name == "br" {
                    out.push('\n');
                    continue;
                }
                let Some(child_element) = ElementRef::wrap(child) else {
                    continue;
                };

                let is_block = BLOCK_TAGS.contains(&name);
                if is_block {
                    out.push('\n');
                }
                flatten_into(child_element, out);
                if is_block {
                    out.push('\n');
                } else if CELL_TAGS.contains(&name) {
                    out.push('\t');
                }
            }
            _ => {}
        }
    }
}

/// Normalize flattened text for the index.
///
/// Runs of two or more whitespace characters collapse to one space, remaining
/// line terminators become spaces, then `&`, `<`, `>` and `"` are escaped.
/// Ampersands go first so the other entities are not escaped twice.
pub fn normalize_text(text: &str) -> String {
    let collapsed = WHITESPACE_RUN.replace_all(text, " ");
    let single_line = LINE_TERMINATOR.replace_all(&collapsed, " ");
    escape_html(&single_line)
}

fn escape_html(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

/// Flatten and normalize a subtree
pub fn get_content(element: ElementRef<'_>) -> String {
    normalize_text(&flatten_text(element))
}

/// Title of a section heading from its flattened text.
///
/// Strips a leading run of `#` markers (with the whitespace after them) and a
/// single trailing `#`. Only one trailing marker is removed: `"### Title #"`
/// becomes `"Title "`.
pub fn heading_title(text: &str) -> String {
    let title = text.trim_start_matches('#').trim_start();
    title.strip_suffix('#').unwrap_or(title).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use scraper::{Html, Selector};

    fn first<'a>(html: &'a Html, selector: &str) -> ElementRef<'a> {
        let selector = Selector::parse(selector).unwrap();
        html.select(&selector).next().unwrap()
    }

    #[test]
    fn test_normalize_escapes_html() {
        assert_eq!(
            normalize_text(r#"A & B <tag> "quoted""#),
            "A &amp; B &lt;tag&gt; &quot;quoted&quot;"
        );
    }

    #[test]
    fn test_normalize_does_not_double_escape() {
        assert_eq!(normalize_text("<&>"), "&lt;&amp;&gt;");
        assert_eq!(normalize_text("&lt;"), "&amp;lt;");
    }

    #[test]
    fn test_normalize_collapses_whitespace() {
        assert_eq!(normalize_text("a   b\t\tc"), "a b c");
        assert_eq!(
            normalize_text("line one\nline two\r\nthree\rfour"),
            "line one line two three four"
        );
        assert_eq!(normalize_text("a \n\n  b"), "a b");
        assert_eq!(normalize_text("single space"), "single space");
    }

    #[test]
    fn test_normalize_is_idempotent_on_plain_text() {
        let inputs = [
            "  leading and trailing  ",
            "tabs\t\tand\nnewlines\r\n\r\nmixed",
            "a\nb",
            "already normal",
            "",
        ];
        for input in inputs {
            let once = normalize_text(input);
            assert_eq!(normalize_text(&once), once, "input: {:?}", input);
        }
    }

    #[test]
    fn test_flatten_separates_blocks() {
        let html = Html::parse_fragment(
            "<div id='root'><p>First paragraph</p><p>Second <em>emphasis</em></p>\
             <ul><li>one</li><li>two</li></ul></div>",
        );
        let root = first(&html, "#root");

        assert_eq!(get_content(root), "First paragraph Second emphasis one two");
    }

    #[test]
    fn test_flatten_skips_scripts_and_styles() {
        let html = Html::parse_fragment(
            "<div id='root'>visible<script>var x = 1;</script><style>.a{}</style> text</div>",
        );
        let root = first(&html, "#root");

        assert_eq!(flatten_text(root), "visible text");
    }

    #[test]
    fn test_flatten_line_breaks_and_cells() {
        let html = Html::parse_fragment(
            "<div id='root'>a<br>b<table><tr><td>c</td><td>d</td></tr></table></div>",
        );
        let root = first(&html, "#root");

        assert_eq!(flatten_text(root), "a\nb\n\nc\td");
        // a lone tab between cells is not a whitespace run
        assert_eq!(get_content(root), "a b c\td");
    }

    #[test]
    fn test_flatten_cells_across_rows() {
        let html = Html::parse_fragment(
            "<div id='root'><table><tr><th>k</th><th>v</th></tr>\
             <tr><td>x</td><td>1</td></tr></table></div>",
        );
        let root = first(&html, "#root");

        assert_eq!(get_content(root), "k\tv x\t1");
    }

    #[test]
    fn test_heading_title() {
        assert_eq!(heading_title("### Title #"), "Title ");
        assert_eq!(heading_title("#Install"), "Install");
        assert_eq!(heading_title("Install#"), "Install");
        assert_eq!(heading_title("Install##"), "Install#");
        assert_eq!(heading_title("Plain"), "Plain");
        assert_eq!(heading_title(""), "");
    }

    #[test]
    fn test_heading_title_with_hash_link() {
        let html = Html::parse_fragment(
            "<h2 id='h'><a class='anchor' id='setup'></a>Setup\
             <a class='hash-link' href='#setup'>#</a></h2>",
        );
        let heading = first(&html, "#h");

        assert_eq!(heading_title(&flatten_text(heading)), "Setup");
    }
}
