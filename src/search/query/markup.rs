//! Tag stripping and match marking for highlight text

use regex::Regex;
use scraper::node::Node;
use scraper::{ElementRef, Html};

/// Opening marker wrapped around each match
pub const MARK_OPEN: &str = "<em>";
/// Closing marker wrapped around each match
pub const MARK_CLOSE: &str = "</em>";

const DROPPED_ELEMENTS: &[&str] = &["script", "style", "noscript", "template", "head"];
const BLOCK_ELEMENTS: &[&str] = &[
    "p", "div", "br", "li", "ul", "ol", "tr", "td", "th", "table", "h1", "h2", "h3", "h4", "h5",
    "h6", "blockquote", "pre", "section", "article", "header", "footer",
];

/// Reduce HTML to its text.
///
/// Parsing is tolerant: unclosed or stray tags never fail. Script and style
/// content is dropped, as are anchors whose text is empty or just repeats their
/// own `href`. Block elements are separated by a space so words do not fuse.
#[must_use]
pub fn strip_tags(html: &str) -> String {
    if !html.contains('<') && !html.contains('&') {
        return html.to_string();
    }

    let fragment = Html::parse_fragment(html);
    let mut out = String::with_capacity(html.len());
    collect_text(fragment.root_element(), &mut out);
    out
}

fn collect_text(element: ElementRef<'_>, out: &mut String) {
    for child in element.children() {
        match child.value() {
            Node::Text(text) => out.push_str(text),
            Node::Element(_) => {
                let Some(child_element) = ElementRef::wrap(child) else {
                    continue;
                };
                let name = child_element.value().name();

                if DROPPED_ELEMENTS.contains(&name) || is_bare_link(child_element) {
                    continue;
                }
                collect_text(child_element, out);
                if BLOCK_ELEMENTS.contains(&name) && !out.ends_with(' ') {
                    out.push(' ');
                }
            }
            _ => {}
        }
    }
}

/// Anchor whose visible text adds nothing beyond its URL
fn is_bare_link(element: ElementRef<'_>) -> bool {
    if element.value().name() != "a" {
        return false;
    }
    let text: String = element.text().collect();
    let text = text.trim();
    text.is_empty() || element.value().attr("href").is_some_and(|href| href.trim() == text)
}

/// Wraps whole-word, case-insensitive occurrences of query terms in markers
#[derive(Debug, Clone)]
pub struct Highlighter {
    pattern: Regex,
}

impl Highlighter {
    /// Build a highlighter for the words of `query`; `None` if it has no words
    #[must_use]
    pub fn new(query: &str) -> Option<Self> {
        let mut terms: Vec<String> = query
            .split_whitespace()
            .map(|term| term.trim_matches(|c: char| !c.is_alphanumeric()))
            .filter(|term| !term.is_empty())
            .map(regex::escape)
            .collect();
        if terms.is_empty() {
            return None;
        }
        // Longest first so overlapping terms prefer the longer match
        terms.sort_by(|a, b| b.len().cmp(&a.len()).then_with(|| a.cmp(b)));
        terms.dedup();

        let pattern = Regex::new(&format!(r"(?i)\b(?:{})\b", terms.join("|"))).ok()?;
        Some(Self { pattern })
    }

    /// Wrap every match in `text` with [`MARK_OPEN`] and [`MARK_CLOSE`]
    #[must_use]
    pub fn mark(&self, text: &str) -> String {
        self.pattern
            .replace_all(text, format!("{MARK_OPEN}${{0}}{MARK_CLOSE}").as_str())
            .into_owned()
    }
}
