use std::sync::OnceLock;

use ego_tree::iter::Edge;
use regex::Regex;
use scraper::node::Node;
use scraper::{Html, Selector};

/// Address-like substrings: local part, `@`, host, then a top-level label of
/// two or more letters. The boundaries are ASCII-only, so a neighbouring `é`
/// or CJK character does not hide an address.
pub const EMAIL_PATTERN: &str =
    r"(?-u:\b)[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}(?-u:\b)";

/// Elements whose text never reaches the rendered page.
const HIDDEN_ELEMENTS: &[&str] = &["script", "style", "noscript", "template"];

pub trait EmailExtractor: Send + Sync {
    fn extract(&self, markup: &str) -> Vec<String>;
}

/// Scans the visible body text of a page with [`EMAIL_PATTERN`].
///
/// - matches come back in document order, duplicates kept verbatim
/// - malformed markup is parsed best-effort (html5ever never rejects input)
/// - a document without `<body>` is scanned as a whole
#[derive(Debug, Default, Clone, Copy)]
pub struct RegexEmailExtractor;

impl EmailExtractor for RegexEmailExtractor {
    fn extract(&self, markup: &str) -> Vec<String> {
        let text = visible_text(markup);
        find_emails(&text)
    }
}

/// Every match of [`EMAIL_PATTERN`] in `text`, left to right, non-overlapping.
pub fn find_emails(text: &str) -> Vec<String> {
    email_regex()
        .find_iter(text)
        .map(|m| m.as_str().to_string())
        .collect()
}

/// Concatenated text of the document body, skipping hidden elements.
pub fn visible_text(markup: &str) -> String {
    let doc = Html::parse_document(markup);
    let body = Selector::parse("body")
        .ok()
        .and_then(|sel| doc.select(&sel).next().map(|el| *el));
    let root = body.unwrap_or_else(|| *doc.root_element());

    let mut text = String::new();
    let mut hidden_depth = 0usize;
    for edge in root.traverse() {
        match edge {
            Edge::Open(node) => match node.value() {
                Node::Element(el) if is_hidden(el.name()) => hidden_depth += 1,
                Node::Text(t) if hidden_depth == 0 => text.push_str(t),
                _ => {}
            },
            Edge::Close(node) => {
                if let Node::Element(el) = node.value() {
                    if is_hidden(el.name()) {
                        hidden_depth -= 1;
                    }
                }
            }
        }
    }
    text
}

fn is_hidden(name: &str) -> bool {
    HIDDEN_ELEMENTS
        .iter()
        .any(|hidden| hidden.eq_ignore_ascii_case(name))
}

fn email_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(EMAIL_PATTERN).expect("email pattern is valid"))
}
