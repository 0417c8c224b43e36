//! Low-level string utilities every extractor depends on.

use crate::constants::SENTINEL;
use scraper::{ElementRef, Html, Node};

/// Collapse whitespace runs (newlines included) to single spaces and trim.
/// Absent or blank input yields the sentinel.
pub fn clean(text: Option<&str>) -> String {
    clean_opt(text.unwrap_or_default()).unwrap_or_else(|| SENTINEL.to_string())
}

/// Like [`clean`], but reports the sentinel case as `None`. The literal
/// sentinel text is also treated as absent.
pub fn clean_opt(text: &str) -> Option<String> {
    let collapsed = text.split_whitespace().collect::<Vec<_>>().join(" ");
    if collapsed.is_empty() || collapsed == SENTINEL {
        None
    } else {
        Some(collapsed)
    }
}

/// Concatenated text of an element and its descendants, cleaned.
pub fn element_text(element: ElementRef<'_>) -> Option<String> {
    clean_opt(&element.text().collect::<String>())
}

/// Rendered page text: every text node outside script/style, space-joined.
pub fn visible_text(document: &Html) -> String {
    let mut parts = Vec::new();
    for node in document.root_element().descendants() {
        let Node::Text(text) = node.value() else {
            continue;
        };
        let hidden = node
            .parent()
            .and_then(|parent| parent.value().as_element().map(|el| el.name()))
            .is_some_and(|name| matches!(name, "script" | "style" | "noscript" | "template"));
        if !hidden {
            parts.push(&**text);
        }
    }
    parts.join(" ")
}

/// Upper-case the first character and lower-case the rest.
pub fn capitalize(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
        None => String::new(),
    }
}
