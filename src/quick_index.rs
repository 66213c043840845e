//! "Jump to" index of the symbols defined on a documentation page
//!
//! The page generator reports every symbol it documents, in order. Only
//! top-level names make it into the index, plus numbered overload anchors
//! such as `foo.2`; repeated reports of the same name (ditto overloads) are
//! collapsed.

use serde::Serialize;

/// Link to one anchor on the page
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Anchor {
    /// Fragment target, always `#.` followed by the symbol name
    pub href: String,
    pub label: String,
}

#[derive(Debug, Clone, Default)]
pub struct QuickIndex {
    last_defined: Option<String>,
    names: Vec<String>,
}

impl QuickIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a documented symbol. Returns whether it was added.
    pub fn define(&mut self, name: &str) -> bool {
        if self.last_defined.as_deref() == Some(name) {
            return false;
        }
        if !is_indexable(name) {
            return false;
        }
        self.last_defined = Some(name.to_string());
        self.names.push(name.to_string());
        true
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Anchors in ascending name order
    pub fn anchors(&self) -> Vec<Anchor> {
        let mut names = self.names.clone();
        names.sort();
        names
            .into_iter()
            .map(|name| Anchor {
                href: format!("#.{}", name),
                label: name,
            })
            .collect()
    }

    /// Markup for the index paragraph; empty when nothing was defined
    pub fn render_html(&self) -> String {
        let links: Vec<String> = self
            .anchors()
            .iter()
            .map(|a| {
                format!(
                    " <a class=\"jumpto\" href=\"{}\"><span class=\"notranslate donthyphenate\">{}</span></a>",
                    escape_html(&a.href),
                    escape_html(&a.label)
                )
            })
            .collect();

        if links.is_empty() {
            return String::new();
        }
        format!("<p><b>Jump to:</b>{}</p>", links.join(" &middot;"))
    }
}

/// `foo` and `foo.2` are indexed; `foo.bar` and `foo.bar.2` are members and
/// are not
fn is_indexable(name: &str) -> bool {
    match name.split_once('.') {
        None => true,
        Some((_, rest)) => {
            !rest.contains('.') && !rest.is_empty() && rest.chars().all(|c| c.is_ascii_digit())
        }
    }
}

fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filters_members_and_dittos() {
        let mut index = QuickIndex::new();
        assert!(index.define("splitter"));
        assert!(!index.define("splitter"));
        assert!(index.define("splitter.2"));
        assert!(!index.define("Splitter.front"));
        assert!(!index.define("Splitter.front.2"));
        assert!(index.define("joiner"));
        // only an immediate repeat is a ditto
        assert!(index.define("splitter"));
        assert_eq!(index.len(), 4);
    }

    #[test]
    fn test_anchors_sorted() {
        let mut index = QuickIndex::new();
        for name in ["zip", "chain", "Cycle", "chain.2"] {
            index.define(name);
        }
        let labels: Vec<String> = index.anchors().into_iter().map(|a| a.label).collect();
        assert_eq!(labels, vec!["Cycle", "chain", "chain.2", "zip"]);
        assert_eq!(index.anchors()[0].href, "#.Cycle");
    }

    #[test]
    fn test_render_html() {
        let mut index = QuickIndex::new();
        index.define("b");
        index.define("a");
        assert_eq!(
            index.render_html(),
            "<p><b>Jump to:</b> <a class=\"jumpto\" href=\"#.a\"><span class=\"notranslate donthyphenate\">a</span></a> &middot; <a class=\"jumpto\" href=\"#.b\"><span class=\"notranslate donthyphenate\">b</span></a></p>"
        );
    }

    #[test]
    fn test_empty_index_renders_nothing() {
        let mut index = QuickIndex::new();
        index.define("A.b");
        assert!(index.is_empty());
        assert_eq!(index.render_html(), "");
    }

    #[test]
    fn test_escapes_markup() {
        let mut index = QuickIndex::new();
        index.define("opBinary!\"+\"");
        assert!(index.render_html().contains("opBinary!&quot;+&quot;"));
    }
}
