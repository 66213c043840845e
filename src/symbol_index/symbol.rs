//! Documented symbols as they appear in the generated symbol index
//!
//! A symbol is a qualified dotted name (`std.stdio.writeln`) with a category
//! tag, a set of attribute tags and a link target relative to the
//! documentation root.

use serde::{Deserialize, Serialize};

/// Attribute tag marking a symbol that should rank below its alternatives
pub const DEPRECATED: &str = "deprecated";

/// Category tag of a documented symbol
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum SymbolKind {
    Module,
    Function,
    Struct,
    Class,
    Interface,
    Enum,
    EnumMember,
    Template,
    Alias,
    Variable,
    Property,
    Constructor,
    Union,
    Mixin,
    /// Index entry that carried no kind (link-list index variant)
    Unspecified,
    /// Tag the generator emitted that we have no variant for
    Other(String),
}

impl std::fmt::Display for SymbolKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            SymbolKind::Module => "module",
            SymbolKind::Function => "function",
            SymbolKind::Struct => "struct",
            SymbolKind::Class => "class",
            SymbolKind::Interface => "interface",
            SymbolKind::Enum => "enum",
            SymbolKind::EnumMember => "enummember",
            SymbolKind::Template => "template",
            SymbolKind::Alias => "alias",
            SymbolKind::Variable => "variable",
            SymbolKind::Property => "property",
            SymbolKind::Constructor => "constructor",
            SymbolKind::Union => "union",
            SymbolKind::Mixin => "mixin",
            SymbolKind::Unspecified => "",
            SymbolKind::Other(tag) => tag.as_str(),
        };
        write!(f, "{}", s)
    }
}

impl From<&str> for SymbolKind {
    fn from(s: &str) -> Self {
        match s {
            "module" => SymbolKind::Module,
            "function" => SymbolKind::Function,
            "struct" => SymbolKind::Struct,
            "class" => SymbolKind::Class,
            "interface" => SymbolKind::Interface,
            "enum" => SymbolKind::Enum,
            "enummember" => SymbolKind::EnumMember,
            "template" => SymbolKind::Template,
            "alias" => SymbolKind::Alias,
            "variable" => SymbolKind::Variable,
            "property" => SymbolKind::Property,
            "constructor" => SymbolKind::Constructor,
            "union" => SymbolKind::Union,
            "mixin" => SymbolKind::Mixin,
            "" => SymbolKind::Unspecified,
            other => SymbolKind::Other(other.to_string()),
        }
    }
}

impl Default for SymbolKind {
    fn default() -> Self {
        SymbolKind::Unspecified
    }
}

impl From<String> for SymbolKind {
    fn from(s: String) -> Self {
        SymbolKind::from(s.as_str())
    }
}

impl From<SymbolKind> for String {
    fn from(kind: SymbolKind) -> Self {
        kind.to_string()
    }
}

/// A symbol from the documentation index
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Symbol {
    /// Qualified dotted name (e.g. `std.algorithm.iteration.map`)
    pub name: String,
    /// Category tag
    #[serde(default)]
    pub kind: SymbolKind,
    /// Attribute tags such as `deprecated` or `safe`
    #[serde(default)]
    pub attributes: Vec<String>,
    /// Link target relative to the documentation root
    pub path: String,
}

impl Symbol {
    pub fn new(name: &str, kind: SymbolKind, path: &str) -> Self {
        Self {
            name: name.to_string(),
            kind,
            attributes: Vec::new(),
            path: path.to_string(),
        }
    }

    pub fn with_attribute(mut self, attribute: &str) -> Self {
        if !self.has_attribute(attribute) {
            self.attributes.push(attribute.to_string());
        }
        self
    }

    pub fn has_attribute(&self, attribute: &str) -> bool {
        self.attributes.iter().any(|a| a == attribute)
    }

    pub fn is_deprecated(&self) -> bool {
        self.has_attribute(DEPRECATED)
    }

    /// Last dotted segment of the name
    pub fn short_name(&self) -> &str {
        self.name.rsplit('.').next().unwrap_or(&self.name)
    }

    /// Number of dotted segments in the name
    pub fn depth(&self) -> usize {
        self.name.split('.').count()
    }

    /// Class list for the rendered result entry: the kind followed by every
    /// attribute
    pub fn css_classes(&self) -> Vec<String> {
        let mut classes = Vec::with_capacity(self.attributes.len() + 1);
        let kind = self.kind.to_string();
        if !kind.is_empty() {
            classes.push(kind);
        }
        classes.extend(self.attributes.iter().cloned());
        classes
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_round_trips_known_and_unknown_tags() {
        assert_eq!(SymbolKind::from("enummember"), SymbolKind::EnumMember);
        assert_eq!(
            SymbolKind::from("manifestconstant"),
            SymbolKind::Other("manifestconstant".to_string())
        );
        assert_eq!(SymbolKind::Other("x".to_string()).to_string(), "x");
    }

    #[test]
    fn test_kind_deserializes_from_plain_string() {
        let sym: Symbol = serde_json::from_str(
            r#"{"name":"std.stdio.File","kind":"struct","path":"std/stdio/File.html"}"#,
        )
        .unwrap();
        assert_eq!(sym.kind, SymbolKind::Struct);
        assert!(sym.attributes.is_empty());
    }

    #[test]
    fn test_name_parts() {
        let sym = Symbol::new("std.algorithm.mutation.remove", SymbolKind::Function, "x");
        assert_eq!(sym.short_name(), "remove");
        assert_eq!(sym.depth(), 4);

        let top = Symbol::new("object", SymbolKind::Module, "object.html");
        assert_eq!(top.short_name(), "object");
        assert_eq!(top.depth(), 1);
    }

    #[test]
    fn test_css_classes() {
        let sym = Symbol::new("std.foo", SymbolKind::Function, "std/foo.html")
            .with_attribute("deprecated")
            .with_attribute("safe")
            .with_attribute("deprecated");
        assert!(sym.is_deprecated());
        assert_eq!(sym.css_classes(), vec!["function", "deprecated", "safe"]);
    }
}
