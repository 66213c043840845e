//! Read-only symbol index
//!
//! Loaded once per page from the generated index file and never refreshed.
//! Three layouts are accepted:
//! - an array of `{name, kind, attributes, path}` records
//! - an object keyed by qualified name whose values are such records
//!   (`name` may be omitted and is then taken from the key)
//! - an object keyed by qualified name whose values are lists of link targets
//!
//! The generated file may also be wrapped in a script assignment
//! (`var symbols = [...];`), which is stripped before parsing.

use serde::Deserialize;
use serde_json::Value;
use std::path::Path;

use super::symbol::{Symbol, SymbolKind};

/// Immutable, name-sorted collection of validated symbols
#[derive(Debug, Clone, Default)]
pub struct SymbolIndex {
    symbols: Vec<Symbol>,
}

/// Record form used by the keyed layout, where the name is optional
#[derive(Debug, Deserialize)]
struct KeyedRecord {
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    kind: SymbolKind,
    #[serde(default)]
    attributes: Vec<String>,
    path: String,
}

impl SymbolIndex {
    /// Build an index from already constructed symbols
    pub fn from_symbols(mut symbols: Vec<Symbol>) -> Result<Self, IndexError> {
        for symbol in &symbols {
            validate(symbol)?;
        }

        symbols.sort_by(|a, b| a.name.cmp(&b.name));
        if let Some(dup) = symbols.windows(2).find(|w| w[0].name == w[1].name) {
            return Err(IndexError::Duplicate(dup[0].name.clone()));
        }

        Ok(Self { symbols })
    }

    /// Parse any of the accepted index layouts
    pub fn from_json_str(text: &str) -> Result<Self, IndexError> {
        let value: Value = serde_json::from_str(strip_script_wrapper(text))?;

        let symbols = match value {
            Value::Array(items) => items
                .into_iter()
                .map(serde_json::from_value::<Symbol>)
                .collect::<Result<Vec<_>, _>>()?,
            Value::Object(map) => {
                let link_lists = !map.is_empty() && map.values().all(Value::is_array);
                let mut symbols = Vec::with_capacity(map.len());
                for (key, entry) in map {
                    let symbol = if link_lists {
                        from_link_list(key, entry)?
                    } else {
                        from_keyed_record(key, entry)?
                    };
                    symbols.push(symbol);
                }
                symbols
            }
            other => return Err(IndexError::Shape(json_type_name(&other))),
        };

        Self::from_symbols(symbols)
    }

    /// Load the index from a file on disk
    pub fn load(path: &Path) -> Result<Self, IndexError> {
        let text = std::fs::read_to_string(path)?;
        let index = Self::from_json_str(&text)?;
        tracing::info!(path = %path.display(), symbols = index.len(), "loaded symbol index");
        Ok(index)
    }

    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    /// Symbols in ascending name order
    pub fn iter(&self) -> std::slice::Iter<'_, Symbol> {
        self.symbols.iter()
    }

    /// Look up a symbol by its exact qualified name
    pub fn get(&self, name: &str) -> Option<&Symbol> {
        self.symbols
            .binary_search_by(|s| s.name.as_str().cmp(name))
            .ok()
            .map(|i| &self.symbols[i])
    }
}

impl<'a> IntoIterator for &'a SymbolIndex {
    type Item = &'a Symbol;
    type IntoIter = std::slice::Iter<'a, Symbol>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

fn validate(symbol: &Symbol) -> Result<(), IndexError> {
    if symbol.name.is_empty() {
        return Err(IndexError::Invalid {
            name: String::new(),
            reason: "empty name".to_string(),
        });
    }
    if symbol.path.is_empty() {
        return Err(IndexError::Invalid {
            name: symbol.name.clone(),
            reason: "empty link target".to_string(),
        });
    }
    Ok(())
}

fn from_keyed_record(key: String, entry: Value) -> Result<Symbol, IndexError> {
    let record: KeyedRecord = serde_json::from_value(entry)?;
    if let Some(name) = &record.name {
        if *name != key {
            return Err(IndexError::Invalid {
                name: key,
                reason: format!("record name `{}` does not match its key", name),
            });
        }
    }
    Ok(Symbol {
        name: key,
        kind: record.kind,
        attributes: record.attributes,
        path: record.path,
    })
}

fn from_link_list(key: String, entry: Value) -> Result<Symbol, IndexError> {
    let links: Vec<String> = serde_json::from_value(entry)?;
    let Some(path) = links.into_iter().next() else {
        return Err(IndexError::Invalid {
            name: key,
            reason: "no link targets".to_string(),
        });
    };
    Ok(Symbol {
        name: key,
        kind: SymbolKind::Unspecified,
        attributes: Vec::new(),
        path,
    })
}

/// Strip `var symbols = ...;` so the generated script file parses as JSON
fn strip_script_wrapper(text: &str) -> &str {
    let trimmed = text.trim();
    if !trimmed.starts_with("var ") {
        return trimmed;
    }
    match trimmed.find('=') {
        Some(eq) => trimmed[eq + 1..].trim().trim_end_matches(';').trim_end(),
        None => trimmed,
    }
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// Error type for symbol index loading
#[derive(Debug, thiserror::Error)]
pub enum IndexError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("unrecognised index layout: expected an array or an object, found {0}")]
    Shape(&'static str),
    #[error("invalid symbol `{name}`: {reason}")]
    Invalid { name: String, reason: String },
    #[error("duplicate symbol `{0}`")]
    Duplicate(String),
}
