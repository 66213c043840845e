//! Symbol search functionality
//!
//! Multi-term substring filtering over the symbol index, a fixed tie-break
//! ranking and a bounded result list. Rendering is left to the caller; this
//! module only produces ordered data.

use serde::Serialize;
use std::cmp::Ordering;

use super::abbrev::{abbreviate, DEFAULT_MAX_LEN};
use super::store::SymbolIndex;
use super::symbol::Symbol;

/// Maximum number of results returned for a single query
pub const DEFAULT_RESULT_CAP: usize = 100;

/// Single-term queries shorter than this are not searched
const MIN_SINGLE_TERM_LEN: usize = 2;

/// Normalized search query
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchQuery {
    terms: Vec<String>,
}

impl SearchQuery {
    /// Lowercase the raw input and split it on runs of whitespace
    pub fn parse(raw: &str) -> Self {
        Self {
            terms: raw
                .to_lowercase()
                .split_whitespace()
                .map(str::to_string)
                .collect(),
        }
    }

    pub fn terms(&self) -> &[String] {
        &self.terms
    }

    /// True for queries that should not be searched at all: no terms, or a
    /// single term of fewer than two characters
    pub fn is_trivial(&self) -> bool {
        match self.terms.as_slice() {
            [] => true,
            [only] => only.chars().count() < MIN_SINGLE_TERM_LEN,
            _ => false,
        }
    }

    /// Every term must be a substring of the lowercased name
    pub fn matches(&self, lowercase_name: &str) -> bool {
        self.terms.iter().all(|t| lowercase_name.contains(t.as_str()))
    }
}

/// Tunables supplied by the embedding page
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchOptions {
    pub result_cap: usize,
    pub abbreviation_max_len: usize,
}

impl Default for SearchOptions {
    fn default() -> Self {
        Self {
            result_cap: DEFAULT_RESULT_CAP,
            abbreviation_max_len: DEFAULT_MAX_LEN,
        }
    }
}

/// A matched symbol with its position in the ranking
#[derive(Debug, Clone, Serialize)]
pub struct RankedResult<'a> {
    pub symbol: &'a Symbol,
    /// Zero-based position after ranking
    pub rank: usize,
    /// Length-bounded rendering of the qualified name
    pub display_name: String,
}

impl RankedResult<'_> {
    /// Link to the symbol's page under the documentation root
    pub fn href(&self, root_dir: &str) -> String {
        format!("{}{}", root_dir, self.symbol.path)
    }
}

/// Output of one search recomputation
#[derive(Debug, Clone, Serialize)]
pub struct SearchResults<'a> {
    /// Session counter value at the time of the recomputation
    pub generation: u64,
    pub terms: Vec<String>,
    pub hits: Vec<RankedResult<'a>>,
    /// Matches beyond the result cap
    pub omitted: usize,
}

impl SearchResults<'_> {
    pub fn is_empty(&self) -> bool {
        self.hits.is_empty()
    }

    /// Total number of candidates, shown or not
    pub fn total(&self) -> usize {
        self.hits.len() + self.omitted
    }

    /// Target for submitting the search form: the top-ranked hit
    pub fn first_link(&self, root_dir: &str) -> Option<String> {
        self.hits.first().map(|hit| hit.href(root_dir))
    }

    /// Trailing line shown under a truncated list
    pub fn omitted_notice(&self) -> Option<String> {
        (self.omitted > 0).then(|| format!("\u{2026}{} additional results", self.omitted))
    }
}

/// Result of feeding the current search box text to a session
#[derive(Debug, Clone)]
pub enum SearchOutcome<'a> {
    /// The box is empty; the caller shows the regular page content again
    Cleared,
    /// Same text as the previous call; nothing was recomputed
    Unchanged,
    /// Fresh results (empty for trivial queries)
    Ready(SearchResults<'a>),
}

impl<'a> SearchOutcome<'a> {
    pub fn results(&self) -> Option<&SearchResults<'a>> {
        match self {
            SearchOutcome::Ready(results) => Some(results),
            _ => None,
        }
    }
}

/// Per-page search state: the last query memo and the invocation counter.
///
/// Callers own a session and pass it explicitly to every search; nothing is
/// shared between sessions.
#[derive(Debug, Clone, Default)]
pub struct SearchSession {
    options: SearchOptions,
    last_query: Option<String>,
    generation: u64,
}

impl SearchSession {
    pub fn new(options: SearchOptions) -> Self {
        Self {
            options,
            last_query: None,
            generation: 0,
        }
    }

    pub fn options(&self) -> &SearchOptions {
        &self.options
    }

    /// Number of recomputations performed so far
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Whether results tagged with `generation` are still the latest
    pub fn is_current(&self, generation: u64) -> bool {
        generation == self.generation
    }

    pub fn last_query(&self) -> Option<&str> {
        self.last_query.as_deref()
    }

    /// Forget the last query so the next call always recomputes
    pub fn reset(&mut self) {
        self.last_query = None;
    }

    /// Run the search for the current text of the search box
    pub fn search<'a>(&mut self, index: &'a SymbolIndex, raw: &str) -> SearchOutcome<'a> {
        let text = raw.to_lowercase();

        if text.is_empty() {
            self.reset();
            return SearchOutcome::Cleared;
        }

        if self.last_query.as_deref() == Some(text.as_str()) {
            return SearchOutcome::Unchanged;
        }
        self.last_query = Some(text.clone());
        self.generation += 1;

        let query = SearchQuery::parse(&text);
        let (hits, omitted) = if query.is_trivial() {
            (Vec::new(), 0)
        } else {
            execute_search(index, &query, &self.options)
        };

        tracing::debug!(
            generation = self.generation,
            terms = ?query.terms(),
            hits = hits.len(),
            omitted,
            "symbol search"
        );

        SearchOutcome::Ready(SearchResults {
            generation: self.generation,
            terms: query.terms,
            hits,
            omitted,
        })
    }
}

/// Precomputed ordering key for one candidate
#[derive(Debug, PartialEq, Eq, PartialOrd, Ord)]
struct RankKey {
    deprecated: bool,
    not_exact: bool,
    depth: usize,
    short_len: usize,
    lowercase_name: String,
}

impl RankKey {
    fn new(symbol: &Symbol, lowercase_name: String, terms: &[String]) -> Self {
        let short = symbol.short_name().to_lowercase();
        Self {
            deprecated: symbol.is_deprecated(),
            not_exact: !terms.iter().any(|t| *t == short),
            depth: symbol.depth(),
            short_len: short.chars().count(),
            lowercase_name,
        }
    }
}

/// Ranking comparator, each rule consulted only when the previous ones tie:
/// non-deprecated first, exact last-segment match first, shallower nesting
/// first, shorter last segment first, then lowercase name ascending.
pub fn compare(a: &Symbol, b: &Symbol, terms: &[String]) -> Ordering {
    let ka = RankKey::new(a, a.name.to_lowercase(), terms);
    let kb = RankKey::new(b, b.name.to_lowercase(), terms);
    ka.cmp(&kb)
}

/// Filter, rank and truncate. Returns the shown hits and the number of
/// candidates cut off by the result cap.
pub fn execute_search<'a>(
    index: &'a SymbolIndex,
    query: &SearchQuery,
    options: &SearchOptions,
) -> (Vec<RankedResult<'a>>, usize) {
    let terms = query.terms();

    let mut candidates: Vec<(RankKey, &'a Symbol)> = index
        .iter()
        .filter_map(|symbol| {
            let lowercase_name = symbol.name.to_lowercase();
            query
                .matches(&lowercase_name)
                .then(|| (RankKey::new(symbol, lowercase_name, terms), symbol))
        })
        .collect();

    // Stable, so symbols whose lowercase names coincide keep index order
    candidates.sort_by(|a, b| a.0.cmp(&b.0));

    let omitted = candidates.len().saturating_sub(options.result_cap);
    let hits = candidates
        .into_iter()
        .take(options.result_cap)
        .enumerate()
        .map(|(rank, (_, symbol))| RankedResult {
            symbol,
            rank,
            display_name: abbreviate(&symbol.name, options.abbreviation_max_len),
        })
        .collect();

    (hits, omitted)
}
