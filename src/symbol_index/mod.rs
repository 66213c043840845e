//! Symbol index for the library documentation
//!
//! Holds the read-only index generated alongside the documentation and
//! answers search box queries against it.
//!
//! - `symbol`: the validated symbol record
//! - `store`: loading the index from its JSON layouts
//! - `search`: filtering, ranking and the per-page search session
//! - `abbrev`: length-bounded display names

mod abbrev;
mod search;
mod store;
mod symbol;

pub use abbrev::{abbreviate, DEFAULT_MAX_LEN};
pub use search::{
    compare, execute_search, RankedResult, SearchOptions, SearchOutcome, SearchQuery,
    SearchResults, SearchSession, DEFAULT_RESULT_CAP,
};
pub use store::{IndexError, SymbolIndex};
pub use symbol::{Symbol, SymbolKind, DEPRECATED};
