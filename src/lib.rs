//! Front-end logic for a documentation website: symbol search over the
//! generated index, the per-page "Jump to" index and runnable code examples.

pub mod config;
pub mod quick_index;
pub mod runnable;
pub mod symbol_index;
pub mod utils;

pub use symbol_index::{SearchOutcome, SearchSession, Symbol, SymbolIndex};
