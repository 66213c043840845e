//! Runnable code examples
//!
//! Examples on documentation pages can be edited and sent to a remote
//! compile-and-run service through the site's relay endpoint.

mod client;
mod output;
mod response;
mod wrap;

pub use client::{RunClient, RunRequest, RunnableExample};
pub use output::{OutputPanel, APPLICATION_OUTPUT, RUNNING, UNAVAILABLE};
pub use response::{parse_payload, RunResponse, Stage};
pub use wrap::{assert_to_writeln, wrap_into_main, RunnablePolicy};
