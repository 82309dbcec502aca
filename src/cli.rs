//! CLI domain: argument parsing and the single run route.

mod parse;
mod route;

pub use parse::Cli;
pub use route::{apply_overrides, RunContext, RunSummary};
