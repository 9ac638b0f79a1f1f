//! CLI command implementations.

mod config;
mod discover;
mod ingest;
mod parse;

pub use config::run_config;
pub use discover::run_discover;
pub use ingest::run_ingest;
pub use parse::run_parse;
