/// rerun library
///
/// Search engine over shell history, plus the plumbing to load history
/// and serve queries over stdin/stdout.

pub mod config;
pub mod core;
pub mod error;
pub mod shell;
pub mod transport;

// Re-exports for convenience
pub use config::Config;
pub use crate::core::{SearchEngine, SearchQuery};
pub use error::{RecallError, Result};
