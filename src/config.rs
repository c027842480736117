/// Startup configuration
///
/// Parsed once from the command line and handed to whoever needs it.
/// Nothing reads flags or the environment after this.

use crate::shell::HistoryLoader;
use clap::Parser;
use std::path::PathBuf;

/// Default number of results for queries that don't ask for a specific amount
pub const DEFAULT_MAX_RESULTS: usize = 10;

/// rerun - search your shell history from stdin
#[derive(Parser, Debug, Clone, PartialEq, Eq)]
#[command(name = "rerun", version, about)]
pub struct Config {
    /// Human at the wheel: stdin reads plain text queries
    #[arg(long, visible_alias = "human")]
    pub interactive: bool,

    /// Case sensitive search (interactive mode only)
    #[arg(long)]
    pub case_sensitive: bool,

    /// Maximum number of results; also the default for JSON requests without `max_results`
    #[arg(long = "max", value_name = "N", default_value_t = DEFAULT_MAX_RESULTS)]
    pub max_results: usize,

    /// Read this history file instead of the usual ones (repeatable)
    #[arg(long = "history-file", value_name = "PATH")]
    pub history_files: Vec<PathBuf>,

    /// Log filter, e.g. `debug` or `rerun_lib=trace` (default: $RUST_LOG, then `warn`)
    #[arg(long, value_name = "FILTER")]
    pub log_level: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            interactive: false,
            case_sensitive: false,
            max_results: DEFAULT_MAX_RESULTS,
            history_files: Vec::new(),
            log_level: None,
        }
    }
}

impl Config {
    /// Where to look for history
    pub fn history_loader(&self) -> HistoryLoader {
        if self.history_files.is_empty() {
            HistoryLoader::from_env()
        } else {
            HistoryLoader::with_candidates(self.history_files.iter().cloned())
        }
    }
}
