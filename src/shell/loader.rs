/// History loader
///
/// Works out which history files to read and merges them into one list.

use crate::error::{RecallError, Result};
use crate::shell::history::{HistoryParser, HistoryRecord};
use crate::shell::Shell;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Loads command history from a list of candidate files
#[derive(Debug, Clone)]
pub struct HistoryLoader {
    candidates: Vec<PathBuf>,
}

impl HistoryLoader {
    /// Default candidates: `$HISTFILE`, each shell's usual history file,
    /// then macOS Terminal's per-session zsh histories.
    pub fn from_env() -> Self {
        let mut candidates = Vec::new();

        if let Some(histfile) = env::var_os("HISTFILE").filter(|v| !v.is_empty()) {
            candidates.push(PathBuf::from(histfile));
        }

        if let Some(home) = dirs::home_dir() {
            candidates.extend(Shell::ALL.iter().map(|shell| shell.history_file(&home)));
            candidates.extend(zsh_sessions(&home));
        }

        Self::with_candidates(candidates)
    }

    /// Use exactly these candidates, in this order
    pub fn with_candidates<I, P>(paths: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        // $HISTFILE usually points at one of the defaults; read it once
        let mut candidates: Vec<PathBuf> = Vec::new();
        for path in paths {
            let path = path.into();
            if !candidates.contains(&path) {
                candidates.push(path);
            }
        }
        Self { candidates }
    }

    pub fn candidates(&self) -> &[PathBuf] {
        &self.candidates
    }

    /// Parse every candidate that exists, in candidate order
    ///
    /// A file that exists but can't be read or parsed is skipped with a
    /// warning. Fails only if none of the candidates exist.
    pub fn parse(&self) -> Result<Vec<HistoryRecord>> {
        let parser = HistoryParser::new()?;
        let mut all = Vec::new();
        let mut found = false;

        for candidate in &self.candidates {
            if !candidate.is_file() {
                continue;
            }
            found = true;

            match parser.parse_file(candidate) {
                Ok(records) => {
                    debug!(path = %candidate.display(), commands = records.len(), "loaded history file");
                    all.extend(records);
                }
                Err(e) => {
                    warn!(path = %candidate.display(), error = %e, "skipping history file");
                }
            }
        }

        if !found {
            return Err(RecallError::NoHistory {
                tried: self.candidates.clone(),
            });
        }

        Ok(all)
    }
}

/// `~/.zsh_sessions/*.history`, sorted by name
fn zsh_sessions(home: &Path) -> Vec<PathBuf> {
    let entries = match fs::read_dir(home.join(".zsh_sessions")) {
        Ok(entries) => entries,
        Err(_) => return Vec::new(),
    };

    let mut sessions: Vec<PathBuf> = entries
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| path.extension().is_some_and(|ext| ext == "history"))
        .collect();
    sessions.sort();
    sessions
}
