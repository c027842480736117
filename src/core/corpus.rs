// Turns raw history records into the list we actually search.
//
// Newest first, no duplicates, plus a lowercase copy for case-insensitive
// queries and a way back from lowercase to whatever the user really typed.

use crate::shell::HistoryRecord;
use std::collections::{HashMap, HashSet};

// Trailing junk that shells leave on commands and nobody wants to search for
const TRAILING_NOISE: &[char] = &[';', '\\', ' ', '\t', '\n', '\r'];

/// Immutable search corpus, built once at startup
#[derive(Debug, Clone, Default)]
pub struct Corpus {
    commands: Vec<String>,
    folded: Vec<String>,
    restore_case: HashMap<String, Vec<String>>,
}

impl Corpus {
    /// Build the corpus from history records, oldest record first
    pub fn build(records: &[HistoryRecord]) -> Self {
        let mut seen = HashSet::new();
        let mut commands = Vec::with_capacity(records.len());

        // Walk newest to oldest so the first copy we keep is the most recent one
        for record in records.iter().rev() {
            let cmd = normalize(&record.command);
            if cmd.is_empty() || seen.contains(cmd) {
                continue;
            }
            seen.insert(cmd);
            commands.push(cmd.to_string());
        }

        let folded: Vec<String> = commands.iter().map(|cmd| fold(cmd)).collect();

        let mut restore_case: HashMap<String, Vec<String>> = HashMap::new();
        for (cmd, lower) in commands.iter().zip(&folded) {
            let originals = restore_case.entry(lower.clone()).or_default();
            if !originals.contains(cmd) {
                originals.push(cmd.clone());
            }
        }

        Self {
            commands,
            folded,
            restore_case,
        }
    }

    /// Commands as typed, most recent first
    pub fn commands(&self) -> &[String] {
        &self.commands
    }

    /// Lowercased commands, index-aligned with `commands()`
    pub fn folded(&self) -> &[String] {
        &self.folded
    }

    /// Every original spelling of a folded command, most recent first.
    /// Returns `None` if the folded string never came out of this corpus.
    pub fn restore(&self, folded: &str) -> Option<&[String]> {
        self.restore_case
            .get(folded)
            .map(Vec::as_slice)
            .filter(|originals| !originals.is_empty())
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }
}

/// Strip trailing `;`, `\` and whitespace from a command
pub fn normalize(cmd: &str) -> &str {
    cmd.trim_end_matches(TRAILING_NOISE)
}

/// Case-fold a command or query for case-insensitive matching
pub fn fold(text: &str) -> String {
    text.to_lowercase()
}
