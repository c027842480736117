/// Search engine: the cascade
///
/// Runs every strategy in priority order over the corpus, merges what they
/// find, maps lowercased hits back to the casing the user typed, and stops
/// as soon as the result budget is full.

use crate::core::corpus::{fold, Corpus};
use crate::core::fuzzy::{Ranker, SkimRanker};
use crate::core::strategies::Strategy;
use crate::error::{RecallError, Result};
use crate::shell::HistoryRecord;
use std::collections::HashSet;
use std::fmt;
use std::time::{Duration, Instant};
use tracing::debug;

/// A single search request as the engine sees it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchQuery {
    pub text: String,
    pub case_sensitive: bool,
    pub max_results: usize,
}

/// Results of one search plus how long it took
#[derive(Debug, Clone)]
pub struct SearchOutcome {
    pub results: Vec<String>,
    pub elapsed: Duration,
}

/// Read-only search engine over a fixed corpus
///
/// Safe to share between threads; a search never mutates anything but its
/// own locals.
pub struct SearchEngine {
    corpus: Corpus,
    ranker: Box<dyn Ranker>,
}

impl fmt::Debug for SearchEngine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SearchEngine")
            .field("commands", &self.corpus.len())
            .finish_non_exhaustive()
    }
}

impl SearchEngine {
    /// Build an engine from history records, oldest first
    pub fn new(records: &[HistoryRecord]) -> Self {
        Self::with_ranker(Corpus::build(records), Box::new(SkimRanker::new()))
    }

    /// Build an engine with a custom fuzzy ranker
    pub fn with_ranker(corpus: Corpus, ranker: Box<dyn Ranker>) -> Self {
        Self { corpus, ranker }
    }

    pub fn corpus(&self) -> &Corpus {
        &self.corpus
    }

    /// Search and time it
    pub fn handle(&self, query: &SearchQuery) -> Result<SearchOutcome> {
        let start = Instant::now();
        let results = self.search(query)?;
        Ok(SearchOutcome {
            results,
            elapsed: start.elapsed(),
        })
    }

    /// Run the cascade
    ///
    /// Returns at most `max_results` distinct commands, as typed. An empty
    /// list just means nothing matched. The only error is
    /// `RecallError::MissingRestoration`, which means the corpus is broken.
    pub fn search(&self, query: &SearchQuery) -> Result<Vec<String>> {
        let max_results = query.max_results;
        if max_results == 0 {
            return Ok(Vec::new());
        }

        let folded_query;
        let (view, text) = if query.case_sensitive {
            (self.corpus.commands(), query.text.as_str())
        } else {
            folded_query = fold(&query.text);
            (self.corpus.folded(), folded_query.as_str())
        };

        let mut results: Vec<String> = Vec::new();
        let mut seen: HashSet<&str> = HashSet::new();

        for strategy in Strategy::CASCADE {
            // Always ask for the full budget: some of what comes back may be
            // duplicates of earlier hits.
            let hits = strategy.run(view, text, max_results, self.ranker.as_ref());
            debug!(strategy = %strategy, hits = hits.len(), "strategy finished");

            for hit in hits {
                if query.case_sensitive {
                    if seen.insert(hit) {
                        results.push(hit.to_string());
                    }
                    continue;
                }

                for cmd in self.restore(hit)? {
                    if seen.insert(cmd.as_str()) {
                        results.push(cmd.clone());
                    }
                }
            }

            if results.len() >= max_results {
                results.truncate(max_results);
                debug!(strategy = %strategy, "result budget reached");
                break;
            }
        }

        Ok(results)
    }

    fn restore(&self, folded: &str) -> Result<&[String]> {
        self.corpus
            .restore(folded)
            .ok_or_else(|| RecallError::MissingRestoration(folded.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::fuzzy::Rank;
    use std::sync::Arc;
    use std::thread;

    fn records(cmds: &[&str]) -> Vec<HistoryRecord> {
        cmds.iter()
            .map(|cmd| HistoryRecord {
                timestamp: 0,
                execution_time: 0,
                command: cmd.to_string(),
            })
            .collect()
    }

    fn query(text: &str, case_sensitive: bool, max_results: usize) -> SearchQuery {
        SearchQuery {
            text: text.to_string(),
            case_sensitive,
            max_results,
        }
    }

    fn git_engine() -> SearchEngine {
        SearchEngine::new(&records(&["cd ..", "git commit -m x", "git checkout main"]))
    }

    /// Claims a match that was never in the corpus
    struct PhantomRanker;

    impl Ranker for PhantomRanker {
        fn rank<'a>(&self, _query: &str, _targets: &'a [String]) -> Vec<Rank<'a>> {
            vec![Rank {
                target: "phantom command",
                distance: 0,
                original_index: 0,
            }]
        }
    }

    #[test]
    fn test_multi_word_prefix_keeps_recency() {
        let engine = git_engine();
        let results = engine.search(&query("git c", true, 10)).unwrap();
        assert_eq!(results, vec!["git checkout main", "git commit -m x"]);
    }

    #[test]
    fn test_empty_query_returns_most_recent() {
        let engine = git_engine();
        let results = engine.search(&query("", false, 2)).unwrap();
        assert_eq!(results, vec!["git checkout main", "git commit -m x"]);
    }

    #[test]
    fn test_acronym_query_restores_case() {
        let engine = SearchEngine::new(&records(&["cd ..", "Git Commit -m x", "ls"]));
        let results = engine.search(&query("GCM", false, 5)).unwrap();
        assert!(results.contains(&"Git Commit -m x".to_string()));
    }

    #[test]
    fn test_gcm_finds_commit() {
        let engine = git_engine();
        let results = engine.search(&query("gcm", false, 5)).unwrap();
        assert!(results.contains(&"git commit -m x".to_string()));
        assert!(!results.contains(&"cd ..".to_string()));
    }

    #[test]
    fn test_each_strategy_gets_the_full_budget() {
        // Prefix finds only "git log"; "echo git" has to come from substring,
        // which must still be asked for two results, not the one left over.
        let engine = SearchEngine::new(&records(&["echo git", "git log"]));
        let results = engine.search(&query("git", true, 2)).unwrap();
        assert_eq!(results, vec!["git log", "echo git"]);
    }

    #[test]
    fn test_case_insensitive_returns_every_casing() {
        let engine = SearchEngine::new(&records(&["Make Test", "make test", "MAKE TEST"]));
        let results = engine.search(&query("make", false, 10)).unwrap();
        assert_eq!(results, vec!["MAKE TEST", "make test", "Make Test"]);
    }

    #[test]
    fn test_case_sensitive_skips_other_casings() {
        let engine = SearchEngine::new(&records(&["Make Test", "make test"]));
        let results = engine.search(&query("make", true, 10)).unwrap();
        assert_eq!(results, vec!["make test"]);
    }

    #[test]
    fn test_budget_is_never_exceeded() {
        let cmds: Vec<String> = (0..50).map(|i| format!("echo {}", i)).collect();
        let refs: Vec<&str> = cmds.iter().map(String::as_str).collect();
        let engine = SearchEngine::new(&records(&refs));

        for max in [1, 3, 7, 49, 50, 51] {
            for text in ["", "echo", "e 1", "eo", "ECHO"] {
                let results = engine.search(&query(text, false, max)).unwrap();
                assert!(results.len() <= max, "{:?} max {} gave {}", text, max, results.len());
            }
        }
    }

    #[test]
    fn test_results_are_distinct() {
        let engine = SearchEngine::new(&records(&["git push", "Git Push", "git pull", "gp"]));
        // Prefix, substring, multi-word and fuzzy all hit the same entries
        let results = engine.search(&query("g", false, 10)).unwrap();
        let unique: HashSet<&String> = results.iter().collect();
        assert_eq!(unique.len(), results.len());
        assert_eq!(results.len(), 4);
    }

    #[test]
    fn test_zero_budget_is_empty() {
        let engine = git_engine();
        assert!(engine.search(&query("", false, 0)).unwrap().is_empty());
        assert!(engine.search(&query("git", true, 0)).unwrap().is_empty());
    }

    #[test]
    fn test_no_match_is_not_an_error() {
        let engine = git_engine();
        let results = engine.search(&query("zzzz", false, 10)).unwrap();
        assert!(results.is_empty());
    }

    #[test]
    fn test_empty_corpus() {
        let engine = SearchEngine::new(&[]);
        assert!(engine.search(&query("", false, 10)).unwrap().is_empty());
        assert!(engine.search(&query("git", false, 10)).unwrap().is_empty());
    }

    #[test]
    fn test_identical_queries_identical_results() {
        let engine = git_engine();
        let q = query("gi", false, 10);
        assert_eq!(engine.search(&q).unwrap(), engine.search(&q).unwrap());
    }

    #[test]
    fn test_restored_results_fold_into_corpus() {
        let engine = SearchEngine::new(&records(&["Docker PS", "docker ps -a", "DOCKER images"]));
        let results = engine.search(&query("dock", false, 10)).unwrap();
        assert_eq!(results.len(), 3);
        for cmd in &results {
            assert!(engine.corpus().folded().contains(&fold(cmd)));
        }
    }

    #[test]
    fn test_missing_restoration_is_reported() {
        let corpus = Corpus::build(&records(&["ls"]));
        let engine = SearchEngine::with_ranker(corpus, Box::new(PhantomRanker));

        let err = engine.search(&query("q", false, 10)).unwrap_err();
        assert!(matches!(err, RecallError::MissingRestoration(ref s) if s == "phantom command"));
        assert!(err.is_internal_fault());
    }

    #[test]
    fn test_handle_reports_results() {
        let engine = git_engine();
        let outcome = engine.handle(&query("cd", true, 10)).unwrap();
        assert_eq!(outcome.results, vec!["cd .."]);
    }

    #[test]
    fn test_concurrent_searches() {
        let engine = Arc::new(git_engine());
        let expected = engine.search(&query("git", false, 10)).unwrap();

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let engine = Arc::clone(&engine);
                thread::spawn(move || engine.search(&query("git", false, 10)).unwrap())
            })
            .collect();

        for handle in handles {
            assert_eq!(handle.join().unwrap(), expected);
        }
    }
}
