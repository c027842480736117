// The matchers the cascade runs, cheapest and most literal first.
//
// Every strategy reads the view it is given and returns entries from it
// verbatim (lowercased if the view is lowercased). Nothing here touches the
// view itself.

use crate::core::fuzzy::{fuzzy_match, Ranker};
use crate::core::subsequence::matches_in_order;
use std::fmt;

/// Matcher strategies, in cascade priority order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strategy {
    Recent,
    Prefix,
    Substring,
    MultiWordPrefix,
    MultiWordSubstring,
    AnchoredPrefix,
    Fuzzy,
}

impl Strategy {
    /// Every strategy in the order the cascade tries them
    pub const CASCADE: [Strategy; 7] = [
        Strategy::Recent,
        Strategy::Prefix,
        Strategy::Substring,
        Strategy::MultiWordPrefix,
        Strategy::MultiWordSubstring,
        Strategy::AnchoredPrefix,
        Strategy::Fuzzy,
    ];

    pub fn name(&self) -> &str {
        match self {
            Strategy::Recent => "recent",
            Strategy::Prefix => "prefix",
            Strategy::Substring => "substring",
            Strategy::MultiWordPrefix => "multi_prefix",
            Strategy::MultiWordSubstring => "multi_substring",
            Strategy::AnchoredPrefix => "anchored_prefix",
            Strategy::Fuzzy => "fuzzy",
        }
    }

    /// Run this strategy, returning at most `max_results` entries of `view`
    pub fn run<'a, R>(
        &self,
        view: &'a [String],
        query: &str,
        max_results: usize,
        ranker: &R,
    ) -> Vec<&'a str>
    where
        R: Ranker + ?Sized,
    {
        match self {
            Strategy::Recent => recent(view, query, max_results),
            Strategy::Prefix => prefix_match(view, query, max_results),
            Strategy::Substring => substring_match(view, query, max_results),
            Strategy::MultiWordPrefix => multi_prefix_match(view, query, max_results),
            Strategy::MultiWordSubstring => multi_substring_match(view, query, max_results),
            Strategy::AnchoredPrefix => anchored_prefix_match(view, query, max_results),
            Strategy::Fuzzy => fuzzy_match(ranker, view, query, max_results),
        }
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Empty query: just the newest entries
pub fn recent<'a>(view: &'a [String], query: &str, max_results: usize) -> Vec<&'a str> {
    if !query.is_empty() {
        return Vec::new();
    }
    view.iter().take(max_results).map(String::as_str).collect()
}

pub fn prefix_match<'a>(view: &'a [String], query: &str, max_results: usize) -> Vec<&'a str> {
    single_match(view, max_results, |cmd| cmd.starts_with(query))
}

pub fn substring_match<'a>(view: &'a [String], query: &str, max_results: usize) -> Vec<&'a str> {
    single_match(view, max_results, |cmd| cmd.contains(query))
}

/// Every query word starts some later word of the command, in order
pub fn multi_prefix_match<'a>(view: &'a [String], query: &str, max_results: usize) -> Vec<&'a str> {
    let words: Vec<&str> = query.split_whitespace().collect();
    multi_match(view, &words, max_results, |word, needle| word.starts_with(needle))
}

/// Every query word appears inside some later word of the command, in order
pub fn multi_substring_match<'a>(
    view: &'a [String],
    query: &str,
    max_results: usize,
) -> Vec<&'a str> {
    let words: Vec<&str> = query.split_whitespace().collect();
    multi_match(view, &words, max_results, |word, needle| word.contains(needle))
}

/// Acronym matching: each query character starts a word, in order.
/// "gc" finds "git commit".
pub fn anchored_prefix_match<'a>(
    view: &'a [String],
    query: &str,
    max_results: usize,
) -> Vec<&'a str> {
    // One needle per character, spaces included
    let letters: Vec<char> = query.chars().collect();
    multi_match(view, &letters, max_results, |word, letter| word.starts_with(*letter))
}

fn single_match<'a, F>(view: &'a [String], max_results: usize, mut matches: F) -> Vec<&'a str>
where
    F: FnMut(&str) -> bool,
{
    view.iter()
        .map(String::as_str)
        .filter(|cmd| matches(*cmd))
        .take(max_results)
        .collect()
}

fn multi_match<'a, N, F>(
    view: &'a [String],
    needles: &[N],
    max_results: usize,
    mut matches: F,
) -> Vec<&'a str>
where
    F: FnMut(&&str, &N) -> bool,
{
    view.iter()
        .map(String::as_str)
        .filter(|cmd| {
            let words: Vec<&str> = cmd.split_whitespace().collect();
            matches_in_order(&words, needles, &mut matches)
        })
        .take(max_results)
        .collect()
}
