/// Fuzzy strategy
///
/// Last resort in the cascade. The approximate matching itself is delegated
/// to a `Ranker`; this module only decides what to ask it and how to order
/// what comes back.

use fuzzy_matcher::skim::SkimMatcherV2;
use fuzzy_matcher::FuzzyMatcher;
use std::fmt;

// Distances that land in the same bucket count as a tie.
// Small differences in distance are not interesting.
const DISTANCE_BUCKET: usize = 64;

/// One fuzzy hit
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rank<'a> {
    /// The matched entry, verbatim from the searched view
    pub target: &'a str,
    /// Edit distance between query and target, lower is closer
    pub distance: usize,
    /// Position of the target in the searched view
    pub original_index: usize,
}

/// Approximate matching capability
///
/// Implementations decide for themselves what counts as a match and return
/// only those targets, in any order.
pub trait Ranker: Send + Sync {
    fn rank<'a>(&self, query: &str, targets: &'a [String]) -> Vec<Rank<'a>>;
}

/// Default ranker backed by skim's fuzzy matcher
///
/// A target matches when the query's characters appear in it in order.
/// For such a match the edit distance is just the number of extra
/// characters in the target, so that is what we report.
pub struct SkimRanker {
    matcher: SkimMatcherV2,
}

impl fmt::Debug for SkimRanker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SkimRanker").finish_non_exhaustive()
    }
}

impl Default for SkimRanker {
    fn default() -> Self {
        Self::new()
    }
}

impl SkimRanker {
    pub fn new() -> Self {
        // Case folding is the engine's job, so never let skim guess
        Self {
            matcher: SkimMatcherV2::default().respect_case(),
        }
    }
}

impl Ranker for SkimRanker {
    fn rank<'a>(&self, query: &str, targets: &'a [String]) -> Vec<Rank<'a>> {
        let query_len = query.chars().count();

        targets
            .iter()
            .enumerate()
            .filter_map(|(original_index, target)| {
                self.matcher.fuzzy_match(target, query).map(|_| Rank {
                    target: target.as_str(),
                    distance: target.chars().count().saturating_sub(query_len),
                    original_index,
                })
            })
            .collect()
    }
}

/// Run the fuzzy strategy over `view`
///
/// Whitespace is dropped from the query first; it carries no meaning here.
/// Hits are ordered by distance bucket, then by position in the view (more
/// recent first), and cut to `max_results`.
pub fn fuzzy_match<'a, R>(ranker: &R, view: &'a [String], query: &str, max_results: usize) -> Vec<&'a str>
where
    R: Ranker + ?Sized,
{
    let query: String = query.chars().filter(|c| !c.is_whitespace()).collect();

    let mut matches = ranker.rank(&query, view);
    sort_ranks(&mut matches);

    matches
        .into_iter()
        .take(max_results)
        .map(|rank| rank.target)
        .collect()
}

/// Stable sort: distance bucket first, then original index
fn sort_ranks(ranks: &mut [Rank<'_>]) {
    ranks.sort_by(|x, y| {
        (x.distance / DISTANCE_BUCKET)
            .cmp(&(y.distance / DISTANCE_BUCKET))
            .then(x.original_index.cmp(&y.original_index))
    });
}
