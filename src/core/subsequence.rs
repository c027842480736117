// Ordered subsequence matching
//
// The primitive behind the multi-word and anchored-letter strategies.

/// Reports whether every needle can be paired, in order, with a distinct
/// haystack element for which `matches(haystack_item, needle)` holds.
///
/// This is a single greedy left-to-right scan with no backtracking: each
/// needle takes the first remaining haystack element that satisfies it.
/// Linear in the haystack length. Known and accepted limitation: the scan
/// never revisits an element it has already handed to an earlier needle, so
/// it makes no attempt to search other assignments.
///
/// # Examples
/// ```
/// use rerun_lib::core::matches_in_order;
///
/// let words = ["git", "commit", "-m"];
/// assert!(matches_in_order(&words, &["g", "c"], |w, n| w.starts_with(n)));
/// assert!(!matches_in_order(&words, &["c", "g"], |w, n| w.starts_with(n)));
/// ```
pub fn matches_in_order<H, N, F>(haystack: &[H], needles: &[N], mut matches: F) -> bool
where
    F: FnMut(&H, &N) -> bool,
{
    if needles.len() > haystack.len() {
        return false;
    }

    let mut rest = haystack.iter();
    needles
        .iter()
        .all(|needle| rest.any(|item| matches(item, needle)))
}
