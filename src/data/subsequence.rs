//! Common-substring mining over small batches of filenames.
//!
//! "Subsequence" here always means a contiguous run of characters.

use std::iter::once;

/// Whether `candidate` appears as a contiguous run inside `sequence`.
///
/// A candidate longer than the sequence never matches; a candidate equal to
/// the sequence always does.
///
/// # Examples
///
/// ```
/// use tractodata::data::subsequence::is_subsequence;
///
/// let seq = "ismrm2015_tractography_challenge_submission1-0_angular_error_results";
///
/// assert!(is_subsequence("ismrm2015_tractography_challenge", seq));
/// assert!(!is_subsequence("ismrm2020", seq));
/// ```
#[must_use]
pub fn is_subsequence(candidate: &str, sequence: &str) -> bool {
    candidate.len() <= sequence.len() && sequence.contains(candidate)
}

/// Whether `candidate` is a contiguous run of every member of `collection`.
///
/// An empty candidate against an empty collection is `false`. Any other
/// candidate against an empty collection is vacuously `true`.
#[must_use]
pub fn is_subsequence_of_all<S: AsRef<str>>(candidate: &str, collection: &[S]) -> bool {
    if candidate.is_empty() && collection.is_empty() {
        return false;
    }
    collection
        .iter()
        .all(|sequence| is_subsequence(candidate, sequence.as_ref()))
}

/// Longest contiguous substring shared by every member of `collection`.
///
/// Candidates are drawn from the first member only, by ascending start
/// offset and then ascending length. A candidate replaces the best one only
/// when strictly longer, so among equally long common substrings the one
/// starting earliest in the first member wins.
///
/// Returns an empty string for fewer than two members or an empty first
/// member. The search is quadratic in the first member's length and is
/// meant for a few dozen short filenames.
///
/// # Examples
///
/// ```
/// use tractodata::data::subsequence::longest_common_subsequence;
///
/// let stems = [
///     "1-0_angular_error_results",
///     "1-1_angular_error_results",
///     "1-2_angular_error_results",
/// ];
///
/// assert_eq!(longest_common_subsequence(&stems), "_angular_error_results");
/// ```
#[must_use]
pub fn longest_common_subsequence<S: AsRef<str>>(collection: &[S]) -> String {
    let probe = match collection {
        [first, _, ..] => first.as_ref(),
        _ => return String::new(),
    };

    // char boundaries of the probe, so slicing never splits a code point
    let bounds: Vec<usize> = probe
        .char_indices()
        .map(|(idx, _)| idx)
        .chain(once(probe.len()))
        .collect();

    let mut best = "";
    let mut best_chars = 0;
    for (i, &start) in bounds.iter().enumerate() {
        for (j, &end) in bounds.iter().enumerate().skip(i + 1) {
            let candidate = &probe[start..end];
            // extending a run that is not common cannot make it common
            if !is_subsequence_of_all(candidate, collection) {
                break;
            }
            if j - i > best_chars {
                best = candidate;
                best_chars = j - i;
            }
        }
    }

    best.to_string()
}
