//! Name-similarity primitives used to suggest replacements for unresolved names.
//!
//! Two complementary measures are provided:
//!
//! - [`fuzzy_match`] scores `query` as a case-insensitive subsequence of a candidate,
//!   with bonuses for word starts and consecutive runs. Prefix matches always outrank
//!   fuzzy matches.
//! - [`similarity`] / [`is_similar_name`] decide whether two identifiers look like
//!   typos of each other (shared prefix and suffix with a small differing middle), and
//!   [`levenshtein`] gives the classic edit distance.
//!
//! Candidates with the same [`similarity`] are ordered by [`cmp_by_match`].
//!
//! Matching is ASCII case-insensitive; non-ASCII bytes must match exactly.

#![forbid(unsafe_code)]

mod scoring;
mod similarity;

pub use scoring::{cmp_by_match, fuzzy_match, MatchKind, MatchScore, RankKey};
pub use similarity::{is_similar_name, levenshtein, similarity, EXACT_SIMILARITY};

/// Case-insensitive prefix match.
#[inline]
pub fn prefix_match(query: &str, candidate: &str) -> bool {
    fuzzy_match(query, candidate).is_some_and(|s| s.kind == MatchKind::Prefix)
}
