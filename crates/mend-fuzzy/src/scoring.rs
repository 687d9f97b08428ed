use std::cmp::Ordering;

/// The kind of match that was produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchKind {
    /// `candidate` starts with `query` (ASCII case-insensitive).
    Prefix,
    /// General fuzzy subsequence match.
    Fuzzy,
}

/// Score returned by [`fuzzy_match`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MatchScore {
    pub kind: MatchKind,
    pub score: i32,
}

/// A key that defines stable ordering for matches; larger is better.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RankKey {
    kind_rank: i32,
    score: i32,
}

impl MatchScore {
    pub fn rank_key(self) -> RankKey {
        let kind_rank = match self.kind {
            MatchKind::Prefix => 2,
            MatchKind::Fuzzy => 1,
        };
        RankKey {
            kind_rank,
            score: self.score,
        }
    }
}

impl Ord for RankKey {
    fn cmp(&self, other: &Self) -> Ordering {
        (self.kind_rank, self.score).cmp(&(other.kind_rank, other.score))
    }
}

impl PartialOrd for RankKey {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

#[inline]
fn fold_byte(b: u8) -> u8 {
    b.to_ascii_lowercase()
}

/// Identifier word boundaries: after `_`/`$`, lower-to-upper camel humps and
/// letter/digit transitions.
fn word_starts(candidate: &[u8]) -> Vec<bool> {
    candidate
        .iter()
        .enumerate()
        .map(|(i, &b)| {
            if i == 0 {
                return true;
            }
            let prev = candidate[i - 1];
            matches!(prev, b'_' | b'$' | b'.')
                || (prev.is_ascii_lowercase() && b.is_ascii_uppercase())
                || (prev.is_ascii_alphabetic() && b.is_ascii_digit())
                || (prev.is_ascii_digit() && b.is_ascii_alphabetic())
        })
        .collect()
}

const MIN_SCORE: i32 = i32::MIN / 4;
const BASE_MATCH: i32 = 10;
const BONUS_WORD_START: i32 = 15;
const BONUS_CONSECUTIVE: i32 = 5;
const BONUS_SAME_CASE: i32 = 2;
const GAP_PENALTY: i32 = 1;
const LEADING_PENALTY: i32 = 1;
const TRAILING_PENALTY: i32 = 1;

fn char_score(q: u8, c: u8, word_start: bool) -> i32 {
    let mut score = BASE_MATCH;
    if word_start {
        score += BONUS_WORD_START;
    }
    if q == c {
        score += BONUS_SAME_CASE;
    }
    score
}

/// Best-alignment score of `query` as a subsequence of `candidate`.
fn subsequence_score(query: &[u8], candidate: &[u8]) -> Option<i32> {
    if query.len() > candidate.len() {
        return None;
    }
    let starts = word_starts(candidate);
    let n = candidate.len();

    // dp[j]: best score with the current query char matched at candidate[j].
    let mut dp_prev = vec![MIN_SCORE; n];
    let mut dp_cur = vec![MIN_SCORE; n];

    let q0 = query[0];
    for (j, &c) in candidate.iter().enumerate() {
        if fold_byte(c) == fold_byte(q0) {
            dp_prev[j] = char_score(q0, c, starts[j]) - LEADING_PENALTY * j as i32;
        }
    }

    for &q in &query[1..] {
        dp_cur.fill(MIN_SCORE);
        // Max over k < j of dp_prev[k] + GAP_PENALTY * (k + 1), so a gap costs its length.
        let mut running_max = MIN_SCORE;
        for (j, &c) in candidate.iter().enumerate() {
            if j > 0 && dp_prev[j - 1] > MIN_SCORE / 2 {
                running_max = running_max.max(dp_prev[j - 1] + GAP_PENALTY * j as i32);
            }
            if fold_byte(c) != fold_byte(q) {
                continue;
            }
            let gapped = if running_max > MIN_SCORE / 2 {
                running_max - GAP_PENALTY * j as i32
            } else {
                MIN_SCORE
            };
            let consecutive = if j > 0 && dp_prev[j - 1] > MIN_SCORE / 2 {
                dp_prev[j - 1] + BONUS_CONSECUTIVE
            } else {
                MIN_SCORE
            };
            let best = gapped.max(consecutive);
            if best > MIN_SCORE / 2 {
                dp_cur[j] = best + char_score(q, c, starts[j]);
            }
        }
        std::mem::swap(&mut dp_prev, &mut dp_cur);
    }

    dp_prev
        .iter()
        .enumerate()
        .filter(|(_, &score)| score > MIN_SCORE / 2)
        .map(|(j, &score)| score - TRAILING_PENALTY * (n - 1 - j) as i32)
        .max()
}

/// Fuzzy match `query` against `candidate`.
///
/// Prefix matches are fast-pathed and always rank above fuzzy matches; among prefix
/// matches shorter candidates win.
pub fn fuzzy_match(query: &str, candidate: &str) -> Option<MatchScore> {
    let q = query.as_bytes();
    let c = candidate.as_bytes();

    if q.is_empty() {
        return Some(MatchScore {
            kind: MatchKind::Prefix,
            score: 0,
        });
    }

    if q.len() <= c.len() && c.iter().zip(q).all(|(&a, &b)| fold_byte(a) == fold_byte(b)) {
        return Some(MatchScore {
            kind: MatchKind::Prefix,
            score: 1_000_000 - candidate.len() as i32,
        });
    }

    subsequence_score(q, c).map(|score| MatchScore {
        kind: MatchKind::Fuzzy,
        score,
    })
}

/// Order of two candidates equally [`similar`](crate::similarity) to `query`: the better
/// [`fuzzy_match`] first, candidates `query` does not match at all last.
pub fn cmp_by_match(query: &str, a: &str, b: &str) -> Ordering {
    let key = |candidate: &str| fuzzy_match(query, candidate).map(MatchScore::rank_key);
    key(b).cmp(&key(a))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn matches_order_candidates_best_first() {
        assert_eq!(cmp_by_match("valu", "value", "avalu"), Ordering::Less);
        assert_eq!(cmp_by_match("valu", "avalu", "value"), Ordering::Greater);
        assert_eq!(cmp_by_match("goo", "foo", "bar"), Ordering::Equal);
        assert_eq!(cmp_by_match("cnt", "count", "bar"), Ordering::Less);
    }

    #[test]
    fn camel_case_bonus_prefers_boundaries() {
        let a = fuzzy_match("fb", "fooBar").unwrap();
        let b = fuzzy_match("fb", "foobar").unwrap();
        assert!(a.score > b.score, "expected fooBar to outrank foobar");
    }

    #[test]
    fn acronym_matches() {
        let a = fuzzy_match("fbb", "FooBarBaz").unwrap();
        let b = fuzzy_match("fbb", "fobarbaz").unwrap();
        assert!(a.score > b.score);
    }

    #[test]
    fn prefix_always_wins() {
        let prefix = fuzzy_match("vec", "Vector").unwrap();
        let fuzzy = fuzzy_match("vec", "ArrayVector").unwrap();
        assert_eq!(prefix.kind, MatchKind::Prefix);
        assert_eq!(fuzzy.kind, MatchKind::Fuzzy);
        assert!(prefix.rank_key() > fuzzy.rank_key());
    }

    #[test]
    fn non_subsequences_do_not_match() {
        assert_eq!(fuzzy_match("xyz", "Vector"), None);
        assert_eq!(fuzzy_match("Vectors", "Vector"), None);
    }
}
