//! Typo detection for identifiers.

/// [`similarity`] of two names that are equal up to ASCII case.
pub const EXACT_SIMILARITY: i32 = 200;

#[inline]
fn same_char(a: u8, b: u8) -> bool {
    a.eq_ignore_ascii_case(&b)
}

/// How much `a` and `b` look alike, or `None` if they are not similar at all.
///
/// The shorter name is aligned against the longer one from both ends; the characters
/// left unmatched in the middle must stay within a tolerance of a quarter of the
/// longer name's length. Larger results mean more alike; [`EXACT_SIMILARITY`] for names
/// differing only in case.
pub fn similarity(a: &str, b: &str) -> Option<i32> {
    let (short, long) = if a.len() <= b.len() {
        (a.as_bytes(), b.as_bytes())
    } else {
        (b.as_bytes(), a.as_bytes())
    };
    if short.is_empty() || short.len() * 2 < long.len() {
        return None;
    }

    let mut matched = 0;
    let mut head = 0;
    while head < short.len() && same_char(short[head], long[head]) {
        head += 1;
        matched += 1;
    }

    let diff = long.len() - short.len();
    let mut tail = short.len();
    while tail > head && same_char(short[tail - 1], long[tail - 1 + diff]) {
        tail -= 1;
        matched += 1;
    }

    if matched == long.len() {
        return Some(EXACT_SIMILARITY);
    }
    if long.len() - matched > matched {
        return None;
    }

    let tolerance = (long.len() / 4 + 1) as i32;
    let score = (tolerance - (tail - head) as i32) * 256 / tolerance;
    (score >= 0).then_some(score)
}

/// `true` if `a` looks like a misspelling of `b` (or vice versa).
pub fn is_similar_name(a: &str, b: &str) -> bool {
    similarity(a, b).is_some()
}

/// Edit distance over ASCII-case-folded bytes.
pub fn levenshtein(a: &str, b: &str) -> usize {
    let a = a.as_bytes();
    let b = b.as_bytes();
    if a.is_empty() {
        return b.len();
    }
    if b.is_empty() {
        return a.len();
    }

    let mut prev: Vec<usize> = (0..=b.len()).collect();
    let mut cur = vec![0; b.len() + 1];
    for (i, &ca) in a.iter().enumerate() {
        cur[0] = i + 1;
        for (j, &cb) in b.iter().enumerate() {
            let cost = usize::from(!same_char(ca, cb));
            cur[j + 1] = (prev[j] + cost).min(prev[j + 1] + 1).min(cur[j] + 1);
        }
        std::mem::swap(&mut prev, &mut cur);
    }
    prev[b.len()]
}
