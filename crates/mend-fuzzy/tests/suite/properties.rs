use mend_fuzzy::{
    fuzzy_match, is_similar_name, levenshtein, similarity, MatchKind, EXACT_SIMILARITY,
};
use proptest::prelude::*;

fn ident() -> impl Strategy<Value = String> {
    "[A-Za-z][A-Za-z0-9_]{0,15}"
}

proptest! {
    #[test]
    fn similarity_is_symmetric(a in ident(), b in ident()) {
        prop_assert_eq!(similarity(&a, &b), similarity(&b, &a));
    }

    #[test]
    fn names_are_similar_to_themselves(a in ident()) {
        prop_assert_eq!(similarity(&a, &a), Some(EXACT_SIMILARITY));
        prop_assert_eq!(similarity(&a, &a.to_ascii_uppercase()), Some(EXACT_SIMILARITY));
    }

    #[test]
    fn single_insertions_stay_similar(a in "[a-z]{4,12}", idx in 0usize..12, ch in "[A-Z]") {
        let idx = idx.min(a.len());
        let mut typo = a.clone();
        typo.insert_str(idx, &ch);
        prop_assert!(is_similar_name(&typo, &a), "{typo} vs {a}");
    }

    #[test]
    fn levenshtein_is_a_metric(a in ident(), b in ident(), c in ident()) {
        prop_assert_eq!(levenshtein(&a, &b), levenshtein(&b, &a));
        prop_assert!(levenshtein(&a, &c) <= levenshtein(&a, &b) + levenshtein(&b, &c));
        prop_assert_eq!(levenshtein(&a, &a), 0);
    }

    #[test]
    fn prefixes_match_as_prefix(a in ident(), len in 0usize..16) {
        let prefix = &a[..len.min(a.len())];
        let score = fuzzy_match(prefix, &a).expect("prefix matches");
        prop_assert_eq!(score.kind, MatchKind::Prefix);
    }
}
