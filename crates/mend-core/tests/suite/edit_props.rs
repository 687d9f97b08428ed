use mend_core::{apply_text_edits, EditTree, FileId, LineIndex, Span, TextEdit};
use proptest::prelude::*;

const PROPTEST_CASES: u32 = 128;

fn arb_text() -> impl Strategy<Value = String> {
    prop::collection::vec(
        prop_oneof![
            8 => prop::sample::select(vec!['a', 'b', ' ', '{', '}', ';']),
            2 => Just('\n'),
            1 => Just('é'),
        ],
        0..40,
    )
    .prop_map(|chars| chars.into_iter().collect())
}

fn boundaries(text: &str) -> Vec<usize> {
    let mut out: Vec<usize> = text.char_indices().map(|(i, _)| i).collect();
    out.push(text.len());
    out
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(PROPTEST_CASES))]

    #[test]
    fn normalized_disjoint_edits_apply(
        text in arb_text(),
        picks in prop::collection::vec((0usize..64, 0usize..4), 0..6),
    ) {
        let bounds = boundaries(&text);
        let file = FileId::new("A.java");
        let mut edits = Vec::new();
        let mut cursor = 0usize;
        for (skip, width) in picks {
            let start_idx = cursor + skip % 3;
            if start_idx >= bounds.len() {
                break;
            }
            let end_idx = (start_idx + width).min(bounds.len() - 1);
            edits.push(TextEdit::replace(
                file.clone(),
                Span::new(bounds[start_idx], bounds[end_idx]),
                "x",
            ));
            cursor = end_idx + 1;
        }
        let mut tree = EditTree::new(edits);
        prop_assert!(tree.normalize().is_ok());
        prop_assert!(apply_text_edits(&text, &tree.edits).is_ok());
    }

    #[test]
    fn line_col_round_trips(text in arb_text()) {
        let index = LineIndex::new(&text);
        for offset in boundaries(&text) {
            let lc = index.line_col(offset);
            prop_assert_eq!(index.offset(lc), Some(offset));
        }
    }
}
