use std::collections::HashSet;

use mend_core::{EditTree, FileId, TextEdit};
use mend_correction::rank::{rank, Candidate};
use mend_correction::{Proposal, ProposalKind};
use proptest::prelude::*;

const PROPTEST_CASES: u32 = 128;

fn candidate(diagnostic: usize, label: u8, relevance: i32, text: u8) -> Candidate {
    Candidate {
        diagnostic,
        proposal: Proposal {
            label: format!("fix {label}"),
            relevance,
            edit: EditTree::new(vec![TextEdit::insert(
                FileId::new("test1/E.java"),
                0,
                format!("/*{text}*/"),
            )]),
            kind: ProposalKind::QuickFix,
        },
    }
}

fn candidates() -> impl Strategy<Value = Vec<Candidate>> {
    prop::collection::vec((0usize..3, 0u8..4, -2i32..10, 0u8..4), 0..24).prop_map(|items| {
        items
            .into_iter()
            .map(|(diagnostic, label, relevance, text)| {
                candidate(diagnostic, label, relevance, text)
            })
            .collect()
    })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(PROPTEST_CASES))]

    #[test]
    fn ranked_proposals_are_sorted_by_relevance(input in candidates()) {
        let ranked = rank(input);
        for pair in ranked.windows(2) {
            prop_assert!(pair[0].relevance >= pair[1].relevance);
        }
    }

    #[test]
    fn ranked_proposals_never_repeat_a_label_and_edit(input in candidates()) {
        let ranked = rank(input);
        let mut seen = HashSet::new();
        for proposal in &ranked {
            prop_assert!(seen.insert((proposal.label.clone(), proposal.edit.render_key())));
        }
    }

    #[test]
    fn ranking_only_drops_candidates(input in candidates()) {
        let total = input.len();
        let labels: HashSet<String> = input.iter().map(|c| c.proposal.label.clone()).collect();
        let ranked = rank(input);
        prop_assert!(ranked.len() <= total);
        prop_assert!(ranked.iter().all(|p| labels.contains(&p.label)));
    }

    #[test]
    fn a_single_diagnostic_keeps_one_proposal_per_label_and_edit(input in candidates()) {
        let single: Vec<Candidate> = input
            .into_iter()
            .map(|mut c| {
                c.diagnostic = 0;
                c
            })
            .collect();
        let distinct: HashSet<(String, String)> = single
            .iter()
            .map(|c| (c.proposal.label.clone(), c.proposal.edit.render_key()))
            .collect();
        prop_assert_eq!(rank(single).len(), distinct.len());
    }
}
