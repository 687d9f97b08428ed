//! Ordering and deduplication of materialized proposals.

use std::collections::{HashMap, HashSet};

use crate::proposal::Proposal;

/// A proposal tagged with the index of the diagnostic it answers.
#[derive(Debug, Clone)]
pub struct Candidate {
    pub diagnostic: usize,
    pub proposal: Proposal,
}

/// Stable sort by descending relevance, then drop duplicates.
///
/// Two proposals with the same label and edit collapse to the first. Proposals for
/// different diagnostics that render to the same edit also collapse to the first, even
/// when their labels differ.
pub fn rank(mut candidates: Vec<Candidate>) -> Vec<Proposal> {
    candidates.sort_by(|a, b| b.proposal.relevance.cmp(&a.proposal.relevance));

    let mut seen_labels: HashSet<(String, String)> = HashSet::new();
    let mut seen_edits: HashMap<String, usize> = HashMap::new();
    let mut out = Vec::with_capacity(candidates.len());
    for candidate in candidates {
        let key = candidate.proposal.edit.render_key();
        if !seen_labels.insert((candidate.proposal.label.clone(), key.clone())) {
            continue;
        }
        match seen_edits.get(&key) {
            Some(diagnostic) if *diagnostic != candidate.diagnostic => continue,
            Some(_) => {}
            None => {
                seen_edits.insert(key, candidate.diagnostic);
            }
        }
        out.push(candidate.proposal);
    }
    out
}
