//! Quick-fix proposals for Java compiler diagnostics.
//!
//! A [`CorrectionRequest`] names a file of a [`Workspace`], the diagnostics reported for
//! it and the selection the user asked about. [`compute_proposals`] routes every
//! diagnostic touching the selection to the correctors registered for its kind, turns
//! what they propose into concrete edits and returns the ranked result.

pub mod codegen;
pub mod context;
pub mod correctors;
pub mod dispatch;
pub mod imports;
pub mod materialize;
pub mod names;
pub mod proposal;
pub mod rank;
pub mod relevance;
pub mod retype;
pub mod scope;
pub mod signature;
pub mod typing;
pub mod workspace;

#[cfg(test)]
mod test_support;

use mend_core::{Diagnostic, FileId, Span};
use serde::{Deserialize, Serialize};

pub use context::CorrectionContext;
pub use dispatch::{compute_proposals, correctors_for, Corrector};
pub use materialize::{materialize, MaterializeError};
pub use proposal::{Proposal, ProposalKind, RawProposal, SourceChange};
pub use workspace::{SourceFile, Workspace};

/// What to correct: the diagnostics of one file, narrowed to those touching `selection`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CorrectionRequest {
    pub file: FileId,
    pub diagnostics: Vec<Diagnostic>,
    pub selection: Span,
}

impl CorrectionRequest {
    /// A request selecting the range of the first diagnostic, or the start of the file
    /// when there is none.
    pub fn new(file: FileId, diagnostics: Vec<Diagnostic>) -> Self {
        let selection = diagnostics
            .first()
            .map_or(Span::empty(0), |diagnostic| diagnostic.range);
        Self {
            file,
            diagnostics,
            selection,
        }
    }

    pub fn with_selection(mut self, selection: Span) -> Self {
        self.selection = selection;
        self
    }
}
