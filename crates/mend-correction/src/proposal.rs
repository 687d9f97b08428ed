use mend_core::{EditTree, FileId, Span};
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ProposalKind {
    QuickFix,
    Refactor,
}

/// A ranked, fully materialized correction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Proposal {
    pub label: String,
    pub relevance: i32,
    pub edit: EditTree,
    pub kind: ProposalKind,
}

/// An AST-level change emitted by a corrector, turned into text edits by
/// [`crate::materialize`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceChange {
    Replace { file: FileId, range: Span, text: String },
    Insert { file: FileId, offset: usize, text: String },
    Delete { file: FileId, range: Span },
    /// Delete the lines `range` touches, including their indentation and the final line
    /// break.
    DeleteLines { file: FileId, range: Span },
    /// Import a type by qualified name.
    AddImport { file: FileId, name: String },
    AddStaticImport {
        file: FileId,
        type_name: String,
        member: String,
    },
    CreateResource { path: String, content: String },
}

/// The unmaterialized output of one corrector.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawProposal {
    pub label: String,
    pub relevance: i32,
    pub kind: ProposalKind,
    pub changes: Vec<SourceChange>,
}

impl RawProposal {
    pub fn quick_fix(label: impl Into<String>, relevance: i32) -> Self {
        Self {
            label: label.into(),
            relevance,
            kind: ProposalKind::QuickFix,
            changes: Vec::new(),
        }
    }

    pub fn refactor(label: impl Into<String>, relevance: i32) -> Self {
        Self {
            kind: ProposalKind::Refactor,
            ..Self::quick_fix(label, relevance)
        }
    }

    pub fn replace(mut self, file: &FileId, range: Span, text: impl Into<String>) -> Self {
        self.push_replace(file, range, text);
        self
    }

    pub fn insert(mut self, file: &FileId, offset: usize, text: impl Into<String>) -> Self {
        self.push_insert(file, offset, text);
        self
    }

    pub fn delete(mut self, file: &FileId, range: Span) -> Self {
        self.push_delete(file, range);
        self
    }

    pub fn delete_lines(mut self, file: &FileId, range: Span) -> Self {
        self.push_delete_lines(file, range);
        self
    }

    pub fn with_changes(mut self, changes: impl IntoIterator<Item = SourceChange>) -> Self {
        self.changes.extend(changes);
        self
    }

    pub fn push_replace(&mut self, file: &FileId, range: Span, text: impl Into<String>) {
        self.changes.push(SourceChange::Replace {
            file: file.clone(),
            range,
            text: text.into(),
        });
    }

    pub fn push_insert(&mut self, file: &FileId, offset: usize, text: impl Into<String>) {
        self.changes.push(SourceChange::Insert {
            file: file.clone(),
            offset,
            text: text.into(),
        });
    }

    pub fn push_delete(&mut self, file: &FileId, range: Span) {
        self.changes.push(SourceChange::Delete {
            file: file.clone(),
            range,
        });
    }

    pub fn push_delete_lines(&mut self, file: &FileId, range: Span) {
        self.changes.push(SourceChange::DeleteLines {
            file: file.clone(),
            range,
        });
    }

    pub fn push(&mut self, change: SourceChange) {
        self.changes.push(change);
    }

    pub fn create_resource(mut self, path: impl Into<String>, content: impl Into<String>) -> Self {
        self.changes.push(SourceChange::CreateResource {
            path: path.into(),
            content: content.into(),
        });
        self
    }
}
