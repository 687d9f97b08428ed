//! Core shared types for the correction engine.
//!
//! This crate is intentionally small: spans, diagnostics, text edits and the line/indent
//! helpers every other crate needs when it turns an AST-level change into text.

mod diagnostic;
mod edit;
mod span;
pub mod text;

pub use diagnostic::{Diagnostic, ProblemFamily, ProblemKind, Severity};
pub use edit::{apply_text_edits, EditError, EditTree, FileId, ResourceCreate, TextEdit};
pub use span::Span;
pub use text::LineIndex;
