//! Turn the `SourceChange`s of a [`RawProposal`] into a validated [`EditTree`].

use mend_core::{text, EditError, EditTree, FileId, ResourceCreate, Span, TextEdit};
use thiserror::Error;

use crate::imports::{collect_import_requests, import_edits};
use crate::proposal::{Proposal, RawProposal, SourceChange};
use crate::workspace::Workspace;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum MaterializeError {
    #[error("unknown file {0:?}")]
    UnknownFile(FileId),
    #[error("invalid range {range:?} for file {file:?} (len={len})")]
    InvalidRange { file: FileId, range: Span, len: usize },
    #[error("more than one resource creation in a single proposal")]
    MultipleResources,
    #[error("proposal has no effect")]
    Empty,
    #[error(transparent)]
    Edit(#[from] EditError),
}

fn file_text<'w>(workspace: &'w Workspace, file: &FileId) -> Result<&'w str, MaterializeError> {
    workspace
        .file(file)
        .map(|f| f.text.as_str())
        .ok_or_else(|| MaterializeError::UnknownFile(file.clone()))
}

fn validate_offset(
    workspace: &Workspace,
    file: &FileId,
    offset: usize,
) -> Result<(), MaterializeError> {
    validate_range(workspace, file, Span::empty(offset))
}

fn validate_range(
    workspace: &Workspace,
    file: &FileId,
    range: Span,
) -> Result<(), MaterializeError> {
    let text = file_text(workspace, file)?;
    if range.start > range.end || range.end > text.len() {
        return Err(MaterializeError::InvalidRange {
            file: file.clone(),
            range,
            len: text.len(),
        });
    }
    if !text.is_char_boundary(range.start) || !text.is_char_boundary(range.end) {
        return Err(EditError::NotCharBoundary {
            file: file.clone(),
            range,
        }
        .into());
    }
    Ok(())
}

/// Widen `range` to whole lines when nothing but whitespace shares those lines with it.
fn line_range(text: &str, range: Span) -> Span {
    let mut start = range.start;
    let mut end = range.end;
    if text::is_first_on_line(text, start) {
        start = text::line_start(text, start);
        if text::is_last_on_line(text, end) {
            end = text::line_end_with_newline(text, end);
        }
    } else if text::is_last_on_line(text, end) {
        // Keep the line break; drop the whitespace between the previous token and us.
        let trimmed = text[..start].trim_end_matches([' ', '\t']).len();
        start = trimmed;
        end = text::line_end(text, end);
    }
    Span::new(start, end)
}

pub fn materialize(workspace: &Workspace, raw: RawProposal) -> Result<Proposal, MaterializeError> {
    let mut resource: Option<ResourceCreate> = None;
    let mut edits: Vec<TextEdit> = Vec::new();

    for change in &raw.changes {
        match change {
            SourceChange::Replace { file, range, text } => {
                validate_range(workspace, file, *range)?;
                edits.push(TextEdit::replace(file.clone(), *range, text.clone()));
            }
            SourceChange::Insert { file, offset, text } => {
                validate_offset(workspace, file, *offset)?;
                edits.push(TextEdit::insert(file.clone(), *offset, text.clone()));
            }
            SourceChange::Delete { file, range } => {
                validate_range(workspace, file, *range)?;
                edits.push(TextEdit::delete(file.clone(), *range));
            }
            SourceChange::DeleteLines { file, range } => {
                validate_range(workspace, file, *range)?;
                let range = line_range(file_text(workspace, file)?, *range);
                edits.push(TextEdit::delete(file.clone(), range));
            }
            SourceChange::CreateResource { path, content } => {
                if resource.is_some() {
                    return Err(MaterializeError::MultipleResources);
                }
                resource = Some(ResourceCreate {
                    path: path.clone(),
                    content: content.clone(),
                });
            }
            SourceChange::AddImport { .. } | SourceChange::AddStaticImport { .. } => {}
        }
    }

    for (file_id, types, statics) in collect_import_requests(&raw.changes) {
        let file = workspace
            .file(&file_id)
            .ok_or_else(|| MaterializeError::UnknownFile(file_id.clone()))?;
        edits.extend(import_edits(file, &types, &statics));
    }

    let mut edit = match resource {
        Some(resource) => EditTree::with_resource(resource, edits),
        None => EditTree::new(edits),
    };
    edit.normalize()?;
    if edit.is_empty() {
        return Err(MaterializeError::Empty);
    }

    Ok(Proposal {
        label: raw.label,
        relevance: raw.relevance,
        edit,
        kind: raw.kind,
    })
}
