use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::Span;

/// Identifier for a workspace file (a workspace-relative path).
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FileId(pub String);

impl FileId {
    pub fn new(path: impl Into<String>) -> Self {
        Self(path.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for FileId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "FileId({})", self.0)
    }
}

impl fmt::Display for FileId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A single file edit.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TextEdit {
    pub file: FileId,
    pub range: Span,
    pub replacement: String,
}

impl TextEdit {
    pub fn insert(file: FileId, offset: usize, text: impl Into<String>) -> Self {
        Self {
            file,
            range: Span::empty(offset),
            replacement: text.into(),
        }
    }

    pub fn replace(file: FileId, range: Span, text: impl Into<String>) -> Self {
        Self {
            file,
            range,
            replacement: text.into(),
        }
    }

    pub fn delete(file: FileId, range: Span) -> Self {
        Self {
            file,
            range,
            replacement: String::new(),
        }
    }
}

/// A new compilation unit created alongside a proposal's edits.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ResourceCreate {
    pub path: String,
    pub content: String,
}

/// The change carried by a proposal: at most one resource creation followed by an
/// ordered set of non-overlapping text edits.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EditTree {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resource: Option<ResourceCreate>,
    pub edits: Vec<TextEdit>,
}

impl EditTree {
    pub fn new(edits: Vec<TextEdit>) -> Self {
        Self {
            resource: None,
            edits,
        }
    }

    pub fn with_resource(resource: ResourceCreate, edits: Vec<TextEdit>) -> Self {
        Self {
            resource: Some(resource),
            edits,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.resource.is_none() && self.edits.is_empty()
    }

    /// Returns edits grouped by file in deterministic order.
    pub fn edits_by_file(&self) -> BTreeMap<&FileId, Vec<&TextEdit>> {
        let mut map: BTreeMap<&FileId, Vec<&TextEdit>> = BTreeMap::new();
        for edit in &self.edits {
            map.entry(&edit.file).or_default().push(edit);
        }
        for edits in map.values_mut() {
            edits.sort_by(|a, b| {
                a.range
                    .start
                    .cmp(&b.range.start)
                    .then_with(|| a.range.end.cmp(&b.range.end))
            });
        }
        map
    }

    /// Normalize edits: sort, drop exact duplicates, merge inserts at the same offset
    /// and reject overlaps.
    ///
    /// Inserts at the same offset are concatenated in emission order, so callers control
    /// the final text by the order they push edits in.
    pub fn normalize(&mut self) -> Result<(), EditError> {
        // Stable sort keeps emission order for inserts sharing an offset.
        self.edits.sort_by(|a, b| {
            a.file
                .cmp(&b.file)
                .then_with(|| a.range.start.cmp(&b.range.start))
                .then_with(|| a.range.end.cmp(&b.range.end))
        });

        let mut merged: Vec<TextEdit> = Vec::with_capacity(self.edits.len());
        for edit in self.edits.drain(..) {
            if edit.range.start > edit.range.end {
                return Err(EditError::InvalidRange {
                    file: edit.file,
                    range: edit.range,
                });
            }
            if let Some(last) = merged.last_mut() {
                if last.file == edit.file && last.range == edit.range {
                    if last.replacement == edit.replacement {
                        continue;
                    }
                    if last.range.is_empty() {
                        last.replacement.push_str(&edit.replacement);
                        continue;
                    }
                    return Err(EditError::OverlappingEdits {
                        file: edit.file,
                        first: last.range,
                        second: edit.range,
                    });
                }
            }
            merged.push(edit);
        }

        let mut prev: Option<(&FileId, Span)> = None;
        for edit in &merged {
            if let Some((file, range)) = prev {
                if file == &edit.file && edit.range.start < range.end {
                    return Err(EditError::OverlappingEdits {
                        file: edit.file.clone(),
                        first: range,
                        second: edit.range,
                    });
                }
            }
            prev = Some((&edit.file, edit.range));
        }

        self.edits = merged;
        Ok(())
    }

    /// Apply the edits targeting `file` to `original`.
    pub fn apply_to(&self, file: &FileId, original: &str) -> Result<String, EditError> {
        let edits: Vec<TextEdit> = self
            .edits
            .iter()
            .filter(|edit| &edit.file == file)
            .cloned()
            .collect();
        apply_text_edits(original, &edits)
    }

    /// A stable textual rendering used to compare edits structurally.
    pub fn render_key(&self) -> String {
        let mut key = String::new();
        if let Some(resource) = &self.resource {
            key.push_str("+");
            key.push_str(&resource.path);
            key.push('\0');
            key.push_str(&resource.content);
            key.push('\0');
        }
        for edit in &self.edits {
            key.push_str(&format!(
                "{}@{}..{}\0{}\0",
                edit.file, edit.range.start, edit.range.end, edit.replacement
            ));
        }
        key
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum EditError {
    #[error("invalid text range {range:?} in {file:?}")]
    InvalidRange { file: FileId, range: Span },
    #[error("overlapping edits in {file:?}: {first:?} overlaps {second:?}")]
    OverlappingEdits {
        file: FileId,
        first: Span,
        second: Span,
    },
    #[error("text edit range {range:?} is outside the file bounds (len={len}) in {file:?}")]
    OutOfBounds {
        file: FileId,
        range: Span,
        len: usize,
    },
    #[error("text edit range {range:?} does not fall on a char boundary in {file:?}")]
    NotCharBoundary { file: FileId, range: Span },
}

/// Apply a set of edits to `original` and return the modified text.
///
/// The input edits must be non-overlapping. Inserts sharing an offset are applied in the
/// order they appear in `edits`.
pub fn apply_text_edits(original: &str, edits: &[TextEdit]) -> Result<String, EditError> {
    if edits.is_empty() {
        return Ok(original.to_string());
    }

    let mut indexed: Vec<(usize, &TextEdit)> = edits.iter().enumerate().collect();
    indexed.sort_by(|(ia, a), (ib, b)| {
        b.range
            .start
            .cmp(&a.range.start)
            .then_with(|| b.range.end.cmp(&a.range.end))
            .then_with(|| ib.cmp(ia))
    });

    let mut out = original.to_string();
    for (_, edit) in indexed {
        let len = out.len();
        if edit.range.end > len || edit.range.start > edit.range.end {
            return Err(EditError::OutOfBounds {
                file: edit.file.clone(),
                range: edit.range,
                len,
            });
        }
        if !out.is_char_boundary(edit.range.start) || !out.is_char_boundary(edit.range.end) {
            return Err(EditError::NotCharBoundary {
                file: edit.file.clone(),
                range: edit.range,
            });
        }

        out.replace_range(edit.range.start..edit.range.end, &edit.replacement);
    }

    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn file() -> FileId {
        FileId::new("A.java")
    }

    #[test]
    fn normalize_merges_inserts_in_emission_order() {
        let mut tree = EditTree::new(vec![
            TextEdit::insert(file(), 4, "b"),
            TextEdit::replace(file(), Span::new(0, 2), "X"),
            TextEdit::insert(file(), 4, "c"),
        ]);
        tree.normalize().unwrap();
        assert_eq!(tree.edits.len(), 2);
        assert_eq!(tree.edits[1].replacement, "bc");
    }

    #[test]
    fn normalize_rejects_overlaps() {
        let mut tree = EditTree::new(vec![
            TextEdit::replace(file(), Span::new(0, 4), "x"),
            TextEdit::delete(file(), Span::new(2, 6)),
        ]);
        assert!(matches!(
            tree.normalize(),
            Err(EditError::OverlappingEdits { .. })
        ));
    }

    #[test]
    fn apply_replaces_back_to_front() {
        let edits = vec![
            TextEdit::replace(file(), Span::new(0, 3), "int"),
            TextEdit::insert(file(), 7, " = 0"),
        ];
        assert_eq!(apply_text_edits("var x;x", &edits).unwrap(), "int x;x = 0");
    }

    #[test]
    fn apply_rejects_split_char() {
        let edits = vec![TextEdit::delete(file(), Span::new(0, 1))];
        assert!(matches!(
            apply_text_edits("é", &edits),
            Err(EditError::NotCharBoundary { .. })
        ));
    }
}
