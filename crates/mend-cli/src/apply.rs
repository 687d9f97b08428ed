use anyhow::{Context, Result};
use mend_core::{EditTree, FileId};
use std::collections::BTreeMap;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::snapshot::Snapshot;

/// Write the result of `edit` to disk and return the paths that changed.
///
/// Every new text is computed before anything is written, so an edit that fails to apply
/// leaves the tree untouched.
pub(crate) fn apply_edit_to_disk(snapshot: &Snapshot, edit: &EditTree) -> Result<Vec<PathBuf>> {
    let mut outputs: BTreeMap<FileId, String> = BTreeMap::new();

    if let Some(resource) = &edit.resource {
        let id = FileId::new(resource.path.clone());
        let path = snapshot.path_for(&id);
        if snapshot.text(&id).is_some() || path.exists() {
            anyhow::bail!("create destination {} already exists", path.display());
        }
        outputs.insert(id, resource.content.clone());
    }

    for file in edit.edits_by_file().into_keys() {
        let original = match outputs.get(file) {
            Some(created) => created.clone(),
            None => snapshot
                .text(file)
                .with_context(|| format!("edit targets unknown file {file}"))?
                .to_owned(),
        };
        let updated = edit
            .apply_to(file, &original)
            .with_context(|| format!("failed to apply edits to {file}"))?;
        outputs.insert(file.clone(), updated);
    }

    let mut written = Vec::with_capacity(outputs.len());
    for (file, text) in outputs {
        let path = snapshot.path_for(&file);
        atomic_write(&path, text.as_bytes())
            .with_context(|| format!("failed to write {}", path.display()))?;
        tracing::debug!(target: "mend.cli", path = %path.display(), "wrote file");
        written.push(path);
    }
    Ok(written)
}

/// Replace `path` by writing a sibling temp file and renaming it into place.
fn atomic_write(path: &Path, bytes: &[u8]) -> Result<()> {
    let parent = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    fs::create_dir_all(parent).with_context(|| format!("failed to create {}", parent.display()))?;

    let mut tmp = tempfile::NamedTempFile::new_in(parent)?;
    tmp.write_all(bytes)?;
    tmp.as_file().sync_all()?;
    tmp.persist(path).map_err(|err| err.error)?;
    Ok(())
}
