use anyhow::{Context, Result};
use mend_core::FileId;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Component, Path, PathBuf};
use walkdir::WalkDir;

/// The Java sources a correction request runs against, keyed the way the engine
/// names files: paths relative to the source root they were found under.
pub(crate) struct Snapshot {
    /// Source root of the focus file. New compilation units are created under it.
    pub(crate) focus_root: PathBuf,
    pub(crate) focus: FileId,
    pub(crate) files: BTreeMap<FileId, SourceOnDisk>,
}

pub(crate) struct SourceOnDisk {
    pub(crate) path: PathBuf,
    pub(crate) text: String,
}

impl Snapshot {
    pub(crate) fn text(&self, file: &FileId) -> Option<&str> {
        self.files.get(file).map(|source| source.text.as_str())
    }

    pub(crate) fn focus_text(&self) -> &str {
        self.text(&self.focus).unwrap_or_default()
    }

    /// Where `file` lives on disk, for files in the snapshot and for new ones alike.
    pub(crate) fn path_for(&self, file: &FileId) -> PathBuf {
        match self.files.get(file) {
            Some(source) => source.path.clone(),
            None => self.focus_root.join(file.as_str()),
        }
    }

    pub(crate) fn sources(&self) -> impl Iterator<Item = (&str, &str)> {
        self.files
            .iter()
            .map(|(id, source)| (id.as_str(), source.text.as_str()))
    }
}

fn canonicalize_best_effort(path: &Path, context: &'static str) -> PathBuf {
    match path.canonicalize() {
        Ok(path) => path,
        Err(err) => {
            tracing::debug!(
                target: "mend.cli",
                context,
                path = %path.display(),
                error = %err,
                "failed to canonicalize path"
            );
            path.to_path_buf()
        }
    }
}

/// Load `focus_file` together with every Java file under `source_roots`.
///
/// Without explicit roots, the root is derived from the focus file's package
/// declaration and only scanned when the directory layout matches that package.
pub(crate) fn load(focus_file: &Path, source_roots: &[PathBuf]) -> Result<Snapshot> {
    let focus_path = canonicalize_best_effort(focus_file, "snapshot.focus_file");
    let focus_text = fs::read_to_string(&focus_path)
        .with_context(|| format!("failed to read {}", focus_file.display()))?;

    let mut roots = Vec::with_capacity(source_roots.len() + 1);
    for root in source_roots {
        let root = canonicalize_best_effort(root, "snapshot.source_root");
        if !root.is_dir() {
            anyhow::bail!("source root {} is not a directory", root.display());
        }
        roots.push(root);
    }

    let focus_root = match roots.iter().find(|root| focus_path.starts_with(root)) {
        Some(root) => root.clone(),
        None => {
            let (root, matches_package) = infer_source_root(&focus_path, &focus_text);
            if matches_package {
                roots.insert(0, root.clone());
            }
            root
        }
    };

    let focus = file_id(&focus_root, &focus_path)?;
    let mut files = BTreeMap::new();
    files.insert(
        focus.clone(),
        SourceOnDisk {
            path: focus_path.clone(),
            text: focus_text,
        },
    );

    for root in &roots {
        for path in java_files_in(root) {
            if path == focus_path {
                continue;
            }
            let id = file_id(root, &path)?;
            if files.contains_key(&id) {
                continue;
            }
            let text = fs::read_to_string(&path)
                .with_context(|| format!("failed to read {}", path.display()))?;
            files.insert(id, SourceOnDisk { path, text });
        }
    }

    tracing::debug!(
        target: "mend.cli",
        focus = %focus,
        root = %focus_root.display(),
        files = files.len(),
        "loaded sources"
    );

    Ok(Snapshot {
        focus_root,
        focus,
        files,
    })
}

/// Strip the package directories off the focus file's parent. Returns the parent itself,
/// and `false`, when the layout does not follow the package or there is no package.
fn infer_source_root(focus_path: &Path, text: &str) -> (PathBuf, bool) {
    let parent = focus_path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."))
        .to_path_buf();

    let parse = mend_syntax::parse(text);
    let Some(package) = &parse.compilation_unit().package else {
        return (parent, false);
    };

    let mut dir = parent.as_path();
    for segment in package.name.rsplit('.') {
        let matches = dir
            .file_name()
            .and_then(|name| name.to_str())
            .is_some_and(|name| name == segment);
        match dir.parent() {
            Some(up) if matches => dir = up,
            _ => return (parent, false),
        }
    }
    (dir.to_path_buf(), true)
}

fn file_id(root: &Path, path: &Path) -> Result<FileId> {
    let relative = path
        .strip_prefix(root)
        .with_context(|| format!("{} is not under {}", path.display(), root.display()))?;
    let segments: Vec<String> = relative
        .components()
        .filter_map(|component| match component {
            Component::Normal(segment) => Some(segment.to_string_lossy().into_owned()),
            _ => None,
        })
        .collect();
    Ok(FileId::new(segments.join("/")))
}

fn java_files_in(root: &Path) -> Vec<PathBuf> {
    let mut files: Vec<PathBuf> = WalkDir::new(root)
        .follow_links(true)
        .into_iter()
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_type().is_file() && is_java_file(entry.path()))
        .map(|entry| entry.into_path())
        .collect();
    files.sort();
    files.dedup();
    files
}

fn is_java_file(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("java"))
}
