//! Shared fixtures for corrector unit tests.

use mend_config::CorrectionConfig;
use mend_core::{Diagnostic, FileId, ProblemKind, ResourceCreate, Span};

use crate::context::CorrectionContext;
use crate::dispatch::Corrector;
use crate::materialize::materialize;
use crate::workspace::Workspace;

/// Span of the first occurrence of `needle`.
pub(crate) fn span_of(text: &str, needle: &str) -> Span {
    let start = text
        .find(needle)
        .unwrap_or_else(|| panic!("`{needle}` not found"));
    Span::new(start, start + needle.len())
}

/// Span of the `nth` (zero-based) occurrence of `needle`.
pub(crate) fn nth_span_of(text: &str, needle: &str, nth: usize) -> Span {
    let start = text
        .match_indices(needle)
        .nth(nth)
        .map(|(start, _)| start)
        .unwrap_or_else(|| panic!("occurrence {nth} of `{needle}` not found"));
    Span::new(start, start + needle.len())
}

/// Span of the first `needle` inside the first occurrence of `context`.
pub(crate) fn span_in(text: &str, context: &str, needle: &str) -> Span {
    let outer = span_of(text, context);
    let offset = context
        .find(needle)
        .unwrap_or_else(|| panic!("`{needle}` not in `{context}`"));
    Span::new(outer.start + offset, outer.start + offset + needle.len())
}

pub(crate) fn diagnostic(kind: ProblemKind, range: Span, args: &[&str]) -> Diagnostic {
    Diagnostic::new(kind, range).with_args(args.iter().copied())
}

/// A workspace plus the file the correction runs in.
pub(crate) struct Fixture {
    pub workspace: Workspace,
    pub file: FileId,
    pub config: CorrectionConfig,
}

impl Fixture {
    /// The first source is the file under correction.
    pub fn new(sources: &[(&str, &str)]) -> Self {
        let file = FileId::new(sources[0].0);
        Self {
            workspace: Workspace::new(sources.iter().copied()),
            file,
            config: CorrectionConfig::default(),
        }
    }

    pub fn text(&self) -> &str {
        &self.workspace.file(&self.file).expect("file").text
    }

    /// Labels the corrector offers for `diagnostics[0]`, the selection being its range.
    pub fn labels(&self, corrector: &dyn Corrector, diagnostics: &[Diagnostic]) -> Vec<String> {
        let file = self.workspace.file(&self.file).expect("file");
        let ctx = CorrectionContext::new(
            &self.workspace,
            file,
            diagnostics,
            diagnostics[0].range,
            &self.config,
        );
        corrector
            .propose(&ctx, &diagnostics[0])
            .into_iter()
            .map(|raw| raw.label)
            .collect()
    }

    /// Apply the proposal labelled `label` and return the text of `target`.
    pub fn apply_in(
        &self,
        corrector: &dyn Corrector,
        diagnostics: &[Diagnostic],
        selection: Span,
        label: &str,
        target: &str,
    ) -> String {
        let file = self.workspace.file(&self.file).expect("file");
        let ctx = CorrectionContext::new(
            &self.workspace,
            file,
            diagnostics,
            selection,
            &self.config,
        );
        let raw = corrector
            .propose(&ctx, &diagnostics[0])
            .into_iter()
            .find(|raw| raw.label == label)
            .unwrap_or_else(|| panic!("no proposal labelled `{label}`"));
        let proposal = materialize(&self.workspace, raw).expect("materialize");
        let target = FileId::new(target);
        let text = self
            .workspace
            .file(&target)
            .map(|f| f.text.as_str())
            .unwrap_or_default();
        proposal.edit.apply_to(&target, text).expect("apply")
    }

    /// The resource created by the proposal labelled `label`.
    pub fn created(
        &self,
        corrector: &dyn Corrector,
        diagnostics: &[Diagnostic],
        label: &str,
    ) -> ResourceCreate {
        let file = self.workspace.file(&self.file).expect("file");
        let ctx = CorrectionContext::new(
            &self.workspace,
            file,
            diagnostics,
            diagnostics[0].range,
            &self.config,
        );
        let raw = corrector
            .propose(&ctx, &diagnostics[0])
            .into_iter()
            .find(|raw| raw.label == label)
            .unwrap_or_else(|| panic!("no proposal labelled `{label}`"));
        let proposal = materialize(&self.workspace, raw).expect("materialize");
        proposal.edit.resource.expect("resource creation")
    }

    /// Apply the proposal labelled `label` to the file under correction.
    pub fn apply(
        &self,
        corrector: &dyn Corrector,
        diagnostics: &[Diagnostic],
        label: &str,
    ) -> String {
        let file = self.file.as_str().to_string();
        self.apply_in(corrector, diagnostics, diagnostics[0].range, label, &file)
    }
}
