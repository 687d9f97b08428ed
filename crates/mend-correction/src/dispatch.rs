//! Diagnostic → corrector dispatch.

use std::panic::{catch_unwind, AssertUnwindSafe};

use mend_config::CorrectionConfig;
use mend_core::{Diagnostic, ProblemKind};
use rayon::prelude::*;

use crate::context::CorrectionContext;
use crate::correctors::{
    exceptions, getter_setter, javadoc, return_type, static_access, type_mismatch,
    unresolved_method, unresolved_type, unresolved_variable, unused,
};
use crate::materialize::materialize;
use crate::proposal::{Proposal, RawProposal};
use crate::rank::{rank, Candidate};
use crate::workspace::Workspace;
use crate::CorrectionRequest;

/// One correction strategy.
///
/// Correctors are pure: they read the context and return proposals, never failing. A
/// corrector that finds nothing to offer returns an empty list.
pub trait Corrector: Send + Sync {
    fn name(&self) -> &'static str;

    fn propose(&self, ctx: &CorrectionContext<'_>, diagnostic: &Diagnostic) -> Vec<RawProposal>;
}

static MISSING_TAGS: &[&dyn Corrector] = &[&javadoc::MissingTags];
static REMOVE_TAG: &[&dyn Corrector] = &[&javadoc::RemoveTag];
static MISSING_COMMENT: &[&dyn Corrector] = &[&javadoc::MissingComment];
static QUALIFY_INNER_TYPE: &[&dyn Corrector] = &[&javadoc::QualifyInnerType];
static UNUSED: &[&dyn Corrector] = &[&unused::UnusedDeclaration];
static UNUSED_FIELD: &[&dyn Corrector] =
    &[&unused::UnusedDeclaration, &getter_setter::GetterSetter];
static UNCAUGHT: &[&dyn Corrector] = &[&exceptions::UncaughtException];
static UNNEEDED_CATCH: &[&dyn Corrector] = &[&exceptions::UnneededCatch];
static STATIC_ACCESS: &[&dyn Corrector] = &[&static_access::StaticAccess];
static TYPE_MISMATCH: &[&dyn Corrector] = &[&type_mismatch::TypeMismatch];
static FOREACH_MISMATCH: &[&dyn Corrector] = &[&type_mismatch::ForEachMismatch];
static INCOMPATIBLE_RETURN: &[&dyn Corrector] = &[&type_mismatch::IncompatibleReturnType];
static INCOMPATIBLE_THROWS: &[&dyn Corrector] = &[&type_mismatch::IncompatibleThrows];
static UNRESOLVED_METHOD: &[&dyn Corrector] = &[&unresolved_method::UnresolvedMethod];
static UNRESOLVED_TYPE: &[&dyn Corrector] = &[&unresolved_type::UnresolvedType];
static AMBIGUOUS_TYPE: &[&dyn Corrector] = &[&unresolved_type::AmbiguousType];
static UNRESOLVED_VARIABLE: &[&dyn Corrector] = &[&unresolved_variable::UnresolvedVariable];
static RETURN_TYPE: &[&dyn Corrector] = &[&return_type::ReturnType];

/// The correctors registered for `kind`, in the order their proposals are emitted.
pub fn correctors_for(kind: ProblemKind) -> &'static [&'static dyn Corrector] {
    use ProblemKind::*;
    match kind {
        JavadocMissingParamTag | JavadocMissingReturnTag | JavadocMissingThrowsTag => MISSING_TAGS,
        JavadocInvalidParamName
        | JavadocDuplicateParamName
        | JavadocDuplicateReturnTag
        | JavadocInvalidThrowsClassName
        | JavadocDuplicateThrowsClassName
        | JavadocUnexpectedTag
        | JavadocInvalidTag => REMOVE_TAG,
        JavadocMissing => MISSING_COMMENT,
        JavadocInvalidMemberTypeQualification => QUALIFY_INNER_TYPE,
        UnusedPrivateField => UNUSED_FIELD,
        UnusedPrivateMethod
        | UnusedPrivateConstructor
        | UnusedPrivateType
        | UnusedLocalVariable
        | UnusedParameter
        | UnusedTypeParameter => UNUSED,
        UncaughtException | UncaughtExceptionOnAutoClose => UNCAUGHT,
        UnreachableCatch => UNNEEDED_CATCH,
        NonStaticAccessToStaticField
        | NonStaticAccessToStaticMethod
        | IndirectAccessToStaticField
        | IndirectAccessToStaticMethod
        | NonStaticOrAlienTypeReceiver => STATIC_ACCESS,
        TypeMismatch | ReturnTypeMismatch => TYPE_MISMATCH,
        IncompatibleTypesInForeach => FOREACH_MISMATCH,
        IncompatibleReturnType => INCOMPATIBLE_RETURN,
        IncompatibleExceptionInThrowsClause => INCOMPATIBLE_THROWS,
        UndefinedMethod | ParameterMismatch | UndefinedConstructor => UNRESOLVED_METHOD,
        UndefinedType => UNRESOLVED_TYPE,
        AmbiguousType => AMBIGUOUS_TYPE,
        UndefinedName | UndefinedField | UnresolvedVariable => UNRESOLVED_VARIABLE,
        VoidMethodReturnsValue | MethodReturnsVoid | MissingReturnType | ShouldReturnValue => {
            RETURN_TYPE
        }
    }
}

/// Run one corrector, isolating panics.
fn run(
    ctx: &CorrectionContext<'_>,
    diagnostic: &Diagnostic,
    corrector: &dyn Corrector,
) -> Vec<RawProposal> {
    match catch_unwind(AssertUnwindSafe(|| corrector.propose(ctx, diagnostic))) {
        Ok(proposals) => {
            tracing::debug!(
                target: "mend.correction",
                kind = %diagnostic.kind,
                strategy = corrector.name(),
                count = proposals.len(),
                "corrector finished"
            );
            proposals
        }
        Err(_) => {
            tracing::warn!(
                target: "mend.correction",
                kind = %diagnostic.kind,
                strategy = corrector.name(),
                "corrector panicked; dropping its proposals"
            );
            Vec::new()
        }
    }
}

/// Compute the ranked proposals for every diagnostic of `request` that touches its
/// selection.
pub fn compute_proposals(
    workspace: &Workspace,
    request: &CorrectionRequest,
    config: &CorrectionConfig,
) -> Vec<Proposal> {
    let Some(file) = workspace.file(&request.file) else {
        tracing::warn!(
            target: "mend.correction",
            file = %request.file,
            "correction requested for a file outside the workspace"
        );
        return Vec::new();
    };
    let ctx = CorrectionContext::new(
        workspace,
        file,
        &request.diagnostics,
        request.selection,
        config,
    );

    let tasks: Vec<(usize, &Diagnostic, &dyn Corrector)> = request
        .diagnostics
        .iter()
        .enumerate()
        .filter(|(_, diagnostic)| diagnostic.range.intersects(request.selection))
        .flat_map(|(idx, diagnostic)| {
            correctors_for(diagnostic.kind)
                .iter()
                .map(move |corrector| (idx, diagnostic, *corrector))
        })
        .collect();

    let candidates: Vec<Candidate> = tasks
        .par_iter()
        .map(|(idx, diagnostic, corrector)| {
            run(&ctx, diagnostic, *corrector)
                .into_iter()
                .filter_map(|raw| {
                    let label = raw.label.clone();
                    match materialize(workspace, raw) {
                        Ok(proposal) => Some(Candidate {
                            diagnostic: *idx,
                            proposal,
                        }),
                        Err(err) => {
                            tracing::warn!(
                                target: "mend.correction",
                                strategy = corrector.name(),
                                label = %label,
                                error = %err,
                                "dropping proposal that failed to materialize"
                            );
                            None
                        }
                    }
                })
                .collect::<Vec<_>>()
        })
        .flatten()
        .collect();

    rank(candidates)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_kind_has_a_corrector() {
        for kind in ProblemKind::ALL {
            assert!(!correctors_for(*kind).is_empty(), "{kind} has no corrector");
        }
    }

    struct Panics;

    impl Corrector for Panics {
        fn name(&self) -> &'static str {
            "panics"
        }

        fn propose(&self, _: &CorrectionContext<'_>, _: &Diagnostic) -> Vec<RawProposal> {
            panic!("boom")
        }
    }

    #[test]
    fn panicking_correctors_contribute_nothing() {
        let workspace = Workspace::new([("E.java", "class E {}\n")]);
        let file = workspace
            .file(&mend_core::FileId::new("E.java"))
            .expect("file");
        let config = CorrectionConfig::default();
        let ctx = CorrectionContext::new(&workspace, file, &[], mend_core::Span::empty(0), &config);
        let diagnostic = Diagnostic::new(ProblemKind::UndefinedName, mend_core::Span::new(0, 5));
        assert!(run(&ctx, &diagnostic, &Panics).is_empty());
    }
}
