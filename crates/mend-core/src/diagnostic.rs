use std::fmt;

use serde::{Deserialize, Serialize};

use crate::Span;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    #[default]
    Error,
    Warning,
    Info,
}

/// Closed set of compiler problems the engine knows how to correct.
///
/// The argument conventions each kind carries are documented on [`Diagnostic`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ProblemKind {
    // Javadoc
    JavadocMissing,
    JavadocMissingParamTag,
    JavadocMissingReturnTag,
    JavadocMissingThrowsTag,
    JavadocInvalidParamName,
    JavadocDuplicateParamName,
    JavadocDuplicateReturnTag,
    JavadocInvalidThrowsClassName,
    JavadocDuplicateThrowsClassName,
    JavadocUnexpectedTag,
    JavadocInvalidTag,
    JavadocInvalidMemberTypeQualification,

    // Unused declarations
    UnusedPrivateField,
    UnusedPrivateMethod,
    UnusedPrivateConstructor,
    UnusedPrivateType,
    UnusedLocalVariable,
    UnusedParameter,
    UnusedTypeParameter,

    // Exceptions
    UncaughtException,
    UncaughtExceptionOnAutoClose,
    UnreachableCatch,

    // Static access
    NonStaticAccessToStaticField,
    NonStaticAccessToStaticMethod,
    IndirectAccessToStaticField,
    IndirectAccessToStaticMethod,
    NonStaticOrAlienTypeReceiver,

    // Type mismatch
    TypeMismatch,
    ReturnTypeMismatch,
    IncompatibleTypesInForeach,
    IncompatibleReturnType,
    IncompatibleExceptionInThrowsClause,

    // Unresolved method
    UndefinedMethod,
    ParameterMismatch,
    UndefinedConstructor,

    // Unresolved type / variable
    UndefinedType,
    AmbiguousType,
    UndefinedName,
    UndefinedField,
    UnresolvedVariable,

    // Return type
    VoidMethodReturnsValue,
    MethodReturnsVoid,
    MissingReturnType,
    ShouldReturnValue,
}

/// Coarse grouping of [`ProblemKind`]s, mostly useful for logging and filtering.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ProblemFamily {
    Javadoc,
    Unused,
    Exception,
    StaticAccess,
    TypeMismatch,
    UnresolvedMethod,
    UnresolvedType,
    UnresolvedVariable,
    ReturnType,
}

impl ProblemKind {
    pub const ALL: &'static [ProblemKind] = &[
        ProblemKind::JavadocMissing,
        ProblemKind::JavadocMissingParamTag,
        ProblemKind::JavadocMissingReturnTag,
        ProblemKind::JavadocMissingThrowsTag,
        ProblemKind::JavadocInvalidParamName,
        ProblemKind::JavadocDuplicateParamName,
        ProblemKind::JavadocDuplicateReturnTag,
        ProblemKind::JavadocInvalidThrowsClassName,
        ProblemKind::JavadocDuplicateThrowsClassName,
        ProblemKind::JavadocUnexpectedTag,
        ProblemKind::JavadocInvalidTag,
        ProblemKind::JavadocInvalidMemberTypeQualification,
        ProblemKind::UnusedPrivateField,
        ProblemKind::UnusedPrivateMethod,
        ProblemKind::UnusedPrivateConstructor,
        ProblemKind::UnusedPrivateType,
        ProblemKind::UnusedLocalVariable,
        ProblemKind::UnusedParameter,
        ProblemKind::UnusedTypeParameter,
        ProblemKind::UncaughtException,
        ProblemKind::UncaughtExceptionOnAutoClose,
        ProblemKind::UnreachableCatch,
        ProblemKind::NonStaticAccessToStaticField,
        ProblemKind::NonStaticAccessToStaticMethod,
        ProblemKind::IndirectAccessToStaticField,
        ProblemKind::IndirectAccessToStaticMethod,
        ProblemKind::NonStaticOrAlienTypeReceiver,
        ProblemKind::TypeMismatch,
        ProblemKind::ReturnTypeMismatch,
        ProblemKind::IncompatibleTypesInForeach,
        ProblemKind::IncompatibleReturnType,
        ProblemKind::IncompatibleExceptionInThrowsClause,
        ProblemKind::UndefinedMethod,
        ProblemKind::ParameterMismatch,
        ProblemKind::UndefinedConstructor,
        ProblemKind::UndefinedType,
        ProblemKind::AmbiguousType,
        ProblemKind::UndefinedName,
        ProblemKind::UndefinedField,
        ProblemKind::UnresolvedVariable,
        ProblemKind::VoidMethodReturnsValue,
        ProblemKind::MethodReturnsVoid,
        ProblemKind::MissingReturnType,
        ProblemKind::ShouldReturnValue,
    ];

    pub fn family(self) -> ProblemFamily {
        use ProblemKind::*;
        match self {
            JavadocMissing
            | JavadocMissingParamTag
            | JavadocMissingReturnTag
            | JavadocMissingThrowsTag
            | JavadocInvalidParamName
            | JavadocDuplicateParamName
            | JavadocDuplicateReturnTag
            | JavadocInvalidThrowsClassName
            | JavadocDuplicateThrowsClassName
            | JavadocUnexpectedTag
            | JavadocInvalidTag
            | JavadocInvalidMemberTypeQualification => ProblemFamily::Javadoc,
            UnusedPrivateField
            | UnusedPrivateMethod
            | UnusedPrivateConstructor
            | UnusedPrivateType
            | UnusedLocalVariable
            | UnusedParameter
            | UnusedTypeParameter => ProblemFamily::Unused,
            UncaughtException | UncaughtExceptionOnAutoClose | UnreachableCatch => {
                ProblemFamily::Exception
            }
            NonStaticAccessToStaticField
            | NonStaticAccessToStaticMethod
            | IndirectAccessToStaticField
            | IndirectAccessToStaticMethod
            | NonStaticOrAlienTypeReceiver => ProblemFamily::StaticAccess,
            TypeMismatch
            | ReturnTypeMismatch
            | IncompatibleTypesInForeach
            | IncompatibleReturnType
            | IncompatibleExceptionInThrowsClause => ProblemFamily::TypeMismatch,
            UndefinedMethod | ParameterMismatch | UndefinedConstructor => {
                ProblemFamily::UnresolvedMethod
            }
            UndefinedType | AmbiguousType => ProblemFamily::UnresolvedType,
            UndefinedName | UndefinedField | UnresolvedVariable => {
                ProblemFamily::UnresolvedVariable
            }
            VoidMethodReturnsValue | MethodReturnsVoid | MissingReturnType | ShouldReturnValue => {
                ProblemFamily::ReturnType
            }
        }
    }

    pub fn is_javadoc_missing_tag(self) -> bool {
        matches!(
            self,
            ProblemKind::JavadocMissingParamTag
                | ProblemKind::JavadocMissingReturnTag
                | ProblemKind::JavadocMissingThrowsTag
        )
    }
}

impl fmt::Display for ProblemKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

/// A compiler-reported problem.
///
/// Diagnostics are produced outside of this workspace and are treated as immutable input.
/// `arguments` follow a per-kind convention: for example `UncaughtException` carries the
/// qualified exception type, `TypeMismatch` carries `[found, expected]` and
/// `UndefinedMethod` carries `[receiver, name, arg types...]`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostic {
    pub kind: ProblemKind,
    #[serde(default)]
    pub severity: Severity,
    pub range: Span,
    #[serde(default)]
    pub arguments: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub related: Option<Span>,
}

impl Diagnostic {
    pub fn new(kind: ProblemKind, range: Span) -> Self {
        Self {
            kind,
            severity: Severity::Error,
            range,
            arguments: Vec::new(),
            related: None,
        }
    }

    pub fn with_args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.arguments = args.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_severity(mut self, severity: Severity) -> Self {
        self.severity = severity;
        self
    }

    pub fn with_related(mut self, related: Span) -> Self {
        self.related = Some(related);
        self
    }

    #[inline]
    pub fn arg(&self, idx: usize) -> Option<&str> {
        self.arguments.get(idx).map(String::as_str)
    }
}
