//! Correction strategies, one module per problem family.

pub mod exceptions;
pub mod getter_setter;
pub mod javadoc;
pub mod return_type;
pub mod static_access;
pub mod type_mismatch;
pub mod unresolved_method;
pub mod unresolved_type;
pub mod unresolved_variable;
pub mod unused;

use mend_syntax::ast::{MethodDecl, TypeDecl};
use mend_types::{ClassDef, MethodDef, TypeEnv};

/// The lowered class and method for a source method declaration.
pub(crate) fn method_def<'e>(
    env: &'e dyn TypeEnv,
    type_name: &str,
    method: &MethodDecl,
) -> Option<(&'e ClassDef, &'e MethodDef)> {
    let class = env.class(type_name)?;
    let def = class
        .methods
        .iter()
        .find(|m| m.name_range == Some(method.name_range))?;
    Some((class, def))
}

/// Offset of the first line of a member declaration (its first modifier or keyword)
/// and the indentation of that line.
pub(crate) fn decl_line(text: &str, start: usize) -> (usize, &str) {
    (
        mend_core::text::line_start(text, start),
        mend_core::text::indentation_at(text, start),
    )
}

/// `name(..)` as used in labels that mention a method.
pub(crate) fn method_label(name: &str) -> String {
    format!("{name}(..)")
}

/// `true` when `decl` is a class-like type that can get new members.
pub(crate) fn can_declare_members(decl: &TypeDecl) -> bool {
    !matches!(decl.kind, mend_syntax::ast::TypeKind::Annotation)
}
