//! Java type model for correction analysis.
//!
//! [`TypeStore`] holds class definitions lowered from the bundled JDK stubs and from
//! workspace sources; the free functions in [`subtyping`] and [`members`] answer the
//! questions corrections ask about them.

mod env;
mod jdk;
pub mod lower;
pub mod members;
pub mod subtyping;
mod ty;

pub use env::{
    ClassDef, ClassKind, FieldDef, MethodDef, Origin, TypeEnv, TypeParamDef, TypeStore, Visibility,
};
pub use jdk::jdk;
pub use lower::{add_units, resolve_class_name, ImportScope, TypeScope};
pub use members::{
    all_fields, all_methods, constructors, field, field_type, instantiate_as_supertype,
    is_subclass, methods_named, overridden_methods, substitute, supertypes, ResolvedField,
    ResolvedMethod, Substitution,
};
pub use subtyping::{is_assignable, is_castable, is_checked_exception, is_subtype};
pub use ty::{
    parse_type, qualifier, simple_name, ClassType, PrimitiveType, Type, TypeParseError,
    WildcardBound, OBJECT, STRING,
};
