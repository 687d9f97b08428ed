//! Subtyping, assignment compatibility and cast legality.
//!
//! Unknown types are compatible with everything so that unresolved code does not
//! produce spurious mismatches.

use crate::env::TypeEnv;
use crate::members::instantiate_as_supertype;
use crate::ty::{Type, WildcardBound, OBJECT};

pub const THROWABLE: &str = "java.lang.Throwable";
pub const RUNTIME_EXCEPTION: &str = "java.lang.RuntimeException";
pub const ERROR: &str = "java.lang.Error";
pub const AUTO_CLOSEABLE: &str = "java.lang.AutoCloseable";

pub fn is_subtype(env: &dyn TypeEnv, sub: &Type, sup: &Type) -> bool {
    if sub == sup || sub.is_unknown() || sup.is_unknown() {
        return true;
    }
    match (sub, sup) {
        (Type::Void, _) | (_, Type::Void) => false,
        (Type::Primitive(a), Type::Primitive(b)) => a.widens_to(*b),
        (Type::Primitive(_), _) | (_, Type::Primitive(_)) => false,
        (Type::Null, _) => sup.is_reference(),
        (_, Type::Null) => false,
        (_, Type::Class(class)) if class.name == OBJECT => true,
        (Type::Array(a), Type::Array(b)) => {
            if a.is_primitive() || b.is_primitive() {
                a == b
            } else {
                is_subtype(env, a, b)
            }
        }
        (Type::Array(_), Type::Class(class)) => {
            matches!(class.name.as_str(), "java.lang.Cloneable" | "java.io.Serializable")
        }
        (Type::Wildcard(_), _) => is_subtype(env, &sub.upper_bound(), sup),
        (_, Type::Wildcard(_)) => contains(env, sub, sup),
        (Type::TypeVar(a), Type::TypeVar(b)) => a == b,
        (Type::TypeVar(_), _) | (_, Type::TypeVar(_)) => false,
        (Type::Class(_), Type::Class(sup_class)) => {
            let Some(view) = instantiate_as_supertype(env, sub, &sup_class.name) else {
                return false;
            };
            let view_args = view.type_args();
            if sup_class.args.is_empty() || view_args.is_empty() {
                // Raw types are compatible in both directions.
                return true;
            }
            view_args.len() == sup_class.args.len()
                && view_args
                    .iter()
                    .zip(&sup_class.args)
                    .all(|(arg, formal)| contains(env, arg, formal))
        }
        _ => false,
    }
}

/// Type-argument containment: `arg` fits the formal argument `formal`.
fn contains(env: &dyn TypeEnv, arg: &Type, formal: &Type) -> bool {
    match formal {
        Type::Wildcard(WildcardBound::Unbounded) => true,
        Type::Wildcard(WildcardBound::Extends(bound)) => {
            is_subtype(env, &arg.upper_bound(), bound)
        }
        Type::Wildcard(WildcardBound::Super(bound)) => match arg {
            Type::Wildcard(WildcardBound::Super(arg_bound)) => is_subtype(env, bound, arg_bound),
            Type::Wildcard(_) => false,
            _ => is_subtype(env, bound, arg),
        },
        _ => arg == formal || arg.is_unknown() || formal.is_unknown(),
    }
}

/// Assignment compatibility, including boxing and unboxing.
pub fn is_assignable(env: &dyn TypeEnv, from: &Type, to: &Type) -> bool {
    if is_subtype(env, from, to) {
        return true;
    }
    match (from, to) {
        (Type::Primitive(_), _) if to.is_reference() => is_subtype(env, &from.boxed(), to),
        (_, Type::Primitive(target)) => match from.unboxed() {
            Type::Primitive(source) => source == *target || source.widens_to(*target),
            _ => false,
        },
        _ => false,
    }
}

/// `true` if `(to) expr` is legal for an expression of type `from`.
pub fn is_castable(env: &dyn TypeEnv, from: &Type, to: &Type) -> bool {
    if from.is_unknown() || to.is_unknown() {
        return true;
    }
    match (from, to) {
        (Type::Void, _) | (_, Type::Void) => false,
        (Type::Primitive(a), Type::Primitive(b)) => {
            a == b || (a.is_numeric() && b.is_numeric())
        }
        (Type::Primitive(_), _) => is_subtype(env, &from.boxed(), to),
        (_, Type::Primitive(target)) => match from.unboxed() {
            Type::Primitive(source) => source == *target || source.widens_to(*target),
            _ => {
                from.class_name() == Some(OBJECT)
                    || (from.class_name() == Some("java.lang.Number") && target.is_numeric())
            }
        },
        (Type::Null, _) => true,
        _ => {
            if is_subtype(env, from, to) || is_subtype(env, to, from) {
                return true;
            }
            let from_erasure = from.erasure();
            let to_erasure = to.erasure();
            if is_subtype(env, &from_erasure, &to_erasure)
                || is_subtype(env, &to_erasure, &from_erasure)
            {
                return true;
            }
            // An interface can be cast to any non-final class and vice versa.
            let interface = |ty: &Type| {
                ty.class_name()
                    .and_then(|n| env.class(n))
                    .is_some_and(|c| c.is_interface())
            };
            let final_class = |ty: &Type| {
                ty.class_name()
                    .and_then(|n| env.class(n))
                    .is_some_and(|c| c.is_final && !c.is_interface())
            };
            (interface(from) && !final_class(to)) || (interface(to) && !final_class(from))
        }
    }
}

/// Throwable but neither a `RuntimeException` nor an `Error`.
pub fn is_checked_exception(env: &dyn TypeEnv, ty: &Type) -> bool {
    let Some(name) = ty.class_name() else {
        return false;
    };
    if env.class(name).is_none() {
        return false;
    }
    let is = |target: &str| instantiate_as_supertype(env, ty, target).is_some();
    is(THROWABLE) && !is(RUNTIME_EXCEPTION) && !is(ERROR)
}

pub fn is_auto_closeable(env: &dyn TypeEnv, ty: &Type) -> bool {
    instantiate_as_supertype(env, ty, AUTO_CLOSEABLE).is_some()
}
