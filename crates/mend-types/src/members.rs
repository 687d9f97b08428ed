//! Supertype traversal and member lookup with generic substitution.

use std::collections::{HashMap, HashSet, VecDeque};

use crate::env::{ClassDef, FieldDef, MethodDef, TypeEnv};
use crate::subtyping::is_assignable;
use crate::ty::{Type, WildcardBound, OBJECT};

pub type Substitution = HashMap<String, Type>;

/// Replace type variables bound in `subst`.
pub fn substitute(ty: &Type, subst: &Substitution) -> Type {
    if subst.is_empty() {
        return ty.clone();
    }
    match ty {
        Type::TypeVar(name) => subst.get(name).cloned().unwrap_or_else(|| ty.clone()),
        Type::Class(class) => Type::class(
            class.name.clone(),
            class.args.iter().map(|a| substitute(a, subst)).collect(),
        ),
        Type::Array(elem) => Type::array_of(substitute(elem, subst)),
        Type::Wildcard(WildcardBound::Extends(b)) => {
            Type::Wildcard(WildcardBound::Extends(Box::new(substitute(b, subst))))
        }
        Type::Wildcard(WildcardBound::Super(b)) => {
            Type::Wildcard(WildcardBound::Super(Box::new(substitute(b, subst))))
        }
        other => other.clone(),
    }
}

/// The substitution a parameterized class type induces on its declaration's type
/// parameters. Raw references erase every parameter to `Object`.
pub fn class_substitution(class: &ClassDef, ty: &Type) -> Substitution {
    let args = ty.type_args();
    class
        .type_params
        .iter()
        .enumerate()
        .map(|(idx, tp)| {
            let arg = match args.get(idx) {
                Some(arg) => arg.clone(),
                None => tp
                    .bounds
                    .first()
                    .map(Type::erasure)
                    .unwrap_or_else(Type::object),
            };
            (tp.name.clone(), arg)
        })
        .collect()
}

/// The direct supertypes of `ty`, parameterized as seen from `ty`.
pub fn direct_supertypes(env: &dyn TypeEnv, ty: &Type) -> Vec<Type> {
    match ty {
        Type::Class(class_ty) => {
            let Some(class) = env.class(&class_ty.name) else {
                return Vec::new();
            };
            // Supertypes of a raw type are erased.
            let raw = class_ty.args.is_empty() && !class.type_params.is_empty();
            let subst = class_substitution(class, ty);
            let lift = |t: &Type| if raw { t.erasure() } else { substitute(t, &subst) };
            let mut out = Vec::new();
            if let Some(super_class) = &class.super_class {
                out.push(lift(super_class));
            }
            out.extend(class.interfaces.iter().map(lift));
            if class.is_interface() && class.super_class.is_none() {
                out.push(Type::object());
            }
            out
        }
        Type::Array(_) => vec![
            Type::object(),
            Type::class("java.lang.Cloneable", Vec::new()),
            Type::class("java.io.Serializable", Vec::new()),
        ],
        Type::Wildcard(WildcardBound::Extends(bound)) => vec![(**bound).clone()],
        Type::TypeVar(_) | Type::Wildcard(_) => vec![Type::object()],
        _ => Vec::new(),
    }
}

/// `ty` and all its supertypes in breadth-first order, each class visited once.
pub fn supertypes(env: &dyn TypeEnv, ty: &Type) -> Vec<Type> {
    let mut out = Vec::new();
    let mut seen = HashSet::new();
    let mut queue = VecDeque::from([ty.clone()]);
    while let Some(current) = queue.pop_front() {
        let key = match current.class_name() {
            Some(name) => name.to_string(),
            None => current.to_string(),
        };
        if !seen.insert(key) {
            continue;
        }
        queue.extend(direct_supertypes(env, &current));
        out.push(current);
    }
    out
}

/// View `ty` as an instance of the class `target`, e.g. `ArrayList<String>` as
/// `Collection<String>`.
pub fn instantiate_as_supertype(env: &dyn TypeEnv, ty: &Type, target: &str) -> Option<Type> {
    supertypes(env, ty)
        .into_iter()
        .find(|t| t.class_name() == Some(target))
}

/// `true` if the class `sub` is `sup` or inherits from it.
pub fn is_subclass(env: &dyn TypeEnv, sub: &str, sup: &str) -> bool {
    sub == sup
        || sup == OBJECT
        || instantiate_as_supertype(env, &Type::class(sub, Vec::new()), sup).is_some()
}

/// A method as a member of a particular (parameterized) type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedMethod<'a> {
    pub declaring: &'a ClassDef,
    pub method: &'a MethodDef,
    /// Parameter types with the receiver's type arguments substituted.
    pub params: Vec<Type>,
    pub return_type: Type,
    pub throws: Vec<Type>,
}

impl ResolvedMethod<'_> {
    pub fn name(&self) -> &str {
        &self.method.name
    }

    pub fn is_static(&self) -> bool {
        self.method.is_static
    }

    /// `true` if `count` arguments can be passed, taking varargs into account.
    pub fn accepts_arity(&self, count: usize) -> bool {
        if self.method.varargs {
            count + 1 >= self.params.len()
        } else {
            count == self.params.len()
        }
    }

    /// `true` if arguments of the given types are applicable (boxing and varargs
    /// allowed).
    pub fn is_applicable(&self, env: &dyn TypeEnv, args: &[Type]) -> bool {
        if !self.accepts_arity(args.len()) {
            return false;
        }
        let inferred = self.infer(args);
        let params: Vec<Type> = self
            .params
            .iter()
            .map(|p| erase_method_vars(&substitute(p, &inferred), self.method))
            .collect();
        if args.len() == params.len()
            && args
                .iter()
                .zip(&params)
                .all(|(a, p)| is_assignable(env, a, &capture_param(p)))
        {
            return true;
        }
        if !self.method.varargs {
            return false;
        }
        let fixed = params.len() - 1;
        let Some(elem) = params.last().and_then(Type::element_type) else {
            return false;
        };
        args[..fixed]
            .iter()
            .zip(&params[..fixed])
            .all(|(a, p)| is_assignable(env, a, &capture_param(p)))
            && args[fixed..].iter().all(|a| is_assignable(env, a, elem))
    }

    /// Infer the method's own type arguments from the argument types.
    pub fn infer(&self, args: &[Type]) -> Substitution {
        infer_method_type_args(self.method, &self.params, args)
    }

    /// The return type for a call with `args`, wildcards captured to their bounds.
    pub fn return_type_for(&self, args: &[Type]) -> Type {
        let inferred = self.infer(args);
        let ty = erase_method_vars(&substitute(&self.return_type, &inferred), self.method);
        capture_return(&ty)
    }
}

/// The type a read of a wildcard-typed value produces.
pub fn capture_return(ty: &Type) -> Type {
    match ty {
        Type::Wildcard(WildcardBound::Extends(b)) => capture_return(b),
        Type::Wildcard(_) => Type::object(),
        other => other.clone(),
    }
}

/// The type a wildcard-typed parameter accepts.
pub fn capture_param(ty: &Type) -> Type {
    match ty {
        Type::Wildcard(WildcardBound::Super(b)) => (**b).clone(),
        other => other.clone(),
    }
}

fn erase_method_vars(ty: &Type, method: &MethodDef) -> Type {
    if method.type_params.is_empty() {
        return ty.clone();
    }
    let subst: Substitution = method
        .type_params
        .iter()
        .map(|tp| {
            let bound = tp.bounds.first().cloned().unwrap_or_else(Type::object);
            (tp.name.clone(), bound)
        })
        .collect();
    substitute(ty, &subst)
}

/// Bind the method's type parameters by matching `params` against `args`. The first
/// binding wins; primitives bind as their box.
pub fn infer_method_type_args(method: &MethodDef, params: &[Type], args: &[Type]) -> Substitution {
    let vars: Vec<&str> = method.type_params.iter().map(|tp| tp.name.as_str()).collect();
    let mut subst = Substitution::new();
    if vars.is_empty() {
        return subst;
    }
    for (idx, arg) in args.iter().enumerate() {
        let param = match params.get(idx) {
            Some(p)
                if method.varargs
                    && idx + 1 == params.len()
                    && !matches!(arg, Type::Array(_) | Type::Null) =>
            {
                p.element_type().cloned().unwrap_or_else(|| p.clone())
            }
            Some(p) => p.clone(),
            None if method.varargs => match params.last().and_then(Type::element_type) {
                Some(elem) => elem.clone(),
                None => continue,
            },
            None => continue,
        };
        unify(&param, arg, &vars, &mut subst);
    }
    subst
}

fn unify(param: &Type, arg: &Type, vars: &[&str], subst: &mut Substitution) {
    match (param, arg) {
        (Type::TypeVar(name), _) if vars.contains(&name.as_str()) => {
            if !matches!(arg, Type::Null | Type::Unknown) && !subst.contains_key(name) {
                subst.insert(name.clone(), arg.boxed());
            }
        }
        (Type::Array(p), Type::Array(a)) => unify(p, a, vars, subst),
        (Type::Class(p), Type::Class(a)) if p.name == a.name => {
            for (pa, aa) in p.args.iter().zip(&a.args) {
                unify(pa, aa, vars, subst);
            }
        }
        (Type::Wildcard(WildcardBound::Extends(b) | WildcardBound::Super(b)), _) => {
            unify(b, &capture_return(arg), vars, subst)
        }
        _ => {}
    }
}

fn same_signature(a: &[Type], b: &[Type]) -> bool {
    a.len() == b.len()
        && a
            .iter()
            .zip(b)
            .all(|(x, y)| x.erasure() == y.erasure())
}

/// Methods named `name` that are members of `ty`, most derived first. Inherited
/// methods overridden in a subtype are omitted.
pub fn methods_named<'e>(env: &'e dyn TypeEnv, ty: &Type, name: &str) -> Vec<ResolvedMethod<'e>> {
    collect_methods(env, ty, Some(name))
}

/// Every method member of `ty`, most derived first.
pub fn all_methods<'e>(env: &'e dyn TypeEnv, ty: &Type) -> Vec<ResolvedMethod<'e>> {
    collect_methods(env, ty, None)
}

fn collect_methods<'e>(
    env: &'e dyn TypeEnv,
    ty: &Type,
    name: Option<&str>,
) -> Vec<ResolvedMethod<'e>> {
    let mut out: Vec<ResolvedMethod<'e>> = Vec::new();
    for super_ty in supertypes(env, ty) {
        let Some(class_name) = super_ty.class_name() else {
            continue;
        };
        let Some(class) = env.class(class_name) else {
            continue;
        };
        let subst = class_substitution(class, &super_ty);
        for method in class.methods.iter().filter(|m| !m.is_constructor) {
            if name.is_some_and(|n| n != method.name) {
                continue;
            }
            let params: Vec<Type> = method.params.iter().map(|p| substitute(p, &subst)).collect();
            let overridden = out
                .iter()
                .any(|m| m.method.name == method.name && same_signature(&m.params, &params));
            if overridden {
                continue;
            }
            out.push(ResolvedMethod {
                declaring: class,
                method,
                params,
                return_type: substitute(&method.return_type, &subst),
                throws: method.throws.iter().map(|t| substitute(t, &subst)).collect(),
            });
        }
    }
    out
}

/// Constructors of the class `ty` names, with its type arguments substituted.
pub fn constructors<'e>(env: &'e dyn TypeEnv, ty: &Type) -> Vec<ResolvedMethod<'e>> {
    let Some(class) = ty.class_name().and_then(|n| env.class(n)) else {
        return Vec::new();
    };
    let subst = class_substitution(class, ty);
    class
        .constructors()
        .map(|method| ResolvedMethod {
            declaring: class,
            method,
            params: method.params.iter().map(|p| substitute(p, &subst)).collect(),
            return_type: Type::Void,
            throws: method.throws.iter().map(|t| substitute(t, &subst)).collect(),
        })
        .collect()
}

/// A field as a member of a particular type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedField<'a> {
    pub declaring: &'a ClassDef,
    pub field: &'a FieldDef,
    pub ty: Type,
}

/// Look up a field member of `ty` by name, searching supertypes.
pub fn field<'e>(env: &'e dyn TypeEnv, ty: &Type, name: &str) -> Option<ResolvedField<'e>> {
    all_fields(env, ty).into_iter().find(|f| f.field.name == name)
}

/// Every field member of `ty`, most derived first; hidden fields are omitted.
pub fn all_fields<'e>(env: &'e dyn TypeEnv, ty: &Type) -> Vec<ResolvedField<'e>> {
    let mut out: Vec<ResolvedField<'e>> = Vec::new();
    for super_ty in supertypes(env, ty) {
        let Some(class) = super_ty.class_name().and_then(|n| env.class(n)) else {
            continue;
        };
        let subst = class_substitution(class, &super_ty);
        for field in &class.fields {
            if out.iter().any(|f| f.field.name == field.name) {
                continue;
            }
            out.push(ResolvedField {
                declaring: class,
                field,
                ty: substitute(&field.ty, &subst),
            });
        }
    }
    out
}

/// The type of `receiver.name` for fields, including an array's `length`.
pub fn field_type(env: &dyn TypeEnv, receiver: &Type, name: &str) -> Option<Type> {
    if matches!(receiver, Type::Array(_)) && name == "length" {
        return Some(Type::Primitive(crate::ty::PrimitiveType::Int));
    }
    field(env, receiver, name).map(|f| capture_return(&f.ty))
}

/// Methods of supertypes of `class` that `method` overrides, nearest first.
pub fn overridden_methods<'e>(
    env: &'e dyn TypeEnv,
    class: &ClassDef,
    method: &'e MethodDef,
) -> Vec<ResolvedMethod<'e>> {
    if method.is_constructor || method.is_static {
        return Vec::new();
    }
    let this = class.this_type();
    let mut out = Vec::new();
    for super_ty in supertypes(env, &this).into_iter().skip(1) {
        let Some(super_class) = super_ty.class_name().and_then(|n| env.class(n)) else {
            continue;
        };
        let subst = class_substitution(super_class, &super_ty);
        for candidate in super_class.methods_named(&method.name) {
            if candidate.is_static || candidate.visibility == crate::env::Visibility::Private {
                continue;
            }
            let params: Vec<Type> =
                candidate.params.iter().map(|p| substitute(p, &subst)).collect();
            if same_signature(&params, &method.params) {
                out.push(ResolvedMethod {
                    declaring: super_class,
                    method: candidate,
                    params,
                    return_type: substitute(&candidate.return_type, &subst),
                    throws: candidate.throws.iter().map(|t| substitute(t, &subst)).collect(),
                });
            }
        }
    }
    out
}
