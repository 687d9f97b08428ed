//! Expression typing at a point in a compilation unit.
//!
//! The typer answers "what is the static type of this expression" and "what type does
//! this position expect" well enough to build corrections. It never fails: anything it
//! cannot work out is `Type::Unknown`, which the subtyping rules treat as compatible
//! with everything.

use mend_syntax::ast::{BinaryOp, CallExpr, Expr, LiteralKind, NewExpr, Resource, Stmt, TypeRef};
use mend_syntax::visit::NodeRef;
use mend_types::members::{capture_return, direct_supertypes};
use mend_types::{
    all_methods, constructors, field, field_type, methods_named, PrimitiveType, ResolvedField,
    ResolvedMethod, Type, TypeEnv, TypeScope, WildcardBound,
};

use crate::context::{BodyDecl, NodePath};
use crate::scope::{find_local, visible_locals, LocalVar};
use crate::workspace::{SourceFile, Workspace};

/// What a qualifier expression denotes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Receiver {
    Value(Type),
    /// A type name used for static access.
    Type(String),
}

pub struct Typer<'a> {
    env: &'a dyn TypeEnv,
    file: &'a SourceFile,
    path: NodePath<'a>,
    scope: TypeScope<'a>,
    locals: Vec<LocalVar<'a>>,
    /// Types whose members are in scope unqualified, innermost first.
    enclosing: Vec<Type>,
}

impl<'a> Typer<'a> {
    pub fn new(workspace: &'a Workspace, file: &'a SourceFile, path: &NodePath<'a>) -> Self {
        let env = workspace.env();
        let offset = path.last().map_or(0, |node| node.range().start);
        let types = path.types();

        let mut scope = TypeScope::new(env, &file.imports);
        scope.enclosing = types
            .iter()
            .map(|(name, _)| name.clone())
            .filter(|name| env.class(name).is_some())
            .collect();
        for node in path.nodes() {
            match node {
                NodeRef::Type(decl) => scope
                    .type_vars
                    .extend(decl.type_params.iter().map(|tp| tp.name.clone())),
                NodeRef::Method(method) => scope
                    .type_vars
                    .extend(method.type_params.iter().map(|tp| tp.name.clone())),
                _ => {}
            }
        }

        let mut typer = Typer {
            env,
            file,
            path: path.clone(),
            scope,
            locals: visible_locals(path, offset),
            enclosing: Vec::new(),
        };

        let mut enclosing = Vec::new();
        let mut declared = types.into_iter();
        for (idx, node) in path.nodes().iter().enumerate() {
            match node {
                NodeRef::Type(_) => {
                    if let Some((name, _)) = declared.next() {
                        enclosing.push(match env.class(&name) {
                            Some(class) => class.this_type(),
                            None => Type::class(name, Vec::new()),
                        });
                    }
                }
                NodeRef::Expr(Expr::New(new)) if new.body.is_some() => {
                    let into_body = matches!(
                        path.get(idx + 1),
                        Some(
                            NodeRef::Method(_)
                                | NodeRef::Field(_)
                                | NodeRef::Initializer(_)
                                | NodeRef::Type(_)
                        )
                    );
                    if into_body {
                        enclosing.push(typer.lower(&new.ty));
                    }
                }
                _ => {}
            }
        }
        enclosing.reverse();
        typer.enclosing = enclosing;
        typer
    }

    pub fn env(&self) -> &'a dyn TypeEnv {
        self.env
    }

    pub fn file(&self) -> &'a SourceFile {
        self.file
    }

    pub fn path(&self) -> &NodePath<'a> {
        &self.path
    }

    pub fn locals(&self) -> &[LocalVar<'a>] {
        &self.locals
    }

    pub fn local(&self, name: &str) -> Option<&LocalVar<'a>> {
        find_local(&self.locals, name)
    }

    /// Types whose members are accessible without qualification, innermost first.
    pub fn enclosing_types(&self) -> &[Type] {
        &self.enclosing
    }

    pub fn this_type(&self) -> Option<&Type> {
        self.enclosing.first()
    }

    pub fn type_vars(&self) -> &[String] {
        &self.scope.type_vars
    }

    pub fn resolve_type_name(&self, name: &str) -> Option<String> {
        self.scope.resolve_name(name)
    }

    pub fn lower(&self, ty: &TypeRef) -> Type {
        self.lower_text(&ty.text)
    }

    /// Lower type syntax in this scope. A diamond lowers to the raw type.
    pub fn lower_text(&self, text: &str) -> Type {
        self.scope.lower(&text.replace("<>", ""))
    }

    pub fn local_type(&self, local: &LocalVar<'_>) -> Type {
        let Some(ty) = local.ty else {
            return Type::Unknown;
        };
        let mut out = self.lower(ty);
        for _ in 0..local.dims {
            out = Type::array_of(out);
        }
        out
    }

    /// A field visible by its simple name: members of the enclosing types, then static
    /// imports.
    pub fn visible_field(&self, name: &str) -> Option<ResolvedField<'a>> {
        for ty in &self.enclosing {
            if let Some(found) = field(self.env, ty, name) {
                return Some(found);
            }
        }
        for import in &self.file.imports.static_single {
            if let Some((owner, member)) = import.rsplit_once('.') {
                if member == name {
                    if let Some(found) = field(self.env, &Type::class(owner, Vec::new()), name) {
                        return Some(found);
                    }
                }
            }
        }
        self.file.imports.static_on_demand.iter().find_map(|owner| {
            field(self.env, &Type::class(owner.clone(), Vec::new()), name)
                .filter(|f| f.field.is_static)
        })
    }

    /// Type of a simple name used as a value.
    pub fn name_type(&self, name: &str) -> Option<Type> {
        if let Some(local) = self.local(name) {
            return Some(self.local_type(local));
        }
        self.visible_field(name).map(|f| capture_return(&f.ty))
    }

    pub fn arg_types(&self, args: &[Expr]) -> Vec<Type> {
        args.iter().map(|arg| self.type_of(arg)).collect()
    }

    pub fn type_of(&self, expr: &Expr) -> Type {
        match expr {
            Expr::Name(name) => self.name_type(&name.name).unwrap_or(Type::Unknown),
            Expr::Literal(lit) => literal_type(lit.kind),
            Expr::Call(call) => match self.resolve_call(call) {
                Some(method) => {
                    let ty = method.return_type_for(&self.arg_types(&call.args));
                    if self.is_raw_receiver(call) {
                        ty.erasure()
                    } else {
                        ty
                    }
                }
                None => Type::Unknown,
            },
            Expr::FieldAccess(access) => match self.resolve_receiver(&access.receiver) {
                Some(Receiver::Value(ty)) => {
                    field_type(self.env, &ty.upper_bound(), &access.name).unwrap_or(Type::Unknown)
                }
                Some(Receiver::Type(owner)) => {
                    field_type(self.env, &Type::class(owner, Vec::new()), &access.name)
                        .unwrap_or(Type::Unknown)
                }
                None => Type::Unknown,
            },
            Expr::New(new) => self.lower(&new.ty),
            Expr::NewArray(array) => {
                let mut ty = self.lower(&array.elem_ty);
                for _ in &array.dims {
                    ty = Type::array_of(ty);
                }
                ty
            }
            Expr::ArrayInit(_) | Expr::Lambda(_) | Expr::MethodRef(_) | Expr::Missing(_) => {
                Type::Unknown
            }
            Expr::Cast(cast) => self.lower(&cast.ty),
            Expr::Paren(paren) => self.type_of(&paren.inner),
            Expr::Assign(assign) => self.type_of(&assign.lhs),
            Expr::Binary(bin) => self.binary_type(bin.op, &bin.lhs, &bin.rhs),
            Expr::Unary(unary) => {
                let operand = self.type_of(&unary.operand);
                if unary.op == "!" {
                    return Type::Primitive(PrimitiveType::Boolean);
                }
                if matches!(unary.op.as_str(), "++" | "--") {
                    return operand;
                }
                match operand.unboxed().primitive() {
                    Some(p) if p.is_numeric() => Type::Primitive(p.promote(PrimitiveType::Int)),
                    _ => Type::Unknown,
                }
            }
            Expr::Conditional(cond) => {
                let then_ty = self.type_of(&cond.then_expr);
                let else_ty = self.type_of(&cond.else_expr);
                conditional_type(self.env, then_ty, else_ty)
            }
            Expr::InstanceOf(_) => Type::Primitive(PrimitiveType::Boolean),
            Expr::This(_) => self.this_type().cloned().unwrap_or(Type::Unknown),
            Expr::Super(_) => self.super_type().unwrap_or(Type::Unknown),
            Expr::ArrayAccess(access) => match self.type_of(&access.array) {
                Type::Array(elem) => *elem,
                _ => Type::Unknown,
            },
            Expr::ClassLit(lit) => {
                let target = self.lower(&lit.ty).boxed();
                Type::class("java.lang.Class", vec![target])
            }
        }
    }

    /// Members of a raw type are seen erased.
    fn is_raw_receiver(&self, call: &CallExpr) -> bool {
        let Some(receiver) = &call.receiver else {
            return false;
        };
        let Some(Receiver::Value(ty)) = self.resolve_receiver(receiver) else {
            return false;
        };
        ty.type_args().is_empty()
            && ty
                .class_name()
                .and_then(|name| self.env.class(name))
                .is_some_and(|class| !class.type_params.is_empty())
    }

    /// The superclass of the innermost enclosing type.
    pub fn super_type(&self) -> Option<Type> {
        let this = self.this_type()?;
        direct_supertypes(self.env, this).into_iter().next()
    }

    fn binary_type(&self, op: BinaryOp, lhs: &Expr, rhs: &Expr) -> Type {
        if op.is_logical() || op.is_comparison() {
            return Type::Primitive(PrimitiveType::Boolean);
        }
        let lhs = self.type_of(lhs);
        let rhs = self.type_of(rhs);
        if op == BinaryOp::Add && (lhs.is_string() || rhs.is_string()) {
            return Type::string();
        }
        match (lhs.unboxed().primitive(), rhs.unboxed().primitive()) {
            (Some(PrimitiveType::Boolean), Some(PrimitiveType::Boolean))
                if matches!(op, BinaryOp::And | BinaryOp::Or | BinaryOp::Xor) =>
            {
                Type::Primitive(PrimitiveType::Boolean)
            }
            (Some(l), Some(_)) if matches!(op, BinaryOp::Shl | BinaryOp::Shr | BinaryOp::UShr) => {
                Type::Primitive(l.promote(PrimitiveType::Int))
            }
            (Some(l), Some(r)) if l.is_numeric() && r.is_numeric() => Type::Primitive(l.promote(r)),
            _ => Type::Unknown,
        }
    }

    /// Classify a qualifier: a value of some type, or a type name for static access.
    pub fn resolve_receiver(&self, expr: &Expr) -> Option<Receiver> {
        match expr {
            Expr::Name(name) => {
                if let Some(ty) = self.name_type(&name.name) {
                    return Some(Receiver::Value(ty));
                }
                self.resolve_type_name(&name.name).map(Receiver::Type)
            }
            Expr::FieldAccess(access) => {
                if let Some(Receiver::Type(owner)) = self.resolve_receiver(&access.receiver) {
                    let member = format!("{owner}.{}", access.name);
                    if self.env.class(&member).is_some() {
                        return Some(Receiver::Type(member));
                    }
                }
                if let Some(dotted) = dotted_name(expr) {
                    if self.env.class(&dotted).is_some()
                        && self.name_type(first_segment(&dotted)).is_none()
                    {
                        return Some(Receiver::Type(dotted));
                    }
                }
                Some(Receiver::Value(self.type_of(expr)))
            }
            Expr::Paren(paren) => self.resolve_receiver(&paren.inner),
            _ => Some(Receiver::Value(self.type_of(expr))),
        }
    }

    /// Methods named like the invocation that are members of its receiver, or of the
    /// innermost enclosing type that has any for an unqualified call.
    pub fn candidates(&self, call: &CallExpr) -> Vec<ResolvedMethod<'a>> {
        if call.is_constructor_call() {
            let target = if call.name == "super" {
                self.super_type()
            } else {
                self.this_type().cloned()
            };
            return target.map_or_else(Vec::new, |ty| constructors(self.env, &ty));
        }
        match &call.receiver {
            Some(receiver) => match self.resolve_receiver(receiver) {
                Some(Receiver::Value(ty)) => {
                    methods_named(self.env, &receiver_bound(&ty), &call.name)
                }
                Some(Receiver::Type(owner)) => {
                    methods_named(self.env, &Type::class(owner, Vec::new()), &call.name)
                }
                None => Vec::new(),
            },
            None => {
                for ty in &self.enclosing {
                    let found = methods_named(self.env, ty, &call.name);
                    if !found.is_empty() {
                        return found;
                    }
                }
                self.static_import_candidates(&call.name)
            }
        }
    }

    /// Every method an invocation could name: members of its receiver, or of all
    /// enclosing types for an unqualified call.
    pub fn visible_methods(&self, call: &CallExpr) -> Vec<ResolvedMethod<'a>> {
        match &call.receiver {
            Some(receiver) => match self.resolve_receiver(receiver) {
                Some(Receiver::Value(ty)) => all_methods(self.env, &receiver_bound(&ty)),
                Some(Receiver::Type(owner)) => {
                    all_methods(self.env, &Type::class(owner, Vec::new()))
                }
                None => Vec::new(),
            },
            None => self
                .enclosing
                .iter()
                .flat_map(|ty| all_methods(self.env, ty))
                .collect(),
        }
    }

    fn static_import_candidates(&self, name: &str) -> Vec<ResolvedMethod<'a>> {
        let imports = &self.file.imports;
        let owners = imports
            .static_single
            .iter()
            .filter_map(|import| import.rsplit_once('.'))
            .filter(|(_, member)| *member == name)
            .map(|(owner, _)| owner.to_string())
            .chain(imports.static_on_demand.iter().cloned());
        let mut out = Vec::new();
        for owner in owners {
            out.extend(
                methods_named(self.env, &Type::class(owner, Vec::new()), name)
                    .into_iter()
                    .filter(ResolvedMethod::is_static),
            );
        }
        out
    }

    /// The method an invocation binds to: the first applicable candidate.
    pub fn resolve_call(&self, call: &CallExpr) -> Option<ResolvedMethod<'a>> {
        let args = self.arg_types(&call.args);
        self.candidates(call)
            .into_iter()
            .find(|m| m.is_applicable(self.env, &args))
    }

    pub fn constructor_candidates(&self, new: &NewExpr) -> Vec<ResolvedMethod<'a>> {
        constructors(self.env, &self.lower(&new.ty))
    }

    pub fn resolve_new(&self, new: &NewExpr) -> Option<ResolvedMethod<'a>> {
        let args = self.arg_types(&new.args);
        self.constructor_candidates(new)
            .into_iter()
            .find(|m| m.is_applicable(self.env, &args))
    }

    /// Declared return type of the innermost method, `None` in lambdas and initializers.
    pub fn method_return_type(&self) -> Option<Type> {
        match self.path.body_decl()? {
            BodyDecl::Method(method) => Some(match &method.return_ty {
                Some(ty) => self.lower(ty),
                None => Type::Void,
            }),
            _ => None,
        }
    }

    /// The type the position of the path node at `idx` expects. `Type::Void` means a
    /// statement position where any value is discarded.
    pub fn expected_type(&self, idx: usize) -> Option<Type> {
        let node = self.path.get(idx)?;
        let range = node.range();
        let parent = self.path.parent(idx)?;
        let boolean = || Some(Type::Primitive(PrimitiveType::Boolean));
        match parent {
            NodeRef::Declarator(decl) => {
                let decl_ty = match self.path.parent(idx - 1)? {
                    NodeRef::Field(field) => self.lower(&field.ty),
                    NodeRef::Stmt(Stmt::LocalVar(local)) => self.lower(&local.ty),
                    NodeRef::Resource(Resource::Decl(local)) => self.lower(&local.ty),
                    _ => return None,
                };
                let mut ty = decl_ty;
                for _ in 0..decl.dims {
                    ty = Type::array_of(ty);
                }
                Some(ty)
            }
            NodeRef::Expr(Expr::Assign(assign)) if assign.rhs.range() == range => {
                Some(self.type_of(&assign.lhs))
            }
            NodeRef::Stmt(Stmt::Return(_)) => self.method_return_type(),
            NodeRef::Stmt(Stmt::Expr(_)) => Some(Type::Void),
            NodeRef::Stmt(Stmt::If(s)) if s.cond.range() == range => boolean(),
            NodeRef::Stmt(Stmt::While(s)) if s.cond.range() == range => boolean(),
            NodeRef::Stmt(Stmt::Do(s)) if s.cond.range() == range => boolean(),
            NodeRef::Stmt(Stmt::For(s)) if s.cond.as_ref().is_some_and(|c| c.range() == range) => {
                boolean()
            }
            NodeRef::Expr(Expr::Conditional(cond)) if cond.cond.range() == range => boolean(),
            NodeRef::Expr(Expr::Conditional(_)) | NodeRef::Expr(Expr::Paren(_)) => {
                self.expected_type(idx - 1)
            }
            NodeRef::Expr(Expr::Binary(bin)) if bin.op.is_logical() => boolean(),
            NodeRef::Expr(Expr::Binary(bin))
                if matches!(bin.op, BinaryOp::EqEq | BinaryOp::NotEq) =>
            {
                Some(Type::object())
            }
            NodeRef::Expr(Expr::Unary(unary)) if unary.op == "!" => boolean(),
            NodeRef::Expr(Expr::ArrayAccess(access)) if access.index.range() == range => {
                Some(Type::Primitive(PrimitiveType::Int))
            }
            NodeRef::Expr(Expr::Call(call)) => {
                let arg_idx = call.args.iter().position(|a| a.range() == range)?;
                let method = self.resolve_call(call)?;
                Some(expected_param(&method, arg_idx))
            }
            NodeRef::Expr(Expr::New(new)) => {
                let arg_idx = new.args.iter().position(|a| a.range() == range)?;
                let method = self.resolve_new(new)?;
                Some(expected_param(&method, arg_idx))
            }
            NodeRef::Expr(Expr::NewArray(array)) if array.init.is_some() => {
                let mut ty = self.lower(&array.elem_ty);
                for _ in 1..array.dims.len() {
                    ty = Type::array_of(ty);
                }
                Some(ty)
            }
            _ => None,
        }
    }
}

/// The type an argument at `idx` must have for `method`.
fn expected_param(method: &ResolvedMethod<'_>, idx: usize) -> Type {
    let param = match method.params.get(idx) {
        Some(p) if method.method.varargs && idx + 1 == method.params.len() => {
            p.element_type().cloned().unwrap_or_else(|| p.clone())
        }
        Some(p) => p.clone(),
        None => match method.params.last().and_then(Type::element_type) {
            Some(elem) if method.method.varargs => elem.clone(),
            _ => return Type::Unknown,
        },
    };
    match param {
        Type::Wildcard(WildcardBound::Super(bound)) => *bound,
        Type::Wildcard(_) => Type::object(),
        other => other,
    }
}

/// The type whose members a receiver of type `ty` exposes.
fn receiver_bound(ty: &Type) -> Type {
    match ty {
        Type::Wildcard(_) => receiver_bound(&ty.upper_bound()),
        Type::TypeVar(_) => Type::object(),
        Type::Primitive(_) => ty.boxed(),
        other => other.clone(),
    }
}

fn literal_type(kind: LiteralKind) -> Type {
    match kind {
        LiteralKind::Int => Type::Primitive(PrimitiveType::Int),
        LiteralKind::Long => Type::Primitive(PrimitiveType::Long),
        LiteralKind::Float => Type::Primitive(PrimitiveType::Float),
        LiteralKind::Double => Type::Primitive(PrimitiveType::Double),
        LiteralKind::Char => Type::Primitive(PrimitiveType::Char),
        LiteralKind::Bool => Type::Primitive(PrimitiveType::Boolean),
        LiteralKind::String => Type::string(),
        LiteralKind::Null => Type::Null,
    }
}

fn conditional_type(env: &dyn TypeEnv, then_ty: Type, else_ty: Type) -> Type {
    if then_ty == else_ty {
        return then_ty;
    }
    match (&then_ty, &else_ty) {
        (Type::Null, other) | (other, Type::Null) => return other.boxed(),
        _ => {}
    }
    if let (Some(a), Some(b)) = (then_ty.unboxed().primitive(), else_ty.unboxed().primitive()) {
        if a.is_numeric() && b.is_numeric() {
            return Type::Primitive(a.promote(b));
        }
    }
    if mend_types::is_assignable(env, &else_ty, &then_ty) {
        then_ty
    } else if mend_types::is_assignable(env, &then_ty, &else_ty) {
        else_ty
    } else {
        Type::object()
    }
}

/// `a.b.c` for a chain of simple names.
pub fn dotted_name(expr: &Expr) -> Option<String> {
    match expr {
        Expr::Name(name) => Some(name.name.clone()),
        Expr::FieldAccess(access) => {
            dotted_name(&access.receiver).map(|receiver| format!("{receiver}.{}", access.name))
        }
        _ => None,
    }
}

fn first_segment(dotted: &str) -> &str {
    dotted.split('.').next().unwrap_or(dotted)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::CorrectionContext;
    use mend_config::CorrectionConfig;
    use mend_core::{FileId, Span};

    const SOURCE: &str = "package p;\nimport java.util.*;\npublic class E {\n    private List<String> names;\n    int count;\n    String label(int x) { return null; }\n    void f(Vector<Integer> vec, long big) {\n        int i = vec.get(0) + 1;\n        boolean b = big > i && names.isEmpty();\n        String s = \"a\" + i;\n        Object o = label(i).length();\n        names.add(s);\n    }\n}\n";

    fn with_typer(needle: &str, f: impl FnOnce(&Typer<'_>, &Expr)) {
        let workspace = Workspace::new([("p/E.java", SOURCE)]);
        let file = workspace.file(&FileId::new("p/E.java")).expect("file");
        let config = CorrectionConfig::default();
        let ctx = CorrectionContext::new(&workspace, file, &[], Span::empty(0), &config);
        let start = SOURCE.find(needle).expect("needle");
        let span = Span::new(start, start + needle.len());
        let path = ctx.path(span);
        let (_, expr) = path.expr_at(span).expect("expression");
        let typer = ctx.typer(&path);
        f(&typer, expr);
    }

    fn shown(ty: Type) -> String {
        ty.to_string()
    }

    #[test]
    fn types_calls_with_substitution_and_arithmetic() {
        with_typer("vec.get(0)", |typer, expr| {
            assert_eq!(shown(typer.type_of(expr)), "java.lang.Integer");
        });
        with_typer("vec.get(0) + 1", |typer, expr| {
            assert_eq!(shown(typer.type_of(expr)), "int");
        });
        with_typer("\"a\" + i", |typer, expr| {
            assert_eq!(shown(typer.type_of(expr)), "java.lang.String");
        });
        with_typer("big > i && names.isEmpty()", |typer, expr| {
            assert_eq!(shown(typer.type_of(expr)), "boolean");
        });
        with_typer("label(i).length()", |typer, expr| {
            assert_eq!(shown(typer.type_of(expr)), "int");
        });
    }

    #[test]
    fn expected_types_follow_the_enclosing_position() {
        let workspace = Workspace::new([("p/E.java", SOURCE)]);
        let file = workspace.file(&FileId::new("p/E.java")).expect("file");
        let config = CorrectionConfig::default();
        let ctx = CorrectionContext::new(&workspace, file, &[], Span::empty(0), &config);

        let expect_at = |needle: &str| {
            let start = SOURCE.find(needle).expect("needle");
            let span = Span::new(start, start + needle.len());
            let path = ctx.path(span);
            let (idx, _) = path.expr_at(span).expect("expression");
            ctx.typer(&path).expected_type(idx).map(|t| t.to_string())
        };

        assert_eq!(expect_at("vec.get(0) + 1").as_deref(), Some("int"));
        assert_eq!(expect_at("names.isEmpty()").as_deref(), Some("boolean"));
        assert_eq!(expect_at("names.add(s)").as_deref(), Some("void"));
    }
}
