//! Expressions whose type does not fit where they are used.

use mend_core::{text, Diagnostic, Span};
use mend_syntax::ast::{CastExpr, Expr, MethodDecl, Stmt, VarDeclarator};
use mend_syntax::javadoc::Javadoc;
use mend_syntax::visit::NodeRef;
use mend_types::{
    instantiate_as_supertype, is_castable, is_subclass, overridden_methods, parse_type, simple_name,
    ResolvedMethod, Type, TypeEnv, WildcardBound,
};

use super::{method_def, method_label};
use crate::context::{BodyDecl, CorrectionContext, NodePath};
use crate::dispatch::Corrector;
use crate::proposal::RawProposal;
use crate::relevance;
use crate::retype::{push_return_type, push_var_type, variable_of, VarDecl, VarSite};
use crate::typing::{Receiver, Typer};
use crate::workspace::SourceFile;

/// A value of type A where B is expected.
pub struct TypeMismatch;

/// A for-each variable that cannot hold the elements of the iterable.
pub struct ForEachMismatch;

/// An overriding method whose return type clashes with the overridden one.
pub struct IncompatibleReturnType;

/// An overriding method that declares exceptions the overridden one does not.
pub struct IncompatibleThrows;

fn arg_type(diagnostic: &Diagnostic, idx: usize) -> Option<Type> {
    diagnostic
        .arg(idx)
        .and_then(|text| parse_type(text).ok())
        .filter(Type::is_known)
}

/// The variable whose declared type the expression at `idx` is assigned to.
fn assigned_variable<'a>(
    ctx: &CorrectionContext<'a>,
    typer: &Typer<'a>,
    path: &NodePath<'a>,
    idx: usize,
) -> Option<VarSite<'a>> {
    let range = path.get(idx)?.range();
    match path.parent(idx)? {
        NodeRef::Declarator(declarator) => {
            let position = |declarators: &[VarDeclarator]| {
                declarators.iter().position(|d| std::ptr::eq(d, declarator))
            };
            let decl = match path.parent(idx - 1)? {
                NodeRef::Field(field) => VarDecl::Field(field, position(&field.declarators[..])?),
                NodeRef::Stmt(Stmt::LocalVar(stmt)) => {
                    VarDecl::Local(stmt, position(&stmt.declarators[..])?)
                }
                _ => return None,
            };
            Some(VarSite { file: ctx.file, decl })
        }
        NodeRef::Expr(Expr::Assign(assign)) if assign.op == "=" && assign.rhs.range() == range => {
            variable_of(ctx, typer, &assign.lhs)
        }
        _ => None,
    }
}

/// `x` in `(T) x.foo()`: the innermost receiver of the chain the cast applies to that
/// is a value rather than a type name.
fn chain_receiver<'e>(typer: &Typer<'_>, expr: &'e Expr) -> Option<&'e Expr> {
    let receiver = match expr {
        Expr::Call(call) => call.receiver.as_deref()?,
        Expr::FieldAccess(access) => &access.receiver,
        _ => return None,
    };
    chain_receiver(typer, receiver)
        .or_else(|| {
            matches!(typer.resolve_receiver(receiver), Some(Receiver::Value(_))).then_some(receiver)
        })
}

/// "Add parentheses around cast": `(T) x.foo()` becomes `((T) x).foo()`.
pub(crate) fn parenthesize_cast(
    ctx: &CorrectionContext<'_>,
    cast: &CastExpr,
    receiver: &Expr,
) -> RawProposal {
    let source = ctx.text();
    let rest = &source[receiver.range().end..cast.expr.range().end];
    let parenthesized = format!(
        "(({}) {}){rest}",
        cast.ty.range.slice(source),
        receiver.range().slice(source)
    );
    RawProposal::quick_fix("Add parentheses around cast", relevance::ADD_PARENTHESES_AROUND_CAST)
        .replace(ctx.file_id(), cast.range, parenthesized)
}

pub(crate) fn change_var_type<'a>(
    ctx: &CorrectionContext<'a>,
    site: VarSite<'a>,
    ty: &Type,
) -> RawProposal {
    let mut imports = ctx.import_rewrite_for(site.file);
    let text = imports.type_text(ty);
    let mut raw = RawProposal::quick_fix(
        format!("Change type of '{}' to '{}'", site.decl.name(), ty.simple_display()),
        relevance::CHANGE_VARIABLE_TYPE,
    );
    push_var_type(&mut raw, site, &text);
    raw.with_changes(imports.changes())
}

/// "Change return type of '<m>(..)'" for a call to a workspace method.
pub(crate) fn callee_return<'a>(
    ctx: &CorrectionContext<'a>,
    typer: &Typer<'a>,
    expr: &Expr,
    expected: &Type,
) -> Option<RawProposal> {
    let Expr::Call(call) = expr.unparenthesized() else {
        return None;
    };
    let method = typer.resolve_call(call)?;
    if !method.declaring.is_source() {
        return None;
    }
    let (file, _, decl) = ctx.workspace.method_declaration(method.declaring, method.method)?;
    let mut imports = ctx.import_rewrite_for(file);
    let text = imports.type_text(expected);
    let mut raw = RawProposal::quick_fix(
        format!(
            "Change return type of '{}' to '{}'",
            method_label(&call.name),
            expected.simple_display()
        ),
        relevance::CHANGE_RETURN_TYPE,
    );
    push_return_type(&mut raw, file, decl, &text)?;
    Some(raw.with_changes(imports.changes()))
}

impl TypeMismatch {
    fn casts(
        &self,
        ctx: &CorrectionContext<'_>,
        typer: &Typer<'_>,
        expr: &Expr,
        found: &Type,
        expected: &Type,
    ) -> Vec<RawProposal> {
        let env = ctx.env();
        let source = ctx.text();
        let file = ctx.file_id();
        let mut imports = ctx.import_rewrite();
        let ty_text = imports.type_text(expected);

        if let Expr::Cast(cast) = expr.unparenthesized() {
            let mut out = Vec::new();
            if is_castable(env, &typer.type_of(&cast.expr), expected) {
                out.push(
                    RawProposal::quick_fix(
                        format!("Change cast to '{}'", expected.simple_display()),
                        relevance::CHANGE_CAST,
                    )
                    .replace(file, cast.ty.range, ty_text)
                    .with_changes(imports.changes()),
                );
            }
            if let Some(receiver) = chain_receiver(typer, &cast.expr) {
                out.push(parenthesize_cast(ctx, cast, receiver));
            }
            return out;
        }

        if !is_castable(env, found, expected) {
            return Vec::new();
        }
        let label = format!("Add cast to '{}'", expected.simple_display());
        let raw = RawProposal::quick_fix(label, relevance::ADD_CAST);
        let raw = if expr.is_primary() {
            raw.insert(file, expr.range().start, format!("({ty_text}) "))
        } else {
            raw.replace(
                file,
                expr.range(),
                format!("({ty_text}) ({})", expr.range().slice(source)),
            )
        };
        vec![raw.with_changes(imports.changes())]
    }

    fn method_return(
        &self,
        ctx: &CorrectionContext<'_>,
        path: &NodePath<'_>,
        found: &Type,
    ) -> Option<RawProposal> {
        let Some(BodyDecl::Method(method)) = path.body_decl() else {
            return None;
        };
        let ret = method.return_ty.as_ref()?;
        let mut imports = ctx.import_rewrite();
        let text = imports.type_text(found);
        Some(
            RawProposal::quick_fix(
                format!("Change method return type to '{}'", found.simple_display()),
                relevance::CHANGE_RETURN_TYPE,
            )
            .replace(ctx.file_id(), ret.range, text)
            .with_changes(imports.changes()),
        )
    }

    fn let_implement(
        &self,
        ctx: &CorrectionContext<'_>,
        found: &Type,
        expected: &Type,
    ) -> Option<RawProposal> {
        let class = ctx.workspace.class(found.class_name()?)?;
        let interface = ctx.workspace.class(expected.class_name()?)?;
        if !class.is_source() || class.is_interface() || !interface.is_interface() {
            return None;
        }
        let (file, decl) = ctx.workspace.declaration(class)?;
        let mut imports = ctx.import_rewrite_for(file);
        let text = imports.type_text(expected);
        let raw = RawProposal::quick_fix(
            format!(
                "Let '{}' implement '{}'",
                class.simple_name(),
                expected.simple_display()
            ),
            relevance::LET_IMPLEMENT,
        );
        let raw = match decl.implements.last() {
            Some(last) => raw.insert(&file.id, last.range.end, format!(", {text}")),
            None => raw.insert(
                &file.id,
                decl.header_end_before_implements(),
                format!(" implements {text}"),
            ),
        };
        Some(raw.with_changes(imports.changes()))
    }
}

impl Corrector for TypeMismatch {
    fn name(&self) -> &'static str {
        "type-mismatch"
    }

    fn propose(&self, ctx: &CorrectionContext<'_>, diagnostic: &Diagnostic) -> Vec<RawProposal> {
        let path = ctx.path(diagnostic.range);
        let Some((idx, expr)) = path.expr_at(diagnostic.range) else {
            return Vec::new();
        };
        let typer = ctx.typer(&path);
        let found = arg_type(diagnostic, 0).unwrap_or_else(|| typer.type_of(expr));
        let Some(expected) = arg_type(diagnostic, 1).or_else(|| typer.expected_type(idx)) else {
            return Vec::new();
        };
        if !found.is_known() || !expected.is_known() || expected.is_void() {
            return Vec::new();
        }
        tracing::debug!(target: "mend.correction", %found, %expected, "type mismatch");

        let mut out = self.casts(ctx, &typer, expr, &found, &expected);
        let declarable = !found.is_void() && found != Type::Null;
        if declarable {
            if let Some(site) = assigned_variable(ctx, &typer, &path, idx) {
                out.push(change_var_type(ctx, site, &found));
            }
            if matches!(path.parent(idx), Some(NodeRef::Stmt(Stmt::Return(_)))) {
                out.extend(self.method_return(ctx, &path, &found));
            }
        }
        out.extend(callee_return(ctx, &typer, expr, &expected));
        if matches!(expr.unparenthesized(), Expr::Name(_) | Expr::FieldAccess(_)) {
            if let Some(site) = variable_of(ctx, &typer, expr) {
                out.push(change_var_type(ctx, site, &expected));
            }
        }
        out.extend(self.let_implement(ctx, &found, &expected));
        out
    }
}

fn is_identifier(text: &str) -> bool {
    let mut chars = text.chars();
    chars
        .next()
        .is_some_and(|c| c.is_alphabetic() || c == '_' || c == '$')
        && chars.all(|c| c.is_alphanumeric() || c == '_' || c == '$')
}

/// The type of the elements a for-each over `iterable` binds.
fn element_type(env: &dyn TypeEnv, iterable: &Type) -> Option<Type> {
    if let Some(elem) = iterable.element_type() {
        return Some(elem.clone());
    }
    let view = instantiate_as_supertype(env, iterable, "java.lang.Iterable")?;
    Some(match view.type_args().first() {
        Some(Type::Wildcard(WildcardBound::Extends(bound))) => (**bound).clone(),
        Some(Type::Wildcard(_)) | None => Type::object(),
        Some(other) => other.clone(),
    })
}

impl Corrector for ForEachMismatch {
    fn name(&self) -> &'static str {
        "foreach-mismatch"
    }

    fn propose(&self, ctx: &CorrectionContext<'_>, diagnostic: &Diagnostic) -> Vec<RawProposal> {
        let path = ctx.path(diagnostic.range);
        let Some(stmt) = path.nodes().iter().rev().find_map(|node| match node {
            NodeRef::Stmt(Stmt::ForEach(stmt)) => Some(stmt),
            _ => None,
        }) else {
            return Vec::new();
        };
        let typer = ctx.typer(&path);
        let Some(element) = element_type(ctx.env(), &typer.type_of(&stmt.iterable))
            .filter(Type::is_known)
            .or_else(|| arg_type(diagnostic, 0))
        else {
            return Vec::new();
        };
        let mut imports = ctx.import_rewrite();
        let text = imports.type_text(&element);
        let var = &stmt.var;
        if var.name.is_empty() {
            // `for (name : items)`: the lone name is the variable, not its type.
            let name = var.ty.text.as_str();
            if !is_identifier(name) {
                return Vec::new();
            }
            return vec![RawProposal::quick_fix(
                format!("Create loop variable '{name}'"),
                relevance::CREATE_LOOP_VARIABLE,
            )
            .replace(ctx.file_id(), var.ty.range, format!("{text} {name}"))
            .with_changes(imports.changes())];
        }
        vec![RawProposal::quick_fix(
            format!("Change type of '{}' to '{}'", stmt.var.name, element.simple_display()),
            relevance::CHANGE_VARIABLE_TYPE,
        )
        .replace(ctx.file_id(), stmt.var.ty.range, text)
        .with_changes(imports.changes())]
    }
}

fn enclosing_method<'a>(path: &NodePath<'a>) -> Option<&'a MethodDecl> {
    path.nodes().iter().rev().find_map(|node| match node {
        NodeRef::Method(method) => Some(*method),
        _ => None,
    })
}

/// The overridden method the diagnostic names by declaring type, else the first one.
fn overridden_target<'o, 'e>(
    overridden: &'o [ResolvedMethod<'e>],
    diagnostic: &Diagnostic,
) -> Option<&'o ResolvedMethod<'e>> {
    let wanted = diagnostic.arg(0);
    overridden
        .iter()
        .find(|m| wanted.is_some_and(|name| m.declaring.name == name))
        .or_else(|| overridden.first())
}

impl Corrector for IncompatibleReturnType {
    fn name(&self) -> &'static str {
        "incompatible-return-type"
    }

    fn propose(&self, ctx: &CorrectionContext<'_>, diagnostic: &Diagnostic) -> Vec<RawProposal> {
        let path = ctx.path(diagnostic.range);
        let Some(method) = enclosing_method(&path) else {
            return Vec::new();
        };
        let (Some(ret), Some((type_name, _))) = (&method.return_ty, path.enclosing_type()) else {
            return Vec::new();
        };
        let env = ctx.env();
        let Some((class, def)) = method_def(env, &type_name, method) else {
            return Vec::new();
        };
        let overridden = overridden_methods(env, class, def);
        let Some(target) = overridden_target(&overridden, diagnostic) else {
            return Vec::new();
        };

        let label = method_label(&method.name);
        let mut imports = ctx.import_rewrite();
        let text = imports.type_text(&target.return_type);
        let mut out = vec![RawProposal::quick_fix(
            format!(
                "Change return type of '{label}' to '{}'",
                target.return_type.simple_display()
            ),
            relevance::CHANGE_RETURN_TYPE,
        )
        .replace(ctx.file_id(), ret.range, text)
        .with_changes(imports.changes())];

        if let Some((file, _, decl)) = ctx
            .workspace
            .method_declaration(target.declaring, target.method)
            .filter(|_| target.declaring.is_source())
        {
            let current = ctx.typer(&path).lower(ret);
            let mut imports = ctx.import_rewrite_for(file);
            let text = imports.type_text(&current);
            let role = if target.declaring.is_interface() {
                "implemented"
            } else {
                "overridden"
            };
            let mut raw = RawProposal::quick_fix(
                format!("Change return type of {role} '{label}'"),
                relevance::CHANGE_OVERRIDDEN_RETURN_TYPE,
            );
            if push_return_type(&mut raw, file, decl, &text).is_some() {
                out.push(raw.with_changes(imports.changes()));
            }
        }
        out
    }
}

/// Insert `@throws` tags for `names` after the last `@throws` tag of `doc`, else after
/// the `@param` and `@return` tags, else before the first tag.
fn push_throws_tags(raw: &mut RawProposal, file: &SourceFile, doc: &Javadoc, names: &[String]) {
    let indent = text::indentation_at(&file.text, doc.range.start);
    let lines: String = names
        .iter()
        .filter(|name| doc.throws_tag(simple_name(name)).is_none())
        .map(|name| format!("{indent} * @throws {name}\n"))
        .collect();
    if lines.is_empty() {
        return;
    }
    let anchor = doc
        .tags
        .iter()
        .rev()
        .find(|tag| tag.is_throws())
        .or_else(|| doc.tags.iter().rev().find(|tag| tag.is_param() || tag.is_return()));
    let offset = match (anchor, doc.tags.first()) {
        (Some(tag), _) if tag.on_own_line => tag.lines.end,
        (None, Some(first)) if first.on_own_line => first.lines.start,
        (None, None) if doc.close_on_own_line => doc.close_line_start,
        _ => return,
    };
    raw.push_insert(&file.id, offset, lines);
}

impl Corrector for IncompatibleThrows {
    fn name(&self) -> &'static str {
        "incompatible-throws"
    }

    fn propose(&self, ctx: &CorrectionContext<'_>, diagnostic: &Diagnostic) -> Vec<RawProposal> {
        let path = ctx.path(diagnostic.range);
        let (Some(method), Some((type_name, _))) = (enclosing_method(&path), path.enclosing_type())
        else {
            return Vec::new();
        };
        let env = ctx.env();
        let Some((class, def)) = method_def(env, &type_name, method) else {
            return Vec::new();
        };
        let overridden = overridden_methods(env, class, def);
        let Some(target) = overridden_target(&overridden, diagnostic) else {
            return Vec::new();
        };

        let allowed: Vec<&str> = target.throws.iter().filter_map(Type::class_name).collect();
        let typer = ctx.typer(&path);
        let (undeclared, kept): (Vec<_>, Vec<_>) = method
            .throws
            .iter()
            .map(|written| (written, typer.lower(written)))
            .partition(|(_, ty)| {
                ty.class_name()
                    .is_some_and(|name| !allowed.iter().any(|sup| is_subclass(env, name, sup)))
            });
        if undeclared.is_empty() {
            tracing::debug!(
                target: "mend.correction",
                method = %method.name,
                "every declared exception is allowed by the overridden method"
            );
            return Vec::new();
        }

        let file = ctx.file_id();
        let source = ctx.text();
        let label = method_label(&method.name);
        let mut remove = RawProposal::quick_fix(
            format!("Remove exceptions from '{label}'"),
            relevance::REMOVE_EXCEPTIONS,
        );
        if let Some(range) = method.throws_range {
            if kept.is_empty() {
                remove.push_delete(file, Span::new(method.params_range.end, range.end));
            } else {
                let list: Vec<&str> = kept.iter().map(|(ty, _)| ty.range.slice(source)).collect();
                remove.push_replace(file, range, format!("throws {}", list.join(", ")));
            }
        }
        if let Some(doc) = &method.javadoc {
            for (written, _) in &undeclared {
                if let Some(tag) = doc.throws_tag(simple_name(written.range.slice(source))) {
                    remove.push_delete(file, if tag.on_own_line { tag.lines } else { tag.range });
                }
            }
        }
        let mut out = vec![remove];

        let Some((target_file, _, decl)) = ctx
            .workspace
            .method_declaration(target.declaring, target.method)
            .filter(|_| target.declaring.is_source())
        else {
            return out;
        };
        let owner = instantiate_as_supertype(
            env,
            &Type::class(class.name.as_str(), Vec::new()),
            &target.declaring.name,
        )
        .map(|ty| ty.simple_display())
        .unwrap_or_else(|| target.declaring.simple_name().to_string());
        let mut imports = ctx.import_rewrite_for(target_file);
        let names: Vec<String> = undeclared
            .iter()
            .filter_map(|(_, ty)| ty.class_name())
            .map(|name| imports.class_name(name))
            .collect();
        let mut add = RawProposal::quick_fix(
            format!("Add exceptions to '{owner}.{}'", method_label(&decl.name)),
            relevance::ADD_EXCEPTIONS,
        );
        let list = names.join(", ");
        match decl.throws_range {
            Some(range) => add.push_insert(&target_file.id, range.end, format!(", {list}")),
            None => {
                add.push_insert(&target_file.id, decl.params_range.end, format!(" throws {list}"))
            }
        }
        if let Some(doc) = &decl.javadoc {
            push_throws_tags(&mut add, target_file, doc, &names);
        }
        out.push(add.with_changes(imports.changes()));
        out
    }
}
