//! Return statements that disagree with the declared return type of their method.

use mend_core::{text, Diagnostic, ProblemKind, Span};
use mend_syntax::ast::{Expr, MethodDecl, ReturnStmt, Stmt};
use mend_syntax::visit::{walk, NodeRef};
use mend_types::{is_assignable, Type};

use super::type_mismatch::callee_return;
use super::unresolved_method::declarable;
use crate::context::{CorrectionContext, NodePath};
use crate::dispatch::Corrector;
use crate::proposal::RawProposal;
use crate::relevance;
use crate::retype::push_return_type;
use crate::typing::Typer;

pub struct ReturnType;

/// The innermost `return` on the path.
fn return_stmt<'a>(path: &NodePath<'a>) -> Option<&'a ReturnStmt> {
    path.nodes().iter().rev().find_map(|node| match *node {
        NodeRef::Stmt(Stmt::Return(ret)) => Some(ret),
        _ => None,
    })
}

/// The `return` statements of `method` itself, not of nested lambdas or classes.
fn returns(method: &MethodDecl) -> Vec<&ReturnStmt> {
    let mut out = Vec::new();
    let Some(body) = &method.body else {
        return out;
    };
    walk(NodeRef::Block(body), &mut |node| match node {
        NodeRef::Stmt(Stmt::Return(ret)) => {
            out.push(ret);
            false
        }
        NodeRef::Type(_) | NodeRef::Expr(Expr::Lambda(_)) => false,
        NodeRef::Expr(Expr::New(new)) => new.body.is_none(),
        _ => true,
    });
    out
}

/// A value for a `return` at `offset`: the nearest visible variable of a fitting type,
/// else the default value of `ty`.
fn return_value(ctx: &CorrectionContext<'_>, offset: usize, ty: &Type) -> String {
    let path = ctx.path(Span::empty(offset));
    let typer = ctx.typer(&path);
    typer
        .locals()
        .iter()
        .rev()
        .find(|local| {
            let local_ty = typer.local_type(local);
            local_ty.is_known() && is_assignable(ctx.env(), &local_ty, ty)
        })
        .map(|local| local.name.to_string())
        .unwrap_or_else(|| ty.default_value().unwrap_or("null").to_string())
}

impl ReturnType {
    /// A `void` method returning a value.
    fn returns_value(
        &self,
        ctx: &CorrectionContext<'_>,
        typer: &Typer<'_>,
        path: &NodePath<'_>,
    ) -> Vec<RawProposal> {
        let (Some(method), Some(ret)) = (path.enclosing_method(), return_stmt(path)) else {
            return Vec::new();
        };
        let Some(value) = &ret.expr else {
            return Vec::new();
        };
        let ty = declarable(&typer.type_of(value));
        let mut imports = ctx.import_rewrite();
        let ty_text = imports.type_text(&ty);
        let mut out = Vec::new();
        let mut change = RawProposal::quick_fix(
            format!("Change method return type to '{}'", ty.simple_display()),
            relevance::CHANGE_METHOD_RETURN_TYPE,
        );
        if push_return_type(&mut change, ctx.file, method, &ty_text).is_some() {
            out.push(change.with_changes(imports.changes()));
        }
        out.push(
            RawProposal::quick_fix("Change to 'return;'", relevance::CHANGE_TO_PLAIN_RETURN)
                .replace(ctx.file_id(), ret.range, "return;"),
        );
        out
    }

    /// A method declared without a return type.
    fn missing_type(&self, ctx: &CorrectionContext<'_>, path: &NodePath<'_>) -> Vec<RawProposal> {
        let Some(method) = path.enclosing_method() else {
            return Vec::new();
        };
        if method.return_ty.is_some() {
            return Vec::new();
        }
        let returns = returns(method);
        let ty = returns
            .iter()
            .find_map(|ret| ret.expr.as_ref())
            .map_or(Type::Void, |value| {
                let value_path = ctx.path(value.range());
                declarable(&ctx.typer(&value_path).type_of(value))
            });
        let mut imports = ctx.import_rewrite();
        let ty_text = imports.type_text(&ty);
        let mut out = vec![RawProposal::quick_fix(
            format!("Set method return type to '{}'", ty.simple_display()),
            relevance::CHANGE_METHOD_RETURN_TYPE,
        )
        .insert(ctx.file_id(), method.name_range.start, format!("{ty_text} "))
        .with_changes(imports.changes())];

        let returns_nothing = returns.iter().all(|ret| ret.expr.is_none());
        let type_name = path.enclosing_type().map(|(_, decl)| decl.name.as_str());
        if let Some(type_name) = type_name.filter(|name| *name != method.name && returns_nothing) {
            out.push(
                RawProposal::quick_fix("Change to constructor", relevance::CHANGE_TO_CONSTRUCTOR)
                    .replace(ctx.file_id(), method.name_range, type_name),
            );
        }
        out
    }

    /// A non-void method with a bare `return;` or no return on some path.
    fn should_return(
        &self,
        ctx: &CorrectionContext<'_>,
        typer: &Typer<'_>,
        path: &NodePath<'_>,
    ) -> Vec<RawProposal> {
        let Some(method) = path.enclosing_method() else {
            return Vec::new();
        };
        let Some(declared) = &method.return_ty else {
            return Vec::new();
        };
        let ty = typer.lower(declared);
        let source = ctx.text();
        let mut out = Vec::new();
        match return_stmt(path).filter(|ret| ret.expr.is_none()) {
            Some(ret) => {
                let value = return_value(ctx, ret.range.start, &ty);
                out.push(
                    RawProposal::quick_fix(
                        "Change return statement",
                        relevance::CHANGE_RETURN_STATEMENT,
                    )
                        .replace(ctx.file_id(), ret.range, format!("return {value};")),
                );
            }
            None => {
                if let Some(body) = &method.body {
                    let close = body.range.end.saturating_sub(1);
                    let value = return_value(ctx, close, &ty);
                    let line_start = text::line_start(source, close);
                    let close_indent = text::indentation_at(source, close);
                    let indent = format!("{close_indent}{}", ctx.indent_unit());
                    let raw = RawProposal::quick_fix(
                        "Add return statement",
                        relevance::ADD_RETURN_STATEMENT,
                    );
                    out.push(if source[line_start..close].trim().is_empty() {
                        raw.insert(ctx.file_id(), line_start, format!("{indent}return {value};\n"))
                    } else {
                        raw.insert(
                            ctx.file_id(),
                            close,
                            format!("\n{indent}return {value};\n{close_indent}"),
                        )
                    });
                }
            }
        }
        let mut void = RawProposal::quick_fix(
            "Change return type to 'void'",
            relevance::CHANGE_TO_VOID,
        );
        if push_return_type(&mut void, ctx.file, method, "void").is_some() {
            out.push(void);
        }
        out
    }

    /// A call to a `void` method used as a value.
    fn void_used(
        &self,
        ctx: &CorrectionContext<'_>,
        typer: &Typer<'_>,
        path: &NodePath<'_>,
        range: Span,
    ) -> Vec<RawProposal> {
        let Some((idx, expr)) = path.find_expr(|expr| {
            matches!(expr, Expr::Call(_)) && expr.range().intersects(range)
        })
        else {
            return Vec::new();
        };
        let expected = match typer.expected_type(idx) {
            Some(Type::Void) | None => return Vec::new(),
            Some(ty) if !ty.is_known() => return Vec::new(),
            Some(ty) => declarable(&ty),
        };
        callee_return(ctx, typer, expr, &expected).into_iter().collect()
    }
}

impl Corrector for ReturnType {
    fn name(&self) -> &'static str {
        "return-type"
    }

    fn propose(&self, ctx: &CorrectionContext<'_>, diagnostic: &Diagnostic) -> Vec<RawProposal> {
        let path = ctx.path(diagnostic.range);
        if path.in_lambda() && diagnostic.kind != ProblemKind::MethodReturnsVoid {
            return Vec::new();
        }
        let typer = ctx.typer(&path);
        match diagnostic.kind {
            ProblemKind::VoidMethodReturnsValue => self.returns_value(ctx, &typer, &path),
            ProblemKind::MissingReturnType => self.missing_type(ctx, &path),
            ProblemKind::ShouldReturnValue => self.should_return(ctx, &typer, &path),
            ProblemKind::MethodReturnsVoid => self.void_used(ctx, &typer, &path, diagnostic.range),
            _ => Vec::new(),
        }
    }
}
