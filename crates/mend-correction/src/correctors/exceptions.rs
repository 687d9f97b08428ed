//! Unhandled checked exceptions and catch clauses that catch nothing.

use mend_core::{text, Diagnostic, ProblemKind, Span};
use mend_syntax::ast::{
    CatchClause, Expr, LocalVarStmt, MethodDecl, Resource, Stmt, TryStmt, TypeRef,
};
use mend_syntax::visit::{walk, NodeRef};
use mend_types::{
    is_subclass, methods_named, overridden_methods, simple_name, subtyping, Type, TypeEnv,
};

use super::method_def;
use crate::context::{BodyDecl, CorrectionContext, NodePath, StmtSite};
use crate::dispatch::Corrector;
use crate::imports::ImportRewrite;
use crate::names::{unique_name, Suffix};
use crate::proposal::RawProposal;
use crate::relevance;
use crate::scope::visible_locals;
use crate::typing::Typer;

/// Proposals for `UncaughtException` and `UncaughtExceptionOnAutoClose`.
pub struct UncaughtException;

/// Proposals for `UnreachableCatch`.
pub struct UnneededCatch;

/// Statements the surround proposals wrap: the statement holding the diagnostic,
/// widened to every sibling the selection touches.
struct Selected<'a> {
    site: StmtSite<'a>,
    first: usize,
    last: usize,
}

impl<'a> Selected<'a> {
    fn statements(&self) -> &'a [Stmt] {
        &self.site.siblings()[self.first..=self.last]
    }

    fn range(&self) -> Span {
        let stmts = self.statements();
        match (stmts.first(), stmts.last()) {
            (Some(first), Some(last)) => first.range().cover(last.range()),
            _ => self.site.stmt.range(),
        }
    }

    fn following(&self) -> &'a [Stmt] {
        &self.site.siblings()[self.last + 1..]
    }
}

fn selected_statements<'a>(path: &NodePath<'a>, selection: Span) -> Option<Selected<'a>> {
    let site = path.enclosing_statement()?;
    if let Some(lambda_depth) = path
        .nodes()
        .iter()
        .rposition(|node| matches!(node, NodeRef::Expr(Expr::Lambda(_))))
    {
        // The exception escapes from an expression lambda, not from this statement.
        if site.depth < lambda_depth {
            return None;
        }
    }
    let siblings = site.siblings();
    let mut first = site.index;
    let mut last = site.index;
    while first > 0 && siblings[first - 1].range().end > selection.start && !selection.is_empty() {
        first -= 1;
    }
    while last + 1 < siblings.len() && siblings[last + 1].range().start < selection.end {
        last += 1;
    }
    Some(Selected { site, first, last })
}

/// Exception types of the uncaught-exception diagnostics inside `range`, in diagnostic
/// order without duplicates.
fn uncaught_in(diagnostics: &[Diagnostic], range: Span) -> Vec<String> {
    let mut out: Vec<String> = Vec::new();
    for diagnostic in diagnostics {
        if !matches!(
            diagnostic.kind,
            ProblemKind::UncaughtException | ProblemKind::UncaughtExceptionOnAutoClose
        ) || !range.contains_span(diagnostic.range)
        {
            continue;
        }
        if let Some(name) = diagnostic.arg(0) {
            if !out.iter().any(|known| known == name) {
                out.push(name.to_string());
            }
        }
    }
    out
}

/// Drop types that are subclasses of another type in the list.
fn without_subtypes(env: &dyn TypeEnv, types: &[String]) -> Vec<String> {
    types
        .iter()
        .filter(|ty| {
            !types
                .iter()
                .any(|other| other != *ty && is_subclass(env, ty, other))
        })
        .cloned()
        .collect()
}

/// Order types so that no clause catches a subclass of an earlier clause.
fn catch_order(env: &dyn TypeEnv, types: &[String]) -> Vec<String> {
    let mut out: Vec<String> = Vec::with_capacity(types.len());
    for ty in types {
        match out.iter().position(|earlier| is_subclass(env, ty, earlier)) {
            Some(pos) => out.insert(pos, ty.clone()),
            None => out.push(ty.clone()),
        }
    }
    out
}

/// ` catch (<types> <var>) {` … `}` with the generated body.
fn catch_clause(types: &str, var: &str, indent: &str, unit: &str) -> String {
    format!(
        " catch ({types} {var}) {{\n{indent}{unit}// TODO Auto-generated catch block\n{indent}{unit}{var}.printStackTrace();\n{indent}}}"
    )
}

/// The catch variable name at `offset`: the configured name, suffixed while taken.
fn catch_variable(ctx: &CorrectionContext<'_>, path: &NodePath<'_>, offset: usize) -> String {
    let locals = visible_locals(path, offset);
    let taken: Vec<&str> = locals.iter().map(|local| local.name).collect();
    unique_name(ctx.config.exception_variable_name(), &taken, Suffix::FromOne)
}

fn references(stmts: &[Stmt], name: &str) -> bool {
    let mut found = false;
    for stmt in stmts {
        walk(NodeRef::Stmt(stmt), &mut |node| {
            if let NodeRef::Expr(Expr::Name(expr)) = node {
                found |= expr.name == name;
            }
            !found
        });
    }
    found
}

/// Remove one level of indentation from every line but the first.
fn outdent(src: &str, unit: &str) -> String {
    src.split('\n')
        .enumerate()
        .map(|(idx, line)| {
            if idx == 0 {
                return line;
            }
            let strip = line
                .bytes()
                .take(unit.len())
                .take_while(|b| matches!(b, b' ' | b'\t'))
                .count();
            &line[strip..]
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Planned edit of a method's `throws` clause.
struct ThrowsPlan<'m> {
    /// Declared types that stay, as written.
    kept: Vec<&'m TypeRef>,
    /// Declared types replaced by a more general new type: `(written, qualified)`.
    removed: Vec<(&'m TypeRef, String)>,
    added: Vec<String>,
}

fn plan_throws<'m>(
    env: &dyn TypeEnv,
    typer: &Typer<'_>,
    method: &'m MethodDecl,
    new: &[String],
) -> Option<ThrowsPlan<'m>> {
    let declared: Vec<(&TypeRef, Option<String>)> = method
        .throws
        .iter()
        .map(|ty| (ty, typer.lower(ty).class_name().map(str::to_string)))
        .collect();

    let mut added: Vec<String> = Vec::new();
    for ty in new {
        let covered = declared
            .iter()
            .filter_map(|(_, name)| name.as_deref())
            .any(|existing| is_subclass(env, ty, existing));
        if !covered && !added.contains(ty) {
            added.push(ty.clone());
        }
    }
    if added.is_empty() {
        return None;
    }

    let mut kept = Vec::new();
    let mut removed = Vec::new();
    for (written, name) in declared {
        match name {
            Some(name) if added.iter().any(|a| *a != name && is_subclass(env, &name, a)) => {
                removed.push((written, name))
            }
            _ => kept.push(written),
        }
    }
    Some(ThrowsPlan {
        kept,
        removed,
        added,
    })
}

/// Rewrite the `throws` clause of `method` in the current file and keep its Javadoc
/// `@throws` tags in step.
fn push_throws(
    ctx: &CorrectionContext<'_>,
    raw: &mut RawProposal,
    imports: &mut ImportRewrite<'_>,
    method: &MethodDecl,
    plan: &ThrowsPlan<'_>,
) {
    let source = ctx.text();
    let file = ctx.file_id();
    let added: Vec<(String, String)> = plan
        .added
        .iter()
        .map(|name| (name.clone(), imports.class_name(name)))
        .collect();

    let mut list: Vec<&str> = plan
        .kept
        .iter()
        .map(|ty| ty.range.slice(source))
        .collect();
    list.extend(added.iter().map(|(_, written)| written.as_str()));
    let clause = format!("throws {}", list.join(", "));
    match method.throws_range {
        Some(range) => raw.push_replace(file, range, clause),
        None => raw.push_insert(file, method.params_range.end, format!(" {clause}")),
    }

    let Some(doc) = &method.javadoc else {
        return;
    };
    let throws_tag = |simple: &str| {
        doc.tags.iter().find(|tag| {
            tag.is_throws() && tag.arg.as_deref().map(simple_name) == Some(simple)
        })
    };
    let indent = text::indentation_at(source, doc.range.start);
    let mut replaced: Vec<Span> = Vec::new();
    let mut pending = String::new();
    for (qualified, written) in &added {
        if throws_tag(simple_name(qualified)).is_some() {
            continue;
        }
        let replaceable = plan
            .removed
            .iter()
            .filter(|(_, removed)| is_subclass(ctx.env(), removed, qualified))
            .filter_map(|(_, removed)| throws_tag(simple_name(removed)))
            .find(|tag| !replaced.contains(&tag.range));
        match replaceable {
            Some(tag) => {
                replaced.push(tag.range);
                raw.push_replace(file, tag.range, format!("@throws {written}"));
            }
            None => pending.push_str(&format!("{indent} * @throws {written}\n")),
        }
    }
    if pending.is_empty() {
        return;
    }
    let offset = match doc.tags.last() {
        Some(tag) if tag.on_own_line => tag.lines.end,
        Some(tag) => text::line_end_with_newline(source, tag.range.end),
        None if doc.close_on_own_line => doc.close_line_start,
        None => return,
    };
    raw.push_insert(file, offset, pending);
}

/// Whether the exceptions may be declared by `method`, and which of them: a method
/// overriding a library method may only add subtypes of what the overridden one throws.
fn declarable(
    ctx: &CorrectionContext<'_>,
    path: &NodePath<'_>,
    method: &MethodDecl,
    uncaught: &[String],
) -> Vec<String> {
    let env = ctx.env();
    let Some((owner, _)) = path.enclosing_type() else {
        return uncaught.to_vec();
    };
    let Some((class, def)) = method_def(env, &owner, method) else {
        return uncaught.to_vec();
    };
    let overridden = overridden_methods(env, class, def);
    let Some(library) = overridden.iter().find(|m| !m.declaring.is_source()) else {
        return uncaught.to_vec();
    };
    if overridden.iter().any(|m| m.declaring.is_source()) {
        return uncaught.to_vec();
    }
    uncaught
        .iter()
        .filter(|ty| {
            library
                .throws
                .iter()
                .filter_map(|t| t.class_name())
                .any(|declared| is_subclass(env, ty, declared))
        })
        .cloned()
        .collect()
}

impl UncaughtException {
    fn add_throws<'a>(
        &self,
        ctx: &CorrectionContext<'a>,
        path: &NodePath<'a>,
        uncaught: &[String],
    ) -> Option<RawProposal> {
        let Some(BodyDecl::Method(method)) = path.body_decl() else {
            return None;
        };
        let types = declarable(ctx, path, method, uncaught);
        let typer = ctx.typer(path);
        let plan = plan_throws(ctx.env(), &typer, method, &types)?;
        let mut raw = RawProposal::quick_fix("Add throws declaration", relevance::ADD_THROWS);
        let mut imports = ctx.import_rewrite();
        push_throws(ctx, &mut raw, &mut imports, method, &plan);
        Some(raw.with_changes(imports.changes()))
    }

    fn surround<'a>(
        &self,
        ctx: &CorrectionContext<'a>,
        path: &NodePath<'a>,
        selected: &Selected<'_>,
        uncaught: &[String],
        multi: bool,
    ) -> Option<RawProposal> {
        let stmts = selected.statements();
        if stmts.iter().any(is_constructor_call) {
            return None;
        }
        let env = ctx.env();
        let source = ctx.text();
        let file = ctx.file_id();
        let range = selected.range();
        let indent = text::indentation_at(source, range.start);
        let unit = ctx.indent_unit();
        let var = catch_variable(ctx, &path.prefix(selected.site.depth), range.start);
        let mut imports = ctx.import_rewrite();

        // Declarations still used after the wrapped statements stay outside the try.
        let following = selected.following();
        let mut hoisted = String::new();
        let mut body = String::new();
        let mut cursor = range.start;
        for stmt in stmts {
            let stmt_range = stmt.range();
            body.push_str(&source[cursor..stmt_range.start]);
            cursor = stmt_range.end;
            match stmt {
                Stmt::LocalVar(decl)
                    if decl.declarators.iter().any(|d| references(following, &d.name)) =>
                {
                    hoisted.push_str(&hoisted_declaration(source, decl));
                    hoisted.push('\n');
                    hoisted.push_str(indent);
                    let stmt_indent = text::indentation_at(source, stmt_range.start);
                    let assignments: Vec<String> = decl
                        .declarators
                        .iter()
                        .filter_map(|d| {
                            let init = d.init.as_ref()?;
                            Some(format!("{} = {};", d.name, init.range().slice(source)))
                        })
                        .collect();
                    body.push_str(&assignments.join(&format!("\n{stmt_indent}")));
                }
                _ => body.push_str(stmt_range.slice(source)),
            }
        }

        let clauses = if multi {
            let types: Vec<String> = without_subtypes(env, uncaught)
                .iter()
                .map(|ty| imports.class_name(ty))
                .collect();
            catch_clause(&types.join(" | "), &var, indent, unit)
        } else {
            catch_order(env, uncaught)
                .iter()
                .map(|ty| {
                    let written = imports.class_name(ty);
                    catch_clause(&written, &var, indent, unit)
                })
                .collect()
        };

        let replacement = format!(
            "{hoisted}try {{\n{indent}{}\n{indent}}}{clauses}",
            text::indent_lines(&body, unit)
        );
        let (label, rel) = if multi {
            ("Surround with try/multi-catch", relevance::SURROUND_WITH_TRY_MULTI_CATCH)
        } else {
            ("Surround with try/catch", relevance::SURROUND_WITH_TRY_CATCH)
        };
        Some(
            RawProposal::quick_fix(label, rel)
                .replace(file, range, replacement)
                .with_changes(imports.changes()),
        )
    }

    fn try_with_resources<'a>(
        &self,
        ctx: &CorrectionContext<'a>,
        path: &NodePath<'a>,
        site: &StmtSite<'_>,
        diagnostic: &Diagnostic,
        uncaught: &[String],
    ) -> Option<RawProposal> {
        let Stmt::LocalVar(decl) = site.stmt else {
            return None;
        };
        let [declarator] = decl.declarators.as_slice() else {
            return None;
        };
        let init = declarator.init.as_ref()?;
        if !init.range().contains_span(diagnostic.range) {
            return None;
        }
        let env = ctx.env();
        let typer = ctx.typer(path);
        let ty = typer.lower(&decl.ty);
        if !subtyping::is_auto_closeable(env, &ty) {
            return None;
        }

        let mut types = uncaught.to_vec();
        if let Some(close) = methods_named(env, &ty, "close")
            .into_iter()
            .find(|m| m.params.is_empty())
        {
            for thrown in close.throws.iter().filter_map(|t| t.class_name()) {
                if !types.iter().any(|known| known == thrown) {
                    types.push(thrown.to_string());
                }
            }
        }
        let types = without_subtypes(env, &types);
        if types.is_empty() {
            return None;
        }

        let source = ctx.text();
        let unit = ctx.indent_unit();
        let stmt_range = site.stmt.range();
        let indent = text::indentation_at(source, stmt_range.start);
        let following = site.following();
        let used_until = following
            .iter()
            .rposition(|stmt| references(std::slice::from_ref(stmt), &declarator.name));
        let (end, body) = match used_until {
            Some(last) => {
                let end = following[last].range().end;
                let src = &source[text::line_start(source, following[0].range().start)..end];
                (end, format!("{}\n", text::indent_lines(src, unit)))
            }
            None => (stmt_range.end, String::new()),
        };

        let resource = stmt_range.slice(source).trim_end_matches(';').trim_end();
        let var = catch_variable(ctx, &path.prefix(site.depth), stmt_range.start);
        let mut imports = ctx.import_rewrite();
        let written: Vec<String> = types.iter().map(|t| imports.class_name(t)).collect();
        let replacement = format!(
            "try ({resource}) {{\n{body}{indent}}}{}",
            catch_clause(&written.join(" | "), &var, indent, unit)
        );
        Some(
            RawProposal::quick_fix(
                "Surround with try-with-resources",
                relevance::SURROUND_WITH_TRY_WITH_RESOURCES,
            )
            .replace(ctx.file_id(), Span::new(stmt_range.start, end), replacement)
            .with_changes(imports.changes()),
        )
    }

    fn extend_surrounding_try<'a>(
        &self,
        ctx: &CorrectionContext<'a>,
        path: &NodePath<'a>,
        uncaught: &[String],
    ) -> Vec<RawProposal> {
        let Some((try_idx, try_stmt)) = enclosing_try(path) else {
            return Vec::new();
        };
        let env = ctx.env();
        let source = ctx.text();
        let file = ctx.file_id();
        let unit = ctx.indent_unit();
        let indent = text::indentation_at(source, try_stmt.range.start);
        let var = catch_variable(ctx, &path.prefix(try_idx), try_stmt.range.start);
        let anchor = try_stmt
            .catches
            .last()
            .map_or(try_stmt.body.range.end, |c| c.range.end);
        let mut out = Vec::new();

        let mut imports = ctx.import_rewrite();
        let clauses: String = uncaught
            .iter()
            .map(|ty| catch_clause(&imports.class_name(ty), &var, indent, unit))
            .collect();
        out.push(
            RawProposal::quick_fix(
                "Add catch clause to surrounding try",
                relevance::ADD_CATCH_TO_SURROUNDING_TRY,
            )
            .insert(file, anchor, clauses)
            .with_changes(imports.changes()),
        );

        let filtered = without_subtypes(env, uncaught);
        match try_stmt.catches.as_slice() {
            [only] => {
                let Some(last_type) = only.types.last() else {
                    return out;
                };
                let mut imports = ctx.import_rewrite();
                let alternatives: String = filtered
                    .iter()
                    .map(|ty| format!(" | {}", imports.class_name(ty)))
                    .collect();
                let label = if filtered.len() > 1 {
                    "Add exceptions to existing catch clause"
                } else {
                    "Add exception to existing catch clause"
                };
                out.push(
                    RawProposal::quick_fix(label, relevance::ADD_TO_EXISTING_CATCH)
                        .insert(file, last_type.range.end, alternatives)
                        .with_changes(imports.changes()),
                );
            }
            [] if filtered.len() > 1 => {
                let mut imports = ctx.import_rewrite();
                let types: Vec<String> = filtered.iter().map(|ty| imports.class_name(ty)).collect();
                out.push(
                    RawProposal::quick_fix(
                        "Add additional multi-catch",
                        relevance::ADD_ADDITIONAL_MULTI_CATCH,
                    )
                    .insert(
                        file,
                        try_stmt.body.range.end,
                        catch_clause(&types.join(" | "), &var, indent, unit),
                    )
                    .with_changes(imports.changes()),
                );
            }
            _ => {}
        }
        out
    }
}

/// The innermost `try` whose body contains the path, with its position in the path.
fn enclosing_try<'a>(path: &NodePath<'a>) -> Option<(usize, &'a TryStmt)> {
    let try_stmt = path.enclosing_try_body()?;
    let idx = path
        .nodes()
        .iter()
        .rposition(|node| {
            matches!(node, NodeRef::Stmt(Stmt::Try(t)) if std::ptr::eq(t, try_stmt))
        })?;
    Some((idx, try_stmt))
}

fn is_constructor_call(stmt: &Stmt) -> bool {
    matches!(
        stmt,
        Stmt::Expr(expr) if matches!(&expr.expr, Expr::Call(call) if call.is_constructor_call())
    )
}

/// `Type name;` for a declaration whose initializers move into a try body.
fn hoisted_declaration(source: &str, decl: &LocalVarStmt) -> String {
    let names: Vec<String> = decl
        .declarators
        .iter()
        .map(|d| format!("{}{}", d.name, "[]".repeat(d.dims)))
        .collect();
    format!("{} {};", decl.ty.range.slice(source), names.join(", "))
}

impl Corrector for UncaughtException {
    fn name(&self) -> &'static str {
        "uncaught-exception"
    }

    fn propose(&self, ctx: &CorrectionContext<'_>, diagnostic: &Diagnostic) -> Vec<RawProposal> {
        let path = ctx.path(diagnostic.range);
        let Some(selected) = selected_statements(&path, ctx.selection) else {
            return Vec::new();
        };
        let uncaught = uncaught_in(ctx.diagnostics, selected.range());
        if uncaught.is_empty() {
            return Vec::new();
        }

        let mut out = Vec::new();
        out.extend(self.add_throws(ctx, &path, &uncaught));
        out.extend(self.extend_surrounding_try(ctx, &path, &uncaught));
        if selected.first == selected.last {
            out.extend(self.try_with_resources(ctx, &path, &selected.site, diagnostic, &uncaught));
        }
        out.extend(self.surround(ctx, &path, &selected, &uncaught, false));
        if without_subtypes(ctx.env(), &uncaught).len() > 1 {
            out.extend(self.surround(ctx, &path, &selected, &uncaught, true));
        }
        out
    }
}

impl UnneededCatch {
    /// The edit removing `catch` from `try_stmt`, unwrapping the try when nothing would
    /// remain of it.
    fn removal(
        &self,
        ctx: &CorrectionContext<'_>,
        raw: &mut RawProposal,
        try_stmt: &TryStmt,
        idx: usize,
    ) {
        let source = ctx.text();
        let file = ctx.file_id();
        let catch = &try_stmt.catches[idx];
        let keeps_try = try_stmt.catches.len() > 1
            || try_stmt.finally.is_some()
            || !try_stmt.resources.is_empty();
        if keeps_try {
            let prev_end = match idx {
                0 => try_stmt.body.range.end,
                _ => try_stmt.catches[idx - 1].range.end,
            };
            raw.push_delete(file, Span::new(prev_end, catch.range.end));
            return;
        }
        let stmts = &try_stmt.body.statements;
        match (stmts.first(), stmts.last()) {
            (Some(first), Some(last)) => {
                let body = &source[first.range().start..last.range().end];
                raw.push_replace(file, try_stmt.range, outdent(body, ctx.indent_unit()));
            }
            _ => raw.push_delete_lines(file, try_stmt.range),
        }
    }
}

fn catch_at<'a>(path: &NodePath<'a>, range: Span) -> Option<(&'a TryStmt, usize, &'a CatchClause)> {
    let nodes = path.nodes();
    let pos = nodes.iter().rposition(|node| {
        matches!(
            node,
            NodeRef::Catch(catch) if catch.types.iter().any(|t| t.range.intersects(range))
        )
    })?;
    let (Some(NodeRef::Catch(catch)), Some(NodeRef::Stmt(Stmt::Try(try_stmt)))) =
        (path.get(pos), path.parent(pos))
    else {
        return None;
    };
    let idx = try_stmt.catches.iter().position(|c| std::ptr::eq(c, catch))?;
    Some((try_stmt, idx, catch))
}

/// Exception classes the body and resources of `try_stmt` may throw: declared throws of
/// the calls and constructors made, the types of `throw` statements, and what `close()`
/// declares for each resource. Nested try statements contribute what escapes them.
fn thrown_in<'a>(ctx: &CorrectionContext<'a>, try_stmt: &'a TryStmt) -> Vec<String> {
    let mut out = Vec::new();
    for resource in &try_stmt.resources {
        let path = ctx.path(resource.range());
        let typer = ctx.typer(&path);
        let ty = match resource {
            Resource::Decl(decl) => {
                for init in decl.declarators.iter().filter_map(|d| d.init.as_ref()) {
                    collect_thrown(ctx, NodeRef::Expr(init), &mut out);
                }
                typer.lower(&decl.ty)
            }
            Resource::Expr(expr) => {
                collect_thrown(ctx, NodeRef::Expr(expr), &mut out);
                typer.type_of(expr)
            }
        };
        let close = methods_named(ctx.env(), &ty, "close")
            .into_iter()
            .find(|m| m.params.is_empty());
        if let Some(close) = close {
            push_classes(&mut out, &close.throws);
        }
    }
    collect_thrown(ctx, NodeRef::Block(&try_stmt.body), &mut out);
    out
}

/// What escapes a nested try statement: the body's exceptions its catches do not
/// handle, plus anything the catch blocks and the finally block throw.
fn escaping<'a>(ctx: &CorrectionContext<'a>, try_stmt: &'a TryStmt) -> Vec<String> {
    let env = ctx.env();
    let path = ctx.path(try_stmt.range);
    let typer = ctx.typer(&path);
    let handled: Vec<String> = try_stmt
        .catches
        .iter()
        .flat_map(|catch| catch.types.iter())
        .filter_map(|ty| typer.lower(ty).class_name().map(str::to_string))
        .collect();
    let mut out: Vec<String> = thrown_in(ctx, try_stmt)
        .into_iter()
        .filter(|thrown| !handled.iter().any(|caught| is_subclass(env, thrown, caught)))
        .collect();
    for catch in &try_stmt.catches {
        collect_thrown(ctx, NodeRef::Block(&catch.body), &mut out);
    }
    if let Some(finally) = &try_stmt.finally {
        collect_thrown(ctx, NodeRef::Block(finally), &mut out);
    }
    out
}

fn collect_thrown<'a>(ctx: &CorrectionContext<'a>, node: NodeRef<'a>, out: &mut Vec<String>) {
    walk(node, &mut |node| match node {
        // Lambda bodies and local classes throw when they run, not here.
        NodeRef::Expr(Expr::Lambda(_)) | NodeRef::Type(_) => false,
        NodeRef::Stmt(Stmt::Try(inner)) => {
            let escaped = escaping(ctx, inner);
            push_names(out, escaped);
            false
        }
        NodeRef::Stmt(Stmt::Throw(throw)) => {
            let path = ctx.path(throw.expr.range());
            let ty = ctx.typer(&path).type_of(&throw.expr);
            push_classes(out, std::slice::from_ref(&ty));
            true
        }
        NodeRef::Expr(Expr::Call(call)) => {
            let path = ctx.path(call.range);
            if let Some(method) = ctx.typer(&path).resolve_call(call) {
                push_classes(out, &method.throws);
            }
            true
        }
        NodeRef::Expr(Expr::New(new)) => {
            let path = ctx.path(new.range);
            if let Some(constructor) = ctx.typer(&path).resolve_new(new) {
                push_classes(out, &constructor.throws);
            }
            // The anonymous class body is not executed by the instance creation.
            for arg in &new.args {
                collect_thrown(ctx, NodeRef::Expr(arg), out);
            }
            false
        }
        _ => true,
    });
}

fn push_classes(out: &mut Vec<String>, types: &[Type]) {
    push_names(
        out,
        types.iter().filter_map(|ty| ty.class_name().map(str::to_string)),
    );
}

fn push_names(out: &mut Vec<String>, names: impl IntoIterator<Item = String>) {
    for name in names {
        if !out.contains(&name) {
            out.push(name);
        }
    }
}

impl Corrector for UnneededCatch {
    fn name(&self) -> &'static str {
        "unneeded-catch"
    }

    fn propose(&self, ctx: &CorrectionContext<'_>, diagnostic: &Diagnostic) -> Vec<RawProposal> {
        let path = ctx.path(diagnostic.range);
        let Some((try_stmt, idx, catch)) = catch_at(&path, diagnostic.range) else {
            return Vec::new();
        };
        // Union alternatives are not clauses of their own.
        let [caught] = catch.types.as_slice() else {
            return Vec::new();
        };
        let env = ctx.env();
        let typer = ctx.typer(&path);
        let qualified = diagnostic
            .arg(0)
            .map(str::to_string)
            .or_else(|| typer.lower(caught).class_name().map(str::to_string));
        if let Some(caught) = &qualified {
            let thrown = thrown_in(ctx, try_stmt);
            if thrown
                .iter()
                .any(|ty| is_subclass(env, ty, caught) || is_subclass(env, caught, ty))
            {
                tracing::debug!(
                    target: "mend.correction",
                    caught = %caught,
                    "catch clause handles a thrown exception"
                );
                return Vec::new();
            }
        }

        let mut remove = RawProposal::quick_fix("Remove catch clause", relevance::REMOVE_CATCH);
        self.removal(ctx, &mut remove, try_stmt, idx);
        let mut out = vec![remove];

        let Some(BodyDecl::Method(method)) = path.body_decl() else {
            return out;
        };
        let Some(qualified) = qualified else {
            return out;
        };
        let mut replace = RawProposal::quick_fix(
            "Replace catch clause with throws",
            relevance::REPLACE_CATCH_WITH_THROWS,
        );
        self.removal(ctx, &mut replace, try_stmt, idx);
        let mut imports = ctx.import_rewrite();
        if let Some(plan) = plan_throws(ctx.env(), &typer, method, &[qualified]) {
            push_throws(ctx, &mut replace, &mut imports, method, &plan);
        }
        out.push(replace.with_changes(imports.changes()));
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{diagnostic, nth_span_of, span_of, Fixture};
    use pretty_assertions::assert_eq;

    fn uncaught(text: &str, needle: &str, ty: &str) -> Diagnostic {
        diagnostic(ProblemKind::UncaughtException, span_of(text, needle), &[ty])
    }

    #[test]
    fn declares_or_catches_a_single_exception() {
        let text = "package test1;\nimport java.io.IOException;\npublic class E {\n    public void goo() throws IOException {\n    }\n    public void foo() {\n        goo();\n    }\n}\n";
        let fixture = Fixture::new(&[("test1/E.java", text)]);
        let diagnostics = [uncaught(text, "goo();", "java.io.IOException")];
        assert_eq!(
            fixture.apply(&UncaughtException, &diagnostics, "Add throws declaration"),
            "package test1;\nimport java.io.IOException;\npublic class E {\n    public void goo() throws IOException {\n    }\n    public void foo() throws IOException {\n        goo();\n    }\n}\n"
        );
        assert_eq!(
            fixture.apply(&UncaughtException, &diagnostics, "Surround with try/catch"),
            "package test1;\nimport java.io.IOException;\npublic class E {\n    public void goo() throws IOException {\n    }\n    public void foo() {\n        try {\n            goo();\n        } catch (IOException e) {\n            // TODO Auto-generated catch block\n            e.printStackTrace();\n        }\n    }\n}\n"
        );
        assert!(!fixture
            .labels(&UncaughtException, &diagnostics)
            .contains(&"Surround with try/multi-catch".to_string()));
    }

    #[test]
    fn new_throws_update_the_javadoc() {
        let text = "package test1;\nimport java.io.IOException;\nimport java.text.ParseException;\npublic class E {\n    public String goo() throws IOException, ParseException {\n        return null;\n    }\n    /**\n     * Not much to say here.\n     * @throws ParseException Parsing failed\n     */\n    public void foo() throws ParseException {\n        goo().substring(2);\n    }\n}\n";
        let fixture = Fixture::new(&[("test1/E.java", text)]);
        let diagnostics = [uncaught(text, "goo().substring(2)", "java.io.IOException")];
        assert_eq!(
            fixture.apply(&UncaughtException, &diagnostics, "Add throws declaration"),
            "package test1;\nimport java.io.IOException;\nimport java.text.ParseException;\npublic class E {\n    public String goo() throws IOException, ParseException {\n        return null;\n    }\n    /**\n     * Not much to say here.\n     * @throws ParseException Parsing failed\n     * @throws IOException\n     */\n    public void foo() throws ParseException, IOException {\n        goo().substring(2);\n    }\n}\n"
        );
    }

    #[test]
    fn more_specific_declarations_collapse() {
        let text = "package test1;\nimport java.io.IOException;\nimport java.net.SocketException;\npublic class E {\n    public void goo() throws IOException {\n        return;\n    }\n    /**\n     * @throws SocketException Sockets are dangerous\n     * @since 3.0\n     */\n    public void foo() throws SocketException {\n        this.goo();\n    }\n}\n";
        let fixture = Fixture::new(&[("test1/E.java", text)]);
        let diagnostics = [uncaught(text, "this.goo()", "java.io.IOException")];
        assert_eq!(
            fixture.apply(&UncaughtException, &diagnostics, "Add throws declaration"),
            "package test1;\nimport java.io.IOException;\nimport java.net.SocketException;\npublic class E {\n    public void goo() throws IOException {\n        return;\n    }\n    /**\n     * @throws IOException\n     * @since 3.0\n     */\n    public void foo() throws IOException {\n        this.goo();\n    }\n}\n"
        );
    }

    #[test]
    fn several_exceptions_get_separate_or_multi_catches() {
        let text = "package test1;\nimport java.io.IOException;\nimport java.text.ParseException;\npublic class E {\n    public void goo() throws IOException, ParseException {\n    }\n    public void foo() {\n        goo();\n    }\n}\n";
        let fixture = Fixture::new(&[("test1/E.java", text)]);
        let range = span_of(text, "goo();");
        let diagnostics = [
            diagnostic(ProblemKind::UncaughtException, range, &["java.io.IOException"]),
            diagnostic(ProblemKind::UncaughtException, range, &["java.text.ParseException"]),
        ];
        assert_eq!(
            fixture.apply(&UncaughtException, &diagnostics, "Add throws declaration"),
            "package test1;\nimport java.io.IOException;\nimport java.text.ParseException;\npublic class E {\n    public void goo() throws IOException, ParseException {\n    }\n    public void foo() throws IOException, ParseException {\n        goo();\n    }\n}\n"
        );
        assert_eq!(
            fixture.apply(&UncaughtException, &diagnostics, "Surround with try/multi-catch"),
            "package test1;\nimport java.io.IOException;\nimport java.text.ParseException;\npublic class E {\n    public void goo() throws IOException, ParseException {\n    }\n    public void foo() {\n        try {\n            goo();\n        } catch (IOException | ParseException e) {\n            // TODO Auto-generated catch block\n            e.printStackTrace();\n        }\n    }\n}\n"
        );
        assert_eq!(
            fixture.apply(&UncaughtException, &diagnostics, "Surround with try/catch"),
            "package test1;\nimport java.io.IOException;\nimport java.text.ParseException;\npublic class E {\n    public void goo() throws IOException, ParseException {\n    }\n    public void foo() {\n        try {\n            goo();\n        } catch (IOException e) {\n            // TODO Auto-generated catch block\n            e.printStackTrace();\n        } catch (ParseException e) {\n            // TODO Auto-generated catch block\n            e.printStackTrace();\n        }\n    }\n}\n"
        );
    }

    #[test]
    fn catch_variables_avoid_visible_names() {
        let text = "package test1;\nimport java.io.IOException;\npublic class E {\n    void foo() {\n        try {\n            throw new IOException();\n        } catch (IOException e) {\n            throw new IOException();\n        }\n    }\n}\n";
        let fixture = Fixture::new(&[("test1/E.java", text)]);
        let range = nth_span_of(text, "throw new IOException();", 1);
        let diagnostics = [diagnostic(
            ProblemKind::UncaughtException,
            range,
            &["java.io.IOException"],
        )];
        assert_eq!(
            fixture.apply(&UncaughtException, &diagnostics, "Surround with try/catch"),
            "package test1;\nimport java.io.IOException;\npublic class E {\n    void foo() {\n        try {\n            throw new IOException();\n        } catch (IOException e) {\n            try {\n                throw new IOException();\n            } catch (IOException e1) {\n                // TODO Auto-generated catch block\n                e1.printStackTrace();\n            }\n        }\n    }\n}\n"
        );
    }

    #[test]
    fn surrounding_try_gets_new_catches() {
        let text = "package test1;\nimport java.io.IOException;\nimport java.text.ParseException;\npublic class E {\n    public static void goo() throws IOException, ParseException {\n        return;\n    }\n    public void foo() {\n        try {\n            E.goo();\n        } catch (IOException e) {\n        }\n    }\n}\n";
        let fixture = Fixture::new(&[("test1/E.java", text)]);
        let diagnostics = [uncaught(text, "E.goo()", "java.text.ParseException")];
        assert_eq!(
            fixture.apply(&UncaughtException, &diagnostics, "Add catch clause to surrounding try"),
            "package test1;\nimport java.io.IOException;\nimport java.text.ParseException;\npublic class E {\n    public static void goo() throws IOException, ParseException {\n        return;\n    }\n    public void foo() {\n        try {\n            E.goo();\n        } catch (IOException e) {\n        } catch (ParseException e) {\n            // TODO Auto-generated catch block\n            e.printStackTrace();\n        }\n    }\n}\n"
        );
        assert_eq!(
            fixture.apply(
                &UncaughtException,
                &diagnostics,
                "Add exception to existing catch clause",
            ),
            "package test1;\nimport java.io.IOException;\nimport java.text.ParseException;\npublic class E {\n    public static void goo() throws IOException, ParseException {\n        return;\n    }\n    public void foo() {\n        try {\n            E.goo();\n        } catch (IOException | ParseException e) {\n        }\n    }\n}\n"
        );
    }

    #[test]
    fn library_overrides_restrict_throws() {
        let text = "package test1;\npublic class A implements Runnable {\n    public void run() {\n        Class.forName(null);\n    }\n}\n";
        let fixture = Fixture::new(&[("test1/A.java", text)]);
        let diagnostics = [uncaught(
            text,
            "Class.forName(null)",
            "java.lang.ClassNotFoundException",
        )];
        assert_eq!(
            fixture.labels(&UncaughtException, &diagnostics),
            vec!["Surround with try/catch".to_string()]
        );

        let text = "package test1;\nimport java.io.Closeable;\nimport java.io.FileNotFoundException;\npublic class A implements Closeable {\n    public void close() {\n        throw new FileNotFoundException();\n    }\n}\n";
        let fixture = Fixture::new(&[("test1/A.java", text)]);
        let diagnostics = [uncaught(
            text,
            "throw new FileNotFoundException();",
            "java.io.FileNotFoundException",
        )];
        assert_eq!(
            fixture.apply(&UncaughtException, &diagnostics, "Add throws declaration"),
            "package test1;\nimport java.io.Closeable;\nimport java.io.FileNotFoundException;\npublic class A implements Closeable {\n    public void close() throws FileNotFoundException {\n        throw new FileNotFoundException();\n    }\n}\n"
        );
    }

    #[test]
    fn constructor_calls_are_only_declared() {
        let text = "package test1;\nimport java.io.FileInputStream;\npublic class E extends FileInputStream {\n    public E() {\n        super(\"x\");\n    }\n}\n";
        let fixture = Fixture::new(&[("test1/E.java", text)]);
        let diagnostics = [uncaught(text, "super(\"x\")", "java.io.FileNotFoundException")];
        assert_eq!(
            fixture.labels(&UncaughtException, &diagnostics),
            vec!["Add throws declaration".to_string()]
        );
        assert_eq!(
            fixture.apply(&UncaughtException, &diagnostics, "Add throws declaration"),
            "package test1;\nimport java.io.FileInputStream;\nimport java.io.FileNotFoundException;\npublic class E extends FileInputStream {\n    public E() throws FileNotFoundException {\n        super(\"x\");\n    }\n}\n"
        );
    }

    #[test]
    fn selections_widen_the_wrapped_statements() {
        let text = "package test1;\nimport java.io.EOFException;\nimport java.io.FileNotFoundException;\npublic class E {\n    public void foo() throws EOFException {}\n    public void bar() throws FileNotFoundException {}\n    public void test() {\n        System.out.println(1);\n        foo();\n        System.out.println(2);\n        bar();\n        System.out.println(3);\n    }\n}\n";
        let fixture = Fixture::new(&[("test1/E.java", text)]);
        let diagnostics = [
            uncaught(text, "foo();", "java.io.EOFException"),
            uncaught(text, "bar();", "java.io.FileNotFoundException"),
        ];
        let selection = span_of(text, "foo();").cover(span_of(text, "bar();"));
        assert_eq!(
            fixture.apply_in(
                &UncaughtException,
                &diagnostics,
                selection,
                "Surround with try/multi-catch",
                "test1/E.java",
            ),
            "package test1;\nimport java.io.EOFException;\nimport java.io.FileNotFoundException;\npublic class E {\n    public void foo() throws EOFException {}\n    public void bar() throws FileNotFoundException {}\n    public void test() {\n        System.out.println(1);\n        try {\n            foo();\n            System.out.println(2);\n            bar();\n        } catch (EOFException | FileNotFoundException e) {\n            // TODO Auto-generated catch block\n            e.printStackTrace();\n        }\n        System.out.println(3);\n    }\n}\n"
        );
    }

    #[test]
    fn closeable_locals_become_resources() {
        let text = "package test1;\n\nimport java.io.FileInputStream;\nimport java.io.InputStream;\nimport java.nio.file.Path;\n\npublic class E {\n    public void test () {\n        InputStream inp = new FileInputStream(Path.of(\"test\").toFile());\n    }\n}";
        let fixture = Fixture::new(&[("test1/E.java", text)]);
        let diagnostics = [uncaught(
            text,
            "new FileInputStream(Path.of(\"test\").toFile())",
            "java.io.FileNotFoundException",
        )];
        assert_eq!(
            fixture.apply(&UncaughtException, &diagnostics, "Surround with try-with-resources"),
            "package test1;\n\nimport java.io.FileInputStream;\nimport java.io.IOException;\nimport java.io.InputStream;\nimport java.nio.file.Path;\n\npublic class E {\n    public void test () {\n        try (InputStream inp = new FileInputStream(Path.of(\"test\").toFile())) {\n        } catch (IOException e) {\n            // TODO Auto-generated catch block\n            e.printStackTrace();\n        }\n    }\n}"
        );
    }

    #[test]
    fn used_locals_are_declared_before_the_try() {
        let text = "package test1;\nimport java.io.IOException;\npublic class E {\n    String read() throws IOException {\n        return null;\n    }\n    void foo() {\n        String s = read();\n        System.out.println(s);\n    }\n}\n";
        let fixture = Fixture::new(&[("test1/E.java", text)]);
        let diagnostics = [uncaught(text, "read();", "java.io.IOException")];
        assert_eq!(
            fixture.apply(&UncaughtException, &diagnostics, "Surround with try/catch"),
            "package test1;\nimport java.io.IOException;\npublic class E {\n    String read() throws IOException {\n        return null;\n    }\n    void foo() {\n        String s;\n        try {\n            s = read();\n        } catch (IOException e) {\n            // TODO Auto-generated catch block\n            e.printStackTrace();\n        }\n        System.out.println(s);\n    }\n}\n"
        );
    }

    fn unneeded(text: &str, nth: usize, ty: &str) -> Diagnostic {
        let simple = simple_name(ty);
        diagnostic(ProblemKind::UnreachableCatch, nth_span_of(text, simple, nth), &[ty])
    }

    #[test]
    fn unneeded_catches_are_removed_or_thrown() {
        let text = "package test1;\nimport java.io.IOException;\nimport java.text.ParseException;\npublic class E {\n    public void goo() throws IOException {\n    }\n    public void foo() {\n        try {\n            goo();\n        } catch (IOException e) {\n        } catch (ParseException e) {\n        }\n    }\n}\n";
        let fixture = Fixture::new(&[("test1/E.java", text)]);
        let diagnostics = [unneeded(text, 1, "java.text.ParseException")];
        assert_eq!(
            fixture.apply(&UnneededCatch, &diagnostics, "Remove catch clause"),
            "package test1;\nimport java.io.IOException;\nimport java.text.ParseException;\npublic class E {\n    public void goo() throws IOException {\n    }\n    public void foo() {\n        try {\n            goo();\n        } catch (IOException e) {\n        }\n    }\n}\n"
        );
        assert_eq!(
            fixture.apply(&UnneededCatch, &diagnostics, "Replace catch clause with throws"),
            "package test1;\nimport java.io.IOException;\nimport java.text.ParseException;\npublic class E {\n    public void goo() throws IOException {\n    }\n    public void foo() throws ParseException {\n        try {\n            goo();\n        } catch (IOException e) {\n        }\n    }\n}\n"
        );
    }

    #[test]
    fn a_lone_catch_unwraps_the_try() {
        let text = "package test1;\nimport java.io.IOException;\npublic class E {\n    public void goo() {\n    }\n    public void foo() {\n        try {\n            goo();\n        } catch (IOException e) {\n        }\n    }\n}\n";
        let fixture = Fixture::new(&[("test1/E.java", text)]);
        let diagnostics = [unneeded(text, 1, "java.io.IOException")];
        assert_eq!(
            fixture.apply(&UnneededCatch, &diagnostics, "Remove catch clause"),
            "package test1;\nimport java.io.IOException;\npublic class E {\n    public void goo() {\n    }\n    public void foo() {\n        goo();\n    }\n}\n"
        );

        let text = "package test1;\nimport java.io.IOException;\npublic class E {\n    public void goo() {\n    }\n    public void foo() {\n        try {\n            goo();\n        } catch (IOException e) {\n        } finally {\n        }\n    }\n}\n";
        let fixture = Fixture::new(&[("test1/E.java", text)]);
        let diagnostics = [unneeded(text, 1, "java.io.IOException")];
        assert_eq!(
            fixture.apply(&UnneededCatch, &diagnostics, "Replace catch clause with throws"),
            "package test1;\nimport java.io.IOException;\npublic class E {\n    public void goo() {\n    }\n    public void foo() throws IOException {\n        try {\n            goo();\n        } finally {\n        }\n    }\n}\n"
        );
    }

    #[test]
    fn initializers_cannot_declare_throws() {
        let text = "package test1;\nimport java.text.ParseException;\npublic class E {\n    static {\n        try {\n            int x= 1;\n        } catch (ParseException e) {\n        }\n    }\n}\n";
        let fixture = Fixture::new(&[("test1/E.java", text)]);
        let diagnostics = [unneeded(text, 1, "java.text.ParseException")];
        assert_eq!(
            fixture.labels(&UnneededCatch, &diagnostics),
            vec!["Remove catch clause".to_string()]
        );
        assert_eq!(
            fixture.apply(&UnneededCatch, &diagnostics, "Remove catch clause"),
            "package test1;\nimport java.text.ParseException;\npublic class E {\n    static {\n        int x= 1;\n    }\n}\n"
        );
    }

    #[test]
    fn catches_of_thrown_exceptions_are_kept() {
        let text = "package test1;\nimport java.io.IOException;\npublic class E {\n    public void goo() throws IOException {\n    }\n    public void foo() {\n        try {\n            goo();\n        } catch (IOException e) {\n        }\n    }\n}\n";
        let fixture = Fixture::new(&[("test1/E.java", text)]);
        let diagnostics = [unneeded(text, 2, "java.io.IOException")];
        assert!(fixture.labels(&UnneededCatch, &diagnostics).is_empty());

        // A subclass thrown by a constructor still reaches the clause.
        let text = "package test1;\nimport java.io.IOException;\nimport java.net.SocketException;\npublic class E {\n    public E(int i) throws SocketException {\n    }\n    public void foo() {\n        try {\n            new E(1);\n        } catch (IOException e) {\n        }\n    }\n}\n";
        let fixture = Fixture::new(&[("test1/E.java", text)]);
        let diagnostics = [unneeded(text, 1, "java.io.IOException")];
        assert!(fixture.labels(&UnneededCatch, &diagnostics).is_empty());

        let text = "package test1;\nimport java.io.IOException;\npublic class E {\n    public void foo() {\n        try {\n            throw new IOException();\n        } catch (IOException e) {\n        }\n    }\n}\n";
        let fixture = Fixture::new(&[("test1/E.java", text)]);
        let diagnostics = [unneeded(text, 2, "java.io.IOException")];
        assert!(fixture.labels(&UnneededCatch, &diagnostics).is_empty());
    }

    #[test]
    fn exceptions_handled_by_nested_trys_do_not_count() {
        let text = "package test1;\nimport java.io.IOException;\npublic class E {\n    public void goo() throws IOException {\n    }\n    public void foo() {\n        try {\n            try {\n                goo();\n            } catch (IOException e) {\n            }\n            Runnable r = () -> {\n                throw new IOException();\n            };\n        } catch (IOException e) {\n        }\n    }\n}\n";
        let fixture = Fixture::new(&[("test1/E.java", text)]);
        let diagnostics = [unneeded(text, 4, "java.io.IOException")];
        assert_eq!(
            fixture.labels(&UnneededCatch, &diagnostics),
            vec![
                "Remove catch clause".to_string(),
                "Replace catch clause with throws".to_string(),
            ]
        );
    }

    #[test]
    fn removed_catch_clauses_are_not_offered_again() {
        let text = "package test1;\nimport java.io.IOException;\nimport java.text.ParseException;\npublic class E {\n    public void goo() throws IOException {\n    }\n    public void foo() {\n        try {\n            goo();\n        } catch (IOException e) {\n        } catch (ParseException e) {\n        }\n    }\n}\n";
        let fixture = Fixture::new(&[("test1/E.java", text)]);
        let diagnostics = [unneeded(text, 1, "java.text.ParseException")];
        let removed = fixture.apply(&UnneededCatch, &diagnostics, "Remove catch clause");

        let fixture = Fixture::new(&[("test1/E.java", removed.as_str())]);
        let again = [unneeded(&removed, 2, "java.io.IOException")];
        assert!(fixture.labels(&UnneededCatch, &again).is_empty());

        let text = "package test1;\nimport java.io.IOException;\npublic class E {\n    public void goo() {\n    }\n    public void foo() {\n        try {\n            goo();\n        } catch (IOException e) {\n        }\n    }\n}\n";
        let fixture = Fixture::new(&[("test1/E.java", text)]);
        let diagnostics = [unneeded(text, 1, "java.io.IOException")];
        let unwrapped = fixture.apply(&UnneededCatch, &diagnostics, "Remove catch clause");

        let fixture = Fixture::new(&[("test1/E.java", unwrapped.as_str())]);
        let again = [diagnostic(
            ProblemKind::UnreachableCatch,
            span_of(&unwrapped, "goo();"),
            &["java.io.IOException"],
        )];
        assert!(fixture.labels(&UnneededCatch, &again).is_empty());
    }
}
