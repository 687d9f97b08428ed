//! Invocations that bind to no method or constructor.
//!
//! Each candidate with the invoked name is compared with the call through
//! [`signature::diff`]; the difference decides whether the call site or the declaration
//! is adjusted. A new method or constructor matching the call is always offered last.

use mend_core::{text, Diagnostic, FileId, Span};
use mend_fuzzy::{cmp_by_match, similarity};
use mend_syntax::ast::{BinaryOp, CallExpr, Expr, MethodDecl, NewExpr, Stmt, TypeDecl, TypeRef};
use mend_syntax::visit::{walk, NodeRef};
use mend_types::{
    is_assignable, is_castable, methods_named, simple_name, ResolvedMethod, Type, WildcardBound,
};

use super::type_mismatch::{callee_return, change_var_type, parenthesize_cast};
use super::{can_declare_members, method_label};
use crate::codegen::{append_member, insert_after_member, member_indent, MethodStub};
use crate::context::{CorrectionContext, NodePath};
use crate::dispatch::Corrector;
use crate::imports::ImportRewrite;
use crate::names::{avoid_keyword, name_from_expression, name_from_type, unique_name, Suffix};
use crate::proposal::{RawProposal, SourceChange};
use crate::relevance;
use crate::retype::variable_of;
use crate::scope::declared_in;
use crate::signature::{self, SignatureDiff};
use crate::typing::{Receiver, Typer};
use crate::workspace::SourceFile;

/// Proposals for undefined methods, mismatched arguments and undefined constructors.
pub struct UnresolvedMethod;

#[derive(Clone, Copy)]
enum Invocation<'a> {
    Call(&'a CallExpr),
    New(&'a NewExpr),
}

impl<'a> Invocation<'a> {
    fn args(&self) -> &'a [Expr] {
        match *self {
            Invocation::Call(call) => &call.args,
            Invocation::New(new) => &new.args,
        }
    }

    fn args_range(&self) -> Span {
        match self {
            Invocation::Call(call) => call.args_range,
            Invocation::New(new) => new.args_range,
        }
    }
}

/// The innermost invocation whose name (or whole range) the diagnostic points at, with
/// its index on the path.
fn invocation<'a>(path: &NodePath<'a>, range: Span) -> Option<(usize, Invocation<'a>)> {
    path.nodes()
        .iter()
        .copied()
        .enumerate()
        .rev()
        .find_map(|(idx, node)| match node {
            NodeRef::Expr(Expr::Call(call))
                if call.name_range.intersects(range) || call.range == range =>
            {
                Some((idx, Invocation::Call(call)))
            }
            NodeRef::Expr(Expr::New(new))
                if new.ty.range.intersects(range) || new.range == range =>
            {
                Some((idx, Invocation::New(new)))
            }
            _ => None,
        })
}

/// Between the parentheses of an argument or parameter list.
fn inner(list: Span) -> Span {
    Span::new(list.start + 1, list.end.saturating_sub(1).max(list.start + 1))
}

fn plural(count: usize, one: &str, many: &str) -> String {
    if count == 1 {
        one.to_string()
    } else {
        many.to_string()
    }
}

/// The type a new parameter or return value is declared with.
pub(crate) fn declarable(ty: &Type) -> Type {
    match ty {
        Type::Null | Type::Unknown | Type::Void => Type::object(),
        Type::Wildcard(WildcardBound::Extends(bound)) => declarable(bound),
        Type::Wildcard(_) => Type::object(),
        other => other.clone(),
    }
}

/// A name for a parameter receiving `arg`, and whether it was derived from the type.
fn guess_name(arg: &Expr, ty: &Type) -> (String, bool) {
    match name_from_expression(arg) {
        Some(name) => (avoid_keyword(name), false),
        None => (avoid_keyword(name_from_type(ty)), true),
    }
}

/// `base`, or a variant not in `taken`. Single-letter names derived from a primitive
/// type move on through the alphabet (`i`, `j`, `k`), others get a numeric suffix.
fn fresh_name(base: &str, from_type: bool, taken: &[&str]) -> String {
    if !taken.contains(&base) {
        return base.to_string();
    }
    let mut chars = base.chars();
    if let (true, Some(first), None) = (from_type, chars.next(), chars.next()) {
        if first.is_ascii_lowercase() {
            let next = (first as u8 + 1..=b'z')
                .map(|c| char::from(c).to_string())
                .find(|letter| !taken.contains(&letter.as_str()));
            if let Some(letter) = next {
                return letter;
            }
        }
    }
    unique_name(base, taken, Suffix::FromTwo)
}

/// Parameter names for `args`, unique among themselves and against `taken`.
fn parameter_names(args: &[Expr], types: &[Type], taken: &[&str]) -> Vec<String> {
    let mut out: Vec<String> = Vec::with_capacity(args.len());
    for (arg, ty) in args.iter().zip(types) {
        let (base, from_type) = guess_name(arg, ty);
        let mut all: Vec<&str> = taken.to_vec();
        all.extend(out.iter().map(String::as_str));
        out.push(fresh_name(&base, from_type, &all));
    }
    out
}

/// A workspace declaration a reconciliation may edit.
struct Callee<'a> {
    file: &'a SourceFile,
    decl: &'a MethodDecl,
}

impl<'a> Callee<'a> {
    fn of(ctx: &CorrectionContext<'a>, candidate: &ResolvedMethod<'a>) -> Option<Callee<'a>> {
        if !candidate.declaring.is_source() || candidate.method.is_synthetic {
            return None;
        }
        let (file, _, decl) = ctx
            .workspace
            .method_declaration(candidate.declaring, candidate.method)?;
        (decl.params.len() == candidate.method.params.len()).then_some(Callee { file, decl })
    }

    fn source(&self) -> &'a str {
        &self.file.text
    }

    fn param_text(&self, idx: usize) -> &'a str {
        self.decl.params[idx].range.slice(self.source())
    }
}

/// One candidate declaration being reconciled with the invocation.
struct Reconcile<'r, 'a> {
    ctx: &'r CorrectionContext<'a>,
    typer: &'r Typer<'a>,
    invocation: Invocation<'a>,
    candidate: &'r ResolvedMethod<'a>,
    args: &'r [Type],
    callee: Option<Callee<'a>>,
}

impl<'r, 'a> Reconcile<'r, 'a> {
    fn signature(&self) -> String {
        self.candidate.method.signature_label()
    }

    fn kind(&self) -> &'static str {
        if self.candidate.method.is_constructor {
            "constructor"
        } else {
            "method"
        }
    }

    fn arg_text(&self, idx: usize) -> &'a str {
        self.invocation.args()[idx].range().slice(self.ctx.text())
    }

    fn declared_types(&self, indices: impl IntoIterator<Item = usize>) -> String {
        let shown: Vec<String> = indices
            .into_iter()
            .map(|idx| self.candidate.method.params[idx].simple_display())
            .collect();
        shown.join(", ")
    }

    fn proposals(&self, diff: SignatureDiff) -> Vec<RawProposal> {
        match diff {
            SignatureDiff::Match | SignatureDiff::ChangeReturnType(_) => Vec::new(),
            SignatureDiff::AddParameters(missing) => {
                let indices: Vec<usize> = missing.iter().map(|(idx, _)| *idx).collect();
                let mut out = vec![self.add_arguments(&missing)];
                out.extend(self.remove_parameters(&indices));
                out
            }
            SignatureDiff::RemoveParameters(extra) => {
                let mut out = vec![self.remove_arguments(&extra)];
                out.extend(self.add_parameters(&extra));
                out
            }
            SignatureDiff::SwapParameters(i, j) => {
                let mut out = vec![self.swap_arguments(i, j)];
                out.extend(self.swap_parameters(i, j));
                out
            }
            SignatureDiff::ChangeParameterType(idx, arg_ty) => {
                let mut out = Vec::new();
                out.extend(self.change_parameter_type(idx, &arg_ty));
                out.extend(self.cast_argument(idx, &arg_ty));
                out.extend(self.change_argument_source(idx));
                out
            }
        }
    }

    fn add_arguments(&self, missing: &[(usize, Type)]) -> RawProposal {
        let existing = self.invocation.args();
        let mut next = existing.iter();
        let mut list = Vec::with_capacity(self.candidate.params.len());
        for idx in 0..self.candidate.params.len() {
            match missing.iter().find(|(missing_idx, _)| *missing_idx == idx) {
                Some((_, ty)) => list.push(self.argument_for(idx, ty)),
                None => list.extend(
                    next.next()
                        .map(|arg| arg.range().slice(self.ctx.text()).to_string()),
                ),
            }
        }
        RawProposal::quick_fix(
            format!(
                "{} to match '{}'",
                plural(missing.len(), "Add argument", "Add arguments"),
                self.signature()
            ),
            relevance::CHANGE_ARGUMENTS,
        )
        .replace(self.ctx.file_id(), inner(self.invocation.args_range()), list.join(", "))
    }

    /// A visible variable named like the parameter, else one of exactly its type not
    /// passed already, else the type's default value.
    fn argument_for(&self, idx: usize, ty: &Type) -> String {
        let env = self.ctx.env();
        let locals = self.typer.locals();
        if let Some(name) = self.candidate.method.param_names.get(idx) {
            let same_name = locals.iter().rev().find(|local| local.name == name.as_str());
            if let Some(local) = same_name {
                if is_assignable(env, &self.typer.local_type(local), ty) {
                    return name.clone();
                }
            }
        }
        let passed = |name: &str| {
            self.invocation
                .args()
                .iter()
                .any(|arg| matches!(arg.unparenthesized(), Expr::Name(n) if n.name == name))
        };
        let same_type = locals
            .iter()
            .rev()
            .find(|local| !passed(local.name) && self.typer.local_type(local) == *ty);
        match same_type {
            Some(local) => local.name.to_string(),
            None => ty.default_value().unwrap_or("null").to_string(),
        }
    }

    fn remove_arguments(&self, extra: &[usize]) -> RawProposal {
        let kept: Vec<&str> = (0..self.invocation.args().len())
            .filter(|idx| !extra.contains(idx))
            .map(|idx| self.arg_text(idx))
            .collect();
        RawProposal::quick_fix(
            format!(
                "{} to match '{}'",
                plural(extra.len(), "Remove argument", "Remove arguments"),
                self.signature()
            ),
            relevance::CHANGE_ARGUMENTS,
        )
        .replace(self.ctx.file_id(), inner(self.invocation.args_range()), kept.join(", "))
    }

    fn remove_parameters(&self, removed: &[usize]) -> Option<RawProposal> {
        let callee = self.callee.as_ref()?;
        let kept: Vec<&str> = (0..callee.decl.params.len())
            .filter(|idx| !removed.contains(idx))
            .map(|idx| callee.param_text(idx))
            .collect();
        let mut raw = RawProposal::quick_fix(
            format!(
                "Change {} '{}': {} '{}'",
                self.kind(),
                self.signature(),
                plural(removed.len(), "Remove parameter", "Remove parameters"),
                self.declared_types(removed.iter().copied())
            ),
            relevance::CHANGE_METHOD_SIGNATURE,
        );
        let file = &callee.file.id;
        raw.push_replace(file, inner(callee.decl.params_range), kept.join(", "));
        if let Some(doc) = &callee.decl.javadoc {
            for idx in removed {
                if let Some(tag) = doc.param_tag(&callee.decl.params[*idx].name) {
                    raw.push_delete(file, tag.lines);
                }
            }
        }
        Some(raw)
    }

    fn add_parameters(&self, added: &[usize]) -> Option<RawProposal> {
        let callee = self.callee.as_ref()?;
        let mut imports = self.ctx.import_rewrite_for(callee.file);
        let mut taken: Vec<String> = declared_in(NodeRef::Method(callee.decl))
            .into_iter()
            .map(str::to_string)
            .collect();
        let mut params = callee.decl.params.iter().map(|p| p.range.slice(callee.source()));
        let mut list = Vec::new();
        let mut new_names = Vec::new();
        let mut shown = Vec::new();
        for (idx, arg) in self.invocation.args().iter().enumerate() {
            if !added.contains(&idx) {
                list.extend(params.next().map(str::to_string));
                continue;
            }
            let ty = declarable(&self.args[idx]);
            let (base, from_type) = guess_name(arg, &ty);
            let refs: Vec<&str> = taken.iter().map(String::as_str).collect();
            let name = fresh_name(&base, from_type, &refs);
            list.push(format!("{} {name}", imports.type_text(&ty)));
            shown.push(ty.simple_display());
            taken.push(name.clone());
            new_names.push(name);
        }
        let mut raw = RawProposal::quick_fix(
            format!(
                "Change {} '{}': {} '{}'",
                self.kind(),
                self.signature(),
                plural(added.len(), "Add parameter", "Add parameters"),
                shown.join(", ")
            ),
            relevance::CHANGE_METHOD_SIGNATURE,
        );
        raw.push_replace(&callee.file.id, inner(callee.decl.params_range), list.join(", "));
        push_param_tags(&mut raw, callee, &new_names);
        Some(raw.with_changes(imports.changes()))
    }

    fn swap_arguments(&self, i: usize, j: usize) -> RawProposal {
        let args = self.invocation.args();
        let file = self.ctx.file_id();
        RawProposal::quick_fix(
            format!("Swap arguments '{}' and '{}'", self.arg_text(i), self.arg_text(j)),
            relevance::SWAP_ARGUMENTS,
        )
        .replace(file, args[i].range(), self.arg_text(j))
        .replace(file, args[j].range(), self.arg_text(i))
    }

    fn swap_parameters(&self, i: usize, j: usize) -> Option<RawProposal> {
        let callee = self.callee.as_ref()?;
        let params = &callee.decl.params;
        let file = &callee.file.id;
        Some(
            RawProposal::quick_fix(
                format!(
                    "Change {} '{}': Swap parameters '{}'",
                    self.kind(),
                    self.signature(),
                    self.declared_types([i, j])
                ),
                relevance::CHANGE_METHOD_SIGNATURE,
            )
            .replace(file, params[i].range, callee.param_text(j))
            .replace(file, params[j].range, callee.param_text(i)),
        )
    }

    /// The parameter takes the argument's type and a name guessed from the argument;
    /// references in the body follow the rename.
    fn change_parameter_type(&self, idx: usize, arg_ty: &Type) -> Option<RawProposal> {
        let callee = self.callee.as_ref()?;
        let param = &callee.decl.params[idx];
        let new_ty = declarable(arg_ty);
        let mut imports = self.ctx.import_rewrite_for(callee.file);
        let ty_text = imports.type_text(&new_ty);

        let taken: Vec<&str> = declared_in(NodeRef::Method(callee.decl))
            .into_iter()
            .filter(|name| *name != param.name)
            .collect();
        let (base, from_type) = guess_name(&self.invocation.args()[idx], &new_ty);
        let name = fresh_name(&base, from_type, &taken);

        let mut shown: Vec<String> = self
            .candidate
            .method
            .params
            .iter()
            .map(Type::simple_display)
            .collect();
        shown[idx] = new_ty.simple_display();
        let mut raw = RawProposal::quick_fix(
            format!(
                "Change {} '{}' to '{}({})'",
                self.kind(),
                self.signature(),
                self.candidate.method.name,
                shown.join(", ")
            ),
            relevance::CHANGE_METHOD_SIGNATURE,
        );
        let file = &callee.file.id;
        raw.push_replace(
            file,
            Span::new(param.ty.range.start, param.name_range.end),
            format!("{ty_text} {name}"),
        );
        if name != param.name {
            rename_references(&mut raw, file, callee.decl, &param.name, &name);
        }
        Some(raw.with_changes(imports.changes()))
    }

    fn cast_argument(&self, idx: usize, arg_ty: &Type) -> Option<RawProposal> {
        let param_ty = &self.candidate.params[idx];
        let target = if arg_ty.is_primitive() && param_ty.unboxed().is_primitive() {
            param_ty.unboxed()
        } else {
            param_ty.clone()
        };
        if !target.is_known() || !is_castable(self.ctx.env(), arg_ty, &target) {
            return None;
        }
        let arg = &self.invocation.args()[idx];
        let file = self.ctx.file_id();
        let mut imports = self.ctx.import_rewrite();
        let ty_text = imports.type_text(&target);
        let raw = RawProposal::quick_fix(
            format!(
                "Cast argument '{}' to '{}'",
                self.arg_text(idx),
                target.simple_display()
            ),
            relevance::CAST_ARGUMENT,
        );
        let raw = match arg.unparenthesized() {
            Expr::Cast(cast) => raw.replace(file, cast.ty.range, ty_text),
            _ if arg.is_primary() => raw.insert(file, arg.range().start, format!("({ty_text}) ")),
            _ => raw.replace(
                file,
                arg.range(),
                format!("({ty_text}) ({})", self.arg_text(idx)),
            ),
        };
        Some(raw.with_changes(imports.changes()))
    }

    /// Retype the variable passed as the argument, or the return type of the method
    /// whose result is passed.
    fn change_argument_source(&self, idx: usize) -> Option<RawProposal> {
        let arg = &self.invocation.args()[idx];
        let param_ty = &self.candidate.params[idx];
        if !param_ty.is_known() {
            return None;
        }
        let mut raw = match arg.unparenthesized() {
            Expr::Name(_) | Expr::FieldAccess(_) => {
                let site = variable_of(self.ctx, self.typer, arg)?;
                change_var_type(self.ctx, site, param_ty)
            }
            Expr::Call(_) => callee_return(self.ctx, self.typer, arg, param_ty)?,
            _ => return None,
        };
        raw.relevance = relevance::CHANGE_ARGUMENT_SOURCE_TYPE;
        Some(raw)
    }
}

/// Rename simple-name reads of `old` in the body of `method`.
fn rename_references(
    raw: &mut RawProposal,
    file: &FileId,
    method: &MethodDecl,
    old: &str,
    new: &str,
) {
    let Some(body) = &method.body else {
        return;
    };
    let mut ranges = Vec::new();
    walk(NodeRef::Block(body), &mut |node| match node {
        NodeRef::Expr(Expr::Name(name)) => {
            if name.name == old {
                ranges.push(name.range);
            }
            true
        }
        NodeRef::Type(_) => false,
        _ => true,
    });
    for range in ranges {
        raw.push_replace(file, range, new);
    }
    if let Some(tag) = method.javadoc.as_ref().and_then(|doc| doc.param_tag(old)) {
        if let Some(arg_range) = tag.arg_range {
            raw.push_replace(file, arg_range, new);
        }
    }
}

/// `@param` lines for new parameters, after the existing ones. Methods documenting no
/// parameter are left alone.
fn push_param_tags(raw: &mut RawProposal, callee: &Callee<'_>, names: &[String]) {
    let Some(doc) = &callee.decl.javadoc else {
        return;
    };
    let Some(last) = doc.tags.iter().filter(|tag| tag.is_param()).last() else {
        return;
    };
    if !last.on_own_line {
        return;
    }
    let indent = text::indentation_at(callee.source(), doc.range.start);
    let lines: String = names
        .iter()
        .map(|name| format!("{indent} * @param {name}\n"))
        .collect();
    raw.push_insert(&callee.file.id, last.lines.end, lines);
}

/// "Change to '<m>(..)'" for visible methods named alike.
fn similar_methods(
    ctx: &CorrectionContext<'_>,
    typer: &Typer<'_>,
    call: &CallExpr,
) -> Vec<RawProposal> {
    let mut found: Vec<(i32, String)> = Vec::new();
    for method in typer.visible_methods(call) {
        let name = method.name();
        if name == call.name || found.iter().any(|(_, seen)| seen == name) {
            continue;
        }
        if let Some(score) = similarity(&call.name, name) {
            found.push((score, name.to_string()));
        }
    }
    found.sort_by(|a, b| b.0.cmp(&a.0).then_with(|| cmp_by_match(&call.name, &a.1, &b.1)));
    found
        .into_iter()
        .map(|(_, name)| {
            RawProposal::quick_fix(
                format!("Change to '{}'", method_label(&name)),
                relevance::CHANGE_TO_SIMILAR_METHOD,
            )
            .replace(ctx.file_id(), call.name_range, name)
        })
        .collect()
}

/// "Qualify with enclosing type '<T>'": an inner type's methods of the same name hide an
/// applicable method of an outer type.
fn qualify_with_enclosing(
    ctx: &CorrectionContext<'_>,
    typer: &Typer<'_>,
    call: &CallExpr,
    args: &[Type],
) -> Option<RawProposal> {
    if call.receiver.is_some() || call.is_constructor_call() {
        return None;
    }
    let env = ctx.env();
    let enclosing = typer.enclosing_types();
    let hiding = enclosing
        .iter()
        .position(|ty| !methods_named(env, ty, &call.name).is_empty())?;
    enclosing[hiding + 1..].iter().find_map(|ty| {
        let method = methods_named(env, ty, &call.name)
            .into_iter()
            .find(|method| method.is_applicable(env, args))?;
        let owner = simple_name(ty.class_name()?);
        let qualifier = if method.is_static() {
            format!("{owner}.")
        } else {
            format!("{owner}.this.")
        };
        Some(
            RawProposal::quick_fix(
                format!("Qualify with enclosing type '{owner}'"),
                relevance::QUALIFY_WITH_ENCLOSING_TYPE,
            )
            .insert(ctx.file_id(), call.name_range.start, qualifier),
        )
    })
}

/// Favorite static members named like an unqualified call: a static import, or a
/// qualified call when the name is already taken by a visible method.
fn favorites(ctx: &CorrectionContext<'_>, call: &CallExpr, name_taken: bool) -> Vec<RawProposal> {
    let env = ctx.env();
    let mut owners: Vec<String> = Vec::new();
    for favorite in ctx.config.favorites() {
        if !favorite.covers(&favorite.type_name, &call.name)
            || owners.contains(&favorite.type_name)
        {
            continue;
        }
        let owner = Type::class(favorite.type_name.clone(), Vec::new());
        if !methods_named(env, &owner, &call.name)
            .iter()
            .any(|method| method.is_static())
        {
            continue;
        }
        owners.push(favorite.type_name);
    }

    owners
        .into_iter()
        .map(|owner| {
            let shown = format!("{}.{}", simple_name(&owner), call.name);
            if name_taken {
                let mut imports = ctx.import_rewrite();
                let qualifier = imports.class_name(&owner);
                RawProposal::quick_fix(format!("Change to '{shown}'"), relevance::STATIC_IMPORT)
                    .insert(ctx.file_id(), call.name_range.start, format!("{qualifier}."))
                    .with_changes(imports.changes())
            } else {
                RawProposal::quick_fix(
                    format!("Add static import for '{shown}'"),
                    relevance::STATIC_IMPORT,
                )
                .with_changes([SourceChange::AddStaticImport {
                    file: ctx.file_id().clone(),
                    type_name: owner.clone(),
                    member: call.name.clone(),
                }])
            }
        })
        .collect()
}

/// `(T) x.foo()` where `T` declares `foo`: the cast was meant for `x`.
fn cast_parentheses(
    ctx: &CorrectionContext<'_>,
    typer: &Typer<'_>,
    path: &NodePath<'_>,
    idx: usize,
    call: &CallExpr,
) -> Option<RawProposal> {
    let receiver = call.receiver.as_deref()?;
    let mut current = idx;
    loop {
        let range = path.get(current)?.range();
        match path.parent(current)? {
            NodeRef::Expr(Expr::Call(outer))
                if outer.receiver.as_deref().is_some_and(|r| r.range() == range) =>
            {
                current -= 1;
            }
            NodeRef::Expr(Expr::FieldAccess(outer)) if outer.receiver.range() == range => {
                current -= 1;
            }
            NodeRef::Expr(Expr::Cast(cast)) if cast.expr.range() == range => {
                let cast_ty = typer.lower(&cast.ty);
                if methods_named(ctx.env(), &cast_ty, &call.name).is_empty() {
                    return None;
                }
                return Some(parenthesize_cast(ctx, cast, receiver));
            }
            _ => return None,
        }
    }
}

/// Types `name` is checked against with `instanceof` in a condition (`&&` chains
/// included).
fn instance_checks<'e>(cond: &'e Expr, name: &str, out: &mut Vec<&'e TypeRef>) {
    match cond {
        Expr::InstanceOf(check) => {
            if matches!(check.expr.unparenthesized(), Expr::Name(n) if n.name == name) {
                out.push(&check.ty);
            }
        }
        Expr::Binary(bin) if bin.op == BinaryOp::AndAnd => {
            instance_checks(&bin.lhs, name, out);
            instance_checks(&bin.rhs, name, out);
        }
        Expr::Paren(paren) => instance_checks(&paren.inner, name, out),
        _ => {}
    }
}

/// "Add cast to '<x>'" inside `if (x instanceof Y)` when `Y` declares the method.
fn cast_receiver(
    ctx: &CorrectionContext<'_>,
    typer: &Typer<'_>,
    path: &NodePath<'_>,
    call: &CallExpr,
) -> Option<RawProposal> {
    let Some(Expr::Name(receiver)) = call.receiver.as_deref() else {
        return None;
    };
    for node in path.nodes().iter().rev() {
        let NodeRef::Stmt(Stmt::If(stmt)) = node else {
            continue;
        };
        if !stmt.then_branch.range().contains_span(call.range) {
            continue;
        }
        let mut checks = Vec::new();
        instance_checks(&stmt.cond, &receiver.name, &mut checks);
        let declaring = checks
            .into_iter()
            .find(|ty| !methods_named(ctx.env(), &typer.lower(ty), &call.name).is_empty());
        if let Some(ty) = declaring {
            return Some(
                RawProposal::quick_fix(
                    format!("Add cast to '{}'", receiver.name),
                    relevance::CAST_RECEIVER,
                )
                .replace(
                    ctx.file_id(),
                    receiver.range,
                    format!("(({}) {})", ty.range.slice(ctx.text()), receiver.name),
                ),
            );
        }
    }
    None
}

/// The return type of a method created for the invocation at `idx`.
fn created_return_type(typer: &Typer<'_>, path: &NodePath<'_>, idx: usize) -> Type {
    let range = path.get(idx).map(|node| node.range());
    let expected = match path.parent(idx) {
        Some(NodeRef::Expr(Expr::ArrayAccess(access))) if Some(access.array.range()) == range => {
            typer.expected_type(idx - 1).map(Type::array_of)
        }
        _ => typer.expected_type(idx),
    };
    match expected {
        Some(Type::Void) => Type::Void,
        Some(ty) if ty.is_known() => declarable(&ty),
        _ => Type::object(),
    }
}

/// Position in `decl.members` of the member the path runs through.
pub(crate) fn member_position(path: &NodePath<'_>, decl: &TypeDecl) -> Option<usize> {
    let node = path.get(path.member_index()?)?;
    decl.members.iter().position(|member| member.range() == node.range())
}

/// Where a created member goes: after the member holding the invocation when it is
/// created in the same type, else at the end of the target type.
fn place_member(
    text: &str,
    decl: &TypeDecl,
    anchor: Option<usize>,
    member: &str,
) -> Option<(usize, String)> {
    match anchor {
        Some(idx) => insert_after_member(text, decl, idx, member),
        None => Some(append_member(text, decl, member)),
    }
}

/// The type a member matching the invocation is created in, and whether it is static.
fn creation_target(
    typer: &Typer<'_>,
    path: &NodePath<'_>,
    invocation: Invocation<'_>,
) -> Option<(Type, bool)> {
    match invocation {
        Invocation::New(new) => Some((typer.lower(&new.ty), false)),
        Invocation::Call(call) if call.is_constructor_call() => {
            let target = if call.name == "super" {
                typer.super_type()?
            } else {
                typer.this_type()?.clone()
            };
            Some((target, false))
        }
        Invocation::Call(call) => match call.receiver.as_deref() {
            None => Some((typer.this_type()?.clone(), path.in_static_context())),
            Some(receiver) => match typer.resolve_receiver(receiver)? {
                Receiver::Value(ty) => Some((ty, false)),
                Receiver::Type(name) => Some((Type::class(name, Vec::new()), true)),
            },
        },
    }
}

/// "Create method '<n>(<types>)'" or "Create constructor '<X>(<types>)'".
fn create<'a>(
    ctx: &CorrectionContext<'a>,
    typer: &Typer<'a>,
    path: &NodePath<'a>,
    idx: usize,
    invocation: Invocation<'a>,
    args: &[Type],
) -> Option<RawProposal> {
    let (target, is_static) = creation_target(typer, path, invocation)?;
    let class = ctx.env().class(target.class_name()?)?;
    if !class.is_source() {
        return None;
    }
    let (file, decl) = ctx.workspace.declaration(class)?;
    if !can_declare_members(decl) {
        return None;
    }
    let same_type = path.anonymous_class().is_none()
        && path
            .enclosing_type()
            .is_some_and(|(name, _)| name == class.name);

    let mut imports: ImportRewrite<'a> = ctx.import_rewrite_for(file);
    let types: Vec<Type> = args.iter().map(declarable).collect();
    let names = parameter_names(invocation.args(), &types, &[]);
    let params: Vec<(String, String)> = types
        .iter()
        .map(|ty| imports.type_text(ty))
        .zip(names)
        .collect();
    let shown: Vec<String> = types.iter().map(Type::simple_display).collect();

    let (label, stub, relevance) = match invocation {
        Invocation::Call(call) if !call.is_constructor_call() => {
            let ret = created_return_type(typer, path, idx);
            let body = if class.is_interface() && !is_static {
                None
            } else {
                Some(
                    ret.default_value()
                        .map(|value| vec![format!("return {value};")])
                        .unwrap_or_default(),
                )
            };
            let visibility = if class.is_interface() {
                ""
            } else if same_type {
                "private"
            } else {
                "public"
            };
            let modifiers: Vec<&str> = [visibility, if is_static { "static" } else { "" }]
                .into_iter()
                .filter(|m| !m.is_empty())
                .collect();
            let mut label = format!("Create method '{}({})'", call.name, shown.join(", "));
            if !same_type {
                label.push_str(&format!(" in type '{}'", class.simple_name()));
            }
            let stub = MethodStub {
                modifiers: modifiers.join(" "),
                return_type: Some(imports.type_text(&ret)),
                name: call.name.clone(),
                params,
                body,
                ..MethodStub::default()
            };
            (label, stub, relevance::CREATE_METHOD)
        }
        _ => {
            let label = format!(
                "Create constructor '{}({})'",
                class.simple_name(),
                shown.join(", ")
            );
            let stub = MethodStub {
                modifiers: "public".to_string(),
                name: class.simple_name().to_string(),
                params,
                body: Some(Vec::new()),
                ..MethodStub::default()
            };
            (label, stub, relevance::CREATE_CONSTRUCTOR)
        }
    };

    let unit = ctx.indent_unit();
    let indent = member_indent(&file.text, decl, unit);
    let member = stub.render(&indent, unit);
    let anchor = if same_type { member_position(path, decl) } else { None };
    let (offset, insert) = place_member(&file.text, decl, anchor, &member)?;
    Some(
        RawProposal::quick_fix(label, relevance)
            .insert(&file.id, offset, insert)
            .with_changes(imports.changes()),
    )
}

impl Corrector for UnresolvedMethod {
    fn name(&self) -> &'static str {
        "unresolved-method"
    }

    fn propose(&self, ctx: &CorrectionContext<'_>, diagnostic: &Diagnostic) -> Vec<RawProposal> {
        let path = ctx.path(diagnostic.range);
        let Some((idx, invocation)) = invocation(&path, diagnostic.range) else {
            return Vec::new();
        };
        let typer = ctx.typer(&path);
        let args = typer.arg_types(invocation.args());
        let candidates = match invocation {
            Invocation::Call(call) => typer.candidates(call),
            Invocation::New(new) => typer.constructor_candidates(new),
        };
        tracing::debug!(
            target: "mend.correction",
            candidates = candidates.len(),
            args = args.len(),
            "reconciling invocation"
        );

        let mut out = Vec::new();
        if let Invocation::Call(call) = invocation {
            if !call.is_constructor_call() {
                if candidates.is_empty() {
                    out.extend(similar_methods(ctx, &typer, call));
                } else {
                    out.extend(qualify_with_enclosing(ctx, &typer, call, &args));
                }
                if call.receiver.is_none() {
                    out.extend(favorites(ctx, call, !candidates.is_empty()));
                }
                out.extend(cast_parentheses(ctx, &typer, &path, idx, call));
            }
        }

        for candidate in &candidates {
            if candidate.method.varargs {
                continue;
            }
            let Some(diff) = signature::diff(ctx.env(), &args, &candidate.params) else {
                continue;
            };
            let reconcile = Reconcile {
                ctx,
                typer: &typer,
                invocation,
                candidate,
                args: &args,
                callee: Callee::of(ctx, candidate),
            };
            out.extend(reconcile.proposals(diff));
        }

        out.extend(create(ctx, &typer, &path, idx, invocation, &args));
        if let Invocation::Call(call) = invocation {
            out.extend(cast_receiver(ctx, &typer, &path, call));
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{diagnostic, span_in, span_of, Fixture};
    use mend_core::ProblemKind;
    use pretty_assertions::assert_eq;

    fn labels(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn methods_are_created_after_the_calling_member() {
        let text = "package test1;\nimport java.util.Vector;\npublic class E {\n    void foo(Vector vec) {\n        int i= goo(vec, true);\n    }\n}\n";
        let fixture = Fixture::new(&[("test1/E.java", text)]);
        let diagnostics = [diagnostic(ProblemKind::UndefinedMethod, span_of(text, "goo"), &[])];
        assert_eq!(
            fixture.apply(&UnresolvedMethod, &diagnostics, "Create method 'goo(Vector, boolean)'"),
            "package test1;\nimport java.util.Vector;\npublic class E {\n    void foo(Vector vec) {\n        int i= goo(vec, true);\n    }\n\n    private int goo(Vector vec, boolean b) {\n        return 0;\n    }\n}\n"
        );
    }

    #[test]
    fn logical_operands_create_boolean_methods() {
        let text = "package test1;\npublic class E {\n    private boolean foo() {\n        return f(1) || f(2);\n    }\n}\n";
        let fixture = Fixture::new(&[("test1/E.java", text)]);
        let diagnostics = [diagnostic(
            ProblemKind::UndefinedMethod,
            span_in(text, "f(1)", "f"),
            &[],
        )];
        assert_eq!(
            fixture.apply(&UnresolvedMethod, &diagnostics, "Create method 'f(int)'"),
            "package test1;\npublic class E {\n    private boolean foo() {\n        return f(1) || f(2);\n    }\n\n    private boolean f(int i) {\n        return false;\n    }\n}\n"
        );
    }

    #[test]
    fn array_access_creates_an_array_returning_method() {
        let text = "package p;\n\npublic class E {\n    void foo() {\n        int i = bar()[0];\n    }\n}\n";
        let fixture = Fixture::new(&[("p/E.java", text)]);
        let diagnostics = [diagnostic(ProblemKind::UndefinedMethod, span_of(text, "bar"), &[])];
        assert_eq!(
            fixture.apply(&UnresolvedMethod, &diagnostics, "Create method 'bar()'"),
            "package p;\n\npublic class E {\n    void foo() {\n        int i = bar()[0];\n    }\n\n    private int[] bar() {\n        return null;\n    }\n}\n"
        );
    }

    #[test]
    fn receivers_of_other_types_get_public_methods_and_casts() {
        let text = "package test1;\npublic class E {\n    void foo(X x) {\n        if (x instanceof Y) {\n            boolean i= x.goo(1, 2.1);\n        }\n    }\n}\n";
        let x = "package test1;\npublic class X {\n}\n";
        let y = "package test1;\npublic interface Y {\n    public boolean goo(int i, double d);\n}\n";
        let fixture = Fixture::new(
            &[("test1/E.java", text), ("test1/X.java", x), ("test1/Y.java", y)],
        );
        let diagnostics = [diagnostic(ProblemKind::UndefinedMethod, span_of(text, "goo"), &[])];
        let range = diagnostics[0].range;
        assert_eq!(
            fixture.apply_in(
                &UnresolvedMethod,
                &diagnostics,
                range,
                "Create method 'goo(int, double)' in type 'X'",
                "test1/X.java"
            ),
            "package test1;\npublic class X {\n\n    public boolean goo(int i, double d) {\n        return false;\n    }\n}\n"
        );
        assert_eq!(
            fixture.apply(&UnresolvedMethod, &diagnostics, "Add cast to 'x'"),
            "package test1;\npublic class E {\n    void foo(X x) {\n        if (x instanceof Y) {\n            boolean i= ((Y) x).goo(1, 2.1);\n        }\n    }\n}\n"
        );
    }

    #[test]
    fn a_mismatched_argument_changes_the_method_or_is_cast() {
        let text = "package test1;\npublic class E {\n    public void foo(int i) {\n        long x= 0;\n        foo(x + 1);\n    }\n}\n";
        let fixture = Fixture::new(&[("test1/E.java", text)]);
        let diagnostics = [diagnostic(
            ProblemKind::ParameterMismatch,
            span_in(text, "foo(x + 1)", "foo"),
            &[],
        )];
        assert_eq!(
            fixture.labels(&UnresolvedMethod, &diagnostics),
            labels(&[
                "Change method 'foo(int)' to 'foo(long)'",
                "Cast argument 'x + 1' to 'int'",
                "Create method 'foo(long)'",
            ])
        );
        assert_eq!(
            fixture.apply(
                &UnresolvedMethod,
                &diagnostics,
                "Change method 'foo(int)' to 'foo(long)'",
            ),
            "package test1;\npublic class E {\n    public void foo(long l) {\n        long x= 0;\n        foo(x + 1);\n    }\n}\n"
        );
        assert_eq!(
            fixture.apply(&UnresolvedMethod, &diagnostics, "Cast argument 'x + 1' to 'int'"),
            "package test1;\npublic class E {\n    public void foo(int i) {\n        long x= 0;\n        foo((int) (x + 1));\n    }\n}\n"
        );
        assert_eq!(
            fixture.apply(&UnresolvedMethod, &diagnostics, "Create method 'foo(long)'"),
            "package test1;\npublic class E {\n    public void foo(int i) {\n        long x= 0;\n        foo(x + 1);\n    }\n\n    private void foo(long l) {\n    }\n}\n"
        );
    }

    #[test]
    fn boxed_parameters_cast_to_their_primitive() {
        let text = "package test1;\npublic class E {\n    public void foo(Integer i) {\n        foo(1.0);\n    }\n}\n";
        let fixture = Fixture::new(&[("test1/E.java", text)]);
        let diagnostics = [diagnostic(
            ProblemKind::ParameterMismatch,
            span_in(text, "foo(1.0)", "foo"),
            &[],
        )];
        assert_eq!(
            fixture.apply(&UnresolvedMethod, &diagnostics, "Cast argument '1.0' to 'int'"),
            "package test1;\npublic class E {\n    public void foo(Integer i) {\n        foo((int) 1.0);\n    }\n}\n"
        );
        assert_eq!(
            fixture.apply(
                &UnresolvedMethod,
                &diagnostics,
                "Change method 'foo(Integer)' to 'foo(double)'",
            ),
            "package test1;\npublic class E {\n    public void foo(double d) {\n        foo(1.0);\n    }\n}\n"
        );
    }

    #[test]
    fn variables_passed_as_arguments_can_change_type() {
        let text = "package test1;\nimport java.util.Vector;\npublic class E {\n    public void goo(Vector v) {\n    }\n    public void foo() {\n        long x= 0;\n        goo(x);\n    }\n}\n";
        let fixture = Fixture::new(&[("test1/E.java", text)]);
        let diagnostics = [diagnostic(
            ProblemKind::ParameterMismatch,
            span_in(text, "goo(x)", "goo"),
            &[],
        )];
        assert_eq!(
            fixture.apply(
                &UnresolvedMethod,
                &diagnostics,
                "Change method 'goo(Vector)' to 'goo(long)'",
            ),
            "package test1;\nimport java.util.Vector;\npublic class E {\n    public void goo(long x) {\n    }\n    public void foo() {\n        long x= 0;\n        goo(x);\n    }\n}\n"
        );
        assert_eq!(
            fixture.apply(&UnresolvedMethod, &diagnostics, "Change type of 'x' to 'Vector'"),
            "package test1;\nimport java.util.Vector;\npublic class E {\n    public void goo(Vector v) {\n    }\n    public void foo() {\n        Vector x= 0;\n        goo(x);\n    }\n}\n"
        );
        assert_eq!(
            fixture.apply(&UnresolvedMethod, &diagnostics, "Create method 'goo(long)'"),
            "package test1;\nimport java.util.Vector;\npublic class E {\n    public void goo(Vector v) {\n    }\n    public void foo() {\n        long x= 0;\n        goo(x);\n    }\n    private void goo(long x) {\n    }\n}\n"
        );
    }

    #[test]
    fn parameters_renamed_with_their_type_rename_their_uses() {
        let text = "package test1;\npublic class E {\n    public int foo(int count) {\n        return count + 1;\n    }\n    void bar(String s) {\n        foo(s);\n    }\n}\n";
        let fixture = Fixture::new(&[("test1/E.java", text)]);
        let diagnostics = [diagnostic(
            ProblemKind::ParameterMismatch,
            span_in(text, "foo(s)", "foo"),
            &[],
        )];
        assert_eq!(
            fixture.apply(
                &UnresolvedMethod,
                &diagnostics,
                "Change method 'foo(int)' to 'foo(String)'",
            ),
            "package test1;\npublic class E {\n    public int foo(String s) {\n        return s + 1;\n    }\n    void bar(String s) {\n        foo(s);\n    }\n}\n"
        );
    }

    #[test]
    fn missing_arguments_are_added_or_parameters_removed() {
        let text = "package test1;\npublic class E {\n    public void foo(String s, int i, Object o) {\n        int x= 0;\n        foo(x);\n    }\n}\n";
        let fixture = Fixture::new(&[("test1/E.java", text)]);
        let diagnostics = [diagnostic(
            ProblemKind::ParameterMismatch,
            span_in(text, "foo(x)", "foo"),
            &[],
        )];
        assert_eq!(
            fixture.labels(&UnresolvedMethod, &diagnostics),
            labels(&[
                "Add arguments to match 'foo(String, int, Object)'",
                "Change method 'foo(String, int, Object)': Remove parameters 'String, Object'",
                "Create method 'foo(int)'",
            ])
        );
        assert_eq!(
            fixture.apply(
                &UnresolvedMethod,
                &diagnostics,
                "Add arguments to match 'foo(String, int, Object)'",
            ),
            "package test1;\npublic class E {\n    public void foo(String s, int i, Object o) {\n        int x= 0;\n        foo(s, x, o);\n    }\n}\n"
        );
        assert_eq!(
            fixture.apply(
                &UnresolvedMethod,
                &diagnostics,
                "Change method 'foo(String, int, Object)': Remove parameters 'String, Object'"
            ),
            "package test1;\npublic class E {\n    public void foo(int i) {\n        int x= 0;\n        foo(x);\n    }\n}\n"
        );
        assert_eq!(
            fixture.apply(&UnresolvedMethod, &diagnostics, "Create method 'foo(int)'"),
            "package test1;\npublic class E {\n    public void foo(String s, int i, Object o) {\n        int x= 0;\n        foo(x);\n    }\n\n    private void foo(int x) {\n    }\n}\n"
        );
    }

    #[test]
    fn removed_parameters_lose_their_javadoc_tag() {
        let text = "package test1;\npublic class E {\n    public void foo() {\n        X.xoo(1);\n    }\n}\n";
        let x = "package test1;\npublic class X {\n    /**\n     * @param i The int value\n     *                  More about the int value\n     * @param o The Object value\n     */\n    public static void xoo(int i, Object o) {\n    }\n}\n";
        let fixture = Fixture::new(&[("test1/E.java", text), ("test1/X.java", x)]);
        let diagnostics = [diagnostic(ProblemKind::ParameterMismatch, span_of(text, "xoo"), &[])];
        let range = diagnostics[0].range;
        assert_eq!(
            fixture.apply(
                &UnresolvedMethod,
                &diagnostics,
                "Add argument to match 'xoo(int, Object)'",
            ),
            "package test1;\npublic class E {\n    public void foo() {\n        X.xoo(1, null);\n    }\n}\n"
        );
        assert_eq!(
            fixture.apply_in(
                &UnresolvedMethod,
                &diagnostics,
                range,
                "Change method 'xoo(int, Object)': Remove parameter 'Object'",
                "test1/X.java"
            ),
            "package test1;\npublic class X {\n    /**\n     * @param i The int value\n     *                  More about the int value\n     */\n    public static void xoo(int i) {\n    }\n}\n"
        );
        assert_eq!(
            fixture.apply_in(
                &UnresolvedMethod,
                &diagnostics,
                range,
                "Create method 'xoo(int)' in type 'X'",
                "test1/X.java"
            ),
            "package test1;\npublic class X {\n    /**\n     * @param i The int value\n     *                  More about the int value\n     * @param o The Object value\n     */\n    public static void xoo(int i, Object o) {\n    }\n\n    public static void xoo(int i) {\n    }\n}\n"
        );
    }

    #[test]
    fn extra_arguments_are_removed_or_parameters_added() {
        let text = "package test1;\npublic class E {\n    public void foo(X x) {\n        x.xoo(1, 1, x.toString());\n    }\n}\n";
        let x = "package test1;\npublic class X {\n    public void xoo(int i, String o) {\n    }\n}\n";
        let fixture = Fixture::new(&[("test1/E.java", text), ("test1/X.java", x)]);
        let diagnostics = [diagnostic(ProblemKind::ParameterMismatch, span_of(text, "xoo"), &[])];
        let range = diagnostics[0].range;
        assert_eq!(
            fixture.apply(
                &UnresolvedMethod,
                &diagnostics,
                "Remove argument to match 'xoo(int, String)'",
            ),
            "package test1;\npublic class E {\n    public void foo(X x) {\n        x.xoo(1, x.toString());\n    }\n}\n"
        );
        assert_eq!(
            fixture.apply_in(
                &UnresolvedMethod,
                &diagnostics,
                range,
                "Change method 'xoo(int, String)': Add parameter 'int'",
                "test1/X.java"
            ),
            "package test1;\npublic class X {\n    public void xoo(int i, int j, String o) {\n    }\n}\n"
        );
        assert_eq!(
            fixture.apply_in(
                &UnresolvedMethod,
                &diagnostics,
                range,
                "Create method 'xoo(int, int, String)' in type 'X'",
                "test1/X.java"
            ),
            "package test1;\npublic class X {\n    public void xoo(int i, String o) {\n    }\n\n    public void xoo(int i, int j, String string) {\n    }\n}\n"
        );
    }

    #[test]
    fn added_parameters_avoid_names_declared_in_the_body() {
        let text = "package test1;\npublic class E {\n    public void foo(String s) {\n        int x= 0;\n        foo(s, x);\n    }\n}\n";
        let fixture = Fixture::new(&[("test1/E.java", text)]);
        let diagnostics = [diagnostic(
            ProblemKind::ParameterMismatch,
            span_in(text, "foo(s, x)", "foo"),
            &[],
        )];
        assert_eq!(
            fixture.labels(&UnresolvedMethod, &diagnostics),
            labels(&[
                "Remove argument to match 'foo(String)'",
                "Change method 'foo(String)': Add parameter 'int'",
                "Create method 'foo(String, int)'",
            ])
        );
        assert_eq!(
            fixture.apply(
                &UnresolvedMethod,
                &diagnostics,
                "Change method 'foo(String)': Add parameter 'int'",
            ),
            "package test1;\npublic class E {\n    public void foo(String s, int x2) {\n        int x= 0;\n        foo(s, x);\n    }\n}\n"
        );
        assert_eq!(
            fixture.apply(&UnresolvedMethod, &diagnostics, "Create method 'foo(String, int)'"),
            "package test1;\npublic class E {\n    public void foo(String s) {\n        int x= 0;\n        foo(s, x);\n    }\n\n    private void foo(String s, int x) {\n    }\n}\n"
        );
    }

    #[test]
    fn swapped_arguments() {
        let text = "package test1;\npublic class E {\n    public void foo(int i, String[] o) {\n        foo(new String[] { }, i - 1);\n    }\n}\n";
        let fixture = Fixture::new(&[("test1/E.java", text)]);
        let diagnostics = [diagnostic(
            ProblemKind::ParameterMismatch,
            span_in(text, "foo(new", "foo"),
            &[],
        )];
        assert_eq!(
            fixture.apply(
                &UnresolvedMethod,
                &diagnostics,
                "Swap arguments 'new String[] { }' and 'i - 1'"
            ),
            "package test1;\npublic class E {\n    public void foo(int i, String[] o) {\n        foo(i - 1, new String[] { });\n    }\n}\n"
        );
        assert_eq!(
            fixture.apply(
                &UnresolvedMethod,
                &diagnostics,
                "Change method 'foo(int, String[])': Swap parameters 'int, String[]'"
            ),
            "package test1;\npublic class E {\n    public void foo(String[] o, int i) {\n        foo(new String[] { }, i - 1);\n    }\n}\n"
        );
        assert_eq!(
            fixture.apply(&UnresolvedMethod, &diagnostics, "Create method 'foo(String[], int)'"),
            "package test1;\npublic class E {\n    public void foo(int i, String[] o) {\n        foo(new String[] { }, i - 1);\n    }\n\n    private void foo(String[] strings, int i) {\n    }\n}\n"
        );
    }

    #[test]
    fn super_constructor_calls() {
        let x = "package test1;\npublic class X {\n    public X(Object o, int i) {\n    }\n}\n";
        let text = "package test1;\nimport java.util.Vector;\npublic class E extends X {\n    public E() {\n        super(new Vector());\n    }\n}\n";
        let fixture = Fixture::new(&[("test1/E.java", text), ("test1/X.java", x)]);
        let diagnostics = [diagnostic(
            ProblemKind::UndefinedConstructor,
            span_of(text, "super(new Vector())"),
            &[],
        )];
        let range = diagnostics[0].range;
        assert_eq!(
            fixture.labels(&UnresolvedMethod, &diagnostics),
            labels(&[
                "Add argument to match 'X(Object, int)'",
                "Change constructor 'X(Object, int)': Remove parameter 'int'",
                "Create constructor 'X(Vector)'",
            ])
        );
        assert_eq!(
            fixture.apply(
                &UnresolvedMethod,
                &diagnostics,
                "Add argument to match 'X(Object, int)'",
            ),
            "package test1;\nimport java.util.Vector;\npublic class E extends X {\n    public E() {\n        super(new Vector(), 0);\n    }\n}\n"
        );
        assert_eq!(
            fixture.apply_in(
                &UnresolvedMethod,
                &diagnostics,
                range,
                "Change constructor 'X(Object, int)': Remove parameter 'int'",
                "test1/X.java"
            ),
            "package test1;\npublic class X {\n    public X(Object o) {\n    }\n}\n"
        );
        assert_eq!(
            fixture.apply_in(
                &UnresolvedMethod,
                &diagnostics,
                range,
                "Create constructor 'X(Vector)'",
                "test1/X.java"
            ),
            "package test1;\n\nimport java.util.Vector;\n\npublic class X {\n    public X(Object o, int i) {\n    }\n\n    public X(Vector vector) {\n    }\n}\n"
        );
    }

    #[test]
    fn this_constructor_calls_create_next_to_the_caller() {
        let text = "package test1;\nimport java.util.Vector;\npublic class E {\n    public E(Object o, int i) {\n    }\n    public E() {\n        this(new Vector());\n    }\n}\n";
        let fixture = Fixture::new(&[("test1/E.java", text)]);
        let diagnostics = [diagnostic(
            ProblemKind::UndefinedConstructor,
            span_of(text, "this(new Vector())"),
            &[],
        )];
        assert_eq!(
            fixture.apply(&UnresolvedMethod, &diagnostics, "Create constructor 'E(Vector)'"),
            "package test1;\nimport java.util.Vector;\npublic class E {\n    public E(Object o, int i) {\n    }\n    public E() {\n        this(new Vector());\n    }\n    public E(Vector vector) {\n    }\n}\n"
        );
    }

    #[test]
    fn implicit_default_constructors_only_lose_arguments() {
        let text = "package test1;\npublic class E {\n    public void foo(int i) {\n        A a= new A(i);\n    }\n}\n";
        let a = "package test1;\npublic class A {\n}\n";
        let fixture = Fixture::new(&[("test1/E.java", text), ("test1/A.java", a)]);
        let diagnostics = [diagnostic(
            ProblemKind::UndefinedConstructor,
            span_of(text, "new A(i)"),
            &[],
        )];
        let range = diagnostics[0].range;
        assert_eq!(
            fixture.labels(&UnresolvedMethod, &diagnostics),
            labels(&["Remove argument to match 'A()'", "Create constructor 'A(int)'"])
        );
        assert_eq!(
            fixture.apply(&UnresolvedMethod, &diagnostics, "Remove argument to match 'A()'"),
            "package test1;\npublic class E {\n    public void foo(int i) {\n        A a= new A();\n    }\n}\n"
        );
        assert_eq!(
            fixture.apply_in(
                &UnresolvedMethod,
                &diagnostics,
                range,
                "Create constructor 'A(int)'",
                "test1/A.java"
            ),
            "package test1;\npublic class A {\n\n    public A(int i) {\n    }\n}\n"
        );
    }

    #[test]
    fn casts_binding_too_loosely_get_parentheses() {
        let text = "package test1;\npublic class E {\n    public void foo(Object o) {\n        String x= (String) o.substring(1);\n    }\n}\n";
        let fixture = Fixture::new(&[("test1/E.java", text)]);
        let diagnostics = [diagnostic(
            ProblemKind::UndefinedMethod,
            span_of(text, "substring"),
            &[],
        )];
        assert_eq!(
            fixture.apply(&UnresolvedMethod, &diagnostics, "Add parentheses around cast"),
            "package test1;\npublic class E {\n    public void foo(Object o) {\n        String x= ((String) o).substring(1);\n    }\n}\n"
        );

        let text = "package test1;\npublic class E {\n    private static Object obj;\n    public void foo() {\n        String x= (String) E.obj.substring(1).toLowerCase();\n    }\n}\n";
        let fixture = Fixture::new(&[("test1/E.java", text)]);
        let diagnostics = [diagnostic(
            ProblemKind::UndefinedMethod,
            span_of(text, "substring"),
            &[],
        )];
        assert_eq!(
            fixture.apply(&UnresolvedMethod, &diagnostics, "Add parentheses around cast"),
            "package test1;\npublic class E {\n    private static Object obj;\n    public void foo() {\n        String x= ((String) E.obj).substring(1).toLowerCase();\n    }\n}\n"
        );
    }

    #[test]
    fn misspelled_names_change_to_visible_methods() {
        let text = "package test1;\npublic class E {\n    public String foo(Object[] array) {\n        return array.tostring();\n    }\n}\n";
        let fixture = Fixture::new(&[("test1/E.java", text)]);
        let diagnostics = [diagnostic(
            ProblemKind::UndefinedMethod,
            span_of(text, "tostring"),
            &[],
        )];
        assert_eq!(
            fixture.apply(&UnresolvedMethod, &diagnostics, "Change to 'toString(..)'"),
            "package test1;\npublic class E {\n    public String foo(Object[] array) {\n        return array.toString();\n    }\n}\n"
        );
    }

    #[test]
    fn favorite_members_are_imported_statically() {
        let text = "package pack;\n\npublic class E {\n    private int foo() {\n        return max(1, 2);\n    }\n}\n";
        let mut fixture = Fixture::new(&[("pack/E.java", text)]);
        fixture.config.favorite_static_import_members = vec!["java.lang.Math.*".to_string()];
        let diagnostics = [diagnostic(ProblemKind::UndefinedMethod, span_of(text, "max"), &[])];
        assert_eq!(
            fixture.apply(&UnresolvedMethod, &diagnostics, "Add static import for 'Math.max'"),
            "package pack;\n\nimport static java.lang.Math.max;\n\npublic class E {\n    private int foo() {\n        return max(1, 2);\n    }\n}\n"
        );
    }

    #[test]
    fn favorites_named_like_a_visible_method_are_qualified() {
        let text = "package pack;\n\npublic class E {\n    private int max() {\n        return max(1, 2);\n    }\n}\n";
        let mut fixture = Fixture::new(&[("pack/E.java", text)]);
        fixture.config.favorite_static_import_members = vec!["java.lang.Math.max".to_string()];
        let diagnostics = [diagnostic(
            ProblemKind::ParameterMismatch,
            span_in(text, "max(1, 2)", "max"),
            &[],
        )];
        assert_eq!(
            fixture.apply(&UnresolvedMethod, &diagnostics, "Change to 'Math.max'"),
            "package pack;\n\npublic class E {\n    private int max() {\n        return Math.max(1, 2);\n    }\n}\n"
        );
    }

    #[test]
    fn hidden_outer_methods_are_qualified() {
        let text = "package test1;\npublic class E {\n    public void run(int i) {\n    }\n    public void foo() {\n        new Runnable() {\n            public void run() {\n                run(1);\n            }\n        };\n    }\n}\n";
        let fixture = Fixture::new(&[("test1/E.java", text)]);
        let diagnostics = [diagnostic(
            ProblemKind::ParameterMismatch,
            span_in(text, "run(1)", "run"),
            &[],
        )];
        assert_eq!(
            fixture.apply(&UnresolvedMethod, &diagnostics, "Qualify with enclosing type 'E'"),
            "package test1;\npublic class E {\n    public void run(int i) {\n    }\n    public void foo() {\n        new Runnable() {\n            public void run() {\n                E.this.run(1);\n            }\n        };\n    }\n}\n"
        );

        let text = "package test1;\npublic class E {\n    public static void run(int i) {\n    }\n    public void foo() {\n        new Runnable() {\n            public void run() {\n                run(1);\n            }\n        };\n    }\n}\n";
        let fixture = Fixture::new(&[("test1/E.java", text)]);
        let diagnostics = [diagnostic(
            ProblemKind::ParameterMismatch,
            span_in(text, "run(1)", "run"),
            &[],
        )];
        assert_eq!(
            fixture.apply(&UnresolvedMethod, &diagnostics, "Qualify with enclosing type 'E'"),
            "package test1;\npublic class E {\n    public static void run(int i) {\n    }\n    public void foo() {\n        new Runnable() {\n            public void run() {\n                E.run(1);\n            }\n        };\n    }\n}\n"
        );

        let text = "package test1;\npublic class E {\n    public void run(int i) {\n    }\n    public class Inner {\n        public void run() {\n            run(1);\n        }\n    }\n}\n";
        let fixture = Fixture::new(&[("test1/E.java", text)]);
        let diagnostics = [diagnostic(
            ProblemKind::ParameterMismatch,
            span_in(text, "run(1)", "run"),
            &[],
        )];
        assert_eq!(
            fixture.apply(&UnresolvedMethod, &diagnostics, "Qualify with enclosing type 'E'"),
            "package test1;\npublic class E {\n    public void run(int i) {\n    }\n    public class Inner {\n        public void run() {\n            E.this.run(1);\n        }\n    }\n}\n"
        );
    }

    #[test]
    fn outer_methods_that_do_not_apply_are_not_qualified() {
        let text = "package test1;\npublic class E {\n    public void run(String s) {\n    }\n    public class Inner {\n        public void run() {\n            run(1);\n        }\n    }\n}\n";
        let fixture = Fixture::new(&[("test1/E.java", text)]);
        let diagnostics = [diagnostic(
            ProblemKind::ParameterMismatch,
            span_in(text, "run(1)", "run"),
            &[],
        )];
        assert!(!fixture
            .labels(&UnresolvedMethod, &diagnostics)
            .iter()
            .any(|label| label.starts_with("Qualify with enclosing type")));
    }

    #[test]
    fn fresh_names_follow_their_origin() {
        assert_eq!(fresh_name("i", true, &["i", "o"]), "j");
        assert_eq!(fresh_name("x", false, &["s", "x"]), "x2");
        assert_eq!(fresh_name("count", true, &["count"]), "count2");
        assert_eq!(fresh_name("value", false, &[]), "value");
    }
}
