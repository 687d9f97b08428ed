//! Names that resolve to no variable: similar variables, or declaring the variable.

use mend_core::{text, Diagnostic, Span};
use mend_fuzzy::{cmp_by_match, similarity};
use mend_syntax::ast::{Expr, MemberDecl, Stmt, TypeDecl};
use mend_syntax::visit::NodeRef;
use mend_types::{all_fields, Type, Visibility};

use super::can_declare_members;
use super::unresolved_method::{declarable, member_position};
use crate::codegen::{insert_field, member_indent};
use crate::context::{CorrectionContext, NodePath};
use crate::dispatch::Corrector;
use crate::proposal::RawProposal;
use crate::relevance;
use crate::typing::{Receiver, Typer};
use crate::workspace::SourceFile;

pub struct UnresolvedVariable;

/// The unresolved name as written: alone, or selected from a qualifier.
enum Reference<'a> {
    Simple { name: &'a str, range: Span },
    Qualified { name: &'a str, range: Span, receiver: &'a Expr },
}

impl<'a> Reference<'a> {
    fn name(&self) -> &'a str {
        match self {
            Reference::Simple { name, .. } | Reference::Qualified { name, .. } => name,
        }
    }

    fn range(&self) -> Span {
        match self {
            Reference::Simple { range, .. } | Reference::Qualified { range, .. } => *range,
        }
    }
}

fn reference<'a>(path: &NodePath<'a>, range: Span) -> Option<(usize, Reference<'a>)> {
    let (idx, expr) = path.find_expr(|expr| match expr {
        Expr::Name(name) => name.range.contains_span(range),
        Expr::FieldAccess(access) => {
            access.name_range.contains_span(range) || access.range == range
        }
        _ => false,
    })?;
    let reference = match expr {
        Expr::Name(name) => Reference::Simple {
            name: &name.name,
            range: name.range,
        },
        Expr::FieldAccess(access) => Reference::Qualified {
            name: &access.name,
            range: access.name_range,
            receiver: &access.receiver,
        },
        _ => return None,
    };
    Some((idx, reference))
}

/// The statement `name = value;` when the reference is its target.
fn assignment_statement<'a>(path: &NodePath<'a>, idx: usize) -> Option<(&'a Stmt, &'a Expr)> {
    let node = path.get(idx)?;
    let NodeRef::Expr(Expr::Assign(assign)) = path.parent(idx)? else {
        return None;
    };
    if assign.lhs.range() != node.range() || assign.op != "=" {
        return None;
    }
    match path.parent(idx - 1)? {
        NodeRef::Stmt(stmt @ Stmt::Expr(_)) => Some((stmt, &assign.rhs)),
        _ => None,
    }
}

/// The type a declaration for the reference at `idx` gets: the assigned value's, or
/// what the position expects.
fn inferred_type(typer: &Typer<'_>, path: &NodePath<'_>, idx: usize) -> Type {
    let assigned = match (path.get(idx), path.parent(idx)) {
        (Some(node), Some(NodeRef::Expr(Expr::Assign(assign))))
            if assign.lhs.range() == node.range() =>
        {
            Some(typer.type_of(&assign.rhs))
        }
        _ => None,
    };
    let ty = assigned.or_else(|| typer.expected_type(idx)).unwrap_or(Type::Unknown);
    declarable(&ty)
}

/// Where a new field of `decl` goes: after the last field declared before the member
/// holding the reference, else in front of that member when it is a field, else at the
/// usual field position.
fn field_insert(
    text: &str,
    decl: &TypeDecl,
    anchor: Option<usize>,
    field: &str,
) -> (usize, String) {
    if let Some(anchor) = anchor {
        let last_field = decl.members[..anchor]
            .iter()
            .rposition(|member| matches!(member, MemberDecl::Field(_)));
        match last_field {
            Some(idx) => return (decl.members[idx].range().end, format!("\n{field}")),
            None if matches!(decl.members[anchor], MemberDecl::Field(_)) => {
                let start = text::line_start(text, decl.members[anchor].full_start());
                return (start, format!("{field}\n"));
            }
            None => {}
        }
    }
    insert_field(text, decl, field)
}

/// The type a field is declared in, with what the proposal needs to know about it.
struct FieldTarget<'a> {
    file: &'a SourceFile,
    decl: &'a TypeDecl,
    simple_name: &'a str,
    /// Shown as " in type '<T>'" in the label.
    qualified_label: bool,
    visibility: &'static str,
    is_static: bool,
    anchor: Option<usize>,
}

fn field_target<'a>(
    ctx: &CorrectionContext<'a>,
    typer: &Typer<'a>,
    path: &NodePath<'a>,
    reference: &Reference<'a>,
) -> Option<FieldTarget<'a>> {
    let in_anonymous = path.anonymous_class().is_some();
    let (owner, is_static) = match reference {
        Reference::Simple { .. } => {
            let (name, _) = path.enclosing_type()?;
            (name, path.in_static_context())
        }
        Reference::Qualified { receiver, .. } => {
            let (ty, is_static) = match receiver {
                Expr::This(_) => (typer.this_type()?.clone(), false),
                Expr::Super(_) => (typer.super_type()?, false),
                other => match typer.resolve_receiver(other)? {
                    Receiver::Value(ty) => (ty, false),
                    Receiver::Type(name) => (Type::class(name, Vec::new()), true),
                },
            };
            (ty.class_name()?.to_string(), is_static)
        }
    };
    let class = ctx.env().class(&owner)?;
    if !class.is_source() {
        return None;
    }
    let (file, decl) = ctx.workspace.declaration(class)?;
    if !can_declare_members(decl) || decl.is_interface() {
        return None;
    }
    let same_type = path.enclosing_type().is_some_and(|(name, _)| name == class.name);
    let visibility = match (same_type, in_anonymous) {
        (true, false) => "private",
        (true, true) => "protected",
        (false, _) => "public",
    };
    Some(FieldTarget {
        file,
        decl,
        simple_name: class.simple_name(),
        qualified_label: matches!(reference, Reference::Qualified { .. }) || in_anonymous,
        visibility,
        is_static,
        anchor: if same_type && !in_anonymous {
            member_position(path, decl)
        } else {
            None
        },
    })
}

impl UnresolvedVariable {
    /// "Change to '<v>'" for visible variables spelled alike.
    fn similar(
        &self,
        ctx: &CorrectionContext<'_>,
        typer: &Typer<'_>,
        path: &NodePath<'_>,
        reference: &Reference<'_>,
    ) -> Vec<RawProposal> {
        let name = reference.name();
        let enclosing: Vec<String> = path.types().into_iter().map(|(name, _)| name).collect();
        let mut names: Vec<String> = Vec::new();
        match reference {
            Reference::Simple { .. } => {
                names.extend(typer.locals().iter().map(|local| local.name.to_string()));
                for ty in typer.enclosing_types() {
                    names.extend(
                        all_fields(typer.env(), ty).into_iter().map(|f| f.field.name.clone()),
                    );
                }
            }
            Reference::Qualified { receiver, .. } => {
                let owner = match receiver {
                    Expr::This(_) => typer.this_type().cloned(),
                    Expr::Super(_) => typer.super_type(),
                    other => match typer.resolve_receiver(other) {
                        Some(Receiver::Value(ty)) => Some(ty),
                        Some(Receiver::Type(name)) => Some(Type::class(name, Vec::new())),
                        None => None,
                    },
                };
                if let Some(owner) = owner {
                    names.extend(
                        all_fields(typer.env(), &owner)
                            .into_iter()
                            .filter(|f| {
                                f.field.visibility != Visibility::Private
                                    || enclosing.contains(&f.declaring.name)
                            })
                            .map(|f| f.field.name.clone()),
                    );
                }
            }
        }
        let mut scored: Vec<(i32, String)> = names
            .into_iter()
            .filter(|candidate| candidate != name)
            .filter_map(|candidate| similarity(name, &candidate).map(|score| (score, candidate)))
            .collect();
        scored.sort_by(|a, b| {
            b.0.cmp(&a.0)
                .then_with(|| cmp_by_match(name, &a.1, &b.1))
                .then_with(|| a.1.cmp(&b.1))
        });
        scored.dedup_by(|a, b| a.1 == b.1);
        scored
            .into_iter()
            .map(|(_, candidate)| {
                RawProposal::quick_fix(
                    format!("Change to '{candidate}'"),
                    relevance::CHANGE_TO_SIMILAR_VARIABLE,
                )
                    .replace(ctx.file_id(), reference.range(), candidate)
            })
            .collect()
    }

    /// "Create local variable '<n>'": the assignment becomes a declaration, or the
    /// declaration goes in front of the statement using the name.
    fn local(
        &self,
        ctx: &CorrectionContext<'_>,
        path: &NodePath<'_>,
        idx: usize,
        name: &str,
        ty: &Type,
    ) -> Option<RawProposal> {
        let site = path.enclosing_statement()?;
        let mut imports = ctx.import_rewrite();
        let ty_text = imports.type_text(ty);
        let raw = RawProposal::quick_fix(
            format!("Create local variable '{name}'"),
            relevance::CREATE_LOCAL,
        );
        let raw = match assignment_statement(path, idx) {
            Some((_, value)) => {
                let start = path.get(idx)?.range().start;
                raw.replace(
                    ctx.file_id(),
                    Span::new(start, value.range().start),
                    format!("{ty_text} {name} = "),
                )
            }
            None => {
                let start = site.stmt.range().start;
                let indent = text::indentation_at(ctx.text(), start);
                raw.insert(ctx.file_id(), start, format!("{ty_text} {name};\n{indent}"))
            }
        };
        Some(raw.with_changes(imports.changes()))
    }

    /// "Create field '<n>'" or, for a constant, "Create constant '<N>'".
    fn field(
        &self,
        ctx: &CorrectionContext<'_>,
        target: &FieldTarget<'_>,
        name: &str,
        ty: &Type,
        constant: bool,
    ) -> RawProposal {
        let mut imports = ctx.import_rewrite_for(target.file);
        let ty_text = imports.type_text(ty);
        let indent = member_indent(&target.file.text, target.decl, ctx.indent_unit());
        let (label, relevance, line) = if constant {
            let value = ty.default_value().unwrap_or("null");
            (
                format!("Create constant '{name}'"),
                relevance::CREATE_CONSTANT,
                format!("{indent}private static final {ty_text} {name} = {value};"),
            )
        } else {
            let modifiers = if target.is_static {
                format!("{} static", target.visibility)
            } else {
                target.visibility.to_string()
            };
            let mut label = format!("Create field '{name}'");
            if target.qualified_label {
                label.push_str(&format!(" in type '{}'", target.simple_name));
            }
            (label, relevance::CREATE_FIELD, format!("{indent}{modifiers} {ty_text} {name};"))
        };
        let (offset, insert) = field_insert(&target.file.text, target.decl, target.anchor, &line);
        RawProposal::quick_fix(label, relevance)
            .insert(&target.file.id, offset, insert)
            .with_changes(imports.changes())
    }

    /// "Create parameter '<n>'" appended to the enclosing method.
    fn parameter(
        &self,
        ctx: &CorrectionContext<'_>,
        path: &NodePath<'_>,
        name: &str,
        ty: &Type,
    ) -> Option<RawProposal> {
        let method = path.enclosing_method()?;
        let mut imports = ctx.import_rewrite();
        let ty_text = imports.type_text(ty);
        let close = method.params_range.end - 1;
        let param = if method.params.is_empty() {
            format!("{ty_text} {name}")
        } else {
            format!(", {ty_text} {name}")
        };
        Some(
            RawProposal::quick_fix(
                format!("Create parameter '{name}'"),
                relevance::CREATE_PARAMETER,
            )
                .insert(ctx.file_id(), close, param)
                .with_changes(imports.changes()),
        )
    }
}

impl Corrector for UnresolvedVariable {
    fn name(&self) -> &'static str {
        "unresolved-variable"
    }

    fn propose(&self, ctx: &CorrectionContext<'_>, diagnostic: &Diagnostic) -> Vec<RawProposal> {
        let path = ctx.path(diagnostic.range);
        let Some((idx, reference)) = reference(&path, diagnostic.range) else {
            return Vec::new();
        };
        let typer = ctx.typer(&path);
        let name = reference.name();
        let ty = inferred_type(&typer, &path, idx);

        let mut out = self.similar(ctx, &typer, &path, &reference);
        let is_simple = matches!(reference, Reference::Simple { .. });
        if is_simple {
            out.extend(self.local(ctx, &path, idx, name, &ty));
        }
        let target = field_target(ctx, &typer, &path, &reference);
        if let Some(target) = &target {
            out.push(self.field(ctx, target, name, &ty, false));
        }
        if is_simple {
            out.extend(self.parameter(ctx, &path, name, &ty));
            if name.starts_with(|c: char| c.is_ascii_uppercase()) {
                if let Some(target) = &target {
                    out.push(self.field(ctx, target, name, &ty, true));
                }
            }
            if let Some((stmt, _)) = assignment_statement(&path, idx) {
                out.push(
                    RawProposal::quick_fix("Remove assignment", relevance::REMOVE_ASSIGNMENT)
                        .delete_lines(ctx.file_id(), stmt.range()),
                );
            }
        }
        tracing::debug!(
            target: "mend.correction",
            name,
            ty = %ty.simple_display(),
            count = out.len(),
            "unresolved variable proposals"
        );
        out
    }
}
