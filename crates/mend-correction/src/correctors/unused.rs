//! Removal of unused private members, locals, parameters and type parameters.

use mend_core::{text, Diagnostic, FileId, Span};
use mend_syntax::ast::{
    Expr, FieldDecl, LocalVarStmt, MethodDecl, Stmt, TypeDecl, TypeParam, VarDeclarator,
};
use mend_syntax::visit::{walk, NodeRef};

use crate::context::{CorrectionContext, NodePath};
use crate::dispatch::Corrector;
use crate::proposal::RawProposal;
use crate::relevance;

/// What the diagnostic's name declares.
#[derive(Debug, Clone, Copy)]
enum Target<'a> {
    Field {
        field: &'a FieldDecl,
        idx: usize,
        owner: &'a TypeDecl,
    },
    Local {
        stmt: &'a Stmt,
        decl: &'a LocalVarStmt,
        idx: usize,
        scope: NodeRef<'a>,
    },
    Param {
        method: &'a MethodDecl,
        idx: usize,
    },
    Method(&'a MethodDecl),
    Type(&'a TypeDecl),
    TypeParam {
        params: &'a [TypeParam],
        list_range: Option<Span>,
        idx: usize,
    },
}

fn find_target<'a>(path: &NodePath<'a>, range: Span) -> Option<Target<'a>> {
    let nodes = path.nodes();
    for (pos, node) in nodes.iter().enumerate().rev() {
        match node {
            NodeRef::Declarator(declarator) if declarator.name_range.intersects(range) => {
                return match path.parent(pos)? {
                    NodeRef::Field(field) => Some(Target::Field {
                        field,
                        idx: position(&field.declarators, declarator)?,
                        owner: enclosing_type_decl(nodes, pos)?,
                    }),
                    NodeRef::Stmt(stmt) => {
                        let Stmt::LocalVar(decl) = stmt else {
                            return None;
                        };
                        Some(Target::Local {
                            stmt,
                            decl,
                            idx: position(&decl.declarators, declarator)?,
                            scope: body_root(nodes, pos)?,
                        })
                    }
                    _ => None,
                };
            }
            NodeRef::Param(param) if param.name_range.intersects(range) => {
                let NodeRef::Method(method) = path.parent(pos)? else {
                    return None;
                };
                let idx = method.params.iter().position(|p| std::ptr::eq(p, *param))?;
                return Some(Target::Param { method, idx });
            }
            NodeRef::Method(method) => {
                if method.name_range.intersects(range) {
                    return Some(Target::Method(method));
                }
                if let Some(idx) = type_param_at(&method.type_params, range) {
                    return Some(Target::TypeParam {
                        params: &method.type_params,
                        list_range: method.type_params_range,
                        idx,
                    });
                }
            }
            NodeRef::Type(decl) => {
                if decl.name_range.intersects(range) {
                    return Some(Target::Type(decl));
                }
                if let Some(idx) = type_param_at(&decl.type_params, range) {
                    return Some(Target::TypeParam {
                        params: &decl.type_params,
                        list_range: decl.type_params_range,
                        idx,
                    });
                }
            }
            _ => {}
        }
    }
    None
}

fn position(declarators: &[VarDeclarator], target: &VarDeclarator) -> Option<usize> {
    declarators.iter().position(|d| std::ptr::eq(d, target))
}

fn type_param_at(params: &[TypeParam], range: Span) -> Option<usize> {
    params.iter().position(|tp| tp.name_range.intersects(range))
}

fn enclosing_type_decl<'a>(nodes: &[NodeRef<'a>], below: usize) -> Option<&'a TypeDecl> {
    nodes[..below].iter().rev().find_map(|node| match node {
        NodeRef::Type(decl) => Some(*decl),
        _ => None,
    })
}

fn body_root<'a>(nodes: &[NodeRef<'a>], below: usize) -> Option<NodeRef<'a>> {
    nodes[..below]
        .iter()
        .rev()
        .find(|node| matches!(node, NodeRef::Method(_) | NodeRef::Initializer(_)))
        .copied()
}

/// A write to the removed variable.
enum Write<'a> {
    /// `x = rhs;`, `x += rhs;`, `x++;` as a statement of its own.
    Statement { range: Span, rhs: Option<&'a Expr> },
    /// An assignment nested in a larger expression; it is replaced by its right-hand side.
    Nested { range: Span, rhs: &'a Expr },
}

fn is_variable(expr: &Expr, name: &str, allow_this: bool) -> bool {
    match expr.unparenthesized() {
        Expr::Name(n) => n.name == name,
        Expr::FieldAccess(access) => {
            allow_this && access.name == name && matches!(*access.receiver, Expr::This(_))
        }
        _ => false,
    }
}

fn writes<'a>(root: NodeRef<'a>, name: &str, is_field: bool) -> Vec<Write<'a>> {
    let mut out = Vec::new();
    walk(root, &mut |node| {
        match node {
            NodeRef::Stmt(Stmt::Expr(stmt)) => match &stmt.expr {
                Expr::Assign(assign) if is_variable(&assign.lhs, name, is_field) => {
                    out.push(Write::Statement {
                        range: stmt.range,
                        rhs: Some(&*assign.rhs),
                    });
                    return false;
                }
                Expr::Unary(unary)
                    if matches!(unary.op.as_str(), "++" | "--")
                        && is_variable(&unary.operand, name, is_field) =>
                {
                    out.push(Write::Statement {
                        range: stmt.range,
                        rhs: None,
                    });
                    return false;
                }
                _ => {}
            },
            NodeRef::Expr(Expr::Assign(assign)) if is_variable(&assign.lhs, name, is_field) => {
                out.push(Write::Nested {
                    range: assign.range,
                    rhs: &*assign.rhs,
                });
                return false;
            }
            _ => {}
        }
        true
    });
    out
}

/// Delete simple assignments to the variable. A right-hand side with side effects
/// survives as an expression statement.
fn push_writes(raw: &mut RawProposal, file: &FileId, source: &str, writes: &[Write<'_>]) {
    for write in writes {
        match write {
            Write::Statement { range, rhs } => match rhs {
                Some(rhs) if rhs.has_side_effects() => {
                    raw.push_replace(file, *range, format!("{};", rhs.range().slice(source)));
                }
                _ => raw.push_delete_lines(file, *range),
            },
            Write::Nested { range, rhs } => {
                raw.push_replace(file, *range, rhs.range().slice(source));
            }
        }
    }
}

/// Remove one declarator of a field declaration, or the whole declaration.
fn remove_field_declarator(raw: &mut RawProposal, file: &FileId, field: &FieldDecl, idx: usize) {
    let declarators = &field.declarators;
    if declarators.len() == 1 {
        let start = field.javadoc.as_ref().map_or(field.range.start, |doc| {
            doc.range.start.min(field.range.start)
        });
        raw.push_delete_lines(file, Span::new(start, field.range.end));
        return;
    }
    raw.push_delete(file, declarator_removal(declarators, idx));
}

/// The text between neighbouring declarators that goes with `declarators[idx]`.
fn declarator_removal(declarators: &[VarDeclarator], idx: usize) -> Span {
    let own = declarators[idx].range;
    match (idx.checked_sub(1).map(|p| &declarators[p]), declarators.get(idx + 1)) {
        (Some(prev), _) => Span::new(prev.range.end, own.end),
        (None, Some(next)) => Span::new(own.start, next.range.start),
        (None, None) => own,
    }
}

/// Remove one declarator of a local declaration. An initializer with side effects
/// survives as an expression statement, splitting the declaration around it.
fn remove_local_declarator(
    raw: &mut RawProposal,
    file: &FileId,
    source: &str,
    stmt: &Stmt,
    decl: &LocalVarStmt,
    idx: usize,
) {
    let declarators = &decl.declarators;
    let own = &declarators[idx];
    let kept_init = own
        .init
        .as_ref()
        .filter(|init| init.has_side_effects())
        .map(|init| init.range().slice(source));

    let Some(init) = kept_init else {
        if declarators.len() == 1 {
            raw.push_delete_lines(file, stmt.range());
        } else {
            raw.push_delete(file, declarator_removal(declarators, idx));
        }
        return;
    };

    let indent = text::indentation_at(source, decl.range.start);
    let header = &source[decl.range.start..declarators[0].range.start];
    let prev = idx.checked_sub(1).map(|p| &declarators[p]);
    let next = declarators.get(idx + 1);
    match (prev, next) {
        (Some(prev), Some(next)) => raw.push_replace(
            file,
            Span::new(prev.range.end, next.range.start),
            format!(";\n{indent}{init};\n{indent}{header}"),
        ),
        (Some(prev), None) => raw.push_replace(
            file,
            Span::new(prev.range.end, own.range.end),
            format!(";\n{indent}{init}"),
        ),
        (None, Some(next)) => raw.push_replace(
            file,
            Span::new(decl.range.start, next.range.start),
            format!("{init};\n{indent}{header}"),
        ),
        (None, None) => raw.push_replace(file, stmt.range(), format!("{init};")),
    }
}

/// Remove `params[idx]` together with the separating comma.
fn remove_param(raw: &mut RawProposal, file: &FileId, method: &MethodDecl, idx: usize) {
    let params = &method.params;
    let own = params[idx].range;
    let range = match (idx.checked_sub(1).map(|p| &params[p]), params.get(idx + 1)) {
        (Some(prev), _) => Span::new(prev.range.end, own.end),
        (None, Some(next)) => Span::new(own.start, next.range.start),
        (None, None) => own,
    };
    raw.push_delete(file, range);
    if let Some(tag) = method
        .javadoc
        .as_ref()
        .and_then(|doc| doc.param_tag(&params[idx].name))
    {
        raw.push_delete(file, tag.lines);
    }
}

fn remove_type_param(
    raw: &mut RawProposal,
    file: &FileId,
    params: &[TypeParam],
    list_range: Option<Span>,
    idx: usize,
) {
    let range = if params.len() == 1 {
        match list_range {
            Some(range) => range,
            None => return,
        }
    } else {
        let own = params[idx].range;
        match (idx.checked_sub(1).map(|p| &params[p]), params.get(idx + 1)) {
            (Some(prev), _) => Span::new(prev.range.end, own.end),
            (None, Some(next)) => Span::new(own.start, next.range.start),
            (None, None) => own,
        }
    };
    raw.push_delete(file, range);
}

fn member_lines(start_with_doc: usize, range: Span) -> Span {
    Span::new(start_with_doc.min(range.start), range.end)
}

/// "Remove '<name>', keep assignments with side effects" and "Remove
/// method/constructor/type/type parameter '<name>'".
pub struct UnusedDeclaration;

impl UnusedDeclaration {
    fn variable_proposals(
        ctx: &CorrectionContext<'_>,
        name: &str,
        remove_declaration: impl FnOnce(&mut RawProposal),
        writes: &[Write<'_>],
    ) -> Vec<RawProposal> {
        let mut raw = RawProposal::quick_fix(
            format!("Remove '{name}', keep assignments with side effects"),
            relevance::REMOVE_UNUSED_KEEP_SIDE_EFFECTS,
        );
        remove_declaration(&mut raw);
        push_writes(&mut raw, ctx.file_id(), ctx.text(), writes);
        vec![raw]
    }
}

impl Corrector for UnusedDeclaration {
    fn name(&self) -> &'static str {
        "unused-declaration"
    }

    fn propose(&self, ctx: &CorrectionContext<'_>, diagnostic: &Diagnostic) -> Vec<RawProposal> {
        let path = ctx.path(diagnostic.range);
        let Some(target) = find_target(&path, diagnostic.range) else {
            return Vec::new();
        };
        let file = ctx.file_id();
        let source = ctx.text();
        match target {
            Target::Field { field, idx, owner } => {
                let name = field.declarators[idx].name.as_str();
                let writes = writes(NodeRef::Type(owner), name, true);
                Self::variable_proposals(
                    ctx,
                    name,
                    |raw| remove_field_declarator(raw, file, field, idx),
                    &writes,
                )
            }
            Target::Local {
                stmt,
                decl,
                idx,
                scope,
            } => {
                let name = decl.declarators[idx].name.as_str();
                let writes = writes(scope, name, false);
                Self::variable_proposals(
                    ctx,
                    name,
                    |raw| remove_local_declarator(raw, file, source, stmt, decl, idx),
                    &writes,
                )
            }
            Target::Param { method, idx } => {
                let name = method.params[idx].name.as_str();
                let writes = writes(NodeRef::Method(method), name, false);
                Self::variable_proposals(
                    ctx,
                    name,
                    |raw| remove_param(raw, file, method, idx),
                    &writes,
                )
            }
            Target::Method(method) => {
                let what = if method.is_constructor() {
                    "constructor"
                } else {
                    "method"
                };
                let start = method.javadoc.as_ref().map_or(method.range.start, |d| d.range.start);
                vec![RawProposal::quick_fix(
                    format!("Remove {what} '{}'", method.name),
                    relevance::REMOVE_UNUSED,
                )
                .delete_lines(file, member_lines(start, method.range))]
            }
            Target::Type(decl) => {
                let start = decl.javadoc.as_ref().map_or(decl.range.start, |d| d.range.start);
                vec![RawProposal::quick_fix(
                    format!("Remove type '{}'", decl.name),
                    relevance::REMOVE_UNUSED,
                )
                .delete_lines(file, member_lines(start, decl.range))]
            }
            Target::TypeParam {
                params,
                list_range,
                idx,
            } => {
                let mut raw = RawProposal::quick_fix(
                    format!("Remove type parameter '{}'", params[idx].name),
                    relevance::REMOVE_UNUSED,
                );
                remove_type_param(&mut raw, file, params, list_range, idx);
                vec![raw]
            }
        }
    }
}
