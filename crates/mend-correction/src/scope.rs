//! Local variables visible at a point in a method body.

use mend_core::Span;
use mend_syntax::ast::{Expr, LocalVarStmt, Resource, Stmt, TypeRef};
use mend_syntax::visit::NodeRef;

use crate::context::NodePath;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LocalKind {
    Parameter,
    Local,
    LambdaParameter,
    Resource,
    CatchParameter,
    LoopVariable,
}

#[derive(Debug, Clone, Copy)]
pub struct LocalVar<'a> {
    pub name: &'a str,
    /// `None` for implicitly typed lambda parameters.
    pub ty: Option<&'a TypeRef>,
    /// Extra array dimensions: C-style brackets after the name, or one for varargs.
    pub dims: usize,
    pub kind: LocalKind,
    pub name_range: Span,
    pub init: Option<&'a Expr>,
}

impl LocalVar<'_> {
    pub fn is_parameter(&self) -> bool {
        matches!(self.kind, LocalKind::Parameter | LocalKind::LambdaParameter)
    }
}

fn push_decl<'a>(
    out: &mut Vec<LocalVar<'a>>,
    decl: &'a LocalVarStmt,
    kind: LocalKind,
    before: usize,
) {
    for declarator in &decl.declarators {
        if declarator.range.end > before {
            break;
        }
        out.push(LocalVar {
            name: &declarator.name,
            ty: Some(&decl.ty),
            dims: declarator.dims,
            kind,
            name_range: declarator.name_range,
            init: declarator.init.as_ref(),
        });
    }
}

fn push_statements<'a>(out: &mut Vec<LocalVar<'a>>, statements: &'a [Stmt], offset: usize) {
    for stmt in statements {
        if stmt.range().start >= offset {
            break;
        }
        if let Stmt::LocalVar(decl) = stmt {
            push_decl(out, decl, LocalKind::Local, offset);
        }
    }
}

/// Locals, parameters and other block-scoped variables visible at `offset`, outermost
/// first. Later entries shadow earlier ones with the same name.
pub fn visible_locals<'a>(path: &NodePath<'a>, offset: usize) -> Vec<LocalVar<'a>> {
    let mut out = Vec::new();
    for (idx, node) in path.nodes().iter().enumerate() {
        match node {
            NodeRef::Type(_) => {
                // Member and local classes start a fresh scope for our purposes, except
                // that locals of an enclosing method stay visible to local classes.
                if !matches!(path.parent(idx), Some(NodeRef::Stmt(Stmt::LocalType(_)))) {
                    out.clear();
                }
            }
            NodeRef::Method(method) => {
                out.extend(method.params.iter().map(|param| LocalVar {
                    name: &param.name,
                    ty: Some(&param.ty),
                    dims: usize::from(param.varargs),
                    kind: LocalKind::Parameter,
                    name_range: param.name_range,
                    init: None,
                }));
            }
            NodeRef::Expr(Expr::Lambda(lambda)) => {
                out.extend(lambda.params.iter().map(|param| LocalVar {
                    name: &param.name,
                    ty: param.ty.as_ref(),
                    dims: 0,
                    kind: LocalKind::LambdaParameter,
                    name_range: param.name_range,
                    init: None,
                }));
            }
            NodeRef::Block(block) => push_statements(&mut out, &block.statements, offset),
            NodeRef::Stmt(Stmt::Block(block)) => {
                push_statements(&mut out, &block.statements, offset)
            }
            NodeRef::Stmt(Stmt::Switch(switch)) => {
                push_statements(&mut out, &switch.statements, offset)
            }
            NodeRef::Stmt(Stmt::For(for_stmt)) => {
                for init in &for_stmt.init {
                    if let Stmt::LocalVar(decl) = init {
                        push_decl(&mut out, decl, LocalKind::Local, offset);
                    }
                }
            }
            NodeRef::Stmt(Stmt::ForEach(for_each)) => {
                if for_each.var.range.end <= offset {
                    out.push(LocalVar {
                        name: &for_each.var.name,
                        ty: Some(&for_each.var.ty),
                        dims: 0,
                        kind: LocalKind::LoopVariable,
                        name_range: for_each.var.name_range,
                        init: None,
                    });
                }
            }
            NodeRef::Stmt(Stmt::Try(try_stmt)) => {
                for resource in &try_stmt.resources {
                    if let Resource::Decl(decl) = resource {
                        push_decl(&mut out, decl, LocalKind::Resource, offset);
                    }
                }
            }
            NodeRef::Catch(catch) => {
                if let Some(first) = catch.types.first() {
                    out.push(LocalVar {
                        name: &catch.name,
                        ty: Some(first),
                        dims: 0,
                        kind: LocalKind::CatchParameter,
                        name_range: catch.name_range,
                        init: None,
                    });
                }
            }
            _ => {}
        }
    }
    out
}

/// The innermost visible local named `name`.
pub fn find_local<'l, 'a>(locals: &'l [LocalVar<'a>], name: &str) -> Option<&'l LocalVar<'a>> {
    locals.iter().rev().find(|local| local.name == name)
}

/// Every variable name declared anywhere in the innermost method or initializer,
/// nested blocks, lambdas and catch clauses included.
pub fn declared_names<'a>(path: &NodePath<'a>) -> Vec<&'a str> {
    match path
        .nodes()
        .iter()
        .rev()
        .find(|node| matches!(node, NodeRef::Method(_) | NodeRef::Initializer(_)))
    {
        Some(root) => declared_in(*root),
        None => Vec::new(),
    }
}

/// Every variable name declared below `root`, not descending into nested types.
pub fn declared_in(root: NodeRef<'_>) -> Vec<&str> {
    let mut names = Vec::new();
    mend_syntax::visit::walk(root, &mut |node| {
        match node {
            NodeRef::Param(param) => names.push(param.name.as_str()),
            NodeRef::Declarator(decl) => names.push(decl.name.as_str()),
            NodeRef::Catch(catch) => names.push(catch.name.as_str()),
            NodeRef::Expr(Expr::Lambda(lambda)) => {
                names.extend(lambda.params.iter().map(|p| p.name.as_str()))
            }
            NodeRef::Type(_) => return false,
            _ => {}
        }
        true
    });
    names
}
