//! Rewriting the declared type of variables and the return type of methods.

use mend_core::{text, Span};
use mend_syntax::ast::{Expr, FieldDecl, LocalVarStmt, MethodDecl, Param, Stmt, VarDeclarator};
use mend_syntax::visit::{walk, walk_unit, NodeRef};
use mend_types::Type;

use crate::context::CorrectionContext;
use crate::proposal::RawProposal;
use crate::typing::{Receiver, Typer};
use crate::workspace::SourceFile;

/// The declaration of a variable, located in its source file.
#[derive(Debug, Clone, Copy)]
pub enum VarDecl<'a> {
    /// A local variable statement and the index of the declarator.
    Local(&'a LocalVarStmt, usize),
    /// A field declaration and the index of the declarator.
    Field(&'a FieldDecl, usize),
    Param(&'a Param),
}

impl<'a> VarDecl<'a> {
    pub fn name(&self) -> &'a str {
        match *self {
            VarDecl::Local(stmt, idx) => &stmt.declarators[idx].name,
            VarDecl::Field(field, idx) => &field.declarators[idx].name,
            VarDecl::Param(param) => &param.name,
        }
    }
}

/// A variable declaration together with the file that holds it.
#[derive(Clone, Copy)]
pub struct VarSite<'a> {
    pub file: &'a SourceFile,
    pub decl: VarDecl<'a>,
}

/// Find the declaration whose name sits at `name_range` below `root`.
pub fn find_decl(root: NodeRef<'_>, name_range: Span) -> Option<VarDecl<'_>> {
    let mut found = None;
    walk(root, &mut |node| {
        if found.is_some() || !node.range().contains_span(name_range) {
            return false;
        }
        found = match node {
            NodeRef::Field(field) => declarator_index(&field.declarators, name_range)
                .map(|idx| VarDecl::Field(field, idx)),
            NodeRef::Stmt(Stmt::LocalVar(stmt)) => declarator_index(&stmt.declarators, name_range)
                .map(|idx| VarDecl::Local(stmt, idx)),
            NodeRef::Param(param) if param.name_range == name_range => Some(VarDecl::Param(param)),
            _ => None,
        };
        found.is_none()
    });
    found
}

fn declarator_index(declarators: &[VarDeclarator], name_range: Span) -> Option<usize> {
    declarators.iter().position(|d| d.name_range == name_range)
}

fn find_in_file(file: &SourceFile, name_range: Span) -> Option<VarDecl<'_>> {
    let mut found = None;
    walk_unit(&file.unit, &mut |node| {
        if found.is_some() {
            return false;
        }
        if let NodeRef::Type(decl) = node {
            if decl.range.contains_span(name_range) {
                found = find_decl(node, name_range);
            }
            return false;
        }
        true
    });
    found
}

/// The source declaration of the variable `expr` reads: a local, a parameter or a
/// field of a workspace type.
pub fn variable_of<'a>(
    ctx: &CorrectionContext<'a>,
    typer: &Typer<'a>,
    expr: &Expr,
) -> Option<VarSite<'a>> {
    let field = match expr.unparenthesized() {
        Expr::Name(name) => {
            if let Some(local) = typer.local(&name.name) {
                let decl = find_in_file(ctx.file, local.name_range)?;
                return Some(VarSite { file: ctx.file, decl });
            }
            typer.visible_field(&name.name)?
        }
        Expr::FieldAccess(access) => {
            let owner = match typer.resolve_receiver(&access.receiver)? {
                Receiver::Value(ty) => ty,
                Receiver::Type(name) => Type::class(name, Vec::new()),
            };
            mend_types::field(typer.env(), &owner, &access.name)?
        }
        _ => return None,
    };
    let name_range = field.field.name_range?;
    let (file, _) = ctx.workspace.declaration(field.declaring)?;
    let decl = find_in_file(file, name_range)?;
    Some(VarSite { file, decl })
}

/// Give the variable the type written `ty_text`. A declarator sharing its statement
/// with others is split out into a declaration of its own.
pub fn push_var_type(raw: &mut RawProposal, site: VarSite<'_>, ty_text: &str) {
    let source = site.file.text.as_str();
    let file = &site.file.id;
    let (modifiers, ty, declarators, idx, range) = match site.decl {
        VarDecl::Param(param) => {
            let end = if param.varargs {
                param.ty.range.end + source[param.ty.range.end..].find("...").map_or(0, |i| i + 3)
            } else {
                param.ty.range.end
            };
            raw.push_replace(file, Span::new(param.ty.range.start, end), ty_text);
            return;
        }
        VarDecl::Local(stmt, idx) => (
            &stmt.modifiers,
            &stmt.ty,
            &stmt.declarators,
            idx,
            stmt.range,
        ),
        VarDecl::Field(field, idx) => (
            &field.modifiers,
            &field.ty,
            &field.declarators,
            idx,
            field.range,
        ),
    };
    let target = &declarators[idx];
    if declarators.len() == 1 {
        if target.dims > 0 {
            raw.push_delete(file, Span::new(target.name_range.end, dims_end(source, target)));
        }
        raw.push_replace(file, ty.range, ty_text);
        return;
    }

    let start = modifiers.start().unwrap_or(ty.range.start).min(ty.range.start);
    let prefix = &source[start..ty.range.start];
    let indent = text::indentation_at(source, start);
    let declared = ty.range.slice(source);
    let mut groups: Vec<(&str, Vec<&str>)> = Vec::new();
    for (i, declarator) in declarators.iter().enumerate() {
        let decl_text = declarator.range.slice(source);
        let joins_previous = i != idx && i != idx + 1;
        match groups.last_mut() {
            Some((_, items)) if joins_previous => items.push(decl_text),
            _ => groups.push((if i == idx { ty_text } else { declared }, vec![decl_text])),
        }
    }
    let statements: Vec<String> = groups
        .iter()
        .map(|(group_ty, items)| format!("{prefix}{group_ty} {};", items.join(", ")))
        .collect();
    raw.push_replace(file, Span::new(start, range.end), statements.join(&format!("\n{indent}")));
}

fn dims_end(source: &str, declarator: &VarDeclarator) -> usize {
    let mut end = declarator.name_range.end;
    let bytes = source.as_bytes();
    let mut remaining = declarator.dims;
    while remaining > 0 && end < bytes.len() {
        if bytes[end] == b']' {
            remaining -= 1;
        }
        end += 1;
    }
    end
}

/// Give `method` the return type written `ty_text`; `None` for constructors.
pub fn push_return_type(
    raw: &mut RawProposal,
    file: &SourceFile,
    method: &MethodDecl,
    ty_text: &str,
) -> Option<()> {
    let ret = method.return_ty.as_ref()?;
    raw.push_replace(&file.id, ret.range, ty_text);
    Some(())
}
