//! The per-request view handed to correctors.

use mend_config::CorrectionConfig;
use mend_core::{text, Diagnostic, FileId, Span};
use mend_syntax::ast::{
    Block, CompilationUnit, Expr, FieldDecl, InitializerDecl, LambdaExpr, MethodDecl, NewExpr,
    Stmt, SwitchStmt, TryStmt, TypeDecl,
};
use mend_syntax::visit::{covering_path, NodeRef};
use mend_types::TypeEnv;

use crate::imports::ImportRewrite;
use crate::typing::Typer;
use crate::workspace::{SourceFile, Workspace};

pub struct CorrectionContext<'a> {
    pub workspace: &'a Workspace,
    pub file: &'a SourceFile,
    pub diagnostics: &'a [Diagnostic],
    pub selection: Span,
    pub config: &'a CorrectionConfig,
    indent_unit: String,
}

impl<'a> CorrectionContext<'a> {
    pub fn new(
        workspace: &'a Workspace,
        file: &'a SourceFile,
        diagnostics: &'a [Diagnostic],
        selection: Span,
        config: &'a CorrectionConfig,
    ) -> Self {
        Self {
            workspace,
            file,
            diagnostics,
            selection,
            config,
            indent_unit: text::detect_indent_unit(&file.text),
        }
    }

    pub fn text(&self) -> &'a str {
        &self.file.text
    }

    pub fn unit(&self) -> &'a CompilationUnit {
        &self.file.unit
    }

    pub fn file_id(&self) -> &'a FileId {
        &self.file.id
    }

    pub fn env(&self) -> &'a dyn TypeEnv {
        self.workspace.env()
    }

    /// One level of indentation as used by this file.
    pub fn indent_unit(&self) -> &str {
        &self.indent_unit
    }

    /// Nodes covering `span`, outermost first.
    pub fn path(&self, span: Span) -> NodePath<'a> {
        NodePath {
            package: self.file.package(),
            nodes: covering_path(&self.file.unit, span),
        }
    }

    /// Expression typing at the innermost node of `path`.
    pub fn typer(&self, path: &NodePath<'a>) -> Typer<'a> {
        Typer::new(self.workspace, self.file, path)
    }

    pub fn import_rewrite(&self) -> ImportRewrite<'a> {
        ImportRewrite::new(self.env(), self.file)
    }

    pub fn import_rewrite_for(&self, file: &'a SourceFile) -> ImportRewrite<'a> {
        ImportRewrite::new(self.env(), file)
    }
}

/// The declaration a piece of code executes in.
#[derive(Debug, Clone, Copy)]
pub enum BodyDecl<'a> {
    Method(&'a MethodDecl),
    Initializer(&'a InitializerDecl),
    Field(&'a FieldDecl),
    Lambda(&'a LambdaExpr),
}

/// Statement list that owns a statement.
#[derive(Debug, Clone, Copy)]
pub enum StmtContainer<'a> {
    Block(&'a Block),
    Switch(&'a SwitchStmt),
}

impl<'a> StmtContainer<'a> {
    pub fn statements(&self) -> &'a [Stmt] {
        match self {
            StmtContainer::Block(block) => &block.statements,
            StmtContainer::Switch(switch) => &switch.statements,
        }
    }
}

/// A statement together with the list it belongs to.
#[derive(Debug, Clone, Copy)]
pub struct StmtSite<'a> {
    pub stmt: &'a Stmt,
    pub container: StmtContainer<'a>,
    pub index: usize,
    /// Position of the statement in the node path.
    pub depth: usize,
}

impl<'a> StmtSite<'a> {
    pub fn siblings(&self) -> &'a [Stmt] {
        self.container.statements()
    }

    pub fn following(&self) -> &'a [Stmt] {
        &self.siblings()[self.index + 1..]
    }
}

/// A covering node path, outermost first.
#[derive(Debug, Clone)]
pub struct NodePath<'a> {
    package: &'a str,
    nodes: Vec<NodeRef<'a>>,
}

impl<'a> NodePath<'a> {
    pub fn nodes(&self) -> &[NodeRef<'a>] {
        &self.nodes
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn last(&self) -> Option<NodeRef<'a>> {
        self.nodes.last().copied()
    }

    pub fn get(&self, idx: usize) -> Option<NodeRef<'a>> {
        self.nodes.get(idx).copied()
    }

    pub fn parent(&self, idx: usize) -> Option<NodeRef<'a>> {
        idx.checked_sub(1).and_then(|p| self.get(p))
    }

    /// The path up to and including `idx`.
    pub fn prefix(&self, idx: usize) -> NodePath<'a> {
        NodePath {
            package: self.package,
            nodes: self.nodes[..=idx.min(self.nodes.len().saturating_sub(1))].to_vec(),
        }
    }

    /// The innermost expression whose range is exactly `span`, or failing that the
    /// innermost expression on the path.
    pub fn expr_at(&self, span: Span) -> Option<(usize, &'a Expr)> {
        let exprs = || {
            self.nodes.iter().enumerate().rev().filter_map(|(idx, node)| match node {
                NodeRef::Expr(expr) => Some((idx, *expr)),
                _ => None,
            })
        };
        exprs()
            .find(|(_, expr)| expr.range() == span)
            .or_else(|| exprs().next())
    }

    /// The innermost expression on the path that satisfies `pred`.
    pub fn find_expr(&self, pred: impl Fn(&Expr) -> bool) -> Option<(usize, &'a Expr)> {
        self.nodes.iter().enumerate().rev().find_map(|(idx, node)| match node {
            NodeRef::Expr(expr) if pred(expr) => Some((idx, *expr)),
            _ => None,
        })
    }

    /// Enclosing type declarations with their qualified names, outermost first. Local
    /// types get their simple name.
    pub fn types(&self) -> Vec<(String, &'a TypeDecl)> {
        let mut out: Vec<(String, &'a TypeDecl)> = Vec::new();
        for (idx, node) in self.nodes.iter().enumerate() {
            let NodeRef::Type(decl) = node else {
                continue;
            };
            let name = match (idx, self.parent(idx)) {
                (0, _) if self.package.is_empty() => decl.name.clone(),
                (0, _) => format!("{}.{}", self.package, decl.name),
                (_, Some(NodeRef::Type(_))) => match out.last() {
                    Some((outer, _)) => format!("{outer}.{}", decl.name),
                    None => decl.name.clone(),
                },
                _ => decl.name.clone(),
            };
            out.push((name, *decl));
        }
        out
    }

    pub fn enclosing_type(&self) -> Option<(String, &'a TypeDecl)> {
        self.types().pop()
    }

    /// The innermost anonymous class creation enclosing the path, if it is nested deeper
    /// than the innermost type declaration.
    pub fn anonymous_class(&self) -> Option<&'a NewExpr> {
        for node in self.nodes.iter().rev() {
            match node {
                NodeRef::Type(_) => return None,
                NodeRef::Expr(Expr::New(new)) if new.body.is_some() => return Some(new),
                _ => {}
            }
        }
        None
    }

    /// The innermost method, initializer, field or lambda the path runs through.
    pub fn body_decl(&self) -> Option<BodyDecl<'a>> {
        self.nodes.iter().rev().find_map(|node| match node {
            NodeRef::Method(method) => Some(BodyDecl::Method(method)),
            NodeRef::Initializer(init) => Some(BodyDecl::Initializer(init)),
            NodeRef::Field(field) => Some(BodyDecl::Field(field)),
            NodeRef::Expr(Expr::Lambda(lambda)) => Some(BodyDecl::Lambda(lambda)),
            _ => None,
        })
    }

    pub fn enclosing_method(&self) -> Option<&'a MethodDecl> {
        self.nodes.iter().rev().find_map(|node| match node {
            NodeRef::Method(method) => Some(*method),
            _ => None,
        })
    }

    /// Index of the innermost member declaration (method, field, initializer or member
    /// type) directly inside the innermost type declaration.
    pub fn member_index(&self) -> Option<usize> {
        let type_idx = self
            .nodes
            .iter()
            .rposition(|node| matches!(node, NodeRef::Type(_)))?;
        let idx = type_idx + 1;
        match self.get(idx)? {
            NodeRef::Method(_) | NodeRef::Field(_) | NodeRef::Initializer(_) | NodeRef::Type(_) => {
                Some(idx)
            }
            _ => None,
        }
    }

    /// The innermost statement that sits directly in a block or switch body.
    pub fn enclosing_statement(&self) -> Option<StmtSite<'a>> {
        self.statement_sites().pop()
    }

    /// Every statement on the path that sits directly in a block or switch body,
    /// outermost first.
    pub fn statement_sites(&self) -> Vec<StmtSite<'a>> {
        let mut out = Vec::new();
        for (depth, node) in self.nodes.iter().enumerate() {
            let NodeRef::Stmt(stmt) = node else {
                continue;
            };
            let container = match self.parent(depth) {
                Some(NodeRef::Block(block)) => StmtContainer::Block(block),
                Some(NodeRef::Stmt(Stmt::Block(block))) => StmtContainer::Block(block),
                Some(NodeRef::Stmt(Stmt::Switch(switch))) => StmtContainer::Switch(switch),
                _ => continue,
            };
            let Some(index) = container
                .statements()
                .iter()
                .position(|s| std::ptr::eq(s, *stmt))
            else {
                continue;
            };
            out.push(StmtSite {
                stmt,
                container,
                index,
                depth,
            });
        }
        out
    }

    /// The innermost `try` whose body (not catch or finally) contains the path.
    pub fn enclosing_try_body(&self) -> Option<&'a TryStmt> {
        for (idx, node) in self.nodes.iter().enumerate().rev() {
            match node {
                NodeRef::Stmt(Stmt::Try(try_stmt)) => {
                    if let Some(NodeRef::Block(block)) = self.get(idx + 1) {
                        if std::ptr::eq(block, &try_stmt.body) {
                            return Some(try_stmt);
                        }
                    }
                    return None;
                }
                NodeRef::Method(_)
                | NodeRef::Initializer(_)
                | NodeRef::Type(_)
                | NodeRef::Expr(Expr::Lambda(_)) => return None,
                _ => {}
            }
        }
        None
    }

    /// `true` when the path runs through a lambda body below its innermost member.
    pub fn in_lambda(&self) -> bool {
        matches!(self.body_decl(), Some(BodyDecl::Lambda(_)))
    }

    /// `true` when the innermost member is static (or is a static initializer).
    pub fn in_static_context(&self) -> bool {
        match self.body_decl() {
            Some(BodyDecl::Method(method)) => method.modifiers.is_static(),
            Some(BodyDecl::Initializer(init)) => init.is_static,
            Some(BodyDecl::Field(field)) => field.modifiers.is_static(),
            Some(BodyDecl::Lambda(_)) => self.nodes.iter().rev().any(|node| match node {
                NodeRef::Method(method) => method.modifiers.is_static(),
                NodeRef::Initializer(init) => init.is_static,
                NodeRef::Field(field) => field.modifiers.is_static(),
                _ => false,
            }),
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::workspace::Workspace;

    fn with_context<R>(text: &str, f: impl FnOnce(&CorrectionContext<'_>) -> R) -> R {
        let workspace = Workspace::new([("p/E.java", text)]);
        let file = workspace.file(&FileId::new("p/E.java")).expect("file");
        let config = CorrectionConfig::default();
        let ctx = CorrectionContext::new(&workspace, file, &[], Span::empty(0), &config);
        f(&ctx)
    }

    #[test]
    fn statement_sites_and_types() {
        let text = "package p;\nclass E {\n    static class In {\n        void f() {\n            if (x) {\n                foo();\n            }\n        }\n    }\n}\n";
        with_context(text, |ctx| {
            let offset = text.find("foo").expect("call");
            let path = ctx.path(Span::new(offset, offset + 3));
            let names: Vec<String> = path.types().into_iter().map(|(n, _)| n).collect();
            assert_eq!(names, vec!["p.E".to_string(), "p.E.In".to_string()]);

            let sites = path.statement_sites();
            assert_eq!(sites.len(), 2);
            assert!(matches!(sites[0].stmt, Stmt::If(_)));
            assert!(matches!(sites[1].stmt, Stmt::Expr(_)));
            assert_eq!(path.enclosing_method().map(|m| m.name.as_str()), Some("f"));
            assert!(!path.in_static_context());
        });
    }

    #[test]
    fn try_body_lookup_stops_at_catch() {
        let text = "class E {\n    void f() {\n        try {\n            a();\n        } catch (Exception e) {\n            b();\n        }\n    }\n}\n";
        with_context(text, |ctx| {
            let a = text.find("a()").expect("a");
            assert!(ctx.path(Span::new(a, a + 3)).enclosing_try_body().is_some());
            let b = text.find("b()").expect("b");
            assert!(ctx.path(Span::new(b, b + 3)).enclosing_try_body().is_none());
        });
    }
}
