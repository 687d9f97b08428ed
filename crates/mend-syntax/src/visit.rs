//! Uniform traversal over the AST.

use mend_core::Span;

use crate::ast::*;

/// A borrowed reference to any node that carries a span.
#[derive(Debug, Clone, Copy)]
pub enum NodeRef<'a> {
    Type(&'a TypeDecl),
    Method(&'a MethodDecl),
    Field(&'a FieldDecl),
    Initializer(&'a InitializerDecl),
    EnumConstant(&'a EnumConstant),
    Param(&'a Param),
    Declarator(&'a VarDeclarator),
    Block(&'a Block),
    Stmt(&'a Stmt),
    Resource(&'a Resource),
    Catch(&'a CatchClause),
    Expr(&'a Expr),
    TypeRef(&'a TypeRef),
}

impl<'a> NodeRef<'a> {
    pub fn member(member: &'a MemberDecl) -> NodeRef<'a> {
        match member {
            MemberDecl::Field(field) => NodeRef::Field(field),
            MemberDecl::Method(method) => NodeRef::Method(method),
            MemberDecl::Initializer(init) => NodeRef::Initializer(init),
            MemberDecl::Type(ty) => NodeRef::Type(ty),
        }
    }

    pub fn range(&self) -> Span {
        match self {
            NodeRef::Type(n) => n.range,
            NodeRef::Method(n) => n.range,
            NodeRef::Field(n) => n.range,
            NodeRef::Initializer(n) => n.range,
            NodeRef::EnumConstant(n) => n.range,
            NodeRef::Param(n) => n.range,
            NodeRef::Declarator(n) => n.range,
            NodeRef::Block(n) => n.range,
            NodeRef::Stmt(n) => n.range(),
            NodeRef::Resource(n) => n.range(),
            NodeRef::Catch(n) => n.range,
            NodeRef::Expr(n) => n.range(),
            NodeRef::TypeRef(n) => n.range,
        }
    }

    /// Direct children in source order.
    pub fn children(&self) -> Vec<NodeRef<'a>> {
        let mut out = Vec::new();
        match *self {
            NodeRef::Type(ty) => {
                for param in &ty.type_params {
                    out.extend(param.bounds.iter().map(NodeRef::TypeRef));
                }
                out.extend(ty.extends.iter().map(NodeRef::TypeRef));
                out.extend(ty.implements.iter().map(NodeRef::TypeRef));
                out.extend(ty.record_components.iter().map(NodeRef::Param));
                out.extend(ty.enum_constants.iter().map(NodeRef::EnumConstant));
                out.extend(ty.members.iter().map(NodeRef::member));
            }
            NodeRef::Method(method) => {
                for param in &method.type_params {
                    out.extend(param.bounds.iter().map(NodeRef::TypeRef));
                }
                if let Some(ret) = &method.return_ty {
                    out.push(NodeRef::TypeRef(ret));
                }
                out.extend(method.params.iter().map(NodeRef::Param));
                out.extend(method.throws.iter().map(NodeRef::TypeRef));
                if let Some(body) = &method.body {
                    out.push(NodeRef::Block(body));
                }
            }
            NodeRef::Field(field) => {
                out.push(NodeRef::TypeRef(&field.ty));
                out.extend(field.declarators.iter().map(NodeRef::Declarator));
            }
            NodeRef::Initializer(init) => out.push(NodeRef::Block(&init.body)),
            NodeRef::EnumConstant(constant) => out.extend(constant.args.iter().map(NodeRef::Expr)),
            NodeRef::Param(param) => out.push(NodeRef::TypeRef(&param.ty)),
            NodeRef::Declarator(decl) => {
                if let Some(init) = &decl.init {
                    out.push(NodeRef::Expr(init));
                }
            }
            NodeRef::Block(block) => out.extend(block.statements.iter().map(NodeRef::Stmt)),
            NodeRef::Stmt(stmt) => stmt_children(stmt, &mut out),
            NodeRef::Resource(resource) => match resource {
                Resource::Decl(decl) => local_var_children(decl, &mut out),
                Resource::Expr(expr) => out.push(NodeRef::Expr(expr)),
            },
            NodeRef::Catch(catch) => {
                out.extend(catch.types.iter().map(NodeRef::TypeRef));
                out.push(NodeRef::Block(&catch.body));
            }
            NodeRef::Expr(expr) => expr_children(expr, &mut out),
            NodeRef::TypeRef(_) => {}
        }
        out
    }
}

fn local_var_children<'a>(decl: &'a LocalVarStmt, out: &mut Vec<NodeRef<'a>>) {
    out.push(NodeRef::TypeRef(&decl.ty));
    out.extend(decl.declarators.iter().map(NodeRef::Declarator));
}

fn stmt_children<'a>(stmt: &'a Stmt, out: &mut Vec<NodeRef<'a>>) {
    match stmt {
        Stmt::LocalVar(decl) => local_var_children(decl, out),
        Stmt::LocalType(ty) => out.push(NodeRef::Type(ty)),
        Stmt::Expr(s) => out.push(NodeRef::Expr(&s.expr)),
        Stmt::Return(s) => {
            if let Some(expr) = &s.expr {
                out.push(NodeRef::Expr(expr));
            }
        }
        Stmt::Block(block) => out.extend(block.statements.iter().map(NodeRef::Stmt)),
        Stmt::If(s) => {
            out.push(NodeRef::Expr(&s.cond));
            out.push(NodeRef::Stmt(&s.then_branch));
            if let Some(else_branch) = &s.else_branch {
                out.push(NodeRef::Stmt(else_branch));
            }
        }
        Stmt::While(s) => {
            out.push(NodeRef::Expr(&s.cond));
            out.push(NodeRef::Stmt(&s.body));
        }
        Stmt::Do(s) => {
            out.push(NodeRef::Stmt(&s.body));
            out.push(NodeRef::Expr(&s.cond));
        }
        Stmt::For(s) => {
            out.extend(s.init.iter().map(NodeRef::Stmt));
            if let Some(cond) = &s.cond {
                out.push(NodeRef::Expr(cond));
            }
            out.extend(s.update.iter().map(NodeRef::Expr));
            out.push(NodeRef::Stmt(&s.body));
        }
        Stmt::ForEach(s) => {
            out.push(NodeRef::Param(&s.var));
            out.push(NodeRef::Expr(&s.iterable));
            out.push(NodeRef::Stmt(&s.body));
        }
        Stmt::Try(s) => {
            out.extend(s.resources.iter().map(NodeRef::Resource));
            out.push(NodeRef::Block(&s.body));
            out.extend(s.catches.iter().map(NodeRef::Catch));
            if let Some(finally) = &s.finally {
                out.push(NodeRef::Block(finally));
            }
        }
        Stmt::Throw(s) => out.push(NodeRef::Expr(&s.expr)),
        Stmt::Switch(s) => {
            out.push(NodeRef::Expr(&s.selector));
            out.extend(s.statements.iter().map(NodeRef::Stmt));
        }
        Stmt::Sync(s) => {
            out.push(NodeRef::Expr(&s.lock));
            out.push(NodeRef::Block(&s.body));
        }
        Stmt::Labeled(s) => out.push(NodeRef::Stmt(&s.body)),
        Stmt::Other(_) | Stmt::Empty(_) => {}
    }
}

fn expr_children<'a>(expr: &'a Expr, out: &mut Vec<NodeRef<'a>>) {
    match expr {
        Expr::Call(call) => {
            if let Some(receiver) = &call.receiver {
                out.push(NodeRef::Expr(receiver));
            }
            out.extend(call.args.iter().map(NodeRef::Expr));
        }
        Expr::FieldAccess(access) => out.push(NodeRef::Expr(&access.receiver)),
        Expr::New(new) => {
            out.push(NodeRef::TypeRef(&new.ty));
            out.extend(new.args.iter().map(NodeRef::Expr));
            if let Some(body) = &new.body {
                out.extend(body.iter().map(NodeRef::member));
            }
        }
        Expr::NewArray(array) => {
            out.push(NodeRef::TypeRef(&array.elem_ty));
            out.extend(array.dims.iter().flatten().map(NodeRef::Expr));
            if let Some(init) = &array.init {
                out.extend(init.elements.iter().map(NodeRef::Expr));
            }
        }
        Expr::ArrayInit(init) => out.extend(init.elements.iter().map(NodeRef::Expr)),
        Expr::Cast(cast) => {
            out.push(NodeRef::TypeRef(&cast.ty));
            out.push(NodeRef::Expr(&cast.expr));
        }
        Expr::Paren(paren) => out.push(NodeRef::Expr(&paren.inner)),
        Expr::Assign(assign) => {
            out.push(NodeRef::Expr(&assign.lhs));
            out.push(NodeRef::Expr(&assign.rhs));
        }
        Expr::Binary(bin) => {
            out.push(NodeRef::Expr(&bin.lhs));
            out.push(NodeRef::Expr(&bin.rhs));
        }
        Expr::Unary(unary) => out.push(NodeRef::Expr(&unary.operand)),
        Expr::Conditional(cond) => {
            out.push(NodeRef::Expr(&cond.cond));
            out.push(NodeRef::Expr(&cond.then_expr));
            out.push(NodeRef::Expr(&cond.else_expr));
        }
        Expr::InstanceOf(inst) => {
            out.push(NodeRef::Expr(&inst.expr));
            out.push(NodeRef::TypeRef(&inst.ty));
        }
        Expr::ArrayAccess(access) => {
            out.push(NodeRef::Expr(&access.array));
            out.push(NodeRef::Expr(&access.index));
        }
        Expr::Lambda(lambda) => match &lambda.body {
            LambdaBody::Expr(body) => out.push(NodeRef::Expr(body)),
            LambdaBody::Block(block) => out.push(NodeRef::Block(block)),
        },
        Expr::MethodRef(mref) => out.push(NodeRef::Expr(&mref.target)),
        Expr::ClassLit(lit) => out.push(NodeRef::TypeRef(&lit.ty)),
        Expr::Name(_)
        | Expr::Literal(_)
        | Expr::This(_)
        | Expr::Super(_)
        | Expr::Missing(_) => {}
    }
}

/// Pre-order walk. `f` returns `false` to skip a node's children.
pub fn walk<'a>(node: NodeRef<'a>, f: &mut impl FnMut(NodeRef<'a>) -> bool) {
    if f(node) {
        for child in node.children() {
            walk(child, f);
        }
    }
}

/// Walk every type declared in `unit`.
pub fn walk_unit<'a>(unit: &'a CompilationUnit, f: &mut impl FnMut(NodeRef<'a>) -> bool) {
    for ty in &unit.types {
        walk(NodeRef::Type(ty), f);
    }
}

/// All nodes whose range covers `span`, outermost first.
///
/// At each level the first child covering the span is chosen, so a caret between two
/// adjacent nodes resolves to the left one.
pub fn covering_path(unit: &CompilationUnit, span: Span) -> Vec<NodeRef<'_>> {
    let covers = |node: &NodeRef<'_>| {
        let range = node.range();
        range.start <= span.start && span.end <= range.end
    };

    let mut path = Vec::new();
    let Some(mut current) = unit.types.iter().map(NodeRef::Type).find(covers) else {
        return path;
    };
    loop {
        path.push(current);
        match current.children().into_iter().find(covers) {
            Some(next) => current = next,
            None => break,
        }
    }
    path
}
