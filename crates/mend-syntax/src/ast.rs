//! Owned Java AST with byte spans.
//!
//! Every node records the span of the source it was parsed from so corrections can
//! rewrite exactly the text they touch.

use mend_core::Span;

use crate::javadoc::Javadoc;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompilationUnit {
    pub package: Option<PackageDecl>,
    pub imports: Vec<ImportDecl>,
    pub types: Vec<TypeDecl>,
    pub range: Span,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackageDecl {
    pub name: String,
    pub range: Span,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportDecl {
    pub is_static: bool,
    pub is_star: bool,
    pub path: String,
    pub range: Span,
}

impl ImportDecl {
    /// The last path segment (`List` for `java.util.List`).
    pub fn simple_name(&self) -> &str {
        self.path.rsplit('.').next().unwrap_or(&self.path)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TypeKind {
    Class,
    Interface,
    Enum,
    Record,
    Annotation,
}

impl TypeKind {
    pub fn keyword(self) -> &'static str {
        match self {
            TypeKind::Class => "class",
            TypeKind::Interface => "interface",
            TypeKind::Enum => "enum",
            TypeKind::Record => "record",
            TypeKind::Annotation => "@interface",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Modifier {
    pub keyword: String,
    pub range: Span,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Annotation {
    pub name: String,
    pub range: Span,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Modifiers {
    pub keywords: Vec<Modifier>,
    pub annotations: Vec<Annotation>,
}

impl Modifiers {
    pub fn get(&self, keyword: &str) -> Option<&Modifier> {
        self.keywords.iter().find(|m| m.keyword == keyword)
    }

    pub fn has(&self, keyword: &str) -> bool {
        self.get(keyword).is_some()
    }

    pub fn is_static(&self) -> bool {
        self.has("static")
    }

    pub fn is_private(&self) -> bool {
        self.has("private")
    }

    pub fn has_annotation(&self, simple_name: &str) -> bool {
        self.annotations
            .iter()
            .any(|a| a.name.rsplit('.').next() == Some(simple_name))
    }

    /// Offset of the first modifier or annotation, if any.
    pub fn start(&self) -> Option<usize> {
        let kw = self.keywords.iter().map(|m| m.range.start).min();
        let ann = self.annotations.iter().map(|a| a.range.start).min();
        match (kw, ann) {
            (Some(a), Some(b)) => Some(a.min(b)),
            (a, b) => a.or(b),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeParam {
    pub name: String,
    pub name_range: Span,
    pub bounds: Vec<TypeRef>,
    pub range: Span,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeDecl {
    pub kind: TypeKind,
    pub modifiers: Modifiers,
    pub javadoc: Option<Javadoc>,
    pub name: String,
    pub name_range: Span,
    pub type_params: Vec<TypeParam>,
    /// `<...>` including the angle brackets.
    pub type_params_range: Option<Span>,
    pub extends: Vec<TypeRef>,
    pub implements: Vec<TypeRef>,
    pub record_components: Vec<Param>,
    pub enum_constants: Vec<EnumConstant>,
    pub members: Vec<MemberDecl>,
    /// `{ ... }` including the braces.
    pub body_range: Span,
    /// From the first modifier (or the keyword) to the closing brace.
    pub range: Span,
}

impl TypeDecl {
    pub fn is_interface(&self) -> bool {
        matches!(self.kind, TypeKind::Interface | TypeKind::Annotation)
    }

    pub fn methods(&self) -> impl Iterator<Item = &MethodDecl> {
        self.members.iter().filter_map(|m| match m {
            MemberDecl::Method(method) => Some(method),
            _ => None,
        })
    }

    pub fn fields(&self) -> impl Iterator<Item = &FieldDecl> {
        self.members.iter().filter_map(|m| match m {
            MemberDecl::Field(field) => Some(field),
            _ => None,
        })
    }

    pub fn nested_types(&self) -> impl Iterator<Item = &TypeDecl> {
        self.members.iter().filter_map(|m| match m {
            MemberDecl::Type(ty) => Some(ty),
            _ => None,
        })
    }

    /// Offset where the declaration starts, javadoc excluded.
    pub fn decl_start(&self) -> usize {
        self.range.start
    }

    /// End of the header that precedes the `implements` clause (name, type parameters,
    /// `extends` list).
    pub fn header_end_before_implements(&self) -> usize {
        let mut end = self.name_range.end;
        if let Some(tp) = self.type_params_range {
            end = end.max(tp.end);
        }
        if let Some(last) = self.extends.last() {
            end = end.max(last.range.end);
        }
        end
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnumConstant {
    pub name: String,
    pub name_range: Span,
    pub args: Vec<Expr>,
    pub range: Span,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MemberDecl {
    Field(FieldDecl),
    Method(MethodDecl),
    Initializer(InitializerDecl),
    Type(TypeDecl),
}

impl MemberDecl {
    pub fn range(&self) -> Span {
        match self {
            MemberDecl::Field(decl) => decl.range,
            MemberDecl::Method(decl) => decl.range,
            MemberDecl::Initializer(decl) => decl.range,
            MemberDecl::Type(decl) => decl.range,
        }
    }

    pub fn javadoc(&self) -> Option<&Javadoc> {
        match self {
            MemberDecl::Field(decl) => decl.javadoc.as_ref(),
            MemberDecl::Method(decl) => decl.javadoc.as_ref(),
            MemberDecl::Initializer(_) => None,
            MemberDecl::Type(decl) => decl.javadoc.as_ref(),
        }
    }

    /// Start of the member including its javadoc.
    pub fn full_start(&self) -> usize {
        match self.javadoc() {
            Some(doc) => doc.range.start.min(self.range().start),
            None => self.range().start,
        }
    }
}

/// A syntactic type reference. `text` is the normalized token text without whitespace
/// (`Map<String,Integer>[]`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeRef {
    pub text: String,
    pub range: Span,
}

impl TypeRef {
    /// The type name without type arguments or array dimensions.
    pub fn base_name(&self) -> &str {
        let end = self
            .text
            .find(['<', '['])
            .unwrap_or(self.text.len());
        &self.text[..end]
    }

    pub fn simple_name(&self) -> &str {
        let base = self.base_name();
        base.rsplit('.').next().unwrap_or(base)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VarDeclarator {
    pub name: String,
    pub name_range: Span,
    /// C-style array dimensions after the name (`int a[]`).
    pub dims: usize,
    pub init: Option<Expr>,
    /// From the name to the end of the initializer.
    pub range: Span,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldDecl {
    pub modifiers: Modifiers,
    pub javadoc: Option<Javadoc>,
    pub ty: TypeRef,
    pub declarators: Vec<VarDeclarator>,
    pub range: Span,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Param {
    pub modifiers: Modifiers,
    pub ty: TypeRef,
    pub varargs: bool,
    pub name: String,
    pub name_range: Span,
    pub range: Span,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MethodDecl {
    pub modifiers: Modifiers,
    pub javadoc: Option<Javadoc>,
    pub type_params: Vec<TypeParam>,
    pub type_params_range: Option<Span>,
    /// `None` for constructors.
    pub return_ty: Option<TypeRef>,
    pub name: String,
    pub name_range: Span,
    pub params: Vec<Param>,
    /// `( ... )` including the parentheses.
    pub params_range: Span,
    pub throws: Vec<TypeRef>,
    /// From the `throws` keyword to the last thrown type.
    pub throws_range: Option<Span>,
    pub body: Option<Block>,
    pub range: Span,
}

impl MethodDecl {
    pub fn is_constructor(&self) -> bool {
        self.return_ty.is_none()
    }

    pub fn is_void(&self) -> bool {
        self.return_ty.as_ref().is_some_and(|ty| ty.text == "void")
    }

    /// First token of the declaration: first modifier, type parameters, return type or
    /// name.
    pub fn decl_start(&self) -> usize {
        self.range.start
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InitializerDecl {
    pub is_static: bool,
    pub body: Block,
    pub range: Span,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Block {
    pub statements: Vec<Stmt>,
    pub range: Span,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Stmt {
    LocalVar(LocalVarStmt),
    LocalType(Box<TypeDecl>),
    Expr(ExprStmt),
    Return(ReturnStmt),
    Block(Block),
    If(IfStmt),
    While(WhileStmt),
    Do(DoStmt),
    For(ForStmt),
    ForEach(ForEachStmt),
    Try(TryStmt),
    Throw(ThrowStmt),
    Switch(SwitchStmt),
    Sync(SyncStmt),
    Labeled(LabeledStmt),
    /// `break`, `continue`, `yield`, `assert` and anything else kept opaque.
    Other(Span),
    Empty(Span),
}

impl Stmt {
    pub fn range(&self) -> Span {
        match self {
            Stmt::LocalVar(s) => s.range,
            Stmt::LocalType(s) => s.range,
            Stmt::Expr(s) => s.range,
            Stmt::Return(s) => s.range,
            Stmt::Block(s) => s.range,
            Stmt::If(s) => s.range,
            Stmt::While(s) => s.range,
            Stmt::Do(s) => s.range,
            Stmt::For(s) => s.range,
            Stmt::ForEach(s) => s.range,
            Stmt::Try(s) => s.range,
            Stmt::Throw(s) => s.range,
            Stmt::Switch(s) => s.range,
            Stmt::Sync(s) => s.range,
            Stmt::Labeled(s) => s.range,
            Stmt::Other(range) | Stmt::Empty(range) => *range,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocalVarStmt {
    pub modifiers: Modifiers,
    pub ty: TypeRef,
    pub declarators: Vec<VarDeclarator>,
    pub range: Span,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExprStmt {
    pub expr: Expr,
    pub range: Span,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReturnStmt {
    pub expr: Option<Expr>,
    pub range: Span,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IfStmt {
    pub cond: Expr,
    pub then_branch: Box<Stmt>,
    pub else_branch: Option<Box<Stmt>>,
    pub range: Span,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WhileStmt {
    pub cond: Expr,
    pub body: Box<Stmt>,
    pub range: Span,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DoStmt {
    pub body: Box<Stmt>,
    pub cond: Expr,
    pub range: Span,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ForStmt {
    pub init: Vec<Stmt>,
    pub cond: Option<Expr>,
    pub update: Vec<Expr>,
    pub body: Box<Stmt>,
    pub range: Span,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ForEachStmt {
    pub var: Param,
    pub iterable: Expr,
    pub body: Box<Stmt>,
    pub range: Span,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resource {
    Decl(LocalVarStmt),
    Expr(Expr),
}

impl Resource {
    pub fn range(&self) -> Span {
        match self {
            Resource::Decl(decl) => decl.range,
            Resource::Expr(expr) => expr.range(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TryStmt {
    pub resources: Vec<Resource>,
    /// `( ... )` including the parentheses.
    pub resources_range: Option<Span>,
    pub body: Block,
    pub catches: Vec<CatchClause>,
    pub finally: Option<Block>,
    pub range: Span,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatchClause {
    pub types: Vec<TypeRef>,
    pub name: String,
    pub name_range: Span,
    pub body: Block,
    pub range: Span,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ThrowStmt {
    pub expr: Expr,
    pub range: Span,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SwitchStmt {
    pub selector: Expr,
    /// Statements of all case groups in source order.
    pub statements: Vec<Stmt>,
    pub range: Span,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncStmt {
    pub lock: Expr,
    pub body: Block,
    pub range: Span,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LabeledStmt {
    pub label: String,
    pub body: Box<Stmt>,
    pub range: Span,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LiteralKind {
    Int,
    Long,
    Float,
    Double,
    Char,
    String,
    Bool,
    Null,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Expr {
    Name(NameExpr),
    Literal(LiteralExpr),
    Call(CallExpr),
    FieldAccess(FieldAccessExpr),
    New(NewExpr),
    NewArray(NewArrayExpr),
    ArrayInit(ArrayInitExpr),
    Cast(CastExpr),
    Paren(ParenExpr),
    Assign(AssignExpr),
    Binary(BinaryExpr),
    Unary(UnaryExpr),
    Conditional(ConditionalExpr),
    InstanceOf(InstanceOfExpr),
    This(Span),
    Super(Span),
    ArrayAccess(ArrayAccessExpr),
    Lambda(LambdaExpr),
    MethodRef(MethodRefExpr),
    ClassLit(ClassLitExpr),
    Missing(Span),
}

impl Expr {
    pub fn range(&self) -> Span {
        match self {
            Expr::Name(expr) => expr.range,
            Expr::Literal(expr) => expr.range,
            Expr::Call(expr) => expr.range,
            Expr::FieldAccess(expr) => expr.range,
            Expr::New(expr) => expr.range,
            Expr::NewArray(expr) => expr.range,
            Expr::ArrayInit(expr) => expr.range,
            Expr::Cast(expr) => expr.range,
            Expr::Paren(expr) => expr.range,
            Expr::Assign(expr) => expr.range,
            Expr::Binary(expr) => expr.range,
            Expr::Unary(expr) => expr.range,
            Expr::Conditional(expr) => expr.range,
            Expr::InstanceOf(expr) => expr.range,
            Expr::ArrayAccess(expr) => expr.range,
            Expr::Lambda(expr) => expr.range,
            Expr::MethodRef(expr) => expr.range,
            Expr::ClassLit(expr) => expr.range,
            Expr::This(range) | Expr::Super(range) | Expr::Missing(range) => *range,
        }
    }

    /// Primary expressions never need parentheses when used as a receiver or cast
    /// operand.
    pub fn is_primary(&self) -> bool {
        matches!(
            self,
            Expr::Name(_)
                | Expr::Literal(_)
                | Expr::Call(_)
                | Expr::FieldAccess(_)
                | Expr::New(_)
                | Expr::NewArray(_)
                | Expr::Paren(_)
                | Expr::This(_)
                | Expr::Super(_)
                | Expr::ArrayAccess(_)
                | Expr::ClassLit(_)
        )
    }

    /// Strip redundant parentheses.
    pub fn unparenthesized(&self) -> &Expr {
        match self {
            Expr::Paren(paren) => paren.inner.unparenthesized(),
            other => other,
        }
    }

    /// `true` if evaluating the expression may have side effects: calls, object
    /// creation, increments and assignments.
    pub fn has_side_effects(&self) -> bool {
        match self {
            Expr::Call(_) | Expr::New(_) | Expr::Assign(_) => true,
            Expr::Unary(unary) => {
                matches!(unary.op.as_str(), "++" | "--") || unary.operand.has_side_effects()
            }
            Expr::Name(_)
            | Expr::Literal(_)
            | Expr::This(_)
            | Expr::Super(_)
            | Expr::Missing(_)
            | Expr::Lambda(_)
            | Expr::MethodRef(_)
            | Expr::ClassLit(_) => false,
            Expr::FieldAccess(access) => access.receiver.has_side_effects(),
            Expr::NewArray(array) => {
                array.dims.iter().flatten().any(Expr::has_side_effects)
                    || array.init.as_ref().is_some_and(|init| {
                        init.elements.iter().any(Expr::has_side_effects)
                    })
            }
            Expr::ArrayInit(init) => init.elements.iter().any(Expr::has_side_effects),
            Expr::Cast(cast) => cast.expr.has_side_effects(),
            Expr::Paren(paren) => paren.inner.has_side_effects(),
            Expr::Binary(bin) => bin.lhs.has_side_effects() || bin.rhs.has_side_effects(),
            Expr::Conditional(cond) => {
                cond.cond.has_side_effects()
                    || cond.then_expr.has_side_effects()
                    || cond.else_expr.has_side_effects()
            }
            Expr::InstanceOf(inst) => inst.expr.has_side_effects(),
            Expr::ArrayAccess(access) => {
                access.array.has_side_effects() || access.index.has_side_effects()
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NameExpr {
    pub name: String,
    pub range: Span,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LiteralExpr {
    pub kind: LiteralKind,
    pub value: String,
    pub range: Span,
}

/// A method invocation. Explicit constructor invocations use the names `this` and
/// `super` with no receiver.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallExpr {
    pub receiver: Option<Box<Expr>>,
    pub name: String,
    pub name_range: Span,
    pub args: Vec<Expr>,
    /// `( ... )` including the parentheses.
    pub args_range: Span,
    pub range: Span,
}

impl CallExpr {
    pub fn is_constructor_call(&self) -> bool {
        self.receiver.is_none() && matches!(self.name.as_str(), "this" | "super")
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldAccessExpr {
    pub receiver: Box<Expr>,
    pub name: String,
    pub name_range: Span,
    pub range: Span,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewExpr {
    pub ty: TypeRef,
    pub args: Vec<Expr>,
    pub args_range: Span,
    /// Anonymous class body.
    pub body: Option<Vec<MemberDecl>>,
    pub range: Span,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewArrayExpr {
    /// The element type without dimensions.
    pub elem_ty: TypeRef,
    /// One entry per `[...]`, `None` for an empty pair of brackets.
    pub dims: Vec<Option<Expr>>,
    pub init: Option<ArrayInitExpr>,
    pub range: Span,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArrayInitExpr {
    pub elements: Vec<Expr>,
    pub range: Span,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CastExpr {
    pub ty: TypeRef,
    pub expr: Box<Expr>,
    pub range: Span,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParenExpr {
    pub inner: Box<Expr>,
    pub range: Span,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssignExpr {
    /// `=`, `+=`, ...
    pub op: String,
    pub lhs: Box<Expr>,
    pub rhs: Box<Expr>,
    pub range: Span,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BinaryOp {
    OrOr,
    AndAnd,
    Or,
    Xor,
    And,
    EqEq,
    NotEq,
    Lt,
    Gt,
    Le,
    Ge,
    Shl,
    Shr,
    UShr,
    Add,
    Sub,
    Mul,
    Div,
    Rem,
}

impl BinaryOp {
    pub fn as_str(self) -> &'static str {
        match self {
            BinaryOp::OrOr => "||",
            BinaryOp::AndAnd => "&&",
            BinaryOp::Or => "|",
            BinaryOp::Xor => "^",
            BinaryOp::And => "&",
            BinaryOp::EqEq => "==",
            BinaryOp::NotEq => "!=",
            BinaryOp::Lt => "<",
            BinaryOp::Gt => ">",
            BinaryOp::Le => "<=",
            BinaryOp::Ge => ">=",
            BinaryOp::Shl => "<<",
            BinaryOp::Shr => ">>",
            BinaryOp::UShr => ">>>",
            BinaryOp::Add => "+",
            BinaryOp::Sub => "-",
            BinaryOp::Mul => "*",
            BinaryOp::Div => "/",
            BinaryOp::Rem => "%",
        }
    }

    pub fn precedence(self) -> u8 {
        match self {
            BinaryOp::OrOr => 1,
            BinaryOp::AndAnd => 2,
            BinaryOp::Or => 3,
            BinaryOp::Xor => 4,
            BinaryOp::And => 5,
            BinaryOp::EqEq | BinaryOp::NotEq => 6,
            BinaryOp::Lt | BinaryOp::Gt | BinaryOp::Le | BinaryOp::Ge => 7,
            BinaryOp::Shl | BinaryOp::Shr | BinaryOp::UShr => 8,
            BinaryOp::Add | BinaryOp::Sub => 9,
            BinaryOp::Mul | BinaryOp::Div | BinaryOp::Rem => 10,
        }
    }

    pub fn is_logical(self) -> bool {
        matches!(self, BinaryOp::OrOr | BinaryOp::AndAnd)
    }

    pub fn is_comparison(self) -> bool {
        matches!(
            self,
            BinaryOp::EqEq
                | BinaryOp::NotEq
                | BinaryOp::Lt
                | BinaryOp::Gt
                | BinaryOp::Le
                | BinaryOp::Ge
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BinaryExpr {
    pub op: BinaryOp,
    pub lhs: Box<Expr>,
    pub rhs: Box<Expr>,
    pub range: Span,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnaryExpr {
    pub op: String,
    pub prefix: bool,
    pub operand: Box<Expr>,
    pub range: Span,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConditionalExpr {
    pub cond: Box<Expr>,
    pub then_expr: Box<Expr>,
    pub else_expr: Box<Expr>,
    pub range: Span,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstanceOfExpr {
    pub expr: Box<Expr>,
    pub ty: TypeRef,
    pub range: Span,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArrayAccessExpr {
    pub array: Box<Expr>,
    pub index: Box<Expr>,
    pub range: Span,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LambdaParam {
    pub ty: Option<TypeRef>,
    pub name: String,
    pub name_range: Span,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LambdaBody {
    Expr(Box<Expr>),
    Block(Block),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LambdaExpr {
    pub params: Vec<LambdaParam>,
    pub body: LambdaBody,
    pub range: Span,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MethodRefExpr {
    pub target: Box<Expr>,
    pub name: String,
    pub range: Span,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassLitExpr {
    pub ty: TypeRef,
    pub range: Span,
}
