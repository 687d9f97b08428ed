//! Static members reached through an instance or through a subtype.

use mend_core::{Diagnostic, ProblemKind, Span};
use mend_syntax::ast::{Expr, MemberDecl, Modifiers, TypeDecl};
use mend_syntax::visit::{walk, NodeRef};
use mend_types::{field, ClassDef, Type};

use crate::context::CorrectionContext;
use crate::dispatch::Corrector;
use crate::proposal::RawProposal;
use crate::relevance;
use crate::typing::{Receiver, Typer};

/// Proposals for the non-static, indirect and alien-receiver access kinds.
pub struct StaticAccess;

/// The member an access expression reaches.
enum Member<'e> {
    Field(&'e ClassDef, &'e str),
    Method(&'e ClassDef, &'e str),
}

impl<'e> Member<'e> {
    fn declaring(&self) -> &'e ClassDef {
        match self {
            Member::Field(class, _) | Member::Method(class, _) => *class,
        }
    }

    fn label(&self) -> String {
        match self {
            Member::Field(_, name) => (*name).to_string(),
            Member::Method(_, name) => format!("{name}()"),
        }
    }
}

/// The qualified access on the path whose member name the diagnostic points at, as
/// `(receiver, member)`.
fn access<'a>(
    typer: &Typer<'a>,
    nodes: &[NodeRef<'a>],
    range: Span,
) -> Option<(&'a Expr, Member<'a>)> {
    let env = typer.env();
    nodes.iter().rev().copied().find_map(|node| match node {
        NodeRef::Expr(Expr::FieldAccess(expr))
            if expr.name_range.intersects(range) || expr.range == range =>
        {
            let owner = match typer.resolve_receiver(&expr.receiver)? {
                Receiver::Value(ty) => ty,
                Receiver::Type(name) => Type::class(name, Vec::new()),
            };
            let found = field(env, &owner, &expr.name)?;
            Some((&*expr.receiver, Member::Field(found.declaring, &found.field.name)))
        }
        NodeRef::Expr(Expr::Call(call))
            if call.name_range.intersects(range) || call.range == range =>
        {
            let receiver = call.receiver.as_deref()?;
            let method = typer.resolve_call(call)?;
            Some((receiver, Member::Method(method.declaring, &method.method.name)))
        }
        _ => None,
    })
}

/// `true` when static members of `decl` other than `member` use it unqualified or
/// through the type name.
fn used_statically(decl: &TypeDecl, member: &Member<'_>) -> bool {
    let (name, is_method) = match member {
        Member::Field(_, name) => (*name, false),
        Member::Method(_, name) => (*name, true),
    };
    let mut found = false;
    for item in &decl.members {
        let is_static = match item {
            MemberDecl::Method(method) => method.modifiers.is_static() && method.name != name,
            MemberDecl::Field(f) => {
                f.modifiers.is_static() && !f.declarators.iter().any(|d| d.name == name)
            }
            MemberDecl::Initializer(init) => init.is_static,
            MemberDecl::Type(_) => false,
        };
        if !is_static {
            continue;
        }
        walk(NodeRef::member(item), &mut |node| {
            found |= match node {
                NodeRef::Expr(Expr::Name(expr)) => !is_method && expr.name == name,
                NodeRef::Expr(Expr::Call(call)) => {
                    is_method
                        && call.name == name
                        && match call.receiver.as_deref() {
                            None => true,
                            Some(Expr::Name(owner)) => owner.name == decl.name,
                            Some(_) => false,
                        }
                }
                _ => false,
            };
            !found
        });
        if found {
            break;
        }
    }
    found
}

/// Delete `static` and the whitespace that follows it.
fn static_keyword(source: &str, modifiers: &Modifiers) -> Option<Span> {
    let keyword = modifiers.get("static")?;
    let rest = &source[keyword.range.end..];
    let trailing = rest.len() - rest.trim_start().len();
    Some(Span::new(keyword.range.start, keyword.range.end + trailing))
}

impl StaticAccess {
    fn remove_static(
        &self,
        ctx: &CorrectionContext<'_>,
        member: &Member<'_>,
    ) -> Option<RawProposal> {
        let class = member.declaring();
        if !class.is_source() || class.is_interface() {
            return None;
        }
        let (file, decl) = ctx.workspace.declaration(class)?;
        let modifiers = match member {
            Member::Field(_, name) => {
                if decl.enum_constants.iter().any(|c| c.name == *name) {
                    return None;
                }
                &decl
                    .fields()
                    .find(|f| f.declarators.iter().any(|d| d.name == *name))?
                    .modifiers
            }
            Member::Method(_, name) => {
                &decl
                    .methods()
                    .find(|m| m.name == *name && m.modifiers.is_static())?
                    .modifiers
            }
        };
        if used_statically(decl, member) {
            return None;
        }
        let range = static_keyword(&file.text, modifiers)?;
        Some(
            RawProposal::quick_fix(
                format!("Remove 'static' modifier of '{}'", member.label()),
                relevance::REMOVE_STATIC_MODIFIER,
            )
            .delete(&file.id, range),
        )
    }
}

impl Corrector for StaticAccess {
    fn name(&self) -> &'static str {
        "static-access"
    }

    fn propose(&self, ctx: &CorrectionContext<'_>, diagnostic: &Diagnostic) -> Vec<RawProposal> {
        let path = ctx.path(diagnostic.range);
        let typer = ctx.typer(&path);
        let Some((receiver, member)) = access(&typer, path.nodes(), diagnostic.range) else {
            return Vec::new();
        };
        let class = member.declaring();
        let simple = class.simple_name();

        let mut imports = ctx.import_rewrite();
        let written = match typer.resolve_type_name(simple) {
            Some(visible) if visible == class.name => simple.to_string(),
            _ => imports.class_name(&class.name),
        };
        let mut out = vec![RawProposal::quick_fix(
            format!("Change access to static using '{simple}' (declaring type)"),
            relevance::CHANGE_TO_STATIC_ACCESS,
        )
        .replace(ctx.file_id(), receiver.range(), written)
        .with_changes(imports.changes())];

        if matches!(
            diagnostic.kind,
            ProblemKind::NonStaticAccessToStaticField | ProblemKind::NonStaticAccessToStaticMethod
        ) {
            out.extend(self.remove_static(ctx, &member));
        }
        out
    }
}
