//! Type references that resolve to nothing, or to more than one type.

use mend_core::{Diagnostic, FileId, Span};
use mend_fuzzy::{cmp_by_match, similarity};
use mend_syntax::ast::{Expr, Stmt, TypeDecl, TypeKind, TypeRef};
use mend_syntax::visit::NodeRef;
use mend_types::{simple_name, ClassDef, PrimitiveType, Visibility};

use crate::context::{CorrectionContext, NodePath};
use crate::dispatch::Corrector;
use crate::imports::explicit_import;
use crate::proposal::{RawProposal, SourceChange};
use crate::relevance;
use crate::typing::Typer;

/// Proposals for an unknown type name.
pub struct UnresolvedType;

/// One "Explicitly import" proposal per type an ambiguous simple name could mean.
pub struct AmbiguousType;

const PRIMITIVES: [PrimitiveType; 8] = [
    PrimitiveType::Boolean,
    PrimitiveType::Byte,
    PrimitiveType::Short,
    PrimitiveType::Char,
    PrimitiveType::Int,
    PrimitiveType::Long,
    PrimitiveType::Float,
    PrimitiveType::Double,
];

/// Where the unknown reference sits, which decides what may be declared for it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Position {
    Annotation,
    SuperClass,
    SuperInterface,
    Thrown,
    Instantiation,
    Other,
}

/// The unresolved reference: its (possibly qualified) name, the type syntax holding it
/// and the index of that syntax on the path.
struct Reference<'a> {
    range: Span,
    name: &'a str,
    type_ref: Option<(usize, &'a TypeRef)>,
    position: Position,
    type_args: usize,
}

impl<'a> Reference<'a> {
    fn simple(&self) -> &'a str {
        simple_name(self.name)
    }

    fn qualifier(&self) -> Option<&'a str> {
        self.name.rsplit_once('.').map(|(qualifier, _)| qualifier)
    }

    /// `true` when the reference is the whole type syntax, not an argument or array
    /// element of it.
    fn is_outermost(&self) -> bool {
        self.type_ref
            .is_some_and(|(_, ty)| {
                ty.range.start == self.range.start && ty.base_name() == self.name
            })
    }
}

fn reference<'a>(
    ctx: &CorrectionContext<'a>,
    path: &NodePath<'a>,
    range: Span,
) -> Option<Reference<'a>> {
    let text = ctx.text();
    let name = range.slice(text).trim();
    if name.is_empty() {
        return None;
    }
    let type_ref = path
        .nodes()
        .iter()
        .enumerate()
        .rev()
        .find_map(|(idx, node)| match node {
            NodeRef::TypeRef(ty) if ty.range.contains_span(range) => Some((idx, *ty)),
            _ => None,
        });
    let before = text[..range.start].trim_end();
    let position = if before.ends_with('@') {
        Position::Annotation
    } else {
        match type_ref.and_then(|(idx, ty)| path.parent(idx).map(|parent| (parent, ty))) {
            Some((NodeRef::Type(decl), ty)) => {
                let in_extends = decl.extends.iter().any(|e| e.range == ty.range);
                if in_extends && decl.kind == TypeKind::Class {
                    Position::SuperClass
                } else {
                    Position::SuperInterface
                }
            }
            Some((NodeRef::Catch(_), _)) => Position::Thrown,
            Some((NodeRef::Method(method), ty))
                if method.throws.iter().any(|t| t.range == ty.range) =>
            {
                Position::Thrown
            }
            Some((NodeRef::Expr(Expr::New(_)), _)) => Position::Instantiation,
            _ => Position::Other,
        }
    };
    Some(Reference {
        range,
        name,
        type_ref,
        position,
        type_args: type_argument_count(&text[range.end..]),
    })
}

/// Number of type arguments written right after a type name.
fn type_argument_count(rest: &str) -> usize {
    let rest = rest.trim_start();
    if !rest.starts_with('<') {
        return 0;
    }
    let mut depth = 0;
    let mut count = 1;
    for c in rest.chars() {
        match c {
            '<' => depth += 1,
            '>' => {
                depth -= 1;
                if depth == 0 {
                    return count;
                }
            }
            ',' if depth == 1 => count += 1,
            _ => {}
        }
    }
    0
}

/// Type parameter names for a created generic type: `T`, or `T1`, `T2`, ...
fn type_parameter_names(count: usize) -> Vec<String> {
    match count {
        0 => Vec::new(),
        1 => vec!["T".to_string()],
        n => (1..=n).map(|i| format!("T{i}")).collect(),
    }
}

/// Classes a simple name could be changed to: top-level types visible from the file and
/// member types of the enclosing types.
fn visible_classes<'a>(ctx: &CorrectionContext<'a>, path: &NodePath<'a>) -> Vec<&'a ClassDef> {
    let package = ctx.file.package();
    let enclosing: Vec<String> = path.types().into_iter().map(|(name, _)| name).collect();
    ctx.env()
        .classes()
        .into_iter()
        .filter(|class| match &class.enclosing {
            None => class.visibility == Visibility::Public || class.package == package,
            Some(outer) => enclosing.contains(outer),
        })
        .collect()
}

/// What a proposal shows after a class name: the package, or the declaring type for
/// member types.
fn origin(class: &ClassDef) -> &str {
    class.enclosing.as_deref().unwrap_or(&class.package)
}

fn change_to_class(
    ctx: &CorrectionContext<'_>,
    typer: &Typer<'_>,
    reference: &Reference<'_>,
    class: &ClassDef,
) -> RawProposal {
    let simple = class.simple_name();
    let mut imports = ctx.import_rewrite();
    let written = match typer.resolve_type_name(simple) {
        Some(visible) if visible == class.name => simple.to_string(),
        _ => imports.class_name(&class.name),
    };
    let label = match origin(class) {
        "" => format!("Change to '{simple}'"),
        origin => format!("Change to '{simple}' ({origin})"),
    };
    RawProposal::quick_fix(label, relevance::CHANGE_TO_SIMILAR_TYPE)
        .replace(ctx.file_id(), reference.range, written)
        .with_changes(imports.changes())
}

/// The class the initializer of the declaration typed by the reference produces.
fn initializer_class<'a>(
    typer: &Typer<'a>,
    path: &NodePath<'a>,
    reference: &Reference<'_>,
) -> Option<&'a ClassDef> {
    if !reference.is_outermost() {
        return None;
    }
    let (idx, _) = reference.type_ref?;
    let declarators = match path.parent(idx)? {
        NodeRef::Stmt(Stmt::LocalVar(local)) => &local.declarators,
        NodeRef::Field(field) => &field.declarators,
        _ => return None,
    };
    let [declarator] = declarators.as_slice() else {
        return None;
    };
    let ty = typer.type_of(declarator.init.as_ref()?).upper_bound();
    typer.env().class(ty.class_name()?)
}

impl UnresolvedType {
    /// "Import '<T>' (<package>)" for types with exactly the written name.
    fn imports(
        &self,
        ctx: &CorrectionContext<'_>,
        reference: &Reference<'_>,
        classes: &[&ClassDef],
    ) -> Vec<RawProposal> {
        if reference.qualifier().is_some() {
            return Vec::new();
        }
        classes
            .iter()
            .filter(|class| class.enclosing.is_none() && class.simple_name() == reference.name)
            .map(|class| {
                RawProposal::quick_fix(
                    format!("Import '{}' ({})", class.simple_name(), class.package),
                    relevance::IMPORT_TYPE,
                )
                .with_changes([SourceChange::AddImport {
                    file: ctx.file_id().clone(),
                    name: class.name.clone(),
                }])
            })
            .collect()
    }

    fn similar(
        &self,
        ctx: &CorrectionContext<'_>,
        typer: &Typer<'_>,
        path: &NodePath<'_>,
        reference: &Reference<'_>,
        classes: &[&ClassDef],
    ) -> Vec<RawProposal> {
        let simple = reference.simple();
        let qualifier = reference.qualifier();
        let mut scored: Vec<(i32, &ClassDef)> = classes
            .iter()
            .filter(|class| class.simple_name() != simple)
            .filter(|class| qualifier.map_or(true, |q| origin(class) == q))
            .filter_map(|class| {
                similarity(simple, class.simple_name()).map(|score| (score, *class))
            })
            .collect();
        scored.sort_by(|a, b| {
            b.0.cmp(&a.0)
                .then_with(|| cmp_by_match(simple, a.1.simple_name(), b.1.simple_name()))
                .then_with(|| a.1.name.cmp(&b.1.name))
        });

        let mut out = Vec::new();
        let mut offered: Vec<&str> = Vec::new();
        if let Some(class) = initializer_class(typer, path, reference) {
            offered.push(&class.name);
            out.push(change_to_class(ctx, typer, reference, class));
        }
        for (_, class) in scored {
            if !offered.contains(&class.name.as_str()) {
                offered.push(&class.name);
                out.push(change_to_class(ctx, typer, reference, class));
            }
        }

        let mut vars: Vec<(i32, &str)> = typer
            .type_vars()
            .iter()
            .filter(|var| var.as_str() != simple)
            .filter_map(|var| similarity(simple, var).map(|score| (score, var.as_str())))
            .collect();
        let primitives_allowed = reference.qualifier().is_none()
            && reference.type_args == 0
            && reference.is_outermost()
            && reference.position == Position::Other;
        if primitives_allowed {
            vars.extend(
                PRIMITIVES
                    .iter()
                    .filter_map(|p| {
                        similarity(simple, p.keyword()).map(|score| (score, p.keyword()))
                    }),
            );
        }
        vars.sort_by(|a, b| b.0.cmp(&a.0).then_with(|| cmp_by_match(simple, a.1, b.1)));
        out.extend(vars.into_iter().map(|(_, name)| {
            RawProposal::quick_fix(format!("Change to '{name}'"), relevance::CHANGE_TO_SIMILAR_TYPE)
                .replace(ctx.file_id(), reference.range, name)
        }));
        out
    }

    /// "Create class '<N>'" and its siblings, each creating a new compilation unit.
    fn create(&self, ctx: &CorrectionContext<'_>, reference: &Reference<'_>) -> Vec<RawProposal> {
        let simple = reference.simple();
        if !simple.starts_with(|c: char| c.is_ascii_uppercase()) {
            return Vec::new();
        }
        let current = ctx.file.package();
        let package = match reference.qualifier() {
            Some(qualifier) if qualifier.starts_with(|c: char| c.is_ascii_lowercase()) => qualifier,
            Some(_) => return Vec::new(),
            None => current,
        };
        let path = resource_path(ctx.file_id(), current, package, simple);
        if ctx.workspace.file(&FileId::new(path.as_str())).is_some() {
            return Vec::new();
        }

        let params = type_parameter_names(reference.type_args);
        let declared = if params.is_empty() {
            simple.to_string()
        } else {
            format!("{simple}<{}>", params.join(", "))
        };
        let kinds: &[TypeKind] = match reference.position {
            Position::Annotation => &[TypeKind::Annotation],
            Position::SuperClass | Position::Thrown => &[TypeKind::Class],
            Position::SuperInterface => &[TypeKind::Interface],
            Position::Instantiation => &[TypeKind::Class],
            Position::Other if !params.is_empty() => &[TypeKind::Class, TypeKind::Interface],
            Position::Other => &[TypeKind::Class, TypeKind::Interface, TypeKind::Enum],
        };

        kinds
            .iter()
            .map(|kind| {
                let (noun, keyword, relevance) = match kind {
                    TypeKind::Interface => ("interface", "interface", relevance::CREATE_INTERFACE),
                    TypeKind::Enum => ("enum", "enum", relevance::CREATE_ENUM),
                    TypeKind::Annotation => (
                        "annotation",
                        "@interface",
                        relevance::CREATE_ANNOTATION,
                    ),
                    _ => ("class", "class", relevance::CREATE_CLASS),
                };
                let mut label = format!("Create {noun} '{declared}'");
                if package != current {
                    label.push_str(&format!(" in package '{package}'"));
                }
                let supertype = if reference.position == Position::Thrown {
                    " extends Exception"
                } else {
                    ""
                };
                let mut content = String::new();
                if !package.is_empty() {
                    content.push_str(&format!("package {package};\n\n"));
                }
                if ctx.config.generates_comments() {
                    content.push_str("/**\n * \n */\n\n");
                }
                content.push_str(&format!("public {keyword} {declared}{supertype} {{\n\n}}\n"));
                RawProposal::quick_fix(label, relevance).create_resource(path.clone(), content)
            })
            .collect()
    }

    /// "Add type parameter '<N>' to '<T>'" for the innermost enclosing type and method.
    fn type_parameters(
        &self,
        ctx: &CorrectionContext<'_>,
        path: &NodePath<'_>,
        reference: &Reference<'_>,
    ) -> Vec<RawProposal> {
        if reference.qualifier().is_some()
            || reference.type_args > 0
            || matches!(
                reference.position,
                Position::Annotation
                    | Position::Instantiation
                    | Position::SuperClass
                    | Position::SuperInterface
            )
        {
            return Vec::new();
        }
        let text = ctx.text();
        let file = ctx.file_id();
        let name = reference.name;
        let mut out = Vec::new();

        if let Some((_, decl)) = path.types().pop() {
            if path.anonymous_class().is_none()
                && !path.in_static_context()
                && accepts_type_parameters(decl)
            {
                let shown = match decl.type_params_range {
                    Some(range) => format!("{}{}", decl.name, range.slice(text)),
                    None => decl.name.clone(),
                };
                let raw = RawProposal::quick_fix(
                    format!("Add type parameter '{name}' to '{shown}'"),
                    relevance::ADD_TYPE_PARAMETER,
                );
                out.push(match decl.type_params_range {
                    Some(range) => raw.insert(file, range.end - 1, format!(", {name}")),
                    None => raw.insert(file, decl.name_range.end, format!("<{name}>")),
                });
            }
        }

        if let Some(method) = path.enclosing_method() {
            let params: Vec<String> = method
                .params
                .iter()
                .map(|p| {
                    if p.varargs {
                        format!("{}...", p.ty.text)
                    } else {
                        p.ty.text.clone()
                    }
                })
                .collect();
            let raw = RawProposal::quick_fix(
                format!("Add type parameter '{name}' to '{}({})'", method.name, params.join(", ")),
                relevance::ADD_TYPE_PARAMETER,
            );
            out.push(match method.type_params_range {
                Some(range) => raw.insert(file, range.end - 1, format!(", {name}")),
                None => {
                    let at = method
                        .return_ty
                        .as_ref()
                        .map_or(method.name_range.start, |ret| ret.range.start);
                    raw.insert(file, at, format!("<{name}> "))
                }
            });
        }
        out
    }
}

fn accepts_type_parameters(decl: &TypeDecl) -> bool {
    matches!(decl.kind, TypeKind::Class | TypeKind::Interface | TypeKind::Record)
}

/// Path of a new compilation unit for `name` in `package`, under the source root of
/// `file`.
fn resource_path(file: &FileId, current: &str, package: &str, name: &str) -> String {
    let dir = file.as_str().rsplit_once('/').map_or("", |(dir, _)| dir);
    let current_dir = current.replace('.', "/");
    let root = dir
        .strip_suffix(current_dir.as_str())
        .map(|root| root.trim_end_matches('/'))
        .unwrap_or(dir);
    let package_dir = package.replace('.', "/");
    [root, package_dir.as_str(), &format!("{name}.java")]
        .iter()
        .filter(|part| !part.is_empty())
        .copied()
        .collect::<Vec<_>>()
        .join("/")
}

impl Corrector for UnresolvedType {
    fn name(&self) -> &'static str {
        "unresolved-type"
    }

    fn propose(&self, ctx: &CorrectionContext<'_>, diagnostic: &Diagnostic) -> Vec<RawProposal> {
        let path = ctx.path(diagnostic.range);
        let Some(reference) = reference(ctx, &path, diagnostic.range) else {
            return Vec::new();
        };
        let typer = ctx.typer(&path);
        let classes = visible_classes(ctx, &path);

        let mut out = self.imports(ctx, &reference, &classes);
        out.extend(self.similar(ctx, &typer, &path, &reference, &classes));
        if out.is_empty() {
            out.extend(self.create(ctx, &reference));
        }
        out.extend(self.type_parameters(ctx, &path, &reference));
        tracing::debug!(
            target: "mend.correction",
            name = reference.name,
            count = out.len(),
            "unresolved type proposals"
        );
        out
    }
}

impl Corrector for AmbiguousType {
    fn name(&self) -> &'static str {
        "ambiguous-type"
    }

    fn propose(&self, ctx: &CorrectionContext<'_>, diagnostic: &Diagnostic) -> Vec<RawProposal> {
        let simple = diagnostic.range.slice(ctx.text()).trim();
        let mut candidates: Vec<String> = diagnostic
            .arguments
            .iter()
            .filter(|arg| arg.contains('.') && simple_name(arg) == simple)
            .cloned()
            .collect();
        if candidates.is_empty() {
            candidates = ctx
                .unit()
                .imports
                .iter()
                .filter(|import| import.is_star && !import.is_static)
                .map(|import| format!("{}.{simple}", import.path))
                .filter(|name| ctx.env().class(name).is_some())
                .collect();
        }
        candidates.sort();
        candidates.dedup();

        candidates
            .into_iter()
            .map(|name| {
                let edit = explicit_import(ctx.file, &name);
                RawProposal::quick_fix(
                    format!("Explicitly import '{name}'"),
                    relevance::IMPORT_TYPE,
                )
                    .insert(ctx.file_id(), edit.range.start, edit.replacement)
            })
            .collect()
    }
}
