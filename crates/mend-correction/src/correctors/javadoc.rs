//! Javadoc tag corrections: missing tags, stray tags, missing comments and
//! unqualified member type references.

use mend_core::{text, Diagnostic, ProblemKind, Span};
use mend_syntax::ast::{FieldDecl, MethodDecl, TypeDecl, TypeParam};
use mend_syntax::javadoc::Javadoc;
use mend_syntax::visit::{walk_unit, NodeRef};
use mend_types::simple_name;

use crate::context::{CorrectionContext, NodePath};
use crate::dispatch::Corrector;
use crate::proposal::RawProposal;
use crate::relevance;

use super::method_def;

/// A tag the declaration requires, in canonical order.
#[derive(Debug, Clone, PartialEq, Eq)]
enum RequiredTag {
    TypeParam(String),
    Param(String),
    Return,
    Throws(String),
}

impl RequiredTag {
    fn tag_name(&self) -> &'static str {
        match self {
            RequiredTag::TypeParam(_) | RequiredTag::Param(_) => "param",
            RequiredTag::Return => "return",
            RequiredTag::Throws(_) => "throws",
        }
    }

    /// `@param a`, `@param <T>`, `@return`, `@throws X`.
    fn render(&self) -> String {
        match self {
            RequiredTag::TypeParam(name) => format!("@param <{name}>"),
            RequiredTag::Param(name) => format!("@param {name}"),
            RequiredTag::Return => "@return".to_string(),
            RequiredTag::Throws(ty) => format!("@throws {ty}"),
        }
    }

    fn matches(&self, tag: &mend_syntax::javadoc::JavadocTag) -> bool {
        let arg = tag.arg.as_deref();
        match self {
            RequiredTag::TypeParam(name) => {
                tag.is_param() && arg == Some(format!("<{name}>").as_str())
            }
            RequiredTag::Param(name) => tag.is_param() && arg == Some(name.as_str()),
            RequiredTag::Return => tag.is_return(),
            RequiredTag::Throws(ty) => {
                tag.is_throws() && arg.is_some_and(|a| simple_name(a) == simple_name(ty))
            }
        }
    }
}

/// The documented declaration a diagnostic points into.
#[derive(Debug, Clone, Copy)]
enum Documented<'a> {
    Type(&'a TypeDecl),
    Method(&'a MethodDecl),
    Field(&'a FieldDecl),
}

impl<'a> Documented<'a> {
    fn javadoc(&self) -> Option<&'a Javadoc> {
        match self {
            Documented::Type(decl) => decl.javadoc.as_ref(),
            Documented::Method(decl) => decl.javadoc.as_ref(),
            Documented::Field(decl) => decl.javadoc.as_ref(),
        }
    }

    fn decl_start(&self) -> usize {
        match self {
            Documented::Type(decl) => decl.decl_start(),
            Documented::Method(decl) => decl.decl_start(),
            Documented::Field(decl) => decl.range.start,
        }
    }

    fn required_tags(&self) -> Vec<RequiredTag> {
        let type_params = |params: &[TypeParam]| -> Vec<RequiredTag> {
            params
                .iter()
                .map(|tp| RequiredTag::TypeParam(tp.name.clone()))
                .collect()
        };
        match self {
            Documented::Type(decl) => {
                let mut out = type_params(&decl.type_params);
                out.extend(
                    decl.record_components
                        .iter()
                        .map(|c| RequiredTag::Param(c.name.clone())),
                );
                out
            }
            Documented::Method(method) => {
                let mut out = type_params(&method.type_params);
                out.extend(method.params.iter().map(|p| RequiredTag::Param(p.name.clone())));
                if !method.is_constructor() && !method.is_void() {
                    out.push(RequiredTag::Return);
                }
                for thrown in &method.throws {
                    let tag = RequiredTag::Throws(thrown.text.clone());
                    if !out.contains(&tag) {
                        out.push(tag);
                    }
                }
                out
            }
            Documented::Field(_) => Vec::new(),
        }
    }
}

/// The innermost documentable declaration on the path.
fn documented<'a>(path: &NodePath<'a>) -> Option<Documented<'a>> {
    path.nodes().iter().rev().find_map(|node| match node {
        NodeRef::Type(decl) => Some(Documented::Type(decl)),
        NodeRef::Method(decl) => Some(Documented::Method(decl)),
        NodeRef::Field(decl) => Some(Documented::Field(decl)),
        _ => None,
    })
}

/// The tag a missing-tag diagnostic asks for.
fn requested_tag(diagnostic: &Diagnostic, required: &[RequiredTag]) -> Option<RequiredTag> {
    match diagnostic.kind {
        ProblemKind::JavadocMissingReturnTag => Some(RequiredTag::Return),
        ProblemKind::JavadocMissingParamTag => {
            let name = diagnostic.arg(0)?;
            let bare = name.trim_start_matches('<').trim_end_matches('>');
            let wanted = [
                RequiredTag::Param(bare.to_string()),
                RequiredTag::TypeParam(bare.to_string()),
            ];
            let prefer_type_param = name.starts_with('<');
            let order: [&RequiredTag; 2] = if prefer_type_param {
                [&wanted[1], &wanted[0]]
            } else {
                [&wanted[0], &wanted[1]]
            };
            let found = order.into_iter().find(|tag| required.contains(tag)).cloned();
            found
        }
        ProblemKind::JavadocMissingThrowsTag => {
            let name = simple_name(diagnostic.arg(0)?);
            required
                .iter()
                .find(|tag| matches!(tag, RequiredTag::Throws(ty) if simple_name(ty) == name))
                .cloned()
        }
        _ => None,
    }
}

/// Offset where `missing` belongs in `doc`, keeping the canonical order.
fn insertion_offset(
    text: &str,
    doc: &Javadoc,
    required: &[RequiredTag],
    missing: &RequiredTag,
) -> usize {
    let rank_of =
        |tag: &mend_syntax::javadoc::JavadocTag| required.iter().position(|r| r.matches(tag));
    let own_rank = required.iter().position(|r| r == missing).unwrap_or(usize::MAX);

    if let Some(next) = doc
        .tags
        .iter()
        .find(|tag| rank_of(tag).is_some_and(|rank| rank > own_rank))
    {
        return text::line_start(text, next.lines.start);
    }
    let previous = doc
        .tags
        .iter()
        .filter(|tag| rank_of(tag).is_some_and(|rank| rank < own_rank))
        .last()
        .or_else(|| doc.tags.last());
    match previous {
        Some(tag) if tag.on_own_line => tag.lines.end,
        Some(tag) => text::line_end_with_newline(text, tag.range.end),
        None => doc.close_line_start,
    }
}

/// One ` * @tag arg ` line at the comment's indentation.
fn tag_line(text: &str, doc: &Javadoc, tag: &RequiredTag) -> String {
    let indent = text::indentation_at(text, doc.range.start);
    format!("{indent} * {} \n", tag.render())
}

/// "Add '@param' tag" and friends, plus "Add all missing tags".
pub struct MissingTags;

impl Corrector for MissingTags {
    fn name(&self) -> &'static str {
        "javadoc-missing-tags"
    }

    fn propose(&self, ctx: &CorrectionContext<'_>, diagnostic: &Diagnostic) -> Vec<RawProposal> {
        let path = ctx.path(diagnostic.range);
        let Some(decl) = documented(&path) else {
            return Vec::new();
        };
        let Some(doc) = decl.javadoc() else {
            return Vec::new();
        };
        if !doc.close_on_own_line {
            return Vec::new();
        }
        let text = ctx.text();
        let required = decl.required_tags();
        let missing: Vec<&RequiredTag> = required
            .iter()
            .filter(|req| !doc.tags.iter().any(|tag| req.matches(tag)))
            .collect();

        let mut out = Vec::new();
        if let Some(tag) = requested_tag(diagnostic, &required).filter(|t| missing.contains(&t)) {
            let offset = insertion_offset(text, doc, &required, &tag);
            out.push(
                RawProposal::quick_fix(
                    format!("Add '@{}' tag", tag.tag_name()),
                    relevance::ADD_JAVADOC_TAG,
                )
                .insert(ctx.file_id(), offset, tag_line(text, doc, &tag)),
            );
        }
        if !missing.is_empty() {
            let mut all =
                RawProposal::quick_fix("Add all missing tags", relevance::ADD_ALL_MISSING_TAGS);
            for tag in &missing {
                let offset = insertion_offset(text, doc, &required, tag);
                all.push_insert(ctx.file_id(), offset, tag_line(text, doc, tag));
            }
            out.push(all);
        }
        out
    }
}

/// The comment containing `offset`, on any declaration of the unit.
fn javadoc_at<'a>(ctx: &CorrectionContext<'a>, offset: usize) -> Option<&'a Javadoc> {
    let mut found = None;
    walk_unit(ctx.unit(), &mut |node| {
        if found.is_some() {
            return false;
        }
        let doc = match node {
            NodeRef::Type(decl) => decl.javadoc.as_ref(),
            NodeRef::Method(decl) => decl.javadoc.as_ref(),
            NodeRef::Field(decl) => decl.javadoc.as_ref(),
            _ => None,
        };
        if let Some(doc) = doc.filter(|doc| doc.range.contains(offset)) {
            found = Some(doc);
            return false;
        }
        true
    });
    found
}

/// "Remove tag" for invalid, duplicate and unexpected tags.
pub struct RemoveTag;

impl Corrector for RemoveTag {
    fn name(&self) -> &'static str {
        "javadoc-remove-tag"
    }

    fn propose(&self, ctx: &CorrectionContext<'_>, diagnostic: &Diagnostic) -> Vec<RawProposal> {
        let Some(doc) = javadoc_at(ctx, diagnostic.range.start) else {
            return Vec::new();
        };
        let Some(tag) = doc.tag_at(diagnostic.range.start) else {
            return Vec::new();
        };
        vec![RawProposal::quick_fix("Remove tag", relevance::REMOVE_JAVADOC_TAG)
            .delete(ctx.file_id(), tag.lines)]
    }
}

/// `true` when a method overrides or implements a supertype method and so inherits
/// its documentation.
fn inherits_doc(ctx: &CorrectionContext<'_>, path: &NodePath<'_>, method: &MethodDecl) -> bool {
    if method.modifiers.has_annotation("Override") {
        return true;
    }
    let Some((type_name, _)) = path.enclosing_type() else {
        return false;
    };
    method_def(ctx.env(), &type_name, method).is_some_and(|(class, def)| {
        !mend_types::overridden_methods(ctx.env(), class, def).is_empty()
    })
}

/// "Add Javadoc for '<name>'".
pub struct MissingComment;

impl Corrector for MissingComment {
    fn name(&self) -> &'static str {
        "javadoc-missing-comment"
    }

    fn propose(&self, ctx: &CorrectionContext<'_>, diagnostic: &Diagnostic) -> Vec<RawProposal> {
        let path = ctx.path(diagnostic.range);
        let Some(decl) = documented(&path) else {
            return Vec::new();
        };
        if decl.javadoc().is_some() {
            return Vec::new();
        }
        let name = match decl {
            Documented::Type(ty) => ty.name.clone(),
            Documented::Method(method) => {
                if inherits_doc(ctx, &path, method) {
                    return Vec::new();
                }
                method.name.clone()
            }
            Documented::Field(field) => {
                let declarator = field
                    .declarators
                    .iter()
                    .find(|d| d.range.intersects(diagnostic.range))
                    .or_else(|| field.declarators.first());
                match declarator {
                    Some(d) => d.name.clone(),
                    None => return Vec::new(),
                }
            }
        };

        let text = ctx.text();
        let (offset, indent) = super::decl_line(text, decl.decl_start());
        let tags = decl.required_tags();
        let mut comment = format!("{indent}/**\n");
        if tags.is_empty() {
            match decl {
                Documented::Field(_) => comment.push_str(&format!("{indent} *\n")),
                _ => comment.push_str(&format!("{indent} * \n")),
            }
        }
        for tag in &tags {
            comment.push_str(&format!("{indent} * {}\n", tag.render()));
        }
        comment.push_str(&format!("{indent} */\n"));

        vec![RawProposal::quick_fix(
            format!("Add Javadoc for '{name}'"),
            relevance::ADD_JAVADOC_COMMENT,
        )
        .insert(ctx.file_id(), offset, comment)]
    }
}

/// "Qualify inner type name" inside a comment reference.
pub struct QualifyInnerType;

impl Corrector for QualifyInnerType {
    fn name(&self) -> &'static str {
        "javadoc-qualify-inner-type"
    }

    fn propose(&self, ctx: &CorrectionContext<'_>, diagnostic: &Diagnostic) -> Vec<RawProposal> {
        let Some(qualified) = diagnostic.arg(0) else {
            return Vec::new();
        };
        let range: Span = diagnostic.range;
        if range.is_empty() || range.slice(ctx.text()) == qualified {
            return Vec::new();
        }
        vec![RawProposal::quick_fix("Qualify inner type name", relevance::QUALIFY_INNER_TYPE)
            .replace(ctx.file_id(), range, qualified)]
    }
}
