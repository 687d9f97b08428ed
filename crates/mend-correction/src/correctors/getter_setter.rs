//! Accessor generation for an unused private field.

use mend_core::{text, Diagnostic};
use mend_syntax::ast::{FieldDecl, MemberDecl, TypeDecl};
use mend_syntax::visit::NodeRef;

use crate::codegen::MethodStub;
use crate::context::CorrectionContext;
use crate::dispatch::Corrector;
use crate::names::{getter_name, setter_name};
use crate::proposal::RawProposal;
use crate::relevance;

/// "Create getter and setter for '<name>'...".
pub struct GetterSetter;

/// Blank lines to keep between the field and each accessor: the gap in front of the
/// member after the field, or one when the field is the last member.
fn accessor_gap(source: &str, decl: &TypeDecl, field: &FieldDecl) -> usize {
    let idx = decl
        .members
        .iter()
        .position(|m| matches!(m, MemberDecl::Field(f) if std::ptr::eq(f, field)));
    match idx.and_then(|idx| decl.members.get(idx + 1)) {
        Some(next) => text::blank_lines_before(source, next.full_start()),
        None => 1,
    }
}

impl Corrector for GetterSetter {
    fn name(&self) -> &'static str {
        "getter-setter"
    }

    fn propose(&self, ctx: &CorrectionContext<'_>, diagnostic: &Diagnostic) -> Vec<RawProposal> {
        let path = ctx.path(diagnostic.range);
        let nodes = path.nodes();
        let Some(pos) = nodes.iter().rposition(|node| {
            matches!(node, NodeRef::Declarator(d) if d.name_range.intersects(diagnostic.range))
        }) else {
            return Vec::new();
        };
        let (Some(NodeRef::Declarator(declarator)), Some(NodeRef::Field(field))) =
            (path.get(pos), path.parent(pos))
        else {
            return Vec::new();
        };
        let Some((_, decl)) = path.enclosing_type() else {
            return Vec::new();
        };
        if decl.is_interface() {
            return Vec::new();
        }

        let source = ctx.text();
        let typer = ctx.typer(&path);
        let mut ty_text = field.ty.text.clone();
        ty_text.push_str(&"[]".repeat(declarator.dims));
        let ty = typer.lower_text(&ty_text);
        let name = declarator.name.as_str();
        let is_static = field.modifiers.is_static();
        let with_docs = ctx.config.generates_comments();
        let modifiers = if is_static { "public static" } else { "public" };

        let indent = text::indentation_at(source, field.range.start);
        let unit = ctx.indent_unit();
        let gap = "\n".repeat(accessor_gap(source, decl, field));

        let getter = MethodStub {
            modifiers: modifiers.to_string(),
            return_type: Some(ty_text.clone()),
            name: getter_name(name, &ty),
            body: Some(vec![format!("return {name};")]),
            javadoc: with_docs.then(|| vec![format!("@return the {name}")]),
            ..MethodStub::default()
        };
        let mut insert = format!("\n{gap}{}", getter.render(indent, unit));

        if !field.modifiers.has("final") {
            let target = if is_static {
                format!("{}.{name}", decl.name)
            } else {
                format!("this.{name}")
            };
            let setter = MethodStub {
                modifiers: modifiers.to_string(),
                return_type: Some("void".to_string()),
                name: setter_name(name),
                params: vec![(ty_text, name.to_string())],
                body: Some(vec![format!("{target} = {name};")]),
                javadoc: with_docs.then(|| vec![format!("@param {name} the {name} to set")]),
                ..MethodStub::default()
            };
            insert.push_str(&format!("\n{gap}{}", setter.render(indent, unit)));
        }

        vec![RawProposal::quick_fix(
            format!("Create getter and setter for '{name}'..."),
            relevance::GETTER_SETTER,
        )
        .insert(ctx.file_id(), field.range.end, insert)]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::workspace::Workspace;
    use mend_config::{CorrectionConfig, GeneratedCommentPolicy};
    use mend_core::{FileId, ProblemKind, Span};
    use pretty_assertions::assert_eq;

    fn apply(text: &str, name: &str, config: &CorrectionConfig) -> String {
        let workspace = Workspace::new([("test1/E.java", text)]);
        let file = workspace.file(&FileId::new("test1/E.java")).expect("file");
        let start = text
            .find(&format!("{name}="))
            .or_else(|| text.find(&format!("{name};")))
            .expect("name");
        let range = Span::new(start, start + name.len());
        let diagnostics =
            [Diagnostic::new(ProblemKind::UnusedPrivateField, range).with_args([name])];
        let ctx = CorrectionContext::new(
            &workspace,
            file,
            &diagnostics,
            diagnostics[0].range,
            config,
        );
        let raw = GetterSetter
            .propose(&ctx, &diagnostics[0])
            .pop()
            .expect("proposal");
        let proposal = crate::materialize::materialize(&workspace, raw).expect("materialize");
        proposal.edit.apply_to(&file.id, text).expect("apply")
    }

    #[test]
    fn accessors_follow_the_field_with_documentation() {
        let text = "package test1;\npublic class E {\n    private int count;\n}\n";
        assert_eq!(
            apply(text, "count", &CorrectionConfig::default()),
            "package test1;\npublic class E {\n    private int count;\n\n    /**\n     * @return the count\n     */\n    public int getCount() {\n        return count;\n    }\n\n    /**\n     * @param count the count to set\n     */\n    public void setCount(int count) {\n        this.count = count;\n    }\n}\n"
        );
    }

    #[test]
    fn accessors_reuse_the_gap_before_the_next_member() {
        let text = "package test1;\npublic class E {\n    private int count= 0;\n    public void foo() {\n        count= 1 + 2;\n    }\n}\n";
        assert_eq!(
            apply(text, "count", &CorrectionConfig::default()),
            "package test1;\npublic class E {\n    private int count= 0;\n    /**\n     * @return the count\n     */\n    public int getCount() {\n        return count;\n    }\n    /**\n     * @param count the count to set\n     */\n    public void setCount(int count) {\n        this.count = count;\n    }\n    public void foo() {\n        count= 1 + 2;\n    }\n}\n"
        );
    }

    #[test]
    fn comment_policy_and_modifiers_shape_the_accessors() {
        let config = CorrectionConfig {
            generated_comment_policy: GeneratedCommentPolicy::None,
            ..CorrectionConfig::default()
        };
        let text = "package test1;\npublic class E {\n    private static final boolean active;\n}\n";
        assert_eq!(
            apply(text, "active", &config),
            "package test1;\npublic class E {\n    private static final boolean active;\n\n    public static boolean isActive() {\n        return active;\n    }\n}\n"
        );
    }
}
