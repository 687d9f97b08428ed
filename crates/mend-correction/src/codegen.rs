//! Source text for generated members and where to put it.

use mend_core::text;
use mend_syntax::ast::{MemberDecl, TypeDecl};

/// A method or constructor to be generated.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MethodStub {
    /// Modifier keywords, e.g. `private static`. May be empty.
    pub modifiers: String,
    pub type_params: Vec<String>,
    /// `None` for constructors.
    pub return_type: Option<String>,
    pub name: String,
    /// `(type, name)` pairs.
    pub params: Vec<(String, String)>,
    /// Body lines without indentation; `None` renders a `;` (interface method).
    pub body: Option<Vec<String>>,
    /// Javadoc content lines, each rendered as ` * line`.
    pub javadoc: Option<Vec<String>>,
}

impl MethodStub {
    /// Render at `indent`, body lines one `unit` deeper. No trailing newline.
    pub fn render(&self, indent: &str, unit: &str) -> String {
        let mut out = String::new();
        if let Some(doc) = &self.javadoc {
            out.push_str(&javadoc_block(doc, indent));
        }
        out.push_str(indent);
        if !self.modifiers.is_empty() {
            out.push_str(&self.modifiers);
            out.push(' ');
        }
        if !self.type_params.is_empty() {
            out.push('<');
            out.push_str(&self.type_params.join(", "));
            out.push_str("> ");
        }
        if let Some(ret) = &self.return_type {
            out.push_str(ret);
            out.push(' ');
        }
        out.push_str(&self.name);
        out.push('(');
        let params: Vec<String> = self
            .params
            .iter()
            .map(|(ty, name)| format!("{ty} {name}"))
            .collect();
        out.push_str(&params.join(", "));
        out.push(')');
        match &self.body {
            None => out.push(';'),
            Some(lines) => {
                out.push_str(" {\n");
                for line in lines {
                    out.push_str(indent);
                    out.push_str(unit);
                    out.push_str(line);
                    out.push('\n');
                }
                out.push_str(indent);
                out.push('}');
            }
        }
        out
    }
}

/// `/**`, one ` * line` per entry (empty entries render as ` *`), ` */`, each line
/// indented and newline-terminated.
pub fn javadoc_block(lines: &[String], indent: &str) -> String {
    let mut out = format!("{indent}/**\n");
    for line in lines {
        if line.is_empty() {
            out.push_str(&format!("{indent} *\n"));
        } else {
            out.push_str(&format!("{indent} * {line}\n"));
        }
    }
    out.push_str(&format!("{indent} */\n"));
    out
}

/// Indentation of the members of `decl`.
pub fn member_indent(text: &str, decl: &TypeDecl, unit: &str) -> String {
    match decl.members.first() {
        Some(member) => text::indentation_at(text, member.full_start()).to_string(),
        None => format!("{}{unit}", text::indentation_at(text, decl.decl_start())),
    }
}

/// Start of a member including any comment lines directly above it.
fn extended_start(text: &str, member: &MemberDecl) -> usize {
    let mut start = text::line_start(text, member.full_start());
    while start > 0 {
        let prev = text::line_start(text, start - 1);
        let line = text[prev..start - 1].trim();
        let is_comment = line.starts_with("//")
            || line.starts_with("/*")
            || line.starts_with('*')
            || line.ends_with("*/");
        if !is_comment || line.is_empty() {
            break;
        }
        start = prev;
    }
    start
}

/// Blank lines to leave before a member inserted after `decl.members[idx]`: the gap
/// in front of that member, or one line when it is the first member.
pub fn member_gap(text: &str, decl: &TypeDecl, idx: usize) -> usize {
    if idx == 0 {
        return 1;
    }
    match decl.members.get(idx) {
        Some(member) => text::blank_lines_before(text, extended_start(text, member)),
        None => 1,
    }
}

/// `(offset, text)` inserting `member` (already indented) after `decl.members[idx]`.
pub fn insert_after_member(
    text: &str,
    decl: &TypeDecl,
    idx: usize,
    member: &str,
) -> Option<(usize, String)> {
    let anchor = decl.members.get(idx)?;
    let gap = member_gap(text, decl, idx);
    Some((anchor.range().end, format!("\n{}{member}", "\n".repeat(gap))))
}

/// `(offset, text)` appending `member` (already indented) as the last member of `decl`,
/// separated by a blank line.
pub fn append_member(text: &str, decl: &TypeDecl, member: &str) -> (usize, String) {
    if let Some(last) = decl.members.last() {
        return (last.range().end, format!("\n\n{member}"));
    }
    let open = decl.body_range.start + 1;
    let close = decl.body_range.end.saturating_sub(1);
    let after_open = text::line_end(text, open);
    if after_open >= close {
        // `{}` on a single line.
        let indent = text::indentation_at(text, decl.decl_start());
        return (open, format!("\n\n{member}\n{indent}"));
    }
    let offset = match decl.enum_constants.last() {
        Some(constant) => text::line_end(text, constant.range.end),
        None => open,
    };
    (offset, format!("\n\n{member}"))
}

/// `(offset, text)` for a new field declaration line `field` (already indented, no
/// newline): after the last field, or at the top of the body followed by a blank line.
pub fn insert_field(text: &str, decl: &TypeDecl, field: &str) -> (usize, String) {
    let last_field = decl
        .members
        .iter()
        .filter(|m| matches!(m, MemberDecl::Field(_)))
        .last();
    if let Some(last) = last_field {
        return (last.range().end, format!("\n{field}"));
    }
    let open = decl.body_range.start + 1;
    let offset = match decl.enum_constants.last() {
        Some(constant) => text::line_end_with_newline(text, constant.range.end),
        None => text::line_end_with_newline(text, open),
    };
    if decl.members.is_empty() {
        (offset, format!("{field}\n"))
    } else {
        (offset, format!("{field}\n\n"))
    }
}
