//! Import management: choosing how a type is spelled in a file, and the text edits that
//! add missing import declarations.

use mend_core::{text, FileId, TextEdit};
use mend_types::{qualifier, resolve_class_name, simple_name, Type, TypeEnv, WildcardBound};

use crate::proposal::SourceChange;
use crate::workspace::SourceFile;

/// Records the imports a change needs while rendering type names for one file.
pub struct ImportRewrite<'a> {
    env: &'a dyn TypeEnv,
    file: &'a SourceFile,
    added: Vec<String>,
}

impl<'a> ImportRewrite<'a> {
    pub fn new(env: &'a dyn TypeEnv, file: &'a SourceFile) -> Self {
        Self {
            env,
            file,
            added: Vec::new(),
        }
    }

    /// The source text for `ty` in this file. Class names are simple when they can be
    /// imported, qualified when the simple name already means a different type.
    pub fn type_text(&mut self, ty: &Type) -> String {
        match ty {
            Type::Void => "void".to_string(),
            Type::Primitive(p) => p.keyword().to_string(),
            Type::Class(class) => {
                let mut out = self.class_name(&class.name);
                if !class.args.is_empty() {
                    let args: Vec<String> = class.args.iter().map(|a| self.type_text(a)).collect();
                    out.push('<');
                    out.push_str(&args.join(", "));
                    out.push('>');
                }
                out
            }
            Type::Array(elem) => format!("{}[]", self.type_text(elem)),
            Type::TypeVar(name) => name.clone(),
            Type::Wildcard(WildcardBound::Unbounded) => "?".to_string(),
            Type::Wildcard(WildcardBound::Extends(bound)) => {
                format!("? extends {}", self.type_text(bound))
            }
            Type::Wildcard(WildcardBound::Super(bound)) => {
                format!("? super {}", self.type_text(bound))
            }
            Type::Null | Type::Unknown => "Object".to_string(),
        }
    }

    /// The source text for the class `qualified`, importing it when needed.
    pub fn class_name(&mut self, qualified: &str) -> String {
        let simple = simple_name(qualified);
        if simple == qualified {
            return qualified.to_string();
        }
        match resolve_class_name(self.env, &self.file.imports, &[], simple) {
            Some(resolved) if resolved == qualified => return simple.to_string(),
            Some(_) => return qualified.to_string(),
            None => {}
        }
        if self.declares_simple_name(simple) {
            return qualified.to_string();
        }
        if let Some(other) = self
            .added
            .iter()
            .find(|added| simple_name(added) == simple)
        {
            if other != qualified {
                return qualified.to_string();
            }
            return simple.to_string();
        }
        self.added.push(qualified.to_string());
        simple.to_string()
    }

    fn declares_simple_name(&self, simple: &str) -> bool {
        self.file
            .type_decls()
            .iter()
            .any(|(_, decl)| decl.name == simple)
    }

    pub fn is_empty(&self) -> bool {
        self.added.is_empty()
    }

    /// The `AddImport` changes for everything rendered so far.
    pub fn changes(&self) -> Vec<SourceChange> {
        self.added
            .iter()
            .map(|name| SourceChange::AddImport {
                file: self.file.id.clone(),
                name: name.clone(),
            })
            .collect()
    }
}

/// `true` if `qualified` is visible in `file` without an import declaration.
pub fn is_implicitly_visible(file: &SourceFile, qualified: &str) -> bool {
    let package = qualifier(qualified);
    package.is_empty() || package == "java.lang" || package == file.package()
}

/// `true` if an import declaration of `file` already covers `qualified`.
pub fn is_imported(file: &SourceFile, qualified: &str) -> bool {
    let package = qualifier(qualified);
    file.unit.imports.iter().any(|import| {
        !import.is_static
            && ((import.is_star && import.path == package)
                || (!import.is_star && import.path == qualified))
    })
}

fn is_static_imported(file: &SourceFile, type_name: &str, member: &str) -> bool {
    file.unit.imports.iter().any(|import| {
        import.is_static
            && ((import.is_star && import.path == type_name)
                || (!import.is_star && import.path == format!("{type_name}.{member}")))
    })
}

/// Text edits adding `types` as single-type imports and `statics` (`(type, member)`) as
/// static imports to `file`. Names that need no import are skipped.
pub fn import_edits(
    file: &SourceFile,
    types: &[String],
    statics: &[(String, String)],
) -> Vec<TextEdit> {
    let mut types: Vec<&str> = types
        .iter()
        .map(String::as_str)
        .filter(|name| !is_implicitly_visible(file, name) && !is_imported(file, name))
        .collect();
    types.sort_unstable();
    types.dedup();

    let mut statics: Vec<String> = statics
        .iter()
        .filter(|(ty, member)| !is_static_imported(file, ty, member))
        .map(|(ty, member)| format!("{ty}.{member}"))
        .collect();
    statics.sort_unstable();
    statics.dedup();

    if types.is_empty() && statics.is_empty() {
        return Vec::new();
    }

    let text = file.text.as_str();
    let imports = &file.unit.imports;
    if imports.is_empty() {
        let mut block = String::new();
        for name in &types {
            block.push_str(&format!("import {name};\n"));
        }
        for name in &statics {
            block.push_str(&format!("import static {name};\n"));
        }
        return vec![block_edit(file, block)];
    }

    let mut edits = Vec::new();
    for name in types {
        edits.push(TextEdit::insert(
            file.id.clone(),
            import_offset(file, name),
            format!("import {name};\n"),
        ));
    }

    let static_imports: Vec<_> = imports.iter().filter(|i| i.is_static).collect();
    for name in statics {
        let offset = match static_imports.iter().find(|i| i.path > name) {
            Some(next) => text::line_start(text, next.range.start),
            None => match static_imports.last().copied().or(imports.last()) {
                Some(last) => text::line_end_with_newline(text, last.range.end),
                None => 0,
            },
        };
        edits.push(TextEdit::insert(
            file.id.clone(),
            offset,
            format!("import static {name};\n"),
        ));
    }
    edits
}

/// Sorted position for a single-type import of `name` in a file that has imports.
fn import_offset(file: &SourceFile, name: &str) -> usize {
    let text = file.text.as_str();
    let imports = &file.unit.imports;
    let regular: Vec<_> = imports.iter().filter(|i| !i.is_static).collect();
    match regular.iter().find(|i| i.path.as_str() > name) {
        Some(next) => text::line_start(text, next.range.start),
        None => match regular.last().copied().or(imports.last()) {
            Some(last) => text::line_end_with_newline(text, last.range.end),
            None => 0,
        },
    }
}

/// A single-type import of `qualified` even when an on-demand import already covers
/// it, which is how an ambiguous simple name is pinned to one type.
pub fn explicit_import(file: &SourceFile, qualified: &str) -> TextEdit {
    let line = format!("import {qualified};\n");
    if file.unit.imports.is_empty() {
        return block_edit(file, line);
    }
    TextEdit::insert(file.id.clone(), import_offset(file, qualified), line)
}

/// A fresh import block: after the package declaration separated by blank lines, or at
/// the top of the file.
fn block_edit(file: &SourceFile, block: String) -> TextEdit {
    let text = file.text.as_str();
    let Some(package) = &file.unit.package else {
        return TextEdit::insert(file.id.clone(), 0, format!("{block}\n"));
    };
    let after_package = text::line_end_with_newline(text, package.range.end);
    let next_line_end = text::line_end(text, after_package);
    if after_package < text.len() && text[after_package..next_line_end].trim().is_empty() {
        let offset = text::line_end_with_newline(text, after_package);
        TextEdit::insert(file.id.clone(), offset, format!("{block}\n"))
    } else {
        TextEdit::insert(file.id.clone(), after_package, format!("\n{block}\n"))
    }
}

/// Group the import requests of a change list by file.
pub(crate) fn collect_import_requests(
    changes: &[SourceChange],
) -> Vec<(FileId, Vec<String>, Vec<(String, String)>)> {
    let mut out: Vec<(FileId, Vec<String>, Vec<(String, String)>)> = Vec::new();
    fn entry(out: &mut Vec<(FileId, Vec<String>, Vec<(String, String)>)>, file: &FileId) -> usize {
        match out.iter().position(|(f, _, _)| f == file) {
            Some(idx) => idx,
            None => {
                out.push((file.clone(), Vec::new(), Vec::new()));
                out.len() - 1
            }
        }
    }
    for change in changes {
        match change {
            SourceChange::AddImport { file, name } => {
                let idx = entry(&mut out, file);
                out[idx].1.push(name.clone());
            }
            SourceChange::AddStaticImport {
                file,
                type_name,
                member,
            } => {
                let idx = entry(&mut out, file);
                out[idx].2.push((type_name.clone(), member.clone()));
            }
            _ => {}
        }
    }
    out
}
