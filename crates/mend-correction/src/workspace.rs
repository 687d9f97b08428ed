//! The project snapshot a request is evaluated against.

use std::collections::BTreeMap;

use mend_core::FileId;
use mend_syntax::ast::{CompilationUnit, MethodDecl, TypeDecl};
use mend_types::{add_units, ClassDef, ImportScope, MethodDef, Origin, TypeEnv, TypeStore};

/// One parsed compilation unit.
#[derive(Debug, Clone)]
pub struct SourceFile {
    pub id: FileId,
    pub text: String,
    pub unit: CompilationUnit,
    pub imports: ImportScope,
}

impl SourceFile {
    pub fn parse(id: FileId, text: String) -> Self {
        let unit = mend_syntax::parse(&text).into_compilation_unit();
        let imports = ImportScope::from_unit(&unit);
        Self {
            id,
            text,
            unit,
            imports,
        }
    }

    pub fn package(&self) -> &str {
        &self.imports.package
    }

    /// The declaration of the member or top-level type `qualified`.
    pub fn type_decl(&self, qualified: &str) -> Option<&TypeDecl> {
        self.unit.types.iter().find_map(|decl| {
            let name = self.imports.qualify(&decl.name);
            find_nested(decl, &name, qualified)
        })
    }

    /// Qualified names of every top-level and member type, paired with its declaration.
    pub fn type_decls(&self) -> Vec<(String, &TypeDecl)> {
        fn collect<'a>(decl: &'a TypeDecl, name: String, out: &mut Vec<(String, &'a TypeDecl)>) {
            for nested in decl.nested_types() {
                collect(nested, format!("{name}.{}", nested.name), out);
            }
            out.push((name, decl));
        }
        let mut out = Vec::new();
        for decl in &self.unit.types {
            collect(decl, self.imports.qualify(&decl.name), &mut out);
        }
        out
    }
}

fn find_nested<'a>(decl: &'a TypeDecl, name: &str, target: &str) -> Option<&'a TypeDecl> {
    if name == target {
        return Some(decl);
    }
    if !target.starts_with(name) {
        return None;
    }
    decl.nested_types()
        .find_map(|nested| find_nested(nested, &format!("{name}.{}", nested.name), target))
}

/// All source files of a project plus the class universe built from them and the JDK
/// stubs.
#[derive(Debug, Clone)]
pub struct Workspace {
    files: BTreeMap<FileId, SourceFile>,
    types: TypeStore,
}

impl Workspace {
    /// Parse `sources` (`(path, text)` pairs) and lower their declarations.
    pub fn new<I, P, T>(sources: I) -> Self
    where
        I: IntoIterator<Item = (P, T)>,
        P: Into<String>,
        T: Into<String>,
    {
        let files: BTreeMap<FileId, SourceFile> = sources
            .into_iter()
            .map(|(path, text)| {
                let id = FileId::new(path);
                (id.clone(), SourceFile::parse(id, text.into()))
            })
            .collect();

        let mut types = TypeStore::with_jdk();
        let units: Vec<(Origin, &CompilationUnit)> = files
            .values()
            .map(|file| (Origin::Source(file.id.clone()), &file.unit))
            .collect();
        add_units(&mut types, &units);

        tracing::debug!(
            target: "mend.correction",
            files = files.len(),
            classes = types.len(),
            "workspace loaded"
        );
        Self { files, types }
    }

    pub fn file(&self, id: &FileId) -> Option<&SourceFile> {
        self.files.get(id)
    }

    pub fn files(&self) -> impl Iterator<Item = &SourceFile> {
        self.files.values()
    }

    pub fn types(&self) -> &TypeStore {
        &self.types
    }

    pub fn env(&self) -> &dyn TypeEnv {
        &self.types
    }

    pub fn class(&self, name: &str) -> Option<&ClassDef> {
        self.types.class(name)
    }

    /// The source declaration of a workspace class.
    pub fn declaration(&self, class: &ClassDef) -> Option<(&SourceFile, &TypeDecl)> {
        let file = self.file(class.file()?)?;
        let decl = file.type_decl(&class.name)?;
        Some((file, decl))
    }

    /// The source declaration of a method of a workspace class.
    pub fn method_declaration(
        &self,
        class: &ClassDef,
        method: &MethodDef,
    ) -> Option<(&SourceFile, &TypeDecl, &MethodDecl)> {
        let (file, decl) = self.declaration(class)?;
        let name_range = method.name_range?;
        let method_decl = decl.methods().find(|m| m.name_range == name_range)?;
        Some((file, decl, method_decl))
    }
}
