use std::collections::BTreeMap;

use mend_core::{FileId, Span};

use crate::ty::{simple_name, Type};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ClassKind {
    Class,
    Interface,
    Enum,
    Record,
    Annotation,
}

impl ClassKind {
    pub fn is_interface(self) -> bool {
        matches!(self, ClassKind::Interface | ClassKind::Annotation)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Visibility {
    Private,
    Package,
    Protected,
    Public,
}

impl Visibility {
    /// The modifier keyword, empty for package-private.
    pub fn keyword(self) -> &'static str {
        match self {
            Visibility::Private => "private",
            Visibility::Package => "",
            Visibility::Protected => "protected",
            Visibility::Public => "public",
        }
    }
}

/// Where a class definition came from.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Origin {
    /// The bundled JDK stubs, standing in for the classpath.
    Jdk,
    Source(FileId),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeParamDef {
    pub name: String,
    pub bounds: Vec<Type>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldDef {
    pub name: String,
    pub ty: Type,
    pub visibility: Visibility,
    pub is_static: bool,
    pub is_final: bool,
    /// Span of the name in the declaring source file.
    pub name_range: Option<Span>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MethodDef {
    pub name: String,
    pub type_params: Vec<TypeParamDef>,
    pub params: Vec<Type>,
    pub param_names: Vec<String>,
    pub varargs: bool,
    /// `Void` for constructors.
    pub return_type: Type,
    pub throws: Vec<Type>,
    pub visibility: Visibility,
    pub is_static: bool,
    pub is_abstract: bool,
    pub is_constructor: bool,
    /// Implicit default constructor or record accessor.
    pub is_synthetic: bool,
    /// Span of the name in the declaring source file.
    pub name_range: Option<Span>,
}

impl MethodDef {
    /// `name(T1, T2)` with simple type names.
    pub fn signature_label(&self) -> String {
        let params: Vec<String> = self.params.iter().map(Type::simple_display).collect();
        format!("{}({})", self.name, params.join(", "))
    }

    /// Same name and parameter erasures.
    pub fn is_override_equivalent(&self, other: &MethodDef) -> bool {
        self.name == other.name
            && self.params.len() == other.params.len()
            && self
                .params
                .iter()
                .zip(&other.params)
                .all(|(a, b)| erasure_name(a) == erasure_name(b))
    }
}

fn erasure_name(ty: &Type) -> String {
    match ty {
        // Type variables erase to their bound; compare them loosely.
        Type::TypeVar(_) => "java.lang.Object".to_string(),
        other => simple_name(&other.erasure().to_string()).to_string(),
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassDef {
    /// Fully qualified name; nested types use `.` (`java.util.Map.Entry`).
    pub name: String,
    pub package: String,
    pub kind: ClassKind,
    pub visibility: Visibility,
    pub is_static: bool,
    pub is_final: bool,
    pub is_abstract: bool,
    pub type_params: Vec<TypeParamDef>,
    pub super_class: Option<Type>,
    pub interfaces: Vec<Type>,
    pub fields: Vec<FieldDef>,
    pub methods: Vec<MethodDef>,
    /// Qualified name of the enclosing type for member types.
    pub enclosing: Option<String>,
    pub origin: Origin,
    /// Span of the declaration in its source file.
    pub range: Option<Span>,
}

impl ClassDef {
    pub fn simple_name(&self) -> &str {
        simple_name(&self.name)
    }

    pub fn is_interface(&self) -> bool {
        self.kind.is_interface()
    }

    pub fn is_source(&self) -> bool {
        matches!(self.origin, Origin::Source(_))
    }

    pub fn file(&self) -> Option<&FileId> {
        match &self.origin {
            Origin::Source(file) => Some(file),
            Origin::Jdk => None,
        }
    }

    /// The type as seen from inside its own declaration: `List<E>`.
    pub fn this_type(&self) -> Type {
        Type::class(
            self.name.clone(),
            self.type_params
                .iter()
                .map(|tp| Type::TypeVar(tp.name.clone()))
                .collect(),
        )
    }

    pub fn field(&self, name: &str) -> Option<&FieldDef> {
        self.fields.iter().find(|f| f.name == name)
    }

    pub fn methods_named<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a MethodDef> + 'a {
        self.methods
            .iter()
            .filter(move |m| m.name == name && !m.is_constructor)
    }

    pub fn constructors(&self) -> impl Iterator<Item = &MethodDef> {
        self.methods.iter().filter(|m| m.is_constructor)
    }

    /// Member types declared directly inside this type, as qualified names.
    pub fn member_type_name(&self, simple: &str) -> String {
        format!("{}.{simple}", self.name)
    }
}

/// Read access to the class universe.
pub trait TypeEnv: Sync {
    fn class(&self, name: &str) -> Option<&ClassDef>;

    /// All classes in a stable order.
    fn classes(&self) -> Vec<&ClassDef>;

    fn package_exists(&self, package: &str) -> bool {
        self.classes().iter().any(|c| c.package == package)
    }

    fn classes_with_simple_name(&self, simple: &str) -> Vec<&ClassDef> {
        self.classes()
            .into_iter()
            .filter(|c| c.simple_name() == simple)
            .collect()
    }
}

/// An owned class universe: the JDK stubs plus the workspace sources.
#[derive(Debug, Clone, Default)]
pub struct TypeStore {
    classes: BTreeMap<String, ClassDef>,
}

impl TypeStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, class: ClassDef) {
        self.classes.insert(class.name.clone(), class);
    }

    pub fn get_mut(&mut self, name: &str) -> Option<&mut ClassDef> {
        self.classes.get_mut(name)
    }

    pub fn len(&self) -> usize {
        self.classes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }

    /// Drop every class declared in `file`.
    pub fn remove_file(&mut self, file: &FileId) {
        self.classes.retain(|_, class| class.file() != Some(file));
    }
}

impl TypeEnv for TypeStore {
    fn class(&self, name: &str) -> Option<&ClassDef> {
        self.classes.get(name)
    }

    fn classes(&self) -> Vec<&ClassDef> {
        self.classes.values().collect()
    }
}
