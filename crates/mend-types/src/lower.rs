//! Lowering of parsed compilation units into class definitions.

use std::collections::HashMap;

use mend_syntax::ast::{
    CompilationUnit, FieldDecl, MemberDecl, MethodDecl, Modifiers, TypeDecl, TypeKind, TypeParam,
};

use crate::env::{
    ClassDef, ClassKind, FieldDef, MethodDef, Origin, TypeEnv, TypeParamDef, TypeStore, Visibility,
};
use crate::ty::{parse_type, Type, OBJECT};

/// The import declarations and package of one compilation unit.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImportScope {
    pub package: String,
    /// Single-type imports: simple name → qualified name.
    pub single: HashMap<String, String>,
    /// Packages (or types) imported on demand.
    pub on_demand: Vec<String>,
    /// Single static imports as `pkg.Type.member`.
    pub static_single: Vec<String>,
    /// Types whose static members are imported on demand.
    pub static_on_demand: Vec<String>,
}

impl ImportScope {
    pub fn from_unit(unit: &CompilationUnit) -> ImportScope {
        let mut scope = ImportScope {
            package: unit
                .package
                .as_ref()
                .map(|p| p.name.clone())
                .unwrap_or_default(),
            ..ImportScope::default()
        };
        for import in &unit.imports {
            match (import.is_static, import.is_star) {
                (false, false) => {
                    scope
                        .single
                        .insert(import.simple_name().to_string(), import.path.clone());
                }
                (false, true) => scope.on_demand.push(import.path.clone()),
                (true, false) => scope.static_single.push(import.path.clone()),
                (true, true) => scope.static_on_demand.push(import.path.clone()),
            }
        }
        scope
    }

    /// The qualified name a top-level type `simple` declared in this unit would get.
    pub fn qualify(&self, simple: &str) -> String {
        if self.package.is_empty() {
            simple.to_string()
        } else {
            format!("{}.{simple}", self.package)
        }
    }
}

/// Resolve a simple or qualified type name as written in source.
///
/// `enclosing` lists the qualified names of the enclosing types, outermost first.
pub fn resolve_class_name(
    env: &dyn TypeEnv,
    imports: &ImportScope,
    enclosing: &[String],
    name: &str,
) -> Option<String> {
    if let Some((first, rest)) = name.split_once('.') {
        if let Some(outer) = resolve_simple(env, imports, enclosing, first) {
            let candidate = format!("{outer}.{rest}");
            if env.class(&candidate).is_some() {
                return Some(candidate);
            }
        }
        return env.class(name).map(|c| c.name.clone());
    }
    resolve_simple(env, imports, enclosing, name)
}

fn resolve_simple(
    env: &dyn TypeEnv,
    imports: &ImportScope,
    enclosing: &[String],
    name: &str,
) -> Option<String> {
    for outer in enclosing.iter().rev() {
        if crate::ty::simple_name(outer) == name {
            return Some(outer.clone());
        }
        let mut current = Some(outer.clone());
        let mut guard = 0;
        while let Some(class_name) = current.take() {
            let candidate = format!("{class_name}.{name}");
            if env.class(&candidate).is_some() {
                return Some(candidate);
            }
            guard += 1;
            if guard > 32 {
                break;
            }
            current = env
                .class(&class_name)
                .and_then(|c| c.super_class.as_ref())
                .and_then(|s| s.class_name())
                .map(str::to_string);
        }
    }

    if let Some(qualified) = imports.single.get(name) {
        return Some(qualified.clone());
    }

    let same_package = imports.qualify(name);
    if env.class(&same_package).is_some() {
        return Some(same_package);
    }

    for package in &imports.on_demand {
        let candidate = format!("{package}.{name}");
        if env.class(&candidate).is_some() {
            return Some(candidate);
        }
    }

    let lang = format!("java.lang.{name}");
    if env.class(&lang).is_some() {
        return Some(lang);
    }
    None
}

/// Name-resolution context for type references inside one declaration.
#[derive(Clone)]
pub struct TypeScope<'a> {
    pub env: &'a dyn TypeEnv,
    pub imports: &'a ImportScope,
    /// Enclosing type names, outermost first.
    pub enclosing: Vec<String>,
    /// Type variables in scope.
    pub type_vars: Vec<String>,
}

impl<'a> TypeScope<'a> {
    pub fn new(env: &'a dyn TypeEnv, imports: &'a ImportScope) -> Self {
        TypeScope {
            env,
            imports,
            enclosing: Vec::new(),
            type_vars: Vec::new(),
        }
    }

    pub fn with_type_vars<'n>(&self, names: impl IntoIterator<Item = &'n str>) -> TypeScope<'a> {
        let mut scope = self.clone();
        scope.type_vars.extend(names.into_iter().map(str::to_string));
        scope
    }

    pub fn resolve_name(&self, name: &str) -> Option<String> {
        resolve_class_name(self.env, self.imports, &self.enclosing, name)
    }

    /// Lower type syntax, resolving class names. Unresolvable names stay as written.
    pub fn lower(&self, text: &str) -> Type {
        match parse_type(text) {
            Ok(ty) => self.resolve(&ty),
            Err(err) => {
                tracing::debug!(target: "mend.types", %err, "unparseable type reference");
                Type::Unknown
            }
        }
    }

    pub fn resolve(&self, ty: &Type) -> Type {
        ty.resolve_names(&|name: &str| {
            if self.type_vars.iter().any(|tv| tv == name) {
                return Some(Type::TypeVar(name.to_string()));
            }
            self.resolve_name(name).map(|q| Type::class(q, Vec::new()))
        })
    }
}

/// Lower `units` into `store`. Names declared in any of the units are visible to all of
/// them.
pub fn add_units(store: &mut TypeStore, units: &[(Origin, &CompilationUnit)]) {
    // Declared names first, so references between the units resolve.
    for (origin, unit) in units {
        let imports = ImportScope::from_unit(unit);
        for decl in &unit.types {
            declare_skeleton(store, &imports, origin, decl, None);
        }
    }

    // Supertypes next, so member types inherited from supertypes resolve.
    let mut with_supers = Vec::new();
    for (_, unit) in units {
        let imports = ImportScope::from_unit(unit);
        for decl in &unit.types {
            lower_supertypes(store, &imports, decl, &[], &[], &mut with_supers);
        }
    }
    for (name, super_class, interfaces, type_params) in with_supers {
        if let Some(class) = store.get_mut(&name) {
            class.super_class = super_class;
            class.interfaces = interfaces;
            class.type_params = type_params;
        }
    }

    let mut lowered = Vec::new();
    for (_, unit) in units {
        let imports = ImportScope::from_unit(unit);
        for decl in &unit.types {
            lower_members(store, &imports, decl, &[], &[], &mut lowered);
        }
    }
    for (name, fields, methods) in lowered {
        if let Some(class) = store.get_mut(&name) {
            class.fields = fields;
            class.methods = methods;
        }
    }
}

fn class_kind(kind: TypeKind) -> ClassKind {
    match kind {
        TypeKind::Class => ClassKind::Class,
        TypeKind::Interface => ClassKind::Interface,
        TypeKind::Enum => ClassKind::Enum,
        TypeKind::Record => ClassKind::Record,
        TypeKind::Annotation => ClassKind::Annotation,
    }
}

fn visibility(modifiers: &Modifiers, interface_member: bool) -> Visibility {
    if modifiers.has("public") {
        Visibility::Public
    } else if modifiers.has("protected") {
        Visibility::Protected
    } else if modifiers.has("private") {
        Visibility::Private
    } else if interface_member {
        Visibility::Public
    } else {
        Visibility::Package
    }
}

fn qualified_name(imports: &ImportScope, enclosing: Option<&str>, simple: &str) -> String {
    match enclosing {
        Some(outer) => format!("{outer}.{simple}"),
        None => imports.qualify(simple),
    }
}

fn declare_skeleton(
    store: &mut TypeStore,
    imports: &ImportScope,
    origin: &Origin,
    decl: &TypeDecl,
    enclosing: Option<(&str, ClassKind)>,
) {
    let name = qualified_name(imports, enclosing.map(|(n, _)| n), &decl.name);
    let kind = class_kind(decl.kind);
    let in_interface = enclosing.is_some_and(|(_, k)| k.is_interface());
    let class = ClassDef {
        name: name.clone(),
        package: imports.package.clone(),
        kind,
        visibility: visibility(&decl.modifiers, in_interface),
        is_static: decl.modifiers.is_static()
            || in_interface
            || (enclosing.is_some() && kind != ClassKind::Class),
        is_final: decl.modifiers.has("final")
            || matches!(kind, ClassKind::Enum | ClassKind::Record),
        is_abstract: decl.modifiers.has("abstract") || kind.is_interface(),
        type_params: decl
            .type_params
            .iter()
            .map(|tp| TypeParamDef {
                name: tp.name.clone(),
                bounds: Vec::new(),
            })
            .collect(),
        super_class: None,
        interfaces: Vec::new(),
        fields: Vec::new(),
        methods: Vec::new(),
        enclosing: enclosing.map(|(n, _)| n.to_string()),
        origin: origin.clone(),
        range: Some(decl.range),
    };
    store.insert(class);
    for nested in decl.nested_types() {
        declare_skeleton(store, imports, origin, nested, Some((&name, kind)));
    }
}

fn type_params(scope: &TypeScope<'_>, params: &[TypeParam]) -> Vec<TypeParamDef> {
    params
        .iter()
        .map(|tp| TypeParamDef {
            name: tp.name.clone(),
            bounds: tp.bounds.iter().map(|b| scope.lower(&b.text)).collect(),
        })
        .collect()
}

type SuperInfo = (String, Option<Type>, Vec<Type>, Vec<TypeParamDef>);

fn lower_supertypes(
    store: &TypeStore,
    imports: &ImportScope,
    decl: &TypeDecl,
    enclosing: &[String],
    outer_type_vars: &[String],
    out: &mut Vec<SuperInfo>,
) {
    let name = qualified_name(imports, enclosing.last().map(String::as_str), &decl.name);
    let mut chain = enclosing.to_vec();
    chain.push(name.clone());

    let is_static = store.class(&name).is_some_and(|c| c.is_static);
    let mut type_vars: Vec<String> = if is_static {
        Vec::new()
    } else {
        outer_type_vars.to_vec()
    };
    type_vars.extend(decl.type_params.iter().map(|tp| tp.name.clone()));

    let scope = TypeScope {
        env: store,
        imports,
        enclosing: chain.clone(),
        type_vars: type_vars.clone(),
    };

    let kind = class_kind(decl.kind);
    let (super_class, interfaces) = match kind {
        ClassKind::Interface | ClassKind::Annotation => (
            None,
            decl.extends.iter().map(|t| scope.lower(&t.text)).collect(),
        ),
        ClassKind::Enum => (
            Some(Type::class("java.lang.Enum", vec![Type::class(name.clone(), Vec::new())])),
            decl.implements.iter().map(|t| scope.lower(&t.text)).collect(),
        ),
        ClassKind::Record => (
            Some(Type::class("java.lang.Record", Vec::new())),
            decl.implements.iter().map(|t| scope.lower(&t.text)).collect(),
        ),
        ClassKind::Class => {
            let super_class = match decl.extends.first() {
                Some(ext) => Some(scope.lower(&ext.text)),
                None if name == OBJECT => None,
                None => Some(Type::object()),
            };
            (
                super_class,
                decl.implements.iter().map(|t| scope.lower(&t.text)).collect(),
            )
        }
    };

    out.push((name.clone(), super_class, interfaces, type_params(&scope, &decl.type_params)));

    for nested in decl.nested_types() {
        lower_supertypes(store, imports, nested, &chain, &type_vars, out);
    }
}

type MemberInfo = (String, Vec<FieldDef>, Vec<MethodDef>);

fn lower_members(
    store: &TypeStore,
    imports: &ImportScope,
    decl: &TypeDecl,
    enclosing: &[String],
    outer_type_vars: &[String],
    out: &mut Vec<MemberInfo>,
) {
    let name = qualified_name(imports, enclosing.last().map(String::as_str), &decl.name);
    let mut chain = enclosing.to_vec();
    chain.push(name.clone());

    let class = store.class(&name);
    let is_static = class.is_some_and(|c| c.is_static);
    let class_visibility = class.map(|c| c.visibility).unwrap_or(Visibility::Package);
    let mut type_vars: Vec<String> = if is_static {
        Vec::new()
    } else {
        outer_type_vars.to_vec()
    };
    type_vars.extend(decl.type_params.iter().map(|tp| tp.name.clone()));

    let scope = TypeScope {
        env: store,
        imports,
        enclosing: chain.clone(),
        type_vars: type_vars.clone(),
    };
    let interface = decl.is_interface();
    let self_type = Type::class(name.clone(), Vec::new());

    let mut fields = Vec::new();
    let mut methods = Vec::new();

    for constant in &decl.enum_constants {
        fields.push(FieldDef {
            name: constant.name.clone(),
            ty: self_type.clone(),
            visibility: Visibility::Public,
            is_static: true,
            is_final: true,
            name_range: Some(constant.name_range),
        });
    }

    if decl.kind == TypeKind::Record {
        for component in &decl.record_components {
            let ty = scope.lower(&component.ty.text);
            fields.push(FieldDef {
                name: component.name.clone(),
                ty: ty.clone(),
                visibility: Visibility::Private,
                is_static: false,
                is_final: true,
                name_range: Some(component.name_range),
            });
            methods.push(MethodDef {
                name: component.name.clone(),
                type_params: Vec::new(),
                params: Vec::new(),
                param_names: Vec::new(),
                varargs: false,
                return_type: ty,
                throws: Vec::new(),
                visibility: Visibility::Public,
                is_static: false,
                is_abstract: false,
                is_constructor: false,
                is_synthetic: true,
                name_range: None,
            });
        }
    }

    for member in &decl.members {
        match member {
            MemberDecl::Field(field) => fields.extend(lower_field(&scope, field, interface)),
            MemberDecl::Method(method) => methods.push(lower_method(&scope, method, interface)),
            MemberDecl::Initializer(_) | MemberDecl::Type(_) => {}
        }
    }

    let has_constructor = methods.iter().any(|m| m.is_constructor);
    if !interface && !has_constructor {
        let (params, param_names) = if decl.kind == TypeKind::Record {
            (
                decl.record_components
                    .iter()
                    .map(|c| scope.lower(&c.ty.text))
                    .collect(),
                decl.record_components.iter().map(|c| c.name.clone()).collect(),
            )
        } else {
            (Vec::new(), Vec::new())
        };
        methods.push(MethodDef {
            name: decl.name.clone(),
            type_params: Vec::new(),
            params,
            param_names,
            varargs: false,
            return_type: Type::Void,
            throws: Vec::new(),
            visibility: if decl.kind == TypeKind::Enum {
                Visibility::Private
            } else {
                class_visibility
            },
            is_static: false,
            is_abstract: false,
            is_constructor: true,
            is_synthetic: true,
            name_range: None,
        });
    }

    out.push((name.clone(), fields, methods));

    for nested in decl.nested_types() {
        lower_members(store, imports, nested, &chain, &type_vars, out);
    }
}

fn lower_field(scope: &TypeScope<'_>, field: &FieldDecl, interface: bool) -> Vec<FieldDef> {
    let base = scope.lower(&field.ty.text);
    field
        .declarators
        .iter()
        .map(|decl| {
            let mut ty = base.clone();
            for _ in 0..decl.dims {
                ty = Type::array_of(ty);
            }
            FieldDef {
                name: decl.name.clone(),
                ty,
                visibility: visibility(&field.modifiers, interface),
                is_static: interface || field.modifiers.is_static(),
                is_final: interface || field.modifiers.has("final"),
                name_range: Some(decl.name_range),
            }
        })
        .collect()
}

/// Lower a method declaration in the context of its declaring type.
pub fn lower_method(scope: &TypeScope<'_>, method: &MethodDecl, interface: bool) -> MethodDef {
    let scope = scope.with_type_vars(method.type_params.iter().map(|tp| tp.name.as_str()));
    let is_static = method.modifiers.is_static();
    let is_abstract = method.modifiers.has("abstract")
        || (interface && method.body.is_none() && !is_static && !method.modifiers.has("default"));
    MethodDef {
        name: method.name.clone(),
        type_params: type_params(&scope, &method.type_params),
        params: method.params.iter().map(|p| scope.lower(&p.ty.text)).collect(),
        param_names: method.params.iter().map(|p| p.name.clone()).collect(),
        varargs: method.params.last().is_some_and(|p| p.varargs),
        return_type: match &method.return_ty {
            Some(ty) => scope.lower(&ty.text),
            None => Type::Void,
        },
        throws: method.throws.iter().map(|t| scope.lower(&t.text)).collect(),
        visibility: visibility(&method.modifiers, interface),
        is_static,
        is_abstract,
        is_constructor: method.is_constructor(),
        is_synthetic: false,
        name_range: Some(method.name_range),
    }
}
