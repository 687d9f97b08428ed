use mend_core::FileId;
use mend_types::{
    add_units, resolve_class_name, ClassKind, ImportScope, Origin, Type, TypeEnv, TypeStore,
    Visibility,
};
use pretty_assertions::assert_eq;

fn store_with(sources: &[(&str, &str)]) -> TypeStore {
    let parses: Vec<_> = sources
        .iter()
        .map(|(path, text)| (FileId::new(*path), mend_syntax::parse(text)))
        .collect();
    let units: Vec<_> = parses
        .iter()
        .map(|(file, parse)| (Origin::Source(file.clone()), parse.compilation_unit()))
        .collect();
    let mut store = TypeStore::with_jdk();
    add_units(&mut store, &units);
    store
}

#[test]
fn lowers_source_classes_with_resolved_members() {
    let store = store_with(&[(
        "test1/E.java",
        "package test1;\nimport java.util.*;\npublic class E extends F implements Runnable {\n    private Vector<String> vec;\n    int[] counts, matrix[];\n    public List<String> names(Map<String, Integer> m) throws java.io.IOException { return null; }\n    public void run() {}\n}\nclass F {}\n",
    )]);

    let e = store.class("test1.E").expect("E");
    assert_eq!(e.kind, ClassKind::Class);
    assert_eq!(e.super_class, Some(Type::class("test1.F", Vec::new())));
    assert_eq!(e.interfaces, vec![Type::class("java.lang.Runnable", Vec::new())]);
    assert_eq!(e.file(), Some(&FileId::new("test1/E.java")));

    let vec = e.field("vec").expect("vec");
    assert_eq!(vec.ty.to_string(), "java.util.Vector<java.lang.String>");
    assert_eq!(vec.visibility, Visibility::Private);
    assert_eq!(e.field("matrix").expect("matrix").ty.to_string(), "int[][]");

    let names = e.methods_named("names").next().expect("names");
    assert_eq!(
        names.params[0].to_string(),
        "java.util.Map<java.lang.String, java.lang.Integer>"
    );
    assert_eq!(names.return_type.to_string(), "java.util.List<java.lang.String>");
    assert_eq!(names.throws, vec![Type::class("java.io.IOException", Vec::new())]);
    assert_eq!(names.signature_label(), "names(Map<String, Integer>)");

    // Implicit default constructor.
    let ctor = e.constructors().next().expect("constructor");
    assert!(ctor.is_synthetic);
    assert_eq!(ctor.visibility, Visibility::Public);
}

#[test]
fn nested_types_and_type_variables() {
    let store = store_with(&[(
        "test1/E.java",
        "package test1;\npublic class E<T> {\n    T value;\n    Inner inner;\n    class Inner { T get() { return null; } }\n    static class Nested<U> { U u; }\n    <K> K pick(K k, T t) { return k; }\n}\n",
    )]);
    let e = store.class("test1.E").expect("E");
    assert_eq!(e.field("value").expect("value").ty, Type::TypeVar("T".into()));
    assert_eq!(
        e.field("inner").expect("inner").ty,
        Type::class("test1.E.Inner", Vec::new())
    );
    let inner = store.class("test1.E.Inner").expect("Inner");
    assert!(!inner.is_static);
    assert_eq!(inner.enclosing.as_deref(), Some("test1.E"));
    assert_eq!(
        inner.methods_named("get").next().expect("get").return_type,
        Type::TypeVar("T".into())
    );
    assert!(store.class("test1.E.Nested").expect("Nested").is_static);

    let pick = e.methods_named("pick").next().expect("pick");
    assert_eq!(pick.type_params[0].name, "K");
    assert_eq!(
        pick.params,
        vec![Type::TypeVar("K".into()), Type::TypeVar("T".into())]
    );
}

#[test]
fn enums_records_and_interfaces() {
    let store = store_with(&[(
        "p/Kinds.java",
        "package p;\nenum Color { RED, GREEN; }\nrecord Point(int x, int y) {}\ninterface Shape { int SIDES = 0; double area(); default String name() { return null; } }\n",
    )]);
    let color = store.class("p.Color").expect("Color");
    assert_eq!(
        color.super_class.as_ref().map(ToString::to_string).as_deref(),
        Some("java.lang.Enum<p.Color>")
    );
    let red = color.field("RED").expect("RED");
    assert!(red.is_static && red.is_final);

    let point = store.class("p.Point").expect("Point");
    assert!(point.methods_named("x").next().is_some());
    let canonical = point.constructors().next().expect("canonical");
    assert_eq!(canonical.param_names, vec!["x".to_string(), "y".to_string()]);

    let shape = store.class("p.Shape").expect("Shape");
    assert!(shape.is_interface());
    let sides = shape.field("SIDES").expect("SIDES");
    assert!(sides.is_static && sides.is_final);
    assert_eq!(sides.visibility, Visibility::Public);
    assert!(shape.methods_named("area").next().expect("area").is_abstract);
    assert!(!shape.methods_named("name").next().expect("name").is_abstract);
    assert_eq!(shape.constructors().count(), 0);
}

#[test]
fn import_resolution_order() {
    let store = store_with(&[
        ("a/List.java", "package a;\npublic class List {}\n"),
        ("b/Util.java", "package b;\npublic class Util {}\n"),
    ]);
    let unit = mend_syntax::parse("package b;\nimport a.List;\nimport java.util.*;\nclass X {}\n");
    let imports = ImportScope::from_unit(unit.compilation_unit());

    // Single-type imports shadow on-demand imports.
    assert_eq!(resolve_class_name(&store, &imports, &[], "List").as_deref(), Some("a.List"));
    assert_eq!(resolve_class_name(&store, &imports, &[], "Util").as_deref(), Some("b.Util"));
    assert_eq!(
        resolve_class_name(&store, &imports, &[], "Vector").as_deref(),
        Some("java.util.Vector")
    );
    assert_eq!(
        resolve_class_name(&store, &imports, &[], "String").as_deref(),
        Some("java.lang.String")
    );
    assert_eq!(
        resolve_class_name(&store, &imports, &[], "Map.Entry").as_deref(),
        Some("java.util.Map.Entry")
    );
    assert_eq!(resolve_class_name(&store, &imports, &[], "Missing"), None);
}

#[test]
fn removing_a_file_drops_its_classes() {
    let mut store = store_with(&[("p/A.java", "package p;\nclass A {}\n")]);
    assert!(store.class("p.A").is_some());
    store.remove_file(&FileId::new("p/A.java"));
    assert!(store.class("p.A").is_none());
    assert!(store.class("java.lang.String").is_some());
}
