use mend_syntax::ast::{MemberDecl, TypeKind};
use mend_syntax::parse;
use pretty_assertions::assert_eq;

#[test]
fn package_imports_and_types() {
    let text = "package test1;\n\nimport java.util.*;\nimport static java.lang.Math.max;\n\npublic class E {}\ninterface I {}\n";
    let parse = parse(text);
    let unit = parse.compilation_unit();
    assert_eq!(unit.package.as_ref().map(|p| p.name.as_str()), Some("test1"));
    assert_eq!(unit.imports.len(), 2);
    assert!(unit.imports[0].is_star);
    assert_eq!(unit.imports[0].path, "java.util");
    assert!(unit.imports[1].is_static);
    assert_eq!(unit.imports[1].simple_name(), "max");
    let kinds: Vec<_> = unit.types.iter().map(|t| t.kind).collect();
    assert_eq!(kinds, vec![TypeKind::Class, TypeKind::Interface]);
    assert!(unit.types[0].modifiers.has("public"));
}

#[test]
fn methods_with_javadoc_type_params_and_throws() {
    let text = r#"package test1;
public class E {
    /**
     * @param b
     *      comment on second line.
     * @param c
     */
    public <A> void foo(int a, int b, int c) throws java.io.IOException, Exception {
    }
}
"#;
    let parse = parse(text);
    let ty = &parse.compilation_unit().types[0];
    let method = ty.methods().next().expect("method");
    assert_eq!(method.name, "foo");
    assert_eq!(method.type_params[0].name, "A");
    assert!(method.is_void());
    let params: Vec<_> = method.params.iter().map(|p| p.name.as_str()).collect();
    assert_eq!(params, vec!["a", "b", "c"]);
    let throws: Vec<_> = method.throws.iter().map(|t| t.text.as_str()).collect();
    assert_eq!(throws, vec!["java.io.IOException", "Exception"]);
    let doc = method.javadoc.as_ref().expect("javadoc");
    assert_eq!(doc.tags.len(), 2);
    assert!(doc.param_tag("b").is_some());
    assert_eq!(&text[method.range.start..method.range.start + 6], "public");
}

#[test]
fn fields_with_multiple_declarators() {
    let text = "class A { private int count, color = count; String[] names; int legacy[]; }";
    let parse = parse(text);
    let ty = &parse.compilation_unit().types[0];
    let fields: Vec<_> = ty.fields().collect();
    assert_eq!(fields.len(), 3);
    let names: Vec<_> = fields[0].declarators.iter().map(|d| d.name.as_str()).collect();
    assert_eq!(names, vec!["count", "color"]);
    assert!(fields[0].declarators[1].init.is_some());
    assert_eq!(fields[1].ty.text, "String[]");
    assert_eq!(fields[2].declarators[0].dims, 1);
}

#[test]
fn generic_types_keep_wildcards_readable() {
    let text = "class A<T extends Number & Comparable<T>> { java.util.List<? extends Number> xs; java.util.Map<String, java.util.List<Integer>> m; }";
    let parse = parse(text);
    let ty = &parse.compilation_unit().types[0];
    assert_eq!(ty.type_params[0].bounds.len(), 2);
    let fields: Vec<_> = ty.fields().map(|f| f.ty.text.as_str()).collect();
    assert_eq!(
        fields,
        vec![
            "java.util.List<? extends Number>",
            "java.util.Map<String,java.util.List<Integer>>"
        ]
    );
}

#[test]
fn constructors_enums_records_and_nested_types() {
    let text = r#"
enum Color { RED, GREEN(1) { }, BLUE; Color() {} Color(int x) {} }
record Point(int x, int y) { Point { } }
class Outer { static class Inner { } static { } { } }
"#;
    let parse = parse(text);
    let unit = parse.compilation_unit();
    let color = &unit.types[0];
    let constants: Vec<_> = color.enum_constants.iter().map(|c| c.name.as_str()).collect();
    assert_eq!(constants, vec!["RED", "GREEN", "BLUE"]);
    assert_eq!(color.methods().filter(|m| m.is_constructor()).count(), 2);

    let point = &unit.types[1];
    assert_eq!(point.kind, TypeKind::Record);
    assert_eq!(point.record_components.len(), 2);
    assert!(point.methods().next().is_some_and(|m| m.is_constructor()));

    let outer = &unit.types[2];
    assert_eq!(outer.nested_types().next().map(|t| t.name.as_str()), Some("Inner"));
    let statics: Vec<_> = outer
        .members
        .iter()
        .filter_map(|m| match m {
            MemberDecl::Initializer(init) => Some(init.is_static),
            _ => None,
        })
        .collect();
    assert_eq!(statics, vec![true, false]);
}

#[test]
fn annotations_are_recorded_as_modifiers() {
    let text = "class A { @Override\n public String toString() { return \"\"; } @SuppressWarnings(\"x\") int f; }";
    let parse = parse(text);
    let ty = &parse.compilation_unit().types[0];
    let method = ty.methods().next().expect("method");
    assert!(method.modifiers.has_annotation("Override"));
    assert_eq!(&text[method.range.start..method.range.start + 9], "@Override");
    assert!(ty.fields().next().is_some_and(|f| f.modifiers.has_annotation("SuppressWarnings")));
}

#[test]
fn outline_lists_members() {
    let text = "class A { int x; A() {} void run(String s) {} }";
    let parse = parse(text);
    let outline = mend_syntax::outline(parse.compilation_unit());
    let kinds: Vec<_> = outline[0].children.iter().map(|c| (c.kind, c.name.as_str())).collect();
    assert_eq!(
        kinds,
        vec![("field", "x"), ("constructor", "A"), ("method", "run")]
    );
    assert_eq!(outline[0].children[2].detail.as_deref(), Some("(String) -> void"));
}
