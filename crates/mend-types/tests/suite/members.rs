use mend_types::{
    constructors, field_type, jdk, methods_named, overridden_methods, parse_type,
    instantiate_as_supertype, supertypes, Type, TypeEnv,
};
use pretty_assertions::assert_eq;

fn ty(text: &str) -> Type {
    parse_type(text).expect("type")
}

#[test]
fn member_types_follow_receiver_arguments() {
    let env = jdk();
    let receiver = ty("java.util.Vector<java.lang.String>");
    let get = methods_named(env, &receiver, "get");
    assert_eq!(get.len(), 1);
    assert_eq!(get[0].return_type_for(&[ty("int")]), ty("java.lang.String"));

    let raw = methods_named(env, &ty("java.util.Vector"), "get");
    assert_eq!(raw[0].return_type_for(&[ty("int")]), ty("java.lang.Object"));
}

#[test]
fn wildcard_receivers_capture_to_bounds() {
    let env = jdk();
    let get = methods_named(env, &ty("java.util.List<? extends java.lang.Number>"), "get");
    assert_eq!(get[0].return_type_for(&[ty("int")]), ty("java.lang.Number"));

    let get = methods_named(env, &ty("java.util.List<?>"), "get");
    assert_eq!(get[0].return_type_for(&[ty("int")]), ty("java.lang.Object"));
}

#[test]
fn generic_methods_infer_from_arguments() {
    let env = jdk();
    let as_list = methods_named(env, &ty("java.util.Arrays"), "asList");
    assert_eq!(
        as_list[0].return_type_for(&[ty("java.lang.String"), ty("java.lang.String")]),
        ty("java.util.List<java.lang.String>")
    );
    assert_eq!(
        as_list[0].return_type_for(&[ty("int")]),
        ty("java.util.List<java.lang.Integer>")
    );
}

#[test]
fn applicability_with_boxing_and_varargs() {
    let env = jdk();
    let format = methods_named(env, &ty("java.lang.String"), "format");
    assert!(format[0].is_applicable(env, &[ty("java.lang.String")]));
    assert!(
        format[0].is_applicable(env, &[ty("java.lang.String"), ty("int"), ty("java.lang.Object")])
    );
    assert!(!format[0].is_applicable(env, &[ty("int")]));

    let add = methods_named(env, &ty("java.util.List<java.lang.Integer>"), "add");
    assert!(add.iter().any(|m| m.is_applicable(env, &[ty("int")])));
    assert!(!add.iter().any(|m| m.is_applicable(env, &[ty("java.lang.String")])));
}

#[test]
fn inherited_members_and_overrides() {
    let env = jdk();
    let size = methods_named(env, &ty("java.util.ArrayList<java.lang.String>"), "size");
    assert_eq!(size.len(), 1);
    assert_eq!(size[0].declaring.name, "java.util.ArrayList");

    let to_string = methods_named(env, &ty("java.util.ArrayList"), "hashCode");
    assert_eq!(to_string[0].declaring.name, "java.lang.Object");

    let file_input = env.class("java.io.FileInputStream").expect("class");
    let read = file_input.methods_named("read").next().expect("read");
    let overridden = overridden_methods(env, file_input, read);
    assert_eq!(overridden[0].declaring.name, "java.io.InputStream");
}

#[test]
fn supertypes_and_fields() {
    let env = jdk();
    let names: Vec<String> = supertypes(env, &ty("java.io.FileNotFoundException"))
        .iter()
        .map(ToString::to_string)
        .collect();
    assert_eq!(
        &names[..4],
        &[
            "java.io.FileNotFoundException",
            "java.io.IOException",
            "java.lang.Exception",
            "java.lang.Throwable"
        ]
    );
    assert_eq!(
        instantiate_as_supertype(
            env,
            &ty("java.util.HashMap<java.lang.String, java.lang.Integer>"),
            "java.util.Map",
        ),
        Some(ty("java.util.Map<java.lang.String, java.lang.Integer>"))
    );
    assert_eq!(field_type(env, &ty("int[]"), "length"), Some(ty("int")));
    assert_eq!(
        field_type(env, &ty("java.lang.System"), "out"),
        Some(ty("java.io.PrintStream"))
    );
    assert_eq!(constructors(env, &ty("java.io.File")).len(), 2);
}
