use mend_syntax::ast::{Expr, Stmt};
use mend_syntax::parse;

#[test]
fn missing_semicolon_does_not_swallow_the_block_end() {
    let text = "class A { void m() { foo() } void n() { } }";
    let parse = parse(text);
    let ty = &parse.compilation_unit().types[0];
    let names: Vec<_> = ty.methods().map(|m| m.name.as_str()).collect();
    assert_eq!(names, vec!["m", "n"]);
}

#[test]
fn dangling_operator_yields_missing_operand() {
    let text = "class A { void m() { int x = 1 + ; } }";
    let parse = parse(text);
    let ty = &parse.compilation_unit().types[0];
    let body = ty.methods().next().and_then(|m| m.body.as_ref()).expect("body");
    let Stmt::LocalVar(local) = &body.statements[0] else {
        panic!("expected local variable");
    };
    let Some(Expr::Binary(bin)) = &local.declarators[0].init else {
        panic!("expected binary initializer");
    };
    assert!(matches!(*bin.rhs, Expr::Missing(_)));
}

#[test]
fn garbage_between_members_is_skipped() {
    let text = "class A { int x; ) ] void m() {} }";
    let parse = parse(text);
    let ty = &parse.compilation_unit().types[0];
    assert_eq!(ty.fields().count(), 1);
    assert_eq!(ty.methods().count(), 1);
}

#[test]
fn unterminated_input_terminates() {
    for text in [
        "class",
        "class A {",
        "class A { void m( {",
        "class A { int x = (",
        "class A { void m() { a.b.c( } }",
    ] {
        let _ = parse(text);
    }
}
