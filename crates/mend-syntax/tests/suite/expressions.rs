use mend_syntax::ast::{BinaryOp, Expr};
use mend_syntax::parse_expression;
use mend_syntax::render::flatten_expr;
use pretty_assertions::assert_eq;

fn expr(text: &str) -> Expr {
    parse_expression(text).expect("expression")
}

#[test]
fn binary_precedence() {
    let Expr::Binary(bin) = expr("a + b * c == d && e") else {
        panic!("expected binary");
    };
    assert_eq!(bin.op, BinaryOp::AndAnd);
    let Expr::Binary(lhs) = bin.lhs.as_ref() else {
        panic!("expected binary lhs");
    };
    assert_eq!(lhs.op, BinaryOp::EqEq);
}

#[test]
fn shifts_are_assembled_from_angle_brackets() {
    let Expr::Binary(bin) = expr("a >> 2") else {
        panic!("expected binary");
    };
    assert_eq!(bin.op, BinaryOp::Shr);
    let Expr::Binary(bin) = expr("a >>> 2") else {
        panic!("expected binary");
    };
    assert_eq!(bin.op, BinaryOp::UShr);
    assert!(matches!(expr("a >>= 2"), Expr::Assign(a) if a.op == ">>="));
}

#[test]
fn casts_and_parentheses() {
    assert!(matches!(expr("(String) o"), Expr::Cast(c) if c.ty.text == "String"));
    assert!(matches!(expr("(int) -x"), Expr::Cast(_)));
    assert!(matches!(expr("(a) + b"), Expr::Binary(_)));
    assert!(matches!(expr("(a)"), Expr::Paren(_)));
    assert!(matches!(
        expr("(java.util.List<String>) o"),
        Expr::Cast(c) if c.ty.text == "java.util.List<String>"
    ));
}

#[test]
fn calls_field_access_and_creation() {
    assert_eq!(flatten_expr(&expr("this.foo(a, b.c).d")), "this.foo(a,b.c).d");
    assert_eq!(
        flatten_expr(&expr("new java.util.ArrayList<String>(10)")),
        "new java.util.ArrayList<String>(10)"
    );
    assert_eq!(flatten_expr(&expr("new int[3][]")), "new int[3][]");
    assert_eq!(flatten_expr(&expr("x[i++]")), "x[i++]");
    assert_eq!(flatten_expr(&expr("String.class")), "String.class");
    assert_eq!(flatten_expr(&expr("c ? 1 : 2")), "c?1:2");
    assert_eq!(flatten_expr(&expr("o instanceof String")), "o instanceof String");
}

#[test]
fn lambdas_and_method_references() {
    assert!(matches!(expr("x -> x + 1"), Expr::Lambda(l) if l.params.len() == 1));
    assert!(matches!(expr("(a, b) -> { return a; }"), Expr::Lambda(l) if l.params.len() == 2));
    assert!(matches!(expr("(String s) -> s"), Expr::Lambda(l) if l.params[0].ty.is_some()));
    assert!(matches!(expr("String::valueOf"), Expr::MethodRef(m) if m.name == "valueOf"));
}

#[test]
fn generic_method_call_with_explicit_type_arguments() {
    assert!(matches!(
        expr("java.util.Collections.<String>emptyList()"),
        Expr::Call(c) if c.name == "emptyList"
    ));
}

#[test]
fn side_effects() {
    assert!(expr("foo()").has_side_effects());
    assert!(expr("i++").has_side_effects());
    assert!(expr("new Object()").has_side_effects());
    assert!(!expr("a + b.c").has_side_effects());
    assert!(!expr("\"x\" + 1").has_side_effects());
}
