use mend_core::Span;
use mend_syntax::ast::{Expr, Resource, Stmt};
use mend_syntax::parse;
use pretty_assertions::assert_eq;

fn body_of(text: &str) -> Vec<Stmt> {
    let parse = parse(text);
    let ty = &parse.compilation_unit().types[0];
    let method = ty.methods().next().expect("method");
    method.body.clone().expect("body").statements
}

#[test]
fn local_variables_and_expression_statements() {
    let stmts = body_of(
        "class A { void m() { int x = 1; x = 2; foo(x); java.util.List<String> l; } }",
    );
    assert!(matches!(&stmts[0], Stmt::LocalVar(local) if local.declarators[0].name == "x"));
    assert!(matches!(&stmts[1], Stmt::Expr(s) if matches!(s.expr, Expr::Assign(_))));
    assert!(matches!(&stmts[2], Stmt::Expr(s) if matches!(s.expr, Expr::Call(_))));
    assert!(matches!(
        &stmts[3],
        Stmt::LocalVar(local) if local.ty.text == "java.util.List<String>"
    ));
}

#[test]
fn try_with_catches_finally_and_resources() {
    let text = r#"class A { void m() {
        try (java.io.FileInputStream in = new java.io.FileInputStream("f")) {
            in.read();
        } catch (java.io.IOException | RuntimeException e) {
            e.printStackTrace();
        } finally {
        }
    } }"#;
    let stmts = body_of(text);
    let Stmt::Try(try_stmt) = &stmts[0] else {
        panic!("expected try, got {:?}", stmts[0]);
    };
    assert_eq!(try_stmt.resources.len(), 1);
    assert!(matches!(
        &try_stmt.resources[0],
        Resource::Decl(decl) if decl.declarators[0].name == "in"
    ));
    assert_eq!(try_stmt.catches.len(), 1);
    let types: Vec<_> = try_stmt.catches[0].types.iter().map(|t| t.text.as_str()).collect();
    assert_eq!(types, vec!["java.io.IOException", "RuntimeException"]);
    assert_eq!(try_stmt.catches[0].name, "e");
    assert!(try_stmt.finally.is_some());
    assert_eq!(&text[try_stmt.range.end - 1..try_stmt.range.end], "}");
}

#[test]
fn loops_and_conditionals() {
    let text = r#"class A { void m(java.util.List<String> list) {
        for (String s : list) { }
        for (int i = 0, j = 1; i < 10; i++, j--) { }
        while (true) break;
        do { } while (false);
        if (a) { } else if (b) { } else { }
        switch (x) { case 1: foo(); break; default: bar(); }
        label: for (;;) { continue label; }
        synchronized (this) { }
    } }"#;
    let stmts = body_of(text);
    assert!(matches!(
        &stmts[0],
        Stmt::ForEach(f) if f.var.name == "s" && f.var.ty.text == "String"
    ));
    assert!(matches!(&stmts[1], Stmt::For(f) if f.init.len() == 1 && f.update.len() == 2));
    assert!(matches!(&stmts[2], Stmt::While(w) if matches!(*w.body, Stmt::Other(_))));
    assert!(matches!(&stmts[3], Stmt::Do(_)));
    assert!(matches!(&stmts[4], Stmt::If(i) if i.else_branch.is_some()));
    assert!(matches!(&stmts[5], Stmt::Switch(s) if s.statements.len() == 3));
    assert!(matches!(&stmts[6], Stmt::Labeled(l) if l.label == "label"));
    assert!(matches!(&stmts[7], Stmt::Sync(_)));
}

#[test]
fn foreach_variables_may_lack_a_name() {
    let text = "class A { void m(String[] strings) { for (s: strings) { } } }";
    let stmts = body_of(text);
    let Stmt::ForEach(stmt) = &stmts[0] else {
        panic!("expected foreach, got {:?}", stmts[0]);
    };
    assert_eq!(stmt.var.ty.text, "s");
    assert_eq!(stmt.var.name, "");
    assert_eq!(stmt.var.name_range, Span::empty(text.find(": strings").unwrap()));
    assert!(matches!(&stmt.iterable, Expr::Name(name) if name.name == "strings"));
}

#[test]
fn local_classes_and_throw() {
    let stmts = body_of("class A { void m() { class Local { } throw new RuntimeException(); } }");
    assert!(matches!(&stmts[0], Stmt::LocalType(t) if t.name == "Local"));
    assert!(matches!(&stmts[1], Stmt::Throw(t) if matches!(t.expr, Expr::New(_))));
}
