use mend_core::{EditError, EditTree, FileId, ResourceCreate, Span, TextEdit};
use pretty_assertions::assert_eq;

fn a() -> FileId {
    FileId::new("p/A.java")
}

fn b() -> FileId {
    FileId::new("p/B.java")
}

#[test]
fn edits_are_grouped_per_file() {
    let tree = EditTree::new(vec![
        TextEdit::insert(b(), 3, "x"),
        TextEdit::insert(a(), 9, "y"),
        TextEdit::insert(a(), 1, "z"),
    ]);
    let by_file = tree.edits_by_file();
    let files: Vec<_> = by_file.keys().map(|f| f.as_str()).collect();
    assert_eq!(files, vec!["p/A.java", "p/B.java"]);
    let offsets: Vec<_> = by_file[&a()].iter().map(|e| e.range.start).collect();
    assert_eq!(offsets, vec![1, 9]);
}

#[test]
fn apply_to_only_touches_the_target_file() {
    let mut tree = EditTree::new(vec![
        TextEdit::replace(a(), Span::new(7, 10), "long"),
        TextEdit::insert(b(), 0, "// b\n"),
    ]);
    tree.normalize().unwrap();
    assert_eq!(
        tree.apply_to(&a(), "void f(int x) {}").unwrap(),
        "void f(long x) {}"
    );
}

#[test]
fn render_key_distinguishes_resources() {
    let plain = EditTree::new(vec![TextEdit::insert(a(), 0, "x")]);
    let created = EditTree::with_resource(
        ResourceCreate {
            path: "p/C.java".into(),
            content: "package p;\n".into(),
        },
        vec![TextEdit::insert(a(), 0, "x")],
    );
    assert_ne!(plain.render_key(), created.render_key());
    assert!(!created.is_empty());
    assert!(EditTree::default().is_empty());
}

#[test]
fn conflicting_replacements_of_the_same_range_fail() {
    let mut tree = EditTree::new(vec![
        TextEdit::replace(a(), Span::new(0, 3), "int"),
        TextEdit::replace(a(), Span::new(0, 3), "long"),
    ]);
    assert_eq!(
        tree.normalize(),
        Err(EditError::OverlappingEdits {
            file: a(),
            first: Span::new(0, 3),
            second: Span::new(0, 3),
        })
    );
}

#[test]
fn out_of_bounds_edit_is_rejected() {
    let err = mend_core::apply_text_edits("abc", &[TextEdit::delete(a(), Span::new(2, 9))])
        .unwrap_err();
    assert!(matches!(err, EditError::OutOfBounds { len: 3, .. }));
}
