use mend_config::CorrectionConfig;
use mend_core::{Diagnostic, FileId, ProblemKind, Span};
use mend_correction::{compute_proposals, CorrectionRequest, Proposal, Workspace};
use pretty_assertions::assert_eq;

fn span_of(text: &str, needle: &str) -> Span {
    let start = text.find(needle).unwrap_or_else(|| panic!("`{needle}` not found"));
    Span::new(start, start + needle.len())
}

fn labels(proposals: &[Proposal]) -> Vec<&str> {
    proposals.iter().map(|p| p.label.as_str()).collect()
}

/// The text of `target` after applying the proposal labelled `label`.
fn applied(workspace: &Workspace, proposals: &[Proposal], label: &str, target: &str) -> String {
    let proposal = proposals
        .iter()
        .find(|p| p.label == label)
        .unwrap_or_else(|| panic!("no proposal labelled `{label}` in {:?}", labels(proposals)));
    let target = FileId::new(target);
    let text = &workspace.file(&target).expect("target file").text;
    proposal.edit.apply_to(&target, text).expect("apply")
}

#[test]
fn missing_param_tags_are_inserted_in_declaration_order() {
    let text = "package test1;\npublic class E {\n    /**\n     * @param b\n     * @param c\n     */\n    public void foo(int a, int b, int c) {\n    }\n}\n";
    let workspace = Workspace::new([("test1/E.java", text)]);
    let start = text.find("int a").expect("param") + 4;
    let diagnostic =
        Diagnostic::new(ProblemKind::JavadocMissingParamTag, Span::new(start, start + 1))
            .with_args(["a"]);
    let request = CorrectionRequest::new(FileId::new("test1/E.java"), vec![diagnostic]);
    let proposals = compute_proposals(&workspace, &request, &CorrectionConfig::default());

    assert_eq!(labels(&proposals), vec!["Add '@param' tag", "Add all missing tags"]);
    assert_eq!(
        applied(&workspace, &proposals, "Add all missing tags", "test1/E.java"),
        "package test1;\npublic class E {\n    /**\n     * @param a \n     * @param b\n     * @param c\n     */\n    public void foo(int a, int b, int c) {\n    }\n}\n"
    );
}

#[test]
fn unused_fields_are_removed_or_get_accessors() {
    let text = "package test1;\npublic class E {\n    private int count;\n}\n";
    let workspace = Workspace::new([("test1/E.java", text)]);
    let diagnostic =
        Diagnostic::new(ProblemKind::UnusedPrivateField, span_of(text, "count"))
            .with_args(["count"]);
    let request = CorrectionRequest::new(FileId::new("test1/E.java"), vec![diagnostic]);
    let proposals = compute_proposals(&workspace, &request, &CorrectionConfig::default());

    assert_eq!(
        applied(
            &workspace,
            &proposals,
            "Remove 'count', keep assignments with side effects",
            "test1/E.java"
        ),
        "package test1;\npublic class E {\n}\n"
    );
    assert_eq!(
        applied(
            &workspace,
            &proposals,
            "Create getter and setter for 'count'...",
            "test1/E.java"
        ),
        "package test1;\npublic class E {\n    private int count;\n\n    /**\n     * @return the count\n     */\n    public int getCount() {\n        return count;\n    }\n\n    /**\n     * @param count the count to set\n     */\n    public void setCount(int count) {\n        this.count = count;\n    }\n}\n"
    );
}

#[test]
fn uncaught_exceptions_are_declared_or_caught_together() {
    let text = "package test1;\nimport java.io.IOException;\nimport java.text.ParseException;\npublic class E {\n    public void goo() throws IOException, ParseException {\n    }\n    public void foo() {\n        goo();\n    }\n}\n";
    let workspace = Workspace::new([("test1/E.java", text)]);
    let range = span_of(text, "goo();");
    let request = CorrectionRequest::new(
        FileId::new("test1/E.java"),
        vec![
            Diagnostic::new(ProblemKind::UncaughtException, range)
                .with_args(["java.io.IOException"]),
            Diagnostic::new(ProblemKind::UncaughtException, range)
                .with_args(["java.text.ParseException"]),
        ],
    );
    let proposals = compute_proposals(&workspace, &request, &CorrectionConfig::default());

    let found = labels(&proposals);
    let throws = found.iter().position(|l| *l == "Add throws declaration").expect("throws");
    let multi = found
        .iter()
        .position(|l| *l == "Surround with try/multi-catch")
        .expect("multi-catch");
    assert!(throws < multi);
    assert_eq!(
        applied(&workspace, &proposals, "Add throws declaration", "test1/E.java"),
        "package test1;\nimport java.io.IOException;\nimport java.text.ParseException;\npublic class E {\n    public void goo() throws IOException, ParseException {\n    }\n    public void foo() throws IOException, ParseException {\n        goo();\n    }\n}\n"
    );
    assert_eq!(
        applied(&workspace, &proposals, "Surround with try/multi-catch", "test1/E.java"),
        "package test1;\nimport java.io.IOException;\nimport java.text.ParseException;\npublic class E {\n    public void goo() throws IOException, ParseException {\n    }\n    public void foo() {\n        try {\n            goo();\n        } catch (IOException | ParseException e) {\n            // TODO Auto-generated catch block\n            e.printStackTrace();\n        }\n    }\n}\n"
    );
}

#[test]
fn undefined_methods_are_created_or_the_receiver_cast() {
    let text = "package test1;\npublic class E {\n    void foo(X x) {\n        if (x instanceof Y) {\n            boolean i= x.goo(1, 2.1);\n        }\n    }\n}\n";
    let x = "package test1;\npublic class X {\n}\n";
    let y = "package test1;\npublic interface Y {\n    public boolean goo(int i, double d);\n}\n";
    let workspace = Workspace::new([
        ("test1/E.java", text),
        ("test1/X.java", x),
        ("test1/Y.java", y),
    ]);
    let diagnostic = Diagnostic::new(ProblemKind::UndefinedMethod, span_of(text, "goo"));
    let request = CorrectionRequest::new(FileId::new("test1/E.java"), vec![diagnostic]);
    let proposals = compute_proposals(&workspace, &request, &CorrectionConfig::default());

    assert_eq!(
        applied(
            &workspace,
            &proposals,
            "Create method 'goo(int, double)' in type 'X'",
            "test1/X.java"
        ),
        "package test1;\npublic class X {\n\n    public boolean goo(int i, double d) {\n        return false;\n    }\n}\n"
    );
    assert_eq!(
        applied(&workspace, &proposals, "Add cast to 'x'", "test1/E.java"),
        "package test1;\npublic class E {\n    void foo(X x) {\n        if (x instanceof Y) {\n            boolean i= ((Y) x).goo(1, 2.1);\n        }\n    }\n}\n"
    );
}

#[test]
fn diagnostics_outside_the_selection_are_ignored() {
    let text = "package test1;\npublic class E {\n    private int count;\n    private int color;\n}\n";
    let workspace = Workspace::new([("test1/E.java", text)]);
    let request = CorrectionRequest::new(
        FileId::new("test1/E.java"),
        vec![
            Diagnostic::new(ProblemKind::UnusedPrivateField, span_of(text, "count"))
                .with_args(["count"]),
            Diagnostic::new(ProblemKind::UnusedPrivateField, span_of(text, "color"))
                .with_args(["color"]),
        ],
    )
    .with_selection(span_of(text, "color"));
    let proposals = compute_proposals(&workspace, &request, &CorrectionConfig::default());

    assert!(!proposals.is_empty());
    assert!(proposals.iter().all(|p| !p.label.contains("'count'")));
}

#[test]
fn unknown_files_yield_nothing() {
    let workspace = Workspace::new([("test1/E.java", "package test1;\npublic class E {}\n")]);
    let request = CorrectionRequest::new(
        FileId::new("test1/Missing.java"),
        vec![Diagnostic::new(ProblemKind::UndefinedName, Span::new(0, 1))],
    );
    assert!(compute_proposals(&workspace, &request, &CorrectionConfig::default()).is_empty());
}
