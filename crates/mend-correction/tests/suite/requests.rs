use mend_config::CorrectionConfig;
use mend_core::{FileId, ProblemKind, Severity, Span};
use mend_correction::{compute_proposals, CorrectionRequest, Workspace};
use pretty_assertions::assert_eq;

#[test]
fn requests_deserialize_with_defaults() {
    let json = r#"{
        "file": "test1/E.java",
        "diagnostics": [
            { "kind": "UndefinedName", "range": { "start": 10, "end": 13 } },
            {
                "kind": "UncaughtException",
                "severity": "warning",
                "range": { "start": 20, "end": 26 },
                "arguments": ["java.io.IOException"]
            }
        ],
        "selection": { "start": 10, "end": 13 }
    }"#;
    let request: CorrectionRequest = serde_json::from_str(json).expect("request");

    assert_eq!(request.file, FileId::new("test1/E.java"));
    assert_eq!(request.selection, Span::new(10, 13));
    assert_eq!(request.diagnostics[0].kind, ProblemKind::UndefinedName);
    assert_eq!(request.diagnostics[0].severity, Severity::Error);
    assert!(request.diagnostics[0].arguments.is_empty());
    assert_eq!(request.diagnostics[1].severity, Severity::Warning);
    assert_eq!(request.diagnostics[1].arguments, vec!["java.io.IOException".to_string()]);
}

#[test]
fn unknown_problem_kinds_are_rejected() {
    let json = r#"{
        "file": "test1/E.java",
        "diagnostics": [{ "kind": "NoSuchProblem", "range": { "start": 0, "end": 1 } }],
        "selection": { "start": 0, "end": 1 }
    }"#;
    assert!(serde_json::from_str::<CorrectionRequest>(json).is_err());
}

#[test]
fn the_default_selection_is_the_first_diagnostic() {
    let request = CorrectionRequest::new(
        FileId::new("test1/E.java"),
        vec![mend_core::Diagnostic::new(ProblemKind::UndefinedName, Span::new(4, 7))],
    );
    assert_eq!(request.selection, Span::new(4, 7));

    let empty = CorrectionRequest::new(FileId::new("test1/E.java"), Vec::new());
    assert_eq!(empty.selection, Span::empty(0));
}

#[test]
fn proposals_serialize_with_their_edits() {
    let text = "package test1;\npublic class E {\n    private int count;\n}\n";
    let workspace = Workspace::new([("test1/E.java", text)]);
    let json = format!(
        r#"{{
            "file": "test1/E.java",
            "diagnostics": [{{
                "kind": "UnusedPrivateField",
                "range": {{ "start": {start}, "end": {end} }},
                "arguments": ["count"]
            }}],
            "selection": {{ "start": {start}, "end": {end} }}
        }}"#,
        start = text.find("count").expect("count"),
        end = text.find("count").expect("count") + "count".len(),
    );
    let request: CorrectionRequest = serde_json::from_str(&json).expect("request");
    let proposals = compute_proposals(&workspace, &request, &CorrectionConfig::default());
    assert!(!proposals.is_empty());

    let value = serde_json::to_value(&proposals[0]).expect("serialize");
    assert_eq!(value["kind"], "quick_fix");
    assert!(value["label"].is_string());
    assert!(value["relevance"].is_i64());
    assert_eq!(value["edit"]["edits"][0]["file"], "test1/E.java");
}
