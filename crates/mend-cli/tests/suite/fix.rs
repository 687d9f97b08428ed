use assert_fs::prelude::*;
use assert_fs::TempDir;
use predicates::prelude::*;
use pretty_assertions::assert_eq;
use serde_json::json;

use super::mend;

const UNCAUGHT: &str = "package test1;\nimport java.io.IOException;\npublic class E {\n    public void goo() throws IOException {\n    }\n    public void foo() {\n        goo();\n    }\n}\n";

fn range_of(text: &str, needle: &str) -> (usize, usize) {
    let start = text.find(needle).unwrap();
    (start, start + needle.len())
}

fn uncaught_project() -> TempDir {
    let temp = TempDir::new().unwrap();
    temp.child("src/test1/E.java").write_str(UNCAUGHT).unwrap();
    let (start, end) = range_of(UNCAUGHT, "goo();");
    let diagnostics = json!([{
        "kind": "UncaughtException",
        "range": { "start": start, "end": end },
        "arguments": ["java.io.IOException"]
    }]);
    temp.child("diagnostics.json")
        .write_str(&diagnostics.to_string())
        .unwrap();
    temp
}

fn labels(report: &serde_json::Value) -> Vec<String> {
    report["proposals"]
        .as_array()
        .unwrap()
        .iter()
        .map(|p| p["label"].as_str().unwrap().to_string())
        .collect()
}

#[test]
fn fix_lists_ranked_proposals_as_json() {
    let temp = uncaught_project();

    let output = mend()
        .arg("fix")
        .arg(temp.child("src/test1/E.java").path())
        .arg("--diagnostics")
        .arg(temp.child("diagnostics.json").path())
        .arg("--json")
        .output()
        .unwrap();
    assert!(
        output.status.success(),
        "stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );

    let report: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(report["file"], "test1/E.java");
    let labels = labels(&report);
    assert_eq!(labels[0], "Add throws declaration");
    assert!(labels.contains(&"Surround with try/catch".to_string()), "{labels:?}");
    assert!(report.get("applied").is_none());
}

#[test]
fn fix_prints_numbered_proposals() {
    let temp = uncaught_project();

    mend()
        .arg("fix")
        .arg(temp.child("src/test1/E.java").path())
        .arg("--diagnostics")
        .arg(temp.child("diagnostics.json").path())
        .assert()
        .success()
        .stdout(predicate::str::contains("  1. Add throws declaration [8]"));
}

#[test]
fn fix_applies_the_selected_proposal() {
    let temp = uncaught_project();

    mend()
        .arg("fix")
        .arg(temp.child("src/test1/E.java").path())
        .arg("--diagnostics")
        .arg(temp.child("diagnostics.json").path())
        .args(["--apply", "1"])
        .assert()
        .success()
        .stdout(predicate::str::contains("applied #1: Add throws declaration"));

    temp.child("src/test1/E.java").assert(
        "package test1;\nimport java.io.IOException;\npublic class E {\n    public void goo() throws IOException {\n    }\n    public void foo() throws IOException {\n        goo();\n    }\n}\n",
    );
}

#[test]
fn fix_writes_edits_into_other_files() {
    let temp = TempDir::new().unwrap();
    let text = "package test1;\npublic class E {\n    void foo(X x) {\n        x.goo(1);\n    }\n}\n";
    temp.child("src/test1/E.java").write_str(text).unwrap();
    temp.child("src/test1/X.java")
        .write_str("package test1;\npublic class X {\n}\n")
        .unwrap();
    let (start, end) = range_of(text, "goo");
    temp.child("diagnostics.json")
        .write_str(
            &json!([{ "kind": "UndefinedMethod", "range": { "start": start, "end": end } }])
                .to_string(),
        )
        .unwrap();

    let output = mend()
        .arg("fix")
        .arg(temp.child("src/test1/E.java").path())
        .arg("--diagnostics")
        .arg(temp.child("diagnostics.json").path())
        .arg("--json")
        .output()
        .unwrap();
    assert!(output.status.success());
    let report: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let index = labels(&report)
        .iter()
        .position(|label| label == "Create method 'goo(int)' in type 'X'")
        .unwrap()
        + 1;

    mend()
        .arg("fix")
        .arg(temp.child("src/test1/E.java").path())
        .arg("--diagnostics")
        .arg(temp.child("diagnostics.json").path())
        .args(["--apply", &index.to_string()])
        .assert()
        .success();

    temp.child("src/test1/E.java").assert(text);
    temp.child("src/test1/X.java").assert(
        "package test1;\npublic class X {\n\n    public void goo(int i) {\n    }\n}\n",
    );
}

#[test]
fn explicit_source_roots_name_files_relative_to_the_root() {
    let temp = uncaught_project();

    let output = mend()
        .arg("fix")
        .arg(temp.child("src/test1/E.java").path())
        .arg("--diagnostics")
        .arg(temp.child("diagnostics.json").path())
        .arg("--source-root")
        .arg(temp.child("src").path())
        .arg("--json")
        .output()
        .unwrap();
    assert!(output.status.success());
    let report: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(report["file"], "test1/E.java");
    assert_eq!(
        report["proposals"][0]["edit"]["edits"][0]["file"],
        "test1/E.java"
    );
}

#[test]
fn diagnostics_can_be_read_from_stdin() {
    let temp = uncaught_project();
    let (start, end) = range_of(UNCAUGHT, "goo();");

    mend()
        .arg("fix")
        .arg(temp.child("src/test1/E.java").path())
        .args(["--diagnostics", "-"])
        .write_stdin(
            json!([{
                "kind": "UncaughtException",
                "range": { "start": start, "end": end },
                "arguments": ["java.io.IOException"]
            }])
            .to_string(),
        )
        .assert()
        .success()
        .stdout(predicate::str::contains("Add throws declaration"));
}

#[test]
fn selections_away_from_the_diagnostics_yield_nothing() {
    let temp = uncaught_project();

    mend()
        .arg("fix")
        .arg(temp.child("src/test1/E.java").path())
        .arg("--diagnostics")
        .arg(temp.child("diagnostics.json").path())
        .args(["--selection", "0..7"])
        .assert()
        .success()
        .stdout(predicate::str::contains("no proposals"));
}

#[test]
fn applying_without_proposals_exits_with_one() {
    let temp = uncaught_project();
    temp.child("empty.json").write_str("[]").unwrap();

    mend()
        .arg("fix")
        .arg(temp.child("src/test1/E.java").path())
        .arg("--diagnostics")
        .arg(temp.child("empty.json").path())
        .args(["--apply", "1"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("no proposal #1 to apply"));

    temp.child("src/test1/E.java").assert(UNCAUGHT);
}

#[test]
fn out_of_range_diagnostics_are_rejected() {
    let temp = uncaught_project();
    let bad = json!([{ "kind": "UndefinedName", "range": { "start": 0, "end": 100000 } }]);
    temp.child("bad.json").write_str(&bad.to_string()).unwrap();

    mend()
        .arg("fix")
        .arg(temp.child("src/test1/E.java").path())
        .arg("--diagnostics")
        .arg(temp.child("bad.json").path())
        .assert()
        .code(2)
        .stderr(predicate::str::contains("is outside"));
}

#[test]
fn malformed_selections_are_usage_errors() {
    let temp = uncaught_project();

    mend()
        .arg("fix")
        .arg(temp.child("src/test1/E.java").path())
        .arg("--diagnostics")
        .arg(temp.child("diagnostics.json").path())
        .args(["--selection", "9..3"])
        .assert()
        .code(2);
}
