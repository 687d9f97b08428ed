use assert_fs::prelude::*;
use assert_fs::TempDir;
use predicates::prelude::*;

use super::mend;

const SOURCE: &str = "package test1;\nimport java.util.List;\npublic class E {\n    private int count;\n    public E() {\n    }\n    public List<String> names(int max) {\n        return null;\n    }\n}\n";

#[test]
fn parse_prints_an_outline() {
    let temp = TempDir::new().unwrap();
    temp.child("E.java").write_str(SOURCE).unwrap();

    mend()
        .arg("parse")
        .arg(temp.child("E.java").path())
        .assert()
        .success()
        .stdout(
            predicate::str::contains("package test1")
                .and(predicate::str::contains("import java.util.List"))
                .and(predicate::str::contains("class E"))
                .and(predicate::str::contains("  field count int"))
                .and(predicate::str::contains("  constructor E ()"))
                .and(predicate::str::contains("  method names (int) -> List<String>")),
        );
}

#[test]
fn parse_json_lists_members() {
    let temp = TempDir::new().unwrap();
    temp.child("E.java").write_str(SOURCE).unwrap();

    let output = mend()
        .arg("parse")
        .arg(temp.child("E.java").path())
        .arg("--json")
        .output()
        .unwrap();
    assert!(
        output.status.success(),
        "stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );

    let v: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(v["package"], "test1");
    assert_eq!(v["types"][0]["name"], "E");
    let kinds: Vec<&str> = v["types"][0]["children"]
        .as_array()
        .unwrap()
        .iter()
        .map(|child| child["kind"].as_str().unwrap())
        .collect();
    assert_eq!(kinds, vec!["field", "constructor", "method"]);
}

#[test]
fn parse_reports_missing_files() {
    mend()
        .args(["parse", "does/not/Exist.java"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("failed to read"));
}
