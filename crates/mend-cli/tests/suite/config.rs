use assert_fs::prelude::*;
use assert_fs::TempDir;
use predicates::prelude::*;

use super::mend;

#[test]
fn help_mentions_core_commands() {
    mend().arg("--help").assert().success().stdout(
        predicate::str::contains("fix")
            .and(predicate::str::contains("parse"))
            .and(predicate::str::contains("config")),
    );
}

#[test]
fn schema_describes_correction_preferences() {
    let output = mend().args(["config", "schema"]).output().unwrap();
    assert!(output.status.success());

    let schema: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let text = schema.to_string();
    assert!(text.contains("favorite_static_import_members"), "{text}");
    assert!(text.contains("preferred_exception_variable_name"), "{text}");
    assert!(text.contains("generated_comment_policy"), "{text}");
}

#[test]
fn malformed_config_is_a_usage_error() {
    let temp = TempDir::new().unwrap();
    temp.child("E.java")
        .write_str("public class E {\n}\n")
        .unwrap();
    temp.child("diagnostics.json").write_str("[]").unwrap();
    temp.child("mend.toml")
        .write_str("[correction\npreferred_exception_variable_name = 1\n")
        .unwrap();

    mend()
        .arg("fix")
        .arg(temp.child("E.java").path())
        .arg("--diagnostics")
        .arg(temp.child("diagnostics.json").path())
        .arg("--config")
        .arg(temp.child("mend.toml").path())
        .assert()
        .code(2)
        .stderr(predicate::str::contains("invalid config"));
}

#[test]
fn unknown_config_keys_are_reported() {
    let temp = TempDir::new().unwrap();
    temp.child("E.java")
        .write_str("public class E {\n}\n")
        .unwrap();
    temp.child("diagnostics.json").write_str("[]").unwrap();
    temp.child("mend.toml")
        .write_str("[correction]\nfavourite_static_import_members = []\n")
        .unwrap();

    mend()
        .arg("fix")
        .arg(temp.child("E.java").path())
        .arg("--diagnostics")
        .arg(temp.child("diagnostics.json").path())
        .arg("--config")
        .arg(temp.child("mend.toml").path())
        .assert()
        .success()
        .stderr(predicate::str::contains(
            "unknown key `correction.favourite_static_import_members`",
        ));
}
