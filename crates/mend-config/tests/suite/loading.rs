use mend_config::{
    discover_config_path, ConfigError, ConfigWarning, GeneratedCommentPolicy, MendConfig,
};
use pretty_assertions::assert_eq;

#[test]
fn empty_config_uses_defaults() {
    let (config, diagnostics) = MendConfig::load_from_str_with_diagnostics("").expect("config");
    assert_eq!(config, MendConfig::default());
    assert!(diagnostics.is_empty());
}

#[test]
fn correction_section_is_read() {
    let text = r#"
[correction]
favorite_static_import_members = ["java.lang.Math.*", "org.junit.Assert.assertEquals"]
preferred_exception_variable_name = "ex"
generated_comment_policy = "none"
"#;
    let (config, diagnostics) = MendConfig::load_from_str_with_diagnostics(text).expect("config");
    assert!(diagnostics.is_empty(), "{diagnostics:?}");
    assert_eq!(config.correction.exception_variable_name(), "ex");
    assert_eq!(
        config.correction.generated_comment_policy,
        GeneratedCommentPolicy::None
    );
    let favorites = config.correction.favorites();
    assert_eq!(favorites.len(), 2);
    assert!(favorites[0].covers("java.lang.Math", "max"));
    assert!(favorites[1].covers("org.junit.Assert", "assertEquals"));
}

#[test]
fn unknown_keys_are_reported() {
    let text = r#"
[correction]
favourite_static_import_members = []

[logging]
level = "debug"
colour = true
"#;
    let (_config, diagnostics) = MendConfig::load_from_str_with_diagnostics(text).expect("config");
    assert_eq!(
        diagnostics.unknown_keys,
        vec![
            "correction.favourite_static_import_members".to_string(),
            "logging.colour".to_string(),
        ]
    );
}

#[test]
fn suspicious_values_produce_warnings() {
    let text = r#"
[correction]
favorite_static_import_members = ["Math.*", "java.lang.Math.max"]
preferred_exception_variable_name = "1e"
"#;
    let (config, diagnostics) = MendConfig::load_from_str_with_diagnostics(text).expect("config");
    assert_eq!(config.correction.exception_variable_name(), "e");
    assert_eq!(config.correction.favorites().len(), 1);
    let paths: Vec<String> = diagnostics
        .warnings
        .iter()
        .filter_map(|warning| match warning {
            ConfigWarning::InvalidValue { toml_path, .. } => Some(toml_path.clone()),
            _ => None,
        })
        .collect();
    assert_eq!(
        paths,
        vec![
            "correction.preferred_exception_variable_name".to_string(),
            "correction.favorite_static_import_members[0]".to_string(),
        ]
    );
}

#[test]
fn invalid_logging_level_is_reported() {
    let (_config, diagnostics) =
        MendConfig::load_from_str_with_diagnostics("[logging]\nlevel = \"mend=loud\"\n")
            .expect("config");
    assert!(diagnostics
        .warnings
        .iter()
        .any(|w| matches!(w, ConfigWarning::LoggingLevelInvalid { .. })));
}

#[test]
fn malformed_toml_is_an_error() {
    let err = MendConfig::load_from_str_with_diagnostics("[correction\n").unwrap_err();
    assert!(matches!(err, ConfigError::Toml(_)));
}

#[test]
fn loads_and_discovers_files() {
    let dir = tempfile::tempdir().expect("tempdir");
    assert_eq!(discover_config_path(dir.path()), None);

    let hidden = dir.path().join(".mend.toml");
    std::fs::write(&hidden, "[logging]\njson = true\n").expect("write");
    assert_eq!(discover_config_path(dir.path()), Some(hidden.clone()));

    let visible = dir.path().join("mend.toml");
    std::fs::write(&visible, "[correction]\npreferred_exception_variable_name = \"ex\"\n")
        .expect("write");
    assert_eq!(discover_config_path(dir.path()), Some(visible.clone()));

    let config = MendConfig::load_from_path(&hidden).expect("config");
    assert!(config.logging.json);
    let config = MendConfig::load_from_path(&visible).expect("config");
    assert_eq!(config.correction.preferred_exception_variable_name, "ex");
}

#[test]
fn missing_file_is_an_io_error() {
    let dir = tempfile::tempdir().expect("tempdir");
    let err = MendConfig::load_from_path(dir.path().join("absent.toml")).unwrap_err();
    assert!(matches!(err, ConfigError::Io { .. }));
}
