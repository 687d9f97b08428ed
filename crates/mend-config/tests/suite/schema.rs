use mend_config::json_schema;

#[test]
fn schema_describes_both_sections() {
    let schema = serde_json::to_value(json_schema()).expect("json");
    let properties = &schema["properties"];
    assert!(properties.get("correction").is_some());
    assert!(properties.get("logging").is_some());

    let definitions = &schema["definitions"];
    let correction = &definitions["CorrectionConfig"]["properties"];
    assert!(correction
        .get("favorite_static_import_members")
        .is_some());
    assert_eq!(
        correction["preferred_exception_variable_name"]["minLength"],
        serde_json::json!(1)
    );
}

#[test]
fn schema_carries_identifier_patterns() {
    let schema = serde_json::to_value(json_schema()).expect("json");
    let all_of = schema["allOf"].as_array().expect("allOf");
    assert!(!all_of.is_empty());
    let pattern = &all_of[0]["properties"]["correction"]["properties"]
        ["preferred_exception_variable_name"]["pattern"];
    assert!(pattern.is_string());
}
