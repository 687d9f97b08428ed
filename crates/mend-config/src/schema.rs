use schemars::schema::{RootSchema, Schema};
use schemars::schema_for;
use serde_json::json;

use crate::MendConfig;

/// JSON schema for `mend.toml`.
///
/// Intended for editor tooling and CI validation of config files.
#[must_use]
pub fn json_schema() -> RootSchema {
    let mut schema = schema_for!(MendConfig);
    apply_semantic_constraints(&mut schema);
    schema
}

fn apply_semantic_constraints(schema: &mut RootSchema) {
    // Only checked when the keys are present; JSON Schema does not apply defaults.
    push_all_of(
        schema,
        json!({
            "properties": {
                "correction": {
                    "properties": {
                        "preferred_exception_variable_name": {
                            "type": "string",
                            "pattern": "^[A-Za-z_$][A-Za-z0-9_$]*$"
                        },
                        "favorite_static_import_members": {
                            "type": "array",
                            "items": {
                                "type": "string",
                                "pattern": "^[A-Za-z_$][A-Za-z0-9_$]*(\\.[A-Za-z_$][A-Za-z0-9_$]*)+\\.([A-Za-z_$][A-Za-z0-9_$]*|\\*)$"
                            }
                        }
                    }
                }
            }
        }),
    );
}

fn push_all_of(root: &mut RootSchema, value: serde_json::Value) {
    let Ok(schema) = serde_json::from_value::<Schema>(value) else {
        return;
    };
    let subschemas = root.schema.subschemas();
    subschemas.all_of.get_or_insert_with(Vec::new).push(schema);
}
