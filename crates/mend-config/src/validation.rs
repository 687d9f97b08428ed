use crate::diagnostics::ConfigWarning;
use crate::{is_java_identifier, FavoriteMember, LoggingConfig, MendConfig};

impl MendConfig {
    /// Semantic checks that deserialization cannot express.
    ///
    /// Best effort: reports every problem found in one pass.
    #[must_use]
    pub fn validate(&self) -> Vec<ConfigWarning> {
        let mut out = Vec::new();
        validate_correction(self, &mut out);
        validate_logging(self, &mut out);
        out
    }
}

fn validate_correction(config: &MendConfig, out: &mut Vec<ConfigWarning>) {
    let name = &config.correction.preferred_exception_variable_name;
    if !is_java_identifier(name) {
        out.push(ConfigWarning::InvalidValue {
            toml_path: "correction.preferred_exception_variable_name".to_string(),
            message: format!("`{name}` is not a Java identifier; `e` is used instead"),
        });
    }

    for (idx, entry) in config
        .correction
        .favorite_static_import_members
        .iter()
        .enumerate()
    {
        if FavoriteMember::parse(entry).is_none() {
            out.push(ConfigWarning::InvalidValue {
                toml_path: format!("correction.favorite_static_import_members[{idx}]"),
                message: format!(
                    "`{entry}` must be a qualified type followed by a member name or `*`"
                ),
            });
        }
    }
}

fn validate_logging(config: &MendConfig, out: &mut Vec<ConfigWarning>) {
    let normalized = LoggingConfig::normalize_level_directives(&config.logging.level);
    if !config.logging.level.trim().is_empty()
        && tracing_subscriber::EnvFilter::try_new(normalized.clone()).is_err()
    {
        out.push(ConfigWarning::LoggingLevelInvalid {
            value: config.logging.level.clone(),
            normalized,
        });
    }
}
