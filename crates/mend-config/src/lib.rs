//! Configuration for the correction engine and its tools.
//!
//! Configuration lives in `mend.toml`:
//!
//! ```toml
//! [correction]
//! favorite_static_import_members = ["java.lang.Math.*", "org.junit.Assert.assertEquals"]
//! preferred_exception_variable_name = "e"
//! generated_comment_policy = "javadoc"
//!
//! [logging]
//! level = "info"
//! json = false
//! ```

use std::fs::OpenOptions;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, Once};

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing_subscriber::fmt::writer::{BoxMakeWriter, MakeWriterExt};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::Layer;

mod diagnostics;
mod schema;
mod validation;

pub use diagnostics::{ConfigDiagnostics, ConfigWarning};
pub use schema::json_schema;

/// Config file names looked up in a workspace root, in order.
pub const CONFIG_FILE_NAMES: [&str; 2] = ["mend.toml", ".mend.toml"];

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[schemars(deny_unknown_fields)]
pub struct MendConfig {
    /// Preferences consulted while computing correction proposals.
    #[serde(default)]
    pub correction: CorrectionConfig,

    /// Logging settings for the `mend` binaries.
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Whether generated members and signature changes carry Javadoc.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum GeneratedCommentPolicy {
    /// Add Javadoc to generated getters/setters and keep `@param` tags in sync.
    #[default]
    Javadoc,
    /// Never touch comments.
    None,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[schemars(deny_unknown_fields)]
pub struct CorrectionConfig {
    /// Static members offered as static imports: `pkg.Type.member` or `pkg.Type.*`.
    #[serde(default)]
    pub favorite_static_import_members: Vec<String>,

    /// Name of the variable in generated catch clauses.
    #[serde(default = "CorrectionConfig::default_exception_variable_name")]
    #[schemars(length(min = 1))]
    pub preferred_exception_variable_name: String,

    #[serde(default)]
    pub generated_comment_policy: GeneratedCommentPolicy,
}

impl CorrectionConfig {
    fn default_exception_variable_name() -> String {
        "e".to_owned()
    }

    pub fn generates_comments(&self) -> bool {
        self.generated_comment_policy == GeneratedCommentPolicy::Javadoc
    }

    /// The catch variable name to use; falls back to `e` when the configured one is not a
    /// Java identifier.
    pub fn exception_variable_name(&self) -> &str {
        if is_java_identifier(&self.preferred_exception_variable_name) {
            &self.preferred_exception_variable_name
        } else {
            "e"
        }
    }

    /// Well-formed favorite static-import entries.
    pub fn favorites(&self) -> Vec<FavoriteMember> {
        self.favorite_static_import_members
            .iter()
            .filter_map(|entry| FavoriteMember::parse(entry))
            .collect()
    }
}

impl Default for CorrectionConfig {
    fn default() -> Self {
        Self {
            favorite_static_import_members: Vec::new(),
            preferred_exception_variable_name: Self::default_exception_variable_name(),
            generated_comment_policy: GeneratedCommentPolicy::default(),
        }
    }
}

/// A parsed `favorite_static_import_members` entry.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FavoriteMember {
    /// Qualified name of the declaring type.
    pub type_name: String,
    /// `None` for `Type.*`.
    pub member: Option<String>,
}

impl FavoriteMember {
    pub fn parse(entry: &str) -> Option<FavoriteMember> {
        let (type_name, member) = entry.trim().rsplit_once('.')?;
        if !type_name.contains('.') || !type_name.split('.').all(is_java_identifier) {
            return None;
        }
        let member = match member {
            "*" => None,
            name if is_java_identifier(name) => Some(name.to_owned()),
            _ => return None,
        };
        Some(FavoriteMember {
            type_name: type_name.to_owned(),
            member,
        })
    }

    /// `true` if this entry makes `name` of `type_name` a favorite.
    pub fn covers(&self, type_name: &str, name: &str) -> bool {
        self.type_name == type_name && self.member.as_deref().map_or(true, |m| m == name)
    }
}

pub(crate) fn is_java_identifier(text: &str) -> bool {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) if first.is_alphabetic() || first == '_' || first == '$' => {
            chars.all(|c| c.is_alphanumeric() || c == '_' || c == '$')
        }
        _ => false,
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[schemars(deny_unknown_fields)]
pub struct LoggingConfig {
    /// A level (`info`, `debug`, ...) or a full `EnvFilter` directive string.
    #[serde(default = "LoggingConfig::default_level")]
    pub level: String,

    /// Emit logs as JSON lines.
    #[serde(default)]
    pub json: bool,

    /// Write logs to stderr.
    #[serde(default = "LoggingConfig::default_stderr")]
    pub stderr: bool,

    /// Append logs to the given file. If it cannot be opened, file logging is disabled.
    #[serde(default)]
    pub file: Option<PathBuf>,
}

impl LoggingConfig {
    fn default_level() -> String {
        "warn".to_owned()
    }

    fn default_stderr() -> bool {
        true
    }

    pub(crate) fn normalize_level_directives(input: &str) -> String {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return Self::default_level();
        }
        match trimmed.to_ascii_lowercase().as_str() {
            "trace" => "trace".to_owned(),
            "debug" => "debug".to_owned(),
            "info" => "info".to_owned(),
            "warn" | "warning" => "warn".to_owned(),
            "error" => "error".to_owned(),
            "off" => "off".to_owned(),
            _ => trimmed.to_owned(),
        }
    }

    fn config_env_filter(&self) -> tracing_subscriber::EnvFilter {
        let directives = Self::normalize_level_directives(&self.level);
        tracing_subscriber::EnvFilter::try_new(directives).unwrap_or_else(|_| {
            tracing_subscriber::EnvFilter::default()
                .add_directive(tracing_subscriber::filter::LevelFilter::WARN.into())
        })
    }

    /// The effective filter: the configured level merged with `RUST_LOG` when set.
    pub fn env_filter(&self) -> tracing_subscriber::EnvFilter {
        let env_directives = std::env::var("RUST_LOG")
            .ok()
            .map(|value| value.trim().to_owned())
            .filter(|value| !value.is_empty());

        let config_directives = Self::normalize_level_directives(&self.level);
        match env_directives {
            Some(env_directives) => {
                let combined = format!("{config_directives},{env_directives}");
                tracing_subscriber::EnvFilter::try_new(combined)
                    .or_else(|_| tracing_subscriber::EnvFilter::try_new(env_directives))
                    .unwrap_or_else(|_| self.config_env_filter())
            }
            None => self.config_env_filter(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: Self::default_level(),
            json: false,
            stderr: Self::default_stderr(),
            file: None,
        }
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse toml config: {0}")]
    Toml(String),
}

impl From<toml::de::Error> for ConfigError {
    fn from(err: toml::de::Error) -> Self {
        // The default `Display` includes a source snippet; keep the message only.
        ConfigError::Toml(err.message().to_owned())
    }
}

impl MendConfig {
    /// Load a config file from TOML.
    pub fn load_from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let text = read_config(path.as_ref())?;
        Ok(toml::from_str(&text)?)
    }

    /// Load a config file and report unknown keys and suspicious values.
    pub fn load_from_path_with_diagnostics(
        path: impl AsRef<Path>,
    ) -> Result<(Self, ConfigDiagnostics), ConfigError> {
        let text = read_config(path.as_ref())?;
        Self::load_from_str_with_diagnostics(&text)
    }

    /// Load a config from a TOML string and report unknown keys and suspicious values.
    pub fn load_from_str_with_diagnostics(
        text: &str,
    ) -> Result<(Self, ConfigDiagnostics), ConfigError> {
        let (config, unknown_keys) =
            diagnostics::deserialize_toml_with_unknown_keys::<MendConfig>(text)?;
        let diagnostics = ConfigDiagnostics {
            unknown_keys,
            warnings: config.validate(),
        };
        Ok((config, diagnostics))
    }
}

fn read_config(path: &Path) -> Result<String, ConfigError> {
    std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.display().to_string(),
        source,
    })
}

/// The first config file found in `workspace_root`, if any.
pub fn discover_config_path(workspace_root: &Path) -> Option<PathBuf> {
    CONFIG_FILE_NAMES
        .into_iter()
        .map(|name| workspace_root.join(name))
        .find(|path| path.is_file())
}

static TRACING_INIT: Once = Once::new();

/// Install the global `tracing` subscriber.
///
/// Safe to call multiple times; only the first call has an effect.
pub fn init_tracing(logging: &LoggingConfig) {
    TRACING_INIT.call_once(|| {
        let filter = logging.env_filter();

        let file = logging.file.as_ref().and_then(|path| {
            OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .ok()
        });
        let file_failed = logging.file.is_some() && file.is_none();

        let make_writer = match (logging.stderr, file) {
            (true, Some(file)) => BoxMakeWriter::new(std::io::stderr.and(Mutex::new(file))),
            (true, None) => BoxMakeWriter::new(std::io::stderr),
            (false, Some(file)) => BoxMakeWriter::new(Mutex::new(file)),
            (false, None) => BoxMakeWriter::new(std::io::sink),
        };

        let layer: Box<dyn tracing_subscriber::Layer<_> + Send + Sync> = if logging.json {
            tracing_subscriber::fmt::layer()
                .json()
                .with_writer(make_writer)
                .with_ansi(false)
                .boxed()
        } else {
            tracing_subscriber::fmt::layer()
                .with_writer(make_writer)
                .with_ansi(false)
                .boxed()
        };

        let subscriber = tracing_subscriber::registry().with(filter).with(layer);
        if tracing::subscriber::set_global_default(subscriber).is_ok() && file_failed {
            if let Some(path) = logging.file.as_ref() {
                tracing::warn!(
                    target: "mend.config",
                    path = %path.display(),
                    "failed to open log file; file logging disabled"
                );
            }
        }
    });
}
