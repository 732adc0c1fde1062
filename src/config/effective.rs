//! Effective configuration with provenance
//!
//! The merged configuration plus the sources that contributed to it.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sha2::{Digest, Sha256};
use std::fs;
use std::path::Path;

use livedoc_results::UnknownFormat;

use super::defaults::BuiltinDefaults;
use super::merge::merge_layers;
use crate::filter::TagExpressionError;

/// Schema version for effective_config
pub const SCHEMA_VERSION: u32 = 1;

/// Schema identifier
pub const SCHEMA_ID: &str = "livedoc/effective_config@1";

/// Keys that must hold strings when present
const STRING_KEYS: &[&str] = &[
    "feature_directory",
    "output_directory",
    "documentation_format",
    "project_name",
    "project_version",
    "filter.exclude_tag",
    "filter.include_only_tag",
    "test_results.format",
];

/// Keys that must hold arrays of strings when present
const LIST_KEYS: &[&str] = &["test_results.files", "discovery.include", "discovery.exclude"];

/// Origin of a configuration source
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum ConfigOrigin {
    Builtin,
    Host,
    Repo,
    Cli,
}

/// A contributing config source
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfigSource {
    pub origin: ConfigOrigin,

    /// File path (None for builtin/cli)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,

    /// SHA-256 digest of raw file bytes (None for builtin/cli)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub digest: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EffectiveConfig {
    pub schema_version: u32,

    pub schema_id: String,

    /// When this config was computed
    pub created_at: DateTime<Utc>,

    /// The merged configuration object
    pub config: Value,

    /// Contributing sources in precedence order
    pub sources: Vec<ConfigSource>,
}

impl EffectiveConfig {
    /// Build effective config from layers. Missing files are skipped.
    pub fn build(
        host_config_path: Option<&Path>,
        repo_config_path: Option<&Path>,
        cli_overrides: Option<Value>,
    ) -> Result<Self, ConfigError> {
        let mut layers = vec![BuiltinDefaults::default().to_value()];
        let mut sources = vec![ConfigSource {
            origin: ConfigOrigin::Builtin,
            path: None,
            digest: None,
        }];

        for (origin, path) in [
            (ConfigOrigin::Host, host_config_path),
            (ConfigOrigin::Repo, repo_config_path),
        ] {
            let Some(path) = path.filter(|p| p.exists()) else {
                continue;
            };
            let (value, digest) = Self::load_toml_file(path)?;
            tracing::debug!(path = %path.display(), ?origin, "loaded config layer");
            layers.push(value);
            sources.push(ConfigSource {
                origin,
                path: Some(path.to_string_lossy().to_string()),
                digest: Some(digest),
            });
        }

        if let Some(cli) = cli_overrides {
            layers.push(cli);
            sources.push(ConfigSource {
                origin: ConfigOrigin::Cli,
                path: None,
                digest: None,
            });
        }

        let merged = merge_layers(layers);
        Self::validate_config(&merged)?;

        Ok(Self {
            schema_version: SCHEMA_VERSION,
            schema_id: SCHEMA_ID.to_string(),
            created_at: Utc::now(),
            config: merged,
            sources,
        })
    }

    /// Load and parse a TOML file, returning the value and digest
    fn load_toml_file(path: &Path) -> Result<(Value, String), ConfigError> {
        let bytes = fs::read(path)
            .map_err(|e| ConfigError::IoError(format!("{}: {}", path.display(), e)))?;

        let mut hasher = Sha256::new();
        hasher.update(&bytes);
        let digest = hex::encode(hasher.finalize());

        let contents = String::from_utf8(bytes)
            .map_err(|e| ConfigError::ParseError(format!("{}: invalid UTF-8: {}", path.display(), e)))?;
        let toml_value: toml::Value = toml::from_str(&contents)
            .map_err(|e| ConfigError::ParseError(format!("{}: {}", path.display(), e)))?;

        Ok((toml_to_json(toml_value), digest))
    }

    /// Type-check the known keys
    fn validate_config(config: &Value) -> Result<(), ConfigError> {
        for key in STRING_KEYS {
            match lookup(config, key) {
                None | Some(Value::Null) | Some(Value::String(_)) => {}
                Some(_) => {
                    return Err(ConfigError::ValidationError(format!("{} must be a string", key)));
                }
            }
        }
        for key in LIST_KEYS {
            match lookup(config, key) {
                None | Some(Value::Null) => {}
                Some(Value::Array(items)) if items.iter().all(Value::is_string) => {}
                Some(_) => {
                    return Err(ConfigError::ValidationError(format!(
                        "{} must be an array of strings",
                        key
                    )));
                }
            }
        }
        Ok(())
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Get a config value by dot-separated path
    pub fn get(&self, path: &str) -> Option<&Value> {
        lookup(&self.config, path)
    }

    pub fn get_str(&self, path: &str) -> Option<&str> {
        self.get(path).and_then(|v| v.as_str())
    }

    /// Like [`get_str`](Self::get_str), with blank strings treated as unset
    pub fn get_non_empty(&self, path: &str) -> Option<&str> {
        self.get_str(path).map(str::trim).filter(|s| !s.is_empty())
    }

    pub fn get_str_list(&self, path: &str) -> Vec<String> {
        self.get(path)
            .and_then(|v| v.as_array())
            .map(|items| {
                items
                    .iter()
                    .filter_map(|v| v.as_str())
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default()
    }
}

fn lookup<'a>(config: &'a Value, path: &str) -> Option<&'a Value> {
    let mut current = config;
    for part in path.split('.') {
        current = current.get(part)?;
    }
    Some(current)
}

/// Convert a TOML value to a JSON value
fn toml_to_json(toml: toml::Value) -> Value {
    match toml {
        toml::Value::String(s) => Value::String(s),
        toml::Value::Integer(i) => Value::Number(i.into()),
        toml::Value::Float(f) => serde_json::Number::from_f64(f)
            .map(Value::Number)
            .unwrap_or(Value::Null),
        toml::Value::Boolean(b) => Value::Bool(b),
        toml::Value::Datetime(dt) => Value::String(dt.to_string()),
        toml::Value::Array(arr) => Value::Array(arr.into_iter().map(toml_to_json).collect()),
        toml::Value::Table(table) => Value::Object(
            table
                .into_iter()
                .map(|(k, v)| (k, toml_to_json(v)))
                .collect(),
        ),
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    IoError(String),

    #[error("Parse error: {0}")]
    ParseError(String),

    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("test_results.format: {0}")]
    UnknownResultsFormat(#[from] UnknownFormat),

    #[error("documentation_format: unknown format `{0}` (expected json or markdown)")]
    UnknownDocumentationFormat(String),

    #[error("{key}: {source}")]
    InvalidTag {
        key: &'static str,
        #[source]
        source: TagExpressionError,
    },

    #[error("discovery: invalid glob: {0}")]
    InvalidGlob(#[from] globset::Error),
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_build_with_defaults_only() {
        let config = EffectiveConfig::build(None, None, None).unwrap();
        assert_eq!(config.schema_version, SCHEMA_VERSION);
        assert_eq!(config.get_str("feature_directory"), Some("features"));
        assert_eq!(config.get_str("test_results.format"), Some("nunit"));
        assert_eq!(config.get_non_empty("filter.exclude_tag"), None);
    }

    #[test]
    fn test_cli_overrides_repo() {
        let mut repo = NamedTempFile::new().unwrap();
        writeln!(repo, "output_directory = \"site\"").unwrap();
        writeln!(repo, "[filter]").unwrap();
        writeln!(repo, "exclude_tag = \"wip\"").unwrap();
        writeln!(repo, "[test_results]").unwrap();
        writeln!(repo, "format = \"mstest\"").unwrap();
        writeln!(repo, "files = [\"results.trx\"]").unwrap();

        let cli = serde_json::json!({"output_directory": "out"});
        let config = EffectiveConfig::build(None, Some(repo.path()), Some(cli)).unwrap();

        assert_eq!(config.get_str("output_directory"), Some("out"));
        assert_eq!(config.get_str("filter.exclude_tag"), Some("wip"));
        assert_eq!(config.get_str("filter.include_only_tag"), Some(""));
        assert_eq!(config.get_str_list("test_results.files"), vec!["results.trx"]);
    }

    #[test]
    fn test_sources_tracked_with_digest() {
        let mut host = NamedTempFile::new().unwrap();
        writeln!(host, "project_name = \"Bank\"").unwrap();

        let config = EffectiveConfig::build(Some(host.path()), None, None).unwrap();
        assert_eq!(config.sources.len(), 2);
        assert_eq!(config.sources[0].origin, ConfigOrigin::Builtin);
        assert_eq!(config.sources[1].origin, ConfigOrigin::Host);
        assert_eq!(config.sources[1].digest.as_ref().unwrap().len(), 64);
    }

    #[test]
    fn test_missing_file_skipped() {
        let config =
            EffectiveConfig::build(None, Some(Path::new("/nonexistent/livedoc.toml")), None).unwrap();
        assert_eq!(config.sources.len(), 1);
    }

    #[test]
    fn test_type_validation() {
        let cli = serde_json::json!({"filter": {"exclude_tag": 3}});
        let err = EffectiveConfig::build(None, None, Some(cli)).unwrap_err();
        assert!(err.to_string().contains("filter.exclude_tag"));

        let cli = serde_json::json!({"test_results": {"files": "one.trx"}});
        let err = EffectiveConfig::build(None, None, Some(cli)).unwrap_err();
        assert!(err.to_string().contains("test_results.files"));
    }

    #[test]
    fn test_invalid_toml() {
        let mut repo = NamedTempFile::new().unwrap();
        writeln!(repo, "output_directory = ").unwrap();
        let err = EffectiveConfig::build(None, Some(repo.path()), None).unwrap_err();
        assert!(matches!(err, ConfigError::ParseError(_)));
    }
}
