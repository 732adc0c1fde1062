//! Typed view of the effective configuration for one documentation build

use std::path::PathBuf;

use livedoc_results::TestResultsFormat;

use super::effective::{ConfigError, EffectiveConfig};
use crate::discovery::DiscoveryRules;
use crate::filter::{TagExpression, TagFilter};
use crate::render::DocumentationFormat;

/// Everything the pipeline needs, validated up front
#[derive(Debug, Clone)]
pub struct BuildConfig {
    pub feature_directory: PathBuf,
    pub output_directory: PathBuf,
    pub documentation_format: DocumentationFormat,
    pub project_name: Option<String>,
    pub project_version: Option<String>,
    pub filter: TagFilter,
    pub results_format: TestResultsFormat,
    pub result_files: Vec<PathBuf>,
    pub discovery: DiscoveryRules,
}

impl BuildConfig {
    /// Validate and convert. Every configuration error is reported here,
    /// before anything is read or written.
    pub fn from_effective(config: &EffectiveConfig) -> Result<Self, ConfigError> {
        let documentation_format = config
            .get_str("documentation_format")
            .unwrap_or("json");
        let documentation_format = documentation_format
            .parse::<DocumentationFormat>()
            .map_err(|_| ConfigError::UnknownDocumentationFormat(documentation_format.to_string()))?;

        let results_format = config
            .get_str("test_results.format")
            .unwrap_or("nunit")
            .parse::<TestResultsFormat>()?;

        let exclude = tag(config, "filter.exclude_tag")?;
        let include_only = tag(config, "filter.include_only_tag")?;

        let discovery = DiscoveryRules::new(
            &config.get_str_list("discovery.include"),
            &config.get_str_list("discovery.exclude"),
        )?;

        Ok(Self {
            feature_directory: PathBuf::from(config.get_str("feature_directory").unwrap_or("features")),
            output_directory: PathBuf::from(config.get_str("output_directory").unwrap_or("docs")),
            documentation_format,
            project_name: config.get_non_empty("project_name").map(str::to_string),
            project_version: config.get_non_empty("project_version").map(str::to_string),
            filter: TagFilter::new(exclude, include_only),
            results_format,
            result_files: config
                .get_str_list("test_results.files")
                .into_iter()
                .map(PathBuf::from)
                .collect(),
            discovery,
        })
    }
}

fn tag(config: &EffectiveConfig, key: &'static str) -> Result<Option<TagExpression>, ConfigError> {
    TagExpression::parse(config.get_str(key).unwrap_or_default())
        .map_err(|source| ConfigError::InvalidTag { key, source })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn build(cli: serde_json::Value) -> Result<BuildConfig, ConfigError> {
        BuildConfig::from_effective(&EffectiveConfig::build(None, None, Some(cli))?)
    }

    #[test]
    fn test_defaults() {
        let config = build(json!({})).unwrap();
        assert_eq!(config.feature_directory, PathBuf::from("features"));
        assert_eq!(config.output_directory, PathBuf::from("docs"));
        assert_eq!(config.documentation_format, DocumentationFormat::Json);
        assert_eq!(config.results_format, TestResultsFormat::NUnit);
        assert!(config.filter.exclude().is_none());
        assert!(config.filter.include_only().is_none());
        assert!(config.result_files.is_empty());
        assert!(config.project_name.is_none());
    }

    #[test]
    fn test_overrides() {
        let config = build(json!({
            "documentation_format": "markdown",
            "project_name": "Bank",
            "filter": {"exclude_tag": "slow", "include_only_tag": "@smoke"},
            "test_results": {"format": "MsTest", "files": ["a.trx", "b.trx"]}
        }))
        .unwrap();
        assert_eq!(config.documentation_format, DocumentationFormat::Markdown);
        assert_eq!(config.project_name.as_deref(), Some("Bank"));
        assert_eq!(config.filter.exclude().unwrap().to_string(), "@slow");
        assert_eq!(config.filter.include_only().unwrap().to_string(), "@smoke");
        assert_eq!(config.results_format, TestResultsFormat::MsTest);
        assert_eq!(config.result_files.len(), 2);
    }

    #[test]
    fn test_unknown_results_format() {
        let err = build(json!({"test_results": {"format": "specrun"}})).unwrap_err();
        assert!(matches!(err, ConfigError::UnknownResultsFormat(_)));
    }

    #[test]
    fn test_unknown_documentation_format() {
        let err = build(json!({"documentation_format": "word"})).unwrap_err();
        assert!(matches!(err, ConfigError::UnknownDocumentationFormat(f) if f == "word"));
    }

    #[test]
    fn test_invalid_tag_expression() {
        let err = build(json!({"filter": {"include_only_tag": "@a,@b"}})).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidTag { key: "filter.include_only_tag", .. }));
    }

    #[test]
    fn test_invalid_glob() {
        let err = build(json!({"discovery": {"exclude": ["[oops"]}})).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidGlob(_)));
    }
}
