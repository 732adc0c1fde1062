//! Built-in defaults (layer 1)

use serde::{Deserialize, Serialize};

use crate::discovery::DEFAULT_INCLUDE;

/// Built-in default configuration values
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BuiltinDefaults {
    /// Directory scanned for feature files (default: "features")
    pub feature_directory: String,

    /// Directory the documentation is written to (default: "docs")
    pub output_directory: String,

    /// Output format (default: "json")
    pub documentation_format: String,

    /// Test results format identifier (default: "nunit")
    pub test_results_format: String,

    /// Discovery include globs (default: every `.feature` file)
    pub discovery_include: Vec<String>,
}

impl Default for BuiltinDefaults {
    fn default() -> Self {
        Self {
            feature_directory: "features".to_string(),
            output_directory: "docs".to_string(),
            documentation_format: "json".to_string(),
            test_results_format: "nunit".to_string(),
            discovery_include: DEFAULT_INCLUDE.iter().map(|p| p.to_string()).collect(),
        }
    }
}

impl BuiltinDefaults {
    /// Convert to JSON Value for merging
    pub fn to_value(&self) -> serde_json::Value {
        serde_json::json!({
            "feature_directory": self.feature_directory,
            "output_directory": self.output_directory,
            "documentation_format": self.documentation_format,
            "project_name": "",
            "project_version": "",
            "filter": {
                "exclude_tag": "",
                "include_only_tag": ""
            },
            "test_results": {
                "format": self.test_results_format,
                "files": []
            },
            "discovery": {
                "include": self.discovery_include,
                "exclude": []
            }
        })
    }
}
