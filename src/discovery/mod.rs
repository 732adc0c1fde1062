//! Feature file discovery
//!
//! Walks the feature directory and parses every file the rules select.
//! Files that fail to parse are reported back, not fatal.

mod rules;

use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;
use walkdir::WalkDir;

use crate::gherkin::{parse_feature, FeatureParseError};
use crate::model::Feature;

pub use rules::{DiscoveryRules, DEFAULT_INCLUDE};

#[derive(Debug, Error)]
pub enum DiscoveryError {
    #[error("feature directory not found: {0}")]
    MissingDirectory(PathBuf),

    #[error("failed to walk feature directory: {0}")]
    Walk(#[from] walkdir::Error),
}

/// A selected file under the feature directory
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeatureFile {
    pub path: PathBuf,
    /// Path relative to the feature directory, `/`-separated
    pub relative_path: String,
}

/// A feature file that could not be used
#[derive(Debug, Error)]
pub enum FeatureFileError {
    #[error("{path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("{path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: FeatureParseError,
    },
}

/// List selected files, sorted by relative path
pub fn discover(root: &Path, rules: &DiscoveryRules) -> Result<Vec<FeatureFile>, DiscoveryError> {
    if !root.is_dir() {
        return Err(DiscoveryError::MissingDirectory(root.to_path_buf()));
    }

    let mut files = Vec::new();
    for entry in WalkDir::new(root)
        .follow_links(false)
        .sort_by(|a, b| a.file_name().cmp(b.file_name()))
    {
        let entry = entry?;
        if !entry.file_type().is_file() {
            continue;
        }
        let Ok(relative) = entry.path().strip_prefix(root) else {
            continue;
        };
        if !rules.is_selected(relative) {
            continue;
        }
        files.push(FeatureFile {
            path: entry.path().to_path_buf(),
            relative_path: to_slash(relative),
        });
    }

    files.sort_by(|a, b| a.relative_path.cmp(&b.relative_path));
    tracing::debug!(root = %root.display(), count = files.len(), "discovered feature files");
    Ok(files)
}

impl FeatureFile {
    pub fn load(&self) -> Result<Feature, FeatureFileError> {
        let source = fs::read_to_string(&self.path).map_err(|source| FeatureFileError::Read {
            path: self.relative_path.clone(),
            source,
        })?;
        parse_feature(&source).map_err(|source| FeatureFileError::Parse {
            path: self.relative_path.clone(),
            source,
        })
    }
}

fn to_slash(path: &Path) -> String {
    path.components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}
