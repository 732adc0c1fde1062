//! Documentation renderers

mod json;
mod markdown;

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::model::AnnotatedFeature;

pub use json::JsonRenderer;
pub use markdown::MarkdownRenderer;

static JSON: JsonRenderer = JsonRenderer;
static MARKDOWN: MarkdownRenderer = MarkdownRenderer;

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("failed to write {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Output format of the documentation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DocumentationFormat {
    Json,
    Markdown,
}

impl DocumentationFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            DocumentationFormat::Json => "json",
            DocumentationFormat::Markdown => "markdown",
        }
    }

    pub fn renderer(&self) -> &'static dyn Renderer {
        match self {
            DocumentationFormat::Json => &JSON,
            DocumentationFormat::Markdown => &MARKDOWN,
        }
    }
}

impl FromStr for DocumentationFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "json" => Ok(DocumentationFormat::Json),
            "markdown" | "md" => Ok(DocumentationFormat::Markdown),
            other => Err(other.to_string()),
        }
    }
}

impl fmt::Display for DocumentationFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An included feature with the file it came from
#[derive(Debug, Clone)]
pub struct DocumentedFeature {
    /// Path relative to the feature directory
    pub relative_path: String,
    pub feature: AnnotatedFeature,
}

/// Everything a renderer sees
#[derive(Debug, Clone, Default)]
pub struct Documentation {
    pub project_name: Option<String>,
    pub project_version: Option<String>,
    /// Included features, in discovery order
    pub features: Vec<DocumentedFeature>,
    /// False when a test results report could not be read
    pub verified: bool,
    pub warnings: Vec<String>,
}

pub trait Renderer: Send + Sync {
    fn format(&self) -> DocumentationFormat;

    /// File name inside the output directory
    fn file_name(&self) -> &'static str;

    fn render(&self, doc: &Documentation) -> Result<String, RenderError>;

    /// Render into `output_dir`, creating it if needed. Returns the file written.
    fn write(&self, doc: &Documentation, output_dir: &Path) -> Result<PathBuf, RenderError> {
        fs::create_dir_all(output_dir).map_err(|source| RenderError::Io {
            path: output_dir.to_path_buf(),
            source,
        })?;
        let path = output_dir.join(self.file_name());
        let content = self.render(doc)?;
        fs::write(&path, content).map_err(|source| RenderError::Io {
            path: path.clone(),
            source,
        })?;
        tracing::info!(path = %path.display(), format = %self.format(), "wrote documentation");
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_parse() {
        assert_eq!("JSON".parse::<DocumentationFormat>().unwrap(), DocumentationFormat::Json);
        assert_eq!("md".parse::<DocumentationFormat>().unwrap(), DocumentationFormat::Markdown);
        assert_eq!("word".parse::<DocumentationFormat>().unwrap_err(), "word");
    }

    #[test]
    fn test_renderer_selection() {
        assert_eq!(DocumentationFormat::Json.renderer().file_name(), "features.json");
        assert_eq!(DocumentationFormat::Markdown.renderer().file_name(), "features.md");
        assert_eq!(
            DocumentationFormat::Markdown.renderer().format(),
            DocumentationFormat::Markdown
        );
    }
}
