//! Features, scenarios, steps and tags

use std::fmt;

use serde::{Serialize, Serializer};

/// A label on a feature or scenario.
///
/// Always stored with its `@` marker; comparison ignores case.
#[derive(Debug, Clone, Eq)]
pub struct Tag(String);

impl Tag {
    /// Create a tag, adding the `@` marker when missing
    pub fn new(raw: &str) -> Self {
        let raw = raw.trim();
        if raw.starts_with('@') {
            Tag(raw.to_string())
        } else {
            Tag(format!("@{}", raw))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Name without the marker
    pub fn name(&self) -> &str {
        &self.0[1..]
    }

    /// Case-insensitive over all of Unicode, not only ASCII
    pub fn matches(&self, other: &Tag) -> bool {
        self.0 == other.0 || self.0.to_lowercase() == other.0.to_lowercase()
    }
}

impl PartialEq for Tag {
    fn eq(&self, other: &Self) -> bool {
        self.matches(other)
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Serialize for Tag {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0)
    }
}

/// Step keyword, in its semantic role
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum StepKeyword {
    Given,
    When,
    Then,
    And,
    But,
    /// `*` bullet step
    Star,
}

impl StepKeyword {
    pub fn as_str(&self) -> &'static str {
        match self {
            StepKeyword::Given => "Given",
            StepKeyword::When => "When",
            StepKeyword::Then => "Then",
            StepKeyword::And => "And",
            StepKeyword::But => "But",
            StepKeyword::Star => "*",
        }
    }
}

/// Data table attached to a step or an `Examples` block
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct Table {
    pub header_row: Vec<String>,
    pub data_rows: Vec<Vec<String>>,
}

impl Table {
    pub fn width(&self) -> usize {
        self.header_row.len()
    }
}

/// Multi-line string argument of a step
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct DocString {
    /// Optional media type after the opening delimiter
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content_type: Option<String>,
    pub content: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct Step {
    pub keyword: StepKeyword,
    /// Keyword exactly as written in the source
    pub native_keyword: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub table_argument: Option<Table>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub doc_string_argument: Option<DocString>,
    #[serde(skip)]
    pub line: usize,
}

/// `Examples:` block of a scenario outline
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct Examples {
    pub name: String,
    pub description: String,
    pub tags: Vec<Tag>,
    pub table_argument: Table,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ScenarioKind {
    Scenario,
    ScenarioOutline,
}

/// One feature element: a scenario or scenario outline
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Scenario {
    pub kind: ScenarioKind,
    pub name: String,
    pub description: String,
    pub tags: Vec<Tag>,
    pub steps: Vec<Step>,
    pub examples: Vec<Examples>,
    /// Name of the enclosing `Rule:`, if any
    pub rule: Option<String>,
    pub line: usize,
}

impl Scenario {
    pub fn new(kind: ScenarioKind, name: &str, line: usize) -> Self {
        Self {
            kind,
            name: name.to_string(),
            description: String::new(),
            tags: Vec::new(),
            steps: Vec::new(),
            examples: Vec::new(),
            rule: None,
            line,
        }
    }

    pub fn has_tag(&self, tag: &Tag) -> bool {
        self.tags.iter().any(|t| t.matches(tag))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct Background {
    pub name: String,
    pub description: String,
    pub steps: Vec<Step>,
}

/// A parsed feature file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Feature {
    pub name: String,
    pub description: String,
    pub tags: Vec<Tag>,
    pub background: Option<Background>,
    pub elements: Vec<Scenario>,
    pub line: usize,
}

impl Feature {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            description: String::new(),
            tags: Vec::new(),
            background: None,
            elements: Vec::new(),
            line: 1,
        }
    }

    pub fn has_tag(&self, tag: &Tag) -> bool {
        self.tags.iter().any(|t| t.matches(tag))
    }
}
