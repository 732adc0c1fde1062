use thiserror::Error;

/// Feature file parse error, with the 1-based line it was detected on
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("line {line}: {kind}")]
pub struct FeatureParseError {
    pub line: usize,
    pub kind: ParseErrorKind,
}

impl FeatureParseError {
    pub(crate) fn new(line: usize, kind: ParseErrorKind) -> Self {
        Self { line, kind }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseErrorKind {
    #[error("no `Feature:` header")]
    MissingFeature,

    #[error("second `Feature:` header in one file")]
    DuplicateFeature,

    #[error("more than one `Background:`")]
    DuplicateBackground,

    #[error("unsupported language `{0}` (only `en` is supported)")]
    UnsupportedLanguage(String),

    #[error("step outside a scenario or background")]
    StepOutsideScenario,

    #[error("`Examples:` outside a scenario")]
    ExamplesOutsideScenario,

    #[error("table row without a step or `Examples:` to attach to")]
    StrayTable,

    #[error("table row must start and end with `|`")]
    MalformedTableRow,

    #[error("table row has {found} cells, expected {expected}")]
    InconsistentCellCount { expected: usize, found: usize },

    #[error("doc string without a step to attach to")]
    StrayDocString,

    #[error("doc string is never closed")]
    UnterminatedDocString,

    #[error("tags must precede a feature, rule, scenario or examples block")]
    MisplacedTags,

    #[error("tag `{0}` must start with `@`")]
    InvalidTag(String),

    #[error("unexpected content: {0}")]
    UnexpectedContent(String),
}
