//! Error types for report parsing.

/// A report that does not conform to the dialect it was read as.
#[derive(Debug, thiserror::Error)]
pub enum ReportParseError {
    #[error("report is empty")]
    Empty,

    #[error("report is not valid UTF-8: {0}")]
    Encoding(#[from] std::str::Utf8Error),

    #[error("malformed XML at byte {position}: {message}")]
    Xml { position: u64, message: String },

    #[error("malformed JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("unexpected root element <{found}>, expected one of: {expected}")]
    UnexpectedRoot { found: String, expected: String },

    #[error("<{element}> is missing required attribute '{attribute}'")]
    MissingAttribute {
        element: &'static str,
        attribute: &'static str,
    },
}
