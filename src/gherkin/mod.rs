//! Gherkin feature file parsing (English keywords)

mod error;
mod parser;

pub use error::{FeatureParseError, ParseErrorKind};
pub use parser::parse_feature;
