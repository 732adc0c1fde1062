//! livedoc - living documentation from Gherkin feature files
//!
//! Feature files are discovered and parsed, trimmed by a tag filter,
//! annotated with the outcomes found in test-runner reports, and rendered
//! as JSON or Markdown documentation alongside a machine-readable
//! `summary.json`.

pub mod config;
pub mod correlate;
pub mod discovery;
pub mod filter;
pub mod gherkin;
pub mod logging;
pub mod model;
pub mod pipeline;
pub mod render;
pub mod summary;

pub use config::{BuildConfig, ConfigError, EffectiveConfig};
pub use correlate::Correlator;
pub use filter::{ExclusionReason, FilterDecision, TagExpression, TagFilter};
pub use gherkin::{parse_feature, FeatureParseError};
pub use model::{AnnotatedFeature, Feature, Outcome, Scenario, Tag};
pub use pipeline::{BuildOutput, Pipeline, PipelineError};
pub use render::{DocumentationFormat, Renderer};
pub use summary::{BuildSummary, BuildWarning};
