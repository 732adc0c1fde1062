//! Feature object model
//!
//! Plain data parsed from feature files. The tag filter prunes it, the
//! correlator turns it into an [`AnnotatedFeature`], renderers read that.

mod annotated;
mod feature;
mod outcome;

pub use annotated::{AnnotatedFeature, AnnotatedScenario, FeatureResult};
pub use feature::{
    Background, DocString, Examples, Feature, Scenario, ScenarioKind, Step, StepKeyword, Table,
    Tag,
};
pub use outcome::{Outcome, OutcomeAggregator, OutcomeCounts};
