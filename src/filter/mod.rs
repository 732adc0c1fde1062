//! Tag-based scenario filter
//!
//! Decides per feature and per scenario what ends up in the documentation.
//! Evaluation order:
//!
//! 1. feature tagged with the exclude tag: excluded
//! 2. every scenario tagged with the exclude tag: excluded
//! 3. candidates are all scenarios when there is no include-only tag or the
//!    feature itself carries it, otherwise only scenarios carrying it
//! 4. no candidates: excluded
//! 5. excluded-tagged scenarios are dropped from the candidates
//!
//! A feature never comes out with zero scenarios.

mod expression;

use serde::Serialize;

use crate::model::Feature;

pub use expression::{TagExpression, TagExpressionError};

/// Why a whole feature was dropped
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ExclusionReason {
    /// The feature carries the exclude tag
    FeatureTagged,
    /// Every scenario carries the exclude tag
    AllScenariosExcluded,
    /// Nothing matched the include-only tag, or nothing survived exclusion
    NoCandidates,
}

impl ExclusionReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            ExclusionReason::FeatureTagged => "feature carries the exclude tag",
            ExclusionReason::AllScenariosExcluded => "every scenario carries the exclude tag",
            ExclusionReason::NoCandidates => "no scenario selected",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FilterDecision {
    /// Pruned feature, scenarios in original order
    Included(Feature),
    Excluded(ExclusionReason),
}

impl FilterDecision {
    pub fn into_included(self) -> Option<Feature> {
        match self {
            FilterDecision::Included(feature) => Some(feature),
            FilterDecision::Excluded(_) => None,
        }
    }
}

/// Exclude / include-only filter, built once per build
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TagFilter {
    exclude: Option<TagExpression>,
    include_only: Option<TagExpression>,
}

impl TagFilter {
    pub fn new(exclude: Option<TagExpression>, include_only: Option<TagExpression>) -> Self {
        Self {
            exclude,
            include_only,
        }
    }

    /// Build from raw user input; blank strings mean "no restriction"
    pub fn parse(exclude: &str, include_only: &str) -> Result<Self, TagExpressionError> {
        Ok(Self::new(
            TagExpression::parse(exclude)?,
            TagExpression::parse(include_only)?,
        ))
    }

    pub fn exclude(&self) -> Option<&TagExpression> {
        self.exclude.as_ref()
    }

    pub fn include_only(&self) -> Option<&TagExpression> {
        self.include_only.as_ref()
    }

    /// Apply the filter, consuming the feature
    pub fn apply(&self, mut feature: Feature) -> FilterDecision {
        if let Some(exclude) = &self.exclude {
            if exclude.matches_any(&feature.tags) {
                return FilterDecision::Excluded(ExclusionReason::FeatureTagged);
            }
            if !feature.elements.is_empty()
                && feature.elements.iter().all(|s| exclude.matches_any(&s.tags))
            {
                return FilterDecision::Excluded(ExclusionReason::AllScenariosExcluded);
            }
        }

        // A feature-level include tag selects all of its scenarios
        let restrict = self
            .include_only
            .as_ref()
            .filter(|include| !include.matches_any(&feature.tags));

        let candidates: Vec<_> = std::mem::take(&mut feature.elements)
            .into_iter()
            .filter(|s| restrict.map_or(true, |include| include.matches_any(&s.tags)))
            .collect();
        if candidates.is_empty() {
            return FilterDecision::Excluded(ExclusionReason::NoCandidates);
        }

        feature.elements = candidates
            .into_iter()
            .filter(|s| !self.exclude.as_ref().map_or(false, |e| e.matches_any(&s.tags)))
            .collect();
        if feature.elements.is_empty() {
            return FilterDecision::Excluded(ExclusionReason::NoCandidates);
        }

        FilterDecision::Included(feature)
    }
}
