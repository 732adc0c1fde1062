//! Features after correlation
//!
//! Only the correlator builds these, so every scenario carries exactly one
//! outcome and the feature's result is always derived from them.

use serde::{Deserialize, Serialize};

use super::feature::{Background, Feature, Scenario, Tag};
use super::outcome::{Outcome, OutcomeAggregator, OutcomeCounts};

/// A scenario with its correlated outcome
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnnotatedScenario {
    pub scenario: Scenario,
    pub outcome: Outcome,
    /// Number of test results that matched this scenario
    pub matched_results: usize,
}

/// Rolled-up result of a feature
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeatureResult {
    pub outcome: Outcome,
    /// False when any scenario is `NotRun`
    pub fully_executed: bool,
    pub counts: OutcomeCounts,
}

impl FeatureResult {
    pub fn from_aggregator(agg: &OutcomeAggregator) -> Self {
        Self {
            outcome: agg.outcome(),
            fully_executed: agg.fully_executed(),
            counts: agg.counts(),
        }
    }

    pub fn was_executed(&self) -> bool {
        self.outcome.is_executed()
    }

    pub fn was_successful(&self) -> bool {
        self.outcome.is_successful()
    }
}

/// A feature whose scenarios all carry an outcome
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnnotatedFeature {
    pub name: String,
    pub description: String,
    pub tags: Vec<Tag>,
    pub background: Option<Background>,
    pub scenarios: Vec<AnnotatedScenario>,
    pub result: FeatureResult,
    pub line: usize,
}

impl AnnotatedFeature {
    pub(crate) fn assemble(feature: Feature, scenarios: Vec<AnnotatedScenario>) -> Self {
        let agg: OutcomeAggregator = scenarios.iter().map(|s| s.outcome).collect();
        Self {
            name: feature.name,
            description: feature.description,
            tags: feature.tags,
            background: feature.background,
            scenarios,
            result: FeatureResult::from_aggregator(&agg),
            line: feature.line,
        }
    }

    pub fn not_run_count(&self) -> usize {
        self.result.counts.not_run
    }
}
