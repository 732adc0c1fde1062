//! Test result correlation
//!
//! Maps normalized test results back onto the scenarios they executed.
//! Adapters already reduced every result name to its comparable core, so
//! matching here is an exact comparison of normalized keys. A scenario
//! outline expands into one result per example row; all of them roll up into
//! the outline's single outcome.

use std::collections::HashMap;

use livedoc_results::name::normalize_name;
use livedoc_results::TestResult;

use crate::model::{AnnotatedFeature, AnnotatedScenario, Feature, Outcome, OutcomeAggregator, Scenario};

/// Read-only index over one build's test results
#[derive(Debug, Default)]
pub struct Correlator<'a> {
    by_scenario: HashMap<&'a str, Vec<&'a TestResult>>,
    total: usize,
}

impl<'a> Correlator<'a> {
    pub fn new(results: &'a [TestResult]) -> Self {
        let mut by_scenario: HashMap<&str, Vec<&TestResult>> = HashMap::new();
        for result in results {
            by_scenario
                .entry(result.name.scenario.as_str())
                .or_default()
                .push(result);
        }
        Self {
            by_scenario,
            total: results.len(),
        }
    }

    pub fn result_count(&self) -> usize {
        self.total
    }

    /// Attach an outcome to every scenario of `feature`. Never fails; with
    /// no results every scenario is `NotRun`.
    pub fn correlate(&self, feature: Feature) -> AnnotatedFeature {
        let feature_key = normalize_name(&feature.name);
        let mut feature = feature;
        let scenarios: Vec<AnnotatedScenario> = std::mem::take(&mut feature.elements)
            .into_iter()
            .map(|scenario| self.annotate(&feature_key, scenario))
            .collect();

        let annotated = AnnotatedFeature::assemble(feature, scenarios);
        tracing::debug!(
            feature = %annotated.name,
            outcome = annotated.result.outcome.as_str(),
            not_run = annotated.result.counts.not_run,
            "correlated feature"
        );
        annotated
    }

    fn annotate(&self, feature_key: &str, scenario: Scenario) -> AnnotatedScenario {
        let matches = self.matches(feature_key, &scenario);
        let outcome = if matches.is_empty() {
            tracing::debug!(scenario = %scenario.name, "no matching test result");
            Outcome::NotRun
        } else {
            matches
                .iter()
                .map(|r| Outcome::from(r.status))
                .collect::<OutcomeAggregator>()
                .outcome()
        };

        AnnotatedScenario {
            matched_results: matches.len(),
            scenario,
            outcome,
        }
    }

    fn matches(&self, feature_key: &str, scenario: &Scenario) -> Vec<&'a TestResult> {
        let mut keys = vec![normalize_name(&scenario.name)];
        if let Some(rule) = &scenario.rule {
            let ruled = normalize_name(&format!("{} {}", rule, scenario.name));
            if ruled != keys[0] {
                keys.push(ruled);
            }
        }

        keys.iter()
            .filter_map(|key| self.by_scenario.get(key.as_str()))
            .flatten()
            .copied()
            .filter(|r| r.name.feature.as_deref().map_or(true, |f| f == feature_key))
            .collect()
    }
}
