//! Cucumber JSON reports
//!
//! The report mirrors the feature files: features hold `elements`
//! (backgrounds and scenarios), elements hold steps, and each step carries
//! its own result. A scenario's status is folded from its steps and hooks.

use serde::Deserialize;

use crate::adapter::ReportAdapter;
use crate::error::ReportParseError;
use crate::format::TestResultsFormat;
use crate::result::{ResultStatus, TestCaseName, TestResult};
use crate::xml::decode;

/// Adapter for the Cucumber JSON formatter output
#[derive(Debug, Clone, Copy, Default)]
pub struct CucumberJsonAdapter;

impl ReportAdapter for CucumberJsonAdapter {
    fn format(&self) -> TestResultsFormat {
        TestResultsFormat::CucumberJson
    }

    fn parse(&self, raw: &[u8]) -> Result<Vec<TestResult>, ReportParseError> {
        let text = decode(raw)?;
        let features: Vec<JsonFeature> = serde_json::from_str(text)?;

        let mut results = Vec::new();
        for feature in &features {
            for element in &feature.elements {
                if element.kind.as_deref() == Some("background") {
                    continue;
                }
                results.push(element.to_result(&feature.name));
            }
        }
        Ok(results)
    }
}

#[derive(Debug, Deserialize)]
struct JsonFeature {
    #[serde(default)]
    name: String,
    #[serde(default)]
    elements: Vec<JsonElement>,
}

#[derive(Debug, Deserialize)]
struct JsonElement {
    #[serde(default)]
    name: String,
    #[serde(default, rename = "type")]
    kind: Option<String>,
    #[serde(default)]
    before: Vec<JsonHook>,
    #[serde(default)]
    steps: Vec<JsonStep>,
    #[serde(default)]
    after: Vec<JsonHook>,
}

#[derive(Debug, Deserialize)]
struct JsonStep {
    #[serde(default)]
    result: Option<JsonRunResult>,
}

#[derive(Debug, Deserialize)]
struct JsonHook {
    #[serde(default)]
    result: Option<JsonRunResult>,
}

#[derive(Debug, Deserialize)]
struct JsonRunResult {
    #[serde(default)]
    status: String,
    /// Nanoseconds
    #[serde(default)]
    duration: Option<f64>,
    #[serde(default)]
    error_message: Option<String>,
}

impl JsonElement {
    fn run_results(&self) -> impl Iterator<Item = &JsonRunResult> {
        self.before
            .iter()
            .filter_map(|h| h.result.as_ref())
            .chain(self.steps.iter().filter_map(|s| s.result.as_ref()))
            .chain(self.after.iter().filter_map(|h| h.result.as_ref()))
    }

    fn to_result(&self, feature: &str) -> TestResult {
        let mut failed = false;
        let mut pending = false;
        let mut passed = 0usize;
        let mut skipped = 0usize;
        let mut nanos = 0f64;
        let mut timed = false;
        let mut error = None;

        for result in self.run_results() {
            match result.status.to_ascii_lowercase().as_str() {
                "passed" => passed += 1,
                "failed" | "ambiguous" => {
                    failed = true;
                    if error.is_none() {
                        error = result.error_message.clone();
                    }
                }
                "pending" | "undefined" => pending = true,
                _ => skipped += 1,
            }
            if let Some(d) = result.duration {
                nanos += d;
                timed = true;
            }
        }

        let status = if failed {
            ResultStatus::Failed
        } else if pending {
            ResultStatus::Inconclusive
        } else if passed == 0 && skipped > 0 {
            ResultStatus::Skipped
        } else if passed == 0 {
            ResultStatus::Inconclusive
        } else {
            ResultStatus::Passed
        };

        let duration_ms = if timed && nanos.is_finite() && nanos >= 0.0 {
            Some((nanos / 1_000_000.0).round() as u64)
        } else {
            None
        };

        TestResult::new(TestCaseName::new(Some(feature), &self.name), status)
            .with_duration_ms(duration_ms)
            .with_error(error)
    }
}
