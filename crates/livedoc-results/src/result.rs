//! Normalized test result records

use serde::{Deserialize, Serialize};

use crate::name::normalize_name;

/// Outcome of one executed test case, as reported by the runner
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResultStatus {
    /// Test case passed
    Passed,
    /// Test case failed or errored
    Failed,
    /// Test case ran without a verdict (pending, undefined steps, inconclusive)
    Inconclusive,
    /// Test case was skipped, ignored or never executed
    Skipped,
}

impl ResultStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ResultStatus::Passed => "passed",
            ResultStatus::Failed => "failed",
            ResultStatus::Inconclusive => "inconclusive",
            ResultStatus::Skipped => "skipped",
        }
    }
}

/// Correlation key of a test case.
///
/// Both parts are stored normalized; construct through [`TestCaseName::new`]
/// so every adapter produces comparable keys.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TestCaseName {
    /// Containing feature (fixture, class, suite), when the format carries one
    #[serde(skip_serializing_if = "Option::is_none")]
    pub feature: Option<String>,

    /// Scenario name
    pub scenario: String,
}

impl TestCaseName {
    /// Build a normalized key. A blank feature qualifier is dropped.
    pub fn new(feature: Option<&str>, scenario: &str) -> Self {
        let feature = feature.map(normalize_name).filter(|f| !f.is_empty());
        Self {
            feature,
            scenario: normalize_name(scenario),
        }
    }

    /// `feature / scenario` for log output
    pub fn display(&self) -> String {
        match &self.feature {
            Some(feature) => format!("{} / {}", feature, self.scenario),
            None => self.scenario.clone(),
        }
    }
}

/// One executed test case
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TestResult {
    pub name: TestCaseName,

    pub status: ResultStatus,

    /// Wall-clock duration in milliseconds
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration_ms: Option<u64>,

    /// Failure message (truncated if long)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl TestResult {
    pub fn new(name: TestCaseName, status: ResultStatus) -> Self {
        Self {
            name,
            status,
            duration_ms: None,
            error: None,
        }
    }

    pub fn with_duration_ms(mut self, duration_ms: Option<u64>) -> Self {
        self.duration_ms = duration_ms;
        self
    }

    pub fn with_error(mut self, error: Option<String>) -> Self {
        self.error = error.map(|m| truncate_message(&m, crate::MAX_MESSAGE_LENGTH));
        self
    }
}

/// Convert fractional seconds (as most XML dialects report them) to milliseconds
pub(crate) fn seconds_to_ms(raw: &str) -> Option<u64> {
    let seconds: f64 = raw.trim().parse().ok()?;
    if seconds.is_finite() && seconds >= 0.0 {
        Some((seconds * 1000.0).round() as u64)
    } else {
        None
    }
}

fn truncate_message(message: &str, max_len: usize) -> String {
    let message = message.trim();
    if message.chars().count() <= max_len {
        message.to_string()
    } else {
        let truncated: String = message.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", truncated)
    }
}
