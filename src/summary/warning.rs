//! Non-fatal problems surfaced with the build output

use std::fmt;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum BuildWarning {
    /// A test results report could not be read or parsed; its results were dropped
    ReportUnreadable { path: String, message: String },

    /// A feature file could not be read or parsed and was skipped
    FeatureUnparseable { path: String, message: String },

    /// Scenarios without any matching test result
    UnmatchedScenarios { count: usize },
}

impl BuildWarning {
    /// Whether this warning makes the documented outcomes untrustworthy
    pub fn unverifies(&self) -> bool {
        matches!(self, BuildWarning::ReportUnreadable { .. })
    }
}

impl fmt::Display for BuildWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BuildWarning::ReportUnreadable { path, message } => {
                write!(f, "test results {} unreadable: {}", path, message)
            }
            BuildWarning::FeatureUnparseable { path, message } => {
                write!(f, "feature file {} skipped: {}", path, message)
            }
            BuildWarning::UnmatchedScenarios { count } => {
                write!(f, "{} scenario(s) have no matching test result", count)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serialization() {
        let warning = BuildWarning::UnmatchedScenarios { count: 2 };
        assert_eq!(
            serde_json::to_string(&warning).unwrap(),
            r#"{"kind":"unmatched_scenarios","count":2}"#
        );
    }

    #[test]
    fn test_only_report_failures_unverify() {
        assert!(BuildWarning::ReportUnreadable {
            path: "r.trx".into(),
            message: "empty report".into()
        }
        .unverifies());
        assert!(!BuildWarning::UnmatchedScenarios { count: 1 }.unverifies());
    }
}
