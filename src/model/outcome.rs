//! Scenario outcomes and the aggregation rule shared by every container

use livedoc_results::ResultStatus;
use serde::{Deserialize, Serialize};

/// Outcome of a scenario, or the rolled-up outcome of a container
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    /// No matching test result
    NotRun,
    Passed,
    Failed,
    /// Ran without a verdict
    Pending,
}

impl Outcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            Outcome::NotRun => "not_run",
            Outcome::Passed => "passed",
            Outcome::Failed => "failed",
            Outcome::Pending => "pending",
        }
    }

    pub fn is_executed(&self) -> bool {
        !matches!(self, Outcome::NotRun)
    }

    pub fn is_successful(&self) -> bool {
        matches!(self, Outcome::Passed)
    }
}

impl From<ResultStatus> for Outcome {
    fn from(status: ResultStatus) -> Self {
        match status {
            ResultStatus::Passed => Outcome::Passed,
            ResultStatus::Failed => Outcome::Failed,
            ResultStatus::Inconclusive => Outcome::Pending,
            ResultStatus::Skipped => Outcome::NotRun,
        }
    }
}

/// Number of items per outcome
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutcomeCounts {
    pub passed: usize,
    pub failed: usize,
    pub pending: usize,
    pub not_run: usize,
}

impl OutcomeCounts {
    pub fn total(&self) -> usize {
        self.passed + self.failed + self.pending + self.not_run
    }

    pub fn merge(&mut self, other: &OutcomeCounts) {
        self.passed += other.passed;
        self.failed += other.failed;
        self.pending += other.pending;
        self.not_run += other.not_run;
    }
}

/// Rolls item outcomes up into one container outcome.
///
/// Failed wins over everything, then Pending, then Passed. `NotRun` items
/// never decide the outcome; a container where nothing ran is `NotRun`.
/// Used for a scenario's matched results, a feature's scenarios and the
/// whole build.
#[derive(Debug, Clone, Default)]
pub struct OutcomeAggregator {
    counts: OutcomeCounts,
}

impl OutcomeAggregator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, outcome: Outcome) {
        match outcome {
            Outcome::Passed => self.counts.passed += 1,
            Outcome::Failed => self.counts.failed += 1,
            Outcome::Pending => self.counts.pending += 1,
            Outcome::NotRun => self.counts.not_run += 1,
        }
    }

    pub fn outcome(&self) -> Outcome {
        if self.counts.failed > 0 {
            Outcome::Failed
        } else if self.counts.pending > 0 {
            Outcome::Pending
        } else if self.counts.passed > 0 {
            Outcome::Passed
        } else {
            Outcome::NotRun
        }
    }

    /// True when at least one item was added and none is `NotRun`
    pub fn fully_executed(&self) -> bool {
        self.counts.total() > 0 && self.counts.not_run == 0
    }

    pub fn counts(&self) -> OutcomeCounts {
        self.counts
    }
}

impl FromIterator<Outcome> for OutcomeAggregator {
    fn from_iter<I: IntoIterator<Item = Outcome>>(iter: I) -> Self {
        let mut agg = OutcomeAggregator::new();
        for outcome in iter {
            agg.add(outcome);
        }
        agg
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_outcome_serialization() {
        assert_eq!(serde_json::to_string(&Outcome::NotRun).unwrap(), r#""not_run""#);
        assert_eq!(serde_json::to_string(&Outcome::Passed).unwrap(), r#""passed""#);
        assert_eq!(serde_json::to_string(&Outcome::Pending).unwrap(), r#""pending""#);
    }

    #[test]
    fn test_status_mapping() {
        assert_eq!(Outcome::from(ResultStatus::Passed), Outcome::Passed);
        assert_eq!(Outcome::from(ResultStatus::Failed), Outcome::Failed);
        assert_eq!(Outcome::from(ResultStatus::Inconclusive), Outcome::Pending);
        assert_eq!(Outcome::from(ResultStatus::Skipped), Outcome::NotRun);
    }

    #[test]
    fn test_aggregator_empty_is_not_run() {
        let agg = OutcomeAggregator::new();
        assert_eq!(agg.outcome(), Outcome::NotRun);
        assert!(!agg.fully_executed());
    }

    #[test]
    fn test_aggregator_failed_wins() {
        let agg: OutcomeAggregator = [Outcome::Passed, Outcome::Pending, Outcome::Failed, Outcome::NotRun]
            .into_iter()
            .collect();
        assert_eq!(agg.outcome(), Outcome::Failed);
    }

    #[test]
    fn test_aggregator_pending_over_passed() {
        let agg: OutcomeAggregator = [Outcome::Passed, Outcome::Pending].into_iter().collect();
        assert_eq!(agg.outcome(), Outcome::Pending);
    }

    #[test]
    fn test_aggregator_not_run_ignored_but_tracked() {
        let agg: OutcomeAggregator = [Outcome::Passed, Outcome::NotRun].into_iter().collect();
        assert_eq!(agg.outcome(), Outcome::Passed);
        assert!(!agg.fully_executed());
        assert_eq!(agg.counts().not_run, 1);
        assert_eq!(agg.counts().total(), 2);
    }

    #[test]
    fn test_aggregator_all_not_run() {
        let agg: OutcomeAggregator = [Outcome::NotRun, Outcome::NotRun].into_iter().collect();
        assert_eq!(agg.outcome(), Outcome::NotRun);
        assert!(!agg.outcome().is_successful());
        assert!(!agg.outcome().is_executed());
    }

    #[test]
    fn test_counts_merge() {
        let mut a = OutcomeCounts { passed: 1, failed: 0, pending: 2, not_run: 0 };
        a.merge(&OutcomeCounts { passed: 1, failed: 1, pending: 0, not_run: 3 });
        assert_eq!(a, OutcomeCounts { passed: 2, failed: 1, pending: 2, not_run: 3 });
    }
}
