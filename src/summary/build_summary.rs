//! Build summary (summary.json)

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::Path;

use super::warning::BuildWarning;
use crate::model::{Outcome, OutcomeAggregator, OutcomeCounts};
use crate::render::DocumentedFeature;

/// Schema version for summary.json
pub const SUMMARY_SCHEMA_VERSION: u32 = 1;

/// Schema identifier for summary.json
pub const SUMMARY_SCHEMA_ID: &str = "livedoc/build_summary@1";

/// File name inside the output directory
pub const SUMMARY_FILE: &str = "summary.json";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BuildSummary {
    pub schema_version: u32,

    pub schema_id: String,

    /// Build identifier (ULID)
    pub build_id: String,

    pub created_at: DateTime<Utc>,

    /// Aggregate outcome over every included feature
    pub status: Outcome,

    /// Feature files selected by discovery
    pub features_discovered: usize,

    pub features_included: usize,

    /// Dropped by the tag filter
    pub features_excluded: usize,

    /// Skipped because they could not be read or parsed
    pub features_unparseable: usize,

    /// Included scenarios by outcome
    pub scenarios: OutcomeCounts,

    /// Test results loaded across all reports
    pub results_loaded: usize,

    /// False when any report could not be read
    pub verified: bool,

    pub warnings: Vec<BuildWarning>,

    pub duration_ms: u64,

    pub human_summary: String,
}

/// Feature counts gathered while building
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FeatureTally {
    pub discovered: usize,
    pub excluded: usize,
    pub unparseable: usize,
}

impl BuildSummary {
    pub fn from_features(
        build_id: String,
        features: &[DocumentedFeature],
        tally: FeatureTally,
        results_loaded: usize,
        warnings: Vec<BuildWarning>,
        duration_ms: u64,
    ) -> Self {
        let aggregator: OutcomeAggregator =
            features.iter().map(|f| f.feature.result.outcome).collect();
        let mut scenarios = OutcomeCounts::default();
        for documented in features {
            scenarios.merge(&documented.feature.result.counts);
        }

        let status = aggregator.outcome();
        let verified = !warnings.iter().any(BuildWarning::unverifies);
        let human_summary = Self::generate_human_summary(status, features.len(), &scenarios, verified);

        Self {
            schema_version: SUMMARY_SCHEMA_VERSION,
            schema_id: SUMMARY_SCHEMA_ID.to_string(),
            build_id,
            created_at: Utc::now(),
            status,
            features_discovered: tally.discovered,
            features_included: features.len(),
            features_excluded: tally.excluded,
            features_unparseable: tally.unparseable,
            scenarios,
            results_loaded,
            verified,
            warnings,
            duration_ms,
            human_summary,
        }
    }

    fn generate_human_summary(
        status: Outcome,
        feature_count: usize,
        scenarios: &OutcomeCounts,
        verified: bool,
    ) -> String {
        let counts = format!(
            "{} feature(s), {} scenario(s): {} passed, {} failed, {} pending, {} not run",
            feature_count,
            scenarios.total(),
            scenarios.passed,
            scenarios.failed,
            scenarios.pending,
            scenarios.not_run
        );
        let head = match status {
            Outcome::Passed => "Documentation built, all executed scenarios passed",
            Outcome::Failed => "Documentation built with failing scenarios",
            Outcome::Pending => "Documentation built with pending scenarios",
            Outcome::NotRun => "Documentation built, no scenario was executed",
        };
        if verified {
            format!("{}: {}", head, counts)
        } else {
            format!("{} (unverified): {}", head, counts)
        }
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub fn write_to_file(&self, path: &Path) -> io::Result<()> {
        let json = self.to_json().map_err(|e| {
            io::Error::new(io::ErrorKind::InvalidData, format!("JSON error: {}", e))
        })?;
        fs::write(path, json)
    }

    pub fn from_file(path: &Path) -> io::Result<Self> {
        let json = fs::read_to_string(path)?;
        Self::from_json(&json).map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))
    }
}
