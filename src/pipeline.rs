//! Documentation build pipeline
//!
//! discover → parse → filter → correlate → render, then summary.json.
//! Configuration problems abort before anything is written. Unreadable
//! reports and feature files degrade to warnings: the documentation is
//! still produced, marked unverified when results are missing.

use std::fs;
use std::io;
use std::path::PathBuf;
use std::time::Instant;

use livedoc_results::{parse_report, TestResult};
use thiserror::Error;
use ulid::Ulid;

use crate::config::{BuildConfig, ConfigError};
use crate::correlate::Correlator;
use crate::discovery::{discover, DiscoveryError};
use crate::filter::FilterDecision;
use crate::render::{Documentation, DocumentedFeature, RenderError};
use crate::summary::{BuildSummary, BuildWarning, FeatureTally, SUMMARY_FILE};

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("discovery error: {0}")]
    Discovery(#[from] DiscoveryError),

    #[error("render error: {0}")]
    Render(#[from] RenderError),

    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}

impl PipelineError {
    /// Process exit code for this error
    pub fn exit_code(&self) -> i32 {
        match self {
            PipelineError::Config(_) => 10,
            PipelineError::Discovery(_) => 20,
            PipelineError::Render(_) => 40,
            PipelineError::Io(_) => 50,
        }
    }
}

pub type PipelineResult<T> = Result<T, PipelineError>;

/// Results of every configured report, plus what could not be read
#[derive(Debug, Default)]
pub struct LoadedResults {
    pub results: Vec<TestResult>,
    pub warnings: Vec<BuildWarning>,
}

/// Features ready to render
#[derive(Debug)]
pub struct Correlated {
    pub features: Vec<DocumentedFeature>,
    pub tally: FeatureTally,
    pub warnings: Vec<BuildWarning>,
}

/// What a successful build wrote
#[derive(Debug)]
pub struct BuildOutput {
    pub summary: BuildSummary,
    pub documentation_path: PathBuf,
    pub summary_path: PathBuf,
}

pub struct Pipeline {
    config: BuildConfig,
}

impl Pipeline {
    pub fn new(config: BuildConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &BuildConfig {
        &self.config
    }

    /// Read and parse every configured report. Failures become warnings.
    pub fn load_results(&self) -> LoadedResults {
        let mut loaded = LoadedResults::default();
        let format = self.config.results_format;

        for path in &self.config.result_files {
            let shown = path.display().to_string();
            let parsed = fs::read(path)
                .map_err(|e| e.to_string())
                .and_then(|raw| parse_report(format, &raw).map_err(|e| e.to_string()));

            match parsed {
                Ok(results) => {
                    tracing::info!(path = %shown, %format, count = results.len(), "loaded test results");
                    loaded.results.extend(results);
                }
                Err(message) => {
                    tracing::warn!(path = %shown, %format, error = %message, "test results unreadable");
                    loaded.warnings.push(BuildWarning::ReportUnreadable {
                        path: shown,
                        message,
                    });
                }
            }
        }
        loaded
    }

    /// Discover, parse, filter and correlate every feature
    pub fn correlate(&self, results: &[TestResult]) -> PipelineResult<Correlated> {
        let files = discover(&self.config.feature_directory, &self.config.discovery)?;
        let correlator = Correlator::new(results);

        let mut tally = FeatureTally {
            discovered: files.len(),
            ..Default::default()
        };
        let mut warnings = Vec::new();
        let mut features = Vec::new();

        for file in files {
            let feature = match file.load() {
                Ok(feature) => feature,
                Err(e) => {
                    tracing::warn!(error = %e, "skipping feature file");
                    tally.unparseable += 1;
                    warnings.push(BuildWarning::FeatureUnparseable {
                        path: file.relative_path.clone(),
                        message: e.to_string(),
                    });
                    continue;
                }
            };

            let name = feature.name.clone();
            match self.config.filter.apply(feature) {
                FilterDecision::Included(feature) => features.push(DocumentedFeature {
                    relative_path: file.relative_path,
                    feature: correlator.correlate(feature),
                }),
                FilterDecision::Excluded(reason) => {
                    tracing::debug!(feature = %name, reason = reason.as_str(), "feature excluded");
                    tally.excluded += 1;
                }
            }
        }

        let unmatched = features
            .iter()
            .flat_map(|f| &f.feature.scenarios)
            .filter(|s| s.matched_results == 0)
            .count();
        if unmatched > 0 && !self.config.result_files.is_empty() {
            warnings.push(BuildWarning::UnmatchedScenarios { count: unmatched });
        }

        Ok(Correlated {
            features,
            tally,
            warnings,
        })
    }

    /// Run the whole build and write the documentation and summary.json
    pub fn run(&self) -> PipelineResult<BuildOutput> {
        let started = Instant::now();
        let build_id = Ulid::new().to_string();
        tracing::info!(%build_id, features = %self.config.feature_directory.display(), "starting build");

        let loaded = self.load_results();
        let correlated = self.correlate(&loaded.results)?;

        let mut warnings = loaded.warnings;
        warnings.extend(correlated.warnings);
        let verified = !warnings.iter().any(BuildWarning::unverifies);

        let documentation = Documentation {
            project_name: self.config.project_name.clone(),
            project_version: self.config.project_version.clone(),
            features: correlated.features,
            verified,
            warnings: warnings.iter().map(ToString::to_string).collect(),
        };

        let renderer = self.config.documentation_format.renderer();
        let documentation_path = renderer.write(&documentation, &self.config.output_directory)?;

        let summary = BuildSummary::from_features(
            build_id,
            &documentation.features,
            correlated.tally,
            loaded.results.len(),
            warnings,
            started.elapsed().as_millis() as u64,
        );
        let summary_path = self.config.output_directory.join(SUMMARY_FILE);
        summary.write_to_file(&summary_path)?;
        tracing::info!(status = summary.status.as_str(), "{}", summary.human_summary);

        Ok(BuildOutput {
            summary,
            documentation_path,
            summary_path,
        })
    }
}
