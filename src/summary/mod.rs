//! Build summary and warnings (summary.json)

mod build_summary;
mod warning;

pub use build_summary::{
    BuildSummary, FeatureTally, SUMMARY_FILE, SUMMARY_SCHEMA_ID, SUMMARY_SCHEMA_VERSION,
};
pub use warning::BuildWarning;
