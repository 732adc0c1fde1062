//! The single capability shared by all report dialects.

use crate::error::ReportParseError;
use crate::format::TestResultsFormat;
use crate::result::TestResult;

/// Turns raw report bytes into normalized test results.
///
/// Implementations hold no state between calls and never touch the
/// filesystem. Adding a report dialect means adding an implementation and a
/// [`TestResultsFormat`] variant; nothing downstream changes.
pub trait ReportAdapter: Send + Sync {
    /// The format identifier this adapter was selected for.
    fn format(&self) -> TestResultsFormat;

    /// Parse one report.
    fn parse(&self, raw: &[u8]) -> Result<Vec<TestResult>, ReportParseError>;
}
