//! Test-runner report adapters
//!
//! Every supported test-runner report dialect is normalized into a flat
//! sequence of [`TestResult`]s whose [`TestCaseName`] is already reduced to
//! the comparable core name (see [`name`]). Adapters are pure: callers read
//! the report bytes and hand them over.

mod adapter;
mod cucumber;
mod error;
mod format;
mod junit;
mod mstest;
pub mod name;
mod nunit;
mod result;
mod xml;
mod xunit;

pub use adapter::ReportAdapter;
pub use cucumber::CucumberJsonAdapter;
pub use error::ReportParseError;
pub use format::{TestResultsFormat, UnknownFormat};
pub use junit::JUnitAdapter;
pub use mstest::TrxAdapter;
pub use nunit::NUnitAdapter;
pub use result::{ResultStatus, TestCaseName, TestResult};
pub use xunit::XUnitAdapter;

/// Maximum length of a captured failure message.
pub const MAX_MESSAGE_LENGTH: usize = 500;

/// Parse a raw report with the adapter registered for `format`.
pub fn parse_report(
    format: TestResultsFormat,
    raw: &[u8],
) -> Result<Vec<TestResult>, ReportParseError> {
    format.adapter().parse(raw)
}
