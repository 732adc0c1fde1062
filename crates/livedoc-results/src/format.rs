//! Report format identifiers and adapter selection

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::adapter::ReportAdapter;
use crate::cucumber::CucumberJsonAdapter;
use crate::junit::JUnitAdapter;
use crate::mstest::TrxAdapter;
use crate::nunit::NUnitAdapter;
use crate::xunit::XUnitAdapter;

/// Supported test-runner report dialects
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TestResultsFormat {
    /// NUnit 2.x `TestResult.xml`
    NUnit,
    /// NUnit 3.x `TestResult.xml`
    NUnit3,
    /// xUnit.net v1 XML
    XUnit,
    /// xUnit.net v2 XML
    XUnit2,
    /// MSTest `.trx`
    MsTest,
    /// VSTest `.trx` (same schema as MSTest)
    VsTest,
    /// JUnit / Ant XML
    JUnit,
    /// Cucumber JSON
    CucumberJson,
}

static NUNIT: NUnitAdapter = NUnitAdapter::new(TestResultsFormat::NUnit);
static NUNIT3: NUnitAdapter = NUnitAdapter::new(TestResultsFormat::NUnit3);
static XUNIT: XUnitAdapter = XUnitAdapter::new(TestResultsFormat::XUnit);
static XUNIT2: XUnitAdapter = XUnitAdapter::new(TestResultsFormat::XUnit2);
static MSTEST: TrxAdapter = TrxAdapter::new(TestResultsFormat::MsTest);
static VSTEST: TrxAdapter = TrxAdapter::new(TestResultsFormat::VsTest);
static JUNIT: JUnitAdapter = JUnitAdapter;
static CUCUMBER_JSON: CucumberJsonAdapter = CucumberJsonAdapter;

impl TestResultsFormat {
    /// Every supported identifier, in help-text order
    pub const ALL: [TestResultsFormat; 8] = [
        TestResultsFormat::NUnit,
        TestResultsFormat::NUnit3,
        TestResultsFormat::XUnit,
        TestResultsFormat::XUnit2,
        TestResultsFormat::MsTest,
        TestResultsFormat::VsTest,
        TestResultsFormat::JUnit,
        TestResultsFormat::CucumberJson,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            TestResultsFormat::NUnit => "nunit",
            TestResultsFormat::NUnit3 => "nunit3",
            TestResultsFormat::XUnit => "xunit",
            TestResultsFormat::XUnit2 => "xunit2",
            TestResultsFormat::MsTest => "mstest",
            TestResultsFormat::VsTest => "vstest",
            TestResultsFormat::JUnit => "junit",
            TestResultsFormat::CucumberJson => "cucumberjson",
        }
    }

    /// The adapter registered for this identifier
    pub fn adapter(&self) -> &'static dyn ReportAdapter {
        match self {
            TestResultsFormat::NUnit => &NUNIT,
            TestResultsFormat::NUnit3 => &NUNIT3,
            TestResultsFormat::XUnit => &XUNIT,
            TestResultsFormat::XUnit2 => &XUNIT2,
            TestResultsFormat::MsTest => &MSTEST,
            TestResultsFormat::VsTest => &VSTEST,
            TestResultsFormat::JUnit => &JUNIT,
            TestResultsFormat::CucumberJson => &CUCUMBER_JSON,
        }
    }

    fn expected_list() -> String {
        Self::ALL
            .iter()
            .map(|f| f.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl fmt::Display for TestResultsFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An identifier that names no supported dialect
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown test results format '{found}' (expected one of: {expected})")]
pub struct UnknownFormat {
    pub found: String,
    pub expected: String,
}

impl FromStr for TestResultsFormat {
    type Err = UnknownFormat;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "nunit" | "nunit2" => Ok(TestResultsFormat::NUnit),
            "nunit3" => Ok(TestResultsFormat::NUnit3),
            "xunit" | "xunit1" => Ok(TestResultsFormat::XUnit),
            "xunit2" => Ok(TestResultsFormat::XUnit2),
            "mstest" => Ok(TestResultsFormat::MsTest),
            "vstest" => Ok(TestResultsFormat::VsTest),
            "junit" => Ok(TestResultsFormat::JUnit),
            "cucumberjson" | "cucumber-json" | "cucumber" => Ok(TestResultsFormat::CucumberJson),
            _ => Err(UnknownFormat {
                found: s.to_string(),
                expected: Self::expected_list(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_trip_identifiers() {
        for format in TestResultsFormat::ALL {
            assert_eq!(format.as_str().parse::<TestResultsFormat>().unwrap(), format);
            assert_eq!(format.adapter().format(), format);
        }
    }

    #[test]
    fn test_parse_is_case_insensitive() {
        assert_eq!("MsTest".parse::<TestResultsFormat>().unwrap(), TestResultsFormat::MsTest);
        assert_eq!(" NUnit3 ".parse::<TestResultsFormat>().unwrap(), TestResultsFormat::NUnit3);
    }

    #[test]
    fn test_unknown_identifier() {
        let err = "specrun".parse::<TestResultsFormat>().unwrap_err();
        assert_eq!(err.found, "specrun");
        assert!(err.to_string().contains("mstest"));
    }

    #[test]
    fn test_serde_names_match_identifiers() {
        assert_eq!(
            serde_json::to_string(&TestResultsFormat::CucumberJson).unwrap(),
            r#""cucumberjson""#
        );
        assert_eq!(serde_json::to_string(&TestResultsFormat::XUnit2).unwrap(), r#""xunit2""#);
    }
}
