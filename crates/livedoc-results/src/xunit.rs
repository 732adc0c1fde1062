//! xUnit.net v1 (`assembly`) and v2 (`assemblies`) reports
//!
//! Both versions report each executed case as a flat `<test>` element.
//! SpecFlow attaches `FeatureTitle` and `Description` traits; without them
//! the fixture `type` and the `method` name are humanized.

use crate::adapter::ReportAdapter;
use crate::error::ReportParseError;
use crate::format::TestResultsFormat;
use crate::name::{feature_from_class, scenario_from_method};
use crate::result::{seconds_to_ms, ResultStatus, TestCaseName, TestResult};
use crate::xml::{walk, XmlElement, XmlVisitor};

/// Adapter for xUnit.net v1 and v2 XML
#[derive(Debug, Clone, Copy)]
pub struct XUnitAdapter {
    dialect: TestResultsFormat,
}

impl XUnitAdapter {
    pub const fn new(dialect: TestResultsFormat) -> Self {
        Self { dialect }
    }
}

impl ReportAdapter for XUnitAdapter {
    fn format(&self) -> TestResultsFormat {
        self.dialect
    }

    fn parse(&self, raw: &[u8]) -> Result<Vec<TestResult>, ReportParseError> {
        let mut visitor = XUnitVisitor::default();
        walk(raw, &["assemblies", "assembly"], &mut visitor)?;
        Ok(visitor.results)
    }
}

#[derive(Debug)]
struct PendingTest {
    name: String,
    type_name: Option<String>,
    method: Option<String>,
    result: String,
    duration_ms: Option<u64>,
    feature_title: Option<String>,
    description: Option<String>,
    error: Option<String>,
}

#[derive(Debug, Default)]
struct XUnitVisitor {
    current: Option<PendingTest>,
    results: Vec<TestResult>,
}

impl XmlVisitor for XUnitVisitor {
    fn open(&mut self, _ancestors: &[String], element: &XmlElement) -> Result<(), ReportParseError> {
        match element.name.as_str() {
            "test" => {
                self.current = Some(PendingTest {
                    name: element.required("test", "name")?.to_string(),
                    type_name: element.attr("type").map(str::to_string),
                    method: element.attr("method").map(str::to_string),
                    result: element.attr("result").unwrap_or_default().to_string(),
                    duration_ms: element.attr("time").and_then(seconds_to_ms),
                    feature_title: None,
                    description: None,
                    error: None,
                });
            }
            "trait" => {
                if let Some(test) = self.current.as_mut() {
                    let value = element.attr("value").map(str::to_string);
                    match element.attr("name") {
                        Some("FeatureTitle") => test.feature_title = value,
                        Some("Description") => test.description = value,
                        _ => {}
                    }
                }
            }
            _ => {}
        }
        Ok(())
    }

    fn text(&mut self, path: &[String], text: &str) {
        let in_failure_message = path.last().map(String::as_str) == Some("message")
            && path.iter().any(|p| p == "failure");
        if let Some(test) = self.current.as_mut() {
            if in_failure_message && test.error.is_none() {
                test.error = Some(text.to_string());
            }
        }
    }

    fn close(&mut self, _ancestors: &[String], name: &str) -> Result<(), ReportParseError> {
        if name == "test" {
            if let Some(test) = self.current.take() {
                self.results.push(finish(test));
            }
        }
        Ok(())
    }
}

fn finish(test: PendingTest) -> TestResult {
    let feature = test
        .feature_title
        .or_else(|| test.type_name.as_deref().map(feature_from_class));

    let scenario = test.description.unwrap_or_else(|| {
        scenario_from_method(test.method.as_deref().unwrap_or(&test.name))
    });

    let status = match test.result.as_str() {
        "Pass" => ResultStatus::Passed,
        "Fail" => ResultStatus::Failed,
        "Skip" | "NotRun" => ResultStatus::Skipped,
        _ => ResultStatus::Inconclusive,
    };

    TestResult::new(TestCaseName::new(feature.as_deref(), &scenario), status)
        .with_duration_ms(test.duration_ms)
        .with_error(test.error)
}
