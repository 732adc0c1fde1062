//! NUnit 2 (`test-results`) and NUnit 3 (`test-run`) reports
//!
//! Test cases nest inside `test-suite` elements; the enclosing `TestFixture`
//! suite is the feature, and scenario outlines show up as a parameterized
//! suite whose children carry argument lists. NUnit 2 puts descriptions in
//! a `description` attribute, NUnit 3 in a `Description` property.

use crate::adapter::ReportAdapter;
use crate::error::ReportParseError;
use crate::format::TestResultsFormat;
use crate::name::{feature_from_class, humanize_identifier, scenario_from_method};
use crate::result::{seconds_to_ms, ResultStatus, TestCaseName, TestResult};
use crate::xml::{walk, XmlElement, XmlVisitor};

/// Adapter for NUnit 2 and NUnit 3 XML; both roots are accepted by either dialect
#[derive(Debug, Clone, Copy)]
pub struct NUnitAdapter {
    dialect: TestResultsFormat,
}

impl NUnitAdapter {
    pub const fn new(dialect: TestResultsFormat) -> Self {
        Self { dialect }
    }
}

impl ReportAdapter for NUnitAdapter {
    fn format(&self) -> TestResultsFormat {
        self.dialect
    }

    fn parse(&self, raw: &[u8]) -> Result<Vec<TestResult>, ReportParseError> {
        let mut visitor = NUnitVisitor::default();
        walk(raw, &["test-results", "test-run"], &mut visitor)?;
        Ok(visitor.results)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FrameKind {
    Fixture,
    Parameterized,
    Suite,
    Case,
}

#[derive(Debug)]
struct Frame {
    kind: FrameKind,
    name: String,
    description: Option<String>,
    method: Option<String>,
    class_name: Option<String>,
    result: Option<String>,
    executed: Option<String>,
    duration_ms: Option<u64>,
    error: Option<String>,
}

impl Frame {
    fn suite(element: &XmlElement) -> Self {
        let kind = match element.attr("type") {
            Some("TestFixture") => FrameKind::Fixture,
            Some("ParameterizedTest") | Some("ParameterizedMethod") | Some("GenericMethod") => {
                FrameKind::Parameterized
            }
            _ => FrameKind::Suite,
        };
        Self {
            kind,
            name: element.attr("name").unwrap_or_default().to_string(),
            description: element.attr("description").map(str::to_string),
            method: None,
            class_name: None,
            result: None,
            executed: None,
            duration_ms: None,
            error: None,
        }
    }

    fn case(element: &XmlElement) -> Result<Self, ReportParseError> {
        Ok(Self {
            kind: FrameKind::Case,
            name: element.required("test-case", "name")?.to_string(),
            description: element.attr("description").map(str::to_string),
            method: element.attr("methodname").map(str::to_string),
            class_name: element.attr("classname").map(str::to_string),
            result: element.attr("result").map(str::to_string),
            executed: element.attr("executed").map(str::to_string),
            duration_ms: element
                .attr("duration")
                .or_else(|| element.attr("time"))
                .and_then(seconds_to_ms),
            error: None,
        })
    }
}

#[derive(Debug, Default)]
struct NUnitVisitor {
    frames: Vec<Frame>,
    results: Vec<TestResult>,
}

impl XmlVisitor for NUnitVisitor {
    fn open(&mut self, _ancestors: &[String], element: &XmlElement) -> Result<(), ReportParseError> {
        match element.name.as_str() {
            "test-suite" => self.frames.push(Frame::suite(element)),
            "test-case" => self.frames.push(Frame::case(element)?),
            "property" => {
                if element.attr("name") == Some("Description") {
                    if let Some(frame) = self.frames.last_mut() {
                        frame.description = element.attr("value").map(str::to_string);
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
        if !in_failure_message {
            return;
        }
        if let Some(frame) = self.frames.last_mut() {
            if frame.kind == FrameKind::Case && frame.error.is_none() {
                frame.error = Some(text.to_string());
            }
        }
    }

    fn close(&mut self, _ancestors: &[String], name: &str) -> Result<(), ReportParseError> {
        match name {
            "test-suite" => {
                self.frames.pop();
            }
            "test-case" => {
                if let Some(case) = self.frames.pop() {
                    let result = self.finish_case(case);
                    self.results.push(result);
                }
            }
            _ => {}
        }
        Ok(())
    }
}

impl NUnitVisitor {
    fn finish_case(&self, case: Frame) -> TestResult {
        let fixture = self.frames.iter().rev().find(|f| f.kind == FrameKind::Fixture);
        let parameterized = self
            .frames
            .iter()
            .rev()
            .find(|f| f.kind == FrameKind::Parameterized);

        let feature = fixture
            .map(|f| {
                f.description
                    .clone()
                    .unwrap_or_else(|| feature_from_class(&f.name))
            })
            .or_else(|| case.class_name.as_deref().map(feature_from_class));

        let scenario = case
            .description
            .clone()
            .or_else(|| parameterized.and_then(|p| p.description.clone()))
            .or_else(|| parameterized.map(|p| humanize_identifier(&p.name)))
            .unwrap_or_else(|| scenario_from_method(case.method.as_deref().unwrap_or(&case.name)));

        let status = case_status(case.result.as_deref(), case.executed.as_deref());

        TestResult::new(TestCaseName::new(feature.as_deref(), &scenario), status)
            .with_duration_ms(case.duration_ms)
            .with_error(case.error)
    }
}

/// Covers both the NUnit 2 and NUnit 3 result vocabularies
fn case_status(result: Option<&str>, executed: Option<&str>) -> ResultStatus {
    match result {
        Some("Success") | Some("Passed") => ResultStatus::Passed,
        Some("Failure") | Some("Failed") | Some("Error") | Some("Cancelled") => ResultStatus::Failed,
        Some("Ignored") | Some("Skipped") | Some("NotRunnable") => ResultStatus::Skipped,
        Some("Inconclusive") | Some("Warning") => ResultStatus::Inconclusive,
        _ if executed.map_or(false, |e| e.eq_ignore_ascii_case("false")) => ResultStatus::Skipped,
        _ => ResultStatus::Inconclusive,
    }
}
