//! JUnit / Ant XML reports
//!
//! Runners disagree on what goes into `classname` and `name`: Cucumber-JVM
//! writes the feature and scenario titles directly, cucumber-rs decorates
//! them with keywords and source positions, plain JUnit writes Java class
//! and method identifiers. All three are reduced to titles here.

use std::sync::OnceLock;

use regex_lite::Regex;

use crate::adapter::ReportAdapter;
use crate::error::ReportParseError;
use crate::format::TestResultsFormat;
use crate::name::{feature_from_class, scenario_from_method};
use crate::result::{seconds_to_ms, ResultStatus, TestCaseName, TestResult};
use crate::xml::{walk, XmlElement, XmlVisitor};

/// Adapter for JUnit XML
#[derive(Debug, Clone, Copy, Default)]
pub struct JUnitAdapter;

impl ReportAdapter for JUnitAdapter {
    fn format(&self) -> TestResultsFormat {
        TestResultsFormat::JUnit
    }

    fn parse(&self, raw: &[u8]) -> Result<Vec<TestResult>, ReportParseError> {
        let mut visitor = JUnitVisitor::default();
        walk(raw, &["testsuites", "testsuite"], &mut visitor)?;
        Ok(visitor.results)
    }
}

#[derive(Debug)]
struct PendingCase {
    class_name: Option<String>,
    name: String,
    duration_ms: Option<u64>,
    status: ResultStatus,
    error: Option<String>,
}

#[derive(Debug, Default)]
struct JUnitVisitor {
    suites: Vec<String>,
    current: Option<PendingCase>,
    results: Vec<TestResult>,
}

impl XmlVisitor for JUnitVisitor {
    fn open(&mut self, _ancestors: &[String], element: &XmlElement) -> Result<(), ReportParseError> {
        match element.name.as_str() {
            "testsuite" => {
                self.suites
                    .push(element.attr("name").unwrap_or_default().to_string());
            }
            "testcase" => {
                self.current = Some(PendingCase {
                    class_name: element.attr("classname").map(str::to_string),
                    name: element.required("testcase", "name")?.to_string(),
                    duration_ms: element.attr("time").and_then(seconds_to_ms),
                    status: ResultStatus::Passed,
                    error: None,
                });
            }
            "failure" | "error" => {
                if let Some(case) = self.current.as_mut() {
                    case.status = ResultStatus::Failed;
                    if case.error.is_none() {
                        case.error = element.attr("message").map(str::to_string);
                    }
                }
            }
            "skipped" => {
                if let Some(case) = self.current.as_mut() {
                    if case.status != ResultStatus::Failed {
                        case.status = ResultStatus::Skipped;
                    }
                }
            }
            _ => {}
        }
        Ok(())
    }

    fn text(&mut self, path: &[String], text: &str) {
        let in_failure = matches!(path.last().map(String::as_str), Some("failure") | Some("error"));
        if let Some(case) = self.current.as_mut() {
            if in_failure && case.error.is_none() {
                case.error = Some(text.to_string());
            }
        }
    }

    fn close(&mut self, _ancestors: &[String], name: &str) -> Result<(), ReportParseError> {
        match name {
            "testsuite" => {
                self.suites.pop();
            }
            "testcase" => {
                if let Some(case) = self.current.take() {
                    let suite = self.suites.last().map(String::as_str);
                    self.results.push(finish(case, suite));
                }
            }
            _ => {}
        }
        Ok(())
    }
}

fn finish(case: PendingCase, suite: Option<&str>) -> TestResult {
    let feature = case
        .class_name
        .as_deref()
        .filter(|c| !c.trim().is_empty())
        .or(suite)
        .map(feature_title);
    let scenario = scenario_title(&case.name);

    TestResult::new(TestCaseName::new(feature.as_deref(), &scenario), case.status)
        .with_duration_ms(case.duration_ms)
        .with_error(case.error)
}

fn feature_title(raw: &str) -> String {
    static FEATURE: OnceLock<Regex> = OnceLock::new();
    let re = FEATURE.get_or_init(|| {
        Regex::new(r"^Feature:\s*(.*?)(?::\s+\S+\.feature)?$").expect("valid regex")
    });

    let raw = raw.trim();
    if let Some(caps) = re.captures(raw) {
        return caps.get(1).map_or("", |m| m.as_str()).to_string();
    }
    if raw.contains(char::is_whitespace) {
        raw.to_string()
    } else {
        feature_from_class(raw)
    }
}

fn scenario_title(raw: &str) -> String {
    static SCENARIO: OnceLock<Regex> = OnceLock::new();
    static ORDINAL: OnceLock<Regex> = OnceLock::new();
    let scenario = SCENARIO.get_or_init(|| {
        Regex::new(
            r"^(?:Rule:\s*.*?:\s*)?Scenario(?: Outline| Template)?:\s*(.*?)(?::\s+(?:\S+:)?\d+:\d+)?$",
        )
        .expect("valid regex")
    });
    let ordinal = ORDINAL.get_or_init(|| Regex::new(r"\s+#\d+$").expect("valid regex"));

    let raw = raw.trim();
    let title = match scenario.captures(raw) {
        Some(caps) => caps.get(1).map_or("", |m| m.as_str()).to_string(),
        None if raw.contains(char::is_whitespace) => raw.to_string(),
        None => scenario_from_method(raw),
    };
    ordinal.replace(&title, "").into_owned()
}
