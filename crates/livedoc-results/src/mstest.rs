//! MSTest / VSTest `.trx` reports
//!
//! A TRX file keeps executions (`Results/UnitTestResult`) apart from the
//! test definitions (`TestDefinitions/UnitTest`) and joins them by test id.
//! SpecFlow-generated tests carry the scenario title in `<Description>` and
//! the feature title in a `FeatureTitle` property.

use std::collections::HashMap;
use std::sync::OnceLock;

use regex_lite::Regex;

use crate::adapter::ReportAdapter;
use crate::error::ReportParseError;
use crate::format::TestResultsFormat;
use crate::name::{feature_from_class, scenario_from_method};
use crate::result::{ResultStatus, TestCaseName, TestResult};
use crate::xml::{walk, XmlElement, XmlVisitor};

const FEATURE_TITLE_PROPERTY: &str = "FeatureTitle";

/// Adapter for `.trx` reports
#[derive(Debug, Clone, Copy)]
pub struct TrxAdapter {
    dialect: TestResultsFormat,
}

impl TrxAdapter {
    pub const fn new(dialect: TestResultsFormat) -> Self {
        Self { dialect }
    }
}

impl ReportAdapter for TrxAdapter {
    fn format(&self) -> TestResultsFormat {
        self.dialect
    }

    fn parse(&self, raw: &[u8]) -> Result<Vec<TestResult>, ReportParseError> {
        let mut visitor = TrxVisitor::default();
        walk(raw, &["TestRun"], &mut visitor)?;
        Ok(visitor.into_results())
    }
}

#[derive(Debug, Default)]
struct Definition {
    method: Option<String>,
    class_name: Option<String>,
    description: Option<String>,
    feature_title: Option<String>,
}

#[derive(Debug)]
struct Execution {
    test_id: String,
    test_name: Option<String>,
    outcome: String,
    duration: Option<String>,
    error: Option<String>,
}

#[derive(Debug, Default)]
struct TrxVisitor {
    definitions: HashMap<String, Definition>,
    executions: Vec<Execution>,
    current_definition: Option<(String, Definition)>,
    current_execution: Option<Execution>,
    property_key: Option<String>,
}

impl XmlVisitor for TrxVisitor {
    fn open(&mut self, _ancestors: &[String], element: &XmlElement) -> Result<(), ReportParseError> {
        match element.name.as_str() {
            "UnitTest" => {
                let id = element.required("UnitTest", "id")?.to_string();
                self.current_definition = Some((id, Definition::default()));
            }
            "TestMethod" => {
                if let Some((_, def)) = self.current_definition.as_mut() {
                    def.method = element.attr("name").map(str::to_string);
                    def.class_name = element.attr("className").map(str::to_string);
                }
            }
            "UnitTestResult" => {
                self.current_execution = Some(Execution {
                    test_id: element.required("UnitTestResult", "testId")?.to_string(),
                    test_name: element.attr("testName").map(str::to_string),
                    outcome: element.attr("outcome").unwrap_or("NotExecuted").to_string(),
                    duration: element.attr("duration").map(str::to_string),
                    error: None,
                });
            }
            _ => {}
        }
        Ok(())
    }

    fn text(&mut self, path: &[String], text: &str) {
        let Some(parent) = path.last() else {
            return;
        };
        match parent.as_str() {
            "Description" => {
                if let Some((_, def)) = self.current_definition.as_mut() {
                    def.description = Some(text.to_string());
                }
            }
            "Key" => {
                if self.current_definition.is_some() {
                    self.property_key = Some(text.to_string());
                }
            }
            "Value" => {
                if let Some((_, def)) = self.current_definition.as_mut() {
                    if self.property_key.as_deref() == Some(FEATURE_TITLE_PROPERTY) {
                        def.feature_title = Some(text.to_string());
                    }
                }
            }
            "Message" => {
                let in_error_info = path.iter().any(|p| p == "ErrorInfo");
                if let Some(exec) = self.current_execution.as_mut() {
                    if in_error_info && exec.error.is_none() {
                        exec.error = Some(text.to_string());
                    }
                }
            }
            _ => {}
        }
    }

    fn close(&mut self, _ancestors: &[String], name: &str) -> Result<(), ReportParseError> {
        match name {
            "UnitTest" => {
                if let Some((id, def)) = self.current_definition.take() {
                    self.definitions.insert(id, def);
                }
            }
            "Property" => self.property_key = None,
            "UnitTestResult" => {
                if let Some(exec) = self.current_execution.take() {
                    self.executions.push(exec);
                }
            }
            _ => {}
        }
        Ok(())
    }
}

impl TrxVisitor {
    fn into_results(self) -> Vec<TestResult> {
        let definitions = self.definitions;
        self.executions
            .into_iter()
            .map(|exec| {
                let def = definitions.get(&exec.test_id);

                let scenario = def
                    .and_then(|d| d.description.clone())
                    .or_else(|| def.and_then(|d| d.method.as_deref()).map(scenario_name))
                    .or_else(|| exec.test_name.as_deref().map(scenario_name))
                    .unwrap_or_else(|| exec.test_id.clone());

                let feature = def.and_then(|d| {
                    d.feature_title
                        .clone()
                        .or_else(|| d.class_name.as_deref().map(feature_from_class))
                });

                TestResult::new(
                    TestCaseName::new(feature.as_deref(), &scenario),
                    outcome_status(&exec.outcome),
                )
                .with_duration_ms(exec.duration.as_deref().and_then(parse_timespan))
                .with_error(exec.error)
            })
            .collect()
    }
}

/// SpecFlow names outline rows `Method_Variant0`, `Method_Variant1`, ...
fn scenario_name(method: &str) -> String {
    static VARIANT: OnceLock<Regex> = OnceLock::new();
    let variant = VARIANT.get_or_init(|| Regex::new(r"_Variant\d+$").expect("valid regex"));
    scenario_from_method(&variant.replace(method, ""))
}

fn outcome_status(outcome: &str) -> ResultStatus {
    match outcome {
        "Passed" | "PassedButRunAborted" => ResultStatus::Passed,
        "Failed" | "Error" | "Timeout" | "Aborted" => ResultStatus::Failed,
        "NotExecuted" | "NotRunnable" | "Disconnected" => ResultStatus::Skipped,
        _ => ResultStatus::Inconclusive,
    }
}

/// `hh:mm:ss.fffffff` to milliseconds. `None` when unparseable or out of range.
fn parse_timespan(raw: &str) -> Option<u64> {
    static TIMESPAN: OnceLock<Regex> = OnceLock::new();
    let re = TIMESPAN
        .get_or_init(|| Regex::new(r"^(\d+):(\d{2}):(\d{2}(?:\.\d+)?)$").expect("valid regex"));

    let caps = re.captures(raw.trim())?;
    let hours: u64 = caps.get(1)?.as_str().parse().ok()?;
    let minutes: u64 = caps.get(2)?.as_str().parse().ok()?;
    let seconds: f64 = caps.get(3)?.as_str().parse().ok()?;
    hours
        .checked_mul(3_600_000)?
        .checked_add(minutes * 60_000)?
        .checked_add((seconds * 1000.0).round() as u64)
}

#[cfg(test)]
mod tests {
    use super::*;

    const TRX: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<TestRun id="b2f1" name="run" xmlns="http://microsoft.com/schemas/VisualStudio/TeamTest/2010">
  <Results>
    <UnitTestResult executionId="e1" testId="t1" testName="TransferFundsBetweenAccounts" duration="00:00:01.2500000" outcome="Passed" />
    <UnitTestResult executionId="e2" testId="t2" testName="AddTwoNumbers_Variant0" duration="00:00:00.0100000" outcome="Failed">
      <Output>
        <ErrorInfo>
          <Message>Assert.AreEqual failed. Expected:&lt;3&gt;. Actual:&lt;4&gt;.</Message>
          <StackTrace>at Calculator.Add()</StackTrace>
        </ErrorInfo>
      </Output>
    </UnitTestResult>
    <UnitTestResult executionId="e3" testId="t3" testName="Orphan" outcome="NotExecuted" />
  </Results>
  <TestDefinitions>
    <UnitTest name="TransferFundsBetweenAccounts" id="t1">
      <Description>Transfer funds between accounts</Description>
      <Properties>
        <Property><Key>FeatureTitle</Key><Value>Banking</Value></Property>
      </Properties>
      <TestMethod codeBase="x.dll" className="Acme.Specs.BankingFeature, Acme.Specs" name="TransferFundsBetweenAccounts" />
    </UnitTest>
    <UnitTest name="AddTwoNumbers_Variant0" id="t2">
      <TestMethod codeBase="x.dll" className="Acme.Specs.AdditionFeature, Acme.Specs" name="AddTwoNumbers_Variant0" />
    </UnitTest>
  </TestDefinitions>
</TestRun>"#;

    fn parse(raw: &str) -> Vec<TestResult> {
        TrxAdapter::new(TestResultsFormat::MsTest)
            .parse(raw.as_bytes())
            .unwrap()
    }

    #[test]
    fn test_oversized_duration_is_dropped() {
        let results = parse(
            r#"<TestRun><Results><UnitTestResult testId="t1" testName="A" duration="99999999999999:00:00" outcome="Passed"/></Results></TestRun>"#,
        );
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].status, ResultStatus::Passed);
        assert_eq!(results[0].duration_ms, None);
        assert_eq!(parse_timespan("99999999999999999999:00:00"), None);
        assert_eq!(parse_timespan("01:02:03.5"), Some(3_723_500));
    }

    #[test]
    fn test_description_and_feature_title() {
        let results = parse(TRX);
        assert_eq!(results.len(), 3);
        assert_eq!(results[0].name, TestCaseName::new(Some("Banking"), "Transfer funds between accounts"));
        assert_eq!(results[0].status, ResultStatus::Passed);
        assert_eq!(results[0].duration_ms, Some(1250));
    }

    #[test]
    fn test_falls_back_to_class_and_method() {
        let results = parse(TRX);
        assert_eq!(results[1].name.feature.as_deref(), Some("addition"));
        assert_eq!(results[1].name.scenario, "add two numbers");
        assert_eq!(results[1].status, ResultStatus::Failed);
        assert_eq!(
            results[1].error.as_deref(),
            Some("Assert.AreEqual failed. Expected:<3>. Actual:<4>.")
        );
    }

    #[test]
    fn test_result_without_definition() {
        let results = parse(TRX);
        assert_eq!(results[2].name, TestCaseName::new(None, "Orphan"));
        assert_eq!(results[2].status, ResultStatus::Skipped);
    }

    #[test]
    fn test_missing_test_id_is_an_error() {
        let raw = r#"<TestRun><Results><UnitTestResult outcome="Passed"/></Results></TestRun>"#;
        let err = TrxAdapter::new(TestResultsFormat::VsTest)
            .parse(raw.as_bytes())
            .unwrap_err();
        assert!(matches!(
            err,
            ReportParseError::MissingAttribute { attribute: "testId", .. }
        ));
    }

    #[test]
    fn test_wrong_root() {
        let err = TrxAdapter::new(TestResultsFormat::MsTest)
            .parse(b"<test-results/>")
            .unwrap_err();
        assert!(matches!(err, ReportParseError::UnexpectedRoot { .. }));
    }

    #[test]
    fn test_outcome_mapping() {
        assert_eq!(outcome_status("Passed"), ResultStatus::Passed);
        assert_eq!(outcome_status("Timeout"), ResultStatus::Failed);
        assert_eq!(outcome_status("Inconclusive"), ResultStatus::Inconclusive);
        assert_eq!(outcome_status("NotExecuted"), ResultStatus::Skipped);
    }

    #[test]
    fn test_parse_timespan() {
        assert_eq!(parse_timespan("00:00:00.0410000"), Some(41));
        assert_eq!(parse_timespan("01:02:03"), Some(3_723_000));
        assert_eq!(parse_timespan("bogus"), None);
    }
}
