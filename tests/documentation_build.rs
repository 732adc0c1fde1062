//! End-to-end documentation builds over the banking fixtures

mod fixtures;

use std::fs;

use fixtures::*;
use livedoc::model::Outcome;
use livedoc::summary::SUMMARY_FILE;
use livedoc::{BuildSummary, BuildWarning, Pipeline};
use serde_json::{json, Value};
use tempfile::TempDir;

#[test]
fn test_feature_success_matches_test_run() {
    let out = TempDir::new().unwrap();
    let output = Pipeline::new(build_config(out.path(), json!({}))).run().unwrap();

    assert_eq!(output.documentation_path, out.path().join("features.json"));
    assert_eq!(
        success_by_feature(&output.documentation_path),
        vec![
            (TRANSFER.to_string(), true),
            (TRANSFER_FAILING.to_string(), false),
            (TWO_MORE.to_string(), true),
            (TWO_MORE_MIXED.to_string(), false),
        ]
    );
}

#[test]
fn test_every_report_dialect_agrees() {
    let expected = vec![
        (TRANSFER.to_string(), true),
        (TRANSFER_FAILING.to_string(), false),
        (TWO_MORE.to_string(), true),
        (TWO_MORE_MIXED.to_string(), false),
    ];
    for (format, file) in [
        ("mstest", "transfers.trx"),
        ("nunit", "transfers_nunit2.xml"),
        ("junit", "transfers_junit.xml"),
        ("cucumber", "transfers_cucumber.json"),
    ] {
        let out = TempDir::new().unwrap();
        let config = build_config(
            out.path(),
            json!({"test_results": {"format": format, "files": [report(file).to_string_lossy()]}}),
        );
        let output = Pipeline::new(config).run().unwrap();

        assert_eq!(success_by_feature(&output.documentation_path), expected, "{}", format);
        assert_eq!(output.summary.results_loaded, 6, "{}", format);
        assert!(output.summary.warnings.is_empty(), "{}: {:?}", format, output.summary.warnings);
    }
}

#[test]
fn test_summary_counts() {
    let out = TempDir::new().unwrap();
    let summary = Pipeline::new(build_config(out.path(), json!({}))).run().unwrap().summary;

    assert_eq!(summary.status, Outcome::Failed);
    assert_eq!(summary.features_discovered, 4);
    assert_eq!(summary.features_included, 4);
    assert_eq!(summary.results_loaded, 6);
    assert_eq!(summary.scenarios.passed, 4);
    assert_eq!(summary.scenarios.failed, 2);
    assert_eq!(summary.scenarios.not_run, 0);
    assert!(summary.verified);
    assert!(summary.warnings.is_empty());

    let written = BuildSummary::from_file(&out.path().join(SUMMARY_FILE)).unwrap();
    assert_eq!(written.build_id, summary.build_id);
    assert_eq!(written.status, Outcome::Failed);
}

#[test]
fn test_rendered_json_details() {
    let out = TempDir::new().unwrap();
    let output = Pipeline::new(build_config(out.path(), json!({}))).run().unwrap();
    let doc: Value =
        serde_json::from_str(&fs::read_to_string(output.documentation_path).unwrap()).unwrap();

    let first = &doc[0];
    assert_eq!(first["RelativeFolder"], "transfers/transfer_funds.feature");
    assert_eq!(first["Feature"]["Tags"], json!(["@banking"]));
    assert_eq!(
        first["Feature"]["Background"]["Steps"][0]["Name"],
        "a current account with a balance of 1000"
    );
    assert_eq!(first["Feature"]["FeatureElements"][0]["Result"]["Outcome"], "passed");

    let mixed = &doc[3]["Feature"]["FeatureElements"];
    assert_eq!(mixed[0]["Result"]["WasSuccessful"], true);
    assert_eq!(mixed[1]["Result"]["WasSuccessful"], false);
    assert_eq!(mixed[1]["Tags"], json!(["@slow"]));
}

#[test]
fn test_exclude_tag_drops_failing_scenario() {
    let out = TempDir::new().unwrap();
    let config = build_config(out.path(), json!({"filter": {"exclude_tag": "@slow"}}));
    let output = Pipeline::new(config).run().unwrap();

    let flags = success_by_feature(&output.documentation_path);
    assert_eq!(flags[3], (TWO_MORE_MIXED.to_string(), true));
    assert_eq!(output.summary.scenarios.total(), 5);
}

#[test]
fn test_exclude_feature_tag_drops_everything() {
    let out = TempDir::new().unwrap();
    let config = build_config(out.path(), json!({"filter": {"exclude_tag": "banking"}}));
    let output = Pipeline::new(config).run().unwrap();

    assert!(success_by_feature(&output.documentation_path).is_empty());
    assert_eq!(output.summary.features_excluded, 4);
    assert_eq!(output.summary.status, Outcome::NotRun);
}

#[test]
fn test_include_only_tag() {
    let out = TempDir::new().unwrap();
    let config = build_config(out.path(), json!({"filter": {"include_only_tag": "@slow"}}));
    let output = Pipeline::new(config).run().unwrap();

    assert_eq!(
        success_by_feature(&output.documentation_path),
        vec![(TWO_MORE_MIXED.to_string(), false)]
    );
    assert_eq!(output.summary.features_excluded, 3);
    assert_eq!(output.summary.scenarios.total(), 1);
}

#[test]
fn test_markdown_output() {
    let out = TempDir::new().unwrap();
    let config = build_config(
        out.path(),
        json!({
            "documentation_format": "markdown",
            "project_name": "Bank",
            "project_version": "1.2.0"
        }),
    );
    let output = Pipeline::new(config).run().unwrap();

    assert_eq!(output.documentation_path, out.path().join("features.md"));
    let markdown = fs::read_to_string(&output.documentation_path).unwrap();
    assert!(markdown.starts_with("# Bank 1.2.0"));
    for name in [TRANSFER, TRANSFER_FAILING, TWO_MORE, TWO_MORE_MIXED] {
        assert!(markdown.contains(name), "missing {}", name);
    }
    assert!(markdown.contains("| account | balance |"));
}

#[test]
fn test_without_results_nothing_is_executed() {
    let out = TempDir::new().unwrap();
    let config = build_config(out.path(), json!({"test_results": {"files": []}}));
    let output = Pipeline::new(config).run().unwrap();

    assert!(success_by_feature(&output.documentation_path)
        .iter()
        .all(|(_, ok)| !ok));
    assert_eq!(output.summary.status, Outcome::NotRun);
    assert_eq!(output.summary.scenarios.not_run, 6);
    // No reports configured: nothing to be unverified against
    assert!(output.summary.verified);
    assert!(output.summary.warnings.is_empty());
}

#[test]
fn test_wrong_results_format_is_unverified() {
    let out = TempDir::new().unwrap();
    let config = build_config(out.path(), json!({"test_results": {"format": "nunit"}}));
    let output = Pipeline::new(config).run().unwrap();

    assert!(!output.summary.verified);
    assert!(matches!(
        output.summary.warnings[0],
        BuildWarning::ReportUnreadable { .. }
    ));
    assert!(output
        .summary
        .warnings
        .contains(&BuildWarning::UnmatchedScenarios { count: 6 }));
}

#[test]
fn test_results_files_accumulate() {
    let out = TempDir::new().unwrap();
    let report = trx_report().to_string_lossy().to_string();
    let config = build_config(out.path(), json!({"test_results": {"files": [report, report]}}));
    let output = Pipeline::new(config).run().unwrap();

    assert_eq!(output.summary.results_loaded, 12);
    // Duplicate results agree, so outcomes are unchanged
    assert_eq!(output.summary.scenarios.passed, 4);
    assert_eq!(output.summary.scenarios.failed, 2);
}

#[test]
fn test_unparseable_feature_is_reported() {
    let dir = TempDir::new().unwrap();
    write_file(dir.path(), "features/ok.feature", "Feature: Ok\n  Scenario: Fine\n    Given x\n");
    write_file(dir.path(), "features/broken.feature", "Feature: Broken\n  | stray |\n");

    let config = build_config(
        &dir.path().join("docs"),
        json!({
            "feature_directory": dir.path().join("features").to_string_lossy(),
            "test_results": {"files": []}
        }),
    );
    let output = Pipeline::new(config).run().unwrap();

    assert_eq!(output.summary.features_discovered, 2);
    assert_eq!(output.summary.features_unparseable, 1);
    assert_eq!(output.summary.features_included, 1);
    assert!(matches!(
        &output.summary.warnings[0],
        BuildWarning::FeatureUnparseable { path, .. } if path == "broken.feature"
    ));
    // Skipped features do not unverify the build
    assert!(output.summary.verified);
}
