//! Shared fixtures for the integration tests
//!
//! - `features/`: the banking transfer features
//! - `results/`: the same test run as MSTest, NUnit 2, JUnit and Cucumber JSON

#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};

use livedoc::{BuildConfig, EffectiveConfig};
use serde_json::Value;

pub const TRANSFER: &str = "Transfer funds between accounts";
pub const TRANSFER_FAILING: &str = "Transfer funds between accounts onc scenario and FAILING";
pub const TWO_MORE: &str = "Two more scenarios transfering funds between accounts";
pub const TWO_MORE_MIXED: &str =
    "Two more scenarios transfering funds between accounts - one failng and one succeding";

pub fn fixtures_dir() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures")
}

pub fn features_dir() -> PathBuf {
    fixtures_dir().join("features")
}

pub fn trx_report() -> PathBuf {
    fixtures_dir().join("results/transfers.trx")
}

/// Report fixture by file name under `results/`
pub fn report(name: &str) -> PathBuf {
    fixtures_dir().join("results").join(name)
}

/// Every fixture feature file, sorted by path
pub fn feature_sources() -> Vec<(PathBuf, String)> {
    let mut files: Vec<PathBuf> = walk(&features_dir());
    files.sort();
    files
        .into_iter()
        .map(|path| {
            let source = fs::read_to_string(&path).unwrap();
            (path, source)
        })
        .collect()
}

fn walk(dir: &Path) -> Vec<PathBuf> {
    let mut out = Vec::new();
    for entry in fs::read_dir(dir).unwrap() {
        let path = entry.unwrap().path();
        if path.is_dir() {
            out.extend(walk(&path));
        } else if path.extension().is_some_and(|e| e == "feature") {
            out.push(path);
        }
    }
    out
}

/// Build config over the fixture features, writing into `output`
pub fn build_config(output: &Path, overrides: Value) -> BuildConfig {
    let base = serde_json::json!({
        "feature_directory": features_dir().to_string_lossy(),
        "output_directory": output.to_string_lossy(),
        "test_results": {
            "format": "mstest",
            "files": [trx_report().to_string_lossy()]
        }
    });
    let cli = livedoc::config::deep_merge(base, overrides);
    let effective = EffectiveConfig::build(None, None, Some(cli)).unwrap();
    BuildConfig::from_effective(&effective).unwrap()
}

/// `Feature.Name` to `Result.WasSuccessful` from a rendered features.json
pub fn success_by_feature(features_json: &Path) -> Vec<(String, bool)> {
    let doc: Value = serde_json::from_str(&fs::read_to_string(features_json).unwrap()).unwrap();
    doc.as_array()
        .unwrap()
        .iter()
        .map(|entry| {
            (
                entry["Feature"]["Name"].as_str().unwrap().to_string(),
                entry["Result"]["WasSuccessful"].as_bool().unwrap(),
            )
        })
        .collect()
}

pub fn write_file(root: &Path, relative: &str, contents: &str) -> PathBuf {
    let path = root.join(relative);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(&path, contents).unwrap();
    path
}
