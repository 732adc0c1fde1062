//! livedoc CLI
//!
//! Entry point for the `livedoc` command-line tool.

use clap::{Args, Parser, Subcommand};
use livedoc::config::{host_config_path, REPO_CONFIG_FILE};
use livedoc::logging::init_logging;
use livedoc::{BuildConfig, EffectiveConfig, Pipeline};
use livedoc_results::{parse_report, TestResultsFormat};
use serde_json::{json, Map, Value};
use std::fs;
use std::path::{Path, PathBuf};
use std::process;

/// Exit code for configuration problems
const EXIT_CONFIG: i32 = 10;

#[derive(Parser)]
#[command(name = "livedoc")]
#[command(about = "Living documentation from Gherkin features and test results", version)]
struct Cli {
    /// Debug logging (overridden by RUST_LOG)
    #[arg(long, short = 'v', global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build the documentation
    Build {
        #[command(flatten)]
        overrides: Overrides,
    },

    /// Print the effective configuration as JSON
    Config {
        #[command(flatten)]
        overrides: Overrides,
    },

    /// Parse a test results report and print the normalized results
    Results {
        /// Report format (nunit, nunit3, xunit, xunit2, mstest, vstest, junit, cucumber)
        #[arg(long, short = 'f')]
        format: String,

        /// Report file
        file: PathBuf,

        /// Output in JSON format
        #[arg(long)]
        json: bool,
    },
}

/// Settings that override the config files
#[derive(Args)]
struct Overrides {
    /// Path to repo config file (default: livedoc.toml)
    #[arg(long, short = 'c')]
    config: Option<PathBuf>,

    /// Directory scanned for feature files
    #[arg(long)]
    features: Option<PathBuf>,

    /// Directory the documentation is written to
    #[arg(long, short = 'o')]
    output: Option<PathBuf>,

    /// Documentation format (json, markdown)
    #[arg(long)]
    format: Option<String>,

    #[arg(long)]
    project_name: Option<String>,

    #[arg(long)]
    project_version: Option<String>,

    /// Drop features and scenarios carrying this tag
    #[arg(long)]
    exclude_tag: Option<String>,

    /// Keep only scenarios carrying this tag
    #[arg(long)]
    include_only_tag: Option<String>,

    /// Test results format
    #[arg(long)]
    results_format: Option<String>,

    /// Test results report (repeatable)
    #[arg(long = "results", short = 'r')]
    results: Vec<PathBuf>,
}

impl Overrides {
    /// CLI layer of the effective config. Only flags that were given appear.
    fn to_value(&self) -> Value {
        let mut root = Map::new();
        let mut filter = Map::new();
        let mut results = Map::new();

        let path = |p: &PathBuf| Value::String(p.to_string_lossy().to_string());

        if let Some(ref dir) = self.features {
            root.insert("feature_directory".into(), path(dir));
        }
        if let Some(ref dir) = self.output {
            root.insert("output_directory".into(), path(dir));
        }
        if let Some(ref format) = self.format {
            root.insert("documentation_format".into(), json!(format));
        }
        if let Some(ref name) = self.project_name {
            root.insert("project_name".into(), json!(name));
        }
        if let Some(ref version) = self.project_version {
            root.insert("project_version".into(), json!(version));
        }
        if let Some(ref tag) = self.exclude_tag {
            filter.insert("exclude_tag".into(), json!(tag));
        }
        if let Some(ref tag) = self.include_only_tag {
            filter.insert("include_only_tag".into(), json!(tag));
        }
        if let Some(ref format) = self.results_format {
            results.insert("format".into(), json!(format));
        }
        if !self.results.is_empty() {
            results.insert(
                "files".into(),
                Value::Array(self.results.iter().map(path).collect()),
            );
        }

        if !filter.is_empty() {
            root.insert("filter".into(), Value::Object(filter));
        }
        if !results.is_empty() {
            root.insert("test_results".into(), Value::Object(results));
        }
        Value::Object(root)
    }
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Commands::Build { overrides } => {
            run_build(&overrides);
        }
        Commands::Config { overrides } => {
            run_config(&overrides);
        }
        Commands::Results { format, file, json } => {
            run_results(&format, &file, json);
        }
    }
}

fn load_effective_config(overrides: &Overrides) -> EffectiveConfig {
    let repo_path = match overrides.config {
        Some(ref path) if !path.exists() => {
            eprintln!("Configuration error: {} not found", path.display());
            process::exit(EXIT_CONFIG);
        }
        Some(ref path) => path.clone(),
        None => PathBuf::from(REPO_CONFIG_FILE),
    };
    let host_path = host_config_path();

    match EffectiveConfig::build(
        host_path.as_deref(),
        Some(repo_path.as_path()),
        Some(overrides.to_value()),
    ) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Configuration error: {}", e);
            process::exit(EXIT_CONFIG);
        }
    }
}

fn run_build(overrides: &Overrides) {
    let effective = load_effective_config(overrides);
    let config = match BuildConfig::from_effective(&effective) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Configuration error: {}", e);
            process::exit(EXIT_CONFIG);
        }
    };

    match Pipeline::new(config).run() {
        Ok(output) => {
            for warning in &output.summary.warnings {
                eprintln!("warning: {}", warning);
            }
            println!("{}", output.summary.human_summary);
            println!("  Documentation: {}", output.documentation_path.display());
            println!("  Summary: {}", output.summary_path.display());
        }
        Err(e) => {
            eprintln!("Build failed: {}", e);
            process::exit(e.exit_code());
        }
    }
}

fn run_config(overrides: &Overrides) {
    let effective = load_effective_config(overrides);

    // Surface semantic errors too, not only malformed files
    if let Err(e) = BuildConfig::from_effective(&effective) {
        eprintln!("Configuration error: {}", e);
        process::exit(EXIT_CONFIG);
    }

    match effective.to_json() {
        Ok(json) => println!("{}", json),
        Err(e) => {
            eprintln!("Error serializing output: {}", e);
            process::exit(1);
        }
    }
}

fn run_results(format: &str, file: &Path, json_output: bool) {
    let format = match format.parse::<TestResultsFormat>() {
        Ok(f) => f,
        Err(e) => {
            eprintln!("Configuration error: {}", e);
            process::exit(EXIT_CONFIG);
        }
    };

    let raw = match fs::read(file) {
        Ok(raw) => raw,
        Err(e) => {
            eprintln!("Error reading {}: {}", file.display(), e);
            process::exit(1);
        }
    };

    let results = match parse_report(format, &raw) {
        Ok(results) => results,
        Err(e) => {
            eprintln!("Error parsing {} as {}: {}", file.display(), format, e);
            process::exit(1);
        }
    };

    if json_output {
        match serde_json::to_string_pretty(&results) {
            Ok(json) => println!("{}", json),
            Err(e) => {
                eprintln!("Error serializing output: {}", e);
                process::exit(1);
            }
        }
        return;
    }

    for result in &results {
        println!("{:<13} {}", result.status.as_str(), result.name.display());
    }
    println!();
    println!("{} result(s)", results.len());
}
