//! phpmend CLI - automated security hardening for PHP codebases
//!
//! Scans a repository, runs the structural rules against every PHP source
//! file and the textual rules against configuration files, writes back
//! changed files in fix mode, and emits a JSON report of every change and
//! every file that could not be processed.

mod config;
mod discover;
mod output;
mod report;

use anyhow::{bail, Context, Result};
use clap::Parser;
use colored::*;
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Instant;
use tracing::debug;
use tracing_subscriber::EnvFilter;

use config::Config;
use output::OutputFormat;
use phpmend_core::{DefaultRuleSetting, FileWeaver, RulePolicy, ScopeFilter, SourceWeaver};
use report::Report;

#[derive(Parser)]
#[command(name = "phpmend")]
#[command(version)]
#[command(about = "Automatically repairs known security weaknesses in PHP codebases")]
struct Cli {
    /// Repository root to scan
    #[arg(required_unless_present = "list_rules")]
    root: Option<PathBuf>,

    /// Apply fixes to files
    #[arg(long)]
    fix: bool,

    /// Report changes without applying them (default mode)
    #[arg(long, conflicts_with = "fix")]
    check: bool,

    /// Glob pattern of files to scan, relative to the root (repeatable;
    /// no pattern means everything)
    #[arg(long = "include", short = 'i', value_name = "PATTERN")]
    include: Vec<String>,

    /// Glob pattern of files to skip (repeatable)
    #[arg(long = "exclude", short = 'e', value_name = "PATTERN")]
    exclude: Vec<String>,

    /// Default posture for every rule: enabled or disabled
    #[arg(long = "rule-default", value_name = "SETTING")]
    rule_default: Option<String>,

    /// Rule given the opposite of the default posture (repeatable)
    #[arg(long = "rule-exception", value_name = "RULE")]
    rule_exception: Vec<String>,

    /// External analysis result file seeding analysis-driven rules (repeatable)
    #[arg(long = "analysis", value_name = "PATH")]
    analysis: Vec<PathBuf>,

    /// Write a JSON report to this path
    #[arg(long = "report", short = 'o', value_name = "PATH")]
    report: Option<PathBuf>,

    /// Output format: text, json
    #[arg(long, value_name = "FORMAT", default_value = "text")]
    format: String,

    /// Show verbose output
    #[arg(long, short = 'v')]
    verbose: bool,

    /// List available rules and exit
    #[arg(long)]
    list_rules: bool,

    /// Path to config file (default: auto-detect .phpmend.toml)
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Ignore config files
    #[arg(long)]
    no_config: bool,
}

fn main() -> ExitCode {
    match run() {
        Ok(code) => code,
        Err(e) => {
            eprintln!("{}: {:#}", "Error".red(), e);
            ExitCode::from(1)
        }
    }
}

fn run() -> Result<ExitCode> {
    let cli = Cli::parse();

    init_tracing(cli.verbose);

    if cli.list_rules {
        print_rule_catalog();
        return Ok(ExitCode::SUCCESS);
    }

    let Some(root) = cli.root.clone() else {
        bail!("a repository root is required");
    };
    if !root.is_dir() {
        bail!("{} is not a directory", root.display());
    }

    let format = OutputFormat::from_str(&cli.format).ok_or_else(|| {
        anyhow::anyhow!(
            "Invalid output format '{}'. Valid options: text, json",
            cli.format
        )
    })?;

    let config = if cli.no_config {
        Config::default()
    } else if let Some(config_path) = &cli.config {
        Config::load_path(config_path)?
    } else {
        match Config::load_from(&root)? {
            Some((config, path)) => {
                debug!(config = %path.display(), "using config file");
                config
            }
            None => Config::default(),
        }
    };

    // CLI flags override the config file wholesale
    let default_token = cli
        .rule_default
        .clone()
        .or_else(|| config.rules.default.clone())
        .unwrap_or_else(|| "enabled".to_string());
    let default_setting = DefaultRuleSetting::parse(&default_token)?;
    let exceptions = if cli.rule_exception.is_empty() {
        config.rules.exceptions.clone()
    } else {
        cli.rule_exception.clone()
    };
    let policy = RulePolicy::new(default_setting, exceptions);

    let include = if cli.include.is_empty() {
        config.paths.include.clone()
    } else {
        cli.include.clone()
    };
    let exclude = if cli.exclude.is_empty() {
        config.paths.exclude.clone()
    } else {
        cli.exclude.clone()
    };

    // A malformed pattern aborts here, before any file is touched
    let scope = ScopeFilter::from_patterns(&root, &include, &exclude)?;

    let files = discover::discover_files(&root, &scope);
    debug!(files = files.len(), "candidate files in scope");

    let source_rules = phpmend_rules::assemble_rules(&policy, &cli.analysis)?;
    let file_rules = phpmend_textual::assemble_rules(&policy);
    debug!(
        structural = source_rules.len(),
        textual = file_rules.len(),
        "assembled active rules"
    );

    let started = Instant::now();
    let structural = SourceWeaver::weave(&files, &source_rules);
    let textual = FileWeaver::weave(&files, &file_rules, &structural);
    let merged = structural.merge(textual);
    let elapsed = started.elapsed();

    if cli.fix {
        for file in merged.changed_files() {
            std::fs::write(&file.path, &file.new_content)
                .with_context(|| format!("Failed to write {}", file.path.display()))?;
        }
    }

    let report = Report::assemble(&root, &include, &exclude, &merged, elapsed);
    if let Some(path) = &cli.report {
        report.write(path)?;
    }

    match format {
        OutputFormat::Text => output::print_result(&merged, cli.fix, elapsed),
        OutputFormat::Json => println!("{}", report.to_json()?),
    }

    let exit_code = if merged.unscannable_count() > 0 {
        ExitCode::from(1)
    } else if !cli.fix && merged.changed_count() > 0 {
        ExitCode::from(2)
    } else {
        ExitCode::SUCCESS
    };

    Ok(exit_code)
}

fn init_tracing(verbose: bool) {
    let filter = EnvFilter::try_from_env("PHPMEND_LOG")
        .unwrap_or_else(|_| EnvFilter::new(if verbose { "debug" } else { "warn" }));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn print_rule_catalog() {
    println!("{}", "Structural rules (PHP source):".bold());
    for (id, description) in phpmend_rules::catalog() {
        println!("  {} - {}", id.green(), description);
    }
    println!();
    println!("{}", "Textual rules (configuration files):".bold());
    for (id, description) in phpmend_textual::catalog() {
        println!("  {} - {}", id.green(), description);
    }
}
