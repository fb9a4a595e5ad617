//! Machine-readable run report
//!
//! The report captures everything a CI pipeline needs: what changed,
//! where, under which rule, and which files could not be processed.

use anyhow::{Context, Result};
use phpmend_core::WeavingResult;
use serde::Serialize;
use std::path::Path;
use std::time::Duration;

#[derive(Debug, Serialize)]
pub struct Report {
    pub tool: &'static str,
    pub version: &'static str,
    pub root: String,
    pub include: Vec<String>,
    pub exclude: Vec<String>,
    pub elapsed_ms: u128,
    pub summary: Summary,
    pub changed: Vec<ChangedEntry>,
    pub unscannable: Vec<UnscannableEntry>,
}

#[derive(Debug, Serialize)]
pub struct Summary {
    pub files_changed: usize,
    pub total_weaves: usize,
    pub files_unscannable: usize,
}

#[derive(Debug, Serialize)]
pub struct ChangedEntry {
    pub path: String,
    pub weaves: Vec<WeaveEntry>,
}

#[derive(Debug, Serialize)]
pub struct WeaveEntry {
    pub rule: String,
    pub line: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct UnscannableEntry {
    pub path: String,
    pub reason: String,
}

impl Report {
    pub fn assemble(
        root: &Path,
        include: &[String],
        exclude: &[String],
        result: &WeavingResult,
        elapsed: Duration,
    ) -> Report {
        let changed = result
            .changed_files()
            .map(|file| ChangedEntry {
                path: file.path.display().to_string(),
                weaves: file
                    .weaves
                    .iter()
                    .map(|weave| WeaveEntry {
                        rule: weave.rule.clone(),
                        line: weave.line,
                        description: weave.description.clone(),
                    })
                    .collect(),
            })
            .collect();

        let unscannable = result
            .unscannable_files()
            .map(|file| UnscannableEntry {
                path: file.path.display().to_string(),
                reason: file.reason.clone(),
            })
            .collect();

        Report {
            tool: "phpmend",
            version: env!("CARGO_PKG_VERSION"),
            root: root.display().to_string(),
            include: include.to_vec(),
            exclude: exclude.to_vec(),
            elapsed_ms: elapsed.as_millis(),
            summary: Summary {
                files_changed: result.changed_count(),
                total_weaves: result.total_weaves(),
                files_unscannable: result.unscannable_count(),
            },
            changed,
            unscannable,
        }
    }

    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self).context("Failed to serialize report")
    }

    pub fn write(&self, path: &Path) -> Result<()> {
        let json = self.to_json()?;
        std::fs::write(path, json)
            .with_context(|| format!("Failed to write report to {}", path.display()))
    }
}
