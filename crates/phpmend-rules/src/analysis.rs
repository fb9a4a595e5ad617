//! External analysis findings that seed rule match predicates
//!
//! Some rules only fire at sites an external analysis tool has already
//! flagged. The tool's result files are small JSON documents listing
//! path/line pairs; they are loaded once, when the consuming rule is
//! constructed.

use serde::Deserialize;
use std::collections::{BTreeSet, HashMap};
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AnalysisError {
    #[error("could not read analysis file {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("could not parse analysis file {path}: {source}")]
    Json {
        path: PathBuf,
        source: serde_json::Error,
    },
}

/// One flagged site in an analysis result file
#[derive(Debug, Deserialize)]
pub struct Finding {
    pub path: PathBuf,
    pub line: usize,
}

/// Findings merged from all analysis result files, indexed by path
#[derive(Debug, Default, Clone)]
pub struct AnalysisFindings {
    by_path: HashMap<PathBuf, BTreeSet<usize>>,
}

impl AnalysisFindings {
    /// Load and merge every given result file
    pub fn load(paths: &[PathBuf]) -> Result<Self, AnalysisError> {
        let mut findings = AnalysisFindings::default();

        for path in paths {
            let contents = std::fs::read_to_string(path).map_err(|source| AnalysisError::Io {
                path: path.clone(),
                source,
            })?;
            let parsed: Vec<Finding> =
                serde_json::from_str(&contents).map_err(|source| AnalysisError::Json {
                    path: path.clone(),
                    source,
                })?;
            for finding in parsed {
                findings
                    .by_path
                    .entry(finding.path)
                    .or_default()
                    .insert(finding.line);
            }
        }

        Ok(findings)
    }

    pub fn is_empty(&self) -> bool {
        self.by_path.is_empty()
    }

    /// Flagged lines for a scanned file.
    ///
    /// Analysis tools usually report repository-relative paths while the
    /// scanner sees fuller ones, so a finding also matches when the
    /// scanned path ends with it.
    pub fn lines_for(&self, file: &Path) -> BTreeSet<usize> {
        let mut lines = BTreeSet::new();
        for (path, flagged) in &self.by_path {
            if file == path || file.ends_with(path) {
                lines.extend(flagged.iter().copied());
            }
        }
        lines
    }
}
