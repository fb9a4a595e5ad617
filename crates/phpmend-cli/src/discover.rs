//! Candidate file discovery
//!
//! Walks the repository root and keeps every regular file the scope filter
//! accepts. The weavers decide per file which pass handles it.

use phpmend_core::ScopeFilter;
use std::path::{Path, PathBuf};

pub fn discover_files(root: &Path, scope: &ScopeFilter) -> Vec<PathBuf> {
    let mut files: Vec<PathBuf> = walkdir::WalkDir::new(root)
        .into_iter()
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_type().is_file())
        .map(|entry| entry.into_path())
        .filter(|path| scope.should_inspect(path))
        .collect();

    // Deterministic processing and reporting order
    files.sort();
    files
}
