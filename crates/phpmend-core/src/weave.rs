//! Weaving outcome model
//!
//! A weaver produces a `WeavingResult`: the set of files it changed, each
//! with the structured record of every applied transformation, and the set
//! of files it could not process at all. Both sets are keyed by path, so a
//! later entry for the same path overwrites rather than duplicates, and a
//! path is never in both sets at once.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// One applied transformation: the rule that made it and where
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Weave {
    /// Identifier of the rule that applied the change
    pub rule: String,
    /// 1-based line of the change, in the content the weaver received
    pub line: usize,
    /// Optional description of the fix
    pub description: Option<String>,
}

impl Weave {
    pub fn from(rule: impl Into<String>, line: usize) -> Self {
        Self {
            rule: rule.into(),
            line,
            description: None,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

/// A file that was rewritten, with the record of every change
#[derive(Debug, Clone)]
pub struct ChangedFile {
    pub path: PathBuf,
    pub weaves: Vec<Weave>,
    pub new_content: String,
}

/// A file that could not be processed at all
#[derive(Debug, Clone)]
pub struct UnscannableFile {
    pub path: PathBuf,
    pub reason: String,
}

impl UnscannableFile {
    pub fn new(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            reason: reason.into(),
        }
    }
}

/// Aggregate outcome of a weaving pass
#[derive(Debug, Clone, Default)]
pub struct WeavingResult {
    changed: BTreeMap<PathBuf, ChangedFile>,
    unscannable: BTreeMap<PathBuf, UnscannableFile>,
}

impl WeavingResult {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a changed file. Refused when the path is already marked
    /// unscannable; replaces any earlier entry for the same path.
    pub fn add_changed(&mut self, file: ChangedFile) {
        if self.unscannable.contains_key(&file.path) {
            return;
        }
        self.changed.insert(file.path.clone(), file);
    }

    /// Record an unscannable file, evicting any changed entry for the path
    pub fn mark_unscannable(&mut self, file: UnscannableFile) {
        self.changed.remove(&file.path);
        self.unscannable.insert(file.path.clone(), file);
    }

    pub fn changed_files(&self) -> impl Iterator<Item = &ChangedFile> {
        self.changed.values()
    }

    pub fn unscannable_files(&self) -> impl Iterator<Item = &UnscannableFile> {
        self.unscannable.values()
    }

    /// The rewritten content for a path, if this result changed it
    pub fn changed_content(&self, path: &Path) -> Option<&str> {
        self.changed.get(path).map(|file| file.new_content.as_str())
    }

    pub fn is_unscannable(&self, path: &Path) -> bool {
        self.unscannable.contains_key(path)
    }

    pub fn changed_count(&self) -> usize {
        self.changed.len()
    }

    pub fn unscannable_count(&self) -> usize {
        self.unscannable.len()
    }

    pub fn total_weaves(&self) -> usize {
        self.changed.values().map(|file| file.weaves.len()).sum()
    }

    /// Combine two weaving results into one.
    ///
    /// Changed and unscannable sets are unioned. A path changed by both
    /// passes keeps `self`'s weaves followed by `other`'s and takes
    /// `other`'s content — the later pass composed on top of the earlier
    /// pass's output. A path unscannable in either input is unscannable in
    /// the merge and owns no changed entry.
    ///
    /// The two passes are expected to cover disjoint file-type domains;
    /// that assumption belongs to whoever registers rules into the
    /// weavers, not to this merge.
    pub fn merge(mut self, other: WeavingResult) -> WeavingResult {
        for (_, file) in other.unscannable {
            self.mark_unscannable(file);
        }
        for (path, theirs) in other.changed {
            if self.unscannable.contains_key(&path) {
                continue;
            }
            match self.changed.remove(&path) {
                Some(mut ours) => {
                    ours.weaves.extend(theirs.weaves);
                    ours.new_content = theirs.new_content;
                    self.changed.insert(path, ours);
                }
                None => {
                    self.changed.insert(path, theirs);
                }
            }
        }
        self
    }
}

/// Convert a byte offset to a 1-based line number
pub fn offset_to_line(source: &str, offset: usize) -> usize {
    let mut line = 1;
    for (i, ch) in source.char_indices() {
        if i >= offset {
            break;
        }
        if ch == '\n' {
            line += 1;
        }
    }
    line
}

#[cfg(test)]
mod tests {
    use super::*;

    fn changed(path: &str, rule: &str, line: usize) -> ChangedFile {
        ChangedFile {
            path: PathBuf::from(path),
            weaves: vec![Weave::from(rule, line)],
            new_content: format!("content of {path}"),
        }
    }

    #[test]
    fn test_duplicate_changed_path_overwrites() {
        let mut result = WeavingResult::new();
        result.add_changed(changed("a.php", "rule:one", 1));
        result.add_changed(changed("a.php", "rule:two", 2));

        assert_eq!(result.changed_count(), 1);
        let file = result.changed_files().next().unwrap();
        assert_eq!(file.weaves[0].rule, "rule:two");
    }

    #[test]
    fn test_paths_never_in_both_sets() {
        let mut result = WeavingResult::new();
        result.add_changed(changed("a.php", "rule:one", 1));
        result.mark_unscannable(UnscannableFile::new("a.php", "parse error"));

        assert_eq!(result.changed_count(), 0);
        assert_eq!(result.unscannable_count(), 1);

        // And the other direction: unscannable first
        result.add_changed(changed("a.php", "rule:one", 1));
        assert_eq!(result.changed_count(), 0);
    }

    #[test]
    fn test_merge_disjoint_domains() {
        let mut a = WeavingResult::new();
        a.add_changed(changed("src/a.php", "rule:one", 3));
        a.mark_unscannable(UnscannableFile::new("src/broken.php", "parse error"));

        let mut b = WeavingResult::new();
        b.add_changed(changed(".htaccess", "rule:two", 1));

        let merged = a.merge(b);
        assert_eq!(merged.changed_count(), 2);
        assert_eq!(merged.unscannable_count(), 1);
        assert_eq!(merged.total_weaves(), 2);
    }

    #[test]
    fn test_merge_combines_weaves_for_shared_path() {
        let mut a = WeavingResult::new();
        a.add_changed(changed("a.php", "rule:one", 1));

        let mut b = WeavingResult::new();
        b.add_changed(ChangedFile {
            path: PathBuf::from("a.php"),
            weaves: vec![Weave::from("rule:two", 5)],
            new_content: "later content".to_string(),
        });

        let merged = a.merge(b);
        assert_eq!(merged.changed_count(), 1);
        let file = merged.changed_files().next().unwrap();
        assert_eq!(file.weaves.len(), 2);
        assert_eq!(file.weaves[0].rule, "rule:one");
        assert_eq!(file.weaves[1].rule, "rule:two");
        assert_eq!(file.new_content, "later content");
    }

    #[test]
    fn test_merge_keeps_disjointness() {
        let mut a = WeavingResult::new();
        a.add_changed(changed("a.php", "rule:one", 1));

        let mut b = WeavingResult::new();
        b.mark_unscannable(UnscannableFile::new("a.php", "render failed"));

        let merged = a.merge(b);
        assert_eq!(merged.changed_count(), 0);
        assert_eq!(merged.unscannable_count(), 1);
    }

    #[test]
    fn test_offset_to_line() {
        let source = "line1\nline2\nline3";
        assert_eq!(offset_to_line(source, 0), 1);
        assert_eq!(offset_to_line(source, 5), 1);
        assert_eq!(offset_to_line(source, 6), 2);
        assert_eq!(offset_to_line(source, 12), 3);
    }
}
