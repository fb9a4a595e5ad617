//! Span-based source code editing

use mago_database::file::FileId;
use mago_span::{Position, Span};
use thiserror::Error;

/// Errors that can occur during edit application
#[derive(Error, Debug)]
pub enum EditError {
    #[error("Overlapping edits detected at offset {0}")]
    OverlappingEdits(usize),

    #[error("Edit span {start}..{end} out of bounds for source length {len}")]
    SpanOutOfBounds { start: usize, end: usize, len: usize },
}

/// A single code edit, tagged with the rule that produced it
#[derive(Debug, Clone)]
pub struct Edit {
    /// The source span to replace
    pub span: Span,
    /// The replacement text
    pub replacement: String,
    /// Identifier of the rule that proposed this edit
    pub rule: &'static str,
    /// Human-readable description of the edit
    pub message: String,
}

impl Edit {
    /// Create a new edit from an AST span
    pub fn new(
        span: Span,
        replacement: impl Into<String>,
        rule: &'static str,
        message: impl Into<String>,
    ) -> Self {
        Self {
            span,
            replacement: replacement.into(),
            rule,
            message: message.into(),
        }
    }

    /// Create an edit from raw byte offsets. Used by pattern rules that
    /// operate on text without a parsed file behind it.
    pub fn at_offsets(
        start: usize,
        end: usize,
        replacement: impl Into<String>,
        rule: &'static str,
        message: impl Into<String>,
    ) -> Self {
        let span = Span::new(
            FileId::zero(),
            Position::new(start as u32),
            Position::new(end as u32),
        );
        Self::new(span, replacement, rule, message)
    }

    /// Get the byte offset where this edit starts
    pub fn start_offset(&self) -> usize {
        self.span.start.offset as usize
    }

    /// Get the byte offset where this edit ends
    pub fn end_offset(&self) -> usize {
        self.span.end.offset as usize
    }
}

/// Apply edits to source code.
///
/// Edits are applied in reverse order (from end to start) to maintain
/// valid offsets throughout the process.
///
/// # Returns
/// * `Ok(String)` - The modified source code
/// * `Err(EditError)` - If edits overlap or are out of bounds
pub fn apply_edits(source: &str, edits: &[Edit]) -> Result<String, EditError> {
    if edits.is_empty() {
        return Ok(source.to_string());
    }

    // Sort edits by start position (descending) for safe replacement
    let mut sorted_edits: Vec<&Edit> = edits.iter().collect();
    sorted_edits.sort_by(|a, b| b.start_offset().cmp(&a.start_offset()));

    // Validate: check for overlapping edits and bounds
    let source_len = source.len();
    let mut prev_start: Option<usize> = None;

    for edit in &sorted_edits {
        let start = edit.start_offset();
        let end = edit.end_offset();

        if end > source_len {
            return Err(EditError::SpanOutOfBounds {
                start,
                end,
                len: source_len,
            });
        }

        if let Some(prev) = prev_start {
            if end > prev {
                return Err(EditError::OverlappingEdits(start));
            }
        }

        prev_start = Some(start);
    }

    // Apply edits from end to start
    let mut result = source.to_string();

    for edit in sorted_edits {
        result.replace_range(edit.start_offset()..edit.end_offset(), &edit.replacement);
    }

    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_span(start: u32, end: u32) -> Span {
        Span::new(FileId::zero(), Position::new(start), Position::new(end))
    }

    #[test]
    fn test_simple_replacement() {
        let source = "md5($input);";
        let edit = Edit::new(
            make_span(0, 11),
            "hash('sha256', $input)",
            "test:rule",
            "replace digest",
        );

        let result = apply_edits(source, &[edit]).unwrap();
        assert_eq!(result, "hash('sha256', $input);");
    }

    #[test]
    fn test_multiple_edits() {
        let source = "rand(); rand();";
        let edits = vec![
            Edit::new(make_span(0, 6), "random_int(0, 1)", "test:rule", "first"),
            Edit::new(make_span(8, 14), "random_int(0, 1)", "test:rule", "second"),
        ];

        let result = apply_edits(source, &edits).unwrap();
        assert_eq!(result, "random_int(0, 1); random_int(0, 1);");
    }

    #[test]
    fn test_empty_edits() {
        let source = "unchanged";
        let result = apply_edits(source, &[]).unwrap();
        assert_eq!(result, "unchanged");
    }

    #[test]
    fn test_out_of_bounds() {
        let source = "short";
        let edit = Edit::new(make_span(0, 100), "replacement", "test:rule", "oob");

        let result = apply_edits(source, &[edit]);
        assert!(matches!(result, Err(EditError::SpanOutOfBounds { .. })));
    }

    #[test]
    fn test_overlapping_edits_rejected() {
        let source = "abcdefgh";
        let edits = vec![
            Edit::new(make_span(0, 5), "x", "test:rule", "a"),
            Edit::new(make_span(3, 8), "y", "test:rule", "b"),
        ];

        let result = apply_edits(source, &edits);
        assert!(matches!(result, Err(EditError::OverlappingEdits(_))));
    }

    #[test]
    fn test_at_offsets() {
        let edit = Edit::at_offsets(2, 4, "", "test:rule", "strip");
        assert_eq!(edit.start_offset(), 2);
        assert_eq!(edit.end_offset(), 4);
    }
}
