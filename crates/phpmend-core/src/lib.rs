//! phpmend-core: the weaving engine for automated PHP security hardening
//!
//! This crate provides:
//! - `Edit` / `apply_edits()`: span-based code modification
//! - `Visitor`: trait for traversing the PHP AST
//! - `RulePolicy`: which rules are active for a run
//! - `ScopeFilter`: which files participate in a run
//! - `Rule` / `FileRule`: the structural and textual rule contracts
//! - `SourceWeaver` / `FileWeaver`: the two weaving passes
//! - `WeavingResult`: changed and unscannable files, with merge

mod edit;
pub mod policy;
pub mod rule;
pub mod scope;
pub mod visitor;
pub mod weave;
pub mod weaver;

pub use edit::{apply_edits, Edit, EditError};
pub use policy::{DefaultRuleSetting, PolicyError, RulePolicy};
pub use rule::{FileRule, Rule};
pub use scope::{ScopeError, ScopeFilter};
pub use visitor::{visit, Visitor};
pub use weave::{offset_to_line, ChangedFile, UnscannableFile, Weave, WeavingResult};
pub use weaver::{FileWeaver, SourceWeaver};
