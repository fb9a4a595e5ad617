//! phpmend-rules: structural security hardening rules
//!
//! Available rules:
//! - phpmend:weak-prng: rand()/mt_rand() to random_int()
//! - phpmend:weak-hash: md5()/sha1() to hash('sha256', ...)
//! - phpmend:unsafe-unserialize: pin unserialize() to data-only payloads
//! - phpmend:ssl-peer-verification: restore CURLOPT_SSL_VERIFYPEER
//! - phpmend:echo-escape: escape echo output at analysis-flagged sites

pub mod analysis;
pub mod echo_escape;
pub mod registry;
pub mod ssl_verify;
pub mod unserialize;
pub mod weak_hash;
pub mod weak_prng;

pub use analysis::{AnalysisError, AnalysisFindings};
pub use registry::{assemble_rules, catalog};
