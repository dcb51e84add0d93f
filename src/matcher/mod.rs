//! Multi-pattern exact matching engines.
//!
//! All engines implement [`Matcher`] over the same [`PatternSet`]:
//!
//! - [`aho_corasick`] - trie with failure links, one pass over the text
//! - [`rabin_karp`] - rolling-hash fingerprints with exact verification
//! - [`commentz_walter`] - reversed trie with safe shift tables
//!
//! Given the same patterns and text, every engine reports the same set of
//! `(pattern, start)` occurrences; they differ only in how they find them.
//!
//! [`PatternSet`]: crate::utils::PatternSet

pub mod aho_corasick;
pub mod commentz_walter;
pub mod rabin_karp;
pub mod types;

pub use aho_corasick::AhoCorasick;
pub use commentz_walter::CommentzWalter;
pub use rabin_karp::{HashParams, RabinKarp};
pub use types::*;
