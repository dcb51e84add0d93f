//! Shared utilities.
//!
//! ## Modules
//!
//! - [`shingle`] - k-shingle extraction and pattern sets
//! - [`progress`] - progress bar that compiles away without the `progress` feature
//!
//! ```no_run
//! use shingle_bench::utils::{extract_shingles, DuplicatePolicy, PatternSet};
//!
//! // Sliding windows of width 4 that end before the last byte
//! let shingles = extract_shingles(b"abcdeabcf", 4);
//! // Returns: "abcd"@0, "bcde"@1, "cdea"@2, "deab"@3, "eabc"@4
//!
//! let patterns = PatternSet::from_shingles(&shingles, DuplicatePolicy::Collapse).unwrap();
//! ```

pub mod progress;
pub mod shingle;

pub use shingle::*;
