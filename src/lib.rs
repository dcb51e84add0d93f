//! # shingle-bench - multi-pattern matcher comparison
//!
//! shingle-bench detects overlapping content between a query document and a
//! corpus by cutting the query into fixed-length k-shingles and searching the
//! corpus for exact occurrences. It runs the same search with several
//! multi-pattern algorithms and reports their match counts and wall-clock
//! cost side by side.
//!
//! ## Architecture
//!
//! - [`utils`] - shingle extraction and pattern sets
//! - [`matcher`] - the matching engines (Aho-Corasick, Rabin-Karp, Commentz-Walter)
//! - [`bench`] - configuration, corpus loading and timed runs
//! - [`output`] - human readable and JSON reports
//! - [`error`] - library error type
//!
//! ## Quick Start
//!
//! ```
//! use shingle_bench::matcher::{Algorithm, MatcherOptions};
//! use shingle_bench::utils::{DuplicatePolicy, PatternSet};
//!
//! let patterns = PatternSet::from_text(b"abcdeabcf", 4, DuplicatePolicy::Collapse).unwrap();
//! let matcher = Algorithm::CommentzWalter
//!     .build(&patterns, &MatcherOptions::default())
//!     .unwrap();
//!
//! let found = matcher.find_all(b"xxabcdxx");
//! assert_eq!(found.len(), 1);
//! assert_eq!(found[0].start, 2);
//! ```

pub mod bench;
pub mod error;
pub mod matcher;
pub mod output;
pub mod utils;

pub use error::{Error, Result};
