use crate::error::Result;
use crate::matcher::aho_corasick::AhoCorasick;
use crate::matcher::commentz_walter::CommentzWalter;
use crate::matcher::rabin_karp::{HashParams, RabinKarp};
use crate::utils::{PatternId, PatternSet};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Multi-pattern matching algorithm
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Algorithm {
    /// Trie with failure links, single left-to-right pass
    AhoCorasick,
    /// Rolling-hash fingerprints with exact verification
    RabinKarp,
    /// Reversed-pattern trie with safe shifts
    CommentzWalter,
}

impl Algorithm {
    pub const ALL: [Algorithm; 3] = [
        Algorithm::AhoCorasick,
        Algorithm::RabinKarp,
        Algorithm::CommentzWalter,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Algorithm::AhoCorasick => "aho-corasick",
            Algorithm::RabinKarp => "rabin-karp",
            Algorithm::CommentzWalter => "commentz-walter",
        }
    }

    /// Build this algorithm's matcher over a pattern set
    pub fn build(&self, patterns: &PatternSet, options: &MatcherOptions) -> Result<Box<dyn Matcher>> {
        Ok(match self {
            Algorithm::AhoCorasick => Box::new(AhoCorasick::new(patterns)),
            Algorithm::RabinKarp => Box::new(RabinKarp::with_params(patterns, options.hash)?),
            Algorithm::CommentzWalter => {
                Box::new(CommentzWalter::with_min_window(patterns, options.min_window)?)
            }
        })
    }
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Engine-specific build options
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MatcherOptions {
    /// Minimum window for Commentz-Walter; defaults to the shortest pattern
    pub min_window: Option<usize>,
    /// Rolling hash parameters for Rabin-Karp
    pub hash: HashParams,
}

/// One occurrence of a pattern in a scanned text
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct PatternMatch {
    pub pattern: PatternId,
    /// Offset of the first matched byte
    pub start: usize,
}

/// A built matcher. Scan state lives in each call, so one matcher can be
/// reused across documents (and threads).
pub trait Matcher: Send + Sync {
    fn algorithm(&self) -> Algorithm;

    /// Every occurrence in `text`, in order of position
    fn find_all(&self, text: &[u8]) -> Vec<PatternMatch>;

    /// Number of occurrences in `text`
    fn count(&self, text: &[u8]) -> usize {
        self.find_all(text).len()
    }
}
