use crate::error::{Error, Result};
use ahash::AHashMap;
use serde::{Deserialize, Serialize};

/// Index of a pattern inside a [`PatternSet`]
pub type PatternId = u32;

/// Upper bound on the summed length of a pattern set. Engines number trie
/// states and pattern ids with `u32` and reserve `u32::MAX` as a sentinel, so
/// every state (root included) must fit below it.
pub const MAX_PATTERN_BYTES: usize = u32::MAX as usize - 2;

fn check_capacity(count: usize, width: usize) -> Result<()> {
    match count.checked_mul(width) {
        Some(total) if total <= MAX_PATTERN_BYTES => Ok(()),
        _ => Err(Error::config(format!(
            "{} patterns of length {} exceed the {} byte limit",
            count, width, MAX_PATTERN_BYTES
        ))),
    }
}

/// A k-byte window of a document together with its starting offset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Shingle<'a> {
    pub origin: usize,
    pub bytes: &'a [u8],
}

/// Extract the k-shingles of `text` in offset order.
///
/// A window is only emitted when it ends strictly before the end of the text,
/// so the last start offset is `len - k - 1` and the result holds
/// `len.saturating_sub(k)` shingles. A text no longer than `k` yields nothing.
pub fn extract_shingles(text: &[u8], k: usize) -> Vec<Shingle<'_>> {
    if k == 0 || text.len() <= k {
        return Vec::new();
    }

    text.windows(k)
        .take(text.len() - k)
        .enumerate()
        .map(|(origin, bytes)| Shingle { origin, bytes })
        .collect()
}

/// How identical shingle contents are turned into patterns
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DuplicatePolicy {
    /// One pattern per distinct content, carrying every origin offset
    #[default]
    Collapse,
    /// One pattern per shingle; repeated content is reported once per copy
    Keep,
}

/// A search pattern and the query offsets it was taken from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pattern {
    bytes: Vec<u8>,
    origins: Vec<usize>,
}

impl Pattern {
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Offsets in the query document where this content starts
    pub fn origins(&self) -> &[usize] {
        &self.origins
    }
}

/// The fixed, fully known set of patterns handed to an engine's build step.
///
/// All patterns share one length (the shingle width). The set never changes
/// once built.
#[derive(Debug, Clone, Default)]
pub struct PatternSet {
    patterns: Vec<Pattern>,
    width: usize,
}

impl PatternSet {
    /// Build a pattern set from shingles, applying the duplicate policy.
    /// Patterns keep first-occurrence order.
    ///
    /// Fails if the patterns together exceed [`MAX_PATTERN_BYTES`].
    pub fn from_shingles(shingles: &[Shingle<'_>], policy: DuplicatePolicy) -> Result<Self> {
        let width = shingles.first().map(|s| s.bytes.len()).unwrap_or(0);

        let patterns = match policy {
            DuplicatePolicy::Keep => shingles
                .iter()
                .map(|s| Pattern {
                    bytes: s.bytes.to_vec(),
                    origins: vec![s.origin],
                })
                .collect(),
            DuplicatePolicy::Collapse => {
                let mut seen: AHashMap<&[u8], usize> = AHashMap::with_capacity(shingles.len());
                let mut patterns: Vec<Pattern> = Vec::new();
                for s in shingles {
                    match seen.get(s.bytes) {
                        Some(&idx) => patterns[idx].origins.push(s.origin),
                        None => {
                            seen.insert(s.bytes, patterns.len());
                            patterns.push(Pattern {
                                bytes: s.bytes.to_vec(),
                                origins: vec![s.origin],
                            });
                        }
                    }
                }
                patterns
            }
        };

        check_capacity(patterns.len(), width)?;
        Ok(Self { patterns, width })
    }

    /// Shingle a query text and build its pattern set in one step.
    pub fn from_text(text: &[u8], k: usize, policy: DuplicatePolicy) -> Result<Self> {
        if k == 0 {
            return Err(Error::config("shingle length must be positive"));
        }
        Self::from_shingles(&extract_shingles(text, k), policy)
    }

    /// Build a pattern set from explicit patterns (duplicates are kept).
    ///
    /// Fails if a pattern is empty or lengths differ.
    pub fn from_patterns<I, P>(patterns: I) -> Result<Self>
    where
        I: IntoIterator<Item = P>,
        P: AsRef<[u8]>,
    {
        let mut set = Self::default();
        for (idx, p) in patterns.into_iter().enumerate() {
            let bytes = p.as_ref();
            if bytes.is_empty() {
                return Err(Error::config(format!("pattern {} is empty", idx)));
            }
            if set.patterns.is_empty() {
                set.width = bytes.len();
            } else if bytes.len() != set.width {
                return Err(Error::config(format!(
                    "pattern {} has length {}, expected {}",
                    idx,
                    bytes.len(),
                    set.width
                )));
            }
            set.patterns.push(Pattern {
                bytes: bytes.to_vec(),
                origins: Vec::new(),
            });
        }
        check_capacity(set.patterns.len(), set.width)?;
        Ok(set)
    }

    pub fn len(&self) -> usize {
        self.patterns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }

    /// Common pattern length (0 for an empty set)
    pub fn width(&self) -> usize {
        self.width
    }

    pub fn get(&self, id: PatternId) -> Option<&Pattern> {
        self.patterns.get(id as usize)
    }

    pub fn iter(&self) -> impl Iterator<Item = (PatternId, &Pattern)> {
        self.patterns
            .iter()
            .enumerate()
            // Lossless: construction caps the set at MAX_PATTERN_BYTES
            .map(|(idx, p)| (idx as PatternId, p))
    }
}
