//! Rabin-Karp multi-pattern search.
//!
//! Every pattern is fingerprinted with a polynomial hash
//! `h(s) = s[0]*B^(k-1) + ... + s[k-1] (mod M)`. The text is scanned with a
//! rolling window of width k whose hash is updated in O(1) per byte. A hash
//! hit is only a candidate: the window is compared byte-for-byte with every
//! pattern in the bucket, so collisions never produce false matches.

use crate::error::{Error, Result};
use crate::matcher::types::{Algorithm, Matcher, PatternMatch};
use crate::utils::{PatternId, PatternSet};
use ahash::AHashMap;
use serde::{Deserialize, Serialize};

/// Mersenne prime 2^61 - 1
pub const DEFAULT_MODULUS: u64 = (1 << 61) - 1;
pub const DEFAULT_BASE: u64 = 257;
/// Keeps `hash + modulus` from overflowing a u64
const MAX_MODULUS: u64 = 1 << 63;

/// Base and modulus of the polynomial hash. Pattern fingerprints and text
/// windows must be hashed with the same parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HashParams {
    pub base: u64,
    pub modulus: u64,
}

impl Default for HashParams {
    fn default() -> Self {
        Self {
            base: DEFAULT_BASE,
            modulus: DEFAULT_MODULUS,
        }
    }
}

impl HashParams {
    pub fn validate(&self) -> Result<()> {
        if self.modulus < 2 || self.modulus > MAX_MODULUS {
            return Err(Error::config(format!(
                "hash modulus must be in 2..={}, got {}",
                MAX_MODULUS, self.modulus
            )));
        }
        if self.base == 0 || self.base >= self.modulus {
            return Err(Error::config(format!(
                "hash base must be in 1..{}, got {}",
                self.modulus, self.base
            )));
        }
        Ok(())
    }

    #[inline]
    fn mul(&self, a: u64, b: u64) -> u64 {
        ((a as u128 * b as u128) % self.modulus as u128) as u64
    }

    /// Append one byte to a running hash
    #[inline]
    fn push(&self, hash: u64, byte: u8) -> u64 {
        ((self.mul(hash, self.base) as u128 + byte as u128) % self.modulus as u128) as u64
    }

    /// Hash of a whole byte string
    pub fn fingerprint(&self, bytes: &[u8]) -> u64 {
        bytes.iter().fold(0, |h, &b| self.push(h, b))
    }

    /// base^exp mod modulus
    fn pow(&self, mut exp: usize) -> u64 {
        let mut result = 1 % self.modulus;
        let mut base = self.base;
        while exp > 0 {
            if exp & 1 == 1 {
                result = self.mul(result, base);
            }
            base = self.mul(base, base);
            exp >>= 1;
        }
        result
    }
}

/// Rabin-Karp matcher over fixed-width patterns
pub struct RabinKarp {
    params: HashParams,
    width: usize,
    /// B^(width-1): weight of the byte leaving the window
    lead_weight: u64,
    buckets: AHashMap<u64, Vec<PatternId>>,
    /// Pattern bytes, `width` bytes per pattern, indexed by id
    contents: Vec<u8>,
}

impl RabinKarp {
    pub fn new(patterns: &PatternSet) -> Self {
        Self::build(patterns, HashParams::default())
    }

    pub fn with_params(patterns: &PatternSet, params: HashParams) -> Result<Self> {
        params.validate()?;
        Ok(Self::build(patterns, params))
    }

    fn build(patterns: &PatternSet, params: HashParams) -> Self {
        let width = patterns.width();
        let mut buckets: AHashMap<u64, Vec<PatternId>> = AHashMap::with_capacity(patterns.len());
        let mut contents = Vec::with_capacity(patterns.len() * width);

        for (id, pattern) in patterns.iter() {
            buckets
                .entry(params.fingerprint(pattern.bytes()))
                .or_default()
                .push(id);
            contents.extend_from_slice(pattern.bytes());
        }

        let shared = buckets.values().filter(|ids| ids.len() > 1).count();
        tracing::debug!(
            patterns = patterns.len(),
            fingerprints = buckets.len(),
            shared_buckets = shared,
            "built rabin-karp fingerprint table"
        );

        Self {
            params,
            width,
            lead_weight: params.pow(width.saturating_sub(1)),
            buckets,
            contents,
        }
    }

    pub fn params(&self) -> HashParams {
        self.params
    }

    #[inline]
    fn pattern(&self, id: PatternId) -> &[u8] {
        let start = id as usize * self.width;
        &self.contents[start..start + self.width]
    }

    /// Roll a width-k window across `text`, calling `on_match` for each
    /// verified (pattern, start).
    fn scan(&self, text: &[u8], mut on_match: impl FnMut(PatternId, usize)) {
        let k = self.width;
        if k == 0 || text.len() < k || self.buckets.is_empty() {
            return;
        }

        let m = self.params.modulus;
        let mut rejected = 0usize;
        let mut check = |hash: u64, start: usize| {
            if let Some(ids) = self.buckets.get(&hash) {
                let window = &text[start..start + k];
                for &id in ids {
                    if self.pattern(id) == window {
                        on_match(id, start);
                    } else {
                        rejected += 1;
                    }
                }
            }
        };

        let mut hash = self.params.fingerprint(&text[..k]);
        check(hash, 0);

        for end in k..text.len() {
            let leaving = self.params.mul(text[end - k] as u64 % m, self.lead_weight);
            hash = (hash + m - leaving) % m;
            hash = self.params.push(hash, text[end]);
            check(hash, end + 1 - k);
        }

        if rejected > 0 {
            tracing::trace!(rejected, "rabin-karp rejected colliding candidates");
        }
    }
}

impl Matcher for RabinKarp {
    fn algorithm(&self) -> Algorithm {
        Algorithm::RabinKarp
    }

    fn find_all(&self, text: &[u8]) -> Vec<PatternMatch> {
        let mut matches = Vec::new();
        self.scan(text, |pattern, start| matches.push(PatternMatch { pattern, start }));
        matches
    }

    fn count(&self, text: &[u8]) -> usize {
        let mut count = 0;
        self.scan(text, |_, _| count += 1);
        count
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rolling_hash_matches_direct_hash() {
        let params = HashParams::default();
        let text = b"the quick brown fox jumps over the lazy dog";
        let k = 7;
        let set = PatternSet::from_patterns([&text[10..17]]).unwrap();
        let m = RabinKarp::new(&set);
        assert_eq!(m.find_all(text), vec![PatternMatch { pattern: 0, start: 10 }]);

        // Every rolled hash must equal the hash computed from scratch
        let lead = params.pow(k - 1);
        let mut h = params.fingerprint(&text[..k]);
        for end in k..text.len() {
            h = (h + params.modulus - params.mul(text[end - k] as u64, lead)) % params.modulus;
            h = params.push(h, text[end]);
            assert_eq!(h, params.fingerprint(&text[end + 1 - k..=end]));
        }
    }

    #[test]
    fn test_example_offset() {
        let set = PatternSet::from_patterns(["abcd"]).unwrap();
        let m = RabinKarp::new(&set);
        assert_eq!(m.find_all(b"xxabcdxx"), vec![PatternMatch { pattern: 0, start: 2 }]);
    }

    #[test]
    fn test_collision_is_verified_away() {
        // A tiny modulus makes collisions easy to find
        let params = HashParams { base: 31, modulus: 101 };
        assert!(params.validate().is_ok());
        let target = *b"ab";
        let target_hash = params.fingerprint(&target);

        let mut twin = None;
        'search: for x in b'a'..=b'z' {
            for y in b'a'..=b'z' {
                let candidate = [x, y];
                if candidate != target && params.fingerprint(&candidate) == target_hash {
                    twin = Some(candidate);
                    break 'search;
                }
            }
        }
        let twin = twin.expect("a colliding two-letter pattern exists mod 101");

        let set = PatternSet::from_patterns([target, twin]).unwrap();
        let m = RabinKarp::with_params(&set, params).unwrap();
        assert_eq!(m.params(), params);
        assert_eq!(m.buckets.len(), 1);

        let mut text = b"zz".to_vec();
        text.extend_from_slice(&twin);
        text.extend_from_slice(b"zz");
        assert_eq!(m.find_all(&text), vec![PatternMatch { pattern: 1, start: 2 }]);
    }

    #[test]
    fn test_text_shorter_than_window() {
        let set = PatternSet::from_patterns(["abcd"]).unwrap();
        let m = RabinKarp::new(&set);
        assert!(m.find_all(b"abc").is_empty());
        assert_eq!(m.count(b""), 0);
    }

    #[test]
    fn test_empty_pattern_set() {
        let m = RabinKarp::new(&PatternSet::default());
        assert!(m.find_all(b"whatever").is_empty());
    }

    #[test]
    fn test_invalid_params_rejected() {
        let set = PatternSet::from_patterns(["ab"]).unwrap();
        assert!(RabinKarp::with_params(&set, HashParams { base: 10, modulus: 1 }).is_err());
        assert!(RabinKarp::with_params(&set, HashParams { base: 0, modulus: 97 }).is_err());
        assert!(RabinKarp::with_params(&set, HashParams { base: 97, modulus: 97 }).is_err());
    }

    #[test]
    fn test_high_bytes_with_small_modulus() {
        let params = HashParams { base: 3, modulus: 7 };
        let set = PatternSet::from_patterns([[0xffu8, 0xfe, 0x10]]).unwrap();
        let m = RabinKarp::with_params(&set, params).unwrap();
        let text = [0x00, 0xff, 0xfe, 0x10, 0xff, 0xfe, 0x10];
        assert_eq!(m.count(&text), 2);
    }
}
