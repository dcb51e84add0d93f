//! Aho-Corasick automaton over byte patterns.
//!
//! Patterns are inserted into a trie, then failure links are computed
//! breadth-first so that each state points at the longest proper suffix of
//! its string that is also a trie state. A second "dictionary" link skips
//! straight to the next suffix state that ends a pattern, so a scan reports
//! every pattern ending at a position (not just the longest) in time
//! proportional to the number of matches.

use crate::matcher::types::{Algorithm, Matcher, PatternMatch};
use crate::utils::{PatternId, PatternSet};
use rustc_hash::FxHashMap;
use std::collections::VecDeque;

type StateId = u32;

const ROOT: StateId = 0;
const NO_STATE: StateId = u32::MAX;

/// Aho-Corasick matcher
pub struct AhoCorasick {
    /// Root transitions are dense; a missing edge loops back to the root
    root_row: Box<[StateId; 256]>,
    /// Non-root goto edges keyed by (state, byte)
    goto: FxHashMap<(StateId, u8), StateId>,
    fail: Vec<StateId>,
    /// Nearest proper-suffix state with a non-empty output, or NO_STATE
    dict: Vec<StateId>,
    /// Patterns whose last byte is this state
    output: Vec<Vec<PatternId>>,
    depth: Vec<u32>,
}

impl AhoCorasick {
    /// Build the automaton. An empty pattern set yields an automaton that
    /// never matches.
    pub fn new(patterns: &PatternSet) -> Self {
        let mut children: Vec<Vec<(u8, StateId)>> = vec![Vec::new()];
        let mut output: Vec<Vec<PatternId>> = vec![Vec::new()];
        let mut depth: Vec<u32> = vec![0];

        // Phase 1: trie
        for (id, pattern) in patterns.iter() {
            let mut state = ROOT;
            for &byte in pattern.bytes() {
                let existing = children[state as usize]
                    .iter()
                    .find(|&&(b, _)| b == byte)
                    .map(|&(_, t)| t);
                state = match existing {
                    Some(t) => t,
                    None => {
                        // Below the sentinel: PatternSet caps the summed pattern length
                        let t = children.len() as StateId;
                        children[state as usize].push((byte, t));
                        children.push(Vec::new());
                        output.push(Vec::new());
                        depth.push(depth[state as usize] + 1);
                        t
                    }
                };
            }
            output[state as usize].push(id);
        }

        let num_states = children.len();
        let mut root_row = Box::new([ROOT; 256]);
        let mut goto = FxHashMap::default();
        goto.reserve(num_states.saturating_sub(1));
        for (state, edges) in children.iter().enumerate() {
            for &(byte, t) in edges {
                if state == ROOT as usize {
                    root_row[byte as usize] = t;
                } else {
                    goto.insert((state as StateId, byte), t);
                }
            }
        }

        // Phase 2: failure and dictionary links, breadth-first
        let mut fail = vec![ROOT; num_states];
        let mut dict = vec![NO_STATE; num_states];
        let mut queue: VecDeque<StateId> = children[ROOT as usize].iter().map(|&(_, t)| t).collect();

        while let Some(state) = queue.pop_front() {
            for &(byte, t) in &children[state as usize] {
                let mut f = fail[state as usize];
                let target = loop {
                    if f == ROOT {
                        break root_row[byte as usize];
                    }
                    if let Some(&next) = goto.get(&(f, byte)) {
                        break next;
                    }
                    f = fail[f as usize];
                };
                fail[t as usize] = target;
                dict[t as usize] = if output[target as usize].is_empty() {
                    dict[target as usize]
                } else {
                    target
                };
                queue.push_back(t);
            }
        }

        tracing::debug!(
            patterns = patterns.len(),
            states = num_states,
            "built aho-corasick automaton"
        );

        Self {
            root_row,
            goto,
            fail,
            dict,
            output,
            depth,
        }
    }

    /// Number of trie states, root included
    pub fn state_count(&self) -> usize {
        self.fail.len()
    }

    #[inline]
    fn next_state(&self, mut state: StateId, byte: u8) -> StateId {
        loop {
            if state == ROOT {
                return self.root_row[byte as usize];
            }
            if let Some(&next) = self.goto.get(&(state, byte)) {
                return next;
            }
            state = self.fail[state as usize];
        }
    }

    /// Walk `text` once, calling `on_match` for each (state, end position)
    /// whose output is non-empty.
    #[inline]
    fn walk(&self, text: &[u8], mut on_match: impl FnMut(StateId, usize)) {
        let mut state = ROOT;
        for (pos, &byte) in text.iter().enumerate() {
            state = self.next_state(state, byte);
            let mut s = if self.output[state as usize].is_empty() {
                self.dict[state as usize]
            } else {
                state
            };
            while s != NO_STATE {
                on_match(s, pos);
                s = self.dict[s as usize];
            }
        }
    }
}

impl Matcher for AhoCorasick {
    fn algorithm(&self) -> Algorithm {
        Algorithm::AhoCorasick
    }

    fn find_all(&self, text: &[u8]) -> Vec<PatternMatch> {
        let mut matches = Vec::new();
        self.walk(text, |state, pos| {
            let start = pos + 1 - self.depth[state as usize] as usize;
            matches.extend(
                self.output[state as usize]
                    .iter()
                    .map(|&pattern| PatternMatch { pattern, start }),
            );
        });
        matches
    }

    fn count(&self, text: &[u8]) -> usize {
        let mut count = 0;
        self.walk(text, |state, _| count += self.output[state as usize].len());
        count
    }
}
