//! Commentz-Walter multi-pattern search.
//!
//! The patterns are inserted reversed into a trie, so a window is compared
//! right-to-left starting at its last byte. After each comparison the window
//! advances by a shift that can never skip an occurrence. Shifts combine
//! three tables:
//!
//! - `shift1(v)`: distance to the nearest other place the matched suffix
//!   `s(v)` occurs inside some pattern (a trie node whose reversed word has
//!   `w(v)` as a proper suffix).
//! - `shift2(v)`: distance to the nearest pattern whose prefix overlaps the
//!   matched suffix; taken as a minimum along the path from the root.
//! - `char(c)`: the smallest depth at which byte `c` labels a trie edge.
//!
//! For node `v` at depth `d` with mismatching byte `c`, the window moves by
//! `min(max(shift1(v), char(c) - d - 1), shift2(v))`. Every term is bounded
//! by the window width, which never exceeds the shortest pattern.
//!
//! The proper-suffix relation between trie nodes is exactly the failure
//! chain of an Aho-Corasick automaton built over the reversed words, so the
//! tables are filled by walking failure links. For `shift1` only the
//! immediate failure link matters: deeper chain members are already covered
//! by a closer node.

use crate::error::{Error, Result};
use crate::matcher::types::{Algorithm, Matcher, PatternMatch};
use crate::utils::{PatternId, PatternSet};
use rustc_hash::FxHashMap;
use std::collections::VecDeque;

type NodeId = u32;

const ROOT: NodeId = 0;
const NO_NODE: NodeId = u32::MAX;

/// Commentz-Walter matcher
pub struct CommentzWalter {
    /// Root edges, NO_NODE where absent
    root_row: Box<[NodeId; 256]>,
    goto: FxHashMap<(NodeId, u8), NodeId>,
    /// Patterns whose full reversal ends at this node
    output: Vec<Vec<PatternId>>,
    shift1: Vec<u32>,
    shift2: Vec<u32>,
    char_shift: Box<[u32; 256]>,
    window: usize,
}

impl CommentzWalter {
    /// Build with the window set to the shortest pattern.
    pub fn new(patterns: &PatternSet) -> Result<Self> {
        Self::with_min_window(patterns, None)
    }

    /// Build with an optional minimum window. Every pattern must be at least
    /// as long as the window; the pattern set must not be empty.
    pub fn with_min_window(patterns: &PatternSet, min_window: Option<usize>) -> Result<Self> {
        let shortest = patterns
            .iter()
            .map(|(_, p)| p.len())
            .min()
            .ok_or_else(|| Error::config("commentz-walter needs at least one pattern"))?;

        let window = match min_window {
            Some(0) => return Err(Error::config("minimum window must be positive")),
            Some(w) => {
                if let Some((id, p)) = patterns.iter().find(|(_, p)| p.len() < w) {
                    return Err(Error::config(format!(
                        "pattern {} has length {}, shorter than the minimum window {}",
                        id,
                        p.len(),
                        w
                    )));
                }
                w
            }
            None => shortest,
        };

        // Reversed trie
        let mut children: Vec<Vec<(u8, NodeId)>> = vec![Vec::new()];
        let mut parent: Vec<NodeId> = vec![NO_NODE];
        let mut label: Vec<u8> = vec![0];
        let mut depth: Vec<u32> = vec![0];
        let mut output: Vec<Vec<PatternId>> = vec![Vec::new()];

        for (id, pattern) in patterns.iter() {
            let mut node = ROOT;
            for &byte in pattern.bytes().iter().rev() {
                let existing = children[node as usize]
                    .iter()
                    .find(|&&(b, _)| b == byte)
                    .map(|&(_, t)| t);
                node = match existing {
                    Some(t) => t,
                    None => {
                        // Below the sentinel: PatternSet caps the summed pattern length
                        let t = children.len() as NodeId;
                        children[node as usize].push((byte, t));
                        children.push(Vec::new());
                        parent.push(node);
                        label.push(byte);
                        depth.push(depth[node as usize] + 1);
                        output.push(Vec::new());
                        t
                    }
                };
            }
            output[node as usize].push(id);
        }

        let num_nodes = children.len();
        let mut root_row = Box::new([NO_NODE; 256]);
        let mut goto = FxHashMap::default();
        goto.reserve(num_nodes.saturating_sub(1));
        for (node, edges) in children.iter().enumerate() {
            for &(byte, t) in edges {
                if node == ROOT as usize {
                    root_row[byte as usize] = t;
                } else {
                    goto.insert((node as NodeId, byte), t);
                }
            }
        }

        // Failure links in breadth-first order
        let mut order: Vec<NodeId> = Vec::with_capacity(num_nodes);
        let mut fail = vec![ROOT; num_nodes];
        let mut queue: VecDeque<NodeId> = children[ROOT as usize].iter().map(|&(_, t)| t).collect();
        while let Some(node) = queue.pop_front() {
            order.push(node);
            for &(byte, t) in &children[node as usize] {
                let mut f = fail[node as usize];
                fail[t as usize] = loop {
                    let next = if f == ROOT {
                        root_row[byte as usize]
                    } else {
                        goto.get(&(f, byte)).copied().unwrap_or(NO_NODE)
                    };
                    if next != NO_NODE {
                        break next;
                    }
                    if f == ROOT {
                        break ROOT;
                    }
                    f = fail[f as usize];
                };
                queue.push_back(t);
            }
        }

        // Shift tables
        let w = window as u32;
        let mut shift1 = vec![w; num_nodes];
        let mut shift2 = vec![w; num_nodes];
        shift1[ROOT as usize] = 1;

        for &node in &order {
            let d = depth[node as usize];
            let f = fail[node as usize];
            if f != ROOT {
                let s = &mut shift1[f as usize];
                *s = (*s).min(d - depth[f as usize]);
            }
            if !output[node as usize].is_empty() {
                let mut u = f;
                while u != ROOT {
                    let s = &mut shift2[u as usize];
                    *s = (*s).min(d - depth[u as usize]);
                    u = fail[u as usize];
                }
            }
        }

        // shift2 is a minimum along the root path; parents precede children
        for &node in &order {
            let p = parent[node as usize];
            shift2[node as usize] = shift2[node as usize].min(shift2[p as usize]);
        }

        let mut char_shift = Box::new([w + 1; 256]);
        for &node in &order {
            let c = &mut char_shift[label[node as usize] as usize];
            *c = (*c).min(depth[node as usize]);
        }

        tracing::debug!(
            patterns = patterns.len(),
            nodes = num_nodes,
            window,
            min_shift2 = shift2.iter().min().copied().unwrap_or(0),
            "built commentz-walter trie"
        );

        Ok(Self {
            root_row,
            goto,
            output,
            shift1,
            shift2,
            char_shift,
            window,
        })
    }

    pub fn window(&self) -> usize {
        self.window
    }

    #[inline]
    fn child(&self, node: NodeId, byte: u8) -> NodeId {
        if node == ROOT {
            self.root_row[byte as usize]
        } else {
            self.goto.get(&(node, byte)).copied().unwrap_or(NO_NODE)
        }
    }

    /// Safe advance after stopping at `node` (depth `matched`) with
    /// `mismatch` being the byte that failed, if the text had one left
    #[inline]
    fn shift(&self, node: NodeId, matched: usize, mismatch: Option<u8>) -> usize {
        let s1 = self.shift1[node as usize] as usize;
        let s2 = self.shift2[node as usize] as usize;
        let by_char = match mismatch {
            Some(c) => (self.char_shift[c as usize] as usize).saturating_sub(matched + 1),
            None => 0,
        };
        s1.max(by_char).min(s2)
    }

    fn scan(&self, text: &[u8], mut on_match: impl FnMut(PatternId, usize)) {
        let w = self.window;
        if text.len() < w {
            return;
        }

        // `end` is the text position aligned with the last byte of every pattern
        let mut end = w - 1;
        while end < text.len() {
            let mut node = ROOT;
            let mut matched = 0usize;
            let mismatch = loop {
                for &id in &self.output[node as usize] {
                    on_match(id, end + 1 - matched);
                }
                if matched > end {
                    break None;
                }
                let byte = text[end - matched];
                let next = self.child(node, byte);
                if next == NO_NODE {
                    break Some(byte);
                }
                node = next;
                matched += 1;
            };
            end += self.shift(node, matched, mismatch);
        }
    }
}

impl Matcher for CommentzWalter {
    fn algorithm(&self) -> Algorithm {
        Algorithm::CommentzWalter
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
