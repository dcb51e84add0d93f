use crate::error::{Error, Result};
use crate::matcher::{Algorithm, HashParams, MatcherOptions};
use crate::matcher::rabin_karp::{DEFAULT_BASE, DEFAULT_MODULUS};
use crate::utils::DuplicatePolicy;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

const APP_NAME: &str = "shingle-bench";
const CONFIG_FILE: &str = "config.json";

/// Default shingle width
pub const DEFAULT_SHINGLE_LEN: usize = 30;

/// Benchmark configuration. Every field is optional in the JSON file;
/// missing fields take their defaults.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BenchConfig {
    /// Shingle width k
    #[serde(default = "default_shingle_len")]
    pub shingle_len: usize,

    /// Algorithms to run, in order
    #[serde(default = "default_algorithms")]
    pub algorithms: Vec<Algorithm>,

    /// What to do with shingles that share content
    #[serde(default)]
    pub duplicates: DuplicatePolicy,

    /// Minimum window for Commentz-Walter (None = shortest pattern)
    #[serde(default)]
    pub min_window: Option<usize>,

    #[serde(default = "default_hash_base")]
    pub hash_base: u64,

    #[serde(default = "default_hash_modulus")]
    pub hash_modulus: u64,

    /// Keep every match event for diagnostic output
    #[serde(default)]
    pub record_matches: bool,

    /// Only corpus files whose name matches one of these globs
    #[serde(default)]
    pub corpus_globs: Vec<String>,
}

fn default_shingle_len() -> usize {
    DEFAULT_SHINGLE_LEN
}

fn default_algorithms() -> Vec<Algorithm> {
    Algorithm::ALL.to_vec()
}

fn default_hash_base() -> u64 {
    DEFAULT_BASE
}

fn default_hash_modulus() -> u64 {
    DEFAULT_MODULUS
}

impl Default for BenchConfig {
    fn default() -> Self {
        Self {
            shingle_len: default_shingle_len(),
            algorithms: default_algorithms(),
            duplicates: DuplicatePolicy::default(),
            min_window: None,
            hash_base: default_hash_base(),
            hash_modulus: default_hash_modulus(),
            record_matches: false,
            corpus_globs: Vec::new(),
        }
    }
}

impl BenchConfig {
    /// Load config from an explicit file
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|source| Error::Input {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&content).map_err(|e| {
            Error::config(format!("failed to parse {}: {}", path.display(), e))
        })
    }

    /// Load config from the user config directory, or return defaults if
    /// there is no config file there
    pub fn load() -> Result<Self> {
        match get_config_path() {
            Some(path) if path.exists() => Self::load_from(&path),
            _ => Ok(Self::default()),
        }
    }

    /// Reject configurations no engine could run with
    pub fn validate(&self) -> Result<()> {
        if self.shingle_len == 0 {
            return Err(Error::config("shingle length must be positive"));
        }
        if self.algorithms.is_empty() {
            return Err(Error::config("no algorithms selected"));
        }
        if self.min_window == Some(0) {
            return Err(Error::config("minimum window must be positive"));
        }
        self.hash_params().validate()
    }

    pub fn hash_params(&self) -> HashParams {
        HashParams {
            base: self.hash_base,
            modulus: self.hash_modulus,
        }
    }

    pub fn matcher_options(&self) -> MatcherOptions {
        MatcherOptions {
            min_window: self.min_window,
            hash: self.hash_params(),
        }
    }
}

/// Path of the per-user config file, if the platform has a config directory
pub fn get_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join(APP_NAME).join(CONFIG_FILE))
}
