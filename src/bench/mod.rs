//! Benchmark harness: configuration, corpus loading, and timed runs.

pub mod config;
pub mod corpus;
pub mod run;

pub use config::BenchConfig;
pub use corpus::{load_corpus, read_document, CorpusDocument, DocumentId};
pub use run::{
    counts_agree, run_algorithm, run_all, DocumentTally, MatchEvent, RunOptions, RunOutcome, RunResult,
};
