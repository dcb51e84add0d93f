use crate::bench::corpus::{CorpusDocument, DocumentId};
use crate::error::{Error, Result};
use crate::matcher::{Algorithm, MatcherOptions};
use crate::utils::progress::document_bar;
use crate::utils::{PatternId, PatternSet};
use serde::Serialize;
use std::time::{Duration, Instant};

/// A match located in a specific corpus document
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MatchEvent {
    pub pattern: PatternId,
    pub position: usize,
    pub document: DocumentId,
}

/// Matches found in one corpus document
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DocumentTally {
    pub name: String,
    pub matches: usize,
}

/// Outcome of one algorithm over one corpus
#[derive(Debug, Clone, Serialize)]
pub struct RunResult {
    pub algorithm: Algorithm,
    /// Build plus every scan
    #[serde(serialize_with = "serialize_secs")]
    pub elapsed: Duration,
    pub matches: usize,
    pub documents: Vec<DocumentTally>,
    /// Filled only when match recording is enabled
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub events: Vec<MatchEvent>,
}

fn serialize_secs<S: serde::Serializer>(d: &Duration, s: S) -> std::result::Result<S::Ok, S::Error> {
    s.serialize_f64(d.as_secs_f64())
}

fn serialize_error<S: serde::Serializer>(e: &Error, s: S) -> std::result::Result<S::Ok, S::Error> {
    s.collect_str(e)
}

/// What happened to one algorithm in a comparison
#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum RunOutcome {
    Completed(RunResult),
    /// The engine could not be built or run; the other algorithms still ran
    Failed {
        algorithm: Algorithm,
        #[serde(serialize_with = "serialize_error")]
        error: Error,
    },
}

impl RunOutcome {
    pub fn algorithm(&self) -> Algorithm {
        match self {
            RunOutcome::Completed(result) => result.algorithm,
            RunOutcome::Failed { algorithm, .. } => *algorithm,
        }
    }

    pub fn result(&self) -> Option<&RunResult> {
        match self {
            RunOutcome::Completed(result) => Some(result),
            RunOutcome::Failed { .. } => None,
        }
    }

    pub fn error(&self) -> Option<&Error> {
        match self {
            RunOutcome::Completed(_) => None,
            RunOutcome::Failed { error, .. } => Some(error),
        }
    }
}

/// Harness settings that are not engine build options
#[derive(Debug, Clone, Copy, Default)]
pub struct RunOptions {
    pub matcher: MatcherOptions,
    /// Keep every match event in the result
    pub record_matches: bool,
    /// Hide the progress bar
    pub quiet: bool,
}

/// Build one engine and scan every document in order.
///
/// The timer covers the build and all scans. Reading the corpus happens
/// before this is called.
pub fn run_algorithm(
    algorithm: Algorithm,
    patterns: &PatternSet,
    corpus: &[CorpusDocument],
    options: &RunOptions,
) -> Result<RunResult> {
    let progress = document_bar(corpus.len(), options.quiet);
    progress.set_message(algorithm.name());

    let start = Instant::now();
    let matcher = algorithm.build(patterns, &options.matcher)?;

    let mut documents = Vec::with_capacity(corpus.len());
    let mut events = Vec::new();
    let mut total = 0usize;

    for (doc_id, doc) in corpus.iter().enumerate() {
        let found = if options.record_matches {
            let found = matcher.find_all(&doc.text);
            for m in &found {
                tracing::trace!(
                    algorithm = algorithm.name(),
                    pattern = m.pattern,
                    position = m.start,
                    document = %doc.name,
                    "match"
                );
            }
            let count = found.len();
            events.extend(found.into_iter().map(|m| MatchEvent {
                pattern: m.pattern,
                position: m.start,
                document: doc_id,
            }));
            count
        } else {
            matcher.count(&doc.text)
        };

        total += found;
        documents.push(DocumentTally {
            name: doc.name.clone(),
            matches: found,
        });
        progress.inc(1);
    }

    let elapsed = start.elapsed();
    progress.finish_and_clear();

    tracing::debug!(
        algorithm = algorithm.name(),
        matches = total,
        elapsed_ms = elapsed.as_secs_f64() * 1000.0,
        "run complete"
    );

    Ok(RunResult {
        algorithm,
        elapsed,
        matches: total,
        documents,
        events,
    })
}

/// Run each algorithm in turn over the same inputs.
///
/// Runs are sequential so timings do not compete for the CPU. A failure
/// ends only that algorithm's run; the rest still report.
pub fn run_all(
    algorithms: &[Algorithm],
    patterns: &PatternSet,
    corpus: &[CorpusDocument],
    options: &RunOptions,
) -> Vec<RunOutcome> {
    algorithms
        .iter()
        .map(|&algorithm| match run_algorithm(algorithm, patterns, corpus, options) {
            Ok(result) => RunOutcome::Completed(result),
            Err(error) => {
                tracing::debug!(algorithm = algorithm.name(), %error, "run failed");
                RunOutcome::Failed { algorithm, error }
            }
        })
        .collect()
}

/// True when every completed run reports the same total
pub fn counts_agree(outcomes: &[RunOutcome]) -> bool {
    let mut totals = outcomes.iter().filter_map(RunOutcome::result).map(|r| r.matches);
    match totals.next() {
        Some(first) => totals.all(|m| m == first),
        None => true,
    }
}
