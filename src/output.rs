//! Output formatting for benchmark results

use crate::bench::{counts_agree, CorpusDocument, RunOutcome, RunResult};
use crate::error::Error;
use crate::matcher::Algorithm;
use serde::Serialize;
use std::io::{self, Write};
use std::path::PathBuf;
use termcolor::{Color, ColorChoice, ColorSpec, StandardStream, WriteColor};

/// Everything one invocation measured
#[derive(Debug, Serialize)]
pub struct Report {
    pub query: PathBuf,
    pub query_len: usize,
    pub shingle_len: usize,
    pub shingles: usize,
    pub patterns: usize,
    pub corpus_documents: usize,
    pub results: Vec<RunOutcome>,
}

impl Report {
    pub fn counts_agree(&self) -> bool {
        counts_agree(&self.results)
    }

    /// Number of algorithms that did not complete
    pub fn failures(&self) -> usize {
        self.results.iter().filter(|o| o.error().is_some()).count()
    }
}

/// Banner line for an algorithm, e.g. `####   AHO-CORASICK   ####`
pub fn banner(algorithm: Algorithm) -> String {
    let title = algorithm.name().to_uppercase();
    format!("#### {:^16} ####", title)
}

/// Print the report in human readable form
pub fn print_report(report: &Report, corpus: &[CorpusDocument], color: bool) -> io::Result<()> {
    let choice = if color {
        ColorChoice::Auto
    } else {
        ColorChoice::Never
    };
    let mut stdout = StandardStream::stdout(choice);
    write_report(&mut stdout, report, corpus)
}

/// Print the report as pretty JSON
pub fn print_json(report: &Report) -> io::Result<()> {
    let stdout = io::stdout();
    let mut lock = stdout.lock();
    serde_json::to_writer_pretty(&mut lock, report)?;
    writeln!(lock)
}

pub fn write_report<W: WriteColor>(
    out: &mut W,
    report: &Report,
    corpus: &[CorpusDocument],
) -> io::Result<()> {
    for outcome in &report.results {
        match outcome {
            RunOutcome::Completed(result) => {
                write_result(out, result)?;
                if !result.events.is_empty() {
                    write_match_events(out, result, corpus)?;
                }
            }
            RunOutcome::Failed { algorithm, error } => write_failure(out, *algorithm, error)?,
        }
    }

    writeln!(out)?;
    writeln!(out, "QUERY LENGTH: {}", report.query_len)?;
    writeln!(
        out,
        "SHINGLES: {} (k = {}), PATTERNS: {}",
        report.shingles, report.shingle_len, report.patterns
    )?;
    writeln!(out, "CORPUS DOCUMENTS: {}", report.corpus_documents)?;

    let completed = report.results.iter().filter(|o| o.result().is_some()).count();
    if completed > 1 {
        if report.counts_agree() {
            out.set_color(ColorSpec::new().set_fg(Some(Color::Green)))?;
            let which = if report.failures() > 0 { "Completed" } else { "All" };
            writeln!(out, "{} algorithms agree on the match count", which)?;
        } else {
            out.set_color(ColorSpec::new().set_fg(Some(Color::Red)).set_bold(true))?;
            writeln!(out, "Match counts differ between algorithms")?;
        }
        out.reset()?;
    }

    Ok(())
}

/// Banner, elapsed time and match total for one run
pub fn write_result<W: WriteColor>(out: &mut W, result: &RunResult) -> io::Result<()> {
    out.set_color(ColorSpec::new().set_fg(Some(Color::Cyan)).set_bold(true))?;
    writeln!(out, "{}", banner(result.algorithm))?;
    out.reset()?;

    writeln!(out, "ELAPSED TIME: {:.6}", result.elapsed.as_secs_f64())?;

    write!(out, "TOTAL MATCHES: ")?;
    out.set_color(ColorSpec::new().set_fg(Some(Color::Green)))?;
    writeln!(out, "{}", result.matches)?;
    out.reset()?;

    Ok(())
}

/// Banner and error line for an algorithm that did not complete
pub fn write_failure<W: WriteColor>(out: &mut W, algorithm: Algorithm, error: &Error) -> io::Result<()> {
    out.set_color(ColorSpec::new().set_fg(Some(Color::Cyan)).set_bold(true))?;
    writeln!(out, "{}", banner(algorithm))?;
    out.reset()?;

    out.set_color(ColorSpec::new().set_fg(Some(Color::Red)).set_bold(true))?;
    write!(out, "FAILED:")?;
    out.reset()?;
    writeln!(out, " {}", error)?;

    Ok(())
}

/// One line per match: `document:position: pattern N`
pub fn write_match_events<W: WriteColor>(
    out: &mut W,
    result: &RunResult,
    corpus: &[CorpusDocument],
) -> io::Result<()> {
    for event in &result.events {
        let name = corpus
            .get(event.document)
            .map(|d| d.name.as_str())
            .unwrap_or("?");

        out.set_color(ColorSpec::new().set_fg(Some(Color::Magenta)))?;
        write!(out, "{}", name)?;
        out.reset()?;
        write!(out, ":")?;
        out.set_color(ColorSpec::new().set_fg(Some(Color::Green)))?;
        write!(out, "{}", event.position)?;
        out.reset()?;
        writeln!(out, ": pattern {}", event.pattern)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bench::{DocumentId, MatchEvent};
    use std::time::Duration;
    use termcolor::Buffer;

    fn result(algorithm: Algorithm, matches: usize, events: Vec<MatchEvent>) -> RunResult {
        RunResult {
            algorithm,
            elapsed: Duration::from_millis(250),
            matches,
            documents: Vec::new(),
            events,
        }
    }

    fn report(results: Vec<RunResult>) -> Report {
        report_of(results.into_iter().map(RunOutcome::Completed).collect())
    }

    fn report_of(results: Vec<RunOutcome>) -> Report {
        Report {
            query: PathBuf::from("query.txt"),
            query_len: 9,
            shingle_len: 4,
            shingles: 5,
            patterns: 5,
            corpus_documents: 1,
            results,
        }
    }

    fn render(report: &Report, corpus: &[CorpusDocument]) -> String {
        let mut buf = Buffer::no_color();
        write_report(&mut buf, report, corpus).unwrap();
        String::from_utf8(buf.into_inner()).unwrap()
    }

    #[test]
    fn test_banner() {
        assert_eq!(banner(Algorithm::AhoCorasick), "####   AHO-CORASICK   ####");
        assert_eq!(banner(Algorithm::RabinKarp), "####    RABIN-KARP    ####");
    }

    #[test]
    fn test_report_lines() {
        let text = render(
            &report(vec![
                result(Algorithm::AhoCorasick, 1, Vec::new()),
                result(Algorithm::RabinKarp, 1, Vec::new()),
            ]),
            &[],
        );
        assert!(text.contains("ELAPSED TIME: 0.250000"));
        assert!(text.contains("TOTAL MATCHES: 1"));
        assert!(text.contains("QUERY LENGTH: 9"));
        assert!(text.contains("All algorithms agree"));
    }

    #[test]
    fn test_report_flags_disagreement() {
        let text = render(
            &report(vec![
                result(Algorithm::AhoCorasick, 1, Vec::new()),
                result(Algorithm::CommentzWalter, 2, Vec::new()),
            ]),
            &[],
        );
        assert!(text.contains("Match counts differ"));
    }

    #[test]
    fn test_failed_algorithm_is_reported_alongside_others() {
        let report = report_of(vec![
            RunOutcome::Completed(result(Algorithm::AhoCorasick, 0, Vec::new())),
            RunOutcome::Completed(result(Algorithm::RabinKarp, 0, Vec::new())),
            RunOutcome::Failed {
                algorithm: Algorithm::CommentzWalter,
                error: Error::config("commentz-walter needs at least one pattern"),
            },
        ]);
        assert_eq!(report.failures(), 1);

        let text = render(&report, &[]);
        assert!(text.contains("AHO-CORASICK"));
        assert!(text.contains("RABIN-KARP"));
        assert_eq!(text.matches("TOTAL MATCHES: 0").count(), 2);
        assert!(text.contains("COMMENTZ-WALTER"));
        assert!(text.contains("FAILED: configuration error: commentz-walter needs at least one pattern"));
        assert!(text.contains("Completed algorithms agree"));
    }

    #[test]
    fn test_match_events_name_documents() {
        let doc: DocumentId = 0;
        let events = vec![MatchEvent { pattern: 3, position: 2, document: doc }];
        let corpus = vec![CorpusDocument::from_text("notes.txt", "xxabcdxx")];
        let text = render(&report(vec![result(Algorithm::AhoCorasick, 1, events)]), &corpus);
        assert!(text.contains("notes.txt:2: pattern 3"));
    }
}
