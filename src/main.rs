use anyhow::{Context, Result};
use clap::Parser;
use shingle_bench::bench::{self, BenchConfig, RunOptions};
use shingle_bench::matcher::Algorithm;
use shingle_bench::output::{self, Report};
use shingle_bench::utils::{extract_shingles, DuplicatePolicy, PatternSet};
use std::io::IsTerminal;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "shingle-bench")]
#[command(about = "Compare multi-pattern matchers on k-shingle overlap detection")]
struct Cli {
    /// Query document to cut into shingles
    query: PathBuf,

    /// Directory of corpus documents to search
    corpus: PathBuf,

    /// Shingle length
    #[arg(short = 'k', long)]
    shingle_len: Option<usize>,

    /// Algorithm to run (repeatable; default: all)
    #[arg(short, long = "algorithm", value_name = "ALG", value_enum)]
    algorithms: Vec<AlgorithmArg>,

    /// How to treat shingles with identical content
    #[arg(long, value_enum)]
    duplicates: Option<DuplicateArg>,

    /// Minimum window for commentz-walter
    #[arg(long)]
    min_window: Option<usize>,

    /// Only corpus files whose name matches (repeatable)
    #[arg(long = "glob", value_name = "GLOB")]
    globs: Vec<String>,

    /// Config file (default: <config dir>/shingle-bench/config.json)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Print every match (document, position, pattern)
    #[arg(long)]
    show_matches: bool,

    /// Emit results as JSON
    #[arg(long)]
    json: bool,

    /// Hide progress bars
    #[arg(short, long)]
    quiet: bool,

    /// Raise log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

#[derive(Clone, Copy, clap::ValueEnum)]
enum AlgorithmArg {
    AhoCorasick,
    RabinKarp,
    CommentzWalter,
    All,
}

impl AlgorithmArg {
    /// None for `all`
    fn algorithm(self) -> Option<Algorithm> {
        match self {
            AlgorithmArg::AhoCorasick => Some(Algorithm::AhoCorasick),
            AlgorithmArg::RabinKarp => Some(Algorithm::RabinKarp),
            AlgorithmArg::CommentzWalter => Some(Algorithm::CommentzWalter),
            AlgorithmArg::All => None,
        }
    }
}

#[derive(Clone, Copy, clap::ValueEnum)]
enum DuplicateArg {
    Collapse,
    Keep,
}

impl From<DuplicateArg> for DuplicatePolicy {
    fn from(arg: DuplicateArg) -> Self {
        match arg {
            DuplicateArg::Collapse => DuplicatePolicy::Collapse,
            DuplicateArg::Keep => DuplicatePolicy::Keep,
        }
    }
}

fn init_logging(verbose: u8) {
    let default = match verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

/// Defaults, then config file, then command-line flags
fn resolve_config(cli: &Cli) -> Result<BenchConfig> {
    let mut config = match &cli.config {
        Some(path) => BenchConfig::load_from(path)?,
        None => BenchConfig::load()?,
    };

    if let Some(k) = cli.shingle_len {
        config.shingle_len = k;
    }
    if !cli.algorithms.is_empty() {
        config.algorithms = cli
            .algorithms
            .iter()
            .map(|a| a.algorithm())
            .collect::<Option<Vec<_>>>()
            .unwrap_or_else(|| Algorithm::ALL.to_vec());
    }
    if let Some(policy) = cli.duplicates {
        config.duplicates = policy.into();
    }
    if cli.min_window.is_some() {
        config.min_window = cli.min_window;
    }
    if !cli.globs.is_empty() {
        config.corpus_globs = cli.globs.clone();
    }
    if cli.show_matches {
        config.record_matches = true;
    }

    config.validate()?;
    Ok(config)
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let config = resolve_config(&cli).context("Invalid configuration")?;

    let query_text = bench::read_document(&cli.query).context("Failed to read query document")?;
    let shingles = extract_shingles(&query_text, config.shingle_len);
    let patterns = PatternSet::from_shingles(&shingles, config.duplicates)
        .context("Failed to build pattern set")?;

    let corpus = bench::load_corpus(&cli.corpus, &config.corpus_globs)
        .context("Failed to load corpus")?;

    let options = RunOptions {
        matcher: config.matcher_options(),
        record_matches: config.record_matches,
        quiet: cli.quiet || cli.json,
    };

    let results = bench::run_all(&config.algorithms, &patterns, &corpus, &options);

    let report = Report {
        query: cli.query.clone(),
        query_len: query_text.len(),
        shingle_len: config.shingle_len,
        shingles: shingles.len(),
        patterns: patterns.len(),
        corpus_documents: corpus.len(),
        results,
    };

    if cli.json {
        output::print_json(&report)?;
    } else {
        output::print_report(&report, &corpus, std::io::stdout().is_terminal())?;
    }

    let failures = report.failures();
    if failures > 0 {
        anyhow::bail!(
            "{} of {} algorithms failed",
            failures,
            report.results.len()
        );
    }

    Ok(())
}
