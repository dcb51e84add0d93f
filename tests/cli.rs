//! Integration tests running the shingle-bench binary against fixture corpora.

use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use tempfile::TempDir;

fn binary() -> PathBuf {
    PathBuf::from(env!("CARGO_BIN_EXE_shingle-bench"))
}

/// Query file plus a corpus directory with known content
struct Fixture {
    dir: TempDir,
}

impl Fixture {
    fn new() -> Self {
        let dir = TempDir::new().expect("Failed to create temp dir");
        fs::create_dir(dir.path().join("corpus")).unwrap();

        // Newlines are stripped before shingling, so "abcd\neabcf" == "abcdeabcf"
        fs::write(dir.path().join("query.txt"), "abcd\neabcf\n").unwrap();
        fs::write(dir.path().join("corpus").join("a.txt"), "xxab\ncdxx\n").unwrap();
        fs::write(dir.path().join("corpus").join("b.txt"), "nothing to see").unwrap();
        fs::write(dir.path().join("corpus").join("c.md"), "eabc deab").unwrap();

        Self { dir }
    }

    fn query(&self) -> PathBuf {
        self.dir.path().join("query.txt")
    }

    fn corpus(&self) -> PathBuf {
        self.dir.path().join("corpus")
    }

    fn run(&self, extra: &[&str]) -> Output {
        run_with(&self.query(), &self.corpus(), &[&["-k", "4"][..], extra].concat())
    }
}

fn run_with(query: &Path, corpus: &Path, args: &[&str]) -> Output {
    // Keep the user's config file out of the tests
    let config = tempfile::NamedTempFile::new().unwrap();
    fs::write(config.path(), "{}").unwrap();

    Command::new(binary())
        .arg(query)
        .arg(corpus)
        .arg("--quiet")
        .arg("--config")
        .arg(config.path())
        .args(args)
        .env("RUST_LOG", "off")
        .output()
        .expect("Failed to run shingle-bench")
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

fn json(output: &Output) -> serde_json::Value {
    serde_json::from_slice(&output.stdout).expect("stdout is JSON")
}

#[test]
fn test_reports_every_algorithm() {
    let fx = Fixture::new();
    let output = fx.run(&[]);
    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));

    let text = stdout(&output);
    assert!(text.contains("AHO-CORASICK"));
    assert!(text.contains("RABIN-KARP"));
    assert!(text.contains("COMMENTZ-WALTER"));
    // a.txt: abcd; c.md: eabc, deab
    assert_eq!(text.matches("TOTAL MATCHES: 3").count(), 3);
    assert!(text.contains("QUERY LENGTH: 9"));
    assert!(text.contains("All algorithms agree"));
}

#[test]
fn test_json_output() {
    let fx = Fixture::new();
    let output = fx.run(&["--json"]);
    assert!(output.status.success());

    let value = json(&output);
    assert_eq!(value["shingles"], 5);
    assert_eq!(value["patterns"], 5);
    assert_eq!(value["corpus_documents"], 3);

    let results = value["results"].as_array().unwrap();
    assert_eq!(results.len(), 3);
    for result in results {
        assert_eq!(result["matches"], 3);
        assert!(result["elapsed"].as_f64().unwrap() >= 0.0);
        let per_doc: Vec<u64> = result["documents"]
            .as_array()
            .unwrap()
            .iter()
            .map(|d| d["matches"].as_u64().unwrap())
            .collect();
        assert_eq!(per_doc, vec![1, 0, 2]);
    }
}

#[test]
fn test_single_algorithm_and_glob() {
    let fx = Fixture::new();
    let output = fx.run(&["-a", "commentz-walter", "--glob", "*.txt", "--json"]);
    assert!(output.status.success());

    let value = json(&output);
    let results = value["results"].as_array().unwrap();
    assert_eq!(results.len(), 1);
    assert_eq!(results[0]["algorithm"], "commentz-walter");
    assert_eq!(results[0]["matches"], 1);
    assert_eq!(value["corpus_documents"], 2);
}

#[test]
fn test_show_matches() {
    let fx = Fixture::new();
    let output = fx.run(&["-a", "aho-corasick", "--show-matches"]);
    assert!(output.status.success());
    assert!(stdout(&output).contains("a.txt:2: pattern 0"));
}

#[test]
fn test_duplicate_policy_flag() {
    let dir = TempDir::new().unwrap();
    fs::create_dir(dir.path().join("corpus")).unwrap();
    fs::write(dir.path().join("query.txt"), "abcdabcd!").unwrap();
    fs::write(dir.path().join("corpus").join("doc.txt"), "abcd").unwrap();

    let query = dir.path().join("query.txt");
    let corpus = dir.path().join("corpus");

    let collapse = json(&run_with(&query, &corpus, &["-k", "4", "-a", "rabin-karp", "--json"]));
    let keep = json(&run_with(
        &query,
        &corpus,
        &["-k", "4", "-a", "rabin-karp", "--duplicates", "keep", "--json"],
    ));

    assert_eq!(collapse["results"][0]["matches"], 1);
    assert_eq!(keep["results"][0]["matches"], 2);
}

#[test]
fn test_empty_corpus_is_valid() {
    let fx = Fixture::new();
    let empty = fx.dir.path().join("empty");
    fs::create_dir(&empty).unwrap();

    let output = run_with(&fx.query(), &empty, &["-k", "4", "--json"]);
    assert!(output.status.success());
    for result in json(&output)["results"].as_array().unwrap() {
        assert_eq!(result["matches"], 0);
    }
}

#[test]
fn test_corpus_not_a_directory_fails() {
    let fx = Fixture::new();
    let output = run_with(&fx.query(), &fx.query(), &["-k", "4"]);
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("not a directory"), "{}", stderr);
    assert!(stderr.contains("query.txt"), "{}", stderr);
}

#[test]
fn test_missing_query_fails() {
    let fx = Fixture::new();
    let missing = fx.dir.path().join("nope.txt");
    let output = run_with(&missing, &fx.corpus(), &["-k", "4"]);
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("nope.txt"));
}

#[test]
fn test_zero_shingle_length_fails() {
    let fx = Fixture::new();
    let output = run_with(&fx.query(), &fx.corpus(), &["-k", "0"]);
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("shingle length"));
}

#[test]
fn test_short_query_fails_only_for_commentz_walter() {
    let fx = Fixture::new();
    fs::write(fx.dir.path().join("tiny.txt"), "abc").unwrap();
    let tiny = fx.dir.path().join("tiny.txt");

    let ok = run_with(
        &tiny,
        &fx.corpus(),
        &["-k", "4", "-a", "aho-corasick", "-a", "rabin-karp", "--json"],
    );
    assert!(ok.status.success());

    let err = run_with(&tiny, &fx.corpus(), &["-k", "4", "-a", "commentz-walter"]);
    assert!(!err.status.success());
}

#[test]
fn test_failed_algorithm_keeps_other_reports() {
    let fx = Fixture::new();
    fs::write(fx.dir.path().join("tiny.txt"), "abc").unwrap();
    let tiny = fx.dir.path().join("tiny.txt");

    // Default algorithm set: commentz-walter cannot build from no patterns
    let output = run_with(&tiny, &fx.corpus(), &["-k", "4"]);
    assert!(!output.status.success());

    let text = stdout(&output);
    assert!(text.contains("AHO-CORASICK"), "{}", text);
    assert!(text.contains("RABIN-KARP"), "{}", text);
    assert_eq!(text.matches("TOTAL MATCHES: 0").count(), 2);
    assert!(text.contains("FAILED: configuration error"), "{}", text);
    assert!(String::from_utf8_lossy(&output.stderr).contains("1 of 3 algorithms failed"));

    let output = run_with(&tiny, &fx.corpus(), &["-k", "4", "--json"]);
    assert!(!output.status.success());
    let value = json(&output);
    let results = value["results"].as_array().unwrap();
    assert_eq!(results.len(), 3);
    assert_eq!(results[0]["matches"], 0);
    assert_eq!(results[1]["matches"], 0);
    assert_eq!(results[2]["algorithm"], "commentz-walter");
    assert!(results[2]["error"].as_str().unwrap().contains("at least one pattern"));
}
