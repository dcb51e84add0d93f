use crate::error::{Error, Result};
use globset::{Glob, GlobSet, GlobSetBuilder};
use ignore::WalkBuilder;
use rayon::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};

/// Index of a document within a loaded corpus
pub type DocumentId = usize;

/// A corpus file flattened to one line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CorpusDocument {
    pub name: String,
    pub text: Vec<u8>,
}

impl CorpusDocument {
    /// In-memory document (mainly for tests and benchmarks)
    pub fn from_text(name: impl Into<String>, text: impl Into<Vec<u8>>) -> Self {
        Self {
            name: name.into(),
            text: text.into(),
        }
    }
}

/// Remove every `\n` and `\r`, joining lines end to end
pub fn strip_newlines(content: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(content.len());
    let mut last = 0;
    for pos in memchr::memchr2_iter(b'\n', b'\r', content) {
        out.extend_from_slice(&content[last..pos]);
        last = pos + 1;
    }
    out.extend_from_slice(&content[last..]);
    out
}

/// Read a whole file and strip its line terminators
pub fn read_document(path: &Path) -> Result<Vec<u8>> {
    let content = fs::read(path).map_err(|source| Error::Input {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(strip_newlines(&content))
}

fn build_globset(globs: &[String]) -> Result<Option<GlobSet>> {
    if globs.is_empty() {
        return Ok(None);
    }
    let mut builder = GlobSetBuilder::new();
    for glob in globs {
        let glob = Glob::new(glob)
            .map_err(|e| Error::config(format!("invalid corpus glob `{}`: {}", glob, e)))?;
        builder.add(glob);
    }
    builder
        .build()
        .map(Some)
        .map_err(|e| Error::config(format!("invalid corpus globs: {}", e)))
}

/// List the regular files directly inside `dir`, sorted by name.
///
/// Fails if `dir` is not a directory. Subdirectories are not descended.
pub fn files_in_directory(dir: &Path, globs: &[String]) -> Result<Vec<PathBuf>> {
    if !dir.is_dir() {
        return Err(Error::InvalidInput {
            path: dir.to_path_buf(),
            message: "not a directory".to_string(),
        });
    }
    let filter = build_globset(globs)?;

    let walker = WalkBuilder::new(dir)
        .standard_filters(false)
        .follow_links(true)
        .max_depth(Some(1))
        .build();

    let mut files = Vec::new();
    for entry in walker {
        let entry = entry.map_err(|e| Error::InvalidInput {
            path: dir.to_path_buf(),
            message: e.to_string(),
        })?;
        if entry.depth() == 0 || !entry.file_type().is_some_and(|t| t.is_file()) {
            continue;
        }
        if let Some(ref set) = filter {
            if !set.is_match(entry.file_name()) {
                continue;
            }
        }
        files.push(entry.into_path());
    }

    files.sort();
    Ok(files)
}

/// Enumerate and read a corpus directory.
///
/// Files are read in parallel but returned in name order. Any unreadable
/// file fails the whole load.
pub fn load_corpus(dir: &Path, globs: &[String]) -> Result<Vec<CorpusDocument>> {
    let files = files_in_directory(dir, globs)?;

    let documents: Vec<CorpusDocument> = files
        .into_par_iter()
        .map(|path| {
            let text = read_document(&path)?;
            let name = path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_else(|| path.display().to_string());
            Ok(CorpusDocument { name, text })
        })
        .collect::<Result<_>>()?;

    tracing::debug!(
        dir = %dir.display(),
        documents = documents.len(),
        bytes = documents.iter().map(|d| d.text.len()).sum::<usize>(),
        "loaded corpus"
    );

    Ok(documents)
}
