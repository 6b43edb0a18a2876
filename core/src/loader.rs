//! Corpus ingestion with an on-disk cache of stemmed documents.
//!
//! A data directory holds `raw/` with files named `<title> <n>.txt`. The
//! first load stems every raw file and writes `stemmed/<title>.txt`, one line
//! of space-separated stems per non-empty source line. Later loads read the
//! cache instead.

use crate::config::EngineConfig;
use crate::corpus::TokenizedCorpus;
use crate::error::{Result, RetrievalError};
use crate::tokenizer::normalize_line;
use lazy_static::lazy_static;
use regex::Regex;
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

lazy_static! {
    static ref RAW_TITLE: Regex = Regex::new(r"^(.*) \d+\.txt$").expect("valid regex");
}

pub struct CorpusPaths {
    pub root: PathBuf,
}

impl CorpusPaths {
    pub fn new<P: AsRef<Path>>(root: P) -> Self {
        Self { root: root.as_ref().to_path_buf() }
    }
    pub fn raw(&self) -> PathBuf { self.root.join("raw") }
    pub fn stemmed(&self) -> PathBuf { self.root.join("stemmed") }
    fn staging(&self) -> PathBuf { self.root.join("stemmed.partial") }
}

/// Load the collection under `data_dir`, from the stem cache when present.
pub fn load_corpus<P: AsRef<Path>>(data_dir: P, config: &EngineConfig) -> Result<TokenizedCorpus> {
    let paths = CorpusPaths::new(data_dir);
    if !paths.root.is_dir() {
        return Err(RetrievalError::malformed_corpus(&paths.root, "data directory does not exist"));
    }
    let docs = if paths.stemmed().is_dir() {
        tracing::info!(dir = %paths.stemmed().display(), "reading stem cache");
        read_stemmed(&paths, config)?
    } else {
        tracing::info!(dir = %paths.raw().display(), "stemming raw documents");
        read_raw(&paths)?
    };
    let corpus = TokenizedCorpus::new(docs);
    tracing::info!(num_docs = corpus.len(), "corpus loaded");
    Ok(corpus)
}

/// Drop the stem cache so the next load re-stems the raw files.
/// Returns whether a cache existed.
pub fn clear_cache<P: AsRef<Path>>(data_dir: P) -> Result<bool> {
    let stemmed = CorpusPaths::new(data_dir).stemmed();
    if !stemmed.exists() {
        return Ok(false);
    }
    fs::remove_dir_all(&stemmed).map_err(|e| RetrievalError::io(&stemmed, e))?;
    Ok(true)
}

/// `.txt` files directly inside `dir`, hidden files skipped, sorted by name.
fn list_text_files(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for entry in WalkDir::new(dir).min_depth(1).max_depth(1).sort_by_file_name() {
        let entry = entry.map_err(|e| RetrievalError::io(dir, e.into()))?;
        if !entry.file_type().is_file() {
            continue;
        }
        let name = entry.file_name().to_string_lossy();
        if name.ends_with(".txt") && !name.starts_with('.') {
            files.push(entry.path().to_path_buf());
        }
    }
    Ok(files)
}

fn file_name(path: &Path) -> String {
    path.file_name().map(|n| n.to_string_lossy().into_owned()).unwrap_or_default()
}

fn read_raw(paths: &CorpusPaths) -> Result<Vec<(String, Vec<String>)>> {
    let raw_dir = paths.raw();
    if !raw_dir.is_dir() {
        let reason = "no raw/ directory and no stem cache";
        return Err(RetrievalError::malformed_corpus(&raw_dir, reason));
    }
    let files = list_text_files(&raw_dir)?;

    let staging = paths.staging();
    if staging.exists() {
        fs::remove_dir_all(&staging).map_err(|e| RetrievalError::io(&staging, e))?;
    }
    fs::create_dir_all(&staging).map_err(|e| RetrievalError::io(&staging, e))?;

    let total = files.len();
    let mut docs = Vec::with_capacity(total);
    let mut seen = HashSet::with_capacity(total);
    for (i, file) in files.iter().enumerate() {
        let name = file_name(file);
        let title = RAW_TITLE
            .captures(&name)
            .and_then(|c| c.get(1))
            .map(|m| m.as_str().to_string())
            .ok_or_else(|| {
                RetrievalError::malformed_corpus(file, "file name is not `<title> <n>.txt`")
            })?;
        // Each title owns one cache file.
        if !seen.insert(title.clone()) {
            let reason = format!("title {title:?} is used by more than one file");
            return Err(RetrievalError::malformed_corpus(file, reason));
        }
        tracing::debug!(doc = i + 1, total, %title, "stemming");

        let text = fs::read_to_string(file).map_err(|e| RetrievalError::io(file, e))?;
        let mut tokens = Vec::new();
        let mut cached = String::new();
        for line in text.lines() {
            let stems = normalize_line(line);
            if !stems.is_empty() {
                cached.push_str(&stems.join(" "));
                cached.push('\n');
            }
            tokens.extend(stems);
        }
        let out = staging.join(format!("{title}.txt"));
        fs::write(&out, cached).map_err(|e| RetrievalError::io(&out, e))?;
        docs.push((title, tokens));
    }

    // Publish the cache only once every file is written.
    let stemmed = paths.stemmed();
    fs::rename(&staging, &stemmed).map_err(|e| RetrievalError::io(&stemmed, e))?;
    Ok(docs)
}

fn read_stemmed(paths: &CorpusPaths, config: &EngineConfig) -> Result<Vec<(String, Vec<String>)>> {
    let dir = paths.stemmed();
    let files = list_text_files(&dir)?;
    if files.is_empty() {
        let reason = "cache holds no documents; remove it and re-run";
        return Err(RetrievalError::malformed_cache(&dir, reason));
    }
    if let Some(expected) = config.expected_documents {
        if files.len() != expected {
            return Err(RetrievalError::malformed_cache(
                &dir,
                format!(
                    "expected {expected} documents, found {}; remove it and re-run",
                    files.len()
                ),
            ));
        }
    }
    let raw_dir = paths.raw();
    if raw_dir.is_dir() {
        let raw_count = list_text_files(&raw_dir)?.len();
        if raw_count != files.len() {
            return Err(RetrievalError::malformed_cache(
                &dir,
                format!(
                    "{} cached documents for {raw_count} raw documents; remove it and re-run",
                    files.len()
                ),
            ));
        }
    }

    let mut docs = Vec::with_capacity(files.len());
    for file in &files {
        let name = file_name(file);
        let title = name.strip_suffix(".txt").unwrap_or(&name).to_string();
        let text = fs::read_to_string(file)
            .map_err(|e| RetrievalError::malformed_cache(file, format!("unreadable: {e}")))?;
        let tokens = text.split_whitespace().map(String::from).collect();
        docs.push((title, tokens));
    }
    Ok(docs)
}
