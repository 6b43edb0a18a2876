use crate::error::{Result, RetrievalError};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

pub const DEFAULT_TOP_K: usize = 10;

/// What the query processor does with tokens that are empty after stripping
/// non-alphanumeric characters. Documents always drop them.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EmptyTokenPolicy {
    /// Keep the empty token; it stems to "" and matches nothing, so boolean
    /// and phrase queries containing it return no documents.
    #[default]
    Keep,
    /// Drop it, the same as document normalization.
    Drop,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Upper bound on ranked results; `min(top_k, N)` are returned.
    pub top_k: usize,
    pub empty_query_tokens: EmptyTokenPolicy,
    /// Exact number of files the stem cache must hold, if known.
    pub expected_documents: Option<usize>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            top_k: DEFAULT_TOP_K,
            empty_query_tokens: EmptyTokenPolicy::Keep,
            expected_documents: None,
        }
    }
}

impl EngineConfig {
    /// Read a JSON config file. Missing fields take their defaults.
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|e| RetrievalError::io(path, e))?;
        let invalid = |reason: String| RetrievalError::Config { path: path.to_path_buf(), reason };
        let cfg: EngineConfig = serde_json::from_str(&text).map_err(|e| invalid(e.to_string()))?;
        cfg.check().map_err(invalid)?;
        Ok(cfg)
    }

    /// Reject settings no engine can honor.
    pub fn validate(&self) -> Result<()> {
        self.check().map_err(RetrievalError::InvalidConfig)
    }

    fn check(&self) -> std::result::Result<(), String> {
        if self.top_k == 0 {
            return Err("top_k must be at least 1".into());
        }
        Ok(())
    }
}
