use crate::DocId;
use std::fmt;
use std::path::PathBuf;

pub type Result<T> = std::result::Result<T, RetrievalError>;

/// Why a direct weight lookup found nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WeightMiss {
    /// The term is not in the vocabulary.
    UnknownTerm,
    /// The document id is outside `0..N`.
    UnknownDocument,
    /// Both exist but the term never occurs in that document.
    NotCooccurring,
}

impl fmt::Display for WeightMiss {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            WeightMiss::UnknownTerm => "term is not in the vocabulary",
            WeightMiss::UnknownDocument => "document id is out of range",
            WeightMiss::NotCooccurring => "term does not occur in the document",
        };
        f.write_str(s)
    }
}

#[derive(thiserror::Error, Debug)]
pub enum RetrievalError {
    #[error("no weight for term {term:?} in document {doc}: {cause}")]
    NotWeighted { term: String, doc: DocId, cause: WeightMiss },

    #[error("degenerate collection: {0}")]
    DegenerateCollection(String),

    #[error("malformed stem cache at {}: {reason}", path.display())]
    MalformedCache { path: PathBuf, reason: String },

    #[error("malformed corpus at {}: {reason}", path.display())]
    MalformedCorpus { path: PathBuf, reason: String },

    #[error("failed to access {}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid configuration in {}: {reason}", path.display())]
    Config { path: PathBuf, reason: String },

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

impl RetrievalError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        RetrievalError::Io { path: path.into(), source }
    }

    pub(crate) fn malformed_cache(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        RetrievalError::MalformedCache { path: path.into(), reason: reason.into() }
    }

    pub(crate) fn malformed_corpus(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        RetrievalError::MalformedCorpus { path: path.into(), reason: reason.into() }
    }
}
