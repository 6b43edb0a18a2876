//! Positional inverted index with tf-idf weighting and boolean, phrase and
//! cosine-ranked retrieval over a fixed document collection.
//!
//! The pipeline is split into stage types that consume each other:
//! [`TokenizedCorpus`] → [`IndexedCorpus`] → [`RetrievalEngine`]. Only the
//! last one answers queries, so a half-built index is never observable.

pub mod config;
pub mod corpus;
pub mod engine;
pub mod error;
pub mod index;
pub mod loader;
pub mod retrieval;
pub mod tokenizer;
pub mod weights;

pub use config::{EmptyTokenPolicy, EngineConfig};
pub use corpus::{Document, TokenizedCorpus};
pub use engine::RetrievalEngine;
pub use error::{Result, RetrievalError, WeightMiss};
pub use index::{IndexedCorpus, Indexer, InvertedIndex};
pub use weights::WeightTable;

pub type DocId = u32;
/// 0-based token offset inside a document.
pub type Position = u32;
