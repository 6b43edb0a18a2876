use crate::config::EngineConfig;
use crate::corpus::TokenizedCorpus;
use crate::error::Result;
use crate::index::{IndexedCorpus, Indexer};
use crate::retrieval::{boolean, phrase, ranked};
use crate::tokenizer;
use crate::weights::WeightTable;
use crate::DocId;
use std::collections::BTreeSet;

/// A fully built index with weights and document norms.
///
/// Immutable once constructed; share it behind an `Arc` to serve queries from
/// several threads.
#[derive(Debug, Clone)]
pub struct RetrievalEngine {
    corpus: IndexedCorpus,
    weights: WeightTable,
    norms: Vec<f64>,
    config: EngineConfig,
}

impl RetrievalEngine {
    /// Index and weight `corpus` in one step.
    pub fn build(corpus: TokenizedCorpus, config: EngineConfig) -> Result<Self> {
        Self::from_indexed(Indexer::build(corpus), config)
    }

    pub(crate) fn from_indexed(corpus: IndexedCorpus, config: EngineConfig) -> Result<Self> {
        config.validate()?;
        let weights = WeightTable::compute(corpus.index(), corpus.num_docs())?;
        let norms = ranked::document_norms(&corpus, &weights)?;
        Ok(Self { corpus, weights, norms, config })
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn corpus(&self) -> &IndexedCorpus {
        &self.corpus
    }

    pub fn weights(&self) -> &WeightTable {
        &self.weights
    }

    pub fn num_docs(&self) -> usize {
        self.corpus.num_docs()
    }

    pub fn title(&self, doc_id: DocId) -> Option<&str> {
        self.corpus.title(doc_id)
    }

    pub fn bag_of_words(&self, doc_id: DocId) -> Option<&BTreeSet<String>> {
        self.corpus.bag_of_words(doc_id)
    }

    /// Run the query normalization pipeline configured for this engine.
    pub fn process_query(&self, raw: &str) -> Vec<String> {
        tokenizer::process_query(raw, self.config.empty_query_tokens)
    }

    pub fn posting(&self, term: &str) -> Vec<DocId> {
        self.corpus.posting(term)
    }

    pub fn posting_unstemmed(&self, word: &str) -> Vec<DocId> {
        self.corpus.posting_unstemmed(word)
    }

    pub fn get_weight(&self, term: &str, doc_id: DocId) -> Result<f64> {
        self.weights.get(term, doc_id)
    }

    pub fn get_weight_unstemmed(&self, word: &str, doc_id: DocId) -> Result<f64> {
        self.weights.get(&tokenizer::stem(word), doc_id)
    }

    pub fn boolean_retrieve<S: AsRef<str>>(&self, query: &[S]) -> Vec<DocId> {
        boolean::retrieve(self.corpus.index(), query)
    }

    pub fn query_retrieve(&self, raw: &str) -> Vec<DocId> {
        let terms = self.process_query(raw);
        tracing::debug!(raw, ?terms, "boolean query");
        self.boolean_retrieve(&terms)
    }

    pub fn phrase_retrieve<S: AsRef<str>>(&self, query: &[S]) -> Vec<DocId> {
        phrase::retrieve(self.corpus.index(), query)
    }

    pub fn phrase_query_retrieve(&self, raw: &str) -> Vec<DocId> {
        let terms = self.process_query(raw);
        tracing::debug!(raw, ?terms, "phrase query");
        self.phrase_retrieve(&terms)
    }

    /// Top `min(top_k, N)` documents by cosine score.
    pub fn rank_retrieve<S: AsRef<str>>(&self, query: &[S]) -> Vec<(DocId, f64)> {
        ranked::retrieve(&self.weights, &self.norms, query, self.config.top_k)
    }

    pub fn query_rank(&self, raw: &str) -> Vec<(DocId, f64)> {
        let terms = self.process_query(raw);
        tracing::debug!(raw, ?terms, "ranked query");
        self.rank_retrieve(&terms)
    }
}
