//! Positional inverted index.
//!
//! Maps every term to the documents it occurs in and, per document, the
//! ascending token offsets of each occurrence. Built once from a
//! [`TokenizedCorpus`]; the ordered token sequences are not kept afterwards,
//! each document is reduced to its bag of words.

use crate::config::EngineConfig;
use crate::corpus::TokenizedCorpus;
use crate::engine::RetrievalEngine;
use crate::error::Result;
use crate::{DocId, Position};
use std::collections::{BTreeMap, BTreeSet, HashMap};

/// term → doc id → positions (strictly ascending, never empty).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InvertedIndex {
    terms: HashMap<String, BTreeMap<DocId, Vec<Position>>>,
}

impl InvertedIndex {
    fn add(&mut self, term: &str, doc_id: DocId, pos: Position) {
        self.terms.entry(term.to_string()).or_default().entry(doc_id).or_default().push(pos);
    }

    /// Sorted ids of the documents containing `term`; empty if unknown.
    pub fn posting(&self, term: &str) -> Vec<DocId> {
        self.terms.get(term).map(|docs| docs.keys().copied().collect()).unwrap_or_default()
    }

    /// Positions of `term` in `doc_id`; empty if it does not occur there.
    pub fn positions(&self, term: &str, doc_id: DocId) -> &[Position] {
        self.terms
            .get(term)
            .and_then(|docs| docs.get(&doc_id))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn doc_frequency(&self, term: &str) -> usize {
        self.terms.get(term).map_or(0, BTreeMap::len)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &BTreeMap<DocId, Vec<Position>>)> {
        self.terms.iter().map(|(t, docs)| (t.as_str(), docs))
    }

    pub fn num_terms(&self) -> usize {
        self.terms.len()
    }

    /// Total number of (term, doc) pairs.
    pub fn num_postings(&self) -> usize {
        self.terms.values().map(BTreeMap::len).sum()
    }
}

pub struct Indexer;

impl Indexer {
    /// Build the positional index, vocabulary and bag-of-words view.
    ///
    /// Deterministic: the same corpus always yields equal structures.
    pub fn build(corpus: TokenizedCorpus) -> IndexedCorpus {
        let docs = corpus.into_documents();
        let mut index = InvertedIndex::default();
        let mut titles = Vec::with_capacity(docs.len());

        for doc in docs {
            for (pos, term) in doc.tokens.iter().enumerate() {
                index.add(term, doc.id, pos as Position);
            }
            titles.push(doc.title);
        }

        let mut bags: Vec<BTreeSet<String>> = vec![BTreeSet::new(); titles.len()];
        for (term, postings) in index.iter() {
            for doc_id in postings.keys() {
                bags[*doc_id as usize].insert(term.to_string());
            }
        }
        let vocabulary: BTreeSet<String> = index.terms.keys().cloned().collect();

        tracing::info!(
            num_docs = titles.len(),
            num_terms = vocabulary.len(),
            num_postings = index.num_postings(),
            "built positional index"
        );
        IndexedCorpus { titles, vocabulary, index, bags }
    }
}

/// The collection after indexing: titles by id, the vocabulary, the
/// positional index and one bag of words per document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexedCorpus {
    titles: Vec<String>,
    vocabulary: BTreeSet<String>,
    index: InvertedIndex,
    bags: Vec<BTreeSet<String>>,
}

impl IndexedCorpus {
    pub fn num_docs(&self) -> usize {
        self.titles.len()
    }

    pub fn title(&self, doc_id: DocId) -> Option<&str> {
        self.titles.get(doc_id as usize).map(String::as_str)
    }

    pub fn titles(&self) -> &[String] {
        &self.titles
    }

    pub fn vocabulary(&self) -> &BTreeSet<String> {
        &self.vocabulary
    }

    pub fn index(&self) -> &InvertedIndex {
        &self.index
    }

    /// Distinct terms of a document; `None` for an unknown id.
    pub fn bag_of_words(&self, doc_id: DocId) -> Option<&BTreeSet<String>> {
        self.bags.get(doc_id as usize)
    }

    pub fn posting(&self, term: &str) -> Vec<DocId> {
        self.index.posting(term)
    }

    pub fn posting_unstemmed(&self, word: &str) -> Vec<DocId> {
        self.index.posting(&crate::tokenizer::stem(word))
    }

    /// Derive tf-idf weights with the default configuration.
    pub fn compute_weights(self) -> Result<RetrievalEngine> {
        self.compute_weights_with(EngineConfig::default())
    }

    pub fn compute_weights_with(self, config: EngineConfig) -> Result<RetrievalEngine> {
        RetrievalEngine::from_indexed(self, config)
    }
}
