//! tf-idf weights for every (term, document) pair that co-occurs.
//!
//! `idf(t) = log10(N / df)` and `w(t, d) = (1 + log10(tf)) * idf(t)`, with
//! `tf` the number of stored positions. A term present in every document has
//! idf 0, which is a real weight and not a missing one.

use crate::error::{Result, RetrievalError, WeightMiss};
use crate::index::InvertedIndex;
use crate::DocId;
use std::collections::{BTreeMap, HashMap};

#[derive(Debug, Clone, PartialEq)]
pub struct WeightTable {
    num_docs: usize,
    idf: HashMap<String, f64>,
    weights: HashMap<String, BTreeMap<DocId, f64>>,
}

impl WeightTable {
    pub fn compute(index: &InvertedIndex, num_docs: usize) -> Result<Self> {
        if num_docs == 0 {
            return Err(RetrievalError::DegenerateCollection("collection has no documents".into()));
        }
        let n = num_docs as f64;
        let mut idf = HashMap::with_capacity(index.num_terms());
        let mut weights = HashMap::with_capacity(index.num_terms());

        for (term, postings) in index.iter() {
            let df = postings.len();
            if df == 0 {
                let reason = format!("term {term:?} has document frequency 0");
                return Err(RetrievalError::DegenerateCollection(reason));
            }
            let term_idf = (n / df as f64).log10();
            let mut per_doc = BTreeMap::new();
            for (doc_id, positions) in postings {
                if *doc_id as usize >= num_docs {
                    return Err(RetrievalError::DegenerateCollection(format!(
                        "term {term:?} posts to document {doc_id} outside 0..{num_docs}"
                    )));
                }
                let tf = positions.len() as f64;
                per_doc.insert(*doc_id, (1.0 + tf.log10()) * term_idf);
            }
            idf.insert(term.to_string(), term_idf);
            weights.insert(term.to_string(), per_doc);
        }

        tracing::info!(num_docs, num_terms = weights.len(), "computed tf-idf weights");
        Ok(Self { num_docs, idf, weights })
    }

    /// Weight of `term` in `doc_id`, failing with [`RetrievalError::NotWeighted`]
    /// when the pair has no entry.
    pub fn get(&self, term: &str, doc_id: DocId) -> Result<f64> {
        let miss =
            |cause| RetrievalError::NotWeighted { term: term.to_string(), doc: doc_id, cause };
        let per_doc = self.weights.get(term).ok_or_else(|| miss(WeightMiss::UnknownTerm))?;
        if doc_id as usize >= self.num_docs {
            return Err(miss(WeightMiss::UnknownDocument));
        }
        per_doc.get(&doc_id).copied().ok_or_else(|| miss(WeightMiss::NotCooccurring))
    }

    /// Weight if the pair co-occurs.
    pub fn weight(&self, term: &str, doc_id: DocId) -> Option<f64> {
        self.weights.get(term).and_then(|d| d.get(&doc_id)).copied()
    }

    /// All weighted documents for `term`, by ascending id.
    pub fn postings(&self, term: &str) -> Option<&BTreeMap<DocId, f64>> {
        self.weights.get(term)
    }

    pub fn idf(&self, term: &str) -> Option<f64> {
        self.idf.get(term).copied()
    }

    pub fn num_entries(&self) -> usize {
        self.weights.values().map(BTreeMap::len).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::corpus::TokenizedCorpus;
    use crate::index::Indexer;

    fn index_of(docs: &[&str]) -> InvertedIndex {
        let corpus = TokenizedCorpus::new(
            docs.iter().enumerate().map(|(i, body)| {
                (format!("d{i}"), body.split_whitespace().map(String::from).collect())
            }),
        );
        Indexer::build(corpus).index().clone()
    }

    #[test]
    fn applies_log_tf_times_idf() {
        let ix = index_of(&["a a a b", "b c", "c"]);
        let w = WeightTable::compute(&ix, 3).unwrap();
        let idf_a = (3.0f64).log10();
        assert!((w.get("a", 0).unwrap() - (1.0 + 3.0f64.log10()) * idf_a).abs() < 1e-12);
        let idf_b = (3.0f64 / 2.0).log10();
        assert!((w.get("b", 1).unwrap() - idf_b).abs() < 1e-12);
    }

    #[test]
    fn term_in_every_document_weighs_zero_not_missing() {
        let ix = index_of(&["x y", "x"]);
        let w = WeightTable::compute(&ix, 2).unwrap();
        assert_eq!(w.get("x", 1).unwrap(), 0.0);
        assert_eq!(w.idf("x"), Some(0.0));
    }

    #[test]
    fn empty_collection_is_degenerate() {
        let err = WeightTable::compute(&InvertedIndex::default(), 0).unwrap_err();
        assert!(matches!(err, RetrievalError::DegenerateCollection(_)));
    }

    #[test]
    fn lookup_misses_carry_their_cause() {
        let ix = index_of(&["x", "y"]);
        let w = WeightTable::compute(&ix, 2).unwrap();
        let cause = |r: Result<f64>| match r {
            Err(RetrievalError::NotWeighted { cause, .. }) => cause,
            other => panic!("expected NotWeighted, got {other:?}"),
        };
        assert_eq!(cause(w.get("zzz", 0)), WeightMiss::UnknownTerm);
        assert_eq!(cause(w.get("x", 1)), WeightMiss::NotCooccurring);
        assert_eq!(cause(w.get("x", 9)), WeightMiss::UnknownDocument);
    }

    #[test]
    fn domain_equals_index_domain() {
        let ix = index_of(&["a b a", "b c", "d"]);
        let w = WeightTable::compute(&ix, 3).unwrap();
        assert_eq!(w.num_entries(), ix.num_postings());
        for (term, postings) in ix.iter() {
            for doc in postings.keys() {
                assert!(w.weight(term, *doc).is_some());
            }
        }
    }
}
