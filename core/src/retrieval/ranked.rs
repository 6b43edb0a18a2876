//! Cosine ranking with a binary query vector.
//!
//! `score(d) = Σ_{t ∈ q} w(t, d) / ‖d‖`, where `‖d‖` is the euclidean norm of
//! the document's tf-idf vector over its bag of words. Empty documents score
//! 0.

use crate::error::{Result, RetrievalError};
use crate::index::IndexedCorpus;
use crate::weights::WeightTable;
use crate::DocId;
use std::cmp::Ordering;

/// Euclidean norm of every document's weight vector, indexed by doc id.
pub fn document_norms(corpus: &IndexedCorpus, weights: &WeightTable) -> Result<Vec<f64>> {
    let mut norms = Vec::with_capacity(corpus.num_docs());
    for doc_id in 0..corpus.num_docs() as DocId {
        let mut sum = 0.0f64;
        for term in corpus.bag_of_words(doc_id).into_iter().flatten() {
            let w = weights.weight(term, doc_id).ok_or_else(|| {
                let reason = format!("term {term:?} in document {doc_id} has no weight");
                RetrievalError::DegenerateCollection(reason)
            })?;
            sum += w * w;
        }
        norms.push(sum.sqrt());
    }
    Ok(norms)
}

/// The `min(top_k, N)` best documents, by descending score then ascending id.
///
/// Terms outside the vocabulary contribute nothing. A term repeated in the
/// query adds its document weight once per repetition.
pub fn retrieve<S: AsRef<str>>(
    weights: &WeightTable,
    norms: &[f64],
    query: &[S],
    top_k: usize,
) -> Vec<(DocId, f64)> {
    let mut dots = vec![0.0f64; norms.len()];
    for term in query {
        if let Some(postings) = weights.postings(term.as_ref()) {
            for (doc_id, w) in postings {
                if let Some(dot) = dots.get_mut(*doc_id as usize) {
                    *dot += w;
                }
            }
        }
    }

    let mut scored: Vec<(DocId, f64)> = dots
        .into_iter()
        .zip(norms)
        .enumerate()
        .map(|(doc_id, (dot, norm))| (doc_id as DocId, if *norm > 0.0 { dot / norm } else { 0.0 }))
        .collect();
    scored.sort_by(by_score_then_id);
    scored.truncate(top_k.min(norms.len()));
    scored
}

fn by_score_then_id(a: &(DocId, f64), b: &(DocId, f64)) -> Ordering {
    b.1.total_cmp(&a.1).then_with(|| a.0.cmp(&b.0))
}
