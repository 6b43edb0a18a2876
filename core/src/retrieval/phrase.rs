//! Ordered phrase matching on positional postings.
//!
//! Term `i` of the phrase occurring at offset `p` votes for a phrase start at
//! `p - i`. A document matches when some start gets a vote from every term.

use super::boolean;
use crate::index::InvertedIndex;
use crate::{DocId, Position};

/// Ids of the documents containing `query` as a contiguous run, ascending.
pub fn retrieve<S: AsRef<str>>(index: &InvertedIndex, query: &[S]) -> Vec<DocId> {
    if query.is_empty() {
        return Vec::new();
    }
    boolean::retrieve(index, query)
        .into_iter()
        .filter(|&doc_id| !phrase_starts(index, query, doc_id).is_empty())
        .collect()
}

/// Every offset in `doc_id` at which the phrase starts, ascending.
pub fn phrase_starts<S: AsRef<str>>(
    index: &InvertedIndex,
    query: &[S],
    doc_id: DocId,
) -> Vec<Position> {
    let Some((first, rest)) = query.split_first() else {
        return Vec::new();
    };
    let rest: Vec<&[Position]> = rest.iter().map(|t| index.positions(t.as_ref(), doc_id)).collect();

    index
        .positions(first.as_ref(), doc_id)
        .iter()
        .copied()
        .filter(|&start| {
            rest.iter().enumerate().all(|(i, positions)| {
                let offset = i as Position + 1;
                start.checked_add(offset).is_some_and(|p| positions.binary_search(&p).is_ok())
            })
        })
        .collect()
}
