use super::intersect_sorted;
use crate::index::InvertedIndex;
use crate::DocId;

/// AND query: ids of the documents containing every term, ascending.
///
/// An empty query matches nothing, and so does any query with a term outside
/// the vocabulary.
pub fn retrieve<S: AsRef<str>>(index: &InvertedIndex, query: &[S]) -> Vec<DocId> {
    if query.is_empty() {
        return Vec::new();
    }
    let mut lists: Vec<Vec<DocId>> = query.iter().map(|t| index.posting(t.as_ref())).collect();
    // Shortest first keeps every intermediate result small.
    lists.sort_by_key(Vec::len);

    let mut lists = lists.into_iter();
    let mut acc = lists.next().unwrap_or_default();
    for list in lists {
        if acc.is_empty() {
            break;
        }
        acc = intersect_sorted(&acc, &list);
    }
    acc
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
    fn intersects_all_terms() {
        let ix = index_of(&["a b c", "a c", "b c", "c"]);
        assert_eq!(retrieve(&ix, &["a", "c"]), vec![0, 1]);
        assert_eq!(retrieve(&ix, &["c", "b", "a"]), vec![0]);
        assert_eq!(retrieve(&ix, &["c"]), vec![0, 1, 2, 3]);
    }

    #[test]
    fn unknown_term_empties_result() {
        let ix = index_of(&["a b", "a"]);
        assert!(retrieve(&ix, &["a", "missing"]).is_empty());
    }

    #[test]
    fn empty_query_matches_nothing() {
        let ix = index_of(&["a"]);
        assert!(retrieve::<&str>(&ix, &[]).is_empty());
    }

    #[test]
    fn repeated_term_is_harmless() {
        let ix = index_of(&["a b", "a"]);
        assert_eq!(retrieve(&ix, &["a", "a"]), vec![0, 1]);
    }
}
