use crate::index::{IndexedCorpus, Indexer};
use crate::DocId;

/// A document before indexing: its title and ordered stemmed tokens.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    pub id: DocId,
    pub title: String,
    pub tokens: Vec<String>,
}

/// The loaded collection with ids assigned.
///
/// Ids follow ascending title order and are fixed here, once. Titles that
/// compare equal keep the order they were supplied in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenizedCorpus {
    docs: Vec<Document>,
}

impl TokenizedCorpus {
    pub fn new<I, T>(docs: I) -> Self
    where
        I: IntoIterator<Item = (T, Vec<String>)>,
        T: Into<String>,
    {
        let mut pairs: Vec<(String, Vec<String>)> =
            docs.into_iter().map(|(t, toks)| (t.into(), toks)).collect();
        pairs.sort_by(|a, b| a.0.cmp(&b.0));
        let docs = pairs
            .into_iter()
            .enumerate()
            .map(|(id, (title, tokens))| Document { id: id as DocId, title, tokens })
            .collect();
        Self { docs }
    }

    pub fn len(&self) -> usize {
        self.docs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.docs.is_empty()
    }

    pub fn documents(&self) -> &[Document] {
        &self.docs
    }

    pub fn titles(&self) -> impl Iterator<Item = &str> {
        self.docs.iter().map(|d| d.title.as_str())
    }

    /// Consume the corpus into its positional index.
    pub fn index(self) -> IndexedCorpus {
        Indexer::build(self)
    }

    pub(crate) fn into_documents(self) -> Vec<Document> {
        self.docs
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn toks(s: &str) -> Vec<String> {
        s.split_whitespace().map(String::from).collect()
    }

    #[test]
    fn ids_follow_title_order_not_input_order() {
        let docs = vec![("She", toks("a")), ("Allan", toks("b")), ("Nada", toks("c"))];
        let corpus = TokenizedCorpus::new(docs);
        let titles: Vec<&str> = corpus.titles().collect();
        assert_eq!(titles, vec!["Allan", "Nada", "She"]);
        let ids: Vec<DocId> = corpus.documents().iter().map(|d| d.id).collect();
        assert_eq!(ids, vec![0, 1, 2]);
        assert_eq!(corpus.documents()[2].tokens, toks("a"));
    }

    #[test]
    fn equal_titles_keep_supplied_order() {
        let corpus = TokenizedCorpus::new(vec![("x", toks("first")), ("x", toks("second"))]);
        assert_eq!(corpus.documents()[0].tokens, toks("first"));
        assert_eq!(corpus.documents()[1].tokens, toks("second"));
    }
}
