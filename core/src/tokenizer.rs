use crate::config::EmptyTokenPolicy;
use lazy_static::lazy_static;
use regex::Regex;
use rust_stemmers::{Algorithm, Stemmer};

lazy_static! {
    static ref NON_ALNUM: Regex = Regex::new(r"[^a-zA-Z0-9]").expect("valid regex");
    static ref STEMMER: Stemmer = Stemmer::create(Algorithm::English);
}

/// Stem a single token. The token is lowercased first so that unstemmed
/// lookups agree with indexed text regardless of case.
pub fn stem(token: &str) -> String {
    STEMMER.stem(&token.to_lowercase()).into_owned()
}

fn strip(token: &str) -> String {
    NON_ALNUM.replace_all(token, "").into_owned()
}

/// Normalize one line of document text: lowercase, split on whitespace,
/// strip non-alphanumerics, drop empties, stem.
pub fn normalize_line(line: &str) -> Vec<String> {
    line.to_lowercase()
        .split_whitespace()
        .map(strip)
        .filter(|t| !t.is_empty())
        .map(|t| STEMMER.stem(&t).into_owned())
        .collect()
}

/// Normalize a whole document, line by line.
pub fn normalize_text(text: &str) -> Vec<String> {
    text.lines().flat_map(normalize_line).collect()
}

/// Turn a raw query into stemmed terms, keeping order.
///
/// Unlike [`normalize_line`], tokens that strip down to nothing are kept
/// under [`EmptyTokenPolicy::Keep`].
pub fn process_query(raw: &str, policy: EmptyTokenPolicy) -> Vec<String> {
    raw.to_lowercase()
        .split_whitespace()
        .map(strip)
        .filter(|t| policy == EmptyTokenPolicy::Keep || !t.is_empty())
        .map(|t| STEMMER.stem(&t).into_owned())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_punctuation_and_stems() {
        let t = normalize_line("Running, runner's RUN!");
        assert_eq!(t[0], "run");
        assert_eq!(t[2], "run");
        assert!(t.iter().all(|w| w.chars().all(|c| c.is_ascii_alphanumeric())));
    }

    #[test]
    fn document_path_drops_empty_tokens() {
        assert_eq!(normalize_line("cat -- dog"), vec!["cat", "dog"]);
    }

    #[test]
    fn query_path_keeps_empty_tokens_by_default() {
        let q = process_query("cat -- dog", EmptyTokenPolicy::Keep);
        assert_eq!(q, vec!["cat", "", "dog"]);
        let q = process_query("cat -- dog", EmptyTokenPolicy::Drop);
        assert_eq!(q, vec!["cat", "dog"]);
    }

    #[test]
    fn stem_is_case_insensitive() {
        assert_eq!(stem("Horses"), stem("horses"));
    }
}
