use criterion::{criterion_group, criterion_main, Criterion};
use ir_core::tokenizer::normalize_text;
use ir_core::{EngineConfig, RetrievalEngine, TokenizedCorpus};

const WORDS: &[&str] = &[
    "allan", "quatermain", "hunted", "elephant", "across", "the", "great", "river", "and", "into",
    "hills",
    "where", "she", "who", "must", "be", "obeyed", "waited", "among", "ruins",
];

fn synthetic_engine(num_docs: usize, doc_len: usize) -> RetrievalEngine {
    let docs = (0..num_docs).map(|d| {
        let text: Vec<&str> =
            (0..doc_len).map(|i| WORDS[(d * 7 + i * 13 + i / 5) % WORDS.len()]).collect();
        (format!("doc{d:04}"), normalize_text(&text.join(" ")))
    });
    RetrievalEngine::build(TokenizedCorpus::new(docs), EngineConfig::default())
        .expect("non-empty corpus")
}

fn bench_retrieval(c: &mut Criterion) {
    let engine = synthetic_engine(200, 2_000);
    c.bench_function("boolean_two_terms", |b| b.iter(|| engine.query_retrieve("great river")));
    c.bench_function("phrase_three_terms", |b| {
        b.iter(|| engine.phrase_query_retrieve("she who must"))
    });
    c.bench_function("rank_three_terms", |b| b.iter(|| engine.query_rank("elephant hills ruins")));
}

fn bench_build(c: &mut Criterion) {
    c.bench_function("build_50_docs", |b| b.iter(|| synthetic_engine(50, 1_000)));
}

criterion_group!(benches, bench_retrieval, bench_build);
criterion_main!(benches);
