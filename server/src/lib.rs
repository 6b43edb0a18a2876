use anyhow::{Context, Result};
use axum::{extract::{Path, Query, State}, http::StatusCode, routing::get, Json, Router};
use ir_core::loader::load_corpus;
use ir_core::{DocId, EngineConfig, RetrievalEngine, RetrievalError};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Instant;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;

#[derive(Deserialize)]
pub struct QueryParams {
    pub q: String,
    pub k: Option<usize>,
}

#[derive(Deserialize)]
pub struct PostingParams {
    pub word: String,
}

#[derive(Deserialize)]
pub struct WeightParams {
    pub word: String,
    pub doc: DocId,
}

#[derive(Serialize)]
pub struct DocHit {
    pub doc_id: DocId,
    pub title: String,
}

#[derive(Serialize)]
pub struct RankedHit {
    pub doc_id: DocId,
    pub title: String,
    pub score: f64,
}

#[derive(Serialize)]
pub struct MatchResponse {
    pub query: String,
    pub terms: Vec<String>,
    pub took_s: f64,
    pub results: Vec<DocHit>,
}

#[derive(Serialize)]
pub struct RankResponse {
    pub query: String,
    pub terms: Vec<String>,
    pub took_s: f64,
    pub results: Vec<RankedHit>,
}

#[derive(Serialize)]
pub struct PostingResponse {
    pub word: String,
    pub stem: String,
    pub docs: Vec<DocId>,
}

#[derive(Serialize)]
pub struct WeightResponse {
    pub word: String,
    pub doc_id: DocId,
    pub weight: f64,
}

#[derive(Serialize)]
pub struct DocResponse {
    pub doc_id: DocId,
    pub title: String,
    pub terms: usize,
}

/// Read-only after startup, so handlers share it without locking.
#[derive(Clone)]
pub struct AppState {
    pub engine: Arc<RetrievalEngine>,
}

/// Load, index and weight the collection under `data_dir`, then build the
/// router over it.
pub fn build_app(data_dir: &str, config: EngineConfig) -> Result<Router> {
    let corpus = load_corpus(data_dir, &config)
        .with_context(|| format!("loading corpus from {data_dir}"))?;
    let engine = corpus.index().compute_weights_with(config).context("computing tf-idf weights")?;
    tracing::info!(num_docs = engine.num_docs(), "engine ready");
    Ok(app_from_engine(engine))
}

pub fn app_from_engine(engine: RetrievalEngine) -> Router {
    let app_state = AppState { engine: Arc::new(engine) };

    // CORS: read CORS_ALLOW_ORIGIN (comma-separated) or allow Any by default
    let cors = match std::env::var("CORS_ALLOW_ORIGIN") {
        Ok(val) => {
            let origins: Vec<_> = val
                .split(',')
                .filter_map(|s| s.trim().parse().ok())
                .collect();
            if origins.is_empty() {
                CorsLayer::new().allow_origin(Any).allow_methods(Any).allow_headers(Any)
            } else {
                CorsLayer::new()
                    .allow_origin(AllowOrigin::list(origins))
                    .allow_methods(Any)
                    .allow_headers(Any)
            }
        }
        Err(_) => CorsLayer::new().allow_origin(Any).allow_methods(Any).allow_headers(Any),
    };

    Router::new()
        .route("/health", get(|| async { "ok" }))
        .route("/posting", get(posting_handler))
        .route("/boolean", get(boolean_handler))
        .route("/phrase", get(phrase_handler))
        .route("/rank", get(rank_handler))
        .route("/weight", get(weight_handler))
        .route("/doc/:doc_id", get(doc_handler))
        .with_state(app_state)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}

fn doc_hits(engine: &RetrievalEngine, docs: Vec<DocId>) -> Vec<DocHit> {
    docs.into_iter()
        .map(|doc_id| DocHit {
            doc_id,
            title: engine.title(doc_id).unwrap_or_default().to_string(),
        })
        .collect()
}

pub async fn posting_handler(
    State(state): State<AppState>,
    Query(params): Query<PostingParams>,
) -> Json<PostingResponse> {
    let stem = ir_core::tokenizer::stem(&params.word);
    let docs = state.engine.posting(&stem);
    Json(PostingResponse { word: params.word, stem, docs })
}

pub async fn boolean_handler(
    State(state): State<AppState>,
    Query(params): Query<QueryParams>,
) -> Json<MatchResponse> {
    let start = Instant::now();
    let terms = state.engine.process_query(&params.q);
    let docs = state.engine.boolean_retrieve(&terms);
    let results = doc_hits(&state.engine, docs);
    Json(MatchResponse { query: params.q, terms, took_s: start.elapsed().as_secs_f64(), results })
}

pub async fn phrase_handler(
    State(state): State<AppState>,
    Query(params): Query<QueryParams>,
) -> Json<MatchResponse> {
    let start = Instant::now();
    let terms = state.engine.process_query(&params.q);
    let docs = state.engine.phrase_retrieve(&terms);
    let results = doc_hits(&state.engine, docs);
    Json(MatchResponse { query: params.q, terms, took_s: start.elapsed().as_secs_f64(), results })
}

pub async fn rank_handler(
    State(state): State<AppState>,
    Query(params): Query<QueryParams>,
) -> Json<RankResponse> {
    let start = Instant::now();
    let top_k = state.engine.config().top_k;
    let k = params.k.unwrap_or(top_k).clamp(1, top_k);
    let terms = state.engine.process_query(&params.q);
    let results = state
        .engine
        .rank_retrieve(&terms)
        .into_iter()
        .take(k)
        .map(|(doc_id, score)| RankedHit {
            doc_id,
            title: state.engine.title(doc_id).unwrap_or_default().to_string(),
            score,
        })
        .collect();
    Json(RankResponse { query: params.q, terms, took_s: start.elapsed().as_secs_f64(), results })
}

pub async fn weight_handler(
    State(state): State<AppState>,
    Query(params): Query<WeightParams>,
) -> Result<Json<WeightResponse>, (StatusCode, String)> {
    match state.engine.get_weight_unstemmed(&params.word, params.doc) {
        Ok(weight) => Ok(Json(WeightResponse { word: params.word, doc_id: params.doc, weight })),
        Err(e @ RetrievalError::NotWeighted { .. }) => Err((StatusCode::NOT_FOUND, e.to_string())),
        Err(e) => Err((StatusCode::INTERNAL_SERVER_ERROR, e.to_string())),
    }
}

pub async fn doc_handler(
    State(state): State<AppState>,
    Path(doc_id): Path<DocId>,
) -> Result<Json<DocResponse>, (StatusCode, String)> {
    let engine = &state.engine;
    match (engine.title(doc_id), engine.bag_of_words(doc_id)) {
        (Some(title), Some(bag)) => {
            Ok(Json(DocResponse { doc_id, title: title.to_string(), terms: bag.len() }))
        }
        _ => Err((StatusCode::NOT_FOUND, format!("no document {doc_id}"))),
    }
}
