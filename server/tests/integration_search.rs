use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use ir_core::EngineConfig;
use serde_json::Value;
use std::fs;
use tempfile::tempdir;
use tower::ServiceExt;

fn write_tiny_corpus(dir: &std::path::Path) {
    let raw = dir.join("raw");
    fs::create_dir_all(&raw).unwrap();
    // Titles sort as Alpha < Beta < Gamma, giving ids 0, 1, 2.
    fs::write(raw.join("Gamma 3.txt"), "A dog ran.").unwrap();
    fs::write(raw.join("Alpha 1.txt"), "The cat sat.").unwrap();
    fs::write(raw.join("Beta 2.txt"), "The cat ran fast!").unwrap();
}

fn tiny_app() -> (tempfile::TempDir, Router) {
    let dir = tempdir().unwrap();
    write_tiny_corpus(dir.path());
    let app = ir_server::build_app(&dir.path().to_string_lossy(), EngineConfig::default()).unwrap();
    (dir, app)
}

async fn call(app: Router, uri: &str) -> (StatusCode, Value) {
    let req = Request::get(uri).body(Body::empty()).unwrap();
    let resp = app.oneshot(req).await.unwrap();
    let status = resp.status();
    let body = resp.into_body().collect().await.unwrap().to_bytes();
    let json = serde_json::from_slice(&body).unwrap_or(Value::Null);
    (status, json)
}

fn doc_ids(json: &Value) -> Vec<u64> {
    json["results"].as_array().unwrap().iter().map(|r| r["doc_id"].as_u64().unwrap()).collect()
}

#[tokio::test]
async fn rank_returns_ranked_results() {
    let (_dir, app) = tiny_app();
    let (status, json) = call(app, "/rank?q=cats").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(doc_ids(&json), vec![0, 1, 2]);
    assert_eq!(json["results"][0]["title"], "Alpha");
    assert_eq!(json["results"][2]["score"].as_f64().unwrap(), 0.0);
    assert_eq!(json["terms"][0], "cat");
}

#[tokio::test]
async fn rank_k_limits_results() {
    let (_dir, app) = tiny_app();
    let (_, json) = call(app, "/rank?q=cat&k=1").await;
    assert_eq!(doc_ids(&json), vec![0]);
}

#[tokio::test]
async fn boolean_and_phrase_queries() {
    let (_dir, app) = tiny_app();
    let (_, json) = call(app.clone(), "/boolean?q=cat%20ran").await;
    assert_eq!(doc_ids(&json), vec![1]);
    let (_, json) = call(app, "/phrase?q=cat%20sat").await;
    assert_eq!(doc_ids(&json), vec![0]);
}

#[tokio::test]
async fn posting_stems_the_word() {
    let (_dir, app) = tiny_app();
    let (status, json) = call(app, "/posting?word=Running").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["stem"], "run");
    assert!(json["docs"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn weight_miss_is_not_found() {
    let (_dir, app) = tiny_app();
    let (status, json) = call(app.clone(), "/weight?word=cat&doc=0").await;
    assert_eq!(status, StatusCode::OK);
    assert!(json["weight"].as_f64().unwrap() > 0.0);
    let (status, _) = call(app, "/weight?word=cat&doc=2").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn doc_lookup() {
    let (_dir, app) = tiny_app();
    let (_, json) = call(app.clone(), "/doc/1").await;
    assert_eq!(json["title"], "Beta");
    assert_eq!(json["terms"], 4);
    let (status, _) = call(app, "/doc/9").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
