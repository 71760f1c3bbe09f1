//! Job-search client tests against a local fake of the search endpoint.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use jobwatch::source::{AdzunaClient, AdzunaCredentials, JobSource, SourceError};
use jobwatch::SearchConfig;
use serde_json::{Value, json};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use crate::common::serve;

type Captured = Arc<Mutex<Vec<(String, HashMap<String, String>)>>>;

async fn search(
    State(captured): State<Captured>,
    Path(country): Path<String>,
    Query(params): Query<HashMap<String, String>>,
) -> Result<Json<Value>, StatusCode> {
    let what = params.get("what").cloned().unwrap_or_default();
    captured.lock().unwrap().push((country, params));

    match what.as_str() {
        "broken" => Err(StatusCode::INTERNAL_SERVER_ERROR),
        "garbage" => Ok(Json(json!({"results": "nope"}))),
        "partial" => Ok(Json(json!({
            "results": [
                {"id": "5001", "title": "Admin", "redirect_url": "https://jobs.test/5001"},
                {"id": null, "title": "Ghost", "redirect_url": "https://jobs.test/ghost"}
            ]
        }))),
        _ => Ok(Json(json!({
            "count": 2,
            "results": [
                {
                    "id": "4011",
                    "title": "Linux Systems Administrator (m/w/d)",
                    "company": {"display_name": "Acme GmbH"},
                    "location": {"display_name": "Coburg, Bayern", "area": ["Deutschland"]},
                    "redirect_url": "https://jobs.test/4011",
                    "salary_min": 50000
                },
                {
                    "id": 4012,
                    "title": "Junior Admin",
                    "redirect_url": "https://jobs.test/4012"
                }
            ]
        }))),
    }
}

async fn fake_adzuna() -> (String, Captured) {
    let captured: Captured = Arc::new(Mutex::new(Vec::new()));
    let router = Router::new()
        .route("/v1/api/jobs/{country}/search/1", get(search))
        .with_state(Arc::clone(&captured));
    (serve(router).await, captured)
}

fn client(base_url: &str) -> AdzunaClient {
    AdzunaClient::new(
        base_url,
        "de",
        AdzunaCredentials {
            app_id: "id-123".to_string(),
            app_key: "key-456".to_string(),
        },
        Duration::from_secs(5),
    )
    .unwrap()
}

/// Test: The request carries credentials and search parameters, and results
/// are normalized into records.
#[tokio::test]
async fn test_search_sends_parameters_and_maps_results() {
    let (base_url, captured) = fake_adzuna().await;
    let config = SearchConfig::default();

    let jobs = client(&base_url)
        .search(&config, "system administrator")
        .await
        .unwrap();

    let (country, params) = captured.lock().unwrap()[0].clone();
    assert_eq!(country, "de");
    assert_eq!(params["app_id"], "id-123");
    assert_eq!(params["app_key"], "key-456");
    assert_eq!(params["results_per_page"], "3");
    assert_eq!(params["what"], "system administrator");
    assert_eq!(params["where"], "Coburg");
    assert_eq!(params["distance"], "100");
    assert!(!params.contains_key("work_type"));

    assert_eq!(jobs.len(), 2);
    assert_eq!(jobs[0].id.as_str(), "4011");
    assert_eq!(jobs[0].company.as_deref(), Some("Acme GmbH"));
    assert_eq!(jobs[0].location.as_deref(), Some("Coburg, Bayern"));
    assert_eq!(jobs[1].id.as_str(), "4012");
    assert_eq!(jobs[1].company_or_unknown(), "Unknown company");
}

/// Test: A configured page size is sent.
#[tokio::test]
async fn test_results_per_page_is_configurable() {
    let (base_url, captured) = fake_adzuna().await;

    client(&base_url)
        .with_results_per_page(20)
        .search(&SearchConfig::default(), "rust")
        .await
        .unwrap();

    assert_eq!(captured.lock().unwrap()[0].1["results_per_page"], "20");
}

/// Test: A non-success status surfaces as a status error.
#[tokio::test]
async fn test_server_error_maps_to_status() {
    let (base_url, _) = fake_adzuna().await;

    let result = client(&base_url)
        .search(&SearchConfig::default(), "broken")
        .await;

    assert!(matches!(result, Err(SourceError::Status { status: 500, .. })));
}

/// Test: An unexpected body surfaces as a decode error.
#[tokio::test]
async fn test_malformed_body_maps_to_decode() {
    let (base_url, _) = fake_adzuna().await;

    let result = client(&base_url)
        .search(&SearchConfig::default(), "garbage")
        .await;

    assert!(matches!(result, Err(SourceError::Decode(_))));
}

/// Test: One result without an id is dropped; the rest of the page is kept.
#[tokio::test]
async fn test_result_without_id_does_not_drop_keyword() {
    let (base_url, _) = fake_adzuna().await;

    let jobs = client(&base_url)
        .search(&SearchConfig::default(), "partial")
        .await
        .unwrap();

    assert_eq!(jobs.len(), 1);
    assert_eq!(jobs[0].id.as_str(), "5001");
}

/// Test: An unreachable host surfaces as a transport error.
#[tokio::test]
async fn test_unreachable_host_maps_to_http() {
    let result = client("http://127.0.0.1:9")
        .search(&SearchConfig::default(), "rust")
        .await;

    assert!(matches!(result, Err(SourceError::Http(_))));
}
