//! HTTP tests for the address endpoints
//!
//! Each test builds the full router over a private in-memory store seeded
//! from `tests/fixtures/names.csv` and drives it with `oneshot`.

use std::path::PathBuf;

use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use tower::ServiceExt;

use addressbook_service::prelude::*;
use addressbook_service::seed::parse_seed_csv;

fn fixture_path() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/names.csv")
}

fn fixture_rows() -> Vec<NewAddress> {
    let data = std::fs::read(fixture_path()).expect("fixture");
    parse_seed_csv(&data).expect("fixture parses")
}

async fn app() -> Router {
    let mut config = Config::default();
    config.database = DatabaseConfig::in_memory();
    config.seed.csv_path = fixture_path();

    let repository = open_repository(&config).await.expect("store opens");
    apply_middleware(router(AppState::new(config.clone(), repository)), &config)
}

async fn send(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string())),
        None => builder.body(Body::empty()),
    }
    .unwrap();

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, json)
}

async fn get(app: &Router, uri: &str) -> (StatusCode, Value) {
    send(app, Method::GET, uri, None).await
}

/// Follow `next` links from `uri` and collect every listed entry
async fn walk(app: &Router, uri: &str) -> Vec<Value> {
    let mut seen = Vec::new();
    let mut next = Some(uri.to_string());
    while let Some(uri) = next {
        let (status, body) = get(app, &uri).await;
        assert_eq!(status, StatusCode::OK, "{uri}");
        seen.extend(body["addresses"].as_array().unwrap().iter().cloned());
        next = body["next"].as_str().map(str::to_string);
    }
    seen
}

fn names(entries: &[Value]) -> Vec<(String, String)> {
    entries
        .iter()
        .map(|e| {
            (
                e["first_name"].as_str().unwrap().to_string(),
                e["last_name"].as_str().unwrap().to_string(),
            )
        })
        .collect()
}

#[tokio::test]
async fn limit_is_normalized() {
    let app = app().await;

    for (limit, expected) in [("1000", 100), ("42", 42), ("-100", 20), ("0", 20), ("1", 1)] {
        let (status, body) = get(&app, &format!("/address?limit={limit}")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            body["addresses"].as_array().unwrap().len(),
            expected,
            "limit={limit}"
        );
    }

    let (_, body) = get(&app, "/address").await;
    assert_eq!(body["addresses"].as_array().unwrap().len(), 20);
}

#[tokio::test]
async fn non_numeric_limit_is_bad_request() {
    let app = app().await;

    let (status, body) = get(&app, "/address?limit=asdf").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].is_string());
}

#[tokio::test]
async fn walk_by_id_matches_seed_order() {
    let app = app().await;
    let expected: Vec<_> = fixture_rows()
        .into_iter()
        .map(|r| (r.first_name, r.last_name))
        .collect();

    let walked = walk(&app, "/address?limit=17").await;
    assert_eq!(names(&walked), expected);

    let ids: Vec<_> = walked.iter().map(|e| e["id"].as_i64().unwrap()).collect();
    assert!(ids.windows(2).all(|w| w[0] < w[1]));
}

#[tokio::test]
async fn walk_by_last_name_is_stably_sorted() {
    let app = app().await;
    let mut expected: Vec<_> = fixture_rows()
        .into_iter()
        .map(|r| (r.first_name, r.last_name))
        .collect();
    expected.sort_by(|a, b| a.1.cmp(&b.1));

    let walked = walk(&app, "/address?sort=last_name&limit=9").await;
    assert_eq!(names(&walked), expected);
}

#[tokio::test]
async fn walk_by_first_name_is_stably_sorted() {
    let app = app().await;
    let mut expected: Vec<_> = fixture_rows()
        .into_iter()
        .map(|r| (r.first_name, r.last_name))
        .collect();
    expected.sort_by(|a, b| a.0.cmp(&b.0));

    let walked = walk(&app, "/address?sort=first_name&limit=100").await;
    assert_eq!(names(&walked), expected);
}

#[tokio::test]
async fn next_link_carries_request_parameters() {
    let app = app().await;

    let (_, body) = get(&app, "/address?sort=last_name&limit=2").await;
    let last = &body["addresses"][1];
    let expected = format!(
        "/address?sort=last_name&limit=2&last={}__{}",
        last["id"], last["last_name"].as_str().unwrap()
    );
    assert_eq!(body["next"], expected.as_str());

    let (_, body) = get(&app, "/address?limit=2").await;
    assert_eq!(body["next"], "/address?limit=2&last=2");
}

#[tokio::test]
async fn unknown_sort_lists_by_id() {
    let app = app().await;

    let (status, body) = get(&app, "/address?sort=phone&limit=3").await;
    assert_eq!(status, StatusCode::OK);
    let ids: Vec<_> = body["addresses"]
        .as_array()
        .unwrap()
        .iter()
        .map(|e| e["id"].as_i64().unwrap())
        .collect();
    assert_eq!(ids, [1, 2, 3]);
    assert_eq!(body["next"], "/address?sort=phone&limit=3&last=3");
}

#[tokio::test]
async fn malformed_last_is_bad_request() {
    let app = app().await;

    for uri in [
        "/address?sort=last_name&last=12",
        "/address?sort=first_name&last=abc__Jane",
        "/address?last=seven",
        "/address?last=3__Doe",
    ] {
        let (status, body) = get(&app, uri).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{uri}");
        assert!(body["error"].as_str().unwrap().contains("invalid last key"));
    }
}

#[tokio::test]
async fn search_then_delete() {
    let app = app().await;

    let (status, body) = get(&app, "/address?search=Thomp").await;
    assert_eq!(status, StatusCode::OK);
    let found = body["addresses"].as_array().unwrap();
    assert_eq!(found.len(), 1);
    assert_eq!(found[0]["first_name"], "Angela");
    assert_eq!(found[0]["last_name"], "Thompson");
    let id = found[0]["id"].as_i64().unwrap();

    let (status, body) = send(&app, Method::DELETE, &format!("/address/{id}"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "success": true }));

    let (status, body) = send(&app, Method::DELETE, &format!("/address/{id}"), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, json!({ "error": format!("no entry with id {id}") }));

    let (status, _) = get(&app, &format!("/address/{id}")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, body) = get(&app, "/address?search=Thomp").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "success": true, "addresses": [], "next": null }));
}

#[tokio::test]
async fn search_matches_first_or_last_name_prefix() {
    let app = app().await;

    let (_, body) = get(&app, "/address?search=Ja&limit=100").await;
    let matches = body["addresses"].as_array().unwrap();
    assert!(!matches.is_empty());
    for entry in matches {
        let first = entry["first_name"].as_str().unwrap();
        let last = entry["last_name"].as_str().unwrap();
        assert!(first.starts_with("Ja") || last.starts_with("Ja"), "{entry}");
    }

    let (_, body) = get(&app, "/address?search=%25").await;
    assert_eq!(body["addresses"], json!([]));
}

#[tokio::test]
async fn create_then_get() {
    let app = app().await;

    let (status, body) = send(
        &app,
        Method::POST,
        "/address",
        Some(json!({ "first_name": "Ada", "last_name": "Lovelace", "phone": "555-1815" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    let id = body["id"].as_i64().unwrap();
    assert!(id > 250);

    let (status, body) = get(&app, &format!("/address/{id}")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!({
            "success": true,
            "id": id,
            "first_name": "Ada",
            "last_name": "Lovelace",
            "phone": "555-1815"
        })
    );

    let (status, body) = send(
        &app,
        Method::POST,
        "/address",
        Some(json!({ "first_name": "No", "last_name": "Phone" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let (_, body) = get(&app, &format!("/address/{}", body["id"])).await;
    assert_eq!(body["phone"], Value::Null);
}

#[tokio::test]
async fn create_rejects_bad_input() {
    let app = app().await;

    let cases = [
        json!({ "first_name": "Ada" }),
        json!({ "last_name": "Lovelace" }),
        json!({ "first_name": "", "last_name": "Lovelace" }),
        json!({ "first_name": "Ada", "last_name": "" }),
        json!({ "first_name": 7, "last_name": "Lovelace" }),
    ];
    for case in cases {
        let (status, body) = send(&app, Method::POST, "/address", Some(case.clone())).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{case}");
        assert!(body["error"].is_string());
    }

    let request = Request::post("/address")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{not json"))
        .unwrap();
    let response = app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn unknown_or_non_integer_id_is_not_found() {
    let app = app().await;

    for uri in ["/address/99999", "/address/abc", "/address/1.5"] {
        let (status, body) = get(&app, uri).await;
        assert_eq!(status, StatusCode::NOT_FOUND, "{uri}");
        assert!(body["error"].as_str().unwrap().starts_with("no entry with id"));
    }

    let (status, _) = send(&app, Method::DELETE, "/address/abc", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn get_returns_seeded_entry() {
    let app = app().await;

    let (status, body) = get(&app, "/address/1").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!({
            "success": true,
            "id": 1,
            "first_name": "Jane",
            "last_name": "Doe",
            "phone": null
        })
    );
}

#[tokio::test]
async fn health_and_readiness() {
    let app = app().await;

    let (status, body) = get(&app, "/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["service"], "addressbook");

    let (status, body) = get(&app, "/ready").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["ready"], true);
    assert_eq!(body["dependencies"]["database"]["healthy"], true);
}

#[tokio::test]
async fn readiness_fails_when_store_is_closed() {
    let mut config = Config::default();
    config.database = DatabaseConfig::in_memory();
    config.seed.enabled = false;

    let repository = open_repository(&config).await.unwrap();
    repository.pool().close().await;
    let app = router(AppState::new(config, repository));

    let (status, body) = get(&app, "/ready").await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body["ready"], false);

    let (status, body) = get(&app, "/address").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(body["error"].is_string());

    let (status, _) = send(
        &app,
        Method::POST,
        "/address",
        Some(json!({ "first_name": "Ada", "last_name": "Lovelace" })),
    )
    .await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
}

#[tokio::test]
async fn responses_carry_request_id() {
    let app = app().await;

    let response = app
        .clone()
        .oneshot(Request::get("/address/1").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert!(response.headers().contains_key("x-request-id"));
}
