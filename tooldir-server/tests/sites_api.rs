//! Contract tests: /api/sites

mod common;

use axum::http::StatusCode;
use common::{build_app, build_app_with, request, send};
use serde_json::{json, Value};
use tooldir_server::{AppConfig, SiteQueueConfig};

async fn create(app: &axum::Router, name: &str, priority: &str) -> Value {
    let (status, body) = send(
        app,
        request(
            "POST",
            "/api/sites",
            None,
            Some(json!({
                "name": name,
                "url": format!("https://{name}.example.com"),
                "priority": priority,
            })),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "{body}");
    body
}

#[tokio::test]
async fn create_then_fetch_is_pending() {
    let t = build_app();
    let (status, created) = send(
        &t.app,
        request(
            "POST",
            "/api/sites",
            None,
            Some(json!({"name": "Example", "url": "https://example.com", "priority": "medium"})),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let id = created["id"].as_str().unwrap();
    let (status, fetched) = send(&t.app, request("GET", &format!("/api/sites/{id}"), None, None)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched["status"], "pending");
    assert_eq!(fetched["name"], "Example");
    assert_eq!(fetched["url"], "https://example.com");
    assert_eq!(fetched["priority"], "medium");
}

#[tokio::test]
async fn empty_name_or_bad_url_is_400() {
    let t = build_app();
    for body in [
        json!({"name": "", "url": "https://example.com"}),
        json!({"name": "x", "url": "   "}),
        json!({"name": "x", "url": "ftp://example.com"}),
        json!({"name": "x", "url": "https://example.com", "priority": "urgent"}),
    ] {
        let (status, err) = send(&t.app, request("POST", "/api/sites", None, Some(body))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(err["error"], "validation_error");
    }
}

#[tokio::test]
async fn undecodable_input_is_400_json() {
    let t = build_app();

    let (status, err) = send(
        &t.app,
        request(
            "POST",
            "/api/sites",
            None,
            Some(json!({"name": 123, "url": "https://example.com"})),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(err["error"], "validation_error");
    assert!(err["message"].as_str().unwrap().starts_with("malformed request body"));

    let (status, err) = send(&t.app, request("POST", "/api/sites", None, None)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(err["error"], "validation_error");

    let (status, err) = send(&t.app, request("GET", "/api/sites?limit=abc", None, None)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(err["error"], "validation_error");
    assert!(err["message"].as_str().unwrap().starts_with("malformed query string"));
}

#[tokio::test]
async fn priority_filter_and_paging() {
    let t = build_app();
    for i in 0..5 {
        create(&t.app, &format!("high{i}"), "high").await;
    }
    for i in 0..2 {
        create(&t.app, &format!("low{i}"), "low").await;
    }

    let (_, first) = send(
        &t.app,
        request("GET", "/api/sites?priority=high&skip=0&limit=2", None, None),
    )
    .await;
    let (_, second) = send(
        &t.app,
        request("GET", "/api/sites?priority=high&skip=2&limit=2", None, None),
    )
    .await;

    assert_eq!(first["total"], 5);
    let a = first["items"].as_array().unwrap();
    let b = second["items"].as_array().unwrap();
    assert_eq!(a.len(), 2);
    assert_eq!(b.len(), 2);
    assert!(a.iter().chain(b).all(|s| s["priority"] == "high"));
    assert!(a.iter().all(|x| b.iter().all(|y| x["id"] != y["id"])));

    assert_eq!(first["has_more"], true);

    let (_, last) = send(
        &t.app,
        request("GET", "/api/sites?priority=high&skip=4&limit=2", None, None),
    )
    .await;
    assert_eq!(last["items"].as_array().unwrap().len(), 1);
    assert_eq!(last["has_more"], false);

    let (_, all) = send(&t.app, request("GET", "/api/sites", None, None)).await;
    assert_eq!(all["total"], 7);
}

#[tokio::test]
async fn sort_by_name_ascending() {
    let t = build_app();
    for name in ["charlie", "alpha", "bravo"] {
        create(&t.app, name, "low").await;
    }

    let (status, body) = send(
        &t.app,
        request("GET", "/api/sites?sort_by=name&sort_desc=false", None, None),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let names: Vec<&str> = body["items"]
        .as_array()
        .unwrap()
        .iter()
        .map(|s| s["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, vec!["alpha", "bravo", "charlie"]);

    let (status, _) = send(&t.app, request("GET", "/api/sites?sort_by=color", None, None)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn partial_update_and_delete() {
    let t = build_app();
    let site = create(&t.app, "target", "low").await;
    let id = site["id"].as_str().unwrap();
    let uri = format!("/api/sites/{id}");

    let (status, updated) = send(
        &t.app,
        request("PUT", &uri, None, Some(json!({"status": "active", "category": "news"}))),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["status"], "active");
    assert_eq!(updated["category"], "news");
    assert_eq!(updated["name"], "target");

    let (status, cleared) = send(
        &t.app,
        request("PUT", &uri, None, Some(json!({"category": "", "name": null}))),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert!(cleared["category"].is_null());
    assert_eq!(cleared["name"], "target");

    let (status, _) = send(&t.app, request("DELETE", &uri, None, None)).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, err) = send(&t.app, request("GET", &uri, None, None)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(err["error"], "not_found");

    let (status, _) = send(&t.app, request("DELETE", &uri, None, None)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn non_uuid_id_is_400() {
    let t = build_app();
    let (status, body) = send(&t.app, request("GET", "/api/sites/not-a-uuid", None, None)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "validation_error");
}

#[tokio::test]
async fn strict_transitions_conflict() {
    let t = build_app_with(AppConfig {
        sites: SiteQueueConfig {
            enforce_transitions: true,
        },
        ..Default::default()
    });
    let site = create(&t.app, "strict", "low").await;
    let uri = format!("/api/sites/{}", site["id"].as_str().unwrap());

    let (status, body) = send(
        &t.app,
        request("PUT", &uri, None, Some(json!({"status": "completed"}))),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"], "conflict");
}

#[tokio::test]
async fn n8n_feed_shape_and_order() {
    let t = build_app();
    create(&t.app, "low", "low").await;
    let high = create(&t.app, "high", "high").await;

    let (status, body) = send(&t.app, request("GET", "/api/sites/n8n?limit=1", None, None)).await;
    assert_eq!(status, StatusCode::OK);
    let feed = body.as_array().unwrap();
    assert_eq!(feed.len(), 1);
    assert_eq!(feed[0]["id"], high["id"]);
    assert_eq!(feed[0]["link"], "https://high.example.com");
    assert!(feed[0].get("category_id").is_some());
}

#[tokio::test]
async fn health_reports_ok() {
    let t = build_app();
    let (status, body) = send(&t.app, request("GET", "/health", None, None)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    assert_eq!(body["storage"], "memory");
    assert_eq!(body["strict_transitions"], false);
    assert!(!body["version"].as_str().unwrap().is_empty());

    let strict = build_app_with(AppConfig {
        sites: SiteQueueConfig {
            enforce_transitions: true,
        },
        ..Default::default()
    });
    let (_, body) = send(&strict.app, request("GET", "/health", None, None)).await;
    assert_eq!(body["strict_transitions"], true);
}

#[tokio::test]
async fn unknown_route_is_json_404() {
    let t = build_app();
    let (status, body) = send(&t.app, request("GET", "/api/nope", None, None)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "not_found");
    assert_eq!(body["message"], "route '/api/nope' not found");
}

#[tokio::test]
async fn cors_preflight_honours_allow_list() {
    use axum::body::Body;
    use axum::http::Request;
    use tower::ServiceExt;

    let mut config = AppConfig::default();
    config.auth.jwt_secret = common::SECRET.into();
    config.server.allowed_origins = vec!["https://tools.example.com".into()];
    let t = build_app_with(config);

    let preflight = |origin: &str| {
        Request::builder()
            .method("OPTIONS")
            .uri("/api/sites")
            .header("origin", origin)
            .header("access-control-request-method", "POST")
            .body(Body::empty())
            .unwrap()
    };

    let allowed = t
        .app
        .clone()
        .oneshot(preflight("https://tools.example.com"))
        .await
        .unwrap();
    assert_eq!(
        allowed.headers()["access-control-allow-origin"],
        "https://tools.example.com"
    );

    let denied = t
        .app
        .clone()
        .oneshot(preflight("https://evil.example.com"))
        .await
        .unwrap();
    assert!(denied.headers().get("access-control-allow-origin").is_none());
}
