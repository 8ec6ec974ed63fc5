//! Migration against a mocked search service

use std::time::Duration;

use serde_json::{json, Map, Value};
use tooldir_search::{migrate, SearchClient, SearchConfig, SearchError};
use wiremock::matchers::{body_partial_json, header, method, path, path_regex};
use wiremock::{Mock, MockServer, ResponseTemplate};

const PROBE: &str = "/1/indexes/tools_staging/__tooldir_connectivity_probe__";

fn client(server: &MockServer, batch_size: usize) -> SearchClient {
    SearchClient::new(
        SearchConfig::new("APP", "secret-key", "tools")
            .with_base_url(server.uri())
            .with_batch_size(batch_size)
            .with_polling(Duration::from_millis(1), 3),
    )
}

fn task(id: i64) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(json!({ "taskID": id }))
}

fn tools(n: usize) -> Vec<Map<String, Value>> {
    (0..n)
        .map(|i| {
            json!({
                "unique_id": format!("tool-{i}"),
                "name": format!("Tool {i}"),
                "tags": ["AI"],
                "created_at": 1_709_294_400,
            })
        })
        .filter_map(|v| v.as_object().cloned())
        .collect()
}

/// Everything up to and including the settings call succeeds.
async fn mount_preamble(server: &MockServer, probe_hits: Value) {
    Mock::given(method("PUT"))
        .and(path(PROBE))
        .and(header("X-Algolia-Application-Id", "APP"))
        .and(header("X-Algolia-API-Key", "secret-key"))
        .respond_with(task(1))
        .mount(server)
        .await;
    Mock::given(method("POST"))
        .and(path("/1/indexes/tools_staging/query"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "hits": probe_hits,
            "nbHits": 1,
        })))
        .mount(server)
        .await;
    Mock::given(method("DELETE"))
        .and(path(PROBE))
        .respond_with(task(2))
        .mount(server)
        .await;
    Mock::given(method("POST"))
        .and(path("/1/indexes/tools_staging/clear"))
        .respond_with(task(3))
        .mount(server)
        .await;
    Mock::given(method("PUT"))
        .and(path("/1/indexes/tools_staging/settings"))
        .respond_with(task(4))
        .mount(server)
        .await;
    Mock::given(method("GET"))
        .and(path_regex(r"^/1/indexes/[^/]+/task/\d+$"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "status": "published" })))
        .mount(server)
        .await;
}

fn probe_found() -> Value {
    json!([{ "objectID": "__tooldir_connectivity_probe__" }])
}

#[tokio::test]
async fn stages_in_batches_then_swaps() {
    let server = MockServer::start().await;
    mount_preamble(&server, probe_found()).await;

    Mock::given(method("POST"))
        .and(path("/1/indexes/tools_staging/batch"))
        .respond_with(task(5))
        .expect(3)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/1/indexes/tools_staging/operation"))
        .and(body_partial_json(json!({ "operation": "move", "destination": "tools" })))
        .respond_with(task(6))
        .expect(1)
        .mount(&server)
        .await;

    let mut records = tools(5);
    records.push(json!({ "name": "no id" }).as_object().cloned().unwrap());

    let report = migrate(&client(&server, 2), &records).await.unwrap();
    assert_eq!(report.total, 6);
    assert_eq!(report.indexed, 5);
    assert_eq!(report.skipped, 1);
    assert_eq!(report.batches, 3);
}

#[tokio::test]
async fn batch_body_carries_flattened_documents() {
    let server = MockServer::start().await;
    mount_preamble(&server, probe_found()).await;

    Mock::given(method("POST"))
        .and(path("/1/indexes/tools_staging/batch"))
        .and(body_partial_json(json!({
            "requests": [{
                "action": "addObject",
                "body": {
                    "objectID": "tool-0",
                    "keywords": ["ai"],
                    "created_at": "2024-03-01T12:00:00.000Z",
                }
            }]
        })))
        .respond_with(task(5))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/1/indexes/tools_staging/operation"))
        .respond_with(task(6))
        .mount(&server)
        .await;

    migrate(&client(&server, 10), &tools(1)).await.unwrap();
}

#[tokio::test]
async fn failed_probe_aborts_before_touching_live_index() {
    let server = MockServer::start().await;
    mount_preamble(&server, json!([])).await;

    Mock::given(method("POST"))
        .and(path("/1/indexes/tools_staging/batch"))
        .respond_with(task(5))
        .expect(0)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/1/indexes/tools_staging/operation"))
        .respond_with(task(6))
        .expect(0)
        .mount(&server)
        .await;

    let err = migrate(&client(&server, 2), &tools(3)).await.unwrap_err();
    assert!(matches!(err, SearchError::Connectivity(_)), "{err}");
}

#[tokio::test]
async fn batch_failure_leaves_live_index_alone() {
    let server = MockServer::start().await;
    mount_preamble(&server, probe_found()).await;

    Mock::given(method("POST"))
        .and(path("/1/indexes/tools_staging/batch"))
        .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/1/indexes/tools_staging/operation"))
        .respond_with(task(6))
        .expect(0)
        .mount(&server)
        .await;

    let err = migrate(&client(&server, 2), &tools(3)).await.unwrap_err();
    match err {
        SearchError::Api { status, body } => {
            assert_eq!(status, 500);
            assert_eq!(body, "boom");
        }
        other => panic!("unexpected {other:?}"),
    }
}

#[tokio::test]
async fn unpublished_task_times_out() {
    let server = MockServer::start().await;
    Mock::given(method("PUT"))
        .and(path(PROBE))
        .respond_with(task(1))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path_regex(r"^/1/indexes/[^/]+/task/\d+$"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "status": "notPublished" })))
        .expect(3)
        .mount(&server)
        .await;

    let err = migrate(&client(&server, 2), &tools(1)).await.unwrap_err();
    assert!(
        matches!(err, SearchError::TaskTimeout { task_id: 1, attempts: 3, .. }),
        "{err}"
    );
}

#[tokio::test]
async fn move_task_is_polled_on_staging_index() {
    let server = MockServer::start().await;
    mount_preamble(&server, probe_found()).await;

    Mock::given(method("POST"))
        .and(path("/1/indexes/tools_staging/batch"))
        .respond_with(task(5))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/1/indexes/tools_staging/operation"))
        .respond_with(task(77))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/1/indexes/tools_staging/task/77"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "status": "published" })))
        .with_priority(1)
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/1/indexes/tools/task/77"))
        .respond_with(ResponseTemplate::new(404))
        .with_priority(1)
        .expect(0)
        .mount(&server)
        .await;

    let report = migrate(&client(&server, 10), &tools(2)).await.unwrap();
    assert_eq!(report.indexed, 2);
}
