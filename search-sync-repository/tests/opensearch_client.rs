use std::net::TcpListener;
use std::time::Duration;

use search_sync_repository::{ConnectionConfig, OpenSearchClient, SearchEngineClient, SearchError};
use serde_json::json;
use wiremock::matchers::{body_json, body_string_contains, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn config_for(url: impl Into<String>) -> ConnectionConfig {
    let mut config = ConnectionConfig::new(url)
        .with_max_retries(2)
        .with_request_timeout(Duration::from_secs(5));
    config.initial_retry_delay = Duration::from_millis(10);
    config.max_retry_delay = Duration::from_millis(50);
    config
}

fn client_for(server: &MockServer) -> OpenSearchClient {
    OpenSearchClient::new(config_for(server.uri())).unwrap()
}

// ── list_indices ────────────────────────────────────────────────

#[tokio::test]
async fn list_indices_sorts_and_skips_hidden_indices() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/_cat/indices"))
        .and(query_param("format", "json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            { "index": "books", "health": "green" },
            { "index": ".kibana_1", "health": "green" },
            { "index": "authors", "health": "yellow" },
            { "index": ".opendistro-job-scheduler-lock", "health": "green" }
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let indices = client_for(&server).list_indices().await.unwrap();
    assert_eq!(indices, vec!["authors".to_string(), "books".to_string()]);
}

#[tokio::test]
async fn list_indices_error_status_is_not_retried() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/_cat/indices"))
        .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
        .expect(1)
        .mount(&server)
        .await;

    let result = client_for(&server).list_indices().await;
    assert!(matches!(result, Err(SearchError::ConnectionError(_))));
}

// ── index_exists ────────────────────────────────────────────────

#[tokio::test]
async fn index_exists_maps_head_status() {
    let server = MockServer::start().await;

    Mock::given(method("HEAD"))
        .and(path("/books"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&server)
        .await;
    Mock::given(method("HEAD"))
        .and(path("/missing"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let client = client_for(&server);
    assert!(client.index_exists("books").await.unwrap());
    assert!(!client.index_exists("missing").await.unwrap());
}

// ── create_index ────────────────────────────────────────────────

#[tokio::test]
async fn create_index_sends_mapping_body() {
    let server = MockServer::start().await;
    let body = json!({
        "mappings": { "properties": { "title": { "type": "text" } } },
        "aliases": { "library": {} }
    });

    Mock::given(method("PUT"))
        .and(path("/books"))
        .and(body_json(body.clone()))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "acknowledged": true,
            "index": "books"
        })))
        .expect(1)
        .mount(&server)
        .await;

    client_for(&server).create_index("books", body).await.unwrap();
}

#[tokio::test]
async fn create_index_rejected_by_engine() {
    let server = MockServer::start().await;

    Mock::given(method("PUT"))
        .and(path("/books"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "error": { "type": "resource_already_exists_exception", "reason": "index [books] already exists" },
            "status": 400
        })))
        .expect(1)
        .mount(&server)
        .await;

    let result = client_for(&server).create_index("books", json!({})).await;
    match result {
        Err(SearchError::IndexCreationError(msg)) => assert!(msg.contains("already exists")),
        other => panic!("expected index creation error, got {:?}", other),
    }
}

// ── bulk ────────────────────────────────────────────────────────

#[tokio::test]
async fn bulk_sends_ndjson_with_refresh_and_reports_item_failures() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/_bulk"))
        .and(query_param("refresh", "true"))
        .and(body_string_contains("\"_id\":\"1\""))
        .and(body_string_contains("\"title\":\"Dune\""))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "took": 3,
            "errors": true,
            "items": [
                { "index": { "_index": "books", "_id": "1", "status": 201 } },
                { "index": {
                    "_index": "books",
                    "_id": "2",
                    "status": 400,
                    "error": { "type": "mapper_parsing_exception", "reason": "failed to parse field [year]" }
                } }
            ]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let lines = vec![
        json!({ "index": { "_index": "books", "_id": "1" } }),
        json!({ "title": "Dune" }),
        json!({ "index": { "_index": "books", "_id": "2" } }),
        json!({ "title": "Earthsea", "year": "soon" }),
    ];
    let summary = client_for(&server).bulk(lines, true).await.unwrap();

    assert_eq!(summary.total, 2);
    assert_eq!(summary.succeeded, 1);
    assert_eq!(summary.failed, 1);
    assert_eq!(summary.failures[0].id, "2");
    assert_eq!(summary.failures[0].status, 400);
    assert_eq!(summary.failures[0].reason, "failed to parse field [year]");

    let requests = server.received_requests().await.unwrap();
    let sent = String::from_utf8_lossy(&requests[0].body).to_string();
    assert_eq!(sent.lines().count(), 4);
}

#[tokio::test]
async fn bulk_without_refresh_omits_parameter() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/_bulk"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "errors": false, "items": [] })))
        .expect(1)
        .mount(&server)
        .await;

    let summary = client_for(&server).bulk(Vec::new(), false).await.unwrap();
    assert!(!summary.has_failures());

    let requests = server.received_requests().await.unwrap();
    assert!(requests[0].url.query_pairs().all(|(key, _)| key != "refresh"));
}

#[tokio::test]
async fn bulk_rejected_as_a_whole() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/_bulk"))
        .respond_with(ResponseTemplate::new(413).set_body_string("request entity too large"))
        .mount(&server)
        .await;

    let result = client_for(&server).bulk(vec![json!({ "index": {} })], false).await;
    assert!(matches!(result, Err(SearchError::BulkIndexError(_))));
}

// ── search / msearch ────────────────────────────────────────────

#[tokio::test]
async fn search_posts_body_to_index() {
    let server = MockServer::start().await;
    let body = json!({ "query": { "match_all": {} }, "from": 20, "size": 5 });

    Mock::given(method("POST"))
        .and(path("/books/_search"))
        .and(body_json(body.clone()))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "hits": { "total": { "value": 1 }, "hits": [{ "_id": "1", "_source": { "title": "Dune" } }] }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let response = client_for(&server)
        .search(&["books".to_string()], body)
        .await
        .unwrap();
    assert_eq!(response["hits"]["hits"][0]["_source"]["title"], "Dune");
}

#[tokio::test]
async fn search_error_carries_engine_error_object() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/books/_search"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "error": { "type": "parsing_exception", "reason": "unknown query [mtch]" },
            "status": 400
        })))
        .expect(1)
        .mount(&server)
        .await;

    let error = client_for(&server)
        .search(&["books".to_string()], json!({ "query": { "mtch": {} } }))
        .await
        .unwrap_err();

    assert!(!error.is_retryable());
    assert_eq!(error.body().unwrap()["type"], "parsing_exception");
}

#[tokio::test]
async fn search_error_with_plain_text_body() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/books/_search"))
        .respond_with(ResponseTemplate::new(502).set_body_string("bad gateway"))
        .mount(&server)
        .await;

    let error = client_for(&server)
        .search(&["books".to_string()], json!({}))
        .await
        .unwrap_err();

    match error {
        SearchError::QueryError { message, body } => {
            assert!(message.contains("bad gateway"));
            assert!(body.is_none());
        }
        other => panic!("expected query error, got {:?}", other),
    }
}

#[tokio::test]
async fn msearch_posts_header_and_body_lines() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/_msearch"))
        .and(body_string_contains("\"index\":\"authors\""))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "responses": [
                { "hits": { "hits": [] } },
                { "hits": { "hits": [{ "_id": "7" }] } }
            ]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let lines = vec![
        json!({ "index": "books" }),
        json!({ "query": { "match_all": {} } }),
        json!({ "index": "authors" }),
        json!({ "query": { "match_all": {} } }),
    ];
    let response = client_for(&server).msearch(lines).await.unwrap();

    assert_eq!(response["responses"].as_array().unwrap().len(), 2);
    assert_eq!(response["responses"][1]["hits"]["hits"][0]["_id"], "7");
}

// ── health_check ────────────────────────────────────────────────

#[tokio::test]
async fn health_check_reads_cluster_status() {
    for (status, expected) in [("green", true), ("yellow", true), ("red", false)] {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/_cluster/health"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "cluster_name": "docker-cluster",
                "status": status
            })))
            .mount(&server)
            .await;

        assert_eq!(client_for(&server).health_check().await.unwrap(), expected, "{}", status);
    }
}

#[tokio::test]
async fn health_check_unhealthy_on_error_status() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/_cluster/health"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    assert!(!client_for(&server).health_check().await.unwrap());
}

// ── retries ─────────────────────────────────────────────────────

#[tokio::test]
async fn timed_out_request_is_retried() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/_cluster/health"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({ "status": "green" }))
                .set_delay(Duration::from_secs(2)),
        )
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/_cluster/health"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "status": "green" })))
        .mount(&server)
        .await;

    let config = config_for(server.uri()).with_request_timeout(Duration::from_millis(200));
    let client = OpenSearchClient::new(config).unwrap();

    assert!(client.health_check().await.unwrap());
    assert_eq!(server.received_requests().await.unwrap().len(), 2);
}

#[tokio::test]
async fn unreachable_engine_fails_after_retries() {
    // Bind then drop to get a port nobody listens on.
    let port = {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        listener.local_addr().unwrap().port()
    };
    let client = OpenSearchClient::new(config_for(format!("http://127.0.0.1:{}", port))).unwrap();

    let error = client.list_indices().await.unwrap_err();
    assert!(matches!(error, SearchError::ConnectionError(_)));
    assert!(error.is_retryable());
}
