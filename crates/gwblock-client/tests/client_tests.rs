//! Integration tests for the resilient client against a mock Gateway API.

use gwblock_client::{GatewayClient, RetryPolicy};
use serde_json::json;
use std::time::{Duration, Instant};
use wiremock::matchers::{body_partial_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn test_client(server: &MockServer) -> GatewayClient {
    GatewayClient::builder("test-token", "acct")
        .base_url(server.uri())
        .mutation_interval(Duration::from_millis(1))
        .retry(
            RetryPolicy::default()
                .multiplier(Duration::from_millis(5))
                .max_wait(Duration::from_millis(20)),
        )
        .build()
}

#[tokio::test]
async fn sends_bearer_token() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/lists"))
        .and(header("authorization", "Bearer test-token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "result": [] })))
        .expect(1)
        .mount(&server)
        .await;

    let client = test_client(&server);
    let lists = client.lists().all("[AdBlock-Test]").await.unwrap();
    assert!(lists.is_empty());
}

#[tokio::test]
async fn retries_server_errors_until_success() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/lists"))
        .respond_with(ResponseTemplate::new(502))
        .up_to_n_times(2)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/lists"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "result": [{ "id": "l1", "name": "[AdBlock-Test] - 001", "count": 3 }]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = test_client(&server);
    let lists = client.lists().all("[AdBlock-Test]").await.unwrap();
    assert_eq!(lists.len(), 1);
    assert_eq!(lists[0].id, "l1");
}

#[tokio::test]
async fn retries_decode_failures() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/lists"))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/lists"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "result": null })))
        .mount(&server)
        .await;

    let client = test_client(&server);
    let lists = client.lists().all("[AdBlock-Test]").await.unwrap();
    assert!(lists.is_empty());
}

#[tokio::test]
async fn null_result_collections_are_empty() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/rules"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "result": null })))
        .mount(&server)
        .await;

    let client = test_client(&server);
    let policies = client.policies().all("[AdBlock-Test]").await.unwrap();
    assert!(policies.is_empty());
}

#[tokio::test]
async fn list_fetch_drops_foreign_names() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/lists"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "result": [
                { "id": "mine", "name": "[AdBlock-Test] - 001", "count": 1 },
                { "id": "theirs", "name": "Corporate allowlist", "count": 9 }
            ]
        })))
        .mount(&server)
        .await;

    let client = test_client(&server);
    let lists = client.lists().all("[AdBlock-Test]").await.unwrap();
    assert_eq!(lists.len(), 1);
    assert_eq!(lists[0].id, "mine");
}

#[tokio::test]
async fn create_list_sends_domain_payload() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/lists"))
        .and(body_partial_json(json!({
            "name": "[AdBlock-Test] - 001",
            "type": "DOMAIN",
            "items": [{ "value": "a.example.com" }, { "value": "b.example.com" }]
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "result": { "id": "created", "name": "[AdBlock-Test] - 001", "count": 2 }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = test_client(&server);
    let created = client
        .lists()
        .create(
            "[AdBlock-Test] - 001",
            &["a.example.com".into(), "b.example.com".into()],
        )
        .await
        .unwrap();
    assert_eq!(created.id, "created");
}

#[tokio::test]
async fn create_policy_sends_block_payload() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/rules"))
        .and(body_partial_json(json!({
            "action": "block",
            "enabled": true,
            "filters": ["dns"],
            "traffic": "any(dns.domains[*] in $l1)orany(dns.domains[*] in $l2)",
            "rule_settings": { "block_page_enabled": false }
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "result": { "id": "p1", "name": "[AdBlock-Test] Block Ads", "enabled": true }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = test_client(&server);
    let policy = client
        .policies()
        .create("[AdBlock-Test] Block Ads", &["l1".into(), "l2".into()])
        .await
        .unwrap();
    assert_eq!(policy.id, "p1");
}

#[tokio::test]
async fn update_items_patches_the_list() {
    let server = MockServer::start().await;
    Mock::given(method("PATCH"))
        .and(path("/lists/l1"))
        .and(body_partial_json(json!({
            "append": [{ "value": "new.example.com" }],
            "remove": ["old.example.com"]
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "result": { "id": "l1", "name": "[AdBlock-Test] - 001", "count": 1 }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = test_client(&server);
    let patch = gwblock_core::PatchListRequest {
        append: vec![gwblock_core::ListItem::new("new.example.com")],
        remove: vec!["old.example.com".into()],
    };
    let updated = client.lists().update_items("l1", &patch).await.unwrap();
    assert_eq!(updated.count, 1);
}

#[tokio::test]
async fn list_items_pass_the_limit() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/lists/l1/items"))
        .and(query_param("limit", "50"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "result": [{ "value": "a.example.com" }]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = test_client(&server);
    let items = client.lists().items("l1", 50).await.unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0].value, "a.example.com");
}

#[tokio::test]
async fn mutations_are_rate_limited() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "result": null })))
        .mount(&server)
        .await;

    let client = GatewayClient::builder("t", "a")
        .base_url(server.uri())
        .mutation_interval(Duration::from_millis(150))
        .build();

    let start = Instant::now();
    client.lists().delete("l1").await.unwrap();
    client.lists().delete("l2").await.unwrap();
    // The second delete must wait out the mutation interval.
    assert!(start.elapsed() >= Duration::from_millis(100));
}

#[tokio::test]
async fn cancellation_stops_the_retry_loop() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/lists"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let client = test_client(&server);
    let handle = client.cancel_handle();
    let task = tokio::spawn(async move { client.lists().all("[AdBlock-Test]").await });

    tokio::time::sleep(Duration::from_millis(30)).await;
    handle.cancel();

    let result = task.await.unwrap();
    assert!(matches!(
        result,
        Err(gwblock_client::GatewayError::Cancelled)
    ));
}
