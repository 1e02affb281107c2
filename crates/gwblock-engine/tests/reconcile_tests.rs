//! End-to-end reconciliation tests against a mock Gateway API.

use gwblock_client::{GatewayClient, RetryPolicy};
use gwblock_engine::{RunOutcome, SyncManager};
use serde_json::json;
use std::time::Duration;
use wiremock::matchers::{body_partial_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn test_manager(server: &MockServer) -> SyncManager {
    let client = GatewayClient::builder("test-token", "acct")
        .base_url(server.uri())
        .mutation_interval(Duration::from_millis(1))
        .retry(
            RetryPolicy::default()
                .multiplier(Duration::from_millis(5))
                .max_wait(Duration::from_millis(20)),
        )
        .build();
    SyncManager::new(client, "Test")
}

async fn mount_empty_remote(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/lists"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "result": null })))
        .mount(server)
        .await;
    Mock::given(method("GET"))
        .and(path("/rules"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "result": null })))
        .mount(server)
        .await;
}

#[tokio::test]
async fn first_run_creates_lists_and_policy() {
    let server = MockServer::start().await;
    mount_empty_remote(&server).await;

    Mock::given(method("POST"))
        .and(path("/lists"))
        .and(body_partial_json(json!({ "name": "[AdBlock-Test] - 001" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "result": { "id": "newlist", "name": "[AdBlock-Test] - 001", "count": 3 }
        })))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/rules"))
        .and(body_partial_json(json!({
            "name": "[AdBlock-Test] Block Ads",
            "traffic": "any(dns.domains[*] in $newlist)"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "result": { "id": "newpolicy", "name": "[AdBlock-Test] Block Ads", "enabled": true }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let manager = test_manager(&server);
    let outcome = manager
        .run("a.example.com\nb.example.com\nc.example.com", "")
        .await
        .unwrap();
    assert_eq!(
        outcome,
        RunOutcome::Applied {
            domains: 3,
            operations: 2
        }
    );
}

#[tokio::test]
async fn matching_remote_state_is_converged() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/lists"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "result": [{ "id": "l1", "name": "[AdBlock-Test] - 001", "count": 2 }]
        })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/rules"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "result": [{ "id": "p1", "name": "[AdBlock-Test] Block Ads", "enabled": true }]
        })))
        .mount(&server)
        .await;

    let manager = test_manager(&server);
    let outcome = manager
        .run("a.example.com\nb.example.com", "")
        .await
        .unwrap();
    assert_eq!(outcome, RunOutcome::Converged { domains: 2 });

    // Count-only comparison: no list or policy mutation happened.
    let mutations = server
        .received_requests()
        .await
        .unwrap()
        .iter()
        .filter(|r| r.method != wiremock::http::Method::GET)
        .count();
    assert_eq!(mutations, 0);
}

#[tokio::test]
async fn changed_remote_state_triggers_full_resync() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/lists"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "result": [{ "id": "stale", "name": "[AdBlock-Test] - 001", "count": 9 }]
        })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/rules"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "result": [{ "id": "p1", "name": "[AdBlock-Test] Block Ads", "enabled": true }]
        })))
        .mount(&server)
        .await;

    Mock::given(method("DELETE"))
        .and(path("/rules/p1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "result": null })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .and(path("/lists/stale"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "result": null })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/lists"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "result": { "id": "fresh", "name": "[AdBlock-Test] - 001", "count": 1 }
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/rules"))
        .and(body_partial_json(json!({
            "traffic": "any(dns.domains[*] in $fresh)"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "result": { "id": "p2", "name": "[AdBlock-Test] Block Ads", "enabled": true }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let manager = test_manager(&server);
    let outcome = manager.run("only.example.com", "").await.unwrap();
    assert_eq!(
        outcome,
        RunOutcome::Applied {
            domains: 1,
            operations: 4
        }
    );
}

#[tokio::test]
async fn empty_domain_set_makes_no_remote_calls() {
    let server = MockServer::start().await;
    let manager = test_manager(&server);

    let outcome = manager.run("# only comments here\n\n", "").await.unwrap();
    assert_eq!(outcome, RunOutcome::SkippedEmpty);
    assert!(server.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn oversized_domain_set_makes_no_remote_calls() {
    let server = MockServer::start().await;
    let manager = test_manager(&server);

    let corpus: String = (0..300_001)
        .map(|i| format!("d{i}.example.com\n"))
        .collect();
    let outcome = manager.run(&corpus, "").await.unwrap();
    assert_eq!(outcome, RunOutcome::SkippedOversized { total: 300_001 });
    assert!(server.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn multiple_owned_policies_are_fatal() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/lists"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "result": [{ "id": "l1", "name": "[AdBlock-Test] - 001", "count": 1 }]
        })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/rules"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "result": [
                { "id": "p1", "name": "[AdBlock-Test] Block Ads", "enabled": true },
                { "id": "p2", "name": "[AdBlock-Test] Block Ads", "enabled": true }
            ]
        })))
        .mount(&server)
        .await;

    let manager = test_manager(&server);
    let err = manager.run("one.example.com", "").await.unwrap_err();
    assert!(matches!(
        err,
        gwblock_core::GatewayError::PolicyConflict { count: 2 }
    ));
}

#[tokio::test]
async fn leave_is_idempotent() {
    let server = MockServer::start().await;

    // First pass sees one policy and one list, second pass sees nothing.
    Mock::given(method("GET"))
        .and(path("/rules"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "result": [{ "id": "p1", "name": "[AdBlock-Test] Block Ads", "enabled": true }]
        })))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/lists"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "result": [{ "id": "l1", "name": "[AdBlock-Test] - 001", "count": 1 }]
        })))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "result": null })))
        .mount(&server)
        .await;

    Mock::given(method("DELETE"))
        .and(path("/rules/p1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "result": null })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .and(path("/lists/l1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "result": null })))
        .expect(1)
        .mount(&server)
        .await;

    let manager = test_manager(&server);
    manager.leave().await.unwrap();
    manager.leave().await.unwrap();
}
