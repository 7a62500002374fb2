//! End-to-end tests for the agent count against a mock asset inventory API.

use deskreport::api::AssetClient;
use deskreport::export::{export_assets_json, report_agent_count};
use deskreport::pipeline::{run_agent_count, Failure, FailureLog};
use serde_json::{json, Value};
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const ASSETS_PATH: &str = "/api/v1.0/assetmgmt/assets";

fn asset_page(total: u64, range: std::ops::Range<u64>) -> Value {
    let result: Vec<Value> = range
        .map(|i| json!({"AssetId": i, "AssetName": format!("ws-{i:03}"), "IsComputerAgent": i % 2 == 0}))
        .collect();
    json!({"TotalRecords": total, "Result": result})
}

async fn mount_page(server: &MockServer, skip: u64, body: Value) {
    Mock::given(method("GET"))
        .and(path(ASSETS_PATH))
        .and(query_param("$skip", skip.to_string()))
        .and(query_param("$top", "100"))
        .and(header("authorization", "Bearer rmm-token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .expect(1)
        .mount(server)
        .await;
}

#[tokio::test]
async fn pages_by_skip_until_total_reached() {
    let server = MockServer::start().await;
    mount_page(&server, 0, asset_page(250, 0..100)).await;
    mount_page(&server, 100, asset_page(250, 100..200)).await;
    mount_page(&server, 200, asset_page(250, 200..250)).await;

    let client = AssetClient::new(server.uri(), None, "rmm-token");
    let mut failures = FailureLog::new();
    let result = run_agent_count(&client, 100, &mut failures).await;

    assert_eq!(result.assets.len(), 250);
    assert_eq!(result.computer_agents, 125);
    assert!(failures.is_empty());

    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("response.json");
    export_assets_json(&out, &result.assets).unwrap();
    let written: Value = serde_json::from_str(&std::fs::read_to_string(&out).unwrap()).unwrap();
    let array = written.as_array().unwrap();
    assert_eq!(array.len(), 250);
    assert_eq!(array[0], json!({"AssetId": 0, "AssetName": "ws-000", "IsComputerAgent": true}));
    assert_eq!(array[249]["AssetId"], 249);

    let mut printed = Vec::new();
    report_agent_count(&mut printed, result.computer_agents).unwrap();
    assert_eq!(String::from_utf8(printed).unwrap(), "Total computer agents: 125\n");
}

#[tokio::test]
async fn empty_inventory_writes_empty_array() {
    let server = MockServer::start().await;
    mount_page(&server, 0, json!({"TotalRecords": 0, "Result": []})).await;

    let client = AssetClient::new(server.uri(), None, "rmm-token");
    let mut failures = FailureLog::new();
    let result = run_agent_count(&client, 100, &mut failures).await;

    assert!(result.assets.is_empty());
    assert_eq!(result.computer_agents, 0);

    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("response.json");
    export_assets_json(&out, &result.assets).unwrap();
    assert_eq!(std::fs::read_to_string(&out).unwrap(), "[]");
}

#[tokio::test]
async fn server_error_keeps_pages_already_fetched() {
    let server = MockServer::start().await;
    mount_page(&server, 0, asset_page(300, 0..100)).await;
    Mock::given(method("GET"))
        .and(path(ASSETS_PATH))
        .and(query_param("$skip", "100"))
        .respond_with(ResponseTemplate::new(500).set_body_string("internal error"))
        .expect(1)
        .mount(&server)
        .await;

    let client = AssetClient::new(server.uri(), None, "rmm-token");
    let mut failures = FailureLog::new();
    let result = run_agent_count(&client, 100, &mut failures).await;

    assert_eq!(result.assets.len(), 100);
    assert_eq!(result.computer_agents, 50);
    assert_eq!(failures.len(), 1);
    assert!(matches!(
        failures.failures()[0],
        Failure::PageFetch {
            resource: "assets",
            page: 2,
            ..
        }
    ));
}

#[tokio::test]
async fn unauthorized_token_yields_empty_result() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(ASSETS_PATH))
        .respond_with(ResponseTemplate::new(401))
        .expect(1)
        .mount(&server)
        .await;

    let client = AssetClient::new(server.uri(), None, "expired");
    let mut failures = FailureLog::new();
    let result = run_agent_count(&client, 100, &mut failures).await;

    assert!(result.assets.is_empty());
    assert!(matches!(
        &failures.failures()[0],
        Failure::PageFetch { error, .. } if error.is_auth_error()
    ));
}
