//! End-to-end runs against the live mock GREYHOUND server.
//!
//! # Design
//! Starts the mock server on a random port, then drives the node through
//! `UreqTransport` over real HTTP, validating request building, basic auth
//! and response normalization together.

#![cfg(feature = "ureq")]

use greyhound_core::{
    FailurePolicy, GreyhoundClient, GreyhoundCredentials, NodeError, NodeExecutor,
    NodeParameters, UreqTransport,
};
use serde_json::json;

/// Start the mock server on a background runtime and return its base URL.
fn start_mock_server() -> String {
    let std_listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = std_listener.local_addr().unwrap();
    std_listener.set_nonblocking(true).unwrap();

    std::thread::spawn(move || {
        let rt = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .unwrap();
        rt.block_on(async {
            let listener = tokio::net::TcpListener::from_std(std_listener).unwrap();
            mock_server::run(listener).await
        })
        .unwrap();
    });

    format!("http://{addr}/rest")
}

fn executor(base_url: &str, password: &str, policy: FailurePolicy) -> NodeExecutor<UreqTransport> {
    let creds = GreyhoundCredentials::new(base_url, mock_server::DEFAULT_USERNAME, password);
    NodeExecutor::new(GreyhoundClient::new(&creds), UreqTransport::new(), policy)
}

#[test]
fn node_lifecycle() {
    let base_url = start_mock_server();
    let exec = executor(&base_url, mock_server::DEFAULT_PASSWORD, FailurePolicy::FailFast);

    // Step 1: list colors, one record per color.
    let records = exec
        .execute_forms(&[json!({"resource": "colors", "operation": "getAll"})])
        .unwrap();
    assert_eq!(records.len(), 3);
    assert_eq!(records[0].json["Name"], "Red");

    // Step 2: offset skips records.
    let records = exec
        .execute(&[NodeParameters::ListColors { offset: Some(2) }])
        .unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].json["ID"], 3);

    // Step 3: filter items by color and pair outputs with their inputs.
    let records = exec
        .execute_forms(&[
            json!({"resource": "groups", "operation": "get", "groupId": "2"}),
            json!({
                "resource": "items",
                "operation": "getAll",
                "additionalFields": {"colorIds": "1, 3,x"}
            }),
        ])
        .unwrap();
    assert_eq!(records.len(), 3);
    assert_eq!(records[0].json["Name"], "Support");
    assert_eq!(records[0].paired_item, 0);
    let item_ids: Vec<_> = records[1..].iter().map(|r| r.json["ID"].clone()).collect();
    assert_eq!(item_ids, vec![json!(1001), json!(1003)]);
    assert!(records[1..].iter().all(|r| r.paired_item == 1));

    // Step 4: listValues narrows the returned fields.
    let records = exec
        .execute_forms(&[json!({
            "resource": "items",
            "operation": "getAll",
            "additionalFields": {"listValues": [262144]}
        })])
        .unwrap();
    assert_eq!(records[0].json, json!({"ID": 1001, "Subject": "Welcome"}));

    // Step 5: create an item.
    let records = exec
        .execute_forms(&[json!({
            "resource": "items",
            "operation": "create",
            "groupRef": "2",
            "subject": "Printer on fire",
            "from": "Helpdesk <help@example.com>",
            "recipients": "ops@example.com, facilities@example.com",
            "emailContent": "<p>Please advise</p>",
            "colorRef": 3
        })])
        .unwrap();
    assert_eq!(records.len(), 1);
    let created = &records[0].json;
    assert_eq!(created["Subject"], "Printer on fire");
    assert_eq!(created["Recipients"][1]["Text"], "facilities@example.com");
    assert_eq!(created["Properties"]["Email"]["EditorData"], "<p>Please advise</p>");
    let id = created["ID"].to_string();

    // Step 6: fetch it back.
    let records = exec
        .execute(&[NodeParameters::GetItem { item_id: id }])
        .unwrap();
    assert_eq!(&records[0].json, created);

    // Step 7: unknown item is a failure.
    let err = exec
        .execute(&[NodeParameters::GetItem { item_id: "9999".into() }])
        .unwrap_err();
    assert!(matches!(err.source, NodeError::NotFound));
}

#[test]
fn bad_credentials_fail_or_collect() {
    let base_url = start_mock_server();

    let exec = executor(&base_url, "wrong", FailurePolicy::FailFast);
    let err = exec
        .execute(&[NodeParameters::ListColors { offset: None }])
        .unwrap_err();
    assert!(matches!(err.source, NodeError::Http { status: 401, .. }));

    let exec = executor(&base_url, "wrong", FailurePolicy::ContinueOnFail);
    let records = exec
        .execute(&[
            NodeParameters::ListColors { offset: None },
            NodeParameters::ListGroups { offset: None },
        ])
        .unwrap();
    assert_eq!(records.len(), 2);
    assert!(records
        .iter()
        .all(|r| r.json["error"].as_str().is_some_and(|e| e.starts_with("HTTP 401"))));
    assert_eq!(records[1].paired_item, 1);
}

#[test]
fn unreachable_server_is_a_transport_error() {
    // Bind then drop to get a port nobody listens on.
    let port = std::net::TcpListener::bind("127.0.0.1:0")
        .unwrap()
        .local_addr()
        .unwrap()
        .port();
    let exec = executor(
        &format!("http://127.0.0.1:{port}/rest"),
        "secret",
        FailurePolicy::ContinueOnFail,
    );
    let records = exec
        .execute(&[NodeParameters::ListColors { offset: None }])
        .unwrap();
    assert!(records[0].json["error"]
        .as_str()
        .unwrap()
        .starts_with("transport error"));
}
