//! Verify request building and response parsing against the JSON test
//! vectors stored in `test-vectors/`.
//!
//! Bodies are compared as parsed JSON, not raw strings, so key order does
//! not matter.

use greyhound_core::{
    GreyhoundClient, GreyhoundCredentials, HttpMethod, HttpResponse, NodeError, NodeParameters,
    OutputRecord,
};

/// Parse the method string from test vectors into `HttpMethod`.
fn parse_method(s: &str) -> HttpMethod {
    match s {
        "GET" => HttpMethod::Get,
        "POST" => HttpMethod::Post,
        other => panic!("unknown method: {other}"),
    }
}

fn error_name(err: &NodeError) -> &'static str {
    match err {
        NodeError::MissingParameter(_) => "MissingParameter",
        NodeError::InvalidParameter { .. } => "InvalidParameter",
        NodeError::MissingCredential(_) => "MissingCredential",
        NodeError::UnsupportedOperation { .. } => "UnsupportedOperation",
        NodeError::NotFound => "NotFound",
        NodeError::Http { .. } => "Http",
        NodeError::Transport(_) => "Transport",
        NodeError::Deserialization(_) => "Deserialization",
        NodeError::Serialization(_) => "Serialization",
    }
}

// ---------------------------------------------------------------------------
// Requests
// ---------------------------------------------------------------------------

#[test]
fn request_test_vectors() {
    let raw = include_str!("../../test-vectors/requests.json");
    let vectors: serde_json::Value = serde_json::from_str(raw).unwrap();

    let base_url = vectors["base_url"].as_str().unwrap();
    let creds = GreyhoundCredentials::new(
        base_url,
        vectors["username"].as_str().unwrap(),
        vectors["password"].as_str().unwrap(),
    );
    let c = GreyhoundClient::new(&creds);

    for case in vectors["cases"].as_array().unwrap() {
        let name = case["name"].as_str().unwrap();
        let result = NodeParameters::from_form(&case["form"]).and_then(|p| c.build_request(&p));

        if let Some(expected_error) = case.get("expected_error") {
            let err = result.expect_err(name);
            assert_eq!(error_name(&err), expected_error.as_str().unwrap(), "{name}: error");
            continue;
        }

        let req = result.unwrap_or_else(|e| panic!("{name}: {e}"));
        let expected = &case["expected_request"];
        assert_eq!(req.method, parse_method(expected["method"].as_str().unwrap()), "{name}: method");
        assert_eq!(req.url, format!("{base_url}{}", expected["path"].as_str().unwrap()), "{name}: url");

        let expected_query: Vec<(String, String)> = expected["query"]
            .as_array()
            .unwrap()
            .iter()
            .map(|pair| {
                let arr = pair.as_array().unwrap();
                (arr[0].as_str().unwrap().to_string(), arr[1].as_str().unwrap().to_string())
            })
            .collect();
        assert_eq!(req.query, expected_query, "{name}: query");

        assert_eq!(req.header("authorization"), Some(creds.authorization_header().as_str()), "{name}: auth");
        assert_eq!(req.header("accept"), Some("application/json"), "{name}: accept");

        match expected.get("body") {
            Some(expected_body) => {
                let body: serde_json::Value = serde_json::from_str(req.body.as_deref().unwrap()).unwrap();
                assert_eq!(&body, expected_body, "{name}: body");
            }
            None => assert!(req.body.is_none(), "{name}: body should be None"),
        }
    }
}

// ---------------------------------------------------------------------------
// Responses
// ---------------------------------------------------------------------------

#[test]
fn response_test_vectors() {
    let raw = include_str!("../../test-vectors/responses.json");
    let vectors: serde_json::Value = serde_json::from_str(raw).unwrap();

    let c = GreyhoundClient::new(&GreyhoundCredentials::new("http://localhost:3000/rest", "u", "p"));
    for case in vectors["cases"].as_array().unwrap() {
        let name = case["name"].as_str().unwrap();
        let paired_item = case["paired_item"].as_u64().unwrap() as usize;
        let sim = &case["simulated_response"];
        let response = HttpResponse {
            status: sim["status"].as_u64().unwrap() as u16,
            headers: Vec::new(),
            body: sim["body"].as_str().unwrap().to_string(),
        };
        let result = c.parse_response(response, paired_item);

        if let Some(expected_error) = case.get("expected_error") {
            let err = result.expect_err(name);
            assert_eq!(error_name(&err), expected_error.as_str().unwrap(), "{name}: error");
        } else {
            let records = result.unwrap_or_else(|e| panic!("{name}: {e}"));
            let expected: Vec<OutputRecord> =
                serde_json::from_value(case["expected_records"].clone()).unwrap();
            assert_eq!(records, expected, "{name}: records");
        }
    }
}
