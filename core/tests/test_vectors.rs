//! Verify request building and response parsing against the JSON test
//! vectors stored in `test-vectors/`.
//!
//! Each request case names a catalog endpoint, its path arguments and call
//! parameters, and the exact request the client must produce. Bodies are
//! compared as parsed JSON so field order does not matter.

use gitlab_core::{
    api, ApiError, Client, HttpMethod, HttpResponse, ParamValue, Params, PathArg, ResourceId,
    ValidationError,
};
use serde_json::Value;

fn load(raw: &str) -> Value {
    serde_json::from_str(raw).unwrap()
}

/// Parse the method string from test vectors into `HttpMethod`.
fn parse_method(s: &str) -> HttpMethod {
    match s {
        "GET" => HttpMethod::Get,
        "POST" => HttpMethod::Post,
        "PUT" => HttpMethod::Put,
        "DELETE" => HttpMethod::Delete,
        other => panic!("unknown method: {other}"),
    }
}

fn path_args(case: &Value) -> Vec<PathArg<'_>> {
    case["path"]
        .as_object()
        .unwrap()
        .iter()
        .map(|(name, value)| (name.as_str(), ResourceId::from_json(value).unwrap()))
        .collect()
}

fn params(case: &Value) -> Params {
    case["params"]
        .as_object()
        .unwrap()
        .iter()
        .map(|(key, value)| (key.clone(), ParamValue::from_json(value).unwrap()))
        .collect()
}

fn build(client: &Client, case: &Value) -> Result<gitlab_core::HttpRequest, ApiError> {
    let name = case["endpoint"].as_str().unwrap();
    let endpoint = api::find(name).unwrap_or_else(|| panic!("unknown endpoint: {name}"));
    client.build(endpoint, &path_args(case), params(case))
}

// ---------------------------------------------------------------------------
// Requests
// ---------------------------------------------------------------------------

#[test]
fn request_test_vectors() {
    let vectors = load(include_str!("../../test-vectors/requests.json"));
    let base_url = vectors["base_url"].as_str().unwrap();
    let client = Client::new(base_url);

    for case in vectors["cases"].as_array().unwrap() {
        let name = case["name"].as_str().unwrap();
        let expected = &case["expected_request"];

        let req = build(&client, case).unwrap_or_else(|e| panic!("{name}: {e}"));
        assert_eq!(req.method, parse_method(expected["method"].as_str().unwrap()), "{name}: method");
        assert_eq!(
            req.path,
            format!("{base_url}{}", expected["path"].as_str().unwrap()),
            "{name}: path"
        );

        match &expected["body"] {
            Value::Null => {
                assert!(req.body.is_none(), "{name}: expected no body, got {:?}", req.body);
                assert!(req.headers.is_empty(), "{name}: headers");
            }
            body => {
                let actual: Value = serde_json::from_str(req.body.as_deref().unwrap()).unwrap();
                assert_eq!(&actual, body, "{name}: body");
                assert_eq!(
                    req.headers,
                    vec![("content-type".to_string(), "application/json".to_string())],
                    "{name}: headers"
                );
            }
        }
    }
}

#[test]
fn token_is_sent_on_every_request() {
    let vectors = load(include_str!("../../test-vectors/requests.json"));
    let client = Client::new(vectors["base_url"].as_str().unwrap()).with_token("secret");

    for case in vectors["cases"].as_array().unwrap() {
        let req = build(&client, case).unwrap();
        assert!(
            req.headers
                .contains(&("private-token".to_string(), "secret".to_string())),
            "{}",
            case["name"]
        );
    }
}

// ---------------------------------------------------------------------------
// Validation failures
// ---------------------------------------------------------------------------

fn describe(err: &ValidationError) -> (&'static str, &str) {
    match err {
        ValidationError::UnknownParameter(key) => ("UnknownParameter", key),
        ValidationError::MissingRequiredParameter(key) => ("MissingRequiredParameter", key),
        ValidationError::InvalidType { key, .. } => ("InvalidType", key),
        ValidationError::InvalidValue { key, .. } => ("InvalidValue", key),
    }
}

#[test]
fn error_test_vectors() {
    let vectors = load(include_str!("../../test-vectors/errors.json"));
    let client = Client::new("http://localhost/api/v4");

    for case in vectors["cases"].as_array().unwrap() {
        let name = case["name"].as_str().unwrap();
        let expected = &case["expected_error"];

        let err = build(&client, case).expect_err(name);
        let validation = err
            .validation()
            .unwrap_or_else(|| panic!("{name}: expected a validation error, got {err:?}"));
        let (kind, key) = describe(validation);
        assert_eq!(kind, expected["kind"].as_str().unwrap(), "{name}: kind");
        assert_eq!(key, expected["key"].as_str().unwrap(), "{name}: key");
    }
}

// ---------------------------------------------------------------------------
// Responses
// ---------------------------------------------------------------------------

fn response(case: &Value) -> HttpResponse {
    let raw = &case["response"];
    HttpResponse {
        status: raw["status"].as_u64().unwrap() as u16,
        headers: raw["headers"]
            .as_array()
            .unwrap()
            .iter()
            .map(|pair| {
                (
                    pair[0].as_str().unwrap().to_string(),
                    pair[1].as_str().unwrap().to_string(),
                )
            })
            .collect(),
        body: raw["body"].as_str().unwrap().to_string(),
    }
}

#[test]
fn response_test_vectors() {
    let vectors = load(include_str!("../../test-vectors/responses.json"));
    let client = Client::new("http://localhost/api/v4");

    for case in vectors["cases"].as_array().unwrap() {
        let name = case["name"].as_str().unwrap();
        let result = client.parse(response(case));

        if let Some(expected) = case.get("expected") {
            let payload = result.unwrap_or_else(|e| panic!("{name}: {e}"));
            assert_eq!(payload.body, expected["body"], "{name}: body");
            assert_eq!(
                payload.pagination.next_page.map(u64::from),
                expected["next_page"].as_u64(),
                "{name}: next page"
            );
            continue;
        }

        let expected = &case["expected_error"];
        let err = result.expect_err(name);
        match (expected["kind"].as_str().unwrap(), &err) {
            ("NotFound", ApiError::NotFound) => {}
            ("HttpError", ApiError::HttpError { status, .. }) => {
                assert_eq!(u64::from(*status), expected["status"].as_u64().unwrap(), "{name}");
            }
            ("DeserializationError", ApiError::DeserializationError(_)) => {}
            (kind, other) => panic!("{name}: expected {kind}, got {other:?}"),
        }
    }
}
