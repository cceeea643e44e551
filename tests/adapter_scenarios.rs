//! End-to-end adapter behaviour over gateway-shaped events.

use std::sync::Arc;

use gateway_adapter::config::AdapterConfig;
use gateway_adapter::lifecycle::startup::build_adapter_with;
use gateway_adapter::InvocationEnvelope;
use serde_json::json;

mod common;

#[test]
fn test_root_greeting() {
    let response = common::adapter().handle(InvocationEnvelope::new("GET", "/"));

    assert_eq!(response.status_code, 200);
    assert_eq!(
        response.json_body().unwrap(),
        json!({ "status": 200, "message": "Hello Flask!" })
    );
    assert_eq!(response.header("Content-Type"), Some("application/json"));
}

#[test]
fn test_list_users() {
    let response = common::adapter().handle(InvocationEnvelope::new("GET", "/users"));

    assert_eq!(response.status_code, 200);
    assert_eq!(response.json_body().unwrap(), json!({ "users": ["123", "456"] }));
}

#[test]
fn test_get_user() {
    let response = common::adapter().handle(InvocationEnvelope::new("GET", "/users/42"));

    assert_eq!(response.status_code, 200);
    assert_eq!(
        response.json_body().unwrap(),
        json!({ "user_id": "42", "name": "User 42" })
    );
}

#[test]
fn test_unknown_path_is_404() {
    let response = common::adapter().handle(InvocationEnvelope::new("GET", "/unknown"));

    assert_eq!(response.status_code, 404);
    assert!(response.body.contains("error"));
    assert!(response.json_body().unwrap()["error"]
        .as_str()
        .unwrap()
        .starts_with("404 Not Found"));
}

#[test]
fn test_real_gateway_event() {
    // Shape of an API Gateway REST proxy event, trimmed
    let event = json!({
        "resource": "/users/{user_id}",
        "path": "/users/abc",
        "httpMethod": "GET",
        "headers": {
            "Accept": "*/*",
            "Host": "abc123.execute-api.us-east-1.amazonaws.com",
            "X-Forwarded-Proto": "https"
        },
        "multiValueHeaders": null,
        "queryStringParameters": null,
        "multiValueQueryStringParameters": null,
        "pathParameters": { "user_id": "abc" },
        "stageVariables": null,
        "requestContext": {
            "resourcePath": "/users/{user_id}",
            "httpMethod": "GET",
            "stage": "api",
            "requestId": "c6af9ac6-7b61-11e6-9a41-93e8deadbeef"
        },
        "body": null,
        "isBase64Encoded": false
    });

    let response = common::adapter().handle_value(event);
    assert_eq!(response.status_code, 200);
    assert_eq!(
        response.json_body().unwrap(),
        json!({ "user_id": "abc", "name": "User abc" })
    );
}

#[test]
fn test_missing_optional_fields_never_fault() {
    let adapter = common::adapter();

    for event in [
        json!({ "httpMethod": "GET", "path": "/users" }),
        json!({ "httpMethod": "GET", "path": "/users", "headers": null, "body": null }),
        json!({ "httpMethod": "GET" }),
    ] {
        let response = adapter.handle_value(event);
        assert_eq!(response.status_code, 200);
    }

    // No method at all cannot match any route
    let response = adapter.handle_value(json!({}));
    assert_eq!(response.status_code, 404);
}

#[test]
fn test_directory_failure_is_500() {
    let adapter = build_adapter_with(&AdapterConfig::default(), Arc::new(common::OfflineDirectory))
        .unwrap();

    let response = adapter.handle(InvocationEnvelope::new("GET", "/users"));
    assert_eq!(response.status_code, 500);
    assert_eq!(
        response.json_body().unwrap(),
        json!({ "error": "user directory unavailable: connection refused" })
    );

    let response = adapter.handle(InvocationEnvelope::new("GET", "/users/1"));
    assert_eq!(response.status_code, 500);

    // Routes that don't touch the directory still work
    let response = adapter.handle(InvocationEnvelope::new("GET", "/"));
    assert_eq!(response.status_code, 200);
}

#[test]
fn test_wrong_method_is_404() {
    let adapter = common::adapter();
    for method in ["POST", "PUT", "DELETE"] {
        let response = adapter.handle(InvocationEnvelope::new(method, "/users"));
        assert_eq!(response.status_code, 404, "{} /users", method);
    }
}
