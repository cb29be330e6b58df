// Contract tests for the reqwest transport against a mock panel.

use serde_json::{json, Value};
use warden_core::config::{PanelConfig, TimeoutConfig};
use warden_core::{ApiError, HttpTransport, Method, Transport};
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn transport_for(server: &MockServer, timeouts: TimeoutConfig) -> HttpTransport {
    let panel = PanelConfig {
        base_url: server.uri(),
        api_key: "test-key".to_string(),
        ..PanelConfig::default()
    };
    HttpTransport::new(&panel, &timeouts).expect("transport")
}

#[tokio::test]
async fn attaches_api_key_and_json_headers() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/servers"))
        .and(header("X-API-Key", "test-key"))
        .and(header("content-type", "application/json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(1)
        .mount(&server)
        .await;

    let transport = transport_for(&server, TimeoutConfig::default());
    let resp = transport
        .request(Method::Get, "/api/v1/servers", None)
        .await
        .expect("request");
    assert_eq!(resp.status, 200);
    assert_eq!(resp.body, json!([]));
}

#[tokio::test]
async fn sends_json_body_on_put() {
    let server = MockServer::start().await;
    Mock::given(method("PUT"))
        .and(path("/api/v1/servers/s1/scheduler/tasks/t1"))
        .and(body_json(json!({"enabled": false})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .expect(1)
        .mount(&server)
        .await;

    let transport = transport_for(&server, TimeoutConfig::default());
    let resp = transport
        .request(
            Method::Put,
            "/api/v1/servers/s1/scheduler/tasks/t1",
            Some(&json!({"enabled": false})),
        )
        .await
        .expect("request");
    assert_eq!(resp.status, 200);
}

#[tokio::test]
async fn no_content_yields_null_body() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path("/api/v1/servers/s1/scheduler/tasks/t1"))
        .respond_with(ResponseTemplate::new(204))
        .mount(&server)
        .await;

    let transport = transport_for(&server, TimeoutConfig::default());
    let resp = transport
        .request(Method::Delete, "/api/v1/servers/s1/scheduler/tasks/t1", None)
        .await
        .expect("request");
    assert_eq!(resp.status, 204);
    assert_eq!(resp.body, Value::Null);
}

#[tokio::test]
async fn error_statuses_map_to_typed_errors() {
    let server = MockServer::start().await;
    for (code, route) in [(401, "/a"), (403, "/b"), (404, "/c"), (409, "/d"), (500, "/e"), (502, "/f")] {
        Mock::given(method("GET"))
            .and(path(route))
            .respond_with(ResponseTemplate::new(code).set_body_string("nope"))
            .mount(&server)
            .await;
    }

    let transport = transport_for(&server, TimeoutConfig::default());
    let get = |p: &'static str| {
        let t = &transport;
        async move { t.request(Method::Get, p, None).await.unwrap_err() }
    };

    assert!(matches!(get("/a").await, ApiError::Unauthorized));
    assert!(matches!(get("/b").await, ApiError::Forbidden { .. }));
    assert!(matches!(get("/c").await, ApiError::NotFound { .. }));
    assert!(matches!(get("/d").await, ApiError::Conflict { ref message } if message == "nope"));
    assert!(matches!(get("/e").await, ApiError::ServerSide { .. }));
    assert!(matches!(get("/f").await, ApiError::UnrecognizedStatus { status: 502 }));
}

#[tokio::test]
async fn stalled_response_hits_read_timeout() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/slow"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({}))
                .set_delay(std::time::Duration::from_millis(500)),
        )
        .mount(&server)
        .await;

    let transport = transport_for(
        &server,
        TimeoutConfig {
            connect_ms: 1_000,
            read_ms: 50,
        },
    );
    let err = transport.request(Method::Get, "/slow", None).await.unwrap_err();
    match err {
        ApiError::Http(e) => assert!(e.is_timeout()),
        other => panic!("expected timeout, got {other:?}"),
    }
}
