/// Router-level tests: method validation, basic auth, writers and error mapping
use axum::{
    body::{to_bytes, Body},
    http::{header, Method, Request, StatusCode},
    Router,
};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use content_exporter::{
    config::{BasicAuthConfig, Config, MetricsConfig, ServerConfig, TargetConfig},
    fetcher::Fetcher,
    handlers::AppState,
    server::create_router,
};
use httpmock::prelude::*;
use std::sync::Arc;
use tower::ServiceExt;

const USERNAME: &str = "exporter";
const PASSWORD: &str = "correct-horse";

fn create_test_config(url: String, mime_type: &str) -> Config {
    Config {
        target: TargetConfig {
            url,
            mime_type: mime_type.to_string(),
            timeout_seconds: 5,
        },
        server: ServerConfig::default(),
        basic_auth: Some(BasicAuthConfig {
            username: USERNAME.to_string(),
            password: PASSWORD.to_string(),
        }),
        metrics: MetricsConfig::default(),
    }
}

fn create_app(config: Config) -> Router {
    let state = AppState::new(Arc::new(config), Fetcher::new().unwrap()).unwrap();
    create_router(state, None)
}

async fn json_upstream(body: &'static str) -> MockServer {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/status");
            then.status(200)
                .header("content-type", "application/json")
                .body(body);
        })
        .await;
    server
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

fn get_with_credentials(uri: &str, username: &str, password: &str) -> Request<Body> {
    let encoded = STANDARD.encode(format!("{}:{}", username, password));
    Request::builder()
        .uri(uri)
        .header(header::AUTHORIZATION, format!("Basic {}", encoded))
        .body(Body::empty())
        .unwrap()
}

async fn body_json(response: axum::response::Response) -> serde_json::Value {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn test_json_no_basic_auth_renders_content() {
    let upstream = json_upstream(r#"{"response": "ok"}"#).await;
    let app = create_app(create_test_config(upstream.url("/status"), "json"));

    let response = app.oneshot(get("/jsonNoBasicAuth")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    assert_eq!(body["mime_type"], "json");
    assert_eq!(body["content"]["response"], "ok");
    assert_eq!(body["source"], upstream.url("/status"));
}

#[tokio::test]
async fn test_html_no_basic_auth_renders_page() {
    let upstream = MockServer::start_async().await;
    upstream
        .mock_async(|when, then| {
            when.method(GET).path("/page");
            then.status(200)
                .header("content-type", "text/html")
                .body("<p>ok</p>");
        })
        .await;
    let app = create_app(create_test_config(upstream.url("/page"), "html"));

    let response = app.oneshot(get("/htmlNoBasicAuth")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert!(response.headers()[header::CONTENT_TYPE]
        .to_str()
        .unwrap()
        .starts_with("text/html"));

    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let page = String::from_utf8(bytes.to_vec()).unwrap();
    assert!(page.contains("<pre>&lt;p&gt;ok&lt;/p&gt;</pre>"));
}

#[tokio::test]
async fn test_basic_auth_routes_require_credentials() {
    let upstream = json_upstream("{}").await;
    let app = create_app(create_test_config(upstream.url("/status"), "json"));

    for uri in ["/jsonBasicAuth", "/htmlBasicAuth"] {
        let response = app.clone().oneshot(get(uri)).await.unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED, "{}", uri);
        assert!(response.headers().contains_key(header::WWW_AUTHENTICATE));

        let response = app
            .clone()
            .oneshot(get_with_credentials(uri, USERNAME, "wrong"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED, "{}", uri);
    }
}

#[tokio::test]
async fn test_basic_auth_route_accepts_valid_credentials() {
    let upstream = json_upstream(r#"{"response": "ok"}"#).await;
    let app = create_app(create_test_config(upstream.url("/status"), "json"));

    let response = app
        .oneshot(get_with_credentials("/jsonBasicAuth", USERNAME, PASSWORD))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    assert_eq!(body["content"]["response"], "ok");
}

#[tokio::test]
async fn test_basic_auth_routes_reject_when_not_configured() {
    let upstream = json_upstream("{}").await;
    let mut config = create_test_config(upstream.url("/status"), "json");
    config.basic_auth = None;
    let app = create_app(config);

    let response = app
        .oneshot(get_with_credentials("/jsonBasicAuth", USERNAME, PASSWORD))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_method_validation_precedes_auth() {
    let upstream = json_upstream("{}").await;
    let app = create_app(create_test_config(upstream.url("/status"), "json"));

    for uri in [
        "/jsonNoBasicAuth",
        "/jsonBasicAuth",
        "/htmlNoBasicAuth",
        "/htmlBasicAuth",
    ] {
        let request = Request::builder()
            .method(Method::POST)
            .uri(uri)
            .body(Body::empty())
            .unwrap();
        let response = app.clone().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED, "{}", uri);
        assert_eq!(response.headers()[header::ALLOW], "GET, HEAD");
    }
}

#[tokio::test]
async fn test_upstream_404_maps_to_bad_gateway() {
    let upstream = MockServer::start_async().await;
    upstream
        .mock_async(|when, then| {
            when.method(GET).path("/status");
            then.status(404);
        })
        .await;
    let app = create_app(create_test_config(upstream.url("/status"), "json"));

    let response = app.oneshot(get("/jsonNoBasicAuth")).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);

    let body = body_json(response).await;
    assert_eq!(body["error"]["type"], "response_status_404");
}

#[tokio::test]
async fn test_upstream_timeout_maps_to_gateway_timeout() {
    let upstream = MockServer::start_async().await;
    upstream
        .mock_async(|when, then| {
            when.method(GET).path("/status");
            then.status(200)
                .header("content-type", "application/json")
                .body("{}")
                .delay(std::time::Duration::from_secs(3));
        })
        .await;
    let mut config = create_test_config(upstream.url("/status"), "json");
    config.target.timeout_seconds = 1;
    let app = create_app(config);

    let response = app.oneshot(get("/jsonNoBasicAuth")).await.unwrap();
    assert_eq!(response.status(), StatusCode::GATEWAY_TIMEOUT);

    let body = body_json(response).await;
    assert_eq!(body["error"]["type"], "request_timeout");
}

#[tokio::test]
async fn test_malformed_json_maps_to_bad_gateway() {
    let upstream = json_upstream("{not json").await;
    let app = create_app(create_test_config(upstream.url("/status"), "json"));

    let response = app.oneshot(get("/jsonNoBasicAuth")).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);

    let body = body_json(response).await;
    assert_eq!(body["error"]["type"], "malformed_content");
}

#[tokio::test]
async fn test_health_and_metrics_routes() {
    let upstream = json_upstream("{}").await;
    let config = create_test_config(upstream.url("/status"), "json");
    let state = AppState::new(Arc::new(config), Fetcher::new().unwrap()).unwrap();

    let recorder = metrics_exporter_prometheus::PrometheusBuilder::new().build_recorder();
    let app = create_router(state, Some(Arc::new(recorder.handle())));

    let response = app.clone().oneshot(get("/health")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["status"], "healthy");

    let response = app.oneshot(get("/metrics")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_metrics_route_absent_without_handle() {
    let upstream = json_upstream("{}").await;
    let app = create_app(create_test_config(upstream.url("/status"), "json"));

    let response = app.clone().oneshot(get("/metrics")).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert!(!response.headers().contains_key(header::WWW_AUTHENTICATE));

    let response = app.oneshot(get("/does-not-exist")).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert!(!response.headers().contains_key(header::WWW_AUTHENTICATE));
}

#[tokio::test]
async fn test_unknown_route_is_not_found_for_any_method() {
    let upstream = json_upstream("{}").await;
    let app = create_app(create_test_config(upstream.url("/status"), "json"));

    let request = Request::builder()
        .method(Method::POST)
        .uri("/does-not-exist")
        .body(Body::empty())
        .unwrap();
    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
