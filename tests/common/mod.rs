//! Shared helpers for integration tests.

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, Response};
use axum::Router;
use tower::ServiceExt;

use rest_bundle::config::{parse_config, RestConfig};
use rest_bundle::http::HttpServer;
use rest_bundle::lifecycle::startup::build_dispatcher;

/// Router for `config`, without a config file to reload from.
pub fn app(config: RestConfig) -> Router {
    let dispatcher = Arc::new(build_dispatcher(&config).unwrap());
    HttpServer::new(config, dispatcher, None).router()
}

/// Router for a TOML config snippet.
#[allow(dead_code)]
pub fn app_from_toml(toml: &str) -> Router {
    app(parse_config(toml).unwrap())
}

/// GET `uri` with an optional Accept header.
pub async fn get(app: &Router, uri: &str, accept: Option<&str>) -> Response<Body> {
    let mut request = Request::builder().uri(uri);
    if let Some(accept) = accept {
        request = request.header("accept", accept);
    }
    app.clone()
        .oneshot(request.body(Body::empty()).unwrap())
        .await
        .unwrap()
}

pub fn content_type(response: &Response<Body>) -> String {
    response
        .headers()
        .get("content-type")
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string()
}

pub async fn body_string(response: Response<Body>) -> String {
    let bytes = axum::body::to_bytes(response.into_body(), 1024 * 1024).await.unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}
