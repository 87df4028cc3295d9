#![allow(dead_code)]

use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use axum::http::Request;
use axum::response::Response;
use http_body_util::BodyExt;
use plinth::modules::features::{ConfigFeatureDiscovery, FeatureDiscoveryService};
use plinth::router::init_router;
use plinth::state::AppState;
use plinth::plinth_auth::{AuthService, Credentials, DefaultAuthService};
use plinth::plinth_config::{AuthConfig, CookieConfig, CorsConfig, StaticToken};
use plinth::plinth_core::ClientContext;

pub const TEST_SECRET: &str = "test-secret-key-at-least-32-characters-long";
pub const STATIC_TOKEN: &str = "svc-123";

pub fn test_auth_config() -> AuthConfig {
    AuthConfig {
        secret: TEST_SECRET.to_string(),
        issuer: "plinth".to_string(),
        token_expiry: 3600,
        static_tokens: vec![StaticToken {
            token: STATIC_TOKEN.to_string(),
            subject: "catalog".to_string(),
        }],
        cookie: CookieConfig::default(),
    }
}

pub fn test_auth_service() -> Arc<dyn AuthService> {
    Arc::new(DefaultAuthService::new(&test_auth_config()))
}

/// State with `catalog`, `scaffolder` and the `catalog:github` module.
pub fn test_state() -> AppState {
    let declarations: Vec<String> = ["catalog", "scaffolder", "catalog:github"]
        .iter()
        .map(|s| s.to_string())
        .collect();
    let discovery: Arc<dyn FeatureDiscoveryService> =
        Arc::new(ConfigFeatureDiscovery::new(&declarations).unwrap());

    AppState::new(
        test_auth_service(),
        CookieConfig::default(),
        ClientContext::with_client("core.featureDiscovery", discovery),
        CorsConfig::from_lookup(|_| None),
    )
}

pub async fn test_app(state: AppState) -> Router {
    let features = state
        .feature_discovery
        .client()
        .unwrap()
        .get_backend_features()
        .await
        .unwrap();
    init_router(state, &features)
}

pub fn jane() -> Credentials {
    Credentials::user(
        "",
        "user:default/jane",
        vec!["group:default/team-a".to_string()],
    )
}

pub async fn token_for(credentials: &Credentials) -> String {
    test_auth_service()
        .issue_token(credentials)
        .await
        .unwrap()
        .token
}

pub fn get(uri: &str, headers: &[(&str, &str)]) -> Request<Body> {
    let mut builder = Request::builder().method("GET").uri(uri);
    for (name, value) in headers {
        builder = builder.header(*name, *value);
    }
    builder.body(Body::empty()).unwrap()
}

pub async fn body_json(response: Response) -> serde_json::Value {
    let body = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&body).unwrap()
}

/// The `name=value` pair of the first `Set-Cookie` header.
pub fn cookie_pair(response: &Response) -> String {
    response
        .headers()
        .get("set-cookie")
        .unwrap()
        .to_str()
        .unwrap()
        .split(';')
        .next()
        .unwrap()
        .to_string()
}
