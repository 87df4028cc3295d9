use crate::logging::logging_middleware;
use crate::metrics::metrics_middleware;
use crate::modules::features::{BackendFeatures, init_features_router};
use crate::modules::identity::init_plugin_router;
use crate::state::AppState;
use axum::http::{HeaderValue, Method, header};
use axum::{Router, middleware};
use tower_http::cors::CorsLayer;
use tracing::info;

/// Builds the application: `GET /api/.features` plus one router under
/// `/api/{plugin_id}` for every discovered plugin, each guarded by that
/// plugin's auth middleware.
pub fn init_router(state: AppState, features: &BackendFeatures) -> Router {
    let mut router = init_features_router(&state);

    for plugin_id in features.plugin_ids() {
        let http_auth = state.plugin_http_auth(plugin_id);
        info!(
            plugin = plugin_id,
            auth_policies = http_auth.plugin_policies().len(),
            "mounting plugin router"
        );
        router = router.nest(
            &format!("/api/{plugin_id}"),
            init_plugin_router(plugin_id).layer(http_auth.create_http_plugin_router_middleware()),
        );
    }

    router
        .route_layer(middleware::from_fn(metrics_middleware))
        .with_state(state.clone())
        .layer({
            let allowed_origins: Vec<HeaderValue> = state
                .cors_config
                .allowed_origins
                .iter()
                .filter_map(|origin| origin.parse().ok())
                .collect();

            CorsLayer::new()
                .allow_origin(allowed_origins)
                .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
                .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE, header::ACCEPT])
                .allow_credentials(true)
        })
        .layer(middleware::from_fn(logging_middleware))
}
