use axum::{Router, routing::get};

use crate::state::AppState;

use super::controller::list_features;

/// `GET /api/.features`, open to users and services.
pub fn init_features_router(state: &AppState) -> Router<AppState> {
    Router::new()
        .route("/api/.features", get(list_features))
        .route_layer(state.http_auth.middleware(None))
}
