use axum::{Router, routing::get};

use crate::middleware::Authenticated;
use crate::middleware::policy::COOKIE_PATH;
use crate::state::AppState;

use super::controller::{issue_cookie, whoami};

/// Routes every mounted plugin serves. The caller installs the plugin's
/// auth middleware on top.
pub fn init_plugin_router(plugin_id: &str) -> Router<AppState> {
    let plugin = plugin_id.to_string();

    Router::new()
        .route(
            "/whoami",
            get(move |authenticated: Authenticated| whoami(plugin.clone(), authenticated)),
        )
        .route(COOKIE_PATH, get(issue_cookie))
}
