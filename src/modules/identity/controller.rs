use axum::Json;
use axum::extract::State;
use axum::response::{IntoResponse, Response};
use tracing::{info, instrument};

use plinth_core::AppError;

use crate::middleware::Authenticated;
use crate::state::AppState;

use super::model::WhoAmIResponse;

/// Describe the caller as seen by the plugin the request was routed to
#[instrument(skip_all, fields(plugin = %plugin))]
pub async fn whoami(
    plugin: String,
    Authenticated(credentials): Authenticated,
) -> Json<WhoAmIResponse> {
    Json(WhoAmIResponse {
        plugin,
        principal: credentials.principal().clone(),
        scope: credentials.scope().to_vec(),
    })
}

/// Issue or refresh the session cookie for the calling user
#[instrument(skip_all)]
pub async fn issue_cookie(
    State(state): State<AppState>,
    Authenticated(credentials): Authenticated,
) -> Result<Response, AppError> {
    let mut response = ().into_response();
    let issued = state
        .http_auth
        .issue_user_cookie(&mut response, &credentials)
        .await?;

    info!(
        user = credentials.user_entity_ref().unwrap_or_default(),
        expires_at = %issued.expires_at,
        "session cookie issued"
    );

    let (parts, _) = response.into_parts();
    Ok((parts, Json(issued)).into_response())
}
