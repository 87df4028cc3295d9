use axum::Json;
use axum::extract::State;
use tracing::{debug, instrument};

use plinth_core::{AppError, service_ref};

use crate::middleware::Authenticated;
use crate::state::AppState;

use super::model::FeaturesResponse;

/// List the registered backend features and the core services they can use
#[instrument(skip_all)]
pub async fn list_features(
    State(state): State<AppState>,
    Authenticated(credentials): Authenticated,
) -> Result<Json<FeaturesResponse>, AppError> {
    let discovery = state.feature_discovery.client()?;
    let features = discovery.get_backend_features().await?;

    debug!(
        principal = credentials.principal().type_name(),
        count = features.features.len(),
        "listing backend features"
    );

    Ok(Json(FeaturesResponse {
        features: features.features,
        services: service_ref::ALL.to_vec(),
    }))
}
