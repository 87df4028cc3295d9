use axum::{extract::FromRequestParts, http::request::Parts};

use plinth_auth::Credentials;
use plinth_core::AppError;

/// Extractor for the credentials attached by [`HttpAuthLayer`](super::policy::HttpAuthLayer).
///
/// Rejects with `Unauthenticated` on routes the layer does not cover.
#[derive(Debug, Clone)]
pub struct Authenticated(pub Credentials);

impl Authenticated {
    pub fn credentials(&self) -> &Credentials {
        &self.0
    }
}

impl<S> FromRequestParts<S> for Authenticated
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<Credentials>()
            .cloned()
            .map(Authenticated)
            .ok_or_else(|| AppError::unauthenticated("request was not authenticated"))
    }
}
