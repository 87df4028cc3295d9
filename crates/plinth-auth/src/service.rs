//! The auth service: token validation and issuance.
//!
//! [`AuthService`] is the seam other components depend on; they receive an
//! `Arc<dyn AuthService>` at construction time. [`DefaultAuthService`] backs
//! it with HS256 JWTs plus an optional table of static service tokens.
//!
//! Round-trip law: for every credentials value `c` that can be issued,
//! `authenticate(issue_token(c).token)` is equivalent to `c`.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use metrics::counter;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use plinth_config::AuthConfig;
use plinth_core::AppError;

use crate::claims::TokenClaims;
use crate::credentials::Credentials;
use crate::jwt::TokenCodec;

/// A freshly minted opaque token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IssuedToken {
    pub token: String,
}

#[async_trait]
pub trait AuthService: Send + Sync {
    /// Validates `token` and returns the credentials it encodes.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::InvalidToken`] if the token is empty, malformed,
    /// expired, or fails its signature check.
    async fn authenticate(&self, token: &str) -> Result<Credentials, AppError>;

    /// Mints a token that [`AuthService::authenticate`] decodes back into
    /// credentials equivalent to `credentials`.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Issuance`] if the credentials cannot be encoded.
    async fn issue_token(&self, credentials: &Credentials) -> Result<IssuedToken, AppError>;
}

pub struct DefaultAuthService {
    codec: TokenCodec,
    issuer: String,
    token_expiry: i64,
    /// static token -> service id
    static_tokens: HashMap<String, String>,
}

impl DefaultAuthService {
    pub fn new(config: &AuthConfig) -> Self {
        let static_tokens = config
            .static_tokens
            .iter()
            .map(|entry| (entry.token.clone(), entry.subject.clone()))
            .collect();

        Self {
            codec: TokenCodec::new(&config.secret, &config.issuer),
            issuer: config.issuer.clone(),
            token_expiry: config.token_expiry,
            static_tokens,
        }
    }

    pub fn static_token_count(&self) -> usize {
        self.static_tokens.len()
    }
}

#[async_trait]
impl AuthService for DefaultAuthService {
    async fn authenticate(&self, token: &str) -> Result<Credentials, AppError> {
        if token.is_empty() {
            counter!("auth_token_validation_failures_total", "reason" => "empty").increment(1);
            return Err(AppError::invalid_token("token is empty"));
        }

        if let Some(subject) = self.static_tokens.get(token) {
            debug!(service = %subject, "authenticated static token");
            return Ok(Credentials::service(token, subject.clone()));
        }

        let claims = self.codec.decode(token).inspect_err(|e| {
            counter!("auth_token_validation_failures_total", "reason" => "verification")
                .increment(1);
            warn!(error = %e, "token verification failed");
        })?;

        let credentials = claims.into_credentials(token.to_string())?;
        debug!(principal = credentials.principal().type_name(), "authenticated token");
        Ok(credentials)
    }

    async fn issue_token(&self, credentials: &Credentials) -> Result<IssuedToken, AppError> {
        let claims = TokenClaims::from_credentials(
            credentials,
            &self.issuer,
            Utc::now().timestamp(),
            self.token_expiry,
        )?;
        let token = self.codec.encode(&claims)?;

        counter!(
            "auth_tokens_issued_total",
            "principal" => credentials.principal().type_name()
        )
        .increment(1);
        debug!(
            principal = credentials.principal().type_name(),
            sub = %claims.sub,
            exp = claims.exp,
            "issued token"
        );

        Ok(IssuedToken { token })
    }
}
