//! Credential extraction from HTTP requests.
//!
//! [`HttpAuthService`] turns an inbound request into [`Credentials`] under an
//! [`AllowPolicy`], produces outbound identity headers, hands out the
//! [`HttpAuthLayer`] that enforces a policy in front of a router, and issues
//! session cookies for browser use.
//!
//! # Extraction order
//!
//! 1. `Authorization: Bearer <token>` (kind `user` or `service`)
//! 2. the session cookie, only when the policy allows `user-cookie`
//! 3. nothing at all, only when the policy allows `unauthorized`
//!
//! A credential that is present but not allowed is rejected with
//! [`AppError::Forbidden`]; a missing credential with
//! [`AppError::Unauthenticated`]. Neither is ever downgraded to an anonymous
//! identity.

use std::collections::HashMap;
use std::sync::Arc;

use axum::http::{HeaderValue, header, request::Parts};
use axum::response::Response;
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use axum_extra::headers::authorization::Bearer;
use axum_extra::headers::{Authorization, HeaderMapExt};
use chrono::{DateTime, Duration, Utc};
use serde::Serialize;
use tracing::debug;

use plinth_auth::{
    AllowPolicy, AuthService, CredentialKind, CredentialScope, Credentials, Principal,
};
use plinth_config::CookieConfig;
use plinth_core::AppError;

use super::policy::{HttpAuthLayer, PluginAuthPolicy, PolicySource};

/// Outcome of [`HttpAuthService::issue_user_cookie`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CookieIssued {
    pub expires_at: DateTime<Utc>,
}

#[derive(Clone)]
pub struct HttpAuthService {
    auth: Arc<dyn AuthService>,
    cookie: CookieConfig,
    plugin_policies: Arc<[PluginAuthPolicy]>,
}

impl HttpAuthService {
    pub fn new(auth: Arc<dyn AuthService>, cookie: CookieConfig) -> Self {
        Self {
            auth,
            cookie,
            plugin_policies: Arc::from(Vec::new()),
        }
    }

    /// Returns a copy whose plugin router middleware widens its policy for
    /// the given paths.
    #[must_use]
    pub fn with_plugin_policies(&self, policies: Vec<PluginAuthPolicy>) -> Self {
        Self {
            auth: self.auth.clone(),
            cookie: self.cookie.clone(),
            plugin_policies: Arc::from(policies),
        }
    }

    pub fn plugin_policies(&self) -> &[PluginAuthPolicy] {
        &self.plugin_policies
    }

    pub fn cookie_name(&self) -> &str {
        &self.cookie.name
    }

    /// Extracts credentials from `parts`. `None` means the default policy,
    /// `{user, service}`.
    ///
    /// # Errors
    ///
    /// - [`AppError::InvalidToken`] if a presented token fails validation
    /// - [`AppError::Unauthenticated`] if nothing acceptable was presented
    /// - [`AppError::Forbidden`] if the credential kind is not allowed
    pub async fn credentials(
        &self,
        parts: &Parts,
        allow: Option<&AllowPolicy>,
    ) -> Result<Credentials, AppError> {
        let allow = allow.cloned().unwrap_or_default();

        let (credentials, kind) = if parts.headers.contains_key(header::AUTHORIZATION) {
            let bearer = parts
                .headers
                .typed_get::<Authorization<Bearer>>()
                .ok_or_else(|| {
                    AppError::unauthenticated("authorization header must use the Bearer scheme")
                })?;

            let credentials = self.auth.authenticate(bearer.token()).await?;
            if credentials.is_scoped() {
                return Err(AppError::forbidden(
                    "limited user token is only valid as a session cookie",
                ));
            }
            let kind = match credentials.principal() {
                Principal::User { .. } => CredentialKind::User,
                Principal::Service { .. } => CredentialKind::Service,
                Principal::Unauthenticated => {
                    return Err(AppError::invalid_token("token carries no principal"));
                }
            };
            (credentials, kind)
        } else if let Some(token) = self.session_cookie(parts, &allow) {
            let credentials = self.auth.authenticate(&token).await?;
            if credentials.user_entity_ref().is_none() {
                return Err(AppError::forbidden(
                    "session cookie must carry user credentials",
                ));
            }
            (credentials, CredentialKind::UserCookie)
        } else if allow.allows(CredentialKind::Unauthorized) {
            debug!("no credentials presented, continuing unauthenticated");
            return Ok(Credentials::unauthenticated());
        } else {
            return Err(AppError::unauthenticated("missing credentials"));
        };

        if !allow.allows(kind) {
            return Err(AppError::forbidden(format!(
                "credential type '{kind}' is not allowed, expected one of {allow}"
            )));
        }

        debug!(kind = %kind, principal = credentials.principal().type_name(), "credentials extracted");
        Ok(credentials)
    }

    fn session_cookie(&self, parts: &Parts, allow: &AllowPolicy) -> Option<String> {
        if !allow.allows(CredentialKind::UserCookie) {
            return None;
        }
        CookieJar::from_headers(&parts.headers)
            .get(&self.cookie.name)
            .map(|cookie| cookie.value().to_string())
            .filter(|value| !value.is_empty())
    }

    /// Headers that forward `credentials` on an outbound call. The token is
    /// reissued, so the receiver authenticates an equivalent identity.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Forbidden`] for scope-restricted credentials, or
    /// the auth service's issuance error.
    pub async fn request_headers(
        &self,
        credentials: &Credentials,
    ) -> Result<HashMap<String, String>, AppError> {
        let mut headers = HashMap::new();
        if !credentials.is_authenticated() {
            return Ok(headers);
        }
        if credentials.is_scoped() {
            return Err(AppError::forbidden(
                "limited credentials cannot be forwarded",
            ));
        }

        let issued = self.auth.issue_token(credentials).await?;
        headers.insert(
            header::AUTHORIZATION.as_str().to_string(),
            format!("Bearer {}", issued.token),
        );
        Ok(headers)
    }

    /// A layer that enforces `allow` (or the default policy) on every request.
    pub fn middleware(&self, allow: Option<AllowPolicy>) -> HttpAuthLayer {
        HttpAuthLayer::new(
            self.clone(),
            PolicySource::Fixed(allow.unwrap_or_default()),
        )
    }

    /// The layer installed in front of each plugin router: `{user, service}`
    /// widened by the plugin's registered auth policies.
    pub fn create_http_plugin_router_middleware(&self) -> HttpAuthLayer {
        HttpAuthLayer::new(
            self.clone(),
            PolicySource::Plugin(self.plugin_policies.clone()),
        )
    }

    /// Sets a session cookie for `credentials` on `response`.
    ///
    /// The cookie holds a token limited to static asset access. Calling this
    /// again on the same response replaces the earlier cookie.
    ///
    /// # Errors
    ///
    /// - [`AppError::Unauthenticated`] for the unauthenticated sentinel
    /// - [`AppError::Forbidden`] for service credentials
    pub async fn issue_user_cookie(
        &self,
        response: &mut Response,
        credentials: &Credentials,
    ) -> Result<CookieIssued, AppError> {
        match credentials.principal() {
            Principal::User { .. } => {}
            Principal::Service { .. } => {
                return Err(AppError::forbidden(
                    "session cookies can only be issued to users",
                ));
            }
            Principal::Unauthenticated => {
                return Err(AppError::unauthenticated(
                    "session cookies require an authenticated user",
                ));
            }
        }

        let expires_at = Duration::try_seconds(self.cookie.expiry)
            .filter(|lifetime| *lifetime > Duration::zero())
            .and_then(|lifetime| Utc::now().checked_add_signed(lifetime))
            .ok_or_else(|| {
                AppError::internal(anyhow::anyhow!(
                    "session cookie lifetime of {}s is out of range",
                    self.cookie.expiry
                ))
            })?;

        let limited = credentials.with_scope([CredentialScope::StaticAssets]);
        let issued = self.auth.issue_token(&limited).await?;

        let cookie = Cookie::build((self.cookie.name.clone(), issued.token))
            .path("/")
            .http_only(true)
            .same_site(SameSite::Lax)
            .secure(self.cookie.secure)
            .max_age(cookie::time::Duration::seconds(self.cookie.expiry))
            .build();
        let cookie = HeaderValue::from_str(&cookie.to_string()).map_err(AppError::internal)?;

        let prefix = format!("{}=", self.cookie.name);
        let headers = response.headers_mut();
        let kept: Vec<HeaderValue> = headers
            .get_all(header::SET_COOKIE)
            .iter()
            .filter(|value| {
                !value
                    .to_str()
                    .is_ok_and(|value| value.starts_with(&prefix))
            })
            .cloned()
            .collect();
        headers.remove(header::SET_COOKIE);
        for value in kept {
            headers.append(header::SET_COOKIE, value);
        }
        headers.append(header::SET_COOKIE, cookie);

        crate::metrics::track_cookie_issued();
        debug!(%expires_at, "issued session cookie");

        Ok(CookieIssued { expires_at })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::Request;
    use plinth_auth::DefaultAuthService;
    use plinth_config::{AuthConfig, StaticToken};
    use plinth_core::ErrorKind;

    fn http_auth() -> HttpAuthService {
        let config = AuthConfig {
            secret: "test-secret-key-at-least-32-characters-long".to_string(),
            issuer: "plinth".to_string(),
            token_expiry: 3600,
            static_tokens: vec![StaticToken {
                token: "svc-123".to_string(),
                subject: "catalog".to_string(),
            }],
            cookie: CookieConfig::default(),
        };
        HttpAuthService::new(Arc::new(DefaultAuthService::new(&config)), config.cookie)
    }

    fn parts(header: Option<(&str, &str)>) -> Parts {
        let mut builder = Request::builder().uri("/things");
        if let Some((name, value)) = header {
            builder = builder.header(name, value);
        }
        builder.body(()).unwrap().into_parts().0
    }

    #[tokio::test]
    async fn test_static_bearer_is_service() {
        let credentials = http_auth()
            .credentials(&parts(Some(("authorization", "Bearer svc-123"))), None)
            .await
            .unwrap();

        assert_eq!(credentials.service_id(), Some("catalog"));
    }

    #[tokio::test]
    async fn test_non_bearer_scheme_is_unauthenticated() {
        let err = http_auth()
            .credentials(&parts(Some(("authorization", "Basic dXNlcjpwYXNz"))), None)
            .await
            .unwrap_err();

        assert_eq!(err.kind(), ErrorKind::Unauthenticated);
    }

    #[tokio::test]
    async fn test_cookie_is_ignored_unless_allowed() {
        let service = http_auth();
        let user = Credentials::user("", "user:default/jane", vec![]);
        let mut response = Response::new(axum::body::Body::empty());
        service.issue_user_cookie(&mut response, &user).await.unwrap();

        let set_cookie = response.headers()[header::SET_COOKIE].to_str().unwrap();
        let pair = set_cookie.split(';').next().unwrap().to_string();
        let request = parts(Some(("cookie", pair.as_str())));

        let err = service.credentials(&request, None).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Unauthenticated);

        let allow = AllowPolicy::new([CredentialKind::UserCookie]);
        let credentials = service.credentials(&request, Some(&allow)).await.unwrap();
        assert_eq!(credentials.user_entity_ref(), Some("user:default/jane"));
        assert_eq!(credentials.scope(), &[CredentialScope::StaticAssets]);
    }

    #[tokio::test]
    async fn test_request_headers_for_unauthenticated_is_empty() {
        let headers = http_auth()
            .request_headers(&Credentials::unauthenticated())
            .await
            .unwrap();

        assert!(headers.is_empty());
    }

    #[tokio::test]
    async fn test_cookie_attributes() {
        let service = http_auth();
        let user = Credentials::user("", "user:default/jane", vec![]);
        let mut response = Response::new(axum::body::Body::empty());
        service.issue_user_cookie(&mut response, &user).await.unwrap();

        let set_cookie = response.headers()[header::SET_COOKIE].to_str().unwrap();
        let parsed = Cookie::parse(set_cookie).unwrap();
        assert_eq!(parsed.name(), "plinth-token");
        assert_eq!(parsed.path(), Some("/"));
        assert_eq!(parsed.http_only(), Some(true));
        assert_eq!(parsed.same_site(), Some(SameSite::Lax));
        assert_eq!(parsed.secure(), None);
        assert_eq!(
            parsed.max_age(),
            Some(cookie::time::Duration::seconds(3600))
        );
    }

    #[tokio::test]
    async fn test_out_of_range_cookie_lifetime_is_an_error() {
        let user = Credentials::user("", "user:default/jane", vec![]);

        for expiry in [i64::MAX, 0, -600] {
            let service = HttpAuthService::new(
                http_auth().auth,
                CookieConfig {
                    expiry,
                    ..CookieConfig::default()
                },
            );
            let mut response = Response::new(axum::body::Body::empty());

            let err = service
                .issue_user_cookie(&mut response, &user)
                .await
                .unwrap_err();
            assert_eq!(err.kind(), ErrorKind::Internal, "expiry {expiry}");
            assert!(response.headers().get(header::SET_COOKIE).is_none());
        }
    }

    #[tokio::test]
    async fn test_cookie_for_service_is_forbidden() {
        let mut response = Response::new(axum::body::Body::empty());
        let err = http_auth()
            .issue_user_cookie(&mut response, &Credentials::service("", "catalog"))
            .await
            .unwrap_err();

        assert_eq!(err.kind(), ErrorKind::Forbidden);
        assert!(response.headers().get(header::SET_COOKIE).is_none());
    }
}
