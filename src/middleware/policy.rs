//! Policy enforcement layer.
//!
//! [`HttpAuthLayer`] wraps a router and runs
//! [`HttpAuthService::credentials`] before every request. On success the
//! [`Credentials`] are stored in the request extensions, where the
//! [`Authenticated`](super::extract::Authenticated) extractor picks them up.
//! On failure the request never reaches the router and the error becomes the
//! response.
//!
//! ```rust,ignore
//! let protected = Router::new()
//!     .route("/things", get(list_things))
//!     .layer(state.http_auth.middleware(None));
//! ```

use std::convert::Infallible;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};

use axum::extract::Request;
use axum::response::{IntoResponse, Response};
use tower::{Layer, Service};
use tracing::debug;

use plinth_auth::{AllowPolicy, CredentialKind};
use plinth_config::PluginPath;

use super::http_auth::HttpAuthService;

/// Path of the session cookie endpoint inside every plugin router. It always
/// admits `user-cookie` so browsers can refresh their session.
pub const COOKIE_PATH: &str = "/.auth/v1/cookie";

/// What a plugin auth policy additionally admits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PluginAuthAllow {
    Unauthenticated,
    UserCookie,
}

impl PluginAuthAllow {
    fn kind(self) -> CredentialKind {
        match self {
            Self::Unauthenticated => CredentialKind::Unauthorized,
            Self::UserCookie => CredentialKind::UserCookie,
        }
    }
}

/// Widens a plugin's router policy for `path` and everything beneath it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PluginAuthPolicy {
    pub path: String,
    pub allow: PluginAuthAllow,
}

impl PluginAuthPolicy {
    pub fn new(path: impl Into<String>, allow: PluginAuthAllow) -> Self {
        Self {
            path: path.into(),
            allow,
        }
    }

    pub fn from_plugin_path(plugin_path: &PluginPath, allow: PluginAuthAllow) -> Self {
        Self::new(plugin_path.path.clone(), allow)
    }

    pub fn matches(&self, path: &str) -> bool {
        let base = self.path.trim_end_matches('/');
        path == self.path
            || path == base
            || path
                .strip_prefix(base)
                .is_some_and(|rest| rest.starts_with('/'))
    }
}

/// The effective policy for `path` inside a plugin router.
pub fn resolve_plugin_policy(policies: &[PluginAuthPolicy], path: &str) -> AllowPolicy {
    let mut allow = AllowPolicy::default();
    if path == COOKIE_PATH {
        allow = allow.with(CredentialKind::UserCookie);
    }
    for policy in policies.iter().filter(|policy| policy.matches(path)) {
        allow = allow.with(policy.allow.kind());
    }
    allow
}

#[derive(Clone)]
pub(crate) enum PolicySource {
    Fixed(AllowPolicy),
    Plugin(Arc<[PluginAuthPolicy]>),
}

impl PolicySource {
    fn resolve(&self, path: &str) -> AllowPolicy {
        match self {
            Self::Fixed(allow) => allow.clone(),
            Self::Plugin(policies) => resolve_plugin_policy(policies, path),
        }
    }
}

#[derive(Clone)]
pub struct HttpAuthLayer {
    http_auth: HttpAuthService,
    policy: PolicySource,
}

impl HttpAuthLayer {
    pub(crate) fn new(http_auth: HttpAuthService, policy: PolicySource) -> Self {
        Self { http_auth, policy }
    }

    /// The policy this layer applies to a request for `path`.
    pub fn policy_for(&self, path: &str) -> AllowPolicy {
        self.policy.resolve(path)
    }
}

impl<S> Layer<S> for HttpAuthLayer {
    type Service = HttpAuthMiddleware<S>;

    fn layer(&self, inner: S) -> Self::Service {
        HttpAuthMiddleware {
            inner,
            http_auth: self.http_auth.clone(),
            policy: self.policy.clone(),
        }
    }
}

#[derive(Clone)]
pub struct HttpAuthMiddleware<S> {
    inner: S,
    http_auth: HttpAuthService,
    policy: PolicySource,
}

impl<S> Service<Request> for HttpAuthMiddleware<S>
where
    S: Service<Request, Response = Response, Error = Infallible> + Clone + Send + 'static,
    S::Future: Send + 'static,
{
    type Response = Response;
    type Error = Infallible;
    type Future = Pin<Box<dyn Future<Output = Result<Response, Infallible>> + Send>>;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, req: Request) -> Self::Future {
        // The clone may not be ready; keep the one that was polled.
        let clone = self.inner.clone();
        let mut inner = std::mem::replace(&mut self.inner, clone);
        let http_auth = self.http_auth.clone();
        let policy = self.policy.clone();

        Box::pin(async move {
            let (mut parts, body) = req.into_parts();
            let allow = policy.resolve(parts.uri.path());

            match http_auth.credentials(&parts, Some(&allow)).await {
                Ok(credentials) => {
                    parts.extensions.insert(credentials);
                    inner.call(Request::from_parts(parts, body)).await
                }
                Err(err) => {
                    debug!(path = %parts.uri.path(), allow = %allow, "request rejected by auth policy");
                    crate::metrics::track_credentials_rejected(err.kind());
                    Ok(err.into_response())
                }
            }
        })
    }
}
