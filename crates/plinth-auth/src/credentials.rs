//! The credentials model.
//!
//! [`Credentials`] pair an opaque bearer token with exactly one
//! [`Principal`]: a user, a service, or nobody. Using a tagged variant rules
//! out the "both user and service" state by construction.
//!
//! Credentials are immutable. The only way to derive a different value is
//! through a constructor or [`Credentials::with_scope`], which returns a new
//! value.
//!
//! The second half of the module holds the allow-list vocabulary used by the
//! HTTP layer: [`CredentialKind`] and [`AllowPolicy`].

use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// A capability restriction narrowing what a token may be used for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CredentialScope {
    /// Only valid for fetching static assets through a session cookie.
    StaticAssets,
}

impl fmt::Display for CredentialScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::StaticAssets => f.write_str("static-assets"),
        }
    }
}

/// The authenticated party behind a set of credentials.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Principal {
    User {
        user_entity_ref: String,
        ownership_entity_refs: Vec<String>,
    },
    Service {
        id: String,
    },
    Unauthenticated,
}

impl Principal {
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::User { .. } => "user",
            Self::Service { .. } => "service",
            Self::Unauthenticated => "none",
        }
    }
}

#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    token: String,
    scope: Vec<CredentialScope>,
    principal: Principal,
}

impl Credentials {
    pub fn user(
        token: impl Into<String>,
        user_entity_ref: impl Into<String>,
        ownership_entity_refs: Vec<String>,
    ) -> Self {
        Self {
            token: token.into(),
            scope: Vec::new(),
            principal: Principal::User {
                user_entity_ref: user_entity_ref.into(),
                ownership_entity_refs,
            },
        }
    }

    pub fn service(token: impl Into<String>, id: impl Into<String>) -> Self {
        Self {
            token: token.into(),
            scope: Vec::new(),
            principal: Principal::Service { id: id.into() },
        }
    }

    /// The sentinel returned when no credentials were presented and the
    /// caller's policy admits anonymous requests.
    pub fn unauthenticated() -> Self {
        Self {
            token: String::new(),
            scope: Vec::new(),
            principal: Principal::Unauthenticated,
        }
    }

    /// Returns a copy restricted to `scope`. Scopes are kept sorted and
    /// de-duplicated so equivalent restrictions compare equal.
    #[must_use]
    pub fn with_scope(&self, scope: impl IntoIterator<Item = CredentialScope>) -> Self {
        let scope: BTreeSet<CredentialScope> = scope.into_iter().collect();
        Self {
            token: self.token.clone(),
            scope: scope.into_iter().collect(),
            principal: self.principal.clone(),
        }
    }

    /// Returns a copy carrying a different token.
    #[must_use]
    pub fn with_token(&self, token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
            scope: self.scope.clone(),
            principal: self.principal.clone(),
        }
    }

    pub fn token(&self) -> &str {
        &self.token
    }

    pub fn scope(&self) -> &[CredentialScope] {
        &self.scope
    }

    pub fn is_scoped(&self) -> bool {
        !self.scope.is_empty()
    }

    pub fn principal(&self) -> &Principal {
        &self.principal
    }

    pub fn is_authenticated(&self) -> bool {
        !matches!(self.principal, Principal::Unauthenticated)
    }

    pub fn user_entity_ref(&self) -> Option<&str> {
        match &self.principal {
            Principal::User {
                user_entity_ref, ..
            } => Some(user_entity_ref),
            _ => None,
        }
    }

    pub fn service_id(&self) -> Option<&str> {
        match &self.principal {
            Principal::Service { id } => Some(id),
            _ => None,
        }
    }

    /// Same principal and scope. Tokens are ignored: a reissued token
    /// identifies the same party with different bytes.
    pub fn is_equivalent(&self, other: &Self) -> bool {
        self.principal == other.principal && self.scope == other.scope
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("token", &if self.token.is_empty() { "" } else { "<redacted>" })
            .field("scope", &self.scope)
            .field("principal", &self.principal)
            .finish()
    }
}

// =============================================================================
// Allow-list vocabulary
// =============================================================================

/// How a request presented its credentials.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CredentialKind {
    /// A user token in the `Authorization` header.
    User,
    /// A user token in the session cookie.
    UserCookie,
    /// A service token in the `Authorization` header.
    Service,
    /// No credentials at all.
    Unauthorized,
}

impl CredentialKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::User => "user",
            Self::UserCookie => "user-cookie",
            Self::Service => "service",
            Self::Unauthorized => "unauthorized",
        }
    }
}

impl fmt::Display for CredentialKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CredentialKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "user" => Ok(Self::User),
            "user-cookie" => Ok(Self::UserCookie),
            "service" => Ok(Self::Service),
            "unauthorized" => Ok(Self::Unauthorized),
            other => Err(format!("unknown credential kind: {other}")),
        }
    }
}

/// The set of credential kinds a check accepts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AllowPolicy {
    allow: BTreeSet<CredentialKind>,
}

impl AllowPolicy {
    pub fn new(allow: impl IntoIterator<Item = CredentialKind>) -> Self {
        Self {
            allow: allow.into_iter().collect(),
        }
    }

    pub fn allows(&self, kind: CredentialKind) -> bool {
        self.allow.contains(&kind)
    }

    /// Returns a copy that also accepts `kind`.
    #[must_use]
    pub fn with(&self, kind: CredentialKind) -> Self {
        let mut allow = self.allow.clone();
        allow.insert(kind);
        Self { allow }
    }

    pub fn kinds(&self) -> impl Iterator<Item = CredentialKind> + '_ {
        self.allow.iter().copied()
    }
}

/// Users and services presenting a bearer token.
impl Default for AllowPolicy {
    fn default() -> Self {
        Self::new([CredentialKind::User, CredentialKind::Service])
    }
}

impl fmt::Display for AllowPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let kinds: Vec<&str> = self.allow.iter().map(CredentialKind::as_str).collect();
        write!(f, "[{}]", kinds.join(", "))
    }
}
