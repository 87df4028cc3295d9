//! Token and session cookie configuration.
//!
//! | Variable             | Default                                | Description                          |
//! |----------------------|----------------------------------------|--------------------------------------|
//! | `AUTH_SECRET`        | `plinth-dev-secret-change-in-production` | HS256 signing secret (non-empty)   |
//! | `AUTH_ISSUER`        | `plinth`                               | `iss` claim of issued tokens         |
//! | `AUTH_TOKEN_EXPIRY`  | `3600`                                 | Token lifetime in seconds            |
//! | `AUTH_STATIC_TOKENS` | (none)                                 | `token=subject,...` service tokens   |
//! | `AUTH_COOKIE_NAME`   | `plinth-token`                         | Session cookie name                  |
//! | `AUTH_COOKIE_EXPIRY` | `3600`                                 | Session cookie lifetime in seconds   |
//! | `AUTH_COOKIE_SECURE` | `false`                                | Mark the cookie `Secure`             |
//!
//! Both lifetimes must lie in `1..=MAX_EXPIRY_SECS`.

use std::env;
use std::fmt;

use crate::error::ConfigError;
use crate::{parse_bool, split_list};

/// Upper bound for token and cookie lifetimes: one year.
pub const MAX_EXPIRY_SECS: i64 = 365 * 24 * 60 * 60;

/// A pre-shared token that authenticates as a fixed service.
#[derive(Clone, PartialEq, Eq)]
pub struct StaticToken {
    pub token: String,
    pub subject: String,
}

impl fmt::Debug for StaticToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StaticToken")
            .field("token", &"<redacted>")
            .field("subject", &self.subject)
            .finish()
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CookieConfig {
    pub name: String,
    /// Lifetime in seconds.
    pub expiry: i64,
    pub secure: bool,
}

impl Default for CookieConfig {
    fn default() -> Self {
        Self {
            name: "plinth-token".to_string(),
            expiry: 3600,
            secure: false,
        }
    }
}

#[derive(Clone)]
pub struct AuthConfig {
    pub secret: String,
    pub issuer: String,
    /// Lifetime of issued tokens in seconds.
    pub token_expiry: i64,
    pub static_tokens: Vec<StaticToken>,
    pub cookie: CookieConfig,
}

impl fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthConfig")
            .field("secret", &"<redacted>")
            .field("issuer", &self.issuer)
            .field("token_expiry", &self.token_expiry)
            .field("static_tokens", &self.static_tokens)
            .field("cookie", &self.cookie)
            .finish()
    }
}

impl AuthConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let secret = lookup("AUTH_SECRET")
            .unwrap_or_else(|| "plinth-dev-secret-change-in-production".to_string());
        if secret.trim().is_empty() {
            return Err(ConfigError::EmptySecret);
        }

        let static_tokens = match lookup("AUTH_STATIC_TOKENS") {
            Some(raw) => parse_static_tokens(&raw)?,
            None => Vec::new(),
        };

        let defaults = CookieConfig::default();
        let cookie = CookieConfig {
            name: match lookup("AUTH_COOKIE_NAME").filter(|s| !s.trim().is_empty()) {
                Some(name) if is_cookie_token(name.trim()) => name.trim().to_string(),
                Some(name) => return Err(ConfigError::InvalidCookieName(name)),
                None => defaults.name,
            },
            expiry: parse_expiry(&lookup, "AUTH_COOKIE_EXPIRY", defaults.expiry)?,
            secure: lookup("AUTH_COOKIE_SECURE")
                .map(|s| parse_bool(&s))
                .unwrap_or(defaults.secure),
        };

        Ok(Self {
            secret,
            issuer: lookup("AUTH_ISSUER").unwrap_or_else(|| "plinth".to_string()),
            token_expiry: parse_expiry(&lookup, "AUTH_TOKEN_EXPIRY", 3600)?, // 1 hour
            static_tokens,
            cookie,
        })
    }
}

fn parse_expiry(
    lookup: &impl Fn(&str) -> Option<String>,
    var: &'static str,
    default: i64,
) -> Result<i64, ConfigError> {
    let Some(raw) = lookup(var) else {
        return Ok(default);
    };
    match raw.trim().parse::<i64>() {
        Ok(secs) if (1..=MAX_EXPIRY_SECS).contains(&secs) => Ok(secs),
        _ => Err(ConfigError::InvalidExpiry {
            var,
            value: raw,
            max: MAX_EXPIRY_SECS,
        }),
    }
}

/// RFC 6265 cookie-name token: visible ASCII minus separators.
fn is_cookie_token(name: &str) -> bool {
    !name.is_empty()
        && name.bytes().all(|b| {
            b.is_ascii_alphanumeric() || b"!#$%&'*+-.^_`|~".contains(&b)
        })
}

fn parse_static_tokens(raw: &str) -> Result<Vec<StaticToken>, ConfigError> {
    split_list(raw)
        .into_iter()
        .map(|entry| match entry.split_once('=') {
            Some((token, subject)) if !token.trim().is_empty() && !subject.trim().is_empty() => {
                Ok(StaticToken {
                    token: token.trim().to_string(),
                    subject: subject.trim().to_string(),
                })
            }
            _ => Err(ConfigError::InvalidStaticToken(entry)),
        })
        .collect()
}
