/// Errors raised while loading configuration.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("AUTH_SECRET must not be empty")]
    EmptySecret,

    #[error("invalid static token entry '{0}', expected token=subject")]
    InvalidStaticToken(String),

    #[error("{var} must be a whole number of seconds between 1 and {max}, got '{value}'")]
    InvalidExpiry {
        var: &'static str,
        value: String,
        max: i64,
    },

    #[error("AUTH_COOKIE_NAME '{0}' is not a valid cookie name")]
    InvalidCookieName(String),

    #[error("invalid plugin path entry '{0}', expected plugin:/path")]
    InvalidPluginPath(String),
}
