//! # Plinth Config
//!
//! Configuration types for Plinth, loaded from environment variables:
//!
//! - [`auth`]: token signing, static tokens and session cookie settings
//! - [`cors`]: CORS (Cross-Origin Resource Sharing) configuration
//! - [`server`]: listen addresses, discovered features and plugin auth policies
//!
//! Every config exposes `from_env()` and a `from_lookup()` variant that reads
//! from any `Fn(&str) -> Option<String>`, which keeps tests off the process
//! environment.
//!
//! # Example
//!
//! ```ignore
//! use plinth_config::{AuthConfig, CorsConfig, ServerConfig};
//!
//! let auth_config = AuthConfig::from_env()?;
//! let cors_config = CorsConfig::from_env();
//! let server_config = ServerConfig::from_env()?;
//! ```

pub mod auth;
pub mod cors;
pub mod error;
pub mod server;

// Re-export commonly used types at crate root
pub use auth::{AuthConfig, CookieConfig, MAX_EXPIRY_SECS, StaticToken};
pub use cors::CorsConfig;
pub use error::ConfigError;
pub use server::{PluginPath, ServerConfig};

/// Split a comma separated list, trimming entries and dropping empty ones.
pub(crate) fn split_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

pub(crate) fn parse_bool(raw: &str) -> bool {
    matches!(raw.trim().to_lowercase().as_str(), "1" | "true" | "yes" | "on")
}
