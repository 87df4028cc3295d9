//! Server configuration.
//!
//! | Variable                       | Default   | Description                                  |
//! |--------------------------------|-----------|----------------------------------------------|
//! | `HOST`                         | `0.0.0.0` | Listen address                               |
//! | `PORT`                         | `7007`    | HTTP listen port                             |
//! | `METRICS_PORT`                 | `9090`    | Prometheus exporter port                     |
//! | `PLINTH_FEATURES`              | (none)    | `plugin,plugin:module,...` to register       |
//! | `PLINTH_UNAUTHENTICATED_PATHS` | (none)    | `plugin:/path,...` open to anonymous callers |
//! | `PLINTH_COOKIE_PATHS`          | (none)    | `plugin:/path,...` accepting session cookies |

use std::env;

use crate::error::ConfigError;
use crate::split_list;

/// A path inside a plugin's router, e.g. `catalog:/health`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PluginPath {
    pub plugin_id: String,
    pub path: String,
}

impl PluginPath {
    fn parse(entry: &str) -> Result<Self, ConfigError> {
        match entry.split_once(':') {
            Some((plugin_id, path)) if !plugin_id.trim().is_empty() && path.starts_with('/') => {
                Ok(Self {
                    plugin_id: plugin_id.trim().to_string(),
                    path: path.to_string(),
                })
            }
            _ => Err(ConfigError::InvalidPluginPath(entry.to_string())),
        }
    }
}

#[derive(Clone, Debug)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub metrics_port: u16,
    /// Raw feature declarations, in configured order.
    pub features: Vec<String>,
    pub unauthenticated_paths: Vec<PluginPath>,
    pub cookie_paths: Vec<PluginPath>,
}

impl ServerConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let plugin_paths = |key: &str| -> Result<Vec<PluginPath>, ConfigError> {
            lookup(key)
                .map(|raw| split_list(&raw))
                .unwrap_or_default()
                .iter()
                .map(|entry| PluginPath::parse(entry))
                .collect()
        };

        Ok(Self {
            host: lookup("HOST").unwrap_or_else(|| "0.0.0.0".to_string()),
            port: lookup("PORT").and_then(|s| s.parse().ok()).unwrap_or(7007),
            metrics_port: lookup("METRICS_PORT")
                .and_then(|s| s.parse().ok())
                .unwrap_or(9090),
            features: lookup("PLINTH_FEATURES")
                .map(|raw| split_list(&raw))
                .unwrap_or_default(),
            unauthenticated_paths: plugin_paths("PLINTH_UNAUTHENTICATED_PATHS")?,
            cookie_paths: plugin_paths("PLINTH_COOKIE_PATHS")?,
        })
    }

    pub fn listen_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
