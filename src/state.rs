use std::collections::HashMap;
use std::sync::Arc;

use plinth_auth::{AuthService, DefaultAuthService};
use plinth_config::{AuthConfig, CookieConfig, CorsConfig, ServerConfig};
use plinth_core::{AppError, ClientContext, service_ref};
use tracing::info;

use crate::middleware::{HttpAuthService, PluginAuthAllow, PluginAuthPolicy};
use crate::modules::features::{ConfigFeatureDiscovery, FeatureDiscoveryService};

#[derive(Clone)]
pub struct AppState {
    pub auth: Arc<dyn AuthService>,
    pub http_auth: HttpAuthService,
    pub feature_discovery: ClientContext<dyn FeatureDiscoveryService>,
    pub cors_config: CorsConfig,
    plugin_auth_policies: Arc<HashMap<String, Vec<PluginAuthPolicy>>>,
}

impl AppState {
    pub fn new(
        auth: Arc<dyn AuthService>,
        cookie: CookieConfig,
        feature_discovery: ClientContext<dyn FeatureDiscoveryService>,
        cors_config: CorsConfig,
    ) -> Self {
        Self {
            http_auth: HttpAuthService::new(auth.clone(), cookie),
            auth,
            feature_discovery,
            cors_config,
            plugin_auth_policies: Arc::new(HashMap::new()),
        }
    }

    #[must_use]
    pub fn with_plugin_auth_policy(mut self, plugin_id: &str, policy: PluginAuthPolicy) -> Self {
        Arc::make_mut(&mut self.plugin_auth_policies)
            .entry(plugin_id.to_string())
            .or_default()
            .push(policy);
        self
    }

    /// The HTTP-auth service scoped to `plugin_id`'s auth policies.
    pub fn plugin_http_auth(&self, plugin_id: &str) -> HttpAuthService {
        let policies = self
            .plugin_auth_policies
            .get(plugin_id)
            .cloned()
            .unwrap_or_default();
        self.http_auth.with_plugin_policies(policies)
    }
}

pub fn init_app_state(
    auth_config: &AuthConfig,
    server_config: &ServerConfig,
    cors_config: CorsConfig,
) -> Result<AppState, AppError> {
    let auth = Arc::new(DefaultAuthService::new(auth_config));
    info!(
        service = service_ref::AUTH.id,
        static_tokens = auth.static_token_count(),
        "auth service ready"
    );

    let discovery: Arc<dyn FeatureDiscoveryService> =
        Arc::new(ConfigFeatureDiscovery::new(&server_config.features)?);
    let feature_discovery =
        ClientContext::with_client(service_ref::FEATURE_DISCOVERY.id, discovery);

    let mut state = AppState::new(
        auth,
        auth_config.cookie.clone(),
        feature_discovery,
        cors_config,
    );

    let policies = server_config
        .unauthenticated_paths
        .iter()
        .map(|path| (path, PluginAuthAllow::Unauthenticated))
        .chain(
            server_config
                .cookie_paths
                .iter()
                .map(|path| (path, PluginAuthAllow::UserCookie)),
        );
    for (plugin_path, allow) in policies {
        state = state.with_plugin_auth_policy(
            &plugin_path.plugin_id,
            PluginAuthPolicy::from_plugin_path(plugin_path, allow),
        );
    }

    Ok(state)
}
