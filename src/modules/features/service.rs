use async_trait::async_trait;
use tracing::{info, warn};

use plinth_core::AppError;

use super::model::{BackendFeature, BackendFeatures, FeatureKind};

#[async_trait]
pub trait FeatureDiscoveryService: Send + Sync {
    /// Lists the features to register, in registration order.
    async fn get_backend_features(&self) -> Result<BackendFeatures, AppError>;
}

/// Discovers features from a static list of declarations
/// (`catalog,scaffolder,catalog:github-module`).
pub struct ConfigFeatureDiscovery {
    features: Vec<BackendFeature>,
}

impl ConfigFeatureDiscovery {
    /// Parses `declarations`. Repeated declarations keep their first position.
    pub fn new(declarations: &[String]) -> Result<Self, AppError> {
        let mut features: Vec<BackendFeature> = Vec::with_capacity(declarations.len());

        for declaration in declarations {
            let feature = BackendFeature::parse(declaration)
                .map_err(|e| AppError::internal(anyhow::anyhow!(e)))?;
            if features.contains(&feature) {
                warn!(feature = %declaration, "duplicate feature declaration ignored");
                continue;
            }
            features.push(feature);
        }

        for feature in &features {
            if let FeatureKind::Module { plugin_id } = &feature.kind {
                if !features.contains(&BackendFeature::plugin(plugin_id.as_str())) {
                    warn!(
                        module = %feature.id,
                        plugin = %plugin_id,
                        "module declared for a plugin that is not registered"
                    );
                }
            }
        }

        info!(count = features.len(), "feature discovery configured");
        Ok(Self { features })
    }
}

#[async_trait]
impl FeatureDiscoveryService for ConfigFeatureDiscovery {
    async fn get_backend_features(&self) -> Result<BackendFeatures, AppError> {
        Ok(BackendFeatures {
            features: self.features.clone(),
        })
    }
}
