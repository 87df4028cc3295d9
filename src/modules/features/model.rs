use serde::{Deserialize, Serialize};

use plinth_core::ServiceRef;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum FeatureKind {
    Plugin,
    Module { plugin_id: String },
}

/// A backend feature to register: a plugin, or a module extending one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BackendFeature {
    pub id: String,
    #[serde(flatten)]
    pub kind: FeatureKind,
}

impl BackendFeature {
    pub fn plugin(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            kind: FeatureKind::Plugin,
        }
    }

    pub fn module(plugin_id: impl Into<String>, id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            kind: FeatureKind::Module {
                plugin_id: plugin_id.into(),
            },
        }
    }

    /// Parses `plugin` or `plugin:module`.
    pub fn parse(declaration: &str) -> Result<Self, String> {
        let declaration = declaration.trim();
        let feature = match declaration.split_once(':') {
            Some((plugin_id, module_id)) => {
                validate_id(plugin_id, declaration)?;
                validate_id(module_id, declaration)?;
                Self::module(plugin_id, module_id)
            }
            None => {
                validate_id(declaration, declaration)?;
                Self::plugin(declaration)
            }
        };
        Ok(feature)
    }

    pub fn is_plugin(&self) -> bool {
        matches!(self.kind, FeatureKind::Plugin)
    }
}

// Plugin ids become path segments under /api.
fn validate_id(id: &str, declaration: &str) -> Result<(), String> {
    let valid = !id.is_empty()
        && id
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
    if valid {
        Ok(())
    } else {
        Err(format!("invalid feature declaration '{declaration}'"))
    }
}

/// The complete registration set at the time it was requested.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BackendFeatures {
    pub features: Vec<BackendFeature>,
}

impl BackendFeatures {
    pub fn plugin_ids(&self) -> impl Iterator<Item = &str> {
        self.features
            .iter()
            .filter(|feature| feature.is_plugin())
            .map(|feature| feature.id.as_str())
    }
}

#[derive(Debug, Serialize)]
pub struct FeaturesResponse {
    pub features: Vec<BackendFeature>,
    pub services: Vec<ServiceRef>,
}
