//! Identifiers for the framework's core services.
//!
//! Services are wired by constructor injection; these identifiers are the
//! stable names they are published under, used in logs and in the feature
//! listing.
//!
//! # Example
//!
//! ```ignore
//! use plinth_core::service_ref;
//!
//! tracing::info!(service = service_ref::AUTH.id, "service ready");
//! ```

use serde::Serialize;

/// Where a service instance lives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ServiceScope {
    /// One instance shared by the whole backend.
    Root,
    /// One instance per plugin.
    Plugin,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ServiceRef {
    pub id: &'static str,
    pub scope: ServiceScope,
}

impl ServiceRef {
    pub const fn new(id: &'static str, scope: ServiceScope) -> Self {
        Self { id, scope }
    }
}

// =============================================================================
// Core services
// =============================================================================

/// Authenticates tokens and issues new ones.
pub const AUTH: ServiceRef = ServiceRef::new("core.auth", ServiceScope::Plugin);
/// Extracts credentials from HTTP requests and enforces allow-lists.
pub const HTTP_AUTH: ServiceRef = ServiceRef::new("core.httpAuth", ServiceScope::Plugin);
/// Lists backend features to register at startup.
pub const FEATURE_DISCOVERY: ServiceRef =
    ServiceRef::new("core.featureDiscovery", ServiceScope::Root);

/// All core service identifiers.
pub const ALL: [ServiceRef; 3] = [AUTH, HTTP_AUTH, FEATURE_DISCOVERY];
