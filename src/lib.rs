//! # Plinth
//!
//! The authentication surface of a pluggable backend, served with Axum.
//!
//! ## Overview
//!
//! - **Auth service**: validates opaque tokens into credentials and mints new
//!   ones (`plinth-auth`)
//! - **HTTP auth**: extracts credentials from requests under an allow-list,
//!   forwards identity on outbound calls, issues session cookies
//! - **Feature discovery**: lists the plugins and modules to register; one
//!   router is mounted per plugin under `/api/{plugin_id}`
//!
//! ## Architecture
//!
//! ```text
//! crates/
//! ├── plinth-core/      # AppError, ClientContext, service identifiers
//! ├── plinth-config/    # Environment configuration
//! ├── plinth-auth/      # Credentials, token claims, AuthService
//! └── plinth-cli/       # Token administration tool
//! src/
//! ├── middleware/       # HttpAuthService, HttpAuthLayer, Authenticated
//! ├── modules/
//! │   ├── features/    # Feature discovery and GET /api/.features
//! │   └── identity/    # Routes mounted under every plugin
//! ├── logging.rs        # Tracing setup and request logging
//! ├── metrics.rs        # Prometheus metrics
//! ├── router.rs         # Application router
//! └── state.rs          # Shared application state
//! ```
//!
//! ## Credential kinds
//!
//! | Kind           | Presented as                         |
//! |----------------|--------------------------------------|
//! | `user`         | user token in `Authorization`        |
//! | `user-cookie`  | user token in the session cookie     |
//! | `service`      | service token in `Authorization`     |
//! | `unauthorized` | nothing                              |
//!
//! Routes accept `user` and `service` unless a policy says otherwise.
//!
//! ## Quick Start
//!
//! ```bash
//! AUTH_SECRET=your-secure-secret-key
//! AUTH_STATIC_TOKENS=svc-123=catalog
//! PLINTH_FEATURES=catalog,scaffolder,catalog:github-module
//! PLINTH_UNAUTHENTICATED_PATHS=catalog:/whoami
//! ```

pub mod logging;
pub mod metrics;
pub mod middleware;
pub mod modules;
pub mod router;
pub mod state;

// Re-export workspace crates for convenience
pub use plinth_auth;
pub use plinth_config;
pub use plinth_core;
