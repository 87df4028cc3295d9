//! # Plinth Auth
//!
//! The credentials model and the auth service.
//!
//! This crate provides:
//!
//! - [`credentials`]: [`Credentials`], [`Principal`] and the allow-list
//!   vocabulary ([`CredentialKind`], [`AllowPolicy`])
//! - [`entity_ref`]: validation of `kind:namespace/name` references
//! - [`claims`]: JWT claims carried by issued tokens
//! - [`jwt`]: [`TokenCodec`], HS256 signing and verification
//! - [`service`]: the [`AuthService`] trait and [`DefaultAuthService`]
//!
//! # Example
//!
//! ```ignore
//! use plinth_auth::{AuthService, Credentials, DefaultAuthService};
//! use plinth_config::AuthConfig;
//!
//! let auth = DefaultAuthService::new(&AuthConfig::from_env()?);
//!
//! let issued = auth.issue_token(&Credentials::service("", "catalog")).await?;
//! let credentials = auth.authenticate(&issued.token).await?;
//! assert_eq!(credentials.service_id(), Some("catalog"));
//! ```

pub mod claims;
pub mod credentials;
pub mod entity_ref;
pub mod jwt;
pub mod service;

// Re-export commonly used types at crate root
pub use claims::{TokenClaims, TokenType};
pub use credentials::{AllowPolicy, CredentialKind, CredentialScope, Credentials, Principal};
pub use entity_ref::EntityRef;
pub use jwt::TokenCodec;
pub use service::{AuthService, DefaultAuthService, IssuedToken};
