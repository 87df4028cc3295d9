//! Request authentication.
//!
//! # Modules
//!
//! - [`http_auth`]: [`HttpAuthService`], credential extraction, outbound
//!   headers and session cookies
//! - [`policy`]: [`HttpAuthLayer`] and the per-path plugin auth policies
//! - [`extract`]: the [`Authenticated`] extractor
//!
//! # Authentication Flow
//!
//! 1. Client sends `Authorization: Bearer <token>` or a session cookie
//! 2. `HttpAuthLayer` resolves the allow-list for the request path and
//!    extracts credentials, rejecting the request on failure
//! 3. The credentials are attached to the request extensions
//! 4. Handlers read them with `Authenticated`
//!
//! # Example
//!
//! ```ignore
//! use crate::middleware::Authenticated;
//!
//! async fn whoami(Authenticated(credentials): Authenticated) -> impl IntoResponse {
//!     Json(credentials.principal().clone())
//! }
//! ```

pub mod extract;
pub mod http_auth;
pub mod policy;

pub use extract::Authenticated;
pub use http_auth::{CookieIssued, HttpAuthService};
pub use policy::{HttpAuthLayer, PluginAuthAllow, PluginAuthPolicy};
