//! Feature modules.
//!
//! - [`features`]: feature discovery and `GET /api/.features`
//! - [`identity`]: the routes mounted under every plugin, `/whoami` and the
//!   session cookie endpoint

pub mod features;
pub mod identity;
