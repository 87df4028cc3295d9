//! # Plinth Core
//!
//! Core types shared by every Plinth crate.
//!
//! - [`errors`]: the [`AppError`] kinds surfaced by authentication and
//!   authorization, with HTTP response conversion
//! - [`context`]: [`ClientContext`], an explicitly passed client handle that
//!   fails loudly when nothing was installed
//! - [`service_ref`]: stable identifiers for the framework's core services
//!
//! # Example
//!
//! ```ignore
//! use plinth_core::{AppError, ClientContext};
//!
//! let context: ClientContext<ApiClient> = ClientContext::empty("apiClient");
//! assert!(matches!(context.client(), Err(AppError::MissingContext(_))));
//! ```

pub mod context;
pub mod errors;
pub mod service_ref;

// Re-export commonly used types at crate root
pub use context::ClientContext;
pub use errors::{AppError, ErrorKind};
pub use service_ref::{ServiceRef, ServiceScope};
