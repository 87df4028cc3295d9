//! Explicitly passed client handles.
//!
//! A [`ClientContext`] is handed to whatever needs a client instead of being
//! looked up from ambient scope. Asking an empty context for its client is a
//! misconfiguration and fails with [`AppError::MissingContext`].

use std::fmt;
use std::sync::Arc;

use crate::errors::AppError;

pub struct ClientContext<C: ?Sized> {
    name: &'static str,
    client: Option<Arc<C>>,
}

impl<C: ?Sized> ClientContext<C> {
    /// A context with no client installed. `name` appears in the error.
    pub fn empty(name: &'static str) -> Self {
        Self { name, client: None }
    }

    pub fn with_client(name: &'static str, client: Arc<C>) -> Self {
        Self {
            name,
            client: Some(client),
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn is_installed(&self) -> bool {
        self.client.is_some()
    }

    /// Returns the installed client.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::MissingContext`] if no client was installed.
    pub fn client(&self) -> Result<&Arc<C>, AppError> {
        self.client
            .as_ref()
            .ok_or(AppError::MissingContext(self.name))
    }
}

impl<C: ?Sized> Clone for ClientContext<C> {
    fn clone(&self) -> Self {
        Self {
            name: self.name,
            client: self.client.clone(),
        }
    }
}

impl<C: ?Sized> fmt::Debug for ClientContext<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientContext")
            .field("name", &self.name)
            .field("installed", &self.client.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::ErrorKind;

    trait Greeter: Send + Sync {
        fn greet(&self) -> String;
    }

    struct English;

    impl Greeter for English {
        fn greet(&self) -> String {
            "hello".to_string()
        }
    }

    #[test]
    fn test_empty_context_fails_with_missing_context() {
        let context: ClientContext<dyn Greeter> = ClientContext::empty("greeter");

        let Err(err) = context.client() else {
            panic!("empty context returned a client");
        };
        assert_eq!(err.kind(), ErrorKind::MissingContext);
        assert_eq!(err.to_string(), "greeter not found in context");
        assert!(!context.is_installed());
    }

    #[test]
    fn test_installed_client_is_returned() {
        let context: ClientContext<dyn Greeter> =
            ClientContext::with_client("greeter", Arc::new(English));

        assert_eq!(context.client().unwrap().greet(), "hello");
        assert!(context.is_installed());
    }

    #[test]
    fn test_clone_shares_the_same_client() {
        let client: Arc<dyn Greeter> = Arc::new(English);
        let context = ClientContext::with_client("greeter", client.clone());
        let cloned = context.clone();

        assert!(Arc::ptr_eq(cloned.client().unwrap(), &client));
        assert_eq!(cloned.name(), "greeter");
    }
}
