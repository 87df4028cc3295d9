//! # Plinth CLI
//!
//! Administrative helpers behind the `plinth-cli` binary:
//!
//! - [`issue_token`]: mint a user or service token with the configured secret
//! - [`inspect_token`]: authenticate a token and describe its principal
//! - [`generate_secret`]: produce a random signing secret

use data_encoding::BASE64URL_NOPAD;
use rand::RngCore;
use serde_json::{Value, json};

use plinth_auth::{AuthService, Credentials};
use plinth_core::AppError;

/// Who a token is issued to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Subject {
    Service(String),
    User {
        entity_ref: String,
        ownership: Vec<String>,
    },
}

impl Subject {
    fn into_credentials(self) -> Credentials {
        match self {
            Self::Service(id) => Credentials::service("", id),
            Self::User {
                entity_ref,
                mut ownership,
            } => {
                // A user always owns what their own ref owns.
                if !ownership.contains(&entity_ref) {
                    ownership.insert(0, entity_ref.clone());
                }
                Credentials::user("", entity_ref, ownership)
            }
        }
    }
}

pub async fn issue_token(auth: &dyn AuthService, subject: Subject) -> Result<String, AppError> {
    let issued = auth.issue_token(&subject.into_credentials()).await?;
    Ok(issued.token)
}

pub async fn inspect_token(auth: &dyn AuthService, token: &str) -> Result<Value, AppError> {
    let credentials = auth.authenticate(token).await?;
    Ok(json!({
        "principal": credentials.principal(),
        "scope": credentials.scope(),
    }))
}

pub const DEFAULT_SECRET_BYTES: usize = 32;

/// Random bytes, base64url encoded without padding.
pub fn generate_secret(bytes: usize) -> String {
    let mut buf = vec![0u8; bytes];
    rand::thread_rng().fill_bytes(&mut buf);
    BASE64URL_NOPAD.encode(&buf)
}

#[cfg(test)]
mod tests {
    use super::*;
    use plinth_auth::DefaultAuthService;
    use plinth_config::{AuthConfig, CookieConfig};
    use plinth_core::ErrorKind;

    fn auth() -> DefaultAuthService {
        DefaultAuthService::new(&AuthConfig {
            secret: "cli-test-secret".to_string(),
            issuer: "plinth".to_string(),
            token_expiry: 60,
            static_tokens: vec![],
            cookie: CookieConfig::default(),
        })
    }

    #[tokio::test]
    async fn test_issue_and_inspect_service_token() {
        let auth = auth();
        let token = issue_token(&auth, Subject::Service("catalog".to_string()))
            .await
            .unwrap();

        let inspected = inspect_token(&auth, &token).await.unwrap();
        assert_eq!(inspected["principal"]["type"], "service");
        assert_eq!(inspected["principal"]["id"], "catalog");
    }

    #[tokio::test]
    async fn test_user_token_owns_itself() {
        let auth = auth();
        let token = issue_token(
            &auth,
            Subject::User {
                entity_ref: "user:default/jane".to_string(),
                ownership: vec!["group:default/team-a".to_string()],
            },
        )
        .await
        .unwrap();

        let inspected = inspect_token(&auth, &token).await.unwrap();
        assert_eq!(
            inspected["principal"]["ownership_entity_refs"],
            json!(["user:default/jane", "group:default/team-a"])
        );
    }

    #[tokio::test]
    async fn test_inspect_garbage_is_invalid() {
        let err = inspect_token(&auth(), "not-a-token").await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidToken);
    }

    #[test]
    fn test_generate_secret_length_and_uniqueness() {
        let a = generate_secret(DEFAULT_SECRET_BYTES);
        let b = generate_secret(DEFAULT_SECRET_BYTES);

        // 32 bytes -> 43 base64 characters without padding
        assert_eq!(a.len(), 43);
        assert_ne!(a, b);
        assert!(BASE64URL_NOPAD.decode(a.as_bytes()).is_ok());
    }
}
