//! JWT claim structure for issued tokens.
//!
//! A token encodes exactly one principal:
//!
//! - `typ`: `user` or `service`
//! - `sub`: the user entity ref, or the service id
//! - `ent`: ownership entity refs (user tokens only)
//! - `scope`: capability restrictions, omitted when unrestricted
//! - `iss`, `iat`, `exp`: issuer and validity window (unix seconds)

use serde::{Deserialize, Serialize};

use plinth_core::AppError;

use crate::credentials::{CredentialScope, Credentials, Principal};
use crate::entity_ref::EntityRef;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenType {
    User,
    Service,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenClaims {
    pub iss: String,
    pub sub: String,
    pub typ: TokenType,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub ent: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub scope: Vec<CredentialScope>,
    pub iat: i64,
    pub exp: i64,
}

impl TokenClaims {
    /// Builds claims for `credentials`, valid from `issued_at` for `ttl`
    /// seconds.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Issuance`] for unauthenticated credentials, empty
    /// service ids, malformed entity refs, and a `ttl` that is not positive
    /// or overflows the expiry timestamp.
    pub fn from_credentials(
        credentials: &Credentials,
        issuer: &str,
        issued_at: i64,
        ttl: i64,
    ) -> Result<Self, AppError> {
        if ttl <= 0 {
            return Err(AppError::issuance(format!(
                "token lifetime must be positive, got {ttl}s"
            )));
        }
        let exp = issued_at
            .checked_add(ttl)
            .ok_or_else(|| AppError::issuance(format!("token lifetime {ttl}s overflows")))?;

        let (typ, sub, ent) = match credentials.principal() {
            Principal::User {
                user_entity_ref,
                ownership_entity_refs,
            } => {
                let entity = EntityRef::parse(user_entity_ref).map_err(AppError::issuance)?;
                if !entity.is_kind("user") {
                    return Err(AppError::issuance(format!(
                        "'{user_entity_ref}' is not a user entity ref"
                    )));
                }
                for ownership_ref in ownership_entity_refs {
                    EntityRef::parse(ownership_ref).map_err(AppError::issuance)?;
                }
                (
                    TokenType::User,
                    user_entity_ref.clone(),
                    ownership_entity_refs.clone(),
                )
            }
            Principal::Service { id } => {
                if id.trim().is_empty() {
                    return Err(AppError::issuance("service id must not be empty"));
                }
                (TokenType::Service, id.clone(), Vec::new())
            }
            Principal::Unauthenticated => {
                return Err(AppError::issuance(
                    "cannot issue a token for unauthenticated credentials",
                ));
            }
        };

        Ok(Self {
            iss: issuer.to_string(),
            sub,
            typ,
            ent,
            scope: credentials.scope().to_vec(),
            iat: issued_at,
            exp,
        })
    }

    /// Turns verified claims back into credentials carrying `token`.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::InvalidToken`] if the claims are internally
    /// inconsistent (empty subject, ownership refs on a service token).
    pub fn into_credentials(self, token: String) -> Result<Credentials, AppError> {
        if self.sub.trim().is_empty() {
            return Err(AppError::invalid_token("token subject is empty"));
        }

        let credentials = match self.typ {
            TokenType::User => Credentials::user(token, self.sub, self.ent),
            TokenType::Service => {
                if !self.ent.is_empty() {
                    return Err(AppError::invalid_token(
                        "service token must not carry ownership refs",
                    ));
                }
                Credentials::service(token, self.sub)
            }
        };

        if self.scope.is_empty() {
            Ok(credentials)
        } else {
            Ok(credentials.with_scope(self.scope))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use plinth_core::ErrorKind;

    #[test]
    fn test_user_claims_serialize() {
        let credentials = Credentials::user(
            "",
            "user:default/jane",
            vec!["group:default/team-a".to_string()],
        );
        let claims = TokenClaims::from_credentials(&credentials, "plinth", 1_000, 60).unwrap();
        let serialized = serde_json::to_string(&claims).unwrap();

        assert!(serialized.contains(r#""typ":"user""#));
        assert!(serialized.contains(r#""sub":"user:default/jane""#));
        assert!(serialized.contains(r#""ent":["group:default/team-a"]"#));
        assert!(!serialized.contains("scope"));
        assert_eq!(claims.exp, 1_060);
    }

    #[test]
    fn test_service_claims_omit_ent() {
        let credentials = Credentials::service("", "catalog");
        let claims = TokenClaims::from_credentials(&credentials, "plinth", 0, 60).unwrap();
        let serialized = serde_json::to_string(&claims).unwrap();

        assert!(serialized.contains(r#""typ":"service""#));
        assert!(!serialized.contains("ent"));
    }

    #[test]
    fn test_scope_is_serialized_kebab_case() {
        let credentials = Credentials::user("", "user:default/jane", vec![])
            .with_scope([CredentialScope::StaticAssets]);
        let claims = TokenClaims::from_credentials(&credentials, "plinth", 0, 60).unwrap();
        let serialized = serde_json::to_string(&claims).unwrap();

        assert!(serialized.contains(r#""scope":["static-assets"]"#));
    }

    #[test]
    fn test_unauthenticated_cannot_be_issued() {
        let err = TokenClaims::from_credentials(&Credentials::unauthenticated(), "plinth", 0, 60)
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::IssuanceError);
    }

    #[test]
    fn test_malformed_refs_cannot_be_issued() {
        let not_a_user = Credentials::user("", "group:default/team-a", vec![]);
        let bad_ownership = Credentials::user("", "user:default/jane", vec!["oops".to_string()]);
        let empty_service = Credentials::service("", " ");

        for credentials in [not_a_user, bad_ownership, empty_service] {
            let err = TokenClaims::from_credentials(&credentials, "plinth", 0, 60).unwrap_err();
            assert_eq!(err.kind(), ErrorKind::IssuanceError);
        }
    }

    #[test]
    fn test_lifetime_must_be_positive_and_fit() {
        let credentials = Credentials::service("", "catalog");

        for (issued_at, ttl) in [(1_000, 0), (1_000, -600), (1_000, i64::MAX)] {
            let err = TokenClaims::from_credentials(&credentials, "plinth", issued_at, ttl)
                .unwrap_err();
            assert_eq!(err.kind(), ErrorKind::IssuanceError, "ttl {ttl}");
        }
    }

    #[test]
    fn test_into_credentials_restores_principal() {
        let original = Credentials::user(
            "",
            "user:default/jane",
            vec!["group:default/team-a".to_string()],
        )
        .with_scope([CredentialScope::StaticAssets]);
        let claims = TokenClaims::from_credentials(&original, "plinth", 0, 60).unwrap();

        let restored = claims.into_credentials("abc".to_string()).unwrap();
        assert!(restored.is_equivalent(&original));
        assert_eq!(restored.token(), "abc");
    }

    #[test]
    fn test_service_claims_with_ent_are_rejected() {
        let claims = TokenClaims {
            iss: "plinth".to_string(),
            sub: "catalog".to_string(),
            typ: TokenType::Service,
            ent: vec!["group:default/team-a".to_string()],
            scope: vec![],
            iat: 0,
            exp: 60,
        };

        let err = claims.into_credentials("t".to_string()).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidToken);
    }

    #[test]
    fn test_claims_deserialize_without_optional_fields() {
        let json = r#"{"iss":"plinth","sub":"catalog","typ":"service","iat":1,"exp":2}"#;
        let claims: TokenClaims = serde_json::from_str(json).unwrap();

        assert!(claims.ent.is_empty());
        assert!(claims.scope.is_empty());
        assert_eq!(claims.typ, TokenType::Service);
    }
}
