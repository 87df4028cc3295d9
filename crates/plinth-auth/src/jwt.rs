//! JWT encoding and verification.
//!
//! [`TokenCodec`] holds the HS256 key material derived from the configured
//! secret and the validation rules (algorithm, issuer, required claims).
//! Keys are built once and shared read-only across requests.
//!
//! # Example
//!
//! ```ignore
//! use plinth_auth::{TokenClaims, TokenCodec};
//!
//! let codec = TokenCodec::new(&config.secret, &config.issuer);
//! let token = codec.encode(&claims)?;
//! let verified = codec.decode(&token)?;
//! ```

use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};

use plinth_core::AppError;

use crate::claims::TokenClaims;

#[derive(Clone)]
pub struct TokenCodec {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
}

impl TokenCodec {
    pub fn new(secret: &str, issuer: &str) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_issuer(&[issuer]);
        validation.set_required_spec_claims(&["exp", "iss", "sub"]);

        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            validation,
        }
    }

    /// Signs `claims` into a compact JWT.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Issuance`] if encoding fails.
    pub fn encode(&self, claims: &TokenClaims) -> Result<String, AppError> {
        encode(&Header::new(Algorithm::HS256), claims, &self.encoding_key)
            .map_err(|e| AppError::issuance(format!("failed to sign token: {e}")))
    }

    /// Verifies signature, issuer and expiry, and returns the claims.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::InvalidToken`] if the token is malformed, signed
    /// with another key, issued by someone else, or expired.
    pub fn decode(&self, token: &str) -> Result<TokenClaims, AppError> {
        decode::<TokenClaims>(token, &self.decoding_key, &self.validation)
            .map(|data| data.claims)
            .map_err(|e| AppError::invalid_token(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::claims::TokenType;
    use chrono::Utc;
    use plinth_core::ErrorKind;

    fn claims(issuer: &str, exp_offset: i64) -> TokenClaims {
        let now = Utc::now().timestamp();
        TokenClaims {
            iss: issuer.to_string(),
            sub: "catalog".to_string(),
            typ: TokenType::Service,
            ent: vec![],
            scope: vec![],
            iat: now,
            exp: now + exp_offset,
        }
    }

    #[test]
    fn test_encode_decode() {
        let codec = TokenCodec::new("test-secret-key-at-least-32-characters-long", "plinth");
        let original = claims("plinth", 3600);

        let token = codec.encode(&original).unwrap();
        assert_eq!(token.split('.').count(), 3);
        assert_eq!(codec.decode(&token).unwrap(), original);
    }

    #[test]
    fn test_wrong_secret_is_invalid() {
        let codec = TokenCodec::new("test-secret-key-at-least-32-characters-long", "plinth");
        let other = TokenCodec::new("different-secret-key-at-least-32-characters", "plinth");

        let token = other.encode(&claims("plinth", 3600)).unwrap();
        assert_eq!(
            codec.decode(&token).unwrap_err().kind(),
            ErrorKind::InvalidToken
        );
    }

    #[test]
    fn test_wrong_issuer_is_invalid() {
        let codec = TokenCodec::new("shared-secret", "plinth");
        let token = codec.encode(&claims("someone-else", 3600)).unwrap();

        assert_eq!(
            codec.decode(&token).unwrap_err().kind(),
            ErrorKind::InvalidToken
        );
    }

    #[test]
    fn test_expired_is_invalid() {
        let codec = TokenCodec::new("shared-secret", "plinth");
        let token = codec.encode(&claims("plinth", -3600)).unwrap();

        assert_eq!(
            codec.decode(&token).unwrap_err().kind(),
            ErrorKind::InvalidToken
        );
    }

    #[test]
    fn test_garbage_is_invalid() {
        let codec = TokenCodec::new("shared-secret", "plinth");

        for token in ["", "invalid-token", "a.b.c"] {
            assert_eq!(
                codec.decode(token).unwrap_err().kind(),
                ErrorKind::InvalidToken
            );
        }
    }
}
