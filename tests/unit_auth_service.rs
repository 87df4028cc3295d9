mod common;

use chrono::Utc;
use common::{STATIC_TOKEN, TEST_SECRET, jane, test_auth_config, test_auth_service};
use jsonwebtoken::{EncodingKey, Header, encode};
use plinth::plinth_auth::{AuthService, CredentialScope, Credentials, DefaultAuthService, Principal};
use plinth::plinth_config::{AuthConfig, MAX_EXPIRY_SECS};
use plinth::plinth_core::ErrorKind;
use serde_json::json;

#[tokio::test]
async fn test_round_trip_preserves_credentials() {
    let auth = test_auth_service();
    let cases = [
        jane(),
        Credentials::user("", "user:default/solo", vec![]),
        jane().with_scope([CredentialScope::StaticAssets]),
        Credentials::service("", "scaffolder"),
    ];

    for credentials in cases {
        let issued = auth.issue_token(&credentials).await.unwrap();
        let authenticated = auth.authenticate(&issued.token).await.unwrap();
        assert!(
            authenticated.is_equivalent(&credentials),
            "{credentials:?} came back as {authenticated:?}"
        );
    }
}

#[tokio::test]
async fn test_unusable_lifetime_fails_issuance_without_panicking() {
    for token_expiry in [-600, 0, i64::MAX] {
        let config = AuthConfig {
            token_expiry,
            ..test_auth_config()
        };
        let auth = DefaultAuthService::new(&config);

        let err = auth.issue_token(&jane()).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::IssuanceError, "expiry {token_expiry}");
    }
}

#[tokio::test]
async fn test_longest_configured_lifetime_round_trips() {
    let config = AuthConfig {
        token_expiry: MAX_EXPIRY_SECS,
        ..test_auth_config()
    };
    let auth = DefaultAuthService::new(&config);

    let issued = auth.issue_token(&jane()).await.unwrap();
    let authenticated = auth.authenticate(&issued.token).await.unwrap();
    assert!(authenticated.is_equivalent(&jane()));
}

#[tokio::test]
async fn test_static_token_reissue_keeps_service_id() {
    let auth = test_auth_service();

    let credentials = auth.authenticate(STATIC_TOKEN).await.unwrap();
    assert_eq!(
        credentials.principal(),
        &Principal::Service {
            id: "catalog".to_string()
        }
    );

    let reissued = auth.issue_token(&credentials).await.unwrap();
    assert_ne!(reissued.token, STATIC_TOKEN);

    let again = auth.authenticate(&reissued.token).await.unwrap();
    assert_eq!(again.service_id(), Some("catalog"));
}

#[tokio::test]
async fn test_invalid_tokens_are_rejected() {
    let auth = test_auth_service();

    for token in ["", "garbage", "a.b.c", "svc-124"] {
        let err = auth.authenticate(token).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidToken, "token '{token}'");
    }
}

#[tokio::test]
async fn test_expired_token_is_rejected() {
    let now = Utc::now().timestamp();
    let claims = json!({
        "iss": "plinth",
        "sub": "catalog",
        "typ": "service",
        "iat": now - 7200,
        "exp": now - 3600,
    });
    let token = encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(TEST_SECRET.as_bytes()),
    )
    .unwrap();

    let err = test_auth_service().authenticate(&token).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidToken);
}

#[tokio::test]
async fn test_foreign_issuer_is_rejected() {
    let now = Utc::now().timestamp();
    let claims = json!({
        "iss": "someone-else",
        "sub": "catalog",
        "typ": "service",
        "iat": now,
        "exp": now + 3600,
    });
    let token = encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(TEST_SECRET.as_bytes()),
    )
    .unwrap();

    let err = test_auth_service().authenticate(&token).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidToken);
}

#[tokio::test]
async fn test_unauthenticated_cannot_be_issued() {
    let err = test_auth_service()
        .issue_token(&Credentials::unauthenticated())
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::IssuanceError);
}
