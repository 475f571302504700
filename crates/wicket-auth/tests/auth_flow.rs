//! End-to-end flows through the auth service over in-memory backends:
//! sign-up, sign-in, refresh rotation, sign-out, and the theft signal.

use std::time::Duration;

use wicket_auth::error::AuthError;
use wicket_auth::service::{AuthService, SignInRequest, SignUpRequest, TokenRefreshRequest, UserAuth};
use wicket_auth::types::{ApiKey, RoleCode};
use wicket_auth::AuthConfig;
use wicket_auth_memory::MemoryBackends;

fn test_config() -> AuthConfig {
    AuthConfig {
        issuer: "wicket-test".to_string(),
        signing_secret: "integration-test-signing-secret".to_string(),
        access_token_lifetime: Duration::from_secs(900),
        refresh_token_lifetime: Duration::from_secs(86400),
    }
}

async fn service() -> (AuthService, MemoryBackends) {
    let backends = MemoryBackends::seeded().await;
    (backends.service(&test_config()), backends)
}

async fn signed_up(service: &AuthService, email: &str) -> UserAuth {
    service
        .sign_up_basic(SignUpRequest {
            name: "Alice".to_string(),
            email: email.to_string(),
            password: "changeme".to_string(),
            profile_pic_url: None,
        })
        .await
        .unwrap()
}

fn refresh_request(auth: &UserAuth) -> TokenRefreshRequest {
    TokenRefreshRequest {
        refresh_token: auth.tokens.refresh_token.clone(),
    }
}

#[tokio::test]
async fn test_sign_up_authenticates_immediately() {
    let (service, _) = service().await;
    let auth = signed_up(&service, "alice@example.com").await;

    assert_eq!(auth.user.roles, vec![RoleCode::Learner]);

    let header = format!("Bearer {}", auth.tokens.access_token);
    let (user, session) = service.authenticate(&header).await.unwrap();
    assert_eq!(user.id, auth.user.id);
    assert_eq!(session.user_id, user.id);

    let profile = service.private_profile(&user);
    assert_eq!(profile.email, "alice@example.com");
}

#[tokio::test]
async fn test_duplicate_sign_up_rejected() {
    let (service, _) = service().await;
    signed_up(&service, "alice@example.com").await;

    let err = service
        .sign_up_basic(SignUpRequest {
            name: "Other".to_string(),
            email: "alice@example.com".to_string(),
            password: "different".to_string(),
            profile_pic_url: None,
        })
        .await
        .unwrap_err();
    assert!(matches!(err, AuthError::BadRequest { .. }));
}

#[tokio::test]
async fn test_sign_in_failures_are_indistinguishable() {
    let (service, _) = service().await;
    signed_up(&service, "alice@example.com").await;

    let wrong_password = service
        .sign_in_basic(SignInRequest {
            email: "alice@example.com".to_string(),
            password: "wrong-password".to_string(),
        })
        .await
        .unwrap_err();
    let unknown_email = service
        .sign_in_basic(SignInRequest {
            email: "nobody@example.com".to_string(),
            password: "changeme".to_string(),
        })
        .await
        .unwrap_err();
    assert_eq!(wrong_password.to_string(), unknown_email.to_string());
}

#[tokio::test]
async fn test_sign_in_opens_independent_session() {
    let (service, _) = service().await;
    let first = signed_up(&service, "alice@example.com").await;

    let second = service
        .sign_in_basic(SignInRequest {
            email: "alice@example.com".to_string(),
            password: "changeme".to_string(),
        })
        .await
        .unwrap();

    // Signing out of one device leaves the other's session live.
    let (_, session) = service
        .authenticate(&format!("Bearer {}", second.tokens.access_token))
        .await
        .unwrap();
    service.sign_out(&session).await.unwrap();

    assert!(
        service
            .authenticate(&format!("Bearer {}", second.tokens.access_token))
            .await
            .is_err()
    );
    assert!(
        service
            .authenticate(&format!("Bearer {}", first.tokens.access_token))
            .await
            .is_ok()
    );
}

#[tokio::test]
async fn test_refresh_rotates_pair() {
    let (service, _) = service().await;
    let auth = signed_up(&service, "alice@example.com").await;

    let renewed = service
        .renew_token(&auth.tokens.access_token, refresh_request(&auth))
        .await
        .unwrap();

    assert_ne!(renewed.access_token, auth.tokens.access_token);
    assert_ne!(renewed.refresh_token, auth.tokens.refresh_token);

    // The fresh pair works and stays bound to the same session.
    let header = format!("Bearer {}", renewed.access_token);
    let (user, _) = service.authenticate(&header).await.unwrap();
    assert_eq!(user.id, auth.user.id);
}

#[tokio::test]
async fn test_rotation_invalidates_previous_access_token() {
    let (service, _) = service().await;
    let auth = signed_up(&service, "alice@example.com").await;

    service
        .renew_token(&auth.tokens.access_token, refresh_request(&auth))
        .await
        .unwrap();

    // The pre-rotation access token is unexpired but no longer the
    // session's live access key.
    let err = service
        .authenticate(&format!("Bearer {}", auth.tokens.access_token))
        .await
        .unwrap_err();
    assert!(err.is_authentication_error());
}

#[tokio::test]
async fn test_refresh_token_is_single_use_and_replay_revokes() {
    let (service, _) = service().await;
    let auth = signed_up(&service, "alice@example.com").await;

    let renewed = service
        .renew_token(&auth.tokens.access_token, refresh_request(&auth))
        .await
        .unwrap();

    // Replaying the consumed refresh token is a theft signal.
    let err = service
        .renew_token(&auth.tokens.access_token, refresh_request(&auth))
        .await
        .unwrap_err();
    assert!(matches!(err, AuthError::RefreshMismatch));

    // The revocation kills the legitimately rotated credentials too.
    let err = service
        .authenticate(&format!("Bearer {}", renewed.access_token))
        .await
        .unwrap_err();
    assert!(err.is_authentication_error());

    let err = service
        .renew_token(
            &renewed.access_token,
            TokenRefreshRequest {
                refresh_token: renewed.refresh_token,
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(err, AuthError::SessionRevoked));
}

#[tokio::test]
async fn test_refresh_accepts_expired_access_token() {
    let backends = MemoryBackends::seeded().await;
    let service = backends.service(&AuthConfig {
        access_token_lifetime: Duration::from_secs(0),
        ..test_config()
    });
    let auth = signed_up(&service, "alice@example.com").await;

    tokio::time::sleep(Duration::from_millis(1100)).await;

    // The access token is past expiry and useless for requests, but still
    // identifies the session to rotate.
    assert!(
        service
            .authenticate(&format!("Bearer {}", auth.tokens.access_token))
            .await
            .is_err()
    );
    let renewed = service
        .renew_token(&auth.tokens.access_token, refresh_request(&auth))
        .await
        .unwrap();
    assert!(!renewed.access_token.is_empty());
}

#[tokio::test]
async fn test_refresh_rejects_mismatched_pair() {
    let (service, _) = service().await;
    let alice = signed_up(&service, "alice@example.com").await;
    let bob = signed_up(&service, "bob@example.com").await;

    let err = service
        .renew_token(&alice.tokens.access_token, refresh_request(&bob))
        .await
        .unwrap_err();
    assert!(matches!(err, AuthError::Unauthenticated { .. }));
}

#[tokio::test]
async fn test_refresh_rejects_swapped_token_kinds() {
    let (service, _) = service().await;
    let auth = signed_up(&service, "alice@example.com").await;

    // Refresh token in the access slot.
    let err = service
        .renew_token(&auth.tokens.refresh_token, refresh_request(&auth))
        .await
        .unwrap_err();
    assert!(matches!(err, AuthError::Unauthenticated { .. }));

    // Access token in the refresh slot.
    let err = service
        .renew_token(
            &auth.tokens.access_token,
            TokenRefreshRequest {
                refresh_token: auth.tokens.access_token.clone(),
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(err, AuthError::Unauthenticated { .. }));
}

#[tokio::test]
async fn test_sign_out_is_terminal() {
    let (service, _) = service().await;
    let auth = signed_up(&service, "alice@example.com").await;

    let header = format!("Bearer {}", auth.tokens.access_token);
    let (_, session) = service.authenticate(&header).await.unwrap();
    service.sign_out(&session).await.unwrap();

    let err = service.authenticate(&header).await.unwrap_err();
    assert!(err.is_authentication_error());

    let err = service
        .renew_token(&auth.tokens.access_token, refresh_request(&auth))
        .await
        .unwrap_err();
    assert!(matches!(err, AuthError::SessionRevoked));
}

#[tokio::test]
async fn test_disable_user_revokes_every_session() {
    let (service, _) = service().await;
    let auth = signed_up(&service, "alice@example.com").await;
    let second = service
        .sign_in_basic(SignInRequest {
            email: "alice@example.com".to_string(),
            password: "changeme".to_string(),
        })
        .await
        .unwrap();

    let revoked = service.disable_user(auth.user.id).await.unwrap();
    assert_eq!(revoked, 2);

    for token in [&auth.tokens.access_token, &second.tokens.access_token] {
        assert!(service.authenticate(&format!("Bearer {token}")).await.is_err());
    }

    // Credentials no longer sign in either.
    assert!(
        service
            .sign_in_basic(SignInRequest {
                email: "alice@example.com".to_string(),
                password: "changeme".to_string(),
            })
            .await
            .is_err()
    );
}

#[tokio::test]
async fn test_role_gate_uses_current_roles() {
    let (service, _) = service().await;
    let auth = signed_up(&service, "alice@example.com").await;

    // Default LEARNER satisfies a LEARNER requirement but not EDITOR.
    service
        .authorize_user_id(auth.user.id, &["LEARNER".to_string()])
        .await
        .unwrap();
    let err = service
        .authorize_user_id(auth.user.id, &["EDITOR".to_string(), "ADMIN".to_string()])
        .await
        .unwrap_err();
    assert!(matches!(err, AuthError::Forbidden { .. }));

    // An empty requirement means authenticated-is-enough.
    service.authorize_user_id(auth.user.id, &[]).await.unwrap();
}

#[tokio::test]
async fn test_api_key_verification() {
    let (service, backends) = service().await;

    use wicket_auth::storage::ApiKeyStorage;
    backends
        .api_keys
        .ensure(&ApiKey::new("svc-blog-key", 1))
        .await
        .unwrap();
    let mut disabled = ApiKey::new("svc-retired-key", 1);
    disabled.enabled = false;
    backends.api_keys.ensure(&disabled).await.unwrap();

    assert!(service.verify_api_key("svc-blog-key").await.is_ok());

    let err = service.verify_api_key("svc-retired-key").await.unwrap_err();
    assert!(matches!(err, AuthError::Forbidden { .. }));

    let err = service.verify_api_key("no-such-key").await.unwrap_err();
    assert!(matches!(err, AuthError::Forbidden { .. }));
}

#[tokio::test]
async fn test_public_profile_visibility() {
    let (service, _) = service().await;
    let auth = signed_up(&service, "alice@example.com").await;

    let profile = service.find_public_profile(auth.user.id).await.unwrap();
    assert_eq!(profile.name, "Alice");

    let err = service
        .find_public_profile(uuid::Uuid::new_v4())
        .await
        .unwrap_err();
    assert!(matches!(err, AuthError::NotFound { .. }));

    // Disabled accounts disappear from public view.
    service.disable_user(auth.user.id).await.unwrap();
    let err = service.find_public_profile(auth.user.id).await.unwrap_err();
    assert!(matches!(err, AuthError::NotFound { .. }));
}
