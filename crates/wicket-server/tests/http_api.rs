//! HTTP surface tests over in-memory backends: envelopes, status codes,
//! and the full credential/token lifecycle as a client would drive it.

use axum::Router;
use axum::body::{Body, to_bytes};
use axum::http::{Request, Response, StatusCode, header};
use tower::ServiceExt;

use wicket_auth::AuthConfig;
use wicket_auth::storage::ApiKeyStorage;
use wicket_auth::types::ApiKey;
use wicket_auth_memory::MemoryBackends;
use wicket_server::app;

fn test_config() -> AuthConfig {
    AuthConfig {
        issuer: "wicket-test".to_string(),
        signing_secret: "http-api-test-signing-secret".to_string(),
        ..AuthConfig::default()
    }
}

async fn test_app() -> Router {
    let backends = MemoryBackends::seeded().await;
    backends
        .api_keys
        .ensure(&ApiKey::new("svc-blog-key", 1))
        .await
        .unwrap();
    app(std::sync::Arc::new(backends.service(&test_config())))
}

fn json_request(method: &str, uri: &str, body: serde_json::Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn get_request(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

async fn body_json(response: Response<Body>) -> serde_json::Value {
    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&body).unwrap()
}

async fn sign_up(app: &Router, email: &str) -> serde_json::Value {
    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/signup/basic",
            serde_json::json!({
                "name": "Alice",
                "email": email,
                "password": "changeme",
            }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    body_json(response).await
}

#[tokio::test]
async fn test_healthz() {
    let app = test_app().await;
    let response = app.oneshot(get_request("/healthz")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_sign_up_returns_tokens_and_profile() {
    let app = test_app().await;
    let json = sign_up(&app, "alice@example.com").await;

    assert_eq!(json["message"], "signup success");
    assert_eq!(json["data"]["user"]["email"], "alice@example.com");
    assert_eq!(json["data"]["user"]["roles"][0], "LEARNER");
    assert!(json["data"]["tokens"]["accessToken"].is_string());
    assert!(json["data"]["tokens"]["refreshToken"].is_string());
    // The password never echoes back in any shape.
    assert!(json["data"]["user"].get("password").is_none());
    assert!(json["data"]["user"].get("passwordHash").is_none());
}

#[tokio::test]
async fn test_duplicate_email_is_bad_request() {
    let app = test_app().await;
    sign_up(&app, "alice@example.com").await;

    let response = app
        .oneshot(json_request(
            "POST",
            "/signup/basic",
            serde_json::json!({
                "name": "Other",
                "email": "alice@example.com",
                "password": "different",
            }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert!(json["message"].as_str().unwrap().contains("email"));
}

#[tokio::test]
async fn test_malformed_body_is_bad_request() {
    let app = test_app().await;
    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/signin/basic")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from("{not json"))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_wrong_password_is_unauthorized() {
    let app = test_app().await;
    sign_up(&app, "alice@example.com").await;

    let response = app
        .oneshot(json_request(
            "POST",
            "/signin/basic",
            serde_json::json!({
                "email": "alice@example.com",
                "password": "wrong-password",
            }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert!(response.headers().contains_key(header::WWW_AUTHENTICATE));
}

#[tokio::test]
async fn test_profile_mine_requires_bearer() {
    let app = test_app().await;
    let json = sign_up(&app, "alice@example.com").await;
    let access = json["data"]["tokens"]["accessToken"].as_str().unwrap();

    let response = app
        .clone()
        .oneshot(get_request("/profile/mine"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let response = app
        .oneshot(
            Request::builder()
                .uri("/profile/mine")
                .header(header::AUTHORIZATION, format!("Bearer {access}"))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["email"], "alice@example.com");
}

#[tokio::test]
async fn test_public_profile_statuses() {
    let app = test_app().await;
    let json = sign_up(&app, "alice@example.com").await;
    let id = json["data"]["user"]["id"].as_str().unwrap();

    let response = app
        .clone()
        .oneshot(get_request(&format!("/profile/id/{id}")))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["name"], "Alice");
    // Public projection has no email.
    assert!(json["data"].get("email").is_none());

    let response = app
        .clone()
        .oneshot(get_request("/profile/id/not-a-uuid"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = app
        .oneshot(get_request(&format!(
            "/profile/id/{}",
            uuid::Uuid::new_v4()
        )))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_refresh_and_replay_over_http() {
    let app = test_app().await;
    let json = sign_up(&app, "alice@example.com").await;
    let access = json["data"]["tokens"]["accessToken"].as_str().unwrap().to_string();
    let refresh = json["data"]["tokens"]["refreshToken"].as_str().unwrap().to_string();

    let refresh_request = |access: &str, refresh: &str| {
        Request::builder()
            .method("POST")
            .uri("/token/refresh")
            .header(header::AUTHORIZATION, format!("Bearer {access}"))
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(
                serde_json::json!({ "refreshToken": refresh }).to_string(),
            ))
            .unwrap()
    };

    let response = app
        .clone()
        .oneshot(refresh_request(&access, &refresh))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    let new_refresh = json["data"]["refreshToken"].as_str().unwrap();
    assert_ne!(new_refresh, refresh);

    // Replaying the consumed refresh token fails and revokes the session.
    let response = app
        .clone()
        .oneshot(refresh_request(&access, &refresh))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let response = app
        .oneshot(refresh_request(&access, new_refresh))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_sign_out_then_reuse_token() {
    let app = test_app().await;
    let json = sign_up(&app, "alice@example.com").await;
    let access = json["data"]["tokens"]["accessToken"].as_str().unwrap().to_string();

    let sign_out = Request::builder()
        .method("DELETE")
        .uri("/signout")
        .header(header::AUTHORIZATION, format!("Bearer {access}"))
        .body(Body::empty())
        .unwrap();
    let response = app.clone().oneshot(sign_out).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["message"], "signout success");

    let response = app
        .oneshot(
            Request::builder()
                .uri("/profile/mine")
                .header(header::AUTHORIZATION, format!("Bearer {access}"))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_verify_api_key() {
    let app = test_app().await;

    let response = app
        .clone()
        .oneshot(get_request("/verify/apikey"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let with_key = |key: &str| {
        Request::builder()
            .uri("/verify/apikey")
            .header("x-api-key", key)
            .body(Body::empty())
            .unwrap()
    };

    let response = app.clone().oneshot(with_key("wrong-key")).await.unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let response = app.oneshot(with_key("svc-blog-key")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}
