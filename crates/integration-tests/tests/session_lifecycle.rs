//! Integration tests for sign-in state across process lifetimes.
//!
//! Session data lives in ephemeral storage: it is restored without any
//! network call while the store lives and gone once it does. The cart, in
//! durable storage, is unaffected by either.

#![allow(clippy::unwrap_used)]

use std::sync::Arc;

use secrecy::SecretString;
use serde_json::json;

use cloud_kitchen_client::session::{
    Identity, PresetIdentityProvider, ProviderIdentity, SessionError,
};
use cloud_kitchen_client::state::AppState;
use cloud_kitchen_client::storage::{FileStore, KeyValueStore, MemoryStore, keys};
use cloud_kitchen_core::Email;
use cloud_kitchen_integration_tests::{FakeBackend, Route, test_config};

fn auth_reply(id: &str, email: &str) -> serde_json::Value {
    json!({
        "success": true,
        "token": format!("jwt-{id}"),
        "user": {"_id": id, "email": email}
    })
}

#[tokio::test]
async fn test_session_restores_without_network() {
    let backend = FakeBackend::start(vec![Route::ok(
        "POST",
        "/api/auth/login",
        auth_reply("u1", "asha@example.com"),
    )])
    .await
    .unwrap();
    let dir = tempfile::tempdir().unwrap();
    let config = test_config(backend.base_url().unwrap(), dir.path());
    let ephemeral: Arc<dyn KeyValueStore> = Arc::new(MemoryStore::new());

    let first = AppState::new(
        config.clone(),
        Arc::new(MemoryStore::new()),
        Arc::clone(&ephemeral),
    )
    .unwrap();
    first
        .session()
        .lock()
        .await
        .login_with_backend("asha@example.com", SecretString::from("pw"))
        .await
        .unwrap();
    assert_eq!(backend.requests().len(), 1);

    let second = AppState::new(config, Arc::new(MemoryStore::new()), ephemeral).unwrap();
    let session = second.session().lock().await;
    let profile = session.identity().customer().unwrap();
    assert_eq!(profile.uid.as_str(), "u1");
    assert_eq!(profile.greeting_name(), "asha");
    assert_eq!(backend.requests().len(), 1);
}

#[tokio::test]
async fn test_new_process_is_anonymous_but_keeps_cart() {
    let backend = FakeBackend::start(vec![Route::ok(
        "POST",
        "/api/auth/login",
        auth_reply("u1", "asha@example.com"),
    )])
    .await
    .unwrap();
    let dir = tempfile::tempdir().unwrap();
    let config = test_config(backend.base_url().unwrap(), dir.path());
    let dish = serde_json::from_value(json!({"_id": "d1", "name": "Dal Makhani", "price": 180}))
        .unwrap();

    {
        let state = AppState::open(config.clone()).unwrap();
        state
            .session()
            .lock()
            .await
            .login_with_backend("asha@example.com", SecretString::from("pw"))
            .await
            .unwrap();
        state.cart().lock().await.add_to_cart(&dish);
        state.session().lock().await.logout();
        assert_eq!(state.cart().lock().await.cart_count(), 1);
    }

    let state = AppState::open(config).unwrap();
    assert!(state.session().lock().await.identity().is_anonymous());
    assert_eq!(state.cart().lock().await.cart_count(), 1);
}

#[tokio::test]
async fn test_corrupt_customer_session_is_discarded() {
    let dir = tempfile::tempdir().unwrap();
    let config = test_config(url::Url::parse("http://127.0.0.1:9").unwrap(), dir.path());
    let ephemeral = Arc::new(MemoryStore::new());
    ephemeral.set(keys::USER_TOKEN, "jwt-u1").unwrap();
    ephemeral.set(keys::USER_DATA, "{ truncated").unwrap();

    let state = AppState::new(
        config,
        Arc::new(MemoryStore::new()),
        Arc::clone(&ephemeral) as Arc<dyn KeyValueStore>,
    )
    .unwrap();

    assert!(state.session().lock().await.identity().is_anonymous());
    assert!(ephemeral.is_empty());
}

#[tokio::test]
async fn test_google_sign_in_uses_backend_user_id() {
    let backend = FakeBackend::start(vec![Route::ok(
        "POST",
        "/api/auth/google",
        auth_reply("66f1aa00", "asha@gmail.com"),
    )])
    .await
    .unwrap();
    let dir = tempfile::tempdir().unwrap();
    let state = AppState::new(
        test_config(backend.base_url().unwrap(), dir.path()),
        Arc::new(MemoryStore::new()),
        Arc::new(MemoryStore::new()),
    )
    .unwrap();

    let provider = PresetIdentityProvider::signed_in(ProviderIdentity {
        email: Email::parse("asha@gmail.com").unwrap(),
        display_name: "Asha Rao".to_string(),
        uid: "google-123".to_string(),
        photo_url: Some("https://example.com/asha.png".to_string()),
        id_token: None,
    });
    let mut session = state.session().lock().await;
    session.login_with_google(&provider).await.unwrap();

    let Identity::Customer(customer) = session.identity() else {
        panic!("expected a customer session");
    };
    assert_eq!(customer.profile.uid.as_str(), "66f1aa00");
    assert_eq!(customer.profile.display_name, "Asha Rao");

    let request = backend.last_request_to("/api/auth/google").unwrap();
    let body = request.json();
    assert_eq!(body["uid"], "google-123");
    assert_eq!(body["displayName"], "Asha Rao");
    assert_eq!(body["photoURL"], "https://example.com/asha.png");
}

#[tokio::test]
async fn test_dismissed_google_sign_in_sends_nothing() {
    let backend = FakeBackend::start(Vec::new()).await.unwrap();
    let dir = tempfile::tempdir().unwrap();
    let state = AppState::new(
        test_config(backend.base_url().unwrap(), dir.path()),
        Arc::new(MemoryStore::new()),
        Arc::new(MemoryStore::new()),
    )
    .unwrap();

    let err = state
        .session()
        .lock()
        .await
        .login_with_google(&PresetIdentityProvider::dismissed())
        .await
        .unwrap_err();
    assert!(matches!(err, SessionError::IdentityProvider(_)));
    assert!(backend.requests().is_empty());
}

#[tokio::test]
async fn test_admin_login_replaces_customer_and_survives_restore() {
    let backend = FakeBackend::start(vec![
        Route::ok(
            "POST",
            "/api/auth/register",
            auth_reply("u1", "asha@example.com"),
        ),
        Route::ok("POST", "/admin/login", json!({"success": true})),
    ])
    .await
    .unwrap();
    let dir = tempfile::tempdir().unwrap();
    let config = test_config(backend.base_url().unwrap(), dir.path());
    let ephemeral: Arc<dyn KeyValueStore> = Arc::new(MemoryStore::new());
    let durable: Arc<dyn KeyValueStore> =
        Arc::new(FileStore::open(config.durable_store_path()).unwrap());

    let state = AppState::new(config.clone(), Arc::clone(&durable), Arc::clone(&ephemeral)).unwrap();
    {
        let mut session = state.session().lock().await;
        session
            .signup_with_backend(
                "asha@example.com",
                SecretString::from("pw"),
                "Asha Rao",
                Some("9876543210".to_string()),
            )
            .await
            .unwrap();
        session
            .login_as_admin("chef@kitchen.in", SecretString::from("pw"))
            .await
            .unwrap();
    }

    let register = backend.last_request_to("/api/auth/register").unwrap();
    assert_eq!(register.json()["displayName"], "Asha Rao");
    assert_eq!(register.json()["phoneNumber"], "9876543210");

    assert_eq!(ephemeral.get(keys::USER_TOKEN).unwrap(), None);
    assert_eq!(
        ephemeral.get(keys::ADMIN_AUTH).unwrap().as_deref(),
        Some(keys::ADMIN_AUTH_SENTINEL)
    );
    // The reply carried no token; the cookie jar carries the admin session.
    assert_eq!(ephemeral.get(keys::ADMIN_TOKEN).unwrap(), None);

    let restored = AppState::new(config, durable, ephemeral).unwrap();
    let session = restored.session().lock().await;
    let admin = session.identity().admin().unwrap();
    assert_eq!(admin.email.as_str(), "chef@kitchen.in");
    assert!(admin.token.is_none());
}
