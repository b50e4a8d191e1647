//! Test helpers for pantry-client integration tests.
//!
//! Spins up a wiremock server and wires a client against it with an
//! in-memory token store the tests can inspect.

#![allow(dead_code)]

use std::sync::Arc;

use base64::{engine::general_purpose, Engine as _};
use chrono::Utc;
use pantry_client::auth::{MemoryTokenStore, TokenStore};
use pantry_client::config::{ApiSettings, Settings, StorageSettings};
use pantry_client::PantryClient;
use wiremock::MockServer;

/// Unsigned JWT with the given `exp`; the client never verifies signatures.
pub fn make_jwt(exp: i64) -> String {
    let header = general_purpose::URL_SAFE_NO_PAD.encode(r#"{"alg":"HS256","typ":"JWT"}"#);
    let payload = general_purpose::URL_SAFE_NO_PAD
        .encode(format!(r#"{{"exp":{},"user_id":"user_123"}}"#, exp));
    format!("{}.{}.signature", header, payload)
}

pub fn valid_jwt() -> String {
    make_jwt(Utc::now().timestamp() + 3600)
}

pub fn expired_jwt() -> String {
    make_jwt(Utc::now().timestamp() - 60)
}

/// Still valid, but inside the default 300 s proactive-refresh horizon.
pub fn expiring_soon_jwt() -> String {
    make_jwt(Utc::now().timestamp() + 60)
}

pub struct TestApp {
    pub server: MockServer,
    pub client: PantryClient,
    pub store: Arc<MemoryTokenStore>,
}

impl TestApp {
    pub async fn spawn() -> Self {
        let server = MockServer::start().await;
        let settings = Settings {
            api: ApiSettings {
                base_url: server.uri(),
                timeout_secs: 5,
                refresh_horizon_secs: 300,
            },
            storage: StorageSettings::default(),
        };

        let store = Arc::new(MemoryTokenStore::new());
        let client =
            PantryClient::with_store(&settings, store.clone()).expect("failed to build client");

        Self {
            server,
            client,
            store,
        }
    }

    /// Seed the store as if a login had happened.
    pub fn seed_tokens(&self, access: &str, refresh: &str) {
        self.store.set_pair(access.to_string(), refresh.to_string());
    }
}
