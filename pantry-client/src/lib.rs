//! pantry-client: typed client SDK for the Pantry recipe/kitchen-inventory
//! backend.
//!
//! Owns the authentication-token lifecycle (persistence, client-side expiry
//! evaluation, single-flight refresh), funnels all HTTP traffic through one
//! gateway with typed error mapping, and sanitizes display-bound content.

pub mod auth;
pub mod config;
pub mod gateway;
pub mod models;
pub mod sanitize;
pub mod services;

use std::sync::Arc;
use std::time::Duration;

use auth::{
    AuthEvents, FileTokenStore, LogoutEvent, MemoryTokenStore, RefreshCoordinator, TokenStore,
};
use config::Settings;
use gateway::RequestGateway;

pub use client_core::{ApiError, ErrorBody};
pub use config::get_configuration;

/// Composition root wiring token store, refresh coordinator, gateway and the
/// endpoint services. Holds the logout broadcast so embedders can react to
/// forced logouts (e.g. redirect to a login screen).
pub struct PantryClient {
    pub auth: services::AuthService,
    pub users: services::UserService,
    pub inventory: services::InventoryService,
    pub recipes: services::RecipeService,
    gateway: Arc<RequestGateway>,
    events: Arc<AuthEvents>,
}

impl PantryClient {
    /// Build a client from settings, choosing the durable file store when a
    /// token file is configured.
    pub fn new(settings: &Settings) -> Result<Self, ApiError> {
        let store: Arc<dyn TokenStore> = match &settings.storage.token_file {
            Some(path) => Arc::new(FileTokenStore::new(path.clone())),
            None => Arc::new(MemoryTokenStore::new()),
        };
        Self::with_store(settings, store)
    }

    /// Build a client over a caller-provided token store.
    pub fn with_store(settings: &Settings, store: Arc<dyn TokenStore>) -> Result<Self, ApiError> {
        let events = Arc::new(AuthEvents::new());

        let refresh_http = reqwest::Client::builder()
            .timeout(Duration::from_secs(settings.api.timeout_secs))
            .build()?;
        let refresh = Arc::new(RefreshCoordinator::new(
            refresh_http,
            settings.api.base_url.trim_end_matches('/'),
            store.clone(),
            events.clone(),
        ));

        let gateway = Arc::new(RequestGateway::new(
            &settings.api,
            store.clone(),
            refresh,
            events.clone(),
        )?);

        Ok(Self {
            auth: services::AuthService::new(gateway.clone(), store.clone()),
            users: services::UserService::new(gateway.clone()),
            inventory: services::InventoryService::new(gateway.clone()),
            recipes: services::RecipeService::new(gateway.clone()),
            gateway,
            events,
        })
    }

    /// Subscribe to forced-logout notifications. Fire-and-forget semantics:
    /// events published while no receiver exists are lost, not queued.
    pub fn subscribe_logout(&self) -> tokio::sync::broadcast::Receiver<LogoutEvent> {
        self.events.subscribe()
    }

    /// Direct access to the gateway for endpoints the typed services do not
    /// cover yet.
    pub fn gateway(&self) -> Arc<RequestGateway> {
        self.gateway.clone()
    }
}
