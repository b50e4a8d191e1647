use std::sync::Arc;

use client_core::ApiError;
use reqwest::Method;
use validator::Validate;

use crate::auth::jwt;
use crate::auth::store::TokenStore;
use crate::gateway::{Payload, RequestGateway, RequestOptions};
use crate::models::auth::{LoginRequest, RegisterRequest, TokenPair};
use crate::models::user::CurrentUser;

/// Login, registration and session introspection.
pub struct AuthService {
    gateway: Arc<RequestGateway>,
    store: Arc<dyn TokenStore>,
}

impl AuthService {
    pub fn new(gateway: Arc<RequestGateway>, store: Arc<dyn TokenStore>) -> Self {
        Self { gateway, store }
    }

    /// Authenticate and persist the returned token pair.
    pub async fn login(&self, email: &str, password: &str) -> Result<TokenPair, ApiError> {
        let request = LoginRequest {
            email: email.to_string(),
            password: password.to_string(),
        };
        request.validate()?;

        let pair: TokenPair = self
            .gateway
            .send(
                Method::POST,
                "/auth/login",
                Payload::json(&request)?,
                RequestOptions::public(),
            )
            .await?;

        self.store
            .set_pair(pair.access.clone(), pair.refresh.clone());

        if let Ok(claims) = jwt::decode_claims(&pair.access) {
            tracing::info!(user_id = ?claims.user_id, "user logged in");
        }

        Ok(pair)
    }

    pub async fn register(
        &self,
        username: &str,
        email: &str,
        password: &str,
    ) -> Result<(), ApiError> {
        let request = RegisterRequest {
            username: username.to_string(),
            email: email.to_string(),
            password: password.to_string(),
        };
        request.validate()?;

        self.gateway
            .call(
                Method::POST,
                "/auth/register",
                Payload::json(&request)?,
                RequestOptions::public(),
            )
            .await?;

        Ok(())
    }

    /// Fetch the authenticated user with profile, display fields cleaned.
    pub async fn current_user(&self) -> Result<CurrentUser, ApiError> {
        let current: CurrentUser = self.gateway.get("/auth/me").await?;
        Ok(current.sanitized())
    }

    /// Explicit user-initiated logout: drop both tokens. This is the only
    /// sanctioned token mutation outside the gateway and the refresh
    /// coordinator, and it publishes no logout signal — the user asked for
    /// this one.
    pub fn logout(&self) {
        self.store.clear();
        tracing::info!("user logged out");
    }
}
