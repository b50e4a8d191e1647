use std::sync::Arc;

use anyhow::Result;
use serde::{Deserialize, Serialize};
use tokio::sync::{broadcast, Mutex};

use super::events::{AuthEvents, LogoutReason};
use super::store::{TokenKind, TokenStore};

#[derive(Serialize)]
struct RefreshRequest<'a> {
    refresh: &'a str,
}

#[derive(Deserialize)]
struct RefreshResponse {
    access: String,
}

/// Single-flight refresh of the access token.
///
/// Many near-simultaneous expiring-token detections must produce at most one
/// network call to the refresh endpoint. The first caller becomes the leader
/// and issues the call; everyone else subscribes to the in-flight outcome.
/// All callers of one cycle observe the same result.
///
/// Owns its own HTTP client: the refresh call must not route back through the
/// gateway, whose pre-flight would recurse into this coordinator.
pub struct RefreshCoordinator {
    inner: Arc<Inner>,
}

struct Inner {
    http: reqwest::Client,
    refresh_url: String,
    store: Arc<dyn TokenStore>,
    events: Arc<AuthEvents>,
    inflight: Mutex<Option<broadcast::Sender<Option<String>>>>,
}

impl RefreshCoordinator {
    pub fn new(
        http: reqwest::Client,
        base_url: &str,
        store: Arc<dyn TokenStore>,
        events: Arc<AuthEvents>,
    ) -> Self {
        Self {
            inner: Arc::new(Inner {
                http,
                refresh_url: format!("{}/auth/refresh", base_url),
                store,
                events,
                inflight: Mutex::new(None),
            }),
        }
    }

    /// Obtain a fresh access token, joining the in-flight refresh if one is
    /// already running. Resolves to `None` when no refresh token is stored or
    /// the refresh failed; failure clears both tokens and publishes a single
    /// `refresh_failed` logout signal. No retry — failure is terminal for the
    /// cycle, and the caller decides what to do with `None`.
    pub async fn refresh(&self) -> Option<String> {
        let mut inflight = self.inner.inflight.lock().await;

        if let Some(tx) = inflight.as_ref() {
            let mut rx = tx.subscribe();
            drop(inflight);
            return rx.recv().await.unwrap_or(None);
        }

        let (tx, mut rx) = broadcast::channel(1);
        *inflight = Some(tx.clone());
        drop(inflight);

        // Run the cycle on its own task so a cancelled caller cannot strand
        // the waiters mid-flight.
        let inner = Arc::clone(&self.inner);
        tokio::spawn(async move {
            let outcome = inner.execute().await;
            // Leave the refreshing state before waking waiters, so a caller
            // arriving late starts a new cycle instead of joining a settled
            // one.
            inner.inflight.lock().await.take();
            let _ = tx.send(outcome);
        });

        rx.recv().await.unwrap_or(None)
    }
}

impl Inner {
    async fn execute(&self) -> Option<String> {
        let Some(refresh_token) = self.store.get(TokenKind::Refresh) else {
            tracing::debug!("no refresh token stored, skipping refresh call");
            return None;
        };

        match self.post_refresh(&refresh_token).await {
            Ok(access) => {
                self.store.set(TokenKind::Access, access.clone());
                tracing::debug!("access token refreshed");
                Some(access)
            }
            Err(e) => {
                tracing::warn!(error = %e, "token refresh failed");
                self.store.clear();
                self.events.publish(LogoutReason::RefreshFailed);
                None
            }
        }
    }

    async fn post_refresh(&self, refresh_token: &str) -> Result<String> {
        let response = self
            .http
            .post(&self.refresh_url)
            .json(&RefreshRequest {
                refresh: refresh_token,
            })
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            let message = client_core::ErrorBody::parse(&body)
                .map(|b| b.error)
                .unwrap_or_else(|| {
                    status
                        .canonical_reason()
                        .unwrap_or("refresh rejected")
                        .to_string()
                });
            return Err(anyhow::anyhow!(
                "refresh endpoint returned {}: {}",
                status,
                message
            ));
        }

        let parsed: RefreshResponse = serde_json::from_str(&body)?;
        Ok(parsed.access)
    }
}
