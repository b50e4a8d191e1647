use tokio::sync::broadcast;

/// Why a logout signal was published.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogoutReason {
    /// The refresh endpoint rejected the refresh token or was unreachable.
    RefreshFailed,
    /// The backend answered 401 on an authenticated call.
    TokenExpired,
    /// A session check (e.g. `current_user` on startup) found the session
    /// dead. Published by embedders, not by the SDK itself.
    TokenExpiredOnCheck,
}

impl LogoutReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogoutReason::RefreshFailed => "refresh_failed",
            LogoutReason::TokenExpired => "token_expired",
            LogoutReason::TokenExpiredOnCheck => "token_expired_on_check",
        }
    }
}

#[derive(Debug, Clone)]
pub struct LogoutEvent {
    pub reason: LogoutReason,
}

/// Broadcast channel for forced-logout notifications.
///
/// Owned by the composition root and handed to the gateway and the refresh
/// coordinator as the only publishers. Fire-and-forget: publishing with zero
/// subscribers is a silent no-op, and subscribers attach and detach
/// independently.
pub struct AuthEvents {
    tx: broadcast::Sender<LogoutEvent>,
}

impl AuthEvents {
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(16);
        Self { tx }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<LogoutEvent> {
        self.tx.subscribe()
    }

    pub fn publish(&self, reason: LogoutReason) {
        tracing::info!(reason = reason.as_str(), "logout signal published");
        let _ = self.tx.send(LogoutEvent { reason });
    }
}

impl Default for AuthEvents {
    fn default() -> Self {
        Self::new()
    }
}
