use anyhow::Result;
use base64::{engine::general_purpose, Engine as _};
use chrono::Utc;
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct Claims {
    pub exp: i64,
    #[serde(default, alias = "sub")]
    pub user_id: Option<String>,
}

/// Decode JWT claims without validation.
///
/// The signature is deliberately not verified: the decoded `exp` only drives
/// pre-emptive refresh scheduling. Authorization is decided server-side on
/// every request, never from these claims.
pub fn decode_claims(token: &str) -> Result<Claims> {
    let parts: Vec<&str> = token.split('.').collect();

    if parts.len() != 3 {
        return Err(anyhow::anyhow!("Invalid JWT format"));
    }

    let payload = general_purpose::URL_SAFE_NO_PAD
        .decode(parts[1])
        .map_err(|e| anyhow::anyhow!("Failed to decode JWT payload: {}", e))?;

    let claims: Claims = serde_json::from_slice(&payload)
        .map_err(|e| anyhow::anyhow!("Failed to parse JWT claims: {}", e))?;

    Ok(claims)
}

/// Whether the token's `exp` has passed. Malformed tokens count as expired —
/// a token we cannot read must never be presented as valid.
pub fn is_expired(token: &str) -> bool {
    match decode_claims(token) {
        Ok(claims) => claims.exp <= Utc::now().timestamp(),
        Err(_) => true,
    }
}

/// Whether the token expires within the next `horizon_secs` seconds. Same
/// failure mode as [`is_expired`].
pub fn expires_within(token: &str, horizon_secs: i64) -> bool {
    match decode_claims(token) {
        Ok(claims) => claims.exp <= Utc::now().timestamp() + horizon_secs,
        Err(_) => true,
    }
}
