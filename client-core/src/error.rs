use std::collections::HashMap;

use serde::Deserialize;
use thiserror::Error;

/// Error surfaced to SDK consumers for every failed API operation.
///
/// Constructed at the gateway boundary and never mutated afterwards; callers
/// never see raw transport errors unmapped.
#[derive(Debug, Error)]
pub enum ApiError {
    /// A protected call was attempted with no usable token. Raised before any
    /// network I/O.
    #[error("Authentication required")]
    AuthenticationRequired,

    /// The backend rejected an authenticated call with 401.
    #[error("Session expired: {message}")]
    TokenExpired { message: String },

    /// The refresh endpoint failed. Terminal for that refresh cycle.
    #[error("Token refresh failed")]
    RefreshFailed,

    /// Request payload rejected, locally or by the backend, with per-field
    /// messages suitable for form display.
    #[error("Validation error: {message}")]
    Validation {
        status: u16,
        message: String,
        details: HashMap<String, Vec<String>>,
    },

    /// Any other non-success HTTP response.
    #[error("Request failed ({status}): {message}")]
    Http {
        status: u16,
        code: Option<String>,
        message: String,
    },

    /// Transport-level failure: no HTTP response was received.
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// A success body did not match the expected response shape. Only raised
    /// by typed accessors; the raw gateway degrades non-JSON success bodies
    /// to text instead.
    #[error("Malformed response: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Config(anyhow::Error),
}

impl ApiError {
    /// HTTP status associated with this error, if any. Transport and
    /// configuration failures carry none.
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::AuthenticationRequired => Some(401),
            ApiError::TokenExpired { .. } => Some(401),
            ApiError::RefreshFailed => Some(401),
            ApiError::Validation { status, .. } => Some(*status),
            ApiError::Http { status, .. } => Some(*status),
            ApiError::Network(_) | ApiError::Decode(_) | ApiError::Config(_) => None,
        }
    }

    /// Machine-readable error code reported by the backend, if any.
    pub fn code(&self) -> Option<&str> {
        match self {
            ApiError::Http { code, .. } => code.as_deref(),
            _ => None,
        }
    }

    /// Per-field validation messages, if this is a validation failure.
    pub fn field_errors(&self) -> Option<&HashMap<String, Vec<String>>> {
        match self {
            ApiError::Validation { details, .. } => Some(details),
            _ => None,
        }
    }

    /// True for failures that should send the user back through login.
    pub fn is_auth_error(&self) -> bool {
        matches!(
            self,
            ApiError::AuthenticationRequired
                | ApiError::TokenExpired { .. }
                | ApiError::RefreshFailed
        )
    }
}

impl From<config::ConfigError> for ApiError {
    fn from(err: config::ConfigError) -> Self {
        ApiError::Config(anyhow::Error::new(err))
    }
}

impl From<validator::ValidationErrors> for ApiError {
    fn from(errors: validator::ValidationErrors) -> Self {
        let details: HashMap<String, Vec<String>> = errors
            .field_errors()
            .iter()
            .map(|(field, errs)| {
                let messages = errs
                    .iter()
                    .map(|e| {
                        e.message
                            .as_ref()
                            .map(|m| m.to_string())
                            .unwrap_or_else(|| e.code.to_string())
                    })
                    .collect();
                (field.to_string(), messages)
            })
            .collect();

        ApiError::Validation {
            status: 400,
            message: "Validation error".to_string(),
            details,
        }
    }
}

/// Structured error body returned by the backend:
/// `{error, code?, details?: {field: string | string[]}}`.
#[derive(Debug, Deserialize)]
pub struct ErrorBody {
    pub error: String,
    #[serde(default)]
    pub code: Option<String>,
    #[serde(default)]
    pub details: Option<HashMap<String, FieldMessages>>,
}

impl ErrorBody {
    /// Parse an error body, returning `None` when the payload is not the
    /// documented JSON shape (callers fall back to the HTTP status text).
    pub fn parse(text: &str) -> Option<Self> {
        serde_json::from_str(text).ok()
    }

    pub fn field_errors(&self) -> HashMap<String, Vec<String>> {
        self.details
            .as_ref()
            .map(|details| {
                details
                    .iter()
                    .map(|(field, msgs)| (field.clone(), msgs.clone().into_vec()))
                    .collect()
            })
            .unwrap_or_default()
    }
}

/// A field detail value is either a single message or a list of messages.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum FieldMessages {
    One(String),
    Many(Vec<String>),
}

impl FieldMessages {
    pub fn into_vec(self) -> Vec<String> {
        match self {
            FieldMessages::One(msg) => vec![msg],
            FieldMessages::Many(msgs) => msgs,
        }
    }
}
