use std::sync::Arc;
use std::time::Duration;

use client_core::{ApiError, ErrorBody};
use reqwest::header::{HeaderMap, ACCEPT};
use reqwest::{Method, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::auth::events::{AuthEvents, LogoutReason};
use crate::auth::jwt;
use crate::auth::refresh::RefreshCoordinator;
use crate::auth::store::{TokenKind, TokenStore};
use crate::config::ApiSettings;

/// Parsed body of a successful response.
#[derive(Debug)]
pub enum ApiBody {
    /// HTTP 204; the body was never read.
    NoContent,
    Json(serde_json::Value),
    /// 2xx body that was not JSON, passed through rather than rejected.
    Text(String),
}

impl ApiBody {
    pub fn into_json(self) -> Option<serde_json::Value> {
        match self {
            ApiBody::Json(value) => Some(value),
            _ => None,
        }
    }
}

/// Request payload variants accepted by [`RequestGateway::call`].
pub enum Payload {
    Empty,
    Json(serde_json::Value),
    Multipart(reqwest::multipart::Form),
}

impl Payload {
    /// Serialize a request DTO into a JSON payload.
    pub fn json<T: Serialize>(body: &T) -> Result<Self, ApiError> {
        Ok(Payload::Json(serde_json::to_value(body)?))
    }
}

#[derive(Default)]
pub struct RequestOptions {
    /// When false, the call goes out without a bearer header and skips every
    /// token check. Defaults to authenticated.
    pub public: bool,
    pub headers: Option<HeaderMap>,
}

impl RequestOptions {
    pub fn authenticated() -> Self {
        Self::default()
    }

    pub fn public() -> Self {
        Self {
            public: true,
            headers: None,
        }
    }

    fn needs_auth(&self) -> bool {
        !self.public
    }
}

/// The single funnel for all backend HTTP traffic.
///
/// Attaches bearer auth after evaluating token expiry locally, coordinates
/// with the single-flight refresh, and maps every non-success response into
/// [`ApiError`]. Together with the refresh coordinator this is the only code
/// allowed to clear tokens or publish a logout signal; services go through
/// here and never touch the store.
pub struct RequestGateway {
    http: reqwest::Client,
    base_url: String,
    store: Arc<dyn TokenStore>,
    refresh: Arc<RefreshCoordinator>,
    events: Arc<AuthEvents>,
    refresh_horizon_secs: i64,
}

impl RequestGateway {
    pub fn new(
        settings: &ApiSettings,
        store: Arc<dyn TokenStore>,
        refresh: Arc<RefreshCoordinator>,
        events: Arc<AuthEvents>,
    ) -> Result<Self, ApiError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(settings.timeout_secs))
            .build()?;

        Ok(Self {
            http,
            base_url: settings.base_url.trim_end_matches('/').to_string(),
            store,
            refresh,
            events,
            refresh_horizon_secs: settings.refresh_horizon_secs,
        })
    }

    /// Resolve the bearer token for an authenticated call.
    ///
    /// Missing token fails immediately with a 401-class error and no network
    /// I/O. An expired token blocks on the refresh; a token merely close to
    /// expiry refreshes proactively but degrades to the still-valid current
    /// token when the refresh yields nothing.
    async fn bearer_token(&self) -> Result<String, ApiError> {
        let Some(current) = self.store.get(TokenKind::Access) else {
            return Err(ApiError::AuthenticationRequired);
        };

        if jwt::is_expired(&current) {
            let had_refresh_token = self.store.get(TokenKind::Refresh).is_some();
            match self.refresh.refresh().await {
                Some(fresh) => Ok(fresh),
                None if had_refresh_token => Err(ApiError::RefreshFailed),
                None => Err(ApiError::AuthenticationRequired),
            }
        } else if jwt::expires_within(&current, self.refresh_horizon_secs) {
            match self.refresh.refresh().await {
                Some(fresh) => Ok(fresh),
                None => Ok(current),
            }
        } else {
            Ok(current)
        }
    }

    pub async fn call(
        &self,
        method: Method,
        path: &str,
        payload: Payload,
        options: RequestOptions,
    ) -> Result<ApiBody, ApiError> {
        let needs_auth = options.needs_auth();
        let token = if needs_auth {
            Some(self.bearer_token().await?)
        } else {
            None
        };

        let url = format!("{}{}", self.base_url, path);
        let mut request = self
            .http
            .request(method.clone(), &url)
            .header(ACCEPT, "application/json");

        if let Some(headers) = options.headers {
            request = request.headers(headers);
        }
        if let Some(token) = &token {
            request = request.bearer_auth(token);
        }

        request = match payload {
            Payload::Empty => request,
            Payload::Json(value) => request.json(&value),
            Payload::Multipart(form) => request.multipart(form),
        };

        let response = request.send().await?;
        let status = response.status();

        if status == StatusCode::NO_CONTENT {
            return Ok(ApiBody::NoContent);
        }

        let text = response.text().await?;

        if status.is_success() {
            return Ok(match serde_json::from_str::<serde_json::Value>(&text) {
                Ok(value) => ApiBody::Json(value),
                // Non-JSON success bodies are degraded, never errors.
                Err(_) => ApiBody::Text(text),
            });
        }

        tracing::warn!(
            method = %method,
            path = path,
            status = status.as_u16(),
            "request failed"
        );

        Err(self.map_error(status, &text, needs_auth))
    }

    fn map_error(&self, status: StatusCode, text: &str, needs_auth: bool) -> ApiError {
        let body = ErrorBody::parse(text);
        let message = body
            .as_ref()
            .map(|b| b.error.clone())
            .unwrap_or_else(|| {
                status
                    .canonical_reason()
                    .unwrap_or("request failed")
                    .to_string()
            });

        if status == StatusCode::UNAUTHORIZED && needs_auth {
            // The backend no longer honors this session; force logout.
            self.store.clear();
            self.events.publish(LogoutReason::TokenExpired);
            return ApiError::TokenExpired { message };
        }

        match body {
            Some(body) if body.details.is_some() && matches!(status.as_u16(), 400 | 422) => {
                ApiError::Validation {
                    status: status.as_u16(),
                    message,
                    details: body.field_errors(),
                }
            }
            Some(body) => ApiError::Http {
                status: status.as_u16(),
                code: body.code,
                message,
            },
            None => ApiError::Http {
                status: status.as_u16(),
                code: None,
                message,
            },
        }
    }

    /// Issue a call and deserialize the JSON body into `T`. A 204 response
    /// deserializes from JSON `null`, which lets `T = Option<_>` express
    /// optional bodies.
    pub async fn send<T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        payload: Payload,
        options: RequestOptions,
    ) -> Result<T, ApiError> {
        match self.call(method, path, payload, options).await? {
            ApiBody::Json(value) => Ok(serde_json::from_value(value)?),
            ApiBody::NoContent => Ok(serde_json::from_value(serde_json::Value::Null)?),
            ApiBody::Text(raw) => Ok(serde_json::from_str(&raw)?),
        }
    }

    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        self.send(Method::GET, path, Payload::Empty, RequestOptions::authenticated())
            .await
    }

    pub async fn post<T: DeserializeOwned>(
        &self,
        path: &str,
        body: &impl Serialize,
    ) -> Result<T, ApiError> {
        self.send(
            Method::POST,
            path,
            Payload::json(body)?,
            RequestOptions::authenticated(),
        )
        .await
    }

    pub async fn put<T: DeserializeOwned>(
        &self,
        path: &str,
        body: &impl Serialize,
    ) -> Result<T, ApiError> {
        self.send(
            Method::PUT,
            path,
            Payload::json(body)?,
            RequestOptions::authenticated(),
        )
        .await
    }

    pub async fn patch<T: DeserializeOwned>(
        &self,
        path: &str,
        body: &impl Serialize,
    ) -> Result<T, ApiError> {
        self.send(
            Method::PATCH,
            path,
            Payload::json(body)?,
            RequestOptions::authenticated(),
        )
        .await
    }

    /// DELETE expecting 204.
    pub async fn delete(&self, path: &str) -> Result<(), ApiError> {
        self.call(
            Method::DELETE,
            path,
            Payload::Empty,
            RequestOptions::authenticated(),
        )
        .await?;
        Ok(())
    }
}
