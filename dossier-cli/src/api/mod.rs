use anyhow::{Context, Result};
use reqwest::{Client, Method, Response, StatusCode};
use serde::Serialize;
use std::time::Duration;

use crate::config::Config;

mod auth;
mod dossiers;
mod error;
mod session;

pub use auth::{Account, Credentials, RefreshResponse, TokenPair};
pub use dossiers::dossier_path;
pub use error::ApiError;
pub use session::Session;

/// A request that can be sent again unchanged
#[derive(Debug, Clone)]
pub struct ApiRequest {
    pub method: Method,
    pub path: String,
    pub body: Option<serde_json::Value>,
}

impl ApiRequest {
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            body: None,
        }
    }

    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::GET, path)
    }

    pub fn delete(path: impl Into<String>) -> Self {
        Self::new(Method::DELETE, path)
    }

    pub fn post<T: Serialize>(path: impl Into<String>, body: &T) -> Result<Self> {
        let body = serde_json::to_value(body).context("Failed to serialize request body")?;
        Ok(Self {
            body: Some(body),
            ..Self::new(Method::POST, path)
        })
    }
}

/// API client for the dossier backend
pub struct ApiClient {
    client: Client,
    base_url: String,
    session: Session,
}

impl ApiClient {
    /// Create a new API client using `session` for its tokens
    pub fn new(config: &Config, session: Session) -> Result<Self> {
        let timeout = Duration::from_secs(config.api.timeout_seconds);

        let client = Client::builder()
            .timeout(timeout)
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            client,
            base_url: config.base_url().to_string(),
            session,
        })
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn dispatch(&self, request: &ApiRequest, bearer: Option<&str>) -> Result<Response> {
        let url = format!("{}{}", self.base_url, request.path);

        let mut builder = self.client.request(request.method.clone(), &url);
        if let Some(token) = bearer {
            builder = builder.bearer_auth(token);
        }
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        tracing::debug!("{} {}", request.method, url);

        builder
            .send()
            .await
            .map_err(|e| ApiError::NetworkError(e.to_string()).into())
    }

    /// Turn non-2xx responses into an `ApiError`
    async fn check_status(response: Response) -> Result<Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        Err(ApiError::from_body(status, &body).into())
    }

    /// Send a request carrying the stored access token.
    ///
    /// On a 401, unless `retried` is already set, the token is refreshed once
    /// and the same request is sent again with the new token. A 401 on that
    /// second attempt, or a refresh that yields nothing, is returned as an error.
    pub async fn send_with_auth(&self, request: &ApiRequest, retried: bool) -> Result<Response> {
        let mut retried = retried;

        loop {
            let token = self.session.access_token();
            let response = self.dispatch(request, token.as_deref()).await?;

            if response.status() == StatusCode::UNAUTHORIZED && !retried {
                retried = true;
                tracing::debug!("Received 401, attempting token refresh");

                if self.refresh_token().await.is_some() {
                    continue;
                }

                tracing::debug!("Token refresh yielded nothing, giving up");
            }

            return Self::check_status(response).await;
        }
    }

    /// Send a request to a public endpoint: no bearer token, no refresh
    pub(crate) async fn send_public(&self, request: &ApiRequest) -> Result<Response> {
        let response = self.dispatch(request, None).await?;
        Self::check_status(response).await
    }
}
