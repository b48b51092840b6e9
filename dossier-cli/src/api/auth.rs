use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use super::{ApiClient, ApiError, ApiRequest};

const TOKEN_PATH: &str = "/api/token/";
const TOKEN_REFRESH_PATH: &str = "/api/token/refresh/";
const REGISTER_PATH: &str = "/api/register/";

/// Login and registration payload
#[derive(Debug, Serialize)]
pub struct Credentials<'a> {
    pub username: &'a str,
    pub password: &'a str,
}

/// Login response from API
#[derive(Debug, Clone, Deserialize)]
pub struct TokenPair {
    pub access: String,
    pub refresh: String,
}

/// Token refresh request
#[derive(Debug, Serialize)]
struct RefreshRequest<'a> {
    refresh: &'a str,
}

/// Token refresh response.
///
/// `refresh` is only present when the server rotates refresh tokens.
#[derive(Debug, Clone, Deserialize)]
pub struct RefreshResponse {
    pub access: String,
    #[serde(default)]
    pub refresh: Option<String>,
    #[serde(default)]
    pub username: Option<String>,
}

/// Account created by `register`
#[derive(Debug, Clone, Deserialize)]
pub struct Account {
    #[serde(default)]
    pub id: Option<serde_json::Value>,
    #[serde(default)]
    pub username: Option<String>,
}

impl ApiClient {
    /// Exchange credentials for a token pair and store it
    pub async fn login(&self, username: &str, password: &str) -> Result<TokenPair> {
        tracing::debug!("Logging in as {}", username);

        let request = ApiRequest::post(TOKEN_PATH, &Credentials { username, password })?;

        let response = self.send_public(&request).await.map_err(|e| -> anyhow::Error {
            match e.downcast::<ApiError>() {
                Ok(ApiError::Unauthorized(msg)) => ApiError::AuthenticationFailed(msg).into(),
                Ok(other) => other.into(),
                Err(e) => e,
            }
        })?;

        let tokens: TokenPair = response
            .json()
            .await
            .context("Failed to parse login response")?;

        self.session().set_tokens(&tokens.access, &tokens.refresh)?;

        tracing::info!("Successfully logged in as {}", username);
        Ok(tokens)
    }

    /// Create an account; the caller still has to log in afterwards
    pub async fn register(&self, username: &str, password: &str) -> Result<Account> {
        let request = ApiRequest::post(REGISTER_PATH, &Credentials { username, password })?;

        let result = async {
            let response = self.send_public(&request).await?;
            response
                .json::<Account>()
                .await
                .context("Failed to parse registration response")
        }
        .await;

        match result {
            Ok(account) => {
                tracing::info!("Registered account {}", username);
                Ok(account)
            }
            Err(e) => {
                tracing::error!("Registration failed for {}: {:#}", username, e);
                Err(e)
            }
        }
    }

    /// Trade the stored refresh token for a new access token.
    ///
    /// Returns `None` without touching the network when no refresh token is
    /// stored, and `None` after logging when the exchange fails.
    pub async fn refresh_token(&self) -> Option<RefreshResponse> {
        let refresh = self.session().refresh_token()?;

        tracing::debug!("Refreshing access token");

        match self.exchange_refresh_token(&refresh).await {
            Ok(refreshed) => {
                tracing::info!("Successfully refreshed access token");
                Some(refreshed)
            }
            Err(e) => {
                tracing::warn!("Token refresh failed: {:#}", e);
                None
            }
        }
    }

    async fn exchange_refresh_token(&self, refresh: &str) -> Result<RefreshResponse> {
        let request = ApiRequest::post(TOKEN_REFRESH_PATH, &RefreshRequest { refresh })?;

        let refreshed: RefreshResponse = self
            .send_public(&request)
            .await?
            .json()
            .await
            .context("Failed to parse refresh response")?;

        self.session().set_access_token(&refreshed.access)?;
        if let Some(rotated) = &refreshed.refresh {
            self.session().set_refresh_token(rotated)?;
        }

        Ok(refreshed)
    }

    /// Drop both stored tokens
    pub fn logout(&self) -> Result<()> {
        self.session().clear()?;
        tracing::info!("Logged out");
        Ok(())
    }
}
