//! REST implementation of [`PersistenceGateway`] over `reqwest`.

use crate::auth::{AuthToken, Credentials};
use crate::config::SessionConfig;
use crate::gateway::{GatewayError, PersistenceGateway};
use crate::models::{
    CreatedGame, ErrorBody, GameId, NewGame, PlayStyleSummary, StoredGame, TokenResponse,
    UserProfile,
};
use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use std::time::Duration;

/// Client for the persistence REST service.
///
/// ```no_run
/// # async fn demo() -> Result<(), Box<dyn std::error::Error>> {
/// use chess_session::{Credentials, HttpGateway, PersistenceGateway};
/// use std::time::Duration;
///
/// let gateway = HttpGateway::new("http://127.0.0.1:8001", Duration::from_secs(10))?;
/// let token = gateway.login(&Credentials::new("alice", "correct horse")).await?;
/// let games = gateway.list_games(&token).await?;
/// println!("{} stored games", games.len());
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct HttpGateway {
    client: Client,
    base_url: String,
}

impl HttpGateway {
    /// Creates a client for `base_url` whose requests time out after `timeout`.
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, GatewayError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| GatewayError::Transport(e.to_string()))?;
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Ok(HttpGateway { client, base_url })
    }

    /// Creates a client from the gateway URL and timeout in `config`.
    pub fn from_config(config: &SessionConfig) -> Result<Self, GatewayError> {
        Self::new(config.gateway_url.clone(), config.request_timeout())
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn send(request: RequestBuilder) -> Result<Response, GatewayError> {
        let response = request
            .send()
            .await
            .map_err(|e| GatewayError::Transport(e.to_string()))?;
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        if status == StatusCode::UNAUTHORIZED {
            return Err(GatewayError::Unauthorized);
        }
        Err(GatewayError::Status {
            status: status.as_u16(),
            message: error_message(response).await,
        })
    }

    async fn json<T: DeserializeOwned>(request: RequestBuilder) -> Result<T, GatewayError> {
        Self::send(request)
            .await?
            .json::<T>()
            .await
            .map_err(|e| GatewayError::Decode(e.to_string()))
    }
}

/// Extracts `detail` from an error body, falling back to the raw text.
async fn error_message(response: Response) -> String {
    let reason = response
        .status()
        .canonical_reason()
        .unwrap_or("error")
        .to_string();
    match response.text().await {
        Ok(text) if !text.is_empty() => serde_json::from_str::<ErrorBody>(&text)
            .map(|body| body.message())
            .unwrap_or(text),
        _ => reason,
    }
}

#[async_trait]
impl PersistenceGateway for HttpGateway {
    async fn login(&self, credentials: &Credentials) -> Result<AuthToken, GatewayError> {
        let form = [
            ("username", credentials.username.as_str()),
            ("password", credentials.password.as_str()),
        ];
        let body: TokenResponse =
            Self::json(self.client.post(self.url("/token")).form(&form)).await?;
        Ok(AuthToken::new(body.access_token))
    }

    async fn register(&self, credentials: &Credentials) -> Result<UserProfile, GatewayError> {
        let request = self.client.post(self.url("/users")).json(credentials);
        match Self::json(request).await {
            Err(GatewayError::Status { status, message }) if status == 400 || status == 409 => {
                Err(GatewayError::Conflict(message))
            }
            other => other,
        }
    }

    async fn current_user(&self, token: &AuthToken) -> Result<UserProfile, GatewayError> {
        Self::json(self.client.get(self.url("/users/me")).bearer_auth(token.as_str())).await
    }

    async fn play_style(&self, token: &AuthToken) -> Result<PlayStyleSummary, GatewayError> {
        let request = self
            .client
            .get(self.url("/users/me/analysis"))
            .bearer_auth(token.as_str());
        Self::json(request).await
    }

    async fn create_game(&self, token: &AuthToken, notation: &str) -> Result<GameId, GatewayError> {
        let body = NewGame {
            notation: notation.to_string(),
        };
        let request = self
            .client
            .post(self.url("/games"))
            .bearer_auth(token.as_str())
            .json(&body);
        let created: CreatedGame = Self::json(request).await?;
        Ok(created.id)
    }

    async fn list_games(&self, token: &AuthToken) -> Result<Vec<StoredGame>, GatewayError> {
        Self::json(self.client.get(self.url("/games")).bearer_auth(token.as_str())).await
    }
}
