//! Persistence gateway abstraction.
//!
//! [`PersistenceGateway`] is the seam between a [`Session`](crate::Session)
//! and wherever games are stored. [`HttpGateway`](crate::HttpGateway) talks
//! to the REST service. Tests substitute an in-memory stub.

use crate::auth::{AuthToken, Credentials};
use crate::models::{GameId, PlayStyleSummary, StoredGame, UserProfile};
use async_trait::async_trait;
use thiserror::Error;

/// Transport-level failures reported by a gateway.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GatewayError {
    /// Credentials were rejected or the token is no longer valid.
    #[error("unauthorized")]
    Unauthorized,

    /// The resource already exists (username taken).
    #[error("conflict: {0}")]
    Conflict(String),

    /// Any other non-success response.
    #[error("server returned {status}: {message}")]
    Status { status: u16, message: String },

    /// The request never produced a response.
    #[error("transport error: {0}")]
    Transport(String),

    /// The response body did not have the expected shape.
    #[error("unexpected response body: {0}")]
    Decode(String),
}

/// Remote store for users and their games.
///
/// Every call is a single request with no retry. Callers decide whether to
/// try again.
#[async_trait]
pub trait PersistenceGateway: Send + Sync {
    /// Exchanges credentials for a bearer token.
    async fn login(&self, credentials: &Credentials) -> Result<AuthToken, GatewayError>;

    /// Creates a user account.
    async fn register(&self, credentials: &Credentials) -> Result<UserProfile, GatewayError>;

    /// Returns the user the token belongs to.
    async fn current_user(&self, token: &AuthToken) -> Result<UserProfile, GatewayError>;

    /// Returns the play-style summary computed from the user's stored games.
    async fn play_style(&self, token: &AuthToken) -> Result<PlayStyleSummary, GatewayError>;

    /// Stores encoded movetext and returns the identifier assigned to it.
    async fn create_game(&self, token: &AuthToken, notation: &str) -> Result<GameId, GatewayError>;

    /// Lists every game stored for the user.
    async fn list_games(&self, token: &AuthToken) -> Result<Vec<StoredGame>, GatewayError>;
}
