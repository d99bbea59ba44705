//! The session manager: one active game plus the auth context.
//!
//! All state lives behind a single lock. Moves, resets and aborts take it
//! for the duration of the rules call. Persistence calls take it only long
//! enough to copy what they need, so a slow gateway never holds up play and
//! a failed call has nothing to roll back.

use crate::auth::{AuthContext, AuthToken, Credentials};
use crate::error::SessionError;
use crate::gateway::{GatewayError, PersistenceGateway};
use crate::models::{GameId, PlayStyleSummary, UserProfile};
use chess_core::Move;
use chess_engine::{notation, Game, Status};
use std::future::Future;
use std::time::Duration;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

/// Default bound on a single gateway call.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// A stored game after replay. Each record decodes independently.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadedGame {
    pub id: GameId,
    pub game: Result<Game, SessionError>,
}

#[derive(Debug)]
struct SessionState {
    game: Game,
    auth: AuthContext,
}

/// A single player's session.
///
/// ```no_run
/// # async fn demo() -> Result<(), Box<dyn std::error::Error>> {
/// use chess_session::{AuthContext, HttpGateway, Session, SessionConfig};
///
/// let config = SessionConfig::load()?;
/// let gateway = HttpGateway::from_config(&config)?;
/// let session = Session::new(gateway, AuthContext::anonymous())
///     .with_timeout(config.request_timeout());
///
/// session.apply_uci("e2e4").await?;
/// session.apply_san("e5").await?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct Session<G> {
    gateway: G,
    state: Mutex<SessionState>,
    timeout: Duration,
}

impl<G: PersistenceGateway> Session<G> {
    /// Creates a session with a fresh game.
    pub fn new(gateway: G, auth: AuthContext) -> Self {
        Session {
            gateway,
            state: Mutex::new(SessionState {
                game: Game::new(),
                auth,
            }),
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Sets the bound applied to every gateway call.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn gateway(&self) -> &G {
        &self.gateway
    }

    // --- game -----------------------------------------------------------

    /// Applies a candidate move to the active game.
    pub async fn apply_move(&self, m: Move) -> Result<Status, SessionError> {
        let mut state = self.state.lock().await;
        let status = state.game.apply_move(m)?;
        debug!(mv = %m, status = %status, ply = state.game.ply_count(), "move applied");
        Ok(status)
    }

    /// Applies a move given as coordinates, e.g. `e7e8q`.
    pub async fn apply_uci(&self, uci: &str) -> Result<Status, SessionError> {
        let mut state = self.state.lock().await;
        let status = state.game.apply_uci(uci)?;
        debug!(mv = uci, status = %status, ply = state.game.ply_count(), "move applied");
        Ok(status)
    }

    /// Applies a move given in SAN, e.g. `Nf3`.
    pub async fn apply_san(&self, san: &str) -> Result<Status, SessionError> {
        let mut state = self.state.lock().await;
        let status = state.game.apply_san(san)?;
        debug!(mv = san, status = %status, ply = state.game.ply_count(), "move applied");
        Ok(status)
    }

    /// Replaces the active game with a fresh one.
    pub async fn reset(&self) {
        self.state.lock().await.game.reset();
        debug!("game reset");
    }

    /// Abandons the active game.
    pub async fn abort(&self) -> Result<(), SessionError> {
        self.state.lock().await.game.abort()?;
        debug!("game aborted");
        Ok(())
    }

    /// Makes `game` the active game, e.g. one returned by [`Self::load_all`].
    pub async fn resume(&self, game: Game) {
        let plies = game.ply_count();
        self.state.lock().await.game = game;
        debug!(plies, "game resumed");
    }

    pub async fn status(&self) -> Status {
        self.state.lock().await.game.status()
    }

    /// Returns a copy of the active game.
    pub async fn snapshot(&self) -> Game {
        self.state.lock().await.game.clone()
    }

    // --- auth -----------------------------------------------------------

    /// Installs a previously issued token.
    pub async fn sign_in(&self, token: AuthToken) {
        self.state.lock().await.auth.install(token);
    }

    /// Drops the token. Later persistence calls fail with `NotAuthenticated`.
    pub async fn logout(&self) {
        self.state.lock().await.auth.clear();
        info!("signed out");
    }

    pub async fn is_authenticated(&self) -> bool {
        self.state.lock().await.auth.is_authenticated()
    }

    /// Authenticates against the gateway and installs the issued token.
    ///
    /// The token is returned so the caller can persist it.
    pub async fn login(&self, credentials: &Credentials) -> Result<AuthToken, SessionError> {
        let token = self.call("login", self.gateway.login(credentials)).await?;
        self.state.lock().await.auth.install(token.clone());
        info!(username = %credentials.username, "signed in");
        Ok(token)
    }

    /// Creates an account. Does not sign in.
    pub async fn register(&self, credentials: &Credentials) -> Result<UserProfile, SessionError> {
        let user = self.call("register", self.gateway.register(credentials)).await?;
        info!(username = %user.username, id = user.id, "registered");
        Ok(user)
    }

    pub async fn profile(&self) -> Result<UserProfile, SessionError> {
        let token = self.token().await?;
        self.call("profile", self.gateway.current_user(&token)).await
    }

    pub async fn play_style(&self) -> Result<PlayStyleSummary, SessionError> {
        let token = self.token().await?;
        self.call("play_style", self.gateway.play_style(&token)).await
    }

    // --- persistence ----------------------------------------------------

    /// Stores the active game and returns the identifier the gateway assigned.
    ///
    /// Fails with `NotAuthenticated` before any request when no token is present.
    pub async fn save(&self) -> Result<GameId, SessionError> {
        let (token, text, plies) = {
            let state = self.state.lock().await;
            let token = state
                .auth
                .token()
                .cloned()
                .ok_or(SessionError::NotAuthenticated)?;
            (token, notation::encode(&state.game), state.game.ply_count())
        };
        let id = self
            .call("save", self.gateway.create_game(&token, &text))
            .await?;
        info!(id, plies, "game saved");
        Ok(id)
    }

    /// Fetches and replays every stored game.
    ///
    /// A record that fails to decode is reported in its own [`LoadedGame`]
    /// and does not affect the others.
    pub async fn load_all(&self) -> Result<Vec<LoadedGame>, SessionError> {
        let token = self.token().await?;
        let stored = self.call("load_all", self.gateway.list_games(&token)).await?;

        let loaded: Vec<LoadedGame> = stored
            .into_iter()
            .map(|record| {
                let game = notation::decode(&record.notation).map_err(|e| {
                    warn!(id = record.id, error = %e, "stored game is corrupt");
                    SessionError::from(e)
                });
                LoadedGame {
                    id: record.id,
                    game,
                }
            })
            .collect();

        let corrupt = loaded.iter().filter(|g| g.game.is_err()).count();
        info!(count = loaded.len(), corrupt, "games loaded");
        Ok(loaded)
    }

    async fn token(&self) -> Result<AuthToken, SessionError> {
        self.state
            .lock()
            .await
            .auth
            .token()
            .cloned()
            .ok_or(SessionError::NotAuthenticated)
    }

    /// Runs one gateway call under the session timeout.
    async fn call<T, F>(&self, op: &'static str, fut: F) -> Result<T, SessionError>
    where
        F: Future<Output = Result<T, GatewayError>>,
    {
        match tokio::time::timeout(self.timeout, fut).await {
            Ok(Ok(value)) => Ok(value),
            Ok(Err(e)) => {
                warn!(op, error = %e, "gateway call failed");
                Err(e.into())
            }
            Err(_) => {
                warn!(op, timeout_ms = self.timeout.as_millis() as u64, "gateway call timed out");
                Err(SessionError::PersistenceError(format!(
                    "{} timed out after {:?}",
                    op, self.timeout
                )))
            }
        }
    }
}
