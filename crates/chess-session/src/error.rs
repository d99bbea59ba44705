//! Errors surfaced by a [`Session`](crate::Session).

use crate::gateway::GatewayError;
use chess_engine::{GameError, NotationError};
use thiserror::Error;

/// Failure of a session operation.
///
/// Rule violations leave the active game untouched. Remote failures never
/// modify local state.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionError {
    /// The candidate is not one of the legal moves on the current board.
    #[error("illegal move: {0}")]
    IllegalMove(String),

    #[error("game has already ended")]
    GameAlreadyOver,

    /// A stored record could not be replayed.
    #[error("malformed notation: {0}")]
    MalformedNotation(#[from] NotationError),

    /// The operation needs a token and none is present.
    #[error("not signed in")]
    NotAuthenticated,

    /// The gateway was unreachable, timed out or answered with an error.
    #[error("persistence failed: {0}")]
    PersistenceError(String),

    /// Registration collided with an existing user.
    #[error("conflict: {0}")]
    ConflictError(String),

    /// The gateway rejected the credentials or token.
    #[error("authentication failed")]
    AuthFailed,
}

impl From<GameError> for SessionError {
    fn from(err: GameError) -> Self {
        match err {
            GameError::GameAlreadyOver => SessionError::GameAlreadyOver,
            GameError::IllegalMove(m) => SessionError::IllegalMove(m.to_uci()),
            GameError::InvalidUci(text) => SessionError::IllegalMove(text),
            GameError::InvalidSan(e) => SessionError::IllegalMove(e.to_string()),
        }
    }
}

impl From<GatewayError> for SessionError {
    fn from(err: GatewayError) -> Self {
        match err {
            GatewayError::Unauthorized => SessionError::AuthFailed,
            GatewayError::Conflict(detail) => SessionError::ConflictError(detail),
            other => SessionError::PersistenceError(other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chess_core::Move;

    #[test]
    fn game_errors_map_to_rule_violations() {
        let m = Move::from_uci("e2e5").unwrap();
        assert_eq!(
            SessionError::from(GameError::IllegalMove(m)),
            SessionError::IllegalMove("e2e5".to_string())
        );
        assert_eq!(
            SessionError::from(GameError::GameAlreadyOver),
            SessionError::GameAlreadyOver
        );
    }

    #[test]
    fn gateway_errors_map_to_remote_failures() {
        assert_eq!(
            SessionError::from(GatewayError::Unauthorized),
            SessionError::AuthFailed
        );
        assert_eq!(
            SessionError::from(GatewayError::Conflict("taken".into())),
            SessionError::ConflictError("taken".into())
        );
        assert!(matches!(
            SessionError::from(GatewayError::Transport("refused".into())),
            SessionError::PersistenceError(msg) if msg.contains("refused")
        ));
    }
}
