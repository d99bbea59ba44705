//! Wire types exchanged with the persistence gateway.

use serde::{Deserialize, Serialize};

/// Identifier the gateway assigns to a stored game.
pub type GameId = i64;

/// The signed-in user, as returned by `GET /users/me`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: i64,
    pub username: String,
}

/// Body of a successful `POST /token`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    #[serde(default)]
    pub token_type: Option<String>,
}

/// A game record as stored by the gateway.
///
/// Older records carry their movetext under `pgn_moves`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredGame {
    pub id: GameId,
    #[serde(alias = "pgn_moves")]
    pub notation: String,
}

/// Body of `POST /games`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewGame {
    pub notation: String,
}

/// Body of a successful `POST /games`; other fields are ignored.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CreatedGame {
    pub id: GameId,
}

/// Play-style summary derived by the gateway from the user's stored games.
///
/// The engine never interprets these values; they are passed through to
/// the caller for display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayStyleSummary {
    pub total_games: u32,
    pub aggressive_score: i64,
    pub defensive_score: i64,
    #[serde(default)]
    pub opening_preference: Option<String>,
    pub personality_type: String,
    pub celebrity_match: String,
}

/// Error body used by the gateway: `{"detail": ...}`.
#[derive(Debug, Deserialize)]
pub(crate) struct ErrorBody {
    pub detail: serde_json::Value,
}

impl ErrorBody {
    /// Renders `detail` as a message, whether it is a string or a structure.
    pub(crate) fn message(&self) -> String {
        match &self.detail {
            serde_json::Value::String(s) => s.clone(),
            other => other.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stored_game_accepts_both_field_names() {
        let new: StoredGame = serde_json::from_str(r#"{"id": 3, "notation": "1. e4"}"#).unwrap();
        let old: StoredGame =
            serde_json::from_str(r#"{"id": 4, "user_id": 1, "pgn_moves": "1. d4"}"#).unwrap();
        assert_eq!(new.notation, "1. e4");
        assert_eq!(old.id, 4);
        assert_eq!(old.notation, "1. d4");
    }

    #[test]
    fn play_style_without_opening() {
        let json = r#"{
            "total_games": 0,
            "aggressive_score": 0,
            "defensive_score": 0,
            "opening_preference": null,
            "personality_type": "Newcomer",
            "celebrity_match": "None yet"
        }"#;
        let summary: PlayStyleSummary = serde_json::from_str(json).unwrap();
        assert_eq!(summary.total_games, 0);
        assert!(summary.opening_preference.is_none());
    }

    #[test]
    fn error_body_message() {
        let body: ErrorBody = serde_json::from_str(r#"{"detail": "Username already registered"}"#).unwrap();
        assert_eq!(body.message(), "Username already registered");
        let body: ErrorBody = serde_json::from_str(r#"{"detail": [{"msg": "too short"}]}"#).unwrap();
        assert!(body.message().contains("too short"));
    }
}
