//! Chess session management with remote persistence.
//!
//! A [`Session`] owns one active [`Game`](chess_engine::Game) and an
//! [`AuthContext`]. Moves are validated locally by `chess-engine`; saved
//! games travel to a [`PersistenceGateway`] as encoded movetext.
//!
//! - [`auth`] - bearer token and credentials
//! - [`config`] - `session.toml` loading
//! - [`gateway`] - the gateway trait and its error type
//! - [`http`] - REST gateway client
//! - [`models`] - wire types

pub mod auth;
pub mod config;
mod error;
pub mod gateway;
pub mod http;
pub mod models;
mod session;

pub use auth::{AuthContext, AuthToken, Credentials};
pub use config::{ConfigError, SessionConfig};
pub use error::SessionError;
pub use gateway::{GatewayError, PersistenceGateway};
pub use http::HttpGateway;
pub use models::{GameId, PlayStyleSummary, StoredGame, UserProfile};
pub use session::{LoadedGame, Session, DEFAULT_TIMEOUT};
