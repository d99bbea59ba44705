//! Chess rules engine.
//!
//! This crate provides:
//! - [`Board`] - immutable-per-ply board model with FEN support
//! - Move generation ([`legal_moves`], [`pseudo_legal_moves`]) and perft
//! - [`Game`] - the game state machine with history and [`Status`]
//! - [`RuleSet`] - the legality gate and status evaluation, implemented by
//!   [`StandardChess`]
//! - SAN for single moves and PGN movetext for whole games
//!
//! # Example
//!
//! ```
//! use chess_engine::{notation, Game, Status};
//!
//! let mut game = Game::new();
//! game.apply_san("e4").unwrap();
//! game.apply_uci("e7e5").unwrap();
//! assert_eq!(game.status(), Status::InProgress);
//!
//! let text = notation::encode(&game);
//! assert_eq!(text, "1. e4 e5");
//! assert_eq!(notation::decode(&text).unwrap(), game);
//! ```

mod board;
mod game;
pub mod movegen;
pub mod notation;
pub mod rules;
pub mod san;

pub use board::{Board, CastlingRights, RepetitionKey};
pub use game::{Game, GameError, GameMove};
pub use movegen::{is_king_attacked, is_square_attacked, legal_moves, pseudo_legal_moves, MoveList};
pub use notation::{decode, encode, NotationError};
pub use rules::{RuleSet, StandardChess, Status};
pub use san::{move_to_san, san_to_move, SanError};
