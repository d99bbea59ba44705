//! Core types for chess.
//!
//! This crate provides the value types shared by the rules engine and the
//! session layer:
//! - [`PieceKind`], [`Piece`] and [`Color`] for piece representation
//! - [`Square`], [`File`], and [`Rank`] for board coordinates
//! - [`Move`] and [`MoveFlags`] for move representation
//! - FEN field parsing and serialization

mod color;
mod fen;
mod mov;
mod piece;
mod square;

pub use color::Color;
pub use fen::{FenError, FenParser};
pub use mov::{Move, MoveFlags};
pub use piece::{Piece, PieceKind};
pub use square::{File, Rank, Square};
