//! FEN (Forsyth-Edwards Notation) field parsing and serialization.
//!
//! This module validates the six FEN fields and converts them into typed
//! values. Building a playable board from them (king counts, castling
//! rights) is the engine's job.

use crate::{Color, Piece, Rank, Square};
use thiserror::Error;

/// Errors that can occur when parsing FEN strings.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum FenError {
    #[error("invalid FEN: expected 6 parts, got {0}")]
    InvalidPartCount(usize),

    #[error("invalid piece placement: {0}")]
    InvalidPiecePlacement(String),

    #[error("invalid active color: expected 'w' or 'b', got '{0}'")]
    InvalidActiveColor(String),

    #[error("invalid castling rights: {0}")]
    InvalidCastlingRights(String),

    #[error("invalid en passant square: {0}")]
    InvalidEnPassantSquare(String),

    #[error("invalid halfmove clock: {0}")]
    InvalidHalfmoveClock(String),

    #[error("invalid fullmove number: {0}")]
    InvalidFullmoveNumber(String),

    #[error("{color} must have exactly one king, found {count}")]
    InvalidKingCount { color: Color, count: usize },

    #[error("{0} king is in check with the opponent to move")]
    OpponentInCheck(Color),
}

/// Typed FEN fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FenParser {
    /// Piece on each square, indexed a1 = 0 .. h8 = 63.
    pub placement: [Option<Piece>; 64],
    /// Side to move.
    pub active_color: Color,
    /// Castling availability letters in `KQkq` order (empty for `-`).
    pub castling: String,
    /// En passant target square.
    pub en_passant: Option<Square>,
    /// Halfmove clock (for the 50-move rule).
    pub halfmove_clock: u32,
    /// Fullmove number, starting at 1.
    pub fullmove_number: u32,
}

impl FenParser {
    /// The standard starting position FEN.
    pub const STARTPOS: &'static str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";

    /// Parses a FEN string.
    pub fn parse(fen: &str) -> Result<Self, FenError> {
        let parts: Vec<&str> = fen.split_whitespace().collect();
        if parts.len() != 6 {
            return Err(FenError::InvalidPartCount(parts.len()));
        }

        let placement = Self::parse_placement(parts[0])?;

        let active_color = match parts[1] {
            "w" => Color::White,
            "b" => Color::Black,
            other => return Err(FenError::InvalidActiveColor(other.to_string())),
        };

        let castling = Self::parse_castling(parts[2])?;
        let en_passant = Self::parse_en_passant(parts[3], active_color)?;

        let halfmove_clock = parts[4]
            .parse::<u32>()
            .map_err(|_| FenError::InvalidHalfmoveClock(parts[4].to_string()))?;

        let fullmove_number = parts[5]
            .parse::<u32>()
            .ok()
            .filter(|&n| n >= 1)
            .ok_or_else(|| FenError::InvalidFullmoveNumber(parts[5].to_string()))?;

        Ok(FenParser {
            placement,
            active_color,
            castling,
            en_passant,
            halfmove_clock,
            fullmove_number,
        })
    }

    fn parse_placement(placement: &str) -> Result<[Option<Piece>; 64], FenError> {
        let ranks: Vec<&str> = placement.split('/').collect();
        if ranks.len() != 8 {
            return Err(FenError::InvalidPiecePlacement(format!(
                "expected 8 ranks, got {}",
                ranks.len()
            )));
        }

        let mut squares = [None; 64];
        // FEN lists rank 8 first.
        for (row, rank_text) in ranks.iter().enumerate() {
            let rank = Rank::ALL[7 - row];
            let mut file = 0u8;
            for c in rank_text.chars() {
                if let Some(skip) = c.to_digit(10).filter(|d| (1..=8).contains(d)) {
                    file += skip as u8;
                } else if let Some(piece) = Piece::from_fen_char(c) {
                    if file < 8 {
                        squares[(rank.index() * 8 + file) as usize] = Some(piece);
                    }
                    file += 1;
                } else {
                    return Err(FenError::InvalidPiecePlacement(format!(
                        "invalid character '{}' in rank {}",
                        c, rank
                    )));
                }
                if file > 8 {
                    break;
                }
            }
            if file != 8 {
                return Err(FenError::InvalidPiecePlacement(format!(
                    "rank {} does not describe exactly 8 squares",
                    rank
                )));
            }
        }

        Ok(squares)
    }

    fn parse_castling(castling: &str) -> Result<String, FenError> {
        if castling == "-" {
            return Ok(String::new());
        }

        let mut seen = String::new();
        for c in castling.chars() {
            if !"KQkq".contains(c) {
                return Err(FenError::InvalidCastlingRights(format!(
                    "invalid character '{}'",
                    c
                )));
            }
            if seen.contains(c) {
                return Err(FenError::InvalidCastlingRights(format!(
                    "duplicate right '{}'",
                    c
                )));
            }
            seen.push(c);
        }

        Ok("KQkq".chars().filter(|c| seen.contains(*c)).collect())
    }

    fn parse_en_passant(ep: &str, active_color: Color) -> Result<Option<Square>, FenError> {
        if ep == "-" {
            return Ok(None);
        }

        // The target sits behind a pawn the opponent just double-pushed.
        let expected_rank = match active_color {
            Color::White => Rank::R6,
            Color::Black => Rank::R3,
        };
        match Square::from_algebraic(ep) {
            Some(sq) if sq.rank() == expected_rank => Ok(Some(sq)),
            _ => Err(FenError::InvalidEnPassantSquare(ep.to_string())),
        }
    }

    /// Converts the fields back to a FEN string.
    pub fn to_fen(&self) -> String {
        let mut fen = String::new();

        for rank in Rank::ALL.iter().rev() {
            let mut empty = 0;
            for file in 0..8u8 {
                match self.placement[(rank.index() * 8 + file) as usize] {
                    Some(piece) => {
                        if empty > 0 {
                            fen.push_str(&empty.to_string());
                            empty = 0;
                        }
                        fen.push(piece.to_fen_char());
                    }
                    None => empty += 1,
                }
            }
            if empty > 0 {
                fen.push_str(&empty.to_string());
            }
            if *rank != Rank::R1 {
                fen.push('/');
            }
        }

        let active = match self.active_color {
            Color::White => 'w',
            Color::Black => 'b',
        };
        let castling = if self.castling.is_empty() {
            "-"
        } else {
            self.castling.as_str()
        };
        let en_passant = self
            .en_passant
            .map(Square::to_algebraic)
            .unwrap_or_else(|| "-".to_string());

        format!(
            "{} {} {} {} {} {}",
            fen, active, castling, en_passant, self.halfmove_clock, self.fullmove_number
        )
    }
}
