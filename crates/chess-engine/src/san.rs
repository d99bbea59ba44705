//! Standard Algebraic Notation (SAN) parsing and generation.
//!
//! SAN is the standard way to record chess moves in human-readable form.
//! Examples: "e4", "Nf3", "Bxc6", "O-O", "e8=Q", "Nbd2", "Ra1a3"

use crate::movegen::legal_moves;
use crate::{Board, MoveList};
use chess_core::{File, Move, MoveFlags, PieceKind, Rank, Square};
use thiserror::Error;

/// Error type for SAN parsing.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SanError {
    #[error("empty SAN string")]
    Empty,

    #[error("invalid SAN format: {0}")]
    InvalidFormat(String),

    #[error("no legal move matches: {0}")]
    NoMatchingMove(String),

    #[error("ambiguous move: {0}")]
    AmbiguousMove(String),
}

/// Converts a move to SAN given the board BEFORE the move is made.
///
/// The move is first resolved against the legal moves of `board`, so a
/// flagless candidate is accepted. Origin disambiguation uses the file when
/// that suffices and the full square otherwise.
pub fn move_to_san(board: &Board, m: Move) -> Result<String, SanError> {
    let moves = legal_moves(board);
    let m = moves
        .find(&m)
        .ok_or_else(|| SanError::NoMatchingMove(m.to_uci()))?;
    let piece = board
        .piece_at(m.from)
        .ok_or_else(|| SanError::NoMatchingMove(m.to_uci()))?;

    let mut san = String::new();

    if m.flags.contains(MoveFlags::CASTLE_KINGSIDE) {
        san.push_str("O-O");
    } else if m.flags.contains(MoveFlags::CASTLE_QUEENSIDE) {
        san.push_str("O-O-O");
    } else {
        if piece.kind == PieceKind::Pawn {
            // Pawn captures include the source file
            if m.is_capture() {
                san.push(m.from.file().to_char());
                san.push('x');
            }
        } else {
            san.push(piece.kind.letter());
            san.push_str(&get_disambiguation(board, &moves, m, piece.kind));
            if m.is_capture() {
                san.push('x');
            }
        }

        san.push_str(&m.to.to_algebraic());

        if let Some(kind) = m.promotion {
            san.push('=');
            san.push(kind.letter());
        }
    }

    add_check_suffix(board, m, &mut san);
    Ok(san)
}

/// Parses a SAN string and returns the corresponding legal move.
///
/// Trailing `+`, `#`, `!` and `?` are ignored. A promotion must name its
/// piece; exactly one legal move must match.
pub fn san_to_move(board: &Board, san: &str) -> Result<Move, SanError> {
    let san = san.trim();
    if san.is_empty() {
        return Err(SanError::Empty);
    }

    let body = san.trim_end_matches(['+', '#', '!', '?']);

    match body {
        "O-O" | "0-0" => return find_castling_move(board, MoveFlags::CASTLE_KINGSIDE, san),
        "O-O-O" | "0-0-0" => return find_castling_move(board, MoveFlags::CASTLE_QUEENSIDE, san),
        _ => {}
    }

    let parsed = parse_san_components(body)?;
    find_matching_move(board, &parsed, san)
}

/// Parsed components of a SAN string.
#[derive(Debug, PartialEq, Eq)]
struct ParsedSan {
    piece: PieceKind,
    from_file: Option<File>,
    from_rank: Option<Rank>,
    to: Square,
    promotion: Option<PieceKind>,
    is_capture: bool,
}

fn parse_san_components(san: &str) -> Result<ParsedSan, SanError> {
    let invalid = || SanError::InvalidFormat(san.to_string());

    let (body, promotion) = match san.split_once('=') {
        Some((body, promo)) => {
            let mut chars = promo.chars();
            let kind = match (chars.next(), chars.next()) {
                (Some(c), None) => PieceKind::from_letter(c)
                    .filter(|k| PieceKind::PROMOTIONS.contains(k))
                    .ok_or_else(invalid)?,
                _ => return Err(invalid()),
            };
            (body, Some(kind))
        }
        None => (san, None),
    };

    let chars: Vec<char> = body.chars().collect();

    let (piece, rest) = match chars.split_first() {
        Some((&c, rest)) if c.is_ascii_uppercase() => {
            let kind = PieceKind::from_letter(c)
                .filter(|&k| k != PieceKind::Pawn)
                .ok_or_else(invalid)?;
            (kind, rest)
        }
        _ => (PieceKind::Pawn, chars.as_slice()),
    };

    // The last two characters are the destination square.
    let [prefix @ .., file, rank] = rest else {
        return Err(invalid());
    };
    let to = Square::new(
        File::from_char(*file).ok_or_else(invalid)?,
        Rank::from_char(*rank).ok_or_else(invalid)?,
    );

    let (prefix, is_capture) = match prefix {
        [head @ .., 'x'] => (head, true),
        _ => (prefix, false),
    };
    let (from_file, from_rank) = parse_disambiguation(prefix).ok_or_else(invalid)?;

    if piece == PieceKind::Pawn {
        // Pawns name their file exactly when capturing.
        if from_rank.is_some() || from_file.is_some() != is_capture {
            return Err(invalid());
        }
    } else if promotion.is_some() {
        return Err(invalid());
    }

    Ok(ParsedSan {
        piece,
        from_file,
        from_rank,
        to,
        promotion,
        is_capture,
    })
}

fn parse_disambiguation(chars: &[char]) -> Option<(Option<File>, Option<Rank>)> {
    match *chars {
        [] => Some((None, None)),
        [c] => File::from_char(c)
            .map(|f| (Some(f), None))
            .or_else(|| Rank::from_char(c).map(|r| (None, Some(r)))),
        [f, r] => Some((Some(File::from_char(f)?), Some(Rank::from_char(r)?))),
        _ => None,
    }
}

fn find_castling_move(board: &Board, flag: MoveFlags, san: &str) -> Result<Move, SanError> {
    legal_moves(board)
        .iter()
        .copied()
        .find(|m| m.flags.contains(flag))
        .ok_or_else(|| SanError::NoMatchingMove(san.to_string()))
}

fn find_matching_move(board: &Board, parsed: &ParsedSan, san: &str) -> Result<Move, SanError> {
    let moves = legal_moves(board);
    let mut matching = moves.iter().copied().filter(|m| {
        m.to == parsed.to
            && board.piece_at(m.from).map(|p| p.kind) == Some(parsed.piece)
            && parsed.from_file.map_or(true, |f| m.from.file() == f)
            && parsed.from_rank.map_or(true, |r| m.from.rank() == r)
            && m.promotion == parsed.promotion
            && m.is_capture() == parsed.is_capture
            && !m.is_castling()
    });

    match (matching.next(), matching.next()) {
        (Some(m), None) => Ok(m),
        (None, _) => Err(SanError::NoMatchingMove(san.to_string())),
        (Some(_), Some(_)) => Err(SanError::AmbiguousMove(san.to_string())),
    }
}

/// Returns the origin text needed to tell `m` apart from moves of other
/// pieces of the same kind reaching the same square.
fn get_disambiguation(board: &Board, moves: &MoveList, m: Move, kind: PieceKind) -> String {
    let rivals: Vec<Square> = moves
        .iter()
        .filter(|other| {
            other.to == m.to
                && other.from != m.from
                && board.piece_at(other.from).map(|p| p.kind) == Some(kind)
        })
        .map(|other| other.from)
        .collect();

    if rivals.is_empty() {
        return String::new();
    }

    if rivals.iter().all(|sq| sq.file() != m.from.file()) {
        return m.from.file().to_char().to_string();
    }

    m.from.to_algebraic()
}

fn add_check_suffix(board: &Board, m: Move, san: &mut String) {
    let after = board.apply(m);
    if after.is_check() {
        if legal_moves(&after).is_empty() {
            san.push('#');
        } else {
            san.push('+');
        }
    }
}
