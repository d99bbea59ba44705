//! Piece movement geometry and attack detection.

use crate::Board;
use chess_core::{Color, Piece, PieceKind, Square};

/// Knight jumps as (file, rank) deltas.
pub const KNIGHT_OFFSETS: [(i8, i8); 8] = [
    (1, 2),
    (2, 1),
    (2, -1),
    (1, -2),
    (-1, -2),
    (-2, -1),
    (-2, 1),
    (-1, 2),
];

/// King steps as (file, rank) deltas.
pub const KING_OFFSETS: [(i8, i8); 8] = [
    (0, 1),
    (1, 1),
    (1, 0),
    (1, -1),
    (0, -1),
    (-1, -1),
    (-1, 0),
    (-1, 1),
];

/// Diagonal ray directions.
pub const BISHOP_DIRECTIONS: [(i8, i8); 4] = [(1, 1), (1, -1), (-1, -1), (-1, 1)];

/// Orthogonal ray directions.
pub const ROOK_DIRECTIONS: [(i8, i8); 4] = [(0, 1), (1, 0), (0, -1), (-1, 0)];

/// Ray directions for a sliding piece kind (empty for non-sliders).
pub fn slider_directions(kind: PieceKind) -> &'static [(i8, i8)] {
    const QUEEN: [(i8, i8); 8] = [
        (0, 1),
        (1, 1),
        (1, 0),
        (1, -1),
        (0, -1),
        (-1, -1),
        (-1, 0),
        (-1, 1),
    ];
    match kind {
        PieceKind::Bishop => &BISHOP_DIRECTIONS,
        PieceKind::Rook => &ROOK_DIRECTIONS,
        PieceKind::Queen => &QUEEN,
        _ => &[],
    }
}

/// Walks from `from` (exclusive) in one direction, yielding each square
/// until the edge of the board or the first occupied square (inclusive).
pub fn ray(board: &Board, from: Square, (df, dr): (i8, i8)) -> impl Iterator<Item = Square> + '_ {
    let mut cursor = Some(from);
    let mut blocked = false;
    std::iter::from_fn(move || {
        if blocked {
            return None;
        }
        let next = cursor?.offset(df, dr)?;
        cursor = Some(next);
        blocked = board.piece_at(next).is_some();
        Some(next)
    })
}

/// Returns the first piece met walking from `from` in one direction.
fn first_piece_on_ray(board: &Board, from: Square, dir: (i8, i8)) -> Option<Piece> {
    ray(board, from, dir).last().and_then(|sq| board.piece_at(sq))
}

/// Returns true if any piece of `by` attacks `sq`.
///
/// Attacks are pseudo-legal: a pinned piece still attacks, and the square
/// may hold a piece of either color.
pub fn is_square_attacked(board: &Board, sq: Square, by: Color) -> bool {
    let is = |target: Option<Square>, kind: PieceKind| {
        target.and_then(|t| board.piece_at(t)) == Some(Piece::new(kind, by))
    };

    // A pawn of `by` attacks diagonally forward, so look one rank behind.
    let behind = -by.pawn_direction();
    if is(sq.offset(-1, behind), PieceKind::Pawn) || is(sq.offset(1, behind), PieceKind::Pawn) {
        return true;
    }

    if KNIGHT_OFFSETS
        .iter()
        .any(|&(df, dr)| is(sq.offset(df, dr), PieceKind::Knight))
    {
        return true;
    }

    if KING_OFFSETS
        .iter()
        .any(|&(df, dr)| is(sq.offset(df, dr), PieceKind::King))
    {
        return true;
    }

    let diagonal = BISHOP_DIRECTIONS.iter().any(|&dir| {
        matches!(
            first_piece_on_ray(board, sq, dir),
            Some(Piece { kind: PieceKind::Bishop | PieceKind::Queen, color }) if color == by
        )
    });
    if diagonal {
        return true;
    }

    ROOK_DIRECTIONS.iter().any(|&dir| {
        matches!(
            first_piece_on_ray(board, sq, dir),
            Some(Piece { kind: PieceKind::Rook | PieceKind::Queen, color }) if color == by
        )
    })
}

/// Returns true if the king of `color` is attacked by the other side.
pub fn is_king_attacked(board: &Board, color: Color) -> bool {
    board
        .king_square(color)
        .is_some_and(|king| is_square_attacked(board, king, color.opposite()))
}
