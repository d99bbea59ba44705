//! Move generation.
//!
//! Moves are produced by walking the board from a1 to h8 and expanding each
//! piece of the side to move by its movement rule. The enumeration order is
//! fixed, so the same board always yields the same sequence.

mod attacks;
pub mod perft;

use crate::Board;
use chess_core::{Color, File, Move, MoveFlags, Piece, PieceKind, Square};

pub use attacks::{
    is_king_attacked, is_square_attacked, ray, slider_directions, BISHOP_DIRECTIONS,
    KING_OFFSETS, KNIGHT_OFFSETS, ROOK_DIRECTIONS,
};

/// A list of moves with a fixed maximum capacity.
///
/// Chess positions have at most 218 legal moves, so we use a fixed-size
/// array to avoid heap allocations during move generation.
#[derive(Clone)]
pub struct MoveList {
    moves: [Move; Self::MAX_MOVES],
    len: usize,
}

impl MoveList {
    /// Upper bound on pseudo-legal moves in any reachable position.
    pub const MAX_MOVES: usize = 256;

    /// Creates an empty move list.
    #[inline]
    pub const fn new() -> Self {
        MoveList {
            moves: [Move::NULL; Self::MAX_MOVES],
            len: 0,
        }
    }

    /// Adds a move to the list.
    #[inline]
    pub fn push(&mut self, m: Move) {
        debug_assert!(self.len < Self::MAX_MOVES);
        self.moves[self.len] = m;
        self.len += 1;
    }

    #[inline]
    pub const fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }

    #[inline]
    pub fn as_slice(&self) -> &[Move] {
        &self.moves[..self.len]
    }

    /// Iterates over the moves in generation order.
    #[inline]
    pub fn iter(&self) -> std::slice::Iter<'_, Move> {
        self.as_slice().iter()
    }

    /// Returns the generated move that `candidate` names, if any.
    ///
    /// Only source, destination and promotion are compared, so callers can
    /// pass a flagless candidate and get back the fully flagged move.
    pub fn find(&self, candidate: &Move) -> Option<Move> {
        self.iter().copied().find(|m| m.matches(candidate))
    }

    /// Returns true if `candidate` names one of the moves in the list.
    pub fn contains(&self, candidate: &Move) -> bool {
        self.find(candidate).is_some()
    }

    /// Retains only moves for which the predicate returns true.
    pub fn retain<F>(&mut self, mut f: F)
    where
        F: FnMut(&Move) -> bool,
    {
        let mut write = 0;
        for read in 0..self.len {
            if f(&self.moves[read]) {
                self.moves[write] = self.moves[read];
                write += 1;
            }
        }
        self.len = write;
    }
}

impl Default for MoveList {
    fn default() -> Self {
        Self::new()
    }
}

impl std::ops::Index<usize> for MoveList {
    type Output = Move;

    #[inline]
    fn index(&self, index: usize) -> &Self::Output {
        &self.as_slice()[index]
    }
}

impl<'a> IntoIterator for &'a MoveList {
    type Item = &'a Move;
    type IntoIter = std::slice::Iter<'a, Move>;

    fn into_iter(self) -> Self::IntoIter {
        self.as_slice().iter()
    }
}

impl std::fmt::Debug for MoveList {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list().entries(self.as_slice()).finish()
    }
}

/// Generates every pseudo-legal move for the side to move.
///
/// Pseudo-legal moves follow each piece's movement rule but may leave the
/// mover's own king attacked. Castling is the exception: its safety
/// conditions are checked here, since they are part of the move's rule.
pub fn pseudo_legal_moves(board: &Board) -> MoveList {
    let mut moves = MoveList::new();
    let us = board.side_to_move();

    for (from, piece) in board.pieces() {
        if piece.color != us {
            continue;
        }
        match piece.kind {
            PieceKind::Pawn => generate_pawn_moves(board, from, us, &mut moves),
            PieceKind::Knight => generate_step_moves(board, from, us, &KNIGHT_OFFSETS, &mut moves),
            PieceKind::King => {
                generate_step_moves(board, from, us, &KING_OFFSETS, &mut moves);
                generate_castling_moves(board, from, us, &mut moves);
            }
            kind => generate_slider_moves(board, from, us, slider_directions(kind), &mut moves),
        }
    }

    moves
}

/// Generates all legal moves for the side to move.
///
/// This is the single legality gate: a move is legal when, after it is
/// applied, the mover's king is not attacked.
pub fn legal_moves(board: &Board) -> MoveList {
    let us = board.side_to_move();
    let mut moves = pseudo_legal_moves(board);
    moves.retain(|m| !is_king_attacked(&board.apply(*m), us));
    moves
}

/// Classifies a non-pawn, non-castling move by what stands on its target.
fn quiet_or_capture(board: &Board, to: Square, us: Color) -> Option<MoveFlags> {
    match board.piece_at(to) {
        None => Some(MoveFlags::NONE),
        Some(Piece { color, .. }) if color != us => Some(MoveFlags::CAPTURE),
        Some(_) => None,
    }
}

fn generate_step_moves(
    board: &Board,
    from: Square,
    us: Color,
    offsets: &[(i8, i8)],
    moves: &mut MoveList,
) {
    for &(df, dr) in offsets {
        let Some(to) = from.offset(df, dr) else {
            continue;
        };
        if let Some(flags) = quiet_or_capture(board, to, us) {
            moves.push(Move::new(from, to, None, flags));
        }
    }
}

fn generate_slider_moves(
    board: &Board,
    from: Square,
    us: Color,
    directions: &[(i8, i8)],
    moves: &mut MoveList,
) {
    for &dir in directions {
        for to in ray(board, from, dir) {
            if let Some(flags) = quiet_or_capture(board, to, us) {
                moves.push(Move::new(from, to, None, flags));
            }
        }
    }
}

/// Pushes one move, or one per promotion choice when `to` is on the last rank.
fn push_pawn_move(from: Square, to: Square, us: Color, flags: MoveFlags, moves: &mut MoveList) {
    if to.rank() == us.promotion_rank() {
        for kind in PieceKind::PROMOTIONS {
            moves.push(Move::new(from, to, Some(kind), flags));
        }
    } else {
        moves.push(Move::new(from, to, None, flags));
    }
}

fn generate_pawn_moves(board: &Board, from: Square, us: Color, moves: &mut MoveList) {
    let dir = us.pawn_direction();

    if let Some(one) = from.offset(0, dir).filter(|&sq| board.piece_at(sq).is_none()) {
        push_pawn_move(from, one, us, MoveFlags::NONE, moves);

        if from.rank() == us.pawn_rank() {
            if let Some(two) = one.offset(0, dir).filter(|&sq| board.piece_at(sq).is_none()) {
                moves.push(Move::new(from, two, None, MoveFlags::DOUBLE_PUSH));
            }
        }
    }

    for df in [-1, 1] {
        let Some(to) = from.offset(df, dir) else {
            continue;
        };
        match board.piece_at(to) {
            Some(target) if target.color != us => {
                push_pawn_move(from, to, us, MoveFlags::CAPTURE, moves);
            }
            None if board.en_passant() == Some(to) => {
                moves.push(Move::new(
                    from,
                    to,
                    None,
                    MoveFlags::CAPTURE | MoveFlags::EN_PASSANT,
                ));
            }
            _ => {}
        }
    }
}

fn generate_castling_moves(board: &Board, from: Square, us: Color, moves: &mut MoveList) {
    let rank = us.back_rank();
    if from != Square::new(File::E, rank) {
        return;
    }
    let rights = board.castling();
    if !rights.can_castle_kingside(us) && !rights.can_castle_queenside(us) {
        return;
    }
    let them = us.opposite();
    if board.attacks_on(from, them) {
        return;
    }

    let at = |file| Square::new(file, rank);
    let rook = Some(Piece::new(PieceKind::Rook, us));
    let empty = |files: &[File]| files.iter().all(|&f| board.piece_at(at(f)).is_none());
    let safe = |files: &[File]| files.iter().all(|&f| !board.attacks_on(at(f), them));

    if rights.can_castle_kingside(us)
        && board.piece_at(at(File::H)) == rook
        && empty(&[File::F, File::G])
        && safe(&[File::F, File::G])
    {
        moves.push(Move::new(from, at(File::G), None, MoveFlags::CASTLE_KINGSIDE));
    }

    // The b-file square must be empty but may be attacked; the king never crosses it.
    if rights.can_castle_queenside(us)
        && board.piece_at(at(File::A)) == rook
        && empty(&[File::B, File::C, File::D])
        && safe(&[File::C, File::D])
    {
        moves.push(Move::new(from, at(File::C), None, MoveFlags::CASTLE_QUEENSIDE));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sq(s: &str) -> Square {
        Square::from_algebraic(s).unwrap()
    }

    fn uci(moves: &MoveList) -> Vec<String> {
        moves.iter().map(|m| m.to_uci()).collect()
    }

    #[test]
    fn move_list_operations() {
        let mut list = MoveList::new();
        assert!(list.is_empty());

        list.push(Move::candidate(sq("e2"), sq("e4"), None));
        list.push(Move::candidate(sq("d2"), sq("d4"), None));
        assert_eq!(list.len(), 2);
        assert_eq!(list[0].to_uci(), "e2e4");

        list.retain(|m| m.from == sq("d2"));
        assert_eq!(list.len(), 1);
        assert_eq!(list[0].to_uci(), "d2d4");
    }

    #[test]
    fn startpos_has_20_moves() {
        let moves = legal_moves(&Board::startpos());
        assert_eq!(moves.len(), 20);
        assert_eq!(pseudo_legal_moves(&Board::startpos()).len(), 20);
    }

    #[test]
    fn generation_order_is_deterministic() {
        let board = Board::startpos();
        let first = uci(&legal_moves(&board));
        assert_eq!(first, uci(&legal_moves(&board)));
        // a1..h8 walk: both knights come before the a2 pawn.
        assert_eq!(&first[..6], ["b1c3", "b1a3", "g1h3", "g1f3", "a2a3", "a2a4"]);
    }

    #[test]
    fn find_resolves_flags() {
        let moves = legal_moves(&Board::startpos());
        let found = moves.find(&Move::candidate(sq("e2"), sq("e4"), None)).unwrap();
        assert!(found.is_double_push());
        assert!(!moves.contains(&Move::candidate(sq("e2"), sq("e5"), None)));
    }

    #[test]
    fn promotions_generate_four_choices() {
        let board = Board::from_fen("1n2k3/P7/8/8/8/8/8/4K3 w - - 0 1").unwrap();
        let moves = legal_moves(&board);
        let promos: Vec<String> = uci(&moves)
            .into_iter()
            .filter(|m| m.starts_with("a7"))
            .collect();
        assert_eq!(
            promos,
            vec!["a7a8n", "a7a8b", "a7a8r", "a7a8q", "a7b8n", "a7b8b", "a7b8r", "a7b8q"]
        );
        assert!(moves
            .find(&Move::candidate(sq("a7"), sq("b8"), Some(PieceKind::Queen)))
            .unwrap()
            .is_capture());
        assert!(!moves.contains(&Move::candidate(sq("a7"), sq("a8"), None)));
    }

    #[test]
    fn en_passant_generated_only_with_target() {
        let with_target =
            Board::from_fen("rnbqkbnr/ppp1p1pp/8/3pPp2/8/8/PPPP1PPP/RNBQKBNR w KQkq f6 0 3").unwrap();
        let ep = legal_moves(&with_target)
            .find(&Move::candidate(sq("e5"), sq("f6"), None))
            .unwrap();
        assert!(ep.is_en_passant());
        assert!(ep.is_capture());
        // d6 is not the target, so no en-passant toward the d-pawn.
        assert!(!legal_moves(&with_target).contains(&Move::candidate(sq("e5"), sq("d6"), None)));

        let without =
            Board::from_fen("rnbqkbnr/ppp1p1pp/8/3pPp2/8/8/PPPP1PPP/RNBQKBNR w KQkq - 0 3").unwrap();
        assert!(!legal_moves(&without).contains(&Move::candidate(sq("e5"), sq("f6"), None)));
    }

    #[test]
    fn en_passant_cannot_expose_king() {
        // Capturing e.p. would clear the fifth rank between the rook and king.
        let board = Board::from_fen("8/8/8/KPp4r/8/8/8/7k w - c6 0 1").unwrap();
        assert!(!legal_moves(&board).contains(&Move::candidate(sq("b5"), sq("c6"), None)));
    }

    #[test]
    fn castling_both_sides() {
        let board = Board::from_fen("r3k2r/8/8/8/8/8/8/R3K2R w KQkq - 0 1").unwrap();
        let moves = legal_moves(&board);
        let kingside = moves.find(&Move::candidate(Square::E1, Square::G1, None)).unwrap();
        let queenside = moves.find(&Move::candidate(Square::E1, Square::C1, None)).unwrap();
        assert!(kingside.flags.contains(MoveFlags::CASTLE_KINGSIDE));
        assert!(queenside.flags.contains(MoveFlags::CASTLE_QUEENSIDE));

        // King steps come before castling.
        let king_moves: Vec<String> = uci(&moves)
            .into_iter()
            .filter(|m| m.starts_with("e1"))
            .collect();
        assert_eq!(king_moves.last().map(String::as_str), Some("e1c1"));
    }

    #[test]
    fn castling_requires_rights_and_empty_path() {
        let no_rights = Board::from_fen("r3k2r/8/8/8/8/8/8/R3K2R w - - 0 1").unwrap();
        assert!(!legal_moves(&no_rights).iter().any(|m| m.is_castling()));

        let blocked = Board::from_fen("r3k2r/8/8/8/8/8/8/RN2K1NR w KQkq - 0 1").unwrap();
        assert!(!legal_moves(&blocked).iter().any(|m| m.is_castling()));
    }

    #[test]
    fn castling_blocked_by_attacks() {
        // In check.
        let board = Board::from_fen("4r1k1/8/8/8/8/8/8/R3K2R w KQ - 0 1").unwrap();
        assert!(!legal_moves(&board).iter().any(|m| m.is_castling()));

        // f1 attacked: kingside off, queenside still fine.
        let board = Board::from_fen("5rk1/8/8/8/8/8/8/R3K2R w KQ - 0 1").unwrap();
        let moves = legal_moves(&board);
        assert!(!moves.contains(&Move::candidate(Square::E1, Square::G1, None)));
        assert!(moves.contains(&Move::candidate(Square::E1, Square::C1, None)));

        // b1 attacked does not stop queenside castling.
        let board = Board::from_fen("1r4k1/8/8/8/8/8/8/R3K3 w Q - 0 1").unwrap();
        assert!(legal_moves(&board).contains(&Move::candidate(Square::E1, Square::C1, None)));
    }

    #[test]
    fn pinned_piece_cannot_leave_line() {
        let board = Board::from_fen("4r1k1/8/8/8/8/8/4N3/4K3 w - - 0 1").unwrap();
        let moves = legal_moves(&board);
        assert!(!moves.iter().any(|m| m.from == sq("e2")));
        assert_eq!(pseudo_legal_moves(&board).iter().filter(|m| m.from == sq("e2")).count(), 6);
    }

    #[test]
    fn checkmated_side_has_no_moves() {
        let board =
            Board::from_fen("rnb1kbnr/pppp1ppp/8/4p3/6Pq/5P2/PPPPP2P/RNBQKBNR w KQkq - 1 3").unwrap();
        assert!(board.is_check());
        assert!(legal_moves(&board).is_empty());
    }
}
