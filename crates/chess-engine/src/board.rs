//! Board model: piece placement plus the auxiliary state of one ply.

use chess_core::{
    Color, FenError, FenParser, File, Move, MoveFlags, Piece, PieceKind, Rank, Square,
};
use std::fmt;

use crate::movegen::is_square_attacked;

/// Castling rights flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct CastlingRights(u8);

impl CastlingRights {
    pub const NONE: CastlingRights = CastlingRights(0);
    pub const WHITE_KINGSIDE: u8 = 0b0001;
    pub const WHITE_QUEENSIDE: u8 = 0b0010;
    pub const BLACK_KINGSIDE: u8 = 0b0100;
    pub const BLACK_QUEENSIDE: u8 = 0b1000;
    pub const ALL: CastlingRights = CastlingRights(0b1111);

    /// Creates new castling rights from flags.
    #[inline]
    pub const fn new(flags: u8) -> Self {
        CastlingRights(flags & 0b1111)
    }

    /// Returns true if the given side may still castle kingside.
    #[inline]
    pub const fn can_castle_kingside(self, color: Color) -> bool {
        let flag = match color {
            Color::White => Self::WHITE_KINGSIDE,
            Color::Black => Self::BLACK_KINGSIDE,
        };
        (self.0 & flag) != 0
    }

    /// Returns true if the given side may still castle queenside.
    #[inline]
    pub const fn can_castle_queenside(self, color: Color) -> bool {
        let flag = match color {
            Color::White => Self::WHITE_QUEENSIDE,
            Color::Black => Self::BLACK_QUEENSIDE,
        };
        (self.0 & flag) != 0
    }

    /// Revokes both rights of a color.
    #[inline]
    pub fn remove_color(&mut self, color: Color) {
        self.remove_kingside(color);
        self.remove_queenside(color);
    }

    /// Revokes the kingside right of a color.
    #[inline]
    pub fn remove_kingside(&mut self, color: Color) {
        self.0 &= !match color {
            Color::White => Self::WHITE_KINGSIDE,
            Color::Black => Self::BLACK_KINGSIDE,
        };
    }

    /// Revokes the queenside right of a color.
    #[inline]
    pub fn remove_queenside(&mut self, color: Color) {
        self.0 &= !match color {
            Color::White => Self::WHITE_QUEENSIDE,
            Color::Black => Self::BLACK_QUEENSIDE,
        };
    }

    /// Revokes whichever right depends on the king or rook standing on `sq`.
    ///
    /// Called for both the origin and the destination of every move, which
    /// covers a king or rook leaving its origin and a rook captured in its corner.
    fn touch(&mut self, sq: Square) {
        match sq {
            Square::H1 => self.remove_kingside(Color::White),
            Square::A1 => self.remove_queenside(Color::White),
            Square::H8 => self.remove_kingside(Color::Black),
            Square::A8 => self.remove_queenside(Color::Black),
            Square::E1 => self.remove_color(Color::White),
            Square::E8 => self.remove_color(Color::Black),
            _ => {}
        }
    }

    /// Returns the raw flags.
    #[inline]
    pub const fn raw(self) -> u8 {
        self.0
    }

    fn to_fen_field(self) -> String {
        let mut s = String::new();
        if self.can_castle_kingside(Color::White) {
            s.push('K');
        }
        if self.can_castle_queenside(Color::White) {
            s.push('Q');
        }
        if self.can_castle_kingside(Color::Black) {
            s.push('k');
        }
        if self.can_castle_queenside(Color::Black) {
            s.push('q');
        }
        s
    }
}

/// The part of a board that decides threefold repetition: placement, side
/// to move, castling rights and en-passant target. Clocks are excluded.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RepetitionKey {
    placement: [Option<Piece>; 64],
    side_to_move: Color,
    castling: CastlingRights,
    en_passant: Option<Square>,
}

/// Complete state of one ply.
///
/// A `Board` is a value: [`Board::apply`] returns a new board and never
/// mutates its receiver.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Board {
    squares: [Option<Piece>; 64],
    side_to_move: Color,
    castling: CastlingRights,
    en_passant: Option<Square>,
    halfmove_clock: u32,
    fullmove_number: u32,
}

impl Board {
    /// Creates the standard starting position.
    pub fn startpos() -> Self {
        let mut squares = [None; 64];
        let back = [
            PieceKind::Rook,
            PieceKind::Knight,
            PieceKind::Bishop,
            PieceKind::Queen,
            PieceKind::King,
            PieceKind::Bishop,
            PieceKind::Knight,
            PieceKind::Rook,
        ];
        for (file, kind) in back.into_iter().enumerate() {
            squares[file] = Some(Piece::new(kind, Color::White));
            squares[8 + file] = Some(Piece::new(PieceKind::Pawn, Color::White));
            squares[48 + file] = Some(Piece::new(PieceKind::Pawn, Color::Black));
            squares[56 + file] = Some(Piece::new(kind, Color::Black));
        }
        Board {
            squares,
            side_to_move: Color::White,
            castling: CastlingRights::ALL,
            en_passant: None,
            halfmove_clock: 0,
            fullmove_number: 1,
        }
    }

    /// Creates a board from a FEN string.
    ///
    /// Rejects placements without exactly one king per side, and positions
    /// where the side that just moved is still in check. Castling rights
    /// whose king or rook is not on its origin square are dropped, as is an
    /// en-passant target no double push could have produced.
    pub fn from_fen(fen: &str) -> Result<Self, FenError> {
        let parsed = FenParser::parse(fen)?;

        for color in Color::BOTH {
            let count = parsed
                .placement
                .iter()
                .filter(|p| **p == Some(Piece::new(PieceKind::King, color)))
                .count();
            if count != 1 {
                return Err(FenError::InvalidKingCount { color, count });
            }
        }

        let mut castling = 0u8;
        for c in parsed.castling.chars() {
            castling |= match c {
                'K' => CastlingRights::WHITE_KINGSIDE,
                'Q' => CastlingRights::WHITE_QUEENSIDE,
                'k' => CastlingRights::BLACK_KINGSIDE,
                _ => CastlingRights::BLACK_QUEENSIDE,
            };
        }

        let mut board = Board {
            squares: parsed.placement,
            side_to_move: parsed.active_color,
            castling: CastlingRights::new(castling),
            en_passant: parsed.en_passant,
            halfmove_clock: parsed.halfmove_clock,
            fullmove_number: parsed.fullmove_number,
        };
        board.drop_stale_castling_rights();
        board.drop_stale_en_passant();

        let them = board.side_to_move.opposite();
        if board
            .king_square(them)
            .is_some_and(|king| board.attacks_on(king, board.side_to_move))
        {
            return Err(FenError::OpponentInCheck(them));
        }
        Ok(board)
    }

    /// Keeps the target only if an enemy pawn stands just past it and both
    /// the target and the square the pawn left are empty.
    fn drop_stale_en_passant(&mut self) {
        let Some(target) = self.en_passant else {
            return;
        };
        let dir = self.side_to_move.pawn_direction();
        let pawn = Some(Piece::new(PieceKind::Pawn, self.side_to_move.opposite()));
        let plausible = self.piece_at(target).is_none()
            && target.offset(0, -dir).is_some_and(|sq| self.piece_at(sq) == pawn)
            && target.offset(0, dir).is_some_and(|sq| self.piece_at(sq).is_none());
        if !plausible {
            self.en_passant = None;
        }
    }

    fn drop_stale_castling_rights(&mut self) {
        for color in Color::BOTH {
            let rank = color.back_rank();
            let at = |file| Square::new(file, rank);
            let king = Some(Piece::new(PieceKind::King, color));
            let rook = Some(Piece::new(PieceKind::Rook, color));
            if self.piece_at(at(File::E)) != king {
                self.castling.remove_color(color);
            }
            if self.piece_at(at(File::H)) != rook {
                self.castling.remove_kingside(color);
            }
            if self.piece_at(at(File::A)) != rook {
                self.castling.remove_queenside(color);
            }
        }
    }

    /// Converts the board to a FEN string.
    pub fn to_fen(&self) -> String {
        FenParser {
            placement: self.squares,
            active_color: self.side_to_move,
            castling: self.castling.to_fen_field(),
            en_passant: self.en_passant,
            halfmove_clock: self.halfmove_clock,
            fullmove_number: self.fullmove_number,
        }
        .to_fen()
    }

    /// Returns the piece on the given square, if any.
    #[inline]
    pub fn piece_at(&self, sq: Square) -> Option<Piece> {
        self.squares[sq.index() as usize]
    }

    /// Iterates over occupied squares from a1 to h8.
    pub fn pieces(&self) -> impl Iterator<Item = (Square, Piece)> + '_ {
        Square::all().filter_map(move |sq| self.piece_at(sq).map(|p| (sq, p)))
    }

    #[inline]
    pub fn side_to_move(&self) -> Color {
        self.side_to_move
    }

    #[inline]
    pub fn castling(&self) -> CastlingRights {
        self.castling
    }

    #[inline]
    pub fn en_passant(&self) -> Option<Square> {
        self.en_passant
    }

    /// Plies since the last pawn move or capture.
    #[inline]
    pub fn halfmove_clock(&self) -> u32 {
        self.halfmove_clock
    }

    /// Starts at 1 and increments after each Black move.
    #[inline]
    pub fn fullmove_number(&self) -> u32 {
        self.fullmove_number
    }

    /// Returns the square of the given side's king.
    pub fn king_square(&self, color: Color) -> Option<Square> {
        let king = Some(Piece::new(PieceKind::King, color));
        Square::all().find(|&sq| self.piece_at(sq) == king)
    }

    /// Returns true if any piece of `by` attacks `sq`.
    pub fn attacks_on(&self, sq: Square, by: Color) -> bool {
        is_square_attacked(self, sq, by)
    }

    /// Returns true if the side to move is in check.
    pub fn is_check(&self) -> bool {
        self.king_square(self.side_to_move)
            .is_some_and(|king| self.attacks_on(king, self.side_to_move.opposite()))
    }

    /// Returns the repetition-relevant part of this board.
    pub fn repetition_key(&self) -> RepetitionKey {
        RepetitionKey {
            placement: self.squares,
            side_to_move: self.side_to_move,
            castling: self.castling,
            en_passant: self.en_passant,
        }
    }

    /// Returns a new board with `m` played.
    ///
    /// Updates placement, castling rights, en-passant target and clocks. The
    /// move must come from this board's move generator; legality is not
    /// checked here. A move from an empty square returns an unchanged copy.
    pub fn apply(&self, m: Move) -> Board {
        let mut next = self.clone();
        let us = self.side_to_move;

        let Some(moving) = self.piece_at(m.from) else {
            return next;
        };

        let mut is_capture = self.piece_at(m.to).is_some();
        next.squares[m.from.index() as usize] = None;

        if m.is_en_passant() {
            // The captured pawn sits beside the origin, on the target's file.
            if let Some(victim) = m.to.offset(0, -us.pawn_direction()) {
                next.squares[victim.index() as usize] = None;
                is_capture = true;
            }
        }

        let placed = match m.promotion {
            Some(kind) => Piece::new(kind, us),
            None => moving,
        };
        next.squares[m.to.index() as usize] = Some(placed);

        if m.is_castling() {
            let rank = us.back_rank();
            let (rook_from, rook_to) = if m.flags.contains(MoveFlags::CASTLE_KINGSIDE) {
                (File::H, File::F)
            } else {
                (File::A, File::D)
            };
            let rook_from = Square::new(rook_from, rank);
            let rook_to = Square::new(rook_to, rank);
            next.squares[rook_from.index() as usize] = None;
            next.squares[rook_to.index() as usize] = Some(Piece::new(PieceKind::Rook, us));
        }

        next.castling.touch(m.from);
        next.castling.touch(m.to);

        next.en_passant = if m.is_double_push() {
            m.from.offset(0, us.pawn_direction())
        } else {
            None
        };

        if moving.kind == PieceKind::Pawn || is_capture {
            next.halfmove_clock = 0;
        } else {
            next.halfmove_clock = next.halfmove_clock.saturating_add(1);
        }

        if us == Color::Black {
            next.fullmove_number = next.fullmove_number.saturating_add(1);
        }
        next.side_to_move = us.opposite();

        next
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::startpos()
    }
}

/// Diagram with rank 8 at the top, White in uppercase and `.` for empty squares.
impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for rank in Rank::ALL.iter().rev() {
            write!(f, "{} ", rank.to_char())?;
            for file in File::ALL {
                let c = self
                    .piece_at(Square::new(file, *rank))
                    .map_or('.', Piece::to_fen_char);
                write!(f, " {}", c)?;
            }
            writeln!(f)?;
        }
        write!(f, "   a b c d e f g h")
    }
}
