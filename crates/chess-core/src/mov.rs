//! Move representation.

use crate::{PieceKind, Square};
use std::fmt;

/// Properties of a move derived by the move generator.
///
/// Several flags may be set at once (an en-passant capture is also a
/// capture; a capturing promotion carries `CAPTURE`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct MoveFlags(u8);

impl MoveFlags {
    pub const NONE: MoveFlags = MoveFlags(0);
    pub const CAPTURE: MoveFlags = MoveFlags(0b0_0001);
    pub const EN_PASSANT: MoveFlags = MoveFlags(0b0_0010);
    pub const CASTLE_KINGSIDE: MoveFlags = MoveFlags(0b0_0100);
    pub const CASTLE_QUEENSIDE: MoveFlags = MoveFlags(0b0_1000);
    pub const DOUBLE_PUSH: MoveFlags = MoveFlags(0b1_0000);

    /// Returns true if every flag in `other` is set.
    #[inline]
    pub const fn contains(self, other: MoveFlags) -> bool {
        self.0 & other.0 == other.0
    }

    /// Returns the union of both flag sets.
    #[inline]
    pub const fn with(self, other: MoveFlags) -> MoveFlags {
        MoveFlags(self.0 | other.0)
    }

    /// Returns true if no flag is set.
    #[inline]
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }
}

impl std::ops::BitOr for MoveFlags {
    type Output = MoveFlags;

    fn bitor(self, rhs: MoveFlags) -> MoveFlags {
        self.with(rhs)
    }
}

/// A chess move.
///
/// Legal moves are produced by the move generator, which fills in
/// [`MoveFlags`]. Callers build candidates with [`Move::candidate`] or
/// [`Move::from_uci`]; a candidate is accepted only if it
/// [matches](Move::matches) a generated legal move.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Move {
    pub from: Square,
    pub to: Square,
    pub promotion: Option<PieceKind>,
    pub flags: MoveFlags,
}

impl Move {
    /// Creates a move with the given flags.
    #[inline]
    pub const fn new(
        from: Square,
        to: Square,
        promotion: Option<PieceKind>,
        flags: MoveFlags,
    ) -> Self {
        Move {
            from,
            to,
            promotion,
            flags,
        }
    }

    /// Creates a candidate move as submitted by a player.
    #[inline]
    pub const fn candidate(from: Square, to: Square, promotion: Option<PieceKind>) -> Self {
        Self::new(from, to, promotion, MoveFlags::NONE)
    }

    /// Returns true if both moves name the same source, destination and
    /// promotion choice. Derived flags are not compared.
    #[inline]
    pub fn matches(&self, other: &Move) -> bool {
        self.from == other.from && self.to == other.to && self.promotion == other.promotion
    }

    #[inline]
    pub const fn is_capture(self) -> bool {
        self.flags.contains(MoveFlags::CAPTURE)
    }

    #[inline]
    pub const fn is_en_passant(self) -> bool {
        self.flags.contains(MoveFlags::EN_PASSANT)
    }

    #[inline]
    pub const fn is_castling(self) -> bool {
        self.flags.contains(MoveFlags::CASTLE_KINGSIDE)
            || self.flags.contains(MoveFlags::CASTLE_QUEENSIDE)
    }

    #[inline]
    pub const fn is_double_push(self) -> bool {
        self.flags.contains(MoveFlags::DOUBLE_PUSH)
    }

    /// Returns the UCI notation for this move (e.g., "e2e4", "e7e8q").
    pub fn to_uci(self) -> String {
        let promo = match self.promotion {
            Some(kind) => kind.letter().to_ascii_lowercase().to_string(),
            None => String::new(),
        };
        format!("{}{}{}", self.from, self.to, promo)
    }

    /// Parses a candidate move from UCI notation.
    ///
    /// The result carries no flags; the engine resolves it against the
    /// legal move list.
    pub fn from_uci(s: &str) -> Option<Self> {
        if !s.is_ascii() || s.len() < 4 || s.len() > 5 {
            return None;
        }
        let from = Square::from_algebraic(&s[0..2])?;
        let to = Square::from_algebraic(&s[2..4])?;
        let promotion = match s[4..].chars().next() {
            None => None,
            Some(c) => match PieceKind::from_letter(c.to_ascii_uppercase())? {
                PieceKind::Pawn | PieceKind::King => return None,
                kind => Some(kind),
            },
        };
        Some(Move::candidate(from, to, promotion))
    }

    /// Placeholder for fixed-capacity storage; never a legal move.
    pub const NULL: Move = Move::candidate(Square::A1, Square::A1, None);
}

impl fmt::Debug for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Move({})", self.to_uci())
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_uci())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{File, Rank};

    fn sq(s: &str) -> Square {
        Square::from_algebraic(s).unwrap()
    }

    #[test]
    fn flags_combine() {
        let flags = MoveFlags::CAPTURE | MoveFlags::EN_PASSANT;
        assert!(flags.contains(MoveFlags::CAPTURE));
        assert!(flags.contains(MoveFlags::EN_PASSANT));
        assert!(!flags.contains(MoveFlags::DOUBLE_PUSH));
        assert!(MoveFlags::NONE.is_empty());
    }

    #[test]
    fn move_accessors() {
        let m = Move::new(sq("e1"), sq("g1"), None, MoveFlags::CASTLE_KINGSIDE);
        assert!(m.is_castling());
        assert!(!m.is_capture());

        let ep = Move::new(
            sq("e5"),
            sq("d6"),
            None,
            MoveFlags::CAPTURE | MoveFlags::EN_PASSANT,
        );
        assert!(ep.is_capture());
        assert!(ep.is_en_passant());
    }

    #[test]
    fn candidate_matches_ignores_flags() {
        let generated = Move::new(sq("e2"), sq("e4"), None, MoveFlags::DOUBLE_PUSH);
        let candidate = Move::candidate(sq("e2"), sq("e4"), None);
        assert!(candidate.matches(&generated));
        assert_ne!(candidate, generated);

        let promo = Move::candidate(sq("e7"), sq("e8"), Some(PieceKind::Queen));
        let other = Move::candidate(sq("e7"), sq("e8"), Some(PieceKind::Rook));
        assert!(!promo.matches(&other));
        assert!(!promo.matches(&Move::candidate(sq("e7"), sq("e8"), None)));
    }

    #[test]
    fn move_uci() {
        let e2 = Square::new(File::E, Rank::R2);
        let e4 = Square::new(File::E, Rank::R4);
        assert_eq!(Move::candidate(e2, e4, None).to_uci(), "e2e4");
        assert_eq!(
            Move::candidate(sq("e7"), sq("e8"), Some(PieceKind::Knight)).to_uci(),
            "e7e8n"
        );
    }

    #[test]
    fn move_from_uci() {
        let m = Move::from_uci("e2e4").unwrap();
        assert_eq!(m.from, sq("e2"));
        assert_eq!(m.to, sq("e4"));
        assert_eq!(m.promotion, None);

        assert_eq!(
            Move::from_uci("e7e8Q").unwrap().promotion,
            Some(PieceKind::Queen)
        );
        assert_eq!(
            Move::from_uci("a2a1b").unwrap().promotion,
            Some(PieceKind::Bishop)
        );
    }

    #[test]
    fn move_from_uci_rejects_garbage() {
        assert!(Move::from_uci("invalid").is_none());
        assert!(Move::from_uci("e2e9").is_none());
        assert!(Move::from_uci("e2").is_none());
        assert!(Move::from_uci("e2e4qq").is_none());
        assert!(Move::from_uci("e7e8k").is_none());
        assert!(Move::from_uci("e7e8p").is_none());
        assert!(Move::from_uci("e7e8x").is_none());
        assert!(Move::from_uci("é2e4").is_none());
    }

    #[test]
    fn move_debug_display() {
        let m = Move::candidate(sq("g1"), sq("f3"), None);
        assert_eq!(format!("{:?}", m), "Move(g1f3)");
        assert_eq!(format!("{}", m), "g1f3");
    }
}
