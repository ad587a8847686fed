use std::fmt;

use crate::piece::{Color, Piece, PieceKind};
use crate::square::Square;

/// The previous committed move: origin, destination and the piece that ended up on `to`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LastMove {
    pub from: Square,
    pub to: Square,
    pub piece: Piece,
}

impl LastMove {
    /// Four-character square-pair notation, e.g. `e2e4`.
    pub fn notation(&self) -> String {
        self.to_string()
    }

    /// True if this was a pawn advancing two rows.
    pub fn is_double_pawn_advance(&self) -> bool {
        self.piece.kind == PieceKind::Pawn && (self.to.row() - self.from.row()).abs() == 2
    }
}

impl fmt::Display for LastMove {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.from, self.to)
    }
}

/// An en passant capture offered by the generator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EnPassant {
    /// Destination of the capturing pawn.
    pub target: Square,
    /// Square of the pawn that gets captured.
    pub victim: Square,
}

/// Castling permissions for one side. Stored, never consulted by move generation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CastleRights {
    pub short: bool,
    pub long: bool,
}

impl Default for CastleRights {
    fn default() -> Self {
        Self {
            short: true,
            long: true,
        }
    }
}

/// Turn and special-rule bookkeeping that lives alongside the board.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GameState {
    pub(crate) half_moves: u32,
    pub(crate) last_move: Option<LastMove>,
    pub(crate) en_passant: Option<EnPassant>,
    pub(crate) promotion_pending: bool,
    pub(crate) in_check: bool,
    pub(crate) castling: [CastleRights; 2],
}

impl GameState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of committed half-moves.
    #[inline]
    pub fn half_moves(&self) -> u32 {
        self.half_moves
    }

    /// Even half-move count: white to move.
    #[inline]
    pub fn side_to_move(&self) -> Color {
        if self.half_moves % 2 == 0 {
            Color::White
        } else {
            Color::Black
        }
    }

    #[inline]
    pub fn last_move(&self) -> Option<&LastMove> {
        self.last_move.as_ref()
    }

    pub fn last_move_notation(&self) -> Option<String> {
        self.last_move.map(|mv| mv.notation())
    }

    /// En passant capture offered by the most recent generation, cleared by the next commit.
    #[inline]
    pub fn en_passant(&self) -> Option<EnPassant> {
        self.en_passant
    }

    #[inline]
    pub fn en_passant_pending(&self) -> bool {
        self.en_passant.is_some()
    }

    /// A pawn has reached its last row and waits for a promotion kind.
    #[inline]
    pub fn promotion_pending(&self) -> bool {
        self.promotion_pending
    }

    /// Whether the side to move is in check.
    #[inline]
    pub fn in_check(&self) -> bool {
        self.in_check
    }

    pub fn castle_rights(&self, color: Color) -> CastleRights {
        self.castling[color_slot(color)]
    }

    pub(crate) fn set_castle_rights(&mut self, color: Color, rights: CastleRights) {
        self.castling[color_slot(color)] = rights;
    }

    pub(crate) fn offer_en_passant(&mut self, offer: Option<EnPassant>) {
        self.en_passant = offer;
    }

    pub(crate) fn set_promotion_pending(&mut self, pending: bool) {
        self.promotion_pending = pending;
    }

    /// Advance the turn after a committed move and drop the one-shot flags.
    pub(crate) fn record_commit(&mut self, last: LastMove, opponent_in_check: bool) {
        // Parity still alternates across the wrap.
        self.half_moves = self.half_moves.wrapping_add(1);
        self.last_move = Some(last);
        self.in_check = opponent_in_check;
        self.en_passant = None;
        self.promotion_pending = false;
    }
}

fn color_slot(color: Color) -> usize {
    match color {
        Color::White => 0,
        Color::Black => 1,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sq(s: &str) -> Square {
        s.parse().expect("valid square")
    }

    #[test]
    fn test_side_to_move_follows_parity() {
        let mut state = GameState::new();
        assert_eq!(state.side_to_move(), Color::White);
        state.half_moves = 1;
        assert_eq!(state.side_to_move(), Color::Black);
        state.half_moves = 42;
        assert_eq!(state.side_to_move(), Color::White);
    }

    #[test]
    fn test_commit_after_last_half_move_wraps() {
        let mut state = GameState::new();
        state.half_moves = u32::MAX;
        assert_eq!(state.side_to_move(), Color::Black);
        let last = LastMove {
            from: sq("e7"),
            to: sq("e5"),
            piece: Piece::new(PieceKind::Pawn, Color::Black),
        };
        state.record_commit(last, false);
        assert_eq!(state.half_moves(), 0);
        assert_eq!(state.side_to_move(), Color::White);
    }

    #[test]
    fn test_notation() {
        let mv = LastMove {
            from: sq("e2"),
            to: sq("e4"),
            piece: Piece::new(PieceKind::Pawn, Color::White),
        };
        assert_eq!(mv.notation(), "e2e4");
        assert!(mv.is_double_pawn_advance());
    }

    #[test]
    fn test_knight_move_is_not_double_advance() {
        let mv = LastMove {
            from: sq("g1"),
            to: sq("f3"),
            piece: Piece::new(PieceKind::Knight, Color::White),
        };
        assert!(!mv.is_double_pawn_advance());
    }

    #[test]
    fn test_record_commit_clears_one_shot_flags() {
        let mut state = GameState::new();
        state.offer_en_passant(Some(EnPassant {
            target: sq("d6"),
            victim: sq("d5"),
        }));
        state.set_promotion_pending(true);

        let last = LastMove {
            from: sq("e5"),
            to: sq("d6"),
            piece: Piece::new(PieceKind::Pawn, Color::White),
        };
        state.record_commit(last, true);

        assert_eq!(state.half_moves(), 1);
        assert!(!state.en_passant_pending());
        assert!(!state.promotion_pending());
        assert!(state.in_check());
        assert_eq!(state.last_move_notation().as_deref(), Some("e5d6"));
    }

    #[test]
    fn test_castle_rights_default_and_update() {
        let mut state = GameState::new();
        assert_eq!(state.castle_rights(Color::Black), CastleRights::default());
        state.set_castle_rights(
            Color::Black,
            CastleRights {
                short: false,
                long: true,
            },
        );
        assert!(!state.castle_rights(Color::Black).short);
        assert!(state.castle_rights(Color::White).short);
    }
}
