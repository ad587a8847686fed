//! Applying moves to the board.
//!
//! A move is either committed, which advances [`GameState`], or probed, which only
//! touches the board and hands back an [`Undo`] record that restores it exactly.

use std::ops::Deref;

use log::trace;

use crate::board::{BoardError, BoardState};
use crate::check::is_in_check;
use crate::game_state::{GameState, LastMove};
use crate::piece::{Piece, PieceKind};
use crate::square::Square;

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum MoveError {
    #[error("no piece on {0}")]
    NoPieceAtOrigin(Square),
    #[error("cannot promote to {0:?}")]
    InvalidPromotion(PieceKind),
    #[error(transparent)]
    Board(#[from] BoardError),
}

/// Extra work a move performs beyond relocating the piece.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Special {
    #[default]
    None,
    /// The captured pawn stands on `victim` rather than on the destination.
    EnPassant { victim: Square },
    /// The moving pawn becomes this kind on arrival.
    Promotion(PieceKind),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Move {
    pub from: Square,
    pub to: Square,
    pub special: Special,
}

impl Move {
    pub const fn new(from: Square, to: Square) -> Self {
        Self {
            from,
            to,
            special: Special::None,
        }
    }

    pub const fn with_special(self, special: Special) -> Self {
        Self { special, ..self }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApplyMode {
    /// Permanent: advances the turn and records the move.
    Commit,
    /// Reversible: only the board changes, the returned [`Undo`] restores it.
    Probe,
}

/// Everything needed to take a move back.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Undo {
    pub mv: Move,
    /// Piece that left `mv.from`.
    pub moved: Piece,
    /// Piece that arrived on `mv.to`; differs from `moved` on promotion.
    pub placed: Piece,
    /// Captured piece and the square it vanished from.
    pub captured: Option<(Piece, Square)>,
}

impl Undo {
    /// Restores the board to its state before the move, bit for bit.
    pub fn revert(self, board: &mut BoardState) {
        board.clear_bit(self.placed, self.mv.to);
        board.set_bit(self.moved, self.mv.from);
        if let Some((piece, square)) = self.captured {
            board.set_bit(piece, square);
        }
    }
}

/// Outcome of [`apply_move`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Applied {
    Committed(LastMove),
    Probed(Undo),
}

/// Apply `mv` in the given mode.
///
/// Does not check that `mv` was generated; callers only pass destinations drawn
/// from a generated mask.
pub fn apply_move(
    board: &mut BoardState,
    state: &mut GameState,
    mv: Move,
    mode: ApplyMode,
) -> Result<Applied, MoveError> {
    match mode {
        ApplyMode::Commit => commit(board, state, mv).map(Applied::Committed),
        ApplyMode::Probe => relocate(board, mv).map(Applied::Probed),
    }
}

/// Apply `mv` permanently, advance the turn and recompute the check flag for the
/// side that now has to move.
pub fn commit(board: &mut BoardState, state: &mut GameState, mv: Move) -> Result<LastMove, MoveError> {
    let undo = relocate(board, mv)?;
    let mover = undo.moved.color;
    let opponent_in_check = match is_in_check(board, state, mover.other()) {
        Ok(in_check) => in_check,
        Err(e) => {
            undo.revert(board);
            return Err(e.into());
        }
    };

    let last = LastMove {
        from: mv.from,
        to: mv.to,
        piece: undo.placed,
    };
    state.record_commit(last, opponent_in_check);
    Ok(last)
}

/// Move the piece and remove any capture, touching only the board.
fn relocate(board: &mut BoardState, mv: Move) -> Result<Undo, MoveError> {
    let moved = board
        .piece_at(mv.from)
        .ok_or(MoveError::NoPieceAtOrigin(mv.from))?;

    let placed = match mv.special {
        Special::Promotion(kind) if kind.is_promotion_choice() => Piece::new(kind, moved.color),
        Special::Promotion(kind) => return Err(MoveError::InvalidPromotion(kind)),
        _ => moved,
    };

    let capture_square = match mv.special {
        Special::EnPassant { victim } => victim,
        _ => mv.to,
    };
    let captured = board
        .piece_at(capture_square)
        .filter(|_| capture_square != mv.from)
        .map(|piece| (piece, capture_square));

    if let Some((piece, square)) = captured {
        board.clear_bit(piece, square);
    }
    board.clear_bit(moved, mv.from);
    board.set_bit(placed, mv.to);

    Ok(Undo {
        mv,
        moved,
        placed,
        captured,
    })
}

/// A move applied for inspection. The board is restored when the guard drops.
#[derive(Debug)]
pub struct Probe<'a> {
    board: &'a mut BoardState,
    undo: Undo,
}

impl<'a> Probe<'a> {
    pub fn apply(board: &'a mut BoardState, mv: Move) -> Result<Self, MoveError> {
        let undo = relocate(board, mv)?;
        trace!("probe {}{}", mv.from, mv.to);
        Ok(Self { board, undo })
    }

    pub fn undo(&self) -> &Undo {
        &self.undo
    }
}

impl Deref for Probe<'_> {
    type Target = BoardState;

    fn deref(&self) -> &BoardState {
        &*self.board
    }
}

impl Drop for Probe<'_> {
    fn drop(&mut self) {
        self.undo.revert(&mut *self.board);
        trace!("revert {}{}", self.undo.mv.from, self.undo.mv.to);
    }
}
