use crate::bitboard::Bitboard;
use crate::board::Grid;
use crate::movegen::{MoveKind, MoveSet};
use crate::piece::Color;
use crate::square::Square;

/// Type of visual feedback for an individual square
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SquareFeedback {
    /// The selected piece
    Origin,
    /// Legal destination for the selected piece
    Destination,
    /// Moving here captures an opponent piece
    Capture,
    /// King of the side to move, currently attacked
    Check,
    /// Piece giving check
    Checker,
}

/// Squares and their highlight for the current board state.
///
/// Computed by [`compute_feedback`] and consumed by a [`BoardDisplay`](crate::BoardDisplay).
/// A square holds at most one highlight; a later [`set`](Self::set) replaces an earlier one.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct BoardFeedback {
    squares: Vec<(Square, SquareFeedback)>,
}

impl BoardFeedback {
    /// Create empty feedback (no highlights)
    #[inline]
    pub const fn new() -> Self {
        Self {
            squares: Vec::new(),
        }
    }

    /// Get all square feedback entries
    #[inline]
    pub fn squares(&self) -> &[(Square, SquareFeedback)] {
        &self.squares
    }

    /// Get feedback for a specific square, if any
    #[inline]
    pub fn get(&self, square: Square) -> Option<SquareFeedback> {
        self.squares
            .iter()
            .find(|(sq, _)| *sq == square)
            .map(|(_, feedback)| *feedback)
    }

    /// Highlight `square`, replacing any earlier highlight on it.
    pub fn set(&mut self, square: Square, feedback: SquareFeedback) {
        match self.squares.iter_mut().find(|(sq, _)| *sq == square) {
            Some(entry) => entry.1 = feedback,
            None => self.squares.push((square, feedback)),
        }
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.squares.is_empty()
    }
}

impl From<Vec<(Square, SquareFeedback)>> for BoardFeedback {
    fn from(entries: Vec<(Square, SquareFeedback)>) -> Self {
        let mut feedback = Self::new();
        for (square, kind) in entries {
            feedback.set(square, kind);
        }
        feedback
    }
}

/// Where the side to move is in check from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CheckInfo {
    pub king_square: Square,
    pub checkers: Bitboard,
}

/// Game state information needed to compute feedback
pub trait FeedbackSource {
    /// Moves of the currently selected piece, if any.
    fn selected_moves(&self) -> Option<&MoveSet>;

    /// Origin and destination of a move waiting for its promotion choice.
    fn pending_promotion(&self) -> Option<(Square, Square)>;

    /// Whether any piece stands on `square`.
    fn is_occupied(&self, square: Square) -> bool;

    /// Check details for the side to move, if it is in check.
    fn check_info(&self) -> Option<CheckInfo>;
}

/// Compute visual feedback based on current game state.
///
/// - Check: the attacked king and its checkers
/// - Piece selected: origin plus destinations, captures marked separately
/// - Promotion pending: only the origin and the promotion square
pub fn compute_feedback(source: &impl FeedbackSource) -> BoardFeedback {
    let mut feedback = BoardFeedback::new();

    if let Some(info) = source.check_info() {
        feedback.set(info.king_square, SquareFeedback::Check);
        for checker in info.checkers {
            feedback.set(checker, SquareFeedback::Checker);
        }
    }

    if let Some((origin, destination)) = source.pending_promotion() {
        feedback.set(origin, SquareFeedback::Origin);
        feedback.set(destination, SquareFeedback::Destination);
    } else if let Some(moves) = source.selected_moves() {
        feedback.set(moves.origin, SquareFeedback::Origin);
        for to in moves.destinations {
            feedback.set(to, classify(source, moves, to));
        }
    }

    feedback
}

fn classify(source: &impl FeedbackSource, moves: &MoveSet, to: Square) -> SquareFeedback {
    let en_passant = matches!(
        moves.kind_of(to),
        Some(MoveKind::EnPassantCapture { .. })
    );
    if en_passant || source.is_occupied(to) {
        SquareFeedback::Capture
    } else {
        SquareFeedback::Destination
    }
}

/// Everything a display needs to draw one frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoardView {
    pub grid: Grid,
    pub feedback: BoardFeedback,
    pub side_to_move: Color,
    pub in_check: bool,
    pub last_move: Option<String>,
    pub promotion_pending: bool,
}
