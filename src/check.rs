use crate::bitboard::Bitboard;
use crate::board::{BoardError, BoardState};
use crate::game_state::GameState;
use crate::movegen::pseudo_legal_moves;
use crate::piece::{Color, Piece};
use crate::square::Square;

/// Whether `color`'s king is attacked by any opposing piece.
///
/// Every opposing piece's pseudo-legal mask is generated and tested against the
/// king square; the first hit wins. Fails when `color` does not have exactly one king.
pub fn is_in_check(
    board: &BoardState,
    state: &GameState,
    color: Color,
) -> Result<bool, BoardError> {
    let king = board.king_square(color)?;
    Ok(pieces_of(board, color.other())
        .any(|(origin, piece)| attacks(board, state, origin, piece, king)))
}

/// Squares of the pieces giving check to `color`'s king.
pub fn checkers(
    board: &BoardState,
    state: &GameState,
    color: Color,
) -> Result<Bitboard, BoardError> {
    let king = board.king_square(color)?;
    Ok(pieces_of(board, color.other())
        .filter(|&(origin, piece)| attacks(board, state, origin, piece, king))
        .map(|(origin, _)| origin)
        .collect())
}

fn attacks(board: &BoardState, state: &GameState, origin: Square, piece: Piece, target: Square) -> bool {
    pseudo_legal_moves(board, origin, piece, state)
        .destinations
        .contains(target)
}

/// Every `(square, piece)` owned by `color`.
fn pieces_of(board: &BoardState, color: Color) -> impl Iterator<Item = (Square, Piece)> + '_ {
    Piece::ALL
        .into_iter()
        .filter(move |piece| piece.color == color)
        .flat_map(move |piece| board.mask(piece).map(move |square| (square, piece)))
}
