use log::trace;

use crate::board::BoardState;
use crate::check::is_in_check;
use crate::executor::{Move, MoveError, Probe, Special};
use crate::game_state::GameState;
use crate::movegen::{MoveKind, MoveSet};
use crate::piece::PieceKind;
use crate::square::Square;

/// Drop every destination after which the mover's own king would be attacked.
///
/// Each candidate is probed on the board and reverted before the next one, so the
/// board is unchanged when this returns, including on error.
pub fn filter_check_safety(
    board: &mut BoardState,
    state: &GameState,
    moves: MoveSet,
) -> Result<MoveSet, MoveError> {
    let color = moves.piece.color;
    let mut safe = moves.destinations;

    for to in moves.destinations {
        let probe = Probe::apply(board, candidate(&moves, to))?;
        if is_in_check(&probe, state, color)? {
            trace!("{} {}{} leaves king attacked", moves.piece, moves.origin, to);
            safe.clear(to);
        }
    }

    Ok(moves.restricted(safe))
}

/// The move a destination stands for. Promotions probe as a queen; the promoted
/// kind cannot change whether the own king is exposed.
fn candidate(moves: &MoveSet, to: Square) -> Move {
    let special = match moves.kind_of(to) {
        Some(MoveKind::EnPassantCapture { victim }) => Special::EnPassant { victim },
        Some(MoveKind::PromotionPending { .. }) => Special::Promotion(PieceKind::Queen),
        Some(MoveKind::Normal) | None => Special::None,
    };
    Move::new(moves.origin, to).with_special(special)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bitboard::Bitboard;
    use crate::board::BoardError;
    use crate::game_state::LastMove;
    use crate::movegen::pseudo_legal_moves;
    use crate::piece::{Color, Piece};

    fn sq(s: &str) -> Square {
        s.parse().expect("valid square")
    }

    fn squares(list: &[&str]) -> Bitboard {
        list.iter().map(|s| sq(s)).collect()
    }

    fn generate(board: &BoardState, state: &GameState, origin: &str) -> MoveSet {
        let origin = sq(origin);
        let piece = board.piece_at(origin).expect("piece at origin");
        pseudo_legal_moves(board, origin, piece, state)
    }

    #[test]
    fn test_interpose_or_capture_resolves_slider_check() {
        // Rook e8 checks the king on e1; the rook on a4 can block on e4 only,
        // the bishop on b5 can capture on e8 or block on e2.
        let mut board = BoardState::from_placements([
            ('K', "e1"),
            ('R', "a4"),
            ('B', "b5"),
            ('r', "e8"),
            ('k', "h8"),
        ])
        .unwrap();
        let state = GameState::new();
        let before = board;

        let rook = generate(&board, &state, "a4");
        let safe = filter_check_safety(&mut board, &state, rook).unwrap();
        assert_eq!(safe.destinations, squares(&["e4"]));

        let bishop = generate(&board, &state, "b5");
        let safe = filter_check_safety(&mut board, &state, bishop).unwrap();
        assert_eq!(safe.destinations, squares(&["e8", "e2"]));

        assert_eq!(board, before);
    }

    #[test]
    fn test_king_must_leave_attacked_line() {
        let mut board =
            BoardState::from_placements([('K', "e1"), ('r', "e8"), ('k', "h8")]).unwrap();
        let state = GameState::new();

        let king = generate(&board, &state, "e1");
        let safe = filter_check_safety(&mut board, &state, king).unwrap();

        assert_eq!(safe.destinations, squares(&["d1", "f1", "d2", "f2"]));
    }

    #[test]
    fn test_pinned_piece_restricted_to_pin_line() {
        let mut board = BoardState::from_placements([
            ('K', "e1"),
            ('R', "e3"),
            ('r', "e8"),
            ('k', "h8"),
        ])
        .unwrap();
        let state = GameState::new();

        let rook = generate(&board, &state, "e3");
        let safe = filter_check_safety(&mut board, &state, rook).unwrap();

        assert_eq!(
            safe.destinations,
            squares(&["e2", "e4", "e5", "e6", "e7", "e8"])
        );
    }

    #[test]
    fn test_en_passant_capture_that_resolves_check_survives() {
        // d7-d5 gives check to the king on e4; exd6 en passant removes the checker.
        let mut board = BoardState::from_placements([
            ('K', "e4"),
            ('P', "e5"),
            ('p', "d5"),
            ('k', "h8"),
        ])
        .unwrap();
        let mut state = GameState::new();
        state.half_moves = 2;
        state.last_move = Some(LastMove {
            from: sq("d7"),
            to: sq("d5"),
            piece: Piece::new(crate::piece::PieceKind::Pawn, Color::Black),
        });

        let pawn = generate(&board, &state, "e5");
        let safe = filter_check_safety(&mut board, &state, pawn).unwrap();

        assert!(safe.destinations.contains(sq("d6")));
        assert!(!safe.destinations.contains(sq("e6")));
        assert!(safe.en_passant.is_some());
    }

    #[test]
    fn test_missing_king_error_leaves_board_intact() {
        let mut board = BoardState::from_placements([('R', "a1"), ('k', "h8")]).unwrap();
        let before = board;
        let state = GameState::new();

        let rook = generate(&board, &state, "a1");
        let result = filter_check_safety(&mut board, &state, rook);

        assert_eq!(result, Err(MoveError::Board(BoardError::MissingKing(Color::White))));
        assert_eq!(board, before);
    }
}
