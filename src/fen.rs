//! Loading positions from FEN.
//!
//! Parsing is delegated to `shakmaty`; the parsed setup is converted into our own
//! board masks and turn bookkeeping.

use std::num::NonZeroU32;

use shakmaty::fen::{Fen, ParseFenError};
use shakmaty::{CastlingMode, Chess, PositionError};

use crate::board::{BoardError, BoardState};
use crate::check::is_in_check;
use crate::game_state::{CastleRights, GameState, LastMove};
use crate::piece::{Color, Piece, PieceKind};
use crate::square::Square;

pub const STARTING_FEN: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";

#[derive(Debug, thiserror::Error)]
pub enum FenError {
    #[error("invalid FEN: {0}")]
    Parse(#[from] ParseFenError),
    #[error("unplayable position: {0}")]
    Board(#[from] BoardError),
    #[error("illegal position: {0}")]
    Position(#[from] PositionError<Chess>),
    #[error("fullmove number {0} is out of range")]
    MoveNumber(u32),
}

/// Parse a FEN string into a board and the matching game state.
///
/// The side to move sets the half-move parity, castling rights are copied, and an
/// en passant square is turned into the double pawn advance that created it.
///
/// Positions shakmaty does not accept as standard chess are rejected, including
/// ones where the side not to move is in check.
pub fn parse(fen: &str) -> Result<(BoardState, GameState), FenError> {
    let fen = fen.parse::<Fen>()?;
    let setup = fen.clone().into_setup();

    let mut board = BoardState::empty();
    for their_square in setup.board.occupied() {
        let Some(their_piece) = setup.board.piece_at(their_square) else {
            continue;
        };
        if let Some(square) = Square::new(u8::from(their_square)) {
            board.set_bit(convert_piece(their_piece), square);
        }
    }
    board.validate()?;
    fen.into_position::<Chess>(CastlingMode::Standard)?;

    let side = convert_color(setup.turn);
    let mut state = GameState::new();
    state.half_moves = half_moves(setup.fullmoves, side)?;

    let rights = |short: shakmaty::Square, long: shakmaty::Square| CastleRights {
        short: setup.castling_rights.contains(short),
        long: setup.castling_rights.contains(long),
    };
    state.set_castle_rights(Color::White, rights(shakmaty::Square::H1, shakmaty::Square::A1));
    state.set_castle_rights(Color::Black, rights(shakmaty::Square::H8, shakmaty::Square::A8));

    state.last_move = setup
        .ep_square
        .and_then(|ep| Square::new(u8::from(ep)))
        .and_then(|ep| double_advance_behind(&board, ep, side));

    state.in_check = is_in_check(&board, &state, side)?;
    Ok((board, state))
}

/// Half-moves played before `fullmoves` with `side` to move.
fn half_moves(fullmoves: NonZeroU32, side: Color) -> Result<u32, FenError> {
    let parity = match side {
        Color::White => 0,
        Color::Black => 1,
    };
    (fullmoves.get() - 1)
        .checked_mul(2)
        .and_then(|n| n.checked_add(parity))
        .ok_or(FenError::MoveNumber(fullmoves.get()))
}

/// The opponent's double advance that leaves `ep` as the en passant square.
fn double_advance_behind(board: &BoardState, ep: Square, side: Color) -> Option<LastMove> {
    let step = side.forward() / 8;
    let to = Square::from_coords(ep.file(), ep.row() - step)?;
    let from = Square::from_coords(ep.file(), ep.row() + step)?;
    let pawn = Piece::new(PieceKind::Pawn, side.other());
    board.test_bit(pawn, to).then_some(LastMove {
        from,
        to,
        piece: pawn,
    })
}

fn convert_color(color: shakmaty::Color) -> Color {
    match color {
        shakmaty::Color::White => Color::White,
        shakmaty::Color::Black => Color::Black,
    }
}

fn convert_piece(piece: shakmaty::Piece) -> Piece {
    let kind = match piece.role {
        shakmaty::Role::Pawn => PieceKind::Pawn,
        shakmaty::Role::Knight => PieceKind::Knight,
        shakmaty::Role::Bishop => PieceKind::Bishop,
        shakmaty::Role::Rook => PieceKind::Rook,
        shakmaty::Role::Queen => PieceKind::Queen,
        shakmaty::Role::King => PieceKind::King,
    };
    Piece::new(kind, convert_color(piece.color))
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    fn sq(s: &str) -> Square {
        s.parse().expect("valid square")
    }

    #[test]
    fn test_starting_fen_matches_start_position() {
        let (board, state) = parse(STARTING_FEN).unwrap();
        assert_eq!(board, BoardState::new());
        assert_eq!(state, GameState::new());
    }

    #[test]
    fn test_black_to_move_sets_odd_parity() {
        let (_, state) =
            parse("rnbqkbnr/pppppppp/8/8/4P3/8/PPPP1PPP/RNBQKBNR b KQkq - 0 1").unwrap();
        assert_eq!(state.half_moves(), 1);
        assert_eq!(state.side_to_move(), Color::Black);
    }

    #[test]
    fn test_fullmove_number_sets_half_moves() {
        let (_, state) = parse("4k3/8/8/8/8/8/8/4K3 w - - 0 12").unwrap();
        assert_eq!(state.half_moves(), 22);
    }

    #[test_case("4k3/8/8/8/8/8/8/4K3 w - - 0 2147483648", u32::MAX - 1; "largest white")]
    #[test_case("4k3/8/8/8/8/8/8/4K3 b - - 0 2147483648", u32::MAX; "largest black")]
    fn test_large_fullmove_numbers_fit(fen_str: &str, expected: u32) {
        let (_, state) = parse(fen_str).unwrap();
        assert_eq!(state.half_moves(), expected);
    }

    #[test_case("4k3/8/8/8/8/8/8/4K3 w - - 0 4294967295"; "u32 max")]
    #[test_case("4k3/8/8/8/8/8/8/4K3 b - - 0 2147483649"; "just past")]
    fn test_fullmove_overflow_is_rejected(fen_str: &str) {
        assert!(matches!(parse(fen_str), Err(FenError::MoveNumber(_))));
    }

    #[test_case("4k3/8/8/8/8/8/8/4RK2 w - - 0 1"; "side not to move in check")]
    #[test_case("4k3/8/8/8/8/8/PPPPPPPP/PPPPK3 w - - 0 1"; "too many pawns")]
    fn test_illegal_position_is_rejected(fen_str: &str) {
        assert!(matches!(parse(fen_str), Err(FenError::Position(_))));
    }

    #[test]
    fn test_en_passant_square_becomes_last_move() {
        let (_, state) =
            parse("rnbqkbnr/1pp1pppp/p7/3pP3/8/8/PPPP1PPP/RNBQKBNR w KQkq d6 0 3").unwrap();
        let last = state.last_move().expect("synthesized double advance");
        assert_eq!(last.notation(), "d7d5");
        assert_eq!(last.piece, Piece::new(PieceKind::Pawn, Color::Black));
    }

    #[test]
    fn test_castling_rights_loaded() {
        let (_, state) = parse("r3k2r/8/8/8/8/8/8/R3K2R w Kq - 0 1").unwrap();
        assert_eq!(
            state.castle_rights(Color::White),
            CastleRights {
                short: true,
                long: false
            }
        );
        assert_eq!(
            state.castle_rights(Color::Black),
            CastleRights {
                short: false,
                long: true
            }
        );
    }

    #[test]
    fn test_check_flag_loaded() {
        let (_, state) = parse("4k3/8/8/8/8/8/8/R3K2r w - - 0 1").unwrap();
        assert!(state.in_check());
    }

    #[test]
    fn test_piece_placement() {
        let (board, _) = parse("4k3/8/8/3q4/8/8/8/4K2R w K - 0 1").unwrap();
        assert_eq!(board.piece_at(sq("d5")).map(Piece::symbol), Some('q'));
        assert_eq!(board.piece_at(sq("h1")).map(Piece::symbol), Some('R'));
        assert_eq!(board.occupancy().count(), 4);
    }

    #[test]
    fn test_invalid_fen_is_rejected() {
        assert!(matches!(parse("not a fen"), Err(FenError::Parse(_))));
    }

    #[test]
    fn test_missing_king_is_rejected() {
        assert!(matches!(
            parse("8/8/8/8/8/8/8/4K3 w - - 0 1"),
            Err(FenError::Board(BoardError::MissingKing(Color::Black)))
        ));
    }
}
