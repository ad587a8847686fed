//! Pseudo-legal destination generation.
//!
//! Every piece kind walks fixed index offsets from its origin. An offset is only
//! accepted when the row actually changed by the expected amount, which is what
//! keeps e.g. a `+9` step from the h-file from reappearing on the a-file.

use crate::bitboard::Bitboard;
use crate::board::BoardState;
use crate::game_state::{EnPassant, GameState};
use crate::piece::{Color, PROMOTION_CHOICES, Piece, PieceKind};
use crate::square::Square;

/// One step along a direction: raw index offset and the row change it must produce.
#[derive(Debug, Clone, Copy)]
struct Step {
    offset: i8,
    row_delta: i8,
}

const fn step(offset: i8, row_delta: i8) -> Step {
    Step { offset, row_delta }
}

const DIAGONALS: [Step; 4] = [step(7, 1), step(9, 1), step(-7, -1), step(-9, -1)];
const ORTHOGONALS: [Step; 4] = [step(1, 0), step(-1, 0), step(8, 1), step(-8, -1)];
const KNIGHT_JUMPS: [Step; 8] = [
    step(17, 2),
    step(15, 2),
    step(10, 1),
    step(6, 1),
    step(-6, -1),
    step(-10, -1),
    step(-15, -2),
    step(-17, -2),
];

/// Longest ray on an 8×8 board.
const MAX_RAY: u8 = 8;

impl Step {
    /// Apply this step, rejecting results off the board or wrapped across an edge.
    #[inline]
    fn from(self, square: Square) -> Option<Square> {
        let next = square.offset(self.offset)?;
        (next.row() - square.row() == self.row_delta).then_some(next)
    }
}

/// How a chosen destination has to be executed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveKind {
    Normal,
    /// Captures the pawn on `victim`, which is not the destination square.
    EnPassantCapture { victim: Square },
    /// The pawn reaches its last row; one of `choices` has to be picked before committing.
    PromotionPending { choices: [PieceKind; 4] },
}

/// Result of generating moves for one piece.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MoveSet {
    pub origin: Square,
    pub piece: Piece,
    pub destinations: Bitboard,
    /// Set when one of the destinations is an en passant capture.
    pub en_passant: Option<EnPassant>,
}

impl MoveSet {
    /// Classify a destination. `None` if `to` is not among the destinations.
    pub fn kind_of(&self, to: Square) -> Option<MoveKind> {
        if !self.destinations.contains(to) {
            return None;
        }
        if self.piece.kind != PieceKind::Pawn {
            return Some(MoveKind::Normal);
        }
        if let Some(ep) = self.en_passant.filter(|ep| ep.target == to) {
            return Some(MoveKind::EnPassantCapture { victim: ep.victim });
        }
        if to.row() == self.piece.color.promotion_row() {
            return Some(MoveKind::PromotionPending {
                choices: PROMOTION_CHOICES,
            });
        }
        Some(MoveKind::Normal)
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.destinations.is_empty()
    }

    /// Same set with a restricted destination mask. The en passant offer is kept only
    /// while its target survives.
    pub fn restricted(self, destinations: Bitboard) -> Self {
        Self {
            destinations,
            en_passant: self.en_passant.filter(|ep| destinations.contains(ep.target)),
            ..self
        }
    }
}

/// Pseudo-legal destinations for `piece` standing on `origin`.
///
/// The result never contains a square held by a friendly piece, but may contain
/// moves that leave the mover's own king attacked.
pub fn pseudo_legal_moves(
    board: &BoardState,
    origin: Square,
    piece: Piece,
    state: &GameState,
) -> MoveSet {
    let (destinations, en_passant) = match piece.kind {
        PieceKind::Pawn => pawn_moves(board, origin, piece.color, state),
        PieceKind::Rook => (cast_rays(board, origin, piece.color, &ORTHOGONALS, MAX_RAY), None),
        PieceKind::Bishop => (cast_rays(board, origin, piece.color, &DIAGONALS, MAX_RAY), None),
        PieceKind::Queen => (
            cast_rays(board, origin, piece.color, &DIAGONALS, MAX_RAY)
                | cast_rays(board, origin, piece.color, &ORTHOGONALS, MAX_RAY),
            None,
        ),
        PieceKind::Knight => (knight_moves(board, origin, piece.color), None),
        // Castling is not generated.
        PieceKind::King => (
            cast_rays(board, origin, piece.color, &DIAGONALS, 1)
                | cast_rays(board, origin, piece.color, &ORTHOGONALS, 1),
            None,
        ),
    };

    MoveSet {
        origin,
        piece,
        destinations,
        en_passant,
    }
}

/// Walk each direction until the edge, a blocker or `max_steps`.
/// A blocking enemy is included as a capture, a blocking friend is not.
fn cast_rays(
    board: &BoardState,
    origin: Square,
    color: Color,
    directions: &[Step],
    max_steps: u8,
) -> Bitboard {
    let occupied = board.occupancy();
    let mut moves = Bitboard::EMPTY;

    for direction in directions {
        let mut current = origin;
        for _ in 0..max_steps {
            let Some(next) = direction.from(current) else {
                break;
            };
            if occupied.contains(next) {
                if board.is_enemy(color, next) {
                    moves.set(next);
                }
                break;
            }
            moves.set(next);
            current = next;
        }
    }

    moves
}

fn knight_moves(board: &BoardState, origin: Square, color: Color) -> Bitboard {
    let friendly = board.by_color(color);
    KNIGHT_JUMPS
        .iter()
        .filter_map(|jump| jump.from(origin))
        .filter(|to| !friendly.contains(*to))
        .collect()
}

fn pawn_moves(
    board: &BoardState,
    origin: Square,
    color: Color,
    state: &GameState,
) -> (Bitboard, Option<EnPassant>) {
    let occupied = board.occupancy();
    let forward = color.forward();
    let row_delta = forward / 8;
    let advance = step(forward, row_delta);
    let mut moves = Bitboard::EMPTY;

    if let Some(one) = advance.from(origin).filter(|sq| !occupied.contains(*sq)) {
        moves.set(one);
        if origin.row() == color.pawn_start_row() {
            if let Some(two) = advance.from(one).filter(|sq| !occupied.contains(*sq)) {
                moves.set(two);
            }
        }
    }

    for capture in [step(forward - 1, row_delta), step(forward + 1, row_delta)] {
        if let Some(to) = capture.from(origin) {
            if occupied.contains(to) && board.is_enemy(color, to) {
                moves.set(to);
            }
        }
    }

    let en_passant = en_passant_offer(origin, color, occupied, state);
    if let Some(ep) = en_passant {
        moves.set(ep.target);
    }

    (moves, en_passant)
}

/// An en passant capture is available when it is `color`'s turn, the pawn stands on
/// its fifth rank and the previous move was an enemy pawn advancing two rows to a
/// neighbouring file of the same row.
fn en_passant_offer(
    origin: Square,
    color: Color,
    occupied: Bitboard,
    state: &GameState,
) -> Option<EnPassant> {
    if origin.row() != color.en_passant_row() || state.side_to_move() != color {
        return None;
    }
    let last = state.last_move()?;
    if last.piece != Piece::new(PieceKind::Pawn, color.other()) || !last.is_double_pawn_advance() {
        return None;
    }
    if last.to.row() != origin.row() || (last.to.file() - origin.file()).abs() != 1 {
        return None;
    }
    let target = Square::from_coords(last.to.file(), origin.row() + color.forward() / 8)?;
    if occupied.contains(target) {
        return None;
    }
    Some(EnPassant {
        target,
        victim: last.to,
    })
}
