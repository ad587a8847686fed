use log::{debug, warn};

use crate::bitboard::Bitboard;
use crate::board::{BoardError, BoardState, Grid, PieceDescriptor};
use crate::check::checkers;
use crate::config::RulesConfig;
use crate::executor::{Move, MoveError, Special, commit};
use crate::feedback::{BoardView, CheckInfo, FeedbackSource, compute_feedback};
use crate::fen::{self, FenError};
use crate::game_state::{GameState, LastMove};
use crate::legality::filter_check_safety;
use crate::movegen::{MoveKind, MoveSet, pseudo_legal_moves};
use crate::piece::{Color, PieceKind};
use crate::square::Square;

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum GameError {
    #[error("no promotion is pending")]
    NoPromotionPending,
    #[error("{0:?} is not a promotion choice")]
    InvalidPromotionChoice(PieceKind),
    #[error(transparent)]
    Move(#[from] MoveError),
    #[error(transparent)]
    Board(#[from] BoardError),
}

impl GameError {
    /// Misuse of the selection protocol, as opposed to a broken board.
    pub fn is_rejected_input(&self) -> bool {
        matches!(
            self,
            GameError::NoPromotionPending | GameError::InvalidPromotionChoice(_)
        )
    }
}

/// Where the controller is in the select, move, promote cycle.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Selection {
    #[default]
    Idle,
    Selected { moves: MoveSet },
    AwaitingPromotion { origin: Square, destination: Square },
}

/// One action from the player.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Input {
    Select(Square),
    Promote(PieceKind),
}

/// What an input did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    /// Nothing changed.
    Ignored,
    Selected {
        origin: Square,
        destinations: Bitboard,
    },
    /// Back to idle without a move.
    Deselected,
    AwaitingPromotion {
        origin: Square,
        destination: Square,
        choices: [PieceKind; 4],
    },
    Committed(LastMove),
}

/// A game in progress: the board, turn bookkeeping and the player's selection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Game {
    board: BoardState,
    state: GameState,
    selection: Selection,
    config: RulesConfig,
}

impl Default for Game {
    fn default() -> Self {
        Self::new()
    }
}

impl Game {
    /// Standard starting position with the default rules.
    pub fn new() -> Self {
        Self::with_config(RulesConfig::default())
    }

    pub fn with_config(config: RulesConfig) -> Self {
        Self::from_parts(BoardState::new(), GameState::new(), config)
    }

    /// Load a position from FEN.
    pub fn from_fen(fen: &str, config: RulesConfig) -> Result<Self, FenError> {
        let (board, state) = fen::parse(fen)?;
        Ok(Self::from_parts(board, state, config))
    }

    fn from_parts(board: BoardState, state: GameState, config: RulesConfig) -> Self {
        Self {
            board,
            state,
            selection: Selection::Idle,
            config,
        }
    }

    #[inline]
    pub fn board(&self) -> &BoardState {
        &self.board
    }

    #[inline]
    pub fn state(&self) -> &GameState {
        &self.state
    }

    #[inline]
    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    #[inline]
    pub fn config(&self) -> RulesConfig {
        self.config
    }

    #[inline]
    pub fn side_to_move(&self) -> Color {
        self.state.side_to_move()
    }

    #[inline]
    pub fn in_check(&self) -> bool {
        self.state.in_check()
    }

    pub fn last_move_notation(&self) -> Option<String> {
        self.state.last_move_notation()
    }

    pub fn descriptors(&self) -> [PieceDescriptor; 12] {
        self.board.descriptors()
    }

    pub fn grid(&self) -> Grid {
        self.board.grid()
    }

    /// Destinations for the piece on `origin`, filtered for king safety when the
    /// rules call for it.
    pub fn legal_moves(&mut self, origin: Square) -> Result<MoveSet, GameError> {
        let piece = self
            .board
            .piece_at(origin)
            .ok_or(MoveError::NoPieceAtOrigin(origin))?;
        let moves = pseudo_legal_moves(&self.board, origin, piece, &self.state);
        if self.config.filters(self.state.in_check()) {
            Ok(filter_check_safety(&mut self.board, &self.state, moves)?)
        } else {
            Ok(moves)
        }
    }

    pub fn handle(&mut self, input: Input) -> Result<Transition, GameError> {
        match input {
            Input::Select(square) => self.select(square),
            Input::Promote(kind) => self.choose_promotion(kind),
        }
    }

    /// Select a square: picks up a piece when idle, moves it when a destination is
    /// chosen, and deselects on anything else.
    pub fn select(&mut self, square: Square) -> Result<Transition, GameError> {
        match std::mem::take(&mut self.selection) {
            Selection::Idle => self.pick_up(square),
            Selection::Selected { moves } => self.choose_destination(moves, square),
            awaiting @ Selection::AwaitingPromotion { .. } => {
                warn!("ignoring {square}: waiting for a promotion choice");
                self.selection = awaiting;
                Ok(Transition::Ignored)
            }
        }
    }

    /// Finish a pending promotion with `kind`.
    pub fn choose_promotion(&mut self, kind: PieceKind) -> Result<Transition, GameError> {
        let Selection::AwaitingPromotion {
            origin,
            destination,
        } = self.selection
        else {
            warn!("promotion to {kind:?} without a pending promotion");
            return Err(GameError::NoPromotionPending);
        };
        if !kind.is_promotion_choice() {
            warn!("rejecting promotion to {kind:?}");
            return Err(GameError::InvalidPromotionChoice(kind));
        }

        self.selection = Selection::Idle;
        let mv = Move::new(origin, destination).with_special(Special::Promotion(kind));
        self.play(mv)
    }

    fn pick_up(&mut self, square: Square) -> Result<Transition, GameError> {
        let side = self.side_to_move();
        match self.board.piece_at(square) {
            Some(piece) if piece.color == side => {}
            _ => return Ok(Transition::Ignored),
        }

        let moves = self.legal_moves(square)?;
        debug!("selected {} on {square}: {} moves", moves.piece, moves.destinations.count());
        self.state.offer_en_passant(moves.en_passant);
        let transition = Transition::Selected {
            origin: square,
            destinations: moves.destinations,
        };
        self.selection = Selection::Selected { moves };
        Ok(transition)
    }

    fn choose_destination(&mut self, moves: MoveSet, to: Square) -> Result<Transition, GameError> {
        let Some(kind) = moves.kind_of(to) else {
            debug!("deselected {}", moves.origin);
            self.state.offer_en_passant(None);
            return Ok(Transition::Deselected);
        };

        let mv = Move::new(moves.origin, to);
        match kind {
            MoveKind::Normal => self.play(mv),
            MoveKind::EnPassantCapture { victim } => {
                self.play(mv.with_special(Special::EnPassant { victim }))
            }
            MoveKind::PromotionPending { choices } => {
                self.state.set_promotion_pending(true);
                self.selection = Selection::AwaitingPromotion {
                    origin: moves.origin,
                    destination: to,
                };
                Ok(Transition::AwaitingPromotion {
                    origin: moves.origin,
                    destination: to,
                    choices,
                })
            }
        }
    }

    fn play(&mut self, mv: Move) -> Result<Transition, GameError> {
        let last = match commit(&mut self.board, &mut self.state, mv) {
            Ok(last) => last,
            Err(e) => {
                // The board was reverted; drop the flags the selection set.
                self.state.set_promotion_pending(false);
                self.state.offer_en_passant(None);
                return Err(e.into());
            }
        };
        debug!(
            "{} played {}{}",
            last.piece,
            last.notation(),
            if self.state.in_check() { "+" } else { "" }
        );
        Ok(Transition::Committed(last))
    }

    /// Snapshot for a display.
    pub fn view(&self) -> BoardView {
        BoardView {
            grid: self.grid(),
            feedback: compute_feedback(self),
            side_to_move: self.side_to_move(),
            in_check: self.in_check(),
            last_move: self.last_move_notation(),
            promotion_pending: self.state.promotion_pending(),
        }
    }
}

impl FeedbackSource for Game {
    fn selected_moves(&self) -> Option<&MoveSet> {
        match &self.selection {
            Selection::Selected { moves } => Some(moves),
            _ => None,
        }
    }

    fn pending_promotion(&self) -> Option<(Square, Square)> {
        match self.selection {
            Selection::AwaitingPromotion {
                origin,
                destination,
            } => Some((origin, destination)),
            _ => None,
        }
    }

    fn is_occupied(&self, square: Square) -> bool {
        self.board.occupancy().contains(square)
    }

    fn check_info(&self) -> Option<CheckInfo> {
        if !self.state.in_check() {
            return None;
        }
        let side = self.side_to_move();
        let king_square = self.board.king_square(side).ok()?;
        let checkers = checkers(&self.board, &self.state, side).ok()?;
        Some(CheckInfo {
            king_square,
            checkers,
        })
    }
}
