use log::{debug, warn};

pub mod bitboard;
pub mod board;
pub mod check;
pub mod config;
pub mod executor;
pub mod feedback;
pub mod fen;
pub mod game_logic;
pub mod game_state;
pub mod legality;
pub mod mock;
pub mod movegen;
pub mod piece;
pub mod square;

use game_logic::{Game, GameError, Input};

/// Trait for reading player actions.
///
/// Abstracts over an interactive terminal and scripted inputs, providing a uniform
/// interface for [`run_session`].
pub trait InputSource {
    /// Error type for input read failures.
    type Error: std::fmt::Debug + std::fmt::Display;

    /// Next action, or `None` once the source is exhausted.
    fn next_input(&mut self) -> Result<Option<Input>, Self::Error>;
}

/// Trait for displaying the board to the player.
///
/// Mirrors [`InputSource`] on the output side of the game loop.
pub trait BoardDisplay {
    /// Error type for display update failures.
    type Error: std::fmt::Debug + std::fmt::Display;

    /// Show the given view.
    ///
    /// Implementations map [`feedback::SquareFeedback`] variants to their own
    /// output (terminal colors, etc.).
    fn show(&mut self, view: &feedback::BoardView) -> Result<(), Self::Error>;
}

#[derive(Debug, thiserror::Error)]
pub enum SessionError<I, D> {
    #[error("input failed: {0}")]
    Input(I),
    #[error("display failed: {0}")]
    Display(D),
    #[error(transparent)]
    Game(GameError),
}

/// Feed every input to `game`, showing the board initially and after each one.
///
/// Rejected inputs are logged and skipped; a broken board ends the session.
/// Returns the number of committed moves.
pub fn run_session<I, D>(
    game: &mut Game,
    input: &mut I,
    display: &mut D,
) -> Result<u32, SessionError<I::Error, D::Error>>
where
    I: InputSource,
    D: BoardDisplay,
{
    display.show(&game.view()).map_err(SessionError::Display)?;

    let mut committed = 0;
    while let Some(next) = input.next_input().map_err(SessionError::Input)? {
        match game.handle(next) {
            Ok(game_logic::Transition::Committed(_)) => committed += 1,
            Ok(transition) => debug!("{next:?}: {transition:?}"),
            Err(e) if e.is_rejected_input() => warn!("skipping {next:?}: {e}"),
            Err(e) => return Err(SessionError::Game(e)),
        }
        display.show(&game.view()).map_err(SessionError::Display)?;
    }
    Ok(committed)
}
