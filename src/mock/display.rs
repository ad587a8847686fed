use std::io::{self, Write};

use crate::BoardDisplay;
use crate::feedback::{BoardView, SquareFeedback};
use crate::square::Square;

/// Terminal-based board display for development and testing.
///
/// Renders a [`BoardView`] as an 8×8 grid of piece symbols with ANSI color-coded
/// squares matching the feedback type (destinations, captures, etc.).
#[derive(Debug, Default)]
pub struct TerminalDisplay;

impl TerminalDisplay {
    /// Create a new terminal display.
    pub fn new() -> Self {
        Self
    }
}

/// Error type for terminal display operations.
#[derive(Debug, thiserror::Error)]
pub enum DisplayError {
    #[error("failed to write to terminal: {0}")]
    Io(#[from] io::Error),
}

impl BoardDisplay for TerminalDisplay {
    type Error = DisplayError;

    fn show(&mut self, view: &BoardView) -> Result<(), Self::Error> {
        render_view(&mut io::stdout(), view)
    }
}

/// Render a view to any writer. Extracted for testability.
fn render_view(w: &mut impl Write, view: &BoardView) -> Result<(), DisplayError> {
    for row in (0..8i8).rev() {
        write!(w, " {} ", row + 1)?;
        for file in 0..8i8 {
            let feedback = Square::from_coords(file, row).and_then(|sq| view.feedback.get(sq));
            let symbol = view.grid[row as usize][file as usize];
            write!(w, "{}", format_square(symbol, feedback))?;
        }
        writeln!(w)?;
    }
    writeln!(w, "    a  b  c  d  e  f  g  h")?;

    write!(w, "{} to move", view.side_to_move)?;
    if view.in_check {
        write!(w, ", in check")?;
    }
    if let Some(last) = &view.last_move {
        write!(w, " | last move {last}")?;
    }
    writeln!(w)?;
    if view.promotion_pending {
        writeln!(w, "promote to: q r n b")?;
    }
    w.flush()?;
    Ok(())
}

/// Wrap a square's symbol in the ANSI background for its feedback.
fn format_square(symbol: Option<char>, feedback: Option<SquareFeedback>) -> String {
    let symbol = symbol.unwrap_or('·');
    match feedback {
        Some(SquareFeedback::Destination) => format!("\x1b[44m {symbol} \x1b[0m"),
        Some(SquareFeedback::Capture) => format!("\x1b[41m {symbol} \x1b[0m"),
        Some(SquareFeedback::Origin) => format!("\x1b[42m {symbol} \x1b[0m"),
        Some(SquareFeedback::Check) => format!("\x1b[45m {symbol} \x1b[0m"),
        Some(SquareFeedback::Checker) => format!("\x1b[43m {symbol} \x1b[0m"),
        None => format!(" {symbol} "),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::BoardState;
    use crate::feedback::BoardFeedback;
    use crate::piece::Color;

    fn sq(s: &str) -> Square {
        s.parse().expect("valid square")
    }

    fn view(feedback: BoardFeedback) -> BoardView {
        BoardView {
            grid: BoardState::new().grid(),
            feedback,
            side_to_move: Color::White,
            in_check: false,
            last_move: None,
            promotion_pending: false,
        }
    }

    fn render_to_string(view: &BoardView) -> String {
        let mut buf = Vec::new();
        render_view(&mut buf, view).expect("rendering to buffer should succeed");
        String::from_utf8(buf).expect("output should be valid UTF-8")
    }

    fn highlighted(square: &str, kind: SquareFeedback) -> String {
        let mut feedback = BoardFeedback::new();
        feedback.set(sq(square), kind);
        render_to_string(&view(feedback))
    }

    #[test]
    fn show_empty_feedback_contains_all_ranks() {
        let output = render_to_string(&view(BoardFeedback::new()));

        for rank in '1'..='8' {
            assert!(
                output.contains(rank),
                "output should contain rank label '{rank}'"
            );
        }
    }

    #[test]
    fn show_empty_feedback_contains_file_labels() {
        let output = render_to_string(&view(BoardFeedback::new()));

        assert!(
            output.contains("a  b  c  d  e  f  g  h"),
            "output should contain file labels"
        );
    }

    #[test]
    fn show_piece_symbols_in_rank_order() {
        let output = render_to_string(&view(BoardFeedback::new()));
        let first = output.lines().next().expect("at least one line");

        assert_eq!(first, " 8  r  n  b  q  k  b  n  r ");
        assert!(output.contains(" 4  ·  ·  ·  ·  ·  ·  ·  · "));
    }

    #[test]
    fn show_destination_uses_blue_background() {
        let output = highlighted("e4", SquareFeedback::Destination);

        assert!(
            output.contains("\x1b[44m · \x1b[0m"),
            "destination should use blue ANSI background"
        );
    }

    #[test]
    fn show_capture_uses_red_background() {
        let output = highlighted("d7", SquareFeedback::Capture);

        assert!(
            output.contains("\x1b[41m p \x1b[0m"),
            "capture should use red ANSI background"
        );
    }

    #[test]
    fn show_origin_uses_green_background() {
        let output = highlighted("e2", SquareFeedback::Origin);

        assert!(
            output.contains("\x1b[42m P \x1b[0m"),
            "origin should use green ANSI background"
        );
    }

    #[test]
    fn show_check_uses_magenta_background() {
        let output = highlighted("e8", SquareFeedback::Check);

        assert!(
            output.contains("\x1b[45m k \x1b[0m"),
            "check should use magenta ANSI background"
        );
    }

    #[test]
    fn show_checker_uses_yellow_background() {
        let output = highlighted("h5", SquareFeedback::Checker);

        assert!(
            output.contains("\x1b[43m"),
            "checker should use yellow ANSI background"
        );
    }

    #[test]
    fn empty_feedback_has_no_ansi_codes() {
        let output = render_to_string(&view(BoardFeedback::new()));

        assert!(
            !output.contains("\x1b[4"),
            "empty feedback should have no ANSI background codes"
        );
    }

    #[test]
    fn status_line_reports_turn_check_and_last_move() {
        let mut v = view(BoardFeedback::new());
        v.side_to_move = Color::Black;
        v.in_check = true;
        v.last_move = Some("d1h5".to_string());

        let output = render_to_string(&v);

        assert!(output.contains("black to move, in check | last move d1h5"));
        assert!(!output.contains("promote to"));
    }

    #[test]
    fn promotion_prompt_shown_when_pending() {
        let mut v = view(BoardFeedback::new());
        v.promotion_pending = true;

        assert!(render_to_string(&v).contains("promote to: q r n b"));
    }
}
