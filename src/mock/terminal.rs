use std::io::{self, Write};

use log::info;

use super::TerminalDisplay;
use crate::BoardDisplay;
use crate::config::RulesConfig;
use crate::fen::STARTING_FEN;
use crate::game_logic::{Game, Input, Transition};
use crate::piece::PieceKind;
use crate::square::Square;

/// Clears the screen and moves cursor to top-left.
#[inline]
fn clear_screen() {
    print!("\x1B[2J\x1B[H");
}

/// A parsed terminal command.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Command<'a> {
    Play(Input),
    Load(&'a str),
    Reset,
    Refresh,
    Quit,
    Usage(&'static str),
    Unknown,
}

fn parse_command(line: &str) -> Option<Command<'_>> {
    let line = line.trim();
    let (head, rest) = line.split_once(char::is_whitespace).unwrap_or((line, ""));
    let rest = rest.trim();

    let command = match head {
        "" => return None,
        "s" => match rest.parse::<Square>() {
            Ok(square) => Command::Play(Input::Select(square)),
            Err(_) => Command::Usage("Usage: s <square>"),
        },
        "p" => {
            let kind = rest
                .chars()
                .next()
                .filter(|_| rest.chars().count() == 1)
                .and_then(PieceKind::from_char);
            match kind {
                Some(kind) => Command::Play(Input::Promote(kind)),
                None => Command::Usage("Usage: p <q|r|n|b>"),
            }
        }
        "load" if rest.is_empty() => Command::Usage("Usage: load <fen> | load startpos"),
        "load" if rest == "startpos" => Command::Load(STARTING_FEN),
        "load" => Command::Load(rest),
        "r" => Command::Reset,
        "refresh" => Command::Refresh,
        "q" => Command::Quit,
        _ => Command::Unknown,
    };
    Some(command)
}

/// Runs an interactive terminal game.
///
/// Squares are selected with `s <square>`; a selected piece moves when one of its
/// highlighted destinations is selected.
pub fn run_interactive_terminal(config: RulesConfig) {
    let mut display = TerminalDisplay::new();
    let mut game = Game::with_config(config);

    redraw(&mut display, &game, None);

    loop {
        print!("> ");
        if let Err(e) = io::stdout().flush() {
            eprintln!("Failed to flush stdout: {}", e);
            break;
        }

        let mut line = String::new();
        match io::stdin().read_line(&mut line) {
            Ok(0) => break,
            Ok(_) => {}
            Err(e) => {
                eprintln!("Failed to read input: {}", e);
                break;
            }
        }

        let Some(command) = parse_command(&line) else {
            continue;
        };

        match command {
            Command::Play(input) => {
                let message = match game.handle(input) {
                    Ok(transition) => describe(transition),
                    Err(e) if e.is_rejected_input() => Some(format!("❌ {e}")),
                    Err(e) => {
                        eprintln!("Game aborted: {e}");
                        break;
                    }
                };
                redraw(&mut display, &game, message);
            }
            Command::Load(fen) => match Game::from_fen(fen, config) {
                Ok(loaded) => {
                    game = loaded;
                    info!("loaded {fen}");
                    redraw(&mut display, &game, Some("✅ Position loaded from FEN".into()));
                }
                Err(e) => println!("❌ {e}"),
            },
            Command::Reset => {
                game = Game::with_config(config);
                redraw(&mut display, &game, Some("🔄 Reset to initial state".into()));
            }
            Command::Refresh => redraw(&mut display, &game, None),
            Command::Quit => break,
            Command::Usage(usage) => println!("{usage}"),
            Command::Unknown => println!("Unknown command"),
        }
    }
}

fn describe(transition: Transition) -> Option<String> {
    match transition {
        Transition::Committed(last) => Some(format!("Played {}", last.notation())),
        Transition::AwaitingPromotion { .. } => Some("Choose a promotion piece".into()),
        Transition::Ignored | Transition::Selected { .. } | Transition::Deselected => None,
    }
}

/// Draws the help text, the board and an optional status message.
fn redraw(display: &mut TerminalDisplay, game: &Game, message: Option<String>) {
    clear_screen();
    println!("♟️  Bitboard Chess");
    println!();
    println!("Commands: s <square> | p <q|r|n|b> | load <fen> | r (reset) | refresh | q (quit)");
    println!();

    if let Err(e) = display.show(&game.view()) {
        eprintln!("Failed to draw board: {e}");
    }
    if let Some(message) = message {
        println!("\n{message}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sq(s: &str) -> Square {
        s.parse().expect("valid square")
    }

    #[test]
    fn test_select_command() {
        assert_eq!(
            parse_command("s e2\n"),
            Some(Command::Play(Input::Select(sq("e2"))))
        );
        assert_eq!(
            parse_command("s z9"),
            Some(Command::Usage("Usage: s <square>"))
        );
    }

    #[test]
    fn test_promote_command() {
        assert_eq!(
            parse_command("p n"),
            Some(Command::Play(Input::Promote(PieceKind::Knight)))
        );
        assert_eq!(
            parse_command("p queen"),
            Some(Command::Usage("Usage: p <q|r|n|b>"))
        );
    }

    #[test]
    fn test_load_command_keeps_fen_spaces() {
        assert_eq!(
            parse_command("load 4k3/8/8/8/8/8/8/4K3 w - - 0 1"),
            Some(Command::Load("4k3/8/8/8/8/8/8/4K3 w - - 0 1"))
        );
        assert_eq!(parse_command("load startpos"), Some(Command::Load(STARTING_FEN)));
    }

    #[test]
    fn test_blank_and_unknown_lines() {
        assert_eq!(parse_command("   \n"), None);
        assert_eq!(parse_command("x"), Some(Command::Unknown));
        assert_eq!(parse_command("q"), Some(Command::Quit));
        assert_eq!(parse_command("r"), Some(Command::Reset));
    }
}
