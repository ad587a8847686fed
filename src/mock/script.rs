use std::collections::VecDeque;
use std::convert::Infallible;

use thiserror::Error;

use crate::InputSource;
use crate::game_logic::Input;
use crate::piece::PieceKind;

/// Error when parsing an input script.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("invalid script token: '{0}'")]
pub struct ParseError(String);

/// A scriptable input source for tests and replays.
///
/// New script can be appended at any time for interactive use.
#[derive(Debug, Clone, Default)]
pub struct ScriptedInput {
    pending: VecDeque<Input>,
}

impl ScriptedInput {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse and queue a script.
    ///
    /// Format:
    /// - Squares are 2 characters (e.g., "e2", "a1") and select that square
    /// - `=q`, `=r`, `=n`, `=b` choose a promotion piece
    /// - Whitespace is optional between tokens
    ///
    /// Examples:
    /// - `"e2e4"` - select e2, then e4
    /// - `"b7 b8 =n"` - push the b-pawn and promote it to a knight
    ///
    /// Nothing is queued if any token is invalid.
    pub fn push_script(&mut self, script: &str) -> Result<(), ParseError> {
        let inputs = parse_script(script)?;
        self.pending.extend(inputs);
        Ok(())
    }

    #[inline]
    pub fn pending(&self) -> usize {
        self.pending.len()
    }

    /// Hand every pending input to `on_input`, in order.
    pub fn drain<F>(&mut self, mut on_input: F)
    where
        F: FnMut(Input),
    {
        while let Some(input) = self.pending.pop_front() {
            on_input(input);
        }
    }
}

impl InputSource for ScriptedInput {
    type Error = Infallible;

    fn next_input(&mut self) -> Result<Option<Input>, Self::Error> {
        Ok(self.pending.pop_front())
    }
}

fn parse_script(script: &str) -> Result<Vec<Input>, ParseError> {
    let mut inputs = Vec::new();
    let mut token = String::new();

    for ch in script.chars() {
        if ch.is_whitespace() {
            flush_token(&mut token, &mut inputs)?;
            continue;
        }
        if ch == '=' {
            flush_token(&mut token, &mut inputs)?;
        }
        token.push(ch);

        // Squares and promotion choices are both 2 characters
        if token.len() == 2 {
            flush_token(&mut token, &mut inputs)?;
        }
    }

    flush_token(&mut token, &mut inputs)?;
    Ok(inputs)
}

fn flush_token(token: &mut String, inputs: &mut Vec<Input>) -> Result<(), ParseError> {
    if token.is_empty() {
        return Ok(());
    }
    let input = parse_token(token).ok_or_else(|| ParseError(token.clone()))?;
    inputs.push(input);
    token.clear();
    Ok(())
}

fn parse_token(token: &str) -> Option<Input> {
    match token.strip_prefix('=') {
        Some(choice) => {
            let mut chars = choice.chars();
            let kind = chars.next().and_then(PieceKind::from_char)?;
            (chars.next().is_none() && kind.is_promotion_choice()).then_some(Input::Promote(kind))
        }
        None => token.parse().ok().map(Input::Select),
    }
}
