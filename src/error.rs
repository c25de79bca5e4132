//! Error taxonomy for program runs.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// A structured syntax report: where the parse stopped, what was found and
/// what the grammar required there.
///
/// In lenient mode this travels alongside the partial history inside
/// [`ProgramRun`](crate::ProgramRun); in strict mode it is promoted to
/// [`LogoError::Syntax`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostic {
    /// Index into the token list where the mismatch occurred.
    pub token_index: usize,
    /// Text of the offending token, or `"end of input"`.
    pub found: String,
    /// Human-readable description of the required token.
    pub expected: String,
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "expected {} but found `{}` at token {}",
            self.expected, self.found, self.token_index
        )
    }
}

/// Everything that can go wrong while turning source text into motion.
#[derive(Clone, Debug, PartialEq, Error)]
pub enum LogoError {
    /// A character outside letters, digits, brackets and whitespace.
    #[error("unrecognized character `{ch}` at offset {offset}")]
    Lexical { ch: char, offset: usize },

    /// A grammar violation, surfaced as an error only in strict mode.
    #[error("syntax error: {0}")]
    Syntax(Diagnostic),

    /// The program parsed cleanly but left a value nothing consumed.
    #[error("you don't say what to do with `{0}`")]
    Unconsumed(String),

    /// The single-run admission gate is already held.
    #[error("another program is already running")]
    Busy,

    /// The hardware channel rejected a command write.
    #[error("transport failure: {0}")]
    Transport(String),
}
