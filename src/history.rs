//! The command history artifact.
//!
//! A [`History`] is the engine's sole output: an ordered, append-only
//! sequence of primitive [`Command`]s, insertion order being execution
//! order. Ownership passes to the caller (hardware dispatcher, rendering
//! sink) once a run completes; the engine holds no further reference.

use serde::{Deserialize, Serialize};
use std::ops::Deref;

/// One primitive motion the turtle hardware can execute.
///
/// Distances and angles are signed reals: integer literals from source
/// programs arrive whole, while arc decomposition produces fractional
/// turn/advance pairs.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub enum Command {
    /// Advance along the current heading (`fd`).
    Forward(f32),
    /// Retreat against the current heading (`bk`).
    Backward(f32),
    /// Rotate counterclockwise by degrees (`lt`).
    TurnLeft(f32),
    /// Rotate clockwise by degrees (`rt`).
    TurnRight(f32),
    /// Lift the pen (`pu`).
    PenUp,
    /// Lower the pen (`pd`).
    PenDown,
}

impl Command {
    /// The transport word for this command, as written onto the wire.
    pub fn wire_word(&self) -> &'static str {
        match self {
            Command::Forward(_) => "fd",
            Command::Backward(_) => "bk",
            Command::TurnLeft(_) => "lt",
            Command::TurnRight(_) => "rt",
            Command::PenUp => "pu",
            Command::PenDown => "pd",
        }
    }

    /// The numeric argument, if the command carries one.
    pub fn argument(&self) -> Option<f32> {
        match self {
            Command::Forward(v)
            | Command::Backward(v)
            | Command::TurnLeft(v)
            | Command::TurnRight(v) => Some(*v),
            Command::PenUp | Command::PenDown => None,
        }
    }

    /// Full wire line, e.g. `"fd 10"` or `"pu"`.
    ///
    /// Whole-valued arguments are written without a fractional part so the
    /// actuator firmware sees the same strings the source program used.
    pub fn wire_line(&self) -> String {
        match self.argument() {
            Some(arg) if arg.fract() == 0.0 => format!("{} {}", self.wire_word(), arg as i64),
            Some(arg) => format!("{} {}", self.wire_word(), arg),
            None => self.wire_word().to_string(),
        }
    }
}

/// Ordered, append-only record of every command a run produced.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct History {
    commands: Vec<Command>,
}

impl History {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a command. There is no removal; execution order is fixed at
    /// insertion time.
    pub fn push(&mut self, command: Command) {
        self.commands.push(command);
    }

    pub fn as_slice(&self) -> &[Command] {
        &self.commands
    }
}

impl Deref for History {
    type Target = [Command];

    fn deref(&self) -> &[Command] {
        &self.commands
    }
}

impl IntoIterator for History {
    type Item = Command;
    type IntoIter = std::vec::IntoIter<Command>;

    fn into_iter(self) -> Self::IntoIter {
        self.commands.into_iter()
    }
}

impl<'a> IntoIterator for &'a History {
    type Item = &'a Command;
    type IntoIter = std::slice::Iter<'a, Command>;

    fn into_iter(self) -> Self::IntoIter {
        self.commands.iter()
    }
}
