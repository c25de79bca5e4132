//! Interpreter that converts Logo source text into a command [`History`].
//!
//! The entry point is [`LogoInterpreter`]. Configure it with a
//! [`LogoConfig`], then call [`LogoInterpreter::run`] with the program
//! source. Each run builds fresh lexer, parser and turtle state; the
//! returned [`ProgramRun`] owns every artifact of the run.

use crate::error::{Diagnostic, LogoError};
use crate::history::History;
use crate::lexer::{TokenKind, tokenize};
use crate::parser::{Sentence, parse_program};
use crate::turtle::{Bounds, HOME_HEADING, Turtle, TurtlePose};
use serde::{Deserialize, Serialize};
use tracing::warn;

/// Configuration for program interpretation.
#[derive(Clone, Debug)]
pub struct LogoConfig {
    /// When set, a grammar violation fails the run with
    /// [`LogoError::Syntax`] instead of returning the partial history.
    pub strict: bool,
    /// Number of chords used to approximate `arc` sentences.
    pub arc_steps: u32,
    /// Heading the turtle starts each run with, in degrees.
    pub home_heading: f32,
}

impl Default for LogoConfig {
    fn default() -> Self {
        Self {
            strict: false,
            arc_steps: 5,
            home_heading: HOME_HEADING,
        }
    }
}

/// Everything a completed run hands back to the caller.
///
/// The history feeds the hardware dispatcher; pose and bounds feed
/// rendering sinks; the diagnostic, when present, explains why the history
/// is shorter than the source suggested.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ProgramRun {
    pub history: History,
    pub pose: TurtlePose,
    pub bounds: Bounds,
    pub diagnostic: Option<Diagnostic>,
}

/// Drives source text through tokenizer, parser and turtle.
pub struct LogoInterpreter {
    config: LogoConfig,
}

impl LogoInterpreter {
    /// Creates an interpreter with the given configuration.
    pub fn new(config: LogoConfig) -> Self {
        Self { config }
    }

    /// Runs one program to completion.
    ///
    /// Tokenizes eagerly, parses the sentence sequence, then evaluates it
    /// against a fresh turtle. Lexical errors and leftover unconsumed input
    /// always fail the run; grammar violations fail it only in strict mode
    /// and otherwise travel in [`ProgramRun::diagnostic`] next to whatever
    /// history the valid prefix produced.
    pub fn run(&self, source: &str) -> Result<ProgramRun, LogoError> {
        let tokens = tokenize(source)?;
        let parsed = parse_program(&tokens);

        if let Some(diagnostic) = &parsed.diagnostic {
            if self.config.strict {
                return Err(LogoError::Syntax(diagnostic.clone()));
            }
            warn!(%diagnostic, "parse stopped early, keeping the completed prefix");
        } else if let Some(leftover) = tokens.get(parsed.stopped_at)
            && leftover.kind != TokenKind::EndOfInput
        {
            // A clean parse that strands a token is not recoverable: the
            // program says nothing about what to do with the value.
            return Err(LogoError::Unconsumed(leftover.text.clone()));
        }

        let mut turtle = Turtle::new(self.config.home_heading);
        self.execute(&parsed.sentences, &mut turtle);

        let (history, pose, bounds) = turtle.finish();
        Ok(ProgramRun {
            history,
            pose,
            bounds,
            diagnostic: parsed.diagnostic,
        })
    }

    /// Evaluates a sentence sequence against the turtle. `repeat` bodies
    /// were parsed once; they are replayed here per iteration.
    fn execute(&self, sentences: &[Sentence], turtle: &mut Turtle) {
        for sentence in sentences {
            match sentence {
                Sentence::Forward(units) => turtle.forward(*units),
                Sentence::Backward(units) => turtle.backward(*units),
                Sentence::TurnLeft(degrees) => turtle.left(*degrees),
                Sentence::TurnRight(degrees) => turtle.right(*degrees),
                Sentence::Arc { radius, angle } => {
                    turtle.arc(*radius, *angle, self.config.arc_steps)
                }
                Sentence::PenUp => turtle.pen_up(),
                Sentence::PenDown => turtle.pen_down(),
                Sentence::ShowTurtle => turtle.show(),
                Sentence::HideTurtle => turtle.hide(),
                Sentence::SetColor(color) => turtle.set_pen_color(*color),
                Sentence::PenErase => turtle.erase(),
                Sentence::Fill => turtle.fill(),
                Sentence::Repeat { count, body } => {
                    for _ in 0..*count {
                        self.execute(body, turtle);
                    }
                }
            }
        }
    }
}

impl Default for LogoInterpreter {
    fn default() -> Self {
        Self::new(LogoConfig::default())
    }
}
