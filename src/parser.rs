//! Recursive-descent parser for turtle programs.
//!
//! The grammar needs a single token of lookahead: a program is a sequence
//! of sentences, each introduced by a keyword. Loop bodies are parsed once
//! into a [`Sentence::Repeat`] node and evaluated N times by the
//! interpreter, rather than re-parsed per iteration.
//!
//! Error policy is lenient by default: a grammar violation aborts the
//! current sentence and stops the parse, returning every sentence completed
//! so far together with a [`Diagnostic`] describing the mismatch. A
//! sentence only counts as completed when it parsed in full, so an error
//! inside a `repeat` body drops the whole loop.

use crate::error::Diagnostic;
use crate::lexer::{Token, TokenKind};

/// One parsed unit of the grammar: a single command or a `repeat` block.
#[derive(Clone, Debug, PartialEq)]
pub enum Sentence {
    /// `fd <units>`
    Forward(f32),
    /// `bk <units>`
    Backward(f32),
    /// `lt <degrees>`
    TurnLeft(f32),
    /// `rt <degrees>`
    TurnRight(f32),
    /// `arc <radius> <degrees>`
    Arc { radius: f32, angle: f32 },
    /// `pu`
    PenUp,
    /// `pd`
    PenDown,
    /// `st`
    ShowTurtle,
    /// `ht`
    HideTurtle,
    /// `setcolor <palette index>`
    SetColor(u8),
    /// `penerase`
    PenErase,
    /// `fill`
    Fill,
    /// `repeat <count> [ <body> ]`
    Repeat { count: u32, body: Vec<Sentence> },
}

/// Result of a parse: the sentences completed before any error, plus the
/// diagnostic if the parse stopped early, plus where the cursor halted.
#[derive(Clone, Debug, PartialEq)]
pub struct ParsedProgram {
    pub sentences: Vec<Sentence>,
    pub diagnostic: Option<Diagnostic>,
    /// Index of the first token the parse did not consume.
    pub stopped_at: usize,
}

/// Single cursor over the materialized token list.
struct TokenCursor<'a> {
    tokens: &'a [Token],
    /// Index of the next token to consume.
    index: usize,
}

impl<'a> TokenCursor<'a> {
    fn new(tokens: &'a [Token]) -> Self {
        Self { tokens, index: 0 }
    }

    fn peek(&self) -> Option<&'a Token> {
        self.tokens.get(self.index)
    }

    fn bump(&mut self) -> Option<&'a Token> {
        let token = self.tokens.get(self.index)?;
        self.index += 1;
        Some(token)
    }

    /// Consumes the next token if it has the required kind, otherwise
    /// reports what was found instead.
    fn expect(&mut self, kind: TokenKind, expected: &str) -> Result<&'a Token, Diagnostic> {
        let index = self.index;
        match self.bump() {
            Some(token) if token.kind == kind => Ok(token),
            found => Err(self.mismatch(index, found, expected)),
        }
    }

    fn mismatch(&self, index: usize, found: Option<&Token>, expected: &str) -> Diagnostic {
        Diagnostic {
            token_index: index,
            found: match found {
                Some(t) if t.kind == TokenKind::EndOfInput => "end of input".to_string(),
                Some(t) => t.text.clone(),
                None => "end of input".to_string(),
            },
            expected: expected.to_string(),
        }
    }
}

/// Parses the full token list into a sentence sequence.
pub fn parse_program(tokens: &[Token]) -> ParsedProgram {
    let mut cursor = TokenCursor::new(tokens);
    let mut sentences = Vec::new();
    let diagnostic = parse_sentences(&mut cursor, &mut sentences).err();
    ParsedProgram {
        sentences,
        diagnostic,
        stopped_at: cursor.index,
    }
}

/// Parses sentences while the lookahead token introduces one.
///
/// Stops quietly at end of input, at a closing `]` (the caller's job to
/// match) and at any non-keyword token; whether a leftover token is an
/// error is decided by the interpreter layer.
fn parse_sentences(
    cursor: &mut TokenCursor<'_>,
    sentences: &mut Vec<Sentence>,
) -> Result<(), Diagnostic> {
    while let Some(token) = cursor.peek() {
        match token.kind {
            TokenKind::Keyword => sentences.push(parse_sentence(cursor)?),
            _ => break,
        }
    }
    Ok(())
}

fn parse_sentence(cursor: &mut TokenCursor<'_>) -> Result<Sentence, Diagnostic> {
    let keyword_index = cursor.index;
    let keyword = cursor
        .expect(TokenKind::Keyword, "a command keyword")?
        .text
        .as_str();

    match keyword {
        "fd" => Ok(Sentence::Forward(parse_amount(cursor)? as f32)),
        "bk" => Ok(Sentence::Backward(parse_amount(cursor)? as f32)),
        "lt" => Ok(Sentence::TurnLeft(parse_amount(cursor)? as f32)),
        "rt" => Ok(Sentence::TurnRight(parse_amount(cursor)? as f32)),
        "arc" => {
            let radius = parse_amount(cursor)? as f32;
            let angle = parse_amount(cursor)? as f32;
            Ok(Sentence::Arc { radius, angle })
        }
        "pu" => Ok(Sentence::PenUp),
        "pd" => Ok(Sentence::PenDown),
        "st" => Ok(Sentence::ShowTurtle),
        "ht" => Ok(Sentence::HideTurtle),
        "setcolor" => {
            let color = parse_amount(cursor)?.clamp(0, u8::MAX as i64) as u8;
            Ok(Sentence::SetColor(color))
        }
        "penerase" => Ok(Sentence::PenErase),
        "fill" => Ok(Sentence::Fill),
        "repeat" => parse_repeat(cursor),
        other => {
            // Unreachable while the keyword set and this match agree; kept
            // as a diagnostic rather than a panic.
            Err(Diagnostic {
                token_index: keyword_index,
                found: other.to_string(),
                expected: "a command this engine implements".to_string(),
            })
        }
    }
}

fn parse_repeat(cursor: &mut TokenCursor<'_>) -> Result<Sentence, Diagnostic> {
    let count = parse_amount(cursor)?;
    let count = u32::try_from(count).map_err(|_| Diagnostic {
        token_index: cursor.index - 1,
        found: count.to_string(),
        expected: "a repeat count that fits in 32 bits".to_string(),
    })?;

    expect_operator(cursor, '[')?;
    let mut body = Vec::new();
    parse_sentences(cursor, &mut body)?;
    expect_operator(cursor, ']')?;

    Ok(Sentence::Repeat { count, body })
}

fn expect_operator(cursor: &mut TokenCursor<'_>, bracket: char) -> Result<(), Diagnostic> {
    let index = cursor.index;
    let token = cursor.expect(TokenKind::Operator, &format!("`{bracket}`"))?;
    if token.text.chars().next() == Some(bracket) {
        Ok(())
    } else {
        Err(cursor.mismatch(index, Some(token), &format!("`{bracket}`")))
    }
}

/// Consumes a numeric token and returns its integer value. Fractional
/// literals do not exist in the grammar.
fn parse_amount(cursor: &mut TokenCursor<'_>) -> Result<i64, Diagnostic> {
    let index = cursor.index;
    let token = cursor.expect(TokenKind::Numeric, "a number")?;
    token.text.parse::<i64>().map_err(|_| Diagnostic {
        token_index: index,
        found: token.text.clone(),
        expected: "a number small enough to execute".to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexer::tokenize;

    fn parse(source: &str) -> ParsedProgram {
        parse_program(&tokenize(source).unwrap())
    }

    #[test]
    fn motion_sentences_carry_their_argument() {
        let program = parse("fd 100 rt 90");
        assert!(program.diagnostic.is_none());
        assert_eq!(
            program.sentences,
            [Sentence::Forward(100.0), Sentence::TurnRight(90.0)]
        );
    }

    #[test]
    fn repeat_bodies_are_parsed_once() {
        let program = parse("repeat 4 [ fd 50 rt 90 ]");
        assert!(program.diagnostic.is_none());
        assert_eq!(
            program.sentences,
            [Sentence::Repeat {
                count: 4,
                body: vec![Sentence::Forward(50.0), Sentence::TurnRight(90.0)],
            }]
        );
    }

    #[test]
    fn repeat_nests() {
        let program = parse("repeat 2 [ fd 1 repeat 3 [ rt 90 ] ]");
        assert_eq!(
            program.sentences,
            [Sentence::Repeat {
                count: 2,
                body: vec![
                    Sentence::Forward(1.0),
                    Sentence::Repeat {
                        count: 3,
                        body: vec![Sentence::TurnRight(90.0)],
                    },
                ],
            }]
        );
    }

    #[test]
    fn missing_motion_argument_keeps_the_prefix() {
        let program = parse("fd 10 rt banana fd 20");
        assert_eq!(program.sentences, [Sentence::Forward(10.0)]);
        let diagnostic = program.diagnostic.expect("rt without a number must report");
        assert_eq!(diagnostic.found, "banana");
        assert_eq!(diagnostic.token_index, 3);
    }

    #[test]
    fn unclosed_repeat_reports_the_missing_bracket() {
        let program = parse("repeat 2 [ fd 10");
        assert!(program.sentences.is_empty(), "aborted loops contribute nothing");
        let diagnostic = program.diagnostic.unwrap();
        assert_eq!(diagnostic.found, "end of input");
    }

    #[test]
    fn error_inside_a_loop_body_drops_the_whole_loop() {
        let program = parse("fd 5 repeat 2 [ fd oops ] fd 7");
        assert_eq!(program.sentences, [Sentence::Forward(5.0)]);
        assert!(program.diagnostic.is_some());
    }

    #[test]
    fn parse_stops_quietly_at_a_non_keyword() {
        let program = parse("fd 10 20");
        assert!(program.diagnostic.is_none());
        assert_eq!(program.sentences, [Sentence::Forward(10.0)]);
        // The leftover numeric is left for the interpreter layer to judge.
        assert_eq!(program.stopped_at, 2);
    }

    #[test]
    fn style_sentences_parse() {
        let program = parse("ht setcolor 3 penerase fill st");
        assert!(program.diagnostic.is_none());
        assert_eq!(
            program.sentences,
            [
                Sentence::HideTurtle,
                Sentence::SetColor(3),
                Sentence::PenErase,
                Sentence::Fill,
                Sentence::ShowTurtle,
            ]
        );
    }
}
