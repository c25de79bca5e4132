//! Lexical analysis for turtle programs.
//!
//! A [`Scanner`] walks the raw source one character at a time with one-step
//! lookahead and one-step rewind. The [`Tokenizer`] groups those characters
//! into classified [`Token`]s. Tokenization runs eagerly to completion via
//! [`tokenize`]; the parser works off the finished token list.

use crate::error::LogoError;

/// Sentinel returned by the scanner once the source is exhausted.
pub const EOF_CHAR: char = '\0';

/// The fixed command vocabulary of the language.
///
/// Every identifier that matches one of these is reclassified as a
/// [`TokenKind::Keyword`] by the tokenizer.
pub const KEYWORDS: [&str; 13] = [
    "fd", "bk", "lt", "rt", "arc", "st", "ht", "pu", "pd", "penerase", "setcolor", "fill",
    "repeat",
];

/// Classification of a [`Token`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TokenKind {
    /// One of the words in [`KEYWORDS`].
    Keyword,
    /// An alphanumeric word that is not a keyword.
    Identifier,
    /// A run of decimal digits.
    Numeric,
    /// A single bracket, `[` or `]`.
    Operator,
    /// The terminator appended exactly once at the end of every token list.
    EndOfInput,
}

/// A classified slice of source text. Immutable once created.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub text: String,
}

impl Token {
    fn new(kind: TokenKind, text: impl Into<String>) -> Self {
        Self {
            kind,
            text: text.into(),
        }
    }
}

/// Character cursor over the source text.
pub struct Scanner {
    chars: Vec<char>,
    index: usize,
}

impl Scanner {
    pub fn new(source: &str) -> Self {
        Self {
            chars: source.chars().collect(),
            index: 0,
        }
    }

    /// Returns the character at the cursor and advances by one, or
    /// [`EOF_CHAR`] once the source is exhausted (without advancing).
    pub fn scan(&mut self) -> char {
        match self.chars.get(self.index) {
            Some(&c) => {
                self.index += 1;
                c
            }
            None => EOF_CHAR,
        }
    }

    /// Returns the next character without advancing, or [`EOF_CHAR`] at the end.
    pub fn look_ahead(&self) -> char {
        self.chars.get(self.index).copied().unwrap_or(EOF_CHAR)
    }

    /// Moves the cursor back by one position, undoing the most recent
    /// [`scan`](Self::scan). No-op at the start of the source. Callers must
    /// never rewind further than the single character they just read.
    pub fn rewind(&mut self) {
        self.index = self.index.saturating_sub(1);
    }

    /// Cursor position in characters, used for lexical error reporting.
    pub fn offset(&self) -> usize {
        self.index
    }
}

/// Groups scanner output into [`Token`]s.
pub struct Tokenizer {
    scanner: Scanner,
}

impl Tokenizer {
    pub fn new(source: &str) -> Self {
        Self {
            scanner: Scanner::new(source),
        }
    }

    /// Produces the next token, or `None` when a whitespace run was consumed
    /// and the caller should retry. Characters outside the grammar's
    /// alphabet are rejected with [`LogoError::Lexical`].
    pub fn next_token(&mut self) -> Result<Option<Token>, LogoError> {
        let c = self.scanner.scan();

        if c.is_ascii_whitespace() {
            while self.scanner.look_ahead().is_ascii_whitespace() {
                let _ = self.scanner.scan();
            }
            return Ok(None);
        }

        if c == EOF_CHAR {
            return Ok(Some(Token::new(TokenKind::EndOfInput, "")));
        }

        if c.is_ascii_alphabetic() {
            let mut text = String::from(c);
            let mut next = self.scanner.scan();
            while next.is_ascii_alphanumeric() {
                text.push(next);
                next = self.scanner.scan();
            }
            if next != EOF_CHAR {
                self.scanner.rewind();
            }
            let kind = if KEYWORDS.contains(&text.as_str()) {
                TokenKind::Keyword
            } else {
                TokenKind::Identifier
            };
            return Ok(Some(Token::new(kind, text)));
        }

        if c.is_ascii_digit() {
            let mut text = String::from(c);
            let mut next = self.scanner.scan();
            while next.is_ascii_digit() {
                text.push(next);
                next = self.scanner.scan();
            }
            if next != EOF_CHAR {
                self.scanner.rewind();
            }
            return Ok(Some(Token::new(TokenKind::Numeric, text)));
        }

        if c == '[' || c == ']' {
            return Ok(Some(Token::new(TokenKind::Operator, c)));
        }

        Err(LogoError::Lexical {
            ch: c,
            offset: self.scanner.offset() - 1,
        })
    }
}

/// Tokenizes `source` eagerly to completion.
///
/// The returned list always ends in exactly one [`TokenKind::EndOfInput`]
/// token, regardless of trailing whitespace.
pub fn tokenize(source: &str) -> Result<Vec<Token>, LogoError> {
    let mut tokenizer = Tokenizer::new(source);
    let mut tokens = Vec::new();
    loop {
        if let Some(token) = tokenizer.next_token()? {
            let done = token.kind == TokenKind::EndOfInput;
            tokens.push(token);
            if done {
                return Ok(tokens);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(source: &str) -> Vec<TokenKind> {
        tokenize(source).unwrap().iter().map(|t| t.kind).collect()
    }

    #[test]
    fn classifies_a_motion_program() {
        let tokens = tokenize("fd 10 rt 90").unwrap();
        let expected = [
            (TokenKind::Keyword, "fd"),
            (TokenKind::Numeric, "10"),
            (TokenKind::Keyword, "rt"),
            (TokenKind::Numeric, "90"),
            (TokenKind::EndOfInput, ""),
        ];
        assert_eq!(tokens.len(), expected.len());
        for (token, (kind, text)) in tokens.iter().zip(expected) {
            assert_eq!(token.kind, kind);
            assert_eq!(token.text, text);
        }
    }

    #[test]
    fn brackets_are_operators() {
        assert_eq!(
            kinds("repeat 4 [ fd 10 ]"),
            [
                TokenKind::Keyword,
                TokenKind::Numeric,
                TokenKind::Operator,
                TokenKind::Keyword,
                TokenKind::Numeric,
                TokenKind::Operator,
                TokenKind::EndOfInput,
            ]
        );
    }

    #[test]
    fn non_keyword_words_are_identifiers() {
        let tokens = tokenize("fd abc fd2").unwrap();
        assert_eq!(tokens[1].kind, TokenKind::Identifier);
        assert_eq!(tokens[1].text, "abc");
        // Digits are allowed after the leading letter and do not split the word.
        assert_eq!(tokens[2].kind, TokenKind::Identifier);
        assert_eq!(tokens[2].text, "fd2");
    }

    #[test]
    fn single_end_of_input_regardless_of_trailing_whitespace() {
        for source in ["fd 10", "fd 10 ", "fd 10  \n\t ", ""] {
            let tokens = tokenize(source).unwrap();
            let terminators = tokens
                .iter()
                .filter(|t| t.kind == TokenKind::EndOfInput)
                .count();
            assert_eq!(terminators, 1, "source {source:?}");
            assert_eq!(tokens.last().unwrap().kind, TokenKind::EndOfInput);
        }
    }

    #[test]
    fn rejects_characters_outside_the_grammar() {
        match tokenize("fd @10") {
            Err(LogoError::Lexical { ch, offset }) => {
                assert_eq!(ch, '@');
                assert_eq!(offset, 3);
            }
            other => panic!("expected a lexical error, got {other:?}"),
        }
    }

    #[test]
    fn scanner_lookahead_and_rewind() {
        let mut scanner = Scanner::new("ab");
        assert_eq!(scanner.look_ahead(), 'a');
        assert_eq!(scanner.scan(), 'a');
        scanner.rewind();
        assert_eq!(scanner.scan(), 'a');
        assert_eq!(scanner.scan(), 'b');
        // Exhausted: the sentinel repeats and does not advance the cursor.
        assert_eq!(scanner.scan(), EOF_CHAR);
        assert_eq!(scanner.scan(), EOF_CHAR);
        assert_eq!(scanner.look_ahead(), EOF_CHAR);
    }
}
