//! Lexical analysis (tokenization)
//!
//! The lexer converts Rill source code into a stream of tokens with byte-offset
//! spans. It operates on bytes rather than chars because fault reporting is
//! defined in byte offsets; all meaningful syntax is ASCII.

use crate::fault::{Fault, FaultKind};
use crate::span::Span;
use crate::token::{Token, TokenKind};

/// Lexer state for tokenizing source code
pub struct Lexer {
    /// Original source code
    source: String,
    /// Current byte position
    current: usize,
    /// Start position of the current token
    start: usize,
}

impl Lexer {
    /// Create a new lexer for the given source code
    pub fn new(source: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            current: 0,
            start: 0,
        }
    }

    /// Tokenize the source code
    ///
    /// Stops at the first lexical fault; the token stream always ends with Eof.
    pub fn tokenize(&mut self) -> Result<Vec<Token>, Fault> {
        let mut tokens = Vec::new();

        loop {
            let token = self.next_token()?;
            let is_eof = token.kind == TokenKind::Eof;
            tokens.push(token);
            if is_eof {
                break;
            }
        }

        Ok(tokens)
    }

    /// Scan the next token
    fn next_token(&mut self) -> Result<Token, Fault> {
        self.skip_whitespace();
        self.start = self.current;

        if self.is_at_end() {
            return Ok(self.make_token(TokenKind::Eof));
        }

        let b = self.advance();

        match b {
            // Single-byte tokens
            b'(' => Ok(self.make_token(TokenKind::LeftParen)),
            b')' => Ok(self.make_token(TokenKind::RightParen)),
            b'{' => Ok(self.make_token(TokenKind::LeftBrace)),
            b'}' => Ok(self.make_token(TokenKind::RightBrace)),
            b'[' => Ok(self.make_token(TokenKind::LeftBracket)),
            b']' => Ok(self.make_token(TokenKind::RightBracket)),
            b';' => Ok(self.make_token(TokenKind::Semicolon)),
            b',' => Ok(self.make_token(TokenKind::Comma)),
            b'+' => Ok(self.make_token(TokenKind::Plus)),
            b'-' => Ok(self.make_token(TokenKind::Minus)),
            b'*' => Ok(self.make_token(TokenKind::Star)),
            b'/' => Ok(self.make_token(TokenKind::Slash)),
            b'%' => Ok(self.make_token(TokenKind::Percent)),

            // One- or two-byte tokens
            b'=' => {
                if self.match_byte(b'=') {
                    Ok(self.make_token(TokenKind::EqualEqual))
                } else {
                    Ok(self.make_token(TokenKind::Equal))
                }
            }
            b'!' => {
                if self.match_byte(b'=') {
                    Ok(self.make_token(TokenKind::BangEqual))
                } else {
                    Ok(self.make_token(TokenKind::Bang))
                }
            }
            b'<' => {
                if self.match_byte(b'=') {
                    Ok(self.make_token(TokenKind::LessEqual))
                } else {
                    Ok(self.make_token(TokenKind::Less))
                }
            }
            b'>' => {
                if self.match_byte(b'=') {
                    Ok(self.make_token(TokenKind::GreaterEqual))
                } else {
                    Ok(self.make_token(TokenKind::Greater))
                }
            }
            b'&' => {
                if self.match_byte(b'&') {
                    Ok(self.make_token(TokenKind::AmpAmp))
                } else {
                    Err(Fault::new(FaultKind::UnexpectedChar('&'), self.start))
                }
            }
            b'|' => {
                if self.match_byte(b'|') {
                    Ok(self.make_token(TokenKind::PipePipe))
                } else {
                    Err(Fault::new(FaultKind::UnexpectedChar('|'), self.start))
                }
            }

            // String literals
            b'"' => self.string(),

            // Numbers
            b'0'..=b'9' => Ok(self.number()),

            // Identifiers and keywords
            b if b.is_ascii_alphabetic() => Ok(self.identifier()),

            // Unexpected character
            _ => Err(self.unexpected_char()),
        }
    }

    /// Skip whitespace between tokens
    fn skip_whitespace(&mut self) {
        while matches!(self.peek(), b' ' | b'\t' | b'\r' | b'\n') {
            self.current += 1;
        }
    }

    /// Scan a string literal (no escape sequences)
    fn string(&mut self) -> Result<Token, Fault> {
        while !self.is_at_end() && self.peek() != b'"' {
            self.current += 1;
        }

        if self.is_at_end() {
            return Err(Fault::new(FaultKind::UnterminatedString, self.start));
        }

        let value = self.source[self.start + 1..self.current].to_string();
        self.current += 1; // Closing "

        Ok(Token::new(
            TokenKind::String,
            value,
            Span::new(self.start, self.current),
        ))
    }

    /// Scan an integer literal
    fn number(&mut self) -> Token {
        while self.peek().is_ascii_digit() {
            self.current += 1;
        }

        self.make_token(TokenKind::Number)
    }

    /// Scan an identifier or keyword
    fn identifier(&mut self) -> Token {
        while self.peek().is_ascii_alphanumeric() {
            self.current += 1;
        }

        let lexeme = &self.source[self.start..self.current];
        let kind = TokenKind::is_keyword(lexeme).unwrap_or(TokenKind::Identifier);

        self.make_token(kind)
    }

    // === Byte navigation ===

    /// Advance to the next byte and return it
    fn advance(&mut self) -> u8 {
        let b = self.source.as_bytes()[self.current];
        self.current += 1;
        b
    }

    /// Peek at the current byte without advancing (0 at end of input)
    fn peek(&self) -> u8 {
        *self.source.as_bytes().get(self.current).unwrap_or(&0)
    }

    /// Check if the current byte matches, and advance if so
    fn match_byte(&mut self, expected: u8) -> bool {
        if self.peek() == expected {
            self.current += 1;
            true
        } else {
            false
        }
    }

    /// Check if we've reached the end of source
    fn is_at_end(&self) -> bool {
        self.current >= self.source.len()
    }

    // === Token creation ===

    /// Create a token spanning from the token start to the current position
    fn make_token(&self, kind: TokenKind) -> Token {
        Token::new(
            kind,
            &self.source[self.start..self.current],
            Span::new(self.start, self.current),
        )
    }

    /// Build an unexpected-character fault at the token start
    fn unexpected_char(&self) -> Fault {
        let c = self.source[self.start..].chars().next().unwrap_or('\0');
        Fault::new(FaultKind::UnexpectedChar(c), self.start)
    }
}

/// Decode a decimal integer literal with 64-bit wrapping, the same
/// accumulation the evaluator uses for arithmetic.
pub fn integer_value(lexeme: &str) -> u64 {
    lexeme.bytes().fold(0u64, |acc, b| {
        acc.wrapping_mul(10).wrapping_add(u64::from(b - b'0'))
    })
}
