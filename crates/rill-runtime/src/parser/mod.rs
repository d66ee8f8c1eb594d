//! Parsing (tokens to AST)
//!
//! The parser converts a stream of tokens into an AST in a single pass. It
//! uses Pratt parsing for expressions and recursive descent for statements,
//! and stops at the first fault.

mod expr;
mod stmt;

use crate::ast::Program;
use crate::fault::{Fault, FaultKind};
use crate::token::{Token, TokenKind};

/// Parser state for building an AST from tokens
pub struct Parser {
    pub(super) tokens: Vec<Token>,
    pub(super) current: usize,
}

/// Operator precedence levels for Pratt parsing
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub(super) enum Precedence {
    Lowest,
    Or,         // ||
    And,        // &&
    Equality,   // == !=
    Comparison, // < <= > >=
    Term,       // + -
    Factor,     // * / %
    Unary,      // !
}

impl Parser {
    /// Create a new parser for the given tokens (must end with Eof)
    pub fn new(tokens: Vec<Token>) -> Self {
        Self { tokens, current: 0 }
    }

    /// Parse the whole token stream into a program
    ///
    /// The entire input must be consumed. One stray closing brace at top level
    /// is tolerated, provided nothing but whitespace follows it.
    pub fn parse(&mut self) -> Result<Program, Fault> {
        let mut stmts = Vec::new();

        loop {
            self.skip_semicolons();
            if self.is_at_end() {
                break;
            }

            if self.check(TokenKind::RightBrace) {
                self.advance();
                self.skip_semicolons();
                if self.is_at_end() {
                    break;
                }
                let token = self.peek();
                return Err(Fault::new(FaultKind::TrailingInput, token.span.start));
            }

            stmts.push(self.parse_statement()?);
        }

        Ok(Program { stmts })
    }

    // === Token navigation ===

    /// Peek at the current token without advancing
    pub(super) fn peek(&self) -> &Token {
        &self.tokens[self.current.min(self.tokens.len() - 1)]
    }

    /// Peek one token past the current one
    pub(super) fn peek_next(&self) -> &Token {
        &self.tokens[(self.current + 1).min(self.tokens.len() - 1)]
    }

    /// Advance past the current token and return it
    pub(super) fn advance(&mut self) -> Token {
        let token = self.peek().clone();
        if !self.is_at_end() {
            self.current += 1;
        }
        token
    }

    /// Check the current token's kind
    pub(super) fn check(&self, kind: TokenKind) -> bool {
        self.peek().kind == kind
    }

    /// Advance if the current token matches the given kind
    pub(super) fn match_token(&mut self, kind: TokenKind) -> bool {
        if self.check(kind) {
            self.advance();
            true
        } else {
            false
        }
    }

    /// Require a token of the given kind, or fault
    pub(super) fn consume(&mut self, kind: TokenKind, expected: &str) -> Result<Token, Fault> {
        if self.check(kind) {
            Ok(self.advance())
        } else {
            Err(self.expected(expected))
        }
    }

    /// Build an expected-token fault at the current position
    pub(super) fn expected(&self, expected: &str) -> Fault {
        let token = self.peek();
        Fault::new(
            FaultKind::Expected {
                expected: expected.to_string(),
                found: token.kind.as_str().to_string(),
            },
            token.span.start,
        )
    }

    /// Skip any run of statement-separating semicolons
    pub(super) fn skip_semicolons(&mut self) {
        while self.match_token(TokenKind::Semicolon) {}
    }

    /// Check if we've reached the end of the token stream
    pub(super) fn is_at_end(&self) -> bool {
        self.peek().kind == TokenKind::Eof
    }
}
