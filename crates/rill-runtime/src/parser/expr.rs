//! Expression parsing (Pratt parsing)

use crate::ast::*;
use crate::fault::Fault;
use crate::lexer::integer_value;
use crate::parser::{Parser, Precedence};
use crate::token::{Token, TokenKind};

impl Parser {
    /// Parse an expression
    pub(crate) fn parse_expression(&mut self) -> Result<Expr, Fault> {
        self.parse_precedence(Precedence::Lowest)
    }

    /// Parse expression with given precedence
    pub(super) fn parse_precedence(&mut self, precedence: Precedence) -> Result<Expr, Fault> {
        let mut left = self.parse_prefix()?;

        while precedence < self.current_precedence() {
            left = self.parse_binary(left)?;
        }

        Ok(left)
    }

    /// Parse prefix expression
    fn parse_prefix(&mut self) -> Result<Expr, Fault> {
        match self.peek().kind {
            TokenKind::Number => self.parse_number(),
            TokenKind::True | TokenKind::False => self.parse_bool(),
            TokenKind::Identifier => self.parse_identifier_expr(),
            TokenKind::LeftParen => self.parse_group(),
            TokenKind::Bang => self.parse_bang_run(),
            TokenKind::Print => {
                let print = self.parse_print_call()?;
                Ok(Expr::Print(print))
            }
            _ => Err(self.expected("an expression")),
        }
    }

    /// Get precedence of the current token as an infix operator
    fn current_precedence(&self) -> Precedence {
        self.token_precedence(self.peek())
    }

    /// Get precedence for a token
    fn token_precedence(&self, token: &Token) -> Precedence {
        match token.kind {
            TokenKind::PipePipe => Precedence::Or,
            TokenKind::AmpAmp => Precedence::And,
            TokenKind::EqualEqual | TokenKind::BangEqual => Precedence::Equality,
            TokenKind::Less
            | TokenKind::LessEqual
            | TokenKind::Greater
            | TokenKind::GreaterEqual => Precedence::Comparison,
            TokenKind::Plus | TokenKind::Minus => Precedence::Term,
            TokenKind::Star | TokenKind::Slash | TokenKind::Percent => Precedence::Factor,
            _ => Precedence::Lowest,
        }
    }

    /// Parse an integer literal (accumulated with 64-bit wrapping)
    fn parse_number(&mut self) -> Result<Expr, Fault> {
        let token = self.advance();
        Ok(Expr::Number(integer_value(&token.lexeme), token.span))
    }

    /// Parse a boolean literal
    fn parse_bool(&mut self) -> Result<Expr, Fault> {
        let token = self.advance();
        Ok(Expr::Bool(token.kind == TokenKind::True, token.span))
    }

    /// Parse an identifier-led expression: variable, call, or element read
    fn parse_identifier_expr(&mut self) -> Result<Expr, Fault> {
        match self.peek_next().kind {
            TokenKind::LeftParen => Ok(Expr::Call(self.parse_call_expr()?)),
            TokenKind::LeftBracket => Ok(Expr::Index(self.parse_index_expr()?)),
            _ => {
                let token = self.advance();
                Ok(Expr::Variable(Ident {
                    name: token.lexeme,
                    span: token.span,
                }))
            }
        }
    }

    /// Parse a parenthesized expression
    fn parse_group(&mut self) -> Result<Expr, Fault> {
        self.consume(TokenKind::LeftParen, "'('")?;
        let expr = self.parse_expression()?;
        self.consume(TokenKind::RightParen, "')'")?;
        Ok(expr)
    }

    /// Parse a run of `!` and resolve it by parity: an even run vanishes, an
    /// odd run becomes a single logical negation.
    fn parse_bang_run(&mut self) -> Result<Expr, Fault> {
        let first = self.advance();
        let mut span = first.span;
        let mut negate = true;

        while self.check(TokenKind::Bang) {
            let token = self.advance();
            span = span.merge(token.span);
            negate = !negate;
        }

        let operand = self.parse_precedence(Precedence::Unary)?;
        let span = span.merge(operand.span());

        if negate {
            Ok(Expr::Unary(UnaryExpr {
                expr: Box::new(operand),
                span,
            }))
        } else {
            Ok(operand)
        }
    }

    /// Parse a binary expression continuing from `left`
    fn parse_binary(&mut self, left: Expr) -> Result<Expr, Fault> {
        let left_span = left.span();
        let op_token = self.advance();

        let (op, precedence) = match op_token.kind {
            TokenKind::PipePipe => (BinOp::Or, Precedence::Or),
            TokenKind::AmpAmp => (BinOp::And, Precedence::And),
            TokenKind::EqualEqual => (BinOp::Eq, Precedence::Equality),
            TokenKind::BangEqual => (BinOp::Ne, Precedence::Equality),
            TokenKind::Less => (BinOp::Lt, Precedence::Comparison),
            TokenKind::LessEqual => (BinOp::Le, Precedence::Comparison),
            TokenKind::Greater => (BinOp::Gt, Precedence::Comparison),
            TokenKind::GreaterEqual => (BinOp::Ge, Precedence::Comparison),
            TokenKind::Plus => (BinOp::Add, Precedence::Term),
            TokenKind::Minus => (BinOp::Sub, Precedence::Term),
            TokenKind::Star => (BinOp::Mul, Precedence::Factor),
            TokenKind::Slash => (BinOp::Div, Precedence::Factor),
            TokenKind::Percent => (BinOp::Mod, Precedence::Factor),
            _ => unreachable!(),
        };

        let right = self.parse_precedence(precedence)?;
        let span = left_span.merge(right.span());

        Ok(Expr::Binary(BinaryExpr {
            op,
            left: Box::new(left),
            right: Box::new(right),
            span,
        }))
    }

    /// Parse `name(args)` starting at the name
    pub(super) fn parse_call_expr(&mut self) -> Result<CallExpr, Fault> {
        let name_token = self.consume(TokenKind::Identifier, "a function name")?;
        let name = Ident {
            name: name_token.lexeme,
            span: name_token.span,
        };

        self.consume(TokenKind::LeftParen, "'('")?;

        let mut args = Vec::new();
        if !self.check(TokenKind::RightParen) {
            loop {
                args.push(self.parse_expression()?);
                if !self.match_token(TokenKind::Comma) {
                    break;
                }
            }
        }

        let end = self.consume(TokenKind::RightParen, "')'")?;

        Ok(CallExpr {
            span: name.span.merge(end.span),
            name,
            args,
        })
    }

    /// Parse `name[index]` starting at the name
    pub(super) fn parse_index_expr(&mut self) -> Result<IndexExpr, Fault> {
        let name_token = self.consume(TokenKind::Identifier, "an array name")?;
        let name = Ident {
            name: name_token.lexeme,
            span: name_token.span,
        };

        self.consume(TokenKind::LeftBracket, "'['")?;
        let index = self.parse_expression()?;
        let end = self.consume(TokenKind::RightBracket, "']'")?;

        Ok(IndexExpr {
            span: name.span.merge(end.span),
            name,
            index: Box::new(index),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexer::Lexer;

    fn parse_expr(source: &str) -> Expr {
        let tokens = Lexer::new(source).tokenize().unwrap();
        let mut parser = Parser::new(tokens);
        let expr = parser.parse_expression().unwrap();
        assert!(parser.is_at_end(), "leftover tokens in {:?}", source);
        expr
    }

    #[test]
    fn test_number_literal() {
        assert!(matches!(parse_expr("42"), Expr::Number(42, _)));
    }

    #[test]
    fn test_bool_literals() {
        assert!(matches!(parse_expr("true"), Expr::Bool(true, _)));
        assert!(matches!(parse_expr("false"), Expr::Bool(false, _)));
    }

    #[test]
    fn test_precedence_mul_over_add() {
        // 2 + 3 * 4 parses as 2 + (3 * 4)
        let expr = parse_expr("2 + 3 * 4");
        match expr {
            Expr::Binary(b) => {
                assert_eq!(b.op, BinOp::Add);
                assert!(matches!(*b.left, Expr::Number(2, _)));
                match *b.right {
                    Expr::Binary(inner) => assert_eq!(inner.op, BinOp::Mul),
                    other => panic!("expected Mul on the right, got {:?}", other),
                }
            }
            other => panic!("expected Binary, got {:?}", other),
        }
    }

    #[test]
    fn test_left_associativity() {
        // 10 - 3 - 2 parses as (10 - 3) - 2
        let expr = parse_expr("10 - 3 - 2");
        match expr {
            Expr::Binary(b) => {
                assert_eq!(b.op, BinOp::Sub);
                assert!(matches!(*b.right, Expr::Number(2, _)));
                assert!(matches!(*b.left, Expr::Binary(_)));
            }
            other => panic!("expected Binary, got {:?}", other),
        }
    }

    #[test]
    fn test_comparison_binds_looser_than_arithmetic() {
        let expr = parse_expr("1 + 2 < 3 * 4");
        match expr {
            Expr::Binary(b) => assert_eq!(b.op, BinOp::Lt),
            other => panic!("expected Lt at the root, got {:?}", other),
        }
    }

    #[test]
    fn test_logical_operators_loosest() {
        let expr = parse_expr("1 < 2 && 3 < 4 || 5 < 6");
        match expr {
            Expr::Binary(b) => assert_eq!(b.op, BinOp::Or),
            other => panic!("expected Or at the root, got {:?}", other),
        }
    }

    #[test]
    fn test_bang_parity_odd() {
        assert!(matches!(parse_expr("!0"), Expr::Unary(_)));
        assert!(matches!(parse_expr("!!!0"), Expr::Unary(_)));
    }

    #[test]
    fn test_bang_parity_even() {
        // An even run of ! cancels out entirely
        assert!(matches!(parse_expr("!!5"), Expr::Number(5, _)));
    }

    #[test]
    fn test_grouping_overrides_precedence() {
        let expr = parse_expr("(2 + 3) * 4");
        match expr {
            Expr::Binary(b) => assert_eq!(b.op, BinOp::Mul),
            other => panic!("expected Mul at the root, got {:?}", other),
        }
    }

    #[test]
    fn test_call_expression() {
        let expr = parse_expr("f(1, x)");
        match expr {
            Expr::Call(call) => {
                assert_eq!(call.name.name, "f");
                assert_eq!(call.args.len(), 2);
            }
            other => panic!("expected Call, got {:?}", other),
        }
    }

    #[test]
    fn test_index_expression() {
        let expr = parse_expr("a[i + 1]");
        match expr {
            Expr::Index(ix) => assert_eq!(ix.name.name, "a"),
            other => panic!("expected Index, got {:?}", other),
        }
    }

    #[test]
    fn test_missing_operand_faults() {
        let tokens = Lexer::new("1 +").tokenize().unwrap();
        let mut parser = Parser::new(tokens);
        assert!(parser.parse_expression().is_err());
    }
}
