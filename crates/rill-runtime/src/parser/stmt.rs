//! Statement parsing (recursive descent)

use crate::ast::*;
use crate::fault::Fault;
use crate::parser::Parser;
use crate::token::TokenKind;

impl Parser {
    /// Parse a single statement
    pub(super) fn parse_statement(&mut self) -> Result<Stmt, Fault> {
        match self.peek().kind {
            TokenKind::Print => Ok(Stmt::Print(self.parse_print_call()?)),
            TokenKind::If => self.parse_if(),
            TokenKind::While => self.parse_while(),
            TokenKind::For => self.parse_for(),
            TokenKind::Fun => self.parse_fun(),
            TokenKind::Return => self.parse_return(),
            TokenKind::Identifier => self.parse_identifier_statement(),
            _ => Err(self.expected("a statement")),
        }
    }

    /// Parse a braced statement sequence
    fn parse_block(&mut self) -> Result<Block, Fault> {
        let start = self.consume(TokenKind::LeftBrace, "'{'")?.span;

        let mut stmts = Vec::new();
        loop {
            self.skip_semicolons();
            if self.check(TokenKind::RightBrace) || self.is_at_end() {
                break;
            }
            stmts.push(self.parse_statement()?);
        }

        let end = self.consume(TokenKind::RightBrace, "'}'")?.span;

        Ok(Block {
            stmts,
            span: start.merge(end),
        })
    }

    /// Parse `print(frag + frag + ...)`
    ///
    /// `+` separates fragments (concatenation). A fragment that is neither a
    /// string literal, a parenthesized group, nor identifier-led is parsed as
    /// one full trailing expression, which ends the fragment list.
    pub(super) fn parse_print_call(&mut self) -> Result<PrintStmt, Fault> {
        let start = self.consume(TokenKind::Print, "'print'")?.span;
        self.consume(TokenKind::LeftParen, "'('")?;

        let mut args = Vec::new();
        if !self.check(TokenKind::RightParen) {
            loop {
                let (arg, terminal) = self.parse_print_arg()?;
                args.push(arg);
                if terminal || !self.match_token(TokenKind::Plus) {
                    break;
                }
            }
        }

        let end = self.consume(TokenKind::RightParen, "')'")?.span;

        Ok(PrintStmt {
            args,
            span: start.merge(end),
        })
    }

    /// Parse one print fragment; the bool marks a list-ending trailing expression
    fn parse_print_arg(&mut self) -> Result<(PrintArg, bool), Fault> {
        match self.peek().kind {
            TokenKind::String => {
                let token = self.advance();
                Ok((PrintArg::Text(token.lexeme), false))
            }
            TokenKind::LeftParen => {
                self.advance();
                let expr = self.parse_expression()?;
                self.consume(TokenKind::RightParen, "')'")?;
                Ok((PrintArg::Group(expr), false))
            }
            TokenKind::Identifier => match self.peek_next().kind {
                TokenKind::LeftParen => Ok((PrintArg::Expr(Expr::Call(self.parse_call_expr()?)), false)),
                TokenKind::LeftBracket => {
                    Ok((PrintArg::Expr(Expr::Index(self.parse_index_expr()?)), false))
                }
                _ => {
                    let token = self.advance();
                    Ok((
                        PrintArg::Named(Ident {
                            name: token.lexeme,
                            span: token.span,
                        }),
                        false,
                    ))
                }
            },
            _ => {
                let expr = self.parse_expression()?;
                Ok((PrintArg::Expr(expr), true))
            }
        }
    }

    /// Parse `if (cond) { ... } [else { ... }]`
    fn parse_if(&mut self) -> Result<Stmt, Fault> {
        let start = self.consume(TokenKind::If, "'if'")?.span;
        self.consume(TokenKind::LeftParen, "'('")?;
        let cond = self.parse_expression()?;
        self.consume(TokenKind::RightParen, "')'")?;

        let then_block = self.parse_block()?;
        let mut span = start.merge(then_block.span);

        let else_block = if self.match_token(TokenKind::Else) {
            let block = self.parse_block()?;
            span = span.merge(block.span);
            Some(block)
        } else {
            None
        };

        Ok(Stmt::If(IfStmt {
            cond,
            then_block,
            else_block,
            span,
        }))
    }

    /// Parse `while (cond) { ... }`
    fn parse_while(&mut self) -> Result<Stmt, Fault> {
        let start = self.consume(TokenKind::While, "'while'")?.span;
        self.consume(TokenKind::LeftParen, "'('")?;
        let cond = self.parse_expression()?;
        self.consume(TokenKind::RightParen, "')'")?;

        let body = self.parse_block()?;
        let span = start.merge(body.span);

        Ok(Stmt::While(WhileStmt { cond, body, span }))
    }

    /// Parse `for (integer x = init; cond; y = step) { ... }`
    ///
    /// The type name in the header is optional and ignored; the update target
    /// may be any identifier, not just the counter.
    fn parse_for(&mut self) -> Result<Stmt, Fault> {
        let start = self.consume(TokenKind::For, "'for'")?.span;
        self.consume(TokenKind::LeftParen, "'('")?;

        if self.starts_typed_declaration() {
            self.advance();
        }

        let var = self.parse_ident("a loop variable")?;
        self.consume(TokenKind::Equal, "'='")?;
        let init = self.parse_expression()?;
        self.consume(TokenKind::Semicolon, "';'")?;

        let cond = self.parse_expression()?;
        self.consume(TokenKind::Semicolon, "';'")?;

        let step_var = self.parse_ident("an update variable")?;
        self.consume(TokenKind::Equal, "'='")?;
        let step = self.parse_expression()?;
        self.consume(TokenKind::RightParen, "')'")?;

        let body = self.parse_block()?;
        let span = start.merge(body.span);

        Ok(Stmt::For(ForStmt {
            var,
            init,
            cond,
            step_var,
            step,
            body,
            span,
        }))
    }

    /// Parse `fun name(params) { ... }`
    fn parse_fun(&mut self) -> Result<Stmt, Fault> {
        let start = self.consume(TokenKind::Fun, "'fun'")?.span;
        let name = self.parse_ident("a function name")?;

        self.consume(TokenKind::LeftParen, "'('")?;
        let mut params = Vec::new();
        if !self.check(TokenKind::RightParen) {
            loop {
                params.push(self.parse_ident("a parameter name")?);
                if !self.match_token(TokenKind::Comma) {
                    break;
                }
            }
        }
        self.consume(TokenKind::RightParen, "')'")?;

        let body = self.parse_block()?;
        let span = start.merge(body.span);

        Ok(Stmt::FunDecl(FunDecl {
            name,
            params,
            body,
            span,
        }))
    }

    /// Parse `return expr`
    fn parse_return(&mut self) -> Result<Stmt, Fault> {
        let start = self.consume(TokenKind::Return, "'return'")?.span;
        let value = self.parse_expression()?;
        let span = start.merge(value.span());

        Ok(Stmt::Return(ReturnStmt { value, span }))
    }

    /// Parse an identifier-led statement: typed declaration, assignment,
    /// array declaration, element assignment, or a bare call.
    fn parse_identifier_statement(&mut self) -> Result<Stmt, Fault> {
        if self.starts_typed_declaration() {
            let type_token = self.advance();
            // Guarded by starts_typed_declaration
            let type_name = TypeName::from_lexeme(&type_token.lexeme).unwrap();
            let name = self.parse_ident("a variable name")?;

            if self.check(TokenKind::LeftBracket) {
                return self.finish_array_decl(type_token.span, name);
            }

            self.consume(TokenKind::Equal, "'='")?;
            let rhs = self.parse_rhs()?;
            let span = type_token.span.merge(self.rhs_span(&rhs, name.span));

            return Ok(Stmt::Assign(AssignStmt {
                type_name: Some(type_name),
                name,
                rhs,
                span,
            }));
        }

        match self.peek_next().kind {
            TokenKind::LeftParen => Ok(Stmt::Call(self.parse_call_expr()?)),
            TokenKind::Equal => {
                let name = self.parse_ident("a variable name")?;
                self.consume(TokenKind::Equal, "'='")?;
                let rhs = self.parse_rhs()?;
                let span = name.span.merge(self.rhs_span(&rhs, name.span));

                Ok(Stmt::Assign(AssignStmt {
                    type_name: None,
                    name,
                    rhs,
                    span,
                }))
            }
            TokenKind::LeftBracket => {
                let name = self.parse_ident("a variable name")?;
                self.finish_bracketed(name)
            }
            _ => Err(self.expected("a statement")),
        }
    }

    /// After `name`, parse `[expr]` and decide between an array declaration
    /// and an element assignment by the presence of a trailing `=`.
    fn finish_bracketed(&mut self, name: Ident) -> Result<Stmt, Fault> {
        self.consume(TokenKind::LeftBracket, "'['")?;
        let index = self.parse_expression()?;
        let end = self.consume(TokenKind::RightBracket, "']'")?.span;

        if self.match_token(TokenKind::Equal) {
            let value = self.parse_expression()?;
            let span = name.span.merge(value.span());
            return Ok(Stmt::ElementAssign(ElementAssignStmt {
                name,
                index,
                value,
                span,
            }));
        }

        let span = name.span.merge(end);
        Ok(Stmt::ArrayDecl(ArrayDeclStmt {
            name,
            size: index,
            span,
        }))
    }

    /// Parse `name[size]` in a typed declaration (`TYPE name[size]`)
    fn finish_array_decl(&mut self, start: crate::span::Span, name: Ident) -> Result<Stmt, Fault> {
        self.consume(TokenKind::LeftBracket, "'['")?;
        let size = self.parse_expression()?;
        let end = self.consume(TokenKind::RightBracket, "']'")?.span;

        Ok(Stmt::ArrayDecl(ArrayDeclStmt {
            name,
            size,
            span: start.merge(end),
        }))
    }

    /// Parse an assignment right-hand side
    ///
    /// A rhs led by a string literal must be a concatenation. A rhs led by
    /// `(` is ambiguous: `(1) + (2)` is a valid expression AND a valid
    /// concatenation. Both readings are attempted; if they consume the same
    /// tokens both are kept and the executor picks by the target's type, and
    /// if one reads further it wins outright.
    fn parse_rhs(&mut self) -> Result<Rhs, Fault> {
        match self.peek().kind {
            TokenKind::String => Ok(Rhs::Concat(self.parse_concat_pieces()?)),
            TokenKind::LeftParen => {
                let start = self.current;

                let pieces_attempt = self.parse_concat_pieces();
                let pieces_end = self.current;

                self.current = start;
                let expr_attempt = self.parse_expression();
                let expr_end = self.current;

                match (pieces_attempt, expr_attempt) {
                    (Ok(pieces), Ok(expr)) => {
                        if expr_end > pieces_end {
                            Ok(Rhs::Expr(expr))
                        } else if pieces_end > expr_end {
                            self.current = pieces_end;
                            Ok(Rhs::Concat(pieces))
                        } else {
                            Ok(Rhs::Either { expr, pieces })
                        }
                    }
                    (Ok(pieces), Err(_)) => {
                        self.current = pieces_end;
                        Ok(Rhs::Concat(pieces))
                    }
                    (Err(_), Ok(expr)) => Ok(Rhs::Expr(expr)),
                    (Err(_), Err(fault)) => Err(fault),
                }
            }
            _ => Ok(Rhs::Expr(self.parse_expression()?)),
        }
    }

    /// Parse string-concatenation pieces: `"..."` or `(expr)`, joined by `+`
    fn parse_concat_pieces(&mut self) -> Result<Vec<StrPart>, Fault> {
        let mut pieces = Vec::new();

        loop {
            match self.peek().kind {
                TokenKind::String => {
                    let token = self.advance();
                    pieces.push(StrPart::Literal(token.lexeme));
                }
                TokenKind::LeftParen => {
                    self.advance();
                    let expr = self.parse_expression()?;
                    self.consume(TokenKind::RightParen, "')'")?;
                    pieces.push(StrPart::Group(expr));
                }
                _ => return Err(self.expected("a string piece")),
            }

            if !self.match_token(TokenKind::Plus) {
                break;
            }
        }

        Ok(pieces)
    }

    /// End span of a parsed rhs, falling back to the target name's span
    fn rhs_span(&self, rhs: &Rhs, fallback: crate::span::Span) -> crate::span::Span {
        match rhs {
            Rhs::Expr(expr) | Rhs::Either { expr, .. } => expr.span(),
            Rhs::Concat(pieces) => match pieces.last() {
                Some(StrPart::Group(expr)) => expr.span(),
                _ => fallback,
            },
        }
    }

    /// Consume an identifier token into an Ident
    fn parse_ident(&mut self, expected: &str) -> Result<Ident, Fault> {
        let token = self.consume(TokenKind::Identifier, expected)?;
        Ok(Ident {
            name: token.lexeme,
            span: token.span,
        })
    }

    /// Check for `TYPE name` at the current position (typed declaration head)
    fn starts_typed_declaration(&self) -> bool {
        self.check(TokenKind::Identifier)
            && TypeName::from_lexeme(&self.peek().lexeme).is_some()
            && self.peek_next().kind == TokenKind::Identifier
    }
}
