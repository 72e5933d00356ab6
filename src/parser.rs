use tracing::trace;

use crate::{
    ast::{self, BinaryOp, UnaryOp},
    common::StaticError,
    token::{Token, TokenKind},
    value::Value,
};

/// Deepest syntax tree the parser will build. Evaluation and printing recurse
/// over the tree, so this also bounds their stack use.
pub const MAX_NESTING: usize = 255;

#[derive(Debug, Clone)]
struct Parser<'a> {
    tokens: &'a [Token],
    current: usize,
    depth: usize,
}

impl<'a> Parser<'a> {
    fn new(tokens: &'a [Token]) -> Self {
        Parser {
            tokens,
            current: 0,
            depth: 0,
        }
    }

    /// Goes one level deeper. Callers step back out with `self.depth -= 1`
    /// on success only; `parse` resets the depth for every declaration.
    fn enter(&mut self) -> Result<(), StaticError> {
        if self.depth >= MAX_NESTING {
            return Err(self.peek().error_at("Too much nesting."));
        }
        self.depth += 1;
        Ok(())
    }

    /// The current token. Past the end this keeps returning the final token,
    /// which the lexer guarantees is `Eof`.
    fn peek(&self) -> &'a Token {
        let tokens: &'a [Token] = self.tokens;
        &tokens[self.current.min(tokens.len() - 1)]
    }

    fn previous(&self) -> &'a Token {
        let tokens: &'a [Token] = self.tokens;
        &tokens[self.current.saturating_sub(1)]
    }

    fn at_end(&self) -> bool {
        self.current >= self.tokens.len() || self.peek().kind == TokenKind::Eof
    }

    fn check(&self, kind: TokenKind) -> bool {
        self.peek().kind == kind
    }

    fn advance(&mut self) -> &'a Token {
        if !self.at_end() {
            self.current += 1;
        }
        self.previous()
    }

    fn expect(&mut self, kind: TokenKind, message: &str) -> Result<&'a Token, StaticError> {
        if self.check(kind) {
            Ok(self.advance())
        } else {
            Err(self.peek().error_at(message))
        }
    }

    /// Discards tokens until just past a `;` or just before a token that
    /// starts a new statement.
    fn synchronize(&mut self) {
        self.advance();

        while !self.at_end() {
            if self.previous().kind == TokenKind::Semicolon {
                break;
            }
            if self.peek().kind.starts_statement() {
                break;
            }
            self.advance();
        }

        trace!(line = self.peek().line, "parser synchronized");
    }

    fn parse_declaration(&mut self) -> Result<ast::Stmt, StaticError> {
        if self.check(TokenKind::Var) {
            self.advance();
            self.parse_var_decl()
        } else {
            self.parse_statement()
        }
    }

    fn parse_var_decl(&mut self) -> Result<ast::Stmt, StaticError> {
        let ident = self.expect(TokenKind::Ident, "Expect variable name.")?.clone();

        let init = if self.check(TokenKind::Equal) {
            self.advance();
            Some(self.parse_expr()?)
        } else {
            None
        };

        self.expect(
            TokenKind::Semicolon,
            "Expect ';' after variable declaration.",
        )?;

        Ok(ast::VarDecl { ident, init }.into())
    }

    fn parse_statement(&mut self) -> Result<ast::Stmt, StaticError> {
        match self.peek().kind {
            TokenKind::Print => {
                let keyword = self.advance().clone();
                let expr = self.parse_expr()?;
                self.expect(TokenKind::Semicolon, "Expect ';' after value.")?;
                Ok(ast::PrintStmt { keyword, expr }.into())
            }
            TokenKind::LeftBrace => {
                self.advance();
                self.enter()?;
                let block = self.parse_block()?;
                self.depth -= 1;
                Ok(block.into())
            }
            _ => {
                let expr = self.parse_expr()?;
                self.expect(TokenKind::Semicolon, "Expect ';' after expression.")?;
                Ok(ast::ExprStmt { expr }.into())
            }
        }
    }

    /// Parses the rest of a block whose `{` has already been consumed.
    fn parse_block(&mut self) -> Result<ast::Block, StaticError> {
        let mut stmts = Vec::new();
        while !self.check(TokenKind::RightBrace) && !self.at_end() {
            stmts.push(self.parse_declaration()?);
        }

        self.expect(TokenKind::RightBrace, "Expect '}' after block.")?;

        Ok(ast::Block { stmts })
    }

    fn parse_expr(&mut self) -> Result<ast::Expr, StaticError> {
        self.enter()?;
        let expr = self.parse_assignment()?;
        self.depth -= 1;
        Ok(expr)
    }

    fn parse_assignment(&mut self) -> Result<ast::Expr, StaticError> {
        let expr = self.parse_binary(1)?;

        if self.check(TokenKind::Equal) {
            let equals = self.advance();
            self.enter()?;
            let value = self.parse_assignment()?;
            self.depth -= 1;

            return match expr {
                ast::Expr::Var(var_expr) => Ok(ast::AssignExpr {
                    ident: var_expr.ident,
                    value: Box::new(value),
                }
                .into()),
                _ => Err(equals.error_at("Invalid assignment target.")),
            };
        }

        Ok(expr)
    }

    /// Precedence climbing over the binary operator levels. Operands on the
    /// right bind at `prec + 1`, which makes every level left-associative.
    /// Each fold deepens the tree, so a long chain counts against the
    /// nesting limit like explicit parentheses do.
    fn parse_binary(&mut self, min_prec: u8) -> Result<ast::Expr, StaticError> {
        let depth = self.depth;
        let mut lhs = self.parse_unary()?;

        while let Some(op) = BinaryOp::from_token_kind(self.peek().kind) {
            let prec = op.precedence();
            if prec < min_prec {
                break;
            }

            self.enter()?;
            let operator = self.advance().clone();
            let rhs = self.parse_binary(prec + 1)?;

            lhs = ast::BinaryExpr {
                op,
                operator,
                left: Box::new(lhs),
                right: Box::new(rhs),
            }
            .into();
        }

        self.depth = depth;
        Ok(lhs)
    }

    fn parse_unary(&mut self) -> Result<ast::Expr, StaticError> {
        if let Some(op) = UnaryOp::from_token_kind(self.peek().kind) {
            let operator = self.advance().clone();
            self.enter()?;
            let expr = self.parse_unary()?;
            self.depth -= 1;
            return Ok(ast::UnaryExpr {
                op,
                operator,
                expr: Box::new(expr),
            }
            .into());
        }

        self.parse_primary()
    }

    fn parse_primary(&mut self) -> Result<ast::Expr, StaticError> {
        let token = self.peek();

        let value = match token.kind {
            TokenKind::False => Value::Bool(false),
            TokenKind::True => Value::Bool(true),
            TokenKind::Nil => Value::Nil,
            TokenKind::Number | TokenKind::String => match &token.literal {
                Some(literal) => literal.clone().into(),
                None => return Err(token.error_at("Expect expression.")),
            },
            TokenKind::LeftParen => {
                self.advance();
                let expr = self.parse_expr()?;
                self.expect(TokenKind::RightParen, "Expect ')' after expression.")?;
                return Ok(ast::GroupingExpr {
                    expr: Box::new(expr),
                }
                .into());
            }
            TokenKind::Ident => {
                self.advance();
                return Ok(ast::VarExpr {
                    ident: token.clone(),
                }
                .into());
            }
            _ => return Err(token.error_at("Expect expression.")),
        };

        self.advance();
        Ok(ast::LiteralExpr { value }.into())
    }
}

/// Parses a whole program. A malformed declaration yields one diagnostic and
/// no statement; parsing resumes at the next statement boundary.
pub fn parse(tokens: &[Token]) -> (Vec<ast::Stmt>, Vec<StaticError>) {
    let mut stmts = Vec::new();
    let mut errors = Vec::new();

    if tokens.is_empty() {
        return (stmts, errors);
    }

    let mut parser = Parser::new(tokens);
    while !parser.at_end() {
        parser.depth = 0;
        match parser.parse_declaration() {
            Ok(stmt) => stmts.push(stmt),
            Err(err) => {
                errors.push(err);
                parser.synchronize();
            }
        }
    }

    (stmts, errors)
}
