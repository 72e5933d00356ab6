use tracing::debug;

use crate::{
    common::StaticError,
    token::{Literal, Token, TokenKind},
};

#[derive(Debug, Clone)]
pub struct Lexer {
    source: Vec<char>,

    start: usize,
    current: usize,
    line: usize,
}

impl Lexer {
    pub fn from_str(source: &str) -> Self {
        Lexer::from_chars(source.chars().collect())
    }

    pub fn from_chars(chars: Vec<char>) -> Self {
        Lexer {
            source: chars,
            start: 0,
            current: 0,
            line: 1,
        }
    }

    fn at_end(&self) -> bool {
        self.current >= self.source.len()
    }

    fn advance(&mut self) -> char {
        let c = self.source[self.current];
        self.current += 1;
        c
    }

    fn peek(&self) -> Option<char> {
        self.source.get(self.current).copied()
    }

    fn peek_next(&self) -> Option<char> {
        self.source.get(self.current + 1).copied()
    }

    /// Consumes the next character only if it is `expected`.
    fn matches(&mut self, expected: char) -> bool {
        if self.peek() == Some(expected) {
            self.current += 1;
            true
        } else {
            false
        }
    }

    fn lexeme(&self) -> String {
        self.source[self.start..self.current].iter().collect()
    }

    fn create_token(&self, kind: TokenKind, literal: Option<Literal>) -> Token {
        Token::new(kind, self.lexeme(), literal, self.line)
    }

    fn lex_string(&mut self) -> Result<Token, StaticError> {
        while let Some(c) = self.peek() {
            if c == '"' {
                break;
            }
            if c == '\n' {
                self.line += 1;
            }
            self.advance();
        }

        if self.at_end() {
            return Err(StaticError::at_line(self.line, "Unterminated string."));
        }

        self.advance(); // the closing '"'

        let value = self.source[self.start + 1..self.current - 1].iter().collect();
        Ok(self.create_token(TokenKind::String, Some(Literal::String(value))))
    }

    fn lex_number(&mut self) -> Token {
        while self.peek().is_some_and(|c| c.is_ascii_digit()) {
            self.advance();
        }

        if self.peek() == Some('.') && self.peek_next().is_some_and(|c| c.is_ascii_digit()) {
            self.advance();
            while self.peek().is_some_and(|c| c.is_ascii_digit()) {
                self.advance();
            }
        }

        // digits with at most one interior dot always parse
        let value = self.lexeme().parse::<f64>().unwrap_or_default();
        self.create_token(TokenKind::Number, Some(Literal::Number(value)))
    }

    fn lex_ident(&mut self) -> Token {
        while self.peek().is_some_and(is_ident_continue) {
            self.advance();
        }

        let kind = TokenKind::from_keyword_str(&self.lexeme()).unwrap_or(TokenKind::Ident);
        self.create_token(kind, None)
    }

    fn lex_token(&mut self) -> Result<Option<Token>, StaticError> {
        let c = self.advance();

        let kind = match c {
            '(' => TokenKind::LeftParen,
            ')' => TokenKind::RightParen,
            '{' => TokenKind::LeftBrace,
            '}' => TokenKind::RightBrace,
            ',' => TokenKind::Comma,
            '.' => TokenKind::Dot,
            '-' => TokenKind::Minus,
            '+' => TokenKind::Plus,
            ';' => TokenKind::Semicolon,
            '*' => TokenKind::Star,
            '!' => {
                if self.matches('=') {
                    TokenKind::BangEqual
                } else {
                    TokenKind::Bang
                }
            }
            '=' => {
                if self.matches('=') {
                    TokenKind::EqualEqual
                } else {
                    TokenKind::Equal
                }
            }
            '<' => {
                if self.matches('=') {
                    TokenKind::LessEqual
                } else {
                    TokenKind::Less
                }
            }
            '>' => {
                if self.matches('=') {
                    TokenKind::GreaterEqual
                } else {
                    TokenKind::Greater
                }
            }
            '/' => {
                if self.matches('/') {
                    while self.peek().is_some_and(|c| c != '\n') {
                        self.advance();
                    }
                    return Ok(None);
                }
                TokenKind::Slash
            }

            ' ' | '\r' | '\t' => return Ok(None),
            '\n' => {
                self.line += 1;
                return Ok(None);
            }

            '"' => return self.lex_string().map(Some),

            _ if c.is_ascii_digit() => return Ok(Some(self.lex_number())),
            _ if is_ident_start(c) => return Ok(Some(self.lex_ident())),

            _ => {
                return Err(StaticError::at_line(
                    self.line,
                    format!("Unexpected character: {}", c),
                ))
            }
        };

        Ok(Some(self.create_token(kind, None)))
    }

    /// Scans the whole source. Bad characters are reported and skipped, so
    /// the returned tokens always end with an `Eof` marker.
    pub fn lex(&mut self) -> (Vec<Token>, Vec<StaticError>) {
        let mut tokens = Vec::new();
        let mut errors = Vec::new();

        while !self.at_end() {
            self.start = self.current;
            match self.lex_token() {
                Ok(Some(token)) => tokens.push(token),
                Ok(None) => {}
                Err(err) => errors.push(err),
            }
        }

        tokens.push(Token::eof(self.line));

        debug!(
            tokens = tokens.len(),
            errors = errors.len(),
            lines = self.line,
            "scanned source"
        );

        (tokens, errors)
    }
}

fn is_ident_start(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '_'
}

fn is_ident_continue(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

pub fn scan(source: &str) -> (Vec<Token>, Vec<StaticError>) {
    Lexer::from_str(source).lex()
}
