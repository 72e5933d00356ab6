use crate::common::{Location, StaticError};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    // single-character tokens
    LeftParen,
    RightParen,
    LeftBrace,
    RightBrace,
    Comma,
    Dot,
    Minus,
    Plus,
    Semicolon,
    Slash,
    Star,

    // one or two character tokens
    Bang,
    BangEqual,
    Equal,
    EqualEqual,
    Greater,
    GreaterEqual,
    Less,
    LessEqual,

    // literals
    Ident,
    String,
    Number,

    // keywords
    And,
    Class,
    Else,
    False,
    Fun,
    For,
    If,
    Nil,
    Or,
    Print,
    Return,
    Super,
    This,
    True,
    Var,
    While,

    Eof,
}

impl TokenKind {
    pub fn from_keyword_str(name: &str) -> Option<TokenKind> {
        match name {
            "and" => Some(TokenKind::And),
            "class" => Some(TokenKind::Class),
            "else" => Some(TokenKind::Else),
            "false" => Some(TokenKind::False),
            "for" => Some(TokenKind::For),
            "fun" => Some(TokenKind::Fun),
            "if" => Some(TokenKind::If),
            "nil" => Some(TokenKind::Nil),
            "or" => Some(TokenKind::Or),
            "print" => Some(TokenKind::Print),
            "return" => Some(TokenKind::Return),
            "super" => Some(TokenKind::Super),
            "this" => Some(TokenKind::This),
            "true" => Some(TokenKind::True),
            "var" => Some(TokenKind::Var),
            "while" => Some(TokenKind::While),
            _ => None,
        }
    }

    /// Tokens that open a new declaration or statement. The parser stops
    /// discarding tokens when it reaches one of these after an error.
    pub fn starts_statement(&self) -> bool {
        matches!(
            *self,
            Self::Class
                | Self::Fun
                | Self::Var
                | Self::For
                | Self::If
                | Self::While
                | Self::Print
                | Self::Return
        )
    }
}

/// Decoded value of a number or string literal token.
#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    Number(f64),
    String(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub lexeme: String,
    pub literal: Option<Literal>,
    pub line: usize,
}

impl Token {
    pub fn new(kind: TokenKind, lexeme: impl Into<String>, literal: Option<Literal>, line: usize) -> Self {
        Token {
            kind,
            lexeme: lexeme.into(),
            literal,
            line,
        }
    }

    pub fn eof(line: usize) -> Self {
        Token::new(TokenKind::Eof, "", None, line)
    }

    pub fn error_at(&self, message: &str) -> StaticError {
        let location = if self.kind == TokenKind::Eof {
            Location::End
        } else {
            Location::Lexeme(self.lexeme.clone())
        };

        StaticError {
            line: self.line,
            location,
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keywords_resolve_to_their_kinds() {
        assert_eq!(TokenKind::from_keyword_str("var"), Some(TokenKind::Var));
        assert_eq!(TokenKind::from_keyword_str("while"), Some(TokenKind::While));
        assert_eq!(TokenKind::from_keyword_str("variable"), None);
        assert_eq!(TokenKind::from_keyword_str("Print"), None);
    }

    #[test]
    fn error_at_end_marker() {
        let err = Token::eof(3).error_at("Expect ';' after value.");
        assert_eq!(err.to_string(), "[line 3] Error at end: Expect ';' after value.");
    }

    #[test]
    fn error_at_lexeme() {
        let token = Token::new(TokenKind::Equal, "=", None, 1);
        let err = token.error_at("Invalid assignment target.");
        assert_eq!(err.to_string(), "[line 1] Error at '=': Invalid assignment target.");
    }
}
