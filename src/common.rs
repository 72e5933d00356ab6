use std::fmt;

use thiserror::Error;

use crate::token::Token;

/// Where on its line a static error was detected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Location {
    Nowhere,
    End,
    Lexeme(String),
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Location::Nowhere => Ok(()),
            Location::End => f.write_str(" at end"),
            Location::Lexeme(lexeme) => write!(f, " at '{}'", lexeme),
        }
    }
}

/// A scan-time or parse-time diagnostic.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("[line {line}] Error{location}: {message}")]
pub struct StaticError {
    pub line: usize,
    pub location: Location,
    pub message: String,
}

impl StaticError {
    pub fn at_line(line: usize, message: impl Into<String>) -> Self {
        StaticError {
            line,
            location: Location::Nowhere,
            message: message.into(),
        }
    }
}

/// Every static diagnostic produced for one source, in source order.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct StaticErrors(pub Vec<StaticError>);

impl StaticErrors {
    pub fn iter(&self) -> impl Iterator<Item = &StaticError> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for StaticErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, error) in self.0.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "{}", error)?;
        }
        Ok(())
    }
}

impl std::error::Error for StaticErrors {}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum RuntimeError {
    #[error("Undefined variable '{}'.\n[line {}]", .name.lexeme, .name.line)]
    UndefinedVariable { name: Token },

    #[error("{}\n[line {}]", .message, .operator.line)]
    Type {
        operator: Token,
        message: &'static str,
    },

    #[error("Division by zero.\n[line {}]", .operator.line)]
    DivisionByZero { operator: Token },

    #[error("Failed to write output: {message}\n[line {line}]")]
    Output { message: String, line: usize },
}

impl RuntimeError {
    pub fn line(&self) -> usize {
        match self {
            RuntimeError::UndefinedVariable { name } => name.line,
            RuntimeError::Type { operator, .. } => operator.line,
            RuntimeError::DivisionByZero { operator } => operator.line,
            RuntimeError::Output { line, .. } => *line,
        }
    }
}
