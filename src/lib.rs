//! # treelox
//!
//! A tree-walking interpreter for a small dynamically typed scripting
//! language: source text is scanned into tokens, parsed into statements and
//! evaluated against a scope chain of variable bindings.

use std::{
    fs,
    io::{self, BufRead, Write},
    path::Path,
};

use thiserror::Error;
use tracing::debug;

pub mod ast;
pub mod common;
pub mod environment;
pub mod interpreter;
pub mod lexer;
pub mod parser;
pub mod printer;
pub mod token;
pub mod value;

pub use common::{RuntimeError, StaticError, StaticErrors};
pub use interpreter::Interpreter;

/// Exit status for command-line misuse.
pub const EXIT_USAGE: i32 = 64;
/// Exit status when a script has scan or parse errors.
pub const EXIT_STATIC: i32 = 65;
/// Exit status when a script fails while running.
pub const EXIT_RUNTIME: i32 = 70;
/// Exit status when a script cannot be read.
pub const EXIT_IO: i32 = 74;

#[derive(Debug, Error)]
pub enum Error {
    #[error("{0}")]
    Static(#[from] StaticErrors),

    #[error("{0}")]
    Runtime(#[from] RuntimeError),

    #[error("could not read script: {0}")]
    Io(#[from] io::Error),
}

impl Error {
    pub fn exit_code(&self) -> i32 {
        match self {
            Error::Static(_) => EXIT_STATIC,
            Error::Runtime(_) => EXIT_RUNTIME,
            Error::Io(_) => EXIT_IO,
        }
    }
}

/// Scans and parses `source`. Scan diagnostics stop before parsing, since a
/// dropped character would only produce follow-on parse errors. Otherwise
/// every parse diagnostic is returned at once.
pub fn compile(source: &str) -> Result<Vec<ast::Stmt>, StaticErrors> {
    let (tokens, scan_errors) = lexer::scan(source);
    if !scan_errors.is_empty() {
        return Err(StaticErrors(scan_errors));
    }

    let (stmts, parse_errors) = parser::parse(&tokens);
    if !parse_errors.is_empty() {
        return Err(StaticErrors(parse_errors));
    }

    Ok(stmts)
}

/// The parenthesized form of every statement in `source`.
pub fn dump(source: &str) -> Result<Vec<String>, StaticErrors> {
    Ok(compile(source)?.iter().map(printer::print_stmt).collect())
}

/// One interpreter session. Global bindings persist across [`Lox::run`]
/// calls, which is what makes the interactive prompt stateful.
#[derive(Debug)]
pub struct Lox<W: Write = io::Stdout> {
    interpreter: Interpreter<W>,
}

impl Lox<io::Stdout> {
    pub fn new() -> Self {
        Lox {
            interpreter: Interpreter::new(),
        }
    }
}

impl Default for Lox<io::Stdout> {
    fn default() -> Self {
        Self::new()
    }
}

impl<W: Write> Lox<W> {
    pub fn with_output(out: W) -> Self {
        Lox {
            interpreter: Interpreter::with_output(out),
        }
    }

    pub fn interpreter(&self) -> &Interpreter<W> {
        &self.interpreter
    }

    pub fn into_output(self) -> W {
        self.interpreter.into_output()
    }

    /// Runs one source text. Nothing executes if it has static errors.
    pub fn run(&mut self, source: &str) -> Result<(), Error> {
        debug!(bytes = source.len(), "run");
        let stmts = compile(source)?;
        self.interpreter.interpret(&stmts)?;
        Ok(())
    }

    pub fn run_file(&mut self, path: impl AsRef<Path>) -> Result<(), Error> {
        let source = fs::read_to_string(path.as_ref())?;
        debug!(path = %path.as_ref().display(), "running script");
        self.run(&source)
    }

    /// Reads and runs one line at a time until `input` is exhausted. Errors
    /// are written to `errors` and do not end the session.
    pub fn run_prompt<R, P, E>(&mut self, input: R, prompt: &mut P, errors: &mut E) -> io::Result<()>
    where
        R: BufRead,
        P: Write,
        E: Write,
    {
        let mut lines = input.lines();
        loop {
            write!(prompt, "> ")?;
            prompt.flush()?;

            let Some(line) = lines.next() else {
                break;
            };

            if let Err(err) = self.run(&line?) {
                writeln!(errors, "{}", err)?;
            }
        }

        Ok(())
    }
}
