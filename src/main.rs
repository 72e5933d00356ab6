use std::{io, path::PathBuf, process::exit};

use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};
use treelox::{dump, Lox, EXIT_IO, EXIT_STATIC, EXIT_USAGE};

/// treelox runs scripts written in a small dynamically typed language, or
/// starts an interactive prompt when no script is given.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Print the parsed form of every statement in the script instead of
    /// running it.
    #[arg(long, requires = "script")]
    dump_ast: bool,

    /// Script to run.
    script: Option<PathBuf>,
}

/// Logging goes to stderr and is only enabled when `RUST_LOG` is set.
fn init_tracing() {
    if std::env::var("RUST_LOG").is_ok() {
        tracing_subscriber::registry()
            .with(fmt::layer().with_writer(io::stderr).with_target(true))
            .with(EnvFilter::from_default_env())
            .init();
    }
}

fn main() {
    let args = Args::try_parse().unwrap_or_else(|err| {
        if err.use_stderr() {
            eprintln!("{err}");
            exit(EXIT_USAGE);
        }
        err.exit()
    });

    init_tracing();

    let Some(script) = args.script else {
        let stdin = io::stdin();
        let mut lox = Lox::new();
        if let Err(err) = lox.run_prompt(stdin.lock(), &mut io::stdout(), &mut io::stderr()) {
            eprintln!("{err}");
        }
        return;
    };

    if args.dump_ast {
        let source = std::fs::read_to_string(&script).unwrap_or_else(|err| {
            eprintln!("could not read script: {err}");
            exit(EXIT_IO);
        });
        match dump(&source) {
            Ok(lines) => lines.iter().for_each(|line| println!("{line}")),
            Err(errors) => {
                eprintln!("{errors}");
                exit(EXIT_STATIC);
            }
        }
        return;
    }

    if let Err(err) = Lox::new().run_file(&script) {
        eprintln!("{err}");
        exit(err.exit_code());
    }
}
